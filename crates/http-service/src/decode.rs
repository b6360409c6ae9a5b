use career_chat_service::{ChatResponse, ErrorKind};
use mime::Mime;

use crate::Error;

/// Checks the `Content-Type` header of a successful response.
///
/// A missing header is tolerated and left to the body parser. Anything
/// that is present must be JSON (`application/json` or a `+json` suffix).
pub fn check_content_type(content_type: Option<&str>) -> Result<(), Error> {
    let Some(content_type) = content_type else {
        return Ok(());
    };
    let is_json = content_type
        .parse::<Mime>()
        .map(|m| {
            m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
        })
        .unwrap_or(false);
    if !is_json {
        return Err(Error::new(
            format!("unexpected content type: {content_type}"),
            ErrorKind::Payload,
        ));
    }
    Ok(())
}

/// Parses the response body into an answer.
///
/// An empty `answer` is refused, since it would leave a blank assistant
/// turn in the transcript.
pub fn decode_answer(body: &[u8]) -> Result<ChatResponse, Error> {
    let resp = serde_json::from_slice::<ChatResponse>(body)
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Payload))?;
    if resp.answer.is_empty() {
        return Err(Error::new("empty answer", ErrorKind::Payload));
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert!(check_content_type(None).is_ok());
        assert!(check_content_type(Some("application/json")).is_ok());
        assert!(
            check_content_type(Some("application/json; charset=utf-8")).is_ok()
        );
        assert!(check_content_type(Some("application/problem+json")).is_ok());

        let err = check_content_type(Some("text/html")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Payload);
        assert!(check_content_type(Some("garbage")).is_err());
    }

    #[test]
    fn test_answer_kept_verbatim() {
        let resp =
            decode_answer(br#"{"answer": "  # Title\n\n- item  "}"#).unwrap();
        assert_eq!(resp.answer, "  # Title\n\n- item  ");
    }

    #[test]
    fn test_bad_bodies() {
        for body in [
            &b"not json"[..],
            br#"{"detail": "Not Found"}"#,
            br#"{"answer": 42}"#,
            br#"{"answer": ""}"#,
        ] {
            let err = decode_answer(body).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Payload, "{err}");
        }
    }
}
