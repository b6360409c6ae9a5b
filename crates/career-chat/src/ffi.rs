//! FFI bindings for the library.
//!
//! Sessions created here run on a shared multi-thread runtime, so callbacks
//! are invoked from its worker threads.

use std::ffi::{CStr, c_char, c_void};
use std::sync::{Arc, LazyLock};

use career_chat_core::{RejectReason, Role, SessionStatus, SubmitOutcome};
use career_chat_http_service::HttpServiceConfigBuilder;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

use crate::{Session, SessionBuilder};

static TOKIO_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    RuntimeBuilder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("career-chat")
        .build()
        .expect("failed to start the tokio runtime")
});

/// Error codes returned by the C APIs.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// No error occurred.
    Ok = 0,
    /// Invalid parameters or strings.
    Invalid = 1,
    /// The session has stopped running.
    Dead = 2,
}

/// Outcome of `cc_session_submit`.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitCode {
    /// The question was appended and sent.
    Accepted = 0,
    /// The question was empty or whitespace only.
    Blank = 1,
    /// Another question is still awaiting its answer.
    Busy = 2,
    /// The question exceeded the configured length limit.
    TooLong = 3,
}

impl From<SubmitOutcome> for SubmitCode {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Accepted => Self::Accepted,
            SubmitOutcome::Rejected(RejectReason::Blank) => Self::Blank,
            SubmitOutcome::Rejected(RejectReason::Busy) => Self::Busy,
            SubmitOutcome::Rejected(RejectReason::TooLong) => Self::TooLong,
        }
    }
}

#[inline]
fn role_code(role: Role) -> u32 {
    match role {
        Role::User => 0,
        Role::Assistant => 1,
    }
}

#[inline]
fn status_code(status: SessionStatus) -> u32 {
    match status {
        SessionStatus::Idle => 0,
        SessionStatus::AwaitingResponse => 1,
    }
}

/// Callbacks for various events from the session.
///
/// Note that callback functions and `user_info` are assumed to be thread-safe
/// and able to send across the thread boundaries. Callbacks must not call
/// back into `cc_session_*` functions that block.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct SessionCallbacks {
    /// User-defined data to be passed to the callbacks.
    pub user_info: *mut c_void,
    /// Callback to handle messages appended to the transcript.
    ///
    /// Parameters:
    /// - `user_info`: The user-defined data.
    /// - `seq`: Position of the message in the transcript.
    /// - `role`: Message role (0 for user, 1 for assistant).
    /// - `content`: Message content, not nul-terminated.
    /// - `content_len`: Length of the content in bytes.
    pub on_message: Option<
        unsafe extern "C" fn(*mut c_void, usize, u32, *const c_char, usize),
    >,
    /// Callback to handle status changes (0 for idle, 1 for awaiting a
    /// response).
    pub on_status: Option<unsafe extern "C" fn(*mut c_void, u32)>,
    /// Callback to free the user-defined data.
    pub free: Option<unsafe extern "C" fn(*mut c_void)>,
}

// SAFETY: `SessionCallbacks` is guaranteed to be thread-safe by users.
unsafe impl Send for SessionCallbacks {}
unsafe impl Sync for SessionCallbacks {}

/// Frees `user_info` once the last callback referencing it is gone.
struct CallbacksGuard(SessionCallbacks);

impl Drop for CallbacksGuard {
    fn drop(&mut self) {
        if let Some(free) = self.0.free {
            // SAFETY: Assume the callback is valid.
            unsafe { free(self.0.user_info) };
        }
    }
}

/// Reads a nul-terminated UTF-8 string. Null reads as `None`.
///
/// # Safety
///
/// `ptr` must be null or point to a valid nul-terminated string.
unsafe fn read_str<'a>(ptr: *const c_char) -> Result<Option<&'a str>, ErrorCode> {
    if ptr.is_null() {
        return Ok(None);
    }
    // SAFETY: Checked for null above; the caller guarantees the rest.
    let s = unsafe { CStr::from_ptr(ptr) };
    s.to_str().map(Some).map_err(|_| ErrorCode::Invalid)
}

/// Creates a session that talks to the assistant service at `base_url`.
///
/// `base_url` may be null, in which case the default service address is
/// used. `callbacks` may be null too. `max_question_chars` of zero means
/// no length limit. `out` will be set to a pointer to the session if the
/// call succeeds; free it with `cc_session_free`.
///
/// # Safety
///
/// Strings passed to this function must contain a valid nul terminator at the
/// end of the string. `callbacks` must be null or a valid pointer to a
/// `SessionCallbacks` value whose fields are valid or null. `out` must be a
/// valid pointer that points to a pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cc_session_new(
    out: *mut *mut c_void,
    base_url: *const c_char,
    max_question_chars: usize,
    callbacks: *const SessionCallbacks,
) -> ErrorCode {
    if out.is_null() {
        return ErrorCode::Invalid;
    }
    // SAFETY: Assume the caller has provided the valid pointer.
    let base_url = match unsafe { read_str(base_url) } {
        Ok(base_url) => base_url,
        Err(code) => return code,
    };

    let mut config = HttpServiceConfigBuilder::new();
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    let mut builder = SessionBuilder::http(config.build());
    if max_question_chars > 0 {
        builder = builder.with_max_question_chars(max_question_chars);
    }

    if !callbacks.is_null() {
        // SAFETY: Assume the caller has provided the valid pointer.
        let callbacks = unsafe { *callbacks };
        builder = attach_callbacks(builder, callbacks);
    }

    // Spawning the orchestrator requires a runtime context.
    let _enter = TOKIO_RUNTIME.enter();
    let session = builder.build();
    let session_ptr = Box::into_raw(Box::new(session));
    // SAFETY: Assume `out` is valid and properly aligned.
    unsafe {
        (out as *mut *mut Session).write(session_ptr);
    }

    ErrorCode::Ok
}

fn attach_callbacks(
    mut builder: SessionBuilder,
    callbacks: SessionCallbacks,
) -> SessionBuilder {
    let guard = Arc::new(CallbacksGuard(callbacks));

    if let Some(on_message) = callbacks.on_message {
        let guard = Arc::clone(&guard);
        builder = builder.on_message(move |seq, message| {
            let content = message.content();
            // SAFETY: Assume the callback is valid.
            unsafe {
                on_message(
                    guard.0.user_info,
                    seq,
                    role_code(message.role()),
                    content.as_ptr() as *const c_char,
                    content.len(),
                )
            };
        });
    }
    if let Some(on_status) = callbacks.on_status {
        let guard = Arc::clone(&guard);
        builder = builder.on_status(move |status| {
            // SAFETY: Assume the callback is valid.
            unsafe { on_status(guard.0.user_info, status_code(status)) };
        });
    }
    // If no callback holds a clone, `user_info` is freed right here.
    builder
}

/// Submits a question and waits until it is accepted or rejected. The
/// answer arrives later through the `on_message` callback.
///
/// On success, `out_code` is set to a `SubmitCode`.
///
/// # Safety
///
/// `session` must be a valid pointer returned from `cc_session_new`. String
/// pointed by `text` must contain a valid nul terminator at the end of the
/// string. `out_code` must be a valid pointer. Must not be called from
/// within a callback.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cc_session_submit(
    session: *mut c_void,
    text: *const c_char,
    out_code: *mut u32,
) -> ErrorCode {
    if session.is_null() || out_code.is_null() {
        return ErrorCode::Invalid;
    }
    // SAFETY: Assume the caller has provided the valid pointer.
    let text = match unsafe { read_str(text) } {
        Ok(Some(text)) => text,
        Ok(None) => return ErrorCode::Invalid,
        Err(code) => return code,
    };

    // SAFETY: Assume the caller has provided the valid pointer.
    let session = unsafe { &*(session as *mut Session) };
    match TOKIO_RUNTIME.block_on(session.submit(text)) {
        Ok(outcome) => {
            // SAFETY: Assume the caller has provided the valid pointer.
            unsafe { out_code.write(SubmitCode::from(outcome) as u32) };
            ErrorCode::Ok
        }
        Err(err) => {
            error!("submit failed: {err}");
            ErrorCode::Dead
        }
    }
}

/// Gets the current session status (0 for idle, 1 for awaiting a
/// response).
///
/// # Safety
///
/// `session` must be a valid pointer returned from `cc_session_new`.
/// `out_status` must be a valid pointer. Must not be called from within a
/// callback.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cc_session_status(
    session: *mut c_void,
    out_status: *mut u32,
) -> ErrorCode {
    if session.is_null() || out_status.is_null() {
        return ErrorCode::Invalid;
    }
    // SAFETY: Assume the caller has provided the valid pointer.
    let session = unsafe { &*(session as *mut Session) };
    match TOKIO_RUNTIME.block_on(session.status()) {
        Ok(status) => {
            // SAFETY: Assume the caller has provided the valid pointer.
            unsafe { out_status.write(status_code(status)) };
            ErrorCode::Ok
        }
        Err(_) => ErrorCode::Dead,
    }
}

/// Frees a session.
///
/// An exchange that is still in flight settles afterwards, and its
/// callbacks still fire; `user_info` is freed after that.
///
/// # Safety
///
/// `session` must be a valid pointer returned from `cc_session_new`, and
/// must not be used again after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cc_session_free(session: *mut c_void) {
    if session.is_null() {
        return;
    }
    // SAFETY: Assume the caller has provided the valid pointer.
    unsafe {
        drop(Box::from_raw(session as *mut Session));
    }
}
