//! A terminal chat with the career assistant, built on `career-chat` as a
//! library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use career_chat::core::{RejectReason, Role, SessionStatus, SubmitOutcome};
use career_chat::http::{DEFAULT_BASE_URL, HttpServiceConfigBuilder};
use career_chat::{Draft, SessionBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;

enum SessionEvent {
    Answer(String),
    Status(SessionStatus),
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let base_url = env::var("CAREER_CHAT_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
    let Ok(timeout_secs) = read_number("CAREER_CHAT_TIMEOUT_SECS") else {
        return;
    };
    let Ok(max_question_chars) = read_number("CAREER_CHAT_MAX_QUESTION_CHARS")
    else {
        return;
    };

    let mut config = HttpServiceConfigBuilder::new().with_base_url(base_url);
    if let Some(secs) = timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs as u64));
    }
    let config = config.build();
    info!(endpoint = config.endpoint(), "starting session");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut builder = SessionBuilder::http(config)
        .on_message({
            let event_tx = event_tx.clone();
            move |_, message| {
                if message.role() == Role::Assistant {
                    event_tx
                        .send(SessionEvent::Answer(message.content().to_owned()))
                        .ok();
                }
            }
        })
        .on_status(move |status| {
            event_tx.send(SessionEvent::Status(status)).ok();
        });
    if let Some(max) = max_question_chars {
        builder = builder.with_max_question_chars(max);
    }
    let session = builder.build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    println!(
        "{}",
        "Ask the career assistant anything. Press Ctrl-D to quit.".dimmed()
    );
    prompt();

    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut draft = Draft::new();
    let mut progress_bar: Option<ProgressBar> = None;

    loop {
        select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        error!("error reading input: {}", err);
                        break;
                    }
                };
                // An empty line resends a draft that was kept after a
                // rejection.
                if !(line.is_empty() && !draft.is_empty()) {
                    draft.set(line);
                }

                let Ok(outcome) = session.submit_draft(&mut draft).await else {
                    break;
                };
                let notice = match outcome {
                    SubmitOutcome::Accepted => continue,
                    SubmitOutcome::Rejected(RejectReason::Blank) => None,
                    SubmitOutcome::Rejected(RejectReason::Busy) => Some(
                        "Still waiting for the last answer. Press Enter to \
                         send this once it arrives.",
                    ),
                    SubmitOutcome::Rejected(RejectReason::TooLong) => {
                        draft.clear();
                        Some("That question is too long.")
                    }
                };
                match (&progress_bar, notice) {
                    (Some(progress_bar), Some(notice)) => {
                        progress_bar.suspend(|| println!("{}", notice.dimmed()));
                    }
                    (Some(_), None) => {}
                    (None, notice) => {
                        if let Some(notice) = notice {
                            println!("{}", notice.dimmed());
                        }
                        prompt();
                    }
                }
            }
            event = event_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                match event {
                    SessionEvent::Status(SessionStatus::AwaitingResponse) => {
                        let bar = ProgressBar::new_spinner();
                        bar.set_style(progress_style.clone());
                        bar.set_message("🤔 Thinking...");
                        bar.enable_steady_tick(Duration::from_millis(100));
                        progress_bar = Some(bar);
                    }
                    SessionEvent::Answer(answer) => {
                        // Finish the progress bar before printing anything else.
                        if let Some(progress_bar) = progress_bar.take() {
                            progress_bar.finish_and_clear();
                        }
                        println!("{}🤖 {}", BAR_CHAR.bright_cyan(), answer.bright_white());
                        println!();
                    }
                    SessionEvent::Status(SessionStatus::Idle) => {
                        if let Some(progress_bar) = progress_bar.take() {
                            progress_bar.finish_and_clear();
                        }
                        prompt();
                    }
                }
            }
        }
    }
}

/// Reads an optional positive number from the environment. Reports an
/// invalid value on stderr.
fn read_number(key: &str) -> Result<Option<usize>, ()> {
    let Ok(value) = env::var(key) else {
        return Ok(None);
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => {
            eprintln!("{key} must be a positive number, got {value:?}");
            Err(())
        }
    }
}

#[inline]
fn prompt() {
    print!("> ");
    std::io::stdout().flush().ok();
}
