use std::sync::{Arc, Mutex};
use std::time::Duration;

use career_chat_test_service::{PresetFailure, PresetReply, TestService};
use tokio::sync::watch;
use tokio::time::timeout;

use crate::{
    DEFAULT_FAILURE_NOTICE, Orchestrator, OrchestratorBuilder, RejectReason,
    Role, SessionStatus, SubmitOutcome,
};

/// Counts settled exchanges through the idle callback.
fn build_counting(
    builder: OrchestratorBuilder,
) -> (Orchestrator, watch::Receiver<usize>) {
    let (idle_tx, idle_rx) = watch::channel(0usize);
    let orchestrator = builder
        .on_idle(move || {
            idle_tx.send_modify(|settled| *settled += 1);
        })
        .build();
    (orchestrator, idle_rx)
}

async fn wait_settled(idle_rx: &mut watch::Receiver<usize>, count: usize) {
    timeout(Duration::from_secs(60), idle_rx.wait_for(|n| *n >= count))
        .await
        .expect("exchange never settled")
        .unwrap();
}

fn roles_and_contents(
    snapshot: &[crate::Message],
) -> Vec<(Role, &str)> {
    snapshot.iter().map(|m| (m.role(), m.content())).collect()
}

#[tokio::test(start_paused = true)]
async fn test_answer_is_appended() {
    let service = TestService::with_replies([PresetReply::answer(
        "Consider software engineering.",
    )]);
    let (orchestrator, mut idle_rx) =
        build_counting(OrchestratorBuilder::with_service(service.clone()));

    let outcome = orchestrator.submit("What career suits me?").await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Accepted);
    wait_settled(&mut idle_rx, 1).await;

    let snapshot = orchestrator.snapshot().await.unwrap();
    assert_eq!(
        roles_and_contents(&snapshot),
        [
            (Role::User, "What career suits me?"),
            (Role::Assistant, "Consider software engineering."),
        ]
    );
    assert_eq!(orchestrator.status().await.unwrap(), SessionStatus::Idle);
    assert_eq!(service.questions(), ["What career suits me?"]);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_service_leaves_notice() {
    let service =
        TestService::with_replies([PresetReply::Failure(PresetFailure::Transport)]);
    let (orchestrator, mut idle_rx) =
        build_counting(OrchestratorBuilder::with_service(service));

    assert!(orchestrator.submit("Hi").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 1).await;

    let snapshot = orchestrator.snapshot().await.unwrap();
    assert_eq!(
        roles_and_contents(&snapshot),
        [(Role::User, "Hi"), (Role::Assistant, DEFAULT_FAILURE_NOTICE)]
    );
    assert_eq!(orchestrator.status().await.unwrap(), SessionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_submit_while_awaiting_is_rejected() {
    let mut service = TestService::with_replies([
        PresetReply::answer("Answer to A"),
        PresetReply::answer("Answer to B"),
    ]);
    service.set_delay(Duration::from_secs(1));
    let (orchestrator, mut idle_rx) =
        build_counting(OrchestratorBuilder::with_service(service.clone()));

    assert!(orchestrator.submit("A").await.unwrap().is_accepted());
    assert_eq!(
        orchestrator.submit("B").await.unwrap(),
        SubmitOutcome::Rejected(RejectReason::Busy)
    );

    let pending = orchestrator.snapshot().await.unwrap();
    assert_eq!(roles_and_contents(&pending), [(Role::User, "A")]);
    assert_eq!(
        orchestrator.status().await.unwrap(),
        SessionStatus::AwaitingResponse
    );
    assert_eq!(service.call_count(), 1);

    wait_settled(&mut idle_rx, 1).await;
    let settled = orchestrator.snapshot().await.unwrap();
    assert_eq!(
        roles_and_contents(&settled),
        [(Role::User, "A"), (Role::Assistant, "Answer to A")]
    );
    assert_eq!(service.questions(), ["A"]);

    // Once idle again, the next question goes through.
    assert!(orchestrator.submit("B").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 2).await;
    assert_eq!(service.questions(), ["A", "B"]);
}

#[tokio::test(start_paused = true)]
async fn test_blank_submissions_do_nothing() {
    let service = TestService::with_replies([PresetReply::answer("unused")]);
    let orchestrator = OrchestratorBuilder::with_service(service.clone()).build();

    for text in ["", "   ", "\n\t "] {
        assert_eq!(
            orchestrator.submit(text).await.unwrap(),
            SubmitOutcome::Rejected(RejectReason::Blank)
        );
    }

    assert!(orchestrator.snapshot().await.unwrap().is_empty());
    assert_eq!(orchestrator.status().await.unwrap(), SessionStatus::Idle);
    assert_eq!(service.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_service_still_settles() {
    let service = TestService::with_replies([
        PresetReply::Panic,
        PresetReply::answer("Back online."),
    ]);
    let (orchestrator, mut idle_rx) =
        build_counting(OrchestratorBuilder::with_service(service.clone()));

    assert!(orchestrator.submit("Hi").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 1).await;

    let snapshot = orchestrator.snapshot().await.unwrap();
    assert_eq!(
        roles_and_contents(&snapshot),
        [(Role::User, "Hi"), (Role::Assistant, DEFAULT_FAILURE_NOTICE)]
    );
    assert_eq!(orchestrator.status().await.unwrap(), SessionStatus::Idle);

    // The service client came back, so the session is not stuck busy.
    assert!(orchestrator.submit("Again?").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 2).await;
    let snapshot = orchestrator.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot[3].content(), "Back online.");
    assert_eq!(service.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_exchanges_alternate() {
    const EXCHANGES: usize = 5;

    let service = TestService::with_replies((0..EXCHANGES).map(|i| {
        if i % 2 == 0 {
            PresetReply::answer(format!("answer {i}"))
        } else {
            PresetReply::Failure(PresetFailure::Status)
        }
    }));
    let (orchestrator, mut idle_rx) =
        build_counting(OrchestratorBuilder::with_service(service.clone()));

    for i in 0..EXCHANGES {
        assert!(
            orchestrator
                .submit(format!("question {i}"))
                .await
                .unwrap()
                .is_accepted()
        );
        wait_settled(&mut idle_rx, i + 1).await;
    }

    let snapshot = orchestrator.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 2 * EXCHANGES);
    for (seq, message) in snapshot.iter().enumerate() {
        let expected = if seq % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(message.role(), expected, "message {seq}");
    }
    assert_eq!(snapshot[2].content(), "question 1");
    assert_eq!(snapshot[3].content(), DEFAULT_FAILURE_NOTICE);
    assert_eq!(snapshot[4].content(), "question 2");
    assert_eq!(snapshot[5].content(), "answer 2");
    assert_eq!(service.peak_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_content_is_kept_verbatim() {
    let answer = "  **Bold** advice\n\n```\ncode\n```\n";
    let service = TestService::with_replies([PresetReply::answer(answer)]);
    let (orchestrator, mut idle_rx) =
        build_counting(OrchestratorBuilder::with_service(service.clone()));

    assert!(orchestrator.submit("  padded question \n").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 1).await;

    let snapshot = orchestrator.snapshot().await.unwrap();
    assert_eq!(snapshot[0].content(), "  padded question \n");
    assert_eq!(snapshot[1].content(), answer);
    assert_eq!(service.questions(), ["  padded question \n"]);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_submissions_dispatch_once() {
    let mut service = TestService::with_replies([PresetReply::answer("only one")]);
    service.set_delay(Duration::from_millis(500));
    let (orchestrator, mut idle_rx) =
        build_counting(OrchestratorBuilder::with_service(service.clone()));

    let submissions = (0..16).map(|i| {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit(format!("q{i}")).await })
    });
    let mut accepted = 0;
    for submission in submissions.collect::<Vec<_>>() {
        match submission.await.unwrap().unwrap() {
            SubmitOutcome::Accepted => accepted += 1,
            SubmitOutcome::Rejected(reason) => {
                assert_eq!(reason, RejectReason::Busy);
            }
        }
    }
    assert_eq!(accepted, 1);

    wait_settled(&mut idle_rx, 1).await;
    assert_eq!(orchestrator.snapshot().await.unwrap().len(), 2);
    assert_eq!(service.call_count(), 1);
    assert_eq!(service.peak_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failure_notice_and_length_limit() {
    let service = TestService::with_replies([
        PresetReply::Failure(PresetFailure::Payload),
        PresetReply::answer("fine"),
    ]);
    let (orchestrator, mut idle_rx) = build_counting(
        OrchestratorBuilder::with_service(service)
            .with_failure_notice("The assistant is unavailable right now.")
            .with_max_question_chars(5),
    );

    assert_eq!(
        orchestrator.submit("123456").await.unwrap(),
        SubmitOutcome::Rejected(RejectReason::TooLong)
    );
    // Five characters, more than five bytes.
    assert!(orchestrator.submit("héllo").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 1).await;

    assert!(orchestrator.submit("again").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 2).await;

    let snapshot = orchestrator.snapshot().await.unwrap();
    assert_eq!(
        roles_and_contents(&snapshot),
        [
            (Role::User, "héllo"),
            (Role::Assistant, "The assistant is unavailable right now."),
            (Role::User, "again"),
            (Role::Assistant, "fine"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_blank_failure_notice_is_ignored() {
    let service =
        TestService::with_replies([PresetReply::Failure(PresetFailure::Status)]);
    let (orchestrator, mut idle_rx) = build_counting(
        OrchestratorBuilder::with_service(service).with_failure_notice("  "),
    );

    assert!(orchestrator.submit("Hi").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 1).await;
    assert_eq!(
        orchestrator.snapshot().await.unwrap()[1].content(),
        DEFAULT_FAILURE_NOTICE
    );
}

#[tokio::test(start_paused = true)]
async fn test_observers_follow_the_state_machine() {
    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Message(usize, Role),
        Status(SessionStatus),
    }

    let events = Arc::new(Mutex::new(Vec::new()));
    let service = TestService::with_replies([PresetReply::answer("ok")]);
    let builder = OrchestratorBuilder::with_service(service)
        .on_message({
            let events = Arc::clone(&events);
            move |seq, message| {
                events.lock().unwrap().push(Event::Message(seq, message.role()));
            }
        })
        .on_status({
            let events = Arc::clone(&events);
            move |status| {
                events.lock().unwrap().push(Event::Status(status));
            }
        });
    let (orchestrator, mut idle_rx) = build_counting(builder);

    assert!(orchestrator.submit("Hi").await.unwrap().is_accepted());
    wait_settled(&mut idle_rx, 1).await;

    assert_eq!(
        *events.lock().unwrap(),
        [
            Event::Message(0, Role::User),
            Event::Status(SessionStatus::AwaitingResponse),
            Event::Message(1, Role::Assistant),
            Event::Status(SessionStatus::Idle),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_exchange_outlives_orchestrator() {
    let mut service = TestService::with_replies([PresetReply::answer("late")]);
    service.set_delay(Duration::from_secs(1));
    let (answer_tx, mut answer_rx) = watch::channel(None::<String>);
    let orchestrator = OrchestratorBuilder::with_service(service.clone())
        .on_message(move |_, message| {
            if message.role() == Role::Assistant {
                answer_tx.send_replace(Some(message.content().to_owned()));
            }
        })
        .build();

    assert!(orchestrator.submit("Anyone?").await.unwrap().is_accepted());
    drop(orchestrator);

    timeout(Duration::from_secs(60), answer_rx.wait_for(Option::is_some))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(answer_rx.borrow().as_deref(), Some("late"));
    assert_eq!(service.in_flight(), 0);
}
