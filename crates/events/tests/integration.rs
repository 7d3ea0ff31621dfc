//! Integration tests for the event bus

use gantry_events::{channel, BuildEvent, EventEmitter, EventLevel, OperationId};
use gantry_types::{Problem, ProblemId, Severity};

fn sample_problem() -> Problem {
    Problem::new(
        ProblemId::new("deprecation", "removed-api"),
        Severity::Warning,
        "API scheduled for removal",
    )
}

#[tokio::test]
async fn emitted_problems_arrive_with_stamped_meta() {
    let (tx, mut rx) = channel();
    let operation = OperationId::new();

    tx.emit_problem(operation, sample_problem());

    let message = rx.recv().await.expect("bus closed unexpectedly");
    assert_eq!(message.meta.level, EventLevel::Warn);
    assert_eq!(
        message.meta.correlation_id.as_deref(),
        Some(operation.to_string().as_str())
    );
    match message.event {
        BuildEvent::Problem {
            operation: stamped, ..
        } => assert_eq!(stamped, operation),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn report_announcement_carries_path_and_count() {
    let (tx, mut rx) = channel();

    tx.emit_report_available("/tmp/problems-report.json".into(), 7);

    let message = rx.recv().await.expect("bus closed unexpectedly");
    match message.event {
        BuildEvent::ProblemsReportAvailable {
            path,
            problem_count,
        } => {
            assert_eq!(path.to_string_lossy(), "/tmp/problems-report.json");
            assert_eq!(problem_count, 7);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn dropped_receiver_does_not_panic() {
    let (tx, rx) = channel();
    drop(rx);

    // Should not panic when the receiver is gone
    tx.emit_problem(OperationId::root(), sample_problem());
}

#[test]
fn messages_serialize_round_trip() {
    let (tx, mut rx) = channel();
    tx.emit_problem(OperationId::new(), sample_problem());

    let message = rx.try_recv().expect("message not queued");
    let json = serde_json::to_string(&message).expect("serializes");
    let back: gantry_events::EventMessage = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back.meta.event_id, message.meta.event_id);
}
