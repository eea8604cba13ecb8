//! Tests for the block runner and orchestrator (`run_block` / `run_blocks`).
//!
//! Ordering, failure classification, and interruption are verified against
//! a session that records every remote call in order.

use std::future::{Future, pending};
use std::pin::Pin;
use std::task::{Context, Poll};

use rdiag_cli::application::services::diagnose::{
    BlockStatus, RunOptions, run_block, run_blocks,
};
use rdiag_cli::domain::RunStatus;

use crate::mocks::{
    Call, RecordingReporter, RecordingSession, commands, controlled, fatal, ok, scripts,
};

fn options() -> RunOptions {
    RunOptions::default()
}

// ── Ordering ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn blocks_and_items_run_in_declaration_order() {
    let session = RecordingSession::new();
    let reporter = RecordingReporter::new();
    let blocks = vec![
        commands("B1", &["c1", "c2", "c3"]),
        commands("B2", &["c4"]),
        commands("B3", &["c5", "c6"]),
    ];

    let status = run_blocks(&session, &blocks, &options(), &reporter, pending()).await;

    assert_eq!(
        status,
        RunStatus::Completed {
            items: 6,
            controlled_failures: 0
        }
    );
    assert_eq!(session.executed(), vec!["c1", "c2", "c3", "c4", "c5", "c6"]);
}

#[tokio::test]
async fn empty_block_list_is_a_clean_no_op() {
    let session = RecordingSession::new();
    let reporter = RecordingReporter::new();

    let status = run_blocks(&session, &[], &options(), &reporter, pending()).await;

    assert_eq!(status.exit_code(), 0);
    assert!(session.calls().is_empty());
    assert!(reporter.events().is_empty());
}

#[tokio::test]
async fn header_precedes_each_block_items() {
    let session = RecordingSession::new().respond("hostname", ok("web-01\n"));
    let reporter = RecordingReporter::new();
    let blocks = vec![commands("B1", &["hostname"]), commands("B2", &["true"])];

    run_blocks(&session, &blocks, &options(), &reporter, pending()).await;

    assert_eq!(
        reporter.events(),
        vec!["header:B1", "output:web-01", "header:B2", "output:-"]
    );
}

// ── Controlled failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn controlled_failure_reports_and_continues() {
    let session = RecordingSession::new()
        .respond("echo ok", ok("ok"))
        .respond("false", controlled("exit status 1"));
    let reporter = RecordingReporter::new();
    let blocks = vec![
        commands("B1", &["echo ok", "false"]),
        commands("B2", &["uptime"]),
    ];

    let status = run_blocks(&session, &blocks, &options(), &reporter, pending()).await;

    assert_eq!(
        reporter.events(),
        vec![
            "header:B1",
            "output:ok",
            "controlled:B1:false:exit status 1",
            "header:B2",
            "output:-",
        ]
    );
    assert_eq!(session.executed(), vec!["echo ok", "false", "uptime"]);
    assert_eq!(
        status,
        RunStatus::Completed {
            items: 3,
            controlled_failures: 1
        }
    );
    assert_eq!(status.exit_code(), 0);
}

#[tokio::test]
async fn controlled_failure_in_first_item_does_not_skip_second() {
    let session = RecordingSession::new().respond("c1", controlled("nope"));
    let reporter = RecordingReporter::new();
    let block = commands("B1", &["c1", "c2"]);
    let mut interrupt = Box::pin(pending::<()>());

    let status = run_block(&session, &block, &options(), &reporter, &mut interrupt).await;

    assert_eq!(
        status,
        BlockStatus::Finished {
            items: 2,
            controlled_failures: 1
        }
    );
    assert_eq!(session.executed(), vec!["c1", "c2"]);
}

// ── Fatal failures ────────────────────────────────────────────────────────────

#[tokio::test]
async fn fatal_failure_halts_the_run() {
    let session = RecordingSession::new().respond("c2", fatal("connection reset"));
    let reporter = RecordingReporter::new();
    let blocks = vec![commands("B1", &["c1", "c2", "c3"]), commands("B2", &["c4"])];

    let status = run_blocks(&session, &blocks, &options(), &reporter, pending()).await;

    assert_eq!(session.executed(), vec!["c1", "c2"]);
    assert_eq!(
        status,
        RunStatus::Aborted {
            block: "B1".to_string(),
            item: "c2".to_string(),
            detail: "connection reset".to_string(),
        }
    );
    assert_eq!(status.exit_code(), 1);
    assert_eq!(
        reporter.events().last().map(String::as_str),
        Some("fatal:B1:c2:connection reset")
    );
}

#[tokio::test]
async fn script_upload_failure_terminates_without_further_calls() {
    let session = RecordingSession::new().fail_upload("inventory.sh");
    let reporter = RecordingReporter::new();
    let blocks = vec![scripts("S1", &["inventory.sh", "other.sh"]), commands("B2", &["id"])];

    let status = run_blocks(&session, &blocks, &options(), &reporter, pending()).await;

    assert_eq!(status.exit_code(), 1);
    assert_eq!(session.calls().len(), 1);
    assert!(matches!(session.calls()[0], Call::Transfer { .. }));
}

#[tokio::test]
async fn script_block_runs_full_protocol_per_item() {
    let session = RecordingSession::new()
        .respond("~/a.sh", ok("A"))
        .respond("~/b.sh", controlled("b failed"));
    let reporter = RecordingReporter::new();
    let blocks = vec![scripts("S1", &["a.sh", "b.sh"])];

    let status = run_blocks(&session, &blocks, &options(), &reporter, pending()).await;

    assert_eq!(
        session.executed(),
        vec![
            "chmod +x ~/a.sh",
            "~/a.sh",
            "rm -f ~/a.sh",
            "chmod +x ~/b.sh",
            "~/b.sh",
            "rm -f ~/b.sh",
        ]
    );
    assert_eq!(
        reporter.events(),
        vec!["header:S1", "output:A", "controlled:S1:b.sh:b failed"]
    );
    assert_eq!(status.exit_code(), 0);
}

// ── Debug echo ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn debug_echoes_items_before_running_them() {
    let session = RecordingSession::new();
    let reporter = RecordingReporter::new();
    let blocks = vec![commands("B1", &["id"]), scripts("S1", &["x.sh"])];
    let options = RunOptions {
        debug: true,
        ..RunOptions::default()
    };

    run_blocks(&session, &blocks, &options, &reporter, pending()).await;

    assert_eq!(
        reporter.events(),
        vec![
            "header:B1",
            "started:command:id",
            "output:-",
            "header:S1",
            "started:script:x.sh",
            "output:-",
        ]
    );
}

#[tokio::test]
async fn no_echo_without_debug() {
    let session = RecordingSession::new();
    let reporter = RecordingReporter::new();

    run_blocks(&session, &[commands("B1", &["id"])], &options(), &reporter, pending()).await;

    assert!(!reporter.events().iter().any(|e| e.starts_with("started:")));
}

// ── Interruption ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn already_fired_interrupt_stops_before_any_call() {
    let session = RecordingSession::new();
    let reporter = RecordingReporter::new();
    let blocks = vec![commands("B1", &["c1"]), commands("B2", &["c2"])];

    let status = run_blocks(&session, &blocks, &options(), &reporter, async {}).await;

    assert_eq!(status, RunStatus::Interrupted);
    assert_eq!(status.exit_code(), 1);
    assert!(session.calls().is_empty());
    assert_eq!(reporter.events(), vec!["header:B1"]);
}

#[tokio::test]
async fn interrupt_during_command_stops_the_run_silently() {
    let (session, started) = RecordingSession::new().hang_on("sleep 600");
    let reporter = RecordingReporter::new();
    let blocks = vec![
        commands("B1", &["c1", "sleep 600", "c3"]),
        commands("B2", &["c4"]),
    ];
    let interrupt = async {
        let _ = started.await;
    };

    let status = run_blocks(&session, &blocks, &options(), &reporter, interrupt).await;

    assert_eq!(status, RunStatus::Interrupted);
    assert_eq!(session.executed(), vec!["c1", "sleep 600"]);
    assert_eq!(reporter.events(), vec!["header:B1", "output:-"]);
}

#[tokio::test]
async fn interrupt_during_script_skips_cleanup() {
    let (session, started) = RecordingSession::new().hang_on("~/slow.sh");
    let reporter = RecordingReporter::new();
    let blocks = vec![scripts("S1", &["slow.sh"])];
    let interrupt = async {
        let _ = started.await;
    };

    let status = run_blocks(&session, &blocks, &options(), &reporter, interrupt).await;

    assert_eq!(status, RunStatus::Interrupted);
    assert_eq!(
        session.executed(),
        vec!["chmod +x ~/slow.sh", "~/slow.sh"]
    );
}

/// Interrupt that stays pending for `polls` polls, then fires.
struct FiresAfter {
    polls: usize,
}

impl Future for FiresAfter {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        if self.polls == 0 {
            Poll::Ready(())
        } else {
            self.polls -= 1;
            Poll::Pending
        }
    }
}

#[tokio::test]
async fn interrupt_after_last_item_still_fails_the_run() {
    let session = RecordingSession::new().respond("uptime", ok("up 3 days"));
    let reporter = RecordingReporter::new();
    let blocks = vec![commands("B1", &["uptime"])];

    let status = run_blocks(
        &session,
        &blocks,
        &options(),
        &reporter,
        FiresAfter { polls: 1 },
    )
    .await;

    assert_eq!(status, RunStatus::Interrupted);
    assert_eq!(status.exit_code(), 1);
    assert_eq!(session.executed(), vec!["uptime"]);
    assert_eq!(reporter.events(), vec!["header:B1", "output:up 3 days"]);
}
