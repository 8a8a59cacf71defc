//! End-to-end tests for the cooperative loop body.
//!
//! Chat updates and web form submissions go in at the edge; relay calls,
//! threshold changes and chat replies come out of the mocks.

use growmonitor::adapters::web::parse_threshold_form;
use growmonitor::app::commands::AppCommand;
use growmonitor::app::ports::SchedulerDelegate;
use growmonitor::app::service::AppService;
use growmonitor::config::SystemConfig;
use growmonitor::error::TransportError;
use growmonitor::escape::EscapingMode;
use growmonitor::inbox;
use growmonitor::report;
use growmonitor::runtime::Runtime;
use growmonitor::scheduler::{COMMAND_POLL, SAMPLING, Scheduler};

use crate::mock_hw::{
    MockClock, MockHardware, MockRemote, RecordingSink, lock_shared_state,
};

type TestRuntime = Runtime<MockHardware, MockRemote, MockClock, RecordingSink>;

fn runtime() -> TestRuntime {
    Runtime::new(
        AppService::new(SystemConfig::default()),
        MockHardware::new(),
        MockRemote::new(),
        MockClock::new(),
        RecordingSink::new(),
    )
}

// ── Chat commands ─────────────────────────────────────────────

#[test]
fn start_registers_menu_and_publishes_status() {
    let _guard = lock_shared_state();
    let mut rt = runtime();

    rt.start();

    assert_eq!(rt.remote.menus.len(), 1);
    assert!(rt.remote.menus[0].contains("\"command\":\"medir\""));
    assert_eq!(inbox::read_status(), rt.app.status());
}

#[test]
fn poll_dispatches_each_selected_command() {
    let mut rt = runtime();
    rt.remote
        .queue_texts(10, &["/bombaligar", "/alertatemperatura 31", "hello"]);

    rt.on_schedule_fired(COMMAND_POLL, 1_000);

    assert!(rt.hw.pump_on());
    assert_eq!(rt.app.state().thresholds.temperature_high_c, 31.0);
    assert_eq!(
        rt.remote.texts(),
        [
            report::pump_changed(true),
            "New temperature alert threshold: 31.0°C"
        ]
    );
    assert_eq!(rt.engine.last_seen_id(), 12);
    assert_eq!(rt.remote.offsets, [1]);
}

#[test]
fn one_command_per_category_per_poll() {
    let mut rt = runtime();
    rt.remote
        .queue_texts(1, &["/bombadesligar", "/bombaligar", "/help", "/medir"]);

    rt.poll_commands();

    // Pump: /bombaligar outranks /bombadesligar.  Session: /medir wins.
    assert!(rt.hw.pump_on());
    assert_eq!(rt.app.state().history.len(), 1);
    assert!(!rt.remote.texts().contains(&report::HELP));
    assert_eq!(rt.remote.sent.len(), 2);
}

#[test]
fn bad_argument_gets_usage_reply() {
    let mut rt = runtime();
    let before = rt.app.state().thresholds;
    rt.remote
        .queue_texts(3, &["/alertaumidade abc", "/alertatemperatura"]);

    rt.poll_commands();

    assert_eq!(rt.app.state().thresholds, before);
    assert_eq!(
        rt.remote.texts(),
        [report::TEMPERATURE_USAGE, report::SOIL_USAGE]
    );
    assert!(rt
        .remote
        .sent
        .iter()
        .all(|(_, mode)| *mode == EscapingMode::EscapedMarkup));
}

#[test]
fn failed_poll_dispatches_nothing_and_retries_same_offset() {
    let mut rt = runtime();
    rt.remote.updates.push_back(Err(TransportError::Timeout));
    rt.remote.updates.push_back(Ok(r#"{"ok":false}"#.to_string()));

    rt.poll_commands();
    rt.poll_commands();
    rt.poll_commands();

    assert_eq!(rt.remote.offsets, [1, 1, 1]);
    assert_eq!(rt.engine.last_seen_id(), 0);
    assert!(rt.remote.sent.is_empty());
    assert!(rt.hw.calls.is_empty());
}

// ── Dashboard button ──────────────────────────────────────────

#[test]
fn dashboard_button_forces_a_measurement() {
    let mut rt = runtime();
    rt.remote.button.push_back(Ok(true));

    rt.on_schedule_fired(COMMAND_POLL, 1_000);

    assert_eq!(rt.remote.button_reads, 1);
    assert_eq!(rt.app.state().history.len(), 1);
    assert_eq!(rt.remote.published.len(), 1);
    assert_eq!(rt.remote.sent.len(), 1, "forced cycle always summarises");

    // Released on the next pass: nothing new runs.
    rt.poll_commands();
    assert_eq!(rt.remote.button_reads, 2);
    assert_eq!(rt.app.state().history.len(), 1);
}

#[test]
fn button_and_chat_request_in_one_pass_measure_once() {
    let mut rt = runtime();
    rt.remote.queue_texts(4, &["/medir"]);
    rt.remote.button.push_back(Ok(true));

    rt.poll_commands();

    assert_eq!(rt.remote.button_reads, 1);
    assert_eq!(rt.app.state().history.len(), 1);
}

#[test]
fn unreachable_dashboard_does_not_block_chat_commands() {
    let mut rt = runtime();
    rt.remote.queue_texts(1, &["/bombaligar"]);
    rt.remote.button.push_back(Err(TransportError::Timeout));
    rt.remote.button.push_back(Err(TransportError::NotConfigured));

    rt.poll_commands();
    rt.poll_commands();

    assert!(rt.hw.pump_on());
    assert!(rt.app.state().history.is_empty());
    assert_eq!(rt.remote.button_reads, 2);
}

// ── Scheduler ─────────────────────────────────────────────────

#[test]
fn scheduler_drives_sampling_and_polling() {
    let config = SystemConfig::default();
    let mut sched = Scheduler::with_defaults(
        config.measurement_interval_ms,
        config.command_poll_interval_ms,
        0,
    );
    let mut rt = runtime();

    sched.tick(500, &mut rt);
    assert!(rt.remote.offsets.is_empty());

    sched.tick(1_000, &mut rt);
    assert_eq!(rt.remote.offsets.len(), 1);
    assert!(rt.app.state().history.is_empty(), "no sample before one interval");

    rt.clock.now.set(config.measurement_interval_ms);
    sched.tick(config.measurement_interval_ms, &mut rt);
    assert_eq!(rt.app.state().history.len(), 1);
    assert_eq!(rt.remote.sent.len(), 1);
}

#[test]
fn labels_route_to_their_tasks() {
    let mut rt = runtime();

    rt.on_schedule_fired("nonexistent", 0);
    assert!(rt.hw.calls.is_empty());
    assert!(rt.remote.offsets.is_empty());

    rt.on_schedule_fired(SAMPLING, 0);
    assert_eq!(rt.app.state().history.len(), 1);
    assert!(rt.remote.offsets.is_empty());
}

// ── Web surface ───────────────────────────────────────────────

#[test]
fn web_changes_reach_service_through_inbox() {
    let _guard = lock_shared_state();
    let mut rt = runtime();
    inbox::drain_commands(|_| {});

    for cmd in parse_threshold_form("temp=31&umid=40") {
        assert!(inbox::push_command(cmd));
    }
    assert!(inbox::push_command(AppCommand::TogglePump));

    rt.service_inbox();

    let state = rt.app.state();
    assert_eq!(state.thresholds.temperature_high_c, 31.0);
    assert_eq!(state.thresholds.soil_low_pct, 40.0);
    assert!(state.pump_on);
    assert!(rt.hw.pump_on());
    // Local changes are echoed on the chat channel like remote ones.
    assert_eq!(rt.remote.sent.len(), 3);

    let status = inbox::read_status();
    assert!(status.pump_on);
    assert_eq!(status.thresholds.soil_low_pct, 40.0);

    let mut leftover = 0;
    inbox::drain_commands(|_| leftover += 1);
    assert_eq!(leftover, 0);
}
