//! Integration tests for the sampling cycle and command handling.
//!
//! These run on the host (x86_64) and drive [`AppService`] through the
//! recording mocks: sensor readings in, relay calls and chat messages out.

use std::collections::VecDeque;

use growmonitor::alerts::AlertKind;
use growmonitor::app::commands::{AppCommand, ThresholdTarget};
use growmonitor::app::events::{AppEvent, Channel};
use growmonitor::app::ports::{Clock, SchedulerDelegate};
use growmonitor::app::service::{AppService, CycleOutcome};
use growmonitor::config::SystemConfig;
use growmonitor::error::{CommandError, ExportError, SensorError};
use growmonitor::escape::EscapingMode;
use growmonitor::report;
use growmonitor::scheduler::{SAMPLING, Scheduler};

use crate::mock_hw::{
    ActuatorCall, MockClock, MockHardware, MockRemote, RecordingSink, nominal, readings,
};

struct Rig {
    app: AppService,
    hw: MockHardware,
    remote: MockRemote,
    clock: MockClock,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let mut rig = Self {
            app: AppService::new(SystemConfig::default()),
            hw: MockHardware::new(),
            remote: MockRemote::new(),
            clock: MockClock::new(),
            sink: RecordingSink::new(),
        };
        rig.app.start(&mut rig.hw, &mut rig.sink);
        rig.hw.calls.clear();
        rig.sink.events.clear();
        rig
    }

    fn sample(&mut self, force: bool) -> CycleOutcome {
        let now = self.clock.now_ms();
        self.app.run_sampling(
            force,
            now,
            &mut self.hw,
            &mut self.remote,
            &self.clock,
            &mut self.sink,
        )
    }

    fn command(&mut self, cmd: AppCommand) -> Option<CycleOutcome> {
        self.app
            .handle_command(cmd, &mut self.hw, &mut self.remote, &self.clock, &mut self.sink)
    }
}

fn interval_ms() -> u64 {
    SystemConfig::default().measurement_interval_ms
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_releases_relay_and_announces_thresholds() {
    let mut app = AppService::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    app.start(&mut hw, &mut sink);

    assert_eq!(hw.calls, [ActuatorCall::SetPump(false), ActuatorCall::SetBusy(false)]);
    assert_eq!(sink.events, [AppEvent::Started(app.state().thresholds)]);
}

// ── Sampling cycle ────────────────────────────────────────────

#[test]
fn nominal_cycle_records_and_reaches_every_channel() {
    let mut rig = Rig::new();

    let outcome = rig.sample(false);

    assert_eq!(
        outcome,
        CycleOutcome::Recorded {
            alerts: Default::default(),
            notified: true
        }
    );
    assert_eq!(rig.app.state().history.len(), 1);
    assert_eq!(rig.remote.published.len(), 1);
    assert_eq!(rig.remote.exported.len(), 1);
    assert_eq!(rig.remote.sent.len(), 1);
    assert_eq!(rig.remote.sent[0].1, EscapingMode::EscapedMarkup);
    assert!(rig.remote.sent[0].0.contains("Internal temperature: 24.0°C"));

    let m = rig.app.state().last_measurement.clone().unwrap();
    assert_eq!(m.timestamp.as_str(), "12:00:00");
    assert_eq!(m.soil_pct.len(), 2);
    assert!(m.soil_pct.iter().all(|p| (60.0..80.0).contains(p)));

    assert_eq!(
        rig.hw.calls,
        [ActuatorCall::SetBusy(true), ActuatorCall::SetBusy(false)]
    );
}

#[test]
fn gate_suppresses_second_summary_within_interval() {
    let mut rig = Rig::new();

    rig.sample(false);
    rig.clock.advance(interval_ms() / 2);
    let second = rig.sample(false);

    assert!(matches!(second, CycleOutcome::Recorded { notified: false, .. }));
    assert_eq!(rig.remote.sent.len(), 1, "one summary per interval");
    // Telemetry, export and history are never gated.
    assert_eq!(rig.remote.published.len(), 2);
    assert_eq!(rig.remote.exported.len(), 2);
    assert_eq!(rig.app.state().history.len(), 2);

    rig.clock.advance(interval_ms() / 2);
    rig.sample(false);
    assert_eq!(rig.remote.sent.len(), 2, "gate reopens after a full interval");
}

/// Each sampling tick advances the clock by that cycle's I/O latency
/// before the service runs, as a slow sensor read or HTTP push would.
struct SlowCycles<'a> {
    rig: &'a mut Rig,
    latency_ms: VecDeque<u64>,
    notified: Vec<bool>,
}

impl SchedulerDelegate for SlowCycles<'_> {
    fn on_schedule_fired(&mut self, label: &str, now_ms: u64) {
        if label != SAMPLING {
            return;
        }
        let latency = self.latency_ms.pop_front().unwrap_or(0);
        self.rig.clock.now.set(now_ms + latency);
        let rig = &mut *self.rig;
        let outcome = rig.app.run_sampling(
            false,
            now_ms,
            &mut rig.hw,
            &mut rig.remote,
            &rig.clock,
            &mut rig.sink,
        );
        if let CycleOutcome::Recorded { notified, .. } = outcome {
            self.notified.push(notified);
        }
    }
}

#[test]
fn every_scheduled_cycle_notifies_despite_uneven_latency() {
    let interval = interval_ms();
    let mut rig = Rig::new();
    let mut sched = Scheduler::with_defaults(interval, 1_000, 0);
    let mut cycles = SlowCycles {
        rig: &mut rig,
        latency_ms: VecDeque::from([2_000, 500, 2_000, 500]),
        notified: Vec::new(),
    };

    for k in 1..=4 {
        sched.tick(k * interval, &mut cycles);
    }

    assert_eq!(cycles.notified, [true, true, true, true]);
    assert_eq!(rig.remote.sent.len(), 4);
    assert_eq!(rig.app.state().last_notified_ms, Some(4 * interval));
    assert!(rig.clock.now_ms() > 4 * interval);
}

#[test]
fn forced_cycle_always_notifies_and_restarts_gate() {
    let mut rig = Rig::new();

    rig.sample(false);
    rig.clock.advance(1_000);
    let outcome = rig.command(AppCommand::MeasureNow);

    assert!(matches!(
        outcome,
        Some(CycleOutcome::Recorded { notified: true, .. })
    ));
    assert_eq!(rig.remote.sent.len(), 2);
    assert_eq!(rig.app.state().last_notified_ms, Some(1_000));
    assert!(!rig.app.notification_due(interval_ms()));
    assert!(rig.app.notification_due(1_000 + interval_ms()));
}

#[test]
fn rejected_cycle_touches_nothing_remote() {
    let mut rig = Rig::new();
    rig.sample(false);
    let before = rig.app.state().history.len();
    let published = rig.remote.published.len();
    let sent = rig.remote.sent.len();

    rig.hw.queue(readings(-127.0, 22.0, 55.0));
    let outcome = rig.command(AppCommand::MeasureNow);

    assert_eq!(
        outcome,
        Some(CycleOutcome::Rejected(SensorError::InternalProbeDisconnected))
    );
    assert_eq!(rig.app.state().history.len(), before);
    assert_eq!(rig.remote.published.len(), published);
    assert_eq!(rig.remote.sent.len(), sent);
    assert_eq!(rig.hw.faults(), 1);
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::SensorFault(SensorError::InternalProbeDisconnected)));
}

#[test]
fn invalid_external_reading_is_rejected() {
    let mut rig = Rig::new();

    rig.hw.queue(readings(24.0, 22.0, f32::NAN));
    assert_eq!(
        rig.sample(false),
        CycleOutcome::Rejected(SensorError::ExternalHumidityInvalid)
    );
    rig.hw.queue(readings(24.0, f32::NAN, 55.0));
    assert_eq!(
        rig.sample(false),
        CycleOutcome::Rejected(SensorError::ExternalTemperatureInvalid)
    );

    assert!(rig.app.state().history.is_empty());
    assert!(rig.app.state().last_measurement.is_none());
    assert!(rig.remote.is_silent());
    assert_eq!(rig.hw.calls.last(), Some(&ActuatorCall::IndicateFault));
}

#[test]
fn hot_canopy_raises_temperature_alert() {
    let mut rig = Rig::new();

    rig.hw.queue(readings(30.0, 22.0, 55.0));
    let outcome = rig.sample(false);

    let CycleOutcome::Recorded { alerts, .. } = outcome else {
        panic!("cycle should be recorded");
    };
    assert_eq!(alerts.as_slice(), &[AlertKind::HighInternalTemperature]);
    assert!(rig.remote.sent[0].0.contains("ALERT: high temperature (30.0°C)"));
}

#[test]
fn failed_summary_still_closes_gate() {
    let mut rig = Rig::new();
    rig.remote.fail_send = true;

    rig.sample(false);

    assert_eq!(rig.app.state().last_notified_ms, Some(0));
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::DeliveryFailed {
            channel: Channel::Chat,
            ..
        }
    )));
    assert_eq!(rig.app.state().history.len(), 1);
}

#[test]
fn export_failure_does_not_abort_cycle() {
    let mut rig = Rig::new();
    rig.remote.export_error = Some(ExportError::Offline);

    let outcome = rig.sample(false);

    assert!(matches!(outcome, CycleOutcome::Recorded { notified: true, .. }));
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::DeliveryFailed {
            channel: Channel::Export,
            ..
        }
    )));
    assert!(matches!(
        rig.sink.events.last(),
        Some(AppEvent::MeasurementRecorded { .. })
    ));
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn soil_threshold_out_of_range_is_refused() {
    let mut rig = Rig::new();
    let before = rig.app.state().thresholds;

    rig.command(AppCommand::SetThreshold {
        target: ThresholdTarget::Soil,
        value: 120.0,
    });

    assert_eq!(rig.app.state().thresholds, before);
    assert_eq!(rig.remote.texts(), [report::SOIL_USAGE]);
    assert_eq!(
        rig.sink.events,
        [AppEvent::CommandRejected(CommandError::SoilOutOfRange)]
    );

    rig.command(AppCommand::SetThreshold {
        target: ThresholdTarget::Soil,
        value: 40.0,
    });

    assert_eq!(rig.app.state().thresholds.soil_low_pct, 40.0);
    assert_eq!(
        rig.remote.texts()[1],
        "New soil moisture alert threshold: 40.0%"
    );
}

#[test]
fn unparseable_argument_replies_with_usage() {
    let mut rig = Rig::new();
    let before = rig.app.state().thresholds;

    rig.command(AppCommand::ArgumentRejected {
        target: ThresholdTarget::Temperature,
        error: CommandError::NotANumber,
    });
    rig.command(AppCommand::SetThreshold {
        target: ThresholdTarget::Temperature,
        value: 0.0,
    });

    assert_eq!(rig.app.state().thresholds, before);
    assert_eq!(
        rig.remote.texts(),
        [report::TEMPERATURE_USAGE, report::TEMPERATURE_USAGE]
    );
}

#[test]
fn new_threshold_applies_to_next_cycle() {
    let mut rig = Rig::new();

    rig.command(AppCommand::SetThreshold {
        target: ThresholdTarget::Temperature,
        value: 20.0,
    });
    let CycleOutcome::Recorded { alerts, .. } = rig.sample(false) else {
        panic!("cycle should be recorded");
    };

    assert_eq!(alerts.as_slice(), &[AlertKind::HighInternalTemperature]);
}

#[test]
fn pump_commands_drive_relay_and_reply_once() {
    let mut rig = Rig::new();

    rig.command(AppCommand::SetPump(true));
    assert!(rig.hw.pump_on());
    assert!(rig.app.state().pump_on);

    rig.command(AppCommand::TogglePump);
    assert!(!rig.hw.pump_on());
    assert!(!rig.app.status().pump_on);

    assert_eq!(
        rig.remote.texts(),
        [report::pump_changed(true), report::pump_changed(false)]
    );
    assert_eq!(
        rig.sink.events,
        [AppEvent::PumpChanged(true), AppEvent::PumpChanged(false)]
    );
}

#[test]
fn chart_reply_is_url_encoded() {
    let mut rig = Rig::new();
    rig.sample(false);
    rig.clock.advance(1_000);
    rig.sample(false);
    rig.remote.sent.clear();

    rig.command(AppCommand::SendChart);

    assert_eq!(rig.remote.sent.len(), 1);
    let (text, mode) = &rig.remote.sent[0];
    assert_eq!(*mode, EscapingMode::UrlEncoded);
    assert!(text.contains(report::CHART_BASE_URL));
}

#[test]
fn greeting_and_help_are_fixed_texts() {
    let mut rig = Rig::new();

    rig.command(AppCommand::Greeting);
    rig.command(AppCommand::Help);

    assert_eq!(rig.remote.texts(), [report::GREETING, report::HELP]);
    assert!(rig.app.state().history.is_empty());
}

#[test]
fn status_reflects_last_cycle() {
    let mut rig = Rig::new();
    rig.hw.queue(nominal());
    rig.sample(false);

    let status = rig.app.status();
    assert_eq!(status.measurement, rig.app.state().last_measurement);
    assert_eq!(status.thresholds, rig.app.state().thresholds);
}
