//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the configuration and the [`DeviceState`] (thresholds,
//! pump, history, last snapshot, notification gate).  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ Notifier / Telemetry / Exporter
//!                 │       AppService        │
//! ActuatorPort ◀──│ Sampling · Commands     │ ──▶ EventSink
//!                 └────────────────────────┘
//! ```
//!
//! ## Sampling cycle
//!
//! `Idle → Reading → Validating → {Recording, Rejected} → Notifying → Idle`
//!
//! A rejected cycle touches nothing but the fault indicator and the event
//! sink.  A recorded cycle always updates the history, the last snapshot
//! and the telemetry channel, always attempts the export, and sends the chat
//! summary only when forced or when the notification gate is open.

use log::{debug, info, warn};

use crate::alerts::{self, AlertSet, AlertThresholds};
use crate::config::SystemConfig;
use crate::error::{CommandError, Error, SensorError};
use crate::escape::EscapingMode;
use crate::history::MeasurementHistory;
use crate::measurement::{Measurement, PROBE_DISCONNECTED_C, RawReadings};
use crate::report::{self, StatusReport};

use super::commands::{AppCommand, ThresholdTarget};
use super::events::{AppEvent, Channel};
use super::ports::{ActuatorPort, Clock, EventSink, Exporter, Notifier, SensorPort, Telemetry};

// ───────────────────────────────────────────────────────────────
// Device state
// ───────────────────────────────────────────────────────────────

/// Everything the device mutates at runtime.  Lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    pub thresholds: AlertThresholds,
    pub pump_on: bool,
    pub history: MeasurementHistory,
    pub last_measurement: Option<Measurement>,
    /// Instant of the last summary send attempt; `None` until the first.
    pub last_notified_ms: Option<u64>,
}

/// Terminal state of one sampling cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Recorded { alerts: AlertSet, notified: bool },
    Rejected(SensorError),
}

/// Reject readings that cannot form a [`Measurement`].
pub fn validate(raw: &RawReadings) -> Result<(), SensorError> {
    if raw.internal_c == PROBE_DISCONNECTED_C {
        return Err(SensorError::InternalProbeDisconnected);
    }
    if raw.external_c.is_nan() {
        return Err(SensorError::ExternalTemperatureInvalid);
    }
    if raw.external_rh.is_nan() {
        return Err(SensorError::ExternalHumidityInvalid);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    state: DeviceState,
}

impl AppService {
    /// Construct the service from configuration.  Thresholds start from
    /// `config.default_thresholds`; the pump starts off.
    pub fn new(config: SystemConfig) -> Self {
        let state = DeviceState {
            thresholds: config.default_thresholds,
            ..DeviceState::default()
        };
        Self { config, state }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the actuators to the initial state and announce startup.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.set_pump(self.state.pump_on);
        hw.set_busy(false);
        sink.emit(&AppEvent::Started(self.state.thresholds));
        info!("AppService started, thresholds {:?}", self.state.thresholds);
    }

    // ── Sampling cycle ────────────────────────────────────────

    /// Run one sampling cycle to completion.
    ///
    /// `force` bypasses the notification gate (used by the on-demand
    /// measurement command).  `started_ms` is the instant the cycle was
    /// triggered; the gate is checked and stamped with it rather than with
    /// the time after the sensor and network I/O.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], and `remote` all three outbound channels; this
    /// avoids double mutable borrows while keeping the port boundary
    /// explicit.
    pub fn run_sampling(
        &mut self,
        force: bool,
        started_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        remote: &mut (impl Notifier + Telemetry + Exporter),
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        hw.set_busy(true);

        // Reading
        let raw = hw.read_all();

        // Validating
        if let Err(fault) = validate(&raw) {
            hw.set_busy(false);
            hw.indicate_fault();
            warn!("Sampling: cycle rejected: {fault}");
            sink.emit(&AppEvent::SensorFault(fault));
            return CycleOutcome::Rejected(fault);
        }

        // Recording
        let measurement = self.build_measurement(&raw, clock);
        self.state.history.append(measurement.clone());
        let alerts = alerts::evaluate(&measurement, &self.state.thresholds);
        self.state.last_measurement = Some(measurement.clone());

        // Notifying
        if let Err(e) = remote.publish(&measurement) {
            warn!("Sampling: telemetry push failed: {e}");
            sink.emit(&AppEvent::DeliveryFailed {
                channel: Channel::Telemetry,
                error: e.into(),
            });
        }

        let notified = force || self.notification_due(started_ms);
        if notified {
            let text = report::summary_message(&measurement, &alerts);
            self.reply(remote, &text, EscapingMode::EscapedMarkup, sink);
            // A failed attempt still closes the gate.
            self.state.last_notified_ms = Some(started_ms);
        } else {
            debug!("Sampling: summary suppressed by rate gate");
        }

        if let Err(e) = remote.export(&report::export_record(&measurement)) {
            warn!("Sampling: export failed: {e}");
            sink.emit(&AppEvent::DeliveryFailed {
                channel: Channel::Export,
                error: e.into(),
            });
        }

        hw.set_busy(false);
        sink.emit(&AppEvent::MeasurementRecorded {
            measurement,
            alerts: alerts.clone(),
            notified,
        });
        CycleOutcome::Recorded { alerts, notified }
    }

    /// Whether a non-forced summary may be sent at `now_ms`.
    pub fn notification_due(&self, now_ms: u64) -> bool {
        match self.state.last_notified_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.config.measurement_interval_ms,
        }
    }

    fn build_measurement(&self, raw: &RawReadings, clock: &impl Clock) -> Measurement {
        let soil_pct = raw
            .soil_raw
            .iter()
            .zip(self.config.soil_probes.iter())
            .map(|(&count, cal)| cal.percentage(count))
            .collect();
        Measurement {
            timestamp: clock.timestamp(),
            internal_c: raw.internal_c,
            external_c: raw.external_c,
            external_rh: raw.external_rh,
            soil_pct,
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  Returns the cycle outcome when the
    /// command ran a sampling cycle.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl SensorPort + ActuatorPort),
        remote: &mut (impl Notifier + Telemetry + Exporter),
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Option<CycleOutcome> {
        match cmd {
            AppCommand::MeasureNow => {
                let now = clock.now_ms();
                return Some(self.run_sampling(true, now, hw, remote, clock, sink));
            }
            AppCommand::Greeting => {
                self.reply(remote, report::GREETING, EscapingMode::EscapedMarkup, sink);
            }
            AppCommand::Help => {
                self.reply(remote, report::HELP, EscapingMode::EscapedMarkup, sink);
            }
            AppCommand::SetPump(on) => self.set_pump(on, hw, remote, sink),
            AppCommand::TogglePump => self.set_pump(!self.state.pump_on, hw, remote, sink),
            AppCommand::SendChart => {
                let url = report::chart_url(self.state.history.to_series(), &self.config.chart_title);
                info!("Remote: chart with {} samples", self.state.history.len());
                self.reply(remote, &report::chart_message(&url), EscapingMode::UrlEncoded, sink);
            }
            AppCommand::SetThreshold { target, value } => {
                self.set_threshold(target, value, remote, sink);
            }
            AppCommand::ArgumentRejected { target, error } => {
                self.reject(target, error, remote, sink);
            }
        }
        None
    }

    fn set_pump(
        &mut self,
        on: bool,
        hw: &mut impl ActuatorPort,
        remote: &mut impl Notifier,
        sink: &mut impl EventSink,
    ) {
        hw.set_pump(on);
        self.state.pump_on = on;
        info!("Pump: {}", if on { "ON" } else { "OFF" });
        sink.emit(&AppEvent::PumpChanged(on));
        self.reply(remote, report::pump_changed(on), EscapingMode::EscapedMarkup, sink);
    }

    fn set_threshold(
        &mut self,
        target: ThresholdTarget,
        value: f32,
        remote: &mut impl Notifier,
        sink: &mut impl EventSink,
    ) {
        let thresholds = &mut self.state.thresholds;
        let applied = match target {
            ThresholdTarget::Temperature => thresholds
                .set_temperature_high(value)
                .map(|()| report::temperature_threshold_set(value)),
            ThresholdTarget::Soil => thresholds
                .set_soil_low(value)
                .map(|()| report::soil_threshold_set(value)),
        };
        match applied {
            Ok(text) => {
                info!("Thresholds: {:?}", self.state.thresholds);
                sink.emit(&AppEvent::ThresholdsChanged(self.state.thresholds));
                self.reply(remote, &text, EscapingMode::EscapedMarkup, sink);
            }
            Err(error) => self.reject(target, error, remote, sink),
        }
    }

    fn reject(
        &self,
        target: ThresholdTarget,
        error: CommandError,
        remote: &mut impl Notifier,
        sink: &mut impl EventSink,
    ) {
        warn!("Remote: {target:?} threshold rejected: {error}");
        sink.emit(&AppEvent::CommandRejected(error));
        let usage = match target {
            ThresholdTarget::Temperature => report::TEMPERATURE_USAGE,
            ThresholdTarget::Soil => report::SOIL_USAGE,
        };
        self.reply(remote, usage, EscapingMode::EscapedMarkup, sink);
    }

    /// Best-effort chat send: failures are logged and reported, never fatal.
    fn reply(
        &self,
        remote: &mut impl Notifier,
        text: &str,
        mode: EscapingMode,
        sink: &mut impl EventSink,
    ) {
        if let Err(e) = remote.send(text, mode) {
            warn!("Chat: send failed: {e}");
            sink.emit(&AppEvent::DeliveryFailed {
                channel: Channel::Chat,
                error: Error::from(e),
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot for the local status surface.
    pub fn status(&self) -> StatusReport {
        StatusReport {
            measurement: self.state.last_measurement.clone(),
            pump_on: self.state.pump_on,
            thresholds: self.state.thresholds,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
