//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, remote channels, clock, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware or
//! the network directly.
//!
//! Every outbound call is best-effort: the domain logs a failure and moves
//! on.  Nothing here is retried.

use serde_json::Value;

use crate::error::{ExportError, TransportError};
use crate::escape::EscapingMode;
use crate::measurement::{Measurement, RawReadings, Timestamp};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Read every probe once.  Invalid values are passed through.
    fn read_all(&mut self) -> RawReadings;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Energise (`true`) or release the pump relay.
    fn set_pump(&mut self, on: bool);

    /// Light the busy indicator while a sampling cycle runs.
    fn set_busy(&mut self, busy: bool);

    /// Flag a sensor fault on the local indicator.
    fn indicate_fault(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Remote channels (driven adapters: domain → network)
// ───────────────────────────────────────────────────────────────

/// Chat channel: summaries, command replies, chart links.
pub trait Notifier {
    /// Send `text` after applying `mode`'s escaping transform.
    fn send(&mut self, text: &str, mode: EscapingMode) -> Result<(), TransportError>;
}

/// Live dashboard channel.
pub trait Telemetry {
    /// Push the latest values.  Fire-and-forget from the domain's view.
    fn publish(&mut self, m: &Measurement) -> Result<(), TransportError>;
}

/// Dashboard push button asking for an on-demand measurement.
pub trait MeasureTrigger {
    /// Whether the button was pressed since the last call.  A pending
    /// press is consumed: the button is reset before this returns `true`.
    fn take_measure_request(&mut self) -> Result<bool, TransportError>;
}

/// Spreadsheet exporter: one flat record per completed cycle.
pub trait Exporter {
    fn export(&mut self, record: &Value) -> Result<(), ExportError>;
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds plus the wall-clock label stamped on samples.
pub trait Clock {
    fn now_ms(&self) -> u64;

    /// Local time of day, `hh:mm:ss`.
    fn timestamp(&self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the loop body)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a schedule fires.
///
/// The [`Scheduler`](crate::scheduler::Scheduler) knows only labels and
/// periods; the main loop implements this to run a sampling cycle or a
/// command poll.
pub trait SchedulerDelegate {
    /// Called when the schedule labelled `label` fires.
    fn on_schedule_fired(&mut self, label: &str, now_ms: u64);
}
