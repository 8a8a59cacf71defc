//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log today).

use crate::alerts::{AlertSet, AlertThresholds};
use crate::error::{CommandError, Error, SensorError};
use crate::measurement::Measurement;

/// Outbound channel a delivery failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Chat,
    Telemetry,
    Export,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial thresholds).
    Started(AlertThresholds),

    /// A sampling cycle was rejected; nothing was recorded or sent.
    SensorFault(SensorError),

    /// A sampling cycle completed.
    MeasurementRecorded {
        measurement: Measurement,
        alerts: AlertSet,
        notified: bool,
    },

    /// The pump relay changed state.
    PumpChanged(bool),

    /// A threshold was accepted.
    ThresholdsChanged(AlertThresholds),

    /// A threshold command was refused; configuration unchanged.
    CommandRejected(CommandError),

    /// A best-effort outbound call failed.
    DeliveryFailed { channel: Channel, error: Error },
}
