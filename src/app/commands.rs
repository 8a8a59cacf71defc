//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the chat bot,
//! the local web surface) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.  Every command except [`AppCommand::MeasureNow`]
//! answers with exactly one chat reply; `MeasureNow` answers through the
//! forced summary notification.

use crate::error::CommandError;

/// Which alert threshold a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdTarget {
    /// Internal temperature high limit (°C).
    Temperature,
    /// Soil moisture low limit (%).
    Soil,
}

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Run a sampling cycle now and always notify.
    MeasureNow,

    /// Reply with the greeting text.
    Greeting,

    /// Reply with the command list.
    Help,

    /// Switch the pump relay on or off.
    SetPump(bool),

    /// Invert the pump relay state.
    TogglePump,

    /// Reply with a link to the trend chart.
    SendChart,

    /// Replace a threshold; validated by the service.
    SetThreshold { target: ThresholdTarget, value: f32 },

    /// A threshold command whose argument could not be parsed.
    ArgumentRejected {
        target: ThresholdTarget,
        error: CommandError,
    },
}
