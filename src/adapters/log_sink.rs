//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the log
//! facade (the ESP-IDF logger on the device, which goes to UART).  One
//! line per event, tagged so the serial console can be grepped.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(t) => {
                info!(
                    "START | temp_high={:.1}\u{00b0}C soil_low={:.1}%",
                    t.temperature_high_c, t.soil_low_pct
                );
            }
            AppEvent::MeasurementRecorded {
                measurement: m,
                alerts,
                notified,
            } => {
                info!(
                    "MEAS  | {} | int={:.1}\u{00b0}C ext={:.1}\u{00b0}C/{:.0}% | soil={:?} | \
                     alerts={} notified={}",
                    m.timestamp,
                    m.internal_c,
                    m.external_c,
                    m.external_rh,
                    m.soil_pct.as_slice(),
                    alerts.len(),
                    notified,
                );
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | cycle rejected: {}", e);
            }
            AppEvent::PumpChanged(on) => {
                info!("PUMP  | {}", if *on { "ON" } else { "OFF" });
            }
            AppEvent::ThresholdsChanged(t) => {
                info!(
                    "THRES | temp_high={:.1}\u{00b0}C soil_low={:.1}%",
                    t.temperature_high_c, t.soil_low_pct
                );
            }
            AppEvent::CommandRejected(e) => {
                warn!("CMD   | rejected: {}", e);
            }
            AppEvent::DeliveryFailed { channel, error } => {
                warn!("SEND  | {:?} failed: {}", channel, error);
            }
        }
    }
}
