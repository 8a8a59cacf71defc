//! Composite of the outbound network channels.
//!
//! [`AppService`](crate::app::service::AppService) takes one value that is
//! at once [`Notifier`], [`Telemetry`] and [`Exporter`]; this adapter
//! bundles the three concrete channels and also hands the bot's update
//! stream to the remote command engine and the dashboard button to the
//! loop.

use serde_json::Value;

use crate::app::ports::{Exporter, MeasureTrigger, Notifier, Telemetry};
use crate::error::{ExportError, TransportError};
use crate::escape::EscapingMode;
use crate::measurement::Measurement;
use crate::remote::transport::UpdateTransport;

use super::blynk::BlynkTelemetry;
use super::http::HttpClient;
use super::sheets::SheetsExporter;
use super::telegram::TelegramBot;

pub struct RemoteChannels<C: HttpClient> {
    pub bot: TelegramBot<C>,
    pub dashboard: BlynkTelemetry<C>,
    pub sheet: SheetsExporter<C>,
}

impl<C: HttpClient + Clone> RemoteChannels<C> {
    /// Build every channel on clones of one client.  `long_poll_s` is the
    /// idle hold time of each update poll.
    pub fn new(http: C, secrets: &crate::config::Secrets, long_poll_s: u32) -> Self {
        Self {
            bot: TelegramBot::new(http.clone(), secrets.bot_token, secrets.chat_id)
                .with_long_poll(long_poll_s),
            dashboard: BlynkTelemetry::new(http.clone(), secrets.blynk_token),
            sheet: SheetsExporter::new(http, secrets.sheets_url),
        }
    }
}

impl<C: HttpClient> Notifier for RemoteChannels<C> {
    fn send(&mut self, text: &str, mode: EscapingMode) -> Result<(), TransportError> {
        self.bot.send(text, mode)
    }
}

impl<C: HttpClient> Telemetry for RemoteChannels<C> {
    fn publish(&mut self, m: &Measurement) -> Result<(), TransportError> {
        self.dashboard.publish(m)
    }
}

impl<C: HttpClient> MeasureTrigger for RemoteChannels<C> {
    fn take_measure_request(&mut self) -> Result<bool, TransportError> {
        self.dashboard.take_measure_request()
    }
}

impl<C: HttpClient> Exporter for RemoteChannels<C> {
    fn export(&mut self, record: &Value) -> Result<(), ExportError> {
        self.sheet.export(record)
    }
}

impl<C: HttpClient> UpdateTransport for RemoteChannels<C> {
    fn fetch_updates(&mut self, offset: i64) -> Result<String, TransportError> {
        self.bot.fetch_updates(offset)
    }

    fn register_commands(&mut self, body: &str) -> Result<(), TransportError> {
        self.bot.register_commands(body)
    }
}
