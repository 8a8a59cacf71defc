//! Spreadsheet exporter: POSTs one JSON record per completed cycle to a
//! web-app endpoint that appends it as a row.
//!
//! The endpoint answers a successful append with a redirect to its result
//! page, so any status below 400 counts as accepted.

use log::debug;
use serde_json::Value;

use crate::app::ports::Exporter;
use crate::error::{ExportError, TransportError};

use super::http::HttpClient;
use super::wifi;

pub struct SheetsExporter<C: HttpClient> {
    http: C,
    url: &'static str,
}

impl<C: HttpClient> SheetsExporter<C> {
    pub fn new(http: C, url: &'static str) -> Self {
        Self { http, url }
    }
}

impl<C: HttpClient> Exporter for SheetsExporter<C> {
    fn export(&mut self, record: &Value) -> Result<(), ExportError> {
        if self.url.is_empty() {
            return Err(ExportError::Rejected(TransportError::NotConfigured));
        }
        if !wifi::link_up() {
            return Err(ExportError::Offline);
        }
        let reply = self
            .http
            .post_json(self.url, &record.to_string())
            .map_err(ExportError::Rejected)?;
        debug!("Sheets: append -> {}", reply.status);
        if reply.status >= 400 {
            return Err(ExportError::Rejected(TransportError::Status(reply.status)));
        }
        Ok(())
    }
}
