//! Local status web surface.
//!
//! | Route               | Effect                                         |
//! |---------------------|------------------------------------------------|
//! | `GET /`             | status page with the threshold form            |
//! | `GET /dados`        | last [`StatusReport`] as JSON                  |
//! | `GET /salvar?temp=&umid=` | queue the valid threshold fields         |
//! | `GET /bomba`        | queue a pump toggle                            |
//!
//! Handlers run on the HTTP server's task.  They read the snapshot the
//! loop published and hand changes to the loop through the
//! [`inbox`](crate::inbox); they never touch the service directly.

use heapless::Vec;

use crate::alerts::AlertThresholds;
use crate::app::commands::{AppCommand, ThresholdTarget};

/// Page sent after a write; bounces the browser back to `/`.
pub const REDIRECT_HOME: &str =
    "<meta http-equiv='refresh' content='1;url=/' /><p>Saved. Returning...</p>";

/// Decode one `application/x-www-form-urlencoded` value.
fn decode_component(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = std::vec::Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let hex = raw.get(i + 1..i + 3)?;
                // from_str_radix alone would take a sign: `%+1`.
                if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return None;
                }
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 2;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8(out).ok()
}

/// Value of `key` in a query string, if present and decodable.
pub fn query_value(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| decode_component(v))
}

/// Threshold commands for the `/salvar` form.
///
/// Each field is checked with the same predicate as the chat command;
/// absent, unparseable or out-of-range fields are dropped silently.
pub fn parse_threshold_form(query: &str) -> Vec<AppCommand, 2> {
    let fields: [(&str, ThresholdTarget, fn(f32) -> bool); 2] = [
        ("temp", ThresholdTarget::Temperature, |v| {
            AlertThresholds::check_temperature_high(v).is_ok()
        }),
        ("umid", ThresholdTarget::Soil, |v| AlertThresholds::check_soil_low(v).is_ok()),
    ];

    let mut out = Vec::new();
    for (key, target, valid) in fields {
        let Some(value) = query_value(query, key).and_then(|s| s.trim().parse::<f32>().ok()) else {
            continue;
        };
        if value.is_finite() && valid(value) {
            // Two fields into a two-slot vector.
            let _ = out.push(AppCommand::SetThreshold { target, value });
        }
    }
    out
}

#[cfg(target_os = "espidf")]
pub use device::start;

#[cfg(target_os = "espidf")]
mod device {
    use anyhow::Context;
    use embedded_svc::http::Method;
    use embedded_svc::io::Write;
    use esp_idf_svc::http::server::{Configuration, EspHttpConnection, EspHttpServer, Request};
    use log::info;

    use super::{REDIRECT_HOME, parse_threshold_form};
    use crate::app::commands::AppCommand;
    use crate::inbox;
    use crate::report;

    fn respond(req: Request<&mut EspHttpConnection<'_>>, content_type: &str, body: &str) -> anyhow::Result<()> {
        req.into_response(200, Some("OK"), &[("Content-Type", content_type)])?
            .write_all(body.as_bytes())?;
        Ok(())
    }

    /// Register every route and start serving on port 80.
    pub fn start() -> anyhow::Result<EspHttpServer<'static>> {
        let mut server = EspHttpServer::new(&Configuration::default()).context("http server")?;

        server.fn_handler::<anyhow::Error, _>("/", Method::Get, |req| {
            let page = report::status_page(&inbox::read_status());
            respond(req, "text/html; charset=utf-8", &page)
        })?;

        server.fn_handler::<anyhow::Error, _>("/dados", Method::Get, |req| {
            let json = serde_json::to_string(&inbox::read_status())?;
            respond(req, "application/json; charset=utf-8", &json)
        })?;

        server.fn_handler::<anyhow::Error, _>("/salvar", Method::Get, |req| {
            let query = req.uri().split_once('?').map_or("", |(_, q)| q);
            for cmd in parse_threshold_form(query) {
                inbox::push_command(cmd);
            }
            respond(req, "text/html; charset=utf-8", REDIRECT_HOME)
        })?;

        server.fn_handler::<anyhow::Error, _>("/bomba", Method::Get, |req| {
            inbox::push_command(AppCommand::TogglePump);
            respond(req, "text/html; charset=utf-8", REDIRECT_HOME)
        })?;

        info!("Web: serving /, /dados, /salvar, /bomba");
        Ok(server)
    }
}
