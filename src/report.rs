//! Outbound message formatting.
//!
//! Everything the device says to the outside world is built here: chat
//! texts, the trend-chart link, the exported record and the local status
//! page.  Structured payloads are `serde` types serialized once; nothing is
//! concatenated by hand except the human-readable chat texts.

use core::fmt::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::alerts::{AlertKind, AlertThresholds};
use crate::escape::url_encode;
use crate::measurement::Measurement;

// ── Chat texts ────────────────────────────────────────────────

pub const GREETING: &str = "Hi! I am the GrowMonitor bot.\nUse /help to list the available commands.";

pub const HELP: &str = "Available commands:\n\n\
Monitoring:\n\
- /medir - take a measurement now\n\
- /grafico - chart of the latest measurements\n\n\
Settings:\n\
- /alertatemperatura XX - set the temperature alert (example: /alertatemperatura 28)\n\
- /alertaumidade XX - set the soil moisture alert (example: /alertaumidade 35)\n\n\
Water pump:\n\
- /bombaligar - turn the pump on\n\
- /bombadesligar - turn the pump off\n\n\
Other:\n\
- /start - about this bot\n\
- /help - this list";

pub const TEMPERATURE_USAGE: &str =
    "Invalid command! Use: /alertatemperatura XX (example: /alertatemperatura 30)";
pub const SOIL_USAGE: &str =
    "Invalid command! Use: /alertaumidade XX with XX between 0 and 100 (example: /alertaumidade 35)";

pub fn pump_changed(on: bool) -> &'static str {
    if on {
        "The pump was turned ON!"
    } else {
        "The pump was turned OFF!"
    }
}

pub fn temperature_threshold_set(value: f32) -> String {
    format!("New temperature alert threshold: {value:.1}°C")
}

pub fn soil_threshold_set(value: f32) -> String {
    format!("New soil moisture alert threshold: {value:.1}%")
}

/// Human-readable summary of one measurement followed by one line per
/// active alert.
pub fn summary_message(m: &Measurement, alerts: &[AlertKind]) -> String {
    let mut s = String::with_capacity(256);
    let _ = writeln!(s, "Internal temperature: {:.1}°C", m.internal_c);
    let _ = writeln!(s, "External temperature: {:.1}°C", m.external_c);
    let _ = writeln!(s, "External humidity: {:.1}%", m.external_rh);
    for (i, pct) in m.soil_pct.iter().enumerate() {
        let _ = writeln!(s, "Soil moisture {}: {pct:.1}%", i + 1);
    }
    let _ = writeln!(s, "Time: {}", m.timestamp);
    for alert in alerts {
        let _ = match *alert {
            AlertKind::HighInternalTemperature => {
                writeln!(s, "ALERT: high temperature ({:.1}°C)", m.internal_c)
            }
            AlertKind::LowExternalHumidity => {
                writeln!(s, "ALERT: low humidity ({:.1}%)", m.external_rh)
            }
            AlertKind::LowSoilMoisture(ch) => {
                let pct = m.soil_pct.get(ch as usize).copied().unwrap_or(0.0);
                writeln!(s, "ALERT: dry soil on probe {} ({pct:.1}%)", ch + 1)
            }
        };
    }
    s
}

// ── Trend chart ───────────────────────────────────────────────

pub const CHART_BASE_URL: &str = "https://quickchart.io/chart?c=";

const SOIL_COLOURS: [&str; 4] = ["brown", "orange", "purple", "olive"];

#[derive(Serialize)]
struct ChartConfig<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: ChartData<'a>,
    options: ChartOptions<'a>,
}

#[derive(Serialize)]
struct ChartData<'a> {
    labels: Vec<&'a str>,
    datasets: Vec<Dataset>,
}

#[derive(Serialize)]
struct Dataset {
    label: String,
    data: Vec<f64>,
    #[serde(rename = "borderColor")]
    border_color: &'static str,
    fill: bool,
}

#[derive(Serialize)]
struct ChartOptions<'a> {
    title: ChartTitle<'a>,
}

#[derive(Serialize)]
struct ChartTitle<'a> {
    display: bool,
    text: &'a str,
}

fn one_decimal(v: f32) -> f64 {
    (f64::from(v) * 10.0).round() / 10.0
}

fn column(samples: &[&Measurement], value: impl Fn(&Measurement) -> f32) -> Vec<f64> {
    samples.iter().map(|m| one_decimal(value(m))).collect()
}

fn dataset(label: String, colour: &'static str, data: Vec<f64>) -> Dataset {
    Dataset {
        label,
        data,
        border_color: colour,
        fill: false,
    }
}

/// Chart-service URL plotting `series` (oldest first): one line per metric
/// and per soil channel, labelled with the sample timestamps.
pub fn chart_url<'a>(series: impl IntoIterator<Item = &'a Measurement>, title: &str) -> String {
    let samples: Vec<&Measurement> = series.into_iter().collect();
    let soil_channels = samples.iter().map(|m| m.soil_pct.len()).max().unwrap_or(0);

    let mut datasets = vec![
        dataset("Internal temp.".into(), "red", column(&samples, |m| m.internal_c)),
        dataset("External temp.".into(), "blue", column(&samples, |m| m.external_c)),
        dataset("Humidity".into(), "green", column(&samples, |m| m.external_rh)),
    ];
    for ch in 0..soil_channels {
        datasets.push(dataset(
            format!("Soil moisture {}", ch + 1),
            SOIL_COLOURS[ch % SOIL_COLOURS.len()],
            column(&samples, |m| m.soil_pct.get(ch).copied().unwrap_or(0.0)),
        ));
    }

    let config = ChartConfig {
        kind: "line",
        data: ChartData {
            labels: samples.iter().map(|m| m.timestamp.as_str()).collect(),
            datasets,
        },
        options: ChartOptions {
            title: ChartTitle {
                display: true,
                text: title,
            },
        },
    };

    // Serializing plain structs of strings, bools and finite floats cannot fail.
    let json = serde_json::to_string(&config).unwrap_or_default();
    let mut url = String::with_capacity(CHART_BASE_URL.len() + json.len() * 2);
    url.push_str(CHART_BASE_URL);
    url.push_str(&url_encode(&json));
    url
}

/// HTML anchor wrapping a chart link.
pub fn chart_message(url: &str) -> String {
    format!("<a href=\"{url}\">Click here to view the chart</a>")
}

// ── Record export ─────────────────────────────────────────────

/// Flat record for the spreadsheet exporter.
pub fn export_record(m: &Measurement) -> Value {
    let mut record = Map::new();
    record.insert("temperature".into(), Value::from(f64::from(m.external_c)));
    record.insert("humidity".into(), Value::from(f64::from(m.external_rh)));
    record.insert("temperature_sensor".into(), Value::from(f64::from(m.internal_c)));
    for (i, pct) in m.soil_pct.iter().enumerate() {
        record.insert(format!("soil_moisture_{}", i + 1), Value::from(f64::from(*pct)));
    }
    Value::Object(record)
}

// ── Local status surface ──────────────────────────────────────

/// Snapshot served by the local web surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// `None` until the first successful cycle.
    pub measurement: Option<Measurement>,
    pub pump_on: bool,
    pub thresholds: AlertThresholds,
}

/// Minimal status page with the threshold form and the pump toggle.
pub fn status_page(status: &StatusReport) -> String {
    let mut page = String::with_capacity(1024);
    page.push_str(
        "<!DOCTYPE html><html><head><meta charset='utf-8'>\
         <meta name='viewport' content='width=device-width, initial-scale=1'>\
         <title>GrowMonitor</title></head><body><h1>GrowMonitor</h1>",
    );

    match &status.measurement {
        Some(m) => {
            let _ = write!(
                page,
                "<p>Internal temperature: {:.1}&deg;C</p>\
                 <p>External temperature: {:.1}&deg;C</p>\
                 <p>External humidity: {:.1}%</p>",
                m.internal_c, m.external_c, m.external_rh
            );
            for (i, pct) in m.soil_pct.iter().enumerate() {
                let _ = write!(page, "<p>Soil moisture {}: {pct:.1}%</p>", i + 1);
            }
            let _ = write!(page, "<p>Last reading: {}</p>", m.timestamp);
        }
        None => page.push_str("<p>No measurement yet.</p>"),
    }

    let _ = write!(
        page,
        "<h2>Alerts</h2><form action='/salvar' method='GET'>\
         <label>Temperature (&deg;C): <input name='temp' value='{:.1}'></label><br>\
         <label>Soil moisture (%): <input name='umid' value='{:.1}'></label><br>\
         <input type='submit' value='Save'></form>",
        status.thresholds.temperature_high_c, status.thresholds.soil_low_pct
    );

    let (label, action) = if status.pump_on {
        ("<span style='color:green;'>ON</span>", "Turn off")
    } else {
        ("<span style='color:red;'>OFF</span>", "Turn on")
    };
    let _ = write!(
        page,
        "<h2>Pump</h2><p>Status: {label}</p>\
         <form action='/bomba' method='GET'><input type='submit' value='{action} pump'></form>\
         </body></html>"
    );
    page
}
