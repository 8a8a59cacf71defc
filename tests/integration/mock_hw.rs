//! Mock adapters for integration tests.
//!
//! Records every actuator call and every outbound message so tests can
//! assert on the full history without touching GPIO or the network.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use growmonitor::app::events::AppEvent;
use growmonitor::app::ports::{
    ActuatorPort, Clock, EventSink, Exporter, MeasureTrigger, Notifier, SensorPort, Telemetry,
};
use growmonitor::error::{ExportError, TransportError};
use growmonitor::escape::EscapingMode;
use growmonitor::measurement::{Measurement, RawReadings, Timestamp, format_time_of_day};
use growmonitor::remote::transport::UpdateTransport;
use serde_json::Value;

/// The inbox and status cell are process-wide; tests that touch them
/// hold this for their whole body.
static SHARED_STATE: Mutex<()> = Mutex::new(());

pub fn lock_shared_state() -> MutexGuard<'static, ()> {
    SHARED_STATE.lock().unwrap_or_else(|e| e.into_inner())
}

// ── Readings ──────────────────────────────────────────────────

/// Every value in range; soil around 70 % on both default probes.
pub fn nominal() -> RawReadings {
    readings(24.0, 22.0, 55.0)
}

pub fn readings(internal_c: f32, external_c: f32, external_rh: f32) -> RawReadings {
    RawReadings {
        internal_c,
        external_c,
        external_rh,
        soil_raw: heapless::Vec::from_slice(&[2000, 2500]).unwrap(),
    }
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetPump(bool),
    SetBusy(bool),
    IndicateFault,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Consumed one per `read_all`; [`nominal`] once empty.
    pub script: VecDeque<RawReadings>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            script: VecDeque::new(),
        }
    }

    pub fn queue(&mut self, raw: RawReadings) {
        self.script.push_back(raw);
    }

    pub fn pump_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetPump(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn faults(&self) -> usize {
        self.calls.iter().filter(|c| **c == ActuatorCall::IndicateFault).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> RawReadings {
        self.script.pop_front().unwrap_or_else(nominal)
    }
}

impl ActuatorPort for MockHardware {
    fn set_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetPump(on));
    }

    fn set_busy(&mut self, busy: bool) {
        self.calls.push(ActuatorCall::SetBusy(busy));
    }

    fn indicate_fault(&mut self) {
        self.calls.push(ActuatorCall::IndicateFault);
    }
}

// ── MockRemote ────────────────────────────────────────────────

/// Stands in for the chat bot, the dashboard and the spreadsheet at once.
pub struct MockRemote {
    pub sent: Vec<(String, EscapingMode)>,
    pub published: Vec<Measurement>,
    pub exported: Vec<Value>,
    pub menus: Vec<String>,
    pub offsets: Vec<i64>,
    /// Replies for `fetch_updates`, oldest first; an empty batch once drained.
    pub updates: VecDeque<Result<String, TransportError>>,
    /// Dashboard button reads, oldest first; released once drained.
    pub button: VecDeque<Result<bool, TransportError>>,
    pub button_reads: usize,
    pub fail_send: bool,
    pub export_error: Option<ExportError>,
}

#[allow(dead_code)]
impl MockRemote {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            published: Vec::new(),
            exported: Vec::new(),
            menus: Vec::new(),
            offsets: Vec::new(),
            updates: VecDeque::new(),
            button: VecDeque::new(),
            button_reads: 0,
            fail_send: false,
            export_error: None,
        }
    }

    /// Queue an update batch carrying `texts` with ids starting at `first_id`.
    pub fn queue_texts(&mut self, first_id: i64, texts: &[&str]) {
        let result: Vec<Value> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                serde_json::json!({
                    "update_id": first_id + i as i64,
                    "message": { "text": t },
                })
            })
            .collect();
        let body = serde_json::to_string(&serde_json::json!({ "ok": true, "result": result })).unwrap();
        self.updates.push_back(Ok(body));
    }

    pub fn texts(&self) -> Vec<&str> {
        self.sent.iter().map(|(t, _)| t.as_str()).collect()
    }

    pub fn is_silent(&self) -> bool {
        self.sent.is_empty() && self.published.is_empty() && self.exported.is_empty()
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MockRemote {
    fn send(&mut self, text: &str, mode: EscapingMode) -> Result<(), TransportError> {
        self.sent.push((text.to_string(), mode));
        if self.fail_send {
            Err(TransportError::Timeout)
        } else {
            Ok(())
        }
    }
}

impl Telemetry for MockRemote {
    fn publish(&mut self, m: &Measurement) -> Result<(), TransportError> {
        self.published.push(m.clone());
        Ok(())
    }
}

impl Exporter for MockRemote {
    fn export(&mut self, record: &Value) -> Result<(), ExportError> {
        self.exported.push(record.clone());
        match self.export_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl UpdateTransport for MockRemote {
    fn fetch_updates(&mut self, offset: i64) -> Result<String, TransportError> {
        self.offsets.push(offset);
        self.updates
            .pop_front()
            .unwrap_or_else(|| Ok(r#"{"ok":true,"result":[]}"#.to_string()))
    }

    fn register_commands(&mut self, body: &str) -> Result<(), TransportError> {
        self.menus.push(body.to_string());
        Ok(())
    }
}

impl MeasureTrigger for MockRemote {
    fn take_measure_request(&mut self) -> Result<bool, TransportError> {
        self.button_reads += 1;
        self.button.pop_front().unwrap_or(Ok(false))
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    pub now: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn timestamp(&self) -> Timestamp {
        format_time_of_day(12 * 3600 + (self.now.get() / 1000) as u32)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
