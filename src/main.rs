//! GrowMonitor Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   SystemClock   WifiLink       │
//! │  (Sensor+Actuator) (EventSink)    (Clock)                      │
//! │  RemoteChannels: TelegramBot · BlynkTelemetry · SheetsExporter │
//! │  Web server (own task) ──▶ inbox                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Sampling · Alerts · History · Commands                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven) · RemoteCommandProcessor          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::IOPin;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::EspSntp;
use log::{error, info, warn};

use growmonitor::adapters::hardware::HardwareAdapter;
use growmonitor::adapters::http::EspHttp;
use growmonitor::adapters::log_sink::LogEventSink;
use growmonitor::adapters::remote::RemoteChannels;
use growmonitor::adapters::time::SystemClock;
use growmonitor::adapters::web;
use growmonitor::adapters::wifi::WifiLink;
use growmonitor::app::ports::Clock;
use growmonitor::app::service::AppService;
use growmonitor::config::{Secrets, SystemConfig};
use growmonitor::drivers::hw_init;
use growmonitor::error::Error;
use growmonitor::drivers::indicator::StatusIndicator;
use growmonitor::drivers::relay::PumpRelay;
use growmonitor::pins;
use growmonitor::runtime::Runtime;
use growmonitor::scheduler::Scheduler;
use growmonitor::sensors::SensorHub;
use growmonitor::sensors::climate::ClimateSensor;
use growmonitor::sensors::soil::SoilProbe;
use growmonitor::sensors::thermometer::InternalThermometer;

/// Pause between loop passes.
const LOOP_PAUSE_MS: u32 = 50;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GrowMonitor v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    if let Err(e) = config.validate().map_err(Error::Init) {
        error!("Config invalid, halting: {}", e);
        return Err(e.into());
    }
    let secrets = Secrets::from_build_env();
    for (name, value) in [
        ("BOT_TOKEN", secrets.bot_token),
        ("CHAT_ID", secrets.chat_id),
        ("BLYNK_TOKEN", secrets.blynk_token),
        ("SHEETS_URL", secrets.sheets_url),
    ] {
        if value.is_empty() {
            warn!("{} not set at build time; channel disabled", name);
        }
    }

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().context("peripheral init")?;
    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    info!(
        "Pins: one-wire GPIO{}, DHT GPIO{}, relay GPIO{}, soil ADC1 ch {:?}",
        pins::ONE_WIRE_GPIO,
        pins::DHT_GPIO,
        pins::PUMP_RELAY_GPIO,
        &pins::SOIL_ADC_CHANNELS[..config.soil_probes.len().min(pins::SOIL_ADC_CHANNELS.len())]
    );
    let thermometer = InternalThermometer::new(peripherals.pins.gpio19.downgrade())
        .context("DS18B20 init")?;
    let climate = ClimateSensor::new(peripherals.pins.gpio4.downgrade()).context("DHT11 init")?;
    let soil = pins::SOIL_ADC_CHANNELS
        .iter()
        .take(config.soil_probes.len())
        .enumerate()
        .map(|(i, &channel)| SoilProbe::new(i, channel))
        .collect();
    let hub = SensorHub::new(thermometer, climate, soil);

    let hw = HardwareAdapter::new(
        hub,
        PumpRelay::new(pins::PUMP_RELAY_GPIO),
        StatusIndicator::new(pins::LED_GREEN_GPIO, pins::LED_RED_GPIO, FreeRtos),
    );

    // ── 4. Network ────────────────────────────────────────────
    let mut wifi = WifiLink::connect(
        peripherals.modem,
        sys_loop,
        nvs,
        secrets.wifi_ssid,
        secrets.wifi_pass,
    )
    .context("WiFi")?;
    let _sntp = EspSntp::new_default().context("SNTP")?;
    let _server = web::start()?;

    // ── 5. Application ────────────────────────────────────────
    let remote = RemoteChannels::new(
        EspHttp::new(config.http_timeout_ms),
        &secrets,
        config.update_long_poll_s,
    );
    let clock = SystemClock::new(config.utc_offset_secs);
    let mut sched = Scheduler::with_defaults(
        config.measurement_interval_ms,
        config.command_poll_interval_ms,
        clock.now_ms(),
    );
    let app = AppService::new(config);
    let mut rt = Runtime::new(app, hw, remote, clock, LogEventSink::new());
    rt.start();

    info!("System ready. Entering loop.");

    // ── 6. Cooperative loop ───────────────────────────────────
    loop {
        let now = rt.clock.now_ms();
        wifi.poll(now);
        sched.tick(now, &mut rt);
        rt.service_inbox();
        FreeRtos::delay_ms(LOOP_PAUSE_MS);
    }
}
