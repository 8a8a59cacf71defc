//! GPIO / peripheral pin assignments for the GrowMonitor board (ESP32-WROOM).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Climate sensors
// ---------------------------------------------------------------------------

/// DS18B20 one-wire probe (internal / canopy temperature).
pub const ONE_WIRE_GPIO: i32 = 19;
/// DHT11 data line (external temperature + relative humidity).
pub const DHT_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Soil moisture, analog (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive soil probes, in channel order: ADC1 channel 6 (GPIO 34) and
/// channel 7 (GPIO 35).
pub const SOIL_ADC_CHANNELS: [u32; 2] = [6, 7];

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Relay module IN1, water pump. HIGH = pump on.
pub const PUMP_RELAY_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Status LEDs
// ---------------------------------------------------------------------------

/// Green LED: lit while a measurement is in progress.
pub const LED_GREEN_GPIO: i32 = 33;
/// Red LED: lit while idle.
pub const LED_RED_GPIO: i32 = 32;
