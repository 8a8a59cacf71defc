//! System clock adapter.
//!
//! Implements [`Clock`]: monotonic milliseconds for the scheduler and the
//! notification gate, plus the local `hh:mm:ss` label stamped on every
//! measurement.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` (monotonic)
//!   and `gettimeofday()` (wall clock, set by SNTP in `main`).
//! - **`not(target_os = "espidf")`**: uses `std::time` for host-side
//!   testing and simulation.
//!
//! Until the wall clock is synchronised the label counts from boot, so
//! early samples still carry a monotonic stamp.

use crate::app::ports::Clock;
use crate::measurement::{Timestamp, format_time_of_day};

/// Wall-clock readings before 2020-01-01 mean SNTP has not run yet.
const EPOCH_2020: i64 = 1_577_836_800;

/// Clock for the ESP32 platform.
pub struct SystemClock {
    utc_offset_secs: i32,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl SystemClock {
    pub fn new(utc_offset_secs: i32) -> Self {
        Self {
            utc_offset_secs,
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    fn uptime_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads the high-resolution timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Seconds since the Unix epoch, if the wall clock is synchronised.
    #[cfg(target_os = "espidf")]
    pub fn unix_secs(&self) -> Option<i64> {
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: gettimeofday writes into the local timeval only.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return None;
        }
        let secs = tv.tv_sec as i64;
        (secs >= EPOCH_2020).then_some(secs)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn unix_secs(&self) -> Option<i64> {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()?
            .as_secs() as i64;
        (secs >= EPOCH_2020).then_some(secs)
    }
}

/// Local seconds since midnight for a Unix time and a fixed UTC offset.
pub fn local_seconds_of_day(unix_secs: i64, utc_offset_secs: i32) -> u32 {
    (unix_secs + i64::from(utc_offset_secs)).rem_euclid(86_400) as u32
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.uptime_ms()
    }

    fn timestamp(&self) -> Timestamp {
        let secs = match self.unix_secs() {
            Some(unix) => local_seconds_of_day(unix, self.utc_offset_secs),
            None => (self.uptime_ms() / 1_000 % 86_400) as u32,
        };
        format_time_of_day(secs)
    }
}
