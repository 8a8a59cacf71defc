//! WiFi station-mode link.
//!
//! Brings the station up once at boot and re-associates when the link
//! drops; the loop calls [`WifiLink::poll`] on every pass.  The current
//! link state is mirrored in a static flag so adapters without access to
//! the driver (the spreadsheet exporter) can check [`link_up`].
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: the flag is driven by [`sim_set_link_up`].
//!
//! ## Reconnection policy
//!
//! On disconnect the link waits an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s) between attempts.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

static LINK_UP: AtomicBool = AtomicBool::new(false);

/// Whether the station currently holds an IP.
pub fn link_up() -> bool {
    LINK_UP.load(Ordering::Relaxed)
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_link_up(up: bool) {
    LINK_UP.store(up, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl std::error::Error for WifiError {}

const INITIAL_BACKOFF_MS: u64 = 2_000;
const MAX_BACKOFF_MS: u64 = 60_000;

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_credentials(ssid: &str, password: &str) -> Result<(), WifiError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(WifiError::InvalidSsid);
    }
    if !password.is_empty() && !(8..=64).contains(&password.len()) {
        return Err(WifiError::InvalidPassword);
    }
    Ok(())
}

/// Exponential reconnect pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    delay_ms: u64,
    next_attempt_ms: u64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            delay_ms: INITIAL_BACKOFF_MS,
            next_attempt_ms: 0,
        }
    }
}

impl Backoff {
    /// Whether an attempt is allowed at `now_ms`.
    pub fn due(&self, now_ms: u64) -> bool {
        now_ms >= self.next_attempt_ms
    }

    /// Record a failed attempt made at `now_ms`.
    pub fn failed(&mut self, now_ms: u64) {
        self.next_attempt_ms = now_ms + self.delay_ms;
        self.delay_ms = (self.delay_ms * 2).min(MAX_BACKOFF_MS);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

#[cfg(target_os = "espidf")]
pub use device::WifiLink;

#[cfg(target_os = "espidf")]
mod device {
    use anyhow::{Context, anyhow};
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::*;

    pub struct WifiLink {
        wifi: BlockingWifi<EspWifi<'static>>,
        backoff: Backoff,
    }

    impl WifiLink {
        /// Configure the station and block until it has an IP.
        pub fn connect(
            modem: Modem,
            sys_loop: EspSystemEventLoop,
            nvs: EspDefaultNvsPartition,
            ssid: &str,
            password: &str,
        ) -> anyhow::Result<Self> {
            validate_credentials(ssid, password)?;
            let esp_wifi = EspWifi::new(modem, sys_loop.clone(), Some(nvs))?;
            let mut wifi = BlockingWifi::wrap(esp_wifi, sys_loop)?;

            wifi.set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: ssid.try_into().map_err(|_| anyhow!(WifiError::InvalidSsid))?,
                password: password.try_into().map_err(|_| anyhow!(WifiError::InvalidPassword))?,
                auth_method: if password.is_empty() {
                    AuthMethod::None
                } else {
                    AuthMethod::WPA2Personal
                },
                ..Default::default()
            }))?;

            info!("WiFi: connecting to '{}'", ssid);
            wifi.start()?;
            wifi.connect().context(WifiError::ConnectionFailed)?;
            wifi.wait_netif_up()?;

            let ip = wifi.wifi().sta_netif().get_ip_info()?;
            info!("WiFi: connected, ip={}", ip.ip);
            LINK_UP.store(true, Ordering::Relaxed);

            Ok(Self {
                wifi,
                backoff: Backoff::default(),
            })
        }

        /// Re-associate if the link dropped.
        pub fn poll(&mut self, now_ms: u64) {
            let up = self.wifi.is_connected().unwrap_or(false);
            let was_up = LINK_UP.swap(up, Ordering::Relaxed);
            if up {
                self.backoff.reset();
                return;
            }
            if was_up {
                warn!("WiFi: connection lost, entering reconnect");
            }
            if !self.backoff.due(now_ms) {
                return;
            }
            match self.wifi.connect().and_then(|()| self.wifi.wait_netif_up()) {
                Ok(()) => {
                    info!("WiFi: reconnected");
                    LINK_UP.store(true, Ordering::Relaxed);
                    self.backoff.reset();
                }
                Err(e) => {
                    self.backoff.failed(now_ms);
                    warn!("WiFi: reconnect failed ({e}), next in {} ms", self.backoff.delay_ms());
                }
            }
        }
    }
}
