//! Blocking HTTPS client seam.
//!
//! The outbound adapters (chat bot, telemetry, spreadsheet) speak HTTP
//! through [`HttpClient`] so they can be exercised on the host with a
//! scripted client.  On the device [`EspHttp`] opens one
//! `EspHttpConnection` per request, validated against the ESP-IDF
//! certificate bundle, and drops it before returning.

use crate::error::TransportError;

/// Upper bound on a buffered reply body.
pub const MAX_REPLY_BYTES: usize = 16 * 1024;

/// Status line and body of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpClient {
    fn get(&mut self, url: &str) -> Result<HttpReply, TransportError>;

    /// POST `body` with `Content-Type: application/json`.
    fn post_json(&mut self, url: &str, body: &str) -> Result<HttpReply, TransportError>;
}

/// Turn a non-2xx reply into [`TransportError::Status`].
pub fn require_success(reply: HttpReply) -> Result<HttpReply, TransportError> {
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(TransportError::Status(reply.status))
    }
}

#[cfg(target_os = "espidf")]
pub use device::EspHttp;

#[cfg(target_os = "espidf")]
mod device {
    use core::time::Duration;

    use embedded_svc::http::{Method, Status};
    use embedded_svc::http::client::Client;
    use embedded_svc::io::{Read, Write};
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use log::debug;

    use super::{HttpClient, HttpReply, MAX_REPLY_BYTES};
    use crate::error::TransportError;

    /// ESP-IDF HTTPS client; one connection per request.
    #[derive(Debug, Clone)]
    pub struct EspHttp {
        timeout: Duration,
    }

    impl EspHttp {
        pub fn new(timeout_ms: u64) -> Self {
            Self {
                timeout: Duration::from_millis(timeout_ms),
            }
        }

        fn connect(&self) -> Result<Client<EspHttpConnection>, TransportError> {
            let conf = Configuration {
                timeout: Some(self.timeout),
                crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
                ..Default::default()
            };
            let conn = EspHttpConnection::new(&conf).map_err(|_| TransportError::ConnectFailed)?;
            Ok(Client::wrap(conn))
        }

        fn exchange(
            &mut self,
            method: Method,
            url: &str,
            headers: &[(&str, &str)],
            body: Option<&[u8]>,
        ) -> Result<HttpReply, TransportError> {
            let mut client = self.connect()?;
            let mut request = client
                .request(method, url, headers)
                .map_err(|_| TransportError::ConnectFailed)?;
            if let Some(body) = body {
                request.write_all(body).map_err(|_| TransportError::Timeout)?;
            }
            let mut response = request.submit().map_err(|_| TransportError::Timeout)?;
            let status = response.status();

            let mut bytes = Vec::new();
            let mut chunk = [0u8; 512];
            loop {
                let n = response.read(&mut chunk).map_err(|_| TransportError::Timeout)?;
                if n == 0 {
                    break;
                }
                if bytes.len() + n > MAX_REPLY_BYTES {
                    return Err(TransportError::MalformedReply);
                }
                bytes.extend_from_slice(&chunk[..n]);
            }
            debug!("HTTP: {:?} -> {} ({} bytes)", method, status, bytes.len());

            let body = String::from_utf8(bytes).map_err(|_| TransportError::MalformedReply)?;
            Ok(HttpReply { status, body })
        }
    }

    impl HttpClient for EspHttp {
        fn get(&mut self, url: &str) -> Result<HttpReply, TransportError> {
            self.exchange(Method::Get, url, &[], None)
        }

        fn post_json(&mut self, url: &str, body: &str) -> Result<HttpReply, TransportError> {
            let len = body.len().to_string();
            let headers = [("Content-Type", "application/json"), ("Content-Length", len.as_str())];
            self.exchange(Method::Post, url, &headers, Some(body.as_bytes()))
        }
    }
}
