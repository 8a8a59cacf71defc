//! Fuzz target: `RemoteCommandProcessor::poll`
//!
//! Feeds arbitrary reply bodies to the poll engine through an in-memory
//! transport and checks:
//! - No panics under any byte sequence
//! - The cursor never moves back, and never moves on a rejected reply
//! - A batch never holds more commands than there are categories
//!
//! cargo fuzz run fuzz_update_poll

#![no_main]

use growmonitor::error::TransportError;
use growmonitor::remote::commands::CATEGORY_COUNT;
use growmonitor::remote::engine::RemoteCommandProcessor;
use growmonitor::remote::transport::UpdateTransport;
use libfuzzer_sys::fuzz_target;

struct Canned<'a> {
    bodies: std::str::Split<'a, char>,
}

impl UpdateTransport for Canned<'_> {
    fn fetch_updates(&mut self, _offset: i64) -> Result<String, TransportError> {
        self.bodies
            .next()
            .map(String::from)
            .ok_or(TransportError::Timeout)
    }

    fn register_commands(&mut self, _body: &str) -> Result<(), TransportError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // One reply body per line, polled in order.
    let mut transport = Canned {
        bodies: text.split('\n'),
    };
    let mut engine = RemoteCommandProcessor::new();

    for _ in 0..16 {
        let before = engine.last_seen_id();
        match engine.poll(&mut transport) {
            Ok(batch) => {
                assert!(batch.len() <= CATEGORY_COUNT);
                assert!(engine.last_seen_id() >= before, "cursor moved back");
            }
            Err(_) => assert_eq!(engine.last_seen_id(), before, "cursor moved on error"),
        }
    }
});
