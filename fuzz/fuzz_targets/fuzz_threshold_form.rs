//! Fuzz target: `/salvar` query parsing
//!
//! Invariants checked:
//! - No panics on arbitrary (possibly badly percent-encoded) queries
//! - Only threshold commands come out, at most one per field
//! - Every accepted value passes the same predicate as the chat command
//!
//! cargo fuzz run fuzz_threshold_form

#![no_main]

use growmonitor::adapters::web::parse_threshold_form;
use growmonitor::alerts::AlertThresholds;
use growmonitor::app::commands::{AppCommand, ThresholdTarget};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(query) = std::str::from_utf8(data) else {
        return;
    };

    let cmds = parse_threshold_form(query);
    assert!(cmds.len() <= 2);

    for cmd in cmds {
        match cmd {
            AppCommand::SetThreshold {
                target: ThresholdTarget::Temperature,
                value,
            } => assert!(AlertThresholds::check_temperature_high(value).is_ok()),
            AppCommand::SetThreshold {
                target: ThresholdTarget::Soil,
                value,
            } => assert!(AlertThresholds::check_soil_low(value).is_ok()),
            other => panic!("unexpected command {other:?}"),
        }
    }
});
