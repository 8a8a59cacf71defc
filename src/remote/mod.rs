//! Remote command channel (chat bot long-poll).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Remote command stack                    │
//! │                                                            │
//! │  ┌───────────┐   ┌──────────┐   ┌───────────────────────┐  │
//! │  │ Transport │──▶│  Codec   │──▶│  Engine (cursor)      │  │
//! │  │ (trait)   │   │  (JSON)  │   │  → command rules      │  │
//! │  └───────────┘   └──────────┘   └───────────────────────┘  │
//! │                                            │               │
//! │                                            ▼               │
//! │                                  AppService::handle_command│
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod commands;
pub mod engine;
pub mod transport;
