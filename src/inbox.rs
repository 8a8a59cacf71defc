//! Hand-off between the web server task and the main loop.
//!
//! The HTTP server runs its handlers on its own task.  Handlers never
//! touch [`AppService`](crate::app::service::AppService) directly: they
//! push validated commands into a bounded channel and read the last
//! status snapshot the loop published.
//!
//! ```text
//! ┌──────────────┐  AppCommand   ┌──────────────┐
//! │  Web task    │──────────────▶│  Main loop   │
//! │  (handlers)  │◀──────────────│  (owner)     │
//! └──────────────┘ StatusReport  └──────────────┘
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::AppCommand;
use crate::report::StatusReport;

/// Channel depth for web commands.
const INBOX_DEPTH: usize = 8;

static COMMAND_INBOX: Channel<CriticalSectionRawMutex, AppCommand, INBOX_DEPTH> = Channel::new();

static STATUS: Mutex<CriticalSectionRawMutex, RefCell<Option<StatusReport>>> =
    Mutex::new(RefCell::new(None));

/// Queue a command for the main loop.  Returns `false` when the inbox is
/// full and the command was dropped.
pub fn push_command(cmd: AppCommand) -> bool {
    if COMMAND_INBOX.try_send(cmd).is_err() {
        warn!("Inbox: full, dropping {:?}", cmd);
        return false;
    }
    true
}

/// Hand every pending command to `handler`, oldest first.
pub fn drain_commands(mut handler: impl FnMut(AppCommand)) {
    while let Ok(cmd) = COMMAND_INBOX.try_receive() {
        handler(cmd);
    }
}

/// Replace the snapshot served to web clients.
pub fn publish_status(status: StatusReport) {
    STATUS.lock(|cell| *cell.borrow_mut() = Some(status));
}

/// Last published snapshot (defaults before the first publish).
pub fn read_status() -> StatusReport {
    STATUS.lock(|cell| cell.borrow().clone().unwrap_or_default())
}
