//! Cooperative timer engine.
//!
//! The scheduler is the sole owner of the loop's wall-clock timers.  Each
//! pass of the main loop calls [`Scheduler::tick`] with the current
//! monotonic time; every schedule whose period has elapsed notifies the
//! [`SchedulerDelegate`], which runs the work to completion before the
//! next schedule is checked.  There is no interleaving.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Trigger Sources                          │
//! │                                                              │
//! │   ┌──────────────────┐        ┌──────────────────┐           │
//! │   │ "sampling"       │        │ "command-poll"   │           │
//! │   │  every 300 s     │        │  every 1 s       │           │
//! │   └────────┬─────────┘        └────────┬─────────┘           │
//! │            │                           │                     │
//! │            ▼                           ▼                     │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              SchedulerDelegate (main loop)             │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          │                                   │
//! │                          ▼                                   │
//! │          AppService::run_sampling()                          │
//! │          RemoteCommandProcessor::poll()                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::app::ports::SchedulerDelegate;
use log::info;

/// Label of the periodic sampling schedule.
pub const SAMPLING: &str = "sampling";
/// Label of the chat command poll schedule.
pub const COMMAND_POLL: &str = "command-poll";

/// A single recurring schedule.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    /// Human-readable label passed to the delegate.
    pub label: &'static str,
    /// Minimum time between two fires.
    pub period_ms: u64,
    /// Whether this schedule is currently enabled.
    pub enabled: bool,
}

/// Maximum number of concurrent schedules (stack-allocated).
const MAX_SCHEDULES: usize = 4;

#[derive(Debug, Clone, Copy)]
struct ScheduleEntry {
    schedule: Schedule,
    /// Instant of the last fire (boot counts as a fire).
    last_fired_ms: u64,
}

/// The scheduler engine.
///
/// Decoupled from what the work is: when a schedule fires it invokes the
/// [`SchedulerDelegate`] callback, so the scheduler is testable without
/// sensors or a network.
pub struct Scheduler {
    schedules: [Option<ScheduleEntry>; MAX_SCHEDULES],
    enabled: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            schedules: [None; MAX_SCHEDULES],
            enabled: true,
        }
    }

    /// The loop's two standard schedules, both starting their first period
    /// at `now_ms`.
    pub fn with_defaults(sampling_ms: u64, command_poll_ms: u64, now_ms: u64) -> Self {
        let mut s = Self::new();
        s.add(
            Schedule {
                label: SAMPLING,
                period_ms: sampling_ms,
                enabled: true,
            },
            now_ms,
        );
        s.add(
            Schedule {
                label: COMMAND_POLL,
                period_ms: command_poll_ms,
                enabled: true,
            },
            now_ms,
        );
        s
    }

    /// Add a schedule whose first period starts at `now_ms`.  Returns the
    /// slot index, or `None` if full.
    pub fn add(&mut self, schedule: Schedule, now_ms: u64) -> Option<usize> {
        let (i, slot) = self
            .schedules
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.is_none())?;
        info!(
            "Scheduler: added '{}' every {} ms at slot {}",
            schedule.label, schedule.period_ms, i
        );
        *slot = Some(ScheduleEntry {
            schedule,
            last_fired_ms: now_ms,
        });
        Some(i)
    }

    /// Remove a schedule by slot index.
    pub fn remove(&mut self, slot: usize) {
        if let Some(entry) = self.schedules.get_mut(slot) {
            if let Some(e) = entry.take() {
                info!("Scheduler: removed '{}' from slot {}", e.schedule.label, slot);
            }
        }
    }

    /// Enable or disable the entire scheduler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check every schedule against `now_ms`.  Call once per loop pass.
    ///
    /// A schedule fires when at least `period_ms` has passed since its last
    /// fire; its timer restarts at `now_ms`, so a late pass never causes a
    /// burst of catch-up fires.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled {
            return;
        }

        for entry in self.schedules.iter_mut().flatten() {
            if !entry.schedule.enabled {
                continue;
            }
            if now_ms.saturating_sub(entry.last_fired_ms) >= entry.schedule.period_ms {
                entry.last_fired_ms = now_ms;
                delegate.on_schedule_fired(entry.schedule.label, now_ms);
            }
        }
    }

    /// Number of active (enabled) schedules.
    pub fn active_count(&self) -> usize {
        self.schedules
            .iter()
            .flatten()
            .filter(|e| e.schedule.enabled)
            .count()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
