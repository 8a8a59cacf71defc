//! The cooperative loop body.
//!
//! [`Runtime`] owns the service, the remote command engine and every
//! adapter.  The [`Scheduler`](crate::scheduler::Scheduler) calls it back
//! when a timer fires; between timers the loop drains the web inbox and
//! republishes the status snapshot.
//!
//! ```text
//!  Scheduler ──"sampling"──────▶ AppService::run_sampling(force = false)
//!            ──"command-poll"──▶ RemoteCommandProcessor::poll ─┐
//!                            └─▶ dashboard button (MeasureNow) ─┤
//!  inbox ──────────────────────────────────────────────────────┴▶ AppService::handle_command
//! ```

use log::{debug, info, warn};

use crate::app::commands::AppCommand;
use crate::app::ports::{
    ActuatorPort, Clock, EventSink, Exporter, MeasureTrigger, Notifier, SchedulerDelegate,
    SensorPort, Telemetry,
};
use crate::error::TransportError;
use crate::app::service::AppService;
use crate::inbox;
use crate::remote::engine::RemoteCommandProcessor;
use crate::remote::transport::UpdateTransport;
use crate::scheduler::{COMMAND_POLL, SAMPLING};

pub struct Runtime<H, R, K, S> {
    pub app: AppService,
    pub engine: RemoteCommandProcessor,
    pub hw: H,
    pub remote: R,
    pub clock: K,
    pub sink: S,
}

impl<H, R, K, S> Runtime<H, R, K, S>
where
    H: SensorPort + ActuatorPort,
    R: Notifier + Telemetry + Exporter + UpdateTransport + MeasureTrigger,
    K: Clock,
    S: EventSink,
{
    pub fn new(app: AppService, hw: H, remote: R, clock: K, sink: S) -> Self {
        Self {
            app,
            engine: RemoteCommandProcessor::new(),
            hw,
            remote,
            clock,
            sink,
        }
    }

    /// Drive the actuators to their initial state, publish the command
    /// menu and the first status snapshot.
    pub fn start(&mut self) {
        self.app.start(&mut self.hw, &mut self.sink);
        self.engine.register(&mut self.remote);
        inbox::publish_status(self.app.status());
    }

    pub fn dispatch(&mut self, cmd: AppCommand) {
        debug!("Runtime: dispatch {:?}", cmd);
        self.app
            .handle_command(cmd, &mut self.hw, &mut self.remote, &self.clock, &mut self.sink);
    }

    /// One long-poll pass; every selected command is handled in order.
    /// The dashboard button is read afterwards and runs at most one more
    /// forced measurement.
    pub fn poll_commands(&mut self) {
        let mut measured = false;
        match self.engine.poll(&mut self.remote) {
            Ok(batch) => {
                for cmd in batch {
                    measured |= matches!(cmd, AppCommand::MeasureNow);
                    self.dispatch(cmd);
                }
            }
            Err(e) => warn!("Remote: poll failed: {e}"),
        }

        match self.remote.take_measure_request() {
            Ok(true) if measured => debug!("Dashboard: button press merged with chat request"),
            Ok(true) => {
                info!("Dashboard: measurement requested");
                self.dispatch(AppCommand::MeasureNow);
            }
            Ok(false) | Err(TransportError::NotConfigured) => {}
            Err(e) => debug!("Dashboard: button read failed: {e}"),
        }
    }

    /// Handle everything the web surface queued, then refresh the
    /// snapshot it serves.
    pub fn service_inbox(&mut self) {
        inbox::drain_commands(|cmd| {
            info!("Web: {:?}", cmd);
            self.dispatch(cmd);
        });
        inbox::publish_status(self.app.status());
    }
}

impl<H, R, K, S> SchedulerDelegate for Runtime<H, R, K, S>
where
    H: SensorPort + ActuatorPort,
    R: Notifier + Telemetry + Exporter + UpdateTransport + MeasureTrigger,
    K: Clock,
    S: EventSink,
{
    fn on_schedule_fired(&mut self, label: &str, now_ms: u64) {
        match label {
            SAMPLING => {
                debug!("Schedule fired: '{}' at {} ms", label, now_ms);
                self.app.run_sampling(
                    false,
                    now_ms,
                    &mut self.hw,
                    &mut self.remote,
                    &self.clock,
                    &mut self.sink,
                );
            }
            COMMAND_POLL => self.poll_commands(),
            other => warn!("Schedule fired with unknown label '{}'", other),
        }
    }
}
