//! The submission controller: a single task that owns the core state,
//! executes its effects and publishes a snapshot after every change.
//!
//! Only one service call is in flight at a time and the poll timer is only
//! armed after the previous poll has been applied, so responses are applied
//! in the order their requests were issued.

use std::sync::Arc;

use futures_util::future::{BoxFuture, OptionFuture};
use srtify_core::{update, AppState, AppViewModel, Effect, Msg, PollPolicy, SelectedFile};
use srtify_logging::{srtify_debug, srtify_info, srtify_warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::TranscriptionService;

enum ControllerCommand {
    Select(SelectedFile),
    Submit,
    Reset,
}

impl ControllerCommand {
    fn into_msg(self) -> Msg {
        match self {
            ControllerCommand::Select(file) => Msg::FileSelected(file),
            ControllerCommand::Submit => Msg::SubmitClicked,
            ControllerCommand::Reset => Msg::ResetClicked,
        }
    }
}

/// Host-facing handle. Commands never fail; their outcome is observed
/// through [`SubmissionController::snapshot`] or [`SubmissionController::subscribe`].
///
/// Dropping the handle tears the controller down like [`SubmissionController::dispose`].
pub struct SubmissionController {
    cmd_tx: mpsc::UnboundedSender<ControllerCommand>,
    view_rx: watch::Receiver<AppViewModel>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SubmissionController {
    /// Starts the controller task on the current tokio runtime.
    pub fn spawn(service: Arc<dyn TranscriptionService>, policy: PollPolicy) -> Self {
        let state = AppState::with_policy(policy);
        let (view_tx, view_rx) = watch::channel(state.view());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let driver = Driver {
            state,
            service,
            in_flight: None,
            next_tick: None,
            view_tx,
        };
        let task = tokio::spawn(driver.run(cmd_rx, cancel.clone()));

        Self {
            cmd_tx,
            view_rx,
            cancel,
            task: Some(task),
        }
    }

    pub fn select_file(&self, file: SelectedFile) {
        self.send(ControllerCommand::Select(file));
    }

    pub fn submit(&self) {
        self.send(ControllerCommand::Submit);
    }

    pub fn reset(&self) {
        self.send(ControllerCommand::Reset);
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> AppViewModel {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppViewModel> {
        self.view_rx.clone()
    }

    /// Stops the poll loop, drops any in-flight call and waits for the task
    /// to exit. No snapshot is published afterwards.
    pub async fn dispose(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                srtify_warn!("Submission controller task ended abnormally: {}", err);
            }
        }
    }

    fn send(&self, command: ControllerCommand) {
        if self.cmd_tx.send(command).is_err() {
            srtify_debug!("Controller already stopped, dropping command");
        }
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Driver {
    state: AppState,
    service: Arc<dyn TranscriptionService>,
    in_flight: Option<BoxFuture<'static, Msg>>,
    next_tick: Option<Instant>,
    view_tx: watch::Sender<AppViewModel>,
}

impl Driver {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<ControllerCommand>,
        cancel: CancellationToken,
    ) {
        loop {
            let tick_at = self.next_tick.unwrap_or_else(Instant::now);
            let tick_armed = self.next_tick.is_some() && self.in_flight.is_none();

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(msg) = OptionFuture::from(self.in_flight.as_mut()),
                    if self.in_flight.is_some() =>
                {
                    self.in_flight = None;
                    self.dispatch(msg);
                }
                command = cmd_rx.recv() => match command {
                    Some(command) => self.dispatch(command.into_msg()),
                    None => break,
                },
                _ = sleep_until(tick_at), if tick_armed => {
                    self.next_tick = None;
                    self.dispatch(Msg::PollTick);
                }
            }
        }

        self.next_tick = None;
        if self.in_flight.take().is_some() {
            srtify_debug!("Dropped in-flight service call on shutdown");
        }
        srtify_info!("Submission controller disposed");
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        let view = changed.then(|| state.view());
        self.state = state;

        for effect in effects {
            self.execute(effect);
        }
        if let Some(view) = view {
            self.view_tx.send_replace(view);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Upload { file } => {
                let service = self.service.clone();
                self.in_flight = Some(Box::pin(async move {
                    match service.upload(&file).await {
                        Ok(handle) => Msg::UploadSucceeded { handle },
                        Err(err) => Msg::UploadFailed {
                            error: err.to_string(),
                        },
                    }
                }));
            }
            Effect::Poll { handle, attempt } => {
                let service = self.service.clone();
                self.in_flight = Some(Box::pin(async move {
                    match service.progress(&handle).await {
                        Ok(report) => Msg::PollSucceeded {
                            handle,
                            attempt,
                            progress: report.progress,
                            transcript: report.transcript,
                        },
                        Err(err) => {
                            if err.is_not_found() {
                                // Possibly permanent, but the job may not be registered yet.
                                srtify_warn!(
                                    "Service does not know job {} (attempt {})",
                                    handle,
                                    attempt
                                );
                            }
                            Msg::PollFailed {
                                handle,
                                attempt,
                                error: err.to_string(),
                            }
                        }
                    }
                }));
            }
            Effect::ScheduleTick { after } => {
                self.next_tick = Some(Instant::now() + after);
            }
            Effect::CancelTicks => {
                self.next_tick = None;
            }
        }
    }
}
