use srtify_logging::{srtify_debug, srtify_info, srtify_warn};

use crate::{
    AppState, Effect, FailureReason, Msg, ProgressSnapshot, SelectedFile, SubmissionHandle,
    SubmissionState,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every message is total; messages that do not apply to the current state
/// (double submits, stale responses, ticks after a terminal state) leave the
/// state untouched and produce no effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(file) => {
            select_file(&mut state, file);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::UploadSucceeded { handle } => {
            if *state.submission() != SubmissionState::Uploading {
                srtify_debug!(
                    "Ignoring upload result {} in state {}",
                    handle,
                    state.submission().label()
                );
                return (state, Vec::new());
            }
            srtify_info!("Upload accepted, file_id={}", handle);
            state.transition(SubmissionState::Processing {
                handle,
                snapshot: ProgressSnapshot::default(),
                poll_attempt: 0,
            });
            vec![Effect::ScheduleTick {
                after: state.policy().interval,
            }]
        }
        Msg::UploadFailed { error } => {
            if *state.submission() != SubmissionState::Uploading {
                srtify_debug!(
                    "Ignoring upload failure in state {}: {}",
                    state.submission().label(),
                    error
                );
                return (state, Vec::new());
            }
            srtify_warn!("Upload failed: {}", error);
            state.transition(SubmissionState::Failed {
                reason: FailureReason::Upload,
            });
            Vec::new()
        }
        Msg::PollTick => poll_tick(&mut state),
        Msg::PollSucceeded {
            handle,
            attempt,
            progress,
            transcript,
        } => {
            if !is_current_poll(&state, &handle, attempt) {
                srtify_debug!("Dropping stale poll response for {} attempt {}", handle, attempt);
                return (state, Vec::new());
            }
            let snapshot = ProgressSnapshot::new(progress, transcript);
            if snapshot.is_complete() {
                srtify_info!("Processing completed for {} after {} polls", handle, attempt);
                state.transition(SubmissionState::Completed { handle, snapshot });
                vec![Effect::CancelTicks]
            } else {
                srtify_debug!(
                    "Progress {}% for {} (attempt {})",
                    snapshot.percent_complete,
                    handle,
                    attempt
                );
                state.transition(SubmissionState::Processing {
                    handle,
                    snapshot,
                    poll_attempt: attempt,
                });
                vec![Effect::ScheduleTick {
                    after: state.policy().interval,
                }]
            }
        }
        Msg::PollFailed {
            handle,
            attempt,
            error,
        } => {
            if !is_current_poll(&state, &handle, attempt) {
                srtify_debug!("Dropping stale poll failure for {} attempt {}", handle, attempt);
                return (state, Vec::new());
            }
            // Transient: the attempt already counted toward the ceiling.
            srtify_warn!("Progress poll {} for {} failed: {}", attempt, handle, error);
            vec![Effect::ScheduleTick {
                after: state.policy().interval,
            }]
        }
        Msg::ResetClicked => {
            if state.submission().is_terminal() {
                srtify_info!("Resetting after {}", state.submission().label());
                state.transition(SubmissionState::Idle);
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Replaces the selection in any state. A running submission keeps the
/// payload its upload effect was issued with.
fn select_file(state: &mut AppState, file: SelectedFile) {
    if !file.has_supported_extension() {
        srtify_warn!("Selected file {} has an unsupported extension", file.name());
    }
    srtify_info!("Selected {} ({} bytes, {})", file.name(), file.size(), file.media_type());
    state.set_selected_file(file);
    if state.submission().is_terminal() {
        state.transition(SubmissionState::Idle);
    }
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if *state.submission() != SubmissionState::Idle {
        srtify_debug!("Submit ignored in state {}", state.submission().label());
        return Vec::new();
    }
    let Some(file) = state.selected_file().cloned() else {
        srtify_debug!("Submit ignored: no file selected");
        return Vec::new();
    };
    srtify_info!("Uploading {}", file.name());
    state.transition(SubmissionState::Uploading);
    vec![Effect::Upload { file }]
}

fn poll_tick(state: &mut AppState) -> Vec<Effect> {
    let SubmissionState::Processing {
        handle,
        snapshot,
        poll_attempt,
    } = state.submission().clone()
    else {
        srtify_debug!("Tick ignored in state {}", state.submission().label());
        return Vec::new();
    };

    let attempt = poll_attempt.saturating_add(1);
    if attempt > state.policy().max_attempts {
        srtify_warn!(
            "Timed out waiting for {} after {} polls",
            handle,
            state.policy().max_attempts
        );
        state.transition(SubmissionState::Failed {
            reason: FailureReason::Timeout,
        });
        return vec![Effect::CancelTicks];
    }

    state.transition(SubmissionState::Processing {
        handle: handle.clone(),
        snapshot,
        poll_attempt: attempt,
    });
    vec![Effect::Poll { handle, attempt }]
}

fn is_current_poll(state: &AppState, handle: &SubmissionHandle, attempt: u32) -> bool {
    matches!(
        state.submission(),
        SubmissionState::Processing {
            handle: current,
            poll_attempt,
            ..
        } if current == handle && *poll_attempt == attempt
    )
}
