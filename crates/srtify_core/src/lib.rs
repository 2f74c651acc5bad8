//! Srtify core: pure submission state machine and view-model helpers.
mod effect;
mod file;
mod msg;
mod policy;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use file::{
    is_supported_extension, media_type_for_extension, SelectedFile, SUPPORTED_EXTENSIONS,
};
pub use msg::Msg;
pub use policy::PollPolicy;
pub use state::{AppState, FailureReason, ProgressSnapshot, SubmissionHandle, SubmissionState};
pub use update::update;
pub use view_model::{AppViewModel, DownloadLink, SubmitButtonLabel, PROCESSING_NOTICE};
