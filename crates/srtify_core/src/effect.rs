use std::time::Duration;

use crate::{SelectedFile, SubmissionHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue exactly one upload call with the file payload.
    Upload { file: SelectedFile },
    /// Issue the poll call for `attempt`.
    Poll {
        handle: SubmissionHandle,
        attempt: u32,
    },
    /// Arm the poll timer to fire once after `after`.
    ScheduleTick { after: Duration },
    /// Disarm the poll timer; no further ticks for this submission.
    CancelTicks,
}
