//! Type definitions for the notification dispatcher

/// How a dispatch ended. Never an error: the caller's operation has already
/// committed and is not affected by any of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The queue accepted the job within the wait ceiling
    Submitted(String),
    /// The queue answered with an error, or the submission task failed
    Rejected,
    /// The wait ceiling elapsed first; the submission keeps running detached
    TimedOut,
}

impl DispatchOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, DispatchOutcome::Submitted(_))
    }
}
