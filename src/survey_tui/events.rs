//! Event handling for the survey TUI

use crate::errors::SubmissionError;
use crate::models::SubmissionResult;

/// Events delivered to the app loop from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// The submission task finished
    SubmissionFinished(Result<SubmissionResult, SubmissionError>),
}
