//! Screens of the survey TUI

pub mod survey;

pub use survey::{SurveyField, SurveyScreen};
