//! Reusable UI components for the survey TUI

pub mod form_field;
pub mod status_display;

pub use form_field::{ChoiceField, FormField};
pub use status_display::{StatusDisplay, StatusType};
