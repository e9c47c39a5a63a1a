//! Survey Terminal User Interface (TUI)
//!
//! Renders the sleep survey as a terminal form and drives the submit flow
//! of [`crate::form::SurveyForm`].

pub mod app;
pub mod components;
pub mod events;
pub mod handlers;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::App;
pub use events::AppEvent;
pub use screens::SurveyScreen;
