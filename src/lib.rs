//! Terminal survey on technology usage and its impact on sleep patterns

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod form;
pub mod models;
pub mod questions;
pub mod survey_tui;
