//! UI rendering module for the carbon intensity dashboard
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard;
pub mod generation_chart;
pub mod help_overlay;
pub mod intensity_chart;

pub use dashboard::render as render_dashboard;
pub use dashboard::render_error;
pub use help_overlay::render as render_help_overlay;
