//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single-screen assessment view: patient form, prediction panel and
//! disclaimer footer.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
