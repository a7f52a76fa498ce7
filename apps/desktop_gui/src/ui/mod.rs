//! UI layer for desktop GUI: app shell, envelope grid, sponsorship form and theme.

pub mod app;
pub mod theme;

pub use app::{DesktopGuiApp, StartupConfig};
