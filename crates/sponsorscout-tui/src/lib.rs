// Terminal UI implementation using ratatui
// The storefront of SponsorScout

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, InputMode, SidebarField};
pub use runner::run_tui;
