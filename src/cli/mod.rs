pub mod args;
pub mod handlers;
pub mod setup_tui;
