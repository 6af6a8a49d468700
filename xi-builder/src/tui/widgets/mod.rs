// TUI widget modules for each screen panel.

pub mod clusters;
pub mod estimate;
pub mod quit_confirm;
pub mod search;
pub mod squad;
pub mod stats;
pub mod status_bar;
