pub mod interactive;
pub mod render;

pub use interactive::run_interactive_ui;
pub use render::{draw_load_error, draw_panel, format_window_line};
