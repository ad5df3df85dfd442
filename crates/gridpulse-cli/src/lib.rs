pub mod cli;
pub mod menu;
pub mod render;

pub use cli::{Cli, OutputFormat};
pub use menu::{run_menu, MenuCommand};
pub use render::Presenter;
