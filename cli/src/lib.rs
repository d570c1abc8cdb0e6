pub mod app;
pub mod args;
pub mod colors;
pub mod display;
pub mod utils;

// Re-export commonly used items
pub use app::ArtistGraphApp;
pub use args::{Args, Command};
pub use utils::format_number;
