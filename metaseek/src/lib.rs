pub mod commands;
pub mod engines;
pub mod handlers;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap_cargo::style::CLAP_STYLING;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_urls_from_file, load_urls_from_source, parse_url_line};
