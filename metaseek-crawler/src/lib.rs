pub mod crawler;
pub mod error;
pub mod filter;
pub mod result;
pub mod robots;

pub use crawler::Crawler;
pub use error::CrawlError;
pub use filter::ContentFilter;
pub use result::{CrawlEntry, LinkMap};
pub use robots::RobotsPolicy;
