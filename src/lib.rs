pub mod encoding;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod group;
pub mod report;

pub use error::ScrapeError;
