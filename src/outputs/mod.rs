//! Output generation for scraped articles.
//!
//! - [`json`]: pretty-printed JSON, either to stdout or one file per outlet

pub mod json;
