//! Research-paper metadata explorer.
//!
//! Loads a CORD-19 style metadata file once, normalizes it into an immutable
//! [`data::model::Dataset`], and derives the filtered views a dashboard
//! renders: papers per year, top journals, an overview table, the title text
//! for a word cloud and summary statistics.
//!
//! ```no_run
//! use paper_explorer::cache::DatasetCache;
//! use paper_explorer::data::filter::filter_by_year;
//! use paper_explorer::data::stats::{summary, top_journals};
//!
//! # fn main() -> Result<(), paper_explorer::ExplorerError> {
//! let cache = DatasetCache::default();
//! let dataset = cache.get_or_load("metadata.csv")?;
//! let view = filter_by_year(&dataset, 2020, 2021)?;
//! for entry in top_journals(&view, 5)? {
//!     println!("{}: {}", entry.journal, entry.count);
//! }
//! println!("{:?}", summary(&view));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use error::{ExplorerError, ExplorerResult};
