//! Output generation for accepted records.
//!
//! # Submodules
//!
//! - [`pages`]: One Svelte page per record, via a selectable [`pages::PageRenderer`]
//! - [`json`]: The consolidated `articles.json` index for the listing page
//! - [`feed`]: The optional RSS feed
//!
//! # Output Structure
//!
//! ```text
//! src/routes/thoughts/
//! ├── shipping-rust-at-work/
//! │   └── +page.svelte
//! └── another-article/
//!     └── +page.svelte
//!
//! src/lib/data/articles.json
//! static/thoughts/rss.xml      # only when a feed is configured
//! ```

pub mod feed;
pub mod json;
pub mod pages;
