//! Small helpers shared by the config parser.
//!
//! - **URL validation**: sanity check for the configured feed URL

mod url_validator;

pub use url_validator::{validate_feed_url, FeedUrlError};
