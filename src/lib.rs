//! The library code for `gazette`, the content layer of a markdown blog. The
//! work splits into three steps:
//!
//! 1. Parsing posts and pages from the content directory ([`crate::parser`])
//! 2. Grouping posts into year buckets for the archive listing
//!    ([`crate::archive`])
//! 3. Building each post's table of contents from its headings
//!    ([`crate::heading`] extracts them, [`crate::toc`] nests them)
//!
//! The year and table-of-contents results are plain data. The rendering
//! layer consumes them either through `serde` or as template values
//! ([`crate::value`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod archive;
pub mod config;
pub mod date;
pub mod heading;
pub mod parser;
pub mod post;
pub mod toc;
pub mod value;
