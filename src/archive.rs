//! Groups posts into year buckets for the archive listing. See
//! [`group_by_year`].

use crate::date::parse_date;
use crate::post::Post;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The `year` of the bucket holding posts whose date couldn't be parsed.
pub const UNDATED: &str = "undated";

/// A [`Post`] paired with its parsed date. The post itself is borrowed and
/// left as is; `published` is `None` if the post's date couldn't be parsed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatedPost<'a> {
    #[serde(flatten)]
    pub post: &'a Post,

    pub published: Option<DateTime<Utc>>,
}

impl<'a> DatedPost<'a> {
    pub fn new(post: &'a Post) -> DatedPost<'a> {
        DatedPost {
            post,
            published: parse_date(&post.date),
        }
    }
}

/// The posts of one calendar year, newest first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YearBucket<'a> {
    /// The four-digit year of every post in the bucket, or [`UNDATED`].
    pub year: String,

    pub posts: Vec<DatedPost<'a>>,
}

/// What to do with posts whose date can't be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Refuse them (see [`check_dates`]).
    Strict,

    /// Accept them; [`group_by_year`] puts them in the [`UNDATED`] bucket.
    Lenient,
}

impl Default for DatePolicy {
    fn default() -> Self {
        DatePolicy::Strict
    }
}

/// Partitions `posts` into year buckets. Buckets are ordered by year, most
/// recent first, and the posts in each bucket are ordered by date, most
/// recent first; posts sharing the same instant come out in the reverse of
/// their input order. Only years with at least one post get a bucket.
///
/// Posts whose date can't be parsed are collected, in input order, in a
/// final bucket whose year is [`UNDATED`]. Use [`check_dates`] beforehand to
/// refuse them instead.
pub fn group_by_year(posts: &[Post]) -> Vec<YearBucket<'_>> {
    let mut years: BTreeMap<i32, Vec<(DateTime<Utc>, DatedPost)>> = BTreeMap::new();
    let mut undated: Vec<DatedPost> = Vec::new();

    for post in posts {
        let dated = DatedPost::new(post);
        let published = dated.published;
        match published {
            Some(published) => years
                .entry(published.year())
                .or_default()
                .push((published, dated)),
            None => {
                tracing::warn!(
                    slug = %post.slug,
                    date = %post.date,
                    "post date could not be parsed; filing it as undated"
                );
                undated.push(dated);
            }
        }
    }

    let mut buckets: Vec<YearBucket> = years
        .into_iter()
        .rev()
        .map(|(year, mut posts)| {
            // Stable ascending sort, then reverse: newest first, and ties in
            // reverse input order.
            posts.sort_by_key(|(published, _)| *published);
            YearBucket {
                year: year.to_string(),
                posts: posts.into_iter().rev().map(|(_, post)| post).collect(),
            }
        })
        .collect();

    if !undated.is_empty() {
        buckets.push(YearBucket {
            year: UNDATED.to_owned(),
            posts: undated,
        });
    }

    buckets
}

/// Applies `policy` to the dates of `posts`: under [`DatePolicy::Strict`] the
/// first post whose date can't be parsed is reported as an error.
pub fn check_dates(posts: &[Post], policy: DatePolicy) -> Result<()> {
    if policy == DatePolicy::Lenient {
        return Ok(());
    }
    match posts.iter().find(|post| parse_date(&post.date).is_none()) {
        None => Ok(()),
        Some(post) => Err(Error::InvalidDate {
            slug: post.slug.clone(),
            date: post.date.clone(),
        }),
    }
}

/// The result of a fallible archive operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error preparing the archive.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned under [`DatePolicy::Strict`] for a post whose date can't be
    /// parsed.
    InvalidDate { slug: String, date: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidDate { slug, date } => {
                write!(f, "post `{}` has an invalid date: {:?}", slug, date)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
