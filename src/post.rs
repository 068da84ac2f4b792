//! Defines the [`Post`] and [`Page`] records produced by
//! [`crate::parser::Parser`], plus the route derivation for posts.

use chrono::NaiveDate;
use serde::Serialize;
use url::Url;

/// A blog post, i.e., a content file whose frontmatter carries `tags`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Post {
    /// The file stem of the source file (or the directory name for a bundle),
    /// e.g., `2021-04-19-why-did-i-create-a-blog-from-scratch`.
    pub slug: String,

    /// The site-relative route, e.g.,
    /// `/blog/2021/04/why-did-i-create-a-blog-from-scratch/`. See
    /// [`post_route`].
    pub path: String,

    /// The absolute URL of the post (`site_root` joined with `path`).
    pub url: Url,

    /// The title of the post.
    pub title: String,

    /// The date of the post exactly as written in the frontmatter. Parsing
    /// happens in [`crate::archive`] and never rewrites this field.
    pub date: String,

    /// The short description of the post, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The tags associated with the post.
    pub tags: Vec<String>,

    /// The markdown body that follows the frontmatter.
    #[serde(skip)]
    pub body: String,
}

/// A standalone page (about, labs, ...), i.e., a content file without `tags`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    pub slug: String,

    /// The route, taken verbatim from the `path` frontmatter field.
    pub path: String,

    pub url: Url,

    /// The name of the template that renders the page (`templateFileName`).
    pub template: String,
}

/// Derives the route of a post from its slug. The slug must start with a
/// `YYYY-MM-DD-` date prefix followed by the title part; the route is
/// `/blog/YYYY/MM/{title part}/`. Returns `None` if the slug doesn't follow
/// that convention.
pub fn post_route(slug: &str) -> Option<String> {
    const DATE_PREFIX_LEN: usize = "YYYY-MM-DD".len();

    let date_prefix = slug.get(..DATE_PREFIX_LEN)?;
    let bytes = date_prefix.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(date_prefix, "%Y-%m-%d").ok()?;

    let title = slug[DATE_PREFIX_LEN..].strip_prefix('-')?;
    if title.is_empty() {
        return None;
    }

    Some(format!(
        "/blog/{}/{}/{}/",
        &date_prefix[..4],
        &date_prefix[5..7],
        title
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_post_route() {
        assert_eq!(
            Some(String::from("/blog/2021/04/why-did-i-create-a-blog-from-scratch/")),
            post_route("2021-04-19-why-did-i-create-a-blog-from-scratch"),
        );
    }

    #[test]
    fn test_post_route_keeps_dashes_in_title() {
        assert_eq!(
            Some(String::from("/blog/2023/12/a-b-c/")),
            post_route("2023-12-01-a-b-c"),
        );
    }

    #[test]
    fn test_post_route_rejects_slugs_without_date() {
        assert_eq!(None, post_route("about"));
        assert_eq!(None, post_route("2021-04-19"));
        assert_eq!(None, post_route("2021-04-19-"));
        assert_eq!(None, post_route("2021-04-19_title"));
        assert_eq!(None, post_route("2021-14-19-title"));
        assert_eq!(None, post_route("20ç1-04-19-title"));
    }
}
