//! Defines the [`Parser`], [`Content`], and [`Error`] types: the logic for
//! reading posts and pages from the content directory into memory.

use std::{
    cmp::Reverse,
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use url::Url;
use walkdir::WalkDir;

use crate::{
    date::parse_date,
    post::{post_route, Page, Post},
};

const FENCE: &str = "---";
const MARKDOWN_EXTENSION: &str = "md";
const BUNDLE_INDEX: &str = "index.md";

/// Parses [`Post`] and [`Page`] objects from source files.
pub struct Parser<'a> {
    /// `site_root` is the base URL of the site. Every post and page URL is
    /// its route joined onto `site_root`, so it should end in a slash.
    site_root: &'a Url,
}

/// Everything found in a content directory.
#[derive(Debug, Default)]
pub struct Content {
    /// The posts, most recent first.
    pub posts: Vec<Post>,

    /// The pages, ordered by route.
    pub pages: Vec<Page>,
}

/// A single parsed content file.
#[derive(Debug)]
pub enum Entry {
    Post(Post),
    Page(Page),
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(site_root: &'a Url) -> Parser<'a> {
        Parser { site_root }
    }

    /// Walks `source_directory` recursively and parses every markdown file
    /// (extension `.md`) in it. Each file must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Markdown body
    ///
    /// Files whose frontmatter has a `tags` field are posts; they need a
    /// `date`, and their file name must start with the post date, e.g.:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2021-04-16T10:00:00.000Z
    /// tags: [greet]
    /// ---
    /// ## Hello
    ///
    /// World
    /// ```
    ///
    /// saved as `2021-04-16-hello-world.md` (or
    /// `2021-04-16-hello-world/index.md` as a bundle). Other files are
    /// pages and need `path` and `templateFileName` fields instead.
    pub fn parse_content(&self, source_directory: &Path) -> Result<Content> {
        let mut content = Content::default();
        let walker = WalkDir::new(source_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));
        for result in walker {
            let entry = result?;
            let is_markdown = entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map_or(false, |ext| ext == MARKDOWN_EXTENSION);
            if !is_markdown {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(source_directory)
                // can't fail; `source_directory` is the root of the walk
                .unwrap_or_else(|_| entry.path());
            match self.parse_file(source_directory, relative_path)? {
                Entry::Post(post) => content.posts.push(post),
                Entry::Page(page) => content.pages.push(page),
            }
        }

        content.posts.sort_by_cached_key(|post| {
            (
                Reverse(parse_date(&post.date)),
                Reverse(post.date.clone()),
                post.slug.clone(),
            )
        });
        content.pages.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::info!(
            directory = %source_directory.display(),
            posts = content.posts.len(),
            pages = content.pages.len(),
            "parsed content directory"
        );
        Ok(content)
    }

    fn parse_file(&self, source_directory: &Path, relative_path: &Path) -> Result<Entry> {
        match self._parse_file(source_directory, relative_path) {
            Ok(entry) => Ok(entry),
            Err(e) => Err(Error::Annotated(
                format!("parsing `{}`", relative_path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_file(&self, source_directory: &Path, relative_path: &Path) -> Result<Entry> {
        let contents = std::fs::read_to_string(source_directory.join(relative_path))?;
        let slug = slug_for(relative_path)?;
        tracing::debug!(path = %relative_path.display(), slug, "parsing content file");
        self.parse_entry(slug, &contents)
    }

    /// Parses a single content file given its slug and its contents. See
    /// [`Parser::parse_content`] for the expected structure.
    pub fn parse_entry(&self, slug: &str, input: &str) -> Result<Entry> {
        let (frontmatter, body) = split_frontmatter(input)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(frontmatter)?;

        match frontmatter.tags {
            Some(tags) => {
                let date = frontmatter.date.ok_or(Error::MissingField("date"))?;
                let path = post_route(slug)
                    .ok_or_else(|| Error::InvalidSlug(slug.to_owned()))?;
                Ok(Entry::Post(Post {
                    url: self.url_for(&path)?,
                    path,
                    slug: slug.to_owned(),
                    title: frontmatter.title,
                    date,
                    description: frontmatter.description,
                    tags,
                    body: body.to_owned(),
                }))
            }
            None => {
                let path = frontmatter.path.ok_or(Error::MissingField("path"))?;
                let template = frontmatter
                    .template_file_name
                    .ok_or(Error::MissingField("templateFileName"))?;
                Ok(Entry::Page(Page {
                    url: self.url_for(&path)?,
                    path,
                    slug: slug.to_owned(),
                    template,
                }))
            }
        }
    }

    fn url_for(&self, route: &str) -> Result<Url> {
        Ok(self.site_root.join(route.trim_start_matches('/'))?)
    }
}

/// Splits a content file into its YAML frontmatter and its markdown body.
/// Both fences must be lines of their own, so `---` inside a frontmatter
/// value doesn't end the frontmatter.
pub fn split_frontmatter(input: &str) -> Result<(&str, &str)> {
    match input.strip_prefix(FENCE) {
        Some(rest) if ends_line(rest) => {}
        _ => return Err(Error::FrontmatterMissingStartFence),
    }

    let mut offset = FENCE.len();
    loop {
        let found = input[offset..]
            .find("\n---")
            .ok_or(Error::FrontmatterMissingEndFence)?;
        let yaml_stop = offset + found + 1;
        let body = &input[yaml_stop + FENCE.len()..];
        if ends_line(body) {
            return Ok((&input[FENCE.len()..yaml_stop], body));
        }
        offset = yaml_stop;
    }
}

// True if `rest` is empty or starts with a line break.
fn ends_line(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n")
}

/// Returns the markdown body of `input`, skipping the frontmatter if there
/// is any.
pub fn markdown_body(input: &str) -> &str {
    match split_frontmatter(input) {
        Ok((_, body)) => body,
        Err(_) => input,
    }
}

/// The slug of a content file is its file stem, or the name of its
/// directory for a bundle (`{slug}/index.md`).
fn slug_for(relative_path: &Path) -> Result<&str> {
    let invalid = || Error::InvalidFileName(relative_path.to_owned());
    let name = if relative_path.ends_with(BUNDLE_INDEX) {
        relative_path.parent().and_then(Path::file_name)
    } else {
        relative_path.file_stem()
    };
    name.ok_or_else(invalid)?.to_str().ok_or_else(invalid)
}

#[derive(Deserialize)]
struct Frontmatter {
    #[serde(default)]
    title: String,

    date: Option<String>,

    description: Option<String>,

    /// Present (even if empty) for posts only.
    tags: Option<Vec<String>>,

    path: Option<String>,

    #[serde(rename = "templateFileName")]
    template_file_name: Option<String>,
}

/// Represents the result of a parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing content files.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a required frontmatter field is absent.
    MissingField(&'static str),

    /// Returned when a post's slug doesn't start with its `YYYY-MM-DD-` date.
    InvalidSlug(String),

    /// Returned when there is a problem joining routes onto the site root.
    UrlParse(url::ParseError),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Content file must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::MissingField(field) => {
                write!(f, "Missing frontmatter field `{}`", field)
            }
            Error::InvalidSlug(slug) => write!(
                f,
                "Post file name `{}` must start with `YYYY-MM-DD-`",
                slug
            ),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::MissingField(_) => None,
            Error::InvalidSlug(_) => None,
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the content directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
