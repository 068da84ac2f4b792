//! Extracts the flat list of [`Heading`]s from a markdown document, in the
//! shape [`crate::toc::group_levels`] consumes.

use crate::toc::Heading;
use pulldown_cmark::{Event, Options, Parser, Tag};
use std::collections::HashMap;

/// Returns the headings of `markdown` in document order. Each heading gets
/// its level as `depth`, its inline text as `value` and a GitHub-style
/// anchor as `id` (see [`Anchors`]).
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut anchors = Anchors::default();
    let mut headings = Vec::new();
    let mut current: Option<(u32, String)> = None;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading(depth)) => {
                current = Some((depth, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, value)) = current.as_mut() {
                    value.push(' ');
                }
            }
            Event::End(Tag::Heading(_)) => {
                if let Some((depth, value)) = current.take() {
                    let value = value.trim().to_owned();
                    headings.push(Heading {
                        id: anchors.anchor(&value),
                        value,
                        depth,
                    });
                }
            }
            _ => {}
        }
    }

    headings
}

/// Hands out unique anchors for heading texts. The first heading with a
/// given slug gets the bare slug; later ones get `-1`, `-2`, ... appended,
/// skipping suffixes that are already taken.
#[derive(Default)]
pub struct Anchors {
    occurrences: HashMap<String, usize>,
}

impl Anchors {
    pub fn anchor(&mut self, value: &str) -> String {
        let base = slug::slugify(value);
        let mut id = base.clone();
        while self.occurrences.contains_key(&id) {
            let count = self.occurrences.entry(base.clone()).or_insert(0);
            *count += 1;
            id = format!("{}-{}", base, count);
        }
        self.occurrences.insert(id.clone(), 0);
        id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn heading(id: &str, value: &str, depth: u32) -> Heading {
        Heading {
            id: id.to_owned(),
            value: value.to_owned(),
            depth,
        }
    }

    #[test]
    fn test_extract_headings() {
        let markdown = "Intro paragraph.\n\n\
            ## Why JavaScript and not PHP or another language\n\n\
            Some text.\n\n\
            ### Knowing *new* technologies\n\n\
            #### The `cargo` tool\n";

        assert_eq!(
            vec![
                heading(
                    "why-javascript-and-not-php-or-another-language",
                    "Why JavaScript and not PHP or another language",
                    2,
                ),
                heading("knowing-new-technologies", "Knowing new technologies", 3),
                heading("the-cargo-tool", "The cargo tool", 4),
            ],
            extract_headings(markdown)
        );
    }

    #[test]
    fn test_extract_setext_headings() {
        let markdown = "Title\n=====\n\nSection\n-------\n";
        assert_eq!(
            vec![heading("title", "Title", 1), heading("section", "Section", 2)],
            extract_headings(markdown)
        );
    }

    #[test]
    fn test_extract_ignores_hashes_in_code_blocks() {
        let markdown = "```sh\n# not a heading\n```\n\n## Real\n";
        assert_eq!(vec![heading("real", "Real", 2)], extract_headings(markdown));
    }

    #[test]
    fn test_extract_no_headings() {
        assert!(extract_headings("just a paragraph").is_empty());
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let markdown = "## Setup\n\n## Setup\n\n## Setup\n";
        let ids: Vec<String> = extract_headings(markdown)
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(vec!["setup", "setup-1", "setup-2"], ids);
    }

    #[test]
    fn test_anchor_skips_taken_suffixes() {
        let mut anchors = Anchors::default();
        assert_eq!("a-1", anchors.anchor("a 1"));
        assert_eq!("a", anchors.anchor("a"));
        assert_eq!("a-2", anchors.anchor("a"));
    }
}
