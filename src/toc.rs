//! Builds the nested table of contents of a document from its flat list of
//! headings.
//!
//! Nesting is decided pairwise: each heading is compared only with the most
//! recent top-level node, and when their depths differ the heading is merged
//! into that node's children by the same rule. Depths are compared for
//! inequality, not ordering, so a shallower heading following a deeper one
//! is nested too, and a `##` followed by a `#####` nests directly without
//! intermediate levels. Documents whose heading levels go up and down in
//! unusual ways can produce trees their authors don't expect.

use serde::{Deserialize, Serialize};

/// A heading as found in the document, in document order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// The anchor of the heading (without the leading `#`).
    pub id: String,

    /// The plain text of the heading.
    pub value: String,

    /// The markdown level of the heading (2 for `##`, 3 for `###`, ...).
    pub depth: u32,
}

/// A [`Heading`] placed in the table-of-contents tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeadingNode {
    pub id: String,
    pub value: String,
    pub depth: u32,

    /// The nested headings, or `None` if nothing was ever nested under this
    /// one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headings: Option<Vec<HeadingNode>>,
}

impl From<&Heading> for HeadingNode {
    fn from(heading: &Heading) -> HeadingNode {
        HeadingNode {
            id: heading.id.clone(),
            value: heading.value.clone(),
            depth: heading.depth,
            headings: None,
        }
    }
}

/// Groups a flat list of headings into the table-of-contents tree. The
/// input is left untouched; the nodes in the result are copies.
pub fn group_levels(headings: &[Heading]) -> Vec<HeadingNode> {
    headings
        .iter()
        .map(HeadingNode::from)
        .fold(Vec::new(), merge)
}

/// Extracts the headings of a markdown document and groups them. See
/// [`crate::heading::extract_headings`] and [`group_levels`].
pub fn table_of_contents(markdown: &str) -> Vec<HeadingNode> {
    group_levels(&crate::heading::extract_headings(markdown))
}

fn merge(mut siblings: Vec<HeadingNode>, current: HeadingNode) -> Vec<HeadingNode> {
    match siblings.pop() {
        None => siblings.push(current),
        Some(mut last) if last.depth != current.depth => {
            last.headings = Some(match last.headings.take() {
                Some(children) => merge(children, current),
                None => vec![current],
            });
            siblings.push(last);
        }
        Some(last) => {
            siblings.push(last);
            siblings.push(current);
        }
    }
    siblings
}

// Builders for spelling out expected trees in tests.
#[cfg(test)]
impl HeadingNode {
    pub(crate) fn leaf(id: &str, value: &str, depth: u32) -> HeadingNode {
        HeadingNode {
            id: id.to_owned(),
            value: value.to_owned(),
            depth,
            headings: None,
        }
    }

    pub(crate) fn with_headings(mut self, children: Vec<HeadingNode>) -> HeadingNode {
        self.headings = Some(children);
        self
    }
}
