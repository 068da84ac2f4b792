//! Conversions of archive and table-of-contents data into template
//! [`Value`]s for the rendering layer.

use crate::archive::{DatedPost, YearBucket};
use crate::post::Post;
use crate::toc::HeadingNode;
use gtmpl_value::Value;
use std::collections::HashMap;

fn string(s: &str) -> Value {
    Value::String(s.to_owned())
}

impl From<&Post> for Value {
    /// Converts a [`Post`] into a [`Value::Object`] with fields `slug`,
    /// `path`, `url`, `title`, `date`, `description` and `tags`. The body is
    /// left out.
    fn from(post: &Post) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("slug".to_owned(), string(&post.slug));
        m.insert("path".to_owned(), string(&post.path));
        m.insert("url".to_owned(), string(post.url.as_str()));
        m.insert("title".to_owned(), string(&post.title));
        m.insert("date".to_owned(), string(&post.date));
        m.insert(
            "description".to_owned(),
            match &post.description {
                Some(description) => string(description),
                None => Value::Nil,
            },
        );
        m.insert(
            "tags".to_owned(),
            Value::Array(post.tags.iter().map(|t| string(t)).collect()),
        );
        Value::Object(m)
    }
}

impl From<&DatedPost<'_>> for Value {
    /// Same as the [`Post`] conversion plus `published`, the parsed date in
    /// RFC 3339 (or nil).
    fn from(dated: &DatedPost) -> Value {
        let mut value = Value::from(dated.post);
        if let Value::Object(m) = &mut value {
            m.insert(
                "published".to_owned(),
                match dated.published {
                    Some(published) => Value::String(published.to_rfc3339()),
                    None => Value::Nil,
                },
            );
        }
        value
    }
}

impl From<&YearBucket<'_>> for Value {
    fn from(bucket: &YearBucket) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("year".to_owned(), string(&bucket.year));
        m.insert(
            "posts".to_owned(),
            Value::Array(bucket.posts.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}

impl From<&HeadingNode> for Value {
    /// Converts a [`HeadingNode`] into a [`Value::Object`] with fields `id`,
    /// `value`, `depth`, `anchor` (`#{id}`) and, only for nodes with nested
    /// headings, `headings`.
    fn from(node: &HeadingNode) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("id".to_owned(), string(&node.id));
        m.insert("value".to_owned(), string(&node.value));
        m.insert("depth".to_owned(), Value::from(i64::from(node.depth)));
        m.insert("anchor".to_owned(), Value::String(format!("#{}", node.id)));
        if let Some(children) = &node.headings {
            m.insert(
                "headings".to_owned(),
                Value::Array(children.iter().map(Value::from).collect()),
            );
        }
        Value::Object(m)
    }
}
