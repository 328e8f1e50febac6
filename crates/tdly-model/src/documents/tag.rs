//! Tags: named labels with optional aliases
//!
//! Tag names and aliases compare case-insensitively.

use crate::document::{Document, DocumentItem};
use crate::error::InflateError;
use crate::inflater::{DocumentInflater, InflateContext, ItemInflater, ItemInflaterRegistry};
use tdly_schema::{ItemPropertyMap, PropertyRule, PropertySchema};

pub const TAGS_TYPE: &str = "Tags";
pub const TAG_TYPE: &str = "Tag";

const DESCRIPTION: &str = "description";
const ALIASES: &str = "aliases";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
}

impl Tag {
    /// Whether `name` is this tag's name or one of its aliases
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// A document of tag definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags {
    pub name: String,
    pub relative_path: String,
    pub tags: Vec<Tag>,
}

impl Tags {
    /// Find a tag by name or alias
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.matches(name))
    }
}

/// Inflates `Tag` entries
#[derive(Debug, Clone)]
pub struct TagInflater {
    schema: PropertySchema,
}

impl TagInflater {
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: PropertySchema::new()
                .with(DESCRIPTION, PropertyRule::string())
                .with(ALIASES, PropertyRule::array_of(PropertyRule::string())),
        }
    }
}

impl Default for TagInflater {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemInflater for TagInflater {
    type Output = Tag;

    fn item_type(&self) -> &str {
        TAG_TYPE
    }

    fn schema(&self) -> Option<&PropertySchema> {
        Some(&self.schema)
    }

    fn inflate(
        &self,
        _ctx: &InflateContext<'_>,
        item: &DocumentItem,
        props: ItemPropertyMap<'_>,
    ) -> Result<Tag, InflateError> {
        Ok(Tag {
            name: item.name.clone(),
            description: props.get_str(DESCRIPTION)?.map(str::to_string),
            aliases: props.force_get_str_list(ALIASES)?,
        })
    }
}

/// Inflates `Tags` documents
#[derive(Debug)]
pub struct TagsInflater {
    items: ItemInflaterRegistry<Tag>,
}

impl TagsInflater {
    /// # Errors
    /// Only on a registry wiring mistake.
    pub fn new() -> Result<Self, InflateError> {
        Ok(Self {
            items: ItemInflaterRegistry::new().with(TagInflater::new())?,
        })
    }
}

impl DocumentInflater for TagsInflater {
    type Item = Tag;
    type Output = Tags;

    fn doc_type(&self) -> &str {
        TAGS_TYPE
    }

    fn items(&self) -> &ItemInflaterRegistry<Tag> {
        &self.items
    }

    fn combine(
        &self,
        document: &Document,
        _props: ItemPropertyMap<'_>,
        items: Vec<Tag>,
    ) -> Result<Tags, InflateError> {
        Ok(Tags {
            name: document.name.clone(),
            relative_path: document.relative_path.clone(),
            tags: items,
        })
    }
}
