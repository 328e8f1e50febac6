//! Lists of items, the core tdly document

use crate::document::{Document, DocumentItem, KeyLayout};
use crate::error::InflateError;
use crate::inflater::{DocumentInflater, InflateContext, ItemInflater, ItemInflaterRegistry};
use tdly_schema::{ItemPropertyMap, PropertyError, PropertyRule, PropertySchema};
use tdly_typed::{PropertyMap, PropertyValue};

pub const LIST_TYPE: &str = "List";
pub const ITEM_TYPE: &str = "Item";

const GUID: &str = "guid";
const CONTENT: &str = "content";
const TAGS: &str = "tags";

/// One entry in a [`List`]
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    /// Stable identity; survives reordering and duplicate names
    pub guid: String,
    pub content: String,
    /// Names of the tags attached to this item
    pub tags: Vec<String>,
    /// Every stored property, including ones without a typed field
    pub properties: PropertyMap,
    pub layout: KeyLayout,
}

impl Item {
    /// Generic form, with the typed fields written back into the properties
    #[must_use]
    pub fn to_document_item(&self) -> DocumentItem {
        let mut properties = self.properties.clone();
        properties.insert(GUID.to_string(), self.guid.as_str().into());
        properties.insert(CONTENT.to_string(), self.content.as_str().into());
        write_tags(&mut properties, &self.tags);
        DocumentItem {
            item_type: ITEM_TYPE.to_string(),
            name: self.name.clone(),
            properties,
            layout: self.layout.clone(),
        }
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// An ordered list of items
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub name: String,
    pub relative_path: String,
    pub tags: Vec<String>,
    pub items: Vec<Item>,
    pub properties: PropertyMap,
    pub layout: KeyLayout,
}

impl List {
    /// Generic form, ready for [`Model::write`](crate::Model::write)
    #[must_use]
    pub fn to_document(&self) -> Document {
        let mut properties = self.properties.clone();
        write_tags(&mut properties, &self.tags);
        Document {
            doc_type: LIST_TYPE.to_string(),
            name: self.name.clone(),
            properties,
            relative_path: self.relative_path.clone(),
            items: self.items.iter().map(Item::to_document_item).collect(),
            layout: self.layout.clone(),
        }
    }

    /// Find an item by guid
    #[must_use]
    pub fn item(&self, guid: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.guid == guid)
    }
}

/// Store `tags` unless the list is empty and nothing was stored before
fn write_tags(properties: &mut PropertyMap, tags: &[String]) {
    let stored = properties.get(TAGS).is_some_and(|v| !v.is_absent());
    if !tags.is_empty() || stored {
        let values = tags.iter().map(|t| t.as_str().into()).collect();
        properties.insert(TAGS.to_string(), PropertyValue::Array(values));
    }
}

fn required_str(props: &ItemPropertyMap<'_>, key: &str) -> Result<String, PropertyError> {
    props
        .get_str(key)?
        .map(str::to_string)
        .ok_or_else(|| PropertyError::missing(key))
}

/// Inflates `Item` entries
#[derive(Debug, Clone)]
pub struct ListItemInflater {
    schema: PropertySchema,
}

impl ListItemInflater {
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: PropertySchema::new()
                .with(GUID, PropertyRule::string().required())
                .with(CONTENT, PropertyRule::string().required())
                .with(TAGS, PropertyRule::array_of(PropertyRule::string())),
        }
    }
}

impl Default for ListItemInflater {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemInflater for ListItemInflater {
    type Output = Item;

    fn item_type(&self) -> &str {
        ITEM_TYPE
    }

    fn schema(&self) -> Option<&PropertySchema> {
        Some(&self.schema)
    }

    fn inflate(
        &self,
        _ctx: &InflateContext<'_>,
        item: &DocumentItem,
        props: ItemPropertyMap<'_>,
    ) -> Result<Item, InflateError> {
        Ok(Item {
            name: item.name.clone(),
            guid: required_str(&props, GUID)?,
            content: required_str(&props, CONTENT)?,
            tags: props.force_get_str_list(TAGS)?,
            properties: item.properties.clone(),
            layout: item.layout.clone(),
        })
    }
}

/// Inflates `List` documents
#[derive(Debug)]
pub struct ListInflater {
    schema: PropertySchema,
    items: ItemInflaterRegistry<Item>,
}

impl ListInflater {
    /// # Errors
    /// Only on a registry wiring mistake.
    pub fn new() -> Result<Self, InflateError> {
        Ok(Self {
            schema: PropertySchema::new().with(TAGS, PropertyRule::array_of(PropertyRule::string())),
            items: ItemInflaterRegistry::new().with(ListItemInflater::new())?,
        })
    }
}

impl DocumentInflater for ListInflater {
    type Item = Item;
    type Output = List;

    fn doc_type(&self) -> &str {
        LIST_TYPE
    }

    fn schema(&self) -> Option<&PropertySchema> {
        Some(&self.schema)
    }

    fn items(&self) -> &ItemInflaterRegistry<Item> {
        &self.items
    }

    fn combine(
        &self,
        document: &Document,
        props: ItemPropertyMap<'_>,
        items: Vec<Item>,
    ) -> Result<List, InflateError> {
        tracing::trace!("Inflated list {} with {} items", document.relative_path, items.len());
        Ok(List {
            name: document.name.clone(),
            relative_path: document.relative_path.clone(),
            tags: props.force_get_str_list(TAGS)?,
            items,
            properties: document.properties.clone(),
            layout: document.layout.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(name: &str, guid: &str) -> DocumentItem {
        DocumentItem::new(ITEM_TYPE, name)
            .with_property(GUID, guid)
            .with_property(CONTENT, format!("{name} content"))
    }

    fn list() -> Document {
        Document::new(LIST_TYPE, "todo", "todo.yml")
            .with_property(TAGS, PropertyValue::Array(vec!["home".into()]))
            .with_item(item("weird", "g-1").with_property(TAGS, PropertyValue::Array(vec!["odd".into()])))
            .with_item(item("idk idk", "g-2"))
    }

    #[test]
    fn inflates_list() {
        let list = ListInflater::new().unwrap().inflate(&list()).unwrap();
        assert_eq!(list.name, "todo");
        assert_eq!(list.tags, vec!["home"]);
        assert_eq!(
            list.items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            vec!["weird", "idk idk"]
        );
        assert_eq!(list.items[0].tags, vec!["odd"]);
        assert!(list.items[1].tags.is_empty());
        assert_eq!(list.item("g-2").unwrap().content, "idk idk content");
        assert!(list.items[0].has_tag("ODD"));
    }

    #[test]
    fn missing_guid_is_reported_on_the_item() {
        let doc = Document::new(LIST_TYPE, "todo", "todo.yml")
            .with_item(DocumentItem::new(ITEM_TYPE, "bare").with_property(CONTENT, "x"));
        let err = ListInflater::new().unwrap().inflate(&doc).unwrap_err();
        assert_eq!(
            err,
            InflateError::item(0, "bare", InflateError::Properties(PropertyError::missing(GUID)))
        );
    }

    #[test]
    fn list_tags_must_be_strings() {
        let doc = Document::new(LIST_TYPE, "todo", "todo.yml")
            .with_property(TAGS, PropertyValue::Array(vec![PropertyValue::Integer(1)]));
        let err = ListInflater::new().unwrap().inflate(&doc).unwrap_err();
        match err {
            InflateError::Properties(e) => assert_eq!(e.property_name(), Some("tags[0]")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn back_to_document_preserves_content() {
        let original = list();
        let inflated = ListInflater::new().unwrap().inflate(&original).unwrap();
        let generic = inflated.to_document();
        assert_eq!(generic.items, original.items);
        assert_eq!(generic.properties, original.properties);
        assert_eq!(generic.relative_path, "todo.yml");
    }

    #[test]
    fn null_tags_stay_out_of_the_generic_form() {
        let original = Document::new(LIST_TYPE, "todo", "todo.yml")
            .with_property(TAGS, PropertyValue::Absent)
            .with_item(item("weird", "g-1").with_property(TAGS, PropertyValue::Absent));
        let inflated = ListInflater::new().unwrap().inflate(&original).unwrap();
        assert!(inflated.tags.is_empty());

        let generic = inflated.to_document();
        assert_eq!(generic.properties.get(TAGS), Some(&PropertyValue::Absent));
        assert_eq!(generic.items[0].properties.get(TAGS), Some(&PropertyValue::Absent));
        assert_eq!(
            serde_json::to_string(&generic).unwrap(),
            serde_json::to_string(&original).unwrap()
        );
    }

    #[test]
    fn extra_keys_follow_the_typed_form() {
        let original = list().with_extra("owner", "sam");
        let inflated = ListInflater::new().unwrap().inflate(&original).unwrap();
        assert_eq!(inflated.to_document().layout.extra.get("owner"), Some(&PropertyValue::from("sam")));
    }
}
