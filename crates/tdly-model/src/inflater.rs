//! Inflaters: generic documents into typed ones
//!
//! An [`ItemInflater`] handles exactly one item tag; a [`DocumentInflater`]
//! handles one document tag and owns the registry of its item inflaters.
//! Inflation runs bottom-up: every item is validated and inflated before
//! [`DocumentInflater::combine`] sees any of them.
//!
//! Registries are built once and never mutated. The type-erased
//! [`DynItemInflater`] / [`DynDocumentInflater`] let one registry hold
//! inflaters whose outputs are variants of a single application sum type.

use crate::document::{Document, DocumentItem};
use crate::error::InflateError;
use indexmap::IndexMap;
use std::fmt::{self, Debug, Formatter};
use tdly_schema::{ItemPropertyMap, PropertySchema};

/// Where an inflation is happening
#[derive(Debug, Clone, Copy)]
pub struct InflateContext<'a> {
    pub doc_type: &'a str,
    pub relative_path: &'a str,
}

impl<'a> InflateContext<'a> {
    #[inline]
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        Self {
            doc_type: &document.doc_type,
            relative_path: &document.relative_path,
        }
    }
}

/// Converts one kind of generic item into its typed form
pub trait ItemInflater: Send + Sync + 'static {
    /// The typed item this inflater produces
    type Output;

    /// The single item tag this inflater handles
    fn item_type(&self) -> &str;

    /// Schema the item's properties must satisfy before [`ItemInflater::inflate`] runs
    fn schema(&self) -> Option<&PropertySchema> {
        None
    }

    /// Build the typed item from validated properties
    fn inflate(
        &self,
        ctx: &InflateContext<'_>,
        item: &DocumentItem,
        props: ItemPropertyMap<'_>,
    ) -> Result<Self::Output, InflateError>;
}

/// Type-erased item inflater producing `I`
pub trait DynItemInflater<I>: Send + Sync {
    fn item_type(&self) -> &str;

    /// Validate and inflate
    fn inflate_item(&self, ctx: &InflateContext<'_>, item: &DocumentItem) -> Result<I, InflateError>;
}

impl<P, I> DynItemInflater<I> for P
where
    P: ItemInflater,
    P::Output: Into<I>,
{
    fn item_type(&self) -> &str {
        ItemInflater::item_type(self)
    }

    fn inflate_item(&self, ctx: &InflateContext<'_>, item: &DocumentItem) -> Result<I, InflateError> {
        let props = ItemPropertyMap::new(&item.properties, self.schema())?;
        self.inflate(ctx, item, props).map(Into::into)
    }
}

/// Item inflaters keyed by tag, in registration order
pub struct ItemInflaterRegistry<I> {
    inflaters: IndexMap<String, Box<dyn DynItemInflater<I>>>,
}

impl<I> ItemInflaterRegistry<I> {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflaters: IndexMap::new(),
        }
    }

    /// Register an inflater (builder style)
    ///
    /// # Errors
    /// [`InflateError::DuplicateItemType`] if the tag is already taken.
    pub fn with<P>(mut self, inflater: P) -> Result<Self, InflateError>
    where
        P: DynItemInflater<I> + 'static,
    {
        let tag = inflater.item_type().to_string();
        if self.inflaters.contains_key(&tag) {
            return Err(InflateError::DuplicateItemType(tag));
        }
        self.inflaters.insert(tag, Box::new(inflater));
        Ok(self)
    }

    /// Find the inflater for an item tag
    #[must_use]
    pub fn get(&self, item_type: &str) -> Option<&dyn DynItemInflater<I>> {
        self.inflaters.get(item_type).map(|i| &**i)
    }

    /// Registered tags, in registration order
    pub fn item_types(&self) -> impl Iterator<Item = &str> {
        self.inflaters.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inflaters.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inflaters.is_empty()
    }

    /// Inflate every item, in order
    ///
    /// # Errors
    /// - [`InflateError::UnregisteredItemType`] if an item's tag has no inflater
    /// - [`InflateError::Item`] wrapping the first item that fails to inflate
    pub fn inflate_all(&self, ctx: &InflateContext<'_>, items: &[DocumentItem]) -> Result<Vec<I>, InflateError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let inflater = self
                    .get(&item.item_type)
                    .ok_or_else(|| InflateError::UnregisteredItemType(item.item_type.clone()))?;
                inflater
                    .inflate_item(ctx, item)
                    .map_err(|source| InflateError::item(index, &item.name, source))
            })
            .collect()
    }
}

impl<I> Default for ItemInflaterRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Debug for ItemInflaterRegistry<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemInflaterRegistry")
            .field("item_types", &self.item_types().collect::<Vec<_>>())
            .finish()
    }
}

/// Converts one kind of generic document into its typed form
pub trait DocumentInflater: Send + Sync + 'static {
    /// Typed item produced by the item registry
    type Item;
    /// The typed document this inflater produces
    type Output;

    /// The document tag this inflater handles
    fn doc_type(&self) -> &str;

    /// Schema the document's own properties must satisfy
    fn schema(&self) -> Option<&PropertySchema> {
        None
    }

    /// Inflaters for the items this document may contain
    fn items(&self) -> &ItemInflaterRegistry<Self::Item>;

    /// Assemble the typed document from its validated parts
    fn combine(
        &self,
        document: &Document,
        props: ItemPropertyMap<'_>,
        items: Vec<Self::Item>,
    ) -> Result<Self::Output, InflateError>;

    /// Validate document properties, inflate every item, then combine
    fn inflate(&self, document: &Document) -> Result<Self::Output, InflateError> {
        let ctx = InflateContext::new(document);
        let props = ItemPropertyMap::new(&document.properties, self.schema())?;
        let items = self.items().inflate_all(&ctx, &document.items)?;
        self.combine(document, props, items)
    }
}

/// Type-erased document inflater producing `D`
pub trait DynDocumentInflater<D>: Send + Sync {
    fn doc_type(&self) -> &str;

    /// Item tags this document type permits
    fn item_types(&self) -> Vec<&str>;

    fn inflate_document(&self, document: &Document) -> Result<D, InflateError>;
}

impl<P, D> DynDocumentInflater<D> for P
where
    P: DocumentInflater,
    P::Output: Into<D>,
{
    fn doc_type(&self) -> &str {
        DocumentInflater::doc_type(self)
    }

    fn item_types(&self) -> Vec<&str> {
        self.items().item_types().collect()
    }

    fn inflate_document(&self, document: &Document) -> Result<D, InflateError> {
        self.inflate(document).map(Into::into)
    }
}

/// Document inflaters keyed by tag
pub struct DocumentInflaterRegistry<D> {
    inflaters: IndexMap<String, Box<dyn DynDocumentInflater<D>>>,
}

impl<D> DocumentInflaterRegistry<D> {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflaters: IndexMap::new(),
        }
    }

    /// Register an inflater (builder style)
    ///
    /// # Errors
    /// [`InflateError::DuplicateDocumentType`] if the tag is already taken.
    pub fn with<P>(mut self, inflater: P) -> Result<Self, InflateError>
    where
        P: DynDocumentInflater<D> + 'static,
    {
        let tag = inflater.doc_type().to_string();
        if self.inflaters.contains_key(&tag) {
            return Err(InflateError::DuplicateDocumentType(tag));
        }
        self.inflaters.insert(tag, Box::new(inflater));
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, doc_type: &str) -> Option<&dyn DynDocumentInflater<D>> {
        self.inflaters.get(doc_type).map(|i| &**i)
    }

    /// Registered tags, in registration order
    pub fn doc_types(&self) -> impl Iterator<Item = &str> {
        self.inflaters.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inflaters.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inflaters.is_empty()
    }
}

impl<D> Default for DocumentInflaterRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Debug for DocumentInflaterRegistry<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentInflaterRegistry")
            .field("doc_types", &self.doc_types().collect::<Vec<_>>())
            .finish()
    }
}
