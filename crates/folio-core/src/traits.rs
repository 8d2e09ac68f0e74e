//! Collaborator abstractions.
//!
//! The conversion pipeline talks to four external services. Each is modeled
//! as a trait so the network clients in `folio-wikibase` and the in-memory
//! doubles in [`crate::test_support`] are interchangeable.

use crate::error::LookupResult;
use crate::fragment::RawFragment;
use crate::ids::{ItemId, PropertyId};
use crate::item::Item;
use async_trait::async_trait;

/// Produces the metadata fragments embedded in a source document's page.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Fragments for `title`, in document order.
    async fn fragments(&self, title: &str) -> LookupResult<Vec<RawFragment>>;
}

/// Fetches the knowledge-base item linked to a client-wiki page.
#[async_trait]
pub trait ItemLookup: Send + Sync {
    /// The item whose `site` sitelink points at `title`, or `None` when the
    /// page has no item.
    async fn item_for_page(&self, site: &str, title: &str) -> LookupResult<Option<Item>>;
}

/// Disambiguation query rendered by search implementations.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCriteria {
    /// Entities whose preferred or alternate label in `language` equals
    /// `label`, restricted to instances of `class` or one of its transitive
    /// subclasses.
    LabelInClass {
        label: String,
        language: String,
        class: ItemId,
    },
    /// Entities holding `value` as the literal value of `property`.
    PropertyValue { property: PropertyId, value: String },
}

/// Bounded entity search against the knowledge base.
#[async_trait]
pub trait EntitySearch: Send + Sync {
    /// At most `limit` matching item ids, in endpoint order.
    async fn entity_ids(&self, criteria: &SearchCriteria, limit: usize)
        -> LookupResult<Vec<ItemId>>;
}

/// Existence probe against the shared media repository.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Whether the repository hosts a file page named `file_name` (without
    /// the `File:` prefix).
    async fn file_exists(&self, file_name: &str) -> LookupResult<bool>;
}
