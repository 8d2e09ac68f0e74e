//! In-memory collaborator doubles.
//!
//! Deterministic stand-ins for the four lookup traits: configured responses,
//! optional error injection, and call recording for assertions. Used by the
//! enrichment tests and usable by downstream crates.

use crate::error::{LookupError, LookupResult};
use crate::fragment::{MicrodataDocument, RawFragment};
use crate::ids::ItemId;
use crate::item::Item;
use crate::traits::{EntitySearch, FragmentSource, ItemLookup, MediaProbe, SearchCriteria};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Fragment source backed by a fixed fragment list.
#[derive(Debug, Clone, Default)]
pub struct StaticFragmentSource {
    items: Vec<RawFragment>,
    error: Option<LookupError>,
}

impl StaticFragmentSource {
    pub fn new(items: Vec<RawFragment>) -> Self {
        Self { items, error: None }
    }

    /// Parses a W3C microdata document literal.
    ///
    /// # Panics
    ///
    /// Panics on malformed JSON; fixtures are compiled into the test.
    pub fn from_json(json: &str) -> Self {
        let document: MicrodataDocument = serde_json::from_str(json).expect("valid fixture JSON");
        Self::new(document.items)
    }

    pub fn with_error(mut self, error: LookupError) -> Self {
        self.error = Some(error);
        self
    }
}

#[async_trait]
impl FragmentSource for StaticFragmentSource {
    async fn fragments(&self, _title: &str) -> LookupResult<Vec<RawFragment>> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.items.clone())
    }
}

/// Item lookup backed by a `(site, title)` map, with call recording.
#[derive(Debug, Clone, Default)]
pub struct InMemoryItemLookup {
    items: HashMap<(String, String), Item>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
    error: Option<LookupError>,
}

impl InMemoryItemLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, site: &str, title: &str, item: Item) -> Self {
        self.items.insert((site.to_string(), title.to_string()), item);
        self
    }

    pub fn with_error(mut self, error: LookupError) -> Self {
        self.error = Some(error);
        self
    }

    /// Every `(site, title)` pair looked up so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl ItemLookup for InMemoryItemLookup {
    async fn item_for_page(&self, site: &str, title: &str) -> LookupResult<Option<Item>> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push((site.to_string(), title.to_string()));
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self
            .items
            .get(&(site.to_string(), title.to_string()))
            .cloned())
    }
}

/// Entity search answering from scripted criteria/result pairs.
///
/// Unscripted criteria yield no matches. Results are truncated to the
/// requested limit the way the real endpoint applies `LIMIT`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEntitySearch {
    responses: Vec<(SearchCriteria, Vec<ItemId>)>,
    calls: Arc<Mutex<Vec<SearchCriteria>>>,
    error: Option<LookupError>,
}

impl ScriptedEntitySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, criteria: SearchCriteria, ids: Vec<ItemId>) -> Self {
        self.responses.push((criteria, ids));
        self
    }

    pub fn with_error(mut self, error: LookupError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<SearchCriteria> {
        self.calls.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl EntitySearch for ScriptedEntitySearch {
    async fn entity_ids(
        &self,
        criteria: &SearchCriteria,
        limit: usize,
    ) -> LookupResult<Vec<ItemId>> {
        self.calls.lock().expect("lock poisoned").push(criteria.clone());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let mut ids = self
            .responses
            .iter()
            .find(|(scripted, _)| scripted == criteria)
            .map(|(_, ids)| ids.clone())
            .unwrap_or_default();
        ids.truncate(limit);
        Ok(ids)
    }
}

/// Media probe backed by a set of existing file names.
#[derive(Debug, Clone, Default)]
pub struct StaticMediaProbe {
    existing: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
    error: Option<LookupError>,
}

impl StaticMediaProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file_name: &str) -> Self {
        self.existing.insert(file_name.to_string());
        self
    }

    pub fn with_error(mut self, error: LookupError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl MediaProbe for StaticMediaProbe {
    async fn file_exists(&self, file_name: &str) -> LookupResult<bool> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(file_name.to_string());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.existing.contains(file_name))
    }
}
