//! The conversion pipeline.
//!
//! One call takes a source page title to an enriched entity document: extract
//! fragments, reconcile them into a graph, load the existing item or start a
//! stub, then run the relation schedule against the fragment describing the
//! item.

use crate::badge::augment_badges;
use crate::error::{EnrichError, EnrichResult};
use crate::resolver::EntityResolver;
use crate::schedule::{default_schedule, RelationRule};
use crate::synthesizer::{synthesize_pagination, trimmed_types, Proposal, StatementSynthesizer};
use folio_core::{
    EntityGraph, EntitySearch, EntityUriParser, FolioConfig, FragmentSource, Item, ItemLookup,
    MediaProbe, RawFragment, SiteLink,
};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};

pub struct Converter {
    fragments: Arc<dyn FragmentSource>,
    lookup: Arc<dyn ItemLookup>,
    synthesizer: StatementSynthesizer,
    schedule: Vec<RelationRule>,
    uri_parser: EntityUriParser,
    source_site: String,
    lookup_concurrency: usize,
}

impl Converter {
    pub fn new(
        fragments: Arc<dyn FragmentSource>,
        lookup: Arc<dyn ItemLookup>,
        search: Arc<dyn EntitySearch>,
        media: Arc<dyn MediaProbe>,
        config: &FolioConfig,
    ) -> Self {
        let resolver = EntityResolver::new(lookup.clone(), search.clone(), config);
        let synthesizer = StatementSynthesizer::new(resolver, search, media, config);
        Self {
            fragments,
            lookup,
            synthesizer,
            schedule: default_schedule(&config.enrich),
            uri_parser: EntityUriParser::new(&config.wikibase.entity_base_uri),
            source_site: config.source.site.clone(),
            lookup_concurrency: config.network.lookup_concurrency.max(1),
        }
    }

    /// Replaces the default relation schedule.
    pub fn with_schedule(mut self, schedule: Vec<RelationRule>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Converts one source page, returning the enriched document as entity
    /// JSON ready to hand to a save call.
    pub async fn convert(&self, title: &str) -> EnrichResult<serde_json::Value> {
        let item = self.convert_item(title).await?;
        serde_json::to_value(&item).map_err(EnrichError::from)
    }

    pub async fn convert_item(&self, title: &str) -> EnrichResult<Item> {
        info!(title, "converting document");
        let graph = EntityGraph::build(self.fragments.fragments(title).await?);
        let mut item = self.load_or_create(title).await?;

        let Some(target) = self.target_fragment(&item, &graph) else {
            info!(title, "no fragment describes this item, returning it untouched");
            return Ok(item);
        };
        let mut target = target.clone();
        synthesize_pagination(&mut target);
        let types = trimmed_types(&target);

        self.synthesizer.fill_label(&mut item, &target);
        self.synthesizer.add_type_statements(&mut item, &types);
        self.run_schedule(&mut item, &target, &types).await?;
        augment_badges(&mut item, &graph, &self.source_site, &self.uri_parser);

        info!(title, statements = item.statements.len(), "conversion finished");
        Ok(item)
    }

    async fn load_or_create(&self, title: &str) -> EnrichResult<Item> {
        if let Some(item) = self.lookup.item_for_page(&self.source_site, title).await? {
            return Ok(item);
        }
        debug!(title, "no existing item, starting from a stub");
        let mut item = Item::new();
        item.set_sitelink(SiteLink::new(self.source_site.clone(), title));
        Ok(item)
    }

    /// The graph node describing the item: the node under the item's concept
    /// URI when the item is identified, the anonymous bucket when it is not.
    fn target_fragment<'a>(&self, item: &Item, graph: &'a EntityGraph) -> Option<&'a RawFragment> {
        match &item.id {
            Some(id) => graph.get(&self.uri_parser.item_uri(id)),
            None => Some(graph.anonymous()),
        }
    }

    async fn run_schedule(
        &self,
        item: &mut Item,
        target: &RawFragment,
        types: &[String],
    ) -> EnrichResult<()> {
        // Resolution runs concurrently; writes happen below, single-threaded
        // and in schedule order, so output stays deterministic.
        let mut outcomes: Vec<(usize, Vec<Proposal>)> =
            stream::iter(self.schedule.iter().enumerate())
                .map(|(index, rule)| async move {
                    if rule.guard.blocks_resolution(types) {
                        debug!(
                            source = rule.source_property.as_str(),
                            "type guard blocked the relation"
                        );
                        return Ok((index, Vec::new()));
                    }
                    let proposals = self.synthesizer.evaluate(rule, target).await?;
                    Ok::<_, EnrichError>((index, proposals))
                })
                .buffer_unordered(self.lookup_concurrency)
                .try_collect()
                .await?;
        outcomes.sort_by_key(|(index, _)| *index);
        for (index, proposals) in outcomes {
            self.synthesizer.apply(item, &self.schedule[index], proposals);
        }
        Ok(())
    }
}
