//! Statement synthesis.
//!
//! Every relation builder funnels through one idempotent write primitive: a
//! property that already holds a statement is never written again, and every
//! statement written carries the same provenance reference.

use crate::error::EnrichResult;
use crate::resolver::{EntityResolver, Resolution, DISAMBIGUATION_LIMIT};
use crate::schedule::{RelationKind, RelationRule};
use crate::vocab;
use folio_core::util::wiki_urldecode;
use folio_core::{
    DataValue, EntitySearch, FolioConfig, FragmentValue, Item, ItemId, MediaProbe, PropertyId,
    RawFragment, Reference, SearchCriteria, Snak, Statement, TimeValue,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Namespace token of a file page URL, rewritten to `Index:` when the scan
/// itself is not hosted.
static NAMESPACE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/wiki/[^:]+:").unwrap());

/// A statement the schedule wants to add: resolved, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub property: PropertyId,
    pub value: DataValue,
}

pub struct StatementSynthesizer {
    resolver: EntityResolver,
    search: Arc<dyn EntitySearch>,
    media: Arc<dyn MediaProbe>,
    provenance: Reference,
    language: String,
    language_code_property: PropertyId,
    instance_of: PropertyId,
    type_mapping: BTreeMap<String, ItemId>,
}

impl StatementSynthesizer {
    pub fn new(
        resolver: EntityResolver,
        search: Arc<dyn EntitySearch>,
        media: Arc<dyn MediaProbe>,
        config: &FolioConfig,
    ) -> Self {
        let enrich = &config.enrich;
        let provenance = Reference::new(vec![Snak::value(
            enrich.imported_from.clone(),
            DataValue::Entity(enrich.source_item.clone()),
        )]);
        Self {
            resolver,
            search,
            media,
            provenance,
            language: config.wikibase.language.clone(),
            language_code_property: enrich.language_code_property.clone(),
            instance_of: enrich.instance_of.clone(),
            type_mapping: enrich.type_mapping.clone(),
        }
    }

    /// Resolves one rule against the target fragment. Pure lookup work, no
    /// document writes; occurrences that do not resolve are dropped here.
    pub async fn evaluate(
        &self,
        rule: &RelationRule,
        fragment: &RawFragment,
    ) -> EnrichResult<Vec<Proposal>> {
        match &rule.kind {
            RelationKind::Item { expected_class } => {
                self.item_proposals(rule, fragment, expected_class.as_ref())
                    .await
            }
            RelationKind::Year => Ok(self.year_proposals(rule, fragment)),
            RelationKind::Language => self.language_proposals(rule, fragment).await,
            RelationKind::String => Ok(self.string_proposals(rule, fragment)),
            RelationKind::Scan { index_property } => {
                self.scan_proposals(rule, fragment, index_property).await
            }
        }
    }

    /// Writes a rule's proposals, re-checking the rule's apply-time guard
    /// against the document as built so far.
    pub fn apply(&self, item: &mut Item, rule: &RelationRule, proposals: Vec<Proposal>) {
        if rule.guard.blocks_apply(&item.statements) {
            debug!(
                source = rule.source_property.as_str(),
                "guard blocked the relation at apply time"
            );
            return;
        }
        for proposal in proposals {
            self.insert_if_absent(item, &proposal.property, proposal.value);
        }
    }

    /// The single write path: no-op when the property already holds any
    /// statement, otherwise appends the value with the provenance reference.
    pub fn insert_if_absent(
        &self,
        item: &mut Item,
        property: &PropertyId,
        value: DataValue,
    ) -> bool {
        if item.statements.has_property(property) {
            debug!(%property, "property already has a statement, skipping");
            return false;
        }
        item.statements.push(
            Statement::new(Snak::value(property.clone(), value))
                .with_reference(self.provenance.clone()),
        );
        true
    }

    /// Sets the working-language label from the fragment's first name. Only
    /// fills a gap, never replaces.
    pub fn fill_label(&self, item: &mut Item, fragment: &RawFragment) {
        if item.has_label(&self.language) {
            return;
        }
        if let Some(name) = fragment.first_literal(vocab::NAME) {
            item.set_label(&self.language, name);
        }
    }

    /// One instance-of statement per mapped type, in type encounter order.
    /// The idempotent insert means only the first mapped type ever lands.
    pub fn add_type_statements(&self, item: &mut Item, types: &[String]) {
        for ty in types {
            if let Some(class) = self.type_mapping.get(ty) {
                self.insert_if_absent(item, &self.instance_of, DataValue::Entity(class.clone()));
            }
        }
    }

    async fn item_proposals(
        &self,
        rule: &RelationRule,
        fragment: &RawFragment,
        expected_class: Option<&ItemId>,
    ) -> EnrichResult<Vec<Proposal>> {
        let mut proposals = Vec::new();
        for value in fragment.values(&rule.source_property) {
            if let Resolution::Resolved(id) = self.resolver.resolve(value, expected_class).await? {
                proposals.push(Proposal {
                    property: rule.target_property.clone(),
                    value: DataValue::Entity(id),
                });
            }
        }
        Ok(proposals)
    }

    fn year_proposals(&self, rule: &RelationRule, fragment: &RawFragment) -> Vec<Proposal> {
        let mut proposals = Vec::new();
        for value in fragment.values(&rule.source_property) {
            match value.as_literal() {
                Some(year) if is_four_digit_year(year) => proposals.push(Proposal {
                    property: rule.target_property.clone(),
                    value: DataValue::Time(TimeValue::year(year)),
                }),
                Some(other) => debug!(value = other, "not a 4-digit year, skipping"),
                None => {}
            }
        }
        proposals
    }

    async fn language_proposals(
        &self,
        rule: &RelationRule,
        fragment: &RawFragment,
    ) -> EnrichResult<Vec<Proposal>> {
        let mut proposals = Vec::new();
        for value in fragment.values(&rule.source_property) {
            let Some(code) = value.as_literal() else { continue };
            let criteria = SearchCriteria::PropertyValue {
                property: self.language_code_property.clone(),
                value: code.to_string(),
            };
            let ids = self
                .search
                .entity_ids(&criteria, DISAMBIGUATION_LIMIT)
                .await?;
            match ids.as_slice() {
                [id] => proposals.push(Proposal {
                    property: rule.target_property.clone(),
                    value: DataValue::Entity(id.clone()),
                }),
                others => {
                    debug!(code, matches = others.len(), "language code not uniquely matched");
                }
            }
        }
        Ok(proposals)
    }

    fn string_proposals(&self, rule: &RelationRule, fragment: &RawFragment) -> Vec<Proposal> {
        fragment
            .values(&rule.source_property)
            .iter()
            .filter_map(FragmentValue::as_literal)
            .map(|literal| Proposal {
                property: rule.target_property.clone(),
                value: DataValue::String(literal.trim().to_string()),
            })
            .collect()
    }

    /// A referenced scan either exists on the shared media repository (the
    /// statement holds the bare file name) or does not (the statement points
    /// at the source project's index page instead).
    async fn scan_proposals(
        &self,
        rule: &RelationRule,
        fragment: &RawFragment,
        index_property: &PropertyId,
    ) -> EnrichResult<Vec<Proposal>> {
        let mut proposals = Vec::new();
        for media in fragment.values(&rule.source_property) {
            let Some(media) = media.as_node() else { continue };
            for file_page in media.values(vocab::MAIN_ENTITY_OF_PAGE) {
                let Some(file_page) = file_page.as_literal() else { continue };
                let file_name = scan_file_name(file_page);
                if self.media.file_exists(&file_name).await? {
                    proposals.push(Proposal {
                        property: rule.target_property.clone(),
                        value: DataValue::String(file_name),
                    });
                } else {
                    debug!(%file_name, "file not hosted, pointing at the index page");
                    proposals.push(Proposal {
                        property: index_property.clone(),
                        value: DataValue::String(
                            NAMESPACE_TOKEN_RE
                                .replace_all(file_page, "/wiki/Index:")
                                .into_owned(),
                        ),
                    });
                }
            }
        }
        Ok(proposals)
    }
}

/// Builds every `start-end` pair from the page range lists and appends them
/// to the fragment's pagination values, after whatever the fragment already
/// carries. Start values iterate as the outer loop.
pub fn synthesize_pagination(fragment: &mut RawFragment) {
    if !(fragment.has_property(vocab::PAGE_START) && fragment.has_property(vocab::PAGE_END)) {
        return;
    }
    let starts = literal_values(fragment, vocab::PAGE_START);
    let ends = literal_values(fragment, vocab::PAGE_END);
    for start in &starts {
        for end in &ends {
            fragment.push_value(
                vocab::PAGINATION,
                FragmentValue::Literal(format!("{}-{}", start.trim(), end.trim())),
            );
        }
    }
}

/// The fragment's type URIs, trimmed and de-duplicated keeping the first
/// occurrence.
pub fn trimmed_types(fragment: &RawFragment) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for ty in &fragment.types {
        let trimmed = ty.trim();
        if !types.iter().any(|t| t == trimmed) {
            types.push(trimmed.to_string());
        }
    }
    types
}

fn literal_values(fragment: &RawFragment, name: &str) -> Vec<String> {
    fragment
        .values(name)
        .iter()
        .filter_map(FragmentValue::as_literal)
        .map(str::to_string)
        .collect()
}

fn is_four_digit_year(value: &str) -> bool {
    value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Last colon-delimited segment of a file page URL, percent-decoded and with
/// underscores back to spaces.
fn scan_file_name(file_page: &str) -> String {
    let segment = file_page.rsplit(':').next().unwrap_or(file_page);
    wiki_urldecode(segment).replace('_', " ").trim().to_string()
}
