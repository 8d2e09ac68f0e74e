//! The relation schedule: which fragment properties become which statements.

use folio_core::{EnrichConfig, ItemId, PropertyId, StatementList};

/// How a rule's fragment values turn into statement values.
#[derive(Debug, Clone)]
pub enum RelationKind {
    /// Resolve each value to a canonical item, optionally hinted by an
    /// expected class for the name disambiguation search.
    Item { expected_class: Option<ItemId> },
    /// Accept 4-digit years as year-precision dates.
    Year,
    /// Match values as language codes against the language-code property.
    Language,
    /// Insert trimmed literal values verbatim.
    String,
    /// Probe associated media for a hosted scan file, falling back to a
    /// statement for `index_property` pointing at the index page.
    Scan { index_property: PropertyId },
}

/// Condition attached to a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationGuard {
    Always,
    /// Run only when the target fragment carries this type URI.
    TypeIs(String),
    /// Run only when the target fragment lacks this type URI.
    TypeLacks(String),
    /// Apply results only while the document has no statement for this
    /// property.
    PropertyAbsent(PropertyId),
}

impl RelationGuard {
    /// Type conditions are fixed for the whole run, so they are checked
    /// before any lookup is spent on the rule.
    pub fn blocks_resolution(&self, types: &[String]) -> bool {
        match self {
            Self::Always | Self::PropertyAbsent(_) => false,
            Self::TypeIs(ty) => !types.iter().any(|t| t == ty),
            Self::TypeLacks(ty) => types.iter().any(|t| t == ty),
        }
    }

    /// Statement conditions are checked right before a rule's results are
    /// written, after every earlier rule has already been applied.
    pub fn blocks_apply(&self, statements: &StatementList) -> bool {
        match self {
            Self::PropertyAbsent(property) => statements.has_property(property),
            _ => false,
        }
    }
}

/// One relation rule: fragment property in, statement property out.
#[derive(Debug, Clone)]
pub struct RelationRule {
    pub source_property: String,
    pub target_property: PropertyId,
    pub kind: RelationKind,
    pub guard: RelationGuard,
}

impl RelationRule {
    pub fn new(
        source_property: impl Into<String>,
        target_property: PropertyId,
        kind: RelationKind,
    ) -> Self {
        Self {
            source_property: source_property.into(),
            target_property,
            kind,
            guard: RelationGuard::Always,
        }
    }

    pub fn with_guard(mut self, guard: RelationGuard) -> Self {
        self.guard = guard;
        self
    }
}

/// The default schedule, bound to the Wikidata property set.
///
/// `isPartOf` appears twice with complementary type guards: chapters link to
/// the work they are part of, standalone texts to the publication they
/// appeared in. The publisher rule only applies while no part-of statement
/// exists on the document.
pub fn default_schedule(config: &EnrichConfig) -> Vec<RelationRule> {
    let p = PropertyId::from_numeric;
    let q = ItemId::from_numeric;
    let item = |expected_class| RelationKind::Item { expected_class };
    let chapter = || RelationGuard::TypeIs(config.chapter_type.clone());
    let not_chapter = || RelationGuard::TypeLacks(config.chapter_type.clone());

    vec![
        RelationRule::new("exampleOfWork", p(629), item(Some(q(386724)))),
        RelationRule::new("translationOfWork", p(629), item(Some(q(386724)))),
        RelationRule::new("isPartOf", p(361), item(None)).with_guard(chapter()),
        RelationRule::new("isPartOf", p(1433), item(None)).with_guard(not_chapter()),
        RelationRule::new("hasPart", p(527), item(None)),
        RelationRule::new("author", p(50), item(None)),
        RelationRule::new("translator", p(655), item(None)),
        RelationRule::new("illustrator", p(110), item(None)),
        RelationRule::new("editor", p(98), item(None)),
        RelationRule::new("publisher", p(123), item(Some(q(2085381))))
            .with_guard(RelationGuard::PropertyAbsent(p(361))),
        RelationRule::new("datePublished", p(577), RelationKind::Year).with_guard(not_chapter()),
        RelationRule::new("inLanguage", p(407), RelationKind::Language),
        RelationRule::new("volumeNumber", p(478), RelationKind::String),
        RelationRule::new("pagination", p(304), RelationKind::String),
        RelationRule::new("previousItem", p(155), item(None)),
        RelationRule::new("nextItem", p(156), item(None)),
        RelationRule::new(
            "http://purl.org/library/placeOfPublication",
            p(291),
            item(Some(q(2221906))),
        ),
        RelationRule::new(
            "associatedMedia",
            p(996),
            RelationKind::Scan {
                index_property: p(1957),
            },
        ),
    ]
}
