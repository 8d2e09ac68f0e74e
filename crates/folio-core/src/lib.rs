pub mod config;
pub mod datavalue;
pub mod error;
pub mod fragment;
pub mod ids;
pub mod item;
pub mod statement;
pub mod test_support;
pub mod traits;
pub mod util;

pub use config::{
    EnrichConfig, FolioConfig, MediaConfig, NetworkConfig, SourceConfig, WikibaseConfig,
};
pub use datavalue::{DataValue, TimeValue, CALENDAR_GREGORIAN, PRECISION_YEAR};
pub use error::{LookupError, LookupResult};
pub use fragment::{EntityGraph, FragmentValue, MicrodataDocument, RawFragment};
pub use ids::{EntityUriParser, IdParseError, ItemId, PropertyId};
pub use item::{Item, SiteLink, Term};
pub use statement::{Rank, Reference, Snak, SnakType, Statement, StatementList};

// Re-export collaborator abstractions implemented by folio-wikibase and test doubles
pub use traits::{EntitySearch, FragmentSource, ItemLookup, MediaProbe, SearchCriteria};
