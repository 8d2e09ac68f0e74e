//! Network implementations of the folio collaborator traits.
//!
//! One client per external service: `wbgetentities` item lookup, SPARQL
//! disambiguation search, media repository probing, and microdata
//! extraction. All share the retry and error-mapping plumbing in [`api`].

pub mod api;
pub mod item_client;
pub mod media_client;
pub mod microdata_client;
pub mod sparql_client;

pub use api::ApiClientConfig;
pub use item_client::WikibaseItemClient;
pub use media_client::CommonsMediaClient;
pub use microdata_client::MicrodataEndpointSource;
pub use sparql_client::SparqlSearchClient;
