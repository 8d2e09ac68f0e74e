//! Reconciliation and statement synthesis.
//!
//! This crate turns the metadata fragments of a source page into typed
//! statements on the matching knowledge-base item. Fragments are reconciled
//! into an entity graph, references to other entities are resolved through
//! explicit ids, back-references, or a bounded disambiguation search, and the
//! resulting statements are written idempotently with a fixed provenance
//! reference. The roster of handled relations lives in [`schedule`].

mod badge;
pub mod converter;
pub mod error;
pub mod resolver;
pub mod schedule;
pub mod synthesizer;
mod vocab;

pub use converter::Converter;
pub use error::{EnrichError, EnrichResult};
pub use resolver::{EntityResolver, Resolution};
pub use schedule::{default_schedule, RelationGuard, RelationKind, RelationRule};
pub use synthesizer::{synthesize_pagination, trimmed_types, Proposal, StatementSynthesizer};
