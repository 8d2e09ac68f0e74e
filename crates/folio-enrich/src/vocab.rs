//! Property names of the microdata vocabulary the pipeline reads directly.
//! Relation properties live in the schedule instead.

pub(crate) const NAME: &str = "name";
pub(crate) const MAIN_ENTITY_OF_PAGE: &str = "mainEntityOfPage";
pub(crate) const PAGE_START: &str = "pageStart";
pub(crate) const PAGE_END: &str = "pageEnd";
pub(crate) const PAGINATION: &str = "pagination";
pub(crate) const BADGE: &str = "http://wikiba.se/ontology#badge";
