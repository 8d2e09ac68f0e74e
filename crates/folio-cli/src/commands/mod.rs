pub mod convert;
pub mod graph;
