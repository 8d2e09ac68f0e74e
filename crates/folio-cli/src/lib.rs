//! Folio CLI library
//!
//! Command-line front end for the conversion pipeline: argument parsing,
//! configuration loading, and the command implementations that wire HTTP
//! clients (or local files) into a [`folio_enrich::Converter`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod sources;
