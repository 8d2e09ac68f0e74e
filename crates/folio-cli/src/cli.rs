use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "folio - turns schema.org microdata from digital-library pages into Wikibase items")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/folio/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one source page into enriched entity JSON
    Convert {
        /// Title of the source page, e.g. "Les Misérables"
        title: String,

        /// Read extracted microdata from a JSON file instead of the
        /// configured extraction endpoint
        #[arg(short = 'm', long, value_name = "FILE")]
        microdata: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show the reconciled entity graph of a source page
    Graph {
        /// Title of the source page
        title: String,

        /// Read extracted microdata from a JSON file instead of the
        /// configured extraction endpoint
        #[arg(short = 'm', long, value_name = "FILE")]
        microdata: Option<PathBuf>,
    },
}
