use anyhow::Result;
use clap::Parser;

use folio_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = format!(
        "folio_cli={level},folio_core={level},folio_wikibase={level},folio_enrich={level}",
        level = log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(cli.config)?;

    match cli.command {
        Commands::Convert {
            title,
            microdata,
            pretty,
        } => commands::convert::execute(config, title, microdata, pretty).await?,

        Commands::Graph { title, microdata } => {
            commands::graph::execute(config, title, microdata).await?
        }
    }

    Ok(())
}
