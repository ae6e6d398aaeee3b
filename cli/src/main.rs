mod args;
mod output;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use notes_retrieval::NotesSearcher;

use crate::args::Cli;
use crate::output::{RunOutput, render_index, render_response};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let ollama_host = std::env::var("OLLAMA_HOST").ok();
    let config = cli.resolve_config(ollama_host.as_deref())?;
    debug!(?config, "resolved configuration");

    let searcher = NotesSearcher::open(config)
        .await
        .context("failed to open the notes index")?;

    let mut output = RunOutput::default();

    if cli.index {
        let report = searcher
            .index_notes()
            .await
            .context("indexing failed")?;
        if !cli.json {
            println!("{}", render_index(&report));
        }
        output.index = Some(report);
    }

    if let Some(query) = cli.query_text() {
        let response = searcher.search(query).await.context("query failed")?;
        if !cli.json {
            print!("{}", render_response(&response));
        }
        output.response = Some(response);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}
