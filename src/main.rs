use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use acme_blogs::config::Config;
use acme_blogs::fetch::Client;
use acme_blogs::page::Page;

/// Renders the Acme Blogs page headlessly and prints the resulting HTML.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Value to pick in the user menu (blank or invalid picks the default user).
    #[arg(short, long)]
    user: Option<String>,

    /// Click the comments button of this post; may be repeated.
    #[arg(short, long = "toggle", value_name = "POST_ID")]
    toggles: Vec<u32>,

    /// JSON config file (defaults to ./config.json when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit a complete HTML document instead of just the page body.
    #[arg(long)]
    document: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "acme_blogs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    tracing::info!(base_url = %config.base_url, "starting");

    let client = Client::new(&config)?;
    let mut page = Page::new(client).with_default_user(config.default_user);
    page.init().await;

    if let Some(user) = &cli.user {
        page.change_selection(user).await;
    }

    for post_id in &cli.toggles {
        match page.comments_button(*post_id) {
            Some(button) => {
                page.click(button);
            }
            None => tracing::warn!(post = post_id, "no comments button for post"),
        }
    }

    let output = if cli.document {
        page.shell("Acme Blogs").into_string()
    } else {
        page.html()
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}
