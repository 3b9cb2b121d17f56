use std::path::PathBuf;

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use spotify_shuffler::{cli, config, reconciler::ReconcileOptions, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Path to the credentials YAML file
    #[clap(long, default_value = "./creds.yaml")]
    creds_path: PathBuf,

    /// Force refresh of playable tracks from Spotify
    #[clap(short = 'f', long)]
    force_refresh: bool,

    /// Purge all enqueued tracks before starting
    #[clap(short = 'p', long)]
    purge_enqueued: bool,

    /// Number of tracks to enqueue
    #[clap(short = 'n', long, default_value_t = 10)]
    to_enqueue: usize,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let options = ReconcileOptions {
        purge_requested: cli.purge_enqueued,
        force_refresh: cli.force_refresh,
        to_enqueue: cli.to_enqueue,
    };

    cli::shuffle(&cli.creds_path, options).await;
}
