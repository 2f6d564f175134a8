use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pricewatch::app::{self, AppCfg};
use pricewatch::config::Config;
use pricewatch::shared::types::SourceKind;

#[derive(Parser, Debug)]
#[command(version, about = "Daily store discount checks printed as timeline events")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Only run this source: appstore, steam, nintendo or phantom
    #[arg(long)]
    source: Option<SourceKind>,

    /// Tracked items for --source, e.g. 12345_us_68.00,2736473_cn_38.00
    #[arg(long, requires = "source")]
    items: Option<String>,

    /// Wishlist owner for --source steam: vanity name or SteamID64
    #[arg(long, requires = "source")]
    account: Option<String>,

    /// Store region of wishlist games (default: us)
    #[arg(long, requires = "account")]
    region: Option<String>,

    /// Language of notes and error messages (overrides config)
    #[arg(long)]
    language: Option<String>,

    /// Cache file path (overrides config)
    #[arg(long)]
    cache_path: Option<String>,

    /// Also cache runs that found no discounts
    #[arg(long, conflicts_with = "no_cache_empty")]
    cache_empty: bool,

    /// Never cache runs that found no discounts
    #[arg(long)]
    no_cache_empty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    // Priority: CLI args > config file > per-source defaults
    let mut app_cfg = match &args.config {
        Some(path) => AppCfg::from_config(Config::from_file(path)?),
        None => AppCfg::default(),
    };

    if let Some(kind) = args.source {
        app_cfg.select_source(kind, args.items);
        if let Some(account) = args.account {
            app_cfg.set_account(kind, account, args.region);
        }
    }
    if let Some(language) = args.language {
        app_cfg.language = language;
    }
    if let Some(cache_path) = args.cache_path {
        app_cfg.cache_path = Some(cache_path.into());
    }
    if args.cache_empty {
        app_cfg.set_cache_empty(true);
    }
    if args.no_cache_empty {
        app_cfg.set_cache_empty(false);
    }

    app::run(app_cfg).await
}
