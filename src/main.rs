use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tweetfeed::app::{App, AppOptions};
use tweetfeed::config::{self, Config};
use tweetfeed::feeds::tweets::HttpTweetSource;
use tweetfeed::logging;

#[derive(Parser, Debug)]
#[command(name = "tweetfeed", version, about = "Infinite-scrolling tweet feed in your terminal")]
struct Cli {
    /// Path to config file (default: <config dir>/tweetfeed/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment mode; "development" uses the local API
    #[arg(short, long)]
    env: Option<String>,

    /// API origin, overriding the environment profile
    #[arg(long)]
    base_url: Option<String>,

    /// Initial topic
    #[arg(short, long)]
    topic: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log file (default: <cache dir>/tweetfeed/tweetfeed.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;

    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(url) = cli.base_url {
        config.base_url = Some(url);
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    config.validate()?;

    let env_mode = std::env::var(config::ENV_VAR).ok();
    let environment = config.environment(cli.env.as_deref(), env_mode.as_deref());
    let base_url = config.base_url(environment).to_string();
    let timeout: Duration = config.timeout();

    let source = Arc::new(HttpTweetSource::new(
        base_url.clone(),
        config.page_param,
        timeout,
    ));
    let options = AppOptions {
        topic: cli.topic.unwrap_or_else(|| config.topic.clone()),
        timeout,
        prefetch_rows: config.prefetch_rows,
        environment,
        base_url,
    };
    let mut app = App::new(options, source);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    result.context("feed exited with an error")
}
