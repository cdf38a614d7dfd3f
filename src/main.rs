use anyhow::{Context, Result};
use clap::Parser;
use dashboard_search::app_context::AppContext;
use dashboard_search::config::Config;
use dashboard_search::tui_app::SearchApp;
use dashboard_search::utils::{init_tracing, AppPaths};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dashboard-search",
    version,
    about = "Search-as-you-type over patients and appointments"
)]
struct Args {
    /// Dashboard API base URL (default: built-in demo data)
    #[arg(long, value_name = "URL", env = "DASHBOARD_SEARCH_URL")]
    url: Option<String>,

    /// Bearer token for the dashboard API
    #[arg(long, value_name = "TOKEN", env = "DASHBOARD_SEARCH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Quiet period after the last keystroke, in milliseconds
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Maximum results per category
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Artificial delay for the demo backend, in milliseconds
    #[arg(long, value_name = "MS")]
    demo_latency_ms: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "FILE", env = "DASHBOARD_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    generate_config: bool,

    /// Keep logs in memory only
    #[arg(long)]
    no_log_file: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.backend.base_url = Some(url.clone());
        }
        if let Some(token) = &self.token {
            config.backend.auth_token = Some(token.clone());
        }
        if let Some(ms) = self.debounce_ms {
            config.search.quiet_period_ms = ms;
        }
        if let Some(limit) = self.limit {
            config.search.limit_per_category = limit;
        }
        if let Some(ms) = self.demo_latency_ms {
            config.backend.demo_latency_ms = ms;
        }
    }
}

fn generate_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::get_config_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Configuration file created at: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        return generate_config(args.config.clone());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().context("loading config")?,
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    let log_dir = AppPaths::log_dir();
    let logging = init_tracing((!args.no_log_file).then_some(log_dir.as_path()))?;
    if let Some(path) = &logging.log_path {
        eprintln!("📝 Debug logs will be written to:");
        eprintln!("   {}", path.display());
        eprintln!("   Tail with: tail -f {}", path.display());
    }

    let context = AppContext::new(config, logging);

    // Searches run on the runtime; the UI loop stays on this thread
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let result = {
        let _guard = runtime.enter();
        SearchApp::new(&context).and_then(SearchApp::run)
    };

    runtime.shutdown_timeout(std::time::Duration::from_millis(100));
    context.shutdown();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "dashboard-search",
            "--url",
            "http://localhost:5000/api",
            "--debounce-ms",
            "150",
            "--limit",
            "3",
        ]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.backend.base_url.as_deref(), Some("http://localhost:5000/api"));
        assert_eq!(config.search.quiet_period_ms, 150);
        assert_eq!(config.search.limit_per_category, 3);
    }
}
