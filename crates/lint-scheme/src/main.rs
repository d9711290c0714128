//! lint-scheme - one color scheme generation pass from the command line

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lint_scheme::{
    DirHost, JsonStyleSource, Outcome, Scheme, SchemeConfig, SchemeContext,
};
use settings::FilePreferences;

#[derive(Parser, Debug)]
#[command(name = "lint-scheme")]
#[command(about = "Add lint highlighting rules to the active color scheme")]
struct Args {
    /// Editor `Packages` directory
    #[arg(long, value_name = "DIR")]
    packages: Option<PathBuf>,

    /// JSON file mapping scopes to styles
    #[arg(long, value_name = "FILE")]
    styles: PathBuf,

    /// Host build number
    #[arg(long, default_value_t = 4200)]
    host_version: u32,

    /// Write plist themes even when the host reads JSON schemes
    #[arg(long)]
    force_xml: bool,

    /// Generator configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn default_packages() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("sublime-text").join("Packages"))
        .context("No configuration directory; pass --packages")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lint_scheme=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let packages = match args.packages {
        Some(packages) => packages,
        None => default_packages()?,
    };
    let config = match &args.config {
        Some(path) => SchemeConfig::from_file(path)
            .with_context(|| format!("Invalid config {}", path.display()))?,
        None => SchemeConfig::default(),
    };

    let prefs = FilePreferences::new(packages.join("User").join(settings::PREFERENCES_FILE));
    let watcher = Arc::clone(prefs.watcher());

    let ctx = SchemeContext::new(
        Arc::new(DirHost::new(&packages, args.host_version)),
        Arc::new(prefs),
        Arc::new(JsonStyleSource::new(args.styles)),
    )
    .with_watcher(watcher)
    .with_config(config);

    let scheme = Arc::new(Scheme::init_scheme(ctx, args.force_xml));
    tracing::info!("Using {:?} engine for {}", scheme.format(), packages.display());

    let Some(pass) = scheme.generate(false)? else {
        tracing::info!("Nothing to do");
        return Ok(());
    };

    match pass.await?? {
        Outcome::Written { path, switched, unfound } => {
            tracing::info!("Color scheme written to {}", path.display());
            if switched {
                tracing::info!("Active color scheme updated");
            }
            if !unfound.is_empty() {
                tracing::warn!("{} scope(s) need manual rules", unfound.len());
            }
        }
        Outcome::Unchanged => tracing::info!("Color scheme already complete"),
        Outcome::Skipped(reason) => tracing::info!("Skipped: {}", reason),
    }

    Ok(())
}
