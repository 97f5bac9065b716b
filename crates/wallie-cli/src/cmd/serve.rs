use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use wallie_core::config::Config;
use wallie_server::templates::TemplateSource;
use wallie_server::AppState;

const DEFAULT_PORT: &str = "3000";

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listening address, `:PORT` binds all interfaces [default: :$PORT or :3000]
    #[arg(long)]
    pub listen: Option<String>,

    /// Re-read HTML templates on every request
    #[arg(long)]
    pub reload: bool,

    /// Serve cookies without the Secure attribute (plain http)
    #[arg(long)]
    pub insecure: bool,

    /// Load templates from this directory instead of the built-in ones
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

pub fn run(config_path: &Path, jira_base: Option<&str>, args: ServeArgs) -> Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting wallie");

    let mut config = Config::load(config_path, jira_base)?;
    config.always_reload_html = args.reload;
    if args.insecure {
        config.is_insecure = true;
    }
    if config.is_insecure {
        tracing::warn!("insecure cookies enabled");
    }

    let listen = args
        .listen
        .unwrap_or_else(|| default_address(std::env::var("PORT").ok().as_deref()));
    let addr = listen_addr(&listen)?;

    let source = match args.templates {
        Some(dir) => TemplateSource::Directory(dir),
        None => TemplateSource::Embedded,
    };
    let state = AppState::from_config(config, source).context("loading templates")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        tokio::select! {
            res = wallie_server::serve(state, addr) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
    .with_context(|| format!("serving on {listen}"))
}

/// `:$PORT` when a port is given, `:3000` otherwise.
fn default_address(port: Option<&str>) -> String {
    let port = port
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PORT);
    format!(":{port}")
}

fn listen_addr(raw: &str) -> Result<SocketAddr> {
    let raw = raw.trim();
    let full = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };
    full.to_socket_addrs()
        .with_context(|| format!("invalid listening address '{raw}'"))?
        .next()
        .ok_or_else(|| anyhow!("listening address '{raw}' did not resolve"))
}
