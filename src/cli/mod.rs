//! Command-line interface for hashview.
//!
//! Provides commands for viewing an artifact by hash, computing the hash of
//! a local file, and inspecting fragment parsing and classification.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{ContentSource, HttpContentSource};
use crate::config;
use crate::core::{ViewController, ViewState};
use crate::domain::{Classifier, ContentId, MediaVariant, ViewFragmentState};
use crate::render::page::{render_state, render_view_page};

/// hashview - content-addressed artifact viewer
#[derive(Parser, Debug)]
#[command(name = "hashview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch an artifact by hash and render it as an HTML page
    View {
        /// Content hash (32 hex characters)
        hash: String,

        /// Deep-link fragment, e.g. "L10-L20", "t=1m30s", "page=5"
        #[arg(short, long, default_value = "")]
        fragment: String,

        /// Write the page to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the configured endpoint
        #[arg(long, env = "HASHVIEW_ENDPOINT")]
        endpoint: Option<String>,
    },

    /// Print the content hash of a local file
    Hash {
        /// File to hash
        path: PathBuf,
    },

    /// Show how a fragment is parsed
    Fragment {
        /// Fragment text, with or without the leading '#'
        fragment: String,
    },

    /// Show how a content type is classified
    Classify {
        /// Declared content type, e.g. "text/plain"
        content_type: String,

        /// Filename used to resolve the display language
        #[arg(long)]
        filename: Option<String>,
    },

    /// Check that the content endpoint is reachable
    Health,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::View {
                hash,
                fragment,
                output,
                endpoint,
            } => view(&hash, &fragment, output, endpoint).await,
            Commands::Hash { path } => hash_file(&path).await,
            Commands::Fragment { fragment } => show_fragment(&fragment),
            Commands::Classify {
                content_type,
                filename,
            } => show_classification(&content_type, filename.as_deref()),
            Commands::Health => health().await,
            Commands::Config => show_config(),
        }
    }
}

/// Classifier with the configured language overrides
fn configured_classifier(cfg: &config::ResolvedConfig) -> Classifier {
    Classifier::new().with_languages(cfg.languages.clone())
}

fn configured_source(cfg: &config::ResolvedConfig, endpoint: Option<String>) -> Result<HttpContentSource> {
    match endpoint {
        Some(endpoint) => Ok(HttpContentSource::new(endpoint, cfg.timeout())?
            .with_content_path(&cfg.content_path)),
        None => HttpContentSource::from_config(cfg),
    }
}

/// Fetch, classify and render one artifact
async fn view(hash: &str, fragment: &str, output: Option<PathBuf>, endpoint: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let source = configured_source(cfg, endpoint)?;

    let mut controller = ViewController::with_classifier(source, configured_classifier(cfg));
    controller.open(hash, fragment);

    let outcome = controller.settled().await;
    let page = match &outcome {
        Ok(view) => render_view_page(view),
        Err(message) => render_state(&ViewState::Error(message.clone())),
    };

    match &output {
        Some(path) => std::fs::write(path, page.into_string())
            .with_context(|| format!("Failed to write page: {}", path.display()))?,
        None => println!("{}", page.into_string()),
    }

    match outcome {
        Ok(view) => {
            eprintln!("[Rendered {} view for {}]", view.variant, view.id);
            if let Some(path) = output {
                eprintln!("   Output: {}", path.display());
            }
            Ok(())
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }
}

/// Print the content hash of a local file
async fn hash_file(path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    println!("{}  {}", ContentId::from_bytes(&bytes), path.display());
    Ok(())
}

/// Print the parsed fragment state
fn show_fragment(raw: &str) -> Result<()> {
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    let state = ViewFragmentState::parse(raw);

    println!("{}", serde_json::to_string_pretty(&state)?);
    if state.is_none() && !raw.is_empty() {
        eprintln!("(fragment not recognized; viewers will ignore it)");
    }
    Ok(())
}

/// Print the classification of a content type
fn show_classification(content_type: &str, filename: Option<&str>) -> Result<()> {
    let cfg = config::config()?;
    let variant = configured_classifier(cfg).classify(content_type, filename);

    println!("{}", serde_json::to_string_pretty(&variant)?);
    match variant {
        MediaVariant::Image | MediaVariant::Video | MediaVariant::Document => {
            eprintln!("(rendered by reference URL; body is not downloaded)")
        }
        MediaVariant::Markdown | MediaVariant::Code { .. } | MediaVariant::Unknown => {
            eprintln!("(body is read as text)")
        }
    }
    Ok(())
}

/// Check that the endpoint answers its health API
async fn health() -> Result<()> {
    let cfg = config::config()?;
    let source = HttpContentSource::from_config(cfg)?;

    let status = source.health_check().await?;
    println!("Endpoint: {}", cfg.endpoint);
    println!("Status:   {}", status.status);
    if !status.version.is_empty() {
        println!("Version:  {}", status.version);
    }
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;
    let source = HttpContentSource::from_config(cfg)?;
    let sample = ContentId::from_bytes(b"");

    let config_file = cfg
        .config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none - using defaults)".to_string());

    println!("Config file: {}", config_file);
    println!();
    println!("Endpoint:");
    println!("  Base URL:     {}", cfg.endpoint);
    println!("  Content path: {}", cfg.content_path);
    println!("  Example URL:  {}", source.content_url(&sample));
    println!("  Timeout:      {}s", cfg.timeout_seconds);
    println!();
    println!("Language mappings:");
    if cfg.languages.is_empty() {
        println!("  (using defaults)");
    } else {
        let mut languages: Vec<_> = cfg.languages.iter().collect();
        languages.sort();
        for (ext, lang) in languages {
            println!("  .{}: {}", ext, lang);
        }
    }

    Ok(())
}
