//! `folio` - CLI for the portfolio content store
//!
//! This binary fronts the document store: printing and exporting the
//! resolved document, importing replacements, pushing to the remote
//! repository, and managing configuration and the API token.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;

use folio::cli::{Cli, Command, ConfigCommand, SectionArg, TokenCommand};
use folio::document::PortfolioDocument;
use folio::remote::SyncClient;
use folio::store::DocumentStore;
use folio::{init_logging, transfer, Config, LocalCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Show(cmd) => handle_show(&config, cmd.section).await,
        Command::Export(cmd) => handle_export(&config, cmd.output).await,
        Command::Import(cmd) => handle_import(&config, &cmd.file, cmd.sync).await,
        Command::Sync(cmd) => handle_sync(&config, cmd.message).await,
        Command::Token(cmd) => handle_token(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Build the sync client and token pair, if the remote is usable.
fn remote_pair(config: &Config) -> anyhow::Result<Option<(SyncClient, String)>> {
    if !config.remote.is_configured() {
        return Ok(None);
    }
    match config.token() {
        Some(token) => Ok(Some((SyncClient::new(config)?, token))),
        None => Ok(None),
    }
}

/// Resolve the current document: remote > cache > bundled default.
async fn resolve_document(config: &Config) -> anyhow::Result<PortfolioDocument> {
    let cache = LocalCache::new(config.cache_path());
    let remote = remote_pair(config)?;
    let document = folio::resolve_initial_document(
        &cache,
        remote.as_ref().map(|(client, token)| (client, token.as_str())),
    )
    .await?;
    Ok(document)
}

async fn handle_show(config: &Config, section: Option<SectionArg>) -> anyhow::Result<()> {
    let document = resolve_document(config).await?;

    let value = match section {
        None => serde_json::to_value(&document)?,
        Some(SectionArg::Profile) => serde_json::to_value(&document.profile)?,
        Some(SectionArg::About) => serde_json::to_value(&document.about)?,
        Some(SectionArg::Skills) => serde_json::to_value(&document.skills)?,
        Some(SectionArg::Certifications) => serde_json::to_value(&document.certifications)?,
        Some(SectionArg::Education) => serde_json::to_value(&document.education)?,
        Some(SectionArg::Experience) => serde_json::to_value(&document.experience)?,
        Some(SectionArg::Projects) => serde_json::to_value(&document.projects)?,
        Some(SectionArg::Contact) => serde_json::to_value(&document.contact)?,
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn handle_export(
    config: &Config,
    output: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    let document = resolve_document(config).await?;
    let path = output.unwrap_or_else(|| std::path::PathBuf::from(transfer::EXPORT_FILE_NAME));
    transfer::export_to_file(&document, &path)?;
    println!("Exported document to {}", path.display());
    Ok(())
}

async fn handle_import(
    config: &Config,
    file: &std::path::Path,
    sync: bool,
) -> anyhow::Result<()> {
    let imported = transfer::import_from_file(file)
        .with_context(|| format!("could not import {}", file.display()))?;

    // Replace the store contents; the cache mirrors every write.
    let current = resolve_document(config).await?;
    let store = DocumentStore::new(current);
    let cache = Arc::new(LocalCache::new(config.cache_path()));
    let mirror = Arc::clone(&cache);
    store.subscribe(Box::new(move |doc| mirror.store(doc)));
    store.write(imported);

    println!("Imported document from {}", file.display());

    if sync {
        push_to_remote(config, &store.read(), None).await?;
    } else {
        println!("Run `folio sync` to push the change to the remote.");
    }
    Ok(())
}

async fn handle_sync(config: &Config, message: Option<String>) -> anyhow::Result<()> {
    let document = resolve_document(config).await?;
    push_to_remote(config, &document, message).await
}

/// Save to the remote, reporting the outcome in user terms.
async fn push_to_remote(
    config: &Config,
    document: &PortfolioDocument,
    message: Option<String>,
) -> anyhow::Result<()> {
    let Some((client, token)) = remote_pair(config)? else {
        if config.remote.is_configured() {
            println!(
                "Changes saved locally. No token is configured; run `folio token set` \
                 for automatic sync, or `folio export` and update the remote file manually."
            );
        } else {
            println!(
                "Changes saved locally. No remote repository is configured; \
                 use `folio export` and update the site manually."
            );
        }
        return Ok(());
    };

    let message = message.unwrap_or_else(|| {
        format!("{} - {}", config.remote.commit_prefix, Utc::now().to_rfc3339())
    });

    match client.save(document, &token, &message).await {
        Ok(receipt) => {
            println!(
                "Saved to {}/{} (revision {}). Changes will be live after the next deployment.",
                config.remote.owner, config.remote.repo, receipt.revision
            );
            Ok(())
        }
        Err(err) if err.is_conflict() => {
            println!(
                "The remote file changed since this document was loaded. \
                 Your local copy is unchanged; re-run `folio sync` to retry on top of it."
            );
            Err(err.into())
        }
        Err(err) if err.is_rate_limited() => {
            println!("The remote API is rate limiting requests. Try again in a few minutes.");
            Err(err.into())
        }
        Err(err) if err.is_auth() => {
            println!(
                "The remote rejected the token. Update it with `folio token set`, \
                 or fall back to `folio export`."
            );
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn handle_token(config: &Config, cmd: &TokenCommand) -> anyhow::Result<()> {
    let path = config.token_path();
    match cmd {
        TokenCommand::Set { token } => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("could not create {}", parent.display()))?;
            }
            std::fs::write(&path, token.trim())
                .with_context(|| format!("could not write {}", path.display()))?;
            println!("Token stored at {}", path.display());
        }
        TokenCommand::Show => match config.token() {
            Some(token) => {
                let visible = token.chars().take(4).collect::<String>();
                println!("Token configured: {visible}…");
            }
            None => println!("No token configured."),
        },
        TokenCommand::Clear => {
            match std::fs::remove_file(&path) {
                Ok(()) => println!("Token removed."),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    println!("No token was stored.");
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("could not remove {}", path.display()))
                }
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Remote]");
                println!("  API base:           {}", config.remote.api_base);
                println!("  Owner/repo:         {}/{}", config.remote.owner, config.remote.repo);
                println!("  Path:               {}", config.remote.path);
                println!("  Branch:             {}", config.remote.branch);
                println!("  Configured:         {}", config.remote.is_configured());
                println!();
                println!("[Sync]");
                println!("  Cooldown (s):       {}", config.sync.cooldown_secs);
                println!("  Transient retries:  {}", config.sync.max_transient_retries);
                println!("  Rate-limit waits:   {}", config.sync.max_rate_limit_waits);
                println!("  Backoff base (ms):  {}", config.sync.backoff_base_ms);
                println!();
                println!("[Storage]");
                println!("  Cache path:         {}", config.cache_path().display());
                println!("  Token path:         {}", config.token_path().display());
                println!("  Token present:      {}", config.token().is_some());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
