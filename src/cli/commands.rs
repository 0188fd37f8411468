use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dirnav::core::config::{ConfigStore, Settings};
use dirnav::models::{truncate_middle, Entry, EntryKind};
use dirnav::pages::browse::{ListingView, Navigator};
use dirnav::services::bridge::Bridge;
use dirnav::services::fs::watcher::WatchRegistry;
use dirnav::services::fs::NativeBackend;
use dirnav::services::server;
use serde_json::Value;
use tokio::sync::mpsc;

const NAME_WIDTH: usize = 90;

pub fn native(settings: &Settings) -> NativeBackend {
    NativeBackend::with_extensions(settings.extensions.clone())
}

pub async fn roots(settings: &Settings) -> Result<()> {
    let navigator = Navigator::new(Arc::new(native(settings)), settings);
    for root in navigator.list_roots().await? {
        println!("{root}");
    }
    Ok(())
}

pub async fn ls(settings: &Settings, path: Option<String>, filter: Option<String>) -> Result<()> {
    let navigator = Navigator::new(Arc::new(native(settings)), settings);
    match path {
        Some(path) => {
            // Roots only decide which drive the path belongs to.
            if let Err(e) = navigator.list_roots().await {
                tracing::debug!("listing {} without roots: {}", path, e);
            }
            navigator.list_directory(&path).await?;
        }
        None => {
            navigator.start().await?;
        }
    }
    if let Some(query) = filter {
        navigator.set_filter(&query);
    }
    print_view(&navigator.view());
    Ok(())
}

pub async fn cat(settings: &Settings, path: &str) -> Result<()> {
    let navigator = Navigator::new(Arc::new(native(settings)), settings);
    let opened = navigator.open(path).await?;
    match opened.content {
        Some(text) => print!("{text}"),
        None => bail!("{} is not a text file", opened.path),
    }
    Ok(())
}

pub async fn watch(path: &str, debounce_ms: u64) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(16);
    let mut registry = WatchRegistry::new(tx, Duration::from_millis(debounce_ms));
    registry.start(path)?;

    loop {
        tokio::select! {
            change = rx.recv() => match change {
                Some(change) => {
                    println!("--- {} ---", change.path);
                    print!("{}", change.content);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    registry.stop(path)?;
    Ok(())
}

pub fn config_get(store: &ConfigStore, key: &str) -> Result<()> {
    match store.get(key)? {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => bail!("{key} is not set in {}", store.path().display()),
    }
    Ok(())
}

pub fn config_set(store: &ConfigStore, key: String, raw: &str) -> Result<()> {
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    store.set(key, value)?;
    Ok(())
}

pub async fn serve(store: ConfigStore, settings: &Settings, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| settings.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let bridge = Arc::new(Bridge::new(native(settings), store));
    server::serve(bridge, addr).await?;
    Ok(())
}

pub fn print_view(view: &ListingView) {
    match view {
        ListingView::Loading => println!("Loading..."),
        ListingView::Empty => println!("No elements were found!"),
        ListingView::Entries(entries) => {
            for entry in entries {
                println!("{}", format_entry(entry));
            }
        }
    }
}

pub fn format_entry(entry: &Entry) -> String {
    match entry.kind() {
        EntryKind::Directory => format!("[dir]  {}", truncate_middle(entry.display_name(), NAME_WIDTH)),
        EntryKind::Error(_) => format!("[err]  {}", entry.label()),
        EntryKind::File => {
            let label = entry.label();
            let label = if label.is_empty() { "-".to_string() } else { label };
            format!("[{label:<4}] {}", truncate_middle(entry.stem(), NAME_WIDTH))
        }
    }
}
