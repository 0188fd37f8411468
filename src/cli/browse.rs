use std::sync::Arc;

use anyhow::Result;
use dirnav::core::config::{ConfigStore, Settings};
use dirnav::models::truncate_middle;
use dirnav::pages::browse::{Activation, Listed, ListingView, Navigator, VirtualList};
use dirnav::services::bridge::Bridge;
use dirnav::services::Backend;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{format_entry, native, print_view};

const HELP: &str = "\
commands:
  ls               show the current listing
  cd NAME          enter a directory or open a file
  up               go to the parent directory
  refresh          list the current directory again
  drives           show available drives
  drive ROOT       switch drive
  filter [TEXT]    filter entries (no TEXT clears)
  quit";

pub async fn run(store: ConfigStore, settings: &Settings) -> Result<()> {
    let bridge = Arc::new(Bridge::new(native(settings), store));
    let navigator = Navigator::new(bridge, settings);
    // One terminal line per row, two lines of header.
    let mut list = VirtualList::new(1, 2);

    if let Err(e) = navigator.start().await {
        println!("could not load drives: {e}");
    }
    show(&navigator, &mut list);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let outcome = match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("{HELP}");
                continue;
            }
            "ls" => Ok(None),
            "drives" => {
                for root in navigator.state().roots {
                    println!("{root}");
                }
                continue;
            }
            "cd" => match navigator.descend(arg).await {
                Ok(Activation::Opened(file)) => {
                    println!("--- {} ({}) ---", file.path, file.route.title());
                    match file.content {
                        Some(text) => print!("{text}"),
                        None => println!("(not a text file)"),
                    }
                    continue;
                }
                Ok(Activation::Ignored) => {
                    println!("{arg} cannot be opened");
                    continue;
                }
                Ok(Activation::Listed(listed)) => Ok(Some(listed)),
                Err(e) => Err(e),
            },
            "up" => navigator.ascend().await.map(Some),
            "refresh" => navigator.refresh().await.map(Some),
            "drive" => navigator.select_root(arg).await.map(Some),
            "filter" => {
                navigator.set_filter(arg);
                Ok(None)
            }
            other => {
                println!("unknown command {other:?}, try help");
                continue;
            }
        };

        match outcome {
            Ok(Some(Listed::Superseded)) => continue,
            Ok(_) => show(&navigator, &mut list),
            Err(e) => println!("error: {e}"),
        }
    }
    Ok(())
}

fn show<B: Backend + ?Sized>(navigator: &Navigator<B>, list: &mut VirtualList) {
    let state = navigator.state();
    list.resize(terminal_rows());
    let back = if state.can_go_back() { "^" } else { " " };
    println!("{back} {}", truncate_middle(&state.path, 90));

    match state.view() {
        ListingView::Entries(entries) => {
            let range = list.visible_range(0, entries.len());
            let hidden = entries.len() - range.len();
            for entry in &entries[range] {
                println!("{}", format_entry(entry));
            }
            if hidden > 0 {
                println!("... {hidden} more (use filter)");
            }
        }
        view => print_view(&view),
    }
}

fn terminal_rows() -> u32 {
    std::env::var("LINES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(24)
}
