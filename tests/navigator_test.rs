use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dirnav::core::errors::{Error, Result};
use dirnav::models::Entry;
use dirnav::pages::browse::{Activation, Listed, ListingView, Navigator};
use dirnav::pages::Route;
use dirnav::services::Backend;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct FakeBackend {
    roots: Option<Vec<String>>,
    listings: HashMap<String, Vec<String>>,
    delays: HashMap<String, Duration>,
    files: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
    opened: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn new(roots: &[&str]) -> Self {
        Self {
            roots: Some(roots.iter().map(|r| r.to_string()).collect()),
            ..Default::default()
        }
    }

    fn listing(mut self, path: &str, names: &[&str]) -> Self {
        self.listings
            .insert(path.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    fn delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    fn file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_roots(&self) -> Result<Vec<String>> {
        self.roots
            .clone()
            .ok_or_else(|| Error::Other("bridge rejected get_mount_points".to_string()))
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(path.to_string());
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    async fn open_file(&self, path: &str) -> Result<Option<String>> {
        self.opened.lock().unwrap().push(path.to_string());
        Ok(self.files.get(path).cloned())
    }
}

fn names(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.name()).collect()
}

fn drive_c() -> FakeBackend {
    FakeBackend::new(&["C:/", "D:/"])
        .listing("C:/", &["Desktop/", "notes.txt", "(OS ERROR 5)"])
        .listing("C:/Desktop/", &["Projects/", "todo.md"])
        .listing("C:/Desktop/Projects/", &["dirnav/"])
        .listing("D:/", &["music/"])
        .file("C:/notes.txt", "remember the milk")
}

#[tokio::test]
async fn start_selects_first_root() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);

    assert!(!navigator.is_loading());
    navigator.start().await?;

    let state = navigator.state();
    assert_eq!(state.roots, vec!["C:/", "D:/"]);
    assert_eq!(state.current_root, "C:/");
    assert_eq!(state.path, "C:/");
    assert_eq!(
        names(&navigator.visible_entries()),
        vec!["Desktop/", "notes.txt", "(OS ERROR 5)"]
    );
    assert!(!navigator.can_go_back());
    assert!(!navigator.is_loading());
    assert_eq!(backend.calls(), vec!["C:/"]);
    Ok(())
}

#[tokio::test]
async fn error_entry_does_not_navigate() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;

    let activation = navigator.descend("(OS ERROR 5)").await?;
    assert_eq!(activation, Activation::Ignored);
    assert_eq!(backend.calls(), vec!["C:/"]);
    assert_eq!(navigator.path(), "C:/");
    Ok(())
}

#[tokio::test]
async fn directory_entry_lists_joined_path() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;

    let activation = navigator.descend("Desktop/").await?;
    match activation {
        Activation::Listed(Listed::Applied(entries)) => {
            assert_eq!(names(&entries), vec!["Projects/", "todo.md"]);
        }
        other => panic!("unexpected activation {other:?}"),
    }
    assert_eq!(backend.calls(), vec!["C:/", "C:/Desktop/"]);
    assert_eq!(navigator.path(), "C:/Desktop/");
    assert!(navigator.can_go_back());
    Ok(())
}

#[tokio::test]
async fn file_entry_opens_instead_of_listing() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;

    let activation = navigator.descend("notes.txt").await?;
    match activation {
        Activation::Opened(file) => {
            assert_eq!(file.path, "C:/notes.txt");
            assert_eq!(file.directory, "C:/");
            assert_eq!(file.name, "notes.txt");
            assert_eq!(file.content.as_deref(), Some("remember the milk"));
            assert_eq!(file.route, Route::Editor);
        }
        other => panic!("unexpected activation {other:?}"),
    }
    assert_eq!(backend.calls(), vec!["C:/"]);
    assert_eq!(*backend.opened.lock().unwrap(), vec!["C:/notes.txt"]);
    assert_eq!(navigator.path(), "C:/");
    Ok(())
}

#[tokio::test]
async fn ascend_strips_last_segment() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;
    navigator.descend("Desktop/").await?;
    navigator.descend("Projects/").await?;
    assert_eq!(navigator.path(), "C:/Desktop/Projects/");

    navigator.ascend().await?;
    assert_eq!(navigator.path(), "C:/Desktop/");
    assert_eq!(names(&navigator.visible_entries()), vec!["Projects/", "todo.md"]);

    navigator.ascend().await?;
    assert_eq!(navigator.path(), "C:/");
    Ok(())
}

#[tokio::test]
async fn ascend_at_root_is_noop() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;

    navigator.ascend().await?;
    assert_eq!(navigator.path(), "C:/");
    assert_eq!(backend.calls(), vec!["C:/"]);
    Ok(())
}

#[tokio::test]
async fn select_root_switches_drive() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;
    navigator.descend("Desktop/").await?;

    navigator.select_root("D:/").await?;
    let state = navigator.state();
    assert_eq!(state.current_root, "D:/");
    assert_eq!(state.path, "D:/");
    assert_eq!(names(&state.listing), vec!["music/"]);
    Ok(())
}

#[tokio::test]
async fn unknown_root_is_rejected() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;

    let err = navigator.select_root("Z:/").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(navigator.state().current_root, "C:/");
    Ok(())
}

#[tokio::test]
async fn filter_never_touches_listing() -> anyhow::Result<()> {
    let backend = Arc::new(FakeBackend::new(&["C:/"]).listing("C:/", &["notes.txt", "readme.md"]));
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;

    navigator.set_filter("not");
    assert_eq!(names(&navigator.visible_entries()), vec!["notes.txt"]);
    assert_eq!(names(&navigator.state().listing), vec!["notes.txt", "readme.md"]);

    navigator.set_filter("nothing here");
    assert_eq!(navigator.view(), ListingView::Empty);

    navigator.set_filter("");
    assert_eq!(navigator.visible_entries().len(), 2);
    assert_eq!(backend.calls(), vec!["C:/"]);
    Ok(())
}

#[tokio::test]
async fn refresh_keeps_path() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;
    navigator.descend("Desktop/").await?;

    navigator.refresh().await?;
    assert_eq!(navigator.path(), "C:/Desktop/");
    assert_eq!(backend.calls(), vec!["C:/", "C:/Desktop/", "C:/Desktop/"]);
    Ok(())
}

#[tokio::test]
async fn failed_listing_keeps_previous_state() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.start().await?;
    let before = navigator.state();

    let err = navigator.descend("Missing/").await.unwrap_err();
    assert!(err.is_unavailable());

    let after = navigator.state();
    assert_eq!(after.path, before.path);
    assert_eq!(after.listing, before.listing);
    assert!(!after.loading);
    assert!(after.pending.is_none());
    assert!(after.last_error.is_some());
    Ok(())
}

#[tokio::test]
async fn failed_roots_leave_empty_set() {
    let backend = Arc::new(FakeBackend::default());
    let navigator = Navigator::with_timeout(backend, TIMEOUT);

    let err = navigator.start().await.unwrap_err();
    assert!(matches!(err, Error::BackendUnavailable(_)));
    let state = navigator.state();
    assert!(state.roots.is_empty());
    assert!(!state.loading);
    assert!(state.last_error.is_some());
}

#[tokio::test(start_paused = true)]
async fn timeout_clears_loading() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c().delay("C:/Desktop/", Duration::from_secs(60)));
    let navigator = Navigator::with_timeout(backend.clone(), Duration::from_secs(1));
    navigator.start().await?;

    let err = navigator.descend("Desktop/").await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
    assert!(!navigator.is_loading());
    assert_eq!(navigator.path(), "C:/");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stale_response_is_discarded() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c().delay("C:/Desktop/", Duration::from_millis(500)));
    let navigator = Arc::new(Navigator::with_timeout(backend.clone(), TIMEOUT));
    navigator.start().await?;

    let slow = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.descend("Desktop/").await })
    };
    // Let the slow request get issued first.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(navigator.is_loading());
    assert_eq!(navigator.state().pending.as_deref(), Some("C:/Desktop/"));

    navigator.select_root("D:/").await?;
    assert!(!navigator.is_loading());

    let slow = slow.await??;
    assert_eq!(slow, Activation::Listed(Listed::Superseded));

    let state = navigator.state();
    assert_eq!(state.path, "D:/");
    assert_eq!(names(&state.listing), vec!["music/"]);
    assert!(!state.loading);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn loading_holds_until_latest_settles() -> anyhow::Result<()> {
    let backend = Arc::new(
        drive_c()
            .delay("C:/Desktop/", Duration::from_millis(100))
            .delay("D:/", Duration::from_millis(300)),
    );
    let navigator = Arc::new(Navigator::with_timeout(backend.clone(), TIMEOUT));
    navigator.start().await?;

    let first = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.descend("Desktop/").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.select_root("D:/").await })
    };

    assert_eq!(first.await??, Activation::Listed(Listed::Superseded));
    assert!(navigator.is_loading());

    second.await??;
    assert!(!navigator.is_loading());
    assert_eq!(navigator.path(), "D:/");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropped_request_clears_loading() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c().delay("C:/Desktop/", Duration::from_millis(500)));
    let navigator = Arc::new(Navigator::with_timeout(backend.clone(), TIMEOUT));
    navigator.start().await?;

    let task = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.descend("Desktop/").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(navigator.is_loading());

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    let state = navigator.state();
    assert!(!state.loading);
    assert!(state.pending.is_none());
    assert_eq!(state.path, "C:/");
    assert_ne!(navigator.view(), ListingView::Loading);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropped_stale_request_keeps_newer_loading() -> anyhow::Result<()> {
    let backend = Arc::new(
        drive_c()
            .delay("C:/Desktop/", Duration::from_millis(500))
            .delay("D:/", Duration::from_millis(500)),
    );
    let navigator = Arc::new(Navigator::with_timeout(backend.clone(), TIMEOUT));
    navigator.start().await?;

    let older = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.descend("Desktop/").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let newer = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.select_root("D:/").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    older.abort();
    assert!(older.await.unwrap_err().is_cancelled());
    assert!(navigator.is_loading());
    assert_eq!(navigator.state().pending.as_deref(), Some("D:/"));

    newer.await??;
    assert!(!navigator.is_loading());
    assert_eq!(navigator.path(), "D:/");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stale_failure_is_superseded_not_error() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c().delay("C:/Missing/", Duration::from_millis(500)));
    let navigator = Arc::new(Navigator::with_timeout(backend.clone(), TIMEOUT));
    navigator.start().await?;

    let slow = {
        let navigator = navigator.clone();
        tokio::spawn(async move { navigator.descend("Missing/").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    navigator.select_root("D:/").await?;

    assert_eq!(slow.await??, Activation::Listed(Listed::Superseded));
    let state = navigator.state();
    assert_eq!(state.path, "D:/");
    assert!(state.last_error.is_none());
    Ok(())
}

#[tokio::test]
async fn list_directory_appends_separator() -> anyhow::Result<()> {
    let backend = Arc::new(drive_c());
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.list_roots().await?;

    navigator.list_directory("C:/Desktop").await?;
    assert_eq!(navigator.path(), "C:/Desktop/");
    assert_eq!(navigator.state().current_root, "C:/");
    assert_eq!(backend.calls(), vec!["C:/Desktop/"]);
    Ok(())
}

#[tokio::test]
async fn ascend_stops_at_nested_root() -> anyhow::Result<()> {
    let backend = Arc::new(
        FakeBackend::new(&["/", "/mnt/data/"])
            .listing("/", &["mnt/"])
            .listing("/mnt/", &["data/"])
            .listing("/mnt/data/", &["scores/"])
            .listing("/mnt/data/scores/", &["etude.eki"]),
    );
    let navigator = Navigator::with_timeout(backend.clone(), TIMEOUT);
    navigator.list_roots().await?;
    navigator.select_root("/mnt/data/").await?;
    navigator.descend("scores/").await?;

    navigator.ascend().await?;
    assert_eq!(navigator.path(), "/mnt/data/");
    assert!(!navigator.can_go_back());

    navigator.ascend().await?;
    navigator.ascend().await?;
    assert_eq!(navigator.path(), "/mnt/data/");
    assert_eq!(navigator.state().current_root, "/mnt/data/");
    assert_eq!(
        backend.calls(),
        vec!["/mnt/data/", "/mnt/data/scores/", "/mnt/data/"]
    );
    Ok(())
}
