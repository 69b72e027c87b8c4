//! Watch mode: report HTML pages that were created or edited

use notify::event::{Event, EventKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::warn;

/// Quiet period that groups an editor's burst of writes into one batch
const SETTLE: Duration = Duration::from_millis(300);
const IDLE_WAKEUP: Duration = Duration::from_secs(3600);
const PAGE_EXTENSIONS: [&str; 2] = ["html", "htm"];

type EventResult = notify::Result<Event>;

/// Watches a page or a site directory
pub struct HtmlWatcher {
    // dropping the watcher stops event delivery
    _inner: RecommendedWatcher,
    events: Receiver<EventResult>,
}

impl HtmlWatcher {
    /// Watch a directory recursively, or a single page through its parent
    pub fn watch(target: &Path) -> notify::Result<Self> {
        let (tx, events) = mpsc::channel::<EventResult>();
        let mut inner = notify::recommended_watcher(move |res: EventResult| {
            let _ = tx.send(res);
        })?;

        let (root, mode) = if target.is_dir() {
            (target, RecursiveMode::Recursive)
        } else {
            let parent = target
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            (parent, RecursiveMode::NonRecursive)
        };
        inner.watch(root, mode)?;

        Ok(Self {
            _inner: inner,
            events,
        })
    }

    /// `.html` / `.htm` (any case), never inside `node_modules`
    pub fn is_html_file(path: &Path) -> bool {
        let vendored = path.components().any(|c| c.as_os_str() == "node_modules");
        let page = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| PAGE_EXTENSIONS.iter().any(|p| ext.eq_ignore_ascii_case(p)));
        page && !vendored
    }

    /// Pages touched by one event; removals and metadata-only events are skipped
    fn changed_pages(event: &Event) -> impl Iterator<Item = &PathBuf> {
        let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
        event
            .paths
            .iter()
            .filter(move |p| relevant && Self::is_html_file(p))
    }

    fn collect(batch: &mut BTreeSet<PathBuf>, res: EventResult) {
        match res {
            Ok(event) => batch.extend(Self::changed_pages(&event).cloned()),
            Err(err) => warn!(error = %err, "watch error"),
        }
    }

    /// Block until something changes, let the burst settle, then return the
    /// changed pages sorted and without duplicates. Empty on idle timeout or
    /// when the watcher has shut down.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut batch = BTreeSet::new();
        let Ok(first) = self.events.recv_timeout(IDLE_WAKEUP) else {
            return Vec::new();
        };
        Self::collect(&mut batch, first);

        std::thread::sleep(SETTLE);
        for res in self.events.try_iter() {
            Self::collect(&mut batch, res);
        }
        batch.into_iter().collect()
    }
}
