use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::asset_key::CanonicalKey;

const ASSET_EXTENSIONS: [&str; 3] = ["png", "json", "xml"];
// Editors emit several events per save; a path is reported once it has been quiet this long.
const SETTLE_WINDOW: Duration = Duration::from_millis(75);

type Fingerprint = [u8; 32];

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("content root {path} is not accessible: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to watch {path}: {source}")]
    Notify {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

pub struct ContentWatcher {
    root: PathBuf,
    events: Receiver<notify::Result<Event>>,
    _watcher: RecommendedWatcher,
    pending: HashMap<PathBuf, Instant>,
    fingerprints: HashMap<PathBuf, Fingerprint>,
}

impl ContentWatcher {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, WatchError> {
        let root = root.as_ref();
        let root = fs::canonicalize(root).map_err(|source| WatchError::Root {
            path: root.to_path_buf(),
            source,
        })?;

        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })
        .map_err(|source| WatchError::Notify {
            path: root.clone(),
            source,
        })?;
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|source| WatchError::Notify {
                path: root.clone(),
                source,
            })?;

        // Edits made while the baseline is taken are already queued on `events`.
        let fingerprints = baseline(&root)?;
        debug!(
            root = %root.display(),
            file_count = fingerprints.len(),
            "content_watch_baseline"
        );
        Ok(Self {
            root,
            events,
            _watcher: watcher,
            pending: HashMap::new(),
            fingerprints,
        })
    }

    pub fn tracked_file_count(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn poll(&mut self) -> Vec<CanonicalKey> {
        self.poll_timeout(Duration::ZERO)
    }

    pub fn poll_timeout(&mut self, timeout: Duration) -> Vec<CanonicalKey> {
        let wait = match self.next_settle_in() {
            Some(left) => left.min(timeout),
            None => timeout,
        };
        if !wait.is_zero() {
            match self.events.recv_timeout(wait) {
                Ok(event) => self.record(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    warn!(root = %self.root.display(), "content_watch_disconnected");
                }
            }
        }
        while let Ok(event) = self.events.try_recv() {
            self.record(event);
        }
        self.take_settled()
    }

    fn next_settle_in(&self) -> Option<Duration> {
        self.pending
            .values()
            .map(|seen| SETTLE_WINDOW.saturating_sub(seen.elapsed()))
            .min()
    }

    fn record(&mut self, event: notify::Result<Event>) {
        let event = match event {
            Ok(event) => event,
            Err(error) => {
                warn!(root = %self.root.display(), error = %error, "content_watch_error");
                return;
            }
        };
        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => {}
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => {}
            _ => return,
        }
        let created = matches!(event.kind, EventKind::Create(_));
        let now = Instant::now();
        for path in event.paths {
            // Files can land in a new directory before its watch is registered.
            if created && path.is_dir() {
                match asset_files_under(&path) {
                    Ok(files) => {
                        for file in files {
                            self.mark_pending(&file, now);
                        }
                    }
                    Err(error) => {
                        warn!(error = %error, "content_dir_unreadable");
                    }
                }
                continue;
            }
            if is_asset_file(&path) {
                self.mark_pending(&path, now);
            }
        }
    }

    fn mark_pending(&mut self, path: &Path, seen: Instant) {
        if let Ok(rel) = path.strip_prefix(&self.root) {
            self.pending.insert(rel.to_path_buf(), seen);
        }
    }

    fn take_settled(&mut self) -> Vec<CanonicalKey> {
        let settled = self
            .pending
            .iter()
            .filter(|(_, seen)| seen.elapsed() >= SETTLE_WINDOW)
            .map(|(rel, _)| rel.clone())
            .collect::<Vec<_>>();

        let mut changed = BTreeSet::new();
        for rel in settled {
            self.pending.remove(&rel);
            match fs::read(self.root.join(&rel)) {
                Ok(bytes) => {
                    let digest = fingerprint(&bytes);
                    if self.fingerprints.insert(rel.clone(), digest) != Some(digest) {
                        changed.insert(asset_key_for(&rel));
                    }
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    if self.fingerprints.remove(&rel).is_some() {
                        changed.insert(asset_key_for(&rel));
                    }
                }
                Err(error) => {
                    warn!(path = %rel.display(), error = %error, "content_file_unreadable");
                }
            }
        }
        changed.into_iter().collect()
    }
}

fn asset_key_for(rel: &Path) -> CanonicalKey {
    let stem = rel.with_extension("");
    let segments = stem
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>();
    CanonicalKey::normalize(&segments.join("/"))
}

fn baseline(root: &Path) -> Result<HashMap<PathBuf, Fingerprint>, WatchError> {
    let mut fingerprints = HashMap::new();
    for path in asset_files_under(root)? {
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        match fs::read(&path) {
            Ok(bytes) => {
                fingerprints.insert(rel.to_path_buf(), fingerprint(&bytes));
            }
            Err(error) => {
                warn!(path = %path.display(), error = %error, "content_file_unreadable");
            }
        }
    }
    Ok(fingerprints)
}

fn asset_files_under(dir: &Path) -> Result<Vec<PathBuf>, WatchError> {
    let mut files = Vec::new();
    let mut dirs = vec![dir.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        let read_dir_error = |source| WatchError::ReadDir {
            path: dir.clone(),
            source,
        };
        for entry in fs::read_dir(&dir).map_err(read_dir_error)? {
            let entry = entry.map_err(read_dir_error)?;
            let file_type = entry.file_type().map_err(read_dir_error)?;
            let path = entry.path();
            if file_type.is_dir() {
                dirs.push(path);
            } else if is_asset_file(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

fn is_asset_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ASSET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn fingerprint(bytes: &[u8]) -> Fingerprint {
    Sha256::digest(bytes).into()
}
