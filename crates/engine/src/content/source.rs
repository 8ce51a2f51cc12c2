use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::asset_key::{CanonicalKey, CANONICAL_SEPARATOR};

use super::asset::{AssetKind, AssetValue};
use super::decode::decode_asset;
use super::loader::LoadError;

pub trait AssetSource {
    fn read(&self, key: &CanonicalKey, kind: AssetKind) -> Result<AssetValue, LoadError>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, key: &CanonicalKey, kind: AssetKind) -> Option<PathBuf> {
        let segments = key
            .as_str()
            .split(CANONICAL_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        if segments.iter().any(|segment| matches!(*segment, "." | "..")) {
            return None;
        }
        let (file_stem, dirs) = segments.split_last()?;
        let mut current = self.root.clone();
        for dir in dirs {
            current = find_entry(&current, dir, true)?;
        }
        let file_name = format!("{file_stem}.{}", kind.file_extension());
        find_entry(&current, &file_name, false)
    }
}

fn find_entry(dir: &Path, name: &str, want_dir: bool) -> Option<PathBuf> {
    let exact = dir.join(name);
    if matches_kind(&exact, want_dir) {
        return Some(exact);
    }
    let entries = fs::read_dir(dir).ok()?;
    let mut matches = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|file_name| file_name.to_str())
                .is_some_and(|file_name| file_name.to_lowercase() == name)
        })
        .filter(|path| matches_kind(path, want_dir))
        .collect::<Vec<_>>();
    matches.sort();
    matches.into_iter().next()
}

fn matches_kind(path: &Path, want_dir: bool) -> bool {
    if want_dir {
        path.is_dir()
    } else {
        path.is_file()
    }
}

impl AssetSource for DirectorySource {
    fn read(&self, key: &CanonicalKey, kind: AssetKind) -> Result<AssetValue, LoadError> {
        let path = self
            .resolve(key, kind)
            .ok_or_else(|| LoadError::ResourceNotFound { key: key.clone() })?;
        let bytes = fs::read(&path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => LoadError::ResourceNotFound { key: key.clone() },
            _ => LoadError::Read {
                key: key.clone(),
                path: path.clone(),
                message: error.to_string(),
            },
        })?;
        decode_asset(key, kind, &bytes)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: Rc<RefCell<HashMap<CanonicalKey, AssetValue>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, raw_key: &str, value: impl Into<AssetValue>) -> Option<AssetValue> {
        self.assets
            .borrow_mut()
            .insert(CanonicalKey::normalize(raw_key), value.into())
    }

    pub fn remove(&self, raw_key: &str) -> Option<AssetValue> {
        self.assets
            .borrow_mut()
            .remove(&CanonicalKey::normalize(raw_key))
    }

    pub fn len(&self) -> usize {
        self.assets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.borrow().is_empty()
    }
}

impl AssetSource for MemorySource {
    fn read(&self, key: &CanonicalKey, _kind: AssetKind) -> Result<AssetValue, LoadError> {
        self.assets
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| LoadError::ResourceNotFound { key: key.clone() })
    }

    fn describe(&self) -> String {
        format!("memory ({} assets)", self.len())
    }
}
