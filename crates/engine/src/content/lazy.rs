use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::asset_key::CanonicalKey;

use super::asset::ContentAsset;
use super::loader::{LoadError, SharedLoader};

// The fetch runs at most once; clones share both the fetch and its outcome.
pub struct LazyAsset<T> {
    inner: Rc<LazyInner<T>>,
}

struct LazyInner<T> {
    key: CanonicalKey,
    fetch: Box<dyn Fn() -> Result<T, LoadError>>,
    value: OnceCell<Result<T, LoadError>>,
}

impl<T> LazyAsset<T> {
    pub fn new(key: CanonicalKey, fetch: impl Fn() -> Result<T, LoadError> + 'static) -> Self {
        Self {
            inner: Rc::new(LazyInner {
                key,
                fetch: Box::new(fetch),
                value: OnceCell::new(),
            }),
        }
    }

    pub fn key(&self) -> &CanonicalKey {
        &self.inner.key
    }

    pub fn get(&self) -> Result<&T, LoadError> {
        let inner = &*self.inner;
        match inner.value.get_or_init(|| (inner.fetch)()) {
            Ok(value) => Ok(value),
            Err(error) => Err(error.clone()),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.value.get().is_some()
    }

    pub fn shares_fetch_with(&self, other: &LazyAsset<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: ContentAsset> LazyAsset<T> {
    pub fn from_loader(content: SharedLoader, key: CanonicalKey) -> Self {
        let fetch_key = key.clone();
        Self::new(key, move || content.load::<T>(&fetch_key))
    }
}

impl<T> Clone for LazyAsset<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for LazyAsset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyAsset")
            .field("key", &self.inner.key)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum AssetSlot<T> {
    Empty,
    Ready(T),
    Deferred(LazyAsset<T>),
}

impl<T> Default for AssetSlot<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> AssetSlot<T> {
    pub fn get(&self) -> Result<Option<&T>, LoadError> {
        match self {
            Self::Empty => Ok(None),
            Self::Ready(value) => Ok(Some(value)),
            Self::Deferred(lazy) => lazy.get().map(Some),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Deferred(lazy) if lazy.is_resolved() => lazy.get().ok(),
            _ => None,
        }
    }

    pub fn deferred(&self) -> Option<&LazyAsset<T>> {
        match self {
            Self::Deferred(lazy) => Some(lazy),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    pub fn set_ready(&mut self, value: T) {
        *self = Self::Ready(value);
    }

    pub fn defer(&mut self, lazy: LazyAsset<T>) {
        *self = Self::Deferred(lazy);
    }
}
