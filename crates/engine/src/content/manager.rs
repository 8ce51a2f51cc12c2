use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::asset_key::CanonicalKey;

use super::asset::{AssetKind, AssetValue};
use super::loader::{ContentLoader, LoadError};
use super::source::AssetSource;

pub struct ContentManager {
    source: Box<dyn AssetSource>,
    cache: RefCell<HashMap<CanonicalKey, AssetValue>>,
    source_reads: Cell<u64>,
}

impl ContentManager {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RefCell::new(HashMap::new()),
            source_reads: Cell::new(0),
        }
    }

    pub fn invalidate(&self, key: &CanonicalKey) -> bool {
        let removed = self.cache.borrow_mut().remove(key).is_some();
        debug!(key = %key, removed, "content_cache_invalidated");
        removed
    }

    pub fn is_cached(&self, key: &CanonicalKey) -> bool {
        self.cache.borrow().contains_key(key)
    }

    pub fn source_reads(&self) -> u64 {
        self.source_reads.get()
    }

    pub fn describe_source(&self) -> String {
        self.source.describe()
    }
}

impl ContentLoader for ContentManager {
    fn load_value(&self, key: &CanonicalKey, kind: AssetKind) -> Result<AssetValue, LoadError> {
        if let Some(value) = self.cache.borrow().get(key) {
            trace!(key = %key, kind = %kind, "content_cache_hit");
            return Ok(value.clone());
        }

        self.source_reads.set(self.source_reads.get() + 1);
        let value = self.source.read(key, kind)?;
        debug!(key = %key, kind = %value.kind(), "content_loaded");
        self.cache.borrow_mut().insert(key.clone(), value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::super::asset::Texture;
    use super::super::loader::SharedLoader;
    use super::super::source::MemorySource;
    use super::*;

    fn key(raw: &str) -> CanonicalKey {
        CanonicalKey::normalize(raw)
    }

    #[test]
    fn serves_repeat_loads_from_cache() {
        let source = MemorySource::new();
        source.insert("LooseSprites/Cursors", Texture::solid(1, 1, [9, 9, 9, 255]));
        let manager = ContentManager::new(source);

        let first = (&manager as &dyn ContentLoader)
            .load::<Texture>(&key("loosesprites/cursors"))
            .expect("first");
        let second = (&manager as &dyn ContentLoader)
            .load::<Texture>(&key("LOOSESPRITES/CURSORS"))
            .expect("second");
        assert_eq!(first, second);
        assert_eq!(manager.source_reads(), 1);
    }

    #[test]
    fn invalidate_forces_reread_of_replaced_content() {
        let source = MemorySource::new();
        source.insert("maps/springobjects", Texture::solid(1, 1, [1, 0, 0, 255]));
        let manager = Rc::new(ContentManager::new(source.clone()));
        let loader: SharedLoader = manager.clone();
        let key = key("maps/springobjects");

        let before = loader.load::<Texture>(&key).expect("before");
        source.insert("maps/springobjects", Texture::solid(1, 1, [0, 1, 0, 255]));
        assert_eq!(loader.load::<Texture>(&key).expect("cached"), before);

        assert!(manager.invalidate(&key));
        assert!(!manager.is_cached(&key));
        let after = loader.load::<Texture>(&key).expect("after");
        assert_eq!(after.pixel(0, 0), Some([0, 1, 0, 255]));
        assert_eq!(manager.source_reads(), 2);
    }

    #[test]
    fn typed_load_reports_wrong_kind() {
        let source = MemorySource::new();
        source.insert("data/achievements", Texture::solid(1, 1, [0, 0, 0, 0]));
        let manager = ContentManager::new(source);
        let error = (&manager as &dyn ContentLoader)
            .load::<crate::content::IntTable>(&key("data/achievements"))
            .expect_err("wrong kind");
        assert_eq!(
            error,
            LoadError::WrongKind {
                key: key("data/achievements"),
                expected: AssetKind::IntTable,
                actual: AssetKind::Texture,
            }
        );
    }

    #[test]
    fn missing_content_is_not_cached() {
        let manager = ContentManager::new(MemorySource::new());
        let key = key("fonts/smallfont");
        let error = manager
            .load_value(&key, AssetKind::Font)
            .expect_err("missing");
        assert_eq!(error, LoadError::ResourceNotFound { key: key.clone() });
        assert!(!manager.is_cached(&key));
    }
}
