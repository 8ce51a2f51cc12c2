use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::asset_key::CanonicalKey;
use crate::compat::HostVersion;
use crate::content::{ContentAsset, SharedLoader};

use super::handler::{
    AssetHandler, Binding, EagerBind, FnHandler, HandlerContext, HandlerFn, LazyBind,
    ReflectProbe, ReflectedBind, SlotProbe,
};
use super::scan::CategoryScan;
use super::{PropagationError, PropagationResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("asset key '{key}' is registered more than once")]
    DuplicateKey { key: CanonicalKey },
    #[error("asset key '{raw}' normalizes to an empty key")]
    EmptyKey { raw: String },
}

pub struct AssetPropagator<W> {
    version: HostVersion,
    exact: HashMap<CanonicalKey, Box<dyn AssetHandler<W>>>,
    namespaces: Vec<(CanonicalKey, Box<dyn AssetHandler<W>>)>,
}

impl<W: 'static> AssetPropagator<W> {
    pub fn builder(version: HostVersion) -> PropagatorBuilder<W> {
        PropagatorBuilder::new(version)
    }
}

impl<W> AssetPropagator<W> {
    pub fn version(&self) -> HostVersion {
        self.version
    }

    pub fn exact_handler_count(&self) -> usize {
        self.exact.len()
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    pub fn handles_exact(&self, key: &CanonicalKey) -> bool {
        self.exact.contains_key(key)
    }

    pub fn propagate(
        &self,
        content: &SharedLoader,
        world: &mut W,
        raw_key: &str,
    ) -> Result<bool, PropagationError> {
        let key = CanonicalKey::normalize(raw_key);
        self.propagate_key(content, world, &key)
            .map(PropagationResult::is_applied)
    }

    pub fn propagate_key(
        &self,
        content: &SharedLoader,
        world: &mut W,
        key: &CanonicalKey,
    ) -> Result<PropagationResult, PropagationError> {
        let (phase, handler) = match self.exact.get(key) {
            Some(handler) => ("exact", handler),
            None => match self
                .namespaces
                .iter()
                .find(|(prefix, _)| key.starts_with(prefix))
            {
                Some((_, handler)) => ("namespace", handler),
                None => {
                    trace!(key = %key, "asset_propagation_unhandled");
                    return Ok(PropagationResult::NotApplicable);
                }
            },
        };

        let outcome = handler.apply(HandlerContext {
            key,
            content,
            world,
        });
        match &outcome {
            Ok(PropagationResult::Applied) => debug!(
                key = %key,
                phase,
                handler = handler.label(),
                "asset_propagated"
            ),
            Ok(PropagationResult::NotApplicable) => trace!(
                key = %key,
                phase,
                handler = handler.label(),
                "asset_propagation_not_applicable"
            ),
            Err(error) => warn!(
                key = %key,
                phase,
                handler = handler.label(),
                error = %error,
                "asset_propagation_failed"
            ),
        }
        outcome
    }
}

pub struct PropagatorBuilder<W> {
    version: HostVersion,
    exact: HashMap<CanonicalKey, Box<dyn AssetHandler<W>>>,
    namespaces: Vec<(CanonicalKey, Box<dyn AssetHandler<W>>)>,
    errors: Vec<TableError>,
}

impl<W: 'static> PropagatorBuilder<W> {
    pub fn new(version: HostVersion) -> Self {
        Self {
            version,
            exact: HashMap::new(),
            namespaces: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn version(&self) -> HostVersion {
        self.version
    }

    pub fn handler(mut self, raw_key: &str, handler: impl AssetHandler<W> + 'static) -> Self {
        let Some(key) = self.checked_key(raw_key) else {
            return self;
        };
        if self.exact.insert(key.clone(), Box::new(handler)).is_some() {
            self.errors.push(TableError::DuplicateKey { key });
        }
        self
    }

    pub fn versioned(
        self,
        raw_key: &str,
        legacy: impl AssetHandler<W> + 'static,
        modern: impl AssetHandler<W> + 'static,
    ) -> Self {
        match self.version {
            HostVersion::Legacy => self.handler(raw_key, legacy),
            HostVersion::Modern => self.handler(raw_key, modern),
        }
    }

    pub fn eager<T: ContentAsset>(self, raw_key: &str, target: SlotProbe<W, T>) -> Self {
        self.handler(raw_key, EagerBind::new(target))
    }

    pub fn lazy<T: ContentAsset>(self, raw_key: &str, target: SlotProbe<W, T>) -> Self {
        self.handler(raw_key, LazyBind::new(target))
    }

    pub fn reflected<T: ContentAsset>(
        self,
        raw_key: &str,
        owner: ReflectProbe<W>,
        field: &'static str,
        binding: Binding,
    ) -> Self {
        self.handler(raw_key, ReflectedBind::<W, T>::new(owner, field, binding))
    }

    pub fn custom(self, raw_key: &str, label: &'static str, apply: HandlerFn<W>) -> Self {
        self.handler(raw_key, FnHandler::new(label, apply))
    }

    pub fn namespace(mut self, raw_prefix: &str, handler: impl AssetHandler<W> + 'static) -> Self {
        let Some(prefix) = self.checked_key(raw_prefix) else {
            return self;
        };
        if self.namespaces.iter().any(|(existing, _)| *existing == prefix) {
            self.errors.push(TableError::DuplicateKey { key: prefix });
            return self;
        }
        self.namespaces.push((prefix, Box::new(handler)));
        self
    }

    pub fn scan<C: 'static, T: ContentAsset>(self, scan: CategoryScan<W, C, T>) -> Self {
        let prefix = scan.namespace().to_string();
        self.namespace(&prefix, scan)
    }

    pub fn build(self) -> Result<AssetPropagator<W>, TableError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        let mut namespaces = self.namespaces;
        // Longest prefix wins when namespaces nest.
        namespaces.sort_by(|(a, _), (b, _)| b.as_str().len().cmp(&a.as_str().len()));
        Ok(AssetPropagator {
            version: self.version,
            exact: self.exact,
            namespaces,
        })
    }

    fn checked_key(&mut self, raw: &str) -> Option<CanonicalKey> {
        let key = CanonicalKey::normalize(raw);
        if key.is_empty() {
            self.errors.push(TableError::EmptyKey {
                raw: raw.to_string(),
            });
            return None;
        }
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::content::{
        AssetKind, AssetSlot, AssetSource, AssetValue, ContentLoader, IntTable, LoadError,
        MemorySource, Texture,
    };
    use crate::reflection::{FieldError, Reflect};

    struct CountingLoader {
        source: MemorySource,
        fetches: Cell<u32>,
    }

    impl ContentLoader for CountingLoader {
        fn load_value(&self, key: &CanonicalKey, kind: AssetKind) -> Result<AssetValue, LoadError> {
            self.fetches.set(self.fetches.get() + 1);
            self.source.read(key, kind)
        }
    }

    struct Fixture {
        source: MemorySource,
        counter: Rc<CountingLoader>,
        loader: SharedLoader,
    }

    impl Fixture {
        fn new() -> Self {
            let source = MemorySource::new();
            let counter = Rc::new(CountingLoader {
                source: source.clone(),
                fetches: Cell::new(0),
            });
            let loader: SharedLoader = counter.clone();
            Self {
                source,
                counter,
                loader,
            }
        }

        fn fetches(&self) -> u32 {
            self.counter.fetches.get()
        }
    }

    #[derive(Default)]
    struct Hidden {
        shadow: AssetSlot<Texture>,
        label: String,
    }

    crate::reflect_fields!(Hidden as "Hidden" {
        "shadowTexture" => shadow,
        "label" => label,
    });

    struct Hut {
        kind: Option<String>,
        texture: AssetSlot<Texture>,
    }

    impl Hut {
        fn new(kind: &str) -> Self {
            Self {
                kind: Some(kind.to_string()),
                texture: AssetSlot::Empty,
            }
        }
    }

    #[derive(Default)]
    struct World {
        cursors: AssetSlot<Texture>,
        achievements: AssetSlot<IntTable>,
        rain: AssetSlot<Texture>,
        player_portrait: Option<AssetSlot<Texture>>,
        hidden: Hidden,
        huts: Vec<Hut>,
    }

    fn hidden_owner(world: &mut World) -> Option<&mut dyn Reflect> {
        Some(&mut world.hidden)
    }

    fn live_huts(world: &mut World) -> Vec<&mut Hut> {
        world.huts.iter_mut().collect()
    }

    fn hut_kind(hut: &Hut) -> Option<&str> {
        hut.kind.as_deref()
    }

    fn hut_texture(hut: &mut Hut) -> &mut AssetSlot<Texture> {
        &mut hut.texture
    }

    fn propagator(binding: Binding) -> AssetPropagator<World> {
        AssetPropagator::builder(HostVersion::Modern)
            .eager(r"LooseSprites\Cursors", |world: &mut World| {
                Some(&mut world.cursors)
            })
            .eager("Data/Achievements", |world: &mut World| {
                Some(&mut world.achievements)
            })
            .lazy("TileSheets/Rain", |world: &mut World| Some(&mut world.rain))
            .eager("Portraits/Player", |world: &mut World| {
                world.player_portrait.as_mut()
            })
            .reflected::<Texture>("LooseSprites/Shadow", hidden_owner, "shadowTexture", binding)
            .reflected::<Texture>("LooseSprites/Label", hidden_owner, "label", Binding::Eager)
            .scan(CategoryScan::new(
                r"Buildings\",
                live_huts,
                hut_kind,
                hut_texture,
                binding,
            ))
            .build()
            .expect("table")
    }

    fn red() -> Texture {
        Texture::solid(1, 1, [255, 0, 0, 255])
    }

    fn blue() -> Texture {
        Texture::solid(1, 1, [0, 0, 255, 255])
    }

    #[test]
    fn eager_handler_stores_value_and_reads_without_fetching() {
        let fixture = Fixture::new();
        fixture.source.insert("loosesprites/cursors", red());
        let table = propagator(Binding::Eager);
        let mut world = World::default();

        let applied = table
            .propagate(&fixture.loader, &mut world, "LOOSESPRITES/CURSORS")
            .expect("propagate");
        assert!(applied);
        assert!(world.cursors.is_ready());
        assert_eq!(fixture.fetches(), 1);
        assert_eq!(world.cursors.get(), Ok(Some(&red())));
        assert_eq!(fixture.fetches(), 1);
    }

    #[test]
    fn lazy_handler_fetches_once_on_first_access() {
        let fixture = Fixture::new();
        fixture.source.insert("tilesheets/rain", blue());
        let table = propagator(Binding::Eager);
        let mut world = World::default();

        table
            .propagate(&fixture.loader, &mut world, r"TileSheets\Rain")
            .expect("propagate");
        assert!(world.rain.is_deferred());
        assert_eq!(fixture.fetches(), 0);

        assert_eq!(world.rain.get(), Ok(Some(&blue())));
        assert_eq!(world.rain.get(), Ok(Some(&blue())));
        assert_eq!(fixture.fetches(), 1);
    }

    #[test]
    fn propagation_is_idempotent() {
        let fixture = Fixture::new();
        fixture
            .source
            .insert("data/achievements", IntTable::from([(1, "Greenhorn".to_string())]));
        let table = propagator(Binding::Eager);
        let mut world = World::default();

        table
            .propagate(&fixture.loader, &mut world, "data/achievements")
            .expect("first");
        let once = world.achievements.ready().cloned();
        table
            .propagate(&fixture.loader, &mut world, "data/achievements")
            .expect("second");
        assert_eq!(world.achievements.ready().cloned(), once);
        assert_eq!(once.map(|table| table.len()), Some(1));
    }

    #[test]
    fn absent_target_is_not_applicable_and_loads_nothing() {
        let fixture = Fixture::new();
        fixture.source.insert("portraits/player", red());
        let table = propagator(Binding::Eager);
        let mut world = World::default();

        let result = table
            .propagate_key(
                &fixture.loader,
                &mut world,
                &CanonicalKey::normalize("portraits/player"),
            )
            .expect("propagate");
        assert_eq!(result, PropagationResult::NotApplicable);
        assert_eq!(fixture.fetches(), 0);
        assert!(world.player_portrait.is_none());
    }

    #[test]
    fn unknown_key_is_not_applicable() {
        let fixture = Fixture::new();
        let table = propagator(Binding::Eager);
        let mut world = World::default();
        assert!(!table
            .propagate(&fixture.loader, &mut world, "Characters/Abigail")
            .expect("propagate"));
    }

    #[test]
    fn matched_handler_with_missing_content_surfaces_resource_error() {
        let fixture = Fixture::new();
        let table = propagator(Binding::Eager);
        let mut world = World::default();

        let error = table
            .propagate(&fixture.loader, &mut world, "loosesprites/cursors")
            .expect_err("missing content");
        assert!(matches!(error, PropagationError::ResourceNotFound { .. }));
        assert!(world.cursors.is_empty());
    }

    #[test]
    fn reflected_field_is_written_through_accessor() {
        let fixture = Fixture::new();
        fixture.source.insert("loosesprites/shadow", red());
        let table = propagator(Binding::Eager);
        let mut world = World::default();

        assert!(table
            .propagate(&fixture.loader, &mut world, "LooseSprites/Shadow")
            .expect("propagate"));
        assert_eq!(world.hidden.shadow.ready(), Some(&red()));
    }

    #[test]
    fn reflected_type_drift_is_field_shape_mismatch() {
        let fixture = Fixture::new();
        fixture.source.insert("loosesprites/label", red());
        let table = propagator(Binding::Eager);
        let mut world = World::default();
        world.hidden.label = "unchanged".to_string();

        let error = table
            .propagate(&fixture.loader, &mut world, "loosesprites/label")
            .expect_err("shape mismatch");
        let PropagationError::FieldShapeMismatch { source, .. } = error else {
            panic!("expected shape mismatch, got {error:?}");
        };
        assert!(matches!(source, FieldError::TypeMismatch { .. }));
        assert_eq!(world.hidden.label, "unchanged");
        assert_eq!(fixture.fetches(), 0);
    }

    #[test]
    fn scan_broadcasts_to_every_matching_category() {
        let fixture = Fixture::new();
        fixture.source.insert("buildings/barn", red());
        let table = propagator(Binding::Eager);
        let mut world = World {
            huts: vec![Hut::new("Barn"), Hut::new("Silo"), Hut::new("barn")],
            ..World::default()
        };

        assert!(table
            .propagate(&fixture.loader, &mut world, "buildings/barn")
            .expect("propagate"));
        assert_eq!(world.huts[0].texture.ready(), Some(&red()));
        assert!(world.huts[1].texture.is_empty());
        assert_eq!(world.huts[2].texture.ready(), Some(&red()));
        assert_eq!(fixture.fetches(), 1);
    }

    #[test]
    fn lazy_scan_shares_one_fetch_across_matches() {
        let fixture = Fixture::new();
        fixture.source.insert("buildings/coop", blue());
        let table = propagator(Binding::Lazy);
        let mut world = World {
            huts: vec![Hut::new("Coop"), Hut::new("Coop")],
            ..World::default()
        };

        table
            .propagate(&fixture.loader, &mut world, "Buildings/Coop")
            .expect("propagate");
        assert_eq!(fixture.fetches(), 0);
        assert_eq!(world.huts[0].texture.get(), Ok(Some(&blue())));
        assert_eq!(world.huts[1].texture.get(), Ok(Some(&blue())));
        assert_eq!(fixture.fetches(), 1);
    }

    #[test]
    fn scan_without_matches_is_not_applicable() {
        let fixture = Fixture::new();
        fixture.source.insert("buildings/stable", red());
        let table = propagator(Binding::Eager);
        let mut world = World {
            huts: vec![Hut::new("Silo")],
            ..World::default()
        };

        assert!(!table
            .propagate(&fixture.loader, &mut world, "buildings/stable")
            .expect("propagate"));
        assert!(world.huts[0].texture.is_empty());
        assert_eq!(fixture.fetches(), 0);
    }

    #[test]
    fn scan_follows_category_changes_between_calls() {
        let fixture = Fixture::new();
        fixture.source.insert("buildings/deluxe barn", red());
        let table = propagator(Binding::Eager);
        let mut world = World {
            huts: vec![Hut::new("Barn")],
            ..World::default()
        };

        assert!(!table
            .propagate(&fixture.loader, &mut world, "buildings/deluxe barn")
            .expect("before upgrade"));
        world.huts[0].kind = Some("Deluxe Barn".to_string());
        assert!(table
            .propagate(&fixture.loader, &mut world, "buildings/deluxe barn")
            .expect("after upgrade"));
    }

    #[test]
    fn builder_rejects_duplicate_and_empty_keys() {
        let duplicate = AssetPropagator::<World>::builder(HostVersion::Modern)
            .eager("a/b", |world: &mut World| Some(&mut world.cursors))
            .eager(r"A\B", |world: &mut World| Some(&mut world.rain))
            .build();
        assert_eq!(
            duplicate.err(),
            Some(TableError::DuplicateKey {
                key: CanonicalKey::normalize("a/b"),
            })
        );

        let empty = AssetPropagator::<World>::builder(HostVersion::Modern)
            .eager("  ", |world: &mut World| Some(&mut world.cursors))
            .build();
        assert!(matches!(empty.err(), Some(TableError::EmptyKey { .. })));
    }

    #[test]
    fn versioned_entry_is_selected_at_build_time() {
        for version in HostVersion::ALL {
            let table = AssetPropagator::<World>::builder(version)
                .versioned(
                    "tilesheets/rain",
                    EagerBind::new(|world: &mut World| Some(&mut world.rain)),
                    LazyBind::new(|world: &mut World| Some(&mut world.rain)),
                )
                .build()
                .expect("table");
            let fixture = Fixture::new();
            fixture.source.insert("tilesheets/rain", red());
            let mut world = World::default();
            table
                .propagate(&fixture.loader, &mut world, "tilesheets/rain")
                .expect("propagate");
            assert_eq!(table.version(), version);
            assert_eq!(world.rain.is_deferred(), version == HostVersion::Modern);
        }
    }
}
