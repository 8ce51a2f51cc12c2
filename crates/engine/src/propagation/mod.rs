mod dispatcher;
mod handler;
mod scan;

use thiserror::Error;

use crate::asset_key::CanonicalKey;
use crate::content::LoadError;
use crate::reflection::FieldError;

pub use dispatcher::{AssetPropagator, PropagatorBuilder, TableError};
pub use handler::{
    bind_slot, load_asset, AssetHandler, Binding, EagerBind, FnHandler, HandlerContext, HandlerFn,
    LazyBind, ReflectProbe, ReflectedBind, SlotProbe,
};
pub use scan::{CandidateProbe, CandidateSlot, CategoryProbe, CategoryScan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationResult {
    Applied,
    NotApplicable,
}

impl PropagationResult {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropagationError {
    #[error("asset '{key}' has a live consumer but could not be loaded: {source}")]
    ResourceNotFound {
        key: CanonicalKey,
        #[source]
        source: LoadError,
    },
    #[error("handler for asset '{key}' does not match the host's field layout: {source}")]
    FieldShapeMismatch {
        key: CanonicalKey,
        #[source]
        source: FieldError,
    },
}

impl PropagationError {
    pub fn load(key: &CanonicalKey, source: LoadError) -> Self {
        Self::ResourceNotFound {
            key: key.clone(),
            source,
        }
    }

    pub fn shape(key: &CanonicalKey, source: FieldError) -> Self {
        Self::FieldShapeMismatch {
            key: key.clone(),
            source,
        }
    }

    pub fn key(&self) -> &CanonicalKey {
        match self {
            Self::ResourceNotFound { key, .. } | Self::FieldShapeMismatch { key, .. } => key,
        }
    }
}
