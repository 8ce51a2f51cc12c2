use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use crate::asset_key::CanonicalKey;

use super::asset::{AssetKind, AssetValue, ContentAsset};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("no content found for asset '{key}'")]
    ResourceNotFound { key: CanonicalKey },
    #[error("asset '{key}' is a {actual}, not a {expected}")]
    WrongKind {
        key: CanonicalKey,
        expected: AssetKind,
        actual: AssetKind,
    },
    #[error("failed to read asset '{key}' from {path}: {message}")]
    Read {
        key: CanonicalKey,
        path: PathBuf,
        message: String,
    },
    #[error("failed to decode asset '{key}': {message}")]
    Decode { key: CanonicalKey, message: String },
}

impl LoadError {
    pub fn key(&self) -> &CanonicalKey {
        match self {
            Self::ResourceNotFound { key }
            | Self::WrongKind { key, .. }
            | Self::Read { key, .. }
            | Self::Decode { key, .. } => key,
        }
    }
}

pub trait ContentLoader {
    fn load_value(&self, key: &CanonicalKey, kind: AssetKind) -> Result<AssetValue, LoadError>;
}

pub type SharedLoader = Rc<dyn ContentLoader>;

impl dyn ContentLoader + '_ {
    pub fn load<T: ContentAsset>(&self, key: &CanonicalKey) -> Result<T, LoadError> {
        let value = self.load_value(key, T::KIND)?;
        let actual = value.kind();
        T::from_value(value).ok_or_else(|| LoadError::WrongKind {
            key: key.clone(),
            expected: T::KIND,
            actual,
        })
    }
}
