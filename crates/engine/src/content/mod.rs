mod asset;
mod decode;
mod lazy;
mod loader;
mod manager;
mod source;
mod watch;

pub use asset::{AssetKind, AssetValue, ContentAsset, Glyph, IntTable, SpriteFont, StringTable, Texture};
pub use lazy::{AssetSlot, LazyAsset};
pub use loader::{ContentLoader, LoadError, SharedLoader};
pub use manager::ContentManager;
pub use source::{AssetSource, DirectorySource, MemorySource};
pub use watch::{ContentWatcher, WatchError};

#[cfg(test)]
pub(crate) use decode::encode_png;
