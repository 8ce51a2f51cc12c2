use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod asset_key;
mod compat;
pub mod content;
pub mod propagation;
mod reflection;

pub use asset_key::{normalize_asset_key, CanonicalKey, CANONICAL_SEPARATOR};
pub use compat::{HostVersion, HostVersionError};
pub use content::{
    AssetKind, AssetSlot, AssetSource, AssetValue, ContentAsset, ContentLoader, ContentManager,
    ContentWatcher, DirectorySource, Glyph, IntTable, LazyAsset, LoadError, MemorySource,
    SharedLoader, SpriteFont, StringTable, Texture, WatchError,
};
pub use propagation::{
    AssetHandler, AssetPropagator, Binding, CategoryScan, EagerBind, FnHandler, HandlerContext,
    LazyBind, PropagationError, PropagationResult, PropagatorBuilder, ReflectedBind, TableError,
};
pub use reflection::{check_field, field_mut, field_ref, FieldError, Reflect, ReflectedField};

pub const ROOT_ENV_VAR: &str = "HOTSWAP_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub content_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "HOTSWAP_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and a content/ directory."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and content/.\n\
Set {env_var} explicitly, for example:\n\
PowerShell: $env:{env_var}=\"C:\\path\\to\\hotswap\"\n\
Bash/zsh: export {env_var}=\"/path/to/hotswap\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    Ok(app_paths_for(root))
}

pub fn app_paths_for(root: PathBuf) -> AppPaths {
    let content_dir = root.join("content");
    AppPaths { root, content_dir }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join("content").is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn repo_marker_requires_cargo_toml_and_content_dir() {
        let temp = TempDir::new().expect("temp");
        assert!(!is_repo_marker(temp.path()));

        fs::write(temp.path().join("Cargo.toml"), "[workspace]\n").expect("write");
        assert!(!is_repo_marker(temp.path()));

        fs::create_dir(temp.path().join("content")).expect("mkdir");
        assert!(is_repo_marker(temp.path()));
    }

    #[test]
    fn content_dir_sits_under_root() {
        let paths = app_paths_for(PathBuf::from("/srv/hotswap"));
        assert_eq!(paths.content_dir, PathBuf::from("/srv/hotswap/content"));
    }
}
