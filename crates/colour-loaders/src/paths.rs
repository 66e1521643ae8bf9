//! Raw dataset directory resolution.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable for overriding the raw dataset root.
pub const DATASETS_ENV_VAR: &str = "COLOUR_DATASETS_DIR";

/// Root pinned with [`set_datasets_root`].
static ROOT_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Get the raw dataset root directory.
///
/// Resolution order:
/// 1. Root pinned with [`set_datasets_root`]
/// 2. `COLOUR_DATASETS_DIR` environment variable
/// 3. `datasets/` directory relative to workspace root
///
/// # Example
///
/// ```rust,ignore
/// let root = colour_loaders::paths::datasets_root();
/// let luo = root.join("3270903");
/// ```
pub fn datasets_root() -> PathBuf {
    if let Some(root) = ROOT_OVERRIDE.get() {
        return root.clone();
    }
    if let Ok(root) = std::env::var(DATASETS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../datasets")
}

/// Pins the raw dataset root for the rest of the process.
///
/// Only affects sources created afterwards. Pinning the same directory
/// again is accepted; a different one is handed back as the error.
pub fn set_datasets_root(root: impl Into<PathBuf>) -> Result<(), PathBuf> {
    match ROOT_OVERRIDE.set(root.into()) {
        Ok(()) => Ok(()),
        Err(root) if ROOT_OVERRIDE.get() == Some(&root) => Ok(()),
        Err(root) => Err(root),
    }
}

/// Directory name used for a dataset identifier.
///
/// DOI-style identifiers contain `/`, which is replaced by `_`.
pub fn dataset_dir_name(dataset_id: &str) -> String {
    dataset_id.replace(['/', '\\'], "_")
}

/// Whether `file` stays inside a dataset directory when joined to it.
///
/// Only plain relative components are accepted: no root, drive prefix,
/// `.` or `..`.
pub fn is_contained(file: &str) -> bool {
    !file.is_empty()
        && Path::new(file)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
