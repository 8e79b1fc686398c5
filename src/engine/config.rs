use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{AvatarError, AvatarResult};

/// Environment variable consulted when no asset root is configured.
pub const ASSETS_PATH_ENV: &str = "TRAITFORGE_ASSETS_PATH";

const DEFAULT_FILE_PREFIX: &str = "avatar";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Generator settings, usually read once at process start.
pub struct GeneratorConfig {
    /// Layered asset pack root. Falls back to [`ASSETS_PATH_ENV`] when unset.
    pub asset_root: Option<PathBuf>,
    /// Custom catalog JSON; the built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Where generated PNGs are written; the system temp directory when unset.
    pub output_dir: Option<PathBuf>,
    /// File name prefix for generated PNGs.
    pub file_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            asset_root: None,
            catalog_path: None,
            output_dir: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> AvatarResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| AvatarError::config(format!("parse generator config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(s: &str) -> AvatarResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AvatarResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AvatarError::config(format!("open generator config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject prefixes that would escape the output directory.
    pub fn validate(&self) -> AvatarResult<()> {
        if self.file_prefix.is_empty() {
            return Err(AvatarError::config("file_prefix must be non-empty"));
        }
        if self.file_prefix.contains(['/', '\\']) || self.file_prefix.contains("..") {
            return Err(AvatarError::config(
                "file_prefix must not contain path separators or '..'",
            ));
        }
        Ok(())
    }

    /// Configured asset root, else the non-empty value of [`ASSETS_PATH_ENV`].
    pub fn asset_root(&self) -> Option<PathBuf> {
        self.asset_root.clone().or_else(|| {
            std::env::var_os(ASSETS_PATH_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
