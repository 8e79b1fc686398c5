use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::catalog::model::Catalog;
use crate::foundation::error::{AvatarError, AvatarResult};

impl Catalog {
    /// Parse and validate a catalog from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> AvatarResult<Self> {
        let catalog: Self = serde_json::from_reader(r)
            .map_err(|e| AvatarError::catalog(format!("parse catalog JSON: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from a JSON string.
    pub fn from_json_str(s: &str) -> AvatarResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a catalog from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AvatarResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AvatarError::catalog(format!("open catalog JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty JSON, e.g. to seed a custom catalog file from the built-in one.
    pub fn to_json_string(&self) -> AvatarResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AvatarError::catalog(format!("serialize catalog JSON: {e}")))
    }
}
