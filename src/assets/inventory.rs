use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use crate::catalog::model::Catalog;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One selectable trait file on disk.
pub struct AssetItem {
    /// Extension-stripped file name.
    pub name: String,
    /// Absolute or root-relative path of the file.
    pub path: PathBuf,
}

#[derive(Clone, Debug, Default)]
/// Snapshot of the asset root: which items exist for each catalog layer.
///
/// Derived purely from directory listings; there is no manifest. Items per layer are sorted by
/// name so that a fixed sequence of random draws always maps to the same items.
pub struct AssetInventory {
    root: PathBuf,
    items: HashMap<String, Vec<AssetItem>>,
}

impl AssetInventory {
    /// List every catalog layer's directory under `root`.
    ///
    /// Missing or unreadable category directories produce zero items, never an error.
    #[tracing::instrument(skip(root, catalog), fields(root = %root.as_ref().display()))]
    pub fn scan(root: impl AsRef<Path>, catalog: &Catalog) -> Self {
        let root = root.as_ref().to_path_buf();
        let mut items = HashMap::new();
        for layer in &catalog.layers {
            let listed = list_category(&root.join(&layer.name));
            if !listed.is_empty() {
                items.insert(layer.name.clone(), listed);
            }
        }
        tracing::debug!(categories = items.len(), "scanned asset root");
        Self { root, items }
    }

    /// List only the anchor category; used by the availability probe.
    pub fn scan_layer(root: impl AsRef<Path>, layer: &str) -> Vec<AssetItem> {
        list_category(&root.as_ref().join(layer))
    }

    /// Build an inventory from explicit item names, resolving paths as `<root>/<layer>/<item>.png`.
    pub fn from_items<L, I, S>(root: impl Into<PathBuf>, layers: L) -> Self
    where
        L: IntoIterator<Item = (S, I)>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = root.into();
        let mut items = HashMap::new();
        for (layer, names) in layers {
            let layer: String = layer.into();
            let mut listed: Vec<AssetItem> = names
                .into_iter()
                .map(|n| {
                    let name: String = n.into();
                    let path = root.join(&layer).join(format!("{name}.png"));
                    AssetItem { name, path }
                })
                .collect();
            listed.sort_by(|a, b| a.name.cmp(&b.name));
            listed.dedup_by(|a, b| a.name == b.name);
            if !listed.is_empty() {
                items.insert(layer, listed);
            }
        }
        Self { root, items }
    }

    /// Root directory the inventory was taken from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Items for `layer` in name order; empty when the category is absent.
    pub fn items(&self, layer: &str) -> &[AssetItem] {
        self.items.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `layer` holds an item called `item`.
    pub fn contains(&self, layer: &str, item: &str) -> bool {
        self.find(layer, item).is_some()
    }

    /// File backing `(layer, item)`.
    pub fn find(&self, layer: &str, item: &str) -> Option<&AssetItem> {
        self.items(layer).iter().find(|i| i.name == item)
    }

    /// Whether no catalog layer has any item.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn list_category(dir: &Path) -> Vec<AssetItem> {
    let rd = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "unreadable category directory");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = rd
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    files.sort();

    let mut by_name = BTreeMap::<String, PathBuf>::new();
    for path in files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if by_name.contains_key(stem) {
            tracing::warn!(path = %path.display(), "duplicate item name, keeping first file");
            continue;
        }
        by_name.insert(stem.to_string(), path);
    }

    by_name
        .into_iter()
        .map(|(name, path)| AssetItem { name, path })
        .collect()
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| image::ImageFormat::from_extension(ext).is_some())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/inventory.rs"]
mod tests;
