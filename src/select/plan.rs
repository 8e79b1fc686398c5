use std::path::PathBuf;

use xxhash_rust::xxh3::Xxh3;

use crate::{
    assets::inventory::AssetInventory,
    catalog::model::{BlendMode, Catalog},
    foundation::error::{AvatarError, AvatarResult},
    select::roll::TraitSelection,
};

const XXH3_SEED: u64 = 0x5eed_a7a7_0f1c_e11d;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// One layer ready for compositing.
pub struct PlannedLayer {
    /// Layer category.
    pub layer: String,
    /// Item within the layer.
    pub item: String,
    /// Trait file to decode.
    pub path: PathBuf,
    /// Resolved stacking height.
    pub z: i32,
    /// Resolved compositing operation.
    pub blend: BlendMode,
    /// Catalog declaration index; breaks z ties.
    pub order: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Final paint order for one avatar: lowest z first, ties in declaration order.
pub struct AvatarPlan {
    layers: Vec<PlannedLayer>,
}

/// Stable 128-bit identity of a plan (layer, item, z, blend in paint order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlanFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl std::fmt::Display for PlanFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

impl AvatarPlan {
    /// Resolve z and blend for every selected trait and sort into paint order.
    ///
    /// Fails with [`AvatarError::NoTraitsAvailable`] when the selection is empty.
    pub fn resolve(
        catalog: &Catalog,
        inventory: &AssetInventory,
        selection: &TraitSelection,
    ) -> AvatarResult<Self> {
        if selection.is_empty() {
            return Err(AvatarError::no_traits_available(inventory.root()));
        }

        let mut layers = Vec::with_capacity(selection.len());
        for chosen in selection.iter() {
            let asset = inventory.find(&chosen.layer, &chosen.item).ok_or_else(|| {
                AvatarError::asset_decode(&chosen.layer, &chosen.item, "item not present on disk")
            })?;
            layers.push(PlannedLayer {
                layer: chosen.layer.clone(),
                item: chosen.item.clone(),
                path: asset.path.clone(),
                z: catalog.resolve_z(&chosen.layer, &chosen.item),
                blend: catalog.resolve_blend(&chosen.layer, &chosen.item),
                order: chosen.order,
            });
        }
        layers.sort_by_key(|l| (l.z, l.order));

        Ok(Self { layers })
    }

    /// Layers in paint order (bottom first).
    pub fn layers(&self) -> &[PlannedLayer] {
        &self.layers
    }

    /// Bottom layer, painted as the canvas.
    pub fn base(&self) -> &PlannedLayer {
        &self.layers[0]
    }

    /// Everything painted over the base, in order.
    pub fn overlays(&self) -> &[PlannedLayer] {
        &self.layers[1..]
    }

    /// `(layer, item)` pairs in paint order.
    pub fn traits(&self) -> Vec<(&str, &str)> {
        self.layers
            .iter()
            .map(|l| (l.layer.as_str(), l.item.as_str()))
            .collect()
    }

    /// Item painted for `layer`, if any.
    pub fn item_for(&self, layer: &str) -> Option<&str> {
        self.layers
            .iter()
            .find(|l| l.layer == layer)
            .map(|l| l.item.as_str())
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false for a resolved plan; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Stable fingerprint, independent of file locations.
    pub fn fingerprint(&self) -> PlanFingerprint {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        for l in &self.layers {
            h.update(l.layer.as_bytes());
            h.update(&[0]);
            h.update(l.item.as_bytes());
            h.update(&[0]);
            h.update(&l.z.to_le_bytes());
            h.update(&[blend_tag(l.blend)]);
        }
        let v = h.digest128();
        PlanFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn blend_tag(b: BlendMode) -> u8 {
    match b {
        BlendMode::Normal => 0,
        BlendMode::Multiply => 1,
        BlendMode::Screen => 2,
        BlendMode::Overlay => 3,
        BlendMode::Darken => 4,
        BlendMode::Lighten => 5,
        BlendMode::ColorDodge => 6,
        BlendMode::ColorBurn => 7,
        BlendMode::SoftLight => 8,
        BlendMode::HardLight => 9,
        BlendMode::Difference => 10,
        BlendMode::Exclusion => 11,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/select/plan.rs"]
mod tests;
