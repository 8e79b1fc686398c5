use crate::{
    assets::inventory::AssetInventory,
    catalog::model::Catalog,
    select::random::RandomSource,
    select::sampling::{pick_uniform, pick_weighted},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// One chosen `(layer, item)` pair.
pub struct SelectedTrait {
    /// Layer category.
    pub layer: String,
    /// Item within the layer.
    pub item: String,
    /// Catalog declaration index of the layer; the z tie-breaker.
    pub order: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Per-roll `layer -> item` mapping, kept in declaration order.
pub struct TraitSelection {
    entries: Vec<SelectedTrait>,
}

impl TraitSelection {
    /// Set `layer` to `item`, replacing any earlier choice for that layer.
    pub fn insert(&mut self, order: usize, layer: impl Into<String>, item: impl Into<String>) {
        let layer = layer.into();
        let item = item.into();
        if let Some(existing) = self.entries.iter_mut().find(|e| e.layer == layer) {
            existing.item = item;
            existing.order = order;
        } else {
            let at = self.entries.partition_point(|e| e.order <= order);
            self.entries.insert(at, SelectedTrait { layer, item, order });
        }
    }

    /// Remove `layer`, returning the item it held.
    pub fn remove(&mut self, layer: &str) -> Option<String> {
        let idx = self.entries.iter().position(|e| e.layer == layer)?;
        Some(self.entries.remove(idx).item)
    }

    /// Item chosen for `layer`.
    pub fn get(&self, layer: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.layer == layer)
            .map(|e| e.item.as_str())
    }

    /// Whether `layer` currently holds a choice.
    pub fn contains(&self, layer: &str) -> bool {
        self.get(layer).is_some()
    }

    /// Choices in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SelectedTrait> {
        self.entries.iter()
    }

    /// Number of chosen layers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was chosen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Roll a rule-valid trait combination.
///
/// Runs, in order: omission and item rolls for every selectable layer, the masking pass, the
/// exclusion pass, and derived-layer synthesis. Layers with no items on disk are skipped without
/// consuming a draw.
pub fn roll_traits<R: RandomSource + ?Sized>(
    catalog: &Catalog,
    inventory: &AssetInventory,
    rng: &mut R,
) -> TraitSelection {
    let mut selection = TraitSelection::default();

    for (order, layer) in catalog.selectable_layers() {
        let items = inventory.items(&layer.name);
        if items.is_empty() {
            continue;
        }

        if layer.omission_probability > 0.0 && rng.next_unit() < layer.omission_probability {
            tracing::debug!(layer = %layer.name, "layer omitted");
            continue;
        }

        let picked = match catalog.weights_for(&layer.name) {
            Some(weights) => pick_weighted(items, weights, rng),
            None => pick_uniform(items, rng),
        };
        if let Some(item) = picked {
            selection.insert(order, &layer.name, &item.name);
        }
    }

    apply_masks(catalog, &mut selection);
    apply_exclusions(catalog, &mut selection);
    apply_derived(catalog, inventory, &mut selection);
    selection
}

/// Drop dependent selections whose base choice is outside the allow-list.
pub(crate) fn apply_masks(catalog: &Catalog, selection: &mut TraitSelection) {
    for rule in &catalog.masks {
        if !selection.contains(&rule.dependent) {
            continue;
        }
        if !rule.allows(selection.get(&rule.base)) {
            let dropped = selection.remove(&rule.dependent);
            tracing::debug!(
                layer = %rule.dependent,
                item = ?dropped,
                base = ?selection.get(&rule.base),
                "masked layer dropped"
            );
        }
    }
}

/// Fire exclusion rules in declaration order against the current selection.
pub(crate) fn apply_exclusions(catalog: &Catalog, selection: &mut TraitSelection) {
    for rule in &catalog.exclusions {
        if selection.get(&rule.layer) != Some(rule.item.as_str()) {
            continue;
        }
        for target in &rule.excludes {
            if let Some(item) = selection.remove(target) {
                tracing::debug!(
                    trigger = %format!("{}/{}", rule.layer, rule.item),
                    layer = %target,
                    item = %item,
                    "layer excluded"
                );
            }
        }
    }
}

/// Populate hidden layers from their source layer when the trigger layer is present.
///
/// The target only receives the item if a file of the same name exists in its own category.
pub(crate) fn apply_derived(
    catalog: &Catalog,
    inventory: &AssetInventory,
    selection: &mut TraitSelection,
) {
    for rule in &catalog.derived {
        let Some(item) = selection.get(&rule.source).map(str::to_string) else {
            continue;
        };
        if !selection.contains(&rule.trigger) {
            continue;
        }
        let Some(order) = catalog.layer_index(&rule.target) else {
            continue;
        };
        if !inventory.contains(&rule.target, &item) {
            tracing::debug!(layer = %rule.target, item = %item, "derived item missing on disk");
            continue;
        }
        tracing::debug!(layer = %rule.target, item = %item, "derived layer populated");
        selection.insert(order, &rule.target, item);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/select/roll.rs"]
mod tests;
