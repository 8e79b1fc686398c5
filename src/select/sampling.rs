use std::collections::BTreeMap;

use crate::assets::inventory::AssetItem;
use crate::select::random::RandomSource;

/// Pick one item uniformly. Consumes one draw; `None` only for an empty slice.
pub fn pick_uniform<'a, R: RandomSource + ?Sized>(
    items: &'a [AssetItem],
    rng: &mut R,
) -> Option<&'a AssetItem> {
    if items.is_empty() {
        return None;
    }
    let u = rng.next_unit();
    let idx = ((u * items.len() as f64) as usize).min(items.len() - 1);
    items.get(idx)
}

/// Probability mass each item receives under `weights`.
///
/// Listed items get their explicit weight; unlisted items split `max(0, 1 - sum)` evenly, where
/// `sum` covers only listed items that are actually present.
pub fn item_masses(items: &[AssetItem], weights: &BTreeMap<String, f64>) -> Vec<f64> {
    let explicit: f64 = items
        .iter()
        .filter_map(|i| weights.get(&i.name))
        .sum();
    let unlisted = items
        .iter()
        .filter(|i| !weights.contains_key(&i.name))
        .count();
    let share = if unlisted > 0 {
        (1.0 - explicit).max(0.0) / unlisted as f64
    } else {
        0.0
    };

    items
        .iter()
        .map(|i| weights.get(&i.name).copied().unwrap_or(share))
        .collect()
}

/// Cumulative-distribution draw over [`item_masses`]. Consumes one draw.
///
/// Falls back to a uniform pick when the total mass is zero.
pub fn pick_weighted<'a, R: RandomSource + ?Sized>(
    items: &'a [AssetItem],
    weights: &BTreeMap<String, f64>,
    rng: &mut R,
) -> Option<&'a AssetItem> {
    if items.is_empty() {
        return None;
    }
    let masses = item_masses(items, weights);
    let total: f64 = masses.iter().sum();
    if total <= 0.0 {
        return pick_uniform(items, rng);
    }

    let roll = rng.next_unit() * total;
    let mut cumulative = 0.0;
    for (item, mass) in items.iter().zip(&masses) {
        cumulative += mass;
        if roll < cumulative {
            return Some(item);
        }
    }
    items.last()
}

#[cfg(test)]
#[path = "../../tests/unit/select/sampling.rs"]
mod tests;
