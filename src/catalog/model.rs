use std::collections::{BTreeMap, HashSet};

use crate::foundation::error::{AvatarError, AvatarResult};

/// Slack allowed when checking that a layer's explicit weights fit in unit mass.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One named depth slot in the avatar.
pub struct LayerDefinition {
    /// Category name; also the asset subdirectory name (case-sensitive).
    pub name: String,
    /// Default stacking height for every item in this layer.
    pub z: i32,
    /// Hidden layers are never rolled, only populated by derived-layer rules.
    #[serde(default)]
    pub hidden: bool,
    /// Chance in `[0, 1]` that the layer contributes nothing.
    #[serde(default)]
    pub omission_probability: f64,
}

impl LayerDefinition {
    /// Visible layer that is always rolled.
    pub fn new(name: impl Into<String>, z: i32) -> Self {
        Self {
            name: name.into(),
            z,
            hidden: false,
            omission_probability: 0.0,
        }
    }

    /// Builder: set the omission probability.
    pub fn with_omission(mut self, p: f64) -> Self {
        self.omission_probability = p;
        self
    }

    /// Builder: mark as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Compositing operation used when a layer is painted over the canvas.
pub enum BlendMode {
    /// Standard "source over destination" (straight alpha replace).
    #[default]
    Normal,
    /// `s * d`.
    Multiply,
    /// `s + d - s * d`.
    Screen,
    /// Hard light with source and backdrop swapped.
    Overlay,
    /// `min(s, d)`.
    Darken,
    /// `max(s, d)`.
    Lighten,
    /// Brighten the backdrop towards the source.
    ColorDodge,
    /// Darken the backdrop towards the source.
    #[serde(alias = "colour_burn", alias = "colour-burn", alias = "color-burn")]
    ColorBurn,
    /// W3C soft light.
    SoftLight,
    /// Multiply or screen depending on the source.
    HardLight,
    /// `|d - s|`.
    Difference,
    /// `d + s - 2 * d * s`.
    Exclusion,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Typed `layer -> item -> value` lookup table for per-item overrides.
pub struct OverrideTable<T> {
    entries: BTreeMap<String, BTreeMap<String, T>>,
}

impl<T> Default for OverrideTable<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> OverrideTable<T> {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the override for `(layer, item)`.
    pub fn insert(&mut self, layer: impl Into<String>, item: impl Into<String>, value: T) {
        self.entries
            .entry(layer.into())
            .or_default()
            .insert(item.into(), value);
    }

    /// Builder form of [`OverrideTable::insert`].
    pub fn with(mut self, layer: impl Into<String>, item: impl Into<String>, value: T) -> Self {
        self.insert(layer, item, value);
        self
    }

    /// Override for `(layer, item)`, or `None` when the default applies.
    pub fn get(&self, layer: &str, item: &str) -> Option<&T> {
        self.entries.get(layer).and_then(|items| items.get(item))
    }

    /// All overrides declared for `layer`.
    pub fn layer(&self, layer: &str) -> Option<&BTreeMap<String, T>> {
        self.entries.get(layer)
    }

    fn layers(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, T>)> {
        self.entries.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Choosing `item` in `layer` removes every layer named in `excludes`.
pub struct ExclusionRule {
    /// Layer whose choice triggers the rule.
    pub layer: String,
    /// Item that triggers the rule.
    pub item: String,
    /// Layers removed from the selection when the rule fires.
    pub excludes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// `dependent` survives only if `base` is selected with an item in `allow`.
pub struct MaskingRule {
    /// Layer that is dropped when the pairing is invalid.
    pub dependent: String,
    /// Layer the dependent is painted against.
    pub base: String,
    /// Base items compatible with the dependent layer.
    pub allow: Vec<String>,
}

impl MaskingRule {
    /// Whether `base_item` keeps the dependent selection valid.
    pub fn allows(&self, base_item: Option<&str>) -> bool {
        base_item.is_some_and(|item| self.allow.iter().any(|a| a == item))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Populate hidden layer `target` with the item chosen for `source`, only when `trigger` is also
/// selected.
pub struct DerivedLayerRule {
    /// Hidden layer being populated.
    pub target: String,
    /// Layer whose item is copied.
    pub source: String,
    /// Layer whose presence enables the rule.
    pub trigger: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Declarative trait catalog: layers, stacking order, omission odds and pruning rules.
///
/// Pure data. Lookups never fail; a missing override falls through to the layer default.
pub struct Catalog {
    /// Layer that every avatar must be able to draw from.
    pub anchor: String,
    /// Layers in declaration order. Declaration order is the roll order and the z tie-breaker.
    pub layers: Vec<LayerDefinition>,
    /// Explicit probability mass per item.
    #[serde(default)]
    pub weights: OverrideTable<f64>,
    /// Per-item stacking height.
    #[serde(default)]
    pub z_overrides: OverrideTable<i32>,
    /// Per-item compositing operation.
    #[serde(default)]
    pub blend_overrides: OverrideTable<BlendMode>,
    /// Applied in declaration order.
    #[serde(default)]
    pub exclusions: Vec<ExclusionRule>,
    /// Dependent/base compatibility rules.
    #[serde(default)]
    pub masks: Vec<MaskingRule>,
    /// Hidden-layer synthesis rules, evaluated once after pruning.
    #[serde(default)]
    pub derived: Vec<DerivedLayerRule>,
}

impl Catalog {
    /// Catalog with the given layers and no rules.
    pub fn new(anchor: impl Into<String>, layers: Vec<LayerDefinition>) -> Self {
        Self {
            anchor: anchor.into(),
            layers,
            weights: OverrideTable::new(),
            z_overrides: OverrideTable::new(),
            blend_overrides: OverrideTable::new(),
            exclusions: Vec::new(),
            masks: Vec::new(),
            derived: Vec::new(),
        }
    }

    /// Anchor category name.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Non-hidden layers, in declared order, paired with their declaration index.
    pub fn selectable_layers(&self) -> impl Iterator<Item = (usize, &LayerDefinition)> {
        self.layers.iter().enumerate().filter(|(_, l)| !l.hidden)
    }

    /// Layer definition by name.
    pub fn layer(&self, name: &str) -> Option<&LayerDefinition> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Declaration index of a layer by name.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// Explicit weight table for `layer`, if the layer uses weighted sampling.
    pub fn weights_for(&self, layer: &str) -> Option<&BTreeMap<String, f64>> {
        self.weights.layer(layer).filter(|w| !w.is_empty())
    }

    /// Stacking height: item override, else the layer's base z (0 for unknown layers).
    pub fn resolve_z(&self, layer: &str, item: &str) -> i32 {
        match self.z_overrides.get(layer, item) {
            Some(z) => *z,
            None => self.layer(layer).map_or(0, |l| l.z),
        }
    }

    /// Blend operation: item override, else [`BlendMode::Normal`].
    pub fn resolve_blend(&self, layer: &str, item: &str) -> BlendMode {
        match self.blend_overrides.get(layer, item) {
            Some(mode) => *mode,
            None => BlendMode::Normal,
        }
    }

    /// Structural checks run on every catalog before it is handed to the engine.
    pub fn validate(&self) -> AvatarResult<()> {
        let mut seen = HashSet::new();
        for layer in &self.layers {
            if layer.name.is_empty() {
                return Err(AvatarError::catalog("layer name must be non-empty"));
            }
            if !seen.insert(layer.name.as_str()) {
                return Err(AvatarError::catalog(format!(
                    "duplicate layer '{}'",
                    layer.name
                )));
            }
            let p = layer.omission_probability;
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(AvatarError::catalog(format!(
                    "layer '{}' omission_probability must be in [0, 1], got {p}",
                    layer.name
                )));
            }
        }

        match self.layer(&self.anchor) {
            None => {
                return Err(AvatarError::catalog(format!(
                    "anchor '{}' is not a declared layer",
                    self.anchor
                )));
            }
            Some(l) if l.hidden => {
                return Err(AvatarError::catalog(format!(
                    "anchor '{}' must not be hidden",
                    self.anchor
                )));
            }
            Some(_) => {}
        }

        for (layer, items) in self.weights.layers() {
            self.require_layer(layer, "weights")?;
            let mut sum = 0.0;
            for (item, w) in items {
                if !w.is_finite() || !(0.0..=1.0).contains(w) {
                    return Err(AvatarError::catalog(format!(
                        "weight for '{layer}/{item}' must be in [0, 1], got {w}"
                    )));
                }
                sum += w;
            }
            if sum > 1.0 + WEIGHT_SUM_EPSILON {
                return Err(AvatarError::catalog(format!(
                    "weights for '{layer}' sum to {sum}, more than 1"
                )));
            }
        }
        for (layer, _) in self.z_overrides.layers() {
            self.require_layer(layer, "z_overrides")?;
        }
        for (layer, _) in self.blend_overrides.layers() {
            self.require_layer(layer, "blend_overrides")?;
        }

        for rule in &self.exclusions {
            self.require_layer(&rule.layer, "exclusion rule")?;
            for target in &rule.excludes {
                self.require_layer(target, "exclusion target")?;
            }
        }

        for rule in &self.masks {
            self.require_layer(&rule.dependent, "masking rule")?;
            self.require_layer(&rule.base, "masking rule")?;
            if rule.dependent == rule.base {
                return Err(AvatarError::catalog(format!(
                    "masking rule for '{}' depends on itself",
                    rule.dependent
                )));
            }
        }

        for rule in &self.derived {
            self.require_layer(&rule.source, "derived rule")?;
            self.require_layer(&rule.trigger, "derived rule")?;
            let target = self.require_layer(&rule.target, "derived rule")?;
            if !target.hidden {
                return Err(AvatarError::catalog(format!(
                    "derived target '{}' must be a hidden layer",
                    rule.target
                )));
            }
        }

        Ok(())
    }

    fn require_layer(&self, name: &str, context: &str) -> AvatarResult<&LayerDefinition> {
        self.layer(name).ok_or_else(|| {
            AvatarError::catalog(format!("{context} references unknown layer '{name}'"))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
