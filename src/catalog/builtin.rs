use crate::catalog::model::{
    BlendMode, Catalog, DerivedLayerRule, ExclusionRule, LayerDefinition, MaskingRule,
    OverrideTable,
};

/// Layer every generated avatar must be able to draw from.
pub const ANCHOR_LAYER: &str = "Skin";

const MASKABLE_EYES: [&str; 7] = [
    "Classic", "Crying", "Dilated", "Heart", "Sleepy", "Sparkle", "Teary",
];

const BLOOD_OVERLAYS: [&str; 4] = ["M1 Blood", "M2 Blood", "M3 Blood", "M4 Blood"];

impl Catalog {
    /// The built-in avatar catalog, matching the stock layered asset pack.
    pub fn builtin() -> Self {
        let layers = vec![
            LayerDefinition::new("Background", 0),
            LayerDefinition::new(ANCHOR_LAYER, 1),
            // Skin variant drawn under shirts; only ever set by the derived rule below.
            LayerDefinition::new("UnclothedBase", 1).hidden(),
            LayerDefinition::new("Face", 2),
            LayerDefinition::new("Eyes", 3),
            LayerDefinition::new("Eye Color", 4),
            LayerDefinition::new("Mouth", 4),
            LayerDefinition::new("Neck", 5),
            LayerDefinition::new("Necklaces", 5).with_omission(2.0 / 3.0),
            LayerDefinition::new("Shirt", 6),
            LayerDefinition::new("Hair", 7),
            LayerDefinition::new("Brows", 8),
            LayerDefinition::new("Earrings", 9),
            LayerDefinition::new("Face Decoration", 10).with_omission(0.8),
            LayerDefinition::new("Glasses", 10).with_omission(0.75),
            LayerDefinition::new("Hat", 11).with_omission(0.5),
            LayerDefinition::new("Overlay", 13).with_omission(0.9),
        ];

        let mut blend_overrides = OverrideTable::new();
        for item in BLOOD_OVERLAYS {
            blend_overrides.insert("Overlay", item, BlendMode::ColorBurn);
        }

        Self {
            anchor: ANCHOR_LAYER.to_string(),
            layers,
            weights: OverrideTable::new().with(ANCHOR_LAYER, "Pink", 0.8),
            z_overrides: OverrideTable::new().with("Overlay", "Banana Sticker", 9),
            blend_overrides,
            exclusions: vec![
                ExclusionRule {
                    layer: "Hat".to_string(),
                    item: "Strawberry Hat".to_string(),
                    excludes: vec!["Hair".to_string(), "Earrings".to_string()],
                },
                ExclusionRule {
                    layer: "Eyes".to_string(),
                    item: "Chinese".to_string(),
                    excludes: vec!["Brows".to_string()],
                },
            ],
            masks: vec![MaskingRule {
                dependent: "Eye Color".to_string(),
                base: "Eyes".to_string(),
                allow: MASKABLE_EYES.iter().map(|s| s.to_string()).collect(),
            }],
            derived: vec![DerivedLayerRule {
                target: "UnclothedBase".to_string(),
                source: ANCHOR_LAYER.to_string(),
                trigger: "Shirt".to_string(),
            }],
        }
    }
}
