use super::*;

fn small_catalog() -> Catalog {
    let mut c = Catalog::new(
        "Skin",
        vec![
            LayerDefinition::new("Background", 0),
            LayerDefinition::new("Skin", 1),
            LayerDefinition::new("Ghost", 1).hidden(),
            LayerDefinition::new("Overlay", 13).with_omission(0.9),
        ],
    );
    c.z_overrides.insert("Overlay", "Sticker", 9);
    c.blend_overrides
        .insert("Overlay", "Blood", BlendMode::ColorBurn);
    c
}

#[test]
fn selectable_layers_skip_hidden_and_keep_declared_order() {
    let c = small_catalog();
    let names: Vec<(usize, &str)> = c
        .selectable_layers()
        .map(|(i, l)| (i, l.name.as_str()))
        .collect();
    assert_eq!(names, vec![(0, "Background"), (1, "Skin"), (3, "Overlay")]);
}

#[test]
fn resolve_z_prefers_item_override() {
    let c = small_catalog();
    assert_eq!(c.resolve_z("Overlay", "Sticker"), 9);
    assert_eq!(c.resolve_z("Overlay", "Anything Else"), 13);
    assert_eq!(c.resolve_z("Skin", "Pink"), 1);
    assert_eq!(c.resolve_z("Nope", "x"), 0);
}

#[test]
fn resolve_blend_defaults_to_normal() {
    let c = small_catalog();
    assert_eq!(c.resolve_blend("Overlay", "Blood"), BlendMode::ColorBurn);
    assert_eq!(c.resolve_blend("Overlay", "Sticker"), BlendMode::Normal);
    assert_eq!(c.resolve_blend("Skin", "Pink"), BlendMode::Normal);
}

#[test]
fn masking_rule_requires_listed_base_item() {
    let rule = MaskingRule {
        dependent: "Eye Color".to_string(),
        base: "Eyes".to_string(),
        allow: vec!["Classic".to_string()],
    };
    assert!(rule.allows(Some("Classic")));
    assert!(!rule.allows(Some("Chinese")));
    assert!(!rule.allows(None));
}

#[test]
fn builtin_catalog_is_valid() {
    let c = Catalog::builtin();
    c.validate().unwrap();
    assert_eq!(c.anchor(), "Skin");
    assert!(c.layer("UnclothedBase").unwrap().hidden);
    assert!(c.selectable_layers().all(|(_, l)| l.name != "UnclothedBase"));
    assert_eq!(c.resolve_z("Overlay", "Banana Sticker"), 9);
    assert_eq!(c.resolve_blend("Overlay", "M3 Blood"), BlendMode::ColorBurn);
    assert_eq!(c.weights_for("Skin").unwrap().get("Pink"), Some(&0.8));
    assert!(c.weights_for("Hair").is_none());
}

#[test]
fn validate_rejects_duplicate_layers() {
    let c = Catalog::new(
        "Skin",
        vec![LayerDefinition::new("Skin", 1), LayerDefinition::new("Skin", 2)],
    );
    let err = c.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate layer"));
}

#[test]
fn validate_rejects_bad_omission_and_anchor() {
    let c = Catalog::new("Skin", vec![LayerDefinition::new("Skin", 1).with_omission(1.5)]);
    assert!(c.validate().is_err());

    let c = Catalog::new("Skin", vec![LayerDefinition::new("Hair", 1)]);
    assert!(c.validate().unwrap_err().to_string().contains("anchor"));

    let c = Catalog::new("Skin", vec![LayerDefinition::new("Skin", 1).hidden()]);
    assert!(c.validate().is_err());
}

#[test]
fn validate_rejects_overweight_layers() {
    let mut c = small_catalog();
    c.weights.insert("Skin", "Pink", 0.8);
    c.weights.insert("Skin", "Blue", 0.3);
    assert!(c.validate().unwrap_err().to_string().contains("sum to"));
}

#[test]
fn validate_rejects_rules_on_unknown_layers() {
    let mut c = small_catalog();
    c.exclusions.push(ExclusionRule {
        layer: "Skin".to_string(),
        item: "Pink".to_string(),
        excludes: vec!["Hat".to_string()],
    });
    assert!(c.validate().unwrap_err().to_string().contains("'Hat'"));
}

#[test]
fn validate_requires_hidden_derived_target() {
    let mut c = small_catalog();
    c.derived.push(DerivedLayerRule {
        target: "Background".to_string(),
        source: "Skin".to_string(),
        trigger: "Overlay".to_string(),
    });
    assert!(c.validate().is_err());

    c.derived[0].target = "Ghost".to_string();
    c.validate().unwrap();
}

#[test]
fn json_catalog_parses_with_defaults_and_aliases() {
    let json = r#"{
        "anchor": "Skin",
        "layers": [
            {"name": "Skin", "z": 1},
            {"name": "Overlay", "z": 13, "omission_probability": 0.9}
        ],
        "weights": {"Skin": {"Pink": 0.8}},
        "blend_overrides": {"Overlay": {"M1 Blood": "colour-burn", "Glow": "screen"}}
    }"#;
    let c = Catalog::from_json_str(json).unwrap();
    assert_eq!(c.layers.len(), 2);
    assert!(!c.layers[0].hidden);
    assert_eq!(c.layers[0].omission_probability, 0.0);
    assert_eq!(c.resolve_blend("Overlay", "M1 Blood"), BlendMode::ColorBurn);
    assert_eq!(c.resolve_blend("Overlay", "Glow"), BlendMode::Screen);
    assert!(c.exclusions.is_empty());
}

#[test]
fn json_catalog_is_validated_on_load() {
    let json = r#"{"anchor": "Skin", "layers": [{"name": "Hair", "z": 7}]}"#;
    let err = Catalog::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("catalog error:"));

    assert!(Catalog::from_json_str("{").is_err());
}

#[test]
fn builtin_catalog_survives_json() {
    let c = Catalog::builtin();
    let json = c.to_json_string().unwrap();
    assert_eq!(Catalog::from_json_str(&json).unwrap(), c);
}
