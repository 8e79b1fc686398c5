use super::*;
use crate::select::random::{DrawSequence, SeededRandom};

fn inventory(layers: &[(&str, &[&str])]) -> AssetInventory {
    AssetInventory::from_items(
        "/assets",
        layers
            .iter()
            .map(|(layer, items)| (layer.to_string(), items.iter().map(|s| s.to_string()))),
    )
}

fn full_inventory() -> AssetInventory {
    inventory(&[
        ("Background", &["Blue", "Sunset"]),
        ("Skin", &["Pink", "Tan", "Pale", "Green"]),
        ("UnclothedBase", &["Pink", "Tan", "Pale"]),
        ("Face", &["Round"]),
        ("Eyes", &["Classic", "Chinese", "Heart", "Angry"]),
        ("Eye Color", &["Blue", "Red"]),
        ("Mouth", &["Smile", "Frown"]),
        ("Neck", &["Plain"]),
        ("Necklaces", &["Gold", "Pearl"]),
        ("Shirt", &["Tee", "Hoodie"]),
        ("Hair", &["Bob", "Long", "Pigtails"]),
        ("Brows", &["Thin", "Thick"]),
        ("Earrings", &["Hoop"]),
        ("Face Decoration", &["Freckles"]),
        ("Glasses", &["Round"]),
        ("Hat", &["Strawberry Hat", "Beanie"]),
        ("Overlay", &["Banana Sticker", "M1 Blood"]),
    ])
}

fn names(selection: &TraitSelection) -> Vec<(&str, &str)> {
    selection
        .iter()
        .map(|t| (t.layer.as_str(), t.item.as_str()))
        .collect()
}

#[test]
fn selection_insert_keeps_declaration_order() {
    let mut s = TraitSelection::default();
    s.insert(7, "Hair", "Bob");
    s.insert(1, "Skin", "Pink");
    s.insert(3, "Eyes", "Classic");
    s.insert(7, "Hair", "Long");
    assert_eq!(
        names(&s),
        vec![("Skin", "Pink"), ("Eyes", "Classic"), ("Hair", "Long")]
    );
    assert_eq!(s.remove("Eyes").as_deref(), Some("Classic"));
    assert!(s.remove("Eyes").is_none());
    assert_eq!(s.len(), 2);
}

#[test]
fn strawberry_hat_excludes_hair_and_earrings() {
    let catalog = Catalog::builtin();
    let inv = inventory(&[
        ("Skin", &["Pink"]),
        ("Hair", &["Bob"]),
        ("Earrings", &["Hoop"]),
        ("Hat", &["Strawberry Hat"]),
    ]);
    // Skin, Hair, Earrings item rolls; Hat omission roll (kept); Hat item roll.
    let mut rng = DrawSequence::new(vec![0.0, 0.0, 0.0, 0.9, 0.0]);
    let s = roll_traits(&catalog, &inv, &mut rng);
    assert_eq!(rng.consumed(), 5);
    assert_eq!(names(&s), vec![("Skin", "Pink"), ("Hat", "Strawberry Hat")]);
}

#[test]
fn chinese_eyes_exclude_brows_and_mask_eye_color() {
    let catalog = Catalog::builtin();
    let inv = inventory(&[
        ("Skin", &["Pink"]),
        ("Eyes", &["Chinese"]),
        ("Eye Color", &["Blue"]),
        ("Brows", &["Thin"]),
    ]);
    let mut rng = DrawSequence::new(vec![0.0]);
    let s = roll_traits(&catalog, &inv, &mut rng);
    assert_eq!(names(&s), vec![("Skin", "Pink"), ("Eyes", "Chinese")]);
}

#[test]
fn maskable_eyes_keep_eye_color() {
    let catalog = Catalog::builtin();
    let inv = inventory(&[("Eyes", &["Classic"]), ("Eye Color", &["Blue"])]);
    let mut rng = DrawSequence::new(vec![0.0]);
    let s = roll_traits(&catalog, &inv, &mut rng);
    assert_eq!(s.get("Eye Color"), Some("Blue"));
}

#[test]
fn eye_color_without_eyes_is_dropped() {
    let catalog = Catalog::builtin();
    let inv = inventory(&[("Skin", &["Pink"]), ("Eye Color", &["Blue"])]);
    let mut rng = DrawSequence::new(vec![0.0]);
    let s = roll_traits(&catalog, &inv, &mut rng);
    assert!(!s.contains("Eye Color"));
}

#[test]
fn exclusions_see_earlier_removals() {
    let mut catalog = Catalog::builtin();
    catalog.exclusions.insert(
        0,
        crate::catalog::model::ExclusionRule {
            layer: "Skin".to_string(),
            item: "Pink".to_string(),
            excludes: vec!["Hat".to_string()],
        },
    );
    let mut s = TraitSelection::default();
    s.insert(1, "Skin", "Pink");
    s.insert(10, "Hair", "Bob");
    s.insert(15, "Hat", "Strawberry Hat");
    apply_exclusions(&catalog, &mut s);
    // The hat is gone before its own rule is checked, so the hair survives.
    assert_eq!(names(&s), vec![("Skin", "Pink"), ("Hair", "Bob")]);
}

#[test]
fn unclothed_base_follows_skin_only_with_a_shirt() {
    let catalog = Catalog::builtin();
    let with_shirt = inventory(&[
        ("Skin", &["Pink"]),
        ("UnclothedBase", &["Pink"]),
        ("Shirt", &["Tee"]),
    ]);
    let mut rng = DrawSequence::new(vec![0.0]);
    let s = roll_traits(&catalog, &with_shirt, &mut rng);
    assert_eq!(s.get("UnclothedBase"), Some("Pink"));
    assert_eq!(
        names(&s),
        vec![("Skin", "Pink"), ("UnclothedBase", "Pink"), ("Shirt", "Tee")]
    );

    let no_shirt = inventory(&[("Skin", &["Pink"]), ("UnclothedBase", &["Pink"])]);
    let s = roll_traits(&catalog, &no_shirt, &mut rng);
    assert!(!s.contains("UnclothedBase"));
}

#[test]
fn derived_layer_requires_matching_file() {
    let catalog = Catalog::builtin();
    let inv = inventory(&[
        ("Skin", &["Green"]),
        ("UnclothedBase", &["Pink"]),
        ("Shirt", &["Tee"]),
    ]);
    let mut rng = DrawSequence::new(vec![0.0]);
    let s = roll_traits(&catalog, &inv, &mut rng);
    assert!(!s.contains("UnclothedBase"));
    assert!(s.contains("Shirt"));
}

#[test]
fn omission_roll_skips_layer_after_one_draw() {
    let catalog = Catalog::builtin();
    let inv = inventory(&[("Overlay", &["Banana Sticker"])]);
    let mut rng = DrawSequence::new(vec![0.5]);
    let s = roll_traits(&catalog, &inv, &mut rng);
    assert!(s.is_empty());
    assert_eq!(rng.consumed(), 1);

    let mut rng = DrawSequence::new(vec![0.95, 0.0]);
    let s = roll_traits(&catalog, &inv, &mut rng);
    assert_eq!(s.get("Overlay"), Some("Banana Sticker"));
    assert_eq!(rng.consumed(), 2);
}

#[test]
fn empty_categories_consume_no_draws() {
    let catalog = Catalog::builtin();
    let inv = inventory(&[("Hair", &["Bob", "Long"])]);
    let mut rng = DrawSequence::new(vec![0.6]);
    let s = roll_traits(&catalog, &inv, &mut rng);
    assert_eq!(names(&s), vec![("Hair", "Long")]);
    assert_eq!(rng.consumed(), 1);
}

#[test]
fn same_seed_same_selection() {
    let catalog = Catalog::builtin();
    let inv = full_inventory();
    for seed in 0..50 {
        let a = roll_traits(&catalog, &inv, &mut SeededRandom::from_seed_u64(seed));
        let b = roll_traits(&catalog, &inv, &mut SeededRandom::from_seed_u64(seed));
        assert_eq!(a, b);
    }
}

#[test]
fn rule_invariants_hold_across_many_rolls() {
    let catalog = Catalog::builtin();
    let inv = full_inventory();
    let mut rng = SeededRandom::from_seed_u64(2024);
    let mut saw_strawberry = false;
    let mut saw_chinese = false;
    let mut saw_unclothed = false;

    for _ in 0..3_000 {
        let s = roll_traits(&catalog, &inv, &mut rng);

        for t in s.iter() {
            assert!(inv.contains(&t.layer, &t.item), "{}/{}", t.layer, t.item);
        }
        if s.get("Hat") == Some("Strawberry Hat") {
            saw_strawberry = true;
            assert!(!s.contains("Hair"));
            assert!(!s.contains("Earrings"));
        }
        if s.get("Eyes") == Some("Chinese") {
            saw_chinese = true;
            assert!(!s.contains("Brows"));
        }
        if s.contains("Eye Color") {
            let eyes = s.get("Eyes").unwrap();
            assert!(["Classic", "Heart"].contains(&eyes), "eyes {eyes}");
        }
        if let Some(base) = s.get("UnclothedBase") {
            saw_unclothed = true;
            assert_eq!(Some(base), s.get("Skin"));
            assert!(s.contains("Shirt"));
        }
        assert!(s.contains("Skin"));
    }

    assert!(saw_strawberry && saw_chinese && saw_unclothed);
}

#[test]
fn omission_frequency_matches_catalog() {
    let catalog = Catalog::builtin();
    let inv = inventory(&[("Hat", &["Beanie"]), ("Overlay", &["Banana Sticker"])]);
    let mut rng = SeededRandom::from_seed_u64(99);
    let n = 20_000;
    let (mut hats, mut overlays) = (0usize, 0usize);
    for _ in 0..n {
        let s = roll_traits(&catalog, &inv, &mut rng);
        hats += usize::from(s.contains("Hat"));
        overlays += usize::from(s.contains("Overlay"));
    }
    assert!((hats as f64 / n as f64 - 0.5).abs() < 0.02);
    assert!((overlays as f64 / n as f64 - 0.1).abs() < 0.01);
}
