use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AvatarError::dependency_unavailable("x")
            .to_string()
            .contains("dependency unavailable:")
    );
    assert!(
        AvatarError::asset_root_invalid("/nope", "x")
            .to_string()
            .contains("asset root invalid:")
    );
    assert!(
        AvatarError::no_traits_available("/nope")
            .to_string()
            .contains("no traits available")
    );
    assert!(AvatarError::catalog("x").to_string().contains("catalog error:"));
    assert!(AvatarError::config("x").to_string().contains("config error:"));
}

#[test]
fn decode_error_names_layer_and_item() {
    let msg = AvatarError::asset_decode("Hair", "Bob", "bad magic").to_string();
    assert!(msg.contains("Hair/Bob"));
    assert!(msg.contains("bad magic"));
}

#[test]
fn only_probe_failures_take_the_fallback() {
    assert!(AvatarError::dependency_unavailable("x").is_fallback());
    assert!(AvatarError::asset_root_invalid("/r", "x").is_fallback());
    assert!(!AvatarError::no_traits_available("/r").is_fallback());
    assert!(!AvatarError::asset_decode("a", "b", "c").is_fallback());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AvatarError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
