use std::path::Path;

use anyhow::Context;

use crate::{
    engine::generator::AvatarGenerator,
    foundation::error::{AvatarError, AvatarResult},
    select::plan::PlanFingerprint,
};

/// Durable storage for finished avatars (an inscription service, a bucket, a CDN).
pub trait ContentStore: Send + Sync {
    /// Store `bytes` under `file_name` and return a permanent reference, typically a URL.
    fn put(&self, bytes: &[u8], file_name: &str) -> anyhow::Result<String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Result of [`publish_avatar`].
pub struct PublishedAvatar {
    /// Reference returned by the store.
    pub reference: String,
    /// `(category, item)` pairs in paint order.
    pub traits: Vec<(String, String)>,
    /// Identity of the painted plan.
    pub fingerprint: PlanFingerprint,
}

/// Generate one avatar and hand it to `store`.
///
/// Returns `Ok(None)` when `generator` cannot run under `root`; callers fall back to a static
/// image. The temporary PNG is removed once the store has taken the bytes.
#[tracing::instrument(skip(generator, root, store), fields(root = %root.as_ref().display()))]
pub fn publish_avatar(
    generator: &AvatarGenerator,
    root: impl AsRef<Path>,
    store: &dyn ContentStore,
) -> AvatarResult<Option<PublishedAvatar>> {
    let root = root.as_ref();
    if let Err(e) = generator.probe(root) {
        tracing::info!(reason = %e, "skipping avatar publish");
        return Ok(None);
    }

    let avatar = generator.generate(root)?;
    let bytes = std::fs::read(&avatar.path)
        .with_context(|| format!("read generated avatar '{}'", avatar.path.display()));
    let _ = std::fs::remove_file(&avatar.path);
    let bytes = bytes?;

    let file_name = format!("{}-{}.png", generator.opts().file_prefix, avatar.fingerprint);
    let reference = store
        .put(&bytes, &file_name)
        .map_err(|e| AvatarError::Other(e.context(format!("store '{file_name}'"))))?;

    tracing::info!(reference = %reference, fingerprint = %avatar.fingerprint, "avatar published");
    Ok(Some(PublishedAvatar {
        reference,
        traits: avatar
            .plan
            .traits()
            .into_iter()
            .map(|(layer, item)| (layer.to_string(), item.to_string()))
            .collect(),
        fingerprint: avatar.fingerprint,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/publish.rs"]
mod tests;
