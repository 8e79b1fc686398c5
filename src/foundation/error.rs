use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type AvatarResult<T> = Result<T, AvatarError>;

/// Top-level error taxonomy used by catalog, selection and rendering APIs.
#[derive(thiserror::Error, Debug)]
pub enum AvatarError {
    /// The compositing capability is not present in this process.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// The asset root is missing, or its anchor category has no items.
    #[error("asset root invalid: '{}': {reason}", root.display())]
    AssetRootInvalid {
        /// Asset root that was probed.
        root: PathBuf,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// Every selectable layer ended up empty for this roll.
    #[error("no traits available under '{}'", root.display())]
    NoTraitsAvailable {
        /// Asset root the roll was made against.
        root: PathBuf,
    },

    /// A listed trait file could not be decoded as an image.
    #[error("asset decode error: {layer}/{item}: {reason}")]
    AssetDecode {
        /// Layer category of the offending file.
        layer: String,
        /// Item name of the offending file.
        item: String,
        /// Decoder message.
        reason: String,
    },

    /// Invalid catalog data.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Invalid generator configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvatarError {
    /// Build a [`AvatarError::DependencyUnavailable`] value.
    pub fn dependency_unavailable(msg: impl Into<String>) -> Self {
        Self::DependencyUnavailable(msg.into())
    }

    /// Build a [`AvatarError::AssetRootInvalid`] value.
    pub fn asset_root_invalid(root: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::AssetRootInvalid {
            root: root.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`AvatarError::NoTraitsAvailable`] value.
    pub fn no_traits_available(root: impl Into<PathBuf>) -> Self {
        Self::NoTraitsAvailable { root: root.into() }
    }

    /// Build a [`AvatarError::AssetDecode`] value.
    pub fn asset_decode(
        layer: impl Into<String>,
        item: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AssetDecode {
            layer: layer.into(),
            item: item.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`AvatarError::Catalog`] value.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Build a [`AvatarError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether a caller should switch to its static fallback instead of surfacing the error.
    ///
    /// Only the two probe-level failures qualify; decode and empty-roll failures are terminal.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            Self::DependencyUnavailable(_) | Self::AssetRootInvalid { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
