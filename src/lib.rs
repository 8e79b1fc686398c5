//! Traitforge generates layered "profile picture" avatars.
//!
//! An asset root holds one directory per trait category (`Skin/`, `Hair/`, `Hat/`, ...), each
//! containing same-sized PNG layers. A [`Catalog`] describes the categories and the rules between
//! them; an [`AvatarGenerator`] rolls one rule-valid combination, flattens it with a
//! [`Compositor`] and writes the result to a temporary PNG:
//!
//! - Probe an asset root with [`can_generate`] / [`AvatarGenerator::probe`]
//! - Roll a plan with [`AvatarGenerator::roll`] (seedable through [`RandomSource`])
//! - Render and write it with [`AvatarGenerator::generate`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod catalog;
mod engine;
mod foundation;
mod render;
mod select;

pub use crate::foundation::error::{AvatarError, AvatarResult};

pub use crate::assets::decode::{DecodedLayer, decode_layer_bytes, decode_layer_file};
pub use crate::assets::inventory::{AssetInventory, AssetItem};
pub use crate::catalog::builtin::ANCHOR_LAYER;
pub use crate::catalog::model::{
    BlendMode, Catalog, DerivedLayerRule, ExclusionRule, LayerDefinition, MaskingRule,
    OverrideTable,
};
pub use crate::engine::config::{ASSETS_PATH_ENV, GeneratorConfig};
pub use crate::engine::generator::{
    AvatarGenerator, GeneratedAvatar, GeneratorOpts, can_generate, generate,
};
pub use crate::engine::publish::{ContentStore, PublishedAvatar, publish_avatar};
pub use crate::render::blend::{PremulRgba8, composite_in_place, over};
pub use crate::render::compositor::{
    Compositor, CpuCompositor, UnavailableCompositor, encode_png,
};
pub use crate::select::plan::{AvatarPlan, PlanFingerprint, PlannedLayer};
pub use crate::select::random::{DrawSequence, RandomSource, SeededRandom, ThreadRandom};
pub use crate::select::roll::{SelectedTrait, TraitSelection, roll_traits};
pub use crate::select::sampling::{item_masses, pick_uniform, pick_weighted};
