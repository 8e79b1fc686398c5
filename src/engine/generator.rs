use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::inventory::AssetInventory,
    catalog::model::Catalog,
    engine::config::GeneratorConfig,
    foundation::error::{AvatarError, AvatarResult},
    render::compositor::{Compositor, CpuCompositor},
    select::plan::{AvatarPlan, PlanFingerprint},
    select::random::{RandomSource, ThreadRandom},
    select::roll::roll_traits,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Output placement for generated PNGs.
pub struct GeneratorOpts {
    /// Directory for output files; the system temp directory when `None`.
    pub output_dir: Option<PathBuf>,
    /// File name prefix; each file gets a unique random suffix.
    pub file_prefix: String,
}

impl Default for GeneratorOpts {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_prefix: "avatar".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
/// One generated avatar. The caller owns `path` and is responsible for deleting it.
pub struct GeneratedAvatar {
    /// Temporary PNG holding the flattened composite.
    pub path: PathBuf,
    /// Layers that were painted, bottom first.
    pub plan: AvatarPlan,
    /// Stable identity of `plan`.
    pub fingerprint: PlanFingerprint,
}

#[derive(Clone, Debug)]
/// Stateless avatar generator: a read-only catalog plus an injected compositor.
///
/// Safe to share across threads; every call takes the asset root explicitly and writes to its
/// own uniquely named output file.
pub struct AvatarGenerator {
    catalog: Arc<Catalog>,
    compositor: Arc<dyn Compositor>,
    opts: GeneratorOpts,
}

impl Default for AvatarGenerator {
    /// Built-in catalog with the CPU compositor.
    fn default() -> Self {
        Self {
            catalog: Arc::new(Catalog::builtin()),
            compositor: Arc::new(CpuCompositor),
            opts: GeneratorOpts::default(),
        }
    }
}

impl AvatarGenerator {
    /// Generator over a validated `catalog`.
    pub fn new(catalog: Catalog, compositor: Arc<dyn Compositor>) -> AvatarResult<Self> {
        catalog.validate()?;
        Ok(Self {
            catalog: Arc::new(catalog),
            compositor,
            opts: GeneratorOpts::default(),
        })
    }

    /// Builder: replace output placement options.
    pub fn with_opts(mut self, opts: GeneratorOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Generator described by `cfg`, using the CPU compositor.
    pub fn from_config(cfg: &GeneratorConfig) -> AvatarResult<Self> {
        cfg.validate()?;
        let catalog = match &cfg.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin(),
        };
        Ok(Self::new(catalog, Arc::new(CpuCompositor))?.with_opts(GeneratorOpts {
            output_dir: cfg.output_dir.clone(),
            file_prefix: cfg.file_prefix.clone(),
        }))
    }

    /// Catalog in use.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Output placement options in use.
    pub fn opts(&self) -> &GeneratorOpts {
        &self.opts
    }

    /// Explain why generation cannot run under `root`, if it cannot.
    ///
    /// Only reports [`AvatarError::DependencyUnavailable`] or [`AvatarError::AssetRootInvalid`].
    #[tracing::instrument(skip(self, root), fields(root = %root.as_ref().display()))]
    pub fn probe(&self, root: impl AsRef<Path>) -> AvatarResult<()> {
        let root = root.as_ref();
        if !self.compositor.is_available() {
            return Err(AvatarError::dependency_unavailable(format!(
                "compositor '{}' is not available",
                self.compositor.name()
            )));
        }
        if !root.is_dir() {
            return Err(AvatarError::asset_root_invalid(root, "not a directory"));
        }
        let anchor = self.catalog.anchor();
        if AssetInventory::scan_layer(root, anchor).is_empty() {
            return Err(AvatarError::asset_root_invalid(
                root,
                format!("anchor category '{anchor}' has no items"),
            ));
        }
        Ok(())
    }

    /// Whether [`AvatarGenerator::generate`] can run under `root`. Never panics.
    pub fn can_generate(&self, root: impl AsRef<Path>) -> bool {
        match self.probe(root) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(reason = %e, "avatar generation unavailable");
                false
            }
        }
    }

    /// List the asset root and roll one rule-valid plan, without rendering.
    pub fn roll<R: RandomSource + ?Sized>(
        &self,
        root: impl AsRef<Path>,
        rng: &mut R,
    ) -> AvatarResult<AvatarPlan> {
        let inventory = AssetInventory::scan(root, &self.catalog);
        let selection = roll_traits(&self.catalog, &inventory, rng);
        AvatarPlan::resolve(&self.catalog, &inventory, &selection)
    }

    /// Flatten `plan` into an in-memory PNG buffer.
    pub fn render(&self, plan: &AvatarPlan) -> AvatarResult<Vec<u8>> {
        self.compositor.render_png(plan)
    }

    /// Roll, render and write one avatar using the process RNG.
    pub fn generate(&self, root: impl AsRef<Path>) -> AvatarResult<GeneratedAvatar> {
        self.generate_with(root, &mut ThreadRandom)
    }

    /// Roll, render and write one avatar drawing from `rng`.
    #[tracing::instrument(skip(self, root, rng), fields(root = %root.as_ref().display()))]
    pub fn generate_with<R: RandomSource + ?Sized>(
        &self,
        root: impl AsRef<Path>,
        rng: &mut R,
    ) -> AvatarResult<GeneratedAvatar> {
        if !self.compositor.is_available() {
            return Err(AvatarError::dependency_unavailable(format!(
                "compositor '{}' is not available",
                self.compositor.name()
            )));
        }

        let plan = self.roll(root, rng)?;
        let png = self.render(&plan)?;
        let path = self.write_output(&png)?;
        let fingerprint = plan.fingerprint();

        tracing::info!(
            path = %path.display(),
            layers = plan.len(),
            fingerprint = %fingerprint,
            "avatar generated"
        );
        Ok(GeneratedAvatar {
            path,
            plan,
            fingerprint,
        })
    }

    fn write_output(&self, png: &[u8]) -> AvatarResult<PathBuf> {
        let dir = match &self.opts.output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("create output dir '{}'", dir.display()))?;
                dir.clone()
            }
            None => std::env::temp_dir(),
        };

        let prefix = format!("{}-", self.opts.file_prefix);
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".png")
            .tempfile_in(&dir)
            .with_context(|| format!("create output file in '{}'", dir.display()))?;
        file.write_all(png).context("write avatar PNG")?;
        let (_, path) = file.keep().context("persist avatar PNG")?;
        Ok(path)
    }
}

/// Whether the built-in catalog and CPU compositor can generate under `root`.
pub fn can_generate(root: impl AsRef<Path>) -> bool {
    AvatarGenerator::default().can_generate(root)
}

/// Generate one avatar under `root` with the built-in catalog; returns the PNG path.
pub fn generate(root: impl AsRef<Path>) -> AvatarResult<PathBuf> {
    AvatarGenerator::default()
        .generate(root)
        .map(|avatar| avatar.path)
}
