use std::path::PathBuf;

use traitforge::{ASSETS_PATH_ENV, AvatarGenerator, GeneratorConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let cfg = match args.next() {
        Some(path) if path.ends_with(".json") => GeneratorConfig::from_path(&path)?,
        Some(root) => GeneratorConfig {
            asset_root: Some(PathBuf::from(root)),
            ..GeneratorConfig::default()
        },
        None => GeneratorConfig::default(),
    };

    let Some(root) = cfg.asset_root() else {
        eprintln!("generate_avatar: pass an asset root (or config .json), or set {ASSETS_PATH_ENV}");
        return Ok(());
    };

    let generator = AvatarGenerator::from_config(&cfg)?;
    if let Err(e) = generator.probe(&root) {
        eprintln!("generate_avatar: skipping ({e})");
        return Ok(());
    }

    let avatar = generator.generate(&root)?;
    for (layer, item) in avatar.plan.traits() {
        println!("{layer:>16}  {item}");
    }
    println!("fingerprint {}", avatar.fingerprint);
    println!("wrote {}", avatar.path.display());
    Ok(())
}
