//! Quick scene validation utility

use scene_engine::config::AssetConfig;
use scene_engine::ecs::{UuidGenerator, WorldStore};
use scene_engine::io::{validate_scene, ComponentRegistry, SceneAssets, SceneDescriptor, SceneLoader};
use std::process::ExitCode;
use std::{env, path::Path};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let scene_path = if args.len() > 1 {
        &args[1]
    } else {
        "game/assets/scenes/demo.json"
    };
    let asset_root = if args.len() > 2 { &args[2] } else { "game/assets" };

    let path = Path::new(scene_path);
    println!("Validating scene: {}", path.display());

    let scene = match SceneDescriptor::load_from_file(path) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("✗ Failed to load scene: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("✓ Scene parsed successfully!");
    println!("  Entity count: {}", scene.entities.len());

    let registry = ComponentRegistry::with_default_components();
    let report = validate_scene(&scene, &registry);
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("  error: {error}");
        }
        eprintln!("✗ Scene is invalid");
        return ExitCode::FAILURE;
    }

    let config = AssetConfig::with_root(asset_root);
    let assets = match SceneAssets::for_scene(&scene, &config) {
        Ok(assets) => assets,
        Err(e) => {
            eprintln!("✗ Failed to resolve assets: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut store = WorldStore::new(ComponentRegistry::with_default_components());
    let ids = UuidGenerator;
    match SceneLoader::new(&mut store, &ids, &registry, &assets).load(&scene) {
        Ok(loaded) => {
            println!("✓ Scene mounted successfully!");
            println!("  Entities: {}", loaded.len());
            println!("  Skipped: {}", loaded.skipped());

            for kind in registry.registered_types() {
                let count = store
                    .entity_ids()
                    .into_iter()
                    .filter(|&id| store.component_kinds(id).iter().any(|k| k == kind))
                    .count();
                if count > 0 {
                    println!("  {kind}: {count}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Failed to mount scene: {e}");
            ExitCode::FAILURE
        }
    }
}
