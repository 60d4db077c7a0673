//! Scene runner: loads a scene, drives the declarative layer and captures it

use scene_engine::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

const DEMO_SCENE: &str = include_str!("../assets/scenes/demo.json");

struct Args {
    asset_root: PathBuf,
    scene: String,
    save: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = Args {
            asset_root: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")),
            scene: "demo".to_string(),
            save: None,
        };

        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--asset-root" => {
                    args.asset_root = iter
                        .next()
                        .map(PathBuf::from)
                        .ok_or("--asset-root needs a directory")?;
                }
                "--save" => {
                    args.save = Some(iter.next().map(PathBuf::from).ok_or("--save needs a path")?);
                }
                flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
                scene => args.scene = scene.to_string(),
            }
        }
        Ok(args)
    }
}

fn main() -> ExitCode {
    scene_engine::init_logging();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: scene_runner [--asset-root DIR] [--save PATH] [SCENE]");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Scene runner failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SceneError> {
    info!("Starting scene runner");

    let config = AssetConfig::with_root(&args.asset_root);
    if let Err(e) = config.validate() {
        warn!(error = %e, "Asset root is incomplete");
    }

    let mut catalog = SceneCatalog::new();
    catalog.register_json("demo", DEMO_SCENE);
    if args.scene.ends_with(".json") {
        catalog.register_file(args.scene.clone(), &args.scene);
    }

    let scene = catalog.load(&args.scene, &config)?;
    let assets = SceneAssets::for_scene(&scene, &config)?;
    let registry = ComponentRegistry::with_default_components();
    let ids = UuidGenerator;
    let mut store = WorldStore::new(ComponentRegistry::with_default_components());

    let loaded = SceneLoader::new(&mut store, &ids, &registry, &assets).load(&scene)?;
    for root in store.roots() {
        log_tree(&store, root, 0);
    }

    spawn_runtime_rig(&mut store, &ids);

    let mut snapshot = loaded.capture(&store, &scene);
    snapshot.metadata.name = format!("{} (snapshot)", loaded.name());
    info!(
        entities = snapshot.entities.len(),
        persistent = snapshot
            .entities
            .iter()
            .filter(|e| e.persistent_id().is_some())
            .count(),
        "Captured snapshot"
    );
    if let Some(path) = &args.save {
        snapshot.save_to_file(path)?;
        info!(path = ?path, "Saved snapshot");
    }

    loaded.unload(&mut store);
    info!(remaining = store.len(), "Scene runner finished");
    Ok(())
}

fn log_tree(store: &WorldStore, id: EntityId, depth: usize) {
    info!(
        "{:indent$}{} [{}] {}",
        "",
        store.name(id).unwrap_or_default(),
        id,
        store.component_kinds(id).join(", "),
        indent = depth * 2
    );
    for child in store.children(id) {
        log_tree(store, child, depth + 1);
    }
}

/// Declare an entity with mirrored components, move it once, then tear it down
fn spawn_runtime_rig(store: &mut WorldStore, ids: &dyn StableIdGenerator) {
    let mut node = EntityNode::new(EntityProps::new("Runtime Rig"));
    let Some(scope) = node.mount(store, ids).map(|context| Scope::with_entity(context.clone()))
    else {
        warn!("Runtime rig could not be mounted");
        return;
    };

    let mut transform = TransformMirror::new();
    let mut light = LightMirror::new();
    let mut renderer = MeshRendererMirror::new();

    let mut pose = Transform::from_position([0.0, 3.0, 0.0]);
    let lamp = Light {
        range: 15.0,
        ..Light::of_type(LightType::Point)
    };
    let body = MeshRendererProps {
        mesh_id: Some("cube".to_string()),
        material: Some(MaterialOverride {
            color: Some("#ff0000".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    };

    for frame in 0..3 {
        pose.position[1] += 0.5;
        let outcomes = [
            transform.sync(&scope, store, &pose),
            light.sync(&scope, store, &lamp),
            renderer.sync(&scope, store, &body),
        ];
        for outcome in outcomes {
            match outcome {
                Ok(outcome) => info!(frame, ?outcome, "Synced runtime rig"),
                Err(e) => warn!(frame, error = %e, "Runtime rig sync failed"),
            }
        }
    }

    node.unmount(store);
}
