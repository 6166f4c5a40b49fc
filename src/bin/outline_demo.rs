//! Outline demo - builds a small scene, projects it and reparents by drag and drop
//!
//! Usage: cargo run --bin outline_demo -- [--config <path>]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use outliner::core::{logging, OutlinerConfig, Result};
use outliner::outline::{DropAction, ItemModel, ItemRole, ModelEvent, ModelIndex, SceneNodeModel};
use outliner::scene::{EntityKind, LocalTransform, MeshData, SceneGraph, SceneGraphPort, SkeletonBuilder};

fn build_scene() -> Result<SceneGraph> {
    let mut scene = SceneGraph::new("courtyard");
    let root = scene.root();

    let guard = scene.create_child(root, "guard", LocalTransform::from_position(Vec3::new(2.0, 0.0, 0.0)))?;
    let spear = scene.create_detached("spear", LocalTransform::identity())?;
    let skeleton = SkeletonBuilder::new()
        .add_root("pelvis")
        .add_bone("arm", "pelvis")
        .build()?;
    scene.set_entity(
        guard,
        "guard_mesh",
        EntityKind::Mesh(MeshData::with_skeleton(skeleton).with_attachment("grip", "arm", spear)),
    )?;

    let well = scene.create_child(root, "well", LocalTransform::from_position(Vec3::new(-4.0, 0.0, 1.0)))?;
    scene.create_child(well, "bucket", LocalTransform::from_position(Vec3::Y))?;
    let torch = scene.create_child(root, "torch", LocalTransform::from_position(Vec3::new(0.0, 3.0, 0.0)))?;
    scene.set_entity(torch, "torch_light", EntityKind::Light)?;

    Ok(scene)
}

fn print_rows(model: &SceneNodeModel, parent: Option<ModelIndex>, depth: usize) {
    for row in 0..model.row_count(parent) {
        let (Some(name), Some(kind)) = (model.index(row, 0, parent), model.index(row, 1, parent)) else {
            continue;
        };
        let text = |index| match model.data(index, ItemRole::Display) {
            Some(outliner::outline::ItemData::Text(text)) => text,
            _ => String::new(),
        };
        println!("{}{:<24} {}", "  ".repeat(depth), text(name), text(kind));
        print_rows(model, Some(name), depth + 1);
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = match args.iter().position(|a| a == "--config").and_then(|i| args.get(i + 1)) {
        Some(path) => OutlinerConfig::load(path)?,
        None => OutlinerConfig::default(),
    };
    logging::init_with_filter(&config.log_filter);

    let mut scene = build_scene()?;
    let model = Rc::new(RefCell::new(SceneNodeModel::new(config)));
    model.borrow_mut().subscribe(|event: &ModelEvent| log::info!("{:?}", event));
    SceneNodeModel::attach(&model, &mut scene)?;

    println!("Initial outline:");
    print_rows(&model.borrow(), None, 0);

    // Live edit coming from the scene side
    let root = scene.root();
    scene.create_child(root, "banner", LocalTransform::from_position(Vec3::new(0.0, 5.0, 0.0)))?;

    // Drag "bucket" and "banner" onto "torch"
    let (payload, target) = {
        let model = model.borrow();
        let indexes: Vec<ModelIndex> = ["bucket", "banner"]
            .iter()
            .filter_map(|name| scene.find_node(name))
            .filter_map(|node| model.index_from_node(&scene, node))
            .collect();
        let target = scene.find_node("torch").and_then(|torch| model.index_from_node(&scene, torch));
        (model.mime_data(&scene, &indexes)?, target)
    };
    let outcome = model
        .borrow_mut()
        .drop_nodes(&mut scene, Some(&payload), DropAction::Move, Some(0), target)?;
    model.borrow_mut().run_deferred();

    println!("\nAfter drop ({} moved, {} skipped):", outcome.moved_count(), outcome.skipped_count());
    print_rows(&model.borrow(), None, 0);

    if let Some(bucket) = scene.find_node("bucket") {
        println!("\nbucket world position: {:?}", scene.derived_position(bucket)?);
    }

    SceneNodeModel::detach(&model, &mut scene)?;
    Ok(())
}
