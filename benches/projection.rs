use criterion::{criterion_group, criterion_main, Criterion, black_box};

use glam::Vec3;

use outliner::core::OutlinerConfig;
use outliner::outline::{NodeRegistry, SceneNodeModel, TreeProjector};
use outliner::scene::{
    EntityKind, LocalTransform, MeshData, SceneGraph, SceneGraphPort, SceneNodeId, SkeletonBuilder,
};

/// Scene with `width` top-level groups, each `depth` nodes deep, and a skinned entity per group.
fn create_test_scene(width: usize, depth: usize) -> (SceneGraph, Vec<SceneNodeId>) {
    let mut scene = SceneGraph::new("bench");
    let root = scene.root();
    let mut leaves = Vec::with_capacity(width);

    for w in 0..width {
        let mut parent = scene
            .create_child(root, format!("group_{w}"), LocalTransform::from_position(Vec3::X * w as f32))
            .expect("create group");
        for d in 0..depth {
            parent = scene
                .create_child(parent, format!("node_{w}_{d}"), LocalTransform::from_position(Vec3::Y))
                .expect("create node");
        }
        leaves.push(parent);

        let held = scene
            .create_detached(format!("held_{w}"), LocalTransform::identity())
            .expect("create held");
        let skeleton = SkeletonBuilder::new()
            .add_root("root")
            .add_bone("arm", "root")
            .add_bone("hand", "arm")
            .build()
            .expect("skeleton");
        let actor = scene
            .create_child(root, format!("actor_{w}"), LocalTransform::identity())
            .expect("create actor");
        scene
            .set_entity(
                actor,
                format!("actor_mesh_{w}"),
                EntityKind::Mesh(MeshData::with_skeleton(skeleton).with_attachment("grip", "hand", held)),
            )
            .expect("set entity");
    }

    (scene, leaves)
}

fn bench_project_small(c: &mut Criterion) {
    let (scene, _) = create_test_scene(16, 4);

    c.bench_function("project_16x4", |b| {
        b.iter(|| black_box(TreeProjector::new(black_box(&scene)).build()));
    });
}

fn bench_project_large(c: &mut Criterion) {
    let (scene, _) = create_test_scene(256, 16);

    c.bench_function("project_256x16", |b| {
        b.iter(|| black_box(TreeProjector::new(black_box(&scene)).build()));
    });
}

fn bench_registry_rebuild(c: &mut Criterion) {
    let (scene, _) = create_test_scene(256, 16);
    let tree = TreeProjector::new(&scene).build();

    c.bench_function("registry_rebuild_256x16", |b| {
        let mut registry = NodeRegistry::new();
        b.iter(|| {
            registry.rebuild(black_box(&tree));
            black_box(registry.len());
        });
    });
}

fn bench_resolve_deep_leaves(c: &mut Criterion) {
    let (scene, leaves) = create_test_scene(256, 16);
    let tree = TreeProjector::new(&scene).build();
    let mut registry = NodeRegistry::new();
    registry.rebuild(&tree);

    c.bench_function("resolve_256_deep_leaves", |b| {
        b.iter(|| {
            for leaf in &leaves {
                black_box(registry.resolve(&tree, &scene, black_box(*leaf)));
            }
        });
    });
}

fn bench_incremental_add(c: &mut Criterion) {
    c.bench_function("incremental_add_64", |b| {
        b.iter(|| {
            let (mut scene, leaves) = create_test_scene(16, 4);
            let mut model = SceneNodeModel::new(OutlinerConfig::default());
            model.set_scene(Some(&scene)).expect("set scene");
            for (i, leaf) in leaves.iter().cycle().take(64).enumerate() {
                let node = scene
                    .create_child(*leaf, format!("extra_{i}"), LocalTransform::identity())
                    .expect("create extra");
                black_box(model.node_added(&scene, node).expect("node added"));
            }
            black_box(scene.root());
        });
    });
}

criterion_group!(
    benches,
    bench_project_small,
    bench_project_large,
    bench_registry_rebuild,
    bench_resolve_deep_leaves,
    bench_incremental_add,
);
criterion_main!(benches);
