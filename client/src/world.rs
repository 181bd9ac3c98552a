//! Static test arena: floor, lights, ledges, pickups and a lava pad

use bevy::light::light_consts::lux;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use controller::{AMMO_TAG, LAVA_TAG, MEDKIT_TAG};

use crate::contacts::SceneTag;

/// Half extent of the square floor
const ARENA_HALF_SIZE: f32 = 40.0;

const AMMO_CRATES: [Vec3; 4] = [
    Vec3::new(6.0, 0.3, -8.0),
    Vec3::new(-7.0, 0.3, -4.0),
    Vec3::new(10.0, 0.3, 6.0),
    Vec3::new(-12.0, 2.3, -14.0),
];

const MEDKITS: [Vec3; 3] = [
    Vec3::new(-4.0, 0.25, 8.0),
    Vec3::new(14.0, 0.25, -2.0),
    Vec3::new(0.0, 0.25, -18.0),
];

/// Ledges to jump onto: (center, half extents)
const LEDGES: [(Vec3, Vec3); 3] = [
    (Vec3::new(-12.0, 1.0, -14.0), Vec3::new(3.0, 1.0, 3.0)),
    (Vec3::new(4.0, 0.5, -14.0), Vec3::new(2.0, 0.5, 2.0)),
    (Vec3::new(-4.0, 0.25, -10.0), Vec3::new(1.5, 0.25, 1.5)),
];

const LAVA_CENTER: Vec3 = Vec3::new(0.0, 0.05, 14.0);
const LAVA_HALF_EXTENTS: Vec3 = Vec3::new(4.0, 0.05, 4.0);

/// Spawn the arena
pub fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        DirectionalLight {
            illuminance: lux::AMBIENT_DAYLIGHT,
            shadows_enabled: true,
            color: Color::srgb(1.0, 0.98, 0.92),
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 300.0,
        affects_lightmapped_meshes: true,
    });
    commands.insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.85)));

    // Floor
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(ARENA_HALF_SIZE * 2.0, 0.2, ARENA_HALF_SIZE * 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.47, 0.5),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.1, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(ARENA_HALF_SIZE, 0.1, ARENA_HALF_SIZE),
    ));

    let ledge_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.6, 0.6, 0.65),
        perceptual_roughness: 0.9,
        ..default()
    });
    for (center, half) in LEDGES {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0))),
            MeshMaterial3d(ledge_material.clone()),
            Transform::from_translation(center),
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y, half.z),
        ));
    }

    // Lava
    commands.spawn((
        SceneTag(LAVA_TAG),
        Mesh3d(meshes.add(Cuboid::new(
            LAVA_HALF_EXTENTS.x * 2.0,
            LAVA_HALF_EXTENTS.y * 2.0,
            LAVA_HALF_EXTENTS.z * 2.0,
        ))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.25, 0.05),
            emissive: LinearRgba::rgb(4.0, 0.8, 0.1),
            ..default()
        })),
        Transform::from_translation(LAVA_CENTER),
        RigidBody::Fixed,
        Collider::cuboid(LAVA_HALF_EXTENTS.x, LAVA_HALF_EXTENTS.y, LAVA_HALF_EXTENTS.z),
    ));

    // Pickups
    let ammo_mesh = meshes.add(Cuboid::new(0.8, 0.6, 0.5));
    let ammo_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.4, 0.2),
        perceptual_roughness: 0.8,
        ..default()
    });
    for position in AMMO_CRATES {
        commands.spawn((
            SceneTag(AMMO_TAG),
            Mesh3d(ammo_mesh.clone()),
            MeshMaterial3d(ammo_material.clone()),
            Transform::from_translation(position),
            RigidBody::Fixed,
            Collider::cuboid(0.4, 0.3, 0.25),
        ));
    }

    let medkit_mesh = meshes.add(Cuboid::new(0.6, 0.5, 0.6));
    let medkit_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.9, 0.9),
        emissive: LinearRgba::rgb(0.3, 0.0, 0.0),
        ..default()
    });
    for position in MEDKITS {
        commands.spawn((
            SceneTag(MEDKIT_TAG),
            Mesh3d(medkit_mesh.clone()),
            MeshMaterial3d(medkit_material.clone()),
            Transform::from_translation(position),
            RigidBody::Fixed,
            Collider::cuboid(0.3, 0.25, 0.3),
        ));
    }

    info!(
        "World spawned: {} ammo crates, {} medkits",
        AMMO_CRATES.len(),
        MEDKITS.len()
    );
}
