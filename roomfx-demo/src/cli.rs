use crate::shoebox::ShoeboxFitter;
use anyhow::Result;
use roomfx::config::RoomFxDesc;
use roomfx::engine::{CommandSink, RoomFxCommand};
use roomfx::math::{Pose, Quat, Transform, Vec3};
use roomfx::regions::{ProbeShape, ReverbModifiers, ReverbProbe, Room};
use roomfx::scene::{
    NoOcclusion, RenderableSurface, SceneObject, SceneSnapshot, SurfaceMaterial, TerrainData,
    TerrainSurface, VisualMaterial, WallMaterials, unit_cube,
};
use roomfx::world::RoomFxWorld;

pub fn run_walkthrough() -> Result<()> {
    let catalog_path = std::env::temp_dir().join("roomfx-demo-catalog.json");
    let desc = RoomFxDesc::new()
        .include_non_static(false)
        .catalog_path(&catalog_path);

    let (sink, commands) = CommandSink::channel();
    let audio_thread = std::thread::spawn(move || {
        let mut received = 0;
        for command in commands.iter() {
            received += 1;
            match command {
                RoomFxCommand::ApplyRoom(id, payload) => log::info!(
                    "[audio] room {} dims {:?} reverb time x{}",
                    id,
                    payload.dimensions,
                    payload.reverb_time
                ),
                RoomFxCommand::ApplyReverbProbe(id, payload) => log::info!(
                    "[audio] probe {} rt60 {:.2}s..{:.2}s",
                    id,
                    payload.rt60s[0],
                    payload.rt60s[payload.rt60s.len() - 1]
                ),
                RoomFxCommand::DisableRoomEffects => log::info!("[audio] room effects off"),
            }
        }
        received
    });

    let mut world = RoomFxWorld::new(desc, sink)?;

    log::info!("=== Mapping surface materials ===");
    let catalog = world.catalog_mut();
    catalog.set("concrete", SurfaceMaterial::PolishedConcreteOrTile);
    catalog.set("plaster", SurfaceMaterial::PlasterSmooth);
    catalog.set("glass", SurfaceMaterial::GlassThick);
    catalog.set("meadow", SurfaceMaterial::Grass);

    let summary = world.apply_material_mapping(&build_scene());
    for skipped in &summary.skipped {
        log::warn!("Skipped {}: {}", skipped.name, skipped.reason);
    }
    if let Some(terrain) = world.material_mapper().terrain_data("meadow") {
        log::info!("Terrain '{}' mapped to {:?}", terrain.name, world.catalog().get("meadow"));
    }

    log::info!("=== Baking reverb probes ===");
    let hall = world.add_reverb_probe(ReverbProbe::new(
        Transform::from_position(Vec3::new(-4.0, 1.5, 0.0)),
        ProbeShape::Sphere { radius: 5.0 },
    ));
    let foyer = world.add_reverb_probe(
        ReverbProbe::new(
            Transform::from_position(Vec3::new(3.0, 1.5, 0.0))
                .with_rotation(Quat::from_rotation_y(0.1)),
            ProbeShape::Box {
                size: Vec3::new(8.0, 4.0, 10.0),
            },
        )
        .only_apply_when_visible(true),
    );
    world.add_room(
        Room::new(
            Transform::from_position(Vec3::new(15.0, 1.5, 0.0)),
            Vec3::new(4.0, 3.0, 4.0),
        )
        .with_walls(WallMaterials::uniform(SurfaceMaterial::CurtainHeavy))
        .with_modifiers(ReverbModifiers {
            gain_db: -6.0,
            ..Default::default()
        }),
    );

    let report = world.bake_reverb_probes(&[hall, foyer], &mut ShoeboxFitter::new(12.0));
    for (id, error) in &report.failed {
        log::warn!("Probe {} not baked: {}", id, error);
    }
    for &id in &report.baked {
        if let Some(probe) = world.region(id).and_then(|region| region.as_reverb_probe()) {
            log::info!("Probe {} proxy room {:?}", id, probe.proxy_room.size);
        }
    }

    log::info!("=== Walking the listener ===");
    for step in 0..=13 {
        let x = -8.0 + 2.0 * step as f32;
        world.set_listener_pose(Pose::from_position(Vec3::new(x, 1.5, 0.0)));
        let resolution = world.update(&NoOcclusion);
        log::info!("listener at x = {:>5.1}: {:?}", x, resolution);
    }

    for event in world.poll_events() {
        match event.region() {
            Some(id) if !event.is_error() => log::debug!("{}: {:?}", id, event),
            _ => log::debug!("event: {:?}", event),
        }
    }

    world.save_catalog()?;
    log::info!("Catalog saved to {}", catalog_path.display());

    drop(world);
    let received = audio_thread
        .join()
        .map_err(|_| anyhow::anyhow!("audio thread panicked"))?;
    log::info!("Audio thread received {} commands", received);
    Ok(())
}

fn box_surface(
    id: u64,
    name: &str,
    position: Vec3,
    scale: Vec3,
    material: &str,
) -> RenderableSurface {
    RenderableSurface {
        object: SceneObject::new(id, name),
        transform: Transform::from_position(position).with_scale(scale),
        mesh: unit_cube(1),
        materials: vec![VisualMaterial::new(material, material)],
    }
}

fn build_scene() -> SceneSnapshot {
    let wall_size = Vec3::new(0.2, 4.0, 10.0);

    // Back face plaster, every other face glass.
    let mut window = box_surface(
        4,
        "window wall",
        Vec3::new(0.0, 2.0, -5.0),
        Vec3::new(20.0, 4.0, 0.2),
        "plaster",
    );
    window.mesh = unit_cube(2);
    window.materials.push(VisualMaterial::new("glass", "glass"));

    let mut crate_prop = box_surface(
        5,
        "crate",
        Vec3::new(-2.0, 0.5, 2.0),
        Vec3::ONE,
        "crate_wood",
    );
    crate_prop.object = crate_prop.object.with_static(false);

    let meadow = TerrainSurface {
        object: SceneObject::new(6, "meadow"),
        transform: Transform::from_position(Vec3::new(0.0, -0.2, 30.0))
            .with_scale(Vec3::new(60.0, 0.2, 40.0)),
        mesh: unit_cube(1),
        terrain_data: TerrainData::new("meadow", "Meadow"),
    };

    SceneSnapshot::new()
        .with_renderable(box_surface(
            1,
            "floor",
            Vec3::new(0.0, -0.1, 0.0),
            Vec3::new(40.0, 0.2, 10.0),
            "concrete",
        ))
        .with_renderable(box_surface(
            2,
            "west wall",
            Vec3::new(-10.0, 2.0, 0.0),
            wall_size,
            "plaster",
        ))
        .with_renderable(box_surface(
            3,
            "east wall",
            Vec3::new(10.0, 2.0, 0.0),
            wall_size,
            "plaster",
        ))
        .with_renderable(window)
        .with_renderable(crate_prop)
        .with_terrain(meadow)
}
