use crate::bake::{self, BakeReport, ReverbComputer};
use crate::config::RoomFxDesc;
use crate::engine::RoomEffectsSink;
use crate::error::{Result, RoomFxError};
use crate::events::RoomFxEvent;
use crate::mapping::{InclusionFilter, MaterialMapper, RebuildSummary, SurfaceMaterialCatalog};
use crate::math::{Pose, Vec3};
use crate::regions::{
    AcousticRegion, RegionId, RegionResolver, RegionSet, Resolution, ReverbProbe, Room,
};
use crate::scene::{AcousticMesh, OcclusionQuery, SceneSnapshot};

/// Source of the listener's position for containment tests.
pub trait ListenerQuery {
    /// `None` when there is no listener in the scene.
    fn current_listener_position(&self) -> Option<Vec3>;
}

impl ListenerQuery for Option<Vec3> {
    fn current_listener_position(&self) -> Option<Vec3> {
        *self
    }
}

/// Main world object that resolves room effects for a listener.
///
/// `RoomFxWorld` is the central API of roomfx. It runs on the main thread, owns the
/// acoustic regions and the material mapping, and pushes the active region's parameters
/// to the audio engine through a [`RoomEffectsSink`].
///
/// # Architecture
///
/// - **Main thread**: Owns the `RoomFxWorld`, registers regions, rebuilds geometry, ticks
/// - **Audio thread**: Receives room effect parameters, e.g. via a
///   [`CommandSink`](crate::engine::CommandSink)
pub struct RoomFxWorld {
    desc: RoomFxDesc,
    regions: RegionSet,
    resolver: RegionResolver,
    mapper: MaterialMapper,
    listener: Option<RoomFxListener>,
    sink: Box<dyn RoomEffectsSink>,
    resolution: Resolution,
    events: Vec<RoomFxEvent>,
}

impl RoomFxWorld {
    /// Creates a world pushing room effects to `sink`.
    ///
    /// If `desc.catalog_path` names an existing file the surface-material catalog is
    /// loaded from it; a missing file starts with an empty catalog.
    pub fn new(desc: RoomFxDesc, sink: impl RoomEffectsSink + 'static) -> Result<Self> {
        let catalog = match &desc.catalog_path {
            Some(path) if path.exists() => SurfaceMaterialCatalog::load_from(path)?,
            Some(path) => {
                log::info!(
                    "No surface material catalog at {}, starting empty",
                    path.display()
                );
                SurfaceMaterialCatalog::new()
            }
            None => SurfaceMaterialCatalog::new(),
        };
        let mapper = MaterialMapper::with_catalog(catalog, InclusionFilter::from_desc(&desc));

        Ok(Self {
            desc,
            regions: RegionSet::new(),
            resolver: RegionResolver::new(),
            mapper,
            listener: None,
            sink: Box::new(sink),
            resolution: Resolution::Disabled,
            events: Vec::new(),
        })
    }

    pub fn desc(&self) -> &RoomFxDesc {
        &self.desc
    }

    // --- Regions ---

    /// Registers a room. It becomes a candidate at the next [`update`](Self::update)
    /// that finds the listener inside it.
    pub fn add_room(&mut self, room: Room) -> RegionId {
        let id = self.regions.insert(room);
        log::debug!("Added room {}", id);
        id
    }

    pub fn add_reverb_probe(&mut self, probe: ReverbProbe) -> RegionId {
        let id = self.regions.insert(probe);
        log::debug!("Added reverb probe {}", id);
        id
    }

    /// Enables or disables a region. Disabling withdraws its candidacy immediately.
    pub fn set_region_enabled(&mut self, id: RegionId, enabled: bool) -> Result<()> {
        self.regions.set_enabled(id, enabled)?;
        if !enabled && self.resolver.is_candidate(id) {
            let resolution = self
                .resolver
                .remove_candidate(id, &self.regions, self.sink.as_mut());
            self.record_resolution(resolution);
        }
        Ok(())
    }

    /// Removes a region, withdrawing its candidacy. Its handle is never reused.
    pub fn remove_region(&mut self, id: RegionId) -> Result<AcousticRegion> {
        let region = self
            .regions
            .remove(id)
            .ok_or(RoomFxError::UnknownRegion(id))?;
        if self.resolver.is_candidate(id) {
            let resolution = self
                .resolver
                .remove_candidate(id, &self.regions, self.sink.as_mut());
            self.record_resolution(resolution);
        }
        Ok(region)
    }

    pub fn region(&self, id: RegionId) -> Option<&AcousticRegion> {
        self.regions.get(id)
    }

    /// Mutable access to a region. Parameter changes reach the engine at the next update.
    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut AcousticRegion> {
        self.regions.get_mut(id)
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    /// The region whose parameters the engine currently has, if any.
    pub fn active_region(&self) -> Option<RegionId> {
        self.resolution.region()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    // --- Listener ---

    pub fn set_listener_pose(&mut self, pose: Pose) {
        match &mut self.listener {
            Some(listener) => listener.set_pose(pose),
            None => self.listener = Some(RoomFxListener::new(pose)),
        }
    }

    /// Removes the listener. Every region reads as not containing it from now on.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn listener(&self) -> Option<RoomFxListener> {
        self.listener
    }

    /// Runs one tick with the world's own listener.
    pub fn update(&mut self, occlusion: &dyn OcclusionQuery) -> Resolution {
        let listener = self.current_listener_position();
        self.update_with_listener(&listener, occlusion)
    }

    /// Runs one tick: tests every enabled region in handle order against the listener
    /// and feeds the results to the resolver.
    ///
    /// Does nothing when no region is enabled.
    pub fn update_with_listener(
        &mut self,
        listener: &dyn ListenerQuery,
        occlusion: &dyn OcclusionQuery,
    ) -> Resolution {
        let position = listener.current_listener_position();
        for id in self.regions.enabled_ids() {
            let Some(region) = self.regions.get(id) else {
                continue;
            };
            let contained = self.resolver.is_listener_inside(region, position, occlusion);
            let resolution = self.resolver.set_candidate_active(
                id,
                contained,
                &self.regions,
                self.sink.as_mut(),
            );
            self.record_resolution(resolution);
        }
        self.resolution
    }

    fn record_resolution(&mut self, resolution: Resolution) {
        let previous = self.resolution.region();
        self.resolution = resolution;
        match (previous, resolution.region()) {
            (previous, Some(current)) if previous != Some(current) => {
                log::debug!("Active acoustic region changed to {}", current);
                self.events
                    .push(RoomFxEvent::ActiveRegionChanged { previous, current });
            }
            (Some(previous), None) => {
                log::debug!("Room effects disabled, {} no longer active", previous);
                self.events.push(RoomFxEvent::RoomEffectsDisabled { previous });
            }
            _ => {}
        }
    }

    // --- Material mapping ---

    /// Rebuilds the acoustic geometry from `snapshot` and applies the catalog.
    pub fn apply_material_mapping(&mut self, snapshot: &SceneSnapshot) -> RebuildSummary {
        let summary = self.mapper.apply_material_mapping(snapshot);
        for skipped in &summary.skipped {
            self.events.push(RoomFxEvent::MeshSkipped {
                object: skipped.object,
                reason: skipped.reason.clone(),
            });
        }
        self.events.push(RoomFxEvent::GeometryRebuilt {
            generation: summary.generation,
            identifiers: summary.identifiers,
            meshes: summary.meshes,
            included: summary.included,
        });
        summary
    }

    pub fn included_acoustic_meshes(&self) -> Vec<&AcousticMesh> {
        self.mapper.included_acoustic_meshes()
    }

    pub fn material_mapper(&self) -> &MaterialMapper {
        &self.mapper
    }

    pub fn catalog(&self) -> &SurfaceMaterialCatalog {
        self.mapper.catalog()
    }

    /// Edits apply at the next [`apply_material_mapping`](Self::apply_material_mapping).
    pub fn catalog_mut(&mut self) -> &mut SurfaceMaterialCatalog {
        self.mapper.catalog_mut()
    }

    /// Writes the catalog to `desc.catalog_path`.
    pub fn save_catalog(&self) -> Result<()> {
        let path = self.desc.catalog_path.as_ref().ok_or_else(|| {
            RoomFxError::Configuration("No catalog path configured".to_string())
        })?;
        self.mapper.catalog().save_to(path)
    }

    // --- Baking ---

    /// Bakes the given reverb probes against the currently included geometry.
    pub fn bake_reverb_probes(
        &mut self,
        ids: &[RegionId],
        computer: &mut dyn ReverbComputer,
    ) -> BakeReport {
        let meshes = self.mapper.included_acoustic_meshes();
        let report = bake::bake_probes(&mut self.regions, ids, &meshes, computer);

        for &region in &report.baked {
            self.events.push(RoomFxEvent::ProbeBaked { region });
        }
        for (region, error) in &report.failed {
            self.events.push(RoomFxEvent::ProbeBakeFailed {
                region: *region,
                error: error.to_string(),
            });
        }
        report
    }

    /// Drains the events queued since the last call.
    pub fn poll_events(&mut self) -> Vec<RoomFxEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ListenerQuery for RoomFxWorld {
    fn current_listener_position(&self) -> Option<Vec3> {
        self.listener.map(|listener| listener.pose().position)
    }
}

/// Audio listener in 3D space.
///
/// Its position decides which acoustic region, if any, is active.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomFxListener {
    pub(crate) pose: Pose,
}

impl RoomFxListener {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bake::{BakeRequest, ReverbBakeResult};
    use crate::config::LayerMask;
    use crate::engine::{CommandSink, NullSink, RoomFxCommand};
    use crate::math::Transform;
    use crate::regions::{NUM_RT60_BANDS, ProbeShape, ProxyRoom};
    use crate::scene::{
        NoOcclusion, RenderableSurface, SceneObject, SurfaceMaterial, VisualMaterial, unit_cube,
    };
    use crossbeam_channel::Receiver;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn world() -> (RoomFxWorld, Receiver<RoomFxCommand>) {
        init_logger();
        let (sink, receiver) = CommandSink::channel();
        (RoomFxWorld::new(RoomFxDesc::default(), sink).unwrap(), receiver)
    }

    fn sphere_probe(x: f32, radius: f32) -> ReverbProbe {
        ReverbProbe::new(
            Transform::from_position(Vec3::new(x, 0.0, 0.0)),
            ProbeShape::Sphere { radius },
        )
    }

    fn walk_to(world: &mut RoomFxWorld, x: f32) -> Resolution {
        world.set_listener_pose(Pose::from_position(Vec3::new(x, 0.0, 0.0)));
        world.update(&NoOcclusion)
    }

    #[test]
    fn test_probe_scenario_with_events() {
        let (mut world, receiver) = world();
        let a = world.add_reverb_probe(sphere_probe(0.0, 3.0));
        let b = world.add_reverb_probe(sphere_probe(4.0, 3.0));

        assert_eq!(walk_to(&mut world, -2.0), Resolution::ReverbProbe(a));
        assert_eq!(walk_to(&mut world, 2.0), Resolution::ReverbProbe(b));
        assert_eq!(walk_to(&mut world, -1.5), Resolution::ReverbProbe(a));
        assert_eq!(walk_to(&mut world, -10.0), Resolution::Disabled);

        assert_eq!(
            world.poll_events(),
            vec![
                RoomFxEvent::ActiveRegionChanged { previous: None, current: a },
                RoomFxEvent::ActiveRegionChanged { previous: Some(a), current: b },
                RoomFxEvent::ActiveRegionChanged { previous: Some(b), current: a },
                RoomFxEvent::RoomEffectsDisabled { previous: a },
            ]
        );
        assert!(world.poll_events().is_empty());

        let last = receiver.try_iter().last();
        assert_eq!(last, Some(RoomFxCommand::DisableRoomEffects));
    }

    #[test]
    fn test_no_enabled_regions_sends_nothing() {
        let (mut world, receiver) = world();
        assert_eq!(walk_to(&mut world, 0.0), Resolution::Disabled);
        assert_eq!(receiver.try_iter().count(), 0);

        let room = world.add_room(Room::new(Transform::IDENTITY, Vec3::splat(2.0)));
        world.set_region_enabled(room, false).unwrap();
        world.update(&NoOcclusion);
        assert_eq!(receiver.try_iter().count(), 0);
    }

    #[test]
    fn test_absent_listener_contains_nothing() {
        let (mut world, _receiver) = world();
        let room = world.add_room(Room::new(Transform::IDENTITY, Vec3::splat(2.0)));
        assert_eq!(world.update(&NoOcclusion), Resolution::Disabled);

        assert_eq!(walk_to(&mut world, 0.0), Resolution::Room(room));
        world.clear_listener();
        assert_eq!(world.update(&NoOcclusion), Resolution::Disabled);
        assert_eq!(world.current_listener_position(), None);
    }

    #[test]
    fn test_external_listener_query() {
        let (mut world, _receiver) = world();
        let room = world.add_room(Room::new(Transform::IDENTITY, Vec3::splat(2.0)));
        let listener = Some(Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(
            world.update_with_listener(&listener, &NoOcclusion),
            Resolution::Room(room)
        );
    }

    #[test]
    fn test_disable_and_remove_promote_previous_region() {
        let (mut world, receiver) = world();
        let outer = world.add_room(Room::new(Transform::IDENTITY, Vec3::splat(10.0)));
        let inner = world.add_room(Room::new(Transform::IDENTITY, Vec3::splat(2.0)));

        walk_to(&mut world, 4.0);
        assert_eq!(walk_to(&mut world, 0.0), Resolution::Room(inner));
        receiver.try_iter().for_each(drop);

        world.set_region_enabled(inner, false).unwrap();
        assert_eq!(world.active_region(), Some(outer));
        assert!(matches!(
            receiver.try_recv(),
            Ok(RoomFxCommand::ApplyRoom(id, _)) if id == outer
        ));

        world.remove_region(outer).unwrap();
        assert_eq!(world.resolution(), Resolution::Disabled);
        assert_eq!(receiver.try_recv(), Ok(RoomFxCommand::DisableRoomEffects));

        assert!(matches!(
            world.remove_region(outer),
            Err(RoomFxError::UnknownRegion(id)) if id == outer
        ));
        assert!(world.region(inner).is_some());
    }

    #[test]
    fn test_region_edits_reach_engine_next_update() {
        let (mut world, receiver) = world();
        let room = world.add_room(Room::new(Transform::IDENTITY, Vec3::splat(2.0)));
        walk_to(&mut world, 0.0);
        receiver.try_iter().for_each(drop);

        if let Some(AcousticRegion::Room(r)) = world.region_mut(room) {
            r.modifiers.time = 2.0;
        }
        world.update(&NoOcclusion);
        match receiver.try_recv() {
            Ok(RoomFxCommand::ApplyRoom(_, payload)) => assert_eq!(payload.reverb_time, 2.0),
            other => panic!("unexpected command {:?}", other),
        }
    }

    fn scene() -> SceneSnapshot {
        let floor = RenderableSurface {
            object: SceneObject::new(1, "floor"),
            transform: Transform::IDENTITY,
            mesh: unit_cube(1),
            materials: vec![VisualMaterial::new("concrete", "Concrete")],
        };
        let prop = RenderableSurface {
            object: SceneObject::new(2, "prop").with_static(false).with_layer(3),
            transform: Transform::from_position(Vec3::X * 5.0),
            mesh: unit_cube(1),
            materials: vec![VisualMaterial::new("wood", "Wood")],
        };
        SceneSnapshot::default()
            .with_renderable(floor)
            .with_renderable(prop)
    }

    #[test]
    fn test_material_mapping_and_events() {
        init_logger();
        let desc = RoomFxDesc::default().include_non_static(false);
        let mut world = RoomFxWorld::new(desc, NullSink).unwrap();
        world
            .catalog_mut()
            .set("concrete", SurfaceMaterial::PolishedConcreteOrTile);

        let summary = world.apply_material_mapping(&scene());
        assert_eq!(summary.meshes, 2);
        assert_eq!(summary.included, 1);

        let included = world.included_acoustic_meshes();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].material(0), Some(SurfaceMaterial::PolishedConcreteOrTile));
        assert_eq!(world.catalog().get("wood"), Some(SurfaceMaterial::Transparent));

        let events = world.poll_events();
        assert!(matches!(
            events.last(),
            Some(RoomFxEvent::GeometryRebuilt { meshes: 2, included: 1, .. })
        ));
    }

    #[test]
    fn test_inactive_surfaces_raise_no_error_events() {
        let mut world = RoomFxWorld::new(RoomFxDesc::default(), NullSink).unwrap();
        let mut hidden = scene().renderables.remove(0);
        hidden.object = hidden.object.with_active(false);

        let snapshot = SceneSnapshot::new().with_renderable(hidden);
        let summary = world.apply_material_mapping(&snapshot);
        assert_eq!(summary.ignored, 1);
        assert!(world.poll_events().iter().all(|event| !event.is_error()));
    }

    #[test]
    fn test_layer_mask_filters_geometry() {
        let desc = RoomFxDesc::default().reverb_layer_mask(LayerMask::from_layers(&[3]));
        let mut world = RoomFxWorld::new(desc, NullSink).unwrap();
        world.apply_material_mapping(&scene());
        let included = world.included_acoustic_meshes();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].owner().name, "prop");
    }

    struct CountingComputer;

    impl ReverbComputer for CountingComputer {
        fn compute_reverb(
            &mut self,
            request: &BakeRequest,
            meshes: &[&AcousticMesh],
        ) -> anyhow::Result<ReverbBakeResult> {
            Ok(ReverbBakeResult {
                rt60s: [meshes.len() as f32; NUM_RT60_BANDS],
                proxy_room: ProxyRoom {
                    position: request.sample_position,
                    ..Default::default()
                },
            })
        }
    }

    #[test]
    fn test_bake_uses_included_meshes() {
        let mut world = RoomFxWorld::new(RoomFxDesc::default(), NullSink).unwrap();
        world.apply_material_mapping(&scene());
        let probe = world.add_reverb_probe(sphere_probe(0.0, 5.0));
        let room = world.add_room(Room::new(Transform::IDENTITY, Vec3::ONE));
        world.poll_events();

        let report = world.bake_reverb_probes(&[probe, room], &mut CountingComputer);
        assert_eq!(report.baked, vec![probe]);
        assert_eq!(report.failed.len(), 1);

        let baked = world.region(probe).and_then(|r| r.as_reverb_probe()).unwrap();
        assert_eq!(baked.rt60s, [2.0; NUM_RT60_BANDS]);

        let events = world.poll_events();
        assert_eq!(events[0], RoomFxEvent::ProbeBaked { region: probe });
        assert!(matches!(
            &events[1],
            RoomFxEvent::ProbeBakeFailed { region, .. } if *region == room
        ));
    }

    #[test]
    fn test_catalog_persists_through_world() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let desc = RoomFxDesc::default().catalog_path(&path);

        let mut world = RoomFxWorld::new(desc.clone(), NullSink).unwrap();
        assert!(world.catalog().is_empty());
        world.catalog_mut().set("brick", SurfaceMaterial::BrickBare);
        world.save_catalog().unwrap();

        let reloaded = RoomFxWorld::new(desc, NullSink).unwrap();
        assert_eq!(reloaded.catalog().get("brick"), Some(SurfaceMaterial::BrickBare));

        let unsaved = RoomFxWorld::new(RoomFxDesc::default(), NullSink).unwrap();
        assert!(matches!(
            unsaved.save_catalog(),
            Err(RoomFxError::Configuration(_))
        ));
    }
}
