//! Reverb baking for reverb probes.
//!
//! The numerical reverb computation is provided by the caller through [`ReverbComputer`].
//! This module gathers the inputs, runs the computer per probe and writes the results
//! back onto the probes.

use crate::error::RoomFxError;
use crate::math::Vec3;
use crate::regions::{AcousticRegion, NUM_RT60_BANDS, ProxyRoom, RegionId, RegionSet};
use crate::scene::AcousticMesh;

/// Input for one probe bake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BakeRequest {
    pub region: RegionId,
    /// World position the reverb is sampled at
    pub sample_position: Vec3,
}

/// Output of one probe bake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbBakeResult {
    pub rt60s: [f32; NUM_RT60_BANDS],
    pub proxy_room: ProxyRoom,
}

/// Computes reverb for a probe from the included acoustic geometry.
pub trait ReverbComputer {
    fn compute_reverb(
        &mut self,
        request: &BakeRequest,
        meshes: &[&AcousticMesh],
    ) -> anyhow::Result<ReverbBakeResult>;
}

/// Outcome of a batch of probe bakes.
#[derive(Debug, Default)]
pub struct BakeReport {
    pub baked: Vec<RegionId>,
    pub failed: Vec<(RegionId, RoomFxError)>,
}

impl BakeReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Bakes each probe in `ids` against `meshes`.
///
/// Unknown handles, rooms and computation failures are recorded in the report and do
/// not stop the remaining probes from baking.
pub fn bake_probes(
    regions: &mut RegionSet,
    ids: &[RegionId],
    meshes: &[&AcousticMesh],
    computer: &mut dyn ReverbComputer,
) -> BakeReport {
    let mut report = BakeReport::default();
    log::info!(
        "Baking {} reverb probe(s) against {} acoustic mesh(es)",
        ids.len(),
        meshes.len()
    );

    for &id in ids {
        match bake_probe(regions, id, meshes, computer) {
            Ok(()) => {
                log::debug!("Baked reverb probe {}", id);
                report.baked.push(id);
            }
            Err(e) => {
                log::error!("Failed to bake reverb probe {}: {}", id, e);
                report.failed.push((id, e));
            }
        }
    }

    report
}

fn bake_probe(
    regions: &mut RegionSet,
    id: RegionId,
    meshes: &[&AcousticMesh],
    computer: &mut dyn ReverbComputer,
) -> crate::error::Result<()> {
    let probe = match regions.get_mut(id) {
        Some(AcousticRegion::ReverbProbe(probe)) => probe,
        Some(AcousticRegion::Room(_)) => return Err(RoomFxError::NotAReverbProbe(id)),
        None => return Err(RoomFxError::UnknownRegion(id)),
    };

    let request = BakeRequest {
        region: id,
        sample_position: probe.transform.position,
    };
    let result = computer
        .compute_reverb(&request, meshes)
        .map_err(|e| RoomFxError::ReverbComputation(format!("{:#}", e)))?;

    probe.rt60s = result.rt60s;
    probe.proxy_room = result.proxy_room;
    Ok(())
}
