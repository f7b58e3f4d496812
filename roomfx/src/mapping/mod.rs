//! Surface-material mapping and acoustic geometry aggregation.
//!
//! - [`SurfaceMaterialCatalog`]: persistent identifier →
//!   [`SurfaceMaterial`](crate::scene::SurfaceMaterial) map
//! - [`GeometryIndex`]: transient identifier → geometry index, rebuilt from each scene snapshot
//! - [`MaterialMapper`]: runs rebuilds, applies the catalog and the [`InclusionFilter`]

mod catalog;
mod filter;
mod geometry_index;
mod mapper;

pub use catalog::{PersistedCatalog, SurfaceMaterialCatalog};
pub use filter::InclusionFilter;
pub use geometry_index::{GeometryIndex, KindConflict, MeshId, SurfaceEntry};
pub use mapper::{MaterialMapper, RebuildSummary, SkippedSurface};
