//! Advancing-front triangulation of implicit scalar volumes.
//!
//! Grows a triangle mesh outward from a seed point by walking an implicit
//! [`Volume`](volume::Volume)'s zero level set one front edge at a time.
//! The volume's own algebra, rendering, and windowing are all the host's
//! concern; this crate only does the meshing.
//!
//! ```ignore
//! use advancing_front::{AdvancingFront, AdvancingFrontConfig};
//! use advancing_front::samplers::Sphere;
//! use advancing_front::volume::NullSink;
//! use glam::DVec3;
//!
//! let volume = Sphere::new(5.0);
//! let config = AdvancingFrontConfig::new(0.5, 20.0);
//! let mut front = AdvancingFront::new(&volume, NullSink, config);
//! front.build_full_surface(DVec3::new(5.0, 0.0, 0.0));
//! ```

pub mod advancing_front;
pub mod config;
pub mod constants;
pub mod graph;
pub mod probe;
pub mod samplers;
pub mod sort_key;
pub mod spatial_hash;
pub mod surface_memory;
pub mod volume;

pub use advancing_front::AdvancingFront;
pub use config::AdvancingFrontConfig;
pub use graph::{EdgeId, Graph, NodeId};
pub use spatial_hash::PointSpatialHash;
pub use surface_memory::SurfaceMemory;
pub use volume::{CompositeSink, MeshSink, NullSink, Volume, VolumeData};
