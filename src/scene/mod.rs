//! Scene synchronization.
//!
//! `plan_sync` is the pure state transition `(previous registry, shapes) ->
//! (next registry, commands)`. [`Scene`] executes the commands against the
//! live mesh set; rendering backends mirror the same commands on the GPU.

mod live;
mod registry;
mod sync;

pub use live::{Scene, SceneMesh};
pub use registry::{HandleAllocator, MeshHandle, MeshRegistry};
pub use sync::{plan_sync, MeshPlacement, SceneCommand, SceneSync, SyncPlan};
