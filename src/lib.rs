pub mod camera;
pub mod canvas;
pub mod cli;
pub mod controls;
pub mod core;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod layout;
pub mod math;
pub mod picking;
pub mod scene;
pub mod shape;
pub mod store;

pub use canvas::{ShapeCanvas, TeardownReport, TeardownStep};
pub use error::{Result, ViewerError};
pub use picking::{resolve_click, PickEvent, PickState};
pub use shape::{ShapeKind, ShapeRecord};
pub use store::ShapeStore;
