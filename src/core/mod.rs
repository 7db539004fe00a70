pub mod backend;
pub mod controller;
pub mod display_context;
pub mod gestures;
pub mod gpu_context;
pub mod input_adapter;
pub mod overlay;
pub mod surface_renderer;

pub use backend::{FrameContext, OverlayAction, RenderBackend};
pub use controller::{Button, ButtonState, Controller, PointerEvent};
pub use display_context::Viewport;
pub use gestures::{Gesture, PointerGestures, CLICK_SLOP};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use surface_renderer::WgpuBackend;
