pub mod pointer;
pub mod queue;

pub use pointer::{pixel_to_ndc, ray_from_pointer, PointerRays, Ray};
pub use queue::{InputEvent, InputQueue};
