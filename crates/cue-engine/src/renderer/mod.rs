pub mod camera;
pub mod instance;

// Re-export key types for convenient access
pub use camera::{PerspectiveCamera, Viewpoint};
pub use instance::{BallInstance, RenderBuffer};
