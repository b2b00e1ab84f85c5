pub mod api;
pub mod assets;
pub mod controllers;
pub mod core;
pub mod error;
pub mod input;
pub mod objects;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{CameraConfig, RoomConfig};
pub use api::room::BilliardsRoom;
pub use api::types::{AimOutcome, BallId};
pub use assets::loading::AssetState;
pub use controllers::arrow::{AimIndicator, ArrowIndicator};
pub use controllers::cue::{strike_direction, AimState, MAX_HIT_POWER, CueConfig, CueController};
pub use core::material::{ContactPairing, Material};
pub use core::physics::{BodyDesc, PhysicsBody, PhysicsWorld, ShapeDesc, ShapeKind};
pub use core::scene::BallSet;
pub use core::time::SimulationClock;
pub use error::ConfigError;
pub use input::pointer::{pixel_to_ndc, ray_from_pointer, PointerRays, Ray};
pub use input::queue::{InputEvent, InputQueue};
pub use objects::{Ball, BallConfig, BoundaryWall, Floor, TableCollider, TableConfig, TableDimensions, WallConfig};
pub use renderer::camera::{PerspectiveCamera, Viewpoint};
pub use renderer::instance::{BallInstance, RenderBuffer};
pub use systems::hover::HoverHighlighter;
