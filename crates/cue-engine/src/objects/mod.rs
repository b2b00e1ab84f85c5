pub mod ball;
pub mod floor;
pub mod table;
pub mod wall;

pub use ball::{Ball, BallConfig};
pub use floor::Floor;
pub use table::{TableCollider, TableConfig, TableDimensions};
pub use wall::{check_walls_face_inward, BoundaryWall, WallConfig};
