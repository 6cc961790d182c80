pub mod body;
pub mod camera;
pub mod collectible;
pub mod collision;
pub mod grid;
pub mod rect;
pub mod time;

pub use body::{Body, BodyConfig, BodyInput};
pub use camera::Camera2D;
pub use collectible::{Collectible, CollectibleId, CollectibleSet};
pub use collision::{resolve_tile_collisions, CollisionCell, CollisionReport};
pub use grid::{GridCell, TileGrid, TileLayer, TileLayerFile};
pub use rect::Rect;
pub use time::{FixedClock, FrameClock, SystemClock, TimeState};
