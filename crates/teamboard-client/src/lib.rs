pub mod gateway;
pub mod resolver;
pub mod view;

pub use gateway::{CardGateway, HttpGateway};
pub use resolver::{nearest_marker, DropMarker, DISTANCE_OFFSET};
pub use view::{BoardView, DropAction, DropEvent, MoveState};
