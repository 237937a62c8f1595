pub mod board;
pub mod card;
pub mod column;

pub use board::{Board, BoardId};
pub use card::{Card, CardId, CardPatch};
pub use column::Column;
