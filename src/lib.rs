//! Jungle (Dou Shou Qi) Rules Engine
//!
//! 斗兽棋规则引擎 - 棋盘、地形、走法校验与枚举

pub mod board;
pub mod error;
pub mod piece;
pub mod possession;
pub mod terrain;
pub mod test_positions;
pub mod types;

pub use board::{Board, BoardConfig, MoveOutcome};
pub use error::{InvalidSide, OutOfRange, Rejection, SetupError};
pub use piece::{is_river_jump, Piece, RIVER_JUMPS};
pub use possession::{PieceInfo, Placement, Possession};
pub use terrain::{terrain_at, TerrainMap};
pub use types::{Animal, Player, Position, Side, Terrain, BOARD_COLS, BOARD_ROWS};
