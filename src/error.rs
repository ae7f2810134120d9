//! 错误类型
//!
//! 两类错误：调用方违反约定（越界位置、非法玩家编号、摆子冲突）是硬错误；
//! 规则拒绝（[`Rejection`]）只说明某步棋不被允许。

use thiserror::Error;

use crate::types::{Animal, Position, Side};

/// 位置超出 9x7 棋盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("position ({row}, {col}) is outside the 9x7 board")]
pub struct OutOfRange {
    pub row: i8,
    pub col: i8,
}

/// 玩家编号不是 0 或 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("invalid player id {0}, expected 0 or 1")]
pub struct InvalidSide(pub u8);

/// 由两份持子组装棋盘时的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
    #[error(transparent)]
    InvalidSide(#[from] InvalidSide),
    #[error("expected a possession for player {expected}, got one for player {found}")]
    SideMismatch { expected: Side, found: Side },
    #[error("more than one piece placed on {0}")]
    SquareOccupied(Position),
}

/// 走棋被规则拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{0} has been captured")]
    Dead(Animal),
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
    #[error("{animal} cannot move from {from} to {to}")]
    IllegalGeometry {
        animal: Animal,
        from: Position,
        to: Position,
    },
    #[error("path blocked at {0}")]
    Blocked(Position),
    #[error("cannot enter own cave")]
    OwnCave,
    #[error("destination occupied by own {0}")]
    FriendlyFire(Animal),
    #[error("{0} is protected by its own trap")]
    TrapImmune(Animal),
    #[error("{attacker} cannot capture {defender}")]
    Outranked { attacker: Animal, defender: Animal },
}
