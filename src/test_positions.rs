//! 斗兽棋测试局面库
//!
//! 提供命名的测试局面，方便测试、调试和命令行复现
//!
//! 每个局面列出双方存活棋子的位置，未列出的棋子视为已被吃。

use std::sync::Arc;

use crate::board::Board;
use crate::error::SetupError;
use crate::possession::Possession;
use crate::types::{Animal, Player, Position, Side};

/// 一方的摆子列表 (动物, (行, 列))
pub type Layout = &'static [(Animal, (i8, i8))];

/// 命名局面
#[derive(Debug, Clone, Copy)]
pub struct Setup {
    pub name: &'static str,
    pub first: Layout,
    pub second: Layout,
}

impl Setup {
    /// 用默认玩家名组装棋盘
    pub fn board(&self) -> Result<Board, SetupError> {
        custom(self.first, self.second)
    }

    /// 指定双方玩家组装棋盘
    pub fn board_for(
        &self,
        player0: Arc<Player>,
        player1: Arc<Player>,
    ) -> Result<Board, SetupError> {
        assemble(player0, player1, self.first, self.second)
    }
}

// =============================================================================
// 开局
// =============================================================================

/// 初始局面
pub const START: Setup = Setup {
    name: "start",
    first: &[
        (Animal::Lion, (0, 0)),
        (Animal::Tiger, (0, 6)),
        (Animal::Dog, (1, 1)),
        (Animal::Cat, (1, 5)),
        (Animal::Rat, (2, 0)),
        (Animal::Leopard, (2, 2)),
        (Animal::Wolf, (2, 4)),
        (Animal::Elephant, (2, 6)),
    ],
    second: &[
        (Animal::Lion, (8, 6)),
        (Animal::Tiger, (8, 0)),
        (Animal::Dog, (7, 5)),
        (Animal::Cat, (7, 1)),
        (Animal::Rat, (6, 6)),
        (Animal::Leopard, (6, 4)),
        (Animal::Wolf, (6, 2)),
        (Animal::Elephant, (6, 0)),
    ],
};

// =============================================================================
// 走法枚举
// =============================================================================

/// 双狮各据一角，只有两个目标
pub const CORNER_LIONS: Setup = Setup {
    name: "corner-lions",
    first: &[(Animal::Lion, (0, 0))],
    second: &[(Animal::Lion, (8, 6))],
};

/// 狮在河边，己方鼠在跳河路线上；对方狮可纵向跳河
pub const JUMP_LANES: Setup = Setup {
    name: "jump-lanes",
    first: &[(Animal::Lion, (3, 3)), (Animal::Rat, (3, 2))],
    second: &[(Animal::Lion, (6, 1))],
};

/// 普通棋子四向行走
pub const ORDINARY: Setup = Setup {
    name: "ordinary",
    first: &[(Animal::Dog, (1, 1))],
    second: &[(Animal::Cat, (7, 1))],
};

// =============================================================================
// 陷阱与兽穴
// =============================================================================

/// 对方狗守在自己的陷阱里，狮吃不了；旁边是对方空陷阱
pub const TRAP_STANDOFF: Setup = Setup {
    name: "trap-standoff",
    first: &[(Animal::Lion, (7, 2))],
    second: &[(Animal::Dog, (7, 3)), (Animal::Cat, (8, 1))],
};

/// 鼠在对方陷阱，下一步入穴
pub const CAVE_RUN: Setup = Setup {
    name: "cave-run",
    first: &[(Animal::Rat, (8, 2))],
    second: &[(Animal::Dog, (7, 3))],
};

// =============================================================================
// 河流
// =============================================================================

/// 己方鼠在河中，对方虎在河对岸
pub const RIVER_GUARD: Setup = Setup {
    name: "river-guard",
    first: &[(Animal::Rat, (4, 1))],
    second: &[(Animal::Tiger, (6, 1))],
};

/// 所有命名局面
pub const ALL_SETUPS: [Setup; 7] = [
    START,
    CORNER_LIONS,
    JUMP_LANES,
    ORDINARY,
    TRAP_STANDOFF,
    CAVE_RUN,
    RIVER_GUARD,
];

/// 按名称查找局面
pub fn by_name(name: &str) -> Option<&'static Setup> {
    ALL_SETUPS.iter().find(|setup| setup.name.eq_ignore_ascii_case(name))
}

/// 用 "Player 0" / "Player 1" 组装自定义局面
pub fn custom(
    first: &[(Animal, (i8, i8))],
    second: &[(Animal, (i8, i8))],
) -> Result<Board, SetupError> {
    assemble(
        Arc::new(Player::new("Player 0")),
        Arc::new(Player::new("Player 1")),
        first,
        second,
    )
}

fn assemble(
    player0: Arc<Player>,
    player1: Arc<Player>,
    first: &[(Animal, (i8, i8))],
    second: &[(Animal, (i8, i8))],
) -> Result<Board, SetupError> {
    Board::with_possessions(
        layout(Possession::empty(player0, Side::First), first)?,
        layout(Possession::empty(player1, Side::Second), second)?,
    )
}

fn layout(
    mut possession: Possession,
    pieces: &[(Animal, (i8, i8))],
) -> Result<Possession, SetupError> {
    for &(animal, (row, col)) in pieces {
        possession.place(animal, Position::new(row, col))?;
    }
    Ok(possession)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_setups_valid() {
        for setup in ALL_SETUPS.iter() {
            let board = setup.board();
            assert!(board.is_ok(), "{} invalid: {:?}", setup.name, board.err());
        }
    }

    #[test]
    fn test_start_matches_new_board() {
        let board = START.board().unwrap();
        let fresh = Board::new(Player::new("Player 0"), Player::new("Player 1"));
        assert_eq!(board.render(), fresh.render());
    }

    #[test]
    fn test_unlisted_pieces_are_dead() {
        let board = CORNER_LIONS.board().unwrap();
        assert!(!board.is_dead(Side::First, Animal::Lion));
        assert!(board.is_dead(Side::First, Animal::Rat));
        assert_eq!(board.legal_moves(Side::First).len(), 2);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("cave-run").map(|s| s.name), Some("cave-run"));
        assert_eq!(by_name("START").map(|s| s.name), Some("start"));
        assert!(by_name("missing").is_none());
    }

    #[test]
    fn test_custom_errors() {
        assert!(matches!(
            custom(&[(Animal::Cat, (9, 0))], &[]),
            Err(SetupError::OutOfRange(_))
        ));
        assert!(matches!(
            custom(&[(Animal::Cat, (4, 3))], &[(Animal::Dog, (4, 3))]),
            Err(SetupError::SquareOccupied(_))
        ));
    }

    #[test]
    fn test_named_scenarios() {
        let mut board = TRAP_STANDOFF.board().unwrap();
        assert!(!board.move_request(Side::First, Animal::Lion, Position::new(7, 3)));
        assert!(board.move_request(Side::First, Animal::Lion, Position::new(8, 2)));
        assert!(board.move_request(Side::Second, Animal::Cat, Position::new(8, 2)));
        assert!(board.is_dead(Side::First, Animal::Lion));

        let mut board = CAVE_RUN.board().unwrap();
        assert!(board.move_request(Side::First, Animal::Rat, Position::new(8, 3)));
        assert_eq!(board.winner(), Some(Side::First));

        let mut board = RIVER_GUARD.board().unwrap();
        assert!(board.move_request(Side::Second, Animal::Tiger, Position::new(2, 1)));
    }

    #[test]
    fn test_board_for_named_players() {
        let alice = Arc::new(Player::new("Alice"));
        let board = ORDINARY
            .board_for(Arc::clone(&alice), Arc::new(Player::new("Bob")))
            .unwrap();
        assert!(Arc::ptr_eq(board.player(Side::First), &alice));
        assert_eq!(board.render()[1][1], "Alice: DOG");
    }
}
