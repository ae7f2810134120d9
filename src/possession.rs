//! 玩家持子
//!
//! 每个玩家固定持有八种动物各一枚，记录其位置（或已被吃）以及是否获胜。

use std::sync::Arc;

use crate::error::{InvalidSide, OutOfRange};
use crate::piece::Piece;
use crate::types::{Animal, Player, Position, Side};

/// 玩家 0 的初始布局，玩家 1 取中心对称
const DEFAULT_LAYOUT: [(Animal, i8, i8); 8] = [
    (Animal::Lion, 0, 0),
    (Animal::Tiger, 0, 6),
    (Animal::Dog, 1, 1),
    (Animal::Cat, 1, 5),
    (Animal::Rat, 2, 0),
    (Animal::Leopard, 2, 2),
    (Animal::Wolf, 2, 4),
    (Animal::Elephant, 2, 6),
];

/// 棋子是否在盘上
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    OnBoard(Position),
    Captured,
}

impl Placement {
    #[inline]
    pub fn position(&self) -> Option<Position> {
        match self {
            Placement::OnBoard(pos) => Some(*pos),
            Placement::Captured => None,
        }
    }
}

/// 单枚棋子的盘面记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceInfo {
    pub piece: Piece,
    pub placement: Placement,
}

impl PieceInfo {
    #[inline]
    pub fn position(&self) -> Option<Position> {
        self.placement.position()
    }
}

/// 一个玩家的全部棋子
#[derive(Debug, Clone)]
pub struct Possession {
    player: Arc<Player>,
    side: Side,
    /// 按动物等级下标存放
    pieces: [PieceInfo; 8],
    has_won: bool,
}

impl Possession {
    /// 按初始布局摆好八枚棋子
    pub fn new(player: Arc<Player>, side: Side) -> Self {
        let mut possession = Possession::empty(player, side);
        for (animal, row, col) in DEFAULT_LAYOUT {
            let pos = Position::new(row, col);
            let pos = match side {
                Side::First => pos,
                Side::Second => pos.mirrored(),
            };
            possession.pieces[animal.index()] = PieceInfo {
                piece: Piece::new(Arc::clone(&possession.player), animal),
                placement: Placement::OnBoard(pos),
            };
        }
        possession
    }

    /// 从玩家编号创建初始布局，编号只能是 0 或 1
    pub fn from_id(player: Arc<Player>, id: u8) -> Result<Self, InvalidSide> {
        Ok(Possession::new(player, Side::from_id(id)?))
    }

    /// 所有棋子都不在盘上，用 [`Possession::place`] 摆出自定义局面
    pub fn empty(player: Arc<Player>, side: Side) -> Self {
        let pieces = Animal::ALL.map(|animal| {
            let mut piece = Piece::new(Arc::clone(&player), animal);
            piece.die();
            PieceInfo {
                piece,
                placement: Placement::Captured,
            }
        });
        Possession {
            player,
            side,
            pieces,
            has_won: false,
        }
    }

    /// 用一枚新棋子替换该动物的记录并放到指定位置
    ///
    /// 不检查与其他棋子是否重叠，组装棋盘时再检查。
    pub fn place(&mut self, animal: Animal, pos: Position) -> Result<(), OutOfRange> {
        let pos = pos.check()?;
        self.pieces[animal.index()] = PieceInfo {
            piece: Piece::new(Arc::clone(&self.player), animal),
            placement: Placement::OnBoard(pos),
        };
        Ok(())
    }

    /// 链式摆子
    pub fn with(mut self, animal: Animal, pos: Position) -> Result<Self, OutOfRange> {
        self.place(animal, pos)?;
        Ok(self)
    }

    #[inline]
    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn get(&self, animal: Animal) -> &PieceInfo {
        &self.pieces[animal.index()]
    }

    /// 所有存活的棋子
    pub fn living(&self) -> impl Iterator<Item = &PieceInfo> {
        self.pieces.iter().filter(|info| info.piece.is_alive())
    }

    /// 所有棋子记录（含已被吃的）
    pub fn iter(&self) -> impl Iterator<Item = &PieceInfo> {
        self.pieces.iter()
    }

    #[inline]
    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub(crate) fn set_won(&mut self) {
        self.has_won = true;
    }

    /// 把棋子移到新位置，只能由棋盘的 relocate 调用
    pub(crate) fn set_position(&mut self, animal: Animal, pos: Position) {
        self.pieces[animal.index()].placement = Placement::OnBoard(pos);
    }

    /// 标记被吃：存活标记和位置同时变化
    pub(crate) fn capture(&mut self, animal: Animal) {
        let info = &mut self.pieces[animal.index()];
        info.piece.die();
        info.placement = Placement::Captured;
    }
}
