//! 棋子走法与吃子规则
//!
//! 八种动物是一个封闭枚举，规则按动物分派：地形适应性、几何走法、吃子资格。
//! 这里只判断棋子自身的规则，占位、阻挡和陷阱由棋盘处理。

use std::sync::Arc;

use crate::error::OutOfRange;
use crate::terrain::terrain_at;
use crate::types::{Animal, Player, Position, Side, Terrain};

/// 陆地动物可停留的地形
const LAND_AFFINITY: [Terrain; 3] = [
    Terrain::Land,
    Terrain::Trap(Side::First),
    Terrain::Trap(Side::Second),
];

/// 鼠可停留的地形（含河流）
const AMPHIBIOUS_AFFINITY: [Terrain; 4] = [
    Terrain::Land,
    Terrain::Trap(Side::First),
    Terrain::Trap(Side::Second),
    Terrain::Water,
];

/// 虎、狮的跳河走法 (from, to)
///
/// 横向：第 3-5 行，0 列与 6 列跳到 3 列及反向；
/// 纵向：第 1、2、4、5 列，2 行与 6 行互跳。
pub const RIVER_JUMPS: [((i8, i8), (i8, i8)); 20] = [
    ((3, 0), (3, 3)),
    ((4, 0), (4, 3)),
    ((5, 0), (5, 3)),
    ((3, 3), (3, 6)),
    ((4, 3), (4, 6)),
    ((5, 3), (5, 6)),
    ((3, 3), (3, 0)),
    ((4, 3), (4, 0)),
    ((5, 3), (5, 0)),
    ((3, 6), (3, 3)),
    ((4, 6), (4, 3)),
    ((5, 6), (5, 3)),
    ((2, 1), (6, 1)),
    ((2, 2), (6, 2)),
    ((2, 4), (6, 4)),
    ((2, 5), (6, 5)),
    ((6, 1), (2, 1)),
    ((6, 2), (2, 2)),
    ((6, 4), (2, 4)),
    ((6, 5), (2, 5)),
];

/// 是否为跳河表中的一对
pub fn is_river_jump(from: Position, to: Position) -> bool {
    RIVER_JUMPS
        .iter()
        .any(|&((fr, fc), (tr, tc))| from == Position::new(fr, fc) && to == Position::new(tr, tc))
}

impl Animal {
    /// 可停留的地形，不含兽穴
    pub fn terrain_affinity(&self) -> &'static [Terrain] {
        match self {
            Animal::Rat => &AMPHIBIOUS_AFFINITY,
            _ => &LAND_AFFINITY,
        }
    }

    #[inline]
    pub fn can_rest_on(&self, terrain: Terrain) -> bool {
        self.terrain_affinity().contains(&terrain)
    }

    /// 该动物能否执行这一跳
    #[inline]
    pub fn is_jump(&self, from: Position, to: Position) -> bool {
        self.can_jump_river() && is_river_jump(from, to)
    }

    /// 几何走法检查（不考虑其他棋子）
    ///
    /// 任一位置越界返回 `Err`；原地不动、起点地形不可停留、终点既不可停留也不是兽穴、
    /// 不是一步正交移动也不是合法跳河，都返回 `Ok(false)`。
    pub fn is_valid_move(&self, from: Position, to: Position) -> Result<bool, OutOfRange> {
        let from_terrain = terrain_at(from)?;
        let to_terrain = terrain_at(to)?;

        if from == to {
            return Ok(false);
        }
        if !self.can_rest_on(from_terrain) {
            return Ok(false);
        }
        if !(self.can_rest_on(to_terrain) || to_terrain.is_cave()) {
            return Ok(false);
        }

        Ok(self.is_jump(from, to) || from.distance(to) == 1)
    }

    /// 按等级判断能否吃对方（不看归属）
    ///
    /// 默认等级不低于对方即可；鼠可以吃象，象不能吃鼠。
    pub fn outranks(&self, defender: Animal) -> bool {
        match (self, defender) {
            (Animal::Rat, Animal::Elephant) => true,
            (Animal::Elephant, Animal::Rat) => false,
            _ => self.rank() >= defender.rank(),
        }
    }
}

/// 棋子
///
/// 归属和动物创建后不变，只有存活标记会从活变死一次。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    owner: Arc<Player>,
    animal: Animal,
    alive: bool,
}

impl Piece {
    pub fn new(owner: Arc<Player>, animal: Animal) -> Self {
        Piece {
            owner,
            animal,
            alive: true,
        }
    }

    #[inline]
    pub fn owner(&self) -> &Arc<Player> {
        &self.owner
    }

    #[inline]
    pub fn animal(&self) -> Animal {
        self.animal
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        !self.alive
    }

    pub(crate) fn die(&mut self) {
        self.alive = false;
    }

    pub fn terrain_affinity(&self) -> &'static [Terrain] {
        self.animal.terrain_affinity()
    }

    #[inline]
    pub fn is_valid_move(&self, from: Position, to: Position) -> Result<bool, OutOfRange> {
        self.animal.is_valid_move(from, to)
    }

    /// 不同玩家且等级规则允许
    ///
    /// 只是必要条件，陷阱规则由棋盘处理。
    pub fn can_capture(&self, other: &Piece) -> bool {
        self.owner != other.owner && self.animal.outranks(other.animal)
    }
}
