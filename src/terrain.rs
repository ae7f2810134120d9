//! 地形图
//!
//! 整个进程共享一份只读地形图，首次访问时构建，之后不再修改。

use crate::error::OutOfRange;
use crate::types::{Position, Side, Terrain, SQUARE_COUNT};

lazy_static::lazy_static! {
    static ref TERRAIN_MAP: TerrainMap = TerrainMap::new();
}

/// 河流所在的行
const RIVER_ROWS: [i8; 3] = [3, 4, 5];
/// 河流所在的列（左右两块）
const RIVER_COLS: [i8; 4] = [1, 2, 4, 5];
/// 兽穴所在的列
const CAVE_COL: i8 = 3;

/// 地形图 (9 行 x 7 列)
#[derive(Debug)]
pub struct TerrainMap {
    squares: [Terrain; SQUARE_COUNT],
}

impl TerrainMap {
    fn new() -> Self {
        let mut squares = [Terrain::Land; SQUARE_COUNT];

        for row in RIVER_ROWS {
            for col in RIVER_COLS {
                squares[Position::new(row, col).to_index()] = Terrain::Water;
            }
        }

        for side in Side::ALL {
            // 兽穴在底线中央，三个陷阱围在两侧和前方
            let cave = home(side, 0, CAVE_COL);
            squares[cave.to_index()] = Terrain::Cave(side);
            for (row, col) in [(0, CAVE_COL - 1), (0, CAVE_COL + 1), (1, CAVE_COL)] {
                squares[home(side, row, col).to_index()] = Terrain::Trap(side);
            }
        }

        TerrainMap { squares }
    }

    /// 全局共享的地形图
    #[inline]
    pub fn global() -> &'static TerrainMap {
        &TERRAIN_MAP
    }

    /// 查询某格地形，越界返回错误
    pub fn terrain_at(&self, pos: Position) -> Result<Terrain, OutOfRange> {
        let pos = pos.check()?;
        Ok(self.squares[pos.to_index()])
    }

    /// 某方的所有陷阱
    pub fn traps(&self, side: Side) -> impl Iterator<Item = Position> + '_ {
        self.positions_of(Terrain::Trap(side))
    }

    fn positions_of(&self, terrain: Terrain) -> impl Iterator<Item = Position> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == terrain)
            .map(|(idx, _)| Position::from_index(idx))
    }
}

/// 以某方底线为原点的坐标换算到棋盘坐标
fn home(side: Side, row: i8, col: i8) -> Position {
    let pos = Position::new(row, col);
    match side {
        Side::First => pos,
        Side::Second => pos.mirrored(),
    }
}

/// 查询全局地形图
#[inline]
pub fn terrain_at(pos: Position) -> Result<Terrain, OutOfRange> {
    TerrainMap::global().terrain_at(pos)
}
