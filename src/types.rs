//! 斗兽棋核心类型定义
//!
//! 定义斗兽棋中所有基础数据类型

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidSide, OutOfRange};

/// 棋盘行数
pub const BOARD_ROWS: i8 = 9;
/// 棋盘列数
pub const BOARD_COLS: i8 = 7;
/// 格子总数
pub const SQUARE_COUNT: usize = (BOARD_ROWS as usize) * (BOARD_COLS as usize);

/// 座位（玩家编号）
///
/// `First` 对应编号 0，家在第 0 行一侧；`Second` 对应编号 1，家在第 8 行一侧。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::First, Side::Second];

    /// 获取对方
    pub fn opposite(&self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// 玩家编号 (0 或 1)
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    /// 从玩家编号解析，只接受 0 和 1
    pub fn from_id(id: u8) -> Result<Side, InvalidSide> {
        match id {
            0 => Ok(Side::First),
            1 => Ok(Side::Second),
            _ => Err(InvalidSide(id)),
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = InvalidSide;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Side::from_id(id)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// 玩家身份
///
/// 按名字判等和哈希：两个同名的 `Player` 视为同一个玩家。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    name: String,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Player { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 动物（食物链等级）
///
/// 判别值就是等级，派生的 `Ord` 与等级顺序一致。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Animal {
    /// 鼠
    Rat = 1,
    /// 猫
    Cat = 2,
    /// 狗
    Dog = 3,
    /// 狼
    Wolf = 4,
    /// 豹
    Leopard = 5,
    /// 虎
    Tiger = 6,
    /// 狮
    Lion = 7,
    /// 象
    Elephant = 8,
}

impl Animal {
    /// 按等级从低到高
    pub const ALL: [Animal; 8] = [
        Animal::Rat,
        Animal::Cat,
        Animal::Dog,
        Animal::Wolf,
        Animal::Leopard,
        Animal::Tiger,
        Animal::Lion,
        Animal::Elephant,
    ];

    /// 等级 (1-8)
    #[inline]
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// 数组下标 (0-7)
    #[inline]
    pub fn index(&self) -> usize {
        self.rank() as usize - 1
    }

    /// 显示名（大写）
    pub fn name(&self) -> &'static str {
        match self {
            Animal::Rat => "RAT",
            Animal::Cat => "CAT",
            Animal::Dog => "DOG",
            Animal::Wolf => "WOLF",
            Animal::Leopard => "LEOPARD",
            Animal::Tiger => "TIGER",
            Animal::Lion => "LION",
            Animal::Elephant => "ELEPHANT",
        }
    }

    /// 从名字解析（不区分大小写）
    pub fn from_name(s: &str) -> Option<Animal> {
        Animal::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
    }

    /// 能否跳河（虎、狮）
    #[inline]
    pub fn can_jump_river(&self) -> bool {
        matches!(self, Animal::Tiger | Animal::Lion)
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Animal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Animal::from_name(s).ok_or_else(|| format!("Unknown animal: {}", s))
    }
}

/// 地形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Land,
    Water,
    /// 某方的陷阱（位于该方家中）
    Trap(Side),
    /// 某方的兽穴（位于该方底线中央）
    Cave(Side),
}

impl Terrain {
    #[inline]
    pub fn is_cave(&self) -> bool {
        matches!(self, Terrain::Cave(_))
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terrain::Land => write!(f, "LAND"),
            Terrain::Water => write!(f, "WATER"),
            Terrain::Trap(side) => write!(f, "TRAP{}", side),
            Terrain::Cave(side) => write!(f, "CAVE{}", side),
        }
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-8 (0 是玩家 0 的底线，8 是玩家 1 的底线)
/// col: 0-6 (从左到右)
///
/// 构造时不检查范围，越界位置在每个接受位置的入口处报 [`OutOfRange`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..BOARD_ROWS).contains(&self.row) && (0..BOARD_COLS).contains(&self.col)
    }

    /// 范围检查，越界返回错误
    #[inline]
    pub fn check(self) -> Result<Position, OutOfRange> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(OutOfRange {
                row: self.row,
                col: self.col,
            })
        }
    }

    /// 位置加偏移量
    ///
    /// 饱和运算：结果超出 i8 时停在边界值，仍是越界位置。
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row.saturating_add(row_delta),
            col: self.col.saturating_add(col_delta),
        }
    }

    /// 中心对称的位置（用于镜像玩家 1 的布局）
    pub fn mirrored(&self) -> Position {
        Position {
            row: (BOARD_ROWS - 1).saturating_sub(self.row),
            col: (BOARD_COLS - 1).saturating_sub(self.col),
        }
    }

    /// 曼哈顿距离
    pub fn distance(&self, other: Position) -> u16 {
        let rows = (i16::from(self.row) - i16::from(other.row)).unsigned_abs();
        let cols = (i16::from(self.col) - i16::from(other.col)).unsigned_abs();
        rows + cols
    }

    /// 行优先下标，调用方需保证位置合法
    #[inline]
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_COLS as usize + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Position {
        Position {
            row: (idx / BOARD_COLS as usize) as i8,
            col: (idx % BOARD_COLS as usize) as i8,
        }
    }

    /// 所有合法位置，行优先
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SQUARE_COUNT).map(Position::from_index)
    }

    /// 严格位于两点之间的格子（仅限同行或同列，否则为空）
    pub fn between(&self, other: Position) -> Vec<Position> {
        // 在 i16 上迭代，两个 i8 严格之间的值总能转回 i8
        let span = |a: i8, b: i8| (i16::from(a.min(b)) + 1)..i16::from(a.max(b));
        let mut cells = Vec::new();
        if self.row == other.row {
            for col in span(self.col, other.col) {
                cells.push(Position::new(self.row, col as i8));
            }
        } else if self.col == other.col {
            for row in span(self.row, other.row) {
                cells.push(Position::new(row as i8, self.col));
            }
        }
        cells
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 解析 `row,col` 形式（如 `2,1`），不做范围检查
impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| format!("Invalid position: expected 'row,col', got: {}", s))?;
        let row = row
            .trim()
            .parse::<i8>()
            .map_err(|e| format!("Invalid row '{}': {}", row.trim(), e))?;
        let col = col
            .trim()
            .parse::<i8>()
            .map_err(|e| format!("Invalid col '{}': {}", col.trim(), e))?;
        Ok(Position { row, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_id() {
        assert_eq!(Side::from_id(0), Ok(Side::First));
        assert_eq!(Side::from_id(1), Ok(Side::Second));
        assert_eq!(Side::from_id(2), Err(InvalidSide(2)));
        assert_eq!(Side::try_from(1u8), Ok(Side::Second));
        assert_eq!(Side::First.opposite(), Side::Second);
    }

    #[test]
    fn test_player_equality_by_name() {
        assert_eq!(Player::new("Alice"), Player::new("Alice"));
        assert_ne!(Player::new("Alice"), Player::new("Bob"));
    }

    #[test]
    fn test_animal_order() {
        assert!(Animal::Rat < Animal::Cat);
        assert!(Animal::Lion < Animal::Elephant);
        assert_eq!(Animal::Elephant.rank(), 8);
        for (i, animal) in Animal::ALL.iter().enumerate() {
            assert_eq!(animal.index(), i);
        }
    }

    #[test]
    fn test_animal_names() {
        assert_eq!(Animal::Rat.to_string(), "RAT");
        assert_eq!(Animal::from_name("leopard"), Some(Animal::Leopard));
        assert_eq!("Tiger".parse::<Animal>(), Ok(Animal::Tiger));
        assert!("dragon".parse::<Animal>().is_err());
    }

    #[test]
    fn test_position_validity() {
        assert!(Position::new(0, 0).is_valid());
        assert!(Position::new(8, 6).is_valid());
        assert!(!Position::new(-1, 0).is_valid());
        assert!(!Position::new(0, -1).is_valid());
        assert!(!Position::new(9, 0).is_valid());
        assert!(!Position::new(0, 7).is_valid());
        assert_eq!(
            Position::new(9, 0).check(),
            Err(OutOfRange { row: 9, col: 0 })
        );
    }

    #[test]
    fn test_position_index() {
        for pos in Position::all() {
            assert_eq!(Position::from_index(pos.to_index()), pos);
        }
        assert_eq!(Position::all().count(), 63);
    }

    #[test]
    fn test_position_mirror() {
        assert_eq!(Position::new(0, 0).mirrored(), Position::new(8, 6));
        assert_eq!(Position::new(2, 4).mirrored(), Position::new(6, 2));
    }

    #[test]
    fn test_position_between() {
        assert_eq!(
            Position::new(3, 0).between(Position::new(3, 3)),
            vec![Position::new(3, 1), Position::new(3, 2)]
        );
        assert_eq!(
            Position::new(6, 1).between(Position::new(2, 1)),
            vec![Position::new(3, 1), Position::new(4, 1), Position::new(5, 1)]
        );
        assert!(Position::new(1, 1).between(Position::new(1, 2)).is_empty());
        assert!(Position::new(1, 1).between(Position::new(2, 2)).is_empty());
    }

    #[test]
    fn test_position_extreme_coordinates() {
        // 极端坐标不溢出，结果仍是越界位置
        let corner = Position::new(i8::MAX, i8::MIN);
        assert!(corner.between(corner).is_empty());
        assert!(Position::new(127, 0).between(Position::new(127, 0)).is_empty());
        assert_eq!(
            Position::new(-128, 0).between(Position::new(127, 0)).len(),
            254
        );
        assert_eq!(Position::new(-128, -128).distance(Position::new(127, 127)), 510);
        assert_eq!(Position::new(127, 0).offset(1, 0), Position::new(127, 0));
        assert!(!Position::new(8, 6).offset(1, 0).is_valid());
        assert!(!Position::new(-128, 0).mirrored().is_valid());
    }

    #[test]
    fn test_position_from_str() {
        assert_eq!("2,1".parse::<Position>(), Ok(Position::new(2, 1)));
        assert_eq!("(8, 3)".parse::<Position>(), Ok(Position::new(8, 3)));
        assert_eq!("-1,0".parse::<Position>(), Ok(Position::new(-1, 0)));
        assert!("21".parse::<Position>().is_err());
    }
}
