//! 斗兽棋棋盘
//!
//! 棋盘持有双方的持子和一个 9x7 的占位数组。占位数组是持子数据的缓存，
//! 只能通过 `relocate` 和吃子同步修改。
//!
//! 走棋校验只有一个入口 [`Board::validate_move`]，`move_request`、
//! `try_move` 和目标枚举都基于它，保证枚举结果与实际执行一致。

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{OutOfRange, Rejection, SetupError};
use crate::possession::{PieceInfo, Possession};
use crate::terrain::TerrainMap;
use crate::types::{Animal, Player, Position, Side, Terrain, BOARD_COLS, BOARD_ROWS, SQUARE_COUNT};

/// 规则配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// 跳河路线上有棋子（如河中的鼠）时禁止跳河
    ///
    /// 默认关闭：跳河不检查中间格子。
    #[serde(default)]
    pub jumps_blocked_by_pieces: bool,
}

/// 占位数组中的棋子引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PieceRef {
    side: Side,
    animal: Animal,
}

/// 一步合法走法的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub side: Side,
    pub animal: Animal,
    pub from: Position,
    pub to: Position,
    /// 被吃掉的对方棋子
    pub captured: Option<Animal>,
    /// 是否进入对方兽穴获胜
    pub wins: bool,
}

/// 斗兽棋棋盘
#[derive(Debug)]
pub struct Board {
    possessions: [Possession; 2],
    /// 63 个格子的占位 (9行 x 7列)
    squares: [Option<PieceRef>; SQUARE_COUNT],
    config: BoardConfig,
    terrain: &'static TerrainMap,
}

impl Board {
    /// 按初始布局创建棋盘
    pub fn new(player0: impl Into<Arc<Player>>, player1: impl Into<Arc<Player>>) -> Board {
        let possessions = [
            Possession::new(player0.into(), Side::First),
            Possession::new(player1.into(), Side::Second),
        ];
        let squares = occupancy(&possessions);
        Board {
            possessions,
            squares,
            config: BoardConfig::default(),
            terrain: TerrainMap::global(),
        }
    }

    /// 从两份自定义持子创建棋盘（残局、测试）
    ///
    /// 两份持子必须依次属于玩家 0 和玩家 1，且存活棋子不能重叠。
    pub fn with_possessions(
        possession0: Possession,
        possession1: Possession,
    ) -> Result<Board, SetupError> {
        for (expected, possession) in [(Side::First, &possession0), (Side::Second, &possession1)] {
            if possession.side() != expected {
                return Err(SetupError::SideMismatch {
                    expected,
                    found: possession.side(),
                });
            }
        }

        let possessions = [possession0, possession1];
        let mut squares = [None; SQUARE_COUNT];
        for (pos, piece_ref) in occupants(&possessions) {
            let square = &mut squares[pos.to_index()];
            if square.is_some() {
                return Err(SetupError::SquareOccupied(pos));
            }
            *square = Some(piece_ref);
        }

        Ok(Board {
            possessions,
            squares,
            config: BoardConfig::default(),
            terrain: TerrainMap::global(),
        })
    }

    /// 设置规则配置
    pub fn with_config(mut self, config: BoardConfig) -> Board {
        self.config = config;
        self
    }

    #[inline]
    pub fn config(&self) -> BoardConfig {
        self.config
    }

    #[inline]
    pub fn player(&self, side: Side) -> &Arc<Player> {
        self.possessions[side.index()].player()
    }

    #[inline]
    pub fn possession(&self, side: Side) -> &Possession {
        &self.possessions[side.index()]
    }

    #[inline]
    pub fn has_won(&self, side: Side) -> bool {
        self.possessions[side.index()].has_won()
    }

    /// 已获胜的一方
    ///
    /// 双方都被标记获胜时返回玩家 0，调用方应在任一方获胜后停止走棋。
    pub fn winner(&self) -> Option<Side> {
        Side::ALL.into_iter().find(|side| self.has_won(*side))
    }

    pub fn position_of(&self, side: Side, animal: Animal) -> Option<Position> {
        self.possessions[side.index()].get(animal).position()
    }

    pub fn is_dead(&self, side: Side, animal: Animal) -> bool {
        self.possessions[side.index()].get(animal).piece.is_dead()
    }

    /// 获取某位置的棋子
    pub fn piece_at(&self, pos: Position) -> Result<Option<&PieceInfo>, OutOfRange> {
        let pos = pos.check()?;
        Ok(self.squares[pos.to_index()]
            .map(|r| self.possessions[r.side.index()].get(r.animal)))
    }

    /// 校验一步棋，不修改棋盘
    ///
    /// 检查顺序：存活、几何、路线阻挡、己方兽穴、目标格占位（友军、陷阱、等级）。
    pub fn validate_move(
        &self,
        side: Side,
        animal: Animal,
        to: Position,
    ) -> Result<MoveOutcome, Rejection> {
        let info = self.possessions[side.index()].get(animal);
        let from = match info.position() {
            Some(pos) if info.piece.is_alive() => pos,
            _ => return Err(Rejection::Dead(animal)),
        };

        if !info.piece.is_valid_move(from, to)? {
            return Err(Rejection::IllegalGeometry { animal, from, to });
        }

        // 跳河默认不检查路线
        if !animal.is_jump(from, to) || self.config.jumps_blocked_by_pieces {
            if let Some(blocker) = from
                .between(to)
                .into_iter()
                .find(|p| self.squares[p.to_index()].is_some())
            {
                return Err(Rejection::Blocked(blocker));
            }
        }

        let terrain = self.terrain.terrain_at(to)?;
        if terrain == Terrain::Cave(side) {
            return Err(Rejection::OwnCave);
        }

        let captured = match self.squares[to.to_index()] {
            None => None,
            Some(occupant) if occupant.side == side => {
                return Err(Rejection::FriendlyFire(occupant.animal));
            }
            // 归属只按座位判断，双方玩家同名也不影响吃子
            Some(occupant) => {
                match terrain {
                    // 对方棋子落入我方陷阱，无视等级（象仍不能吃鼠）
                    Terrain::Trap(owner) if owner == side => {
                        if animal == Animal::Elephant && occupant.animal == Animal::Rat {
                            return Err(Rejection::Outranked {
                                attacker: animal,
                                defender: occupant.animal,
                            });
                        }
                        Some(occupant.animal)
                    }
                    // 对方在自己的陷阱里，不可被吃
                    Terrain::Trap(_) => return Err(Rejection::TrapImmune(occupant.animal)),
                    _ if animal.outranks(occupant.animal) => Some(occupant.animal),
                    _ => {
                        return Err(Rejection::Outranked {
                            attacker: animal,
                            defender: occupant.animal,
                        });
                    }
                }
            }
        };

        Ok(MoveOutcome {
            side,
            animal,
            from,
            to,
            captured,
            // 只有走进空的对方兽穴才算胜
            wins: captured.is_none() && terrain == Terrain::Cave(side.opposite()),
        })
    }

    /// 执行走棋，返回结果或拒绝原因
    ///
    /// 被拒绝时棋盘不变。越界位置记 warn 日志，其他拒绝记 info 日志。
    pub fn try_move(
        &mut self,
        side: Side,
        animal: Animal,
        to: Position,
    ) -> Result<MoveOutcome, Rejection> {
        let outcome = match self.validate_move(side, animal, to) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                let name = self.player(side).name();
                match rejection {
                    Rejection::OutOfRange(_) => {
                        warn!("Player {}: {} move rejected: {}", name, animal, rejection)
                    }
                    _ => info!("Player {}: {} move rejected: {}", name, animal, rejection),
                }
                return Err(rejection);
            }
        };

        if let Some(victim) = outcome.captured {
            self.possessions[side.opposite().index()].capture(victim);
            debug!(
                "Player {}: {} captures {} at {}",
                self.player(side).name(),
                animal,
                victim,
                to
            );
        }

        self.relocate(side, animal, outcome.from, to);

        if outcome.wins {
            self.possessions[side.index()].set_won();
            info!(
                "Player {}: {} entered the opponent's cave and wins",
                self.player(side).name(),
                animal
            );
        }

        Ok(outcome)
    }

    /// 请求走棋，成功返回 true
    pub fn move_request(&mut self, side: Side, animal: Animal, to: Position) -> bool {
        self.try_move(side, animal, to).is_ok()
    }

    /// 枚举某枚棋子当前所有合法目标（行优先）
    ///
    /// 惰性且不修改棋盘；每次调用都从头开始。已被吃的棋子没有目标。
    pub fn destinations(&self, side: Side, animal: Animal) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |to| self.validate_move(side, animal, *to).is_ok())
    }

    /// 某方所有合法走法 (动物, 目标)
    pub fn legal_moves(&self, side: Side) -> Vec<(Animal, Position)> {
        self.possessions[side.index()]
            .living()
            .flat_map(|info| {
                let animal = info.piece.animal();
                self.destinations(side, animal).map(move |to| (animal, to))
            })
            .collect()
    }

    /// 渲染为 9x7 的字符串表格，空格为空字符串
    pub fn render(&self) -> Vec<Vec<String>> {
        (0..BOARD_ROWS)
            .map(|row| {
                (0..BOARD_COLS)
                    .map(|col| match self.squares[Position::new(row, col).to_index()] {
                        Some(r) => format!("{}: {}", self.player(r.side).name(), r.animal),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect()
    }

    /// 唯一同时修改占位数组和持子位置的路径
    fn relocate(&mut self, side: Side, animal: Animal, from: Position, to: Position) {
        self.squares[from.to_index()] = None;
        self.squares[to.to_index()] = Some(PieceRef { side, animal });
        self.possessions[side.index()].set_position(animal, to);
        debug!(
            "Player {}: {} {} -> {}",
            self.player(side).name(),
            animal,
            from,
            to
        );
    }
}

/// 深拷贝双方持子并重建占位数组，玩家身份共享
impl Clone for Board {
    fn clone(&self) -> Self {
        let possessions = self.possessions.clone();
        let squares = occupancy(&possessions);
        Board {
            possessions,
            squares,
            config: self.config,
            terrain: self.terrain,
        }
    }
}

/// 简易文本棋盘：`0L` 表示玩家 0 的狮，`~` 河，`^` 陷阱，`@` 兽穴，`.` 陆地
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..BOARD_ROWS).rev() {
            write!(f, "{} ", row)?;
            for col in 0..BOARD_COLS {
                let pos = Position::new(row, col);
                match self.squares[pos.to_index()] {
                    Some(r) => write!(f, " {}{}", r.side, symbol(r.animal))?,
                    None => {
                        let mark = match self.terrain.terrain_at(pos) {
                            Ok(Terrain::Water) => '~',
                            Ok(Terrain::Trap(_)) => '^',
                            Ok(Terrain::Cave(_)) => '@',
                            _ => '.',
                        };
                        write!(f, " {} ", mark)?
                    }
                }
            }
            writeln!(f)?;
        }
        write!(f, " ")?;
        for col in 0..BOARD_COLS {
            write!(f, "  {}", col)?;
        }
        writeln!(f)
    }
}

fn symbol(animal: Animal) -> char {
    match animal {
        Animal::Rat => 'R',
        Animal::Cat => 'C',
        Animal::Dog => 'D',
        Animal::Wolf => 'W',
        Animal::Leopard => 'P',
        Animal::Tiger => 'T',
        Animal::Lion => 'L',
        Animal::Elephant => 'E',
    }
}

/// 双方存活棋子的位置
fn occupants(possessions: &[Possession; 2]) -> impl Iterator<Item = (Position, PieceRef)> + '_ {
    possessions.iter().flat_map(|possession| {
        let side = possession.side();
        possession.living().filter_map(move |info| {
            info.position().map(|pos| {
                (
                    pos,
                    PieceRef {
                        side,
                        animal: info.piece.animal(),
                    },
                )
            })
        })
    })
}

/// 从已知无重叠的持子构建占位数组
fn occupancy(possessions: &[Possession; 2]) -> [Option<PieceRef>; SQUARE_COUNT] {
    let mut squares = [None; SQUARE_COUNT];
    for (pos, piece_ref) in occupants(possessions) {
        squares[pos.to_index()] = Some(piece_ref);
    }
    squares
}
