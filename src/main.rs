//! Jungle CLI
//!
//! 命令行界面，用于复现局面和查询走法
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，通过 stdin/stdout 通信

use clap::{Parser, Subcommand};
use jungle_rules::{test_positions, Animal, Board, BoardConfig, Player, Position, Side};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "jungle")]
#[command(about = "Jungle (Dou Shou Qi) rules engine", long_about = None)]
struct Cli {
    /// 玩家 0 名字
    #[arg(long, global = true, default_value = "Player 0")]
    player0: String,

    /// 玩家 1 名字
    #[arg(long, global = true, default_value = "Player 1")]
    player1: String,

    /// 跳河路线上有棋子时禁止跳河
    #[arg(long, global = true)]
    block_jumps: bool,

    /// 从命名局面开始 (见 setups 命令)
    #[arg(long, global = true)]
    setup: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行走棋序列并打印棋盘
    Board {
        /// 走棋序列，如 "0:rat:2,1 1:rat:5,6"
        #[arg(long, default_value = "")]
        moves: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 列出某枚棋子的合法目标
    Moves {
        /// 玩家编号 (0 或 1)
        #[arg(long)]
        player: u8,

        /// 动物名，如 lion
        #[arg(long)]
        animal: String,

        /// 先执行的走棋序列
        #[arg(long, default_value = "")]
        moves: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 列出命名局面
    Setups,

    /// 启动 server 模式（stdin/stdout 通信）
    Server,
}

/// 开局参数，命令行和 server 的 new 命令共用
#[derive(Clone, Default, Serialize, Deserialize)]
struct GameOptions {
    #[serde(default)]
    player0: Option<String>,
    #[serde(default)]
    player1: Option<String>,
    #[serde(default)]
    block_jumps: Option<bool>,
    #[serde(default)]
    setup: Option<String>,
}

impl GameOptions {
    /// 未指定的字段取 fallback 的值
    fn or(self, fallback: &GameOptions) -> GameOptions {
        GameOptions {
            player0: self.player0.or_else(|| fallback.player0.clone()),
            player1: self.player1.or_else(|| fallback.player1.clone()),
            block_jumps: self.block_jumps.or(fallback.block_jumps),
            setup: self.setup.or_else(|| fallback.setup.clone()),
        }
    }

    fn new_board(&self) -> Result<Board, String> {
        let player0 = Arc::new(Player::new(self.player0.as_deref().unwrap_or("Player 0")));
        let player1 = Arc::new(Player::new(self.player1.as_deref().unwrap_or("Player 1")));

        let board = match &self.setup {
            None => Board::new(player0, player1),
            Some(name) => test_positions::by_name(name)
                .ok_or_else(|| format!("Unknown setup: {}", name))?
                .board_for(player0, player1)
                .map_err(|e| format!("Invalid setup {}: {}", name, e))?,
        };

        Ok(board.with_config(BoardConfig {
            jumps_blocked_by_pieces: self.block_jumps.unwrap_or(false),
        }))
    }
}

/// 走法条目
#[derive(Serialize, Deserialize)]
struct MoveEntry {
    animal: Animal,
    to: Position,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    player: Option<u8>,
    #[serde(default)]
    animal: Option<String>,
    /// 目标位置 "row,col"
    #[serde(default)]
    to: Option<String>,
    #[serde(flatten)]
    options: GameOptions,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    // move 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    captured: Option<Animal>,
    // moves 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<MoveEntry>>,
    // board 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<Vec<Vec<String>>>,
    // status 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    has_won: Option<[bool; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    fn success_move(result: Result<Option<Animal>, String>) -> Self {
        match result {
            Ok(captured) => Self {
                ok: true,
                accepted: Some(true),
                captured,
                ..Default::default()
            },
            Err(reason) => Self {
                ok: true,
                accepted: Some(false),
                reason: Some(reason),
                ..Default::default()
            },
        }
    }

    fn success_legal_moves(legal_moves: Vec<MoveEntry>) -> Self {
        Self {
            ok: true,
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn success_board(board: &Board) -> Self {
        Self {
            ok: true,
            board: Some(board.render()),
            ..Default::default()
        }
    }

    fn success_status(board: &Board) -> Self {
        Self {
            ok: true,
            has_won: Some(Side::ALL.map(|side| board.has_won(side))),
            winner: board.winner(),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

/// 解析单步走棋 "player:animal:row,col"
fn parse_move(token: &str) -> Result<(Side, Animal, Position), String> {
    let mut parts = token.splitn(3, ':');
    let (Some(player), Some(animal), Some(to)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("Invalid move '{}': expected player:animal:row,col", token));
    };
    let id = player
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("Invalid player '{}': {}", player, e))?;
    let side = Side::from_id(id).map_err(|e| e.to_string())?;
    Ok((side, animal.parse()?, to.parse()?))
}

/// 依次执行走棋序列，遇到被拒绝的一步即停止
fn apply_moves(board: &mut Board, moves: &str) -> Result<(), String> {
    for token in moves.split_whitespace() {
        let (side, animal, to) = parse_move(token)?;
        board
            .try_move(side, animal, to)
            .map_err(|e| format!("Move '{}' rejected: {}", token, e))?;
    }
    Ok(())
}

fn side_name(board: &Board, side: Side) -> String {
    format!("{} ({})", side, board.player(side).name())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn exit_with(err: String) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = GameOptions {
        player0: Some(cli.player0),
        player1: Some(cli.player1),
        block_jumps: Some(cli.block_jumps),
        setup: cli.setup,
    };

    match cli.command {
        Commands::Board { moves, json } => {
            let mut board = options.new_board().unwrap_or_else(|e| exit_with(e));
            apply_moves(&mut board, &moves).unwrap_or_else(|e| exit_with(e));

            if json {
                print_json(&ServerResponse {
                    board: Some(board.render()),
                    ..ServerResponse::success_status(&board)
                });
            } else {
                print!("{}", board);
                match board.winner() {
                    Some(side) => println!("\nWinner: {}", side_name(&board, side)),
                    None => println!("\nNo winner yet"),
                }
            }
        }

        Commands::Moves {
            player,
            animal,
            moves,
            json,
        } => {
            let side = Side::from_id(player).unwrap_or_else(|e| exit_with(e.to_string()));
            let animal: Animal = animal.parse().unwrap_or_else(|e| exit_with(e));
            let mut board = options.new_board().unwrap_or_else(|e| exit_with(e));
            apply_moves(&mut board, &moves).unwrap_or_else(|e| exit_with(e));

            let destinations: Vec<Position> = board.destinations(side, animal).collect();
            if json {
                print_json(&ServerResponse::success_legal_moves(
                    destinations
                        .into_iter()
                        .map(|to| MoveEntry { animal, to })
                        .collect(),
                ));
            } else {
                println!(
                    "Legal moves for {} of player {} ({}):",
                    animal,
                    side_name(&board, side),
                    destinations.len()
                );
                for to in &destinations {
                    println!("  {}", to);
                }
            }
        }

        Commands::Setups => {
            for setup in test_positions::ALL_SETUPS.iter() {
                println!("{}", setup.name);
            }
        }

        Commands::Server => {
            run_server(options);
        }
    }
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server(defaults: GameOptions) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut board = match defaults.new_board() {
        Ok(board) => board,
        Err(e) => exit_with(e),
    };

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        // 解析请求
        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                print_json(&ServerResponse::error(&format!("Invalid JSON: {}", e)));
                let _ = stdout.flush();
                continue;
            }
        };

        if request.cmd == "quit" {
            break;
        }

        let response = handle_request(&mut board, request, &defaults);
        print_json(&response);
        let _ = stdout.flush();
    }
}

/// 处理一条请求
fn handle_request(board: &mut Board, request: ServerRequest, defaults: &GameOptions) -> ServerResponse {
    match request.cmd.as_str() {
        "new" => match request.options.or(defaults).new_board() {
            Ok(fresh) => {
                *board = fresh;
                ServerResponse::success()
            }
            Err(e) => ServerResponse::error(&e),
        },
        "move" => handle_move_request(board, &request),
        "moves" => handle_moves_request(board, &request),
        "board" => ServerResponse::success_board(board),
        "status" => ServerResponse::success_status(board),
        _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
    }
}

fn request_side(request: &ServerRequest) -> Result<Side, String> {
    let id = request.player.ok_or("Missing field: player")?;
    Side::from_id(id).map_err(|e| e.to_string())
}

fn request_animal(request: &ServerRequest) -> Result<Option<Animal>, String> {
    request.animal.as_deref().map(str::parse::<Animal>).transpose()
}

/// 处理 move 命令：规则拒绝不是协议错误，返回 accepted=false
fn handle_move_request(board: &mut Board, request: &ServerRequest) -> ServerResponse {
    let parsed = (|| -> Result<(Side, Animal, Position), String> {
        let side = request_side(request)?;
        let animal = request_animal(request)?.ok_or("Missing field: animal")?;
        let to = request.to.as_deref().ok_or("Missing field: to")?.parse()?;
        Ok((side, animal, to))
    })();

    match parsed {
        Ok((side, animal, to)) => ServerResponse::success_move(
            board
                .try_move(side, animal, to)
                .map(|outcome| outcome.captured)
                .map_err(|e| e.to_string()),
        ),
        Err(e) => ServerResponse::error(&e),
    }
}

/// 处理 moves 命令：指定动物时只列该棋子
fn handle_moves_request(board: &Board, request: &ServerRequest) -> ServerResponse {
    let side = match request_side(request) {
        Ok(side) => side,
        Err(e) => return ServerResponse::error(&e),
    };

    let entries = match request_animal(request) {
        Ok(Some(animal)) => board
            .destinations(side, animal)
            .map(|to| MoveEntry { animal, to })
            .collect(),
        Ok(None) => board
            .legal_moves(side)
            .into_iter()
            .map(|(animal, to)| MoveEntry { animal, to })
            .collect(),
        Err(e) => return ServerResponse::error(&e),
    };

    ServerResponse::success_legal_moves(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> ServerRequest {
        serde_json::from_str(json).unwrap()
    }

    fn fresh() -> Board {
        GameOptions::default().new_board().unwrap()
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(
            parse_move("0:rat:2,1"),
            Ok((Side::First, Animal::Rat, Position::new(2, 1)))
        );
        assert_eq!(
            parse_move("1:Lion:(8, 5)"),
            Ok((Side::Second, Animal::Lion, Position::new(8, 5)))
        );
        assert!(parse_move("2:rat:2,1").is_err());
        assert!(parse_move("0:unicorn:2,1").is_err());
        assert!(parse_move("0:rat").is_err());
    }

    #[test]
    fn test_apply_moves_stops_on_rejection() {
        let mut board = fresh();
        assert!(apply_moves(&mut board, "0:rat:2,1 1:rat:5,6").is_ok());
        assert_eq!(board.position_of(Side::Second, Animal::Rat), Some(Position::new(5, 6)));

        let err = apply_moves(&mut board, "0:rat:2,2 0:lion:0,1").unwrap_err();
        assert!(err.contains("0:rat:2,2"));
        assert_eq!(board.position_of(Side::First, Animal::Lion), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_new_board_options() {
        let options = GameOptions {
            player0: Some("Bob".to_string()),
            setup: Some("jump-lanes".to_string()),
            block_jumps: Some(true),
            ..Default::default()
        };
        let board = options.new_board().unwrap();
        assert_eq!(board.player(Side::First).name(), "Bob");
        assert_eq!(board.player(Side::Second).name(), "Player 1");
        assert!(board.config().jumps_blocked_by_pieces);
        assert_eq!(board.destinations(Side::First, Animal::Lion).count(), 3);

        let unknown = GameOptions {
            setup: Some("nowhere".to_string()),
            ..Default::default()
        };
        assert!(unknown.new_board().is_err());
    }

    #[test]
    fn test_server_move_and_status() {
        let defaults = GameOptions::default();
        let mut board = fresh();

        let response = handle_request(
            &mut board,
            request(r#"{"cmd": "move", "player": 0, "animal": "rat", "to": "2,1"}"#),
            &defaults,
        );
        assert!(response.ok);
        assert_eq!(response.accepted, Some(true));

        let response = handle_request(
            &mut board,
            request(r#"{"cmd": "move", "player": 0, "animal": "rat", "to": "2,3"}"#),
            &defaults,
        );
        assert!(response.ok);
        assert_eq!(response.accepted, Some(false));
        assert!(response.reason.is_some());

        let response = handle_request(&mut board, request(r#"{"cmd": "status"}"#), &defaults);
        assert_eq!(response.has_won, Some([false, false]));
        assert_eq!(response.winner, None);

        let response = handle_request(&mut board, request(r#"{"cmd": "board"}"#), &defaults);
        assert_eq!(response.board.unwrap()[2][1], "Player 0: RAT");
    }

    #[test]
    fn test_server_moves_and_new() {
        let defaults = GameOptions::default();
        let mut board = fresh();

        let response = handle_request(
            &mut board,
            request(r#"{"cmd": "moves", "player": 0, "animal": "rat"}"#),
            &defaults,
        );
        assert_eq!(response.legal_moves.map(|m| m.len()), Some(3));

        let response = handle_request(
            &mut board,
            request(r#"{"cmd": "new", "setup": "cave-run"}"#),
            &defaults,
        );
        assert!(response.ok);
        handle_request(
            &mut board,
            request(r#"{"cmd": "move", "player": 0, "animal": "rat", "to": "8,3"}"#),
            &defaults,
        );
        let response = handle_request(&mut board, request(r#"{"cmd": "status"}"#), &defaults);
        assert_eq!(response.winner, Some(Side::First));
    }

    #[test]
    fn test_server_new_overrides_block_jumps() {
        let defaults = GameOptions {
            block_jumps: Some(true),
            ..Default::default()
        };
        let mut board = defaults.new_board().unwrap();
        assert!(board.config().jumps_blocked_by_pieces);

        handle_request(
            &mut board,
            request(r#"{"cmd": "new", "block_jumps": false}"#),
            &defaults,
        );
        assert!(!board.config().jumps_blocked_by_pieces);

        handle_request(&mut board, request(r#"{"cmd": "new"}"#), &defaults);
        assert!(board.config().jumps_blocked_by_pieces);
    }

    #[test]
    fn test_server_errors() {
        let defaults = GameOptions::default();
        let mut board = fresh();

        let response = handle_request(&mut board, request(r#"{"cmd": "fly"}"#), &defaults);
        assert!(!response.ok);

        let response = handle_request(
            &mut board,
            request(r#"{"cmd": "move", "player": 3, "animal": "rat", "to": "2,1"}"#),
            &defaults,
        );
        assert!(!response.ok);

        let response = handle_request(
            &mut board,
            request(r#"{"cmd": "moves", "player": 0, "animal": "unicorn"}"#),
            &defaults,
        );
        assert!(!response.ok);
    }
}
