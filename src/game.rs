//! Human-versus-engine game session
//!
//! Holds the authoritative board and turn order. The engine side only ever
//! sees copies of this board.

use std::fmt;

use crate::board::{Board, Pos, Stone};
use crate::config::GameConfig;
use crate::error::BoardError;
use crate::rules::{find_run, has_run_at};

/// Final result of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// `None` for a draw
    pub winner: Option<Stone>,
    /// Cells of the winning run
    pub winning_line: Option<Vec<Pos>>,
}

/// Reasons a move was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    GameOver,
    NotYourTurn,
    Illegal(BoardError),
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::GameOver => write!(f, "game is over"),
            MoveRejection::NotYourTurn => write!(f, "not your turn"),
            MoveRejection::Illegal(e) => write!(f, "{}", e),
        }
    }
}

/// Main game state
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    human: Stone,
    current_turn: Stone,
    last_moves: [Option<Pos>; 2],
    move_history: Vec<(Pos, Stone)>,
    result: Option<GameResult>,
}

impl GameSession {
    /// New game on `board`; `Stone::Black` moves first, so a board that
    /// already holds stones resumes with the side whose turn it is.
    pub fn new(board: Board, human: Stone) -> Self {
        let current_turn = board.side_to_move();
        Self {
            board,
            human,
            current_turn,
            last_moves: [None, None],
            move_history: Vec::new(),
            result: None,
        }
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, BoardError> {
        let human = if config.human_first {
            Stone::Black
        } else {
            Stone::White
        };
        Ok(Self::new(config.board()?, human))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn human(&self) -> Stone {
        self.human
    }

    #[inline]
    pub fn ai(&self) -> Stone {
        self.human.opponent()
    }

    #[inline]
    pub fn current_turn(&self) -> Stone {
        self.current_turn
    }

    pub fn is_human_turn(&self) -> bool {
        self.result.is_none() && self.current_turn == self.human
    }

    pub fn is_ai_turn(&self) -> bool {
        self.result.is_none() && self.current_turn != self.human
    }

    /// Last move played by `stone`
    pub fn last_move(&self, stone: Stone) -> Option<Pos> {
        self.last_moves[slot(stone)]
    }

    /// The side that moved last and its move, for handing to the engine
    pub fn last_played(&self) -> Option<(Stone, Pos)> {
        self.move_history.last().map(|&(pos, stone)| (stone, pos))
    }

    pub fn move_history(&self) -> &[(Pos, Stone)] {
        &self.move_history
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// Attempt a move for the human player.
    pub fn try_human_move(&mut self, pos: Pos) -> Result<(), MoveRejection> {
        if self.result.is_some() {
            return Err(MoveRejection::GameOver);
        }
        if self.current_turn != self.human {
            return Err(MoveRejection::NotYourTurn);
        }
        self.execute_move(pos)
    }

    /// Play the engine's move.
    pub fn apply_ai_move(&mut self, pos: Pos) -> Result<(), MoveRejection> {
        if self.result.is_some() {
            return Err(MoveRejection::GameOver);
        }
        if self.current_turn == self.human {
            return Err(MoveRejection::NotYourTurn);
        }
        self.execute_move(pos)
    }

    fn execute_move(&mut self, pos: Pos) -> Result<(), MoveRejection> {
        let stone = self.current_turn;
        self.board
            .apply_move(pos, stone)
            .map_err(MoveRejection::Illegal)?;

        self.move_history.push((pos, stone));
        self.last_moves[slot(stone)] = Some(pos);

        if has_run_at(&self.board, pos, stone) {
            self.result = Some(GameResult {
                winner: Some(stone),
                winning_line: find_run(&self.board, stone),
            });
        } else if self.board.is_full() {
            self.result = Some(GameResult {
                winner: None,
                winning_line: None,
            });
        } else {
            self.current_turn = stone.opponent();
        }
        Ok(())
    }
}

#[inline]
fn slot(stone: Stone) -> usize {
    match stone {
        Stone::Black => 0,
        Stone::White => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(human: Stone) -> GameSession {
        GameSession::new(Board::square(5, 4).unwrap(), human)
    }

    #[test]
    fn test_human_first() {
        let mut game = session(Stone::Black);
        assert!(game.is_human_turn());
        assert_eq!(game.ai(), Stone::White);

        game.try_human_move(Pos::new(2, 2)).unwrap();
        assert!(game.is_ai_turn());
        assert_eq!(game.last_move(Stone::Black), Some(Pos::new(2, 2)));
        assert_eq!(game.last_played(), Some((Stone::Black, Pos::new(2, 2))));
        assert_eq!(
            game.try_human_move(Pos::new(0, 0)),
            Err(MoveRejection::NotYourTurn)
        );
    }

    #[test]
    fn test_ai_first() {
        let mut game = session(Stone::White);
        assert!(game.is_ai_turn());
        assert_eq!(
            game.try_human_move(Pos::new(0, 0)),
            Err(MoveRejection::NotYourTurn)
        );
        game.apply_ai_move(Pos::new(1, 1)).unwrap();
        assert!(game.is_human_turn());
        assert_eq!(
            game.apply_ai_move(Pos::new(1, 2)),
            Err(MoveRejection::NotYourTurn)
        );
    }

    #[test]
    fn test_resumes_with_side_to_move() {
        let board = Board::from_text("X....\n.....\n.....\n.....\n.....", 4).unwrap();
        let game = GameSession::new(board, Stone::White);
        assert_eq!(game.current_turn(), Stone::White);
        assert!(game.is_human_turn());

        let board = Board::from_text("X....\n.O...\n.....\n.....\n.....", 4).unwrap();
        let game = GameSession::new(board, Stone::White);
        assert_eq!(game.current_turn(), Stone::Black);
        assert!(game.is_ai_turn());
    }

    #[test]
    fn test_illegal_moves_keep_turn() {
        let mut game = session(Stone::Black);
        game.try_human_move(Pos::new(0, 0)).unwrap();
        game.apply_ai_move(Pos::new(1, 1)).unwrap();

        assert_eq!(
            game.try_human_move(Pos::new(1, 1)),
            Err(MoveRejection::Illegal(BoardError::Occupied { row: 1, col: 1 }))
        );
        assert!(matches!(
            game.try_human_move(Pos::new(9, 0)),
            Err(MoveRejection::Illegal(BoardError::OutOfBounds { .. }))
        ));
        assert!(game.is_human_turn());
        assert_eq!(game.move_history().len(), 2);
    }

    #[test]
    fn test_win_ends_game() {
        let mut game = session(Stone::Black);
        for c in 0..3 {
            game.try_human_move(Pos::new(0, c)).unwrap();
            game.apply_ai_move(Pos::new(4, c)).unwrap();
        }
        game.try_human_move(Pos::new(0, 3)).unwrap();

        let result = game.result().unwrap();
        assert_eq!(result.winner, Some(Stone::Black));
        assert_eq!(
            result.winning_line,
            Some((0..4).map(|c| Pos::new(0, c)).collect())
        );
        assert!(!game.is_human_turn());
        assert!(!game.is_ai_turn());
        assert_eq!(
            game.apply_ai_move(Pos::new(4, 3)),
            Err(MoveRejection::GameOver)
        );
    }

    #[test]
    fn test_draw_on_full_board() {
        let mut game = GameSession::new(Board::new(1, 3, 3).unwrap(), Stone::Black);
        game.try_human_move(Pos::new(0, 0)).unwrap();
        game.apply_ai_move(Pos::new(0, 1)).unwrap();
        game.try_human_move(Pos::new(0, 2)).unwrap();
        let result = game.result().unwrap();
        assert_eq!(result.winner, None);
        assert_eq!(result.winning_line, None);
    }

    #[test]
    fn test_from_config() {
        let config = GameConfig {
            rows: 6,
            cols: 7,
            n_in_row: 4,
            human_first: false,
        };
        let game = GameSession::from_config(&config).unwrap();
        assert_eq!(game.human(), Stone::White);
        assert_eq!(game.board().cols(), 7);
        assert!(game.is_ai_turn());
    }
}
