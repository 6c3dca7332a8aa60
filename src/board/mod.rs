use serde::{Deserialize, Serialize};
use std::fmt;

pub mod rules;

pub const BOARD_LEN: usize = 9;
pub const SUB_LEN: usize = 3;

/// One square of the 9x9 grid. Also doubles as a sub-board result and as a
/// player identity; a drawn sub-board reads as `Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    /// The player who moves after `self`. `Empty` is not a player and maps
    /// to itself.
    pub fn other(self) -> Cell {
        match self {
            Cell::X => Cell::O,
            Cell::O => Cell::X,
            Cell::Empty => Cell::Empty,
        }
    }

    pub fn is_piece(self) -> bool {
        self != Cell::Empty
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        };
        write!(f, "{c}")
    }
}

/// A target square, row-major in [0,8]x[0,8].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub row: u8,
    pub col: u8,
}

impl Move {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row: row as u8,
            col: col as u8,
        }
    }

    #[inline]
    pub fn coords(self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }

    /// The sub-board this square belongs to.
    #[inline]
    pub fn parent_sub_board(self) -> (usize, usize) {
        (self.row as usize / 3, self.col as usize / 3)
    }

    /// The sub-board this square sends the next player to.
    #[inline]
    pub fn sends_to(self) -> (usize, usize) {
        (self.row as usize % 3, self.col as usize % 3)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub type Board = [[Cell; BOARD_LEN]; BOARD_LEN];
pub type SubBoards = [[Cell; SUB_LEN]; SUB_LEN];

/// The full game position: the 9x9 grid, the derived 3x3 sub-board results,
/// the last committed move, whose turn it is, and the committed move history
/// used for undo.
///
/// The root state is owned by the driving layer and mutated only through
/// `commit`/`undo`/`reset`. Search branches clone it and mutate their copy
/// directly; clones never re-enter the root lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub sub_boards: SubBoards,
    pub previous_move: Option<Move>,
    pub turn: Cell,
    pub history: Vec<(Cell, Move)>,
}

impl GameState {
    pub fn new(first_player: Cell) -> Self {
        Self {
            board: [[Cell::Empty; BOARD_LEN]; BOARD_LEN],
            sub_boards: [[Cell::Empty; SUB_LEN]; SUB_LEN],
            previous_move: None,
            turn: first_player,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.board[row][col]
    }

    /// Commits the side-to-move's piece at `mv` if the move is legal,
    /// recording it for undo and flipping the turn. Returns false and leaves
    /// the state untouched on an illegal move.
    pub fn commit(&mut self, mv: Move) -> bool {
        let (row, col) = mv.coords();
        if !rules::is_valid(row, col, self) {
            return false;
        }
        self.board[row][col] = self.turn;
        self.history.push((self.turn, mv));
        self.previous_move = Some(mv);
        self.turn = self.turn.other();
        rules::recompute_sub_boards(self);
        true
    }

    /// Takes back one full round: the latest reply and the move before it.
    /// With fewer than two committed moves this is a no-op. Two pops
    /// preserve turn parity, so `turn` is left as-is.
    pub fn undo(&mut self) {
        if self.history.len() < 2 {
            return;
        }
        for _ in 0..2 {
            if let Some((_, mv)) = self.history.pop() {
                let (row, col) = mv.coords();
                self.board[row][col] = Cell::Empty;
            }
        }
        self.previous_move = self.history.last().map(|&(_, mv)| mv);
        rules::recompute_sub_boards(self);
    }

    /// Clears the grids and the history; `previous_move = None` makes every
    /// square legal again.
    pub fn reset(&mut self, first_player: Cell) {
        self.board = [[Cell::Empty; BOARD_LEN]; BOARD_LEN];
        self.sub_boards = [[Cell::Empty; SUB_LEN]; SUB_LEN];
        self.previous_move = None;
        self.turn = first_player;
        self.history.clear();
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_LEN {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "---------+---------+---------")?;
            }
            for col in 0..BOARD_LEN {
                if col > 0 && col % 3 == 0 {
                    write!(f, "|")?;
                }
                write!(f, " {} ", self.board[row][col])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
