//! Core domain types for the mirrored tic-tac-toe board.

use crate::error::{BoardError, BoardErrorKind};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A player's mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Symbol {
    /// X (always moves first).
    X,
    /// O (moves second).
    O,
}

impl Symbol {
    /// Returns the opposing symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    /// Whether this symbol opens the game.
    pub fn moves_first(self) -> bool {
        self == Symbol::X
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a symbol.
    Occupied(Symbol),
}

impl Square {
    /// Returns the occupying symbol, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Square::Empty => None,
            Square::Occupied(symbol) => Some(symbol),
        }
    }

    /// Checks if the square is empty.
    pub fn is_empty(self) -> bool {
        matches!(self, Square::Empty)
    }
}

impl std::str::FromStr for Square {
    type Err = BoardError;

    /// Parses a wire cell value; blank strings are empty squares.
    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Square::Empty),
            mark => mark.parse::<Symbol>().map(Square::Occupied).map_err(|_| {
                BoardError::new(BoardErrorKind::UnknownSymbol(mark.to_string()))
            }),
        }
    }
}

/// A cell coordinate on the 3x3 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("({row}, {col})")]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Creates a cell, rejecting coordinates off the board.
    #[track_caller]
    pub fn new(row: u8, col: u8) -> Result<Self, BoardError> {
        if row >= Board::SIZE || col >= Board::SIZE {
            return Err(BoardError::new(BoardErrorKind::OutOfBounds { row, col }));
        }
        Ok(Self { row, col })
    }

    /// Creates a cell from a row-major index (0-8).
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Board::CELLS {
            return None;
        }
        let size = Board::SIZE as usize;
        Some(Self {
            row: (index / size) as u8,
            col: (index % size) as u8,
        })
    }

    /// Row (0-2).
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column (0-2).
    pub fn col(self) -> u8 {
        self.col
    }

    /// Row-major index (0-8).
    pub fn index(self) -> usize {
        self.row as usize * Board::SIZE as usize + self.col as usize
    }

    /// All nine cells in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..Board::CELLS).filter_map(Cell::from_index)
    }
}

/// 3x3 board as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Side length of the board.
    pub const SIZE: u8 = 3;

    /// Number of cells on the board.
    pub const CELLS: usize = 9;

    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from three rows of three squares.
    #[instrument(skip(rows), fields(row_count = rows.len()))]
    #[track_caller]
    pub fn from_rows(rows: Vec<Vec<Square>>) -> Result<Self, BoardError> {
        if rows.len() != Self::SIZE as usize {
            return Err(BoardError::new(BoardErrorKind::Shape {
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
            }));
        }

        let mut board = Self::new();
        for (row, squares) in rows.into_iter().enumerate() {
            if squares.len() != Self::SIZE as usize {
                return Err(BoardError::new(BoardErrorKind::Shape {
                    rows: Self::SIZE as usize,
                    cols: squares.len(),
                }));
            }
            for (col, square) in squares.into_iter().enumerate() {
                board.squares[row * Self::SIZE as usize + col] = square;
            }
        }
        Ok(board)
    }

    /// Returns a copy of this board with `cell` set to `square`.
    pub fn with(&self, cell: Cell, square: Square) -> Self {
        let mut next = self.clone();
        next.squares[cell.index()] = square;
        next
    }

    /// Gets the square at the given cell.
    pub fn get(&self, cell: Cell) -> Square {
        self.squares[cell.index()]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.get(cell).is_empty()
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| !s.is_empty()).count()
    }

    /// Number of squares held by `symbol`.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.squares
            .iter()
            .filter(|s| s.symbol() == Some(symbol))
            .count()
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        Cell::all().filter(|cell| self.is_empty(*cell)).collect()
    }

    /// Cells that are empty here but occupied in `later`.
    pub fn added_in(&self, later: &Board) -> Vec<Cell> {
        Cell::all()
            .filter(|cell| self.is_empty(*cell) && !later.is_empty(*cell))
            .collect()
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..Self::SIZE as usize {
            for col in 0..Self::SIZE as usize {
                let pos = row * Self::SIZE as usize + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => ".".to_string(),
                    Square::Occupied(symbol) => symbol.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}
