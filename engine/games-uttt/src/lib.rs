//! Ultimate Tic-Tac-Toe game state
//!
//! The board is a 3×3 grid of 3×3 sub-boards, 81 cells total, addressed by
//! flat row-major indices in `[0, 81)`. Claiming three cells in a row wins a
//! sub-board; winning three sub-boards in a row wins the game. Each move is
//! normally confined to the sub-board matching the previous move's position
//! within its own sub-board; if that sub-board is already decided, the player
//! may move anywhere open instead.
//!
//! [`State`] is an immutable value: applying a move produces a fresh state
//! with the outcome and legal-move set re-derived, so a constructed state is
//! always internally consistent. It implements the `engine_core::GameState`
//! contract consumed by the `mcts` search crate and additionally provides
//! D4 symmetry expansion for training-data augmentation and a plain-text
//! save/load format for positions.

use std::fmt;

use engine_core::{GameState, IllegalMoveError, Outcome, Player};

mod symmetry;
pub mod persist;


pub use persist::StateFileError;
pub use symmetry::InvalidSizeError;

/// Cells per board side.
pub const BOARD_SIDE: usize = 9;
/// Total cells, which is also the size of the move-index space.
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;
/// Sub-boards per side of the meta grid.
pub const SUB_SIDE: usize = 3;
/// Total sub-boards.
pub const SUB_COUNT: usize = SUB_SIDE * SUB_SIDE;

/// Canonical transposition key: the 81 cell values followed by the previous
/// move index (`0xFF` when there is none).
pub type StateKey = [u8; CELL_COUNT + 1];

/// Ownership of one cell or one sub-board.
///
/// The discriminants are the on-disk and oracle-facing encoding: 0 = X,
/// 1 = O, 2 = open (empty cell / undecided sub-board), 3 = tied. Cells never
/// hold `Tied`; it only appears in the sub-board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Slot {
    X = 0,
    O = 1,
    Open = 2,
    Tied = 3,
}

impl Slot {
    fn from_player(player: Player) -> Slot {
        match player {
            Player::First => Slot::X,
            Player::Second => Slot::O,
        }
    }

    pub(crate) fn from_cell_value(value: i64) -> Option<Slot> {
        match value {
            0 => Some(Slot::X),
            1 => Some(Slot::O),
            2 => Some(Slot::Open),
            _ => None,
        }
    }

    pub(crate) fn from_status_value(value: i64) -> Option<Slot> {
        match value {
            3 => Some(Slot::Tied),
            v => Slot::from_cell_value(v),
        }
    }
}

/// One Ultimate Tic-Tac-Toe position.
///
/// Immutable once constructed; [`State::apply_move`] returns a successor
/// instead of mutating. `outcome` and `legal_moves` are derived at
/// construction and therefore always agree with the grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    cells: [Slot; CELL_COUNT],
    sub_boards: [Slot; SUB_COUNT],
    prev_move: Option<u8>,
    next_player: Player,
    outcome: Outcome,
    legal_moves: Vec<usize>,
}

impl State {
    /// The initial position: empty board, X to move, no move constraint.
    pub fn new() -> Self {
        Self::from_grids(
            [Slot::Open; CELL_COUNT],
            [Slot::Open; SUB_COUNT],
            None,
            Player::First,
        )
    }

    /// Build a position from raw grids, re-deriving the outcome and the
    /// legal-move set. The grids are trusted; feeding a sub-board grid that
    /// disagrees with the cells produces a state that plays by the grid.
    pub fn from_grids(
        cells: [Slot; CELL_COUNT],
        sub_boards: [Slot; SUB_COUNT],
        prev_move: Option<u8>,
        next_player: Player,
    ) -> Self {
        let outcome = match find_winner(&sub_boards) {
            Slot::X => Outcome::FirstWins,
            Slot::O => Outcome::SecondWins,
            Slot::Tied => Outcome::Draw,
            Slot::Open => Outcome::InProgress,
        };
        let legal_moves = if outcome == Outcome::InProgress {
            generate_legal_moves(&cells, &sub_boards, prev_move)
        } else {
            Vec::new()
        };
        Self {
            cells,
            sub_boards,
            prev_move,
            next_player,
            outcome,
            legal_moves,
        }
    }

    /// Successor position after the current player claims cell `mv`.
    ///
    /// The owning sub-board's status is recomputed (win, tie, or still
    /// open), the move constraint moves to `mv`'s position within its
    /// sub-board, and the turn passes.
    pub fn apply_move(&self, mv: usize) -> Result<State, IllegalMoveError> {
        if !self.is_legal(mv) {
            return Err(IllegalMoveError { mv });
        }

        let mut cells = self.cells;
        cells[mv] = Slot::from_player(self.next_player);

        let mut sub_boards = self.sub_boards;
        let sub = owning_sub(mv);
        sub_boards[sub] = find_winner(&sub_grid(&cells, sub));

        Ok(State::from_grids(
            cells,
            sub_boards,
            Some(mv as u8),
            self.next_player.opponent(),
        ))
    }

    /// Membership test against the current legal-move set.
    pub fn is_legal(&self, mv: usize) -> bool {
        self.legal_moves.contains(&mv)
    }

    /// Legal moves in ascending cell-index order; empty once the game ends.
    pub fn legal_moves(&self) -> &[usize] {
        &self.legal_moves
    }

    /// Outcome of the position.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Player to move.
    pub fn next_player(&self) -> Player {
        self.next_player
    }

    /// The previous move, if any.
    pub fn prev_move(&self) -> Option<usize> {
        self.prev_move.map(usize::from)
    }

    /// Ownership of a single cell.
    pub fn cell(&self, idx: usize) -> Slot {
        self.cells[idx]
    }

    /// Status of a single sub-board.
    pub fn sub_board(&self, idx: usize) -> Slot {
        self.sub_boards[idx]
    }

    /// Canonical transposition key.
    ///
    /// The player to move is deliberately not part of the key; it is always
    /// determined by the path that reached the position, and the search's
    /// cached statistics rely on that projection.
    pub fn key(&self) -> StateKey {
        let mut key = [0u8; CELL_COUNT + 1];
        for (byte, cell) in key.iter_mut().zip(self.cells.iter()) {
            *byte = *cell as u8;
        }
        key[CELL_COUNT] = self.prev_move.unwrap_or(u8::MAX);
        key
    }

    /// Flat oracle encoding: one `f32` per cell, row-major, 0 = X, 1 = O,
    /// 2 = empty.
    pub fn encode(&self) -> Vec<f32> {
        self.cells.iter().map(|&cell| cell as u8 as f32).collect()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for State {
    type Key = StateKey;

    fn move_space(&self) -> usize {
        CELL_COUNT
    }

    fn legal_moves(&self) -> &[usize] {
        self.legal_moves()
    }

    fn is_legal(&self, mv: usize) -> bool {
        self.is_legal(mv)
    }

    fn apply_move(&self, mv: usize) -> Result<Self, IllegalMoveError> {
        self.apply_move(mv)
    }

    fn outcome(&self) -> Outcome {
        self.outcome()
    }

    fn next_player(&self) -> Player {
        self.next_player()
    }

    fn key(&self) -> Self::Key {
        self.key()
    }

    fn encode(&self) -> Vec<f32> {
        self.encode()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIDE {
            for col in 0..BOARD_SIDE {
                let glyph = match self.cells[row * BOARD_SIDE + col] {
                    Slot::X => 'X',
                    Slot::O => 'O',
                    _ => '.',
                };
                write!(f, "{glyph}")?;
                if col % SUB_SIDE == 2 && col != BOARD_SIDE - 1 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
            if row % SUB_SIDE == 2 && row != BOARD_SIDE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Index of the sub-board containing cell `mv`.
#[inline]
fn owning_sub(mv: usize) -> usize {
    (mv / BOARD_SIDE / SUB_SIDE) * SUB_SIDE + (mv % BOARD_SIDE) / SUB_SIDE
}

/// Index of the sub-board a previous move at `prev` sends the opponent to:
/// the move's position within its own sub-board, read as a meta-grid index.
#[inline]
fn forced_sub(prev: usize) -> usize {
    ((prev / BOARD_SIDE) % SUB_SIDE) * SUB_SIDE + prev % SUB_SIDE
}

/// Extract one sub-board's cells as a row-major 3×3 grid.
fn sub_grid(cells: &[Slot; CELL_COUNT], sub: usize) -> [Slot; SUB_COUNT] {
    let top = (sub / SUB_SIDE) * SUB_SIDE;
    let left = (sub % SUB_SIDE) * SUB_SIDE;
    let mut grid = [Slot::Open; SUB_COUNT];
    for r in 0..SUB_SIDE {
        for c in 0..SUB_SIDE {
            grid[r * SUB_SIDE + c] = cells[(top + r) * BOARD_SIDE + left + c];
        }
    }
    grid
}

fn generate_legal_moves(
    cells: &[Slot; CELL_COUNT],
    sub_boards: &[Slot; SUB_COUNT],
    prev_move: Option<u8>,
) -> Vec<usize> {
    if let Some(prev) = prev_move {
        let target = forced_sub(prev as usize);
        if sub_boards[target] == Slot::Open {
            return (0..CELL_COUNT)
                .filter(|&mv| owning_sub(mv) == target && cells[mv] == Slot::Open)
                .collect();
        }
    }
    // Free move: every empty cell of every open sub-board.
    (0..CELL_COUNT)
        .filter(|&mv| sub_boards[owning_sub(mv)] == Slot::Open && cells[mv] == Slot::Open)
        .collect()
}

/// Resolve a 3×3 grid: `X`/`O` for a completed row, column, or diagonal,
/// `Tied` if every entry is decided with no winner, `Open` otherwise.
///
/// Used at both scales. For a sub-board the entries are cell values; for the
/// meta grid they are sub-board statuses, where `Tied` entries block lines
/// without counting toward either player.
fn find_winner(grid: &[Slot; SUB_COUNT]) -> Slot {
    // Running sums for the three columns and both diagonals; rows are
    // checked as they are scanned.
    let mut sums = [0i32; 5];
    let mut tied = true;

    for r in 0..SUB_SIDE {
        let mut row_sum = 0i32;
        for c in 0..SUB_SIDE {
            let step = match grid[r * SUB_SIDE + c] {
                Slot::X => 1,
                Slot::O => -1,
                Slot::Open => {
                    tied = false;
                    0
                }
                Slot::Tied => 0,
            };
            row_sum += step;
            sums[c] += step;
            if r == c {
                sums[3] += step;
            }
            if r + c == SUB_SIDE - 1 {
                sums[4] += step;
            }
        }
        if row_sum == 3 {
            return Slot::X;
        }
        if row_sum == -3 {
            return Slot::O;
        }
    }

    if sums.contains(&3) {
        Slot::X
    } else if sums.contains(&-3) {
        Slot::O
    } else if tied {
        Slot::Tied
    } else {
        Slot::Open
    }
}
