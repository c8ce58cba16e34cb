//! 5x5 board, marks and line detection

use serde::{Deserialize, Serialize};

pub const SIDE: usize = 5;
pub const CELLS: usize = SIDE * SIDE;

/// Every line that wins the round: rows, columns and both main diagonals
/// need five marks, the four short diagonals need four
pub const WIN_LINES: [&[usize]; 16] = [
    // === Rows ===
    &[0, 1, 2, 3, 4],
    &[5, 6, 7, 8, 9],
    &[10, 11, 12, 13, 14],
    &[15, 16, 17, 18, 19],
    &[20, 21, 22, 23, 24],
    // === Columns ===
    &[0, 5, 10, 15, 20],
    &[1, 6, 11, 16, 21],
    &[2, 7, 12, 17, 22],
    &[3, 8, 13, 18, 23],
    &[4, 9, 14, 19, 24],
    // === Diagonals ===
    &[0, 6, 12, 18, 24],
    &[4, 8, 12, 16, 20],
    &[1, 7, 13, 19],
    &[5, 11, 17, 23],
    &[3, 7, 11, 15],
    &[9, 13, 17, 21],
];

/// `WIN_LINES` as bitmasks over cell indexes
pub const LINE_MASKS: [u32; 16] = line_masks();

const fn line_masks() -> [u32; 16] {
    let mut masks = [0u32; 16];
    let mut i = 0;
    while i < WIN_LINES.len() {
        let line = WIN_LINES[i];
        let mut j = 0;
        while j < line.len() {
            masks[i] |= 1 << line[j];
            j += 1;
        }
        i += 1;
    }
    masks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// X, always moves first
    Human,
    /// O
    Machine,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::Human => Mark::Machine,
            Mark::Machine => Mark::Human,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Mark::Human => 'X',
            Mark::Machine => 'O',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won(Mark),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [None; CELLS],
        }
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark at `index`, `None` when empty or out of range
    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_empty_cell(&self, index: usize) -> bool {
        index < CELLS && self.cells[index].is_none()
    }

    /// Overwrites unconditionally; callers check emptiness
    pub fn set(&mut self, index: usize, mark: Option<Mark>) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = mark;
        }
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CELLS).filter(|&i| self.cells[i].is_none())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn cells(&self) -> &[Option<Mark>; CELLS] {
        &self.cells
    }

    /// Occupied cells as `(human, machine)` bitmasks, bit `i` for cell `i`
    pub fn masks(&self) -> (u32, u32) {
        let mut human = 0;
        let mut machine = 0;
        for (i, cell) in self.cells.iter().enumerate() {
            match cell {
                Some(Mark::Human) => human |= 1 << i,
                Some(Mark::Machine) => machine |= 1 << i,
                None => {}
            }
        }
        (human, machine)
    }
}

/// Completed line owner, a draw on a full board, or `None` while play continues
pub fn winner(board: &Board) -> Option<Outcome> {
    for line in WIN_LINES {
        let Some(mark) = board.get(line[0]) else {
            continue;
        };
        if line.iter().all(|&i| board.get(i) == Some(mark)) {
            return Some(Outcome::Won(mark));
        }
    }
    if board.is_full() {
        Some(Outcome::Draw)
    } else {
        None
    }
}
