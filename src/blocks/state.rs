//! Falling-block puzzle state types

use serde::{Deserialize, Serialize};

use crate::tuning::BlocksTuning;

/// Cell offsets `(column, row)` from a piece's top-left corner
pub type Cells = [(i32, i32); 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

const I_TURNS: [Cells; 2] = [
    [(0, 0), (1, 0), (2, 0), (3, 0)],
    [(0, 0), (0, 1), (0, 2), (0, 3)],
];
const O_TURNS: [Cells; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];
const T_TURNS: [Cells; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (0, 1), (1, 1), (0, 2)],
    [(0, 0), (1, 0), (2, 0), (1, 1)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];
const S_TURNS: [Cells; 2] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];
const Z_TURNS: [Cells; 2] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];
const J_TURNS: [Cells; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (1, 0), (0, 1), (0, 2)],
    [(0, 0), (1, 0), (2, 0), (2, 1)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];
const L_TURNS: [Cells; 4] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (0, 1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (2, 0), (0, 1)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Rotation states in clockwise order
    pub fn rotations(self) -> &'static [Cells] {
        match self {
            PieceKind::I => &I_TURNS,
            PieceKind::O => &O_TURNS,
            PieceKind::T => &T_TURNS,
            PieceKind::S => &S_TURNS,
            PieceKind::Z => &Z_TURNS,
            PieceKind::J => &J_TURNS,
            PieceKind::L => &L_TURNS,
        }
    }

    /// Columns spanned by the spawn rotation
    pub fn spawn_width(self) -> i32 {
        self.rotations()[0].iter().map(|&(x, _)| x).max().unwrap_or(0) + 1
    }
}

/// The falling piece: kind, rotation state and top-left position in the well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: usize,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// Centered at the top of a well `well_width` columns wide
    pub fn spawn(kind: PieceKind, well_width: usize) -> Self {
        Self {
            kind,
            rotation: 0,
            x: (well_width as i32 - kind.spawn_width()) / 2,
            y: 0,
        }
    }

    /// Occupied well coordinates `(column, row)`
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let turns = self.kind.rotations();
        turns[self.rotation % turns.len()]
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Next rotation state in place; no wall kicks
    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % self.kind.rotations().len(),
            ..*self
        }
    }
}

/// Settled blocks, row 0 at the top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Well {
    width: usize,
    rows: Vec<Vec<bool>>,
}

impl Well {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![vec![false; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Whether a settled block sits at `(x, y)`; out of range reads empty
    pub fn is_filled(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, x: usize, y: usize, filled: bool) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = filled;
        }
    }

    /// Inside the side walls and floor and clear of settled blocks. Cells
    /// above the top edge are allowed.
    pub fn fits(&self, piece: &Piece) -> bool {
        piece.cells().all(|(x, y)| {
            x >= 0
                && (x as usize) < self.width
                && (y as i64) < self.rows.len() as i64
                && !self.is_filled(x, y)
        })
    }

    /// Settle `piece`; cells above the top edge are lost
    pub fn place(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if x >= 0 && y >= 0 {
                self.set(x as usize, y as usize, true);
            }
        }
    }

    /// Remove full rows and drop everything above them. Returns the number removed.
    pub fn clear_lines(&mut self) -> u32 {
        let height = self.rows.len();
        self.rows.retain(|row| row.iter().any(|&filled| !filled));
        let cleared = height - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, vec![false; self.width]);
        }
        cleared as u32
    }

    pub fn filled_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&filled| filled).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlocksPhase {
    #[default]
    NotStarted,
    Running,
    /// Gravity and input suspended
    Paused,
    /// The next piece had no room to spawn
    GameOver,
}

/// Complete falling-block state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocksState {
    pub tuning: BlocksTuning,
    pub well: Well,
    pub current: Option<Piece>,
    pub next: Option<Piece>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub frame_count: u64,
    /// Frame of the last gravity drop
    pub last_drop: u64,
    pub phase: BlocksPhase,
}

impl BlocksState {
    pub fn new(tuning: BlocksTuning) -> Self {
        Self {
            well: Well::new(tuning.well_width, tuning.well_height),
            current: None,
            next: None,
            score: 0,
            lines: 0,
            level: 1,
            frame_count: 0,
            last_drop: 0,
            phase: BlocksPhase::NotStarted,
            tuning,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }
}

impl Default for BlocksState {
    fn default() -> Self {
        Self::new(BlocksTuning::default())
    }
}
