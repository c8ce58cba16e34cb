//! Machine opponent: static evaluation plus depth-limited alpha-beta search
//!
//! The search runs on `(human, machine)` bitmasks and remembers positions it
//! has already bounded, so the deepest difficulty replies in interactive time.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::board::{Board, CELLS, LINE_MASKS, Mark, Outcome, winner};

/// Cells searched first, strongest squares on an open 5x5 board
pub const PRIORITY: [usize; 9] = [12, 0, 4, 20, 24, 6, 8, 16, 18];

/// Used when the search yields nothing better than the initial bound
const FALLBACK: [usize; 9] = [12, 0, 4, 20, 24, 2, 10, 14, 22];

const WIN_SCORE: i32 = 10_000;

const OWN_LINE: [i32; 4] = [10, 100, 1_000, 10_000];
const OPPONENT_LINE: [i32; 4] = [5, 50, 500, 5_000];

const CENTER: u32 = 1 << 12;
const CORNERS: u32 = 1 | 1 << 4 | 1 << 20 | 1 << 24;
const EDGES: u32 = 1 << 2 | 1 << 10 | 1 << 14 | 1 << 22;
const FULL: u32 = (1 << CELLS) - 1;

/// Cap on remembered positions per search
const TABLE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    #[default]
    Hard,
}

impl Difficulty {
    /// Search plies
    pub fn max_depth(self) -> u32 {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 6,
            Difficulty::Hard => 8,
        }
    }
}

/// Heuristic value of `board` from `mark`'s point of view
pub fn evaluate(board: &Board, mark: Mark) -> i32 {
    let (human, machine) = board.masks();
    match mark {
        Mark::Machine => score_masks(machine, human),
        Mark::Human => score_masks(human, machine),
    }
}

fn score_masks(own: u32, theirs: u32) -> i32 {
    let mut score = 0;
    for line in LINE_MASKS {
        let mine = (own & line).count_ones() as usize;
        let other = (theirs & line).count_ones() as usize;
        if other == 0 && (1..=4).contains(&mine) {
            score += OWN_LINE[mine - 1];
        }
        if mine == 0 && (1..=4).contains(&other) {
            score -= OPPONENT_LINE[other - 1];
        }
    }

    score
        + positional(own, theirs, CENTER, 50, 25)
        + positional(own, theirs, CORNERS, 30, 15)
        + positional(own, theirs, EDGES, 20, 10)
}

fn positional(own: u32, theirs: u32, cells: u32, bonus: i32, malus: i32) -> i32 {
    (own & cells).count_ones() as i32 * bonus - (theirs & cells).count_ones() as i32 * malus
}

fn completes_line(marks: u32) -> bool {
    LINE_MASKS.iter().any(|&line| marks & line == line)
}

fn ordered_cells(occupied: u32) -> Vec<usize> {
    let free = |i: &usize| occupied & (1 << *i) == 0;
    PRIORITY
        .iter()
        .copied()
        .filter(free)
        .chain((0..CELLS).filter(|i| !PRIORITY.contains(i)).filter(free))
        .collect()
}

/// Empty cells, priority squares first, then ascending index
pub fn ordered_moves(board: &Board) -> Vec<usize> {
    let (human, machine) = board.masks();
    ordered_cells(human | machine)
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Exact,
    /// True value is at least the stored one
    Lower,
    /// True value is at most the stored one
    Upper,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: i32,
    bound: Bound,
}

/// One search from a fixed root. Ply and side to move follow from the mark
/// count, so positions are keyed by their marks alone.
struct Search {
    max_depth: u32,
    table: HashMap<(u32, u32), Entry>,
}

impl Search {
    fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            table: HashMap::new(),
        }
    }

    fn value(
        &mut self,
        human: u32,
        machine: u32,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        if completes_line(machine) {
            return WIN_SCORE - depth as i32;
        }
        if completes_line(human) {
            return -WIN_SCORE + depth as i32;
        }
        if human | machine == FULL || depth >= self.max_depth {
            return score_masks(machine, human);
        }

        let key = (human, machine);
        let (alpha_in, beta_in) = (alpha, beta);
        if let Some(entry) = self.table.get(&key) {
            match entry.bound {
                Bound::Exact => return entry.value,
                Bound::Lower => alpha = alpha.max(entry.value),
                Bound::Upper => beta = beta.min(entry.value),
            }
            if beta <= alpha {
                return entry.value;
            }
        }

        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for cell in self.children(human, machine, maximizing) {
            let bit = 1 << cell;
            if maximizing {
                let value = self.value(human, machine | bit, depth + 1, false, alpha, beta);
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                let value = self.value(human | bit, machine, depth + 1, true, alpha, beta);
                best = best.min(value);
                beta = beta.min(value);
            }
            if beta <= alpha {
                break;
            }
        }

        // Positions right above the horizon are cheaper to redo than to store
        if self.max_depth - depth >= 2 && self.table.len() < TABLE_LIMIT {
            let bound = if best <= alpha_in {
                Bound::Upper
            } else if best >= beta_in {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.table.insert(key, Entry { value: best, bound });
        }
        best
    }

    /// Replies sorted by their static value for the side to move, priority
    /// order breaking ties
    fn children(&self, human: u32, machine: u32, maximizing: bool) -> Vec<usize> {
        let mut scored: Vec<(usize, i32)> = ordered_cells(human | machine)
            .into_iter()
            .map(|cell| {
                let bit = 1 << cell;
                let value = if maximizing {
                    score_masks(machine | bit, human)
                } else {
                    score_masks(machine, human | bit)
                };
                (cell, value)
            })
            .collect();
        if maximizing {
            scored.sort_by_key(|&(_, value)| Reverse(value));
        } else {
            scored.sort_by_key(|&(_, value)| value);
        }
        scored.into_iter().map(|(cell, _)| cell).collect()
    }
}

/// Alpha-beta minimax. The machine maximizes; quicker wins score higher.
pub fn minimax(
    board: &Board,
    depth: u32,
    maximizing: bool,
    alpha: i32,
    beta: i32,
    max_depth: u32,
) -> i32 {
    let (human, machine) = board.masks();
    Search::new(max_depth).value(human, machine, depth, maximizing, alpha, beta)
}

/// First empty cell that completes a line for `mark`
pub fn winning_cell(board: &Board, mark: Mark) -> Option<usize> {
    let mut scratch = *board;
    board.empty_cells().find(|&i| {
        scratch.set(i, Some(mark));
        let wins = winner(&scratch) == Some(Outcome::Won(mark));
        scratch.set(i, None);
        wins
    })
}

/// Machine reply: take a win, block a loss, else search. `None` on a full board.
pub fn best_move(board: &Board, difficulty: Difficulty) -> Option<usize> {
    if let Some(cell) = winning_cell(board, Mark::Machine) {
        return Some(cell);
    }
    if let Some(cell) = winning_cell(board, Mark::Human) {
        return Some(cell);
    }

    let (human, machine) = board.masks();
    let mut search = Search::new(difficulty.max_depth());
    let mut best: Option<(usize, i32)> = None;
    for cell in ordered_moves(board) {
        // A move only has to be valued exactly when it can beat the best so far
        let alpha = best.map_or(i32::MIN, |(_, v)| v);
        let value = search.value(human, machine | 1 << cell, 0, false, alpha, i32::MAX);
        // Strict comparison keeps the earliest of equal moves
        if best.is_none_or(|(_, v)| value > v) {
            best = Some((cell, value));
        }
    }

    best.map(|(cell, _)| cell).or_else(|| {
        FALLBACK
            .iter()
            .copied()
            .find(|&i| board.is_empty_cell(i))
            .or_else(|| (0..CELLS).find(|&i| board.is_empty_cell(i)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn board_with(marks: &[(usize, Mark)]) -> Board {
        let mut board = Board::new();
        for &(i, m) in marks {
            board.set(i, Some(m));
        }
        board
    }

    #[test]
    fn test_evaluate_empty_board_is_zero() {
        assert_eq!(evaluate(&Board::new(), Mark::Machine), 0);
    }

    #[test]
    fn test_evaluate_center_mark() {
        // Center sits on row 2, column 2 and both main diagonals: 4 open lines
        let board = board_with(&[(12, Mark::Machine)]);
        assert_eq!(evaluate(&board, Mark::Machine), 4 * 10 + 50);
        assert_eq!(evaluate(&board, Mark::Human), -(4 * 5) - 25);
    }

    #[test]
    fn test_evaluate_blocked_line_scores_nothing() {
        let board = board_with(&[(0, Mark::Machine), (1, Mark::Human)]);
        // Row 0 is mixed; remaining terms come from column and diagonal lines
        let own_lines = 2; // column 0, main diagonal
        let their_lines = 2; // column 1, short diagonal 1-7-13-19
        let expected = own_lines * 10 - their_lines * 5 + 30;
        assert_eq!(evaluate(&board, Mark::Machine), expected);
    }

    #[test]
    fn test_ordered_moves_priority_first() {
        let board = board_with(&[(12, Mark::Human), (4, Mark::Machine)]);
        let moves = ordered_moves(&board);
        assert_eq!(&moves[..7], &[0, 20, 24, 6, 8, 16, 18]);
        assert_eq!(moves[7], 1);
        assert_eq!(moves.len(), 23);
    }

    #[test]
    fn test_takes_immediate_win() {
        let board = board_with(&[
            (1, Mark::Machine),
            (7, Mark::Machine),
            (13, Mark::Machine),
            (0, Mark::Human),
            (5, Mark::Human),
            (10, Mark::Human),
            (15, Mark::Human),
        ]);
        // Human threatens 20, but the machine completes 1-7-13-19 first
        assert_eq!(best_move(&board, Difficulty::Easy), Some(19));
    }

    #[test]
    fn test_blocks_immediate_loss() {
        let board = board_with(&[
            (0, Mark::Human),
            (1, Mark::Human),
            (2, Mark::Human),
            (3, Mark::Human),
            (12, Mark::Machine),
            (6, Mark::Machine),
        ]);
        assert_eq!(best_move(&board, Difficulty::Easy), Some(4));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::new();
        for i in 0..CELLS {
            board.set(i, Some(if i % 2 == 0 { Mark::Human } else { Mark::Machine }));
        }
        assert_eq!(best_move(&board, Difficulty::Easy), None);
    }

    #[test]
    fn test_minimax_scores_terminal_positions() {
        let won = board_with(&[3, 7, 11, 15].map(|i| (i, Mark::Machine)));
        assert_eq!(minimax(&won, 2, false, i32::MIN, i32::MAX, 4), WIN_SCORE - 2);
        let lost = board_with(&[3, 7, 11, 15].map(|i| (i, Mark::Human)));
        assert_eq!(minimax(&lost, 3, true, i32::MIN, i32::MAX, 4), -WIN_SCORE + 3);
    }

    #[test]
    fn test_reply_is_always_an_empty_cell() {
        let board = board_with(&[(12, Mark::Human), (0, Mark::Machine), (6, Mark::Human)]);
        let cell = best_move(&board, Difficulty::Easy).unwrap();
        assert!(board.is_empty_cell(cell));
    }

    /// Full-width minimax without pruning or memory, for cross-checking the search
    fn plain_minimax(board: &mut Board, depth: u32, maximizing: bool, max_depth: u32) -> i32 {
        match winner(board) {
            Some(Outcome::Won(Mark::Machine)) => return WIN_SCORE - depth as i32,
            Some(Outcome::Won(Mark::Human)) => return -WIN_SCORE + depth as i32,
            Some(Outcome::Draw) => return evaluate(board, Mark::Machine),
            None if depth >= max_depth => return evaluate(board, Mark::Machine),
            None => {}
        }
        let mark = if maximizing { Mark::Machine } else { Mark::Human };
        let cells: Vec<usize> = board.empty_cells().collect();
        let values: Vec<i32> = cells
            .into_iter()
            .map(|cell| {
                board.set(cell, Some(mark));
                let value = plain_minimax(board, depth + 1, !maximizing, max_depth);
                board.set(cell, None);
                value
            })
            .collect();
        let best = if maximizing {
            values.iter().max()
        } else {
            values.iter().min()
        };
        *best.unwrap()
    }

    /// Mid-game position, machine to move, no immediate win for either side
    fn midgame() -> Board {
        let mut board = Board::new();
        for i in [0, 3, 7, 13, 14, 20, 22] {
            board.set(i, Some(Mark::Human));
        }
        for i in [1, 5, 9, 12, 18, 21] {
            board.set(i, Some(Mark::Machine));
        }
        board
    }

    #[test]
    fn test_search_matches_plain_minimax() {
        let board = midgame();
        assert_eq!(winning_cell(&board, Mark::Machine), None);
        assert_eq!(winning_cell(&board, Mark::Human), None);

        let depth = Difficulty::Easy.max_depth();
        let mut expected: Option<(usize, i32)> = None;
        for cell in ordered_moves(&board) {
            let mut child = board;
            child.set(cell, Some(Mark::Machine));
            let plain = plain_minimax(&mut child, 0, false, depth);
            assert_eq!(minimax(&child, 0, false, i32::MIN, i32::MAX, depth), plain);
            if expected.is_none_or(|(_, v)| plain > v) {
                expected = Some((cell, plain));
            }
        }
        assert_eq!(best_move(&board, Difficulty::Easy), expected.map(|(cell, _)| cell));
    }

    #[test]
    fn test_deeper_levels_reply_promptly() {
        let board = board_with(&[(12, Mark::Human)]);
        for difficulty in [Difficulty::Medium, Difficulty::Hard] {
            let started = Instant::now();
            let cell = best_move(&board, difficulty).unwrap();
            let elapsed = started.elapsed();
            assert!(board.is_empty_cell(cell));
            assert!(
                elapsed < Duration::from_secs(30),
                "{difficulty:?} took {elapsed:?}"
            );
        }
    }
}
