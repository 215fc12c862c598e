//! Board helpers and the win detector.
//!
//! `evaluate` is a pure function over a board snapshot; it never mutates
//! state and is safe to call on any valid (board, size, win_len) triple.

use serde::Serialize;

use super::value_object::Symbol;

/// Minimum board side length.
pub const MIN_SIZE: usize = 3;

/// Minimum run length required to win.
pub const MIN_WIN_LEN: usize = 3;

/// Default board side length.
pub const DEFAULT_SIZE: usize = 3;

/// Create an empty board for the given side length.
pub fn empty_board(size: usize) -> Vec<Option<Symbol>> {
    vec![None; size * size]
}

/// A board coordinate belonging to a winning line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineCell {
    pub row: usize,
    pub col: usize,
}

/// Outcome of evaluating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A symbol completed a run of `win_len` cells.
    Won { symbol: Symbol, line: Vec<LineCell> },
    /// Every cell is occupied and nobody won.
    Draw,
    /// The game continues.
    Ongoing,
}

/// Evaluate a board for a winner or a draw.
///
/// Every occupied cell is probed in row-major order along the four
/// half-plane directions (right, down, down-right, up-right). The first run
/// of `win_len` equal symbols found in that fixed order is the reported
/// line, which makes the reported line deterministic when several lines
/// complete on the same move.
///
/// The board length must be exactly `size * size`.
pub fn evaluate(board: &[Option<Symbol>], size: usize, win_len: usize) -> Verdict {
    debug_assert_eq!(board.len(), size * size);

    let idx = |r: usize, c: usize| r * size + c;
    const DIRS: [(isize, isize); 4] = [
        (0, 1),  // right
        (1, 0),  // down
        (1, 1),  // diag down-right
        (-1, 1), // diag up-right
    ];

    for r in 0..size {
        for c in 0..size {
            let Some(start) = board[idx(r, c)] else {
                continue;
            };

            for (dr, dc) in DIRS {
                let mut line = vec![LineCell { row: r, col: c }];
                let mut rr = r as isize;
                let mut cc = c as isize;
                for _ in 1..win_len {
                    rr += dr;
                    cc += dc;
                    if rr < 0 || rr >= size as isize || cc < 0 || cc >= size as isize {
                        break;
                    }
                    if board[idx(rr as usize, cc as usize)] == Some(start) {
                        line.push(LineCell {
                            row: rr as usize,
                            col: cc as usize,
                        });
                    } else {
                        break;
                    }
                }
                if line.len() == win_len {
                    return Verdict::Won {
                        symbol: start,
                        line,
                    };
                }
            }
        }
    }

    if board.iter().all(Option::is_some) {
        return Verdict::Draw;
    }
    Verdict::Ongoing
}
