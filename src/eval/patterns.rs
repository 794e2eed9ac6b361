//! Window patterns for forcing-move detection
//!
//! A window is a straight segment of exactly `n_in_row` cells. Its cells are
//! summarised by their sum (sides encoded `+1` / `-1`, empty `0`) and the
//! number of distinct values present. A window holding stones of both sides
//! has three distinct values and never matches.

use crate::board::{Cell, EMPTY};

/// Forcing pattern found inside a window, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Threat {
    /// `n - 1` stones and one gap: the gap completes or blocks a run
    Immediate,
    /// `n - 2` stones and two gaps: a split near-win
    Split,
    /// A run of `n - 3` stones between open ends, plus one gap beside it
    Open,
}

impl Threat {
    /// All threats in priority order
    pub const ALL: [Threat; 3] = [Threat::Immediate, Threat::Split, Threat::Open];

    /// Position in [`Threat::ALL`]
    #[inline]
    pub fn rank(self) -> usize {
        match self {
            Threat::Immediate => 0,
            Threat::Split => 1,
            Threat::Open => 2,
        }
    }
}

/// Summary of a window's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSummary {
    pub sum: i32,
    pub empties: usize,
    pub distinct: usize,
}

impl WindowSummary {
    pub fn of(values: &[Cell]) -> Self {
        let mut seen = [false; 3];
        let mut sum = 0i32;
        let mut empties = 0;
        for &v in values {
            sum += i32::from(v);
            if v == EMPTY {
                empties += 1;
            }
            seen[(v.clamp(-1, 1) + 1) as usize] = true;
        }
        Self {
            sum,
            empties,
            distinct: seen.iter().filter(|&&s| s).count(),
        }
    }

    /// Stones are all one side and at least one cell is empty
    #[inline]
    pub fn is_one_sided(&self, len: usize) -> bool {
        self.distinct == 2
            && self.empties > 0
            && self.sum.unsigned_abs() as usize == len - self.empties
    }
}

/// Classify a window, returning the threat and the window offsets of its
/// forcing cells.
pub fn classify_window(values: &[Cell]) -> Option<(Threat, Vec<usize>)> {
    let n = values.len();
    let summary = WindowSummary::of(values);
    if !summary.is_one_sided(n) {
        return None;
    }

    let gaps: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == EMPTY)
        .map(|(i, _)| i)
        .collect();

    match summary.empties {
        1 => Some((Threat::Immediate, gaps)),
        2 => Some((Threat::Split, gaps)),
        // Inner stones must form one run, so the inner gap touches an end cell
        3 if n >= 4 && values[0] == EMPTY && values[n - 1] == EMPTY => {
            let inner = gaps.into_iter().find(|&i| i != 0 && i != n - 1)?;
            (inner == 1 || inner == n - 2).then(|| (Threat::Open, vec![inner]))
        }
        _ => None,
    }
}
