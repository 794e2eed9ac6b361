//! Candidate move ordering for tree expansion
//!
//! Every empty cell lands in exactly one bucket:
//! - **forcing**: gaps of one-sided windows (complete or block a run)
//! - **proximity**: neighbours (8-neighbourhood) of any stone
//! - **remainder**: everything else
//!
//! Expansion tries forcing moves first, then proximity, then the rest, so
//! no legal move is ever excluded, only deprioritised.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, CellSet, Pos};
use crate::rules::DIRECTIONS;

use super::patterns::{classify_window, Threat};

/// Offsets of the 8-neighbourhood
const NEIGHBOURS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One forcing tier per threat class
const TIERS: usize = Threat::ALL.len();

/// Empty cells partitioned into expansion priority buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveCandidates {
    /// Forcing cells, strongest threat class first
    pub forcing: Vec<Pos>,
    /// Cells touching a stone that are not forcing
    pub proximity: Vec<Pos>,
    /// All other empty cells
    pub remainder: Vec<Pos>,
}

impl MoveCandidates {
    /// Total number of candidates (equals the number of empty cells)
    pub fn len(&self) -> usize {
        self.forcing.len() + self.proximity.len() + self.remainder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into an expansion queue.
    ///
    /// Forcing order is kept; proximity and remainder are shuffled with `rng`.
    pub fn into_queue<R: Rng + ?Sized>(self, rng: &mut R) -> VecDeque<Pos> {
        let MoveCandidates {
            forcing,
            mut proximity,
            mut remainder,
        } = self;
        proximity.shuffle(rng);
        remainder.shuffle(rng);

        let mut queue =
            VecDeque::with_capacity(forcing.len() + proximity.len() + remainder.len());
        queue.extend(forcing);
        queue.extend(proximity);
        queue.extend(remainder);
        queue
    }
}

/// Bucket every empty cell of `board`.
///
/// Scans each window of `n_in_row` cells that contains at least one stone,
/// once per window, in row-major order of the stones.
pub fn heuristic_moves(board: &Board) -> MoveCandidates {
    let n = board.n_in_row();
    let (rows, cols) = (board.rows(), board.cols());
    let total = board.cell_count();

    let mut tiers: [Vec<Pos>; TIERS] = Default::default();
    let mut tier_seen: [CellSet; TIERS] = std::array::from_fn(|_| CellSet::empty(total));
    let mut scanned: [CellSet; 4] = [
        CellSet::empty(total),
        CellSet::empty(total),
        CellSet::empty(total),
        CellSet::empty(total),
    ];
    let mut window: Vec<Pos> = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);

    for pos in board.unavailable() {
        for (dir, &(dr, dc)) in DIRECTIONS.iter().enumerate() {
            for back in 0..n as i32 {
                let Some(start) = pos.offset(dr, dc, -back, rows, cols) else {
                    break;
                };
                // Window must fit entirely on the board
                if start.offset(dr, dc, n as i32 - 1, rows, cols).is_none() {
                    continue;
                }
                let start_idx = board.index(start);
                if scanned[dir].contains(start_idx) {
                    continue;
                }
                scanned[dir].insert(start_idx);

                window.clear();
                values.clear();
                for step in 0..n as i32 {
                    if let Some(p) = start.offset(dr, dc, step, rows, cols) {
                        window.push(p);
                        values.push(board.get(p));
                    }
                }

                if let Some((threat, gaps)) = classify_window(&values) {
                    record_threat(board, threat, &gaps, &window, &mut tiers, &mut tier_seen);
                }
            }
        }
    }

    let mut forcing_set = CellSet::empty(total);
    let mut forcing = Vec::new();
    for tier in tiers {
        for p in tier {
            let idx = board.index(p);
            if !forcing_set.contains(idx) {
                forcing_set.insert(idx);
                forcing.push(p);
            }
        }
    }

    let mut proximity_set = CellSet::empty(total);
    let mut proximity = Vec::new();
    for pos in board.unavailable() {
        for &(dr, dc) in &NEIGHBOURS {
            let Some(p) = pos.offset(dr, dc, 1, rows, cols) else {
                continue;
            };
            let idx = board.index(p);
            if board.is_empty(p) && !forcing_set.contains(idx) && !proximity_set.contains(idx)
            {
                proximity_set.insert(idx);
                proximity.push(p);
            }
        }
    }

    let remainder = board
        .available()
        .filter(|&p| {
            let idx = board.index(p);
            !forcing_set.contains(idx) && !proximity_set.contains(idx)
        })
        .collect();

    MoveCandidates {
        forcing,
        proximity,
        remainder,
    }
}

fn record_threat(
    board: &Board,
    threat: Threat,
    gaps: &[usize],
    window: &[Pos],
    tiers: &mut [Vec<Pos>; TIERS],
    tier_seen: &mut [CellSet; TIERS],
) {
    let rank = threat.rank();
    for &gap in gaps {
        let p = window[gap];
        let idx = board.index(p);
        if !tier_seen[rank].contains(idx) {
            tier_seen[rank].insert(idx);
            tiers[rank].push(p);
        }
    }
}
