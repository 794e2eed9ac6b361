//! Background search worker
//!
//! Runs one engine search on its own thread so an interactive caller stays
//! responsive. The handshake is single-slot: [`AiWorker::start`] hands over a
//! copy of the board, the thread sends exactly one result back, and the
//! caller polls without blocking. A running search cannot be interrupted;
//! [`AiWorker::abandon`] only discards its result.

use std::sync::mpsc::{sync_channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::board::{Board, Pos, Stone};
use crate::config::SearchConfig;
use crate::engine::{AIEngine, MoveResult};
use crate::error::{SearchError, WorkerError};

type SearchReply = Result<MoveResult, SearchError>;

/// What [`AiWorker::poll`] observed.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerStatus {
    /// No search was started
    Idle,
    /// Search still running, with its elapsed time
    Thinking(Duration),
    /// Search finished; the worker is idle again
    Done(MoveResult),
    /// Search failed or the thread died; the worker is idle again
    Failed(String),
}

enum WorkerState {
    Idle,
    Thinking {
        receiver: Receiver<SearchReply>,
        start_time: Instant,
    },
}

/// Owner of at most one in-flight search.
pub struct AiWorker {
    config: SearchConfig,
    state: WorkerState,
    searches: u64,
}

impl AiWorker {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            state: WorkerState::Idle,
            searches: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn is_thinking(&self) -> bool {
        matches!(self.state, WorkerState::Thinking { .. })
    }

    /// Elapsed time of the running search, if any.
    pub fn thinking_elapsed(&self) -> Option<Duration> {
        match &self.state {
            WorkerState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            WorkerState::Idle => None,
        }
    }

    /// Start searching a copy of `board` on a new thread.
    ///
    /// With a configured seed, the n-th search of this worker uses
    /// `seed + n` so consecutive moves do not replay the same random stream.
    pub fn start(
        &mut self,
        board: &Board,
        last_mover: Stone,
        last_move: Option<Pos>,
    ) -> Result<(), WorkerError> {
        if self.is_thinking() {
            return Err(WorkerError::Busy);
        }

        let board = board.clone();
        let mut config = self.config.clone();
        config.seed = config.seed.map(|seed| seed.wrapping_add(self.searches));
        self.searches += 1;

        let (tx, rx) = sync_channel(1);
        thread::spawn(move || {
            let mut engine = AIEngine::with_config(config);
            let result = engine.get_move_with_stats(&board, last_mover, last_move);
            // Receiver is gone if the search was abandoned
            let _ = tx.send(result);
        });

        debug!(search = self.searches, "worker started");
        self.state = WorkerState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
        Ok(())
    }

    /// Check for a result without blocking.
    pub fn poll(&mut self) -> WorkerStatus {
        let reply = match &self.state {
            WorkerState::Idle => return WorkerStatus::Idle,
            WorkerState::Thinking {
                receiver,
                start_time,
            } => match receiver.try_recv() {
                Ok(reply) => Ok(reply),
                Err(TryRecvError::Empty) => return WorkerStatus::Thinking(start_time.elapsed()),
                Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
            },
        };

        self.state = WorkerState::Idle;
        match reply.and_then(|r| r.map_err(WorkerError::from)) {
            Ok(result) => WorkerStatus::Done(result),
            Err(e) => {
                warn!("search failed: {}", e);
                WorkerStatus::Failed(e.to_string())
            }
        }
    }

    /// Block until the running search finishes.
    pub fn wait(&mut self) -> Result<MoveResult, WorkerError> {
        let state = std::mem::replace(&mut self.state, WorkerState::Idle);
        match state {
            WorkerState::Idle => Err(WorkerError::Idle),
            WorkerState::Thinking { receiver, .. } => match receiver.recv() {
                Ok(reply) => reply.map_err(WorkerError::from),
                Err(_) => Err(WorkerError::Disconnected),
            },
        }
    }

    /// Forget the running search; its thread finishes in the background.
    pub fn abandon(&mut self) {
        if self.is_thinking() {
            debug!("worker search abandoned");
        }
        self.state = WorkerState::Idle;
    }
}
