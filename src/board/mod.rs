pub(crate) mod cell;
pub(crate) mod error;
pub(crate) mod parser;
pub(crate) mod registry;
pub(crate) mod renderer;
pub(crate) mod turn;

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use cell::Cell;
use registry::PlayerRegistry;
use turn::{Coord, PairOutcome, TurnPhase};

pub use error::BoardError;
pub use parser::parse_board;
pub use renderer::render;
pub use turn::Coord as BoardCoord;

use crate::utils::prelude::HashMap;

/// An opaque player identifier, cheap to clone since the flip protocol passes it
/// around on every call (cells, turn-phase keys, waiter queues).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerId(Arc<str>);

impl PlayerId {
    pub fn new(id: impl Into<Arc<str>>) -> PlayerId {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> PlayerId {
        PlayerId(Arc::from(s))
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> PlayerId {
        PlayerId(Arc::from(s.as_str()))
    }
}

/// Everything guarded by the board's single mutex: the grid, the registry, and every
/// player's FIRST/SECOND shadow state. The SECOND step reads two cells and the
/// per-player phase together, so this is deliberately one critical section rather
/// than sharded per-cell locks.
struct BoardState {
    grid: Vec<Cell>,
    players: PlayerRegistry,
    pending: HashMap<PlayerId, TurnPhase>,
}

/// The `rows x cols` grid of face-down picture cards plus the concurrent flip
/// protocol (rules 1-A...3-B). One logical lock (`state`) guards the grid, registry
/// and per-player phases together; one `Condvar` per cell backs rule 1-D's
/// suspension point. No cell reference ever escapes the board.
pub struct Board {
    rows: usize,
    cols: usize,
    state: Mutex<BoardState>,
    waiters: Vec<Condvar>,
}

impl Board {
    /// Builds a board from a pre-parsed, row-major list of picture tokens. Prefer
    /// `parse_board` for text input; this is the constructor the parser calls once
    /// it has validated the header and token count.
    pub(crate) fn new(rows: usize, cols: usize, pictures: Vec<String>) -> Board {
        assert_eq!(rows * cols, pictures.len());
        let grid = pictures.into_iter().map(Cell::new).collect::<Vec<_>>();
        let waiters = (0..rows * cols).map(|_| Condvar::new()).collect();
        Board {
            rows,
            cols,
            state: Mutex::new(BoardState { grid, players: PlayerRegistry::new(), pending: HashMap::new() }),
            waiters,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    fn index(&self, coord: Coord) -> Result<usize, BoardError> {
        if coord.row >= self.rows || coord.col >= self.cols {
            return Err(BoardError::OutOfBounds { row: coord.row, col: coord.col });
        }
        Ok(coord.row * self.cols + coord.col)
    }

    pub fn picture_at(&self, row: usize, col: usize) -> Result<Option<String>, BoardError> {
        let idx = self.index(Coord::new(row, col))?;
        let state = self.state.lock().unwrap();
        Ok(state.grid[idx].picture().map(str::to_owned))
    }

    pub fn is_face_up(&self, row: usize, col: usize) -> Result<bool, BoardError> {
        let idx = self.index(Coord::new(row, col))?;
        let state = self.state.lock().unwrap();
        Ok(state.grid[idx].is_face_up())
    }

    pub fn controller_at(&self, row: usize, col: usize) -> Result<Option<PlayerId>, BoardError> {
        let idx = self.index(Coord::new(row, col))?;
        let state = self.state.lock().unwrap();
        Ok(state.grid[idx].controller().cloned())
    }

    /// Adds `id` to the registry with `display_name` (default: the id itself).
    /// Idempotent: re-registering an existing id leaves its name untouched.
    pub fn register_player(&self, id: impl Into<PlayerId>, display_name: Option<String>) -> Result<(), BoardError> {
        let id = id.into();
        let mut state = self.state.lock().unwrap();
        state.players.register(id, display_name)
    }

    /// Performs one full `flipUp` call: deferred cleanup (3-A/3-B), then the FIRST or
    /// SECOND step, blocking on rule 1-D if the target is contended. Returns once the
    /// state change for this step has committed.
    pub fn flip_up(&self, id: impl Into<PlayerId>, row: usize, col: usize) -> Result<(), BoardError> {
        self.flip_up_impl(id.into(), Coord::new(row, col), None)
    }

    /// As `flip_up`, but a contended FIRST cell (rule 1-D) that is not relinquished
    /// within `timeout` fails with `BoardError::Timeout` instead of waiting forever.
    /// This is an optional extension beyond the base protocol; cell state is left
    /// exactly as it was on timeout.
    pub fn flip_up_timeout(&self, id: impl Into<PlayerId>, row: usize, col: usize, timeout: Duration) -> Result<(), BoardError> {
        self.flip_up_impl(id.into(), Coord::new(row, col), Some(timeout))
    }

    fn flip_up_impl(&self, id: PlayerId, target: Coord, timeout: Option<Duration>) -> Result<(), BoardError> {
        let target_idx = self.index(target)?;

        let mut state = self.state.lock().unwrap();
        if !state.players.contains(&id) {
            return Err(BoardError::UnknownPlayer(id.as_str().to_owned()));
        }

        // Deferred cleanup: rules 3-A / 3-B run at the start of the player's next
        // FIRST attempt, before anything else, and reset phase to Idle.
        if let Some(TurnPhase::PairPending { outcome }) = state.pending.get(&id).copied() {
            state.pending.remove(&id);
            self.cleanup(&mut state, outcome);
        }

        match state.pending.get(&id).copied().unwrap_or(TurnPhase::Idle) {
            TurnPhase::Idle => self.first_card(state, id, target, target_idx, timeout),
            TurnPhase::HoldingFirst { first } => self.second_card(state, id, first, target),
            TurnPhase::PairPending { .. } => unreachable!("cleanup always resets PairPending to Idle above"),
        }
    }

    /// Rules 1-A...1-D. `state` is held on entry for the initial check, but each
    /// re-check after a 1-D wake re-acquires it fresh (the `Condvar::wait` call
    /// releases it while suspended).
    fn first_card(
        &self,
        mut state: std::sync::MutexGuard<BoardState>,
        id: PlayerId,
        target: Coord,
        target_idx: usize,
        timeout: Option<Duration>,
    ) -> Result<(), BoardError> {
        let deadline = timeout.map(|d| Instant::now() + d);
        loop {
            let is_empty = state.grid[target_idx].is_empty();
            let is_face_up = state.grid[target_idx].is_face_up();
            let controller = state.grid[target_idx].controller().cloned();

            if is_empty {
                return Err(BoardError::EmptySpace);
            }
            if !is_face_up || controller.is_none() {
                // 1-B (face down) or 1-C (face up, uncontrolled): claim it.
                state.grid[target_idx].claim(id.clone());
                state.pending.insert(id, TurnPhase::HoldingFirst { first: target });
                return Ok(());
            }

            debug_assert!(controller.as_ref() != Some(&id), "a player cannot control a cell it is also waiting on");

            // 1-D: suspend on this cell's waiter queue until relinquished.
            state = match deadline {
                None => self.waiters[target_idx].wait(state).unwrap(),
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    let (guard, result) = self.waiters[target_idx].wait_timeout(state, remaining).unwrap();
                    if result.timed_out() {
                        return Err(BoardError::Timeout { row: target.row, col: target.col });
                    }
                    guard
                }
            };
        }
    }

    /// Rules 2-A...2-E, plus the same-card pre-check. `first` is the caller's FIRST
    /// coordinate, already committed; `second` is this call's target.
    fn second_card(&self, mut state: std::sync::MutexGuard<BoardState>, id: PlayerId, first: Coord, second: Coord) -> Result<(), BoardError> {
        let first_idx = self.index(first)?;
        let second_idx = self.index(second)?;

        if second == first {
            state.grid[first_idx].release();
            state.pending.insert(id, TurnPhase::PairPending { outcome: PairOutcome::SingleLinger(first) });
            self.wake(first_idx);
            return Err(BoardError::SameCard);
        }

        let second_is_empty = state.grid[second_idx].is_empty();
        let second_is_contended = state.grid[second_idx].is_face_up() && state.grid[second_idx].controller().is_some();
        if second_is_empty {
            // 2-A
            state.grid[first_idx].release();
            state.pending.insert(id, TurnPhase::PairPending { outcome: PairOutcome::SingleLinger(first) });
            self.wake(first_idx);
            return Err(BoardError::EmptySpace);
        }
        if second_is_contended {
            // 2-B: contended SECOND never waits.
            state.grid[first_idx].release();
            state.pending.insert(id, TurnPhase::PairPending { outcome: PairOutcome::SingleLinger(first) });
            self.wake(first_idx);
            return Err(BoardError::Controlled);
        }

        // 2-C / 2-C': face-down or face-up-uncontrolled, either way claim it.
        state.grid[second_idx].claim(id.clone());

        let matched = state.grid[first_idx].picture() == state.grid[second_idx].picture();
        if matched {
            // 2-D: keep control of both.
            state.pending.insert(id, TurnPhase::PairPending { outcome: PairOutcome::Matched(first, second) });
        } else {
            // 2-E: release both.
            state.grid[first_idx].release();
            state.grid[second_idx].release();
            state.pending.insert(id, TurnPhase::PairPending { outcome: PairOutcome::Mismatched(first, second) });
            self.wake(first_idx);
            self.wake(second_idx);
        }
        Ok(())
    }

    /// Applies a deferred outcome (3-A matched removal, 3-B flip-down) and wakes any
    /// waiters on the affected cells. Called only from the next `flip_up` by the same
    /// player, since a lingering card is tracked per-player rather than swept globally.
    fn cleanup(&self, state: &mut BoardState, outcome: PairOutcome) {
        match outcome {
            PairOutcome::Matched(a, b) => {
                let (ia, ib) = (self.index(a).unwrap(), self.index(b).unwrap());
                state.grid[ia].remove();
                state.grid[ib].remove();
                self.wake(ia);
                self.wake(ib);
            }
            PairOutcome::Mismatched(a, b) => {
                let (ia, ib) = (self.index(a).unwrap(), self.index(b).unwrap());
                if state.grid[ia].flip_down_if_uncontrolled() {
                    self.wake(ia);
                }
                if state.grid[ib].flip_down_if_uncontrolled() {
                    self.wake(ib);
                }
            }
            PairOutcome::SingleLinger(a) => {
                let ia = self.index(a).unwrap();
                if state.grid[ia].flip_down_if_uncontrolled() {
                    self.wake(ia);
                }
            }
        }
    }

    fn wake(&self, idx: usize) {
        self.waiters[idx].notify_all();
    }

    /// A single-lock-acquisition view of every cell's `(picture, face_up, controller)`,
    /// row-major. The renderer needs a consistent snapshot rather than three
    /// independent accessor calls that could interleave with a concurrent flip.
    pub(crate) fn snapshot(&self) -> Vec<(Option<String>, bool, Option<PlayerId>)> {
        let state = self.state.lock().unwrap();
        state.grid.iter().map(|cell| (cell.picture().map(str::to_owned), cell.is_face_up(), cell.controller().cloned())).collect()
    }

    /// Deterministic row-major serialization used by tests: `"<rows>x<cols>\n"`
    /// followed by one picture per line, empties rendered as an empty line. Reflects
    /// live state at call time; only specified (and only tested) on a freshly parsed
    /// board.
    pub fn pictures_dump(&self) -> String {
        let state = self.state.lock().unwrap();
        let mut out = format!("{}x{}\n", self.rows, self.cols);
        for cell in &state.grid {
            out.push_str(cell.picture().unwrap_or(""));
            out.push('\n');
        }
        out
    }
}
