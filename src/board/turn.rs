/// A grid coordinate. Bounds are checked against a specific board, not baked in here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The outcome of a completed SECOND step, remembered until the owning player's
/// next FIRST attempt triggers deferred cleanup (rules 3-A/3-B).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairOutcome {
    /// Both cards matched; still controlled by the player. Cleanup removes them (3-A).
    Matched(Coord, Coord),
    /// The cards didn't match and were released. Cleanup flips either down if still
    /// uncontrolled (3-B, two-card).
    Mismatched(Coord, Coord),
    /// The FIRST card was relinquished because SECOND failed (2-A/2-B) or repeated the
    /// same cell. Cleanup flips it down if still uncontrolled (3-B, one-card).
    SingleLinger(Coord),
}

/// Per-player shadow state for the FIRST/SECOND protocol. Lives in `Board` only while
/// the player has something outstanding; absent means `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    HoldingFirst { first: Coord },
    PairPending { outcome: PairOutcome },
}

impl Default for TurnPhase {
    fn default() -> Self {
        TurnPhase::Idle
    }
}
