use super::PlayerId;

/// One square of the grid: a picture token (or empty, once removed by a match), whether
/// it's face up, and who (if anyone) controls it. Mutated only while `Board`'s mutex is
/// held; see `board/mod.rs` for the locking discipline.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    picture: Option<String>,
    face_up: bool,
    controller: Option<PlayerId>,
}

impl Cell {
    pub(crate) fn new(picture: String) -> Cell {
        Cell { picture: Some(picture), face_up: false, controller: None }
    }

    pub(crate) fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.picture.is_none()
    }

    pub(crate) fn is_face_up(&self) -> bool {
        self.face_up
    }

    pub(crate) fn controller(&self) -> Option<&PlayerId> {
        self.controller.as_ref()
    }

    /// Claims this cell for `player` as a FIRST or SECOND card: flips it face up (a
    /// no-op if it already was) and installs the controller. Covers rules 1-B, 1-C,
    /// 2-C and 2-C' uniformly, since the only difference between them is whether the
    /// cell started face down or face-up-uncontrolled.
    pub(crate) fn claim(&mut self, player: PlayerId) {
        self.face_up = true;
        self.controller = Some(player);
    }

    /// Releases control without changing the face. Used whenever a relinquishment
    /// leaves the card visible for other players to react to (2-A, 2-B, 2-E, same-card).
    pub(crate) fn release(&mut self) {
        self.controller = None;
    }

    /// Flips the cell face down if it's uncontrolled, used by deferred cleanup
    /// (3-B). Leaves it alone if another player has since taken control (1-C).
    /// Returns whether a flip actually happened, so the caller knows whether to wake
    /// waiters on this cell.
    pub(crate) fn flip_down_if_uncontrolled(&mut self) -> bool {
        if self.face_up && self.controller.is_none() {
            self.face_up = false;
            true
        } else {
            false
        }
    }

    /// Removes a matched pair from play (3-A).
    pub(crate) fn remove(&mut self) {
        self.picture = None;
        self.face_up = false;
        self.controller = None;
    }
}
