use super::{Board, PlayerId};

/// Produces the player-specific textual snapshot consumed by `look`/`flip`
/// callers: a header line, then one line per cell in row-major order.
/// Grounded on the teacher's `Grid::notate`/`pretty.rs` row-major join, generalized
/// from a single shared view to a per-viewer one since control here (unlike LITS
/// ownership) is asymmetric: only the controlling player sees `my`.
///
/// Takes the board's mutex exactly once (`Board::snapshot`) so the rendering is a
/// consistent point-in-time view rather than three racing accessor calls.
pub fn render(board: &Board, viewer: impl Into<PlayerId>) -> String {
    let viewer = viewer.into();
    let rows = board.num_rows();
    let cols = board.num_cols();
    let cells = board.snapshot();

    let mut out = format!("{rows}x{cols}\n");
    for (picture, face_up, controller) in cells {
        let line = match picture {
            None => "none".to_owned(),
            Some(_) if !face_up => "down".to_owned(),
            Some(picture) if controller.as_ref() == Some(&viewer) => format!("my {picture}"),
            Some(picture) => format!("up {picture}"),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
