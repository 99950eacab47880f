//! The entry controller's state-machine mode (§4.2).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Ordinary character entry/cursor navigation at the current line.
    Normal,
    /// The shift key was just pressed; the next function key produces its
    /// second-function variant (e.g. `sin` -> `asin`) instead of the
    /// primary one, then mode falls back to `Normal`.
    Shift,
    /// Prompting for a matrix's row count before allocating its cells.
    MatrixDimsRows,
    /// Prompting for a matrix's column count, row count already captured.
    MatrixDimsCols,
    /// The result-display sub-mode (§4.2): a throwaway render of the most
    /// recent evaluation (or, after Up/Down, an older entry from the fixed-
    /// size history ring) is shown instead of the editable line. Any edit
    /// key discards it and returns to `Normal`.
    History,
    /// An evaluation error is being displayed; any key returns to `Normal`
    /// and clears the line, per §4.2's "errors are dismissed by any key".
    Error,
    /// The settings menu (radians/degrees, auto-fractions, ...) is active.
    Settings,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal
    }
}
