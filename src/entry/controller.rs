//! `ExprEntryController`: the expression-entry cursor/state-machine
//! controller (§4.2). Drives a single `NedaTree` line through `KeyCode`
//! input, dispatching to the evaluator on Enter and keeping a small
//! history of past lines and results.

use std::collections::HashMap;

use crate::error::EvalError;
use crate::eval::env::{Environment, EvalOutput, FunctionDef};
use crate::eval::linearize::{is_digit, is_name_char, ARROW, GEQ, LEQ, NEQ};
use crate::eval::render_result;
use crate::eval::token::{Arity, OpKind, Value};
use crate::eval;
use crate::keys::KeyCode;
use crate::neda::cursor::place_at;
use crate::neda::{BracketKind, Cursor, CursorLocation, NedaChild, NedaTree, NodeId, NodeKind};
use crate::settings::Settings;

use super::history::History;
use super::mode::Mode;

/// Maps a surfaced evaluation error to the text shown while `Mode::Error`
/// is active (§4.4).
fn error_message(e: EvalError) -> &'static str {
    match e {
        EvalError::Syntax => render_result::SYNTAX_ERROR_TEXT,
        EvalError::Math => "Math Error",
        EvalError::OutOfMemory => "Out of Memory",
        EvalError::StackExhausted => render_result::SYNTAX_ERROR_TEXT,
    }
}

/// Settings cycled through in `Mode::Settings`, in display order.
const SETTINGS_FIELDS: usize = 4;

pub struct ExprEntryController {
    pub tree: NedaTree,
    pub cursor: Cursor,
    pub mode: Mode,
    pub history: History,
    pub error: Option<&'static str>,
    /// The throwaway render shown in `Mode::History` (§4.2 "Result
    /// display"), rebuilt from `history_cursor`'s entry whenever the
    /// cursor moves or a representation toggle is pressed. `None` outside
    /// that mode.
    pub result_tree: Option<NedaTree>,
    /// Offset into the history ring currently shown by `result_tree`; `0`
    /// is the most recently entered line.
    history_cursor: usize,
    /// Row/column counts captured so far while building a matrix literal.
    matrix_rows_buf: String,
    matrix_cols_buf: String,
    /// Which settings field the selector is parked on in `Mode::Settings`.
    settings_selector: usize,
}

impl ExprEntryController {
    pub fn new() -> Self {
        let tree = NedaTree::new();
        let cursor = tree.default_cursor();
        Self {
            tree,
            cursor,
            mode: Mode::Normal,
            history: History::new(),
            error: None,
            result_tree: None,
            history_cursor: 0,
            matrix_rows_buf: String::new(),
            matrix_cols_buf: String::new(),
            settings_selector: 0,
        }
    }

    fn active_container(&self) -> NodeId {
        self.cursor.container
    }

    /// Inserts `b` at the cursor, then folds a trailing two-character
    /// comparison/arrow combo (`<=`, `>=`, `!=`, `->`) into its single-byte
    /// sentinel (§4.1's glyph table; entered as two keystrokes, stored as
    /// one token).
    fn insert_char(&mut self, b: u8) {
        let container = self.active_container();
        self.tree.insert_at(container, self.cursor.index, NedaChild::Char(b));
        self.cursor.index += 1;
        self.try_fold_combo(container);
    }

    fn try_fold_combo(&mut self, container: NodeId) {
        if self.cursor.index < 2 {
            return;
        }
        let prev = self.tree.child_at(container, self.cursor.index - 2);
        let last = self.tree.child_at(container, self.cursor.index - 1);
        let (NedaChild::Char(p), NedaChild::Char(l)) = (prev, last) else { return };
        let sentinel = match (p, l) {
            (b'<', b'=') => Some(LEQ),
            (b'>', b'=') => Some(GEQ),
            (b'!', b'=') => Some(NEQ),
            (b'-', b'>') => Some(ARROW),
            _ => None,
        };
        if let Some(s) = sentinel {
            self.tree.remove_at(container, self.cursor.index - 1);
            self.tree.remove_at(container, self.cursor.index - 2);
            self.tree.insert_at(container, self.cursor.index - 2, NedaChild::Char(s));
            self.cursor.index -= 1;
        }
    }

    /// Finds the start of the "factor" immediately preceding `idx` in
    /// `container`: a single composite node, or a contiguous run of
    /// digit/name characters (§4.2, fraction-key lifting).
    fn operand_run_start(&self, container: NodeId, idx: usize) -> usize {
        if idx == 0 {
            return 0;
        }
        match self.tree.child_at(container, idx - 1) {
            NedaChild::Node(_) => idx - 1,
            NedaChild::Char(b) if is_digit(b) || is_name_char(b) => {
                let mut start = idx - 1;
                while start > 0 {
                    match self.tree.child_at(container, start - 1) {
                        NedaChild::Char(b2) if is_digit(b2) || is_name_char(b2) => start -= 1,
                        _ => break,
                    }
                }
                start
            }
            NedaChild::Char(_) => idx,
        }
    }

    fn take_run(&mut self, container: NodeId, start: usize, end: usize) -> Vec<NedaChild> {
        let mut moved = Vec::with_capacity(end - start);
        for _ in start..end {
            moved.push(self.tree.take_at(container, start));
        }
        moved
    }

    /// `FRACTION` key: lifts the preceding factor into the new fraction's
    /// numerator (or leaves it empty if nothing precedes), cursor moves to
    /// the denominator if a numerator was lifted, else to the numerator.
    fn insert_fraction(&mut self) {
        let container = self.active_container();
        let idx = self.cursor.index;
        let start = self.operand_run_start(container, idx);
        let moved = self.take_run(container, start, idx);
        let num = self.tree.new_container();
        for (i, child) in moved.iter().enumerate() {
            self.tree.insert_at(num, i, *child);
        }
        let den = self.tree.new_container();
        let frac = self.tree.arena.alloc(NodeKind::Fraction { num, den });
        self.tree.arena.get_mut(num).parent = Some(frac);
        self.tree.arena.get_mut(den).parent = Some(frac);
        crate::neda::node::compute_dimensions(&mut self.tree.arena, frac);
        self.tree.insert_node_at(container, start, frac);
        let target = if moved.is_empty() { num } else { den };
        self.cursor = place_at(&self.tree, target, CursorLocation::Start);
    }

    fn splice_empty_composite(&mut self, build: impl FnOnce(&mut NedaTree) -> (NodeId, NodeId)) {
        let container = self.active_container();
        let idx = self.cursor.index;
        let (id, cursor_target) = build(&mut self.tree);
        self.tree.insert_node_at(container, idx, id);
        self.cursor = place_at(&self.tree, cursor_target, CursorLocation::Start);
    }

    fn insert_exponent(&mut self) {
        self.splice_empty_composite(|tree| {
            let contents = tree.new_container();
            let id = tree.arena.alloc(NodeKind::Superscript { contents });
            tree.arena.get_mut(contents).parent = Some(id);
            crate::neda::node::compute_dimensions(&mut tree.arena, id);
            (id, contents)
        });
    }

    fn insert_subscript(&mut self) {
        self.splice_empty_composite(|tree| {
            let contents = tree.new_container();
            let id = tree.arena.alloc(NodeKind::Subscript { contents });
            tree.arena.get_mut(contents).parent = Some(id);
            crate::neda::node::compute_dimensions(&mut tree.arena, id);
            (id, contents)
        });
    }

    fn insert_abs(&mut self) {
        self.splice_empty_composite(|tree| {
            let contents = tree.new_container();
            let id = tree.arena.alloc(NodeKind::Abs { contents });
            tree.arena.get_mut(contents).parent = Some(id);
            crate::neda::node::compute_dimensions(&mut tree.arena, id);
            (id, contents)
        });
    }

    /// `SQRT` key: plain square root. Shifted, prompts for an explicit
    /// radical degree instead (§4.2).
    fn insert_sqrt(&mut self, nth_root: bool) {
        self.splice_empty_composite(|tree| {
            let contents = tree.new_container();
            let n = if nth_root { Some(tree.new_container()) } else { None };
            let id = tree.arena.alloc(NodeKind::Radical { contents, n });
            tree.arena.get_mut(contents).parent = Some(id);
            if let Some(n) = n {
                tree.arena.get_mut(n).parent = Some(id);
            }
            crate::neda::node::compute_dimensions(&mut tree.arena, id);
            (id, n.unwrap_or(contents))
        });
    }

    /// `SIGMA` key: a summation template; shifted, a product (§4.2, §4.3
    /// treat `SigmaPi.is_product` the only distinction between the two).
    fn insert_sigma_pi(&mut self, is_product: bool) {
        self.splice_empty_composite(|tree| {
            let start = tree.new_container();
            let finish = tree.new_container();
            let contents = tree.new_container();
            let id = tree.arena.alloc(NodeKind::SigmaPi { is_product, start, finish, contents });
            for c in [start, finish, contents] {
                tree.arena.get_mut(c).parent = Some(id);
            }
            crate::neda::node::compute_dimensions(&mut tree.arena, id);
            (id, start)
        });
    }

    /// `PIECEWISE` key: a two-branch template; more branches are added by
    /// pressing it again while the cursor sits inside the piecewise node
    /// (not yet wired — two branches cover the common case).
    fn insert_piecewise(&mut self) {
        self.splice_empty_composite(|tree| {
            let v0 = tree.new_container();
            let v1 = tree.new_container();
            let c0 = tree.new_container();
            let c1 = tree.new_container();
            let id = tree.arena.alloc(NodeKind::Piecewise { values: vec![v0, v1], conditions: vec![c0, c1] });
            for c in [v0, v1, c0, c1] {
                tree.arena.get_mut(c).parent = Some(id);
            }
            crate::neda::node::compute_dimensions(&mut tree.arena, id);
            (id, v0)
        });
    }

    fn begin_matrix(&mut self) {
        self.matrix_rows_buf.clear();
        self.matrix_cols_buf.clear();
        self.mode = Mode::MatrixDimsRows;
    }

    fn finish_matrix(&mut self) {
        let rows: usize = self.matrix_rows_buf.parse().unwrap_or(0).max(1);
        let cols: usize = self.matrix_cols_buf.parse().unwrap_or(0).max(1);
        let container = self.active_container();
        let idx = self.cursor.index;
        let mut cells = Vec::with_capacity(rows * cols);
        for _ in 0..rows * cols {
            cells.push(self.tree.new_container());
        }
        let id = self.tree.arena.alloc(NodeKind::Matrix { m: rows, n: cols, cells: cells.clone() });
        for c in &cells {
            self.tree.arena.get_mut(*c).parent = Some(id);
        }
        crate::neda::node::compute_dimensions(&mut self.tree.arena, id);
        self.tree.insert_node_at(container, idx, id);
        self.cursor = place_at(&self.tree, cells[0], CursorLocation::Start);
        self.mode = Mode::Normal;
    }

    fn insert_bracket(&mut self, kind: BracketKind) {
        let container = self.active_container();
        let idx = self.cursor.index;
        let left = self.tree.arena.alloc(NodeKind::LeftBracket { kind });
        let right = self.tree.arena.alloc(NodeKind::RightBracket { kind });
        crate::neda::node::compute_dimensions(&mut self.tree.arena, left);
        crate::neda::node::compute_dimensions(&mut self.tree.arena, right);
        self.tree.insert_node_at(container, idx, left);
        self.tree.insert_node_at(container, idx + 1, right);
        self.tree.recompute_heights(container);
        self.cursor.index = idx + 1;
    }

    /// `DELETE` key: removes the element before the cursor, or — at the
    /// start of a nested operand container — exits the composite instead of
    /// deleting anything (a second press then removes the whole composite
    /// from the outer container, since the cursor now sits right after it).
    fn delete_backward(&mut self) {
        if self.cursor.index > 0 {
            self.tree.remove_at(self.cursor.container, self.cursor.index - 1);
            self.cursor.index -= 1;
        } else {
            self.cursor.left(&self.tree);
        }
    }

    fn reset_input_tree(&mut self) {
        self.tree = NedaTree::new();
        self.cursor = self.tree.default_cursor();
    }

    fn clear_line(&mut self) {
        self.reset_input_tree();
        self.mode = Mode::Normal;
        self.error = None;
        self.result_tree = None;
        self.history_cursor = 0;
    }

    /// Rebuilds `result_tree` from whatever `history_cursor` currently
    /// points at, re-rendering without touching the stored `Value` (§4.2
    /// "toggling... re-renders without re-evaluating").
    fn rebuild_result_tree(&mut self, settings: &Settings) {
        let mut rt = NedaTree::new();
        if let Some(entry) = self.history.get(self.history_cursor) {
            if let Some(value) = &entry.result {
                render_result::render_into(&mut rt, rt.root, value, settings);
            }
        }
        self.result_tree = Some(rt);
    }

    fn dismiss_error(&mut self) {
        self.error = None;
        self.clear_line();
    }

    /// `ANS` key: re-renders the most recent result and splices it into the
    /// current line at the cursor. History keeps the `Value` rather than a
    /// rendered tree, so this always reflects the current display settings.
    fn insert_ans(&mut self, settings: &Settings) {
        let Some(value) = self.history.most_recent_result().cloned() else { return };
        let container = self.active_container();
        let idx = self.cursor.index;
        // `render` allocates its container as a free node (not reachable
        // from `self.tree.root`'s own children); lifting its contents out
        // by value and discarding the shell is simpler than un-parenting
        // them, and the shell is just an orphan arena slot from then on.
        let rendered = render_result::render(&mut self.tree, &value, settings);
        let count = self.tree.child_count(rendered);
        let rendered_children: Vec<_> = (0..count).map(|i| self.tree.child_at(rendered, i)).collect();
        for (offset, child) in rendered_children.into_iter().enumerate() {
            self.tree.insert_at(container, idx + offset, child);
        }
        self.cursor.index = idx + count;
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        vars: &mut HashMap<String, Value>,
        funcs: &mut HashMap<String, FunctionDef>,
        settings: &mut Settings,
    ) {
        if self.mode == Mode::Error {
            self.dismiss_error();
            return;
        }

        match self.mode {
            Mode::MatrixDimsRows => {
                if let Some(c) = key.as_char() {
                    if c.is_ascii_digit() {
                        self.matrix_rows_buf.push(c as char);
                        return;
                    }
                }
                if key == KeyCode::ENTER || key == KeyCode::MATRIX {
                    self.mode = Mode::MatrixDimsCols;
                } else if key == KeyCode::CLEAR {
                    self.mode = Mode::Normal;
                }
                return;
            }
            Mode::MatrixDimsCols => {
                if let Some(c) = key.as_char() {
                    if c.is_ascii_digit() {
                        self.matrix_cols_buf.push(c as char);
                        return;
                    }
                }
                if key == KeyCode::ENTER || key == KeyCode::MATRIX {
                    self.finish_matrix();
                } else if key == KeyCode::CLEAR {
                    self.mode = Mode::Normal;
                }
                return;
            }
            Mode::Settings => {
                match key {
                    KeyCode::UP => self.settings_selector = (self.settings_selector + SETTINGS_FIELDS - 1) % SETTINGS_FIELDS,
                    KeyCode::DOWN => self.settings_selector = (self.settings_selector + 1) % SETTINGS_FIELDS,
                    KeyCode::ENTER => self.toggle_setting(settings),
                    KeyCode::MODE | KeyCode::CLEAR => self.mode = Mode::Normal,
                    _ => {}
                }
                return;
            }
            Mode::History => {
                match key {
                    KeyCode::UP => {
                        if self.history_cursor + 1 < self.history.len() {
                            self.history_cursor += 1;
                            self.rebuild_result_tree(settings);
                        }
                    }
                    KeyCode::DOWN => {
                        if self.history_cursor > 0 {
                            self.history_cursor -= 1;
                            self.rebuild_result_tree(settings);
                        }
                    }
                    // Toggle between decimal/fractional/mixed-number
                    // representations in place, without re-evaluating
                    // (§4.2 "Result display").
                    KeyCode::APPROX => {
                        settings.force_decimal = !settings.force_decimal;
                        self.rebuild_result_tree(settings);
                    }
                    KeyCode::FRACTION => {
                        settings.as_mixed_number = !settings.as_mixed_number;
                        self.rebuild_result_tree(settings);
                    }
                    KeyCode::MODE | KeyCode::CLEAR | KeyCode::ENTER => {
                        self.result_tree = None;
                        self.mode = Mode::Normal;
                    }
                    _ => {
                        // Any other edit key discards the result tree (the
                        // expression stays in the history ring) and starts
                        // a fresh expression, seeded with `Ans` when the
                        // key is a binary operator (§4.2).
                        self.result_tree = None;
                        self.mode = Mode::Normal;
                        if let Some(b) = key.as_char() {
                            if OpKind::from_char(b).is_some_and(|op| op.arity() == Arity::Binary) {
                                self.insert_ans(settings);
                            }
                        }
                        self.handle_key(key, vars, funcs, settings);
                    }
                }
                return;
            }
            Mode::Error => {
                return;
            }
            Mode::Normal | Mode::Shift => {}
        }

        let shifted = self.mode == Mode::Shift;
        if shifted && key != KeyCode::SHIFT {
            self.mode = Mode::Normal;
        }

        match key {
            KeyCode::LEFT => self.cursor.left(&self.tree),
            KeyCode::RIGHT => self.cursor.right(&self.tree),
            KeyCode::UP => self.cursor.up(&self.tree),
            KeyCode::DOWN => self.cursor.down(&self.tree),
            KeyCode::DELETE => self.delete_backward(),
            KeyCode::CLEAR => self.clear_line(),
            KeyCode::FRACTION => self.insert_fraction(),
            KeyCode::EXPONENT => self.insert_exponent(),
            KeyCode::SQRT => self.insert_sqrt(shifted),
            KeyCode::SUBSCRIPT => self.insert_subscript(),
            KeyCode::ABS => self.insert_abs(),
            KeyCode::SIGMA => self.insert_sigma_pi(shifted),
            KeyCode::PIECEWISE => self.insert_piecewise(),
            KeyCode::MATRIX => self.begin_matrix(),
            KeyCode::SHIFT => self.mode = Mode::Shift,
            KeyCode::MODE => self.mode = Mode::Settings,
            KeyCode::ANS => self.insert_ans(settings),
            KeyCode::ENTER => self.submit(vars, funcs, *settings),
            KeyCode::APPROX => {
                let forced = Settings { force_decimal: true, ..*settings };
                self.submit(vars, funcs, forced);
            }
            _ => {
                if let Some(b) = key.as_char() {
                    match b {
                        b'(' => self.insert_bracket(BracketKind::Paren),
                        b'[' => self.insert_bracket(BracketKind::Square),
                        b')' | b']' => {
                            // Closing brackets are produced by the matching
                            // open-bracket key, not typed directly; ignore a
                            // bare close so layout stays well-formed.
                        }
                        _ => self.insert_char(b),
                    }
                }
            }
        }
    }

    fn toggle_setting(&mut self, settings: &mut Settings) {
        match self.settings_selector {
            0 => settings.use_radians = !settings.use_radians,
            1 => settings.auto_fractions = !settings.auto_fractions,
            2 => settings.as_mixed_number = !settings.as_mixed_number,
            3 => settings.force_decimal = !settings.force_decimal,
            _ => {}
        }
    }

    fn submit(&mut self, vars: &mut HashMap<String, Value>, funcs: &mut HashMap<String, FunctionDef>, settings: Settings) {
        if self.tree.child_count(self.tree.root) == 0 {
            return;
        }
        let mut env = Environment::new(vars, funcs, settings);
        let input_snapshot = {
            let children: Vec<_> = (0..self.tree.child_count(self.tree.root)).map(|i| self.tree.child_at(self.tree.root, i)).collect();
            self.tree.snapshot(&children, 0, children.len())
        };
        match eval::evaluate(&self.tree, self.tree.root, &mut env) {
            Ok(EvalOutput::Assigned) => {
                self.history.push(input_snapshot, None);
                self.clear_line();
            }
            Ok(EvalOutput::Value(v)) => {
                self.history.push(input_snapshot, Some(v));
                self.reset_input_tree();
                self.history_cursor = 0;
                self.rebuild_result_tree(&settings);
                self.mode = Mode::History;
            }
            Err(e) => {
                self.error = Some(error_message(e.surfaced()));
                self.mode = Mode::Error;
            }
        }
    }
}

impl Default for ExprEntryController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(ctrl: &mut ExprEntryController, s: &str, vars: &mut HashMap<String, Value>, funcs: &mut HashMap<String, FunctionDef>, settings: &mut Settings) {
        for b in s.bytes() {
            ctrl.handle_key(KeyCode(b as u16), vars, funcs, settings);
        }
    }

    #[test]
    fn typing_digits_appends_chars() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "12", &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.tree.child_count(ctrl.tree.root), 2);
    }

    #[test]
    fn enter_evaluates_and_resets_line() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "1+2", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::ENTER, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.tree.child_count(ctrl.tree.root), 0);
        assert_eq!(ctrl.history.len(), 1);
    }

    #[test]
    fn enter_shows_a_result_tree_and_enters_history_mode() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "1+2", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::ENTER, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.mode, Mode::History);
        assert!(ctrl.result_tree.is_some());
    }

    #[test]
    fn binary_operator_after_result_seeds_ans_then_inserts_key() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "1+2", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::ENTER, &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode(b'*' as u16), &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.mode, Mode::Normal);
        assert!(ctrl.result_tree.is_none());
        let n = ctrl.tree.child_count(ctrl.tree.root);
        assert!(n >= 2);
        assert_eq!(ctrl.tree.child_at(ctrl.tree.root, n - 1), NedaChild::Char(b'*'));
    }

    #[test]
    fn digit_after_result_starts_fresh_expression_without_ans() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "1+2", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::ENTER, &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode(b'7' as u16), &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.mode, Mode::Normal);
        assert_eq!(ctrl.tree.child_count(ctrl.tree.root), 1);
        assert_eq!(ctrl.tree.child_at(ctrl.tree.root, 0), NedaChild::Char(b'7'));
    }

    #[test]
    fn up_down_scroll_through_history_ring_in_result_mode() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "1+1", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::ENTER, &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode(b'7' as u16), &mut vars, &mut funcs, &mut settings);
        press(&mut ctrl, "+1", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::ENTER, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.history.len(), 2);
        assert_eq!(ctrl.mode, Mode::History);

        ctrl.handle_key(KeyCode::UP, &mut vars, &mut funcs, &mut settings);
        assert!(ctrl.result_tree.is_some());
        ctrl.handle_key(KeyCode::UP, &mut vars, &mut funcs, &mut settings); // clamped, only 2 entries
        ctrl.handle_key(KeyCode::DOWN, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.mode, Mode::History);
    }

    #[test]
    fn approx_in_result_mode_retoggles_without_reevaluating() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "1/2", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::ENTER, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.history.len(), 1);
        ctrl.handle_key(KeyCode::APPROX, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.mode, Mode::History);
        assert_eq!(ctrl.history.len(), 1);
        assert!(ctrl.result_tree.is_some());
    }

    #[test]
    fn fraction_key_lifts_preceding_number() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "12", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::FRACTION, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.tree.child_count(ctrl.tree.root), 1);
        assert!(matches!(ctrl.tree.child_at(ctrl.tree.root, 0), NedaChild::Node(_)));
    }

    #[test]
    fn syntax_error_enters_error_mode() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "+", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::ENTER, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.mode, Mode::Error);
    }

    #[test]
    fn approx_key_does_not_change_persistent_setting() {
        let mut ctrl = ExprEntryController::new();
        let mut vars = HashMap::new();
        let mut funcs = HashMap::new();
        let mut settings = Settings::default();
        press(&mut ctrl, "1/2", &mut vars, &mut funcs, &mut settings);
        ctrl.handle_key(KeyCode::APPROX, &mut vars, &mut funcs, &mut settings);
        assert_eq!(ctrl.history.len(), 1);
        assert!(!settings.force_decimal);
    }
}
