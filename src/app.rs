//! Top-level application state: the pieces that outlive a single entered
//! line (variables, user functions, display settings) plus the entry
//! controller that owns the line currently being edited (§4.2, §4.3).

use std::collections::HashMap;

use crate::entry::ExprEntryController;
use crate::eval::env::FunctionDef;
use crate::eval::token::Value;
use crate::keys::KeyCode;
use crate::settings::Settings;

pub struct App {
    pub entry: ExprEntryController,
    pub vars: HashMap<String, Value>,
    pub funcs: HashMap<String, FunctionDef>,
    pub settings: Settings,
    /// Set once by the run loop when the user asks to quit; checked each
    /// iteration instead of unwinding out of `handle_key`.
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            entry: ExprEntryController::new(),
            vars: HashMap::new(),
            funcs: HashMap::new(),
            settings: Settings::default(),
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        self.entry.handle_key(key, &mut self.vars, &mut self.funcs, &mut self.settings);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_expression_evaluates_into_history() {
        let mut app = App::new();
        for b in "2+2".bytes() {
            app.handle_key(KeyCode(b as u16));
        }
        app.handle_key(KeyCode::ENTER);
        assert_eq!(app.entry.history.len(), 1);
    }

    #[test]
    fn assignment_persists_a_variable() {
        let mut app = App::new();
        for b in "x=5".bytes() {
            app.handle_key(KeyCode(b as u16));
        }
        app.handle_key(KeyCode::ENTER);
        assert!(app.vars.contains_key("x"));
    }
}
