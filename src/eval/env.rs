//! `Environment = (vars, funcs, args)` threaded through evaluation (§4.3).

use std::collections::HashMap;

use crate::error::{EvalError, EvalResult};
use crate::neda::NedaTree;
use crate::settings::Settings;

use super::token::Value;

#[derive(Debug)]
pub struct FunctionDef {
    pub argv: Vec<String>,
    /// A freestanding snapshot tree holding the function body expression,
    /// detached from whichever entry-controller line defined it (§4.3).
    pub body_tree: NedaTree,
    pub display_name: String,
}

impl Clone for FunctionDef {
    fn clone(&self) -> Self {
        let children: Vec<_> = (0..self.body_tree.child_count(self.body_tree.root))
            .map(|i| self.body_tree.child_at(self.body_tree.root, i))
            .collect();
        let body_tree = self.body_tree.snapshot(&children, 0, children.len());
        Self { argv: self.argv.clone(), body_tree, display_name: self.display_name.clone() }
    }
}

/// Recursion/iteration guard standing in for the original's stack-pointer
/// check (§4.3 "Stack safety"); Rust has no portable stack-pointer
/// introspection, so an explicit depth counter threaded through the
/// environment plays the same role.
pub const MAX_RECURSION: u32 = 256;

pub struct Environment<'a> {
    pub vars: &'a mut HashMap<String, Value>,
    pub funcs: &'a mut HashMap<String, FunctionDef>,
    /// Scoped stack of argument/counter bindings for the function or
    /// summation currently evaluating.
    pub args: Vec<(String, Value)>,
    pub settings: Settings,
    pub depth: u32,
}

impl<'a> Environment<'a> {
    pub fn new(vars: &'a mut HashMap<String, Value>, funcs: &'a mut HashMap<String, FunctionDef>, settings: Settings) -> Self {
        Self { vars, funcs, args: Vec::new(), settings, depth: 0 }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.args.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v.clone()).or_else(|| self.vars.get(name).cloned())
    }

    pub fn enter(&mut self) -> EvalResult<()> {
        self.depth += 1;
        if self.depth > MAX_RECURSION {
            return Err(EvalError::StackExhausted);
        }
        Ok(())
    }

    pub fn exit(&mut self) {
        self.depth -= 1;
    }
}

/// The outcome of evaluating a top-level input: either a plain value, or a
/// successful assignment (which returns a sentinel per §4.3 so the caller
/// can distinguish it from "no value").
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutput {
    Value(Value),
    Assigned,
}

pub type ArenaRef<'t> = &'t NedaTree;
