//! Scope manager (symbol table)
//!
//! Bindings live in an append-only arena for the whole analysis. Each scope
//! level is a fresh map from name to arena index, created by `enter_scope`
//! and discarded by `exit_scope`, so sibling blocks never observe each
//! other's declarations while callables keep valid parameter indices.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::binding::{Binding, BindingId, Kind};
use crate::types::Type;

/// Names and signatures of the conversion functions every program sees
pub const BUILTINS: [(&str, Type, Type); 4] = [
    ("REAL2INT", Type::Real, Type::Integer),
    ("INT2REAL", Type::Integer, Type::Real),
    ("INT2STRING", Type::Integer, Type::String),
    ("REAL2STRING", Type::Real, Type::String),
];

#[derive(Debug, Clone)]
pub struct ScopeManager {
    bindings: Vec<Binding>,
    levels: Vec<HashMap<String, BindingId>>,
    trace: bool,
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeManager {
    /// Create a manager holding only the empty program-wide level 0
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            levels: vec![HashMap::new()],
            trace: false,
        }
    }

    /// Log scope operations at trace level
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn enter_scope(&mut self) {
        self.levels.push(HashMap::new());
        if self.trace {
            tracing::trace!(level = self.current_level(), "enter scope");
        }
    }

    /// Pop the current level. Its bindings stay in the arena but can no
    /// longer be found by name. Level 0 is never popped.
    pub fn exit_scope(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
        if self.trace {
            tracing::trace!(level = self.current_level(), "exit scope");
        }
    }

    /// Active nesting depth, 0 being the whole-program scope
    pub fn current_level(&self) -> usize {
        self.levels.len() - 1
    }

    /// Insert `binding` into the current level.
    ///
    /// Returns the arena index and whether the name was previously absent at
    /// this level. On a duplicate the earlier binding stays visible and the
    /// new one is only kept in the arena.
    pub fn declare(&mut self, binding: Binding) -> (BindingId, bool) {
        let id = BindingId(self.bindings.len());
        let name = binding.name().to_string();
        if self.trace {
            tracing::trace!(level = self.current_level(), binding = %binding, "declare");
        }
        self.bindings.push(binding);

        let fresh = match self.levels.last_mut() {
            Some(level) if !level.contains_key(&name) => {
                level.insert(name, id);
                true
            }
            _ => false,
        };
        (id, fresh)
    }

    /// Innermost binding visible under `name`
    pub fn lookup_id(&self, name: &str) -> Option<BindingId> {
        self.levels
            .iter()
            .rev()
            .find_map(|level| level.get(name).copied())
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.lookup_id(name).map(|id| self.get(id))
    }

    /// Binding behind an index handed out by `declare`
    pub fn get(&self, id: BindingId) -> &Binding {
        &self.bindings[id.0]
    }

    pub fn get_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id.0]
    }

    /// Declare a one-argument function at level 0.
    ///
    /// The parameter is named after the `value` keyword so it can never
    /// collide with a user identifier.
    pub fn predefine_builtin(&mut self, name: &str, argument: Type, returns: Type) -> BindingId {
        let param_id = BindingId(self.bindings.len());
        self.bindings
            .push(Binding::new("VALUE", argument, Kind::ValueParameter, 1));

        let id = BindingId(self.bindings.len());
        self.bindings
            .push(Binding::function(name, 0, vec![param_id], returns));
        self.levels[0].insert(name.to_string(), id);
        id
    }

    /// Declare all of [`BUILTINS`]
    pub fn predefine_builtins(&mut self) {
        for (name, argument, returns) in BUILTINS {
            self.predefine_builtin(name, argument, returns);
        }
    }

    /// Every binding ever declared, in declaration order
    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &Binding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(i, binding)| (BindingId(i), binding))
    }

    /// Bindings declared under `name` at any level, live or not
    pub fn bindings_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Binding> + 'a {
        self.bindings.iter().filter(move |b| b.name() == name)
    }

    /// Render the visible levels, innermost last
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (depth, level) in self.levels.iter().enumerate() {
            let _ = writeln!(out, "SCOPE {depth}:");
            if level.is_empty() {
                out.push_str("  <EMPTY>\n");
                continue;
            }
            let mut ids: Vec<BindingId> = level.values().copied().collect();
            ids.sort();
            for id in ids {
                let _ = writeln!(out, "  {}", self.get(id));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, ty: Type, level: usize) -> Binding {
        Binding::new(name, ty, Kind::Variable, level)
    }

    #[test]
    fn test_levels() {
        let mut scopes = ScopeManager::new();
        assert_eq!(scopes.current_level(), 0);
        scopes.enter_scope();
        scopes.enter_scope();
        assert_eq!(scopes.current_level(), 2);
        scopes.exit_scope();
        assert_eq!(scopes.current_level(), 1);
    }

    #[test]
    fn test_exit_at_level_zero_is_noop() {
        let mut scopes = ScopeManager::new();
        scopes.exit_scope();
        assert_eq!(scopes.current_level(), 0);
    }

    #[test]
    fn test_shadowing() {
        let mut scopes = ScopeManager::new();
        scopes.declare(var("X", Type::Integer, 0));
        scopes.enter_scope();
        scopes.declare(var("X", Type::Real, 1));
        assert_eq!(scopes.lookup("X").map(Binding::ty), Some(Type::Real));
        scopes.exit_scope();
        assert_eq!(scopes.lookup("X").map(Binding::ty), Some(Type::Integer));
    }

    #[test]
    fn test_lookup_reaches_outer_levels() {
        let mut scopes = ScopeManager::new();
        scopes.declare(var("OUTER", Type::Boolean, 0));
        scopes.enter_scope();
        scopes.enter_scope();
        assert_eq!(scopes.lookup("OUTER").map(Binding::level), Some(0));
        assert!(scopes.lookup("MISSING").is_none());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut scopes = ScopeManager::new();
        let (first, fresh) = scopes.declare(var("X", Type::Integer, 0));
        assert!(fresh);
        let (second, fresh) = scopes.declare(var("X", Type::String, 0));
        assert!(!fresh);
        assert_ne!(first, second);
        assert_eq!(scopes.lookup_id("X"), Some(first));
        assert_eq!(scopes.bindings_named("X").count(), 2);
    }

    #[test]
    fn test_sibling_scopes_do_not_leak() {
        let mut scopes = ScopeManager::new();
        scopes.enter_scope();
        scopes.declare(var("LOCAL", Type::Integer, 1));
        scopes.exit_scope();
        scopes.enter_scope();
        assert!(scopes.lookup("LOCAL").is_none());
        let (_, fresh) = scopes.declare(var("LOCAL", Type::Real, 1));
        assert!(fresh);
    }

    #[test]
    fn test_builtins() {
        let mut scopes = ScopeManager::new();
        scopes.predefine_builtins();
        let int2real = scopes.lookup("INT2REAL").unwrap();
        assert_eq!(int2real.ty(), Type::Function);
        assert_eq!(int2real.level(), 0);
        assert_eq!(int2real.return_type(), Ok(Type::Real));

        let params = int2real.parameters().unwrap();
        assert_eq!(params.len(), 1);
        let param = scopes.get(params[0]);
        assert_eq!(param.ty(), Type::Integer);
        assert_eq!(param.kind(), Kind::ValueParameter);

        // Parameters of built-ins are not visible by name
        assert!(scopes.lookup("VALUE").is_none());
    }

    #[test]
    fn test_builtins_visible_from_nested_levels() {
        let mut scopes = ScopeManager::new();
        scopes.predefine_builtins();
        scopes.enter_scope();
        scopes.enter_scope();
        for (name, _, returns) in BUILTINS {
            assert_eq!(scopes.lookup(name).unwrap().return_type(), Ok(returns));
        }
    }

    #[test]
    fn test_dump() {
        let mut scopes = ScopeManager::new();
        scopes.declare(var("A", Type::Integer, 0));
        scopes.enter_scope();
        let dump = scopes.dump();
        assert!(dump.contains("SCOPE 0:\n  A : variable integer (level 0)"));
        assert!(dump.contains("SCOPE 1:\n  <EMPTY>"));
    }
}
