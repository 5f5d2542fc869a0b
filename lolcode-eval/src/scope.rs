//! Arena-indexed execution contexts.
//!
//! A `Context` is a symbol table plus a parent link, generalized from the
//! teacher's scope-rib arena: rather than binding names to a separate
//! `DefId` and looking the definition up elsewhere, a tree-walking
//! interpreter's context can just hold the `Value` directly.

use indexmap::IndexMap;

use lolcode_util::{define_index_type, index_vec::IndexVec};

use crate::value::Value;

define_index_type!(ContextId);

pub struct Context {
    // `IndexMap`, not a plain hash map: the root context doubles as the
    // frontend's symbol-table view, and a table widget reads nicer when
    // rows stay in declaration/assignment order instead of hash order.
    table: IndexMap<String, Value>,
    parent: Option<ContextId>,
}

/// Owns every context created during a run — the root plus one per
/// function call — addressed by small `Copy` handles so closures and
/// nested calls never fight the borrow checker over parent references.
pub struct ContextArena {
    contexts: IndexVec<ContextId, Context>,
}

impl ContextArena {
    /// Creates the arena with its root context already pushed.
    pub fn new() -> (Self, ContextId) {
        let mut contexts = IndexVec::new();
        let root = contexts.push(Context {
            table: IndexMap::new(),
            parent: None,
        });
        (ContextArena { contexts }, root)
    }

    /// Pushes a new child context whose parent is `parent` — used both for
    /// block-local scoping (loop/if/switch bodies share the enclosing
    /// table in this interpreter, so only function calls push a child)
    /// and for a function call's activation record.
    pub fn push_child(&mut self, parent: ContextId) -> ContextId {
        self.contexts.push(Context {
            table: IndexMap::new(),
            parent: Some(parent),
        })
    }

    /// Binds `name` in `ctx`'s own table. Writes never search the parent
    /// chain — `R` always lands in the current context, matching the
    /// interpreter's reference behavior.
    pub fn set(&mut self, ctx: ContextId, name: &str, value: Value) {
        self.contexts[ctx].table.insert(name.to_string(), value);
    }

    /// Looks up `name`, walking the parent chain on miss.
    pub fn get(&self, ctx: ContextId, name: &str) -> Option<&Value> {
        let mut current = Some(ctx);
        while let Some(id) = current {
            let context = &self.contexts[id];
            if let Some(value) = context.table.get(name) {
                return Some(value);
            }
            current = context.parent;
        }
        None
    }

    /// `true` if `name` is bound in `ctx`'s own table, ignoring parents.
    pub fn found(&self, ctx: ContextId, name: &str) -> bool {
        self.contexts[ctx].table.contains_key(name)
    }

    /// Removes `name` from `ctx`'s own table, returning its prior value.
    pub fn remove(&mut self, ctx: ContextId, name: &str) -> Option<Value> {
        self.contexts[ctx].table.remove(name)
    }

    /// The final root table as a name→value mapping, for frontend display.
    pub fn snapshot(&self, ctx: ContextId) -> Vec<(String, Value)> {
        self.contexts[ctx]
            .table
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Default for ContextArena {
    fn default() -> Self {
        ContextArena::new().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_walks_the_parent_chain() {
        let (mut arena, root) = ContextArena::new();
        arena.set(root, "IT", Value::integer(1));
        let child = arena.push_child(root);
        assert_eq!(arena.get(child, "IT").unwrap().printable(), "1");
    }

    #[test]
    fn set_only_binds_in_the_current_context() {
        let (mut arena, root) = ContextArena::new();
        let child = arena.push_child(root);
        arena.set(child, "X", Value::integer(5));
        assert!(!arena.found(root, "X"));
        assert!(arena.found(child, "X"));
    }

    #[test]
    fn child_does_not_leak_into_parent_on_shadow() {
        let (mut arena, root) = ContextArena::new();
        arena.set(root, "X", Value::integer(1));
        let child = arena.push_child(root);
        arena.set(child, "X", Value::integer(2));
        assert_eq!(arena.get(root, "X").unwrap().printable(), "1");
        assert_eq!(arena.get(child, "X").unwrap().printable(), "2");
    }

    #[test]
    fn remove_drops_a_local_binding_and_returns_its_prior_value() {
        let (mut arena, root) = ContextArena::new();
        arena.set(root, "X", Value::integer(7));
        let removed = arena.remove(root, "X");
        assert_eq!(removed.map(|v| v.printable()), Some("7".to_string()));
        assert!(!arena.found(root, "X"));
    }
}
