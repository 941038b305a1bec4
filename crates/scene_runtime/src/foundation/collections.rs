//! Specialized collection types
//!
//! The component tree stores nodes in a slot map arena: children reference
//! each other by key, and a parent key is a weak, lookup-only handle. Keys
//! stay valid across insertions and removals of unrelated nodes.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a node in the component arena
    pub struct NodeId;
}

/// Arena storage keyed by [`NodeId`]
pub type NodeArena<T> = SlotMap<NodeId, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_keys_survive_unrelated_removal() {
        let mut arena: NodeArena<&str> = NodeArena::with_key();
        let a = arena.insert("a");
        let b = arena.insert("b");
        arena.remove(a);
        assert_eq!(arena.get(b), Some(&"b"));
        assert!(arena.get(a).is_none());
    }
}
