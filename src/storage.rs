//! Arena storage for heap nodes.
//!
//! Every node of every heap in a container lives in one [`Arena`], a
//! [`SlotMap`] keyed by [`NodeKey`]. Tree links (parent, child, sibling ring)
//! are plain keys into that arena, so cyclic structures such as the Fibonacci
//! sibling ring need neither reference counting nor raw pointers, and the
//! arena is the single owner of every node.
//!
//! # Characteristics
//! - Contiguous memory allocation (better cache locality)
//! - Generational keys detect stale references: once a node is removed its
//!   key never resolves again, even if the slot is reused
//! - Melding heaps that share an arena moves no nodes
//!
//! Indexing an arena with a key that is not present panics. Engines only
//! follow keys stored in live nodes, so such a panic is a structural fault,
//! never a caller error.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key of a node in an [`Arena`]
    pub struct NodeKey;
}

/// Node arena shared by all heaps of one container.
pub type Arena<N> = SlotMap<NodeKey, N>;

/// Removes `key` from the arena, failing fast if the node is missing.
///
/// # Panics
///
/// Panics if `key` is stale. Callers only pass keys reached through live
/// links, so a miss means the structure is corrupted.
#[inline]
pub(crate) fn take_node<N>(nodes: &mut Arena<N>, key: NodeKey) -> N {
    match nodes.remove(key) {
        Some(node) => node,
        None => panic!("heap structure corrupted: dangling node key {key:?}"),
    }
}
