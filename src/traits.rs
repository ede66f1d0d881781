//! The engine contract shared by the heap implementations.
//!
//! An [`Engine`] is the structural state of one heap (its root or root ring
//! and its size) whose nodes live in an arena owned elsewhere. The container
//! in [`crate::heaps`] owns the arena, validates caller input, resolves heap
//! ownership, and then delegates to the engine. Engines therefore assume their
//! preconditions hold and panic on a broken structure rather than returning
//! errors.
//!
//! Two engines implement the contract:
//!
//! - [`FibonacciEngine`](crate::fibonacci::FibonacciEngine): root ring with
//!   consolidation and cascading cuts
//! - [`PairingEngine`](crate::pairing::PairingEngine): single root with the
//!   two-pass combine

use crate::compare::{Comparator, KeyOrder};
use crate::error::InvariantError;
use crate::storage::{Arena, NodeKey};

/// Key and value storage common to every node layout.
pub trait HeapNode<K, V> {
    /// The node's key.
    fn key(&self) -> &K;

    /// The node's value.
    fn value(&self) -> &V;

    /// Mutable access to the node's value.
    fn value_mut(&mut self) -> &mut V;

    /// Consumes the node, returning its key and value.
    fn into_entry(self) -> (K, V);
}

/// Structural operations of one heap over a shared node arena.
///
/// Every method receiving a [`KeyOrder`] must use it for all key comparisons;
/// the order belongs to the heap, not to the engine.
pub trait Engine<K: Ord, V>: Default {
    /// The engine's private node layout.
    type Node: HeapNode<K, V>;

    /// Number of elements in the heap.
    fn len(&self) -> usize;

    /// Returns true if the heap holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key of the node holding the minimum, if any.
    ///
    /// # Time Complexity
    /// O(1)
    fn min(&self) -> Option<NodeKey>;

    /// Allocates a node in `nodes` and adds it to the heap.
    ///
    /// # Time Complexity
    /// O(1)
    fn insert<C: Comparator<K>>(
        &mut self,
        nodes: &mut Arena<Self::Node>,
        order: KeyOrder<'_, C>,
        key: K,
        value: V,
    ) -> NodeKey;

    /// Removes the minimum node from the heap and the arena.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    fn delete_min<C: Comparator<K>>(
        &mut self,
        nodes: &mut Arena<Self::Node>,
        order: KeyOrder<'_, C>,
    ) -> Option<Self::Node>;

    /// Replaces the key of `node` with `new_key` and restores heap order.
    ///
    /// `node` must belong to this heap and `new_key` must not compare greater
    /// than the current key; the container checks both.
    ///
    /// # Time Complexity
    /// - Fibonacci: O(1) amortized
    /// - Pairing: O(log n) amortized
    fn decrease_key<C: Comparator<K>>(
        &mut self,
        nodes: &mut Arena<Self::Node>,
        order: KeyOrder<'_, C>,
        node: NodeKey,
        new_key: K,
    );

    /// Removes an arbitrary node of this heap from the heap and the arena.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    fn delete<C: Comparator<K>>(
        &mut self,
        nodes: &mut Arena<Self::Node>,
        order: KeyOrder<'_, C>,
        node: NodeKey,
    ) -> Self::Node;

    /// Moves every node of `other` into this heap, leaving `other` empty.
    ///
    /// Both heaps must order keys the same way.
    ///
    /// # Time Complexity
    /// O(1)
    fn meld<C: Comparator<K>>(
        &mut self,
        other: &mut Self,
        nodes: &mut Arena<Self::Node>,
        order: KeyOrder<'_, C>,
    );

    /// Keys of every node reachable from the heap's root(s).
    fn reachable(&self, nodes: &Arena<Self::Node>) -> Vec<NodeKey>;

    /// Removes every node of the heap from the arena and resets the heap.
    ///
    /// # Time Complexity
    /// O(n)
    fn clear(&mut self, nodes: &mut Arena<Self::Node>) {
        for key in self.reachable(nodes) {
            nodes.remove(key);
        }
        *self = Self::default();
    }

    /// Checks heap order, link symmetry, and size bookkeeping.
    fn validate<C: Comparator<K>>(
        &self,
        nodes: &Arena<Self::Node>,
        order: KeyOrder<'_, C>,
    ) -> Result<(), InvariantError>;
}
