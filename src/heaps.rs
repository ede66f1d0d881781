//! Addressable, meldable heaps sharing one node arena
//!
//! [`MeldableHeaps`] is a family of heaps of one engine type. All their nodes
//! live in a single arena, so melding two heaps of the family splices their
//! structures in O(1) without moving any node, and a [`Handle`] stays valid
//! across any number of melds.
//!
//! A meld consumes its source: the source becomes empty, stops accepting
//! inserts and melds, and forwards to the destination. Handle operations
//! resolve the live owner through the chain of forwards (see
//! [`crate::ownership`]), so a handle issued by a consumed heap acts on the
//! heap that now holds its element.
//!
//! # Example
//!
//! ```rust
//! use meldable_heaps::FibonacciHeaps;
//!
//! let mut heaps: FibonacciHeaps<i32, &str> = FibonacciHeaps::new();
//! let a = heaps.create_heap();
//! let b = heaps.create_heap();
//!
//! heaps.insert(a, 10, "ten").unwrap();
//! let h = heaps.insert(b, 14, "fourteen").unwrap();
//!
//! heaps.meld(a, b).unwrap();
//! assert_eq!(heaps.len(a), 2);
//! assert!(heaps.insert(b, 1, "rejected").is_err());
//!
//! // The handle issued by `b` now acts on `a`
//! heaps.decrease_key(&h, 9).unwrap();
//! assert_eq!(heaps.peek(a), Some((&9, &"fourteen")));
//! ```

use crate::compare::{Comparator, FnComparator, KeyOrder};
use crate::error::{HeapError, InvariantError};
use crate::fibonacci::FibonacciEngine;
use crate::ownership::{HeapId, Owners};
use crate::pairing::PairingEngine;
use crate::storage::{Arena, NodeKey};
use crate::traits::{Engine, HeapNode};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_FAMILY: AtomicU64 = AtomicU64::new(0);

/// Handle to an element inserted into a [`MeldableHeaps`] family
///
/// Records the heap that issued it. The element's current heap is resolved on
/// every use, so the handle survives melds unchanged.
///
/// Once the element is extracted, deleted, or cleared, every operation on the
/// handle fails with [`HeapError::InvalidHandle`]. This includes [`key`] and
/// [`value`]: [`delete`] and [`delete_min`] move the key and value out to the
/// caller, so nothing is left behind to read.
///
/// A handle belongs to the family that issued it. Passing it to any other
/// family fails with [`HeapError::InvalidHandle`] and changes nothing.
///
/// [`key`]: MeldableHeaps::key
/// [`value`]: MeldableHeaps::value
/// [`delete`]: MeldableHeaps::delete
/// [`delete_min`]: MeldableHeaps::delete_min
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    family: u64,
    origin: HeapId,
    node: NodeKey,
}

impl Handle {
    /// The heap this handle was issued by.
    pub fn origin(&self) -> HeapId {
        self.origin
    }
}

struct HeapSlot<E, C> {
    engine: E,
    comparator: Option<C>,
}

/// A family of meldable heaps backed by engine `E`
///
/// `C` is the comparator type heaps of this family may be created with; heaps
/// created without one use the natural order of `K`.
pub struct MeldableHeaps<K: Ord, V, E: Engine<K, V>, C = FnComparator<K>> {
    family: u64,
    nodes: Arena<E::Node>,
    heaps: Vec<HeapSlot<E, C>>,
    owners: Owners,
    _marker: PhantomData<fn() -> (K, V)>,
}

/// Heaps backed by the Fibonacci engine
pub type FibonacciHeaps<K, V, C = FnComparator<K>> = MeldableHeaps<K, V, FibonacciEngine<K, V>, C>;

/// Heaps backed by the pairing engine
pub type PairingHeaps<K, V, C = FnComparator<K>> = MeldableHeaps<K, V, PairingEngine<K, V>, C>;

impl<K: Ord, V, E: Engine<K, V>, C: Comparator<K>> MeldableHeaps<K, V, E, C> {
    /// Creates a family with no heaps.
    pub fn new() -> Self {
        Self {
            family: NEXT_FAMILY.fetch_add(1, AtomicOrdering::Relaxed),
            nodes: Arena::with_key(),
            heaps: Vec::new(),
            owners: Owners::new(),
            _marker: PhantomData,
        }
    }

    /// Creates an empty heap ordered by the natural order of `K`.
    pub fn create_heap(&mut self) -> HeapId {
        self.register(None)
    }

    /// Creates an empty heap ordered by `comparator`.
    pub fn create_heap_with(&mut self, comparator: C) -> HeapId {
        self.register(Some(comparator))
    }

    fn register(&mut self, comparator: Option<C>) -> HeapId {
        let custom_order = comparator.is_some();
        let id = self.owners.add();
        self.heaps.push(HeapSlot {
            engine: E::default(),
            comparator,
        });
        tracing::debug!(heap = %id, custom_order, "created heap");
        id
    }

    /// Number of heaps ever created in this family, consumed ones included.
    pub fn heap_count(&self) -> usize {
        self.heaps.len()
    }

    /// Number of elements in `heap`. Consumed and unknown heaps report 0.
    pub fn len(&self, heap: HeapId) -> usize {
        self.heaps.get(heap.index()).map_or(0, |slot| slot.engine.len())
    }

    /// Returns true if `heap` holds no elements.
    pub fn is_empty(&self, heap: HeapId) -> bool {
        self.len(heap) == 0
    }

    /// Number of elements across all heaps of the family.
    pub fn total_len(&self) -> usize {
        self.nodes.len()
    }

    /// The comparator `heap` was created with, if any.
    pub fn comparator(&self, heap: HeapId) -> Option<&C> {
        self.heaps
            .get(heap.index())
            .and_then(|slot| slot.comparator.as_ref())
    }

    /// Returns true if `heap` was not consumed by a meld.
    pub fn is_live(&self, heap: HeapId) -> bool {
        self.owners.is_live(heap)
    }

    fn ensure_live(&self, heap: HeapId) -> Result<(), HeapError> {
        if !self.owners.contains(heap) {
            return Err(HeapError::UnknownHeap);
        }
        if !self.owners.is_live(heap) {
            tracing::debug!(heap = %heap, "rejected operation on consumed heap");
            return Err(HeapError::HeapConsumed);
        }
        Ok(())
    }

    /// Inserts `key` with `value` into `heap`, returning a handle to the element.
    ///
    /// # Errors
    /// - [`HeapError::HeapConsumed`] if `heap` was melded into another heap
    /// - [`HeapError::UnknownHeap`] if `heap` does not belong to this family
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, heap: HeapId, key: K, value: V) -> Result<Handle, HeapError> {
        self.ensure_live(heap)?;
        let slot = &mut self.heaps[heap.index()];
        let order = KeyOrder::new(slot.comparator.as_ref());
        let node = slot.engine.insert(&mut self.nodes, order, key, value);
        Ok(self.issue(heap, node))
    }

    /// Returns a handle to the minimum element of `heap`.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if `heap` has no elements.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn find_min(&self, heap: HeapId) -> Result<Handle, HeapError> {
        let slot = self
            .heaps
            .get(heap.index())
            .ok_or(HeapError::UnknownHeap)?;
        let node = slot.engine.min().ok_or(HeapError::EmptyHeap)?;
        Ok(self.issue(heap, node))
    }

    fn issue(&self, origin: HeapId, node: NodeKey) -> Handle {
        Handle {
            family: self.family,
            origin,
            node,
        }
    }

    /// Arena key of the element behind `handle`, if it was issued here and is
    /// still present.
    fn node_of(&self, handle: &Handle) -> Result<NodeKey, HeapError> {
        if handle.family != self.family {
            tracing::debug!(heap = %handle.origin, "rejected handle from another family");
            return Err(HeapError::InvalidHandle);
        }
        if !self.nodes.contains_key(handle.node) {
            return Err(HeapError::InvalidHandle);
        }
        Ok(handle.node)
    }

    /// Returns the minimum key and its value without removing them.
    pub fn peek(&self, heap: HeapId) -> Option<(&K, &V)> {
        let node = self.heaps.get(heap.index())?.engine.min()?;
        let node = &self.nodes[node];
        Some((node.key(), node.value()))
    }

    /// Removes and returns the minimum element of `heap`.
    ///
    /// Handles to the element become invalid.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if `heap` has no elements.
    ///
    /// # Time Complexity
    /// - Fibonacci: O(log n) amortized
    /// - Pairing: O(log n) amortized
    pub fn delete_min(&mut self, heap: HeapId) -> Result<(K, V), HeapError> {
        let slot = self
            .heaps
            .get_mut(heap.index())
            .ok_or(HeapError::UnknownHeap)?;
        let order = KeyOrder::new(slot.comparator.as_ref());
        slot.engine
            .delete_min(&mut self.nodes, order)
            .map(|node| node.into_entry())
            .ok_or(HeapError::EmptyHeap)
    }

    /// Removes and returns the minimum element, or `None` if `heap` is empty.
    pub fn pop(&mut self, heap: HeapId) -> Option<(K, V)> {
        self.delete_min(heap).ok()
    }

    /// Resolves the live heap holding the element behind `handle`.
    fn resolve(&mut self, handle: &Handle) -> Result<(HeapId, NodeKey), HeapError> {
        let node = self.node_of(handle)?;
        if !self.owners.contains(handle.origin) {
            return Err(HeapError::UnknownHeap);
        }
        Ok((self.owners.find(handle.origin), node))
    }

    /// Replaces the key of the element behind `handle` with a key that does
    /// not compare greater.
    ///
    /// An equal key is stored without restructuring.
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the element was removed or the
    ///   handle was issued by another family
    /// - [`HeapError::KeyIncreased`] if `new_key` compares greater than the
    ///   current key; the heap is left unchanged
    ///
    /// # Time Complexity
    /// - Fibonacci: O(1) amortized
    /// - Pairing: O(log n) amortized
    pub fn decrease_key(&mut self, handle: &Handle, new_key: K) -> Result<(), HeapError> {
        let (owner, node) = self.resolve(handle)?;
        let slot = &mut self.heaps[owner.index()];
        let order = KeyOrder::new(slot.comparator.as_ref());
        if order.compare(&new_key, self.nodes[node].key()) == Ordering::Greater {
            return Err(HeapError::KeyIncreased);
        }
        slot.engine.decrease_key(&mut self.nodes, order, node, new_key);
        Ok(())
    }

    /// Removes the element behind `handle` from whichever heap holds it.
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the element was already removed or the
    /// handle was issued by another family.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: &Handle) -> Result<(K, V), HeapError> {
        let (owner, node) = self.resolve(handle)?;
        let slot = &mut self.heaps[owner.index()];
        let order = KeyOrder::new(slot.comparator.as_ref());
        Ok(slot.engine.delete(&mut self.nodes, order, node).into_entry())
    }

    /// Key of the element behind `handle`.
    pub fn key(&self, handle: &Handle) -> Result<&K, HeapError> {
        let node = self.node_of(handle)?;
        Ok(self.nodes[node].key())
    }

    /// Value of the element behind `handle`.
    pub fn value(&self, handle: &Handle) -> Result<&V, HeapError> {
        let node = self.node_of(handle)?;
        Ok(self.nodes[node].value())
    }

    /// Mutable access to the value of the element behind `handle`.
    pub fn value_mut(&mut self, handle: &Handle) -> Result<&mut V, HeapError> {
        let node = self.node_of(handle)?;
        Ok(self.nodes[node].value_mut())
    }

    /// Returns true if the element behind `handle` is still in some heap.
    pub fn contains(&self, handle: &Handle) -> bool {
        self.node_of(handle).is_ok()
    }

    /// The live heap currently holding the element behind `handle`.
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the element was removed or the handle
    /// was issued by another family.
    pub fn owner(&mut self, handle: &Handle) -> Result<HeapId, HeapError> {
        self.resolve(handle).map(|(owner, _)| owner)
    }

    /// Moves every element of `src` into `dst`.
    ///
    /// `src` is left empty and consumed: it rejects further inserts and melds,
    /// and handles it issued act on `dst` (or wherever `dst` is later melded).
    ///
    /// # Errors
    /// - [`HeapError::SelfMeld`] if `dst` and `src` are the same heap
    /// - [`HeapError::IncompatibleComparators`] if the heaps order keys
    ///   differently (one has a comparator and the other not, or the
    ///   comparators are unequal)
    /// - [`HeapError::HeapConsumed`] if either heap was already consumed
    ///
    /// # Time Complexity
    /// O(1)
    pub fn meld(&mut self, dst: HeapId, src: HeapId) -> Result<(), HeapError> {
        if !self.owners.contains(dst) || !self.owners.contains(src) {
            return Err(HeapError::UnknownHeap);
        }
        if dst == src {
            return Err(HeapError::SelfMeld);
        }
        if self.heaps[dst.index()].comparator != self.heaps[src.index()].comparator {
            tracing::debug!(dst = %dst, src = %src, "rejected meld of differently ordered heaps");
            return Err(HeapError::IncompatibleComparators);
        }
        self.ensure_live(dst)?;
        self.ensure_live(src)?;

        let mut consumed = std::mem::take(&mut self.heaps[src.index()].engine);
        let moved = consumed.len();
        let slot = &mut self.heaps[dst.index()];
        let order = KeyOrder::new(slot.comparator.as_ref());
        slot.engine.meld(&mut consumed, &mut self.nodes, order);
        let len = slot.engine.len();
        self.owners.redirect(src, dst);

        tracing::debug!(dst = %dst, src = %src, moved, len, "melded heaps");
        Ok(())
    }

    /// Removes every element of `heap`.
    ///
    /// Handles to the removed elements become invalid.
    ///
    /// # Time Complexity
    /// O(n)
    pub fn clear(&mut self, heap: HeapId) {
        if let Some(slot) = self.heaps.get_mut(heap.index()) {
            let removed = slot.engine.len();
            slot.engine.clear(&mut self.nodes);
            tracing::debug!(heap = %heap, removed, "cleared heap");
        }
    }

    /// Checks the structural invariants of `heap`.
    pub fn validate(&self, heap: HeapId) -> Result<(), InvariantError> {
        let slot = self
            .heaps
            .get(heap.index())
            .ok_or_else(|| InvariantError::new(format!("{heap} is not part of this family")))?;
        if !self.owners.is_live(heap) && !slot.engine.is_empty() {
            return Err(InvariantError::new(format!(
                "consumed {heap} still holds {} elements",
                slot.engine.len()
            )));
        }
        slot.engine
            .validate(&self.nodes, KeyOrder::new(slot.comparator.as_ref()))
    }

    /// Checks every heap, and that the arena holds exactly the reachable nodes.
    ///
    /// No node may be reachable from two heaps, and every node in the arena
    /// must be reachable from one.
    pub fn validate_all(&self) -> Result<(), InvariantError> {
        let mut seen: FxHashSet<NodeKey> = FxHashSet::default();
        for (index, slot) in self.heaps.iter().enumerate() {
            let heap = HeapId(index);
            self.validate(heap)?;
            for node in slot.engine.reachable(&self.nodes) {
                if !seen.insert(node) {
                    return Err(InvariantError::new(format!(
                        "{node:?} reachable from {heap} is also reachable elsewhere"
                    )));
                }
            }
        }
        if let Some(orphan) = self.nodes.keys().find(|node| !seen.contains(node)) {
            return Err(InvariantError::new(format!(
                "{orphan:?} is in the arena but no heap reaches it"
            )));
        }
        if seen.len() != self.nodes.len() {
            return Err(InvariantError::new(format!(
                "heaps reach {} nodes but the arena holds only {}",
                seen.len(),
                self.nodes.len()
            )));
        }
        Ok(())
    }
}

impl<K: Ord, V, E: Engine<K, V>, C: Comparator<K>> Default for MeldableHeaps<K, V, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V, E: Engine<K, V>, C> fmt::Debug for MeldableHeaps<K, V, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = (0..self.heaps.len())
            .filter(|&index| self.owners.is_live(HeapId(index)))
            .count();
        f.debug_struct("MeldableHeaps")
            .field("heaps", &self.heaps.len())
            .field("live", &live)
            .field("elements", &self.nodes.len())
            .finish()
    }
}
