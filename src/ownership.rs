//! Cascading-meld ownership over heaps
//!
//! Melding consumes the source heap, but handles issued by it stay in the
//! callers' hands. Each heap therefore keeps an owner pointer, initially
//! itself. A meld redirects the source's owner to the destination, so the
//! heaps form a disjoint-set forest whose roots are the live heaps. A handle
//! remembers only the heap that issued it and resolves the live owner lazily
//! with [`Owners::find`], which compresses every pointer on the walk.
//!
//! Union-by-rank is not needed: a chain only grows by one meld at a time and
//! path compression alone keeps resolution amortized O(1) per meld.

use std::fmt;

/// Identifier of a heap within one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapId(pub(crate) usize);

impl HeapId {
    /// Position of the heap in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HeapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heap#{}", self.0)
    }
}

/// Owner pointers of every heap in a container.
#[derive(Debug, Default, Clone)]
pub struct Owners {
    parent: Vec<HeapId>,
}

impl Owners {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new heap that owns itself.
    pub fn add(&mut self) -> HeapId {
        let id = HeapId(self.parent.len());
        self.parent.push(id);
        id
    }

    /// Number of registered heaps.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns true if no heap is registered.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns true if `id` was issued by this set.
    pub fn contains(&self, id: HeapId) -> bool {
        id.0 < self.parent.len()
    }

    /// Returns true if `id` still owns itself, i.e. was never melded away.
    pub fn is_live(&self, id: HeapId) -> bool {
        self.parent.get(id.0) == Some(&id)
    }

    /// Resolves the live owner of `id` without compressing.
    pub fn owner(&self, id: HeapId) -> HeapId {
        let mut current = id;
        loop {
            let next = self.parent[current.0];
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Resolves the live owner of `id`, pointing every heap on the way
    /// directly at it.
    pub fn find(&mut self, id: HeapId) -> HeapId {
        let root = self.owner(id);

        let mut current = id;
        while current != root {
            let next = self.parent[current.0];
            self.parent[current.0] = root;
            current = next;
        }
        root
    }

    /// Forwards the consumed heap `src` to `dst`.
    ///
    /// Both must be live; the caller checks this before melding.
    pub fn redirect(&mut self, src: HeapId, dst: HeapId) {
        debug_assert!(self.is_live(src) && self.is_live(dst) && src != dst);
        self.parent[src.0] = dst;
    }

    /// Length of the owner chain from `id` to its live owner.
    #[cfg(test)]
    fn depth(&self, id: HeapId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while self.parent[current.0] != current {
            current = self.parent[current.0];
            depth += 1;
        }
        depth
    }
}
