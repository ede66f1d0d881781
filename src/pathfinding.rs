//! Dijkstra's shortest path search on top of the meldable heaps
//!
//! The open set is a single heap keyed by the distance from the start. Each
//! discovered state keeps the [`Handle`] of its open-set entry, so finding a
//! shorter route relaxes the entry in place with
//! [`decrease_key`](MeldableHeaps::decrease_key) instead of pushing a duplicate.
//!
//! States are interned into dense indices through an `FxHashMap`; the heap only
//! carries those indices.
//!
//! # Example
//!
//! ```rust
//! use meldable_heaps::pathfinding::{dijkstra, SearchNode};
//! use meldable_heaps::pairing::PairingEngine;
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, u32)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .into_iter()
//!             .map(|(dx, dy)| (GridPos { x: self.x + dx, y: self.y + dy, ..*self }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra::<_, PairingEngine<_, _>>(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use crate::heaps::{Handle, MeldableHeaps};
use crate::ownership::HeapId;
use crate::traits::Engine;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::ops::Add;

/// Edge weights and path lengths. `Default` is the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// A state in an implicit search graph.
pub trait SearchNode: Clone + Eq + Hash {
    /// Edge weight type.
    type Cost: Cost;

    /// Neighbouring states and the cost of reaching each.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if the search may stop at this state.
    fn is_goal(&self) -> bool;
}

type NodeIndex = usize;

struct Entry<N: SearchNode> {
    node: N,
    distance: N::Cost,
    came_from: Option<NodeIndex>,
    /// Open-set entry; `None` once the state is settled.
    handle: Option<Handle>,
}

struct Search<N: SearchNode> {
    entries: Vec<Entry<N>>,
    index: FxHashMap<N, NodeIndex>,
}

impl<N: SearchNode> Search<N> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Index of `node`, and whether it was seen before.
    fn intern(&mut self, node: N, distance: N::Cost) -> (NodeIndex, bool) {
        if let Some(&index) = self.index.get(&node) {
            return (index, false);
        }
        let index = self.entries.len();
        self.index.insert(node.clone(), index);
        self.entries.push(Entry {
            node,
            distance,
            came_from: None,
            handle: None,
        });
        (index, true)
    }

    fn path_to(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.entries[current].node.clone()];
        while let Some(previous) = self.entries[current].came_from {
            path.push(self.entries[previous].node.clone());
            current = previous;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from `start` until a goal state is settled.
///
/// `E` picks the heap engine backing the open set.
///
/// Returns the path from `start` to the goal (both inclusive) and its cost, or
/// `None` if no goal is reachable. The graph must be finite when no goal is
/// reachable.
pub fn dijkstra<N, E>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    E: Engine<N::Cost, NodeIndex>,
{
    let mut heaps: MeldableHeaps<N::Cost, NodeIndex, E> = MeldableHeaps::new();
    let open = heaps.create_heap();
    let mut search = Search::new();

    let zero = N::Cost::default();
    let (start_index, _) = search.intern(start.clone(), zero);
    search.entries[start_index].handle = Some(admit(&mut heaps, open, zero, start_index));

    let mut settled = 0usize;
    while let Some((distance, current)) = heaps.pop(open) {
        search.entries[current].handle = None;
        settled += 1;

        let node = search.entries[current].node.clone();
        if node.is_goal() {
            tracing::debug!(settled, discovered = search.entries.len(), "reached goal");
            return Some((search.path_to(current), distance));
        }

        for (neighbor, weight) in node.successors() {
            let candidate = distance + weight;
            let (index, is_new) = search.intern(neighbor, candidate);
            let entry = &mut search.entries[index];

            if is_new {
                entry.came_from = Some(current);
                entry.handle = Some(admit(&mut heaps, open, candidate, index));
            } else if let Some(handle) = entry.handle {
                if candidate < entry.distance {
                    if let Err(err) = heaps.decrease_key(&handle, candidate) {
                        unreachable!("open set rejected a shorter distance: {err}");
                    }
                    entry.distance = candidate;
                    entry.came_from = Some(current);
                }
            }
        }
    }

    tracing::debug!(settled, "no goal reachable");
    None
}

/// Pushes `index` onto the open set. The open set is created and owned by
/// the search and never melded, so the insert cannot fail.
fn admit<K, E>(
    heaps: &mut MeldableHeaps<K, NodeIndex, E>,
    open: HeapId,
    key: K,
    index: NodeIndex,
) -> Handle
where
    K: Ord,
    E: Engine<K, NodeIndex>,
{
    match heaps.insert(open, key, index) {
        Ok(handle) => handle,
        Err(err) => unreachable!("open set rejected an insert: {err}"),
    }
}
