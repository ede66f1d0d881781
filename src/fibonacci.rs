//! Fibonacci Heap engine
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert, find_min, and meld
//! - O(1) amortized decrease_key
//! - O(log n) amortized delete_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked ring, as are the children of every node. The heap
//! caches the minimum root. Work is deferred: insert and meld only splice rings,
//! and trees of equal degree are linked (consolidated) during delete_min.
//!
//! decrease_key cuts a node whose key now beats its parent's and then cascades:
//! every marked ancestor is cut too, and the first unmarked one is marked. A
//! node loses at most one child before being cut itself, which keeps degrees
//! within `log_phi(n)`.
//!
//! Nodes live in a shared [`Arena`]; all links are [`NodeKey`]s.

use crate::compare::{Comparator, KeyOrder};
use crate::error::InvariantError;
use crate::rank::{checked_increment, max_degree, saturating_decrement, Rank};
use crate::storage::{take_node, Arena, NodeKey};
use crate::traits::{Engine, HeapNode};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::marker::PhantomData;

/// Node of a Fibonacci heap
///
/// A singleton ring points `next` and `prev` at itself.
pub struct FibonacciNode<K, V> {
    key: K,
    value: V,
    parent: Option<NodeKey>,
    // Any one child; the rest are reachable through its sibling ring
    child: Option<NodeKey>,
    next: NodeKey,
    prev: NodeKey,
    degree: Rank,
    // Set when a child was cut since this node last became a child
    marked: bool,
}

impl<K, V> HeapNode<K, V> for FibonacciNode<K, V> {
    fn key(&self) -> &K {
        &self.key
    }

    fn value(&self) -> &V {
        &self.value
    }

    fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

type Nodes<K, V> = Arena<FibonacciNode<K, V>>;

/// Fibonacci heap engine
///
/// Holds the minimum root and the element count; the nodes themselves live in
/// the arena passed to every operation.
pub struct FibonacciEngine<K, V> {
    min_root: Option<NodeKey>,
    len: usize,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Default for FibonacciEngine<K, V> {
    fn default() -> Self {
        Self {
            min_root: None,
            len: 0,
            _marker: PhantomData,
        }
    }
}

/// Inserts the singleton `node` into the ring containing `anchor`, just before it.
fn splice<K, V>(nodes: &mut Nodes<K, V>, anchor: NodeKey, node: NodeKey) {
    let last = nodes[anchor].prev;
    nodes[node].next = anchor;
    nodes[node].prev = last;
    nodes[last].next = node;
    nodes[anchor].prev = node;
}

/// Removes `node` from its ring, leaving it a singleton.
fn unlink<K, V>(nodes: &mut Nodes<K, V>, node: NodeKey) {
    let prev = nodes[node].prev;
    let next = nodes[node].next;
    nodes[prev].next = next;
    nodes[next].prev = prev;
    nodes[node].next = node;
    nodes[node].prev = node;
}

/// Joins the ring containing `a` with the ring containing `b`.
fn concat<K, V>(nodes: &mut Nodes<K, V>, a: NodeKey, b: NodeKey) {
    let a_prev = nodes[a].prev;
    let b_prev = nodes[b].prev;
    nodes[a_prev].next = b;
    nodes[b].prev = a_prev;
    nodes[b_prev].next = a;
    nodes[a].prev = b_prev;
}

/// Collects the members of the ring starting at `start`.
fn ring<K, V>(nodes: &Nodes<K, V>, start: NodeKey) -> SmallVec<[NodeKey; 16]> {
    let mut members = SmallVec::new();
    let mut current = start;
    loop {
        members.push(current);
        current = nodes[current].next;
        if current == start {
            break;
        }
    }
    members
}

/// Makes root `child` a child of root `parent`.
fn link<K, V>(nodes: &mut Nodes<K, V>, child: NodeKey, parent: NodeKey) {
    unlink(nodes, child);
    {
        let c = &mut nodes[child];
        c.parent = Some(parent);
        c.marked = false;
    }

    match nodes[parent].child {
        Some(first) => splice(nodes, first, child),
        None => nodes[parent].child = Some(child),
    }

    let p = &mut nodes[parent];
    p.degree = checked_increment(p.degree);
}

impl<K, V> FibonacciEngine<K, V> {
    /// Adds the singleton `node` to the root ring without touching the minimum.
    fn add_root(&mut self, nodes: &mut Nodes<K, V>, node: NodeKey) {
        match self.min_root {
            Some(min) => splice(nodes, min, node),
            None => self.min_root = Some(node),
        }
    }

    /// Moves `node` from its parent's child ring to the root ring.
    fn cut(&mut self, nodes: &mut Nodes<K, V>, node: NodeKey, parent: NodeKey) {
        let next = nodes[node].next;
        if next == node {
            nodes[parent].child = None;
        } else if nodes[parent].child == Some(node) {
            nodes[parent].child = Some(next);
        }
        unlink(nodes, node);

        let p = &mut nodes[parent];
        p.degree = saturating_decrement(p.degree);

        let n = &mut nodes[node];
        n.parent = None;
        n.marked = false;

        self.add_root(nodes, node);
    }

    /// Walks up from `start`, cutting marked ancestors until an unmarked one
    /// is marked or a root is reached.
    fn cascading_cut(&mut self, nodes: &mut Nodes<K, V>, start: NodeKey) {
        let mut current = start;
        while let Some(parent) = nodes[current].parent {
            if !nodes[current].marked {
                nodes[current].marked = true;
                return;
            }
            self.cut(nodes, current, parent);
            current = parent;
        }
    }

    /// Links roots of equal degree until all root degrees are distinct, then
    /// rebuilds the root ring and recomputes the minimum.
    fn consolidate<C>(&mut self, nodes: &mut Nodes<K, V>, order: KeyOrder<'_, C>, start: NodeKey)
    where
        K: Ord,
        C: Comparator<K>,
    {
        let roots = ring(nodes, start);
        tracing::trace!(roots = roots.len(), len = self.len, "consolidating root ring");

        let mut table: SmallVec<[Option<NodeKey>; 64]> = SmallVec::new();
        table.resize(max_degree(self.len), None);

        for root in roots {
            let mut x = root;
            let mut degree = nodes[x].degree as usize;
            loop {
                let Some(slot) = table.get_mut(degree) else {
                    panic!(
                        "heap structure corrupted: degree {} exceeds bound for {} nodes",
                        degree, self.len
                    );
                };
                let Some(mut y) = slot.take() else {
                    break;
                };
                if order.less(&nodes[y].key, &nodes[x].key) {
                    std::mem::swap(&mut x, &mut y);
                }
                link(nodes, y, x);
                degree += 1;
            }
            table[degree] = Some(x);
        }

        self.min_root = None;
        for root in table.into_iter().flatten() {
            let n = &mut nodes[root];
            n.next = root;
            n.prev = root;
            match self.min_root {
                None => self.min_root = Some(root),
                Some(min) => {
                    splice(nodes, min, root);
                    if order.less(&nodes[root].key, &nodes[min].key) {
                        self.min_root = Some(root);
                    }
                }
            }
        }
    }
}

impl<K: Ord, V> Engine<K, V> for FibonacciEngine<K, V> {
    type Node = FibonacciNode<K, V>;

    fn len(&self) -> usize {
        self.len
    }

    fn min(&self) -> Option<NodeKey> {
        self.min_root
    }

    fn insert<C: Comparator<K>>(
        &mut self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
        key: K,
        value: V,
    ) -> NodeKey {
        let node = nodes.insert_with_key(|this| FibonacciNode {
            key,
            value,
            parent: None,
            child: None,
            next: this,
            prev: this,
            degree: 0,
            marked: false,
        });

        match self.min_root {
            None => self.min_root = Some(node),
            Some(min) => {
                splice(nodes, min, node);
                if order.less(&nodes[node].key, &nodes[min].key) {
                    self.min_root = Some(node);
                }
            }
        }

        self.len += 1;
        node
    }

    fn delete_min<C: Comparator<K>>(
        &mut self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
    ) -> Option<Self::Node> {
        let min = self.min_root?;

        // Promote children to the root ring
        if let Some(child) = nodes[min].child.take() {
            let mut current = child;
            loop {
                let n = &mut nodes[current];
                n.parent = None;
                n.marked = false;
                current = n.next;
                if current == child {
                    break;
                }
            }
            concat(nodes, min, child);
            nodes[min].degree = 0;
        }

        let next = nodes[min].next;
        if next == min {
            self.min_root = None;
        } else {
            unlink(nodes, min);
            self.min_root = Some(next);
            self.consolidate(nodes, order, next);
        }

        self.len -= 1;
        Some(take_node(nodes, min))
    }

    fn decrease_key<C: Comparator<K>>(
        &mut self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
        node: NodeKey,
        new_key: K,
    ) {
        let ordering = order.compare(&new_key, &nodes[node].key);
        debug_assert_ne!(ordering, Ordering::Greater, "decrease_key must not increase");
        nodes[node].key = new_key;
        if ordering == Ordering::Equal {
            return;
        }

        if let Some(parent) = nodes[node].parent {
            if !order.less(&nodes[node].key, &nodes[parent].key) {
                // Heap order still holds
                return;
            }
            self.cut(nodes, node, parent);
            self.cascading_cut(nodes, parent);
        }

        if let Some(min) = self.min_root {
            if order.less(&nodes[node].key, &nodes[min].key) {
                self.min_root = Some(node);
            }
        }
    }

    fn delete<C: Comparator<K>>(
        &mut self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
        node: NodeKey,
    ) -> Self::Node {
        if let Some(parent) = nodes[node].parent {
            self.cut(nodes, node, parent);
            self.cascading_cut(nodes, parent);
        }

        // Treat the node as the minimum; consolidation recomputes the real one
        self.min_root = Some(node);
        match self.delete_min(nodes, order) {
            Some(removed) => removed,
            None => unreachable!("min root was just set"),
        }
    }

    fn meld<C: Comparator<K>>(
        &mut self,
        other: &mut Self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
    ) {
        let Some(other_min) = other.min_root.take() else {
            return;
        };

        match self.min_root {
            None => self.min_root = Some(other_min),
            Some(min) => {
                concat(nodes, min, other_min);
                if order.less(&nodes[other_min].key, &nodes[min].key) {
                    self.min_root = Some(other_min);
                }
            }
        }

        self.len += other.len;
        other.len = 0;
    }

    fn reachable(&self, nodes: &Nodes<K, V>) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.len);
        let mut rings: Vec<NodeKey> = self.min_root.into_iter().collect();
        while let Some(start) = rings.pop() {
            for member in ring(nodes, start) {
                out.push(member);
                if let Some(child) = nodes[member].child {
                    rings.push(child);
                }
            }
        }
        out
    }

    fn validate<C: Comparator<K>>(
        &self,
        nodes: &Nodes<K, V>,
        order: KeyOrder<'_, C>,
    ) -> Result<(), InvariantError> {
        let Some(min) = self.min_root else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(InvariantError::new(format!(
                    "no min root but len is {}",
                    self.len
                )))
            };
        };

        let degree_bound = max_degree(self.len);
        let mut count = 0usize;
        let mut rings: Vec<(Option<NodeKey>, NodeKey)> = vec![(None, min)];

        while let Some((parent, start)) = rings.pop() {
            let mut current = start;
            let mut ring_len = 0usize;
            loop {
                let node = nodes
                    .get(current)
                    .ok_or_else(|| InvariantError::new(format!("dangling key {current:?}")))?;
                count += 1;
                ring_len += 1;
                if count > self.len {
                    return Err(InvariantError::new(format!(
                        "more than {} nodes reachable",
                        self.len
                    )));
                }
                if node.parent != parent {
                    return Err(InvariantError::new(format!(
                        "parent link of {current:?} does not match its ring"
                    )));
                }
                if node.degree as usize >= degree_bound {
                    return Err(InvariantError::new(format!(
                        "degree {} of {current:?} exceeds bound {degree_bound}",
                        node.degree
                    )));
                }
                match parent {
                    None => {
                        if node.marked {
                            return Err(InvariantError::new(format!("root {current:?} is marked")));
                        }
                        if order.less(&node.key, &nodes[min].key) {
                            return Err(InvariantError::new("min root is not minimal"));
                        }
                    }
                    Some(p) => {
                        if order.less(&node.key, &nodes[p].key) {
                            return Err(InvariantError::new(format!(
                                "heap order violated between {p:?} and {current:?}"
                            )));
                        }
                    }
                }

                let next = node.next;
                match nodes.get(next) {
                    Some(n) if n.prev == current => {}
                    _ => {
                        return Err(InvariantError::new(format!(
                            "ring links of {current:?} are not symmetric"
                        )))
                    }
                }
                if let Some(child) = node.child {
                    rings.push((Some(current), child));
                }

                current = next;
                if current == start {
                    break;
                }
            }

            if let Some(p) = parent {
                if nodes[p].degree as usize != ring_len {
                    return Err(InvariantError::new(format!(
                        "degree of {p:?} is {} but it has {ring_len} children",
                        nodes[p].degree
                    )));
                }
            }
        }

        if count != self.len {
            return Err(InvariantError::new(format!(
                "{count} nodes reachable but len is {}",
                self.len
            )));
        }
        Ok(())
    }
}
