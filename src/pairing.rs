//! Pairing Heap engine
//!
//! A pairing heap is a type of heap-ordered tree with:
//! - O(1) insert and meld
//! - O(log n) amortized delete_min and delete
//! - O(log n) amortized decrease_key (with small constants in practice)
//!
//! Each node keeps its first child and a doubly linked, non-circular list of
//! siblings. There are no degrees or marks: decrease_key simply cuts the node
//! out and links it back against the root. No cascading cut follows, because
//! there is no rank invariant to repair.
//!
//! delete_min detaches the children of the root and combines them in two
//! passes: adjacent pairs are linked left to right, then the results are
//! folded into one tree right to left.

use crate::compare::{Comparator, KeyOrder};
use crate::error::InvariantError;
use crate::storage::{take_node, Arena, NodeKey};
use crate::traits::{Engine, HeapNode};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::marker::PhantomData;

/// Node of a Pairing heap
pub struct PairingNode<K, V> {
    key: K,
    value: V,
    // First child; its older_sibling is this node
    older_child: Option<NodeKey>,
    younger_sibling: Option<NodeKey>,
    // Previous sibling, or the parent for a first child. None on a root or a
    // node cut loose from its tree.
    older_sibling: Option<NodeKey>,
}

impl<K, V> HeapNode<K, V> for PairingNode<K, V> {
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

type Nodes<K, V> = Arena<PairingNode<K, V>>;

/// Pairing heap engine
pub struct PairingEngine<K, V> {
    root: Option<NodeKey>,
    len: usize,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Default for PairingEngine<K, V> {
    fn default() -> Self {
        Self {
            root: None,
            len: 0,
            _marker: PhantomData,
        }
    }
}

/// Links two detached trees, returning the winner.
///
/// The loser becomes the winner's first child; the winner's previous first
/// child becomes the loser's younger sibling. Ties keep `a` on top.
fn link<K, V, C>(nodes: &mut Nodes<K, V>, order: KeyOrder<'_, C>, a: NodeKey, b: NodeKey) -> NodeKey
where
    K: Ord,
    C: Comparator<K>,
{
    let (winner, loser) = if order.less(&nodes[b].key, &nodes[a].key) {
        (b, a)
    } else {
        (a, b)
    };
    debug_assert!(nodes[loser].older_sibling.is_none() && nodes[loser].younger_sibling.is_none());

    let first = nodes[winner].older_child;
    if let Some(first) = first {
        nodes[first].older_sibling = Some(loser);
    }
    let l = &mut nodes[loser];
    l.younger_sibling = first;
    l.older_sibling = Some(winner);
    nodes[winner].older_child = Some(loser);
    winner
}

/// Two-pass combine of the sibling list starting at `first`.
///
/// `first` must already be detached from its parent.
fn combine<K, V, C>(nodes: &mut Nodes<K, V>, order: KeyOrder<'_, C>, first: NodeKey) -> NodeKey
where
    K: Ord,
    C: Comparator<K>,
{
    // Left to right: link adjacent pairs
    let mut pairs: SmallVec<[NodeKey; 32]> = SmallVec::new();
    let mut current = Some(first);
    while let Some(a) = current {
        let next = nodes[a].younger_sibling.take();
        nodes[a].older_sibling = None;
        let Some(b) = next else {
            pairs.push(a);
            break;
        };
        current = nodes[b].younger_sibling.take();
        nodes[b].older_sibling = None;
        pairs.push(link(nodes, order, a, b));
    }
    tracing::trace!(trees = pairs.len(), "pairing pass complete");

    // Right to left: fold into one tree
    let mut tree = match pairs.pop() {
        Some(last) => last,
        None => unreachable!("combine called on an empty sibling list"),
    };
    while let Some(prev) = pairs.pop() {
        tree = link(nodes, order, prev, tree);
    }
    tree
}

impl<K, V> PairingEngine<K, V> {
    /// Splices `node` out of its sibling list, leaving its subtree intact.
    fn cut(nodes: &mut Nodes<K, V>, node: NodeKey) {
        let older = nodes[node].older_sibling.take();
        let younger = nodes[node].younger_sibling.take();

        if let Some(y) = younger {
            nodes[y].older_sibling = older;
        }
        if let Some(o) = older {
            if nodes[o].older_child == Some(node) {
                nodes[o].older_child = younger;
            } else {
                nodes[o].younger_sibling = younger;
            }
        }
    }

    /// Detaches the children of `node` and combines them into one tree.
    fn combine_children<C>(
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
        node: NodeKey,
    ) -> Option<NodeKey>
    where
        K: Ord,
        C: Comparator<K>,
    {
        let first = nodes[node].older_child.take()?;
        nodes[first].older_sibling = None;
        Some(combine(nodes, order, first))
    }
}

impl<K: Ord, V> Engine<K, V> for PairingEngine<K, V> {
    type Node = PairingNode<K, V>;

    fn len(&self) -> usize {
        self.len
    }

    fn min(&self) -> Option<NodeKey> {
        self.root
    }

    fn insert<C: Comparator<K>>(
        &mut self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
        key: K,
        value: V,
    ) -> NodeKey {
        let node = nodes.insert(PairingNode {
            key,
            value,
            older_child: None,
            younger_sibling: None,
            older_sibling: None,
        });

        self.root = Some(match self.root {
            Some(root) => link(nodes, order, root, node),
            None => node,
        });
        self.len += 1;
        node
    }

    fn delete_min<C: Comparator<K>>(
        &mut self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
    ) -> Option<Self::Node> {
        let root = self.root?;
        self.root = Self::combine_children(nodes, order, root);
        self.len -= 1;
        Some(take_node(nodes, root))
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

        let Some(root) = self.root else {
            return;
        };
        if ordering == Ordering::Equal || root == node {
            return;
        }

        Self::cut(nodes, node);
        self.root = Some(link(nodes, order, root, node));
    }

    fn delete<C: Comparator<K>>(
        &mut self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
        node: NodeKey,
    ) -> Self::Node {
        if self.root == Some(node) {
            return match self.delete_min(nodes, order) {
                Some(removed) => removed,
                None => unreachable!("root is present"),
            };
        }

        Self::cut(nodes, node);
        if let Some(subtree) = Self::combine_children(nodes, order, node) {
            if let Some(root) = self.root {
                self.root = Some(link(nodes, order, root, subtree));
            }
        }
        self.len -= 1;
        take_node(nodes, node)
    }

    fn meld<C: Comparator<K>>(
        &mut self,
        other: &mut Self,
        nodes: &mut Nodes<K, V>,
        order: KeyOrder<'_, C>,
    ) {
        let Some(other_root) = other.root.take() else {
            return;
        };

        self.root = Some(match self.root {
            Some(root) => link(nodes, order, root, other_root),
            None => other_root,
        });
        self.len += other.len;
        other.len = 0;
    }

    fn reachable(&self, nodes: &Nodes<K, V>) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<NodeKey> = self.root.into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            let n = &nodes[node];
            if let Some(child) = n.older_child {
                stack.push(child);
            }
            if let Some(sibling) = n.younger_sibling {
                stack.push(sibling);
            }
        }
        out
    }

    fn validate<C: Comparator<K>>(
        &self,
        nodes: &Nodes<K, V>,
        order: KeyOrder<'_, C>,
    ) -> Result<(), InvariantError> {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(())
            } else {
                Err(InvariantError::new(format!("no root but len is {}", self.len)))
            };
        };

        let root_node = nodes
            .get(root)
            .ok_or_else(|| InvariantError::new(format!("dangling root {root:?}")))?;
        if root_node.older_sibling.is_some() || root_node.younger_sibling.is_some() {
            return Err(InvariantError::new("root has siblings"));
        }

        let mut count = 0usize;
        // (node, its parent, the node its older_sibling must point at)
        let mut stack: Vec<(NodeKey, Option<NodeKey>, Option<NodeKey>)> = vec![(root, None, None)];
        while let Some((key, parent, expected_older)) = stack.pop() {
            let node = nodes
                .get(key)
                .ok_or_else(|| InvariantError::new(format!("dangling key {key:?}")))?;
            count += 1;
            if count > self.len {
                return Err(InvariantError::new(format!(
                    "more than {} nodes reachable",
                    self.len
                )));
            }
            if node.older_sibling != expected_older {
                return Err(InvariantError::new(format!(
                    "older sibling link of {key:?} is not symmetric"
                )));
            }
            if let Some(p) = parent {
                if order.less(&node.key, &nodes[p].key) {
                    return Err(InvariantError::new(format!(
                        "heap order violated between {p:?} and {key:?}"
                    )));
                }
            }
            if let Some(child) = node.older_child {
                stack.push((child, Some(key), Some(key)));
            }
            if let Some(sibling) = node.younger_sibling {
                stack.push((sibling, parent, Some(key)));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::ReverseOrder;

    type Heap = PairingEngine<i32, &'static str>;

    fn natural() -> KeyOrder<'static, ReverseOrder> {
        KeyOrder::natural()
    }

    fn pop(heap: &mut Heap, nodes: &mut Nodes<i32, &'static str>) -> Option<(i32, &'static str)> {
        heap.delete_min(nodes, natural()).map(|node| node.into_entry())
    }

    #[test]
    fn test_basic_operations() {
        let mut nodes = Nodes::with_key();
        let mut heap = Heap::default();
        assert!(heap.is_empty());

        heap.insert(&mut nodes, natural(), 5, "a");
        heap.insert(&mut nodes, natural(), 3, "b");
        heap.insert(&mut nodes, natural(), 7, "c");

        assert_eq!(nodes[heap.min().unwrap()].key, 3);
        assert_eq!(pop(&mut heap, &mut nodes), Some((3, "b")));
        assert_eq!(pop(&mut heap, &mut nodes), Some((5, "a")));
        heap.validate(&nodes, natural()).unwrap();
    }

    #[test]
    fn test_link_keeps_newest_loser_first() {
        let mut nodes = Nodes::with_key();
        let mut heap = Heap::default();
        let root = heap.insert(&mut nodes, natural(), 1, "root");
        let a = heap.insert(&mut nodes, natural(), 2, "a");
        let b = heap.insert(&mut nodes, natural(), 3, "b");

        assert_eq!(nodes[root].older_child, Some(b));
        assert_eq!(nodes[b].younger_sibling, Some(a));
        assert_eq!(nodes[b].older_sibling, Some(root));
        assert_eq!(nodes[a].older_sibling, Some(b));
        heap.validate(&nodes, natural()).unwrap();
    }

    #[test]
    fn test_two_pass_combine() {
        let mut nodes = Nodes::with_key();
        let mut heap = Heap::default();
        heap.insert(&mut nodes, natural(), 0, "");
        for k in [5, 3, 8, 1, 9, 2, 7] {
            heap.insert(&mut nodes, natural(), k, "");
        }
        // Root 0 with seven children, newest first
        pop(&mut heap, &mut nodes);
        heap.validate(&nodes, natural()).unwrap();

        let order: Vec<i32> = std::iter::from_fn(|| pop(&mut heap, &mut nodes).map(|e| e.0)).collect();
        assert_eq!(order, vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn test_decrease_key_middle_sibling() {
        let mut nodes = Nodes::with_key();
        let mut heap = Heap::default();
        heap.insert(&mut nodes, natural(), 10, "root");
        let a = heap.insert(&mut nodes, natural(), 20, "a");
        let b = heap.insert(&mut nodes, natural(), 30, "b");
        let c = heap.insert(&mut nodes, natural(), 40, "c");

        // Children newest first: c, b, a. Cut the middle one.
        heap.decrease_key(&mut nodes, natural(), b, 5);
        assert_eq!(heap.min(), Some(b));
        assert_eq!(nodes[c].younger_sibling, Some(a));
        assert_eq!(nodes[a].older_sibling, Some(c));
        heap.validate(&nodes, natural()).unwrap();
    }

    #[test]
    fn test_decrease_key_without_reordering() {
        let mut nodes = Nodes::with_key();
        let mut heap = Heap::default();
        let root = heap.insert(&mut nodes, natural(), 10, "root");
        let a = heap.insert(&mut nodes, natural(), 20, "a");

        heap.decrease_key(&mut nodes, natural(), a, 15);
        assert_eq!(heap.min(), Some(root));
        heap.validate(&nodes, natural()).unwrap();

        heap.decrease_key(&mut nodes, natural(), root, 1);
        assert_eq!(nodes[root].key, 1);
        assert_eq!(heap.min(), Some(root));
    }

    #[test]
    fn test_delete_inner_node_keeps_children() {
        let mut nodes = Nodes::with_key();
        let mut heap = Heap::default();
        let keys: Vec<NodeKey> = (0..10)
            .map(|k| heap.insert(&mut nodes, natural(), k, ""))
            .collect();
        pop(&mut heap, &mut nodes);
        heap.validate(&nodes, natural()).unwrap();

        let removed = heap.delete(&mut nodes, natural(), keys[4]);
        assert_eq!(removed.key, 4);
        assert_eq!(heap.len(), 8);
        heap.validate(&nodes, natural()).unwrap();

        let order: Vec<i32> = std::iter::from_fn(|| pop(&mut heap, &mut nodes).map(|e| e.0)).collect();
        assert_eq!(order, vec![1, 2, 3, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_meld() {
        let mut nodes = Nodes::with_key();
        let mut heap1 = Heap::default();
        heap1.insert(&mut nodes, natural(), 5, "a");
        heap1.insert(&mut nodes, natural(), 10, "b");

        let mut heap2 = Heap::default();
        heap2.insert(&mut nodes, natural(), 3, "c");
        heap2.insert(&mut nodes, natural(), 7, "d");

        heap1.meld(&mut heap2, &mut nodes, natural());
        assert_eq!(heap1.len(), 4);
        assert!(heap2.is_empty());
        assert_eq!(nodes[heap1.min().unwrap()].key, 3);
        heap1.validate(&nodes, natural()).unwrap();
    }

    #[test]
    fn test_clear_frees_nodes() {
        let mut nodes = Nodes::with_key();
        let mut heap = Heap::default();
        for k in 0..20 {
            heap.insert(&mut nodes, natural(), k, "");
        }
        pop(&mut heap, &mut nodes);
        assert_eq!(heap.reachable(&nodes).len(), 19);

        heap.clear(&mut nodes);
        assert!(heap.is_empty());
        assert!(nodes.is_empty());
    }
}
