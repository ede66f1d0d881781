//! Key ordering configuration.
//!
//! Every heap orders its keys either by their natural [`Ord`] implementation
//! or by an explicit [`Comparator`] chosen when the heap is created. Two heaps
//! may only be melded when they order keys the same way: both use the natural
//! order, or both carry comparators that compare equal.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A total order over keys of type `K`.
///
/// `PartialEq` decides meld compatibility: melding heaps whose comparators are
/// not equal is rejected.
pub trait Comparator<K: ?Sized>: PartialEq {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Reverses the natural ordering, turning the min-heap into a max-heap.
///
/// # Example
///
/// ```rust
/// use meldable_heaps::compare::ReverseOrder;
/// use meldable_heaps::FibonacciHeaps;
///
/// let mut heaps: FibonacciHeaps<i32, (), ReverseOrder> = FibonacciHeaps::new();
/// let h = heaps.create_heap_with(ReverseOrder);
/// heaps.insert(h, 1, ()).unwrap();
/// heaps.insert(h, 7, ()).unwrap();
/// assert_eq!(heaps.peek(h), Some((&7, &())));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder;

impl<K: Ord + ?Sized> Comparator<K> for ReverseOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

/// Comparator backed by a shared closure.
///
/// Clones share the closure and compare equal; two comparators built from
/// separate closures never do, even if the closures behave identically.
pub struct FnComparator<K: ?Sized> {
    f: Rc<dyn Fn(&K, &K) -> Ordering>,
}

impl<K: ?Sized> FnComparator<K> {
    /// Wraps `f` as a comparator.
    pub fn new(f: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        Self { f: Rc::new(f) }
    }
}

impl<K: ?Sized> Clone for FnComparator<K> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<K: ?Sized> PartialEq for FnComparator<K> {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.f).cast::<()>() == Rc::as_ptr(&other.f).cast::<()>()
    }
}

impl<K: ?Sized> Eq for FnComparator<K> {}

impl<K: ?Sized> fmt::Debug for FnComparator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnComparator")
            .field(&Rc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}

impl<K: ?Sized> Comparator<K> for FnComparator<K> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.f)(a, b)
    }
}

/// The ordering in force for one heap.
///
/// Wraps the heap's optional comparator; without one, keys compare by `Ord`.
pub struct KeyOrder<'a, C> {
    comparator: Option<&'a C>,
}

impl<C> Clone for KeyOrder<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for KeyOrder<'_, C> {}

impl<'a, C> KeyOrder<'a, C> {
    /// Orders by `comparator` when present, by `Ord` otherwise.
    #[inline]
    pub fn new(comparator: Option<&'a C>) -> Self {
        Self { comparator }
    }

    /// The natural `Ord` ordering.
    #[inline]
    pub fn natural() -> Self {
        Self { comparator: None }
    }

    /// Compares two keys under this ordering.
    #[inline]
    pub fn compare<K: Ord>(&self, a: &K, b: &K) -> Ordering
    where
        C: Comparator<K>,
    {
        match self.comparator {
            Some(c) => c.compare(a, b),
            None => a.cmp(b),
        }
    }

    /// Returns true if `a` orders strictly before `b`.
    #[inline]
    pub fn less<K: Ord>(&self, a: &K, b: &K) -> bool
    where
        C: Comparator<K>,
    {
        self.compare(a, b) == Ordering::Less
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order() {
        let order: KeyOrder<'_, ReverseOrder> = KeyOrder::natural();
        assert!(order.less(&1, &2));
        assert_eq!(order.compare(&3, &3), Ordering::Equal);
    }

    #[test]
    fn test_reverse_order() {
        let order = KeyOrder::new(Some(&ReverseOrder));
        assert!(order.less(&2, &1));
        assert!(!order.less(&1, &2));
    }

    #[test]
    fn test_fn_comparator_identity() {
        let by_abs = FnComparator::new(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));
        let same = by_abs.clone();
        let other = FnComparator::new(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));

        assert_eq!(by_abs, same);
        assert_ne!(by_abs, other);
        assert_eq!(by_abs.compare(&-5, &3), Ordering::Greater);
    }
}
