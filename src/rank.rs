//! Degree type and bounds for Fibonacci tree nodes.
//!
//! # Why u8?
//!
//! A node's degree is its number of children. In a Fibonacci heap a node of
//! degree `d` roots a subtree of at least `F(d + 2) >= phi^d` nodes, so the
//! degree never exceeds `log_phi(n)`:
//!
//! - 2⁶⁴ elements → max degree ~92
//!
//! `u8` therefore covers every heap that fits in memory while keeping the
//! node small.
//!
//! # Runtime Checks
//!
//! [`checked_increment`] panics if the type limit is exceeded, and
//! [`max_degree`] gives the bound consolidation checks against. Crossing either
//! means the tree structure is corrupt.

/// Type alias for node degree.
pub type Rank = u8;

/// Maximum representable degree.
pub const MAX_RANK: Rank = u8::MAX;

/// The golden ratio, base of the Fibonacci degree bound.
const PHI: f64 = 1.618_033_988_749_895;

/// Safely increment a degree value, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`.
///
/// # Example
///
/// ```rust
/// use meldable_heaps::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1).expect(
        "rank overflow: degree is bounded by log_phi(n), which stays far below u8::MAX",
    )
}

/// Decrement a degree value, staying at zero.
///
/// # Example
///
/// ```rust
/// use meldable_heaps::rank::{saturating_decrement, Rank};
///
/// let zero: Rank = 0;
/// assert_eq!(saturating_decrement(zero), 0);
/// ```
#[inline]
pub fn saturating_decrement(rank: Rank) -> Rank {
    rank.saturating_sub(1)
}

/// Number of distinct degrees a Fibonacci heap of `len` nodes can hold.
///
/// `floor(log_phi(len)) + 2`, with one slot of headroom for floating point
/// rounding. Consolidation sizes its degree table from this.
///
/// ```rust
/// use meldable_heaps::rank::max_degree;
///
/// assert_eq!(max_degree(0), 2);
/// assert_eq!(max_degree(1), 2);
/// assert!(max_degree(1_000_000) < 32);
/// ```
#[inline]
pub fn max_degree(len: usize) -> usize {
    if len <= 1 {
        return 2;
    }
    ((len as f64).ln() / PHI.ln()).floor() as usize + 2
}
