//! Addressable, meldable priority queues for Rust
//!
//! This crate provides heaps supporting `decrease_key` and arbitrary deletion
//! through handles, with O(1) melding that keeps every handle valid.
//!
//! # Features
//!
//! - **Fibonacci Heap**: O(1) amortized insert, decrease_key, and meld; O(log n) amortized delete-min
//! - **Pairing Heap**: O(1) insert and meld; O(log n) amortized delete-min and decrease_key
//! - **Cascading melds**: a heap melded into another forwards its handles, through any
//!   number of further melds
//! - **Custom orders**: each heap may carry its own [`Comparator`]; only heaps with equal
//!   orders can be melded
//!
//! Heaps live in a [`MeldableHeaps`] family that owns the storage of all their
//! elements and hands out [`HeapId`]s and [`Handle`]s.
//!
//! # Example
//!
//! ```rust
//! use meldable_heaps::{FibonacciHeaps, HeapError};
//!
//! let mut heaps: FibonacciHeaps<u32, &str> = FibonacciHeaps::new();
//! let todo = heaps.create_heap();
//! let handle1 = heaps.insert(todo, 5, "item1").unwrap();
//! heaps.insert(todo, 3, "item2").unwrap();
//!
//! heaps.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heaps.peek(todo), Some((&1, &"item1")));
//!
//! assert_eq!(heaps.delete_min(todo), Ok((1, "item1")));
//! assert_eq!(heaps.delete(&handle1), Err(HeapError::InvalidHandle));
//! ```

pub mod compare;
pub mod error;
pub mod fibonacci;
pub mod heaps;
pub mod ownership;
pub mod pairing;
pub mod pathfinding;
pub mod rank;
pub mod storage;
pub mod traits;

pub use compare::{Comparator, FnComparator, ReverseOrder};
pub use error::{ErrorKind, HeapError, InvariantError};
pub use heaps::{FibonacciHeaps, Handle, MeldableHeaps, PairingHeaps};
pub use ownership::HeapId;
pub use traits::Engine;
