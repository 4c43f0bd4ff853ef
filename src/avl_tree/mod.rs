//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one. Nodes are allocated in a slot arena and carry parent back-references,
//! which gives sorted bidirectional iteration without auxiliary stacks.

mod map;
mod node;
mod tree;

pub use self::map::{AvlMap, AvlMapCursor, AvlMapIntoIter, AvlMapIter, AvlMapIterMut};

use std::error;
use std::fmt;

/// The errors of keyed access to an `AvlMap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
        }
    }
}

impl error::Error for Error {}
