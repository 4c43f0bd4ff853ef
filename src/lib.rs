//! Ordered key-value collections built on an arena-allocated AVL tree with parent-linked nodes.

mod entry;
pub mod arena;
pub mod avl_tree;
