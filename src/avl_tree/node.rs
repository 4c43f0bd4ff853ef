use crate::entry::Entry;

/// A struct representing an internal node of an AVL tree.
///
/// Nodes live in a `SlotArena` and refer to each other by slot index. `left` and `right` are the
/// structural links of the tree; `parent` is a non-owning back-reference that must always name the
/// node whose `left` or `right` currently points here, or be `None` for the root.
#[derive(Clone, Debug)]
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub height: usize,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub parent: Option<usize>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U, parent: Option<usize>) -> Self {
        Node {
            entry: Entry { key, value },
            height: 1,
            left: None,
            right: None,
            parent,
        }
    }
}
