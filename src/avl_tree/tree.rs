use crate::arena::SlotArena;
use crate::avl_tree::node::Node;
use compare::Compare;
use std::cmp;
use std::cmp::Ordering;

pub type NodeArena<T, U> = SlotArena<Node<T, U>>;

pub fn height<T, U>(arena: &NodeArena<T, U>, tree: Option<usize>) -> usize {
    match tree {
        None => 0,
        Some(index) => arena[index].height,
    }
}

pub fn update_height<T, U>(arena: &mut NodeArena<T, U>, index: usize) {
    let left = arena[index].left;
    let right = arena[index].right;
    arena[index].height = cmp::max(height(arena, left), height(arena, right)) + 1;
}

pub fn balance_factor<T, U>(arena: &NodeArena<T, U>, index: usize) -> i32 {
    let left = arena[index].left;
    let right = arena[index].right;
    (height(arena, right) as i32) - (height(arena, left) as i32)
}

// precondition: `arena[index].right` is present
pub fn rotate_left<T, U>(
    arena: &mut NodeArena<T, U>,
    root: &mut Option<usize>,
    index: usize,
) -> usize {
    let child = match arena[index].right {
        Some(child) => child,
        None => unreachable!(),
    };
    let inner = arena[child].left;
    arena[index].right = inner;
    if let Some(inner) = inner {
        arena[inner].parent = Some(index);
    }
    let parent = arena[index].parent;
    arena[child].parent = parent;
    match parent {
        None => *root = Some(child),
        Some(parent) => {
            if arena[parent].left == Some(index) {
                arena[parent].left = Some(child);
            } else {
                arena[parent].right = Some(child);
            }
        }
    }
    arena[child].left = Some(index);
    arena[index].parent = Some(child);
    update_height(arena, index);
    update_height(arena, child);
    child
}

// precondition: `arena[index].left` is present
pub fn rotate_right<T, U>(
    arena: &mut NodeArena<T, U>,
    root: &mut Option<usize>,
    index: usize,
) -> usize {
    let child = match arena[index].left {
        Some(child) => child,
        None => unreachable!(),
    };
    let inner = arena[child].right;
    arena[index].left = inner;
    if let Some(inner) = inner {
        arena[inner].parent = Some(index);
    }
    let parent = arena[index].parent;
    arena[child].parent = parent;
    match parent {
        None => *root = Some(child),
        Some(parent) => {
            if arena[parent].left == Some(index) {
                arena[parent].left = Some(child);
            } else {
                arena[parent].right = Some(child);
            }
        }
    }
    arena[child].right = Some(index);
    arena[index].parent = Some(child);
    update_height(arena, index);
    update_height(arena, child);
    child
}

pub fn rebalance<T, U>(arena: &mut NodeArena<T, U>, root: &mut Option<usize>, start: Option<usize>) {
    let mut current = start;
    while let Some(index) = current {
        update_height(arena, index);
        let factor = balance_factor(arena, index);
        let subtree = if factor > 1 {
            let child = match arena[index].right {
                Some(child) => child,
                None => unreachable!(),
            };
            if balance_factor(arena, child) < 0 {
                rotate_right(arena, root, child);
            }
            rotate_left(arena, root, index)
        } else if factor < -1 {
            let child = match arena[index].left {
                Some(child) => child,
                None => unreachable!(),
            };
            if balance_factor(arena, child) > 0 {
                rotate_left(arena, root, child);
            }
            rotate_right(arena, root, index)
        } else {
            index
        };
        current = arena[subtree].parent;
    }
}

// precondition: `index` is an occupied slot
pub fn min_node<T, U>(arena: &NodeArena<T, U>, index: usize) -> usize {
    let mut current = index;
    while let Some(left) = arena[current].left {
        current = left;
    }
    current
}

// precondition: `index` is an occupied slot
pub fn max_node<T, U>(arena: &NodeArena<T, U>, index: usize) -> usize {
    let mut current = index;
    while let Some(right) = arena[current].right {
        current = right;
    }
    current
}

pub fn successor<T, U>(arena: &NodeArena<T, U>, index: usize) -> Option<usize> {
    if let Some(right) = arena[index].right {
        return Some(min_node(arena, right));
    }
    let mut current = index;
    let mut parent = arena[index].parent;
    while let Some(index) = parent {
        if arena[index].left == Some(current) {
            return Some(index);
        }
        current = index;
        parent = arena[index].parent;
    }
    None
}

pub fn predecessor<T, U>(arena: &NodeArena<T, U>, index: usize) -> Option<usize> {
    if let Some(left) = arena[index].left {
        return Some(max_node(arena, left));
    }
    let mut current = index;
    let mut parent = arena[index].parent;
    while let Some(index) = parent {
        if arena[index].right == Some(current) {
            return Some(index);
        }
        current = index;
        parent = arena[index].parent;
    }
    None
}

pub fn find_node<T, U, C>(
    arena: &NodeArena<T, U>,
    tree: Option<usize>,
    key: &T,
    cmp: &C,
) -> Option<usize>
where
    C: Compare<T>,
{
    let mut current = tree;
    while let Some(index) = current {
        match cmp.compare(key, &arena[index].entry.key) {
            Ordering::Less => current = arena[index].left,
            Ordering::Greater => current = arena[index].right,
            Ordering::Equal => return Some(index),
        }
    }
    None
}
