use crate::avl_tree::node::Node;
use crate::avl_tree::tree::{self, NodeArena};
use crate::avl_tree::Error;
use crate::entry::Entry;
use compare::{Compare, Natural};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

/// An ordered map implemented by an arena-allocated AVL tree.
///
/// An AVL tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of the two child subtrees of any node differ by at most one. Nodes live in a slot
/// arena and link to each other by index, including a non-owning parent back-reference, so the
/// map supports sorted bidirectional iteration without auxiliary stacks. The ordering of keys is
/// decided by a comparator implementing a strict weak ordering; by default it is the natural
/// order of `T: Ord`.
///
/// # Examples
///
/// ```
/// use ordered_collections::avl_tree::AvlMap;
///
/// let mut map = AvlMap::new();
/// assert!(map.insert(0, 1));
/// assert!(map.insert(3, 4));
///
/// assert_eq!(map.get(&0), Some(&1));
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
///
/// assert_eq!(map.remove(&0), Some((0, 1)));
/// assert_eq!(map.remove(&1), None);
/// ```
#[derive(Clone)]
pub struct AvlMap<T, U, C = Natural<T>>
where
    C: Compare<T>,
{
    arena: NodeArena<T, U>,
    root: Option<usize>,
    cmp: C,
}

impl<T, U> AvlMap<T, U>
where
    T: Ord,
{
    /// Constructs a new, empty `AvlMap<T, U>` ordered by the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// ```
    pub fn new() -> Self {
        AvlMap::with_cmp(compare::natural())
    }
}

impl<T, U, C> AvlMap<T, U, C>
where
    C: Compare<T>,
{
    /// Constructs a new, empty `AvlMap<T, U, C>` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{natural, Compare};
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::with_cmp(natural().rev());
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// assert_eq!(map.min(), Some(&2));
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        AvlMap {
            arena: NodeArena::new(),
            root: None,
            cmp,
        }
    }

    // Descends from the root and returns the slot of `key`, inserting a new leaf when no equal
    // key exists. The flag reports whether an insertion happened.
    fn insert_entry(&mut self, key: T, value: U) -> (usize, bool) {
        let mut parent = None;
        let mut ordering = Ordering::Equal;
        let mut current = self.root;
        while let Some(index) = current {
            ordering = self.cmp.compare(&key, &self.arena[index].entry.key);
            parent = Some(index);
            current = match ordering {
                Ordering::Less => self.arena[index].left,
                Ordering::Greater => self.arena[index].right,
                Ordering::Equal => return (index, false),
            };
        }
        let new = self.arena.insert(Node::new(key, value, parent));
        match parent {
            None => self.root = Some(new),
            Some(parent) => {
                if ordering == Ordering::Less {
                    self.arena[parent].left = Some(new);
                } else {
                    self.arena[parent].right = Some(new);
                }
            }
        }
        tree::rebalance(&mut self.arena, &mut self.root, Some(new));
        (new, true)
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, the map is
    /// left unchanged and the call returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert!(map.insert(1, "a"));
    /// assert!(!map.insert(1, "b"));
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> bool {
        self.insert_entry(key, value).1
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<(T, U)> {
        let index = tree::find_node(&self.arena, self.root, key, &self.cmp)?;
        let target = match (self.arena[index].left, self.arena[index].right) {
            (Some(_), Some(right)) => {
                // Two children: exchange payloads with the in-order successor, which has no left
                // child, and splice the successor out instead.
                let successor = tree::min_node(&self.arena, right);
                let (node, successor_node) = self.arena.pair_mut(index, successor);
                mem::swap(&mut node.entry, &mut successor_node.entry);
                successor
            }
            _ => index,
        };
        let node = self.splice(target);
        let Entry { key, value } = node.entry;
        Some((key, value))
    }

    // precondition: `index` has at most one child
    fn splice(&mut self, index: usize) -> Node<T, U> {
        let child = self.arena[index].left.or(self.arena[index].right);
        let parent = self.arena[index].parent;
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        match parent {
            None => self.root = child,
            Some(parent) => {
                if self.arena[parent].left == Some(index) {
                    self.arena[parent].left = child;
                } else {
                    self.arena[parent].right = child;
                }
            }
        }
        let node = self.arena.remove(index);
        tree::rebalance(&mut self.arena, &mut self.root, parent);
        node
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&0));
    /// ```
    pub fn contains_key(&self, key: &T) -> bool {
        tree::find_node(&self.arena, self.root, key, &self.cmp).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. Returns
    /// `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn get(&self, key: &T) -> Option<&U> {
        let index = tree::find_node(&self.arena, self.root, key, &self.cmp)?;
        Some(&self.arena[index].entry.value)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() += 1;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &T) -> Option<&mut U> {
        let index = tree::find_node(&self.arena, self.root, key, &self.cmp)?;
        Some(&mut self.arena[index].entry.value)
    }

    /// Returns an immutable reference to the value associated with a particular key, or
    /// `Err(Error::KeyNotFound)` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::{AvlMap, Error};
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&0), Err(Error::KeyNotFound));
    /// ```
    pub fn at(&self, key: &T) -> Result<&U, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with a particular key, or
    /// `Err(Error::KeyNotFound)` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::{AvlMap, Error};
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// *map.at_mut(&1).unwrap() += 1;
    /// assert_eq!(map.at(&1), Ok(&2));
    /// assert_eq!(map.at_mut(&0), Err(Error::KeyNotFound));
    /// ```
    pub fn at_mut(&mut self, key: &T) -> Result<&mut U, Error> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with a particular key, inserting
    /// `(key, U::default())` first if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map: AvlMap<u32, u32> = AvlMap::new();
    /// *map.get_or_insert_default(1) += 5;
    /// *map.get_or_insert_default(1) += 5;
    /// assert_eq!(map.get(&1), Some(&10));
    /// ```
    pub fn get_or_insert_default(&mut self, key: T) -> &mut U
    where
        U: Default,
    {
        let (index, _) = self.insert_entry(key, U::default());
        &mut self.arena[index].entry.value
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree: zero when the map is empty, one for a single element, and
    /// at most `1.44 * log2(len)` plus a constant otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.height(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.height(), 1);
    /// ```
    pub fn height(&self) -> usize {
        tree::height(&self.arena, self.root)
    }

    /// Clears the map, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Exchanges the contents of two maps in constant time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// let mut other = AvlMap::new();
    ///
    /// map.swap(&mut other);
    /// assert!(map.is_empty());
    /// assert_eq!(other.len(), 1);
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.root.map(move |root| {
            let index = tree::min_node(&self.arena, root);
            &self.arena[index].entry.key
        })
    }

    /// Returns the maximum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.root.map(move |root| {
            let index = tree::max_node(&self.arena, root);
            &self.arena[index].entry.key
        })
    }

    /// Returns a cursor positioned at a particular key, or at the end sentinel if such a key does
    /// not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut cursor = map.find(&2);
    /// assert_eq!(cursor.current(), Some((&2, &"b")));
    ///
    /// cursor.move_prev();
    /// assert_eq!(cursor.key(), Some(&1));
    ///
    /// assert_eq!(map.find(&3).current(), None);
    /// ```
    pub fn find(&self, key: &T) -> AvlMapCursor<T, U> {
        AvlMapCursor {
            arena: &self.arena,
            root: self.root,
            current: tree::find_node(&self.arena, self.root, key, &self.cmp),
        }
    }

    /// Returns a cursor positioned at the end sentinel: the logical position one past the maximum
    /// element. Moving it backwards lands on the maximum element, moving it forwards lands on the
    /// minimum element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut cursor = map.cursor();
    /// assert_eq!(cursor.current(), None);
    ///
    /// cursor.move_prev();
    /// assert_eq!(cursor.key(), Some(&2));
    /// ```
    pub fn cursor(&self) -> AvlMapCursor<T, U> {
        AvlMapCursor {
            arena: &self.arena,
            root: self.root,
            current: None,
        }
    }

    /// Applies a function to every key-value pair of the map in ascending key order. The walk
    /// uses an explicit stack, so it works for any tree depth and never recurses.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let mut keys = Vec::new();
    /// map.traverse_ascending(|key, _| keys.push(*key));
    /// assert_eq!(keys, vec![1, 2]);
    /// ```
    pub fn traverse_ascending<F>(&self, mut f: F)
    where
        F: FnMut(&T, &U),
    {
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(index) = current {
                stack.push(index);
                current = self.arena[index].left;
            }
            if let Some(index) = stack.pop() {
                let Entry { ref key, ref value } = self.arena[index].entry;
                f(key, value);
                current = self.arena[index].right;
            }
        }
    }

    /// Applies a function to every key-value pair of the map in descending key order. The walk
    /// uses an explicit stack, so it works for any tree depth and never recurses.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let mut keys = Vec::new();
    /// map.traverse_descending(|key, _| keys.push(*key));
    /// assert_eq!(keys, vec![2, 1]);
    /// ```
    pub fn traverse_descending<F>(&self, mut f: F)
    where
        F: FnMut(&T, &U),
    {
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(index) = current {
                stack.push(index);
                current = self.arena[index].right;
            }
            if let Some(index) = stack.pop() {
                let Entry { ref key, ref value } = self.arena[index].entry;
                f(key, value);
                current = self.arena[index].left;
            }
        }
    }

    /// Applies a function to every key-value pair of the map in level order: the root first, then
    /// its children left to right, and so on. The walk uses an explicit queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut keys = Vec::new();
    /// map.traverse_breadth(|key, _| keys.push(*key));
    /// assert_eq!(keys, vec![2, 1, 3]);
    /// ```
    pub fn traverse_breadth<F>(&self, mut f: F)
    where
        F: FnMut(&T, &U),
    {
        let mut queue = VecDeque::new();
        if let Some(root) = self.root {
            queue.push_back(root);
        }
        while let Some(index) = queue.pop_front() {
            let Entry { ref key, ref value } = self.arena[index].entry;
            f(key, value);
            if let Some(left) = self.arena[index].left {
                queue.push_back(left);
            }
            if let Some(right) = self.arena[index].right {
                queue.push_back(right);
            }
        }
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs in ascending key
    /// order, and yields them in descending order when reversed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &"a")));
    /// assert_eq!(iterator.next(), Some((&2, &"b")));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlMapIter<T, U> {
        AvlMapIter {
            arena: &self.arena,
            next: self.root.map(|root| tree::min_node(&self.arena, root)),
            next_back: self.root.map(|root| tree::max_node(&self.arena, root)),
            remaining: self.len(),
        }
    }

    /// Returns a mutable iterator over the map. The iterator will yield key-value pairs in
    /// ascending key order, with mutable references to the values.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// for (_, value) in &mut map {
    ///     *value += 1;
    /// }
    ///
    /// assert_eq!(map.get(&1), Some(&2));
    /// assert_eq!(map.get(&2), Some(&3));
    /// ```
    pub fn iter_mut(&mut self) -> AvlMapIterMut<T, U> {
        let next = self.root.map(|root| tree::min_node(&self.arena, root));
        let next_back = self.root.map(|root| tree::max_node(&self.arena, root));
        AvlMapIterMut {
            remaining: self.len(),
            arena: &mut self.arena,
            next,
            next_back,
            phantom: PhantomData,
        }
    }
}

impl<T, U, C> IntoIterator for AvlMap<T, U, C>
where
    C: Compare<T>,
{
    type IntoIter = AvlMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        AvlMapIntoIter {
            arena: self.arena,
            current: self.root,
            stack: Vec::new(),
        }
    }
}

impl<'a, T, U, C> IntoIterator for &'a AvlMap<T, U, C>
where
    T: 'a,
    U: 'a,
    C: Compare<T>,
{
    type IntoIter = AvlMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, U, C> IntoIterator for &'a mut AvlMap<T, U, C>
where
    T: 'a,
    U: 'a,
    C: Compare<T>,
{
    type IntoIter = AvlMapIterMut<'a, T, U>;
    type Item = (&'a T, &'a mut U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An owning iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in ascending key order and yields owned
/// key-value pairs, draining the arena with an explicit stack as it goes.
pub struct AvlMapIntoIter<T, U> {
    arena: NodeArena<T, U>,
    current: Option<usize>,
    stack: Vec<usize>,
}

impl<T, U> Iterator for AvlMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.current {
            self.stack.push(index);
            self.current = self.arena[index].left;
        }
        self.stack.pop().map(|index| {
            let node = self.arena.remove(index);
            self.current = node.right;
            let Entry { key, value } = node.entry;
            (key, value)
        })
    }
}

/// An iterator for `AvlMap<T, U>`.
///
/// This iterator steps through the elements of the map by parent links in ascending key order
/// and yields immutable references. It can be reversed to step in descending order.
pub struct AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    arena: &'a NodeArena<T, U>,
    next: Option<usize>,
    next_back: Option<usize>,
    remaining: usize,
}

impl<'a, T, U> Iterator for AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        if self.next == self.next_back {
            self.next = None;
            self.next_back = None;
        } else {
            self.next = tree::successor(self.arena, index);
        }
        self.remaining -= 1;
        let Entry { ref key, ref value } = self.arena[index].entry;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, U> DoubleEndedIterator for AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.next_back?;
        if self.next == self.next_back {
            self.next = None;
            self.next_back = None;
        } else {
            self.next_back = tree::predecessor(self.arena, index);
        }
        self.remaining -= 1;
        let Entry { ref key, ref value } = self.arena[index].entry;
        Some((key, value))
    }
}

impl<'a, T, U> ExactSizeIterator for AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
}

impl<'a, T, U> Clone for AvlMapIter<'a, T, U> {
    fn clone(&self) -> Self {
        AvlMapIter {
            arena: self.arena,
            next: self.next,
            next_back: self.next_back,
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator for `AvlMap<T, U>`.
///
/// This iterator steps through the elements of the map by parent links in ascending key order
/// and yields mutable references to the values.
pub struct AvlMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    arena: *mut NodeArena<T, U>,
    next: Option<usize>,
    next_back: Option<usize>,
    remaining: usize,
    phantom: PhantomData<&'a mut NodeArena<T, U>>,
}

impl<'a, T, U> Iterator for AvlMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a mut U);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        // The pointer was captured from the exclusive borrow of the map and each occupied slot
        // is yielded at most once, so the references handed out never alias.
        unsafe {
            if self.next == self.next_back {
                self.next = None;
                self.next_back = None;
            } else {
                self.next = tree::successor(&*self.arena, index);
            }
            self.remaining -= 1;
            let Entry { ref key, ref mut value } = (&mut *self.arena)[index].entry;
            Some((key, value))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, U> DoubleEndedIterator for AvlMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.next_back?;
        // The pointer was captured from the exclusive borrow of the map and each occupied slot
        // is yielded at most once, so the references handed out never alias.
        unsafe {
            if self.next == self.next_back {
                self.next = None;
                self.next_back = None;
            } else {
                self.next_back = tree::predecessor(&*self.arena, index);
            }
            self.remaining -= 1;
            let Entry { ref key, ref mut value } = (&mut *self.arena)[index].entry;
            Some((key, value))
        }
    }
}

impl<'a, T, U> ExactSizeIterator for AvlMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
}

/// A bidirectional cursor over the elements of an `AvlMap<T, U>`.
///
/// A cursor is either positioned at an element or at the end sentinel, the logical position one
/// past the maximum element. Stepping treats the map as a cycle through the sentinel: moving
/// forwards from the sentinel lands on the minimum element and moving backwards from it lands on
/// the maximum element. Two cursors compare equal when they are positioned at the same node.
#[derive(Debug)]
pub struct AvlMapCursor<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    arena: &'a NodeArena<T, U>,
    root: Option<usize>,
    current: Option<usize>,
}

impl<'a, T, U> AvlMapCursor<'a, T, U> {
    /// Returns the key-value pair the cursor is positioned at, or `None` at the end sentinel.
    pub fn current(&self) -> Option<(&'a T, &'a U)> {
        self.current.map(|index| {
            let Entry { ref key, ref value } = self.arena[index].entry;
            (key, value)
        })
    }

    /// Returns the key the cursor is positioned at, or `None` at the end sentinel.
    pub fn key(&self) -> Option<&'a T> {
        self.current().map(|pair| pair.0)
    }

    /// Returns the value the cursor is positioned at, or `None` at the end sentinel.
    pub fn value(&self) -> Option<&'a U> {
        self.current().map(|pair| pair.1)
    }

    /// Moves the cursor to the next element in ascending key order, or to the end sentinel when
    /// it is positioned at the maximum element.
    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(index) => tree::successor(self.arena, index),
            None => self.root.map(|root| tree::min_node(self.arena, root)),
        };
    }

    /// Moves the cursor to the previous element in ascending key order, or to the end sentinel
    /// when it is positioned at the minimum element.
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(index) => tree::predecessor(self.arena, index),
            None => self.root.map(|root| tree::max_node(self.arena, root)),
        };
    }
}

impl<'a, T, U> Clone for AvlMapCursor<'a, T, U> {
    fn clone(&self) -> Self {
        AvlMapCursor {
            arena: self.arena,
            root: self.root,
            current: self.current,
        }
    }
}

impl<'a, T, U> PartialEq for AvlMapCursor<'a, T, U> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<'a, T, U> Eq for AvlMapCursor<'a, T, U> {}

impl<T, U> Default for AvlMap<T, U>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U, C> fmt::Debug for AvlMap<T, U, C>
where
    T: fmt::Debug,
    U: fmt::Debug,
    C: Compare<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U, C> PartialEq for AvlMap<T, U, C>
where
    T: PartialEq,
    U: PartialEq,
    C: Compare<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U, C> Serialize for AvlMap<T, U, C>
where
    T: Serialize,
    U: Serialize,
    C: Compare<T>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct AvlMapVisitor<T, U>
where
    T: Ord,
{
    marker: PhantomData<AvlMap<T, U>>,
}

impl<'de, T, U> Visitor<'de> for AvlMapVisitor<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    type Value = AvlMap<T, U>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = AvlMap::new();
        while let Some((key, value)) = access.next_entry()? {
            // later occurrences of a key overwrite earlier ones
            if let Some(slot) = map.get_mut(&key) {
                *slot = value;
                continue;
            }
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, T, U> Deserialize<'de> for AvlMap<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AvlMapVisitor {
            marker: PhantomData,
        })
    }
}
