//! Fast, but limited allocator.

use std::mem;
use std::ops::{Index, IndexMut};

#[derive(Clone, Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// Objects are addressed by a plain `usize` index. Removing an object leaves its slot vacant and
/// pushes it onto an intrusive free list, so a later insertion reuses the slot instead of growing
/// the underlying `Vec`. All remaining objects are destroyed when the arena is destroyed. The
/// arena yields both mutable and immutable references to objects and uses no unsafe code.
///
/// # Examples
///
/// ```
/// use ordered_collections::arena::SlotArena;
///
/// let mut arena = SlotArena::new();
///
/// let x = arena.insert(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.remove(x), 2);
/// ```
#[derive(Clone, Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Constructs a new, empty `SlotArena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let arena: SlotArena<u32> = SlotArena::new();
    /// ```
    pub fn new() -> Self {
        SlotArena {
            slots: Vec::new(),
            head: None,
            len: 0,
        }
    }

    /// Inserts an object into the arena and returns the index of its slot. The index stays valid
    /// until the object is removed, regardless of later insertions and removals.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new();
    /// let x = arena.insert(0);
    /// assert_eq!(arena[x], 0);
    /// ```
    pub fn insert(&mut self, value: T) -> usize {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                self.slots.len() - 1
            }
            Some(index) => {
                let vacant_slot = mem::replace(&mut self.slots[index], Slot::Occupied(value));
                match vacant_slot {
                    Slot::Vacant(next_index) => {
                        self.head = next_index;
                        index
                    }
                    Slot::Occupied(_) => panic!("Expected a vacant slot."),
                }
            }
        }
    }

    /// Removes the object at `index` from the arena and returns it. The slot becomes the new head
    /// of the free list.
    ///
    /// # Panics
    ///
    /// Panics if `index` corresponds to an invalid or vacant slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new();
    /// let x = arena.insert(0);
    /// assert_eq!(arena.remove(x), 0);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        match self.slots.get(index) {
            Some(Slot::Occupied(_)) => {}
            Some(Slot::Vacant(_)) => panic!("Error: attempting to remove vacant slot."),
            None => panic!("Error: attempting to remove invalid slot."),
        }
        let old_slot = mem::replace(&mut self.slots[index], Slot::Vacant(self.head.take()));
        self.head = Some(index);
        self.len -= 1;
        match old_slot {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to the object at `index`. Returns `None` if the index does
    /// not correspond to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new();
    /// let x = arena.insert(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        match self.slots.get(index) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object at `index`. Returns `None` if the index does not
    /// correspond to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new();
    /// let x = arena.insert(0);
    /// *arena.get_mut(x).unwrap() = 1;
    /// assert_eq!(arena.get(x), Some(&1));
    /// ```
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns mutable references to the objects at two distinct indices.
    ///
    /// # Panics
    ///
    /// Panics if the indices are equal, or if either corresponds to an invalid or vacant slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new();
    /// let x = arena.insert(0);
    /// let y = arena.insert(1);
    ///
    /// let (a, b) = arena.pair_mut(x, y);
    /// std::mem::swap(a, b);
    ///
    /// assert_eq!(arena[x], 1);
    /// assert_eq!(arena[y], 0);
    /// ```
    pub fn pair_mut(&mut self, first: usize, second: usize) -> (&mut T, &mut T) {
        assert!(first != second, "Error: indices must be distinct.");
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let (front, back) = self.slots.split_at_mut(high);
        let low_value = match front[low] {
            Slot::Occupied(ref mut value) => value,
            Slot::Vacant(_) => panic!("Error: index corresponds to vacant slot."),
        };
        let high_value = match back[0] {
            Slot::Occupied(ref mut value) => value,
            Slot::Vacant(_) => panic!("Error: index corresponds to vacant slot."),
        };
        if first < second {
            (low_value, high_value)
        } else {
            (high_value, low_value)
        }
    }

    /// Returns the number of occupied slots in the arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new();
    /// arena.insert(0);
    /// assert_eq!(arena.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena has no occupied slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let arena: SlotArena<u32> = SlotArena::new();
    /// assert!(arena.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes all objects from the arena and resets the free list.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new();
    /// arena.insert(0);
    /// arena.clear();
    /// assert!(arena.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Index<usize> for SlotArena<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("Error: index out of bounds.")
    }
}

impl<T> IndexMut<usize> for SlotArena<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index).expect("Error: index out of bounds.")
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::SlotArena;

    #[test]
    #[should_panic]
    fn test_remove_invalid_slot() {
        let mut arena: SlotArena<u32> = SlotArena::new();
        arena.remove(0);
    }

    #[test]
    #[should_panic]
    fn test_remove_vacant_slot() {
        let mut arena = SlotArena::new();
        let index = arena.insert(0);
        arena.remove(index);
        arena.remove(index);
    }

    #[test]
    fn test_insert() {
        let mut arena = SlotArena::new();
        assert_eq!(arena.insert(0), 0);
        assert_eq!(arena.insert(0), 1);
        assert_eq!(arena.insert(0), 2);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_remove_reuses_slot() {
        let mut arena = SlotArena::new();
        let index = arena.insert(0);
        assert_eq!(arena.remove(index), 0);
        assert_eq!(arena.insert(1), index);
        assert_eq!(arena[index], 1);
    }

    #[test]
    fn test_free_list_order() {
        let mut arena = SlotArena::new();
        let first = arena.insert(0);
        let second = arena.insert(1);
        arena.remove(first);
        arena.remove(second);
        assert_eq!(arena.insert(2), second);
        assert_eq!(arena.insert(3), first);
    }

    #[test]
    fn test_get() {
        let mut arena = SlotArena::new();
        let index = arena.insert(0);
        assert_eq!(arena.get(index), Some(&0));
        assert_eq!(arena.get(index + 1), None);
    }

    #[test]
    fn test_get_vacant_slot() {
        let mut arena = SlotArena::new();
        let index = arena.insert(0);
        arena.remove(index);
        assert_eq!(arena.get(index), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = SlotArena::new();
        let index = arena.insert(0);
        *arena.get_mut(index).unwrap() = 1;
        assert_eq!(arena.get(index), Some(&1));
    }

    #[test]
    fn test_pair_mut() {
        let mut arena = SlotArena::new();
        let first = arena.insert(0);
        let second = arena.insert(1);

        {
            let (a, b) = arena.pair_mut(second, first);
            assert_eq!(*a, 1);
            assert_eq!(*b, 0);
            *a = 2;
        }

        assert_eq!(arena[second], 2);
    }

    #[test]
    #[should_panic]
    fn test_pair_mut_equal_indices() {
        let mut arena = SlotArena::new();
        let index = arena.insert(0);
        arena.pair_mut(index, index);
    }

    #[test]
    fn test_clear() {
        let mut arena = SlotArena::new();
        arena.insert(0);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.insert(1), 0);
    }
}
