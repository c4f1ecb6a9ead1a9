use std::mem;
use std::num::NonZeroUsize;
use std::ops::{Index, IndexMut};

#[cfg(test)]
use static_assertions::const_assert_eq;

/// An index into a slab
///
/// The index is stored off by one in a `NonZeroUsize` so that `Option<Ptr>` (used for "null"
/// child links) takes no more space than the index itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Ptr(NonZeroUsize);

// We've designed `Ptr` to use as little space as possible to help with cache
#[cfg(test)]
const_assert_eq!(mem::size_of::<Option<Ptr>>(), mem::size_of::<usize>());

impl Ptr {
    #[inline(always)]
    fn from_index(index: usize) -> Self {
        match NonZeroUsize::new(index.wrapping_add(1)) {
            Some(value) => Ptr(value),
            // A `Vec` of non-zero-sized entries can never hold `usize::MAX` items
            None => panic!("bug: slab index overflow"),
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0.get() - 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry<T> {
    Occupied(T),
    /// An item in the free list
    Vacant {
        /// The next entry in the free list or `None` if this is the last entry in the free list
        next: Option<Ptr>,
    },
}

/// An allocation primitive similar to `Vec`, but implemented to reuse space from removed entries.
///
/// Items are kept contiguously in memory, but indexes are not shifted when an individual item is
/// removed. Instead of always pushing items after the previously pushed item, this data structure
/// will reuse space from previously removed entries when possible. This makes removal cheaper than
/// a standard `Vec<T>`.
///
/// Indexing with a `Ptr` to a removed entry is a bug and panics.
#[derive(Debug, Clone)]
pub struct Slab<T> {
    items: Vec<Entry<T>>,
    /// The first entry in the free list or `None` if the free list is empty
    ///
    /// The free list is a linked list stored in `items` that is used as a stack to track which
    /// entries have space that can be reused in calls to `push`.
    free_head: Option<Ptr>,
    /// The length of the free list
    free_len: usize,
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self {
            items: Vec::default(),
            free_head: None,
            free_len: 0,
        }
    }
}

impl<T> Slab<T> {
    /// Creates an empty slab with the specified capacity.
    ///
    /// The slab will be able to hold at least `capacity` elements without reallocating. If
    /// `capacity` is 0, the slab will not allocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns the number of entries in the slab that contain values
    ///
    /// This is the number of items pushed minus the number of items removed
    pub fn len(&self) -> usize {
        self.items.len() - self.free_len
    }

    /// Returns true if the slab is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the slab can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns a reference to the value at `ptr`, or `None` if that entry was removed
    pub fn get(&self, ptr: Ptr) -> Option<&T> {
        match self.items.get(ptr.index())? {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => None,
        }
    }

    /// Returns a mutable reference to the value at `ptr`, or `None` if that entry was removed
    pub fn get_mut(&mut self, ptr: Ptr) -> Option<&mut T> {
        match self.items.get_mut(ptr.index())? {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => None,
        }
    }

    /// Inserts a value into the slab, reusing the most recently removed entry if there is one
    pub fn push(&mut self, value: T) -> Ptr {
        match self.free_head {
            Some(ptr) => {
                let entry = &mut self.items[ptr.index()];
                let next = match entry {
                    Entry::Vacant {next} => *next,
                    Entry::Occupied(_) => unreachable!("bug: free list points at an occupied entry"),
                };

                *entry = Entry::Occupied(value);
                self.free_head = next;
                self.free_len -= 1;

                ptr
            },

            None => {
                let ptr = Ptr::from_index(self.items.len());
                self.items.push(Entry::Occupied(value));

                ptr
            },
        }
    }

    /// Removes the value at `ptr` and returns it. Its space will be reused by a later `push`.
    ///
    /// # Panics
    ///
    /// Panics if the entry at `ptr` was already removed.
    pub fn remove(&mut self, ptr: Ptr) -> T {
        let entry = &mut self.items[ptr.index()];
        if let Entry::Vacant {..} = entry {
            panic!("bug: removed a vacant slab entry");
        }

        let removed = mem::replace(entry, Entry::Vacant {next: self.free_head});
        self.free_head = Some(ptr);
        self.free_len += 1;

        match removed {
            Entry::Occupied(value) => value,
            Entry::Vacant {..} => unreachable!(),
        }
    }

    /// Removes every value from the slab
    ///
    /// Note that this method has no effect on the allocated capacity of the slab.
    pub fn clear(&mut self) {
        self.items.clear();
        self.free_head = None;
        self.free_len = 0;
    }

    /// Reserves capacity for at least `additional` more elements to be inserted in the slab.
    pub fn reserve(&mut self, additional: usize) {
        // Entries on the free list will be reused first
        self.items.reserve(additional.saturating_sub(self.free_len));
    }

    /// Shrinks the capacity of the slab as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
    }
}

impl<T> Index<Ptr> for Slab<T> {
    type Output = T;

    fn index(&self, ptr: Ptr) -> &Self::Output {
        match self.get(ptr) {
            Some(value) => value,
            None => panic!("bug: dangling slab pointer {:?}", ptr),
        }
    }
}

impl<T> IndexMut<Ptr> for Slab<T> {
    fn index_mut(&mut self, ptr: Ptr) -> &mut Self::Output {
        match self.get_mut(ptr) {
            Some(value) => value,
            None => panic!("bug: dangling slab pointer {:?}", ptr),
        }
    }
}
