//! Recency List Module
//!
//! Doubly linked list over arena slot indices, used by the store to track
//! access order for LRU eviction.
//!
//! Links are stable `usize` indices into the store's slot arena rather
//! than heap pointers, so every operation is O(1) with no unsafe code:
//! - Front = Most recently used
//! - Back = Least recently used

/// Sentinel index meaning "no link".
const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: usize,
    next: usize,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            prev: NIL,
            next: NIL,
        }
    }
}

// == Recency List ==
/// Tracks access order over arena slot indices.
#[derive(Debug)]
pub struct RecencyList {
    /// Link cells, indexed by slot index
    links: Vec<Link>,
    /// MRU end, NIL when empty
    head: usize,
    /// LRU end, NIL when empty
    tail: usize,
    /// Number of linked slots
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    /// Grows the link arena so `idx` is addressable.
    fn ensure_slot(&mut self, idx: usize) {
        if idx >= self.links.len() {
            self.links.resize(idx + 1, Link::default());
        }
    }

    // == Push Front ==
    /// Links an unlinked slot index at the MRU end.
    pub fn push_front(&mut self, idx: usize) {
        self.ensure_slot(idx);
        self.links[idx] = Link {
            prev: NIL,
            next: self.head,
        };
        if self.head != NIL {
            self.links[self.head].prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
        self.len += 1;
    }

    // == Unlink ==
    /// Removes a linked slot index from the list; neighbours are joined.
    pub fn unlink(&mut self, idx: usize) {
        let Link { prev, next } = self.links[idx];
        if prev != NIL {
            self.links[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.links[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.links[idx] = Link::default();
        self.len -= 1;
    }

    // == Move To Front ==
    /// Marks a linked slot as most recently used.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    // == Pop Back ==
    /// Unlinks and returns the least recently used slot index.
    pub fn pop_back(&mut self) -> Option<usize> {
        if self.tail == NIL {
            return None;
        }
        let idx = self.tail;
        self.unlink(idx);
        Some(idx)
    }

    // == Peek Back ==
    /// Returns the least recently used slot index without unlinking it.
    pub fn back(&self) -> Option<usize> {
        (self.tail != NIL).then_some(self.tail)
    }

    // == Peek Front ==
    /// Returns the most recently used slot index without unlinking it.
    pub fn front(&self) -> Option<usize> {
        (self.head != NIL).then_some(self.head)
    }

    // == Iterate ==
    /// Walks the list from the MRU end to the LRU end.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors((self.head != NIL).then_some(self.head), move |&idx| {
            let next = self.links[idx].next;
            (next != NIL).then_some(next)
        })
    }

    // == Length ==
    /// Returns the number of linked slots.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
