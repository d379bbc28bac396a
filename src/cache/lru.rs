//! Recency List Module
//!
//! Arena-backed doubly linked list ordering entries by access time.
//!
//! Nodes live in a `Vec` and link to each other by `SlotId`, so handles stay
//! stable while entries move and freed slots are reused. The list ends are
//! `None`; there are no sentinel nodes.
//!
//! ```text
//!   head ─► [id_3] ◄──► [id_0] ◄──► [id_1] ◄── tail
//!           (MRU)                    (LRU)
//! ```
//!
//! `push_front`, `move_to_front`, `remove` and `pop_back` are O(1).

// == Slot Id ==
/// Stable handle to a node in a `RecencyList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

// == Recency List ==
/// Tracks access order for LRU eviction strategy.
///
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Length ==
    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the most recently used node.
    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Handle of the least recently used node.
    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Handle of the node just ahead of `id` (towards the front).
    pub fn prev_id(&self, id: SlotId) -> Option<SlotId> {
        self.node(id).and_then(|node| node.prev)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    // == Push Front ==
    /// Inserts a value at the front (most recent) and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let node = Node {
            value,
            prev: None,
            next: self.head,
        };
        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                SlotId(index)
            }
            None => {
                self.slots.push(Some(node));
                SlotId(self.slots.len() - 1)
            }
        };

        match self.head {
            Some(old_head) => self.set_prev(old_head, Some(id)),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        id
    }

    // == Move To Front ==
    /// Marks a node as recently used. Returns false for a stale handle.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if self.node(id).is_none() {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }

        self.detach(id);
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => self.set_prev(old_head, Some(id)),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        true
    }

    // == Remove ==
    /// Unlinks a node and frees its slot, returning its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.node(id)?;
        self.detach(id);
        let node = self.slots[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.value)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used value.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Clear ==
    /// Drops every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iteration ==
    /// Iterates values from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn node(&self, id: SlotId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn set_prev(&mut self, id: SlotId, prev: Option<SlotId>) {
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, id: SlotId, next: Option<SlotId>) {
        if let Some(node) = self.node_mut(id) {
            node.next = next;
        }
    }

    /// Splices a node out of the chain, leaving its slot occupied.
    fn detach(&mut self, id: SlotId) {
        let (prev, next) = match self.node(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev) => self.set_next(prev, next),
            None => self.head = next,
        }
        match next {
            Some(next) => self.set_prev(next, prev),
            None => self.tail = prev,
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a `RecencyList`.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.current?)?;
        self.current = node.next;
        Some(&node.value)
    }
}
