//! Doubly linked list without sentinels, stored in an index arena.
//!
//! `next`/`prev` are plain slot indices; `None` marks a true boundary on
//! either side. The list owns every node, so there are no reference cycles
//! and evicting the head or splicing out a middle node is O(1). Freed
//! slots are recycled by later insertions.

/// Handle to a node inside one [`NodeList`].
///
/// A handle is only meaningful for the list that produced it and only
/// while that node is still linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(usize);

/// One entry of the list.
#[derive(Debug)]
pub struct HistoryNode<T> {
    pub data: T,
    next: Option<NodeRef>,
    prev: Option<NodeRef>,
}

impl<T> HistoryNode<T> {
    pub fn next(&self) -> Option<NodeRef> {
        self.next
    }

    pub fn prev(&self) -> Option<NodeRef> {
        self.prev
    }
}

#[derive(Debug)]
pub struct NodeList<T> {
    slots: Vec<Option<HistoryNode<T>>>,
    free: Vec<usize>,
    head: Option<NodeRef>,
    tail: Option<NodeRef>,
    len: usize,
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<NodeRef> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeRef> {
        self.tail
    }

    pub fn get(&self, at: NodeRef) -> Option<&HistoryNode<T>> {
        self.slots.get(at.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, at: NodeRef) -> Option<&mut HistoryNode<T>> {
        self.slots.get_mut(at.0).and_then(Option::as_mut)
    }

    pub fn data(&self, at: NodeRef) -> Option<&T> {
        self.get(at).map(|node| &node.data)
    }

    pub fn data_mut(&mut self, at: NodeRef) -> Option<&mut T> {
        self.get_mut(at).map(|node| &mut node.data)
    }

    pub fn next(&self, at: NodeRef) -> Option<NodeRef> {
        self.get(at).and_then(|node| node.next)
    }

    pub fn prev(&self, at: NodeRef) -> Option<NodeRef> {
        self.get(at).and_then(|node| node.prev)
    }

    /// The node after `at`, or the head when `at` is `None`.
    pub fn after(&self, at: Option<NodeRef>) -> Option<NodeRef> {
        match at {
            Some(at) => self.next(at),
            None => self.head,
        }
    }

    /// Append at the tail and return the new node's handle.
    pub fn push_back(&mut self, data: T) -> NodeRef {
        let node = HistoryNode {
            data,
            next: None,
            prev: self.tail,
        };
        let at = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                NodeRef(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeRef(self.slots.len() - 1)
            }
        };
        match self.tail.and_then(|tail| self.get_mut(tail)) {
            Some(tail) => tail.next = Some(at),
            None => self.head = Some(at),
        }
        self.tail = Some(at);
        self.len += 1;
        at
    }

    /// Remove and return the oldest entry.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.unlink(head)
    }

    /// Splice `at` out of the list, reconnecting its neighbours.
    pub fn unlink(&mut self, at: NodeRef) -> Option<T> {
        let node = self.slots.get_mut(at.0)?.take()?;
        match node.prev.and_then(|prev| self.get_mut(prev)) {
            Some(prev) => prev.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|next| self.get_mut(next)) {
            Some(next) => next.prev = node.prev,
            None => self.tail = node.prev,
        }
        self.free.push(at.0);
        self.len -= 1;
        Some(node.data)
    }

    /// Drop every node after `at` (the whole list when `at` is `None`) and
    /// return the removed entries, oldest first.
    pub fn truncate_after(&mut self, at: Option<NodeRef>) -> Vec<T> {
        let mut removed = Vec::new();
        while let Some(victim) = self.after(at) {
            match self.unlink(victim) {
                Some(data) => removed.push(data),
                None => break,
            }
        }
        removed
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

/// Head-to-tail iterator over node data.
pub struct Iter<'a, T> {
    list: &'a NodeList<T>,
    cursor: Option<NodeRef>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.data)
    }
}
