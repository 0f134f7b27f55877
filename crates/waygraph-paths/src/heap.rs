//! Array-backed binary min-heap with lazy invalidation.
//!
//! The heap never updates or removes an entry in place. A search that finds
//! a cheaper route to a node inserts the node again; the older, more
//! expensive entry stays behind and is discarded by the caller when it is
//! extracted after the node was already finalized.

use waygraph_core::NodeId;

#[derive(Debug, Clone, Copy)]
struct Entry {
    priority: f64,
    id: NodeId,
}

/// Minimum-priority queue over `(id, priority)` pairs.
///
/// The maximum number of simultaneous entries is fixed by
/// [`new`](Self::new); storage grows on demand up to that limit. Duplicate
/// ids are allowed. Ties are not ordered.
#[derive(Debug, Clone, Default)]
pub struct MinHeap {
    data: Vec<Entry>,
    limit: usize,
}

impl MinHeap {
    /// Create an empty heap holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::new(),
            limit: capacity,
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.limit
    }

    /// Raise the maximum number of entries to at least `capacity`.
    pub fn reserve_capacity(&mut self, capacity: usize) {
        self.limit = self.limit.max(capacity);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Priority of the current minimum.
    pub fn peek_priority(&self) -> Option<f64> {
        self.data.first().map(|e| e.priority)
    }

    /// Insert `id` with `priority`. Returns `false`, dropping the entry, if
    /// the heap is full.
    pub fn insert(&mut self, id: NodeId, priority: f64) -> bool {
        if self.data.len() >= self.limit {
            return false;
        }
        let entry = Entry { priority, id };
        let mut i = self.data.len();
        self.data.push(entry);
        while i > 0 {
            let parent = (i - 1) / 2;
            if priority < self.data[parent].priority {
                self.data[i] = self.data[parent];
                i = parent;
            } else {
                break;
            }
        }
        self.data[i] = entry;
        true
    }

    /// Remove and return the id with the smallest priority, or `None` when
    /// empty.
    #[inline]
    pub fn extract_min(&mut self) -> Option<NodeId> {
        self.extract_min_entry().map(|(id, _)| id)
    }

    /// Like [`extract_min`](Self::extract_min), also returning the priority.
    pub fn extract_min_entry(&mut self) -> Option<(NodeId, f64)> {
        let top = *self.data.first()?;
        let last = self.data.pop()?;
        let len = self.data.len();
        if len == 0 {
            return Some((top.id, top.priority));
        }

        // Sift `last` down from the root, preferring the left child on ties.
        let mut i = 0;
        loop {
            let mut child = 2 * i + 1;
            if child >= len {
                break;
            }
            if child + 1 < len && self.data[child + 1].priority < self.data[child].priority {
                child += 1;
            }
            if last.priority <= self.data[child].priority {
                break;
            }
            self.data[i] = self.data[child];
            i = child;
        }
        self.data[i] = last;
        Some((top.id, top.priority))
    }
}
