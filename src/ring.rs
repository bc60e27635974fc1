//! Recency Ring Module
//!
//! An intrusive circular doubly-linked list tracking access recency for LRU
//! eviction. Entries live in a slot arena (`Vec` with a free list) and the
//! links are slot indices, so there is no cyclic ownership and no unsafe
//! code. All operations are O(1) and touch only the affected slot and its
//! two immediate neighbors.
//!
//! Orientation: `next` walks toward more recently used slots. The `anchor`
//! designates the least recently used slot (the next eviction victim); the
//! newest slot is `anchor.prev`, closing the circle.

/// Sentinel slot index standing in for a null link.
const NIL: usize = usize::MAX;

// == Ring Slot ==
/// One arena slot. `item` is `None` while the slot sits on the free list;
/// a vacant slot reuses `next` as its free-list link.
#[derive(Debug)]
struct Slot<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == Recency Ring ==
/// Circular recency list over an arena of slots.
///
/// Handles returned by [`insert_new`](RecencyRing::insert_new) stay valid
/// until the slot is removed; the owning store is responsible for never
/// using a handle after removal.
#[derive(Debug)]
pub(crate) struct RecencyRing<T> {
    /// Slot arena; removed slots are recycled through the free list.
    slots: Vec<Slot<T>>,
    /// Head of the free list (`NIL` when no vacant slots).
    free_head: usize,
    /// Least recently used slot; `NIL` iff the ring is empty.
    anchor: usize,
    /// Number of live slots.
    len: usize,
}

impl<T> RecencyRing<T> {
    // == Constructor ==
    /// Creates an empty ring with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: NIL,
            anchor: NIL,
            len: 0,
        }
    }

    // == Insert New ==
    /// Inserts `item` as the most recently used slot and returns its handle.
    ///
    /// An empty ring makes the new slot a self-linked singleton and the
    /// anchor. Otherwise the slot is spliced in between the current newest
    /// slot and the anchor; the anchor does not move, since a brand-new
    /// entry is never the eviction victim.
    pub fn insert_new(&mut self, item: T) -> usize {
        let slot = self.alloc(item);

        if self.anchor == NIL {
            self.slots[slot].prev = slot;
            self.slots[slot].next = slot;
            self.anchor = slot;
        } else {
            let oldest = self.anchor;
            let newest = self.slots[oldest].prev;

            self.slots[slot].prev = newest;
            self.slots[slot].next = oldest;
            self.slots[newest].next = slot;
            self.slots[oldest].prev = slot;
        }

        self.len += 1;
        slot
    }

    // == Touch ==
    /// Promotes `handle` to most recently used.
    ///
    /// Touching the anchor is a pure rotation: advancing the anchor one
    /// step leaves the old anchor adjacent to the new one on the newest
    /// side, with no links rewritten. Any other slot is unlinked and
    /// re-spliced next to the anchor.
    pub fn touch(&mut self, handle: usize) {
        if handle == self.anchor {
            self.anchor = self.slots[handle].next;
            return;
        }

        // Unlink from the current position.
        let prev = self.slots[handle].prev;
        let next = self.slots[handle].next;
        self.slots[prev].next = next;
        self.slots[next].prev = prev;

        // Splice back in as the newest slot.
        let oldest = self.anchor;
        let newest = self.slots[oldest].prev;
        self.slots[handle].prev = newest;
        self.slots[handle].next = oldest;
        self.slots[newest].next = handle;
        self.slots[oldest].prev = handle;
    }

    // == Remove ==
    /// Unlinks `handle` from the ring and returns its item.
    ///
    /// Removing the sole member empties the ring. Removing the anchor first
    /// advances it to the next-oldest slot so it keeps designating the
    /// eviction victim.
    pub fn remove(&mut self, handle: usize) -> T {
        let prev = self.slots[handle].prev;
        let next = self.slots[handle].next;

        if next == handle {
            // Sole member.
            self.anchor = NIL;
        } else {
            if self.anchor == handle {
                self.anchor = next;
            }
            self.slots[prev].next = next;
            self.slots[next].prev = prev;
        }

        self.len -= 1;
        let item = self.slots[handle]
            .item
            .take()
            .expect("removed a vacant ring slot");

        // Recycle the slot through the free list.
        self.slots[handle].prev = NIL;
        self.slots[handle].next = self.free_head;
        self.free_head = handle;

        item
    }

    // == Victim ==
    /// Returns the handle of the least recently used slot without removing
    /// it, or `None` if the ring is empty.
    pub fn victim(&self) -> Option<usize> {
        (self.anchor != NIL).then_some(self.anchor)
    }

    // == Get ==
    /// Borrows the item stored at `handle`.
    pub fn get(&self, handle: usize) -> &T {
        self.slots[handle]
            .item
            .as_ref()
            .expect("dereferenced a vacant ring slot")
    }

    // == Slot Allocation ==
    /// Takes a slot off the free list, or grows the arena.
    fn alloc(&mut self, item: T) -> usize {
        if self.free_head != NIL {
            let slot = self.free_head;
            self.free_head = self.slots[slot].next;
            self.slots[slot] = Slot {
                item: Some(item),
                prev: NIL,
                next: NIL,
            };
            slot
        } else {
            self.slots.push(Slot {
                item: Some(item),
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        }
    }

    // == Length (test support) ==
    /// Returns the number of live slots.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    // == Iteration (test support) ==
    /// Walks the ring from the anchor toward more recent slots, visiting
    /// every live item exactly once (oldest first).
    #[cfg(test)]
    pub fn iter(&self) -> RingIter<'_, T> {
        RingIter {
            ring: self,
            cursor: self.anchor,
            remaining: self.len,
        }
    }

    // == Closure Check (test support) ==
    /// Asserts the structural invariants: walking from the anchor via
    /// `next` visits exactly `len` slots before returning to the anchor,
    /// and every link is mirrored by its neighbor.
    #[cfg(test)]
    pub fn assert_closed(&self) {
        if self.anchor == NIL {
            assert_eq!(self.len, 0, "empty ring with non-zero length");
            return;
        }

        let mut visited = 0;
        let mut cursor = self.anchor;

        loop {
            let slot = &self.slots[cursor];
            assert!(slot.item.is_some(), "vacant slot {cursor} linked into ring");
            assert_eq!(
                self.slots[slot.next].prev, cursor,
                "slot {cursor} reachable outward but not inward"
            );
            assert_eq!(
                self.slots[slot.prev].next, cursor,
                "slot {cursor} reachable inward but not outward"
            );

            visited += 1;
            assert!(visited <= self.len, "ring walk does not close");

            cursor = slot.next;
            if cursor == self.anchor {
                break;
            }
        }

        assert_eq!(visited, self.len, "ring walk skipped live slots");
    }
}

// == Ring Iterator ==
#[cfg(test)]
pub(crate) struct RingIter<'a, T> {
    ring: &'a RecencyRing<T>,
    cursor: usize,
    remaining: usize,
}

#[cfg(test)]
impl<'a, T> Iterator for RingIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.ring.get(self.cursor);
        self.cursor = self.ring.slots[self.cursor].next;
        self.remaining -= 1;
        Some(item)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn order(ring: &RecencyRing<&'static str>) -> Vec<&'static str> {
        ring.iter().copied().collect()
    }

    #[test]
    fn test_empty_ring() {
        let ring: RecencyRing<&str> = RecencyRing::with_capacity(4);
        assert_eq!(ring.len(), 0);
        assert!(ring.victim().is_none());
        ring.assert_closed();
    }

    #[test]
    fn test_insert_order_oldest_first() {
        let mut ring = RecencyRing::with_capacity(4);
        let a = ring.insert_new("a");
        ring.insert_new("b");
        ring.insert_new("c");

        ring.assert_closed();
        assert_eq!(order(&ring), vec!["a", "b", "c"]);
        assert_eq!(ring.victim(), Some(a));
    }

    #[test]
    fn test_singleton_insert_is_anchor() {
        let mut ring = RecencyRing::with_capacity(1);
        let a = ring.insert_new("a");
        assert_eq!(ring.victim(), Some(a));
        assert_eq!(ring.len(), 1);
        ring.assert_closed();
    }

    #[test]
    fn test_touch_middle_promotes_to_newest() {
        let mut ring = RecencyRing::with_capacity(4);
        ring.insert_new("a");
        let b = ring.insert_new("b");
        ring.insert_new("c");

        ring.touch(b);
        ring.assert_closed();
        assert_eq!(order(&ring), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_touch_anchor_rotates() {
        let mut ring = RecencyRing::with_capacity(4);
        let a = ring.insert_new("a");
        let b = ring.insert_new("b");
        ring.insert_new("c");

        ring.touch(a);
        ring.assert_closed();
        assert_eq!(order(&ring), vec!["b", "c", "a"]);
        assert_eq!(ring.victim(), Some(b));
    }

    #[test]
    fn test_touch_newest_is_noop() {
        let mut ring = RecencyRing::with_capacity(4);
        ring.insert_new("a");
        ring.insert_new("b");
        let c = ring.insert_new("c");

        ring.touch(c);
        ring.assert_closed();
        assert_eq!(order(&ring), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_touch_singleton() {
        let mut ring = RecencyRing::with_capacity(1);
        let a = ring.insert_new("a");
        ring.touch(a);
        ring.assert_closed();
        assert_eq!(order(&ring), vec!["a"]);
    }

    #[test]
    fn test_remove_middle() {
        let mut ring = RecencyRing::with_capacity(4);
        ring.insert_new("a");
        let b = ring.insert_new("b");
        ring.insert_new("c");

        assert_eq!(ring.remove(b), "b");
        ring.assert_closed();
        assert_eq!(order(&ring), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_anchor_advances_victim() {
        let mut ring = RecencyRing::with_capacity(4);
        let a = ring.insert_new("a");
        let b = ring.insert_new("b");
        ring.insert_new("c");

        assert_eq!(ring.remove(a), "a");
        ring.assert_closed();
        assert_eq!(ring.victim(), Some(b));
        assert_eq!(order(&ring), vec!["b", "c"]);
    }

    #[test]
    fn test_remove_sole_member_empties_ring() {
        let mut ring = RecencyRing::with_capacity(2);
        let a = ring.insert_new("a");
        assert_eq!(ring.remove(a), "a");
        assert_eq!(ring.len(), 0);
        assert!(ring.victim().is_none());
        ring.assert_closed();
    }

    #[test]
    fn test_remove_newest() {
        let mut ring = RecencyRing::with_capacity(4);
        ring.insert_new("a");
        ring.insert_new("b");
        let c = ring.insert_new("c");

        assert_eq!(ring.remove(c), "c");
        ring.assert_closed();
        assert_eq!(order(&ring), vec!["a", "b"]);
    }

    #[test]
    fn test_slot_reuse_after_remove() {
        let mut ring = RecencyRing::with_capacity(2);
        let a = ring.insert_new("a");
        ring.insert_new("b");
        ring.remove(a);

        // The vacated slot is recycled before the arena grows.
        let c = ring.insert_new("c");
        assert_eq!(c, a);
        ring.assert_closed();
        assert_eq!(order(&ring), vec!["b", "c"]);
    }

    #[test]
    fn test_interleaved_churn_keeps_closure() {
        let mut ring = RecencyRing::with_capacity(8);
        let mut handles = Vec::new();

        for item in ["a", "b", "c", "d", "e"] {
            handles.push(ring.insert_new(item));
            ring.assert_closed();
        }

        ring.touch(handles[2]);
        ring.assert_closed();
        ring.remove(handles[0]);
        ring.assert_closed();
        ring.touch(handles[4]);
        ring.assert_closed();
        ring.remove(handles[2]);
        ring.assert_closed();

        assert_eq!(order(&ring), vec!["b", "d", "e"]);
    }
}
