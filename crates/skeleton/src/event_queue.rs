//! Wavefront event queue: a binary heap over `(time, edge id)` with
//! deferred update/drop requests and O(log n) locate-by-edge.
//!
//! Grounded in `original_source/monos/inc/EventQueue.h`: the propagator
//! mutates many events per step (an edge collapsing changes the events of
//! its neighbors), and re-heapifying after each individual change would be
//! wasteful, so changes are recorded as pending `needs_update`/
//! `needs_dropping` requests and applied in one batch via
//! `process_pending`, mirroring `EventQueue::process_pending_updates`.

use std::collections::{HashMap, HashSet};

/// An event keyed by the id of the wavefront edge it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueueEvent {
    pub time: f64,
    pub edge_id: u32,
}

impl QueueEvent {
    fn key(&self) -> (f64, u32) {
        (self.time, self.edge_id)
    }

    fn less_than(&self, other: &QueueEvent) -> bool {
        self.time < other.time || (self.time == other.time && self.edge_id < other.edge_id)
    }
}

#[derive(Default)]
pub struct EventQueue {
    heap: Vec<QueueEvent>,
    pos_by_edge: HashMap<u32, usize>,
    need_update: Vec<u32>,
    need_dropping: Vec<u32>,
    in_need_update: HashSet<u32>,
    in_need_dropping: HashSet<u32>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Panics (debug builds) if there is a pending update/drop that has not
    /// been applied via [`EventQueue::process_pending`] yet. Matches
    /// `EventQueue::assert_no_pending`, called before every read.
    fn assert_no_pending(&self) {
        debug_assert!(
            self.need_update.is_empty() && self.need_dropping.is_empty(),
            "EventQueue read while updates are pending; call process_pending first"
        );
    }

    pub fn peek(&self) -> Option<&QueueEvent> {
        self.assert_no_pending();
        self.heap.first()
    }

    pub fn pop(&mut self) -> Option<QueueEvent> {
        self.assert_no_pending();
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap[0];
        self.remove_at(0);
        Some(top)
    }

    /// Insert a brand-new event, or reposition an existing one for the same edge.
    pub fn schedule(&mut self, event: QueueEvent) {
        if let Some(&idx) = self.pos_by_edge.get(&event.edge_id) {
            self.heap[idx] = event;
            self.sift(idx);
        } else {
            let idx = self.heap.len();
            self.pos_by_edge.insert(event.edge_id, idx);
            self.heap.push(event);
            self.sift_up(idx);
        }
    }

    pub fn needs_update(&mut self, edge_id: u32) {
        if self.in_need_update.insert(edge_id) {
            self.need_update.push(edge_id);
        }
    }

    pub fn needs_dropping(&mut self, edge_id: u32) {
        if self.in_need_dropping.insert(edge_id) {
            self.need_dropping.push(edge_id);
        }
    }

    /// Apply every pending drop, then recompute and reschedule every pending
    /// update via `recompute`. `recompute` returning `None` drops the edge
    /// instead of rescheduling it.
    pub fn process_pending<F>(&mut self, mut recompute: F)
    where
        F: FnMut(u32) -> Option<QueueEvent>,
    {
        let dropping: Vec<u32> = self.need_dropping.drain(..).collect();
        for edge_id in dropping {
            self.in_need_dropping.remove(&edge_id);
            if let Some(&idx) = self.pos_by_edge.get(&edge_id) {
                self.remove_at(idx);
            }
        }
        let pending: Vec<u32> = self.need_update.drain(..).collect();
        for edge_id in pending {
            self.in_need_update.remove(&edge_id);
            match recompute(edge_id) {
                Some(event) => self.schedule(event),
                None => {
                    if let Some(&idx) = self.pos_by_edge.get(&edge_id) {
                        self.remove_at(idx);
                    }
                }
            }
        }
    }

    fn remove_at(&mut self, idx: usize) {
        let last = self.heap.len() - 1;
        self.pos_by_edge.remove(&self.heap[idx].edge_id);
        if idx != last {
            self.heap.swap(idx, last);
            self.pos_by_edge.insert(self.heap[idx].edge_id, idx);
        }
        self.heap.pop();
        if idx < self.heap.len() {
            self.sift(idx);
        }
    }

    fn sift(&mut self, idx: usize) {
        let after_up = self.sift_up(idx);
        if after_up == idx {
            self.sift_down(idx);
        }
    }

    fn sift_up(&mut self, mut idx: usize) -> usize {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].less_than(&self.heap[parent]) {
                self.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
        idx
    }

    fn sift_down(&mut self, mut idx: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;
            if left < n && self.heap[left].less_than(&self.heap[smallest]) {
                smallest = left;
            }
            if right < n && self.heap[right].less_than(&self.heap[smallest]) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap(idx, smallest);
            idx = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.pos_by_edge.insert(self.heap[a].edge_id, a);
        self.pos_by_edge.insert(self.heap[b].edge_id, b);
    }

    /// Debug invariant: the heap property holds and `pos_by_edge` agrees with `heap`.
    pub fn is_valid_heap(&self) -> bool {
        for (idx, ev) in self.heap.iter().enumerate() {
            if self.pos_by_edge.get(&ev.edge_id) != Some(&idx) {
                return false;
            }
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            if left < self.heap.len() && self.heap[left].less_than(ev) {
                return false;
            }
            if right < self.heap.len() && self.heap[right].less_than(ev) {
                return false;
            }
        }
        true
    }

    #[allow(dead_code)]
    fn min_key(&self) -> Option<(f64, u32)> {
        self.heap.first().map(|e| e.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.schedule(QueueEvent { time: 3.0, edge_id: 1 });
        q.schedule(QueueEvent { time: 1.0, edge_id: 2 });
        q.schedule(QueueEvent { time: 2.0, edge_id: 3 });
        assert!(q.is_valid_heap());
        assert_eq!(q.pop().unwrap().edge_id, 2);
        assert_eq!(q.pop().unwrap().edge_id, 3);
        assert_eq!(q.pop().unwrap().edge_id, 1);
        assert!(q.pop().is_none());
    }

    #[test]
    fn ties_broken_by_edge_id() {
        let mut q = EventQueue::new();
        q.schedule(QueueEvent { time: 1.0, edge_id: 5 });
        q.schedule(QueueEvent { time: 1.0, edge_id: 2 });
        assert_eq!(q.pop().unwrap().edge_id, 2);
        assert_eq!(q.pop().unwrap().edge_id, 5);
    }

    #[test]
    fn schedule_reschedules_same_edge() {
        let mut q = EventQueue::new();
        q.schedule(QueueEvent { time: 5.0, edge_id: 1 });
        q.schedule(QueueEvent { time: 0.5, edge_id: 1 });
        assert_eq!(q.len(), 1);
        assert_eq!(q.peek().unwrap().time, 0.5);
    }

    #[test]
    fn process_pending_drops_and_updates() {
        let mut q = EventQueue::new();
        q.schedule(QueueEvent { time: 1.0, edge_id: 1 });
        q.schedule(QueueEvent { time: 2.0, edge_id: 2 });
        q.needs_dropping(1);
        q.needs_update(2);
        q.process_pending(|edge_id| {
            assert_eq!(edge_id, 2);
            Some(QueueEvent { time: 0.1, edge_id: 2 })
        });
        assert_eq!(q.len(), 1);
        assert_eq!(q.peek().unwrap().edge_id, 2);
        assert_eq!(q.peek().unwrap().time, 0.1);
    }

    #[test]
    fn process_pending_update_returning_none_drops() {
        let mut q = EventQueue::new();
        q.schedule(QueueEvent { time: 1.0, edge_id: 1 });
        q.needs_update(1);
        q.process_pending(|_| None);
        assert!(q.is_empty());
    }
}
