use std::cmp::Ordering;

use super::event::EventId;

/// Binary min-heap of sweep events.
///
/// The ordering depends on the events' geometry, which lives in the event arena, so the
/// comparison is passed in to every operation instead of living on the items.  `Less` means
/// "comes out first".
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: Vec<EventId>,
}

impl EventQueue {
    pub fn new() -> Self {
        return EventQueue{ heap: Vec::new() };
    }

    pub fn with_capacity(capacity: usize) -> Self {
        return EventQueue{ heap: Vec::with_capacity(capacity) };
    }

    pub fn len(&self) -> usize {
        return self.heap.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.heap.is_empty();
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<EventId> {
        return self.heap.first().cloned();
    }

    pub fn push<F>(&mut self, id: EventId, cmp: &F)
    where F: Fn(EventId, EventId) -> Ordering
    {
        self.heap.push(id);
        let last = self.heap.len() - 1;
        self.float_up(last, cmp);
    }

    pub fn pop<F>(&mut self, cmp: &F) -> Option<EventId>
    where F: Fn(EventId, EventId) -> Ordering
    {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        if ! self.heap.is_empty() {
            self.float_down(0, cmp);
        }
        return Some(top);
    }

    /// Restore the heap order after events already in the queue changed in a way that affects
    /// their ordering
    pub fn rebuild<F>(&mut self, cmp: &F)
    where F: Fn(EventId, EventId) -> Ordering
    {
        for i in (0 .. self.heap.len() / 2).rev() {
            self.float_down(i, cmp);
        }
    }

    fn float_up<F>(&mut self, mut curr: usize, cmp: &F)
    where F: Fn(EventId, EventId) -> Ordering
    {
        while curr > 0 {
            let parent = (curr - 1) / 2;
            if cmp(self.heap[parent], self.heap[curr]) != Ordering::Greater {
                break;
            }
            self.heap.swap(parent, curr);
            curr = parent;
        }
    }

    fn float_down<F>(&mut self, mut curr: usize, cmp: &F)
    where F: Fn(EventId, EventId) -> Ordering
    {
        let size = self.heap.len();
        loop {
            let mut child = curr * 2 + 1;
            if child >= size {
                break;
            }
            if child + 1 < size && cmp(self.heap[child + 1], self.heap[child]) == Ordering::Less {
                child += 1;
            }
            if cmp(self.heap[curr], self.heap[child]) != Ordering::Greater {
                break;
            }
            self.heap.swap(curr, child);
            curr = child;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn by_index(a: EventId, b: EventId) -> Ordering {
        a.0.cmp(&b.0)
    }

    #[test]
    fn pops_in_order() {
        let mut queue = EventQueue::new();
        for &i in [5, 3, 9, 1, 4, 8, 2, 7, 6, 0].iter() {
            queue.push(EventId(i), &by_index);
        }
        assert_eq!(queue.len(), 10);
        assert_eq!(queue.peek(), Some(EventId(0)));

        let mut popped = Vec::new();
        while let Some(id) = queue.pop(&by_index) {
            popped.push(id.0);
        }
        assert_eq!(popped, (0 .. 10).collect::<Vec<_>>());
        assert!(queue.is_empty());
    }

    #[test]
    fn rebuild_after_reordering() {
        let mut queue = EventQueue::new();
        for i in 0 .. 8 {
            queue.push(EventId(i), &by_index);
        }
        // Pretend the ordering flipped under us
        let reversed = |a: EventId, b: EventId| b.0.cmp(&a.0);
        queue.rebuild(&reversed);
        let mut popped = Vec::new();
        while let Some(id) = queue.pop(&reversed) {
            popped.push(id.0);
        }
        assert_eq!(popped, (0 .. 8).rev().collect::<Vec<_>>());
    }
}
