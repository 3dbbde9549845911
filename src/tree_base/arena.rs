use super::handle::NodeId;

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage for tree nodes. Released slots go to a free list and are
/// handed out again by later allocations under a new generation, so handles to
/// the released element stop resolving.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

#[cold]
#[inline(never)]
fn invalid_handle(op: &str, id: NodeId) -> ! {
    panic!("`Arena::{}()` - node {:?} is not allocated", op, id)
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of live elements.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots ever handed out, live or free. Every valid handle
    /// indexes below this.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(element);
            NodeId::new(index, slot.generation)
        } else {
            assert!(
                self.slots.len() <= NodeId::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                NodeId::MAX
            );
            self.slots.push(Slot {
                generation: 0,
                value: Some(element),
            });
            NodeId::new(self.slots.len() - 1, 0)
        }
    }

    #[inline]
    fn slot(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.to_index()) {
            Some(slot) if slot.generation == id.generation() => slot.value.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        match self.slot(id) {
            Some(element) => element,
            None => invalid_handle("get", id),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        match self.slots.get_mut(id.to_index()) {
            Some(Slot {
                generation,
                value: Some(element),
            }) if *generation == id.generation() => element,
            _ => invalid_handle("get_mut", id),
        }
    }

    pub(crate) fn take(&mut self, id: NodeId) -> T {
        let index = id.to_index();
        let element = match self.slots.get_mut(index) {
            Some(slot) if slot.generation == id.generation() => slot.value.take(),
            _ => None,
        };
        match element {
            Some(element) => {
                self.release(index);
                element
            }
            None => invalid_handle("take", id),
        }
    }

    fn release(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        // a slot that wraps around may alias a handle 2^32 releases old
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
    }

    /// Drops every element. Slots are kept and retired so that handles
    /// issued before the clear keep failing; the lowest index is handed out
    /// first afterwards.
    pub(crate) fn clear(&mut self) {
        for index in 0..self.slots.len() {
            if self.slots[index].value.take().is_some() {
                self.slots[index].generation = self.slots[index].generation.wrapping_add(1);
            }
        }
        self.free.clear();
        self.free.extend((0..self.slots.len()).rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_get_take() {
        let mut arena = Arena::new();
        let a = arena.alloc(10);
        let b = arena.alloc(20);
        assert_eq!(arena.len(), 2);
        assert_eq!(*arena.get(a), 10);
        *arena.get_mut(b) += 1;
        assert_eq!(arena.take(b), 21);
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(b));
        assert!(arena.contains(a));
    }

    #[test]
    fn released_slots_are_reused_under_new_generation() {
        let mut arena = Arena::with_capacity(4);
        assert!(arena.capacity() >= 4);
        let a = arena.alloc('a');
        let _b = arena.alloc('b');
        arena.take(a);
        let c = arena.alloc('c');
        assert_eq!(a.to_index(), c.to_index());
        assert_ne!(a, c);
        assert_eq!(*arena.get(c), 'c');
        assert!(!arena.contains(a));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.slot_count(), 2);
    }

    #[test]
    #[should_panic(expected = "is not allocated")]
    fn double_take_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1u8);
        arena.take(a);
        arena.take(a);
    }

    #[test]
    #[should_panic(expected = "is not allocated")]
    fn stale_handle_panics_after_reuse() {
        let mut arena = Arena::new();
        let a = arena.alloc(1u8);
        arena.take(a);
        let _b = arena.alloc(2u8);
        arena.get(a);
    }

    #[test]
    fn clear_empties_and_retires_handles() {
        let mut arena = Arena::new();
        let ids: Vec<_> = (0..16).map(|i| arena.alloc(i)).collect();
        arena.clear();
        assert_eq!(arena.len(), 0);
        let fresh = arena.alloc(99);
        assert_eq!(fresh.to_index(), 0);
        assert!(!arena.contains(ids[0]));
        assert!(ids.iter().all(|&id| !arena.contains(id)));
    }
}
