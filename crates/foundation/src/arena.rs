use crate::handles::Handle;

/// Append-only arena addressed by [`Handle`].
///
/// Items are never removed, so every handle this arena hands out stays valid
/// for its lifetime. Handles from another arena (or a future generation) are
/// rejected by `get` instead of aliasing an unrelated item.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    generation: u32,
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Arena {
            generation: 0,
            items: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            generation: 0,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, v: T) -> Handle {
        self.items.push(v);
        Handle::new((self.items.len() - 1) as u32, self.generation)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        if handle.generation() != self.generation {
            return None;
        }
        self.items.get(handle.index() as usize)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if handle.generation() != self.generation {
            return None;
        }
        self.items.get_mut(handle.index() as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates items in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        let generation = self.generation;
        self.items
            .iter()
            .enumerate()
            .map(move |(idx, item)| (Handle::new(idx as u32, generation), item))
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;
    use crate::handles::Handle;

    #[test]
    fn alloc_returns_sequential_handles() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn unknown_handles_resolve_to_none() {
        let mut arena = Arena::new();
        arena.alloc(1);
        assert_eq!(arena.get(Handle::new(5, 0)), None);
        assert_eq!(arena.get(Handle::new(0, 7)), None);
    }

    #[test]
    fn iter_preserves_allocation_order() {
        let mut arena = Arena::new();
        arena.alloc(10);
        arena.alloc(20);
        let got: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(got, vec![10, 20]);
    }
}
