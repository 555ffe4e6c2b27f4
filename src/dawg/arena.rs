//! A chunked arena allocator addressed by compact integer handles.
//!
//! Each arena stores records of a single type in chunks of a fixed number of
//! slots. Chunks are never reallocated, so growing the arena never moves
//! existing records. Slot 0 is reserved so that a handle is never zero, which
//! lets `Option<Handle>` stay four bytes wide.

use std::fmt;
use std::mem;
use std::num::NonZeroU32;

use tracing::debug;

use super::config::Config;

/// A typed index into an [`Arena`].
pub trait ArenaHandle: Copy + Eq + fmt::Debug {
    /// Wraps a slot index.
    fn from_index(index: NonZeroU32) -> Self;

    /// The slot index this handle names.
    fn index(self) -> NonZeroU32;
}

macro_rules! arena_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// The raw slot index.
            #[inline]
            pub fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl ArenaHandle for $name {
            #[inline]
            fn from_index(index: NonZeroU32) -> Self {
                $name(index)
            }

            #[inline]
            fn index(self) -> NonZeroU32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

arena_handle!(
    /// Handle of a node in the node arena.
    NodeHandle
);
arena_handle!(
    /// Handle of a partial edge list record.
    ListHandle
);
arena_handle!(
    /// Handle of a full edge map record.
    MapHandle
);

enum Slot<T> {
    Occupied(T),
    /// A free slot holds the index of the next free slot.
    Vacant(Option<NonZeroU32>),
}

/// A chunked arena that hands out handles to default-initialized records.
pub struct Arena<T, H> {
    chunks: Vec<Vec<Slot<T>>>,
    chunk_capacity: usize,
    max_chunks: usize,
    free_head: Option<NonZeroU32>,
    live: usize,
    _handle: std::marker::PhantomData<fn() -> H>,
}

impl<T: Default, H: ArenaHandle> Arena<T, H> {
    /// Creates an arena sized by `config`, reserving slot 0.
    ///
    /// # Panics
    ///
    /// Panics if `config` does not pass [`Config::validate`].
    pub fn new(config: &Config) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid arena configuration: {err}");
        }
        let mut arena = Arena {
            chunks: Vec::new(),
            chunk_capacity: config.chunk_capacity as usize,
            max_chunks: config.max_chunks as usize,
            free_head: None,
            live: 0,
            _handle: std::marker::PhantomData,
        };
        arena.carve(Slot::Vacant(None));
        arena
    }

    /// Allocates a slot holding `T::default()` and returns its handle.
    ///
    /// The most recently freed slot is reused first. Otherwise a new slot is
    /// carved, allocating a new chunk when the current one is full.
    ///
    /// # Panics
    ///
    /// Panics if a new chunk is needed and the arena already holds the
    /// configured maximum number of chunks.
    pub fn allocate(&mut self) -> H {
        self.live += 1;
        if let Some(head) = self.free_head {
            let slot = self.slot_mut(head);
            let next = match slot {
                Slot::Vacant(next) => *next,
                Slot::Occupied(_) => unreachable!("free list entry {head} is occupied"),
            };
            *slot = Slot::Occupied(T::default());
            self.free_head = next;
            return H::from_index(head);
        }
        let raw = self.carve(Slot::Occupied(T::default()));
        let Some(index) = NonZeroU32::new(raw) else {
            unreachable!("slot 0 is reserved");
        };
        H::from_index(index)
    }

    /// Allocates a slot and stores `value` in it.
    pub fn insert(&mut self, value: T) -> H {
        let handle = self.allocate();
        *self.get_mut(handle) = value;
        handle
    }

    /// Drops the record behind `handle` and puts its slot on the free list.
    ///
    /// The caller guarantees that no other copy of `handle` is used afterwards;
    /// a recycled slot cannot be told apart from the original.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already free.
    pub fn free(&mut self, handle: H) {
        let index = handle.index();
        let next = self.free_head;
        let old = mem::replace(self.slot_mut(index), Slot::Vacant(next));
        assert!(
            matches!(old, Slot::Occupied(_)),
            "double free of {handle:?}"
        );
        self.free_head = Some(index);
        self.live -= 1;
    }

    fn carve(&mut self, slot: Slot<T>) -> u32 {
        let needs_chunk = self
            .chunks
            .last()
            .map_or(true, |chunk| chunk.len() == self.chunk_capacity);
        if needs_chunk {
            assert!(
                self.chunks.len() < self.max_chunks,
                "arena of {} exhausted: {} chunks of {} slots",
                std::any::type_name::<T>(),
                self.max_chunks,
                self.chunk_capacity,
            );
            debug!(
                record = std::any::type_name::<T>(),
                chunk = self.chunks.len(),
                capacity = self.chunk_capacity,
                "arena.chunk.alloc"
            );
            self.chunks.push(Vec::with_capacity(self.chunk_capacity));
        }
        let full_chunks = self.chunks.len() - 1;
        let chunk = self
            .chunks
            .last_mut()
            .expect("a chunk was just ensured");
        let index = full_chunks * self.chunk_capacity + chunk.len();
        chunk.push(slot);
        // The configured capacity never exceeds MAX_HANDLES, so this fits.
        index as u32
    }
}

impl<T, H: ArenaHandle> Arena<T, H> {
    /// Returns the record behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is free or was never carved.
    #[inline]
    pub fn get(&self, handle: H) -> &T {
        match self.slot(handle.index()) {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("dangling handle {handle:?}"),
        }
    }

    /// Returns the record behind `handle` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the slot is free or was never carved.
    #[inline]
    pub fn get_mut(&mut self, handle: H) -> &mut T {
        match self.slot_mut(handle.index()) {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("dangling handle {handle:?}"),
        }
    }

    /// True if `handle` lies within the carved range of this arena.
    ///
    /// This is a range check only: a handle to a freed (or recycled) slot is
    /// still reported valid.
    #[inline]
    pub fn is_valid(&self, handle: H) -> bool {
        (handle.index().get() as usize) < self.slot_count()
    }

    /// Number of slots carved so far, including the reserved slot 0.
    ///
    /// Handles `1..slot_count()` cover every slot the arena has handed out.
    pub fn slot_count(&self) -> usize {
        match self.chunks.last() {
            Some(last) => (self.chunks.len() - 1) * self.chunk_capacity + last.len(),
            None => 0,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True if no records are live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of chunks allocated so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates over the live records in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.iter())
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                Slot::Occupied(value) => {
                    let index = NonZeroU32::new(i as u32)?;
                    Some((H::from_index(index), value))
                }
                Slot::Vacant(_) => None,
            })
    }

    #[inline]
    fn slot(&self, index: NonZeroU32) -> &Slot<T> {
        let i = index.get() as usize;
        &self.chunks[i / self.chunk_capacity][i % self.chunk_capacity]
    }

    #[inline]
    fn slot_mut(&mut self, index: NonZeroU32) -> &mut Slot<T> {
        let i = index.get() as usize;
        &mut self.chunks[i / self.chunk_capacity][i % self.chunk_capacity]
    }
}

impl<T, H> fmt::Debug for Arena<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("record", &std::any::type_name::<T>())
            .field("chunks", &self.chunks.len())
            .field("chunk_capacity", &self.chunk_capacity)
            .field("live", &self.live)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn small(chunk_capacity: u32, max_chunks: u32) -> Arena<u64, NodeHandle> {
        Arena::new(
            &Config::default()
                .with_chunk_capacity(chunk_capacity)
                .with_max_chunks(max_chunks),
        )
    }

    #[test]
    fn slot_zero_is_reserved() {
        let mut arena = small(4, 4);
        assert_eq!(arena.slot_count(), 1);
        assert!(arena.is_empty());
        let h = arena.allocate();
        assert_eq!(h.get(), 1);
        assert_eq!(*arena.get(h), 0);
    }

    #[test]
    fn records_survive_new_chunks() {
        let mut arena = small(4, 8);
        let handles: Vec<NodeHandle> = (0..20u64).map(|i| arena.insert(i * 10)).collect();
        assert_eq!(arena.chunk_count(), 6);
        assert_eq!(arena.slot_count(), 21);
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(*arena.get(*h), i as u64 * 10);
        }
        *arena.get_mut(handles[7]) = 99;
        assert_eq!(*arena.get(handles[7]), 99);
    }

    #[test]
    fn freed_slots_are_reused_last_in_first_out() {
        let mut arena = small(4, 4);
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);
        arena.free(a);
        arena.free(c);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.allocate(), c);
        assert_eq!(arena.allocate(), a);
        assert_eq!(*arena.get(a), 0, "reused slots come back default-initialized");
        assert_eq!(*arena.get(b), 2);
        assert_eq!(arena.slot_count(), 4);
    }

    #[test]
    fn free_drops_the_record() {
        use std::rc::Rc;
        let tracker = Rc::new(());
        let mut arena: Arena<Option<Rc<()>>, ListHandle> = Arena::new(&Config::default());
        let h = arena.insert(Some(Rc::clone(&tracker)));
        assert_eq!(Rc::strong_count(&tracker), 2);
        arena.free(h);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn is_valid_is_a_range_check() {
        let mut arena = small(4, 4);
        let h = arena.allocate();
        assert!(arena.is_valid(h));
        arena.free(h);
        assert!(arena.is_valid(h));
        let beyond = NodeHandle::from_index(NonZeroU32::new(9).unwrap());
        assert!(!arena.is_valid(beyond));
    }

    #[test]
    fn iter_skips_free_slots() {
        let mut arena = small(2, 8);
        let handles: Vec<NodeHandle> = (1..=5u64).map(|i| arena.insert(i)).collect();
        arena.free(handles[1]);
        let live: Vec<(u32, u64)> = arena.iter().map(|(h, v)| (h.get(), *v)).collect();
        assert_eq!(live, [(1, 1), (3, 3), (4, 4), (5, 5)]);
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn capacity_ceiling_is_fatal() {
        let mut arena = small(2, 2);
        for _ in 0..4 {
            arena.allocate();
        }
    }

    #[test]
    #[should_panic(expected = "double free")]
    fn double_free_is_fatal() {
        let mut arena = small(4, 4);
        let h = arena.allocate();
        arena.free(h);
        arena.free(h);
    }

    #[test]
    #[should_panic(expected = "dangling handle")]
    fn freed_handle_cannot_be_read() {
        let mut arena = small(4, 4);
        let h = arena.allocate();
        arena.free(h);
        arena.get(h);
    }
}
