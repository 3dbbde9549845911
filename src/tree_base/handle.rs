use std::{fmt, num::NonZeroU32};

/// Stable handle to a node living in a tree's arena.
///
/// A handle pairs a slot index with the generation the slot had when the node
/// was allocated. Releasing a node bumps its slot's generation, so using the
/// old handle panics even after a later node takes over the slot.
///
/// Handles are only meaningful for the tree that created them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: NonZeroU32,
    generation: u32,
}

impl NodeId {
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        assert!(
            index <= Self::MAX,
            "`NodeId::new()` - index {} exceeds NodeId::MAX",
            index
        );
        // index + 1 is never zero and fits in u32 after the check above
        match NonZeroU32::new((index + 1) as u32) {
            Some(raw) => Self {
                index: raw,
                generation,
            },
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) fn to_index(self) -> usize {
        (self.index.get() - 1) as usize
    }

    #[inline]
    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.generation {
            0 => write!(f, "#{}", self.to_index()),
            g => write!(f, "#{}v{}", self.to_index(), g),
        }
    }
}
