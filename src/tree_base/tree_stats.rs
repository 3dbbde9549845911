/// Node bookkeeping kept alongside a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes currently linked into the tree.
    pub size: usize,
    /// Nodes created through the tree and not yet released.
    pub allocated: usize,
    pub inserts: usize,
    pub deletes: usize,
}

impl TreeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes that were deleted (or never inserted) but not released.
    pub fn detached(&self) -> usize {
        self.allocated - self.size
    }
}
