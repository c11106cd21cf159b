/// Identifies a single source file for the lifetime of a compilation pass.
///
/// Components carry the `FileId` of the file they were declared in so the
/// checker's cross-component visibility rules (same file / same module /
/// directly-imported file) can be decided without re-reading paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}
