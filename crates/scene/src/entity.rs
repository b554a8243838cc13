use foundation::handles::Handle;

/// Opaque handle to a render primitive in a [`crate::World`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub Handle);

impl PrimitiveId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }
}
