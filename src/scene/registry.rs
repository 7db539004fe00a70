use std::collections::HashMap;
use std::fmt;

/// Opaque identity of one mesh instance; never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(u64);

impl MeshHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Hands out fresh mesh handles
#[derive(Debug, Default)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> MeshHandle {
        let handle = MeshHandle(self.next);
        self.next += 1;
        handle
    }
}

/// Bidirectional shape id <-> mesh handle association
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MeshRegistry {
    by_shape: HashMap<u64, MeshHandle>,
    by_mesh: HashMap<MeshHandle, u64>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pair. Returns `false` and leaves the registry unchanged if
    /// either side is already present.
    pub fn insert(&mut self, shape_id: u64, handle: MeshHandle) -> bool {
        if self.by_shape.contains_key(&shape_id) || self.by_mesh.contains_key(&handle) {
            return false;
        }
        self.by_shape.insert(shape_id, handle);
        self.by_mesh.insert(handle, shape_id);
        true
    }

    pub fn mesh_for(&self, shape_id: u64) -> Option<MeshHandle> {
        self.by_shape.get(&shape_id).copied()
    }

    pub fn shape_for(&self, handle: MeshHandle) -> Option<u64> {
        self.by_mesh.get(&handle).copied()
    }

    pub fn contains_shape(&self, shape_id: u64) -> bool {
        self.by_shape.contains_key(&shape_id)
    }

    pub fn len(&self) -> usize {
        self.by_shape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_shape.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = MeshHandle> + '_ {
        self.by_mesh.keys().copied()
    }

    pub fn shape_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.by_shape.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_never_repeats() {
        let mut alloc = HandleAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn test_lookup_both_directions() {
        let mut alloc = HandleAllocator::new();
        let mut registry = MeshRegistry::new();
        let handle = alloc.allocate();
        assert!(registry.insert(42, handle));
        assert_eq!(registry.mesh_for(42), Some(handle));
        assert_eq!(registry.shape_for(handle), Some(42));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut alloc = HandleAllocator::new();
        let mut registry = MeshRegistry::new();
        let first = alloc.allocate();
        let second = alloc.allocate();
        assert!(registry.insert(1, first));
        assert!(!registry.insert(1, second));
        assert!(!registry.insert(2, first));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.shape_for(second), None);
        assert_eq!(registry.mesh_for(2), None);
    }

    #[test]
    fn test_display_handle() {
        let mut alloc = HandleAllocator::new();
        alloc.allocate();
        assert_eq!(alloc.allocate().to_string(), "mesh#1");
    }
}
