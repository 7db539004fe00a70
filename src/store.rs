use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::shape::{ShapeKind, ShapeRecord};

/// Counter value marking that every id has been handed out. Never used as an id.
const ID_EXHAUSTED: u64 = u64::MAX;

/// In-memory shape list with a persistent, never-reused id counter.
///
/// This is the application's side of the viewer: the canvas only ever sees
/// `store.shapes()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeStore {
    next_id: u64,
    shapes: Vec<ShapeRecord>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            shapes: Vec::new(),
        }
    }

    /// Store seeded with one shape of every kind
    pub fn demo() -> Self {
        let shapes: Vec<ShapeRecord> = ShapeKind::ALL
            .into_iter()
            .zip(1..)
            .map(|(kind, id)| ShapeRecord::new(id, format!("{kind} 1"), kind.as_str()))
            .collect();
        Self {
            next_id: shapes.len() as u64 + 1,
            shapes,
        }
    }

    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    pub fn get(&self, id: u64) -> Option<&ShapeRecord> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Validate and append a new shape, returning the stored record
    pub fn create(&mut self, name: &str, shape_type: &str) -> Result<&ShapeRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewerError::InvalidShape("name must not be empty".into()));
        }
        let kind: ShapeKind = shape_type
            .parse()
            .map_err(|e| ViewerError::InvalidShape(format!("{e}")))?;

        self.push(name.to_string(), kind.as_str().to_string())
    }

    pub fn delete(&mut self, id: u64) -> Option<ShapeRecord> {
        let index = self.shapes.iter().position(|shape| shape.id == id)?;
        Some(self.shapes.remove(index))
    }

    /// Load from disk; a missing file yields an empty store
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(ViewerError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut store: ShapeStore = serde_json::from_str(&text)?;
        // Never hand out an id that is already on disk
        let max_id = store.shapes.iter().map(|s| s.id).max().unwrap_or(0);
        store.next_id = match max_id.checked_add(1) {
            Some(next) => store.next_id.max(next),
            None => {
                log::warn!("{} holds the largest possible id; no new shapes can be created", path.display());
                ID_EXHAUSTED
            }
        };
        log::info!("Loaded {} shapes from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Saved {} shapes to {}", self.len(), path.display());
        Ok(())
    }

    fn push(&mut self, name: String, shape_type: String) -> Result<&ShapeRecord> {
        let id = self.next_id;
        if id == ID_EXHAUSTED {
            return Err(ViewerError::IdsExhausted);
        }
        self.next_id = id + 1;
        self.shapes.push(ShapeRecord {
            id,
            name,
            shape_type,
        });
        Ok(&self.shapes[self.shapes.len() - 1])
    }
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_increasing_ids() {
        let mut store = ShapeStore::new();
        let a = store.create("ball", "sphere").unwrap().id;
        let b = store.create("box", "Cube").unwrap().id;
        assert!(b > a);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b).unwrap().shape_type, "cube");
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = ShapeStore::new();
        let first = store.create("a", "cone").unwrap().id;
        let second = store.create("b", "cone").unwrap().id;
        assert!(store.delete(second).is_some());
        let third = store.create("c", "cone").unwrap().id;
        assert_ne!(third, second);
        assert_ne!(third, first);
        assert!(third > second);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut store = ShapeStore::new();
        assert!(matches!(
            store.create("   ", "sphere"),
            Err(ViewerError::InvalidShape(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_rejects_unknown_type() {
        let mut store = ShapeStore::new();
        assert!(store.create("tomb", "pyramid").is_err());
        assert!(store.create("nothing", "").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_missing_id() {
        let mut store = ShapeStore::demo();
        assert!(store.delete(999).is_none());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_save_and_load_keep_order_and_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapes.json");

        let mut store = ShapeStore::demo();
        let removed = store.delete(4).unwrap().id;
        store.save(&path).unwrap();

        let mut loaded = ShapeStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        let next = loaded.create("again", "cube").unwrap().id;
        assert!(next > removed);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShapeStore::load(&dir.path().join("absent.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_repairs_stale_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapes.json");
        fs::write(
            &path,
            r#"{"next_id": 1, "shapes": [{"id": 10, "name": "x", "type": "cube"}]}"#,
        )
        .unwrap();

        let mut store = ShapeStore::load(&path).unwrap();
        assert_eq!(store.create("y", "cube").unwrap().id, 11);
    }

    #[test]
    fn test_load_with_largest_id_refuses_new_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapes.json");
        fs::write(
            &path,
            r#"{"next_id": 1, "shapes": [{"id": 18446744073709551615, "name": "last", "type": "cube"}]}"#,
        )
        .unwrap();

        let mut store = ShapeStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(matches!(store.create("next", "cube"), Err(ViewerError::IdsExhausted)));
        assert_eq!(store.len(), 1);

        // Deleting the record must not free its id
        store.delete(u64::MAX).unwrap();
        store.save(&path).unwrap();
        let mut reloaded = ShapeStore::load(&path).unwrap();
        assert!(matches!(reloaded.create("next", "cube"), Err(ViewerError::IdsExhausted)));
    }

    #[test]
    fn test_counter_stops_before_largest_id() {
        let mut store = ShapeStore {
            next_id: u64::MAX - 1,
            shapes: Vec::new(),
        };
        assert_eq!(store.create("second to last", "sphere").unwrap().id, u64::MAX - 1);
        assert!(matches!(store.create("one more", "sphere"), Err(ViewerError::IdsExhausted)));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shapes.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(ShapeStore::load(&path), Err(ViewerError::Json(_))));
    }
}
