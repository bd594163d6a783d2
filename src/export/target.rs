use std::path::{Path, PathBuf};

use super::error::{ExportError, Result};
use crate::graph::{Key, ObjectId};

/// Where one node lands on disk: `parent/name` and `parent/name.json`
///
/// Also carries the nesting depth and the identities of the objects currently
/// being exported above it, which guard against cyclic containment.
#[derive(Debug, Clone)]
pub struct ExportTarget {
    parent: PathBuf,
    name: String,
    depth: usize,
    lineage: Vec<ObjectId>,
}

impl ExportTarget {
    pub fn root(parent: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
            depth: 0,
            lineage: Vec::new(),
        }
    }

    /// Split a destination path into base directory and export name
    pub fn from_destination(destination: &Path) -> Result<Self> {
        let absolute = std::path::absolute(destination)
            .map_err(|e| ExportError::io(destination, e))?;
        let name = absolute
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| *n != "..")
            .ok_or_else(|| ExportError::InvalidDestination(destination.to_path_buf()))?
            .to_string();
        let parent = absolute
            .parent()
            .ok_or_else(|| ExportError::InvalidDestination(destination.to_path_buf()))?
            .to_path_buf();
        Ok(Self::root(parent, name))
    }

    pub fn parent(&self) -> &Path {
        &self.parent
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn content_path(&self) -> PathBuf {
        self.parent.join(&self.name)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.parent.join(format!("{}.json", self.name))
    }

    /// Target for a child stored inside this node's directory
    pub fn child(&self, key: &Key) -> Result<Self> {
        let name = key.to_string();
        if !is_valid_file_name(&name) {
            return Err(ExportError::InvalidName {
                name,
                path: self.content_path(),
            });
        }
        Ok(Self {
            parent: self.content_path(),
            name,
            depth: self.depth + 1,
            lineage: self.lineage.clone(),
        })
    }

    /// Target for a value nested inside this node's metadata
    pub fn nested(&self, key: &Key) -> Self {
        Self {
            parent: self.parent.clone(),
            name: key.to_string(),
            depth: self.depth + 1,
            lineage: self.lineage.clone(),
        }
    }

    /// Record that `id` is being exported here, failing on re-entry or overflow
    pub fn enter(mut self, id: Option<ObjectId>, max_depth: usize) -> Result<Self> {
        if self.depth > max_depth {
            return Err(ExportError::DepthExceeded {
                limit: max_depth,
                path: self.content_path(),
            });
        }
        if let Some(id) = id {
            if self.lineage.contains(&id) {
                return Err(ExportError::Cycle {
                    id,
                    path: self.content_path(),
                });
            }
            self.lineage.push(id);
        }
        Ok(self)
    }
}

fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let target = ExportTarget::root("/tmp/out", "site");
        assert_eq!(target.content_path(), PathBuf::from("/tmp/out/site"));
        assert_eq!(target.metadata_path(), PathBuf::from("/tmp/out/site.json"));

        let child = target.child(&Key::from("front-page")).unwrap();
        assert_eq!(child.content_path(), PathBuf::from("/tmp/out/site/front-page"));
        assert_eq!(child.metadata_path(), PathBuf::from("/tmp/out/site/front-page.json"));
        assert_eq!(child.depth(), 1);
    }

    #[test]
    fn test_integer_key_names() {
        let target = ExportTarget::root("/tmp/out", "site");
        let child = target.child(&Key::Int(3)).unwrap();
        assert_eq!(child.name(), "3");
    }

    #[test]
    fn test_rejects_escaping_names() {
        let target = ExportTarget::root("/tmp/out", "site");
        for bad in ["", ".", "..", "a/b"] {
            let err = target.child(&Key::from(bad)).unwrap_err();
            assert!(matches!(err, ExportError::InvalidName { .. }), "{bad}");
        }
    }

    #[test]
    fn test_enter_detects_cycles() {
        let target = ExportTarget::root("/tmp/out", "site").enter(Some(7), 10).unwrap();
        let child = target.child(&Key::from("loop")).unwrap();
        let err = child.enter(Some(7), 10).unwrap_err();
        assert!(matches!(err, ExportError::Cycle { id: 7, .. }));
    }

    #[test]
    fn test_enter_enforces_depth() {
        let mut target = ExportTarget::root("/tmp/out", "site");
        for i in 0..3 {
            target = target.child(&Key::Int(i)).unwrap();
        }
        assert!(target.clone().enter(None, 3).is_ok());
        assert!(matches!(
            target.enter(None, 2).unwrap_err(),
            ExportError::DepthExceeded { limit: 2, .. }
        ));
    }

    #[test]
    fn test_from_destination() {
        let target = ExportTarget::from_destination(Path::new("/srv/exports/site")).unwrap();
        assert_eq!(target.parent(), Path::new("/srv/exports"));
        assert_eq!(target.name(), "site");
    }
}
