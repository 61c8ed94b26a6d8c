// ABOUTME: Ordered set of cgroup paths to reclaim.
// ABOUTME: Thin wrapper over Vec<PathBuf>; an empty set is valid.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePathSet(Vec<PathBuf>);

impl ResourcePathSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }
}

impl From<Vec<PathBuf>> for ResourcePathSet {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }
}

impl<'a> IntoIterator for &'a ResourcePathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
