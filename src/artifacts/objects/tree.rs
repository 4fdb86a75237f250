//! Commit tree
//!
//! A tree is the full set of tracked files at a commit: an ordered mapping from
//! filename (a `/`-separated path relative to the working directory root) to
//! the blob holding its content. Filenames are unique by construction.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, ObjectId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ObjectId> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: String, oid: ObjectId) -> Option<ObjectId> {
        self.entries.insert(name, oid)
    }

    pub fn remove(&mut self, name: &str) -> Option<ObjectId> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    /// Sorted union of the filenames of all given trees
    pub fn union_names<'t>(trees: &[&'t Tree]) -> BTreeSet<&'t str> {
        trees
            .iter()
            .flat_map(|tree| tree.entries.keys().map(String::as_str))
            .collect()
    }
}

impl FromIterator<(String, ObjectId)> for Tree {
    fn from_iter<T: IntoIterator<Item = (String, ObjectId)>>(iter: T) -> Self {
        Tree {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Tree {
    type Item = (String, ObjectId);
    type IntoIter = std::collections::btree_map::IntoIter<String, ObjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
