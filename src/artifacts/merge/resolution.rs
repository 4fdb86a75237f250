//! Three-way merge of commit trees
//!
//! Each filename in the union of the current (`C`), other (`O`) and split point
//! (`S`) trees is resolved independently from the three versions present:
//!
//! | C | O | S | result |
//! |---|---|---|--------|
//! | yes | no | no | keep C |
//! | yes | no | = C | delete |
//! | yes | no | ≠ C | conflict |
//! | no | yes | no | take O |
//! | no | yes | = O | stay deleted |
//! | no | yes | ≠ O | conflict |
//! | yes | yes | no | keep if C = O, else conflict |
//! | yes | yes | yes | keep if C = O; take O if C = S; keep if O = S; else conflict |
//!
//! A conflicted file is replaced by both versions between conflict markers.
//! Conflicts never abort the merge; they are reported alongside the result.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::BTreeMap;
use tracing::debug;

const CONFLICT_START: &[u8] = b"<<<<<<< HEAD\n";
const CONFLICT_SEPARATOR: &[u8] = b"=======\n";
const CONFLICT_END: &[u8] = b">>>>>>>\n";

/// Outcome for one filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The current version stands, present or absent
    Keep,
    /// The other branch's version replaces the current one
    TakeOther(ObjectId),
    /// The file leaves the tree
    Delete,
    /// Both sides changed the file in different ways
    Conflict,
}

pub fn resolve(
    current: Option<&ObjectId>,
    other: Option<&ObjectId>,
    base: Option<&ObjectId>,
) -> Resolution {
    match (current, other, base) {
        (Some(_), None, None) => Resolution::Keep,
        (Some(current), None, Some(base)) if current == base => Resolution::Delete,
        (Some(_), None, Some(_)) => Resolution::Conflict,

        (None, Some(other), None) => Resolution::TakeOther(other.clone()),
        (None, Some(other), Some(base)) if other == base => Resolution::Keep,
        (None, Some(_), Some(_)) => Resolution::Conflict,

        (Some(current), Some(other), _) if current == other => Resolution::Keep,
        (Some(_), Some(_), None) => Resolution::Conflict,
        (Some(current), Some(other), Some(base)) if current == base => {
            Resolution::TakeOther(other.clone())
        }
        (Some(_), Some(other), Some(base)) if other == base => Resolution::Keep,
        (Some(_), Some(_), Some(_)) => Resolution::Conflict,

        (None, None, _) => Resolution::Keep,
    }
}

/// Content written in place of a conflicted file
pub fn conflict_content(current: Option<&[u8]>, other: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let other = other.unwrap_or_default();

    let mut content = BytesMut::with_capacity(
        CONFLICT_START.len()
            + current.len()
            + CONFLICT_SEPARATOR.len()
            + other.len()
            + CONFLICT_END.len(),
    );
    content.put_slice(CONFLICT_START);
    content.put_slice(current);
    content.put_slice(CONFLICT_SEPARATOR);
    content.put_slice(other);
    content.put_slice(CONFLICT_END);

    content.freeze()
}

/// Result of merging two trees against their split point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeMerge {
    /// The merged tree, conflicted files pointing at their marker content
    pub tree: Tree,
    /// Marker content of every conflicted file, not yet stored
    pub conflicts: BTreeMap<String, Bytes>,
}

impl TreeMerge {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Merge `other` into `current`; `load_content` reads blob content for
    /// conflicted files
    pub fn compute(
        current: &Tree,
        other: &Tree,
        base: &Tree,
        load_content: impl Fn(&ObjectId) -> anyhow::Result<Bytes>,
    ) -> anyhow::Result<Self> {
        let mut tree = current.clone();
        let mut conflicts = BTreeMap::new();

        for name in Tree::union_names(&[current, other, base]) {
            let (current_oid, other_oid) = (current.get(name), other.get(name));
            let resolution = resolve(current_oid, other_oid, base.get(name));
            debug!(file = name, ?resolution, "resolved");

            match resolution {
                Resolution::Keep => {}
                Resolution::TakeOther(oid) => {
                    tree.insert(name.to_string(), oid);
                }
                Resolution::Delete => {
                    tree.remove(name);
                }
                Resolution::Conflict => {
                    let current_content = current_oid.map(|oid| load_content(oid)).transpose()?;
                    let other_content = other_oid.map(|oid| load_content(oid)).transpose()?;
                    let content =
                        conflict_content(current_content.as_deref(), other_content.as_deref());

                    tree.insert(name.to_string(), Blob::new(content.clone()).object_id()?);
                    conflicts.insert(name.to_string(), content);
                }
            }
        }

        Ok(TreeMerge { tree, conflicts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn oid(seed: char) -> ObjectId {
        ObjectId::try_parse(seed.to_string().repeat(40)).unwrap()
    }

    #[rstest]
    #[case::added_on_current(Some('c'), None, None, Resolution::Keep)]
    #[case::deleted_on_other(Some('s'), None, Some('s'), Resolution::Delete)]
    #[case::deleted_on_other_changed_on_current(Some('c'), None, Some('s'), Resolution::Conflict)]
    #[case::added_on_other(None, Some('o'), None, Resolution::TakeOther(oid('o')))]
    #[case::deleted_on_current(None, Some('s'), Some('s'), Resolution::Keep)]
    #[case::deleted_on_current_changed_on_other(None, Some('o'), Some('s'), Resolution::Conflict)]
    #[case::same_addition(Some('x'), Some('x'), None, Resolution::Keep)]
    #[case::different_additions(Some('c'), Some('o'), None, Resolution::Conflict)]
    #[case::unchanged(Some('s'), Some('s'), Some('s'), Resolution::Keep)]
    #[case::same_change(Some('x'), Some('x'), Some('s'), Resolution::Keep)]
    #[case::changed_on_other(Some('s'), Some('o'), Some('s'), Resolution::TakeOther(oid('o')))]
    #[case::changed_on_current(Some('c'), Some('s'), Some('s'), Resolution::Keep)]
    #[case::changed_differently(Some('c'), Some('o'), Some('s'), Resolution::Conflict)]
    #[case::deleted_on_both(None, None, Some('s'), Resolution::Keep)]
    fn resolves_every_combination(
        #[case] current: Option<char>,
        #[case] other: Option<char>,
        #[case] base: Option<char>,
        #[case] expected: Resolution,
    ) {
        let (current, other, base) = (current.map(oid), other.map(oid), base.map(oid));

        assert_eq!(
            resolve(current.as_ref(), other.as_ref(), base.as_ref()),
            expected
        );
    }

    #[test]
    fn conflict_markers_wrap_both_versions() {
        assert_eq!(
            conflict_content(Some(&b"A"[..]), Some(&b"B"[..])),
            Bytes::from_static(b"<<<<<<< HEAD\nA=======\nB>>>>>>>\n")
        );
        assert_eq!(
            conflict_content(None, Some(&b"B\n"[..])),
            Bytes::from_static(b"<<<<<<< HEAD\n=======\nB\n>>>>>>>\n")
        );
    }

    #[test]
    fn merged_tree_records_conflict_digest() {
        let contents = HashMap::from([(oid('c'), Bytes::from("A")), (oid('o'), Bytes::from("B"))]);
        let tree = |entries: &[(&str, char)]| {
            entries
                .iter()
                .map(|(name, seed)| (name.to_string(), oid(*seed)))
                .collect::<Tree>()
        };
        let current = tree(&[("f", 'c'), ("kept", 'k'), ("gone", 's')]);
        let other = tree(&[("f", 'o'), ("kept", 'k'), ("new", 'n')]);
        let base = tree(&[("f", 's'), ("kept", 'k'), ("gone", 's')]);

        let merge = TreeMerge::compute(&current, &other, &base, |oid| {
            contents
                .get(oid)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("unexpected load of {oid}"))
        })
        .unwrap();

        let marker = Bytes::from_static(b"<<<<<<< HEAD\nA=======\nB>>>>>>>\n");
        let marker_oid = Blob::new(marker.clone()).object_id().unwrap();
        let expected = tree(&[("kept", 'k'), ("new", 'n')])
            .into_iter()
            .chain([("f".to_string(), marker_oid)])
            .collect::<Tree>();
        assert_eq!(merge.tree, expected);
        assert_eq!(merge.conflicts, BTreeMap::from([("f".to_string(), marker)]));
        assert!(merge.has_conflicts());
    }
}
