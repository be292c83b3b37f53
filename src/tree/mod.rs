//! Name trees and number trees.
//!
//! A node is either a leaf holding key/value pairs (`/Names` or `/Nums`) or
//! an intermediate node owning numbered kids (`/Kids`). Every node except
//! the root carries `/Limits [min max]`.
//!
//! Leaves are populated in any order. Entries are sorted once, right before
//! the node is written; duplicate keys keep the value inserted last. Limits
//! are recomputed from the node's content at the same moment, so placeholder
//! limits set while the tree was being built never reach the output.
//!
//! A root filled past the leaf bound is split with
//! [`TreeNode::split_leaves`]: its entries move into numbered kids and the
//! root keeps only `/Kids`.

mod parent_tree;

pub use parent_tree::{ParentTree, MAX_NUMS_ARRAY_SIZE};

use crate::array::Array;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::object::{Identity, Object, PdfObject};
use crate::resolve::ReferenceTable;
use crate::writer::{ObjectNumberAllocator, PdfOutput, WriteContext};
use std::fmt;
use std::io::Write;

/// Key type of a tree.
pub trait TreeKey: Ord + Clone + fmt::Debug {
    /// Dictionary key of the leaf array (`Names` or `Nums`).
    const ENTRIES_KEY: &'static str;

    /// The key as a PDF value.
    fn to_object(&self) -> Object;
}

impl TreeKey for String {
    const ENTRIES_KEY: &'static str = "Names";

    fn to_object(&self) -> Object {
        Object::text(self)
    }
}

impl TreeKey for i64 {
    const ENTRIES_KEY: &'static str = "Nums";

    fn to_object(&self) -> Object {
        Object::Integer(*self)
    }
}

/// A name tree node; keys are written as strings.
pub type NameTreeNode = TreeNode<String>;

/// A number tree node; keys are integers.
pub type NumberTreeNode = TreeNode<i64>;

/// A node of a name or number tree.
#[derive(Debug, Clone)]
pub struct TreeNode<K: TreeKey> {
    identity: Identity,
    entries: Vec<(K, Object)>,
    kids: Vec<TreeNode<K>>,
    limits: Option<Array>,
    root: bool,
    sorted: bool,
}

impl<K: TreeKey> Default for TreeNode<K> {
    fn default() -> Self {
        Self {
            identity: Identity::new(),
            entries: Vec::new(),
            kids: Vec::new(),
            limits: None,
            root: true,
            sorted: true,
        }
    }
}

impl<K: TreeKey> TreeNode<K> {
    /// Create an empty node. It is a root until added to a parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the node is the root of its tree.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Add a key/value pair to this leaf. Order does not matter.
    pub fn add(&mut self, key: K, value: impl Into<Object>) {
        self.entries.push((key, value.into()));
        self.sorted = false;
    }

    /// Look up a key in this leaf. With duplicates, the last insert wins.
    pub fn get(&self, key: &K) -> Option<&Object> {
        self.entries.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Leaf entries, in their current order.
    pub fn entries(&self) -> &[(K, Object)] {
        &self.entries
    }

    /// Number of leaf entries in this node (kids not included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the node has neither entries nor kids.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.kids.is_empty()
    }

    /// Attach a child node.
    pub fn add_kid(&mut self, mut kid: TreeNode<K>) {
        kid.root = false;
        self.kids.push(kid);
    }

    /// Child nodes.
    pub fn kids(&self) -> &[TreeNode<K>] {
        &self.kids
    }

    /// Mutable child nodes.
    pub fn kids_mut(&mut self) -> &mut [TreeNode<K>] {
        &mut self.kids
    }

    /// Current `/Limits` array, if any.
    pub fn limits(&self) -> Option<&Array> {
        self.limits.as_ref()
    }

    /// Replace the `/Limits` array.
    pub fn set_limits(&mut self, limits: Array) {
        self.limits = Some(limits);
    }

    fn limits_mut(&mut self) -> Result<&mut Array> {
        match self.limits.as_mut() {
            Some(limits) if limits.len() == 2 => Ok(limits),
            Some(limits) => Err(Error::illegal_state(format!(
                "Limits array must have exactly 2 entries, found {}",
                limits.len()
            ))),
            None => Err(Error::illegal_state("Limits array is not set")),
        }
    }

    /// Set the smallest key covered by this node.
    pub fn set_lower_limit(&mut self, key: &K) -> Result<()> {
        self.limits_mut()?.set(0, key.to_object())
    }

    /// Set the largest key covered by this node.
    pub fn set_upper_limit(&mut self, key: &K) -> Result<()> {
        self.limits_mut()?.set(1, key.to_object())
    }

    /// Sort leaf entries by key, keeping the last value of duplicate keys.
    ///
    /// Runs once per batch of insertions; repeated calls are no-ops.
    pub fn sort_entries(&mut self) {
        if self.sorted {
            return;
        }
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        let mut unique: Vec<(K, Object)> = Vec::with_capacity(self.entries.len());
        for (key, value) in self.entries.drain(..) {
            match unique.last_mut() {
                Some(last) if last.0 == key => {
                    log::warn!("Duplicate tree key {:?}; keeping the later value", key);
                    last.1 = value;
                },
                _ => unique.push((key, value)),
            }
        }
        self.entries = unique;
        self.sorted = true;
    }

    /// Smallest and largest key in this subtree.
    pub fn key_range(&self) -> Option<(K, K)> {
        let mut range: Option<(K, K)> = None;
        let mut widen = |lo: &K, hi: &K| {
            range = match range.take() {
                None => Some((lo.clone(), hi.clone())),
                Some((min, max)) => Some((
                    if *lo < min { lo.clone() } else { min },
                    if *hi > max { hi.clone() } else { max },
                )),
            };
        };
        for (key, _) in &self.entries {
            widen(key, key);
        }
        for kid in &self.kids {
            if let Some((lo, hi)) = kid.key_range() {
                widen(&lo, &hi);
            }
        }
        range
    }

    /// Sort every leaf and recompute limits, bottom-up.
    pub fn prepare(&mut self) -> Result<()> {
        for kid in &mut self.kids {
            kid.prepare()?;
        }
        self.sort_entries();
        if self.root {
            return Ok(());
        }
        if let Some((lo, hi)) = self.key_range() {
            if self.limits.is_none() {
                self.limits = Some(Array::from(vec![lo.to_object(), hi.to_object()]));
            } else {
                self.set_lower_limit(&lo)?;
                self.set_upper_limit(&hi)?;
            }
        }
        Ok(())
    }

    /// Move the entries of an oversized leaf into kids of at most `bound`
    /// entries each and return the number of kids created.
    ///
    /// Entries are sorted first, so the partition only depends on the key
    /// set. Each new kid is numbered and registered for the trailer phase.
    /// A node that already has kids, or fits within `bound`, is left as is.
    pub fn split_leaves(&mut self, alloc: &mut ObjectNumberAllocator, bound: usize) -> Result<usize> {
        if bound == 0 {
            return Err(Error::illegal_argument("Tree leaf bound must be at least 1"));
        }
        self.sort_entries();
        if !self.kids.is_empty() || self.entries.len() <= bound {
            return Ok(0);
        }
        let entries = std::mem::take(&mut self.entries);
        let mut created = 0;
        let mut chunks = entries.into_iter().peekable();
        while chunks.peek().is_some() {
            let mut leaf = TreeNode::new();
            leaf.entries = chunks.by_ref().take(bound).collect();
            let reference = alloc.assign_object(&mut leaf)?;
            alloc.register_trailer(reference);
            self.add_kid(leaf);
            created += 1;
        }
        log::debug!("Split tree leaf into {} kids of at most {} entries", created, bound);
        Ok(created)
    }

    /// Number every unnumbered node below this one.
    pub fn number_kids(&mut self, alloc: &mut ObjectNumberAllocator) -> Result<()> {
        for kid in &mut self.kids {
            if !kid.has_object_number() {
                alloc.assign(&mut kid.identity)?;
            }
            kid.number_kids(alloc)?;
        }
        Ok(())
    }

    /// The node dictionary as it will be written.
    pub fn to_dictionary(&self) -> Result<Dictionary> {
        let mut dict = Dictionary::new();
        if !self.kids.is_empty() {
            let mut kids = Array::with_capacity(self.kids.len());
            for kid in &self.kids {
                kids.push(Object::Reference(kid.reference()?));
            }
            dict.put("Kids", kids);
        }
        if !self.entries.is_empty() || self.kids.is_empty() {
            let mut flat = Array::with_capacity(self.entries.len() * 2);
            for (key, value) in &self.entries {
                flat.push(key.to_object());
                flat.push(value.clone());
            }
            dict.put(K::ENTRIES_KEY, flat);
        }
        if !self.root {
            if let Some(limits) = &self.limits {
                dict.put("Limits", limits.clone());
            }
        }
        Ok(dict)
    }
}

impl<K: TreeKey> PdfObject for TreeNode<K> {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn resolve(&mut self, _refs: &ReferenceTable) -> Result<()> {
        self.prepare()
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        let dict = self.to_dictionary()?;
        ctx.serializer.write_dictionary(w, &dict)
    }

    fn write_children(&mut self, ctx: &WriteContext<'_>, out: &mut PdfOutput<'_>) -> Result<()> {
        for kid in &mut self.kids {
            out.write_object(ctx, kid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ObjectSerializer;

    fn render(node: &mut NameTreeNode) -> String {
        node.prepare().unwrap();
        let dict = node.to_dictionary().unwrap();
        ObjectSerializer::new().serialize_to_string(&dict.into()).unwrap()
    }

    #[test]
    fn test_leaf_sorted_on_prepare() {
        let mut node = NameTreeNode::new();
        node.add("b".to_string(), 2);
        node.add("a".to_string(), 1);
        node.add("c".to_string(), 3);
        assert_eq!(render(&mut node), "<< /Names [(a) 1 (b) 2 (c) 3] >>");
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let mut node = NumberTreeNode::new();
        node.add(5, 1);
        node.add(2, 0);
        node.add(5, 9);
        node.sort_entries();
        assert_eq!(node.entries().len(), 2);
        assert_eq!(node.entries()[1], (5, Object::Integer(9)));
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut node = NameTreeNode::new();
        node.add("z".to_string(), 1);
        node.add("m".to_string(), 2);
        let once = render(&mut node);
        let twice = render(&mut node);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_limits_recomputed_for_kids() {
        let mut alloc = ObjectNumberAllocator::new();
        let mut root = NumberTreeNode::new();
        let mut kid = NumberTreeNode::new();
        kid.set_limits(Array::from(vec![Object::Integer(0), Object::Integer(0)]));
        kid.add(7, 70);
        kid.add(3, 30);
        root.add_kid(kid);
        alloc.assign_object(&mut root).unwrap();
        root.number_kids(&mut alloc).unwrap();
        root.prepare().unwrap();

        let kid = &root.kids()[0];
        assert!(!kid.is_root());
        assert_eq!(
            kid.limits(),
            Some(&Array::from(vec![Object::Integer(3), Object::Integer(7)]))
        );
        let dict = root.to_dictionary().unwrap();
        assert!(dict.get("Limits").is_none());
        assert_eq!(
            dict.get("Kids"),
            Some(&Object::from(vec![Object::Reference(kid.reference().unwrap())]))
        );
    }

    #[test]
    fn test_bad_limits_shape() {
        let mut node = NumberTreeNode::new();
        assert!(matches!(node.set_lower_limit(&1), Err(Error::IllegalState(_))));
        node.set_limits(Array::from(vec![Object::Integer(1)]));
        assert!(matches!(node.set_upper_limit(&4), Err(Error::IllegalState(_))));
    }

    #[test]
    fn test_small_leaf_not_split() {
        let mut alloc = ObjectNumberAllocator::new();
        let mut node = NameTreeNode::new();
        node.add("b".to_string(), 2);
        node.add("a".to_string(), 1);
        assert_eq!(node.split_leaves(&mut alloc, 2).unwrap(), 0);
        assert!(node.kids().is_empty());
        assert_eq!(alloc.count(), 0);
        assert!(matches!(node.split_leaves(&mut alloc, 0), Err(Error::IllegalArgument(_))));
    }

    #[test]
    fn test_unnumbered_kid_cannot_be_referenced() {
        let mut root = NameTreeNode::new();
        root.add_kid(NameTreeNode::new());
        assert!(matches!(root.to_dictionary(), Err(Error::IllegalState(_))));
    }
}
