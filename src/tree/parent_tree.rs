//! The structure tree's `/ParentTree`.
//!
//! Keys are `/StructParents` values of pages and annotations. The root never
//! holds entries itself: key `k` lands in kid `k / MAX_NUMS_ARRAY_SIZE`,
//! and kids are created on demand up to that bucket.

use super::NumberTreeNode;
use crate::array::Array;
use crate::error::{Error, Result};
use crate::object::{Identity, Object, PdfObject};
use crate::resolve::ReferenceTable;
use crate::writer::{ObjectNumberAllocator, PdfOutput, WriteContext};
use std::io::Write;

/// Maximum number of keys per parent-tree leaf.
pub const MAX_NUMS_ARRAY_SIZE: i64 = 50;

/// Number tree mapping struct-parent keys to structure elements.
#[derive(Debug, Clone, Default)]
pub struct ParentTree {
    node: NumberTreeNode,
}

impl ParentTree {
    /// Create an empty parent tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, creating leaf buckets as needed.
    ///
    /// New buckets are numbered immediately and registered for the trailer
    /// phase. Their limits start as the placeholder `[start start]` and are
    /// corrected when the tree is written.
    pub fn add_to_nums(
        &mut self,
        alloc: &mut ObjectNumberAllocator,
        key: i64,
        value: impl Into<Object>,
    ) -> Result<()> {
        if key < 0 {
            return Err(Error::illegal_argument(format!(
                "Parent tree keys must not be negative: {}",
                key
            )));
        }
        let bucket = (key / MAX_NUMS_ARRAY_SIZE) as usize;
        while self.node.kids().len() <= bucket {
            let start = self.node.kids().len() as i64 * MAX_NUMS_ARRAY_SIZE;
            let mut kid = NumberTreeNode::new();
            kid.set_limits(Array::from(vec![Object::Integer(start), Object::Integer(start)]));
            let reference = alloc.assign_object(&mut kid)?;
            alloc.register_trailer(reference);
            log::debug!("Created parent tree bucket {} as object {}", start, reference.id);
            self.node.add_kid(kid);
        }
        self.node.kids_mut()[bucket].add(key, value);
        Ok(())
    }

    /// Number of leaf buckets.
    pub fn bucket_count(&self) -> usize {
        self.node.kids().len()
    }

    /// The underlying root node.
    pub fn node(&self) -> &NumberTreeNode {
        &self.node
    }

    /// Mutable root node.
    pub fn node_mut(&mut self) -> &mut NumberTreeNode {
        &mut self.node
    }
}

impl PdfObject for ParentTree {
    fn identity(&self) -> &Identity {
        self.node.identity()
    }

    fn identity_mut(&mut self) -> &mut Identity {
        self.node.identity_mut()
    }

    fn resolve(&mut self, refs: &ReferenceTable) -> Result<()> {
        self.node.resolve(refs)
    }

    fn write_body(&mut self, ctx: &WriteContext<'_>, w: &mut dyn Write) -> Result<()> {
        self.node.write_body(ctx, w)
    }

    fn write_children(&mut self, ctx: &WriteContext<'_>, out: &mut PdfOutput<'_>) -> Result<()> {
        self.node.write_children(ctx, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_created_on_demand() {
        let mut alloc = ObjectNumberAllocator::new();
        let mut tree = ParentTree::new();
        tree.add_to_nums(&mut alloc, 120, Object::Null).unwrap();
        assert_eq!(tree.bucket_count(), 3);
        assert_eq!(alloc.trailer_refs().len(), 3);
        assert!(tree.node().kids().iter().all(|k| k.has_object_number()));
        // Placeholder limits before the final pass.
        assert_eq!(
            tree.node().kids()[1].limits(),
            Some(&Array::from(vec![Object::Integer(50), Object::Integer(50)]))
        );
        assert_eq!(tree.node().kids()[2].entries().len(), 1);
    }

    #[test]
    fn test_negative_key_rejected() {
        let mut alloc = ObjectNumberAllocator::new();
        let mut tree = ParentTree::new();
        assert!(matches!(
            tree.add_to_nums(&mut alloc, -1, Object::Null),
            Err(Error::IllegalArgument(_))
        ));
        assert_eq!(alloc.count(), 0);
    }
}
