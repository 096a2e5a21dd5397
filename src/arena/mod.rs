//! The arena: bulk, append-only storage for one parser scope's AST.
//!
//! This is an index-overlay design (see GLOSSARY in spec.md): every node is
//! a fixed 16-byte [`NodeRecord`] referencing byte offsets into the source
//! and children via compact [`NodeId`]s, never pointers. A formatter walks
//! the arena read-only once parsing finishes.

mod node_kind;
mod side_tables;

pub use node_kind::NodeKind;
pub use side_tables::{
    Attribute, ImportAttribute, PackageAttribute, ParameterAttribute, SideTables,
    TokenRefAttribute, TypeDeclarationAttribute,
};

/// A handle into an [`Arena`]. Indices are assigned in allocation order
/// (post-order with respect to the tree being built); `NodeId::SENTINEL` is
/// the one value no real node ever has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const SENTINEL: NodeId = NodeId(u32::MAX);

    #[inline]
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_sentinel(self) -> bool {
        self.0 == u32::MAX
    }
}

/// Errors surfaced by the arena's own accessors. These indicate a bug in the
/// caller (parser or formatter), never a malformed source file (spec.md §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    ArenaFull { capacity: usize },
    InvalidNodeId { id: u32, valid_range: std::ops::Range<u32> },
}

impl std::fmt::Display for ArenaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArenaFull { capacity } => {
                write!(f, "arena is full (capacity {capacity})")
            }
            Self::InvalidNodeId { id, valid_range } => write!(
                f,
                "invalid node id {id} (valid range {}..{})",
                valid_range.start, valid_range.end
            ),
        }
    }
}

impl std::error::Error for ArenaError {}

/// The fixed-size entry stored per node. Exactly 16 bytes, pinned by the
/// `const _: () = assert!(...)` below: `#[repr(C)]` is used instead of the
/// default Rust layout so the size is a guarantee, not a coincidence of
/// field reordering.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct NodeRecord {
    start_offset: u32,
    length: u32,
    node_kind: u8,
    _padding: [u8; 3],
    /// `-1` means "no parent" (this is the root).
    parent_id: i32,
}

const _: () = assert!(std::mem::size_of::<NodeRecord>() == 16);

/// A read-only view of one node, returned by [`Arena::node`].
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub id: NodeId,
    pub kind: NodeKind,
    pub start: u32,
    pub end: u32,
    pub parent: Option<NodeId>,
    children: &'a [NodeId],
}

impl<'a> NodeView<'a> {
    #[inline]
    pub fn children(&self) -> &'a [NodeId] {
        self.children
    }
}

const BASE_OVERHEAD_BYTES: usize = 64;

/// Bulk, append-only AST storage for one parser scope.
pub struct Arena {
    nodes: Vec<NodeRecord>,
    /// `(start, count)` into `children_flat`, parallel to `nodes`.
    children_index: Vec<(u32, u32)>,
    children_flat: Vec<NodeId>,
    side_tables: SideTables,
    capacity: usize,
}

impl Arena {
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity.min(1 << 20)),
            children_index: Vec::with_capacity(capacity.min(1 << 20)),
            children_flat: Vec::new(),
            side_tables: SideTables::new(),
            capacity,
        }
    }

    /// A capacity scaled linearly from the input size, generous enough that
    /// `ArenaFull` is effectively unreachable on valid inputs (spec.md
    /// §4.3's capacity policy).
    pub fn capacity_for_input_len(input_len: usize) -> usize {
        // Observed: real-world sources allocate well under one node per
        // source byte. A factor of 1 node/byte plus a fixed floor comfortably
        // covers pathological inputs (e.g. deeply nested expressions) too.
        input_len.max(64) + 1024
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn estimated_bytes(&self) -> usize {
        self.nodes.len() * std::mem::size_of::<NodeRecord>()
            + self.children_flat.capacity() * std::mem::size_of::<NodeId>()
            + self.side_tables.estimated_bytes()
            + BASE_OVERHEAD_BYTES
    }

    fn check_id(&self, id: NodeId) -> Result<usize, ArenaError> {
        let idx = id.index() as usize;
        if id.is_sentinel() || idx >= self.nodes.len() {
            return Err(ArenaError::InvalidNodeId {
                id: id.index(),
                valid_range: 0..self.nodes.len() as u32,
            });
        }
        Ok(idx)
    }

    /// Appends a node with no attribute. Fails with [`ArenaError::ArenaFull`]
    /// rather than reallocating past the configured capacity.
    pub fn allocate(&mut self, kind: NodeKind, start: u32, end: u32) -> Result<NodeId, ArenaError> {
        if self.nodes.len() >= self.capacity {
            return Err(ArenaError::ArenaFull {
                capacity: self.capacity,
            });
        }
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            start_offset: start,
            length: end - start,
            node_kind: kind as u8,
            _padding: [0; 3],
            parent_id: -1,
        });
        self.children_index.push((0, 0));
        Ok(id)
    }

    pub fn allocate_with_attr<A: Attribute>(
        &mut self,
        kind: NodeKind,
        start: u32,
        end: u32,
        attr: A,
    ) -> Result<NodeId, ArenaError> {
        let id = self.allocate(kind, start, end)?;
        self.side_tables.insert(id, attr);
        Ok(id)
    }

    /// Records `parent`'s children in source order. `child_ids` must already
    /// exist; this does not itself set each child's `parent_id` (call
    /// [`Arena::set_parent`] for that, per the post-order construction
    /// discipline in spec.md §4.4).
    pub fn attach_children(&mut self, parent: NodeId, child_ids: &[NodeId]) -> Result<(), ArenaError> {
        let parent_idx = self.check_id(parent)?;
        for &child in child_ids {
            self.check_id(child)?;
        }
        let start = self.children_flat.len() as u32;
        self.children_flat.extend_from_slice(child_ids);
        self.children_index[parent_idx] = (start, child_ids.len() as u32);
        Ok(())
    }

    /// `parent` must already exist and must be greater than `child` (children
    /// are always allocated before their parent in this parser).
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), ArenaError> {
        let child_idx = self.check_id(child)?;
        self.check_id(parent)?;
        self.nodes[child_idx].parent_id = parent.index() as i32;
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<NodeView<'_>, ArenaError> {
        let idx = self.check_id(id)?;
        let record = self.nodes[idx];
        let (children_start, children_count) = self.children_index[idx];
        let children =
            &self.children_flat[children_start as usize..(children_start + children_count) as usize];
        let kind = NodeKind::from_u8(record.node_kind).expect("node_kind bit pattern is always valid");
        Ok(NodeView {
            id,
            kind,
            start: record.start_offset,
            end: record.start_offset + record.length,
            parent: if record.parent_id < 0 {
                None
            } else {
                Some(NodeId::new(record.parent_id as u32))
            },
            children,
        })
    }

    pub fn attr<A: Attribute>(&self, id: NodeId) -> Option<&A> {
        self.side_tables.get(id)
    }

    /// Drops all nodes but keeps the backing storage's capacity for reuse.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.children_index.clear();
        self.children_flat.clear();
        self.side_tables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_then_attach_then_set_parent_round_trips() {
        let mut arena = Arena::new(16);
        let child = arena.allocate(NodeKind::Identifier, 0, 4).unwrap();
        let parent = arena.allocate(NodeKind::ClassDeclaration, 0, 10).unwrap();
        arena.attach_children(parent, &[child]).unwrap();
        arena.set_parent(child, parent).unwrap();

        let parent_view = arena.node(parent).unwrap();
        assert_eq!(parent_view.children(), &[child]);
        let child_view = arena.node(child).unwrap();
        assert_eq!(child_view.parent, Some(parent));
    }

    #[test]
    fn post_order_ids_are_strictly_increasing_toward_root() {
        let mut arena = Arena::new(16);
        let a = arena.allocate(NodeKind::Identifier, 0, 1).unwrap();
        let b = arena.allocate(NodeKind::Identifier, 1, 2).unwrap();
        let parent = arena.allocate(NodeKind::Block, 0, 2).unwrap();
        arena.attach_children(parent, &[a, b]).unwrap();
        arena.set_parent(a, parent).unwrap();
        arena.set_parent(b, parent).unwrap();
        assert!(a.index() < parent.index());
        assert!(b.index() < parent.index());
    }

    #[test]
    fn allocate_beyond_capacity_fails_without_corrupting_existing_nodes() {
        let mut arena = Arena::new(1);
        let first = arena.allocate(NodeKind::Identifier, 0, 1).unwrap();
        let err = arena.allocate(NodeKind::Identifier, 1, 2).unwrap_err();
        assert_eq!(err, ArenaError::ArenaFull { capacity: 1 });
        // Existing nodes remain readable, and updates to them still succeed.
        assert!(arena.node(first).is_ok());
    }

    #[test]
    fn invalid_node_id_is_reported_with_range() {
        let arena = Arena::new(4);
        let err = arena.node(NodeId::new(7)).unwrap_err();
        assert_eq!(
            err,
            ArenaError::InvalidNodeId {
                id: 7,
                valid_range: 0..0
            }
        );
    }

    #[test]
    fn sentinel_id_is_always_invalid() {
        let arena = Arena::new(4);
        assert!(arena.node(NodeId::SENTINEL).is_err());
    }

    #[test]
    fn reset_drops_nodes_but_keeps_capacity() {
        let mut arena = Arena::new(4);
        arena.allocate(NodeKind::Identifier, 0, 1).unwrap();
        arena.reset();
        assert_eq!(arena.len(), 0);
        // Capacity budget is unaffected: we can allocate again.
        assert!(arena.allocate(NodeKind::Identifier, 0, 1).is_ok());
    }

    #[test]
    fn estimated_bytes_is_bounded_by_sixteen_bytes_per_node() {
        let mut arena = Arena::new(1000);
        for i in 0..100u32 {
            arena.allocate(NodeKind::Identifier, i, i + 1).unwrap();
        }
        assert!(arena.estimated_bytes() <= 16 * arena.len() + 1024);
    }

    #[test]
    fn attribute_round_trips_through_side_table() {
        let mut arena = Arena::new(4);
        let id = arena
            .allocate_with_attr(
                NodeKind::ClassDeclaration,
                0,
                10,
                TypeDeclarationAttribute {
                    name: "Test".into(),
                },
            )
            .unwrap();
        let attr: &TypeDeclarationAttribute = arena.attr(id).unwrap();
        assert_eq!(attr.name.as_str(), "Test");
    }
}
