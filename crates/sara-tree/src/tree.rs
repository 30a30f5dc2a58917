//! The [`RawTree`] k-way tree.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use sara_arena::Arena;
use sara_core::{ByteStore, Ptr, ARENA_SIZE};

use crate::error::TreeError;

/// Link block at the front of every node: 24 bytes of `i64` pointers.
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
struct NodeHeader {
    parent: Ptr,
    first_child: Ptr,
    next_sibling: Ptr,
}

impl NodeHeader {
    fn detached(parent: Ptr) -> Self {
        Self {
            parent,
            first_child: Ptr::NIL,
            next_sibling: Ptr::NIL,
        }
    }
}

const HEADER_BYTES: usize = std::mem::size_of::<NodeHeader>();

/// A k-way tree stored as fixed-size first-child/next-sibling records in
/// arena memory.
///
/// The root is allocated at construction and lives until
/// [`RawTree::deallocate`]. Child lists are sibling chains: a parent
/// points at its first child, each child at the next. Removal detaches a
/// child by index and frees its entire subtree.
///
/// The tree holds only the root pointer; every operation takes the
/// owning [`Arena`], and the same arena must be passed for the tree's
/// whole lifetime.
pub struct RawTree<T> {
    root: Ptr,
    valid: bool,
    _marker: PhantomData<T>,
}

impl<T: Pod> RawTree<T> {
    /// Bytes per node: three links plus the payload.
    pub const NODE_SIZE: usize = HEADER_BYTES + std::mem::size_of::<T>();

    /// Create a tree whose root carries `root_value`.
    pub fn new<S: ByteStore>(arena: &mut Arena<S>, root_value: T) -> Result<Self, TreeError> {
        if Self::NODE_SIZE > ARENA_SIZE {
            return Err(TreeError::PayloadTooLarge {
                size: std::mem::size_of::<T>(),
            });
        }
        let root = arena.alloc(Self::NODE_SIZE)?;
        arena
            .store_mut()
            .write_compound(root, NodeHeader::detached(Ptr::NIL), root_value);
        Ok(Self {
            root,
            valid: true,
            _marker: PhantomData,
        })
    }

    /// Append `value` as the last child of `parent`.
    pub fn add_child<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        parent: Ptr,
        value: T,
    ) -> Result<Ptr, TreeError> {
        self.ensure_valid()?;
        let mut header: NodeHeader = arena.store().read(parent);
        if !header.first_child.is_nil() {
            return self.add_sibling(arena, header.first_child, value);
        }
        let node = self.new_node(arena, parent, value)?;
        header.first_child = node;
        arena.store_mut().write(parent, header);
        Ok(node)
    }

    /// Append `value` at the tail of `node`'s sibling chain.
    pub fn add_sibling<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        node: Ptr,
        value: T,
    ) -> Result<Ptr, TreeError> {
        self.ensure_valid()?;
        let mut cursor = node;
        loop {
            let mut header: NodeHeader = arena.store().read(cursor);
            if header.next_sibling.is_nil() {
                let fresh = self.new_node(arena, header.parent, value)?;
                header.next_sibling = fresh;
                arena.store_mut().write(cursor, header);
                return Ok(fresh);
            }
            cursor = header.next_sibling;
        }
    }

    /// Insert `value` as the child of `parent` at position `index`.
    ///
    /// Existing children from `index` onwards shift one position right.
    /// Fails if the child list is shorter than `index`.
    pub fn insert_child<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        parent: Ptr,
        index: u32,
        value: T,
    ) -> Result<Ptr, TreeError> {
        self.ensure_valid()?;
        let mut parent_header: NodeHeader = arena.store().read(parent);

        if parent_header.first_child.is_nil() {
            if index != 0 {
                return Err(TreeError::IndexOutOfRange { index });
            }
            return self.add_child(arena, parent, value);
        }

        if index == 0 {
            let node = self.new_node(arena, parent, value)?;
            let mut header: NodeHeader = arena.store().read(node);
            header.next_sibling = parent_header.first_child;
            arena.store_mut().write(node, header);
            parent_header.first_child = node;
            arena.store_mut().write(parent, parent_header);
            return Ok(node);
        }

        // Walk to the predecessor of the insertion point.
        let mut cursor = parent_header.first_child;
        let mut position = 1u32;
        loop {
            let mut cursor_header: NodeHeader = arena.store().read(cursor);
            if position == index {
                let node = self.new_node(arena, parent, value)?;
                let mut header: NodeHeader = arena.store().read(node);
                header.next_sibling = cursor_header.next_sibling;
                arena.store_mut().write(node, header);
                cursor_header.next_sibling = node;
                arena.store_mut().write(cursor, cursor_header);
                return Ok(node);
            }
            if cursor_header.next_sibling.is_nil() {
                return Err(TreeError::IndexOutOfRange { index });
            }
            cursor = cursor_header.next_sibling;
            position += 1;
        }
    }

    /// Detach the child of `parent` at position `index` and free its
    /// whole subtree.
    pub fn remove_child<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        parent: Ptr,
        index: u32,
    ) -> Result<(), TreeError> {
        self.ensure_valid()?;
        let mut parent_header: NodeHeader = arena.store().read(parent);
        if parent_header.first_child.is_nil() {
            return Err(TreeError::IndexOutOfRange { index });
        }

        if index == 0 {
            let removed = parent_header.first_child;
            let removed_header: NodeHeader = arena.store().read(removed);
            parent_header.first_child = removed_header.next_sibling;
            arena.store_mut().write(parent, parent_header);
            return self.delete_node(arena, removed);
        }

        // Walk to the left sibling of the victim.
        let mut cursor = parent_header.first_child;
        let mut position = 1u32;
        loop {
            let mut cursor_header: NodeHeader = arena.store().read(cursor);
            if position == index {
                let removed = cursor_header.next_sibling;
                if removed.is_nil() {
                    return Err(TreeError::IndexOutOfRange { index });
                }
                let removed_header: NodeHeader = arena.store().read(removed);
                cursor_header.next_sibling = removed_header.next_sibling;
                arena.store_mut().write(cursor, cursor_header);
                return self.delete_node(arena, removed);
            }
            if cursor_header.next_sibling.is_nil() {
                return Err(TreeError::IndexOutOfRange { index });
            }
            cursor = cursor_header.next_sibling;
            position += 1;
        }
    }

    /// First child of `node`.
    pub fn child<S: ByteStore>(&self, arena: &Arena<S>, node: Ptr) -> Result<Ptr, TreeError> {
        self.ensure_valid()?;
        let header: NodeHeader = arena.store().read(node);
        if header.first_child.is_nil() {
            return Err(TreeError::NoChild { node });
        }
        Ok(header.first_child)
    }

    /// Next sibling of `node`.
    pub fn sibling<S: ByteStore>(&self, arena: &Arena<S>, node: Ptr) -> Result<Ptr, TreeError> {
        self.ensure_valid()?;
        let header: NodeHeader = arena.store().read(node);
        if header.next_sibling.is_nil() {
            return Err(TreeError::NoSibling { node });
        }
        Ok(header.next_sibling)
    }

    /// Next sibling, threading a previous lookup's failure through.
    ///
    /// Lets sibling chains be followed without unwrapping between hops:
    /// `tree.sibling_r(arena, tree.sibling_r(arena, tree.child(arena, p)))`.
    pub fn sibling_r<S: ByteStore>(
        &self,
        arena: &Arena<S>,
        node: Result<Ptr, TreeError>,
    ) -> Result<Ptr, TreeError> {
        self.sibling(arena, node?)
    }

    /// Parent of `node`.
    pub fn parent<S: ByteStore>(&self, arena: &Arena<S>, node: Ptr) -> Result<Ptr, TreeError> {
        self.ensure_valid()?;
        let header: NodeHeader = arena.store().read(node);
        if header.parent.is_nil() {
            return Err(TreeError::NoParent { node });
        }
        Ok(header.parent)
    }

    /// Read the payload of `node`.
    pub fn read_body<S: ByteStore>(&self, arena: &Arena<S>, node: Ptr) -> Result<T, TreeError> {
        self.ensure_valid()?;
        Ok(arena.store().read(node.offset(HEADER_BYTES as i64)))
    }

    /// Overwrite the payload of `node`.
    pub fn write_body<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        node: Ptr,
        value: T,
    ) -> Result<(), TreeError> {
        self.ensure_valid()?;
        arena
            .store_mut()
            .write(node.offset(HEADER_BYTES as i64), value);
        Ok(())
    }

    /// The root node.
    pub fn root(&self) -> Ptr {
        self.root
    }

    /// Whether the tree is usable (not yet deallocated).
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Every node pointer in the tree, in preorder.
    ///
    /// Feed this to [`Arena::scan_and_sweep`] to retain the tree across
    /// a sweep.
    pub fn references<S: ByteStore>(&self, arena: &Arena<S>) -> Vec<Ptr> {
        let mut refs = Vec::new();
        if !self.valid {
            return refs;
        }
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            refs.push(node);
            let header: NodeHeader = arena.store().read(node);
            if !header.next_sibling.is_nil() && node != self.root {
                stack.push(header.next_sibling);
            }
            if !header.first_child.is_nil() {
                stack.push(header.first_child);
            }
        }
        refs
    }

    /// Free the whole tree, root included. The tree refuses to operate
    /// afterwards.
    pub fn deallocate<S: ByteStore>(&mut self, arena: &mut Arena<S>) -> Result<(), TreeError> {
        self.ensure_valid()?;
        let root = self.root;
        self.delete_node(arena, root)?;
        self.root = Ptr::NIL;
        self.valid = false;
        Ok(())
    }

    // ── internals ──────────────────────────────────────────────

    fn ensure_valid(&self) -> Result<(), TreeError> {
        if self.valid {
            Ok(())
        } else {
            Err(TreeError::Invalid)
        }
    }

    /// Allocate a detached node carrying `value` under `parent`.
    fn new_node<S: ByteStore>(
        &mut self,
        arena: &mut Arena<S>,
        parent: Ptr,
        value: T,
    ) -> Result<Ptr, TreeError> {
        let node = arena.alloc(Self::NODE_SIZE)?;
        arena
            .store_mut()
            .write_compound(node, NodeHeader::detached(parent), value);
        Ok(node)
    }

    /// Free `node` and its whole subtree.
    ///
    /// Walks the sibling chain of the node's first child, recursing into
    /// each child's own subtree, then drops the node itself.
    fn delete_node<S: ByteStore>(&mut self, arena: &mut Arena<S>, node: Ptr) -> Result<(), TreeError> {
        let header: NodeHeader = arena.store().read(node);
        let mut child = header.first_child;
        while !child.is_nil() {
            let child_header: NodeHeader = arena.store().read(child);
            self.delete_node(arena, child)?;
            child = child_header.next_sibling;
        }
        arena.deref(node)?;
        Ok(())
    }
}
