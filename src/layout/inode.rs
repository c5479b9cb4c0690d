// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use alloc::vec::Vec;

// use self mods
use super::Permissions;
use crate::configs::DEFAULT_OWNER;

/// The metadata record of a file or a directory.
/// The inode owns the list of the blocks granted to it,
/// the payload itself lives in the node store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inode {
    /// unique identifier, never reused
    id: u32,
    is_dir: bool,
    permissions: Permissions,
    /// byte size of the payload
    byte_size: usize,
    /// ids of the blocks owned by this inode
    block_ids: Vec<u32>,
    /// creation time in milliseconds
    created: u64,
    /// last modification time in milliseconds
    modified: u64,
    owner: &'static str,
}
impl Inode {
    /// Create a new empty inode
    ///
    /// # Arguments
    /// * id: the unique identifier of the inode
    /// * is_dir: whether the inode is a directory
    /// * permissions: the permission bits of the inode
    /// * now: the creation time
    pub fn new(id: u32, is_dir: bool, permissions: Permissions, now: u64) -> Self {
        Self {
            id,
            is_dir,
            permissions,
            byte_size: 0,
            block_ids: Vec::new(),
            created: now,
            modified: now,
            owner: DEFAULT_OWNER,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline(always)]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    #[inline(always)]
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    #[inline(always)]
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    #[inline(always)]
    pub fn block_ids(&self) -> &[u32] {
        &self.block_ids
    }

    #[inline(always)]
    pub fn block_count(&self) -> u32 {
        self.block_ids.len() as u32
    }

    #[inline(always)]
    pub fn created(&self) -> u64 {
        self.created
    }

    #[inline(always)]
    pub fn modified(&self) -> u64 {
        self.modified
    }

    #[inline(always)]
    pub fn owner(&self) -> &str {
        self.owner
    }

    pub(crate) fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
    }

    /// Record a new payload size, which also counts as a modification
    pub(crate) fn resize(&mut self, byte_size: usize, now: u64) {
        self.byte_size = byte_size;
        self.modified = now;
    }

    /// Append newly granted blocks after the owned ones
    pub(crate) fn extend_block_ids(&mut self, block_ids: Vec<u32>) {
        self.block_ids.extend(block_ids);
    }
}
