// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use alloc::collections::BTreeMap;

// use self mods
use crate::layout::{DirectoryNode, FileNode, Inode, Node, Permissions};
use crate::{Result, VfsError};

fn missing(inode_id: u32) -> VfsError {
    VfsError::NotFound(format!("inode {}", inode_id))
}

/// Owner of every inode record and of the payload stored for it.
/// An id is present in both maps or in neither.
pub struct InodeTable {
    inodes: BTreeMap<u32, Inode>,
    nodes: BTreeMap<u32, Node>,
    /// the id the next allocated inode will get, ids are never reused
    next_inode_id: u32,
}
// as common
impl InodeTable {
    pub fn new() -> Self {
        Self {
            inodes: BTreeMap::new(),
            nodes: BTreeMap::new(),
            next_inode_id: 0,
        }
    }

    /// Create a new inode with an empty payload and return its id.
    ///
    /// # Arguments
    /// * is_dir: allocate a directory when true, otherwise a file
    /// * permissions: the permission bits of the inode
    /// * now: the creation time
    ///
    /// # Returns
    /// * u32: the id of the new inode
    pub fn allocate_inode(&mut self, is_dir: bool, permissions: Permissions, now: u64) -> u32 {
        let inode_id = self.next_inode_id;
        self.next_inode_id += 1;
        self.inodes
            .insert(inode_id, Inode::new(inode_id, is_dir, permissions, now));
        self.nodes.insert(inode_id, Node::empty(is_dir));
        inode_id
    }

    /// Get the inode record
    ///
    /// # Returns
    /// * Ok(&Inode)
    /// * Err(NotFound("inode <id>"))
    pub fn get(&self, inode_id: u32) -> Result<&Inode> {
        self.inodes.get(&inode_id).ok_or_else(|| missing(inode_id))
    }

    pub fn get_mut(&mut self, inode_id: u32) -> Result<&mut Inode> {
        self.inodes.get_mut(&inode_id).ok_or_else(|| missing(inode_id))
    }

    /// Delete the inode record and its payload, both are handed back to the caller
    ///
    /// # Returns
    /// * Ok((Inode, Node))
    /// * Err(NotFound("inode <id>"))
    pub fn remove(&mut self, inode_id: u32) -> Result<(Inode, Node)> {
        if !self.inodes.contains_key(&inode_id) || !self.nodes.contains_key(&inode_id) {
            return Err(missing(inode_id));
        }
        match (self.inodes.remove(&inode_id), self.nodes.remove(&inode_id)) {
            (Some(inode), Some(node)) => Ok((inode, node)),
            _ => Err(missing(inode_id)),
        }
    }

    #[inline(always)]
    pub fn contains(&self, inode_id: u32) -> bool {
        self.inodes.contains_key(&inode_id)
    }

    /// Count of the live inodes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.inodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.inodes.is_empty()
    }

    #[inline(always)]
    pub fn next_inode_id(&self) -> u32 {
        self.next_inode_id
    }

    /// Iterate the inode records in id order
    pub fn inodes(&self) -> impl Iterator<Item = &Inode> {
        self.inodes.values()
    }

    /// Iterate the payloads in id order
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &Node)> {
        self.nodes.iter().map(|(inode_id, node)| (*inode_id, node))
    }

    pub fn node(&self, inode_id: u32) -> Result<&Node> {
        self.nodes.get(&inode_id).ok_or_else(|| missing(inode_id))
    }

    pub fn node_mut(&mut self, inode_id: u32) -> Result<&mut Node> {
        self.nodes.get_mut(&inode_id).ok_or_else(|| missing(inode_id))
    }
}
// as directory
impl InodeTable {
    /// Get the payload of a directory inode
    ///
    /// # Returns
    /// * Ok(&DirectoryNode)
    /// * Err(NotFound("inode <id>") | NotADirectory("inode <id>"))
    pub fn directory(&self, inode_id: u32) -> Result<&DirectoryNode> {
        match self.node(inode_id)? {
            Node::Directory(dir) => Ok(dir),
            Node::File(_) => Err(VfsError::NotADirectory(format!("inode {}", inode_id))),
        }
    }

    pub fn directory_mut(&mut self, inode_id: u32) -> Result<&mut DirectoryNode> {
        match self.node_mut(inode_id)? {
            Node::Directory(dir) => Ok(dir),
            Node::File(_) => Err(VfsError::NotADirectory(format!("inode {}", inode_id))),
        }
    }

    /// Look up a child entry of a directory inode
    ///
    /// # Returns
    /// * Ok(Some(child inode id))
    /// * Ok(None)
    /// * Err(NotFound("inode <id>") | NotADirectory("inode <id>"))
    pub fn child(&self, dir_inode_id: u32, name: &str) -> Result<Option<u32>> {
        Ok(self.directory(dir_inode_id)?.get(name))
    }
}
// as file
impl InodeTable {
    /// Get the payload of a file inode
    ///
    /// # Returns
    /// * Ok(&FileNode)
    /// * Err(NotFound("inode <id>") | IsADirectory("inode <id>"))
    pub fn file(&self, inode_id: u32) -> Result<&FileNode> {
        match self.node(inode_id)? {
            Node::File(file) => Ok(file),
            Node::Directory(_) => Err(VfsError::IsADirectory(format!("inode {}", inode_id))),
        }
    }

    pub fn file_mut(&mut self, inode_id: u32) -> Result<&mut FileNode> {
        match self.node_mut(inode_id)? {
            Node::File(file) => Ok(file),
            Node::Directory(_) => Err(VfsError::IsADirectory(format!("inode {}", inode_id))),
        }
    }
}
impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}
