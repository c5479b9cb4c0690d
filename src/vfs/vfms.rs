// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use log::{debug, warn};
use spin::Mutex;

// use self mods
use super::{resolve, InitMode, InodeTable, SharedVfs};
use crate::block::BlockAllocator;
use crate::clock::Clock;
#[cfg(feature = "std")]
use crate::clock::SystemClock;
use crate::configs::{PARENT_DIR_NAME, PATH_SEPARATOR, ROOT_INODE_ID};
use crate::layout::{FsUsage, Inode, Node, Permissions};
use crate::{Result, VfsError};

/// Check that a name can be stored as a single directory entry
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name == PARENT_DIR_NAME || name.contains(PATH_SEPARATOR) {
        Err(VfsError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

/// The in-memory file system.
/// It owns the block allocator, the inode table and the current directory cursor,
/// and every operation keeps the three of them consistent with each other:
/// a failed operation changes nothing.
pub struct VirtualFileSystem {
    allocator: BlockAllocator,
    table: InodeTable,
    /// the inode id of the directory relative names are looked up in
    current_dir: u32,
    clock: Arc<dyn Clock>,
}
// as common
impl VirtualFileSystem {
    /// Create the file system around an allocator and put the root directory at inode 0
    fn build(allocator: BlockAllocator, clock: Arc<dyn Clock>) -> Self {
        let mut table = InodeTable::new();
        let root = table.allocate_inode(true, Permissions::default(), clock.now());
        debug_assert_eq!(ROOT_INODE_ID, root);
        debug!(
            "file system initialized with {} blocks of {} bytes",
            allocator.total_blocks(),
            allocator.block_byte_size()
        );
        Self {
            allocator,
            table,
            current_dir: root,
            clock,
        }
    }

    /// Initialize a new instance of the file system.
    ///
    /// # Arguments
    /// * mode: the capacity, as a count of blocks or as a byte size rounded up to whole blocks
    /// * block_byte_size: the byte size of every block
    /// * clock: the source of the inode timestamps
    ///
    /// # Returns
    /// * Ok(VirtualFileSystem)
    /// * Err(InvalidBlockSize | NoEnoughBlocks)
    pub fn initialize(
        mode: InitMode,
        block_byte_size: usize,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if block_byte_size == 0 {
            return Err(VfsError::InvalidBlockSize);
        }
        let total_blocks = match mode {
            InitMode::TotalBlocks(total_blocks) => total_blocks,
            InitMode::TotalByteSize(total_byte_size) => BlockAllocator::cal_blocks_needed(
                usize::try_from(total_byte_size).unwrap_or(usize::MAX),
                block_byte_size,
            ),
        };
        let allocator = BlockAllocator::new(total_blocks, block_byte_size)?;
        Ok(Self::build(allocator, clock))
    }

    /// A file system of 1000 blocks of 1024 bytes using the clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::build(BlockAllocator::default(), clock)
    }

    /// A file system of 1000 blocks of 1024 bytes using the wall clock
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Put the file system behind a lock so that it can be shared between callers
    pub fn into_shared(self) -> SharedVfs {
        Arc::new(Mutex::new(self))
    }

    #[inline(always)]
    pub fn current_dir(&self) -> u32 {
        self.current_dir
    }

    #[inline(always)]
    pub fn table(&self) -> &InodeTable {
        &self.table
    }

    #[inline(always)]
    pub fn allocator(&self) -> &BlockAllocator {
        &self.allocator
    }

    #[inline(always)]
    pub fn block_byte_size(&self) -> usize {
        self.allocator.block_byte_size()
    }

    #[inline(always)]
    pub fn total_blocks(&self) -> u32 {
        self.allocator.total_blocks()
    }

    #[inline(always)]
    pub fn free_block_count(&self) -> u32 {
        self.allocator.free_block_count()
    }

    pub fn root_inode(&self) -> Result<&Inode> {
        self.table.get(ROOT_INODE_ID)
    }

    pub fn inode(&self, inode_id: u32) -> Result<&Inode> {
        self.table.get(inode_id)
    }

    /// Summary of the blocks and inodes in use
    pub fn usage(&self) -> FsUsage {
        let total_blocks = self.allocator.total_blocks();
        let free_blocks = self.allocator.free_block_count();
        FsUsage {
            block_byte_size: self.allocator.block_byte_size(),
            total_blocks,
            free_blocks,
            used_blocks: total_blocks - free_blocks,
            inodes: self.table.len(),
        }
    }

    #[inline(always)]
    fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Get the inode id of a direct entry of the current directory
    ///
    /// # Returns
    /// * Ok(inode id)
    /// * Err(NotFound(name))
    fn entry(&self, name: &str) -> Result<u32> {
        self.table
            .child(self.current_dir, name)?
            .ok_or_else(|| VfsError::NotFound(name.to_string()))
    }

    /// Collect the inode and all its descendants
    fn subtree(&self, inode_id: u32) -> Result<Vec<u32>> {
        let mut inode_ids = Vec::new();
        let mut pending = vec![inode_id];
        while let Some(current) = pending.pop() {
            match self.table.node(current)? {
                Node::Directory(dir) => pending.extend(dir.iter().map(|(_, child)| child)),
                Node::File(_) => {}
            }
            inode_ids.push(current);
        }
        Ok(inode_ids)
    }

    /// Release every block of the inode and its descendants, then delete their records and payloads.
    /// The directory entry pointing to the inode is left to the caller.
    ///
    /// # Returns
    /// * Ok((removed inode count, released block count))
    /// * Err(NotFound("inode <id>") | BlockOutOfBounds(block id) | BlockAlreadyFree(block id))
    fn destroy(&mut self, inode_id: u32) -> Result<(usize, usize)> {
        let inode_ids = self.subtree(inode_id)?;
        let mut block_ids = Vec::new();
        for id in inode_ids.iter() {
            block_ids.extend_from_slice(self.table.get(*id)?.block_ids());
        }
        self.allocator.release(&block_ids)?;
        for id in inode_ids.iter() {
            self.table.remove(*id)?;
        }
        Ok((inode_ids.len(), block_ids.len()))
    }

    /// Create an empty file or directory entry in the current directory
    fn create_entry(&mut self, name: &str, is_dir: bool) -> Result<u32> {
        check_name(name)?;
        if self.table.child(self.current_dir, name)?.is_some() {
            return Err(VfsError::AlreadyExists(name.to_string()));
        }
        let now = self.now();
        let inode_id = self.table.allocate_inode(is_dir, Permissions::default(), now);
        self.table
            .directory_mut(self.current_dir)?
            .add_entry(name, inode_id);
        debug!(
            "create {} `{}` as inode {} in directory {}",
            if is_dir { "directory" } else { "file" },
            name,
            inode_id,
            self.current_dir
        );
        Ok(inode_id)
    }
}
// as directory
impl VirtualFileSystem {
    /// Create an empty directory in the current directory.
    ///
    /// # Returns
    /// * Ok(inode id of the new directory)
    /// * Err(AlreadyExists(name) | InvalidName(name))
    pub fn mkdir(&mut self, name: &str) -> Result<u32> {
        self.create_entry(name, true)
    }

    /// Names of the entries of the current directory in insertion order
    pub fn ls(&self) -> Vec<String> {
        self.table
            .directory(self.current_dir)
            .map(|dir| dir.names())
            .unwrap_or_default()
    }

    /// Change the current directory.
    /// `..` always goes back to the root directory, never one level up.
    ///
    /// # Arguments
    /// * path: `..` or the name of a directory entry of the current directory
    ///
    /// # Returns
    /// * Ok(())
    /// * Err(NotADirectory(path) | DirectoryNotFound(path))
    pub fn cd(&mut self, path: &str) -> Result<()> {
        if path == PARENT_DIR_NAME {
            self.current_dir = ROOT_INODE_ID;
            return Ok(());
        }
        let inode_id = self
            .table
            .child(self.current_dir, path)?
            .ok_or_else(|| VfsError::DirectoryNotFound(path.to_string()))?;
        match self.table.node(inode_id)? {
            Node::Directory(_) => {
                self.current_dir = inode_id;
                Ok(())
            }
            Node::File(_) => Err(VfsError::NotADirectory(path.to_string())),
        }
    }

    /// Describe the current directory.
    /// Directories do not know their parents, so only the inode id can be shown.
    pub fn pwd(&self) -> String {
        format!("/ (inode {})", self.current_dir)
    }
}
// as file
impl VirtualFileSystem {
    /// Create an empty file in the current directory.
    ///
    /// # Returns
    /// * Ok(inode id of the new file)
    /// * Err(AlreadyExists(name) | InvalidName(name))
    pub fn touch(&mut self, name: &str) -> Result<u32> {
        self.create_entry(name, false)
    }

    /// Read the whole content of a file of the current directory as text
    ///
    /// # Returns
    /// * Ok(content)
    /// * Err(NotFound(name) | IsADirectory(name))
    pub fn cat(&self, name: &str) -> Result<String> {
        let inode_id = self.entry(name)?;
        match self.table.node(inode_id)? {
            Node::File(file) => Ok(file.read_text()),
            Node::Directory(_) => Err(VfsError::IsADirectory(name.to_string())),
        }
    }

    /// Replace the content of a file of the current directory.
    /// The blocks of a file are never given back when it shrinks,
    /// new blocks are only granted for the bytes the owned blocks can't hold.
    ///
    /// # Arguments
    /// * name: the name of the file
    /// * content: the new content of the file
    ///
    /// # Returns
    /// * Ok(())
    /// * Err(NotFound(name) | IsADirectory(name) | OutOfSpace(needed, free))
    pub fn write(&mut self, name: &str, content: &str) -> Result<()> {
        let inode_id = self.entry(name)?;
        match self.table.node(inode_id)? {
            Node::File(_) => {}
            Node::Directory(_) => return Err(VfsError::IsADirectory(name.to_string())),
        }
        let data = content.as_bytes().to_vec();
        let byte_size = data.len();
        let owned_blocks = self.table.get(inode_id)?.block_count();
        let block_ids = if self.allocator.blocks_needed(byte_size) > owned_blocks {
            let covered = (owned_blocks as usize).saturating_mul(self.allocator.block_byte_size());
            self.allocator
                .allocate(byte_size - covered)
                .map_err(|err| {
                    warn!("write `{}` with {} bytes failed: {}", name, byte_size, err);
                    err
                })?
        } else {
            Vec::new()
        };
        let now = self.now();
        self.table.file_mut(inode_id)?.replace(data);
        let inode = self.table.get_mut(inode_id)?;
        debug!(
            "write {} bytes to inode {}, {} blocks granted",
            byte_size,
            inode_id,
            block_ids.len()
        );
        inode.resize(byte_size, now);
        inode.extend_block_ids(block_ids);
        Ok(())
    }
}
// as entry
impl VirtualFileSystem {
    /// Remove an entry of the current directory.
    /// Removing a directory removes everything below it,
    /// all the blocks of the removed inodes go back to the allocator.
    ///
    /// # Returns
    /// * Ok(())
    /// * Err(NotFound(name))
    pub fn rm(&mut self, name: &str) -> Result<()> {
        let inode_id = self.entry(name)?;
        let (inodes, blocks) = self.destroy(inode_id)?;
        self.table
            .directory_mut(self.current_dir)?
            .remove_entry(name);
        debug!(
            "remove `{}` from directory {}: {} inodes removed, {} blocks released",
            name, self.current_dir, inodes, blocks
        );
        Ok(())
    }

    /// Change the permissions of an entry of the current directory
    ///
    /// # Arguments
    /// * name: the name of the entry
    /// * permissions: octal digits such as `644`
    ///
    /// # Returns
    /// * Ok(())
    /// * Err(NotFound(name) | InvalidPermissionFormat(permissions))
    pub fn chmod(&mut self, name: &str, permissions: &str) -> Result<()> {
        let inode_id = self.entry(name)?;
        let permissions = Permissions::from_octal_str(permissions)?;
        self.table.get_mut(inode_id)?.set_permissions(permissions);
        debug!("chmod inode {} to {}", inode_id, permissions);
        Ok(())
    }

    /// Snapshot of the metadata of an entry of the current directory
    ///
    /// # Returns
    /// * Ok(Inode)
    /// * Err(NotFound(name))
    pub fn stat(&self, name: &str) -> Result<Inode> {
        let inode_id = self.entry(name)?;
        self.table.get(inode_id).cloned()
    }

    /// Copy a file to a new entry.
    /// The copy gets a new inode, the source's permissions and its own freshly granted blocks.
    ///
    /// # Arguments
    /// * src: the path of the file to copy
    /// * dest: the path of the entry to create
    ///
    /// # Returns
    /// * Ok(inode id of the copy)
    /// * Err(
    ///     NotFound(src) |
    ///     DirectoryNotSupported(src) |
    ///     AlreadyExists(dest) |
    ///     InvalidName(dest name) |
    ///     OutOfSpace(needed, free) |
    ///     NotADirectory(component) |
    ///     DirectoryNotFound(component)
    /// )
    pub fn cp(&mut self, src: &str, dest: &str) -> Result<u32> {
        let (src_dir, src_name) = resolve(&self.table, self.current_dir, src)?;
        let src_id = self
            .table
            .child(src_dir, src_name)?
            .ok_or_else(|| VfsError::NotFound(src.to_string()))?;
        let data = match self.table.node(src_id)? {
            Node::File(file) => file.data().to_vec(),
            Node::Directory(_) => {
                warn!("refuse to copy directory `{}`", src);
                return Err(VfsError::DirectoryNotSupported(src.to_string()));
            }
        };
        let (dest_dir, dest_name) = resolve(&self.table, self.current_dir, dest)?;
        check_name(dest_name)?;
        if self.table.child(dest_dir, dest_name)?.is_some() {
            return Err(VfsError::AlreadyExists(dest.to_string()));
        }
        let permissions = self.table.get(src_id)?.permissions();
        let byte_size = data.len();
        let block_ids = self.allocator.allocate(byte_size).map_err(|err| {
            warn!("copy `{}` to `{}` failed: {}", src, dest, err);
            err
        })?;
        let now = self.now();
        let inode_id = self.table.allocate_inode(false, permissions, now);
        self.table.file_mut(inode_id)?.replace(data);
        let inode = self.table.get_mut(inode_id)?;
        inode.resize(byte_size, now);
        inode.extend_block_ids(block_ids);
        self.table
            .directory_mut(dest_dir)?
            .add_entry(dest_name, inode_id);
        debug!(
            "copy `{}` (inode {}) to `{}` (inode {})",
            src, src_id, dest, inode_id
        );
        Ok(inode_id)
    }

    /// Move a file to another entry.
    /// Inside one directory this only renames the entry and the inode stays the same.
    /// Across directories the file is copied and the source is removed,
    /// so the moved file gets a new inode id.
    ///
    /// # Arguments
    /// * src: the path of the file to move
    /// * dest: the new path of the file
    ///
    /// # Returns
    /// * Ok(inode id of the moved file)
    /// * Err(same as [`VirtualFileSystem::cp`])
    pub fn mv(&mut self, src: &str, dest: &str) -> Result<u32> {
        let (src_dir, src_name) = resolve(&self.table, self.current_dir, src)?;
        let (dest_dir, dest_name) = resolve(&self.table, self.current_dir, dest)?;
        let src_id = self
            .table
            .child(src_dir, src_name)?
            .ok_or_else(|| VfsError::NotFound(src.to_string()))?;
        match self.table.node(src_id)? {
            Node::File(_) => {}
            Node::Directory(_) => {
                warn!("refuse to move directory `{}`", src);
                return Err(VfsError::DirectoryNotSupported(src.to_string()));
            }
        }
        check_name(dest_name)?;
        if self.table.child(dest_dir, dest_name)?.is_some() {
            return Err(VfsError::AlreadyExists(dest.to_string()));
        }
        if src_dir == dest_dir {
            let dir = self.table.directory_mut(src_dir)?;
            dir.remove_entry(src_name);
            dir.add_entry(dest_name, src_id);
            debug!(
                "rename `{}` to `{}` in directory {}",
                src_name, dest_name, src_dir
            );
            Ok(src_id)
        } else {
            let inode_id = self.cp(src, dest)?;
            self.destroy(src_id)?;
            self.table.directory_mut(src_dir)?.remove_entry(src_name);
            debug!("move `{}` to `{}` as inode {}", src, dest, inode_id);
            Ok(inode_id)
        }
    }
}
// as checker
impl VirtualFileSystem {
    /// Verify that the allocator, the inode table and the directory entries agree with each other:
    /// * the root is a live directory and the current directory is a live directory
    /// * every inode has a payload of its own kind and no payload lives without an inode
    /// * a file's size is the length of its buffer and it owns enough blocks to hold it
    /// * every block is either free or owned by exactly one inode
    /// * every entry points to a live inode and every inode but the root is referenced once
    ///
    /// # Returns
    /// * Ok(())
    /// * Err(Inconsistent(description))
    pub fn check(&self) -> Result<()> {
        let inconsistent = |reason: String| Err(VfsError::Inconsistent(reason));
        for (what, inode_id) in [("root", ROOT_INODE_ID), ("current directory", self.current_dir)] {
            if !matches!(self.table.node(inode_id), Ok(Node::Directory(_))) {
                return inconsistent(format!("{} inode {} is not a live directory", what, inode_id));
            }
        }
        let mut owned_blocks = BTreeSet::new();
        let mut references: BTreeMap<u32, usize> = BTreeMap::new();
        for inode in self.table.inodes() {
            let inode_id = inode.id();
            let node = match self.table.node(inode_id) {
                Ok(node) => node,
                Err(_) => return inconsistent(format!("inode {} has no payload", inode_id)),
            };
            if node.is_dir() != inode.is_dir() {
                return inconsistent(format!("inode {} payload kind mismatch", inode_id));
            }
            match node {
                Node::File(file) => {
                    if file.len() != inode.byte_size() {
                        return inconsistent(format!(
                            "inode {} size {} but buffer holds {} bytes",
                            inode_id,
                            inode.byte_size(),
                            file.len()
                        ));
                    }
                }
                Node::Directory(dir) => {
                    for (name, child) in dir.iter() {
                        if !self.table.contains(child) {
                            return inconsistent(format!(
                                "entry `{}` of inode {} points to missing inode {}",
                                name, inode_id, child
                            ));
                        }
                        *references.entry(child).or_insert(0) += 1;
                    }
                }
            }
            if inode.block_count() < self.allocator.blocks_needed(inode.byte_size()) {
                return inconsistent(format!(
                    "inode {} owns {} blocks for {} bytes",
                    inode_id,
                    inode.block_count(),
                    inode.byte_size()
                ));
            }
            for &block_id in inode.block_ids() {
                if block_id >= self.allocator.total_blocks() {
                    return inconsistent(format!(
                        "inode {} owns block {} out of range",
                        inode_id, block_id
                    ));
                }
                if self.allocator.is_free(block_id) {
                    return inconsistent(format!(
                        "block {} is owned by inode {} but free",
                        block_id, inode_id
                    ));
                }
                if !owned_blocks.insert(block_id) {
                    return inconsistent(format!("block {} is owned twice", block_id));
                }
            }
        }
        if self.table.nodes().count() != self.table.len() {
            return inconsistent("payload without inode".to_string());
        }
        let accounted = owned_blocks.len() as u64 + self.allocator.free_block_count() as u64;
        if accounted != self.allocator.total_blocks() as u64 {
            return inconsistent(format!(
                "{} blocks are neither free nor owned",
                self.allocator.total_blocks() as u64 - accounted
            ));
        }
        for inode in self.table.inodes() {
            let count = references.get(&inode.id()).copied().unwrap_or(0);
            let expected = if inode.id() == ROOT_INODE_ID { 0 } else { 1 };
            if count != expected {
                return inconsistent(format!(
                    "inode {} is referenced {} times",
                    inode.id(),
                    count
                ));
            }
        }
        Ok(())
    }
}
#[cfg(feature = "std")]
impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    fn sample_vfs(total_blocks: u32, block_byte_size: usize) -> VirtualFileSystem {
        VirtualFileSystem::initialize(
            InitMode::TotalBlocks(total_blocks),
            block_byte_size,
            Arc::new(MockClock::default()),
        )
        .unwrap()
    }

    fn owned_blocks(vfs: &VirtualFileSystem, name: &str) -> Vec<u32> {
        vfs.stat(name).unwrap().block_ids().to_vec()
    }

    #[test]
    fn test_vfs_initialize() {
        let clock: Arc<dyn Clock> = Arc::new(MockClock::default());
        assert!(
            VirtualFileSystem::initialize(InitMode::TotalBlocks(10), 0, Arc::clone(&clock))
                .is_err_and(|e| e.is_invalidblocksize())
        );
        assert!(
            VirtualFileSystem::initialize(InitMode::TotalBlocks(0), 100, Arc::clone(&clock))
                .is_err_and(|e| e.is_noenoughblocks())
        );
        assert!(
            VirtualFileSystem::initialize(InitMode::TotalByteSize(1001), 100, Arc::clone(&clock))
                .is_ok_and(|vfs| vfs.total_blocks() == 11 && vfs.block_byte_size() == 100)
        );
        let vfs = sample_vfs(10, 100);
        assert_eq!(ROOT_INODE_ID, vfs.current_dir());
        assert!(vfs.root_inode().is_ok_and(|root| root.is_dir() && root.id() == 0));
        assert!(vfs.ls().is_empty());
        assert_eq!(10, vfs.free_block_count());
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_with_default_sizes() {
        let vfs = VirtualFileSystem::with_clock(Arc::new(MockClock::default()));
        assert_eq!(1000, vfs.total_blocks());
        assert_eq!(1024, vfs.block_byte_size());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_vfs_default_uses_wall_clock() {
        let vfs = VirtualFileSystem::default();
        assert_eq!(1000, vfs.free_block_count());
        assert!(vfs.root_inode().is_ok_and(|root| root.created() > 0));
    }

    #[test]
    fn test_vfs_write_then_rm_releases_blocks() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.touch("a.txt").is_ok());
        let content = "x".repeat(250);
        assert!(vfs.write("a.txt", &content).is_ok());
        assert_eq!(3, owned_blocks(&vfs, "a.txt").len());
        assert_eq!(7, vfs.free_block_count());
        assert!(vfs.cat("a.txt").is_ok_and(|text| text == content));
        assert!(vfs.check().is_ok());
        let released = owned_blocks(&vfs, "a.txt");
        assert!(vfs.rm("a.txt").is_ok());
        assert_eq!(10, vfs.free_block_count());
        assert!(vfs.ls().is_empty());
        assert!(vfs.check().is_ok());

        assert!(vfs.touch("b.txt").is_ok());
        assert!(vfs.write("b.txt", &content).is_ok());
        assert_eq!(released, owned_blocks(&vfs, "b.txt"));
    }

    #[test]
    fn test_vfs_write_updates_metadata() {
        let mut vfs = sample_vfs(10, 100);
        let inode_id = vfs.touch("a.txt").unwrap();
        let before = vfs.inode(inode_id).unwrap().clone();
        assert!(vfs.write("a.txt", "hello").is_ok());
        let after = vfs.inode(inode_id).unwrap();
        assert_eq!(5, after.byte_size());
        assert_eq!(before.created(), after.created());
        assert!(after.modified() > before.modified());
        assert!(vfs.cat("a.txt").is_ok_and(|text| text == "hello"));
    }

    #[test]
    fn test_vfs_write_keeps_blocks_when_shrinking() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.touch("a.txt").is_ok());
        assert!(vfs.write("a.txt", &"x".repeat(250)).is_ok());
        assert!(vfs.write("a.txt", "tiny").is_ok());
        assert_eq!(3, owned_blocks(&vfs, "a.txt").len());
        assert_eq!(4, vfs.stat("a.txt").unwrap().byte_size());
        assert!(vfs.write("a.txt", &"y".repeat(420)).is_ok());
        assert_eq!(5, owned_blocks(&vfs, "a.txt").len());
        assert_eq!(5, vfs.free_block_count());
        assert!(vfs.write("a.txt", "").is_ok());
        assert_eq!(5, owned_blocks(&vfs, "a.txt").len());
        assert!(vfs.cat("a.txt").is_ok_and(|text| text.is_empty()));
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_write_out_of_space_changes_nothing() {
        let mut vfs = sample_vfs(3, 10);
        assert!(vfs.touch("a").is_ok());
        assert!(vfs.write("a", "0123456789").is_ok());
        assert!(vfs
            .write("a", &"z".repeat(31))
            .is_err_and(|e| e == VfsError::OutOfSpace(3, 2)));
        assert!(vfs.cat("a").is_ok_and(|text| text == "0123456789"));
        assert_eq!(10, vfs.stat("a").unwrap().byte_size());
        assert_eq!(1, owned_blocks(&vfs, "a").len());
        assert_eq!(2, vfs.free_block_count());
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_write_and_cat_errors() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.mkdir("d").is_ok());
        assert!(vfs
            .write("missing", "x")
            .is_err_and(|e| e == VfsError::NotFound("missing".into())));
        assert!(vfs
            .write("d", "x")
            .is_err_and(|e| e == VfsError::IsADirectory("d".into())));
        assert!(vfs.cat("missing").is_err_and(|e| e.is_notfound()));
        assert!(vfs.cat("d").is_err_and(|e| e.is_isadirectory()));
    }

    #[test]
    fn test_vfs_cd_parent_jumps_to_root() {
        let mut vfs = sample_vfs(10, 100);
        let d = vfs.mkdir("d").unwrap();
        assert!(vfs.cd("d").is_ok());
        assert_eq!(d, vfs.current_dir());
        let e = vfs.mkdir("e").unwrap();
        assert!(vfs.cd("e").is_ok());
        assert_eq!(e, vfs.current_dir());
        assert_eq!(format!("/ (inode {})", e), vfs.pwd());
        assert!(vfs.cd("..").is_ok());
        assert_eq!(ROOT_INODE_ID, vfs.current_dir());
        assert_eq!("/ (inode 0)", vfs.pwd());
        assert!(vfs.cd("..").is_ok());
        assert_eq!(ROOT_INODE_ID, vfs.current_dir());
    }

    #[test]
    fn test_vfs_cd_errors() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.touch("f").is_ok());
        assert!(vfs.mkdir("d").is_ok());
        assert!(vfs
            .cd("f")
            .is_err_and(|e| e == VfsError::NotADirectory("f".into())));
        assert!(vfs
            .cd("nope")
            .is_err_and(|e| e == VfsError::DirectoryNotFound("nope".into())));
        assert!(vfs.cd("d/..").is_err_and(|e| e.is_directorynotfound()));
        assert_eq!(ROOT_INODE_ID, vfs.current_dir());
    }

    #[test]
    fn test_vfs_duplicated_touch_changes_nothing() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.touch("a").is_ok());
        let next_inode_id = vfs.table().next_inode_id();
        assert!(vfs
            .touch("a")
            .is_err_and(|e| e == VfsError::AlreadyExists("a".into())));
        assert!(vfs.mkdir("a").is_err_and(|e| e.is_alreadyexists()));
        assert_eq!(vec!["a"], vfs.ls());
        assert_eq!(next_inode_id, vfs.table().next_inode_id());
        assert_eq!(2, vfs.table().len());
    }

    #[test]
    fn test_vfs_rejects_invalid_names() {
        let mut vfs = sample_vfs(10, 100);
        for name in ["", "..", "a/b", "/"] {
            assert!(vfs
                .touch(name)
                .is_err_and(|e| e == VfsError::InvalidName(name.into())));
            assert!(vfs.mkdir(name).is_err_and(|e| e.is_invalidname()));
        }
        assert!(vfs.ls().is_empty());
        assert_eq!(1, vfs.table().len());
    }

    #[test]
    fn test_vfs_ls_keeps_insertion_order() {
        let mut vfs = sample_vfs(10, 100);
        for name in ["zeta", "alpha", "mid"] {
            assert!(vfs.touch(name).is_ok());
        }
        assert!(vfs.mkdir("dir").is_ok());
        assert_eq!(vec!["zeta", "alpha", "mid", "dir"], vfs.ls());
        assert!(vfs.rm("alpha").is_ok());
        assert_eq!(vec!["zeta", "mid", "dir"], vfs.ls());
    }

    #[test]
    fn test_vfs_rm_directory_removes_subtree() {
        let mut vfs = sample_vfs(10, 100);
        let d = vfs.mkdir("d").unwrap();
        assert!(vfs.cd("d").is_ok());
        assert!(vfs.touch("f").is_ok());
        assert!(vfs.write("f", &"x".repeat(150)).is_ok());
        let e = vfs.mkdir("e").unwrap();
        assert!(vfs.cd("..").is_ok());
        assert!(vfs.cp("d/f", "d/e/g").is_ok());
        assert_eq!(6, vfs.free_block_count());
        assert_eq!(5, vfs.table().len());
        assert!(vfs.rm("d").is_ok());
        assert_eq!(10, vfs.free_block_count());
        assert_eq!(1, vfs.table().len());
        assert!(!vfs.table().contains(d));
        assert!(!vfs.table().contains(e));
        assert!(vfs.rm("d").is_err_and(|e| e.is_notfound()));
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_rm_missing() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs
            .rm("missing")
            .is_err_and(|e| e == VfsError::NotFound("missing".into())));
    }

    #[test]
    fn test_vfs_chmod() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.touch("a").is_ok());
        assert!(vfs.chmod("a", "644").is_ok());
        assert_eq!(0o644, vfs.stat("a").unwrap().permissions().mode());
        assert!(vfs
            .chmod("a", "9x")
            .is_err_and(|e| e == VfsError::InvalidPermissionFormat("9x".into())));
        assert_eq!(0o644, vfs.stat("a").unwrap().permissions().mode());
        assert!(vfs.chmod("missing", "644").is_err_and(|e| e.is_notfound()));
        assert!(vfs.mkdir("d").is_ok());
        assert!(vfs.chmod("d", "700").is_ok());
        assert_eq!("rwx------", vfs.stat("d").unwrap().permissions().mode_string());
    }

    #[test]
    fn test_vfs_stat() {
        let mut vfs = sample_vfs(10, 100);
        let inode_id = vfs.touch("a").unwrap();
        assert!(vfs.write("a", "abc").is_ok());
        assert!(vfs.stat("a").is_ok_and(|inode| inode.id() == inode_id
            && !inode.is_dir()
            && inode.byte_size() == 3
            && inode.block_count() == 1
            && inode.owner() == "user"));
        assert!(vfs.stat("b").is_err_and(|e| e.is_notfound()));
    }

    #[test]
    fn test_vfs_cp() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.touch("a").is_ok());
        assert!(vfs.write("a", &"q".repeat(120)).is_ok());
        assert!(vfs.chmod("a", "600").is_ok());
        assert!(vfs.mkdir("d").is_ok());
        let copy_id = vfs.cp("a", "d/b").unwrap();
        let src_blocks = owned_blocks(&vfs, "a");
        let copy = vfs.inode(copy_id).unwrap();
        assert_eq!(2, copy.block_count());
        assert_eq!(0o600, copy.permissions().mode());
        assert_eq!(120, copy.byte_size());
        assert!(copy
            .block_ids()
            .iter()
            .all(|block_id| !src_blocks.contains(block_id)));
        assert_eq!(6, vfs.free_block_count());
        assert!(vfs.cd("d").is_ok());
        assert!(vfs.cat("b").is_ok_and(|text| text == "q".repeat(120)));
        assert!(vfs.cp("../a", "c").is_ok());
        assert_eq!(vec!["b", "c"], vfs.ls());
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_cp_errors_change_nothing() {
        let mut vfs = sample_vfs(3, 10);
        assert!(vfs.touch("a").is_ok());
        assert!(vfs.write("a", "0123456789abcdef").is_ok());
        assert!(vfs.touch("b").is_ok());
        assert!(vfs.mkdir("d").is_ok());
        let next_inode_id = vfs.table().next_inode_id();
        assert!(vfs
            .cp("missing", "x")
            .is_err_and(|e| e == VfsError::NotFound("missing".into())));
        assert!(vfs
            .cp("d", "x")
            .is_err_and(|e| e == VfsError::DirectoryNotSupported("d".into())));
        assert!(vfs
            .cp("a", "b")
            .is_err_and(|e| e == VfsError::AlreadyExists("b".into())));
        assert!(vfs.cp("a", "d/").is_err_and(|e| e.is_invalidname()));
        assert!(vfs.cp("a", "nope/x").is_err_and(|e| e.is_directorynotfound()));
        assert!(vfs.cp("b/x", "c").is_err_and(|e| e.is_notadirectory()));
        assert!(vfs
            .cp("a", "c")
            .is_err_and(|e| e == VfsError::OutOfSpace(2, 1)));
        assert_eq!(vec!["a", "b", "d"], vfs.ls());
        assert_eq!(next_inode_id, vfs.table().next_inode_id());
        assert_eq!(1, vfs.free_block_count());
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_mv_inside_directory_renames() {
        let mut vfs = sample_vfs(10, 100);
        let inode_id = vfs.touch("a").unwrap();
        assert!(vfs.write("a", "data").is_ok());
        assert!(vfs.touch("b").is_ok());
        let blocks = owned_blocks(&vfs, "a");
        assert!(vfs.mv("a", "c").is_ok_and(|moved| moved == inode_id));
        assert_eq!(vec!["b", "c"], vfs.ls());
        assert_eq!(blocks, owned_blocks(&vfs, "c"));
        assert_eq!(9, vfs.free_block_count());
        assert!(vfs.cat("c").is_ok_and(|text| text == "data"));
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_mv_across_directories_changes_inode() {
        let mut vfs = sample_vfs(10, 100);
        let inode_id = vfs.touch("a").unwrap();
        assert!(vfs.write("a", &"m".repeat(201)).is_ok());
        assert!(vfs.mkdir("d").is_ok());
        let moved = vfs.mv("a", "d/a").unwrap();
        assert_ne!(inode_id, moved);
        assert!(!vfs.table().contains(inode_id));
        assert_eq!(vec!["d"], vfs.ls());
        assert_eq!(7, vfs.free_block_count());
        assert!(vfs.cd("d").is_ok());
        assert!(vfs.cat("a").is_ok_and(|text| text == "m".repeat(201)));
        assert!(vfs.mv("a", "../b").is_ok());
        assert!(vfs.ls().is_empty());
        assert!(vfs.cd("..").is_ok());
        assert_eq!(vec!["d", "b"], vfs.ls());
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_mv_errors_change_nothing() {
        let mut vfs = sample_vfs(3, 10);
        assert!(vfs.touch("a").is_ok());
        assert!(vfs.write("a", "0123456789abc").is_ok());
        assert!(vfs.touch("b").is_ok());
        assert!(vfs.mkdir("d").is_ok());
        assert!(vfs.mv("missing", "x").is_err_and(|e| e.is_notfound()));
        assert!(vfs.mv("d", "e").is_err_and(|e| e.is_directorynotsupported()));
        assert!(vfs.mv("a", "b").is_err_and(|e| e.is_alreadyexists()));
        assert!(vfs.mv("a", "a").is_err_and(|e| e.is_alreadyexists()));
        assert!(vfs.mv("a", "x/y").is_err_and(|e| e.is_directorynotfound()));
        assert!(vfs.mv("a", "d/..").is_err_and(|e| e.is_invalidname()));
        assert!(vfs
            .mv("a", "d/a")
            .is_err_and(|e| e == VfsError::OutOfSpace(2, 1)));
        assert_eq!(vec!["a", "b", "d"], vfs.ls());
        assert!(vfs.cat("a").is_ok_and(|text| text == "0123456789abc"));
        assert!(vfs.check().is_ok());
    }

    #[test]
    fn test_vfs_usage() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.touch("a").is_ok());
        assert!(vfs.write("a", &"u".repeat(301)).is_ok());
        assert!(vfs.mkdir("d").is_ok());
        let usage = vfs.usage();
        assert_eq!(100, usage.block_byte_size);
        assert_eq!(10, usage.total_blocks);
        assert_eq!(6, usage.free_blocks);
        assert_eq!(4, usage.used_blocks);
        assert_eq!(3, usage.inodes);
    }

    #[test]
    fn test_vfs_block_accounting_over_random_operations() {
        let mut vfs = sample_vfs(64, 16);
        let mut seed: u32 = 0x2545_f491;
        let mut next = move |bound: u32| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed % bound
        };
        for _ in 0..2000 {
            let name = format!("n{}", next(12));
            let result = match next(6) {
                0 => vfs.touch(&name).map(|_| ()),
                1 => vfs.mkdir(&name).map(|_| ()),
                2 => vfs.rm(&name),
                3 => {
                    let content = "w".repeat(next(200) as usize);
                    vfs.write(&name, &content)
                }
                4 => vfs.cp(&name, &format!("n{}", next(12))).map(|_| ()),
                _ => {
                    if next(4) == 0 {
                        vfs.cd("..")
                    } else {
                        vfs.cd(&name)
                    }
                }
            };
            if let Err(err) = result {
                assert!(
                    err.is_vfs() || err.is_outofspace(),
                    "unexpected error {:?}",
                    err
                );
            }
            assert!(vfs.check().is_ok(), "{:?}", vfs.check());
        }
    }

    #[test]
    fn test_vfs_shared() {
        let shared = sample_vfs(10, 100).into_shared();
        let other = Arc::clone(&shared);
        assert!(shared.lock().touch("a").is_ok());
        assert!(other.lock().write("a", "shared").is_ok());
        assert!(shared.lock().cat("a").is_ok_and(|text| text == "shared"));
        assert_eq!(vec!["a"], other.lock().ls());
    }

    #[test]
    fn test_vfs_check_detects_corruption() {
        let mut vfs = sample_vfs(10, 100);
        assert!(vfs.touch("a").is_ok());
        assert!(vfs.write("a", "abc").is_ok());
        let inode_id = vfs.stat("a").unwrap().id();
        let block_ids = owned_blocks(&vfs, "a");
        assert!(vfs.allocator.release(&block_ids).is_ok());
        assert!(vfs.check().is_err_and(|e| e.is_inconsistent()));
        assert!(vfs.allocator.allocate(100).is_ok());
        assert!(vfs.check().is_ok());
        vfs.table.directory_mut(ROOT_INODE_ID).unwrap().add_entry("b", inode_id);
        assert!(vfs.check().is_err_and(|e| e.is_inconsistent()));
        vfs.table.directory_mut(ROOT_INODE_ID).unwrap().remove_entry("b");
        vfs.table.directory_mut(ROOT_INODE_ID).unwrap().add_entry("c", 99);
        assert!(vfs.check().is_err_and(|e| e.is_inconsistent()));
    }
}
