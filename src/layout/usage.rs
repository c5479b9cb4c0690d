// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods

// use self mods

/// Summary of the resources of the whole file system, like `statfs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FsUsage {
    pub block_byte_size: usize,
    pub total_blocks: u32,
    pub free_blocks: u32,
    pub used_blocks: u32,
    /// count of the live inodes, the root included
    pub inodes: usize,
}
impl FsUsage {
    /// Total capacity in bytes
    #[inline(always)]
    pub fn total_bytes(&self) -> u64 {
        self.total_blocks as u64 * self.block_byte_size as u64
    }

    /// Bytes still available for new blocks
    #[inline(always)]
    pub fn free_bytes(&self) -> u64 {
        self.free_blocks as u64 * self.block_byte_size as u64
    }
}
