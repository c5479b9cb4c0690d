// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use alloc::collections::BTreeSet;
use alloc::vec::Vec;

// use self mods
use crate::configs::{DEFAULT_BLOCK_BYTE_SIZE, DEFAULT_TOTAL_BLOCKS};
use crate::{Result, VfsError};

/// Book-keeping of the fixed-size blocks of the file system.
/// There is no data behind a block, the allocator only knows which block ids are granted.
/// Every block id in `0..total_blocks` is either in the free set or owned by exactly one inode.
pub struct BlockAllocator {
    /// The byte size of every block
    block_byte_size: usize,
    /// The count of the blocks managed by the allocator
    total_blocks: u32,
    /// The ids of the blocks which can be granted
    free_block_ids: BTreeSet<u32>,
}
impl BlockAllocator {
    /// Calculates how many blocks are needed to hold the bytes
    ///
    /// # Arguments
    /// * byte_size: the count of the bytes to store
    /// * block_byte_size: the byte size of one block, must not be zero
    ///
    /// # Returns
    /// * u32: the count of the blocks, saturated at u32::MAX
    pub fn cal_blocks_needed(byte_size: usize, block_byte_size: usize) -> u32 {
        u32::try_from(byte_size.div_ceil(block_byte_size)).unwrap_or(u32::MAX)
    }

    /// Create a new allocator in which every block is free
    ///
    /// # Arguments
    /// * total_blocks: the count of the blocks to manage
    /// * block_byte_size: the byte size of every block
    ///
    /// # Returns
    /// * Ok(BlockAllocator)
    /// * Err(InvalidBlockSize | NoEnoughBlocks)
    pub fn new(total_blocks: u32, block_byte_size: usize) -> Result<Self> {
        if block_byte_size == 0 {
            return Err(VfsError::InvalidBlockSize);
        }
        if total_blocks == 0 {
            return Err(VfsError::NoEnoughBlocks);
        }
        Ok(Self::build(total_blocks, block_byte_size))
    }

    fn build(total_blocks: u32, block_byte_size: usize) -> Self {
        Self {
            block_byte_size,
            total_blocks,
            free_block_ids: (0..total_blocks).collect(),
        }
    }

    #[inline(always)]
    pub fn block_byte_size(&self) -> usize {
        self.block_byte_size
    }

    #[inline(always)]
    pub fn total_blocks(&self) -> u32 {
        self.total_blocks
    }

    #[inline(always)]
    pub fn free_block_count(&self) -> u32 {
        self.free_block_ids.len() as u32
    }

    /// Check if the block is in the free set
    #[inline(always)]
    pub fn is_free(&self, block_id: u32) -> bool {
        self.free_block_ids.contains(&block_id)
    }

    /// The count of the blocks needed to hold the bytes with this allocator's block size
    #[inline(always)]
    pub fn blocks_needed(&self, byte_size: usize) -> u32 {
        Self::cal_blocks_needed(byte_size, self.block_byte_size)
    }

    /// Grant enough blocks to hold the bytes.
    /// Nothing is taken from the free set when there are not enough blocks.
    /// Callers must not rely on the order of the returned ids.
    ///
    /// # Arguments
    /// * byte_size: the count of the bytes the blocks must hold
    ///
    /// # Returns
    /// * Ok(Vec<block id>)
    /// * Err(OutOfSpace(needed, free))
    pub fn allocate(&mut self, byte_size: usize) -> Result<Vec<u32>> {
        let needed = self.blocks_needed(byte_size);
        let free = self.free_block_count();
        if needed > free {
            return Err(VfsError::OutOfSpace(needed, free));
        }
        let mut block_ids = Vec::with_capacity(needed as usize);
        for _ in 0..needed {
            if let Some(block_id) = self.free_block_ids.pop_first() {
                block_ids.push(block_id);
            }
        }
        Ok(block_ids)
    }

    /// Give the blocks back to the free set.
    /// All the ids are checked before any of them is released,
    /// so a failed call leaves the free set untouched.
    ///
    /// # Arguments
    /// * block_ids: the ids of the blocks to release
    ///
    /// # Returns
    /// * Ok(())
    /// * Err(BlockOutOfBounds(block id) | BlockAlreadyFree(block id))
    pub fn release(&mut self, block_ids: &[u32]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for &block_id in block_ids {
            if block_id >= self.total_blocks {
                return Err(VfsError::BlockOutOfBounds(block_id));
            }
            if self.free_block_ids.contains(&block_id) || !seen.insert(block_id) {
                return Err(VfsError::BlockAlreadyFree(block_id));
            }
        }
        self.free_block_ids.extend(seen);
        Ok(())
    }
}
impl Default for BlockAllocator {
    /// 1000 blocks of 1024 bytes
    fn default() -> Self {
        Self::build(DEFAULT_TOTAL_BLOCKS, DEFAULT_BLOCK_BYTE_SIZE)
    }
}
