// @author:    olinex
// @time:      2026/10/16

// self mods
mod path;
mod table;
mod vfms;

// use other mods

// use self mods

use alloc::sync::Arc;
use spin::Mutex;

pub use path::resolve;
pub use table::*;
pub use vfms::*;

pub enum InitMode {
    TotalBlocks(u32),
    TotalByteSize(u64),
}

/// The file system guarded by one lock, every operation holds it from start to end
pub type SharedVfs = Arc<Mutex<VirtualFileSystem>>;
