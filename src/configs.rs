// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods

// use self mods

/// Block count used when the file system is created without an explicit size
pub const DEFAULT_TOTAL_BLOCKS: u32 = 1000;
/// Byte size of a single block when none is given
pub const DEFAULT_BLOCK_BYTE_SIZE: usize = 1024;

/// The root directory is always the first inode allocated
pub const ROOT_INODE_ID: u32 = 0;
pub const DEFAULT_PERMISSIONS: u16 = 0o755;
pub const DEFAULT_OWNER: &str = "user";
/// Only setuid/setgid/sticky and the three rwx triads can be stored
pub const PERMISSION_MASK: u16 = 0o7777;

pub const PARENT_DIR_NAME: &str = "..";
pub const PATH_SEPARATOR: char = '/';
