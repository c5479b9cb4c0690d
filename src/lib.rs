// @author:    olinex
// @time:      2026/10/16
#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! An in-memory file system: inodes, directories, permissions and block accounting,
//! without any storage behind the blocks.
//!
//! ```
//! use vfms::VirtualFileSystem;
//!
//! let mut vfs = VirtualFileSystem::new();
//! vfs.touch("notes.txt").unwrap();
//! vfs.write("notes.txt", "hello").unwrap();
//! assert_eq!("hello", vfs.cat("notes.txt").unwrap());
//! ```

// self mods
pub mod block;
pub mod clock;
pub mod configs;
pub mod error;
pub mod layout;
pub mod vfs;

// use other mods
#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate alloc;

extern crate bit_field;
extern crate spin;

// reexports
pub use clock::{Clock, MockClock};
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use error::{Result, VfsError};
pub use layout::{FsUsage, Inode, Permissions};
pub use vfs::{InitMode, SharedVfs, VirtualFileSystem};
