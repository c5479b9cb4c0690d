// @author:    olinex
// @time:      2026/10/16

// self mods
mod inode;
mod node;
mod permissions;
mod usage;

// use other mods

// use self mods

// reexport
pub use inode::*;
pub use node::*;
pub use permissions::*;
pub use usage::*;
