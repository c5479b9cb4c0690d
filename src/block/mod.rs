// @author:    olinex
// @time:      2026/10/16

// self mods
mod allocator;

// use other mods

// use self mods

// reexport
pub use allocator::*;
