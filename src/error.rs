// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use alloc::string::String;
use enum_group::EnumGroup;
use thiserror_no_std::Error;

// use self mods

#[derive(Error, EnumGroup, Debug, PartialEq, Eq)]
pub enum VfsError {
    #[groups(vfs)]
    #[error("Entry `{0}` already exists")]
    AlreadyExists(String),

    #[groups(vfs)]
    #[error("Entry `{0}` not found")]
    NotFound(String),

    #[groups(vfs, path)]
    #[error("`{0}` is not a directory")]
    NotADirectory(String),

    #[groups(vfs)]
    #[error("`{0}` is a directory")]
    IsADirectory(String),

    #[groups(vfs, path)]
    #[error("Directory `{0}` not found")]
    DirectoryNotFound(String),

    #[groups(vfs)]
    #[error("Copying or moving directory `{0}` is not supported")]
    DirectoryNotSupported(String),

    #[groups(vfs)]
    #[error("Invalid entry name `{0}`")]
    InvalidName(String),

    #[groups(block)]
    #[error("Out of space, {0} blocks needed but only {1} free")]
    OutOfSpace(u32, u32),

    #[groups(block)]
    #[error("Block {0} out of bounds")]
    BlockOutOfBounds(u32),

    #[groups(block)]
    #[error("Block {0} was already free")]
    BlockAlreadyFree(u32),

    #[groups(config)]
    #[error("Block byte size must be greater than zero")]
    InvalidBlockSize,

    #[groups(config)]
    #[error("No enough blocks, total blocks must be at least one")]
    NoEnoughBlocks,

    #[groups(others, parse)]
    #[error("Invalid permission format `{0}`, expect octal digits like 755")]
    InvalidPermissionFormat(String),

    #[groups(check)]
    #[error("File system is inconsistent: {0}")]
    Inconsistent(String),
}

pub type Result<T> = core::result::Result<T, VfsError>;
