// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use alloc::string::ToString;
use log::trace;

// use self mods
use super::InodeTable;
use crate::configs::{PARENT_DIR_NAME, PATH_SEPARATOR, ROOT_INODE_ID};
use crate::layout::Node;
use crate::{Result, VfsError};

/// Resolve a slash separated path into the directory holding its last component.
///
/// Every component but the last is walked as a directory, starting from the current directory.
/// Directories only know their children, so `..` cannot climb one level:
/// it always jumps back to the root directory, whatever the depth is.
/// The last component is returned as it is, it does not have to exist.
///
/// # Arguments
/// * table: the inode table to walk
/// * current_dir: the inode id of the directory relative paths start from
/// * path: the path to resolve
///
/// # Returns
/// * Ok((parent directory inode id, leaf name))
/// * Err(NotADirectory(component) | DirectoryNotFound(component))
pub fn resolve<'a>(table: &InodeTable, current_dir: u32, path: &'a str) -> Result<(u32, &'a str)> {
    let (dirs, name) = match path.rsplit_once(PATH_SEPARATOR) {
        Some((dirs, name)) => (Some(dirs), name),
        None => (None, path),
    };
    let mut current = current_dir;
    for component in dirs.into_iter().flat_map(|dirs| dirs.split(PATH_SEPARATOR)) {
        if component == PARENT_DIR_NAME {
            current = ROOT_INODE_ID;
            trace!("resolve `{}`: `..` jumps to root", path);
            continue;
        }
        let child = table
            .child(current, component)?
            .ok_or_else(|| VfsError::DirectoryNotFound(component.to_string()))?;
        match table.node(child)? {
            Node::Directory(_) => {
                trace!("resolve `{}`: `{}` -> inode {}", path, component, child);
                current = child;
            }
            Node::File(_) => return Err(VfsError::NotADirectory(component.to_string())),
        }
    }
    Ok((current, name))
}
