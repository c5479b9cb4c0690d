// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use alloc::string::String;
use alloc::vec::Vec;

// use self mods

/// Payload of a regular file, a single contiguous byte buffer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileNode {
    data: Vec<u8>,
}
impl FileNode {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode the buffer as utf-8 text, invalid sequences are replaced
    pub fn read_text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Replace the whole buffer
    pub fn replace(&mut self, data: Vec<u8>) {
        self.data = data;
    }
}

/// Payload of a directory, the child entries in insertion order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    entries: Vec<(String, u32)>,
}
impl DirectoryNode {
    /// Get the inode id of the child entry
    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, inode_id)| *inode_id)
    }

    #[inline(always)]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a child entry, an entry with the same name is overwritten in place
    pub fn add_entry(&mut self, name: &str, inode_id: u32) {
        match self
            .entries
            .iter_mut()
            .find(|(entry_name, _)| entry_name == name)
        {
            Some(entry) => entry.1 = inode_id,
            None => self.entries.push((String::from(name), inode_id)),
        }
    }

    /// Remove a child entry and return its inode id, nothing happens if the name is absent
    pub fn remove_entry(&mut self, name: &str) -> Option<u32> {
        let position = self
            .entries
            .iter()
            .position(|(entry_name, _)| entry_name == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Names of the child entries in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Iterate the (name, inode id) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries
            .iter()
            .map(|(name, inode_id)| (name.as_str(), *inode_id))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The payload stored for every inode
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    File(FileNode),
    Directory(DirectoryNode),
}
impl Node {
    /// Create an empty payload of the requested kind
    pub fn empty(is_dir: bool) -> Self {
        if is_dir {
            Self::Directory(DirectoryNode::default())
        } else {
            Self::File(FileNode::default())
        }
    }

    #[inline(always)]
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}
