// @author:    olinex
// @time:      2026/10/16

// self mods

// use other mods
use alloc::string::{String, ToString};
use bit_field::BitField;
use core::fmt;

// use self mods
use crate::configs::{DEFAULT_PERMISSIONS, PERMISSION_MASK};
use crate::{Result, VfsError};

bitflags! {
    /// Unix style permission bits of an inode
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Permissions: u16 {
        const SETUID = 0o4000;
        const SETGID = 0o2000;
        const STICKY = 0o1000;
        const USER_READ = 0o400;
        const USER_WRITE = 0o200;
        const USER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
        const USER_RWX = Self::USER_READ.bits() | Self::USER_WRITE.bits() | Self::USER_EXEC.bits();
        const GROUP_RWX = Self::GROUP_READ.bits() | Self::GROUP_WRITE.bits() | Self::GROUP_EXEC.bits();
        const OTHER_RWX = Self::OTHER_READ.bits() | Self::OTHER_WRITE.bits() | Self::OTHER_EXEC.bits();
    }
}
impl Permissions {
    /// Build permissions from a numeric mode, bits above `0o7777` are dropped
    pub fn from_mode(mode: u16) -> Self {
        Self::from_bits_truncate(mode & PERMISSION_MASK)
    }

    /// Parse an octal permission string such as `644` or `0o755`.
    ///
    /// # Arguments
    /// * text: the octal digits, optionally prefixed by `0o`
    ///
    /// # Returns
    /// * Ok(Permissions)
    /// * Err(InvalidPermissionFormat(text))
    pub fn from_octal_str(text: &str) -> Result<Self> {
        let invalid = || VfsError::InvalidPermissionFormat(text.to_string());
        let digits = text
            .strip_prefix("0o")
            .or_else(|| text.strip_prefix("0O"))
            .unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|byte| (b'0'..=b'7').contains(&byte)) {
            return Err(invalid());
        }
        let mode = u32::from_str_radix(digits, 8).map_err(|_| invalid())?;
        if mode > PERMISSION_MASK as u32 {
            return Err(invalid());
        }
        Ok(Self::from_mode(mode as u16))
    }

    #[inline(always)]
    pub fn mode(&self) -> u16 {
        self.bits()
    }

    /// Render the permissions the way `ls -l` does, e.g. `rwxr-xr-x`
    pub fn mode_string(&self) -> String {
        let mode = self.bits();
        let mut text = String::with_capacity(9);
        for (shift, special_bit, special_char) in [(6, 11, 's'), (3, 10, 's'), (0, 9, 't')] {
            let triad = mode.get_bits(shift..shift + 3);
            text.push(if triad.get_bit(2) { 'r' } else { '-' });
            text.push(if triad.get_bit(1) { 'w' } else { '-' });
            text.push(match (mode.get_bit(special_bit), triad.get_bit(0)) {
                (true, true) => special_char,
                (true, false) => special_char.to_ascii_uppercase(),
                (false, true) => 'x',
                (false, false) => '-',
            });
        }
        text
    }
}
impl Default for Permissions {
    fn default() -> Self {
        Self::from_mode(DEFAULT_PERMISSIONS)
    }
}
impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.bits())
    }
}
