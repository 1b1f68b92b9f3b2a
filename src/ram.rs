use anyhow::{ensure, Result};
use log::debug;

use crate::config::{FONT_ADDR, FONT_SPRITES, RAM_SIZE};

/// The RAM of the machine.
///
/// It consists of 4096 bytes that can be individually addressed using 16-bit
/// addresses. The region below 0x200 is reserved: the hexadecimal font lives
/// at `FONT_ADDR`, and program images are loaded at `PROG_ADDR`.
pub struct Ram(Box<[u8]>);

impl Ram {
    /// Load the content of `data` into RAM at address `addr`.
    ///
    /// The caller is responsible for making sure `data` fits; program images
    /// are validated by the loader before they get here.
    pub fn load_at(&mut self, addr: u16, data: &[u8]) {
        let addr = addr as usize;
        debug!("Writing {} bytes into ram at {:#05X}", data.len(), addr);
        self.0[addr..addr + data.len()].copy_from_slice(data);
    }

    /// Read `len` bytes starting at `addr`.
    ///
    /// Reads that would run past the end of memory are an error; the machine
    /// treats them as fatal.
    pub fn read_range(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let start = addr as usize;
        let end = start + len;
        ensure!(
            end <= RAM_SIZE,
            "memory read out of bounds: {:#05X}..{:#05X}",
            start,
            end
        );
        Ok(&self.0[start..end])
    }

    /// Write `data` starting at `addr`, refusing to run past the end of
    /// memory.
    pub fn write_range(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        let start = addr as usize;
        let end = start + data.len();
        ensure!(
            end <= RAM_SIZE,
            "memory write out of bounds: {:#05X}..{:#05X}",
            start,
            end
        );
        self.0[start..end].copy_from_slice(data);
        Ok(())
    }
}

impl Default for Ram {
    fn default() -> Self {
        let mut ram = Self(vec![0u8; RAM_SIZE].into_boxed_slice());
        ram.load_at(FONT_ADDR, &FONT_SPRITES);
        ram
    }
}

impl std::ops::Index<u16> for Ram {
    type Output = u8;

    fn index(&self, idx: u16) -> &u8 {
        &self.0[idx as usize]
    }
}

impl std::ops::IndexMut<u16> for Ram {
    fn index_mut(&mut self, idx: u16) -> &mut u8 {
        &mut self.0[idx as usize]
    }
}
