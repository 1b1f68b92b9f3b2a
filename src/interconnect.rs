use anyhow::Result;

use crate::config::{EdgeMode, RAM_SIZE};
use crate::gfx::Gfx;
use crate::keypad::Keypad;
use crate::ram::Ram;
use crate::timers::Timers;

/// Main "Bus" of the machine.
///
/// It coordinates access to the RAM, the display, the keypad, and the
/// timers. Everything on it is owned exclusively by the control-loop thread.
pub struct Interconnect {
    pub ram: Ram,
    pub gfx: Gfx,
    pub keypad: Keypad,
    pub timers: Timers,
}

impl Interconnect {
    pub fn new(edges: EdgeMode) -> Self {
        Self {
            ram: Ram::default(),
            gfx: Gfx::new(edges),
            keypad: Keypad::default(),
            timers: Timers::default(),
        }
    }

    /// Fetch the 2-byte instruction at address `pc`, big-endian.
    ///
    /// Returns `None` when the byte pair would cross the end of memory.
    pub fn fetch_opcode(&self, pc: u16) -> Option<u16> {
        if (pc as usize) + 1 < RAM_SIZE {
            Some(((self.ram[pc] as u16) << 8) | self.ram[pc + 1] as u16)
        } else {
            None
        }
    }

    /// Draw the `height`-row sprite stored at `addr` at coordinates
    /// (vx, vy). Returns whether any set pixel was flipped off.
    pub fn draw_sprite(&mut self, addr: u16, vx: u8, vy: u8, height: u8) -> Result<bool> {
        let sprite = self.ram.read_range(addr, height as usize)?;
        Ok(self.gfx.draw_sprite(vx, vy, sprite))
    }
}
