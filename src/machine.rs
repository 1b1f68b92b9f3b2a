use anyhow::{ensure, Result};

use crate::config::{Quirks, MAX_PROG_SIZE, PROG_ADDR};
use crate::cpu::{Cpu, Step};
use crate::Interconnect;

/// The assembled machine: the CPU plus the bus holding RAM, display,
/// keypad, and timers.
///
/// Construction zero-initialises everything, preloads the font, and points
/// the program counter at the program region. There is no normal
/// termination: the machine runs via repeated `step` calls until a fatal
/// error or an external quit.
pub struct Machine {
    pub(crate) cpu: Cpu,
    pub(crate) bus: Interconnect,
}

impl Machine {
    pub fn new(quirks: Quirks) -> Self {
        Machine {
            cpu: Cpu::new(quirks.ret),
            bus: Interconnect::new(quirks.edges),
        }
    }

    /// Copy a program image into RAM at the program region.
    pub fn load_program(&mut self, image: &[u8]) -> Result<()> {
        ensure!(!image.is_empty(), "program image is empty");
        ensure!(
            image.len() <= MAX_PROG_SIZE,
            "program image is {} bytes but only {} fit in memory",
            image.len(),
            MAX_PROG_SIZE
        );
        self.bus.ram.load_at(PROG_ADDR, image);
        Ok(())
    }

    /// Run one fetch-decode-execute cycle.
    pub fn step(&mut self) -> Result<Step> {
        self.cpu.emulate_cycle(&mut self.bus)
    }

    /// Decrement the delay and sound timers once. The control loop calls
    /// this on its own wall-clock cadence, never while a wait-for-key is
    /// latched.
    pub fn tick_timers(&mut self) {
        self.bus.timers.tick();
    }

    /// Record a key press, completing a pending wait-for-key if one is
    /// latched.
    pub fn key_down(&mut self, key: u8) {
        self.bus.keypad.press(key);
        self.cpu.deliver_key(key);
    }

    pub fn key_up(&mut self, key: u8) {
        self.bus.keypad.release(key);
    }

    /// True while execution is latched on a wait-for-key opcode.
    pub fn awaiting_key(&self) -> bool {
        self.cpu.awaiting_key()
    }

    /// The 64x32 cell buffer, row-major, for the presenter.
    pub fn frame(&self) -> &[u8] {
        self.bus.gfx.frame()
    }

    /// True while the buzzer should be audible.
    pub fn sound_active(&self) -> bool {
        self.bus.timers.sound_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_PROG_SIZE;

    fn machine_with(words: &[u16]) -> Machine {
        let mut image = Vec::with_capacity(words.len() * 2);
        for word in words {
            image.extend_from_slice(&word.to_be_bytes());
        }
        let mut machine = Machine::new(Quirks::default());
        machine.load_program(&image).unwrap();
        machine
    }

    #[test]
    fn rejects_an_empty_image() {
        let mut machine = Machine::new(Quirks::default());
        assert!(machine.load_program(&[]).is_err());
    }

    #[test]
    fn rejects_an_oversized_image() {
        let mut machine = Machine::new(Quirks::default());
        assert!(machine.load_program(&vec![0; MAX_PROG_SIZE + 1]).is_err());
        assert!(machine.load_program(&vec![0x60; MAX_PROG_SIZE]).is_ok());
    }

    #[test]
    fn key_press_resumes_a_latched_wait() {
        let mut machine = machine_with(&[0xF20A, 0x6177]);
        assert_eq!(machine.step().unwrap(), Step::AwaitingKey);
        assert!(machine.awaiting_key());

        machine.key_down(0x9);
        assert!(!machine.awaiting_key());
        assert_eq!(machine.cpu.regs[0x2], 0x9);
        assert_eq!(machine.step().unwrap(), Step::Ran);
        assert_eq!(machine.cpu.regs[0x1], 0x77);
    }

    #[test]
    fn key_state_is_visible_to_the_cpu() {
        let mut machine = machine_with(&[0x6105, 0xE19E]);
        machine.key_down(0x5);
        machine.step().unwrap();
        machine.step().unwrap();
        assert_eq!(machine.cpu.pc, 0x206);

        machine.key_up(0x5);
        assert!(!machine.bus.keypad.is_pressed(0x5));
    }

    #[test]
    fn sound_signal_tracks_the_sound_timer() {
        let mut machine = machine_with(&[0x6102, 0xF118]);
        machine.step().unwrap();
        machine.step().unwrap();
        assert!(machine.sound_active());
        machine.tick_timers();
        machine.tick_timers();
        assert!(!machine.sound_active());
    }

    #[test]
    fn a_drawn_step_exposes_the_frame() {
        // draw the font glyph for 0 at (0, 0)
        let mut machine = machine_with(&[0x6000, 0xF029, 0xD005]);
        machine.step().unwrap();
        machine.step().unwrap();
        assert_eq!(machine.step().unwrap(), Step::Drawn);
        // top row of the glyph: 0xF0
        assert_eq!(&machine.frame()[..8], &[1, 1, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn halt_is_latched_after_running_off_memory() {
        let mut machine = machine_with(&[0x1FFF]);
        machine.step().unwrap();
        assert_eq!(machine.step().unwrap(), Step::Halted);
        assert_eq!(machine.step().unwrap(), Step::Halted);
    }
}
