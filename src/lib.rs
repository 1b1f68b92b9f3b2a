//! A CHIP-8 virtual machine: 4K of RAM, sixteen 8-bit registers, a 16-frame
//! call stack, a 64x32 monochrome display, two countdown timers, and a
//! 16-key keypad.
//!
//! The library is fully headless; presentation and input live in the
//! binary. Drive it with [`Machine::step`] and act on the returned
//! [`Step`].

pub mod config;
pub mod cpu;
pub mod gfx;
pub mod interconnect;
pub mod keypad;
pub mod machine;
pub mod ram;
pub mod rom;
pub mod timers;

pub use cpu::Step;
pub use interconnect::Interconnect;
pub use machine::Machine;
