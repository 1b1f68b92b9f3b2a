use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use log::error;
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

use cosmac8::config::{
    EdgeMode, Quirks, ReturnMode, DISPLAY_HEIGHT, DISPLAY_WIDTH, TICK_INTERVAL,
};
use cosmac8::{rom, Machine, Step};

/// Each display cell becomes a SCALE x SCALE block on screen.
const SCALE: u32 = 10;

const FG: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const BG: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// Physical keys for the 16 logical keypad keys 0x0..=0xF.
const KEYMAP: [VirtualKeyCode; 16] = [
    VirtualKeyCode::X,    // 0
    VirtualKeyCode::Key1, // 1
    VirtualKeyCode::Key2, // 2
    VirtualKeyCode::Key3, // 3
    VirtualKeyCode::Q,    // 4
    VirtualKeyCode::W,    // 5
    VirtualKeyCode::E,    // 6
    VirtualKeyCode::A,    // 7
    VirtualKeyCode::S,    // 8
    VirtualKeyCode::D,    // 9
    VirtualKeyCode::Z,    // A
    VirtualKeyCode::C,    // B
    VirtualKeyCode::Key4, // C
    VirtualKeyCode::R,    // D
    VirtualKeyCode::F,    // E
    VirtualKeyCode::V,    // F
];

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("cosmac8")
        .about("CHIP-8 virtual machine")
        .arg(
            Arg::new("rom")
                .value_name("ROM")
                .help("Program image to run")
                .required(true),
        )
        .arg(
            Arg::new("wrap-sprites")
                .long("wrap-sprites")
                .help("Wrap sprites around the screen edges instead of clipping them"),
        )
        .arg(
            Arg::new("pop-return")
                .long("pop-return")
                .help("Make 00EE resume at the call site instead of discarding the saved address"),
        )
        .get_matches();

    let quirks = Quirks {
        ret: if matches.is_present("pop-return") {
            ReturnMode::Pop
        } else {
            ReturnMode::Discard
        },
        edges: if matches.is_present("wrap-sprites") {
            EdgeMode::Wrap
        } else {
            EdgeMode::Clip
        },
    };

    let image = rom::read_program(matches.value_of("rom").unwrap())?;
    let mut machine = Machine::new(quirks);
    machine.load_program(&image)?;

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("cosmac8")
        .with_inner_size(LogicalSize::new(
            (DISPLAY_WIDTH as u32 * SCALE) as f64,
            (DISPLAY_HEIGHT as u32 * SCALE) as f64,
        ))
        .with_min_inner_size(LogicalSize::new(DISPLAY_WIDTH as f64, DISPLAY_HEIGHT as f64))
        .with_resizable(false)
        .build(&event_loop)
        .context("failed to create window")?;

    let mut pixels = {
        let size = window.inner_size();
        let texture = SurfaceTexture::new(size.width, size.height, &window);
        Pixels::new(DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32, texture)
            .context("failed to create render surface")?
    };

    let mut input = WinitInputHelper::new();
    let mut last_tick = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        if let Event::RedrawRequested(_) = event {
            rasterize(machine.frame(), pixels.get_frame());
            if let Err(e) = pixels.render() {
                error!("rendering failed: {e}");
                process::exit(1);
            }
        }

        if input.update(&event) {
            // the quit signal terminates from any state, including a
            // latched wait-for-key
            if input.quit() {
                *control_flow = ControlFlow::Exit;
                return;
            }
            if let Some(size) = input.window_resized() {
                pixels.resize_surface(size.width, size.height);
            }

            // timers run on their own ~60Hz cadence, frozen while the
            // machine waits on a key
            if last_tick.elapsed() >= TICK_INTERVAL {
                if !machine.awaiting_key() {
                    machine.tick_timers();
                }
                last_tick = Instant::now();
            }

            for (key, code) in KEYMAP.iter().enumerate() {
                if input.key_pressed(*code) {
                    machine.key_down(key as u8);
                }
                if input.key_released(*code) {
                    machine.key_up(key as u8);
                }
            }

            match machine.step() {
                // one draw opcode equals one presented frame
                Ok(Step::Drawn) => window.request_redraw(),
                Ok(_) => {}
                Err(e) => {
                    error!("{e:#}");
                    process::exit(1);
                }
            }

            *control_flow = ControlFlow::WaitUntil(Instant::now() + TICK_INTERVAL);
        }
    });
}

/// Expand the cell buffer into the RGBA frame, one pixel per cell; the
/// surface is scaled up to the window by the renderer.
fn rasterize(cells: &[u8], frame: &mut [u8]) {
    for (cell, pixel) in cells.iter().zip(frame.chunks_exact_mut(4)) {
        pixel.copy_from_slice(if *cell != 0 { &FG } else { &BG });
    }
}
