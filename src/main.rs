use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;

use chip8_vm::{Error, Interpreter, Result};

/// Roughly 60 frames per second; the timers tick once per frame.
const FRAME_TIME: Duration = Duration::from_micros(16600);

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path of the rom to load
    #[arg(short, long, value_name = "FILE")]
    rom_path: PathBuf,

    /// Instructions executed per rendered frame
    #[arg(short, long, default_value_t = 10)]
    cycles_per_frame: u32,

    /// Size of one CHIP-8 pixel on screen
    #[arg(short, long, default_value_t = 15)]
    scale: u32,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,
}

/// Maps the left side of a QWERTY keyboard onto the hexadecimal keypad:
/// 1 2 3 C / 4 5 6 D / 7 8 9 E / A 0 B F.
fn keymap(key: Keycode) -> Option<u8> {
    match key {
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Num4 => Some(0xC),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::R => Some(0xD),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::F => Some(0xE),
        Keycode::Z => Some(0xA),
        Keycode::X => Some(0x0),
        Keycode::C => Some(0xB),
        Keycode::V => Some(0xF),
        _ => None,
    }
}

fn run_rom(interpreter: &mut Interpreter, cli: &Cli) -> Result<()> {
    let width = interpreter.display().width();
    let height = interpreter.display().height();

    let sdl_context = sdl2::init().map_err(Error::msg)?;
    let video = sdl_context.video().map_err(Error::msg)?;

    let window = video
        .window(
            "Chip-8 - ESC to exit",
            width as u32 * cli.scale,
            height as u32 * cli.scale,
        )
        .position_centered()
        .build()
        .context("Could not create window")?;

    let mut canvas = window
        .into_canvas()
        .build()
        .context("Could not create renderer")?;
    let mut event_pump = sdl_context.event_pump().map_err(Error::msg)?;

    'running: loop {
        let frame_start = Instant::now();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(keycode) = keymap(key) {
                        interpreter.press_key(keycode);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(keycode) = keymap(key) {
                        interpreter.release_key(keycode);
                    }
                }
                _ => {}
            }
        }

        debug!("Keypad [{}]", interpreter.keypad());

        for _ in 0..cli.cycles_per_frame {
            interpreter.step()?;
        }

        if interpreter.tick_timers() {
            debug!("Beep ended");
        }

        canvas.set_draw_color(Color::RGB(0, 0, 0));
        canvas.clear();
        canvas.set_draw_color(Color::RGB(255, 255, 255));

        for (idx, _) in interpreter
            .display()
            .pixels()
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
        {
            let x = (idx % width) as u32 * cli.scale;
            let y = (idx / width) as u32 * cli.scale;
            canvas
                .fill_rect(Rect::new(x as i32, y as i32, cli.scale, cli.scale))
                .map_err(Error::msg)?;
        }

        canvas.present();

        if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    info!(
        "Stopped at {:#05X} after {} unknown instructions",
        interpreter.pc(),
        interpreter.unknown_opcodes()
    );

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let bytes = std::fs::read(&cli.rom_path)
        .with_context(|| format!("Could not read {}", cli.rom_path.display()))?;

    let mut interpreter = match cli.seed {
        Some(seed) => Interpreter::with_seed(seed),
        None => Interpreter::new(),
    };
    interpreter.load(&bytes)?;

    run_rom(&mut interpreter, &cli)?;

    Ok(())
}
