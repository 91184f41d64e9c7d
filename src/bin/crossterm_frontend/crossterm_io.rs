use chip8_vm::emulator::output::EmulatorOutput;
use chip8_vm::emulator::state::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style::Print};
use std::io::{stdout, Stdout, Write};

/// Draws the screen with half blocks, so every terminal cell holds two pixel rows.
pub struct CrosstermOutput {
    out: Stdout,
}

impl CrosstermOutput {
    pub fn new() -> crossterm::Result<CrosstermOutput> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        Ok(CrosstermOutput { out })
    }

    fn draw(&mut self, framebuffer: &Framebuffer) -> crossterm::Result<()> {
        let pixel = |x: usize, y: usize| framebuffer[y * SCREEN_WIDTH + x] == 1;
        for row in 0..SCREEN_HEIGHT / 2 {
            let line: String = (0..SCREEN_WIDTH)
                .map(|x| match (pixel(x, 2 * row), pixel(x, 2 * row + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect();
            queue!(self.out, cursor::MoveTo(0, row as u16), Print(line))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        let _ = execute!(self.out, LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

impl EmulatorOutput for CrosstermOutput {
    fn present(&mut self, framebuffer: &Framebuffer) {
        if let Err(error) = self.draw(framebuffer) {
            log::warn!("Could not draw frame: {}", error);
        }
    }

    // The terminal bell is the only sound available, ring it when a tone starts
    fn set_tone(&mut self, on: bool) {
        if on {
            let _ = execute!(self.out, Print('\x07'));
        }
    }
}
