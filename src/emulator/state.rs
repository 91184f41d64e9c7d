//! The machine state described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use super::error::LoadError;
use super::instruction::Reg;
use std::fmt;

pub const MEM_SIZE: usize = 4096;
pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const NUM_KEYS: usize = 16;
pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const PC_START: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEM_SIZE - PC_START as usize;

/// Bytes per font glyph.
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// One cell per pixel, row-major, each cell 0 or 1.
pub type Framebuffer = [u8; SCREEN_WIDTH * SCREEN_HEIGHT];

/// One flag per hex key, `true` while held down.
pub type Keypad = [bool; NUM_KEYS];

/// Whether the machine is executing or suspended on a key wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Running,
    /// Suspended by FX0A, the key goes into the register once pressed.
    WaitingForKey(Reg),
}

/// The complete mutable state of one machine.
pub struct VmState {
    pub memory: [u8; MEM_SIZE],
    pub registers: [u8; NUM_REGISTERS],
    pub i: u16,
    pub program_counter: u16,
    pub stack_pointer: u8,
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub screen: Framebuffer,
    pub keypad: Keypad,
    pub redraw: bool,
    pub mode: Mode,
}

impl Default for VmState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.screen.chunks(SCREEN_WIDTH) {
            for c in row.iter() {
                write!(f, "{}", if *c == 1 { "#" } else { " " })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl VmState {

    /// Create a zeroed machine with the font loaded and PC at 0x200.
    pub fn new() -> VmState {
        let mut memory = [0; MEM_SIZE];
        memory[..FONT.len()].copy_from_slice(&FONT);

        VmState {
            memory,
            registers: [0; NUM_REGISTERS],
            i: 0,
            program_counter: PC_START,
            stack_pointer: 0,
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            screen: [0; SCREEN_WIDTH * SCREEN_HEIGHT],
            keypad: [false; NUM_KEYS],
            redraw: false,
            mode: Mode::Running,
        }
    }

    /// Copy a program into memory at 0x200.
    /// Nothing is written if the program does not fit.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            log::warn!("Rejected program of {} bytes", program.len());
            return Err(LoadError::TooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }

        let start = PC_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        log::debug!("Loaded {} bytes at {:#05x}", program.len(), PC_START);
        Ok(())
    }

    pub fn register(&self, reg: Reg) -> u8 {
        self.registers[reg.0 as usize]
    }

    pub fn register_mut(&mut self, reg: Reg) -> &mut u8 {
        &mut self.registers[reg.0 as usize]
    }

    /// Write the VF flag register.
    pub fn set_flag(&mut self, flag: bool) {
        self.registers[0xF] = flag as u8;
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.screen[y * SCREEN_WIDTH + x]
    }

    /// Lowest-indexed key currently held, if any.
    pub fn first_pressed_key(&self) -> Option<u8> {
        self.keypad.iter().position(|pressed| *pressed).map(|key| key as u8)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_state_is_initialized() {
        let state = VmState::new();
        assert_eq!(&state.memory[..80], &FONT[..]);
        assert!(state.memory[80..].iter().all(|b| *b == 0));
        assert_eq!(state.program_counter, 0x200);
        assert_eq!(state.stack_pointer, 0);
        assert_eq!(state.registers, [0; NUM_REGISTERS]);
        assert!(state.screen.iter().all(|p| *p == 0));
        assert_eq!(state.keypad, [false; NUM_KEYS]);
        assert!(!state.redraw);
        assert_eq!(state.mode, Mode::Running);
    }

    #[test]
    fn largest_program_fits() {
        let mut state = VmState::new();
        let program = vec![0xAB; 3584];
        assert_eq!(state.load(&program), Ok(()));
        assert_eq!(state.memory[0x200], 0xAB);
        assert_eq!(state.memory[0xFFF], 0xAB);
    }

    #[test]
    fn oversized_program_leaves_memory_untouched() {
        let mut state = VmState::new();
        let before = state.memory;
        let program = vec![0xAB; 3585];
        assert_eq!(state.load(&program), Err(LoadError::TooLarge { size: 3585, max: 3584 }));
        assert_eq!(&state.memory[..], &before[..]);
    }

    #[test]
    fn first_pressed_key_is_lowest() {
        let mut state = VmState::new();
        assert_eq!(state.first_pressed_key(), None);
        state.keypad[0xC] = true;
        state.keypad[0x3] = true;
        assert_eq!(state.first_pressed_key(), Some(0x3));
    }

    #[test]
    fn display_draws_set_pixels() {
        let mut state = VmState::new();
        state.screen[0] = 1;
        state.screen[SCREEN_WIDTH + 1] = 1;
        let rendered = state.to_string();
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows.len(), SCREEN_HEIGHT);
        assert!(rows[0].starts_with("# "));
        assert!(rows[1].starts_with(" #"));
    }
}
