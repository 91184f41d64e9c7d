//! The fetch-decode-execute engine driving a `VmState`.

use crate::emulator::error::{Fault, LoadError};
use crate::emulator::instruction::*;
use crate::emulator::state::*;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// How the program counter moves once an instruction has executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Skip,
    Jump(u16),
    /// Suspend on the current instruction until a key is pressed.
    Wait(Reg),
}

impl Flow {
    fn skip_if(condition: bool) -> Flow {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

/// Coordinates of every set bit in a sprite drawn at `(x, y)`, unwrapped.
fn sprite_pixels(sprite: &[u8], x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
    sprite.iter().enumerate().flat_map(move |(row, bits)| {
        (0..8)
            .filter(move |col| (*bits >> (7 - *col)) & 1 == 1)
            .map(move |col| (x + col, y + row))
    })
}

/// One CHIP-8 machine together with its random source.
pub struct Emulator<R: RngCore = StdRng> {
    state: VmState,
    rng: R,
}

impl Emulator<StdRng> {

    /// Create a new emulator with a random source seeded from the OS.
    pub fn new() -> Emulator<StdRng> {
        Emulator::with_rng(StdRng::from_entropy())
    }

    /// Create a new emulator whose random numbers are reproducible.
    pub fn with_seed(seed: u64) -> Emulator<StdRng> {
        Emulator::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Emulator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Emulator<R> {

    /// Create a new emulator drawing CXNN bytes from `rng`.
    pub fn with_rng(rng: R) -> Emulator<R> {
        Emulator {
            state: VmState::new(),
            rng,
        }
    }

    /// Copy a program into memory at 0x200.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.state.load(program)
    }

    pub fn state(&self) -> &VmState {
        &self.state
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.state.screen
    }

    /// Overwrite the whole keypad.
    pub fn set_keypad(&mut self, keypad: Keypad) {
        self.state.keypad = keypad;
    }

    pub fn press_key(&mut self, key: u8) {
        if let Some(pressed) = self.state.keypad.get_mut(key as usize) {
            *pressed = true;
        }
    }

    pub fn release_key(&mut self, key: u8) {
        if let Some(pressed) = self.state.keypad.get_mut(key as usize) {
            *pressed = false;
        }
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.state.mode != Mode::Running
    }

    /// Whether a tone should currently be playing.
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Perform a full cycle: execute one instruction, tick the timers once,
    /// then report and clear the redraw flag.
    pub fn cycle(&mut self) -> Result<bool, Fault> {
        self.step()?;
        self.tick_timers();
        Ok(self.take_redraw())
    }

    /// Fetch, decode and execute a single instruction without touching the timers.
    /// While waiting for a key nothing is fetched; the wait resolves once a key is down.
    pub fn step(&mut self) -> Result<(), Fault> {
        if let Mode::WaitingForKey(reg) = self.state.mode {
            self.resume_key_wait(reg);
            return Ok(());
        }

        let addr = self.state.program_counter;
        let word = self.fetch()?;
        let instruction = match Instruction::from_u16(word) {
            Some(instruction) => instruction,
            None => return Err(self.fault(Fault::Decode { addr, word })),
        };

        log::trace!("{:#05x}: {:?}", addr, instruction);

        self.run(instruction, word)
    }

    /// Decrement both timers towards zero.
    /// Returns `true` on the tick where the sound timer goes from 1 to 0.
    pub fn tick_timers(&mut self) -> bool {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        let beep_ended = self.state.sound_timer == 1;
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
        }
        beep_ended
    }

    /// Read and clear the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.state.redraw, false)
    }

    /// Execute a single instruction as if it was stored at the program counter.
    /// Operands that do not fit in their field (a register above VF, an address
    /// above 0xFFF) cannot be encoded and raise `Fault::Decode`.
    pub fn execute_single(&mut self, instruction: Instruction) -> Result<(), Fault> {
        let word = instruction.to_u16();
        if Instruction::from_u16(word) != Some(instruction) {
            let addr = self.state.program_counter;
            return Err(self.fault(Fault::Decode { addr, word }));
        }
        self.run(instruction, word)
    }

    /// Execute many instructions sequentially, stopping at the first fault.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<(), Fault> {
        for instruction in instructions {
            self.execute_single(*instruction)?;
        }
        Ok(())
    }

    // Each opcode is two bytes, most significant first
    fn fetch(&self) -> Result<u16, Fault> {
        let pc = self.state.program_counter;
        if pc as usize + 1 >= MEM_SIZE {
            return Err(self.fault(Fault::PcOutOfBounds { addr: pc }));
        }
        let left = self.state.memory[pc as usize];
        let right = self.state.memory[pc as usize + 1];
        Ok(u16::from_be_bytes([left, right]))
    }

    fn fault(&self, fault: Fault) -> Fault {
        log::error!("{}", fault);
        fault
    }

    fn run(&mut self, instruction: Instruction, word: u16) -> Result<(), Fault> {
        let pc = self.state.program_counter;
        match self.execute(instruction, word)? {
            Flow::Next => self.state.program_counter = pc.wrapping_add(2),
            Flow::Skip => self.state.program_counter = pc.wrapping_add(4),
            Flow::Jump(addr) => self.state.program_counter = addr,
            Flow::Wait(reg) => {
                log::debug!("Waiting for a key into V{:X}", reg.0);
                self.state.mode = Mode::WaitingForKey(reg);
            }
        }
        Ok(())
    }

    fn resume_key_wait(&mut self, reg: Reg) {
        if let Some(key) = self.state.first_pressed_key() {
            log::debug!("Key {:X} ends the wait", key);
            *self.state.register_mut(reg) = key;
            self.state.program_counter = self.state.program_counter.wrapping_add(2);
            self.state.mode = Mode::Running;
        }
    }

    /// Fail unless `len` bytes starting at `start` are inside memory.
    fn check_range(&self, word: u16, start: usize, len: usize) -> Result<(), Fault> {
        if start + len > MEM_SIZE {
            return Err(self.fault(Fault::MemoryBounds {
                addr: self.state.program_counter,
                word,
                target: start.max(MEM_SIZE),
            }));
        }
        Ok(())
    }

    /// Execute one instruction. Every check happens before the first write,
    /// so a fault leaves the state untouched.
    fn execute(&mut self, instruction: Instruction, word: u16) -> Result<Flow, Fault> {
        let addr = self.state.program_counter;

        let flow = match instruction {

            // Clear the screen
            Instruction::ClearScreen => {
                self.state.screen = [0; SCREEN_WIDTH * SCREEN_HEIGHT];
                self.state.redraw = true;
                Flow::Next
            }

            // Return to the previous call site via the stack.
            Instruction::Return => {
                if self.state.stack_pointer == 0 {
                    return Err(self.fault(Fault::StackUnderflow { addr, word }));
                }
                self.state.stack_pointer -= 1;
                log::debug!("Return, stack depth {}", self.state.stack_pointer);
                Flow::Jump(self.state.stack[self.state.stack_pointer as usize])
            }

            // Go to a specific memory address
            Instruction::Goto(Addr(target)) => Flow::Jump(target),

            // Store the return address on the stack, then jump to the specified address
            Instruction::Call(Addr(target)) => {
                if self.state.stack_pointer as usize >= STACK_SIZE {
                    return Err(self.fault(Fault::StackOverflow { addr, word }));
                }
                self.state.stack[self.state.stack_pointer as usize] = addr.wrapping_add(2);
                self.state.stack_pointer += 1;
                log::debug!("Call {:#05x}, stack depth {}", target, self.state.stack_pointer);
                Flow::Jump(target)
            }

            Instruction::IfRegEqConst(x, Const(n)) => Flow::skip_if(self.state.register(x) == n),

            Instruction::IfRegNeqConst(x, Const(n)) => Flow::skip_if(self.state.register(x) != n),

            Instruction::IfRegEqReg(x, y) => {
                Flow::skip_if(self.state.register(x) == self.state.register(y))
            }

            Instruction::IfRegNeqReg(x, y) => {
                Flow::skip_if(self.state.register(x) != self.state.register(y))
            }

            Instruction::SetRegToConst(x, Const(n)) => {
                *self.state.register_mut(x) = n;
                Flow::Next
            }

            // Wraps around, VF is left alone
            Instruction::IncRegByConst(x, Const(n)) => {
                let value = self.state.register(x).wrapping_add(n);
                *self.state.register_mut(x) = value;
                Flow::Next
            }

            Instruction::SetRegToReg(x, y) => {
                *self.state.register_mut(x) = self.state.register(y);
                Flow::Next
            }

            Instruction::BitwiseOr(x, y) => {
                *self.state.register_mut(x) |= self.state.register(y);
                Flow::Next
            }

            Instruction::BitwiseAnd(x, y) => {
                *self.state.register_mut(x) &= self.state.register(y);
                Flow::Next
            }

            Instruction::BitwiseXor(x, y) => {
                *self.state.register_mut(x) ^= self.state.register(y);
                Flow::Next
            }

            // VF is 1 on carry. Like every flag instruction this writes VF after Vx,
            // so with x == F the flag is what remains.
            Instruction::IncRegByReg(x, y) => {
                let (value, carry) = self.state.register(x).overflowing_add(self.state.register(y));
                self.set_with_flag(x, value, carry)
            }

            // VF is 1 when there is no borrow
            Instruction::DecRegByReg(x, y) => {
                let (vx, vy) = (self.state.register(x), self.state.register(y));
                self.set_with_flag(x, vx.wrapping_sub(vy), vx >= vy)
            }

            Instruction::SetVxVyMinusVx(x, y) => {
                let (vx, vy) = (self.state.register(x), self.state.register(y));
                self.set_with_flag(x, vy.wrapping_sub(vx), vy >= vx)
            }

            // VF is the bit shifted out
            Instruction::BitshiftRight(x) => {
                let vx = self.state.register(x);
                self.set_with_flag(x, vx >> 1, vx & 0x01 == 1)
            }

            Instruction::BitshiftLeft(x) => {
                let vx = self.state.register(x);
                self.set_with_flag(x, vx << 1, vx & 0x80 != 0)
            }

            Instruction::SetI(Addr(target)) => {
                self.state.i = target;
                Flow::Next
            }

            Instruction::SetPcToV0PlusAddr(Addr(target)) => {
                Flow::Jump(target.wrapping_add(self.state.registers[0] as u16))
            }

            Instruction::SetVxRand(x, Const(n)) => {
                *self.state.register_mut(x) = self.rng.gen::<u8>() & n;
                Flow::Next
            }

            Instruction::Draw(x, y, Const(sprite_height)) => {
                self.draw(word, x, y, sprite_height as usize)?;
                Flow::Next
            }

            Instruction::IfKeyEqVx(x) => Flow::skip_if(self.key_state(word, x)?),

            Instruction::IfKeyNeqVx(x) => Flow::skip_if(!self.key_state(word, x)?),

            Instruction::SetRegToDelayTimer(x) => {
                *self.state.register_mut(x) = self.state.delay_timer;
                Flow::Next
            }

            // Get a key press, suspending if none is held
            Instruction::SetRegToGetKey(x) => match self.state.first_pressed_key() {
                Some(key) => {
                    *self.state.register_mut(x) = key;
                    Flow::Next
                }
                None => Flow::Wait(x),
            },

            Instruction::SetDelayTimerToReg(x) => {
                self.state.delay_timer = self.state.register(x);
                Flow::Next
            }

            Instruction::SetSoundTimerToReg(x) => {
                self.state.sound_timer = self.state.register(x);
                Flow::Next
            }

            Instruction::AddRegToI(x) => {
                self.state.i = self.state.i.wrapping_add(self.state.register(x) as u16) & 0x0FFF;
                Flow::Next
            }

            // Set i to character address. Each font element is 5 bytes wide.
            Instruction::SetIToSpriteAddrVx(x) => {
                let digit = (self.state.register(x) & 0x0F) as u16;
                self.state.i = FONT_GLYPH_SIZE * digit;
                Flow::Next
            }

            Instruction::SetIToBcdOfReg(x) => {
                let i = self.state.i as usize;
                self.check_range(word, i, 3)?;

                let value = self.state.register(x);
                self.state.memory[i] = value / 100;
                self.state.memory[i + 1] = value / 10 % 10;
                self.state.memory[i + 2] = value % 10;
                Flow::Next
            }

            // Dump register values up to Vx
            Instruction::RegDump(Reg(x)) => {
                let i = self.state.i as usize;
                let count = x as usize + 1;
                self.check_range(word, i, count)?;
                self.state.memory[i..i + count].copy_from_slice(&self.state.registers[..count]);
                Flow::Next
            }

            // Load register values up to Vx
            Instruction::RegLoad(Reg(x)) => {
                let i = self.state.i as usize;
                let count = x as usize + 1;
                self.check_range(word, i, count)?;
                self.state.registers[..count].copy_from_slice(&self.state.memory[i..i + count]);
                Flow::Next
            }
        };

        Ok(flow)
    }

    fn set_with_flag(&mut self, x: Reg, value: u8, flag: bool) -> Flow {
        *self.state.register_mut(x) = value;
        self.state.set_flag(flag);
        Flow::Next
    }

    fn key_state(&self, word: u16, x: Reg) -> Result<bool, Fault> {
        let key = self.state.register(x) as usize;
        match self.state.keypad.get(key) {
            Some(pressed) => Ok(*pressed),
            None => Err(self.fault(Fault::MemoryBounds {
                addr: self.state.program_counter,
                word,
                target: key,
            })),
        }
    }

    /// XOR a sprite from memory at I onto the screen at (Vx, Vy).
    /// Coordinates do not wrap, so a set bit past the edge is a fault.
    fn draw(&mut self, word: u16, x: Reg, y: Reg, height: usize) -> Result<(), Fault> {
        let x_coord = self.state.register(x) as usize;
        let y_coord = self.state.register(y) as usize;
        let sprite_addr = self.state.i as usize;
        self.check_range(word, sprite_addr, height)?;

        let sprite = &self.state.memory[sprite_addr..sprite_addr + height];
        let outside = sprite_pixels(sprite, x_coord, y_coord)
            .find(|(px, py)| *px >= SCREEN_WIDTH || *py >= SCREEN_HEIGHT);
        if let Some((px, py)) = outside {
            return Err(self.fault(Fault::MemoryBounds {
                addr: self.state.program_counter,
                word,
                target: py * SCREEN_WIDTH + px,
            }));
        }

        let state = &mut self.state;
        let sprite = &state.memory[sprite_addr..sprite_addr + height];
        let mut any_collisions = false;
        for (px, py) in sprite_pixels(sprite, x_coord, y_coord) {
            let pixel = &mut state.screen[py * SCREEN_WIDTH + px];
            any_collisions |= *pixel == 1;
            *pixel ^= 1;
        }

        // Set VF collision flag
        state.set_flag(any_collisions);
        state.redraw = true;
        Ok(())
    }
}
