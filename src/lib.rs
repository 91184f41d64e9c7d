/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
The hex keypad is mapped onto the keys `1234`, `qwer`, `asdf` and `zxcv`, and Esc quits.

# Library

The machine does no I/O and has no notion of time of its own.
You load a program, then call `Emulator::cycle` as often as you like.
Each cycle executes one instruction, ticks the timers once and tells you
whether the screen changed.

```rust
use chip8_vm::emulator::Emulator;

let mut emulator = Emulator::new();

// Load a program at address 0x200.
let clear_display = [0x00, 0xE0];
emulator.load(&clear_display)?;
let redraw = emulator.cycle()?; // Will now clear the display
assert!(redraw);
# Ok::<(), Box<dyn std::error::Error>>(())
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip8_vm::emulator::Emulator;
use chip8_vm::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::with_seed(42);

// Execute instructions manually
emulator.execute_single(Instruction::ClearScreen)?;

// Or many sequentially
emulator.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg(0xA), Const(35)),
    Instruction::SetRegToReg(Reg(0xB), Reg(0xA))
])?;
assert_eq!(emulator.state().registers[0xB], 35);
# Ok::<(), chip8_vm::emulator::Fault>(())
```

Programs that are not well formed stop with a `Fault` naming the offending
address and instruction word. The machine is left as it was before that instruction.

```rust
use chip8_vm::emulator::{Emulator, Fault};

let mut emulator = Emulator::new();
emulator.load(&[0x00, 0xEE]).unwrap(); // return, but nothing was called
assert_eq!(emulator.cycle(), Err(Fault::StackUnderflow { addr: 0x200, word: 0x00EE }));
```

## Real time

A `Driver` paces a machine from wall-clock time: instructions at a configurable rate,
timers at 60 Hz no matter how fast instructions run. It reads keys from an
`EmulatorInput` (such as a `SharedKeypad` written by an input thread) and hands
frames and the tone to an `EmulatorOutput`.

```rust
use chip8_vm::emulator::{Driver, DriverConfig, Emulator};
use chip8_vm::emulator::input::SharedKeypad;
use chip8_vm::emulator::output::DummyOutput;
use std::time::Duration;

let keypad = SharedKeypad::new();
let mut emulator = Emulator::new();
emulator.load(&[0xF0, 0x0A])?; // wait for a key

let mut driver = Driver::new(emulator, keypad.clone(), DummyOutput::new(), DriverConfig::default());
driver.run_for(Duration::from_millis(20))?;
assert!(driver.emulator().is_waiting_for_key());

keypad.press(0x5);
driver.run_for(Duration::from_millis(20))?;
assert_eq!(driver.emulator().state().registers[0], 0x5);
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub mod emulator;
pub mod util;
