use chip8_vm::emulator::state::{FONT, SCREEN_WIDTH};
use chip8_vm::emulator::{Emulator, Fault, LoadError};
use pretty_assertions::assert_eq;

fn run_until_pc(emulator: &mut Emulator, pc: u16, max_cycles: usize) {
    for _ in 0..max_cycles {
        if emulator.state().program_counter == pc {
            return;
        }
        emulator.cycle().unwrap();
    }
    panic!("did not reach {:#05x}", pc);
}

#[test]
fn prints_a_number_with_the_font() {
    let program = [
        0x60, 0x89, // 0x200: V0 = 137
        0xA3, 0x00, // 0x202: I = 0x300
        0xF0, 0x33, // 0x204: BCD of V0
        0xF2, 0x65, // 0x206: V0..V2 = digits
        0x63, 0x00, // 0x208: V3 = x
        0x64, 0x00, // 0x20A: V4 = y
        0xF0, 0x29, // 0x20C: I = glyph V0
        0xD3, 0x45, // 0x20E: draw
        0x73, 0x05, // 0x210: x += 5
        0xF1, 0x29, // 0x212: I = glyph V1
        0xD3, 0x45, // 0x214: draw
        0x73, 0x05, // 0x216: x += 5
        0xF2, 0x29, // 0x218: I = glyph V2
        0xD3, 0x45, // 0x21A: draw
        0x12, 0x1C, // 0x21C: halt
    ];
    let mut emulator = Emulator::with_seed(0);
    emulator.load(&program).unwrap();
    run_until_pc(&mut emulator, 0x21C, 100);

    let state = emulator.state();
    assert_eq!(&state.memory[0x300..0x303], &[1, 3, 7]);
    assert_eq!(state.registers[0xF], 0);

    // Each glyph row is the top nibble of its font byte
    for (digit, left) in [(1usize, 0usize), (3, 5), (7, 10)].iter() {
        for row in 0..5 {
            let bits = FONT[digit * 5 + row];
            for col in 0..4 {
                let expected = (bits >> (7 - col)) & 1;
                assert_eq!(state.screen[row * SCREEN_WIDTH + left + col], expected);
            }
        }
    }
}

#[test]
fn subroutines_nest_and_unwind() {
    let program = [
        0x22, 0x06, // 0x200: call 0x206
        0x12, 0x02, // 0x202: halt
        0x00, 0x00, // 0x204
        0x71, 0x01, // 0x206: V1 += 1
        0x22, 0x0C, // 0x208: call 0x20C
        0x00, 0xEE, // 0x20A: return
        0x72, 0x01, // 0x20C: V2 += 1
        0x00, 0xEE, // 0x20E: return
    ];
    let mut emulator = Emulator::new();
    emulator.load(&program).unwrap();
    run_until_pc(&mut emulator, 0x202, 10);

    let state = emulator.state();
    assert_eq!(state.stack_pointer, 0);
    assert_eq!(state.registers[1], 1);
    assert_eq!(state.registers[2], 1);
}

#[test]
fn counting_loop_with_skip() {
    let program = [
        0x60, 0x00, // 0x200: V0 = 0
        0x70, 0x01, // 0x202: V0 += 1
        0x30, 0x0A, // 0x204: skip if V0 == 10
        0x12, 0x02, // 0x206: loop
        0x12, 0x08, // 0x208: halt
    ];
    let mut emulator = Emulator::new();
    emulator.load(&program).unwrap();
    run_until_pc(&mut emulator, 0x208, 100);
    assert_eq!(emulator.state().registers[0], 10);
}

#[test]
fn oversized_program_is_rejected() {
    let mut emulator = Emulator::new();
    let program = vec![0x12; 4096 - 512 + 1];
    assert_eq!(
        emulator.load(&program),
        Err(LoadError::TooLarge { size: 3585, max: 3584 })
    );
    assert_eq!(emulator.state().memory[0x200], 0);
}

#[test]
fn fault_stops_at_the_bad_instruction() {
    let mut emulator = Emulator::new();
    emulator.load(&[0x60, 0x01, 0x51, 0x23]).unwrap();
    assert_eq!(emulator.cycle(), Ok(false));
    assert_eq!(emulator.cycle(), Err(Fault::Decode { addr: 0x202, word: 0x5123 }));
    assert_eq!(emulator.state().program_counter, 0x202);
    assert_eq!(emulator.state().registers[0], 1);
}
