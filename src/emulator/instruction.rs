use crate::util::bit_splitter::BitSplitter;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen, // 00E0
    Return, // 00EE
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    IfRegEqConst(Reg, Const), // 3XNN
    IfRegNeqConst(Reg, Const), // 4XNN
    IfRegEqReg(Reg, Reg), // 5XY0
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    IncRegByReg(Reg, Reg), // 8XY4
    DecRegByReg(Reg, Reg), // 8XY5
    BitshiftRight(Reg), // 8XY6
    SetVxVyMinusVx(Reg, Reg), // 8XY7
    BitshiftLeft(Reg), // 8XYE
    IfRegNeqReg(Reg, Reg), // 9XY0
    SetI(Addr), // ANNN
    SetPcToV0PlusAddr(Addr), // BNNN
    SetVxRand(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    IfKeyEqVx(Reg), // EX9E
    IfKeyNeqVx(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    SetRegToGetKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToSpriteAddrVx(Reg), // FX29
    SetIToBcdOfReg(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg) // FX65
}

impl Instruction {

    /// Decode a full instruction word.
    /// Returns `None` if the word is not part of the instruction set.
    pub fn from_u16(value: u16) -> Option<Instruction> {
        Instruction::decode(BitSplitter::from_u16(value))
    }

    /// Decode the two bytes of an instruction, most significant byte first.
    pub fn from_two_u8(left: u8, right: u8) -> Option<Instruction> {
        Instruction::decode(BitSplitter::new(left, right))
    }

    /// Encode the instruction back into its instruction word.
    pub fn to_u16(&self) -> u16 {
        let nibble = |Reg(r): Reg| (r & 0xF) as u16;
        let xy = |family: u16, x: Reg, y: Reg, n: u16| {
            family << 12 | nibble(x) << 8 | nibble(y) << 4 | n
        };
        let xkk = |family: u16, x: Reg, Const(kk): Const| family << 12 | nibble(x) << 8 | kk as u16;
        let fx = |x: Reg, selector: u16| 0xF000 | nibble(x) << 8 | selector;
        match *self {
            Instruction::ClearScreen => 0x00E0,
            Instruction::Return => 0x00EE,
            Instruction::Goto(Addr(addr)) => 0x1000 | addr & 0x0FFF,
            Instruction::Call(Addr(addr)) => 0x2000 | addr & 0x0FFF,
            Instruction::IfRegEqConst(x, kk) => xkk(0x3, x, kk),
            Instruction::IfRegNeqConst(x, kk) => xkk(0x4, x, kk),
            Instruction::IfRegEqReg(x, y) => xy(0x5, x, y, 0x0),
            Instruction::SetRegToConst(x, kk) => xkk(0x6, x, kk),
            Instruction::IncRegByConst(x, kk) => xkk(0x7, x, kk),
            Instruction::SetRegToReg(x, y) => xy(0x8, x, y, 0x0),
            Instruction::BitwiseOr(x, y) => xy(0x8, x, y, 0x1),
            Instruction::BitwiseAnd(x, y) => xy(0x8, x, y, 0x2),
            Instruction::BitwiseXor(x, y) => xy(0x8, x, y, 0x3),
            Instruction::IncRegByReg(x, y) => xy(0x8, x, y, 0x4),
            Instruction::DecRegByReg(x, y) => xy(0x8, x, y, 0x5),
            Instruction::BitshiftRight(x) => xy(0x8, x, Reg(0), 0x6),
            Instruction::SetVxVyMinusVx(x, y) => xy(0x8, x, y, 0x7),
            Instruction::BitshiftLeft(x) => xy(0x8, x, Reg(0), 0xE),
            Instruction::IfRegNeqReg(x, y) => xy(0x9, x, y, 0x0),
            Instruction::SetI(Addr(addr)) => 0xA000 | addr & 0x0FFF,
            Instruction::SetPcToV0PlusAddr(Addr(addr)) => 0xB000 | addr & 0x0FFF,
            Instruction::SetVxRand(x, kk) => xkk(0xC, x, kk),
            Instruction::Draw(x, y, Const(n)) => xy(0xD, x, y, n as u16 & 0xF),
            Instruction::IfKeyEqVx(x) => 0xE09E | nibble(x) << 8,
            Instruction::IfKeyNeqVx(x) => 0xE0A1 | nibble(x) << 8,
            Instruction::SetRegToDelayTimer(x) => fx(x, 0x07),
            Instruction::SetRegToGetKey(x) => fx(x, 0x0A),
            Instruction::SetDelayTimerToReg(x) => fx(x, 0x15),
            Instruction::SetSoundTimerToReg(x) => fx(x, 0x18),
            Instruction::AddRegToI(x) => fx(x, 0x1E),
            Instruction::SetIToSpriteAddrVx(x) => fx(x, 0x29),
            Instruction::SetIToBcdOfReg(x) => fx(x, 0x33),
            Instruction::RegDump(x) => fx(x, 0x55),
            Instruction::RegLoad(x) => fx(x, 0x65),
        }
    }

    fn decode(opcode: BitSplitter) -> Option<Instruction> {
        let instruction = match opcode.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, _, _, _) => Instruction::Goto(Addr(opcode.nnn())),
            (0x2, _, _, _) => Instruction::Call(Addr(opcode.nnn())),
            (0x3, x, _, _) => Instruction::IfRegEqConst(Reg(x), Const(opcode.kk())),
            (0x4, x, _, _) => Instruction::IfRegNeqConst(Reg(x), Const(opcode.kk())),
            (0x5, x, y, 0x0) => Instruction::IfRegEqReg(Reg(x), Reg(y)),
            (0x6, x, _, _) => Instruction::SetRegToConst(Reg(x), Const(opcode.kk())),
            (0x7, x, _, _) => Instruction::IncRegByConst(Reg(x), Const(opcode.kk())),
            (0x8, x, y, 0x0) => Instruction::SetRegToReg(Reg(x), Reg(y)),
            (0x8, x, y, 0x1) => Instruction::BitwiseOr(Reg(x), Reg(y)),
            (0x8, x, y, 0x2) => Instruction::BitwiseAnd(Reg(x), Reg(y)),
            (0x8, x, y, 0x3) => Instruction::BitwiseXor(Reg(x), Reg(y)),
            (0x8, x, y, 0x4) => Instruction::IncRegByReg(Reg(x), Reg(y)),
            (0x8, x, y, 0x5) => Instruction::DecRegByReg(Reg(x), Reg(y)),
            (0x8, x, _, 0x6) => Instruction::BitshiftRight(Reg(x)),
            (0x8, x, y, 0x7) => Instruction::SetVxVyMinusVx(Reg(x), Reg(y)),
            (0x8, x, _, 0xE) => Instruction::BitshiftLeft(Reg(x)),
            (0x9, x, y, 0x0) => Instruction::IfRegNeqReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::SetI(Addr(opcode.nnn())),
            (0xB, _, _, _) => Instruction::SetPcToV0PlusAddr(Addr(opcode.nnn())),
            (0xC, x, _, _) => Instruction::SetVxRand(Reg(x), Const(opcode.kk())),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 0x9, 0xE) => Instruction::IfKeyEqVx(Reg(x)),
            (0xE, x, 0xA, 0x1) => Instruction::IfKeyNeqVx(Reg(x)),
            (0xF, x, 0x0, 0x7) => Instruction::SetRegToDelayTimer(Reg(x)),
            (0xF, x, 0x0, 0xA) => Instruction::SetRegToGetKey(Reg(x)),
            (0xF, x, 0x1, 0x5) => Instruction::SetDelayTimerToReg(Reg(x)),
            (0xF, x, 0x1, 0x8) => Instruction::SetSoundTimerToReg(Reg(x)),
            (0xF, x, 0x1, 0xE) => Instruction::AddRegToI(Reg(x)),
            (0xF, x, 0x2, 0x9) => Instruction::SetIToSpriteAddrVx(Reg(x)),
            (0xF, x, 0x3, 0x3) => Instruction::SetIToBcdOfReg(Reg(x)),
            (0xF, x, 0x5, 0x5) => Instruction::RegDump(Reg(x)),
            (0xF, x, 0x6, 0x5) => Instruction::RegLoad(Reg(x)),
            _ => return None,
        };
        Some(instruction)
    }
}
