//! Small helpers shared by the emulator modules.

pub mod bit_splitter;
