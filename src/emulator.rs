//! The CHIP-8 virtual machine as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

pub mod driver;
pub mod emulator;
pub mod error;
pub mod input;
pub mod instruction;
pub mod output;
pub mod state;

pub use self::driver::{Driver, DriverConfig};
pub use self::emulator::Emulator;
pub use self::error::{Fault, LoadError};
pub use self::state::VmState;
