use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use structopt::StructOpt;

use chip8_vm::emulator::input::SharedKeypad;
use chip8_vm::emulator::{Driver, DriverConfig, Emulator};

mod crossterm_io;
mod key_manager;
use crossterm_io::CrosstermOutput;
use key_manager::KeyManager;

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// Instructions executed per second
    #[structopt(short, long, default_value = "500")]
    speed: u32,

    /// Seed for the random number generator
    #[structopt(long)]
    seed: Option<u64>,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

const FRAME: Duration = Duration::from_millis(1_000 / 120);

fn main() -> Result<(), Box<dyn std::error::Error>> {

    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let mut emulator = match opt.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };
    emulator.load(&program)?;

    let keypad = SharedKeypad::new();
    let key_manager = KeyManager::new(keypad.clone());
    let config = DriverConfig {
        cycles_per_second: opt.speed,
        ..DriverConfig::default()
    };
    let mut driver = Driver::new(emulator, keypad, CrosstermOutput::new()?, config);

    // Start execution
    let mut last = Instant::now();
    while !key_manager.quit_requested() {
        thread::sleep(FRAME);
        let now = Instant::now();
        driver.run_for(now - last)?;
        last = now;
    }

    Ok(())
}
