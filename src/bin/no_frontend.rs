use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use chip8_vm::emulator::input::DummyInput;
use chip8_vm::emulator::output::DummyOutput;
use chip8_vm::emulator::{Driver, DriverConfig, Emulator};

/// Run a program without any display or keyboard, then print the final screen.
#[derive(StructOpt)]
struct Opt {
    /// Instructions executed per second of simulated time
    #[structopt(short, long, default_value = "500")]
    speed: u32,

    /// Stop after this many instructions
    #[structopt(short, long, default_value = "10000")]
    max_cycles: u64,

    /// Seed for the random number generator
    #[structopt(long)]
    seed: Option<u64>,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

// One simulated frame per iteration
const FRAME: Duration = Duration::from_micros(16_667);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    // Load instructions into emulator memory
    let mut emulator = match opt.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };
    emulator.load(&program)?;

    let config = DriverConfig {
        cycles_per_second: opt.speed,
        ..DriverConfig::default()
    };
    let mut driver = Driver::new(emulator, DummyInput, DummyOutput::new(), config);

    // Start execution
    let mut executed = 0;
    while executed < opt.max_cycles {
        let ticks = match driver.run_for(FRAME) {
            Ok(ticks) => ticks,
            Err(fault) => {
                // Show what the program managed to draw before it stopped
                print!("{}", driver.emulator().state());
                eprintln!("Halted at {:#05x}", fault.addr());
                return Err(fault.into());
            }
        };
        executed += ticks.cycles as u64;

        if driver.emulator().is_waiting_for_key() {
            log::warn!("Program waits for a key, but there is no keyboard");
            break;
        }
    }

    log::info!(
        "Stopped after {} instructions at {:#05x}",
        executed,
        driver.emulator().state().program_counter
    );
    print!("{}", driver.emulator().state());
    Ok(())
}
