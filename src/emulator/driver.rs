//! Pacing for an `Emulator`: instructions and timers each advance at their own
//! rate, derived from the wall-clock time the caller reports.

use super::emulator::Emulator;
use super::error::Fault;
use super::input::EmulatorInput;
use super::output::EmulatorOutput;

use rand::rngs::StdRng;
use rand::RngCore;
use std::time::Duration;

/// How fast the machine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Instructions executed per second.
    pub cycles_per_second: u32,
    /// Timer decrements per second.
    pub timer_hz: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            cycles_per_second: 500,
            timer_hz: 60,
        }
    }
}

/// Work that became due during a call to `Clock::advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticks {
    pub cycles: u32,
    pub timers: u32,
}

/// Accumulates elapsed time and hands it out in whole cycles and timer ticks.
pub struct Clock {
    cycle_period: Duration,
    timer_period: Duration,
    cycle_debt: Duration,
    timer_debt: Duration,
}

// Rates above 1 GHz share the shortest representable period
fn period(hz: u32) -> Duration {
    Duration::from_nanos((1_000_000_000 / hz.max(1) as u64).max(1))
}

/// Take as many whole periods out of `debt` as it holds.
fn drain(debt: &mut Duration, period: Duration) -> u32 {
    let count = (debt.as_nanos() / period.as_nanos()) as u32;
    *debt -= period * count;
    count
}

impl Clock {

    pub fn new(config: &DriverConfig) -> Clock {
        Clock {
            cycle_period: period(config.cycles_per_second),
            timer_period: period(config.timer_hz),
            cycle_debt: Duration::from_secs(0),
            timer_debt: Duration::from_secs(0),
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> Ticks {
        self.cycle_debt += elapsed;
        self.timer_debt += elapsed;
        Ticks {
            cycles: drain(&mut self.cycle_debt, self.cycle_period),
            timers: drain(&mut self.timer_debt, self.timer_period),
        }
    }
}

/// Connects an emulator to an input and an output device and runs it in real time.
pub struct Driver<I: EmulatorInput, O: EmulatorOutput, R: RngCore = StdRng> {
    emulator: Emulator<R>,
    input: I,
    output: O,
    clock: Clock,
    tone: bool,
}

impl<I: EmulatorInput, O: EmulatorOutput, R: RngCore> Driver<I, O, R> {

    pub fn new(emulator: Emulator<R>, input: I, output: O, config: DriverConfig) -> Driver<I, O, R> {
        log::info!(
            "Running at {} instructions and {} timer ticks per second",
            config.cycles_per_second,
            config.timer_hz
        );
        Driver {
            emulator,
            input,
            output,
            clock: Clock::new(&config),
            tone: false,
        }
    }

    pub fn emulator(&self) -> &Emulator<R> {
        &self.emulator
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Run everything that became due in `elapsed`.
    /// The keypad is read once up front and the screen is presented at most once.
    pub fn run_for(&mut self, elapsed: Duration) -> Result<Ticks, Fault> {
        let ticks = self.clock.advance(elapsed);

        self.emulator.set_keypad(self.input.keypad());

        for _ in 0..ticks.cycles {
            self.emulator.step()?;
        }

        for _ in 0..ticks.timers {
            if self.emulator.tick_timers() {
                log::debug!("Beep");
            }
        }

        let tone = self.emulator.sound_active();
        if tone != self.tone {
            self.tone = tone;
            self.output.set_tone(tone);
        }

        if self.emulator.take_redraw() {
            self.output.present(self.emulator.framebuffer());
        }

        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::emulator::input::{DummyInput, SharedKeypad};
    use crate::emulator::output::DummyOutput;
    use pretty_assertions::assert_eq;

    fn config() -> DriverConfig {
        DriverConfig {
            cycles_per_second: 600,
            timer_hz: 60,
        }
    }

    fn driver_for<I: EmulatorInput>(program: &[u8], input: I) -> Driver<I, DummyOutput> {
        let mut emulator = Emulator::with_seed(1);
        emulator.load(program).unwrap();
        Driver::new(emulator, input, DummyOutput::new(), config())
    }

    #[test]
    fn clock_keeps_the_remainder() {
        let mut clock = Clock::new(&config());
        assert_eq!(clock.advance(Duration::from_millis(10)), Ticks { cycles: 6, timers: 0 });
        assert_eq!(clock.advance(Duration::from_millis(10)), Ticks { cycles: 6, timers: 1 });
        assert_eq!(clock.advance(Duration::from_millis(1)), Ticks { cycles: 0, timers: 0 });
    }

    #[test]
    fn timers_do_not_depend_on_instruction_rate() {
        let mut fast = Clock::new(&DriverConfig { cycles_per_second: 10_000, timer_hz: 60 });
        let mut slow = Clock::new(&DriverConfig { cycles_per_second: 100, timer_hz: 60 });
        let second = Duration::from_secs(1);
        assert_eq!(fast.advance(second).timers, 60);
        assert_eq!(slow.advance(second).timers, 60);
    }

    #[test]
    fn extreme_rates_do_not_panic() {
        let mut clock = Clock::new(&DriverConfig { cycles_per_second: u32::MAX, timer_hz: 0 });
        assert_eq!(
            clock.advance(Duration::from_micros(1)),
            Ticks { cycles: 1_000, timers: 0 }
        );
    }

    #[test]
    fn frames_are_presented_only_after_drawing() {
        let mut driver = driver_for(&[
            0x12, 0x00, // loop forever
        ], DummyInput);
        driver.run_for(Duration::from_millis(100)).unwrap();
        assert_eq!(driver.output().frames_presented, 0);

        let mut driver = driver_for(&[
            0xA0, 0x00, // I = glyph 0
            0xD0, 0x15, // draw it at (0, 0)
            0x12, 0x04, // loop forever
        ], DummyInput);
        driver.run_for(Duration::from_millis(100)).unwrap();
        assert_eq!(driver.output().frames_presented, 1);
        let frame = driver.output().last_frame.as_ref().unwrap();
        assert_eq!(&frame[..4], &[1, 1, 1, 1]);
    }

    #[test]
    fn tone_follows_sound_timer() {
        let mut driver = driver_for(&[
            0x60, 0x02, // V0 = 2
            0xF0, 0x18, // sound timer = V0
            0x12, 0x04, // loop forever
        ], DummyInput);
        // 5 cycles and no timer tick yet
        driver.run_for(Duration::from_micros(8_400)).unwrap();
        assert!(driver.output().tone);
        // Two timer ticks later the tone stops
        driver.run_for(Duration::from_millis(34)).unwrap();
        assert!(!driver.output().tone);
        assert_eq!(driver.output().tone_changes, 2);
    }

    #[test]
    fn keys_reach_the_emulator() {
        let keypad = SharedKeypad::new();
        let mut driver = driver_for(&[
            0xF5, 0x0A, // V5 = key
            0x12, 0x02, // loop forever
        ], keypad.clone());
        driver.run_for(Duration::from_millis(10)).unwrap();
        assert!(driver.emulator().is_waiting_for_key());

        keypad.press(0x7);
        driver.run_for(Duration::from_millis(10)).unwrap();
        assert!(!driver.emulator().is_waiting_for_key());
        assert_eq!(driver.emulator().state().registers[5], 0x7);
    }

    #[test]
    fn faults_are_passed_on() {
        let mut driver = driver_for(&[0xFF, 0xFF], DummyInput);
        assert_eq!(
            driver.run_for(Duration::from_millis(10)),
            Err(Fault::Decode { addr: 0x200, word: 0xFFFF })
        );
    }
}
