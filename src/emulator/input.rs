use super::state::{Keypad, NUM_KEYS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Represents an input device that reports which of the keys 0..=0xF are held.
pub trait EmulatorInput {
    fn keypad(&self) -> Keypad;
}

/// An input device that never provides any input
pub struct DummyInput;

impl EmulatorInput for DummyInput {
    fn keypad(&self) -> Keypad {
        [false; NUM_KEYS]
    }
}

/// A keypad that can be written from one thread and read from another.
/// Clones share the same keys.
#[derive(Clone, Default)]
pub struct SharedKeypad {
    keys: Arc<[AtomicBool; NUM_KEYS]>,
}

impl SharedKeypad {

    pub fn new() -> SharedKeypad {
        SharedKeypad::default()
    }

    /// Mark a key as held. Keys above 0xF are ignored.
    pub fn press(&self, key: u8) {
        if let Some(slot) = self.keys.get(key as usize) {
            slot.store(true, Ordering::Release);
        }
    }

    pub fn release(&self, key: u8) {
        if let Some(slot) = self.keys.get(key as usize) {
            slot.store(false, Ordering::Release);
        }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys
            .get(key as usize)
            .map_or(false, |slot| slot.load(Ordering::Acquire))
    }

    /// Copy out the current state of every key.
    pub fn snapshot(&self) -> Keypad {
        let mut keypad = [false; NUM_KEYS];
        for (held, slot) in keypad.iter_mut().zip(self.keys.iter()) {
            *held = slot.load(Ordering::Acquire);
        }
        keypad
    }
}

impl EmulatorInput for SharedKeypad {
    fn keypad(&self) -> Keypad {
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::thread;

    #[test]
    fn press_and_release() {
        let keypad = SharedKeypad::new();
        keypad.press(0xA);
        assert!(keypad.is_pressed(0xA));
        assert!(!keypad.is_pressed(0xB));
        keypad.release(0xA);
        assert!(!keypad.is_pressed(0xA));
    }

    #[test]
    fn out_of_range_keys_are_ignored() {
        let keypad = SharedKeypad::new();
        keypad.press(0x10);
        assert!(!keypad.is_pressed(0x10));
        assert_eq!(keypad.snapshot(), [false; NUM_KEYS]);
    }

    #[test]
    fn presses_from_another_thread_are_visible() {
        let keypad = SharedKeypad::new();
        let producer_keypad = keypad.clone();

        let producer = thread::spawn(move || {
            producer_keypad.press(0x3);
            producer_keypad.press(0xF);
        });
        producer.join().unwrap(); // Ensure the presses have been done

        let snapshot = keypad.keypad();
        assert!(snapshot[0x3]);
        assert!(snapshot[0xF]);
        assert_eq!(snapshot.iter().filter(|held| **held).count(), 2);
    }

    #[test]
    fn dummy_input_has_no_keys() {
        assert_eq!(DummyInput.keypad(), [false; NUM_KEYS]);
    }
}
