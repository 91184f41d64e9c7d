use chip8_vm::emulator::input::SharedKeypad;
use chip8_vm::emulator::state::NUM_KEYS;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

// Terminals report presses but no releases, so a key counts as held this long
const HOLD_TIMEOUT: Duration = Duration::from_millis(250);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A struct for managing keypresses that will automatically
/// start a thread that forwards them to a keypad.
pub struct KeyManager {
    stop: Arc<AtomicBool>,
    quit: Arc<AtomicBool>,
    event_listener: Option<JoinHandle<()>>,
}

impl KeyManager {
    // Start event listener thread
    pub fn new(keypad: SharedKeypad) -> KeyManager {
        let stop = Arc::new(AtomicBool::new(false));
        let quit = Arc::new(AtomicBool::new(false));
        let event_listener = event_listener(stop.clone(), quit.clone(), keypad);
        KeyManager {
            stop,
            quit,
            event_listener: Some(event_listener),
        }
    }

    /// Whether Esc or Ctrl-C has been pressed
    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        // Tell the event listener to stop, it notices within one poll interval
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.event_listener.take() {
            let _ = handle.join();
        }
    }
}

/// Map the conventional `1234/qwer/asdf/zxcv` block onto the hex keypad.
pub fn key_to_hex(code: KeyCode) -> Option<u8> {
    let key = match code {
        KeyCode::Char(c) => c.to_ascii_lowercase(),
        _ => return None,
    };
    let hex = match key {
        '1' => 0x1, '2' => 0x2, '3' => 0x3, '4' => 0xC,
        'q' => 0x4, 'w' => 0x5, 'e' => 0x6, 'r' => 0xD,
        'a' => 0x7, 's' => 0x8, 'd' => 0x9, 'f' => 0xE,
        'z' => 0xA, 'x' => 0x0, 'c' => 0xB, 'v' => 0xF,
        _ => return None,
    };
    Some(hex)
}

/// Starts a thread that listens for key events and forwards them to the keypad.
fn event_listener(stop: Arc<AtomicBool>, quit: Arc<AtomicBool>, keypad: SharedKeypad) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut pressed_at: [Option<Instant>; NUM_KEYS] = [None; NUM_KEYS];

        while !stop.load(Ordering::Acquire) {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key_event)) => {
                        log::info!("Got key {:?}", key_event);
                        let ctrl_c = key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(KeyModifiers::CONTROL);
                        if key_event.code == KeyCode::Esc || ctrl_c {
                            quit.store(true, Ordering::Release);
                        } else if let Some(key) = key_to_hex(key_event.code) {
                            keypad.press(key);
                            pressed_at[key as usize] = Some(Instant::now());
                        }
                    }
                    Ok(_) => {}
                    Err(error) => {
                        log::error!("Could not read terminal event: {}", error);
                        quit.store(true, Ordering::Release);
                        break;
                    }
                },
                Ok(false) => {}
                Err(error) => {
                    log::error!("Could not poll terminal events: {}", error);
                    quit.store(true, Ordering::Release);
                    break;
                }
            }

            // Release keys that have not been repeated recently
            for (key, pressed) in pressed_at.iter_mut().enumerate() {
                if let Some(since) = *pressed {
                    if since.elapsed() >= HOLD_TIMEOUT {
                        keypad.release(key as u8);
                        *pressed = None;
                    }
                }
            }
        }
    })
}
