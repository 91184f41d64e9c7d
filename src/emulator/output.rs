use super::state::Framebuffer;

/// Represents an output device that shows frames and plays a tone.
pub trait EmulatorOutput {
    /// Show a new frame. Only called when the screen changed.
    fn present(&mut self, framebuffer: &Framebuffer);

    /// Start or stop the tone. Only called when the state changes.
    fn set_tone(&mut self, on: bool);
}

/// A simple output device that keeps the last frame and counts what it was given.
pub struct DummyOutput {
    pub frames_presented: usize,
    pub last_frame: Option<Vec<u8>>,
    pub tone: bool,
    pub tone_changes: usize,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput {
            frames_presented: 0,
            last_frame: None,
            tone: false,
            tone_changes: 0,
        }
    }
}

impl Default for DummyOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatorOutput for DummyOutput {
    fn present(&mut self, framebuffer: &Framebuffer) {
        self.frames_presented += 1;
        self.last_frame = Some(framebuffer.to_vec());
    }

    fn set_tone(&mut self, on: bool) {
        self.tone = on;
        self.tone_changes += 1;
    }
}
