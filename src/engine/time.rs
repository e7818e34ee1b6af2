/// Simulated game clock in milliseconds.
///
/// The simulation never reads wall-clock time: the driver advances the clock
/// by a fixed step each frame and every date handed to the hero comes from
/// here, which keeps runs reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTimer {
    now: u32,
    pub dt: u32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt: u32) {
        self.dt = dt;
        self.now = self.now.saturating_add(dt);
    }

    pub fn now(&self) -> u32 {
        self.now
    }
}
