//! Bouncing tank values for Demo mode.
//!
//! Both tanks ping-pong between 0 and 100 by a fixed step. Tank 1 starts at
//! 50% rising and tank 2 at 100% falling, so the bars visibly diverge. The
//! generator is rate-limited: calls between steps return the cached pair.

use crate::config::DemoConfig;

/// One bouncing value.
#[derive(Clone, Copy, PartialEq, Debug)]
struct Bouncer {
    value: f32,
    direction: f32,
}

impl Bouncer {
    const fn new(
        value: f32,
        direction: f32,
    ) -> Self {
        Self { value, direction }
    }

    fn step(
        &mut self,
        amount: f32,
    ) {
        self.value += amount * self.direction;
        if self.value >= 100.0 {
            self.value = 100.0;
            self.direction = -1.0;
        } else if self.value <= 0.0 {
            self.value = 0.0;
            self.direction = 1.0;
        }
    }
}

/// Demo value generator.
pub struct DemoGenerator {
    config: DemoConfig,
    tanks: [Bouncer; 2],
    last_update_ms: u64,
}

impl DemoGenerator {
    pub const fn new(config: DemoConfig) -> Self {
        Self {
            tanks: Self::start_state(&config),
            config,
            last_update_ms: 0,
        }
    }

    const fn start_state(config: &DemoConfig) -> [Bouncer; 2] {
        [Bouncer::new(config.start[0], 1.0), Bouncer::new(config.start[1], -1.0)]
    }

    /// Restore the start values and directions. The next step happens one
    /// interval after `now_ms`.
    pub fn reset(
        &mut self,
        now_ms: u64,
    ) {
        self.tanks = Self::start_state(&self.config);
        self.last_update_ms = now_ms;
    }

    /// Advance if the interval has elapsed, then return both tank values.
    pub fn update(
        &mut self,
        now_ms: u64,
    ) -> (f32, f32) {
        if now_ms.saturating_sub(self.last_update_ms) >= self.config.interval_ms {
            self.last_update_ms = now_ms;
            for tank in &mut self.tanks {
                tank.step(self.config.step);
            }
        }
        self.values()
    }

    /// Current pair without advancing.
    #[inline]
    pub const fn values(&self) -> (f32, f32) { (self.tanks[0].value, self.tanks[1].value) }
}
