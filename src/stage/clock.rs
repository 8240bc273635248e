//! Fixed-rate frame pacing.

use std::thread;
use std::time::{Duration, Instant};

pub struct FrameClock {
    frame_duration: Duration,
    frame_start: Instant,
    frames: u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        FrameClock {
            frame_duration: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            frame_start: Instant::now(),
            frames: 0,
        }
    }

    /// Sleep out the rest of the current frame and start the next one.
    /// Frames that ran long are not made up for.
    pub fn tick(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_duration {
            thread::sleep(self.frame_duration - elapsed);
        }
        self.frame_start = Instant::now();
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_waits_for_the_frame_interval() {
        let mut clock = FrameClock::new(100);
        let start = Instant::now();
        clock.tick();
        clock.tick();
        assert!(start.elapsed() >= Duration::from_millis(18));
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn zero_fps_is_clamped() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.frame_duration, Duration::from_secs(1));
    }
}
