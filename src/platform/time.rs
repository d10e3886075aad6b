//! Frame timing
//!
//! The limiter is the only place the outer loop blocks.

use std::time::{Duration, Instant};

/// Longest frame fed to the simulation (ms); stalls are not replayed
pub const MAX_FRAME_MS: f32 = 100.0;

/// Fixed-rate frame limiter
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    frame: Duration,
    last: Instant,
}

impl FrameLimiter {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs(1) / fps.max(1),
            last: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Time left in the current frame after `elapsed` of work
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.frame.checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    /// Sleep out the rest of the frame and return the frame's length in ms,
    /// capped at `MAX_FRAME_MS`
    pub fn wait(&mut self) -> f32 {
        if let Some(rest) = self.remaining(self.last.elapsed()) {
            std::thread::sleep(rest);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        (dt.as_secs_f32() * 1000.0).min(MAX_FRAME_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining() {
        let limiter = FrameLimiter::new(60);
        assert_eq!(limiter.frame_duration(), Duration::from_secs(1) / 60);
        let rest = limiter.remaining(Duration::from_millis(10)).unwrap();
        assert!(rest < Duration::from_millis(7) && rest > Duration::from_millis(6));
        assert_eq!(limiter.remaining(Duration::from_millis(20)), None);
    }

    #[test]
    fn test_wait_paces_frames() {
        let mut limiter = FrameLimiter::new(200);
        let dt = limiter.wait();
        assert!(dt >= 4.0, "frame took {dt} ms");
        assert!(dt <= MAX_FRAME_MS);
    }
}
