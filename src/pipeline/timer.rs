use std::time::{Duration, Instant};

use crate::foundation::core::Fps;
use crate::foundation::error::{PlasmaError, PlasmaResult};

/// Effect clock: wall time scaled by a speed multiplier, with pause and a fixed-step mode
/// for offline rendering.
#[derive(Clone, Debug)]
pub struct AnimationTimer {
    time: f64,
    speed: f64,
    paused: bool,
    last_tick: Option<Instant>,
}

impl Default for AnimationTimer {
    fn default() -> Self {
        Self {
            time: 0.0,
            speed: 1.0,
            paused: false,
            last_tick: None,
        }
    }
}

impl AnimationTimer {
    pub fn new(speed: f64) -> PlasmaResult<Self> {
        let mut t = Self::default();
        t.set_speed(speed)?;
        Ok(t)
    }

    /// Effect time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) -> PlasmaResult<()> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(PlasmaError::config(format!(
                "speed must be finite and non-negative, got {speed}"
            )));
        }
        self.speed = speed;
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.last_tick = None;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance by the wall time elapsed since the previous call. The first call after
    /// construction or resume only starts the clock.
    pub fn update(&mut self) -> f64 {
        self.update_at(Instant::now())
    }

    pub(crate) fn update_at(&mut self, now: Instant) -> f64 {
        if self.paused {
            return self.time;
        }
        if let Some(last) = self.last_tick {
            self.advance(now.saturating_duration_since(last));
        }
        self.last_tick = Some(now);
        self.time
    }

    /// Advance by exactly `dt` of wall time (scaled by speed); ignored while paused.
    pub fn step(&mut self, dt: Duration) -> f64 {
        if !self.paused {
            self.advance(dt);
        }
        self.time
    }

    /// Advance by one frame at `fps`.
    pub fn step_frame(&mut self, fps: Fps) -> f64 {
        self.step(Duration::from_secs_f64(fps.frame_duration_secs()))
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
        self.last_tick = None;
    }

    fn advance(&mut self, dt: Duration) {
        self.time += dt.as_secs_f64() * self.speed;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/timer.rs"]
mod tests;
