use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Duration of the last completed frame, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is the measured wall-clock duration, stalls included.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    last_dt: f32,
}

impl FrameClock {
    /// Creates a clock whose baseline is now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose baseline is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            frame_index: 0,
            last_dt: 0.0,
        }
    }

    /// Resets the clock baseline.
    ///
    /// Used when the loop resumes after a suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Duration of the last completed frame in seconds; `0.0` before the first tick.
    pub fn delta(&self) -> f32 {
        self.last_dt
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.advance(Instant::now())
    }

    /// Advances the clock to `now` and returns the new snapshot.
    pub fn advance(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last);

        self.last = now;
        self.last_dt = dt.as_secs_f32();

        let ft = FrameTime {
            dt: self.last_dt,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn delta_is_zero_before_first_tick() {
        assert_eq!(FrameClock::new().delta(), 0.0);
    }

    #[test]
    fn advance_reports_elapsed_time() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.advance(t0 + Duration::from_millis(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.delta(), ft.dt);
    }

    #[test]
    fn long_stall_is_reported_as_is() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.advance(t0 + Duration::from_secs(5));
        assert!((ft.dt - 5.0).abs() < 1e-6);
        assert_eq!(clock.delta(), ft.dt);
    }

    #[test]
    fn zero_step_reports_zero() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        clock.advance(t0);
        let ft = clock.advance(t0);
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.frame_index, 1);
    }
}
