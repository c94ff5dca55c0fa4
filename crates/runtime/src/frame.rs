use foundation::time::Time;

/// Deterministic frame metadata.
///
/// This is the primary timebase for the world runtime. It is intentionally
/// small and pure so it can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time covered by this frame (seconds).
    pub dt_s: f64,
    /// Session time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// Fixed-step frame: time is derived from the index.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

/// Turns host-supplied elapsed time into a sequence of [`Frame`]s.
///
/// Unlike [`Frame::new`] the delta may vary per frame, which is what a host
/// animation callback delivers. Negative or non-finite deltas count as zero.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    next_index: u64,
    time: Time,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt_s: f64) -> Frame {
        let dt_s = if dt_s.is_finite() && dt_s > 0.0 { dt_s } else { 0.0 };
        let frame = Frame {
            index: self.next_index,
            dt_s,
            time: self.time,
        };
        self.next_index += 1;
        self.time = self.time.advance(dt_s);
        frame
    }

    /// The frame that the next [`tick`](Self::tick) will start from, with a
    /// zero delta. Used to stamp events raised between ticks.
    pub fn current(&self) -> Frame {
        Frame {
            index: self.next_index,
            dt_s: 0.0,
            time: self.time,
        }
    }

    pub fn elapsed(&self) -> Time {
        self.time
    }
}
