/// Elapsed session time in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Self = Self(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn advance(self, dt_s: f64) -> Self {
        Self(self.0 + dt_s)
    }
}
