//! core/speed.rs — speed units and the shifted frame.
//!
//! Speeds are drawn in original units on [1, 2]. Subtracting 1 (a Galilean
//! shift) maps them to [0, 1], where a full stop sits at -1.
//! Example: 1.8 → 0.8, 1.0 → 0.0, stop (0.0) → -1.0.

/// Lower edge of the original speed range.
pub const SPEED_MIN: f64 = 1.0;
/// Upper edge of the original speed range.
pub const SPEED_MAX: f64 = 2.0;
/// Stop condition expressed in the shifted frame.
pub const STOP_SHIFTED: f64 = -1.0;

/// Original units → shifted frame.
#[inline]
pub fn to_shifted(v: f64) -> f64 {
    v - SPEED_MIN
}

/// Shifted frame → original units.
#[inline]
pub fn to_original(v: f64) -> f64 {
    v + SPEED_MIN
}

/// Two speeds in the shifted frame, stored ordered.
///
/// `vmin <= vmax` always holds; build with [`SpeedPair::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedPair {
    vmin: f64,
    vmax: f64,
}

impl SpeedPair {
    /// Order two shifted-frame speeds.
    pub fn new(v1: f64, v2: f64) -> Self {
        Self {
            vmin: v1.min(v2),
            vmax: v1.max(v2),
        }
    }

    /// Build from speeds in original units.
    pub fn from_original(v1: f64, v2: f64) -> Self {
        Self::new(to_shifted(v1), to_shifted(v2))
    }

    #[inline]
    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    #[inline]
    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    #[inline]
    pub fn spread(&self) -> f64 {
        self.vmax - self.vmin
    }
}
