//! Per-pair passing cost in the shifted frame.

use serde::Serialize;

use crate::core::speed::{STOP_SHIFTED, SpeedPair};

/// Which lanes a pair ends up in for a given threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaneAssignment {
    /// Both above the threshold.
    BothFast,
    /// One on each side; they never meet.
    Split,
    /// Both below the threshold.
    BothSlow,
}

impl LaneAssignment {
    pub fn classify(pair: &SpeedPair, a: f64) -> Self {
        if a < pair.vmin() {
            LaneAssignment::BothFast
        } else if a > pair.vmax() {
            LaneAssignment::BothSlow
        } else {
            LaneAssignment::Split
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LaneAssignment::BothFast => "both-fast",
            LaneAssignment::Split => "split",
            LaneAssignment::BothSlow => "both-slow",
        }
    }
}

/// Distance lost by the slower vehicle of `(vmin, vmax)` under threshold `a`.
///
/// In the fast lane the slower vehicle drops to the lane floor `a`; in the
/// slow lane the floor is a full stop. `a == vmin` and `a == vmax` count as
/// split lanes. `a` is not range-checked. Speeds passed in the wrong order
/// are swapped first.
#[inline]
pub fn pair_cost(vmin: f64, vmax: f64, a: f64) -> f64 {
    let (vmin, vmax) = if vmin <= vmax { (vmin, vmax) } else { (vmax, vmin) };
    if a < vmin {
        let d = vmin - a;
        d * d
    } else if a > vmax {
        let d = vmin - STOP_SHIFTED;
        d * d
    } else {
        0.0
    }
}

/// [`pair_cost`] on an ordered pair.
#[inline]
pub fn cost_of(pair: &SpeedPair, a: f64) -> f64 {
    pair_cost(pair.vmin(), pair.vmax(), a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::speed::to_shifted;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn split_lanes_cost_nothing() {
        let pair = SpeedPair::from_original(1.8, 1.1);
        let a = to_shifted(1.2);
        assert_eq!(LaneAssignment::classify(&pair, a), LaneAssignment::Split);
        assert_eq!(cost_of(&pair, a), 0.0);
    }

    #[test]
    fn fast_lane_pair_drops_to_threshold() {
        let pair = SpeedPair::from_original(1.8, 1.7);
        let a = to_shifted(1.2);
        assert_eq!(LaneAssignment::classify(&pair, a), LaneAssignment::BothFast);
        assert!(approx(cost_of(&pair, a), 0.25), "got {}", cost_of(&pair, a));
    }

    #[test]
    fn slow_lane_pair_at_floor_loses_one_mile() {
        let pair = SpeedPair::from_original(1.1, 1.0);
        let a = to_shifted(1.5);
        assert_eq!(LaneAssignment::classify(&pair, a), LaneAssignment::BothSlow);
        assert_eq!(cost_of(&pair, a), 1.0);
    }

    #[test]
    fn boundaries_belong_to_split_branch() {
        assert_eq!(pair_cost(0.3, 0.7, 0.3), 0.0);
        assert_eq!(pair_cost(0.3, 0.7, 0.7), 0.0);
    }

    #[test]
    fn cost_vanishes_at_vmin_and_jumps_at_vmax() {
        let (vmin, vmax) = (0.3, 0.7);
        let eps = 1e-9;
        // just below vmin: fast-lane cost already ~0, no jump
        assert!(pair_cost(vmin, vmax, vmin - eps) < 1e-12);
        // just above vmax: full slow-lane cost
        assert!(approx(pair_cost(vmin, vmax, vmax + eps), 1.69));
    }

    #[test]
    fn swapped_arguments_cost_the_same() {
        // 0.8 / 0.1 straddle 0.5: split lanes, no cost in either order
        assert_eq!(pair_cost(0.8, 0.1, 0.5), 0.0);
        assert_eq!(pair_cost(0.8, 0.7, 0.2), pair_cost(0.7, 0.8, 0.2));
        assert_eq!(pair_cost(0.1, 0.0, 0.5), pair_cost(0.0, 0.1, 0.5));
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(LaneAssignment::BothFast.label(), "both-fast");
        assert_eq!(LaneAssignment::BothSlow.label(), "both-slow");
        assert_eq!(LaneAssignment::Split.label(), "split");
    }
}
