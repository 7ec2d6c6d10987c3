//! Inverse and forward kinematics
//!
//! The solver is a pure function of the target and the geometry. Each arm
//! forms a triangle (proximal link, distal link, base-to-target distance);
//! the law of cosines gives the interior angle at the motor, which is then
//! added to (arm A) or subtracted from (arm B) the polar angle of the
//! target. This is the "elbows out" assembly mode.

use super::frame::Frame;
use super::geometry::LinkGeometry;
use core::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How far an `acos` argument may overshoot [-1, 1] and still be clamped
pub const ACOS_TOLERANCE: f64 = 1e-9;

/// Law-of-cosines argument outside the domain of `acos`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NumericDomainError;

/// Reasons a target cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unreachable {
    /// Target Y is below the minimum baseline clearance
    BelowBaseline,
    /// Target is at or beyond the stretched reach of arm A
    BeyondReachA,
    /// Target is at or beyond the stretched reach of arm B
    BeyondReachB,
    /// Target is at or inside the folded reach of arm A
    InsideReachA,
    /// Target is at or inside the folded reach of arm B
    InsideReachB,
    /// Target is inside the configured dead zone around the origin
    DeadZone,
    /// Non-finite input or law-of-cosines domain error
    NumericDomain,
}

impl From<NumericDomainError> for Unreachable {
    fn from(_: NumericDomainError) -> Self {
        Unreachable::NumericDomain
    }
}

/// Joint selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Joint {
    /// Arm A motor (theta)
    #[default]
    A,
    /// Arm B motor (phi)
    B,
}

/// Side of the elbow-A to elbow-B line the tool tip sits on
///
/// Two tip positions are consistent with any pair of motor angles; this
/// records which one the solve produced so forward kinematics can
/// reproduce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TipBranch {
    /// Counter-clockwise of the directed elbow line
    Left,
    /// Clockwise of the directed elbow line
    Right,
}

/// Commandable joint angles in radians, each wrapped into (-π, π]
///
/// Only [`solve`] constructs these, so every value is a reachable pose.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JointAngles {
    theta: f64,
    phi: f64,
    branch: TipBranch,
}

impl JointAngles {
    /// Arm A motor angle
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Arm B motor angle
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Angle for the given joint
    pub fn get(&self, joint: Joint) -> f64 {
        match joint {
            Joint::A => self.theta,
            Joint::B => self.phi,
        }
    }

    /// Tip side of the elbow line for this pose
    pub fn branch(&self) -> TipBranch {
        self.branch
    }
}

/// Interior angle opposite side `c` of a triangle with sides `a`, `b`, `c`
///
/// Arguments that overshoot [-1, 1] by at most [`ACOS_TOLERANCE`] are
/// clamped; anything further out (or non-finite) is an error.
pub fn cosine_law(a: f64, b: f64, c: f64) -> Result<f64, NumericDomainError> {
    let arg = (a * a + b * b - c * c) / (2.0 * a * b);
    if !arg.is_finite() {
        return Err(NumericDomainError);
    }
    if arg > 1.0 + ACOS_TOLERANCE || arg < -1.0 - ACOS_TOLERANCE {
        return Err(NumericDomainError);
    }
    Ok(libm::acos(arg.clamp(-1.0, 1.0)))
}

/// Wrap an angle into (-π, π]
pub fn wrap_angle(angle: f64) -> f64 {
    let mut shifted = libm::fmod(angle + PI, TAU);
    if shifted <= 0.0 {
        shifted += TAU;
    }
    shifted - PI
}

/// Solve joint angles for a target in the arm frame
///
/// Both angles come back wrapped into (-π, π], the same range the actuator
/// goal limits are expressed in.
pub fn solve(x: f64, y: f64, geometry: &LinkGeometry) -> Result<JointAngles, Unreachable> {
    if !x.is_finite() || !y.is_finite() {
        return Err(Unreachable::NumericDomain);
    }

    if y < geometry.min_clearance_mm() {
        return Err(Unreachable::BelowBaseline);
    }

    let arm_a = geometry.arm_a();
    let arm_b = geometry.arm_b();
    let bx = x - geometry.base_offset_mm();

    let s1 = libm::sqrt(x * x + y * y);
    let s2 = libm::sqrt(bx * bx + y * y);

    if s1 >= arm_a.max_reach_mm() {
        return Err(Unreachable::BeyondReachA);
    }
    if s2 >= arm_b.max_reach_mm() {
        return Err(Unreachable::BeyondReachB);
    }
    if s1 < geometry.dead_zone_radius_mm() {
        return Err(Unreachable::DeadZone);
    }
    if s1 <= arm_a.min_reach_mm() {
        return Err(Unreachable::InsideReachA);
    }
    if s2 <= arm_b.min_reach_mm() {
        return Err(Unreachable::InsideReachB);
    }

    let inner_a = cosine_law(arm_a.proximal_mm(), s1, arm_a.distal_mm())?;
    let inner_b = cosine_law(arm_b.proximal_mm(), s2, arm_b.distal_mm())?;

    let theta = wrap_angle(libm::atan2(y, x) + inner_a);
    let phi = wrap_angle(libm::atan2(y, bx) - inner_b);

    let ((ax, ay), (bx_e, by_e)) = elbows(theta, phi, geometry);
    let cross = (bx_e - ax) * (y - ay) - (by_e - ay) * (x - ax);
    let branch = if cross >= 0.0 {
        TipBranch::Left
    } else {
        TipBranch::Right
    };

    Ok(JointAngles { theta, phi, branch })
}

/// Solve joint angles for a target given in bed coordinates
pub fn solve_bed(
    x_bed: f64,
    y_bed: f64,
    frame: &Frame,
    geometry: &LinkGeometry,
) -> Result<JointAngles, Unreachable> {
    let (x, y) = frame.to_arm(x_bed, y_bed);
    solve(x, y, geometry)
}

/// Elbow positions `(arm A, arm B)` for a pose
pub fn elbow_positions(angles: &JointAngles, geometry: &LinkGeometry) -> ((f64, f64), (f64, f64)) {
    elbows(angles.theta, angles.phi, geometry)
}

fn elbows(theta: f64, phi: f64, geometry: &LinkGeometry) -> ((f64, f64), (f64, f64)) {
    let pa = geometry.arm_a().proximal_mm();
    let pb = geometry.arm_b().proximal_mm();
    (
        (pa * libm::cos(theta), pa * libm::sin(theta)),
        (
            geometry.base_offset_mm() + pb * libm::cos(phi),
            pb * libm::sin(phi),
        ),
    )
}

/// Tool-tip position for a pose
///
/// Intersects the two distal-link circles around the elbows and picks the
/// intersection on the [`TipBranch`] recorded by [`solve`], so the branch
/// is never re-derived from the angles. Returns `None` if the circles do
/// not meet.
pub fn forward(angles: &JointAngles, geometry: &LinkGeometry) -> Option<(f64, f64)> {
    let ((ax, ay), (bx, by)) = elbow_positions(angles, geometry);
    let r1 = geometry.arm_a().distal_mm();
    let r2 = geometry.arm_b().distal_mm();

    let dx = bx - ax;
    let dy = by - ay;
    let d = libm::sqrt(dx * dx + dy * dy);
    if d <= 0.0 || !d.is_finite() {
        return None;
    }

    // Distance from elbow A to the chord midpoint along the elbow line
    let along = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h_sq = r1 * r1 - along * along;
    if h_sq < -ACOS_TOLERANCE * r1 * r1 {
        return None;
    }
    let h = libm::sqrt(h_sq.max(0.0));

    let mx = ax + along * dx / d;
    let my = ay + along * dy / d;
    let (ox, oy) = (-dy / d * h, dx / d * h);

    Some(match angles.branch {
        TipBranch::Left => (mx + ox, my + oy),
        TipBranch::Right => (mx - ox, my - oy),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameConfig;
    use crate::kinematics::ArmLinks;
    use proptest::prelude::*;

    const TOL_MM: f64 = 1e-3;

    fn scenario() -> LinkGeometry {
        LinkGeometry::symmetric(80.0, 100.0, 50.0, 5.0).unwrap()
    }

    fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        libm::sqrt((a.0 - b.0) * (a.0 - b.0) + (a.1 - b.1) * (a.1 - b.1))
    }

    #[test]
    fn test_cosine_law_right_triangle() {
        // 3-4-5 triangle: angle opposite the hypotenuse is 90°
        let angle = cosine_law(3.0, 4.0, 5.0).unwrap();
        assert!(libm::fabs(angle - core::f64::consts::FRAC_PI_2) < 1e-12);
    }

    #[test]
    fn test_cosine_law_flat_triangle() {
        // Fully folded arm: argument is exactly 1
        assert_eq!(cosine_law(80.0, 100.0, 20.0), Ok(0.0));
        // Fully stretched arm: argument is exactly -1
        let angle = cosine_law(80.0, 100.0, 180.0).unwrap();
        assert!(libm::fabs(angle - core::f64::consts::PI) < 1e-12);
    }

    #[test]
    fn test_cosine_law_clamps_rounding_overshoot() {
        // Third side a hair shorter than a fully folded arm allows
        let angle = cosine_law(80.0, 100.0, 20.0 - 1e-10).unwrap();
        assert_eq!(angle, 0.0);
        assert_eq!(
            cosine_law(80.0, 100.0, 20.0 - 1e-3),
            Err(NumericDomainError)
        );
    }

    #[test]
    fn test_cosine_law_rejects_impossible_triangle() {
        assert_eq!(cosine_law(1.0, 1.0, 3.0), Err(NumericDomainError));
        assert_eq!(cosine_law(1.0, 1.0, f64::NAN), Err(NumericDomainError));
        assert_eq!(cosine_law(0.0, 1.0, 1.0), Err(NumericDomainError));
    }

    #[test]
    fn test_scenario_target() {
        let geometry = scenario();
        let angles = solve(60.0, 40.0, &geometry).unwrap();

        assert!(libm::fabs(angles.theta() - 2.019_675_5) < 1e-6);
        assert!(libm::fabs(angles.phi() - -0.537_127_9) < 1e-6);
        assert_eq!(angles.get(Joint::A), angles.theta());
        assert_eq!(angles.get(Joint::B), angles.phi());

        let tip = forward(&angles, &geometry).unwrap();
        assert!(distance(tip, (60.0, 40.0)) < TOL_MM);
    }

    #[test]
    fn test_below_baseline_rejected() {
        let geometry = scenario();
        assert_eq!(solve(0.0, 4.0, &geometry), Err(Unreachable::BelowBaseline));
        assert_eq!(solve(60.0, -40.0, &geometry), Err(Unreachable::BelowBaseline));
        // Distance is irrelevant below the baseline
        assert_eq!(solve(25.0, 4.999, &geometry), Err(Unreachable::BelowBaseline));
        assert_eq!(
            solve(1000.0, 4.999, &geometry),
            Err(Unreachable::BelowBaseline)
        );
        // The clearance itself is allowed
        assert!(solve(25.0, 5.0, &geometry).is_ok());
    }

    #[test]
    fn test_reach_boundary_arm_a() {
        let geometry = scenario();
        // 108² + 144² = 180² exactly; arm B is well within reach there
        assert_eq!(solve(108.0, 144.0, &geometry), Err(Unreachable::BeyondReachA));

        let angles = solve(108.0, 144.0 - 1e-6, &geometry).unwrap();
        let tip = forward(&angles, &geometry).unwrap();
        assert!(distance(tip, (108.0, 144.0 - 1e-6)) < TOL_MM);
    }

    #[test]
    fn test_reach_boundary_arm_b() {
        let geometry = scenario();
        // Mirror of the arm A case around x = base_offset
        assert_eq!(
            solve(50.0 - 108.0, 144.0, &geometry),
            Err(Unreachable::BeyondReachB)
        );
        assert!(solve(50.0 - 108.0, 144.0 - 1e-6, &geometry).is_ok());
    }

    #[test]
    fn test_inner_reach_rejected() {
        let geometry = scenario();
        // Folded reach is 20 mm
        assert_eq!(solve(0.0, 20.0, &geometry), Err(Unreachable::InsideReachA));
        assert_eq!(solve(50.0, 19.0, &geometry), Err(Unreachable::InsideReachB));
    }

    #[test]
    fn test_dead_zone_rejected() {
        let geometry = scenario().with_dead_zone(40.0).unwrap();
        assert_eq!(solve(0.0, 30.0, &geometry), Err(Unreachable::DeadZone));
        assert!(solve(60.0, 40.0, &geometry).is_ok());
    }

    #[test]
    fn test_non_finite_target_rejected() {
        let geometry = scenario();
        assert_eq!(solve(f64::NAN, 40.0, &geometry), Err(Unreachable::NumericDomain));
        assert_eq!(
            solve(60.0, f64::INFINITY, &geometry),
            Err(Unreachable::NumericDomain)
        );
    }

    #[test]
    fn test_elbows_match_link_lengths() {
        let geometry = scenario();
        let angles = solve(-30.0, 120.0, &geometry).unwrap();
        let (ea, eb) = elbow_positions(&angles, &geometry);

        assert!(libm::fabs(distance(ea, (0.0, 0.0)) - 80.0) < 1e-9);
        assert!(libm::fabs(distance(eb, (50.0, 0.0)) - 80.0) < 1e-9);
        assert!(libm::fabs(distance(ea, (-30.0, 120.0)) - 100.0) < TOL_MM);
        assert!(libm::fabs(distance(eb, (-30.0, 120.0)) - 100.0) < TOL_MM);
    }

    #[test]
    fn test_near_baseline_between_bases_round_trips() {
        // Region where both tip candidates are consistent with the elbow poses
        let geometry = scenario();
        for &(x, y) in &[(25.0, 6.0), (30.0, 10.0), (20.0, 18.0)] {
            let angles = solve(x, y, &geometry).unwrap();
            let tip = forward(&angles, &geometry).unwrap();
            assert!(distance(tip, (x, y)) < TOL_MM, "({}, {}) -> {:?}", x, y, tip);
        }
    }

    #[test]
    fn test_solve_bed_applies_frame() {
        let geometry = scenario();
        let frame = Frame::from(&FrameConfig {
            offset_x_mm: 10.0,
            offset_y_mm: -20.0,
            mirror_y: false,
        });

        let direct = solve(60.0, 40.0, &geometry).unwrap();
        let bed = solve_bed(70.0, 20.0, &frame, &geometry).unwrap();
        assert_eq!(direct, bed);
    }

    #[test]
    fn test_asymmetric_arms_round_trip() {
        let arm_a = ArmLinks::new(70.0, 110.0).unwrap();
        let arm_b = ArmLinks::new(90.0, 95.0).unwrap();
        let geometry = LinkGeometry::new(arm_a, arm_b, 60.0, 5.0).unwrap();

        let angles = solve(40.0, 90.0, &geometry).unwrap();
        let tip = forward(&angles, &geometry).unwrap();
        assert!(distance(tip, (40.0, 90.0)) < TOL_MM);
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(libm::fabs(wrap_angle(PI) - PI) < 1e-12);
        assert!(libm::fabs(wrap_angle(-PI) - PI) < 1e-12);
        assert!(libm::fabs(wrap_angle(3.0 * PI / 2.0) + PI / 2.0) < 1e-12);
        assert!(libm::fabs(wrap_angle(-5.0 * PI / 2.0) + PI / 2.0) < 1e-12);
    }

    #[test]
    fn test_far_left_target_theta_wrapped() {
        // Raw theta here is atan2 + interior angle, about 3.61 rad
        let geometry = scenario();
        let angles = solve(-100.0, 60.0, &geometry).unwrap();

        assert!(angles.theta() > -PI && angles.theta() <= PI);
        assert!(libm::fabs(angles.theta() - (3.606_356_9 - TAU)) < 1e-3);
        assert!(angles.phi() > -PI && angles.phi() <= PI);

        let tip = forward(&angles, &geometry).unwrap();
        assert!(distance(tip, (-100.0, 60.0)) < TOL_MM);
    }

    proptest! {
        #[test]
        fn prop_reachable_targets_round_trip(x in -200.0f64..250.0, y in 0.0f64..200.0) {
            let geometry = scenario();
            if let Ok(angles) = solve(x, y, &geometry) {
                prop_assert!(angles.theta().is_finite());
                prop_assert!(angles.phi().is_finite());
                prop_assert!(angles.theta() > -PI && angles.theta() <= PI);
                prop_assert!(angles.phi() > -PI && angles.phi() <= PI);
                let tip = forward(&angles, &geometry);
                prop_assert!(tip.is_some());
                let tip = tip.unwrap();
                prop_assert!(distance(tip, (x, y)) < TOL_MM);
            }
        }

        #[test]
        fn prop_below_clearance_always_rejected(x in -500.0f64..500.0, y in -500.0f64..4.999) {
            let geometry = scenario();
            prop_assert_eq!(solve(x, y, &geometry), Err(Unreachable::BelowBaseline));
        }
    }
}
