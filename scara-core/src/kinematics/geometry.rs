//! Link geometry of the dual-arm SCARA
//!
//! Arm A is mounted at the origin, arm B at `(base_offset, 0)`. Both
//! swing in the XY plane and their distal links meet at the tool tip.
//! All lengths are in millimetres.

use crate::config::GeometryConfig;

/// Geometry validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// A link length is zero or negative
    NonPositiveLink,
    /// Base offset is negative
    NegativeOffset,
    /// Baseline clearance is negative
    NegativeClearance,
    /// Dead-zone radius is negative
    NegativeDeadZone,
    /// A value is NaN or infinite
    NonFinite,
}

/// Proximal and distal link lengths of one arm
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmLinks {
    proximal_mm: f64,
    distal_mm: f64,
}

impl ArmLinks {
    /// Create an arm from its two link lengths
    pub fn new(proximal_mm: f64, distal_mm: f64) -> Result<Self, GeometryError> {
        if !proximal_mm.is_finite() || !distal_mm.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if proximal_mm <= 0.0 || distal_mm <= 0.0 {
            return Err(GeometryError::NonPositiveLink);
        }
        Ok(Self {
            proximal_mm,
            distal_mm,
        })
    }

    /// Length of the motor-side link
    pub fn proximal_mm(&self) -> f64 {
        self.proximal_mm
    }

    /// Length of the tip-side link
    pub fn distal_mm(&self) -> f64 {
        self.distal_mm
    }

    /// Fully stretched reach (targets at or beyond this are rejected)
    pub fn max_reach_mm(&self) -> f64 {
        self.proximal_mm + self.distal_mm
    }

    /// Fully folded reach (targets at or inside this are rejected)
    pub fn min_reach_mm(&self) -> f64 {
        libm::fabs(self.proximal_mm - self.distal_mm)
    }
}

/// Immutable geometry of both arms plus the forbidden zones
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkGeometry {
    arm_a: ArmLinks,
    arm_b: ArmLinks,
    base_offset_mm: f64,
    min_clearance_mm: f64,
    dead_zone_radius_mm: f64,
}

impl LinkGeometry {
    /// Create a geometry from two arms, the base offset and the
    /// minimum Y clearance above the shared baseline
    pub fn new(
        arm_a: ArmLinks,
        arm_b: ArmLinks,
        base_offset_mm: f64,
        min_clearance_mm: f64,
    ) -> Result<Self, GeometryError> {
        if !base_offset_mm.is_finite() || !min_clearance_mm.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if base_offset_mm < 0.0 {
            return Err(GeometryError::NegativeOffset);
        }
        if min_clearance_mm < 0.0 {
            return Err(GeometryError::NegativeClearance);
        }
        Ok(Self {
            arm_a,
            arm_b,
            base_offset_mm,
            min_clearance_mm,
            dead_zone_radius_mm: 0.0,
        })
    }

    /// Create a geometry where both arms share the same link lengths
    pub fn symmetric(
        proximal_mm: f64,
        distal_mm: f64,
        base_offset_mm: f64,
        min_clearance_mm: f64,
    ) -> Result<Self, GeometryError> {
        let arm = ArmLinks::new(proximal_mm, distal_mm)?;
        Self::new(arm, arm, base_offset_mm, min_clearance_mm)
    }

    /// Add an unreachable radius around arm A's origin
    pub fn with_dead_zone(mut self, radius_mm: f64) -> Result<Self, GeometryError> {
        if !radius_mm.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if radius_mm < 0.0 {
            return Err(GeometryError::NegativeDeadZone);
        }
        self.dead_zone_radius_mm = radius_mm;
        Ok(self)
    }

    /// Arm mounted at the origin
    pub fn arm_a(&self) -> &ArmLinks {
        &self.arm_a
    }

    /// Arm mounted at `(base_offset, 0)`
    pub fn arm_b(&self) -> &ArmLinks {
        &self.arm_b
    }

    /// Distance between the two arm origins along X
    pub fn base_offset_mm(&self) -> f64 {
        self.base_offset_mm
    }

    /// Targets with Y below this are inside the forbidden baseline zone
    pub fn min_clearance_mm(&self) -> f64 {
        self.min_clearance_mm
    }

    /// Radius around the origin that is never commanded
    pub fn dead_zone_radius_mm(&self) -> f64 {
        self.dead_zone_radius_mm
    }
}

impl TryFrom<&GeometryConfig> for LinkGeometry {
    type Error = GeometryError;

    fn try_from(config: &GeometryConfig) -> Result<Self, Self::Error> {
        let arm_a = ArmLinks::new(config.proximal_a_mm, config.distal_a_mm)?;
        let arm_b = ArmLinks::new(config.proximal_b_mm, config.distal_b_mm)?;
        LinkGeometry::new(arm_a, arm_b, config.base_offset_mm, config.min_clearance_mm)?
            .with_dead_zone(config.dead_zone_radius_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_arm_reach() {
        let arm = ArmLinks::new(80.0, 100.0).unwrap();
        assert_eq!(arm.max_reach_mm(), 180.0);
        assert_eq!(arm.min_reach_mm(), 20.0);

        let arm = ArmLinks::new(120.0, 100.0).unwrap();
        assert_eq!(arm.min_reach_mm(), 20.0);
    }

    #[test]
    fn test_rejects_bad_links() {
        assert_eq!(ArmLinks::new(0.0, 100.0), Err(GeometryError::NonPositiveLink));
        assert_eq!(ArmLinks::new(80.0, -1.0), Err(GeometryError::NonPositiveLink));
        assert_eq!(ArmLinks::new(f64::NAN, 100.0), Err(GeometryError::NonFinite));
        assert_eq!(
            ArmLinks::new(80.0, f64::INFINITY),
            Err(GeometryError::NonFinite)
        );
    }

    #[test]
    fn test_rejects_bad_offsets() {
        assert_eq!(
            LinkGeometry::symmetric(80.0, 100.0, -1.0, 5.0),
            Err(GeometryError::NegativeOffset)
        );
        assert_eq!(
            LinkGeometry::symmetric(80.0, 100.0, 50.0, -5.0),
            Err(GeometryError::NegativeClearance)
        );

        let geometry = LinkGeometry::symmetric(80.0, 100.0, 50.0, 5.0).unwrap();
        assert_eq!(
            geometry.with_dead_zone(-2.0),
            Err(GeometryError::NegativeDeadZone)
        );
    }

    #[test]
    fn test_co_axial_base_allowed() {
        // Single-tower arms share one origin
        let geometry = LinkGeometry::symmetric(100.0, 120.0, 0.0, 0.0).unwrap();
        assert_eq!(geometry.base_offset_mm(), 0.0);
    }

    #[test]
    fn test_from_config() {
        let config = GeometryConfig {
            proximal_a_mm: 80.0,
            distal_a_mm: 100.0,
            proximal_b_mm: 90.0,
            distal_b_mm: 110.0,
            base_offset_mm: 50.0,
            min_clearance_mm: 5.0,
            dead_zone_radius_mm: 10.0,
        };

        let geometry = LinkGeometry::try_from(&config).unwrap();
        assert_eq!(geometry.arm_a().proximal_mm(), 80.0);
        assert_eq!(geometry.arm_b().distal_mm(), 110.0);
        assert_eq!(geometry.base_offset_mm(), 50.0);
        assert_eq!(geometry.min_clearance_mm(), 5.0);
        assert_eq!(geometry.dead_zone_radius_mm(), 10.0);

        let bad = GeometryConfig {
            distal_b_mm: 0.0,
            ..config
        };
        assert_eq!(
            LinkGeometry::try_from(&bad),
            Err(GeometryError::NonPositiveLink)
        );
    }

    proptest! {
        #[test]
        fn prop_folded_reach_ignores_link_order(a in 1.0f64..500.0, b in 1.0f64..500.0) {
            let forward = ArmLinks::new(a, b).unwrap();
            let swapped = ArmLinks::new(b, a).unwrap();
            prop_assert_eq!(forward.min_reach_mm(), swapped.min_reach_mm());
            prop_assert!(forward.min_reach_mm() >= 0.0);
            prop_assert!(forward.min_reach_mm() < forward.max_reach_mm());
        }
    }
}
