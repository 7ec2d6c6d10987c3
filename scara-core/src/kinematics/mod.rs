//! SCARA kinematics
//!
//! Maps tool-tip targets (mm) to the two commandable joint angles (rad)
//! of the dual-arm linkage, and back.

pub mod frame;
pub mod geometry;
pub mod solver;

pub use frame::Frame;
pub use geometry::{ArmLinks, GeometryError, LinkGeometry};
pub use solver::{
    cosine_law, elbow_positions, forward, solve, solve_bed, Joint, JointAngles,
    NumericDomainError, TipBranch, Unreachable, ACOS_TOLERANCE, wrap_angle,
};
