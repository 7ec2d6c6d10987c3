//! Motion command intake
//!
//! Solves each Cartesian target into joint angles and hands one angle to
//! each axis task. A target that fails to solve, or whose angles any axis
//! would refuse, moves neither arm.

use defmt::*;

use scara_core::config::MachineConfig;
use scara_core::kinematics::{solve_bed, Frame, Joint, LinkGeometry};

use crate::channels::{axis_signals, AxisStatus, AXIS_STATUS, MOTION_TARGET};

/// Motion task
#[embassy_executor::task]
pub async fn motion_task(config: &'static MachineConfig, geometry: LinkGeometry, frame: Frame) {
    info!("Motion task started");

    loop {
        let (x_mm, y_mm) = MOTION_TARGET.wait().await;

        match solve_bed(x_mm, y_mm, &frame, &geometry) {
            Ok(angles) => {
                debug!(
                    "Target ({}, {}) mm -> theta {} rad, phi {} rad",
                    x_mm,
                    y_mm,
                    angles.theta(),
                    angles.phi()
                );
                if let Err(joint) = config.check_goals(&angles) {
                    warn!(
                        "Target ({}, {}) mm needs {} rad on joint {:?}, outside its range",
                        x_mm,
                        y_mm,
                        angles.get(joint),
                        joint
                    );
                    AXIS_STATUS
                        .send(AxisStatus::GoalRejected { x_mm, y_mm, joint })
                        .await;
                    continue;
                }
                for joint in [Joint::A, Joint::B] {
                    axis_signals(joint).goal.signal(angles.get(joint));
                }
            }
            Err(reason) => {
                warn!("Target ({}, {}) mm unreachable: {:?}", x_mm, y_mm, reason);
                AXIS_STATUS
                    .send(AxisStatus::Unreachable { x_mm, y_mm, reason })
                    .await;
            }
        }
    }
}
