//! Status reporting task
//!
//! Drains axis status reports so the axis tasks never block on a full
//! channel. A failed axis stays disabled on its own; the other keeps running.

use defmt::*;

use crate::channels::{AxisStatus, AXIS_STATUS};

#[embassy_executor::task]
pub async fn status_task() {
    loop {
        match AXIS_STATUS.receive().await {
            AxisStatus::HomingFailed { joint, error } => {
                error!("Joint {:?} unusable until re-homed: {:?}", joint, error);
            }
            AxisStatus::Fault { joint, error } => {
                warn!("Joint {:?} fault: {:?}", joint, error);
            }
            other => {
                info!("Status: {:?}", other);
            }
        }
    }
}
