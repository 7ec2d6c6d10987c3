//! Bed-to-arm coordinate frame
//!
//! Motion targets arrive in bed coordinates. The arm origin (arm A's
//! motor axis) sits at `(offset_x, offset_y)` on the bed, and some
//! machines mount the arm upside down relative to the bed's Y axis.

use crate::config::FrameConfig;

/// Bed-to-arm transform
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    offset_x_mm: f64,
    offset_y_mm: f64,
    mirror_y: bool,
}

impl Frame {
    /// Frame with the arm origin at `(offset_x_mm, offset_y_mm)` on the bed
    pub const fn new(offset_x_mm: f64, offset_y_mm: f64, mirror_y: bool) -> Self {
        Self {
            offset_x_mm,
            offset_y_mm,
            mirror_y,
        }
    }

    /// Bed and arm coordinates coincide
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, false)
    }

    /// Convert a bed position into the arm frame
    ///
    /// Translation first, then Y mirroring.
    pub fn to_arm(&self, x_bed: f64, y_bed: f64) -> (f64, f64) {
        let x = x_bed - self.offset_x_mm;
        let y = y_bed - self.offset_y_mm;
        if self.mirror_y {
            (x, -y)
        } else {
            (x, y)
        }
    }

    /// Convert an arm-frame position back onto the bed
    pub fn to_bed(&self, x_arm: f64, y_arm: f64) -> (f64, f64) {
        let y = if self.mirror_y { -y_arm } else { y_arm };
        (x_arm + self.offset_x_mm, y + self.offset_y_mm)
    }
}

impl From<&FrameConfig> for Frame {
    fn from(config: &FrameConfig) -> Self {
        Self::new(config.offset_x_mm, config.offset_y_mm, config.mirror_y)
    }
}
