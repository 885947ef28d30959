//! Trait definitions shared across the workspace.

pub mod calibration;

pub use calibration::{CalibrationResult, Calibrator};
