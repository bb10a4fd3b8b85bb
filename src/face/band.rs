//! Arc band geometry
//!
//! A drawn arc is a thickened band in polar space:
//! - radius: centerline distance from the face center
//! - thickness: radial extent (inner = radius - thickness/2, outer = radius + thickness/2)
//! - start, sweep: angular extent in degrees, sweeping clockwise on screen

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{normalize_degrees, polar_to_cartesian};

/// A thickened arc band, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcBand {
    /// Centerline radius from the face center
    pub radius: f32,
    /// Radial thickness (extends radius ± thickness/2)
    pub thickness: f32,
    /// Start angle (degrees, normalized to [-180, 180))
    pub start_degrees: f32,
    /// Sweep (degrees, 0..=360)
    pub sweep_degrees: f32,
}

impl ArcBand {
    pub fn new(radius: f32, thickness: f32, start_degrees: f32, sweep_degrees: f32) -> Self {
        Self {
            radius,
            thickness,
            start_degrees: normalize_degrees(start_degrees),
            sweep_degrees: sweep_degrees.clamp(0.0, 360.0),
        }
    }

    /// Inner radius of the band
    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.radius - self.thickness / 2.0
    }

    /// Outer radius of the band
    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.thickness / 2.0
    }

    /// End angle in degrees (not normalized, so a full ring ends 360° after it starts)
    #[inline]
    pub fn end_degrees(&self) -> f32 {
        self.start_degrees + self.sweep_degrees
    }

    pub fn start_radians(&self) -> f32 {
        self.start_degrees.to_radians()
    }

    pub fn end_radians(&self) -> f32 {
        self.end_degrees().to_radians()
    }

    /// Nothing visible to stroke
    pub fn is_empty(&self) -> bool {
        self.sweep_degrees < 1e-4 || self.radius <= 0.0
    }

    /// Where the label badge sits: bottom of the ring (screen y grows downward)
    pub fn label_anchor(&self) -> Vec2 {
        polar_to_cartesian(self.radius, std::f32::consts::FRAC_PI_2)
    }
}
