use glam::DVec2;
use rand::Rng;

use crate::config::Bounds;
use crate::genetics::unit;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moon {
    pub position: DVec2,
    pub hit_radius: f64,
}

impl Moon {
    pub fn new(position: DVec2, hit_radius: f64) -> Self {
        Moon {
            position,
            hit_radius,
        }
    }

    /// Somewhere inside the margins, kept to the upper half of the canvas.
    pub fn random(bounds: Bounds, margin: f64, hit_radius: f64, rng: &mut impl Rng) -> Self {
        let mut moon = Moon::new(DVec2::ZERO, hit_radius);
        moon.relocate(bounds, margin, rng);
        moon
    }

    pub fn relocate(&mut self, bounds: Bounds, margin: f64, rng: &mut impl Rng) {
        self.position = DVec2::new(
            margin + unit(rng) * (bounds.width - 2.0 * margin),
            margin + unit(rng) * (bounds.height / 2.0),
        );
    }
}
