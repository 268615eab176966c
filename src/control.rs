//! Ball-on-beam under full-state feedback.
//!
//! The plant is a chain of four integrators, so the gain comes straight out of
//! Ackermann's formula with every pole stacked at the same spot.

use glam::{DMat4, DVec4};
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, ControlConfig};

pub const SETPOINT_LIMIT: f64 = 0.9;
const INITIAL_STATE: DVec4 = DVec4::new(0.5, 0.0, 0.1, 0.0);

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("plant is not controllable (controllability determinant {0})")]
    Uncontrollable(f64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Continuous-time `(A, B)` for the beam: `[pos, vel, angle, angular_vel]`.
pub fn beam_plant(config: &ControlConfig) -> (DMat4, DVec4) {
    let rows = [
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, config.gravity / config.beam_length, 0.0],
        [0.0, 0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0, 0.0],
    ];
    let a = DMat4::from_cols_array_2d(&rows).transpose();
    let b = DVec4::new(0.0, 0.0, 0.0, 1.0 / config.beam_inertia);
    (a, b)
}

/// `K = e4ᵀ C⁻¹ φ(A)` with `φ(s) = (s - pole)^4`.
pub fn ackermann_gain(a: DMat4, b: DVec4, pole: f64) -> Result<DVec4, ControlError> {
    let ab = a * b;
    let aab = a * ab;
    let controllability = DMat4::from_cols(b, ab, aab, a * aab);
    let det = controllability.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return Err(ControlError::Uncontrollable(det));
    }
    let shifted = a - DMat4::IDENTITY * pole;
    let phi = shifted * shifted * shifted * shifted;
    Ok(phi.transpose() * (controllability.inverse().transpose() * DVec4::W))
}

#[derive(Debug, Clone)]
pub struct BeamDemo {
    config: ControlConfig,
    a: DMat4,
    b: DVec4,
    gain: DVec4,
    state: DVec4,
    setpoint: f64,
    history: Vec<f64>,
}

impl BeamDemo {
    pub fn new(config: ControlConfig) -> Result<Self, ControlError> {
        config.validate()?;
        let (a, b) = beam_plant(&config);
        let gain = ackermann_gain(a, b, config.pole)?;
        debug!(k = ?gain.to_array(), "beam gain placed");
        Ok(BeamDemo {
            history: Vec::with_capacity(config.max_points),
            config,
            a,
            b,
            gain,
            state: INITIAL_STATE,
            setpoint: 0.0,
        })
    }

    pub fn restart(&mut self) {
        self.history.clear();
        self.state = INITIAL_STATE;
    }

    /// Clamp into the beam's reachable range and start the response over.
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint.clamp(-SETPOINT_LIMIT, SETPOINT_LIMIT);
        self.restart();
    }

    pub fn step(&mut self) {
        if self.history.len() >= self.config.max_points {
            self.restart();
        }
        let error = self.state - DVec4::new(self.setpoint, 0.0, 0.0, 0.0);
        let u = -self.gain.dot(error);
        self.state += (self.a * self.state + self.b * u) * self.config.dt;
        self.history.push(self.state.x);
    }

    pub fn gain(&self) -> DVec4 {
        self.gain
    }

    pub fn state(&self) -> DVec4 {
        self.state
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn max_points(&self) -> usize {
        self.config.max_points
    }
}
