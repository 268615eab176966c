use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const POPULATION: usize = 10;
pub const LIFESPAN: usize = 200;
pub const MUTATION_RATE: f64 = 0.2;
pub const MAX_ACCEL: f64 = 0.1;
pub const LAUNCH_OFFSET: f64 = 20.0; // distance of the launch pad above the bottom edge
pub const MOON_MARGIN: f64 = 20.0;

pub const ANT_CELL_SIZE: f64 = 6.0;
pub const ANT_STEPS_PER_FRAME: usize = 8;

pub const CONTROL_DT: f64 = 0.01;
pub const CONTROL_MAX_POINTS: usize = 400;
pub const CONTROL_POLE: f64 = -3.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("population must contain at least one rocket")]
    EmptyPopulation,
    #[error("lifespan must be at least one frame")]
    ZeroLifespan,
    #[error("mutation rate {0} must be between 0.0 and 1.0")]
    InvalidMutationRate(f64),
    #[error("acceleration bound {0} must be finite and non-negative")]
    InvalidAccel(f64),
    #[error("canvas {width}x{height} is too small")]
    DegenerateBounds { width: f64, height: f64 },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("{name} {value} must be finite and non-negative")]
    InvalidOffset { name: &'static str, value: f64 },
    #[error("moon margin {margin} does not leave room on a {width}x{height} canvas")]
    MoonOffCanvas { margin: f64, width: f64, height: f64 },
    #[error("launch offset {offset} puts the pad outside a canvas {height} high")]
    LaunchOffCanvas { offset: f64, height: f64 },
    #[error("expected {expected} rockets, got {actual}")]
    PopulationMismatch { expected: usize, actual: usize },
    #[error("rocket {index} has a brain of length {actual}, lifespan is {expected}")]
    BrainLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Canvas size in pixels. Everything the engines track lives in these coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Bounds { width, height }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            Ok(())
        } else {
            Err(ConfigError::DegenerateBounds {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Tuning for the rocket population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub population: usize,
    pub lifespan: usize,
    pub mutation_rate: f64,
    pub max_accel: f64,
    pub launch_offset: f64,
    pub moon_margin: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            population: POPULATION,
            lifespan: LIFESPAN,
            mutation_rate: MUTATION_RATE,
            max_accel: MAX_ACCEL,
            launch_offset: LAUNCH_OFFSET,
            moon_margin: MOON_MARGIN,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.lifespan == 0 {
            return Err(ConfigError::ZeroLifespan);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if !self.max_accel.is_finite() || self.max_accel < 0.0 {
            return Err(ConfigError::InvalidAccel(self.max_accel));
        }
        for (name, value) in [
            ("moon_margin", self.moon_margin),
            ("launch_offset", self.launch_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidOffset { name, value });
            }
        }
        Ok(())
    }

    /// The moon spans `margin..width - margin` across and `margin..margin + height / 2`
    /// down, and the launch pad sits `launch_offset` above the bottom edge. All of it
    /// has to land on the canvas.
    pub fn check_bounds(&self, bounds: Bounds) -> Result<(), ConfigError> {
        bounds.validate()?;
        let margin = self.moon_margin;
        if bounds.width <= 2.0 * margin || margin >= bounds.height / 2.0 {
            return Err(ConfigError::MoonOffCanvas {
                margin,
                width: bounds.width,
                height: bounds.height,
            });
        }
        if self.launch_offset >= bounds.height {
            return Err(ConfigError::LaunchOffCanvas {
                offset: self.launch_offset,
                height: bounds.height,
            });
        }
        Ok(())
    }

    /// Number of top-ranked rockets eligible as parents.
    pub fn parent_pool(&self) -> usize {
        (self.population / 2).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntConfig {
    pub cell_size: f64,
    pub steps_per_frame: usize,
}

impl Default for AntConfig {
    fn default() -> Self {
        AntConfig {
            cell_size: ANT_CELL_SIZE,
            steps_per_frame: ANT_STEPS_PER_FRAME,
        }
    }
}

impl AntConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::NonPositive("cell_size"));
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::NonPositive("steps_per_frame"));
        }
        Ok(())
    }
}

/// Ball-on-beam plant and loop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub dt: f64,
    pub max_points: usize,
    pub beam_length: f64,
    pub beam_inertia: f64,
    pub gravity: f64,
    /// Every closed-loop pole is placed here.
    pub pole: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            dt: CONTROL_DT,
            max_points: CONTROL_MAX_POINTS,
            beam_length: 0.5,
            beam_inertia: 0.02,
            gravity: 9.81,
            pole: CONTROL_POLE,
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::NonPositive("dt"));
        }
        if self.max_points == 0 {
            return Err(ConfigError::NonPositive("max_points"));
        }
        if !(self.beam_length > 0.0) {
            return Err(ConfigError::NonPositive("beam_length"));
        }
        if !(self.beam_inertia > 0.0) {
            return Err(ConfigError::NonPositive("beam_inertia"));
        }
        Ok(())
    }
}

/// Everything the site loads from `--config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub engine: EngineConfig,
    pub ant: AntConfig,
    pub control: ControlConfig,
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.ant.validate()?;
        self.control.validate()
    }
}
