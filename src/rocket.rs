use glam::DVec2;

use crate::genetics::Brain;

/// Fitness awarded to a rocket that touched the moon, divided by the generation.
pub const REACHED_REWARD: f64 = 1e6;

#[derive(Debug, Clone, PartialEq)]
pub struct Rocket {
    pub position: DVec2,
    pub velocity: DVec2,
    pub brain: Brain,
    pub trail: Vec<DVec2>,
    pub reached: bool,
    pub fitness: f64,
}

impl Rocket {
    pub fn new(launch: DVec2, brain: Brain) -> Self {
        Rocket {
            position: launch,
            velocity: DVec2::ZERO,
            trail: Vec::with_capacity(brain.len()),
            brain,
            reached: false,
            fitness: 0.0,
        }
    }

    /// Burn the acceleration for `frame`. Rockets already at the moon stay put.
    pub fn step(&mut self, frame: usize, moon: DVec2, hit_radius: f64) {
        if self.reached {
            return;
        }
        self.velocity += self.brain.accel(frame);
        self.position += self.velocity;
        self.trail.push(self.position);
        if self.position.distance(moon) < hit_radius {
            self.reached = true;
        }
    }

    /// Non-finishers score by inverse squared distance, which is unbounded
    /// as the distance shrinks. A zero distance yields infinity.
    pub fn calc_fitness(&mut self, moon: DVec2, generation: u32) -> f64 {
        self.fitness = if self.reached {
            REACHED_REWARD / f64::from(generation)
        } else {
            let d = self.position.distance(moon);
            1.0 / (d * d)
        };
        self.fitness
    }

    /// A fresh rocket on the launch pad flying this rocket's program.
    pub fn offspring(&self, launch: DVec2) -> Rocket {
        Rocket::new(launch, self.brain.clone())
    }
}
