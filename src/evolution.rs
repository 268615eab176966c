//! Generational loop for the rocket population.
//!
//! Every rocket flies its brain in lockstep, one frame per tick. Once the
//! lifespan is used up the population is ranked by fitness, the best rocket
//! is carried over untouched and the rest of the next generation is bred from
//! the top half with per-gene mutation.

use glam::DVec2;
use rand::Rng;
use tracing::{debug, info};

use crate::config::{Bounds, ConfigError, EngineConfig};
use crate::genetics::{Brain, unit};
use crate::moon::Moon;
use crate::rocket::Rocket;
use crate::simulation_stats::SimulationStats;

/// What a single [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Stepped,
    Advanced { reached: bool },
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    bounds: Bounds,
    rockets: Vec<Rocket>,
    moon: Moon,
    frame: usize,
    generation: u32,
    notification: String,
    stats: SimulationStats,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        bounds: Bounds,
        hit_radius: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.check_bounds(bounds)?;
        let mut engine = Engine {
            moon: Moon::new(DVec2::ZERO, hit_radius),
            rockets: Vec::with_capacity(config.population),
            config,
            bounds,
            frame: 0,
            generation: 1,
            notification: String::new(),
            stats: SimulationStats::default(),
        };
        engine.populate(hit_radius, rng);
        Ok(engine)
    }

    /// Start from a hand-built population and moon instead of random ones.
    pub fn with_population(
        config: EngineConfig,
        bounds: Bounds,
        moon: Moon,
        rockets: Vec<Rocket>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.check_bounds(bounds)?;
        if rockets.len() != config.population {
            return Err(ConfigError::PopulationMismatch {
                expected: config.population,
                actual: rockets.len(),
            });
        }
        if let Some((index, rocket)) = rockets
            .iter()
            .enumerate()
            .find(|(_, r)| r.brain.len() != config.lifespan)
        {
            return Err(ConfigError::BrainLength {
                index,
                expected: config.lifespan,
                actual: rocket.brain.len(),
            });
        }
        Ok(Engine {
            config,
            bounds,
            rockets,
            moon,
            frame: 0,
            generation: 1,
            notification: String::new(),
            stats: SimulationStats::default(),
        })
    }

    /// Throw everything away and start over on a canvas of a new size.
    pub fn reset(
        &mut self,
        bounds: Bounds,
        hit_radius: f64,
        rng: &mut impl Rng,
    ) -> Result<(), ConfigError> {
        self.config.check_bounds(bounds)?;
        self.bounds = bounds;
        self.frame = 0;
        self.generation = 1;
        self.notification.clear();
        self.populate(hit_radius, rng);
        debug!(
            width = bounds.width,
            height = bounds.height,
            hit_radius,
            "rocket engine reset"
        );
        Ok(())
    }

    fn populate(&mut self, hit_radius: f64, rng: &mut impl Rng) {
        let launch = self.launch_pad();
        self.rockets = (0..self.config.population)
            .map(|_| {
                let brain = Brain::new_random(self.config.lifespan, self.config.max_accel, rng);
                Rocket::new(launch, brain)
            })
            .collect();
        self.moon = Moon::random(self.bounds, self.config.moon_margin, hit_radius, rng);
    }

    pub fn launch_pad(&self) -> DVec2 {
        DVec2::new(
            self.bounds.width / 2.0,
            self.bounds.height - self.config.launch_offset,
        )
    }

    /// Advance every rocket by one frame of its brain.
    pub fn step_frame(&mut self) {
        assert!(
            self.frame < self.config.lifespan,
            "step_frame at frame {} past lifespan {}",
            self.frame,
            self.config.lifespan
        );
        let Moon {
            position,
            hit_radius,
        } = self.moon;
        for rocket in &mut self.rockets {
            rocket.step(self.frame, position, hit_radius);
        }
        self.frame += 1;
    }

    /// Rank, report and breed the next generation. Only valid once the lifespan is spent.
    pub fn advance_generation(&mut self, rng: &mut impl Rng) -> bool {
        assert_eq!(
            self.frame, self.config.lifespan,
            "generation advanced before the lifespan ran out"
        );
        let moon = self.moon.position;
        let generation = self.generation;
        for rocket in &mut self.rockets {
            rocket.calc_fitness(moon, generation);
        }
        self.rockets.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let best = &self.rockets[0];
        let reached = best.reached;
        let best_distance = best.position.distance(moon);
        self.stats.record(generation, reached, best.fitness, best_distance);

        if reached {
            info!(generation, "rocket reached the moon");
            self.notification = format!("Reached! Generation {generation}");
            self.generation = 1;
            self.moon.relocate(self.bounds, self.config.moon_margin, rng);
        } else {
            debug!(
                generation,
                best_distance,
                best_fitness = best.fitness,
                "lifespan exhausted without a hit"
            );
            self.generation += 1;
            self.notification.clear();
        }

        let launch = self.launch_pad();
        let pool = self.config.parent_pool();
        let mut next = Vec::with_capacity(self.config.population);
        next.push(self.rockets[0].offspring(launch));
        while next.len() < self.config.population {
            let pick = ((unit(rng) * pool as f64) as usize).min(pool - 1);
            let brain = self.rockets[pick].brain.mutate(
                self.config.mutation_rate,
                self.config.max_accel,
                rng,
            );
            next.push(Rocket::new(launch, brain));
        }
        self.rockets = next;
        self.frame = 0;
        reached
    }

    /// One unit of work per clock callback.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Tick {
        if self.frame < self.config.lifespan {
            self.step_frame();
            Tick::Stepped
        } else {
            Tick::Advanced {
                reached: self.advance_generation(rng),
            }
        }
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn moon(&self) -> &Moon {
        &self.moon
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Empty unless the last generation reached the moon.
    pub fn notification(&self) -> &str {
        &self.notification
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn color_index(&self, palette_len: usize) -> usize {
        self.generation as usize % palette_len.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bounds() -> Bounds {
        Bounds::new(800.0, 600.0)
    }

    fn small_config(population: usize, lifespan: usize) -> EngineConfig {
        EngineConfig {
            population,
            lifespan,
            ..EngineConfig::default()
        }
    }

    fn rocket_with(launch: DVec2, gene: DVec2, lifespan: usize) -> Rocket {
        Rocket::new(launch, Brain::from_genes(vec![gene; lifespan]))
    }

    #[test]
    fn fresh_population_is_clean() {
        let mut rng = StdRng::seed_from_u64(3);
        let engine = Engine::new(EngineConfig::default(), bounds(), 10.0, &mut rng).unwrap();
        assert_eq!(engine.rockets().len(), 10);
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.frame(), 0);
        for rocket in engine.rockets() {
            assert_eq!(rocket.brain.len(), 200);
            assert!(!rocket.reached);
            assert!(rocket.trail.is_empty());
            assert_eq!(rocket.position, DVec2::new(400.0, 580.0));
        }
    }

    #[test]
    fn full_lifespan_fills_every_trail() {
        let config = small_config(3, 12);
        let launch = DVec2::new(400.0, 580.0);
        let rockets = (0..3)
            .map(|i| rocket_with(launch, DVec2::new(0.01 * i as f64, -0.05), 12))
            .collect();
        let moon = Moon::new(DVec2::new(-5000.0, -5000.0), 10.0);
        let mut engine = Engine::with_population(config, bounds(), moon, rockets).unwrap();
        for _ in 0..12 {
            engine.step_frame();
        }
        assert!(engine.rockets().iter().all(|r| r.trail.len() == 12));
    }

    #[test]
    fn best_rocket_survives_unmutated() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut engine = Engine::new(small_config(10, 40), bounds(), 10.0, &mut rng).unwrap();
        for _ in 0..40 {
            engine.step_frame();
        }
        let moon = engine.moon().position;
        let generation = engine.generation();
        let expected = engine
            .rockets()
            .iter()
            .cloned()
            .map(|mut r| {
                r.calc_fitness(moon, generation);
                r
            })
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .unwrap()
            .brain;

        engine.advance_generation(&mut rng);
        assert_eq!(engine.rockets().len(), 10);
        assert_eq!(engine.rockets()[0].brain, expected);
        assert_eq!(engine.frame(), 0);
        assert!(engine.rockets().iter().all(|r| r.trail.is_empty() && !r.reached));
    }

    #[test]
    fn reaching_the_moon_resets_generation_and_notifies() {
        let launch = DVec2::new(400.0, 580.0);
        let hover = rocket_with(launch, DVec2::ZERO, 4);
        // Leaves the 5px radius on its first step.
        let drifter = rocket_with(launch, DVec2::new(10.0, 0.0), 4);
        let moon = Moon::new(launch, 5.0);
        let mut engine =
            Engine::with_population(small_config(2, 4), bounds(), moon, vec![drifter, hover])
                .unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..4 {
            assert_eq!(engine.tick(&mut rng), Tick::Stepped);
        }
        assert!(engine.rockets()[1].reached);
        assert!(!engine.rockets()[0].reached);

        assert_eq!(engine.tick(&mut rng), Tick::Advanced { reached: true });
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.notification(), "Reached! Generation 1");
        assert_eq!(
            engine.rockets()[0].brain,
            Brain::from_genes(vec![DVec2::ZERO; 4])
        );
        assert_ne!(engine.moon().position, launch);
        assert_eq!(engine.stats().targets_reached, 1);
    }

    #[test]
    fn missing_the_moon_increments_generation_and_clears_message() {
        let launch = DVec2::new(400.0, 580.0);
        let rockets = vec![
            rocket_with(launch, DVec2::new(0.0, -0.1), 3),
            rocket_with(launch, DVec2::new(0.1, 0.0), 3),
        ];
        let moon = Moon::new(DVec2::new(400.0, 20.0), 5.0);
        let mut engine =
            Engine::with_population(small_config(2, 3), bounds(), moon, rockets).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..2 {
            for _ in 0..3 {
                engine.tick(&mut rng);
            }
            assert_eq!(engine.tick(&mut rng), Tick::Advanced { reached: false });
            assert!(engine.notification().is_empty());
        }
        assert_eq!(engine.generation(), 3);
        assert_eq!(engine.moon().position, DVec2::new(400.0, 20.0));
    }

    #[test]
    #[should_panic(expected = "past lifespan")]
    fn stepping_past_the_lifespan_panics() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = Engine::new(small_config(2, 2), bounds(), 5.0, &mut rng).unwrap();
        for _ in 0..3 {
            engine.step_frame();
        }
    }

    #[test]
    fn reset_restores_initial_counters() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut engine = Engine::new(small_config(4, 2), bounds(), 5.0, &mut rng).unwrap();
        for _ in 0..7 {
            engine.tick(&mut rng);
        }
        assert!(engine.generation() > 1);

        let resized = Bounds::new(1024.0, 768.0);
        engine.reset(resized, 12.0, &mut rng).unwrap();
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.frame(), 0);
        assert_eq!(engine.moon().hit_radius, 12.0);
        assert_eq!(engine.launch_pad(), DVec2::new(512.0, 748.0));
        assert!(engine.rockets().iter().all(|r| r.position == engine.launch_pad()));
    }

    #[test]
    fn oversized_margins_are_rejected_for_the_canvas() {
        let mut rng = StdRng::seed_from_u64(6);
        let margin = EngineConfig {
            moon_margin: 700.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(margin, bounds(), 10.0, &mut rng),
            Err(ConfigError::MoonOffCanvas { .. })
        ));

        let launch = EngineConfig {
            launch_offset: 900.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(launch, bounds(), 10.0, &mut rng),
            Err(ConfigError::LaunchOffCanvas { .. })
        ));
    }

    #[test]
    fn reset_rejects_a_canvas_the_margin_cannot_fit() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut engine = Engine::new(EngineConfig::default(), bounds(), 10.0, &mut rng).unwrap();
        let err = engine.reset(Bounds::new(30.0, 600.0), 10.0, &mut rng).unwrap_err();
        assert!(matches!(err, ConfigError::MoonOffCanvas { .. }));
        assert_eq!(engine.bounds(), bounds());
    }

    #[test]
    fn moon_stays_on_canvas_with_a_large_configured_margin() {
        let config = EngineConfig {
            moon_margin: 250.0,
            launch_offset: 550.0,
            ..EngineConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let engine = Engine::new(config.clone(), bounds(), 10.0, &mut rng).unwrap();
            let moon = engine.moon().position;
            assert!((250.0..550.0).contains(&moon.x));
            assert!((250.0..550.0).contains(&moon.y));
            assert!(engine.launch_pad().y >= 0.0);
        }
    }

    #[test]
    fn rejects_mismatched_brains() {
        let launch = DVec2::new(400.0, 580.0);
        let rockets = vec![rocket_with(launch, DVec2::ZERO, 3)];
        let moon = Moon::new(DVec2::ZERO, 5.0);
        let err = Engine::with_population(small_config(1, 4), bounds(), moon, rockets).unwrap_err();
        assert_eq!(
            err,
            ConfigError::BrainLength {
                index: 0,
                expected: 4,
                actual: 3
            }
        );
    }
}
