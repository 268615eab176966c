use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::config::{Bounds, ConfigError, EngineConfig};
use crate::evolution::{Engine, Tick};

pub const SWEEP_BOUNDS: Bounds = Bounds {
    width: 800.0,
    height: 600.0,
};
pub const SWEEP_HIT_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub seed: u64,
    pub generations_run: usize,
    pub targets_reached: usize,
    pub fewest_generations_to_target: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub runs: usize,
    pub runs_with_hits: usize,
    pub total_hits: usize,
    pub fastest: Option<(u64, u32)>,
}

/// Fly one seeded engine for `frames` ticks without a window.
pub fn run_seed(
    config: &EngineConfig,
    seed: u64,
    frames: usize,
) -> Result<SweepReport, ConfigError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = Engine::new(config.clone(), SWEEP_BOUNDS, SWEEP_HIT_RADIUS, &mut rng)?;
    let mut targets_reached = 0;
    for _ in 0..frames {
        if let Tick::Advanced { reached: true } = engine.tick(&mut rng) {
            targets_reached += 1;
        }
    }
    let stats = engine.stats();
    Ok(SweepReport {
        seed,
        generations_run: stats.generations_run,
        targets_reached,
        fewest_generations_to_target: stats.fewest_generations_to_target,
    })
}

/// Independent engines for `seed..seed + runs`, spread over the rayon pool.
pub fn sweep(
    config: &EngineConfig,
    seed: u64,
    runs: usize,
    frames: usize,
) -> Result<Vec<SweepReport>, ConfigError> {
    config.validate()?;
    (0..runs)
        .into_par_iter()
        .map(|offset| run_seed(config, seed.wrapping_add(offset as u64), frames))
        .collect()
}

pub fn summarize(reports: &[SweepReport]) -> SweepSummary {
    SweepSummary {
        runs: reports.len(),
        runs_with_hits: reports.iter().filter(|r| r.targets_reached > 0).count(),
        total_hits: reports.iter().map(|r| r.targets_reached).sum(),
        fastest: reports
            .iter()
            .filter_map(|r| r.fewest_generations_to_target.map(|g| (r.seed, g)))
            .min_by_key(|&(_, g)| g),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_report() {
        let config = EngineConfig {
            lifespan: 30,
            ..EngineConfig::default()
        };
        let a = run_seed(&config, 17, 200).unwrap();
        let b = run_seed(&config, 17, 200).unwrap();
        assert_eq!(a, b);
        // 200 ticks at 31 ticks per generation
        assert_eq!(a.generations_run, 6);
    }

    #[test]
    fn sweep_reports_every_seed_in_order() {
        let config = EngineConfig {
            lifespan: 10,
            ..EngineConfig::default()
        };
        let reports = sweep(&config, 100, 4, 50).unwrap();
        let seeds: Vec<u64> = reports.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
    }

    #[test]
    fn summary_picks_fastest_hit() {
        let reports = vec![
            SweepReport {
                seed: 1,
                generations_run: 10,
                targets_reached: 0,
                fewest_generations_to_target: None,
            },
            SweepReport {
                seed: 2,
                generations_run: 10,
                targets_reached: 2,
                fewest_generations_to_target: Some(4),
            },
            SweepReport {
                seed: 3,
                generations_run: 10,
                targets_reached: 1,
                fewest_generations_to_target: Some(2),
            },
        ];
        let summary = summarize(&reports);
        assert_eq!(summary.runs_with_hits, 2);
        assert_eq!(summary.total_hits, 3);
        assert_eq!(summary.fastest, Some((3, 2)));
    }

    #[test]
    fn seeds_wrap_past_the_top_of_the_range() {
        let config = EngineConfig {
            lifespan: 5,
            ..EngineConfig::default()
        };
        let reports = sweep(&config, u64::MAX, 2, 10).unwrap();
        let seeds: Vec<u64> = reports.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![u64::MAX, 0]);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = EngineConfig {
            lifespan: 0,
            ..EngineConfig::default()
        };
        assert_eq!(sweep(&config, 0, 2, 10), Err(ConfigError::ZeroLifespan));
    }
}
