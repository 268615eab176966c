//! Decorative canvas toys: a genetic "rocket to the moon" population,
//! Langton's Ant, and a ball-on-beam state-feedback loop.
//!
//! Each demo keeps its own simulation state and does exactly one unit of work
//! per frame; the [`app`] module drives them from a `piston_window` loop.

pub mod ant;
pub mod app;
pub mod config;
pub mod control;
pub mod evolution;
pub mod genetics;
pub mod moon;
pub mod render;
pub mod rocket;
pub mod simulation_stats;
pub mod sweep;
pub mod theme;

pub use config::{Bounds, ConfigError, EngineConfig, SiteConfig};
pub use evolution::{Engine, Tick};
pub use genetics::Brain;
pub use moon::Moon;
pub use rocket::Rocket;

#[cfg(test)]
pub(crate) mod test_support {
    use rand::RngCore;

    /// Every draw returns the same bits, so `random::<f64>()` is pinned near 0 or 1.
    pub struct FixedRng(pub u64);

    impl FixedRng {
        pub fn low() -> Self {
            FixedRng(0)
        }

        pub fn high() -> Self {
            FixedRng(u64::MAX)
        }
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            let bytes = self.0.to_le_bytes();
            for (i, b) in dst.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
        }
    }
}
