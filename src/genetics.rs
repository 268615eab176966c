use glam::DVec2;
use rand::Rng;

/// Uniform real in `[0, 1)`. Every random decision in the crate goes through here.
pub fn unit(rng: &mut impl Rng) -> f64 {
    rng.random::<f64>()
}

pub fn random_accel(rng: &mut impl Rng, max_accel: f64) -> DVec2 {
    DVec2::new(
        (unit(rng) * 2.0 - 1.0) * max_accel,
        (unit(rng) * 2.0 - 1.0) * max_accel,
    )
}

/// One acceleration per frame of the lifespan, consumed in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Brain {
    genes: Vec<DVec2>,
}

impl Brain {
    pub fn new_random(lifespan: usize, max_accel: f64, rng: &mut impl Rng) -> Self {
        Brain {
            genes: (0..lifespan).map(|_| random_accel(rng, max_accel)).collect(),
        }
    }

    pub fn from_genes(genes: Vec<DVec2>) -> Self {
        Brain { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[DVec2] {
        &self.genes
    }

    /// Acceleration for `frame`. Panics past the end: the frame counter is out of sync.
    pub fn accel(&self, frame: usize) -> DVec2 {
        assert!(
            frame < self.genes.len(),
            "frame {frame} outside brain of length {}",
            self.genes.len()
        );
        self.genes[frame]
    }

    pub fn mutate(&self, rate: f64, max_accel: f64, rng: &mut impl Rng) -> Self {
        Brain {
            genes: self
                .genes
                .iter()
                .map(|&gene| {
                    if unit(rng) < rate {
                        random_accel(rng, max_accel)
                    } else {
                        gene
                    }
                })
                .collect(),
        }
    }
}
