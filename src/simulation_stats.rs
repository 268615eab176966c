const HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimulationStats {
    pub generations_run: usize,
    pub targets_reached: usize,
    pub fewest_generations_to_target: Option<u32>,
    pub best_fitness: f64,
    pub best_distance_history: Vec<f64>,
}

impl SimulationStats {
    /// Record one generational transition. `generation` is the counter before reset.
    /// Only misses feed the distance history.
    pub fn record(
        &mut self,
        generation: u32,
        reached: bool,
        best_fitness: f64,
        best_distance: f64,
    ) {
        self.generations_run += 1;
        self.best_fitness = best_fitness;
        if reached {
            self.targets_reached += 1;
            self.fewest_generations_to_target = Some(
                self.fewest_generations_to_target
                    .map_or(generation, |fewest| fewest.min(generation)),
            );
            return;
        }
        self.best_distance_history.push(best_distance);
        if self.best_distance_history.len() > HISTORY_LIMIT {
            self.best_distance_history.remove(0);
        }
    }
}
