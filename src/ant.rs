use tracing::debug;

use crate::config::{AntConfig, Bounds, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    fn turn_right(self) -> Self {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }

    fn turn_left(self) -> Self {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
        }
    }
}

/// Langton's Ant on a toroidal grid.
#[derive(Debug, Clone)]
pub struct LangtonsAnt {
    config: AntConfig,
    cols: usize,
    rows: usize,
    cells: Vec<bool>, // true = black
    ant: (usize, usize),
    heading: Heading,
    steps: u64,
}

impl LangtonsAnt {
    pub fn new(config: AntConfig, bounds: Bounds) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut ant = LangtonsAnt {
            config,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            ant: (0, 0),
            heading: Heading::Up,
            steps: 0,
        };
        ant.reset(bounds)?;
        Ok(ant)
    }

    pub fn with_grid(cols: usize, rows: usize) -> Result<Self, ConfigError> {
        let config = AntConfig::default();
        let bounds = Bounds::new(
            cols as f64 * config.cell_size,
            rows as f64 * config.cell_size,
        );
        LangtonsAnt::new(config, bounds)
    }

    /// Clear the grid, resized to fit `bounds`, and put the ant back in the middle.
    pub fn reset(&mut self, bounds: Bounds) -> Result<(), ConfigError> {
        let cols = (bounds.width / self.config.cell_size).floor() as usize;
        let rows = (bounds.height / self.config.cell_size).floor() as usize;
        if cols == 0 || rows == 0 {
            return Err(ConfigError::DegenerateBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![false; cols * rows];
        self.ant = (cols / 2, rows / 2);
        self.heading = Heading::Up;
        self.steps = 0;
        debug!(cols, rows, "ant grid reset");
        Ok(())
    }

    pub fn step(&mut self) {
        let idx = self.index(self.ant.0, self.ant.1);
        self.heading = if self.cells[idx] {
            self.heading.turn_left()
        } else {
            self.heading.turn_right()
        };
        self.cells[idx] = !self.cells[idx];

        let (x, y) = self.ant;
        self.ant = match self.heading {
            Heading::Up => (x, (y + self.rows - 1) % self.rows),
            Heading::Down => (x, (y + 1) % self.rows),
            Heading::Left => ((x + self.cols - 1) % self.cols, y),
            Heading::Right => ((x + 1) % self.cols, y),
        };
        self.steps += 1;
    }

    pub fn tick(&mut self) {
        for _ in 0..self.config.steps_per_frame {
            self.step();
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    pub fn is_black(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)]
    }

    pub fn black_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, black)| **black)
            .map(|(i, _)| (i % self.cols, i / self.cols))
    }

    pub fn ant(&self) -> (usize, usize) {
        self.ant
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn cell_size(&self) -> f64 {
        self.config.cell_size
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_turns_right_and_paints() {
        let mut ant = LangtonsAnt::with_grid(11, 11).unwrap();
        assert_eq!(ant.ant(), (5, 5));
        ant.step();
        assert!(ant.is_black(5, 5));
        assert_eq!(ant.heading(), Heading::Right);
        assert_eq!(ant.ant(), (6, 5));
    }

    #[test]
    fn black_cell_turns_left_and_clears() {
        let mut ant = LangtonsAnt::with_grid(11, 11).unwrap();
        // Four right turns walk a small square back onto the start cell.
        for _ in 0..4 {
            ant.step();
        }
        assert_eq!(ant.ant(), (5, 5));
        assert_eq!(ant.heading(), Heading::Up);
        ant.step();
        assert!(!ant.is_black(5, 5));
        assert_eq!(ant.heading(), Heading::Left);
        assert_eq!(ant.ant(), (4, 5));
    }

    #[test]
    fn wraps_around_edges() {
        let mut ant = LangtonsAnt::with_grid(1, 1).unwrap();
        ant.step();
        assert_eq!(ant.ant(), (0, 0));
        assert!(ant.is_black(0, 0));
        ant.step();
        assert!(!ant.is_black(0, 0));
    }

    #[test]
    fn tick_runs_configured_steps() {
        let config = AntConfig {
            steps_per_frame: 3,
            ..AntConfig::default()
        };
        let mut ant = LangtonsAnt::new(config, Bounds::new(120.0, 120.0)).unwrap();
        ant.tick();
        assert_eq!(ant.steps(), 3);
        assert_eq!(ant.black_cells().count(), 3);
    }

    #[test]
    fn reset_clears_the_grid() {
        let mut ant = LangtonsAnt::with_grid(20, 20).unwrap();
        for _ in 0..50 {
            ant.step();
        }
        ant.reset(Bounds::new(60.0, 30.0)).unwrap();
        assert_eq!(ant.dimensions(), (10, 5));
        assert_eq!(ant.black_cells().count(), 0);
        assert_eq!(ant.steps(), 0);
    }
}
