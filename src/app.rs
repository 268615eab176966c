use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use piston_window::character::CharacterCache;
use piston_window::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::ant::LangtonsAnt;
use crate::config::{Bounds, SiteConfig};
use crate::control::BeamDemo;
use crate::evolution::{Engine, Tick};
use crate::render::{draw_ant_demo, draw_beam_demo, draw_rocket_demo, setpoint_from_cursor};
use crate::theme::{Theme, ThemeStore};

const STATS_AREA_HEIGHT: f64 = 30.0;
const STATS_FONT_SIZE: u32 = 14;
const MOON_FONT_SIZE: u32 = 20;
const MOON_GLYPH: &str = "O";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Demo {
    #[default]
    Rocket,
    Ant,
    Control,
}

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub demo: Demo,
    pub seed: Option<u64>,
    pub width: u32,
    pub height: u32,
    pub font: PathBuf,
    pub theme_file: PathBuf,
}

/// Simulation area of a window, below the stats bar.
pub fn canvas_bounds(window_width: f64, window_height: f64) -> Bounds {
    Bounds::new(window_width, window_height - STATS_AREA_HEIGHT)
}

/// Half the measured width of the moon glyph, or half its font size without a font.
pub fn measure_hit_radius(glyphs: Option<&mut Glyphs>) -> f64 {
    glyphs
        .and_then(|g| g.width(MOON_FONT_SIZE, MOON_GLYPH).ok())
        .map(|w| w / 2.0)
        .filter(|r| *r > 0.0)
        .unwrap_or(f64::from(MOON_FONT_SIZE) / 2.0)
}

struct Demos {
    engine: Engine,
    ant: LangtonsAnt,
    beam: BeamDemo,
}

impl Demos {
    fn new(config: &SiteConfig, canvas: Bounds, hit_radius: f64, rng: &mut StdRng) -> Result<Self> {
        Ok(Demos {
            engine: Engine::new(config.engine.clone(), canvas, hit_radius, rng)
                .context("rocket engine")?,
            ant: LangtonsAnt::new(config.ant.clone(), canvas).context("ant grid")?,
            beam: BeamDemo::new(config.control.clone()).context("beam controller")?,
        })
    }

    fn reset(
        &mut self,
        demo: Demo,
        canvas: Bounds,
        hit_radius: f64,
        rng: &mut StdRng,
    ) -> Result<()> {
        match demo {
            Demo::Rocket => self.engine.reset(canvas, hit_radius, rng)?,
            Demo::Ant => self.ant.reset(canvas)?,
            Demo::Control => self.beam.restart(),
        }
        Ok(())
    }

    fn tick(&mut self, demo: Demo, rng: &mut StdRng) {
        match demo {
            Demo::Rocket => {
                if let Tick::Advanced { .. } = self.engine.tick(rng) {
                    let notice = self.engine.notification();
                    if !notice.is_empty() {
                        info!(notice, "generation finished");
                    }
                }
            }
            Demo::Ant => self.ant.tick(),
            Demo::Control => self.beam.step(),
        }
    }

    fn status(&self, demo: Demo) -> String {
        match demo {
            Demo::Rocket => {
                let stats = self.engine.stats();
                format!(
                    "Generation {} | frame {}/{} | hits {} | {}",
                    self.engine.generation(),
                    self.engine.frame(),
                    self.engine.config().lifespan,
                    stats.targets_reached,
                    self.engine.notification(),
                )
            }
            Demo::Ant => format!(
                "Langton's Ant | steps {} | [1/2/3] demo [T] theme [R] reset",
                self.ant.steps()
            ),
            Demo::Control => {
                let k = self.beam.gain();
                format!(
                    "Ball on beam | r = {:.2} | K = [{:.4}, {:.4}, {:.4}, {:.4}] | drag setpoint",
                    self.beam.setpoint(),
                    k.x,
                    k.y,
                    k.z,
                    k.w
                )
            }
        }
    }
}

pub fn run(config: SiteConfig, options: AppOptions) -> Result<()> {
    config.validate().context("invalid site configuration")?;

    let mut window: PistonWindow = WindowSettings::new("moonshot", [options.width, options.height])
        .exit_on_esc(true)
        .build()
        .map_err(|e| anyhow!("failed to open window: {e}"))?;

    let mut glyphs = if options.font.exists() {
        match window.load_font(&options.font) {
            Ok(glyphs) => Some(glyphs),
            Err(e) => {
                warn!(path = %options.font.display(), error = ?e, "could not load font");
                None
            }
        }
    } else {
        warn!(path = %options.font.display(), "font file not found, stats bar disabled");
        None
    };
    let hit_radius = measure_hit_radius(glyphs.as_mut());

    let store = ThemeStore::new(&options.theme_file);
    let mut theme = store.load_or_default();

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let size = window.size();
    let mut canvas = canvas_bounds(size.width, size.height);
    let mut demos = Demos::new(&config, canvas, hit_radius, &mut rng)?;
    let mut active = options.demo;
    let mut dragging = false;

    info!(?active, ?theme, hit_radius, "starting moonshot");

    while let Some(e) = window.next() {
        if let Some(args) = e.resize_args() {
            let [width, height] = args.window_size;
            let resized = canvas_bounds(width, height);
            if resized != canvas {
                canvas = resized;
                for demo in [Demo::Rocket, Demo::Ant, Demo::Control] {
                    if let Err(err) = demos.reset(demo, canvas, hit_radius, &mut rng) {
                        warn!(?demo, error = %err, "window too small to reset demo");
                    }
                }
                debug!(width, height, "reinitialized demos after resize");
            }
        }

        match e.press_args() {
            Some(Button::Keyboard(key)) => match key {
                Key::D1 => active = Demo::Rocket,
                Key::D2 => active = Demo::Ant,
                Key::D3 => active = Demo::Control,
                Key::T => {
                    theme = theme.toggle();
                    if let Err(err) = store.save(theme) {
                        warn!(error = %err, "theme not saved");
                    }
                    info!(?theme, "theme toggled");
                }
                Key::R => {
                    if let Err(err) = demos.reset(active, canvas, hit_radius, &mut rng) {
                        warn!(?active, error = %err, "reset failed");
                    }
                }
                _ => {}
            },
            Some(Button::Mouse(MouseButton::Left)) => dragging = true,
            _ => {}
        }
        if let Some(Button::Mouse(MouseButton::Left)) = e.release_args() {
            dragging = false;
        }
        if let Some([_, y]) = e.mouse_cursor_args() {
            if dragging && active == Demo::Control {
                demos
                    .beam
                    .set_setpoint(setpoint_from_cursor(y - STATS_AREA_HEIGHT, canvas));
            }
        }

        if e.render_args().is_some() {
            demos.tick(active, &mut rng);
            let palette = theme.palette();
            let status = demos.status(active);
            window.draw_2d(&e, |c, g, device| {
                clear(palette.background, g);

                if let Some(ref mut glyphs) = glyphs {
                    let drawn = text::Text::new_color(palette.text_secondary, STATS_FONT_SIZE).draw(
                        &status,
                        glyphs,
                        &c.draw_state,
                        c.transform.trans(10.0, 20.0),
                        g,
                    );
                    if drawn.is_err() {
                        debug!("stats text failed to render");
                    }
                    glyphs.factory.encoder.flush(device);
                }

                let sim_transform = c.transform.trans(0.0, STATS_AREA_HEIGHT);
                match active {
                    Demo::Rocket => draw_rocket_demo(&demos.engine, palette, sim_transform, g),
                    Demo::Ant => draw_ant_demo(&demos.ant, palette, sim_transform, g),
                    Demo::Control => draw_beam_demo(&demos.beam, canvas, palette, sim_transform, g),
                }
            });
        }
    }

    info!(
        generations = demos.engine.stats().generations_run,
        hits = demos.engine.stats().targets_reached,
        "window closed"
    );
    Ok(())
}
