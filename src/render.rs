use piston_window::*;

use crate::ant::LangtonsAnt;
use crate::config::Bounds;
use crate::control::BeamDemo;
use crate::evolution::Engine;
use crate::theme::Palette;

const ROCKET_RADIUS: f64 = 3.0;
const TRAIL_RADIUS: f64 = 0.5;
const BEAM_AXIS_X: f64 = 10.0;
const DASH: f64 = 4.0;

pub fn draw_rocket_demo(
    engine: &Engine,
    palette: &Palette,
    transform: math::Matrix2d,
    g: &mut G2d,
) {
    let moon = engine.moon();
    ellipse(
        palette.moon(),
        rectangle::centered_square(moon.position.x, moon.position.y, moon.hit_radius),
        transform,
        g,
    );

    let colors = palette.rocket_colors();
    let color = colors[engine.color_index(colors.len())];
    for rocket in engine.rockets() {
        for pair in rocket.trail.windows(2) {
            line_from_to(
                color,
                TRAIL_RADIUS,
                pair[0].to_array(),
                pair[1].to_array(),
                transform,
                g,
            );
        }
        ellipse(
            color,
            rectangle::centered_square(rocket.position.x, rocket.position.y, ROCKET_RADIUS),
            transform,
            g,
        );
    }
}

pub fn draw_ant_demo(ant: &LangtonsAnt, palette: &Palette, transform: math::Matrix2d, g: &mut G2d) {
    let size = ant.cell_size();
    for (x, y) in ant.black_cells() {
        rectangle(
            palette.text_main,
            [x as f64 * size, y as f64 * size, size, size],
            transform,
            g,
        );
    }
    let (x, y) = ant.ant();
    rectangle(
        palette.highlight,
        [x as f64 * size, y as f64 * size, size, size],
        transform,
        g,
    );
}

/// Beam position trace against the setpoint, full scale being `[-1, 1]`.
pub fn draw_beam_demo(
    demo: &BeamDemo,
    bounds: Bounds,
    palette: &Palette,
    transform: math::Matrix2d,
    g: &mut G2d,
) {
    let half = bounds.height / 2.0;
    let axis = palette.text_secondary;
    let (top, bottom) = ([BEAM_AXIS_X, 0.0], [BEAM_AXIS_X, bounds.height]);
    line_from_to(axis, TRAIL_RADIUS, top, bottom, transform, g);
    line_from_to(axis, TRAIL_RADIUS, [BEAM_AXIS_X, half], [bounds.width, half], transform, g);

    let setpoint_y = half - demo.setpoint() * half;
    let mut x = BEAM_AXIS_X;
    while x < bounds.width {
        let end = (x + DASH).min(bounds.width);
        line_from_to(axis, TRAIL_RADIUS, [x, setpoint_y], [end, setpoint_y], transform, g);
        x += 2.0 * DASH;
    }

    let span = bounds.width - BEAM_AXIS_X;
    let max_points = demo.max_points() as f64;
    let point = |(i, v): (usize, &f64)| {
        [
            BEAM_AXIS_X + i as f64 / max_points * span,
            half - v.clamp(-1.0, 1.0) * half,
        ]
    };
    let trace: Vec<[f64; 2]> = demo.history().iter().enumerate().map(point).collect();
    for pair in trace.windows(2) {
        line_from_to(palette.text_main, TRAIL_RADIUS * 2.0, pair[0], pair[1], transform, g);
    }

    rectangle(
        palette.highlight,
        rectangle::centered_square(bounds.width - 8.0, setpoint_y, 6.0),
        transform,
        g,
    );
}

/// Maps a cursor height on the beam canvas to a setpoint, top being `+1`.
pub fn setpoint_from_cursor(y: f64, bounds: Bounds) -> f64 {
    let half = bounds.height / 2.0;
    (half - y) / half
}
