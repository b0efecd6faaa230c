//! Software rasterizer exercises drawing into a CPU `0xRRGGBB` surface.

use glam::{vec2, Vec2};

pub const WHITE: u32 = 0xFFFFFF;
pub const BOUNDS_COLOR: u32 = 0x444444;

const ZOOM_FACTOR: f32 = 0.1;
const PAN_FACTOR: f32 = 0.05;
const MIN_RANGE: f32 = 1e-3;

pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Row-major pixels, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Out of bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then_some(x + y * self.width)
    }

    /// Bresenham line, both endpoints included.
    pub fn line(&mut self, (mut x0, mut y0): (i32, i32), (x1, y1): (i32, i32), color: u32) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Closed polygon outline.
    pub fn polygon(&mut self, points: &[(i32, i32)], color: u32) {
        if points.is_empty() {
            return;
        }
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(a, b, color);
        }
    }

    /// Bytes in B, G, R, A order with opaque alpha, ready for a BGRA upload.
    pub fn to_bgra(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&c| {
                let [_, r, g, b] = c.to_be_bytes();
                [b, g, r, 255]
            })
            .collect()
    }
}

/// Visible world rectangle, mapped onto the surface with Y pointing up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WorldView {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for WorldView {
    fn default() -> Self {
        Self {
            min: Vec2::splat(-2.),
            max: Vec2::splat(2.),
        }
    }
}

impl WorldView {
    pub fn range(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn tx(&self, x: f32, width: usize) -> i32 {
        let u = (x - self.min.x) / (self.max.x - self.min.x).max(1e-6);
        (u * width.saturating_sub(1) as f32).round() as i32
    }

    pub fn ty(&self, y: f32, height: usize) -> i32 {
        let u = (self.max.y - y) / (self.max.y - self.min.y).max(1e-6);
        (u * height.saturating_sub(1) as f32).round() as i32
    }

    pub fn to_screen(&self, p: Vec2, surface: &Surface) -> (i32, i32) {
        (self.tx(p.x, surface.width), self.ty(p.y, surface.height))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Grow (`amount` > 0) or shrink the range about the centre by `amount` of itself.
    pub fn zoom_out(&mut self, amount: f32) {
        let center = self.center();
        let half = self.range() * (1. + amount) * 0.5;
        self.min = center - half;
        self.max = center + half;
        self.keep_range();
    }

    /// Move by `amount` of the current range.
    pub fn pan(&mut self, amount: Vec2) {
        let offset = self.range() * amount;
        self.min += offset;
        self.max += offset;
    }

    fn keep_range(&mut self) {
        let range = self.range();
        let center = self.center();
        if range.x < MIN_RANGE {
            self.min.x = center.x - MIN_RANGE / 2.;
            self.max.x = center.x + MIN_RANGE / 2.;
        }
        if range.y < MIN_RANGE {
            self.min.y = center.y - MIN_RANGE / 2.;
            self.max.y = center.y + MIN_RANGE / 2.;
        }
    }
}

/// Held controls for the world window, sampled once per update.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewControls {
    pub zoom_in: bool,
    pub zoom_out: bool,
    /// Arrow keys as an axis pair; +y pans up.
    pub pan: Vec2,
    pub reset: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Exercise {
    BlueSquare,
    Gradient,
    SpinningSquare,
    WorldWindow,
}

impl Exercise {
    pub fn from_number(n: u32) -> Option<Self> {
        Some(match n {
            1 => Self::BlueSquare,
            2 => Self::Gradient,
            3 => Self::SpinningSquare,
            4 => Self::WorldWindow,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RasterDemo {
    pub surface: Surface,
    pub exercise: Exercise,
    pub view: WorldView,
    /// Radians; the square spins at 1 rad/s.
    pub angle: f32,
    frame: u64,
}

impl RasterDemo {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            surface: Surface::new(width, height),
            exercise: Exercise::WorldWindow,
            view: WorldView::default(),
            angle: 0.,
            frame: 0,
        }
    }

    pub fn select(&mut self, exercise: Exercise) {
        if exercise != self.exercise {
            tracing::info!(?exercise, "Switching exercise");
            self.exercise = exercise;
        }
    }

    /// `dt` in seconds. Zoom and pan rates are per 60 Hz frame.
    pub fn update(&mut self, dt: f32, controls: ViewControls) {
        if matches!(
            self.exercise,
            Exercise::SpinningSquare | Exercise::WorldWindow
        ) {
            self.angle += dt;
        }
        if self.exercise != Exercise::WorldWindow {
            return;
        }
        if controls.reset {
            self.view.reset();
        }
        let frames = dt * 60.;
        // Both zooms start from the same range, so zooming out wins when both are held.
        let zoom = match (controls.zoom_in, controls.zoom_out) {
            (_, true) => ZOOM_FACTOR,
            (true, false) => -ZOOM_FACTOR,
            (false, false) => 0.,
        };
        if zoom != 0. {
            self.view.zoom_out(zoom * frames);
        }
        self.view.pan(controls.pan * PAN_FACTOR * frames);
        self.view.keep_range();
    }

    /// Redraw the surface for the current exercise.
    pub fn draw(&mut self) {
        self.surface.clear();
        match self.exercise {
            Exercise::BlueSquare => self.blue_square(),
            Exercise::Gradient => self.gradient(),
            Exercise::SpinningSquare => self.square(WorldView::default(), 1.),
            Exercise::WorldWindow => {
                let scale = 1. + 0.15 * (self.angle * 0.7).sin();
                self.square(self.view, scale);
                self.bounds();
            }
        }
        self.frame += 1;
    }

    fn blue_square(&mut self) {
        const SIZE: i32 = 300;
        let left = self.surface.width as i32 / 2 - SIZE / 2;
        let top = self.surface.height as i32 / 2 - SIZE / 2;
        for y in 0..SIZE {
            for x in 0..SIZE {
                let blue = (255. * x as f64 / (SIZE - 1) as f64) as u8;
                self.surface.set(left + x, top + y, rgb(0, 0, blue));
            }
        }
    }

    fn gradient(&mut self) {
        let (w, h) = (self.surface.width, self.surface.height);
        let blue = (127.5 * (1. + (self.frame as f64 * 0.05).sin())) as u8;
        for y in 0..h {
            let g = (255. * y as f64 / (h.max(2) - 1) as f64) as u8;
            for x in 0..w {
                let r = (255. * x as f64 / (w.max(2) - 1) as f64) as u8;
                self.surface.pixels[x + y * w] = rgb(r, g, blue);
            }
        }
    }

    fn square(&mut self, view: WorldView, scale: f32) {
        let (s, c) = self.angle.sin_cos();
        let points = [
            vec2(-0.5, -0.5),
            vec2(0.5, -0.5),
            vec2(0.5, 0.5),
            vec2(-0.5, 0.5),
        ]
        .map(|p| {
            let p = p * scale;
            let rotated = vec2(p.x * c - p.y * s, p.x * s + p.y * c);
            view.to_screen(rotated, &self.surface)
        });
        self.surface.polygon(&points, WHITE);
    }

    fn bounds(&mut self) {
        let view = self.view;
        let corners = [
            vec2(view.min.x, view.max.y),
            view.max,
            vec2(view.max.x, view.min.y),
            view.min,
        ]
        .map(|p| view.to_screen(p, &self.surface));
        self.surface.polygon(&corners, BOUNDS_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bresenham_endpoints() {
        let mut surface = Surface::new(10, 10);
        surface.line((1, 1), (8, 4), WHITE);
        assert_eq!(surface.get(1, 1), Some(WHITE));
        assert_eq!(surface.get(8, 4), Some(WHITE));
        // One pixel per column on a shallow line.
        let lit = surface.pixels().iter().filter(|&&p| p == WHITE).count();
        assert_eq!(lit, 8);
    }

    #[test]
    fn lines_are_clipped() {
        let mut surface = Surface::new(4, 4);
        surface.line((-5, 0), (10, 0), WHITE);
        assert_eq!(surface.pixels()[..4], [WHITE; 4]);
        assert_eq!(surface.get(-1, 0), None);
    }

    #[test]
    fn bgra_bytes() {
        let mut surface = Surface::new(1, 1);
        surface.set(0, 0, rgb(0x11, 0x22, 0x33));
        assert_eq!(surface.to_bgra(), [0x33, 0x22, 0x11, 255]);
    }

    #[test]
    fn world_mapping_inverts_y() {
        let view = WorldView::default();
        assert_eq!(view.tx(-2., 800), 0);
        assert_eq!(view.tx(2., 800), 799);
        assert_eq!(view.tx(0., 800), 400);
        assert_eq!(view.ty(2., 600), 0);
        assert_eq!(view.ty(-2., 600), 599);
    }

    #[test]
    fn zoom_and_pan() {
        let mut view = WorldView::default();
        view.zoom_out(-0.1);
        assert!(view.range().abs_diff_eq(Vec2::splat(3.6), 1e-6));
        assert_eq!(view.center(), Vec2::ZERO);
        view.pan(vec2(0.05, 0.));
        assert!((view.center().x - 0.18).abs() < 1e-6);
        view.reset();
        assert_eq!(view, WorldView::default());
    }

    #[test]
    fn zoom_out_wins_when_both_held() {
        let mut demo = RasterDemo::new(8, 8);
        let both = ViewControls {
            zoom_in: true,
            zoom_out: true,
            ..Default::default()
        };
        demo.update(1. / 60., both);
        assert!(demo.view.range().abs_diff_eq(Vec2::splat(4.4), 1e-5));
        assert_eq!(demo.view.center(), Vec2::ZERO);
    }

    #[test]
    fn degenerate_surfaces() {
        let view = WorldView::default();
        assert_eq!(view.tx(2., 0), 0);
        assert_eq!(view.ty(-2., 0), 0);
        assert_eq!(view.tx(2., 1), 0);

        let mut surface = Surface::new(0, 0);
        surface.polygon(&[], WHITE);
        surface.polygon(&[(0, 0), (3, 3)], WHITE);
        assert!(surface.pixels().is_empty());

        let mut demo = RasterDemo::new(0, 0);
        demo.draw();
        assert!(demo.surface.to_bgra().is_empty());
    }

    #[test]
    fn range_never_collapses() {
        let mut demo = RasterDemo::new(8, 8);
        let zoom_in = ViewControls {
            zoom_in: true,
            ..Default::default()
        };
        for _ in 0..1000 {
            demo.update(1. / 60., zoom_in);
        }
        assert!(demo.view.range().x >= MIN_RANGE * 0.999);
        demo.update(0., ViewControls { reset: true, ..Default::default() });
        assert_eq!(demo.view, WorldView::default());
    }

    #[test]
    fn blue_square_columns() {
        let mut demo = RasterDemo::new(800, 600);
        demo.select(Exercise::BlueSquare);
        demo.draw();
        assert_eq!(demo.surface.get(249, 300), Some(0));
        assert_eq!(demo.surface.get(250, 150), Some(0));
        assert_eq!(demo.surface.get(549, 449), Some(255));
        assert_eq!(demo.surface.get(550, 300), Some(0));
    }

    #[test]
    fn gradient_corners() {
        let mut demo = RasterDemo::new(800, 600);
        demo.select(Exercise::Gradient);
        demo.draw();
        // sin(0) gives half blue on the first frame.
        assert_eq!(demo.surface.get(0, 0), Some(rgb(0, 0, 127)));
        assert_eq!(demo.surface.get(799, 599), Some(rgb(255, 255, 127)));
    }

    #[test]
    fn world_window_draws_bounds() {
        let mut demo = RasterDemo::new(800, 600);
        demo.draw();
        assert_eq!(demo.surface.get(0, 0), Some(BOUNDS_COLOR));
        assert_eq!(demo.surface.get(799, 599), Some(BOUNDS_COLOR));
        // Axis-aligned square at angle 0 spans world -0.5..0.5.
        assert_eq!(demo.surface.get(300, 225), Some(WHITE));
    }
}
