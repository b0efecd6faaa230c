//! Breakout prototype: paddle, ball and a wall of bricks in y-down pixel space.

use glam::{vec2, Vec2};

use crate::collision::{circle_intersects_rect, Rect};

pub const SCREEN_SIZE: Vec2 = Vec2::new(800., 600.);
pub const PADDLE_SPEED: f32 = 400.;
/// Horizontal ball speed when it hits the very edge of the paddle.
pub const PADDLE_DEFLECTION: f32 = 300.;

const BRICK_COLUMNS: usize = 10;
const BRICK_ROWS: usize = 5;
const BRICK_SIZE: Vec2 = Vec2::new(60., 20.);
const BRICK_OFFSET: Vec2 = Vec2::new(50., 50.);
const BRICK_SPACING: f32 = 8.;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Brick {
    pub rect: Rect,
    pub destroyed: bool,
    /// Solid bricks bounce the ball but never break.
    pub solid: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ball {
    /// Top-left corner of the ball's bounding square.
    pub position: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
}

impl Ball {
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.radius)
    }

    pub fn hits(&self, rect: &Rect) -> bool {
        circle_intersects_rect(self.center(), self.radius, rect)
    }
}

#[derive(Debug, Clone)]
pub struct Breakout {
    pub paddle: Rect,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub game_over: bool,
}

impl Default for Breakout {
    fn default() -> Self {
        Self::new()
    }
}

impl Breakout {
    pub fn new() -> Self {
        let paddle_size = vec2(100., 20.);
        let radius = 10.;
        let bricks = (0..BRICK_ROWS)
            .flat_map(|row| (0..BRICK_COLUMNS).map(move |col| (row, col)))
            .map(|(row, col)| Brick {
                rect: Rect::new(
                    BRICK_OFFSET
                        + vec2(col as f32, row as f32) * (BRICK_SIZE + BRICK_SPACING),
                    BRICK_SIZE,
                ),
                destroyed: false,
                solid: false,
            })
            .collect();
        Self {
            paddle: Rect::new(
                vec2((SCREEN_SIZE.x - paddle_size.x) * 0.5, SCREEN_SIZE.y - 60.),
                paddle_size,
            ),
            ball: Ball {
                position: SCREEN_SIZE * 0.5 - Vec2::splat(radius),
                radius,
                velocity: vec2(200., -250.),
            },
            bricks,
            game_over: false,
        }
    }

    pub fn restart(&mut self) {
        tracing::info!("Restarting");
        *self = Self::new();
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| !b.destroyed).count()
    }

    /// Advance one step. `paddle_axis` is -1 for left and 1 for right. Does nothing once the
    /// game is over.
    pub fn update(&mut self, dt: f32, paddle_axis: f32) {
        if self.game_over {
            return;
        }

        let paddle = &mut self.paddle;
        paddle.position.x = (paddle.position.x + paddle_axis * PADDLE_SPEED * dt)
            .clamp(0., SCREEN_SIZE.x - paddle.size.x);

        let ball = &mut self.ball;
        ball.position += ball.velocity * dt;
        let diameter = ball.radius * 2.;
        if ball.position.x <= 0. {
            ball.position.x = 0.;
            ball.velocity.x = -ball.velocity.x;
        }
        if ball.position.x + diameter >= SCREEN_SIZE.x {
            ball.position.x = SCREEN_SIZE.x - diameter;
            ball.velocity.x = -ball.velocity.x;
        }
        if ball.position.y <= 0. {
            ball.position.y = 0.;
            ball.velocity.y = -ball.velocity.y;
        }
        if ball.position.y >= SCREEN_SIZE.y {
            tracing::info!(bricks_left = self.bricks_left(), "Game over");
            self.game_over = true;
        }

        if self.ball.hits(&self.paddle) {
            let half_width = self.paddle.size.x * 0.5;
            let offset = (self.ball.center().x - self.paddle.center().x) / half_width;
            self.ball.velocity.y = -self.ball.velocity.y.abs();
            self.ball.velocity.x = offset * PADDLE_DEFLECTION;
        }

        let ball = &mut self.ball;
        if let Some(brick) = self
            .bricks
            .iter_mut()
            .find(|brick| !brick.destroyed && ball.hits(&brick.rect))
        {
            if !brick.solid {
                brick.destroyed = true;
            }
            ball.velocity.y = -ball.velocity.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout() {
        let game = Breakout::new();
        assert_eq!(game.paddle.position, vec2(350., 540.));
        assert_eq!(game.ball.position, vec2(390., 290.));
        assert_eq!(game.ball.center(), vec2(400., 300.));
        assert_eq!(game.bricks.len(), 50);
        assert_eq!(game.bricks[11].rect.position, vec2(118., 78.));
        assert_eq!(game.bricks_left(), 50);
    }

    #[test]
    fn paddle_is_clamped() {
        let mut game = Breakout::new();
        game.ball.velocity = Vec2::ZERO;
        game.update(10., -1.);
        assert_eq!(game.paddle.position.x, 0.);
        game.update(10., 1.);
        assert_eq!(game.paddle.position.x, 700.);
    }

    #[test]
    fn ball_reflects_off_walls() {
        let mut game = Breakout::new();
        game.ball.position = vec2(785., 300.);
        game.ball.velocity = vec2(200., 0.);
        game.update(0.1, 0.);
        assert_eq!(game.ball.position.x, 780.);
        assert_eq!(game.ball.velocity.x, -200.);

        game.ball.position = vec2(300., 5.);
        game.ball.velocity = vec2(0., -100.);
        game.bricks.clear();
        game.update(0.1, 0.);
        assert_eq!(game.ball.position.y, 0.);
        assert_eq!(game.ball.velocity.y, 100.);
    }

    #[test]
    fn paddle_deflects_by_hit_offset() {
        let mut game = Breakout::new();
        // Ball centre lands 25 px right of the paddle centre.
        game.ball.position = vec2(415., 522.);
        game.ball.velocity = vec2(0., 10.);
        game.update(0.1, 0.);
        assert_eq!(game.ball.velocity.y, -10.);
        assert!((game.ball.velocity.x - 150.).abs() < 1e-4);
    }

    #[test]
    fn one_brick_per_update() {
        let mut game = Breakout::new();
        // Touches bricks 0 and 1 at once, in the gap between them.
        game.ball.position = vec2(104., 65.);
        game.ball.velocity = vec2(0., -1.);
        game.update(0.001, 0.);
        assert_eq!(game.bricks_left(), 49);
        assert!(game.bricks[0].destroyed);
        assert!(!game.bricks[1].destroyed);
        assert!(game.ball.velocity.y > 0.);
    }

    #[test]
    fn solid_bricks_survive() {
        let mut game = Breakout::new();
        game.bricks[0].solid = true;
        game.ball.position = vec2(60., 50.);
        game.ball.velocity = vec2(0., -1.);
        game.update(0.001, 0.);
        assert_eq!(game.bricks_left(), 50);
        assert!(game.ball.velocity.y > 0.);
    }

    #[test]
    fn game_over_freezes_until_restart() {
        let mut game = Breakout::new();
        game.ball.position = vec2(100., 599.);
        game.ball.velocity = vec2(0., 100.);
        game.update(0.1, 0.);
        assert!(game.game_over);

        let frozen = game.ball;
        game.update(0.1, 1.);
        assert_eq!(game.ball, frozen);

        game.restart();
        assert!(!game.game_over);
        assert_eq!(game.ball.position, vec2(390., 290.));
    }
}
