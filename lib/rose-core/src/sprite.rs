//! Sprite-sheet character: platformer movement driving an Idle/Walk/Run/Jump animator.

use glam::{vec2, Vec2};

pub const WALK_SPEED: f32 = 180.;
pub const RUN_SPEED: f32 = 320.;
pub const JUMP_VELOCITY: f32 = 520.;
pub const GRAVITY: f32 = -1500.;
pub const GROUND_Y: f32 = 300.;

/// Grid of equally sized frames, with a horizontal gap between columns.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteSheet {
    pub frame_size: Vec2,
    pub columns: u32,
    pub rows: u32,
    pub gap: f32,
}

/// Normalized UV rectangle of a frame. A negative width samples the frame mirrored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameUv {
    pub offset: Vec2,
    pub size: Vec2,
}

impl SpriteSheet {
    pub const CHARACTER: Self = Self {
        frame_size: Vec2::new(64., 128.),
        columns: 4,
        rows: 2,
        gap: 60.,
    };

    /// Size of the whole sheet in pixels.
    pub fn size(&self) -> Vec2 {
        let cols = self.columns as f32;
        vec2(
            cols * self.frame_size.x + (cols - 1.) * self.gap,
            self.rows as f32 * self.frame_size.y,
        )
    }

    pub fn frame_uv(&self, col: u32, row: i32, facing_right: bool) -> FrameUv {
        let row = row.rem_euclid(self.rows as i32) as f32;
        let sheet = self.size();
        let mut offset = vec2(
            col as f32 * (self.frame_size.x + self.gap),
            row * self.frame_size.y,
        ) / sheet;
        let mut size = self.frame_size / sheet;
        if !facing_right {
            offset.x += size.x;
            size.x = -size.x;
        }
        FrameUv { offset, size }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PlayerState {
    Idle,
    Walk,
    Run,
    Jump,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Clip {
    pub row: i32,
    pub start_col: u32,
    pub frames: u32,
    pub fps: f32,
    /// Stay on the current frame instead of advancing.
    pub hold_last: bool,
}

impl PlayerState {
    pub fn clip(self) -> Clip {
        match self {
            Self::Idle => Clip {
                row: 0,
                start_col: 0,
                frames: 1,
                fps: 6.,
                hold_last: true,
            },
            Self::Walk => Clip {
                row: 0,
                start_col: 1,
                frames: 3,
                fps: 10.,
                hold_last: false,
            },
            Self::Run => Clip {
                row: 0,
                start_col: 1,
                frames: 3,
                fps: 16.,
                hold_last: false,
            },
            Self::Jump => Clip {
                row: 0,
                start_col: 0,
                frames: 2,
                fps: 12.,
                hold_last: true,
            },
        }
    }
}

/// Keyboard intent for one update.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MovementInput {
    /// -1 for left, 1 for right.
    pub axis: f32,
    pub sprint: bool,
    /// Jump key went down this update.
    pub jump: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub sprint: bool,
    pub facing_right: bool,
    move_axis: f32,
}

impl Movement {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            grounded: true,
            sprint: false,
            facing_right: true,
            move_axis: 0.,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.move_axis.abs() > 0.
    }

    pub fn handle_input(&mut self, input: MovementInput) {
        self.move_axis = input.axis.clamp(-1., 1.);
        self.sprint = input.sprint;
        if self.move_axis != 0. {
            self.facing_right = self.move_axis > 0.;
        }
        if input.jump && self.grounded {
            self.velocity.y = JUMP_VELOCITY;
            self.grounded = false;
        }
    }

    pub fn integrate(&mut self, dt: f32) {
        let speed = if self.sprint { RUN_SPEED } else { WALK_SPEED };
        self.velocity.x = self.move_axis * speed;
        if !self.grounded {
            self.velocity.y += GRAVITY * dt;
        }
        self.position += self.velocity * dt;
        if self.position.y <= GROUND_Y {
            self.position.y = GROUND_Y;
            self.velocity.y = 0.;
            self.grounded = true;
        }
    }
}

/// Frame selection state machine. The applied frame only changes through `play` and `step`.
#[derive(Debug, Clone)]
pub struct Animator {
    pub sheet: SpriteSheet,
    pub facing_right: bool,
    state: PlayerState,
    timer: f32,
    frame: u32,
    current: FrameUv,
}

impl Animator {
    pub fn new(sheet: SpriteSheet) -> Self {
        let mut animator = Self {
            sheet,
            facing_right: true,
            state: PlayerState::Idle,
            timer: 0.,
            frame: 0,
            current: sheet.frame_uv(0, 0, true),
        };
        animator.play(PlayerState::Idle);
        animator
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// The last applied frame.
    pub fn current(&self) -> FrameUv {
        self.current
    }

    pub fn resolve(&mut self, movement: &Movement) {
        let next = if !movement.grounded {
            PlayerState::Jump
        } else if !movement.is_moving() {
            PlayerState::Idle
        } else if movement.sprint {
            PlayerState::Run
        } else {
            PlayerState::Walk
        };
        if next != self.state {
            tracing::trace!(from = ?self.state, to = ?next, "animation state");
            self.play(next);
        }
    }

    pub fn play(&mut self, state: PlayerState) {
        self.state = state;
        self.timer = 0.;
        self.frame = 0;
        let clip = state.clip();
        self.apply(clip.start_col, clip.row);
    }

    pub fn step(&mut self, dt: f32) {
        let clip = self.state.clip();
        if clip.hold_last {
            return;
        }
        self.timer += dt;
        let seconds_per_frame = 1. / clip.fps.max(1.);
        while self.timer >= seconds_per_frame {
            self.timer -= seconds_per_frame;
            self.frame = (self.frame + 1) % clip.frames;
            self.apply(clip.start_col + self.frame, clip.row);
        }
    }

    fn apply(&mut self, col: u32, row: i32) {
        self.current = self.sheet.frame_uv(col, row, self.facing_right);
    }
}

#[derive(Debug, Clone)]
pub struct Character {
    pub movement: Movement,
    pub animator: Animator,
}

impl Default for Character {
    fn default() -> Self {
        Self::new(vec2(400., GROUND_Y))
    }
}

impl Character {
    pub fn new(position: Vec2) -> Self {
        Self {
            movement: Movement::new(position),
            animator: Animator::new(SpriteSheet::CHARACTER),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.movement.position
    }

    pub fn frame_uv(&self) -> FrameUv {
        self.animator.current()
    }

    pub fn update(&mut self, dt: f32, input: MovementInput) {
        self.movement.handle_input(input);
        self.animator.facing_right = self.movement.facing_right;
        self.movement.integrate(dt);
        self.animator.resolve(&self.movement);
        self.animator.step(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right(sprint: bool) -> MovementInput {
        MovementInput {
            axis: 1.,
            sprint,
            jump: false,
        }
    }

    #[test]
    fn sheet_size() {
        assert_eq!(SpriteSheet::CHARACTER.size(), vec2(436., 256.));
    }

    #[test]
    fn frame_uv_with_gap() {
        let sheet = SpriteSheet::CHARACTER;
        let uv = sheet.frame_uv(2, 1, true);
        assert!(uv.offset.abs_diff_eq(vec2(248. / 436., 0.5), 1e-6));
        assert!(uv.size.abs_diff_eq(vec2(64. / 436., 0.5), 1e-6));

        // Rows wrap around the sheet.
        assert_eq!(sheet.frame_uv(2, 3, true), uv);
        assert_eq!(sheet.frame_uv(2, -1, true), uv);
    }

    #[test]
    fn facing_left_mirrors() {
        let sheet = SpriteSheet::CHARACTER;
        let right = sheet.frame_uv(1, 0, true);
        let left = sheet.frame_uv(1, 0, false);
        assert!((left.offset.x - (right.offset.x + right.size.x)).abs() < 1e-6);
        assert_eq!(left.size.x, -right.size.x);
        assert_eq!(left.size.y, right.size.y);
    }

    #[test]
    fn idle_to_walk_to_run() {
        let mut character = Character::default();
        assert_eq!(character.animator.state(), PlayerState::Idle);

        character.update(0.01, right(false));
        assert_eq!(character.animator.state(), PlayerState::Walk);
        assert!((character.position().x - 401.8).abs() < 1e-3);

        character.update(0.01, right(true));
        assert_eq!(character.animator.state(), PlayerState::Run);

        character.update(0.01, MovementInput::default());
        assert_eq!(character.animator.state(), PlayerState::Idle);
        assert_eq!(
            character.frame_uv(),
            SpriteSheet::CHARACTER.frame_uv(0, 0, true)
        );
    }

    #[test]
    fn walk_frames_loop() {
        let mut animator = Animator::new(SpriteSheet::CHARACTER);
        animator.play(PlayerState::Walk);
        assert_eq!(animator.current(), SpriteSheet::CHARACTER.frame_uv(1, 0, true));

        animator.step(0.25);
        assert_eq!(animator.frame(), 2);
        assert_eq!(animator.current(), SpriteSheet::CHARACTER.frame_uv(3, 0, true));

        animator.step(0.1);
        assert_eq!(animator.frame(), 0);
    }

    #[test]
    fn hold_clips_do_not_advance() {
        let mut animator = Animator::new(SpriteSheet::CHARACTER);
        animator.play(PlayerState::Jump);
        animator.step(10.);
        assert_eq!(animator.frame(), 0);
        assert_eq!(animator.current(), SpriteSheet::CHARACTER.frame_uv(0, 0, true));
    }

    #[test]
    fn facing_waits_for_next_frame() {
        let mut animator = Animator::new(SpriteSheet::CHARACTER);
        let before = animator.current();
        animator.facing_right = false;
        assert_eq!(animator.current(), before);
        animator.play(PlayerState::Idle);
        assert_eq!(animator.current(), SpriteSheet::CHARACTER.frame_uv(0, 0, false));
    }

    #[test]
    fn jump_arc_lands_on_ground() {
        let mut character = Character::default();
        let jump = MovementInput {
            jump: true,
            ..Default::default()
        };
        character.update(0.1, jump);
        assert!(!character.movement.grounded);
        assert_eq!(character.animator.state(), PlayerState::Jump);
        assert!((character.position().y - 337.).abs() < 1e-3);

        // No double jump.
        let vy = character.movement.velocity.y;
        character.movement.handle_input(jump);
        assert_eq!(character.movement.velocity.y, vy);

        for _ in 0..20 {
            character.update(0.05, MovementInput::default());
        }
        assert!(character.movement.grounded);
        assert_eq!(character.position().y, GROUND_Y);
        assert_eq!(character.animator.state(), PlayerState::Idle);
    }
}
