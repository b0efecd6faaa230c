//! Walkable room with solid walls and interactable triggers.

use std::fmt;

use glam::{vec3, Mat4, Quat, Vec2, Vec3};

use crate::collision::Aabb;

const MOVE_EPSILON: f32 = 1e-4;
const INTERACT_RADIUS: f32 = 2.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    Floor,
    Wall,
    Box,
    Npc,
    Door,
}

#[derive(Debug, Clone)]
pub struct GameObject {
    pub name: &'static str,
    pub kind: ObjectKind,
    pub position: Vec3,
    /// Radians around +Y.
    pub yaw: f32,
    pub scale: Vec3,
    pub half_extents: Vec3,
    /// Blocks player movement.
    pub solid: bool,
    /// Can be interacted with from close by.
    pub trigger: bool,
}

impl GameObject {
    /// Scale, then rotate around Y, then translate.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(self.yaw),
            self.position,
        )
    }

    pub fn collider(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub objects: Vec<GameObject>,
}

impl Scene {
    pub fn collision_room() -> Self {
        let object = |name, kind, position, scale, half_extents, solid, trigger| GameObject {
            name,
            kind,
            position,
            yaw: 0.,
            scale,
            half_extents,
            solid,
            trigger,
        };
        let side_wall_scale = vec3(0.5, 4., 16.);
        let side_wall_half = vec3(0.25, 2., 8.);
        Self {
            objects: vec![
                // The floor collides with nothing; there is no gravity to stand on it.
                object(
                    "Floor",
                    ObjectKind::Floor,
                    vec3(0., -1., 0.),
                    vec3(20., 0.2, 20.),
                    vec3(10., 0.1, 10.),
                    false,
                    false,
                ),
                object(
                    "BackWall",
                    ObjectKind::Wall,
                    vec3(0., 0., -8.),
                    vec3(16., 4., 0.5),
                    vec3(8., 2., 0.25),
                    true,
                    false,
                ),
                object(
                    "LeftWall",
                    ObjectKind::Wall,
                    vec3(-8., 0., 0.),
                    side_wall_scale,
                    side_wall_half,
                    true,
                    false,
                ),
                object(
                    "RightWall",
                    ObjectKind::Wall,
                    vec3(8., 0., 0.),
                    side_wall_scale,
                    side_wall_half,
                    true,
                    false,
                ),
                object(
                    "Box",
                    ObjectKind::Box,
                    vec3(2., -0.5, -2.),
                    vec3(2., 1., 2.),
                    vec3(1., 0.5, 1.),
                    true,
                    false,
                ),
                object(
                    "NPC",
                    ObjectKind::Npc,
                    vec3(-4., -0.5, -3.),
                    vec3(2., 2., 2.),
                    vec3(0.6, 0.9, 0.6),
                    false,
                    true,
                ),
                object(
                    "Door",
                    ObjectKind::Door,
                    vec3(0., -0.5, -7.5),
                    vec3(3., 4., 0.3),
                    vec3(1.5, 2., 0.15),
                    true,
                    true,
                ),
            ],
        }
    }

    pub fn is_blocked(&self, collider: &Aabb) -> bool {
        self.objects
            .iter()
            .filter(|obj| obj.solid)
            .any(|obj| obj.collider().intersects(collider))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Interaction {
    Talk,
    DoorOpened,
    DoorClosed,
    Other(&'static str),
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Talk => write!(f, "You talk to the NPC."),
            Self::DoorOpened => write!(f, "The door opens and you can walk through."),
            Self::DoorClosed => write!(f, "The door is now closed."),
            Self::Other(name) => write!(f, "You interact with: {}", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    pub position: Vec3,
    pub scale: Vec3,
    pub half_extents: Vec3,
    pub speed: f32,
    /// Index into the scene objects of the nearest trigger in reach.
    pub current_interactable: Option<usize>,
}

impl PlayerController {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            scale: vec3(1., 2., 1.),
            half_extents: vec3(0.5, 1., 0.5),
            speed: 4.,
            current_interactable: None,
        }
    }

    pub fn collider(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// Move along the horizontal `forward`/`right` vectors. `axes` holds the strafe (x) and
    /// forward (y) inputs in -1..=1.
    pub fn update(&mut self, dt: f32, axes: Vec2, forward: Vec3, right: Vec3, scene: &Scene) {
        let dir = (forward * axes.y + right * axes.x).normalize_or_zero();
        let desired = dir * self.speed * dt;
        self.move_with_collision(desired, scene);
        self.update_interactable(scene);
    }

    /// X then Z, reverting each axis on its own so the player slides along walls.
    fn move_with_collision(&mut self, desired: Vec3, scene: &Scene) {
        for step in [Vec3::new(desired.x, 0., 0.), Vec3::new(0., 0., desired.z)] {
            if step.abs().max_element() <= MOVE_EPSILON {
                continue;
            }
            self.position += step;
            if scene.is_blocked(&self.collider()) {
                self.position -= step;
            }
        }
    }

    fn update_interactable(&mut self, scene: &Scene) {
        self.current_interactable = scene
            .objects
            .iter()
            .enumerate()
            .filter(|(_, obj)| obj.trigger)
            .map(|(i, obj)| (i, obj.position.distance(self.position)))
            .filter(|(_, distance)| *distance < INTERACT_RADIUS)
            .min_by_key(|(_, distance)| float_ord::FloatOrd(*distance))
            .map(|(i, _)| i);
    }

    /// Interact with the current trigger, if any. Doors toggle their solidity.
    pub fn interact(&self, scene: &mut Scene) -> Option<Interaction> {
        let obj = scene.objects.get_mut(self.current_interactable?)?;
        Some(match obj.kind {
            ObjectKind::Npc => Interaction::Talk,
            ObjectKind::Door => {
                obj.solid = !obj.solid;
                if obj.solid {
                    Interaction::DoorClosed
                } else {
                    Interaction::DoorOpened
                }
            }
            _ => Interaction::Other(obj.name),
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    const FORWARD: Vec3 = Vec3::NEG_Z;
    const RIGHT: Vec3 = Vec3::X;

    #[test]
    fn room_layout() {
        let scene = Scene::collision_room();
        assert_eq!(scene.objects.len(), 7);
        let solids = scene.objects.iter().filter(|o| o.solid).count();
        assert_eq!(solids, 5);
        let triggers = scene
            .objects
            .iter()
            .filter(|o| o.trigger)
            .map(|o| o.name)
            .collect::<Vec<_>>();
        assert_eq!(triggers, ["NPC", "Door"]);
    }

    #[test]
    fn player_walks_freely() {
        let scene = Scene::collision_room();
        let mut player = PlayerController::new(vec3(0., 0., 3.));
        player.update(0.5, vec2(0., 1.), FORWARD, RIGHT, &scene);
        assert!(player.position.abs_diff_eq(vec3(0., 0., 1.), 1e-5));
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let scene = Scene::collision_room();
        let mut player = PlayerController::new(vec3(0., 0., 3.));
        player.update(0.25, vec2(1., 1.), FORWARD, RIGHT, &scene);
        assert!((player.position.distance(vec3(0., 0., 3.)) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn walls_block_one_axis_only() {
        let scene = Scene::collision_room();
        // Right wall spans x in 7.75..8.25; the player is 1 wide.
        let mut player = PlayerController::new(vec3(7.2, 0., 0.));
        player.update(0.1, vec2(1., 1.), FORWARD, RIGHT, &scene);
        assert!((player.position.x - 7.2).abs() < 1e-5);
        assert!(player.position.z < -0.2);
    }

    #[test]
    fn nearest_trigger_is_interactable() {
        let mut scene = Scene::collision_room();
        let mut player = PlayerController::new(vec3(-4., 0., -1.5));
        player.update(0., Vec2::ZERO, FORWARD, RIGHT, &scene);
        let npc = player.current_interactable.map(|i| scene.objects[i].name);
        assert_eq!(npc, Some("NPC"));
        assert_eq!(player.interact(&mut scene), Some(Interaction::Talk));

        let mut far = PlayerController::new(vec3(0., 0., 3.));
        far.update(0., Vec2::ZERO, FORWARD, RIGHT, &scene);
        assert_eq!(far.current_interactable, None);
        assert_eq!(far.interact(&mut scene), None);
    }

    #[test]
    fn door_toggles_solidity() {
        let mut scene = Scene::collision_room();
        let mut player = PlayerController::new(vec3(0., 0., -6.7));

        // Closed door stops the player.
        player.update(0.1, vec2(0., 1.), FORWARD, RIGHT, &scene);
        assert!((player.position.z - -6.7).abs() < 1e-5);

        assert_eq!(player.interact(&mut scene), Some(Interaction::DoorOpened));
        assert_eq!(
            Interaction::DoorOpened.to_string(),
            "The door opens and you can walk through."
        );
        player.update(0.1, vec2(0., 1.), FORWARD, RIGHT, &scene);
        assert!(player.position.z < -7.0);

        assert_eq!(player.interact(&mut scene), Some(Interaction::DoorClosed));
    }
}
