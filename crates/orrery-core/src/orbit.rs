use crate::scene::{Color, Vec3};
use crate::world::{Orbit, World};

pub const CATEGORY_COLOR: Color = Color(0x00ffe7);
pub const TASK_PENDING_COLOR: Color = Color(0xffffff);
pub const TASK_DONE_COLOR: Color = Color(0x00ff00);

pub const CATEGORY_SPHERE_RADIUS: f64 = 2.0;
pub const TASK_SPHERE_RADIUS: f64 = 0.4;

/// Advances every task's orbit angle by its speed. Runs once per animation
/// tick, unconditionally; the tick source carries no fixed interval.
pub fn advance(world: &mut World) {
    for category in world.categories_mut() {
        for task in &mut category.tasks {
            task.orbit.angle += task.orbit.speed;
        }
    }
}

/// Current position of a task orbiting `center`. The vertical component runs
/// at double frequency so satellites bob instead of orbiting in a flat plane.
pub fn task_position(center: Vec3, orbit: &Orbit) -> Vec3 {
    Vec3 {
        x: center.x + orbit.angle.cos() * orbit.radius,
        y: center.y + (orbit.angle * 2.0).sin() * 0.5,
        z: center.z + orbit.angle.sin() * orbit.radius,
    }
}

pub fn task_color(done: bool) -> Color {
    if done { TASK_DONE_COLOR } else { TASK_PENDING_COLOR }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit(angle: f64) -> Orbit {
        Orbit {
            angle,
            radius: 4.0,
            speed: 0.015,
        }
    }

    #[test]
    fn advance_moves_every_angle_by_its_speed() {
        let mut world = World::with_seed(7);
        let id = world
            .create_category("Health", "category", &["Run", "Sleep"])
            .expect("create category");
        let before: Vec<f64> = world
            .category(id)
            .expect("category")
            .tasks
            .iter()
            .map(|task| task.orbit.angle)
            .collect();

        advance(&mut world);

        for (task, previous) in world.category(id).expect("category").tasks.iter().zip(before) {
            assert!((task.orbit.angle - (previous + task.orbit.speed)).abs() < 1e-12);
        }
    }

    #[test]
    fn position_orbits_in_plane_and_bobs_vertically() {
        let center = Vec3::new(10.0, -2.0, 5.0);

        let at_zero = task_position(center, &orbit(0.0));
        assert!((at_zero.x - 14.0).abs() < 1e-12);
        assert!((at_zero.z - 5.0).abs() < 1e-12);
        assert!((at_zero.y - (-2.0)).abs() < 1e-12);

        let quarter = task_position(center, &orbit(std::f64::consts::FRAC_PI_2));
        assert!((quarter.x - 10.0).abs() < 1e-12);
        assert!((quarter.z - 9.0).abs() < 1e-12);
        // sin(2 * pi/2) = 0: the bob crosses the plane again at the quarter turn.
        assert!((quarter.y - (-2.0)).abs() < 1e-12);

        let eighth = task_position(center, &orbit(std::f64::consts::FRAC_PI_4));
        assert!((eighth.y - (-1.5)).abs() < 1e-12);
    }

    #[test]
    fn color_tracks_done_state() {
        assert_eq!(task_color(false), TASK_PENDING_COLOR);
        assert_eq!(task_color(true), TASK_DONE_COLOR);
    }
}
