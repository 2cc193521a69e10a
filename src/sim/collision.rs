//! Collision geometry
//!
//! Entities are hit-tested as axis-aligned ellipses, projectiles and pickups
//! as circles. Walls are the edges of the rectangular world.

use glam::Vec2;

use super::state::WorldBounds;

/// Result of a wall check
#[derive(Debug, Clone)]
pub struct WallContact {
    /// Whether the circle crossed a boundary while moving outward
    pub hit: bool,
    /// Position clamped back inside the world
    pub clamped: Vec2,
    /// Direction with every crossed component reflected
    pub reflected: Vec2,
}

impl WallContact {
    pub fn miss(pos: Vec2, dir: Vec2) -> Self {
        Self {
            hit: false,
            clamped: pos,
            reflected: dir,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Check a moving circle against the world edges.
///
/// Only crossings in the direction of travel count, so a shot entering the
/// world from outside is not treated as a wall contact. A corner hit reflects
/// both components but is still a single contact.
pub fn circle_wall_contact(pos: Vec2, radius: f32, dir: Vec2, bounds: &WorldBounds) -> WallContact {
    let mut contact = WallContact::miss(pos, dir);

    if pos.x - radius < 0.0 && dir.x < 0.0 {
        contact.hit = true;
        contact.clamped.x = radius;
        contact.reflected = reflect_velocity(contact.reflected, Vec2::X);
    } else if pos.x + radius > bounds.width && dir.x > 0.0 {
        contact.hit = true;
        contact.clamped.x = bounds.width - radius;
        contact.reflected = reflect_velocity(contact.reflected, -Vec2::X);
    }

    if pos.y - radius < 0.0 && dir.y < 0.0 {
        contact.hit = true;
        contact.clamped.y = radius;
        contact.reflected = reflect_velocity(contact.reflected, Vec2::Y);
    } else if pos.y + radius > bounds.height && dir.y > 0.0 {
        contact.hit = true;
        contact.clamped.y = bounds.height - radius;
        contact.reflected = reflect_velocity(contact.reflected, -Vec2::Y);
    }

    contact
}

/// Circle vs axis-aligned ellipse.
///
/// The ellipse is grown by the circle radius and the circle center is tested
/// for containment, which is exact on the axes and slightly generous on the
/// diagonals.
#[inline]
pub fn circle_ellipse_overlap(circle: Vec2, radius: f32, center: Vec2, semi_axes: Vec2) -> bool {
    let grown = semi_axes + Vec2::splat(radius.max(0.0));
    point_in_ellipse(circle, center, grown)
}

/// Ellipse vs ellipse, using the same grown-axes approximation
#[inline]
pub fn ellipses_overlap(a: Vec2, a_axes: Vec2, b: Vec2, b_axes: Vec2) -> bool {
    point_in_ellipse(a, b, a_axes + b_axes)
}

/// Whether `p` lies inside the ellipse at `center` with `semi_axes`
pub fn point_in_ellipse(p: Vec2, center: Vec2, semi_axes: Vec2) -> bool {
    if semi_axes.x <= 0.0 || semi_axes.y <= 0.0 {
        return false;
    }
    let d = (p - center) / semi_axes;
    d.length_squared() <= 1.0
}

/// Clamp a point into the world, keeping `pad` from every edge
pub fn clamp_to_bounds(p: Vec2, bounds: &WorldBounds, pad: f32) -> Vec2 {
    let pad_x = pad.min(bounds.width / 2.0);
    let pad_y = pad.min(bounds.height / 2.0);
    Vec2::new(
        p.x.clamp(pad_x, bounds.width - pad_x),
        p.y.clamp(pad_y, bounds.height - pad_y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> WorldBounds {
        WorldBounds::new(100.0, 100.0)
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_wall_contact_right_edge() {
        let c = circle_wall_contact(Vec2::new(108.0, 50.0), 5.0, Vec2::new(1.0, 0.0), &bounds());
        assert!(c.hit);
        assert_eq!(c.clamped.x, 95.0);
        assert!(c.reflected.x < 0.0);
    }

    #[test]
    fn test_wall_contact_ignores_inbound() {
        // Entering from above while moving down
        let c = circle_wall_contact(Vec2::new(50.0, -10.0), 4.0, Vec2::new(0.0, 1.0), &bounds());
        assert!(!c.hit);
    }

    #[test]
    fn test_corner_reflects_both() {
        let c = circle_wall_contact(Vec2::new(-1.0, -1.0), 2.0, Vec2::new(-0.6, -0.8), &bounds());
        assert!(c.hit);
        assert!(c.reflected.x > 0.0 && c.reflected.y > 0.0);
    }

    #[test]
    fn test_circle_ellipse_overlap() {
        let center = Vec2::new(50.0, 50.0);
        let axes = Vec2::new(10.0, 20.0);
        assert!(circle_ellipse_overlap(Vec2::new(50.0, 50.0), 1.0, center, axes));
        // Taller than wide: reaches further vertically
        assert!(circle_ellipse_overlap(Vec2::new(50.0, 72.0), 3.0, center, axes));
        assert!(!circle_ellipse_overlap(Vec2::new(64.0, 50.0), 3.0, center, axes));
    }

    #[test]
    fn test_ellipses_overlap() {
        let axes = Vec2::new(5.0, 8.0);
        assert!(ellipses_overlap(Vec2::ZERO, axes, Vec2::new(9.0, 0.0), axes));
        assert!(!ellipses_overlap(Vec2::ZERO, axes, Vec2::new(11.0, 0.0), axes));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let p = clamp_to_bounds(Vec2::new(-20.0, 140.0), &bounds(), 16.0);
        assert_eq!(p, Vec2::new(16.0, 84.0));
    }
}
