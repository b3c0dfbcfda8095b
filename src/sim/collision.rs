//! Circle overlap tests for the reference world
//!
//! Every collider in the world is a disc. A query is a disc too, so an
//! overlap test is a distance check plus a contact point for steering.

use glam::Vec2;

/// Result of a circle/circle overlap check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Point on the collider nearest the query centre
    pub point: Vec2,
    /// Distance between the two centres
    pub distance: f32,
}

/// Check whether a query disc overlaps a collider disc
///
/// When the query centre lies outside the collider the contact point is on
/// the collider's rim, facing the query. When it lies inside, the collider
/// centre is reported so a steer-away direction still exists.
pub fn circle_overlap(
    center: Vec2,
    radius: f32,
    collider_pos: Vec2,
    collider_radius: f32,
) -> Option<Contact> {
    let offset = center - collider_pos;
    let distance = offset.length();
    if distance > radius + collider_radius {
        return None;
    }

    let point = if distance > collider_radius {
        collider_pos + offset / distance * collider_radius
    } else {
        collider_pos
    };
    Some(Contact { point, distance })
}

/// Keep `pos` within `spacing` of `leader`, dragging it along the line between them
pub fn follow(pos: Vec2, leader: Vec2, spacing: f32) -> Vec2 {
    let offset = pos - leader;
    let distance = offset.length();
    if distance <= spacing || distance == 0.0 {
        pos
    } else {
        leader + offset / distance * spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_when_far_apart() {
        assert!(circle_overlap(Vec2::ZERO, 1.0, Vec2::new(3.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_touching_counts_as_overlap() {
        let contact = circle_overlap(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0).unwrap();
        assert!((contact.point - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert!((contact.distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_contact_point_on_rim_facing_query() {
        let contact = circle_overlap(Vec2::ZERO, 2.0, Vec2::new(0.0, 2.0), 0.5).unwrap();
        assert!((contact.point - Vec2::new(0.0, 1.5)).length() < 1e-6);
    }

    #[test]
    fn test_centre_inside_collider_reports_collider_centre() {
        let collider = Vec2::new(0.2, 0.1);
        let contact = circle_overlap(Vec2::ZERO, 0.5, collider, 1.0).unwrap();
        assert_eq!(contact.point, collider);
    }

    #[test]
    fn test_follow_keeps_spacing() {
        let next = follow(Vec2::new(-3.0, 0.0), Vec2::ZERO, 0.5);
        assert!((next - Vec2::new(-0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_follow_within_spacing_is_still() {
        let pos = Vec2::new(0.2, 0.2);
        assert_eq!(follow(pos, Vec2::ZERO, 0.5), pos);
    }
}
