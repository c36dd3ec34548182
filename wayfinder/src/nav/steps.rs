//! Instruction synthesis from route geometry.
//!
//! One step per geometry segment: N coordinates yield N-1 steps. Interior
//! maneuvers are classified by the bearing change between the incoming and
//! outgoing segment, a deliberately coarse heuristic with no road-graph
//! awareness. The sign convention (positive delta = right turn) follows the
//! raw bearing difference without wrap-around normalization.

use crate::geo::{bearing_deg, haversine_km};
use crate::nav::types::{Maneuver, NavigationStep};
use crate::routing::{RouteGeometry, AVERAGE_SPEED_MPS};

/// Bearing change below which a segment joint still counts as straight.
const TURN_THRESHOLD_DEG: f64 = 30.0;

/// Convert a route geometry into an ordered instruction sequence.
///
/// Geometries with fewer than two coordinates yield an empty sequence
/// rather than an error. Degenerate (duplicate-point) segments produce
/// zero-length straight steps.
pub fn synthesize_steps(geometry: &RouteGeometry) -> Vec<NavigationStep> {
    let coords = &geometry.coordinates;
    if coords.len() < 2 {
        return Vec::new();
    }

    let mut steps = Vec::with_capacity(coords.len() - 1);
    for i in 0..coords.len() - 1 {
        let current = &coords[i];
        let next = &coords[i + 1];
        let is_last = i == coords.len() - 2;

        let (instruction, maneuver) = if i == 0 {
            ("Head toward your destination".to_string(), Maneuver::Straight)
        } else if is_last {
            ("You have arrived".to_string(), Maneuver::Destination)
        } else {
            let incoming = bearing_deg(&coords[i - 1], current);
            let outgoing = bearing_deg(current, next);
            classify_turn(outgoing - incoming)
        };

        let distance_meters = haversine_km(current, next) * 1000.0;
        steps.push(NavigationStep {
            instruction,
            distance_meters,
            duration_seconds: distance_meters / AVERAGE_SPEED_MPS,
            maneuver,
            target: *next,
        });
    }

    steps
}

fn classify_turn(turn_angle: f64) -> (String, Maneuver) {
    if turn_angle.abs() < TURN_THRESHOLD_DEG {
        ("Continue straight".to_string(), Maneuver::Straight)
    } else if turn_angle > 0.0 {
        ("Turn right".to_string(), Maneuver::TurnRight)
    } else {
        ("Turn left".to_string(), Maneuver::TurnLeft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn geometry(coords: Vec<Coordinate>) -> RouteGeometry {
        RouteGeometry {
            coordinates: coords,
            distance_meters: 0.0,
            duration_seconds: 0.0,
        }
    }

    #[test]
    fn test_n_coordinates_yield_n_minus_one_steps() {
        let g = geometry(vec![
            Coordinate::new(40.0, -74.0),
            Coordinate::new(40.01, -74.0),
            Coordinate::new(40.02, -74.0),
            Coordinate::new(40.03, -74.0),
        ]);
        assert_eq!(synthesize_steps(&g).len(), 3);
    }

    #[test]
    fn test_first_step_is_straight_last_is_destination() {
        let g = geometry(vec![
            Coordinate::new(40.0, -74.0),
            Coordinate::new(40.01, -74.0),
            Coordinate::new(40.02, -74.0),
        ]);
        let steps = synthesize_steps(&g);
        assert_eq!(steps.first().unwrap().maneuver, Maneuver::Straight);
        assert_eq!(
            steps.first().unwrap().instruction,
            "Head toward your destination"
        );
        assert_eq!(steps.last().unwrap().maneuver, Maneuver::Destination);
        assert_eq!(steps.last().unwrap().instruction, "You have arrived");
    }

    #[test]
    fn test_two_point_geometry_has_no_interior() {
        let g = geometry(vec![
            Coordinate::new(40.0, -74.0),
            Coordinate::new(40.1, -74.1),
        ]);
        let steps = synthesize_steps(&g);
        assert_eq!(steps.len(), 1);
        // A single segment is both the first and the last; first wins.
        assert_eq!(steps[0].maneuver, Maneuver::Straight);
    }

    #[test]
    fn test_empty_and_single_point_geometries_yield_no_steps() {
        assert!(synthesize_steps(&geometry(vec![])).is_empty());
        assert!(synthesize_steps(&geometry(vec![Coordinate::new(0.0, 0.0)])).is_empty());
    }

    #[test]
    fn test_right_turn_classification() {
        // North, then east: bearing goes 0 -> 90, delta +90.
        let g = geometry(vec![
            Coordinate::new(40.00, -74.0),
            Coordinate::new(40.01, -74.0),
            Coordinate::new(40.01, -73.99),
            Coordinate::new(40.01, -73.98),
        ]);
        let steps = synthesize_steps(&g);
        assert_eq!(steps[1].maneuver, Maneuver::TurnRight);
        assert_eq!(steps[1].instruction, "Turn right");
    }

    #[test]
    fn test_left_turn_classification() {
        // North, then west: bearing goes 0 -> 270, raw delta +270... but
        // measured as outgoing - incoming of ~-90 requires the incoming leg
        // to start east. East then north: 90 -> 0, delta -90.
        let g = geometry(vec![
            Coordinate::new(40.01, -74.01),
            Coordinate::new(40.01, -74.0),
            Coordinate::new(40.02, -74.0),
            Coordinate::new(40.03, -74.0),
        ]);
        let steps = synthesize_steps(&g);
        assert_eq!(steps[1].maneuver, Maneuver::TurnLeft);
        assert_eq!(steps[1].instruction, "Turn left");
    }

    #[test]
    fn test_gentle_bend_stays_straight() {
        // Two nearly-collinear northbound segments.
        let g = geometry(vec![
            Coordinate::new(40.00, -74.0),
            Coordinate::new(40.01, -74.0),
            Coordinate::new(40.02, -74.0005),
            Coordinate::new(40.03, -74.001),
        ]);
        let steps = synthesize_steps(&g);
        assert_eq!(steps[1].maneuver, Maneuver::Straight);
        assert_eq!(steps[1].instruction, "Continue straight");
    }

    #[test]
    fn test_step_distance_and_duration() {
        let a = Coordinate::new(40.0, -74.0);
        let b = Coordinate::new(40.1, -74.1);
        let g = geometry(vec![a, b]);
        let steps = synthesize_steps(&g);

        let expected = haversine_km(&a, &b) * 1000.0;
        assert!((steps[0].distance_meters - expected).abs() < 1e-9);
        assert!((steps[0].duration_seconds - expected / 15.0).abs() < 1e-9);
        assert_eq!(steps[0].target, b);
    }

    #[test]
    fn test_duplicate_points_do_not_panic() {
        let p = Coordinate::new(40.0, -74.0);
        let g = geometry(vec![p, p, p, Coordinate::new(40.1, -74.0)]);
        let steps = synthesize_steps(&g);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].distance_meters, 0.0);
        // Zero-length segments classify as straight (bearing delta 0).
        assert_eq!(steps[1].maneuver, Maneuver::Straight);
    }
}
