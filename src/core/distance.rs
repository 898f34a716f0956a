use crate::core::coordinates::Coordinates;
use crate::models::BoundingBox;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lng1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lng2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two parsed locations
///
/// Returns `f64::INFINITY` when either side is invalid; callers treat that
/// as "cannot be near".
pub fn distance_between(from: &Coordinates, to: &Coordinates) -> f64 {
    match (from, to) {
        (Coordinates::Valid(a), Coordinates::Valid(b)) => {
            haversine_distance(a.y(), a.x(), b.y(), b.x())
        }
        _ => {
            tracing::debug!(
                "Distance unavailable (from valid: {}, to valid: {})",
                from.is_valid(),
                to.is_valid()
            );
            f64::INFINITY
        }
    }
}

/// Calculate a bounding box around a center point
///
/// Much cheaper than Haversine, used to skip far-away candidates.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
pub fn calculate_bounding_box(lat: f64, lng: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / 111.0;

    // Near the poles cos() tends to zero; fall back to the full range
    let lng_delta = radius_km / (111.0 * lat.to_radians().cos().abs());
    let lng_delta = if lng_delta.is_finite() { lng_delta } else { 180.0 };

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lng: lng - lng_delta,
        max_lng: lng + lng_delta,
    }
}

/// Absolute longitude difference in degrees, wrapped into [0, 180]
#[inline]
pub fn longitude_delta(lng1: f64, lng2: f64) -> f64 {
    ((lng2 - lng1 + 540.0).rem_euclid(360.0) - 180.0).abs()
}

/// Check if a point is within a bounding box
///
/// Longitude is compared against the box centre with wraparound, so boxes
/// that cross the antimeridian still contain their neighbours.
#[inline]
pub fn is_within_bounding_box(lat: f64, lng: f64, bbox: &BoundingBox) -> bool {
    let center_lng = (bbox.min_lng + bbox.max_lng) / 2.0;
    let half_span = (bbox.max_lng - bbox.min_lng) / 2.0;

    lat >= bbox.min_lat
        && lat <= bbox.max_lat
        && longitude_delta(center_lng, lng) <= half_span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Kathmandu to Pokhara is roughly 140 km as the crow flies
        let distance = haversine_distance(27.7172, 85.3240, 28.2096, 83.9856);
        assert!((distance - 142.0).abs() < 10.0, "Distance should be ~142km, got {}", distance);
    }

    #[test]
    fn test_distance_between_invalid_is_infinite() {
        let valid = Coordinates::new(27.7172, 85.3240);
        assert!(distance_between(&valid, &Coordinates::Invalid).is_infinite());
        assert!(distance_between(&Coordinates::Invalid, &valid).is_infinite());
    }

    #[test]
    fn test_distance_symmetry_and_identity() {
        let a = Coordinates::new(27.7172, 85.3240);
        let b = Coordinates::new(27.6710, 85.4298);
        assert_eq!(distance_between(&a, &b), distance_between(&b, &a));
        assert_eq!(distance_between(&a, &a), 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(27.7172, 85.3240, 5.0);

        assert!(bbox.min_lat < 27.7172);
        assert!(bbox.max_lat > 27.7172);
        assert!(bbox.min_lng < 85.3240);
        assert!(bbox.max_lng > 85.3240);

        // 10km / 111km per degree = ~0.09 degrees
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.09).abs() < 0.01, "Lat span should be ~0.09 degrees");
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = calculate_bounding_box(27.7172, 85.3240, 5.0);

        assert!(is_within_bounding_box(27.7172, 85.3240, &bbox));
        assert!(is_within_bounding_box(27.7150, 85.3250, &bbox));
        assert!(!is_within_bounding_box(28.2096, 83.9856, &bbox));
    }

    #[test]
    fn test_bbox_wraps_across_antimeridian() {
        let bbox = calculate_bounding_box(-17.0, 179.99, 5.0);

        assert!(bbox.max_lng > 180.0);
        assert!(is_within_bounding_box(-17.0, -179.99, &bbox));
        assert!(is_within_bounding_box(-17.0, 180.0, &bbox));
        assert!(!is_within_bounding_box(-17.0, -179.0, &bbox));
        assert!(!is_within_bounding_box(-17.0, 0.0, &bbox));
    }

    #[test]
    fn test_longitude_delta_wraps() {
        assert!((longitude_delta(179.99, -179.99) - 0.02).abs() < 1e-9);
        assert!((longitude_delta(-179.99, 179.99) - 0.02).abs() < 1e-9);
        assert!((longitude_delta(85.0, 86.5) - 1.5).abs() < 1e-9);
        assert_eq!(longitude_delta(10.0, -170.0), 180.0);
    }
}
