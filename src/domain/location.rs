use serde::{Deserialize, Serialize};

/// Maximum absolute latitude of a mappable position, in degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Maximum absolute longitude of a mappable position, in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// A sighting of a character, as reported by the catalog.
///
/// Latitude and longitude are kept as the raw strings the wire
/// delivered; [`Location::coordinate`] is the only place that
/// interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,

    /// Timestamp string as reported, not validated.
    pub date: String,

    pub latitude: String,

    pub longitude: String,

    /// Owning character, when the sighting could be linked to one.
    pub character_id: Option<String>,
}

/// A parsed, in-range map position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Parse the raw latitude/longitude strings into a mappable
    /// position. Returns `None` when either string is not numeric or
    /// the values fall outside `±90` / `±180` degrees; such a location
    /// still exists, it just has no place on a map.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let latitude: f64 = self.latitude.parse().ok()?;
        let longitude: f64 = self.longitude.parse().ok()?;

        // Positive-form check so NaN (which fails every comparison)
        // counts as unmappable.
        if latitude.abs() <= MAX_LATITUDE && longitude.abs() <= MAX_LONGITUDE {
            Some(Coordinate {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(latitude: &str, longitude: &str) -> Location {
        Location {
            id: "loc-1".to_string(),
            date: "2024-02-20T00:00:00Z".to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            character_id: Some("goku".to_string()),
        }
    }

    #[test]
    fn valid_coordinates_parse() {
        let coordinate = location("40.416775", "-3.703790").coordinate().unwrap();
        assert!((coordinate.latitude - 40.416775).abs() < f64::EPSILON);
        assert!((coordinate.longitude - -3.703790).abs() < f64::EPSILON);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(location("90", "180").coordinate().is_some());
        assert!(location("-90", "-180").coordinate().is_some());
    }

    #[test]
    fn out_of_range_latitude_is_unmappable() {
        assert!(location("91", "0").coordinate().is_none());
        assert!(location("-90.0001", "0").coordinate().is_none());
    }

    #[test]
    fn out_of_range_longitude_is_unmappable() {
        assert!(location("0", "181").coordinate().is_none());
    }

    #[test]
    fn non_numeric_strings_are_unmappable() {
        assert!(location("abc", "0").coordinate().is_none());
        assert!(location("", "").coordinate().is_none());
    }

    #[test]
    fn nan_is_unmappable() {
        // "nan" parses as f64::NAN, which must never produce a position
        assert!(location("nan", "10").coordinate().is_none());
    }
}
