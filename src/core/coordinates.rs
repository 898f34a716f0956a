use geo::Point;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

/// Parsed location of a listing or request
///
/// Storage holds coordinates as an object, a JSON-encoded object or a
/// `"lat,lng"` string. Everything is funnelled through [`parse_coordinates`]
/// when records are decoded so matching code only ever sees this type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Coordinates {
    /// `x` is the longitude, `y` the latitude
    Valid(Point<f64>),
    #[default]
    Invalid,
}

impl Coordinates {
    /// Build from latitude/longitude, rejecting non-finite values
    pub fn new(lat: f64, lng: f64) -> Self {
        if lat.is_finite() && lng.is_finite() {
            Coordinates::Valid(Point::new(lng, lat))
        } else {
            Coordinates::Invalid
        }
    }

    pub fn lat(&self) -> Option<f64> {
        match self {
            Coordinates::Valid(p) => Some(p.y()),
            Coordinates::Invalid => None,
        }
    }

    pub fn lng(&self) -> Option<f64> {
        match self {
            Coordinates::Valid(p) => Some(p.x()),
            Coordinates::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Coordinates::Valid(_))
    }
}

/// Written back as `{"lat", "lng"}`, or `null` when unusable
impl Serialize for Coordinates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coordinates::Valid(point) => {
                let mut state = serializer.serialize_struct("Coordinates", 2)?;
                state.serialize_field("lat", &point.y())?;
                state.serialize_field("lng", &point.x())?;
                state.end()
            }
            Coordinates::Invalid => serializer.serialize_none(),
        }
    }
}

/// Parse a raw coordinate value
///
/// Strategies, in order:
/// 1. object with `lat` / `lng`
/// 2. JSON-encoded string of that object
/// 3. comma-separated `"lat,lng"` string
///
/// Never fails; anything that does not yield two finite numbers is
/// [`Coordinates::Invalid`].
pub fn parse_coordinates(value: &Value) -> Coordinates {
    match value {
        Value::Object(_) => from_object(value),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(decoded @ Value::Object(_)) => from_object(&decoded),
            Ok(other) => {
                tracing::debug!("Coordinate string decoded to non-object JSON: {}", other);
                Coordinates::Invalid
            }
            Err(_) => from_pair(raw),
        },
        Value::Null => {
            tracing::debug!("Coordinates missing");
            Coordinates::Invalid
        }
        other => {
            tracing::debug!("Unsupported coordinate value: {}", other);
            Coordinates::Invalid
        }
    }
}

fn from_object(value: &Value) -> Coordinates {
    let lat = value.get("lat").and_then(as_number);
    let lng = value.get("lng").and_then(as_number);

    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let parsed = Coordinates::new(lat, lng);
            if !parsed.is_valid() {
                tracing::debug!("Coordinate object has non-finite values: {}", value);
            }
            parsed
        }
        _ => {
            tracing::debug!("Coordinate object lacks numeric lat/lng: {}", value);
            Coordinates::Invalid
        }
    }
}

fn from_pair(raw: &str) -> Coordinates {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 2 {
        tracing::debug!("Coordinate string is not a lat,lng pair: {:?}", raw);
        return Coordinates::Invalid;
    }

    match (parts[0].trim().parse::<f64>(), parts[1].trim().parse::<f64>()) {
        (Ok(lat), Ok(lng)) => Coordinates::new(lat, lng),
        _ => {
            tracing::debug!("Coordinate string has non-numeric halves: {:?}", raw);
            Coordinates::Invalid
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
