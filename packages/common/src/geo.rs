use serde::{Deserialize, Serialize};
use tracing::warn;

/// Separators accepted between the degree, minute and second components.
const COORDINATE_DELIMITERS: [char; 6] = ['˚', '°', '\'', '′', '″', ';'];

/// A geographic point in decimal degrees.
///
/// Sources disagree on component order (the gazetteer and GeoJSON use
/// `[longitude, latitude]`, the manual coordinates sheet uses latitude
/// first), so the fields are always named and the order is only chosen
/// at the conversion functions below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Build from a `[longitude, latitude]` pair (gazetteer `reprPoint` order).
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }

    /// Build from separately parsed latitude and longitude values.
    pub fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        Self::new(longitude, latitude)
    }

    /// Coordinates in GeoJSON order.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Convert a manually entered coordinate into decimal degrees.
///
/// Understands degrees, degrees + minutes and degrees + minutes + seconds
/// (`39˚ 39' 4'' N`, `39˚15'N`, `41.779˚N`) with an optional trailing
/// hemisphere letter; `S` and `W` negate the result. Blank input and the
/// literal `unknown` yield `None` silently, anything else that does not
/// parse yields `None` with a warning.
pub fn to_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        return None;
    }

    let mut parts: Vec<&str> = trimmed.split(COORDINATE_DELIMITERS).map(str::trim).collect();

    let mut negative = false;
    if let Some(last) = parts.last_mut()
        && let Some(letter) = last.chars().last()
        && matches!(letter.to_ascii_uppercase(), 'N' | 'S' | 'E' | 'W')
    {
        negative = matches!(letter.to_ascii_uppercase(), 'S' | 'W');
        let value = *last;
        *last = value[..value.len() - letter.len_utf8()].trim();
    }
    parts.retain(|part| !part.is_empty());

    if parts.is_empty() || parts.len() > 3 {
        warn!(value = %text, "Invalid coordinates");
        return None;
    }

    let mut components = [0.0_f64; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        match part.parse::<f64>() {
            Ok(value) if value.is_finite() => *slot = value,
            _ => {
                warn!(value = %text, component = %part, "Invalid coordinates");
                return None;
            }
        }
    }

    let [degrees, minutes, seconds] = components;
    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;
    Some(if negative { -magnitude } else { magnitude })
}
