//! Value parsers for CAP leaf text: coordinates, circles, polygons and
//! numeric fields.
//!
//! These are pure string-to-value conversions with no I/O. The scanner-based
//! variants leave the cursor positioned after the consumed token so that
//! coordinate parsing composes into circle and polygon parsing.

use crate::alert::{Circle, Coordinate, Polygon};
use crate::diagnostics::Diagnostics;
use thiserror::Error;

/// Failure to parse a coordinate pair, or a circle built on one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateParseError {
    #[error("no latitude or longitude in input")]
    Empty,
    #[error("no number at the start of the coordinate pair")]
    MissingLatitude,
    #[error("expected ',' between latitude and longitude")]
    MissingComma,
    #[error("got latitude but no longitude after the comma")]
    MissingLongitude,
    #[error("got circle center coordinate, but no radius")]
    MissingRadius,
    #[error("failed to parse circle radius")]
    InvalidRadius,
}

/// Failure to parse a resource byte size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeParseError {
    #[error("no size found in given string; all whitespace")]
    Empty,
    #[error("error parsing resource size from {0:?}")]
    Invalid(String),
}

/// Failure to parse an area altitude or ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AltitudeParseError {
    #[error("no altitude found in given string; all whitespace")]
    Empty,
    #[error("error parsing altitude from {0:?}")]
    Invalid(String),
}

/// Trim surrounding whitespace and collapse internal runs to single spaces.
pub fn squish(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut words = input.split_whitespace();
    if let Some(first) = words.next() {
        out.push_str(first);
        for word in words {
            out.push(' ');
            out.push_str(word);
        }
    }
    out
}

/// Cursor over a string slice for composite value parsing.
#[derive(Debug)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Lex a leading floating-point token. Consumes nothing on failure.
    fn take_float(&mut self) -> Option<f64> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut i = 0;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let int_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let int_digits = i - int_start;
        let mut frac_digits = 0;
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            let frac_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            frac_digits = i - frac_start;
        }
        if int_digits == 0 && frac_digits == 0 {
            return None;
        }
        if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
            let mut j = i + 1;
            if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                j += 1;
            }
            let exp_start = j;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > exp_start {
                i = j;
            }
        }
        let value = rest[..i].parse::<f64>().ok()?;
        self.pos += i;
        Some(value)
    }

    /// Lex a leading signed-integer token. Consumes nothing on failure.
    fn take_int_token(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut i = 0;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let digit_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digit_start {
            return None;
        }
        let token = &rest[..i];
        self.pos += i;
        Some(token)
    }
}

/// Parse one `"<lat>,<long>"` pair from the scanner, leaving it positioned
/// after the longitude (trailing whitespace consumed).
pub fn parse_coordinate_from(scanner: &mut Scanner<'_>) -> Result<Coordinate, CoordinateParseError> {
    scanner.skip_whitespace();
    if scanner.is_exhausted() {
        return Err(CoordinateParseError::Empty);
    }
    let latitude = scanner
        .take_float()
        .ok_or(CoordinateParseError::MissingLatitude)?;
    if scanner.peek() != Some(',') {
        return Err(CoordinateParseError::MissingComma);
    }
    scanner.bump();
    let longitude = scanner
        .take_float()
        .ok_or(CoordinateParseError::MissingLongitude)?;
    scanner.skip_whitespace();
    Ok(Coordinate {
        latitude,
        longitude,
    })
}

/// Parse a whole string as one `"<lat>,<long>"` pair.
pub fn parse_coordinate(input: &str) -> Result<Coordinate, CoordinateParseError> {
    let mut scanner = Scanner::new(input);
    parse_coordinate_from(&mut scanner)
}

/// Parse a `"<lat>,<long> <radius>"` circle. Trailing text after the radius
/// is a non-fatal warning.
pub fn parse_circle(input: &str, diags: &mut Diagnostics) -> Result<Circle, CoordinateParseError> {
    let mut scanner = Scanner::new(input);
    let center = parse_coordinate_from(&mut scanner)?;
    if scanner.is_exhausted() {
        return Err(CoordinateParseError::MissingRadius);
    }
    let radius_km = scanner
        .take_float()
        .ok_or(CoordinateParseError::InvalidRadius)?;
    scanner.skip_whitespace();
    if !scanner.is_exhausted() {
        diags.warn(format!(
            "parsed a circle, but unexpected data remains in {input:?}"
        ));
    }
    Ok(Circle { center, radius_km })
}

/// Parse a whitespace-delimited list of coordinate pairs. Zero points is
/// representable; any malformed point aborts the whole polygon.
pub fn parse_polygon(input: &str) -> Result<Polygon, CoordinateParseError> {
    let mut scanner = Scanner::new(input);
    let mut points = Vec::new();
    scanner.skip_whitespace();
    while !scanner.is_exhausted() {
        points.push(parse_coordinate_from(&mut scanner)?);
    }
    Ok(Polygon { points })
}

/// Parse a resource byte size. Trailing non-numeric content is a warning;
/// the parsed value is kept.
pub fn parse_size(input: &str, diags: &mut Diagnostics) -> Result<u64, SizeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SizeParseError::Empty);
    }
    let mut scanner = Scanner::new(trimmed);
    let token = scanner
        .take_int_token()
        .ok_or_else(|| SizeParseError::Invalid(trimmed.to_string()))?;
    let size = token
        .parse::<u64>()
        .map_err(|_| SizeParseError::Invalid(trimmed.to_string()))?;
    scanner.skip_whitespace();
    if !scanner.is_exhausted() {
        diags.warn(format!(
            "parsed resource size, but text remains in string {input:?}"
        ));
    }
    Ok(size)
}

/// Parse an area altitude or ceiling (signed, feet). Trailing non-numeric
/// content is a warning; the parsed value is kept.
pub fn parse_altitude(input: &str, diags: &mut Diagnostics) -> Result<i64, AltitudeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AltitudeParseError::Empty);
    }
    let mut scanner = Scanner::new(trimmed);
    let token = scanner
        .take_int_token()
        .ok_or_else(|| AltitudeParseError::Invalid(trimmed.to_string()))?;
    let altitude = token
        .parse::<i64>()
        .map_err(|_| AltitudeParseError::Invalid(trimmed.to_string()))?;
    scanner.skip_whitespace();
    if !scanner.is_exhausted() {
        diags.warn(format!(
            "parsed altitude, but text remains in string {input:?}"
        ));
    }
    Ok(altitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_round_trips() {
        let coord = parse_coordinate("38.565,-121.751").unwrap();
        assert_eq!(coord.latitude, 38.565);
        assert_eq!(coord.longitude, -121.751);
    }

    #[test]
    fn coordinate_with_surrounding_whitespace() {
        let coord = parse_coordinate("  38.0,-121.0  ").unwrap();
        assert_eq!(coord.latitude, 38.0);
        assert_eq!(coord.longitude, -121.0);
    }

    #[test]
    fn coordinate_failures() {
        assert_eq!(parse_coordinate(""), Err(CoordinateParseError::Empty));
        assert_eq!(parse_coordinate("   "), Err(CoordinateParseError::Empty));
        assert_eq!(
            parse_coordinate(",-121.0"),
            Err(CoordinateParseError::MissingLatitude)
        );
        assert_eq!(
            parse_coordinate("38.0"),
            Err(CoordinateParseError::MissingComma)
        );
        assert_eq!(
            parse_coordinate("38.0 -121.0"),
            Err(CoordinateParseError::MissingComma)
        );
        assert_eq!(
            parse_coordinate("38.0,"),
            Err(CoordinateParseError::MissingLongitude)
        );
        assert_eq!(
            parse_coordinate("38.0, -121.0"),
            Err(CoordinateParseError::MissingLongitude)
        );
    }

    #[test]
    fn circle_with_radius() {
        let mut diags = Diagnostics::new();
        let circle = parse_circle("38.0,-121.0 5.5", &mut diags).unwrap();
        assert_eq!(circle.center.latitude, 38.0);
        assert_eq!(circle.center.longitude, -121.0);
        assert_eq!(circle.radius_km, 5.5);
        assert!(diags.is_empty());
    }

    #[test]
    fn circle_without_radius_fails() {
        let mut diags = Diagnostics::new();
        assert_eq!(
            parse_circle("38.0,-121.0", &mut diags),
            Err(CoordinateParseError::MissingRadius)
        );
    }

    #[test]
    fn circle_trailing_garbage_warns_but_parses() {
        let mut diags = Diagnostics::new();
        let circle = parse_circle("38.0,-121.0 5.5 extra", &mut diags).unwrap();
        assert_eq!(circle.radius_km, 5.5);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn polygon_parses_point_list() {
        let polygon =
            parse_polygon("38.0,-121.0 38.1,-121.1 38.2,-121.2 38.0,-121.0").unwrap();
        assert_eq!(polygon.points.len(), 4);
        assert_eq!(polygon.points[1].latitude, 38.1);
        assert_eq!(polygon.points[3], polygon.points[0]);
    }

    #[test]
    fn polygon_empty_is_representable() {
        assert_eq!(parse_polygon("").unwrap().points.len(), 0);
        assert_eq!(parse_polygon("   ").unwrap().points.len(), 0);
    }

    #[test]
    fn polygon_malformed_point_aborts() {
        assert!(parse_polygon("38.0,-121.0 bogus 38.2,-121.2").is_err());
    }

    #[test]
    fn size_parses_and_warns_on_trailing_text() {
        let mut diags = Diagnostics::new();
        assert_eq!(parse_size("1234", &mut diags), Ok(1234));
        assert!(diags.is_empty());

        assert_eq!(parse_size("1234 bytes", &mut diags), Ok(1234));
        assert_eq!(diags.len(), 1);

        assert_eq!(parse_size("", &mut diags), Err(SizeParseError::Empty));
        assert_eq!(parse_size("  \t", &mut diags), Err(SizeParseError::Empty));
        assert!(matches!(
            parse_size("many", &mut diags),
            Err(SizeParseError::Invalid(_))
        ));
        assert!(matches!(
            parse_size("-5", &mut diags),
            Err(SizeParseError::Invalid(_))
        ));
    }

    #[test]
    fn altitude_accepts_negative_values() {
        let mut diags = Diagnostics::new();
        assert_eq!(parse_altitude("-100", &mut diags), Ok(-100));
        assert_eq!(parse_altitude(" 5000 ", &mut diags), Ok(5000));
        assert_eq!(
            parse_altitude("", &mut diags),
            Err(AltitudeParseError::Empty)
        );
        assert!(matches!(
            parse_altitude("high", &mut diags),
            Err(AltitudeParseError::Invalid(_))
        ));
    }

    #[test]
    fn squish_normalizes() {
        assert_eq!(squish("  All \t Clear \n"), "All Clear");
        assert_eq!(squish("Actual"), "Actual");
        assert_eq!(squish(" \n\t "), "");
    }
}
