//! The CAP v1.2 document model: Alert, Info, Area, Resource and the
//! geometry value types.
//!
//! Builders are fluent chaining mutators with no validation beyond what the
//! value parsers enforce; a structurally incomplete Alert (for example one
//! with zero Info blocks) is representable, and the derived accessors guard
//! that case by returning `Option`.

use crate::enums::{Category, Certainty, MsgType, Response, Scope, Severity, Status, Urgency};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// One `"<lat>,<long>"` pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Ordered point sequence. May be degenerate (zero points); callers reject
/// before use if they need a real ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Polygon {
    pub points: Vec<Coordinate>,
}

/// Circular target area: center plus radius in kilometers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Coordinate,
    pub radius_km: f64,
}

/// Supplemental file attached to an Info block (`<resource>`).
///
/// All fields are independently optional text; `size` is `None` when the
/// document carried no parseable byte size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Resource {
    pub description: String,
    pub mime_type: String,
    pub size: Option<u64>,
    pub uri: String,
    pub deref_uri: String,
    pub digest: String,
}

/// Geographic target description within an Info block (`<area>`).
///
/// Altitude and ceiling are signed feet; 0 means unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Area {
    pub polygons: Vec<Polygon>,
    pub circles: Vec<Circle>,
    /// Geocode key/value pairs in document order; duplicate keys allowed.
    pub geocodes: Vec<(String, String)>,
    pub description: String,
    pub altitude: i64,
    pub ceiling: i64,
}

impl Area {
    pub fn add_polygon(&mut self, polygon: Polygon) -> &mut Self {
        self.polygons.push(polygon);
        self
    }

    pub fn add_circle(&mut self, circle: Circle) -> &mut Self {
        self.circles.push(circle);
        self
    }

    pub fn add_geocode(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.geocodes.push((name.into(), value.into()));
        self
    }

    /// All values recorded for one geocode key, in document order.
    pub fn geocode_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.geocodes
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// One `<info>` subsection: the human-readable description, urgency,
/// severity, certainty and affected areas/resources for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Info {
    pub language: String,
    pub categories: Vec<Category>,
    pub responses: Vec<Response>,
    /// Event code key/value pairs in document order; duplicate keys allowed.
    pub event_codes: Vec<(String, String)>,
    /// Parameter key/value pairs in document order; duplicate keys allowed.
    pub parameters: Vec<(String, String)>,
    pub resources: Vec<Resource>,
    pub areas: Vec<Area>,
    pub event: String,
    pub urgency: Urgency,
    pub severity: Severity,
    pub certainty: Certainty,
    pub audience: String,
    pub effective: Option<DateTime<FixedOffset>>,
    pub onset: Option<DateTime<FixedOffset>>,
    pub expires: Option<DateTime<FixedOffset>>,
    pub sender_name: String,
    pub headline: String,
    pub description: String,
    pub instruction: String,
    pub web: String,
    pub contact: String,
}

impl Info {
    pub fn add_category(&mut self, category: Category) -> &mut Self {
        self.categories.push(category);
        self
    }

    pub fn add_response(&mut self, response: Response) -> &mut Self {
        self.responses.push(response);
        self
    }

    pub fn add_event_code(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.event_codes.push((name.into(), value.into()));
        self
    }

    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    pub fn add_resource(&mut self, resource: Resource) -> &mut Self {
        self.resources.push(resource);
        self
    }

    pub fn add_area(&mut self, area: Area) -> &mut Self {
        self.areas.push(area);
        self
    }

    /// All values recorded for one event-code key, in document order.
    pub fn event_code_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.event_codes
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Raw VTEC string, if this block carries one as a parameter. The
    /// structure of the code is opaque to this crate.
    pub fn vtec(&self) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(key, _)| key == "VTEC")
            .map(|(_, value)| value.as_str())
    }

    /// True once the block's expiry time has passed. A block with no
    /// `<expires>` never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires {
            Some(expires) => now > expires.with_timezone(&Utc),
            None => false,
        }
    }
}

/// One complete CAP message (top-level `<alert>` element).
///
/// Built incrementally by exactly one parser instance, never mutated after
/// it is returned. Identity for deduplication is decided by the queue's
/// dedup policy, not by `PartialEq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Alert {
    pub codes: Vec<String>,
    pub references: Vec<String>,
    pub infos: Vec<Info>,
    /// Sender-assigned identifier, the default dedup key.
    pub identifier: String,
    /// CAP version, read from the `xmlns` namespace attribute.
    pub version: String,
    pub sender: String,
    pub sent: Option<DateTime<FixedOffset>>,
    pub status: Option<Status>,
    pub msg_type: Option<MsgType>,
    pub scope: Option<Scope>,
    pub source: String,
    pub restriction: String,
    pub addresses: String,
    pub note: String,
    pub incidents: String,
}

impl Alert {
    pub fn add_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.codes.push(code.into());
        self
    }

    pub fn add_reference(&mut self, reference: impl Into<String>) -> &mut Self {
        self.references.push(reference.into());
        self
    }

    pub fn add_info(&mut self, info: Info) -> &mut Self {
        self.infos.push(info);
        self
    }

    /// The alert's urgency, taken from the first Info block in document
    /// order. `None` when the alert carries no Info blocks.
    pub fn urgency(&self) -> Option<Urgency> {
        self.infos.first().map(|info| info.urgency)
    }

    /// The alert's severity, taken from the first Info block in document
    /// order. `None` when the alert carries no Info blocks.
    pub fn severity(&self) -> Option<Severity> {
        self.infos.first().map(|info| info.severity)
    }

    /// Short display title: the first non-empty event name, else a SAME
    /// event code, else the alert note, else the identifier.
    pub fn title(&self) -> &str {
        for info in &self.infos {
            if !info.event.is_empty() {
                return &info.event;
            }
            if let Some(code) = info.event_code_values("SAME").find(|v| !v.is_empty()) {
                return code;
            }
        }
        if !self.note.is_empty() {
            return &self.note;
        }
        &self.identifier
    }

    /// True when every Info block has expired. An alert with no Info blocks
    /// is never considered expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.infos.is_empty() && self.infos.iter().all(|info| info.is_expired(now))
    }

    /// True when any area of any Info block carries the given geocode
    /// key/value pair.
    pub fn has_geocode(&self, name: &str, value: &str) -> bool {
        self.infos.iter().any(|info| {
            info.areas
                .iter()
                .any(|area| area.geocode_values(name).any(|v| v == value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn info_with_event(event: &str) -> Info {
        Info {
            event: event.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn derived_accessors_guard_empty_alert() {
        let alert = Alert::default();
        assert_eq!(alert.urgency(), None);
        assert_eq!(alert.severity(), None);
    }

    #[test]
    fn first_info_wins_for_summary() {
        let mut alert = Alert::default();
        let mut first = info_with_event("TORNADO WARNING");
        first.urgency = Urgency::Immediate;
        first.severity = Severity::Extreme;
        let mut second = info_with_event("AVISO DE TORNADO");
        second.urgency = Urgency::Past;
        second.severity = Severity::Minor;
        alert.add_info(first).add_info(second);

        assert_eq!(alert.urgency(), Some(Urgency::Immediate));
        assert_eq!(alert.severity(), Some(Severity::Extreme));
    }

    #[test]
    fn title_prefers_event_then_same_code_then_note_then_id() {
        let mut alert = Alert {
            identifier: "NOAA-123".to_string(),
            ..Default::default()
        };
        assert_eq!(alert.title(), "NOAA-123");

        alert.note = "cancelled by sender".to_string();
        assert_eq!(alert.title(), "cancelled by sender");

        let mut info = Info::default();
        info.add_event_code("SAME", "TOR");
        alert.add_info(info);
        assert_eq!(alert.title(), "TOR");

        alert.infos[0].event = "Tornado Warning".to_string();
        assert_eq!(alert.title(), "Tornado Warning");
    }

    #[test]
    fn expiry_requires_every_info_to_lapse() {
        let now = Utc.with_ymd_and_hms(2011, 5, 9, 12, 0, 0).unwrap();
        let past = "2011-05-09T10:00:00+00:00".parse::<DateTime<FixedOffset>>().unwrap();
        let future = "2011-05-09T18:00:00+00:00".parse::<DateTime<FixedOffset>>().unwrap();

        let mut alert = Alert::default();
        assert!(!alert.is_expired(now));

        let expired = Info {
            expires: Some(past),
            ..Default::default()
        };
        let live = Info {
            expires: Some(future),
            ..Default::default()
        };
        alert.add_info(expired);
        assert!(alert.is_expired(now));

        alert.add_info(live);
        assert!(!alert.is_expired(now));

        // no expires => never expired
        alert.infos[1].expires = None;
        assert!(!alert.is_expired(now));
    }

    #[test]
    fn geocode_lookup_spans_all_areas() {
        let mut area = Area::default();
        area.add_geocode("SAME", "006023").add_geocode("UGC", "CAZ017");
        let mut other = Area::default();
        other.add_geocode("SAME", "006045");

        let mut info = Info::default();
        info.add_area(area).add_area(other);
        let mut alert = Alert::default();
        alert.add_info(info);

        assert!(alert.has_geocode("SAME", "006023"));
        assert!(alert.has_geocode("SAME", "006045"));
        assert!(!alert.has_geocode("SAME", "999999"));
        assert!(!alert.has_geocode("FIPS", "006023"));
    }

    #[test]
    fn geocodes_keep_duplicate_keys_in_order() {
        let mut area = Area::default();
        area.add_geocode("SAME", "006023");
        area.add_geocode("SAME", "006045");
        let values: Vec<&str> = area.geocode_values("SAME").collect();
        assert_eq!(values, vec!["006023", "006045"]);
    }

    #[test]
    fn vtec_parameter_passes_through() {
        let mut info = Info::default();
        assert_eq!(info.vtec(), None);
        info.add_parameter("VTEC", "/O.NEW.KSTO.TO.W.0001.000000T0000Z-000000T0000Z/");
        assert_eq!(
            info.vtec(),
            Some("/O.NEW.KSTO.TO.W.0001.000000T0000Z-000000T0000Z/")
        );
    }

    #[test]
    fn alert_serializes_to_json() {
        let mut alert = Alert {
            identifier: "A1".to_string(),
            status: Some(Status::Actual),
            ..Default::default()
        };
        alert.add_code("IPAWSv1.0");
        let json = serde_json::to_string(&alert).unwrap();
        assert!(json.contains("\"identifier\":\"A1\""));
        let back: Alert = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alert);
    }
}
