//! Streaming parser and document model for CAP (Common Alerting Protocol) v1.2
//! emergency-alert messages.
//!
//! This crate turns CAP XML documents into strongly-typed, immutable [`Alert`]
//! values. Parsing is tag-driven and single-pass: the document is scanned
//! front-to-back with no prior schema validation, and malformed leaf values
//! degrade to per-element diagnostics instead of failing the whole document.
//!
//! # Features
//!
//! - Single-pass XML parsing using quick-xml
//! - Full Alert/Info/Area/Resource object graph with polygons, circles and
//!   geocode multimaps
//! - Canonical enum tables for Status, MsgType, Scope, Category, Response,
//!   Urgency, Severity and Certainty
//! - Deterministic warning capture through an explicit [`Diagnostics`] sink
//!
//! # Example
//!
//! ```rust
//! use capflow_cap::parser::parse_document;
//!
//! let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <alert xmlns="urn:oasis:names:tc:emergency:cap:1.2">
//!   <identifier>KSTO1055887203</identifier>
//!   <sender>KSTO@NWS.NOAA.GOV</sender>
//!   <sent>2003-06-17T14:57:00-07:00</sent>
//!   <status>Actual</status>
//!   <msgType>Alert</msgType>
//!   <scope>Public</scope>
//!   <info>
//!     <category>Met</category>
//!     <event>SEVERE THUNDERSTORM</event>
//!     <urgency>Immediate</urgency>
//!     <severity>Severe</severity>
//!     <certainty>Observed</certainty>
//!   </info>
//! </alert>"#;
//!
//! let outcome = parse_document(xml);
//! assert_eq!(outcome.alerts.len(), 1);
//! assert_eq!(outcome.alerts[0].identifier, "KSTO1055887203");
//! assert!(outcome.diagnostics.is_empty());
//! ```

pub mod alert;
pub mod diagnostics;
pub mod enums;
pub mod parser;
pub mod values;

pub use alert::{Alert, Area, Circle, Coordinate, Info, Polygon, Resource};
pub use diagnostics::{Diagnostic, DiagnosticLevel, Diagnostics};
pub use enums::{
    Category, Certainty, EnumParseError, MsgType, Response, Scope, Severity, Status, Urgency,
};
pub use parser::{parse_document, parse_file, parse_reader, CapParser, ParseOutcome};
pub use values::{
    parse_altitude, parse_circle, parse_coordinate, parse_polygon, parse_size,
    AltitudeParseError, CoordinateParseError, SizeParseError,
};
