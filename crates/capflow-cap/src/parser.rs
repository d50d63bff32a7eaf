//! Streaming tag-driven parser for CAP v1.2 documents.
//!
//! [`CapParser`] consumes `start_element` / `characters` / `end_element`
//! events from an XML tokenizer and incrementally builds the Alert object
//! graph. Element names are matched exactly against a finite tag set (local
//! name, namespace prefix stripped). In-progress objects live on an explicit
//! frame stack, so a leaf arriving with no matching open container is
//! detected and diagnosed instead of corrupting state.
//!
//! Malformed leaf values and structural anomalies are downgraded to
//! diagnostics; a parse never fails a whole document. The only way a
//! document yields zero alerts is when no `<alert>` container closes.
//!
//! The bundled frontends ([`parse_document`], [`parse_reader`],
//! [`parse_file`]) drive the parser from quick-xml; any other tokenizer can
//! drive it through the public event methods.

use crate::alert::{Alert, Area, Info, Resource};
use crate::diagnostics::Diagnostics;
use crate::enums::{Category, Certainty, MsgType, Response, Scope, Severity, Status, Urgency};
use crate::values::{parse_altitude, parse_circle, parse_polygon, parse_size, squish};
use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Result of one parse call: every alert that completed, plus the
/// diagnostics captured along the way.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub alerts: Vec<Alert>,
    pub diagnostics: Diagnostics,
}

/// Every recognized CAP element name, plus the none/unknown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tag {
    Alert,
    Identifier,
    Sender,
    SenderName,
    Sent,
    Status,
    MsgType,
    Scope,
    Source,
    Restriction,
    Addresses,
    Code,
    Note,
    References,
    Incidents,
    Info,
    Language,
    Category,
    Event,
    ResponseType,
    Urgency,
    Severity,
    Certainty,
    Audience,
    EventCode,
    Effective,
    Onset,
    Expires,
    Headline,
    Description,
    Instruction,
    Web,
    Contact,
    Parameter,
    ValueName,
    Value,
    Area,
    AreaDesc,
    Polygon,
    Geocode,
    Circle,
    Altitude,
    Ceiling,
    Resource,
    ResourceDesc,
    MimeType,
    Size,
    Uri,
    DerefUri,
    Digest,
    #[default]
    Unknown,
}

impl Tag {
    fn from_name(local: &str) -> Tag {
        match local {
            "alert" => Tag::Alert,
            "identifier" => Tag::Identifier,
            "sender" => Tag::Sender,
            "senderName" => Tag::SenderName,
            "sent" => Tag::Sent,
            "status" => Tag::Status,
            "msgType" => Tag::MsgType,
            "scope" => Tag::Scope,
            "source" => Tag::Source,
            "restriction" => Tag::Restriction,
            "addresses" => Tag::Addresses,
            "code" => Tag::Code,
            "note" => Tag::Note,
            "references" => Tag::References,
            "incidents" => Tag::Incidents,
            "info" => Tag::Info,
            "language" => Tag::Language,
            "category" => Tag::Category,
            "event" => Tag::Event,
            "responseType" => Tag::ResponseType,
            "urgency" => Tag::Urgency,
            "severity" => Tag::Severity,
            "certainty" => Tag::Certainty,
            "audience" => Tag::Audience,
            "eventCode" => Tag::EventCode,
            "effective" => Tag::Effective,
            "onset" => Tag::Onset,
            "expires" => Tag::Expires,
            "headline" => Tag::Headline,
            "description" => Tag::Description,
            "instruction" => Tag::Instruction,
            "web" => Tag::Web,
            "contact" => Tag::Contact,
            "parameter" => Tag::Parameter,
            "valueName" => Tag::ValueName,
            "value" => Tag::Value,
            "area" => Tag::Area,
            "areaDesc" => Tag::AreaDesc,
            "polygon" => Tag::Polygon,
            "geocode" => Tag::Geocode,
            "circle" => Tag::Circle,
            "altitude" => Tag::Altitude,
            "ceiling" => Tag::Ceiling,
            "resource" => Tag::Resource,
            "resourceDesc" => Tag::ResourceDesc,
            "mimeType" => Tag::MimeType,
            "size" => Tag::Size,
            "uri" => Tag::Uri,
            "derefUri" => Tag::DerefUri,
            "digest" => Tag::Digest,
            _ => Tag::Unknown,
        }
    }
}

/// Which multimap the shared `valueName`/`value` sub-elements feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyValueTarget {
    EventCode,
    Parameter,
    Geocode,
}

/// One in-progress object on the context stack.
#[derive(Debug)]
enum Frame {
    Alert(Alert),
    Info(Info),
    Area(Area),
    Resource(Resource),
}

impl Frame {
    fn name(&self) -> &'static str {
        match self {
            Frame::Alert(_) => "alert",
            Frame::Info(_) => "info",
            Frame::Area(_) => "area",
            Frame::Resource(_) => "resource",
        }
    }
}

/// Incremental CAP document parser.
///
/// Feed it tokenizer events, then call [`CapParser::finish`] to take the
/// completed alerts and diagnostics.
#[derive(Debug, Default)]
pub struct CapParser {
    current: Tag,
    text: String,
    stack: Vec<Frame>,
    kv_target: Option<KeyValueTarget>,
    value_name: String,
    alerts: Vec<Alert>,
    diags: Diagnostics,
}

impl CapParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a start tag. `name` may be namespace-qualified.
    pub fn start_element(&mut self, name: &str, attributes: &[(String, String)]) {
        self.text.clear();
        let local = local_name(name);
        let tag = Tag::from_name(local);
        self.current = tag;
        match tag {
            Tag::Alert => {
                let mut alert = Alert::default();
                for (key, value) in attributes {
                    if key == "xmlns" || key.starts_with("xmlns:") {
                        alert.version = value.clone();
                    }
                }
                debug!("starting a new alert");
                self.stack.push(Frame::Alert(alert));
            }
            Tag::Info => {
                if matches!(self.stack.last(), Some(Frame::Alert(_))) {
                    self.stack.push(Frame::Info(Info::default()));
                } else {
                    self.diags.warn("<info> with no open <alert>; ignoring block");
                }
            }
            Tag::Area => {
                if matches!(self.stack.last(), Some(Frame::Info(_))) {
                    self.stack.push(Frame::Area(Area::default()));
                } else {
                    self.diags.warn("<area> with no open <info>; ignoring block");
                }
            }
            Tag::Resource => {
                if matches!(self.stack.last(), Some(Frame::Info(_))) {
                    self.stack.push(Frame::Resource(Resource::default()));
                } else {
                    self.diags
                        .warn("<resource> with no open <info>; ignoring block");
                }
            }
            Tag::EventCode => self.kv_target = Some(KeyValueTarget::EventCode),
            Tag::Parameter => self.kv_target = Some(KeyValueTarget::Parameter),
            Tag::Geocode => self.kv_target = Some(KeyValueTarget::Geocode),
            Tag::Unknown => debug!(element = local, "unrecognized CAP element"),
            _ => {}
        }
    }

    /// Append character data. Chunks arriving for one element are
    /// concatenated in order.
    pub fn characters(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Handle an end tag: normalize the accumulated text, dispatch it to
    /// the in-progress object, and close containers.
    pub fn end_element(&mut self, name: &str) {
        let text = squish(&self.text);
        self.text.clear();
        let local = local_name(name);

        self.dispatch_leaf(&text, local);

        match Tag::from_name(local) {
            Tag::Alert => self.close_alert(),
            Tag::Info => self.close_info(),
            Tag::Area => self.close_area(),
            Tag::Resource => self.close_resource(),
            Tag::EventCode | Tag::Parameter | Tag::Geocode => {
                self.kv_target = None;
                self.value_name.clear();
            }
            _ => {}
        }

        self.current = Tag::Unknown;
    }

    /// Log a tokenizer-reported error. The parser keeps whatever alerts it
    /// has already completed.
    pub fn stream_error(&mut self, message: &str) {
        self.diags.error(message);
    }

    /// Take the completed alerts and diagnostics. Unclosed containers are
    /// diagnosed and dropped.
    pub fn finish(mut self) -> ParseOutcome {
        while let Some(frame) = self.stack.pop() {
            self.diags
                .warn(format!("document ended with unclosed <{}>", frame.name()));
        }
        ParseOutcome {
            alerts: self.alerts,
            diagnostics: self.diags,
        }
    }

    fn dispatch_leaf(&mut self, text: &str, end_name: &str) {
        match self.current {
            // alert-level leaves
            Tag::Identifier => self.set_alert(end_name, |alert| alert.identifier = text.into()),
            Tag::Sender => self.set_alert(end_name, |alert| alert.sender = text.into()),
            Tag::Source => self.set_alert(end_name, |alert| alert.source = text.into()),
            Tag::Restriction => self.set_alert(end_name, |alert| alert.restriction = text.into()),
            Tag::Addresses => self.set_alert(end_name, |alert| alert.addresses = text.into()),
            Tag::Note => self.set_alert(end_name, |alert| alert.note = text.into()),
            Tag::Incidents => self.set_alert(end_name, |alert| alert.incidents = text.into()),
            Tag::Code => self.set_alert(end_name, |alert| {
                alert.add_code(text);
            }),
            Tag::References => {
                // the extended identifiers are whitespace-separated
                if !text.is_empty() {
                    let references: Vec<String> =
                        text.split_whitespace().map(str::to_owned).collect();
                    self.set_alert(end_name, move |alert| {
                        for reference in references {
                            alert.add_reference(reference);
                        }
                    });
                }
            }
            Tag::Sent => {
                if let Some(sent) = self.parse_timestamp("sent", text) {
                    self.set_alert(end_name, |alert| alert.sent = Some(sent));
                }
            }
            Tag::Status => match text.parse::<Status>() {
                Ok(status) => self.set_alert(end_name, |alert| alert.status = Some(status)),
                Err(err) => self.diags.warn(format!("ignoring <status>: {err}")),
            },
            Tag::MsgType => match text.parse::<MsgType>() {
                Ok(msg_type) => self.set_alert(end_name, |alert| alert.msg_type = Some(msg_type)),
                Err(err) => self.diags.warn(format!("ignoring <msgType>: {err}")),
            },
            Tag::Scope => match text.parse::<Scope>() {
                Ok(scope) => self.set_alert(end_name, |alert| alert.scope = Some(scope)),
                Err(err) => self.diags.warn(format!("ignoring <scope>: {err}")),
            },

            // info-level leaves
            Tag::Language => self.set_info(end_name, |info| info.language = text.into()),
            Tag::Event => self.set_info(end_name, |info| info.event = text.into()),
            Tag::Audience => self.set_info(end_name, |info| info.audience = text.into()),
            Tag::SenderName => self.set_info(end_name, |info| info.sender_name = text.into()),
            Tag::Headline => self.set_info(end_name, |info| info.headline = text.into()),
            Tag::Description => self.set_info(end_name, |info| info.description = text.into()),
            Tag::Instruction => self.set_info(end_name, |info| info.instruction = text.into()),
            Tag::Web => self.set_info(end_name, |info| info.web = text.into()),
            Tag::Contact => self.set_info(end_name, |info| info.contact = text.into()),
            Tag::Category => match text.parse::<Category>() {
                Ok(category) => self.set_info(end_name, |info| {
                    info.add_category(category);
                }),
                Err(err) => self.diags.warn(format!("ignoring <category>: {err}")),
            },
            Tag::ResponseType => match text.parse::<Response>() {
                Ok(response) => self.set_info(end_name, |info| {
                    info.add_response(response);
                }),
                Err(err) => self.diags.warn(format!("ignoring <responseType>: {err}")),
            },
            Tag::Urgency => match text.parse::<Urgency>() {
                Ok(urgency) => self.set_info(end_name, |info| info.urgency = urgency),
                Err(err) => self.diags.warn(format!("ignoring <urgency>: {err}")),
            },
            Tag::Severity => match text.parse::<Severity>() {
                Ok(severity) => self.set_info(end_name, |info| info.severity = severity),
                Err(err) => self.diags.warn(format!("ignoring <severity>: {err}")),
            },
            Tag::Certainty => match text.parse::<Certainty>() {
                Ok(certainty) => self.set_info(end_name, |info| info.certainty = certainty),
                Err(err) => self.diags.warn(format!("ignoring <certainty>: {err}")),
            },
            Tag::Effective => {
                if let Some(ts) = self.parse_timestamp("effective", text) {
                    self.set_info(end_name, |info| info.effective = Some(ts));
                }
            }
            Tag::Onset => {
                if let Some(ts) = self.parse_timestamp("onset", text) {
                    self.set_info(end_name, |info| info.onset = Some(ts));
                }
            }
            Tag::Expires => {
                if let Some(ts) = self.parse_timestamp("expires", text) {
                    self.set_info(end_name, |info| info.expires = Some(ts));
                }
            }

            // shared key/value leaves, disambiguated by the open container
            Tag::ValueName => self.value_name = text.into(),
            Tag::Value => {
                let name = self.value_name.clone();
                let value = text.to_owned();
                match self.kv_target {
                    Some(KeyValueTarget::EventCode) => self.set_info(end_name, move |info| {
                        info.add_event_code(name, value);
                    }),
                    Some(KeyValueTarget::Parameter) => self.set_info(end_name, move |info| {
                        info.add_parameter(name, value);
                    }),
                    Some(KeyValueTarget::Geocode) => self.set_area(end_name, move |area| {
                        area.add_geocode(name, value);
                    }),
                    None => self
                        .diags
                        .warn("<value> outside <eventCode>/<parameter>/<geocode>; ignoring"),
                }
            }

            // area-level leaves
            Tag::AreaDesc => self.set_area(end_name, |area| area.description = text.into()),
            Tag::Altitude => {
                match parse_altitude(text, &mut self.diags) {
                    Ok(altitude) => self.set_area(end_name, |area| area.altitude = altitude),
                    Err(err) => self.diags.warn(format!("ignoring <altitude>: {err}")),
                }
            }
            Tag::Ceiling => match parse_altitude(text, &mut self.diags) {
                Ok(ceiling) => self.set_area(end_name, |area| area.ceiling = ceiling),
                Err(err) => self.diags.warn(format!("ignoring <ceiling>: {err}")),
            },
            Tag::Polygon => {
                if !text.is_empty() {
                    match parse_polygon(text) {
                        Ok(polygon) => self.set_area(end_name, move |area| {
                            area.add_polygon(polygon);
                        }),
                        Err(err) => self
                            .diags
                            .warn(format!("while parsing a polygon, encountered error: {err}")),
                    }
                }
            }
            Tag::Circle => match parse_circle(text, &mut self.diags) {
                Ok(circle) => self.set_area(end_name, move |area| {
                    area.add_circle(circle);
                }),
                Err(err) => self
                    .diags
                    .warn(format!("while parsing a circle, encountered error: {err}")),
            },

            // resource-level leaves
            Tag::ResourceDesc => {
                self.set_resource(end_name, |resource| resource.description = text.into())
            }
            Tag::MimeType => {
                self.set_resource(end_name, |resource| resource.mime_type = text.into())
            }
            Tag::Uri => self.set_resource(end_name, |resource| resource.uri = text.into()),
            Tag::DerefUri => {
                self.set_resource(end_name, |resource| resource.deref_uri = text.into())
            }
            Tag::Digest => self.set_resource(end_name, |resource| resource.digest = text.into()),
            Tag::Size => match parse_size(text, &mut self.diags) {
                Ok(size) => self.set_resource(end_name, |resource| resource.size = Some(size)),
                Err(err) => self
                    .diags
                    .warn(format!("failed to convert resource size: {err}")),
            },

            // container tags carry no text of their own
            Tag::Alert
            | Tag::Info
            | Tag::Area
            | Tag::Resource
            | Tag::EventCode
            | Tag::Parameter
            | Tag::Geocode => {}

            Tag::Unknown => {
                if !text.is_empty() {
                    self.diags.warn(format!(
                        "characters found in unknown element <{end_name}>: {text:?}"
                    ));
                }
            }
        }
    }

    fn parse_timestamp(&mut self, element: &str, text: &str) -> Option<DateTime<FixedOffset>> {
        if text.is_empty() {
            return None;
        }
        match DateTime::parse_from_rfc3339(text) {
            Ok(ts) => Some(ts),
            Err(err) => {
                self.diags
                    .warn(format!("ignoring <{element}> timestamp {text:?}: {err}"));
                None
            }
        }
    }

    fn set_alert<F: FnOnce(&mut Alert)>(&mut self, element: &str, f: F) {
        let applied = self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Alert(alert) => Some(alert),
            _ => None,
        });
        match applied {
            Some(alert) => f(alert),
            None => self.missing_context(element, "alert"),
        }
    }

    fn set_info<F: FnOnce(&mut Info)>(&mut self, element: &str, f: F) {
        let applied = self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Info(info) => Some(info),
            _ => None,
        });
        match applied {
            Some(info) => f(info),
            None => self.missing_context(element, "info"),
        }
    }

    fn set_area<F: FnOnce(&mut Area)>(&mut self, element: &str, f: F) {
        let applied = self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Area(area) => Some(area),
            _ => None,
        });
        match applied {
            Some(area) => f(area),
            None => self.missing_context(element, "area"),
        }
    }

    fn set_resource<F: FnOnce(&mut Resource)>(&mut self, element: &str, f: F) {
        let applied = self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Resource(resource) => Some(resource),
            _ => None,
        });
        match applied {
            Some(resource) => f(resource),
            None => self.missing_context(element, "resource"),
        }
    }

    fn missing_context(&mut self, element: &str, container: &str) {
        self.diags
            .warn(format!("<{element}> with no open <{container}>; ignoring"));
    }

    fn close_alert(&mut self) {
        self.kv_target = None;
        self.value_name.clear();
        loop {
            match self.stack.pop() {
                Some(Frame::Alert(alert)) => {
                    debug!(identifier = %alert.identifier, "completed an <alert>");
                    self.alerts.push(alert);
                    return;
                }
                Some(frame) => self
                    .diags
                    .warn(format!("unclosed <{}> inside <alert>; discarding", frame.name())),
                None => {
                    self.diags.warn("</alert> with no open <alert>");
                    return;
                }
            }
        }
    }

    fn close_info(&mut self) {
        match self.stack.pop() {
            Some(Frame::Info(info)) => self.set_alert("info", move |alert| {
                alert.add_info(info);
            }),
            Some(other) => {
                self.diags
                    .warn(format!("</info> closed while <{}> was open", other.name()));
                self.stack.push(other);
            }
            None => self.diags.warn("</info> with no open element"),
        }
    }

    fn close_area(&mut self) {
        match self.stack.pop() {
            Some(Frame::Area(area)) => self.set_info("area", move |info| {
                info.add_area(area);
            }),
            Some(other) => {
                self.diags
                    .warn(format!("</area> closed while <{}> was open", other.name()));
                self.stack.push(other);
            }
            None => self.diags.warn("</area> with no open element"),
        }
    }

    fn close_resource(&mut self) {
        match self.stack.pop() {
            Some(Frame::Resource(resource)) => self.set_info("resource", move |info| {
                info.add_resource(resource);
            }),
            Some(other) => {
                self.diags
                    .warn(format!("</resource> closed while <{}> was open", other.name()));
                self.stack.push(other);
            }
            None => self.diags.warn("</resource> with no open element"),
        }
    }
}

/// Local part of a possibly namespace-qualified element name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn collect_attributes(element: &BytesStart<'_>) -> Vec<(String, String)> {
    element
        .attributes()
        .filter_map(|attr| attr.ok())
        .map(|attr| {
            (
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            )
        })
        .collect()
}

/// Parse a whole CAP document held in memory.
pub fn parse_document(xml: &str) -> ParseOutcome {
    parse_reader(xml.as_bytes())
}

/// Parse a CAP document from a buffered byte stream.
pub fn parse_reader<R: BufRead>(reader: R) -> ParseOutcome {
    let mut xml = Reader::from_reader(reader);
    let mut parser = CapParser::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(XmlEvent::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attributes = collect_attributes(&e);
                parser.start_element(&name, &attributes);
            }
            Ok(XmlEvent::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attributes = collect_attributes(&e);
                parser.start_element(&name, &attributes);
                parser.end_element(&name);
            }
            Ok(XmlEvent::Text(t)) => match t.unescape() {
                Ok(text) => parser.characters(&text),
                Err(err) => parser.stream_error(&format!("bad character data: {err}")),
            },
            Ok(XmlEvent::CData(t)) => {
                let text = String::from_utf8_lossy(&t).into_owned();
                parser.characters(&text);
            }
            Ok(XmlEvent::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                parser.end_element(&name);
            }
            Ok(XmlEvent::Eof) => break,
            Err(err) => {
                parser.stream_error(&format!(
                    "XML error at byte {}: {err}",
                    xml.buffer_position()
                ));
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

/// Parse a CAP document from a file. Failing to open or read the file is an
/// I/O error, reported distinctly from a parse that yields zero alerts.
pub fn parse_file<P: AsRef<Path>>(path: P) -> io::Result<ParseOutcome> {
    let file = File::open(path)?;
    Ok(parse_reader(BufReader::new(file)))
}
