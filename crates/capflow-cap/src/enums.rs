//! Coded-value tables for CAP v1.2.
//!
//! Each family has a canonical ordered variant set, a normalized
//! string-to-variant lookup used when parsing untrusted text (`FromStr`), and
//! a variant-to-display lookup used when rendering (`Display`). Parsing an
//! unrecognized string is always an [`EnumParseError`], never a silent
//! default. Case aliases present in real-world feeds (`CBRNE`, `AllClear`)
//! are carried as an explicit alias list.

use crate::values::squish;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unrecognized coded value for a known enum family.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {family} value {value:?}")]
pub struct EnumParseError {
    pub family: &'static str,
    pub value: String,
}

impl EnumParseError {
    fn new(family: &'static str, value: &str) -> Self {
        Self {
            family,
            value: value.to_string(),
        }
    }
}

/// Handling code for the alert message (`<status>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Actual,
    Exercise,
    System,
    Test,
    Draft,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Actual,
        Status::Exercise,
        Status::System,
        Status::Test,
        Status::Draft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Actual => "Actual",
            Status::Exercise => "Exercise",
            Status::System => "System",
            Status::Test => "Test",
            Status::Draft => "Draft",
        }
    }

    /// CAP-defined explanation of the code.
    pub fn description(&self) -> &'static str {
        match self {
            Status::Actual => "Actionable by all targeted recipients",
            Status::Exercise => {
                "Actionable only by designated exercise participants; \
                 exercise identifier should appear in <note>"
            }
            Status::System => "For messages that support alert network internal functions",
            Status::Test => "Technical testing only, all recipients disregard",
            Status::Draft => "A preliminary template or draft, not actionable in its current form",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squish(s).as_str() {
            "Actual" => Ok(Status::Actual),
            "Exercise" => Ok(Status::Exercise),
            "System" => Ok(Status::System),
            "Test" => Ok(Status::Test),
            "Draft" => Ok(Status::Draft),
            other => Err(EnumParseError::new("status", other)),
        }
    }
}

/// Nature of the alert message (`<msgType>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgType {
    Alert,
    Update,
    Cancel,
    Ack,
    Error,
}

impl MsgType {
    pub const ALL: [MsgType; 5] = [
        MsgType::Alert,
        MsgType::Update,
        MsgType::Cancel,
        MsgType::Ack,
        MsgType::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MsgType::Alert => "Alert",
            MsgType::Update => "Update",
            MsgType::Cancel => "Cancel",
            MsgType::Ack => "Ack",
            MsgType::Error => "Error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MsgType::Alert => "Initial information requiring attention by targeted recipients",
            MsgType::Update => {
                "Updates and supersedes the earlier message(s) identified in <references>"
            }
            MsgType::Cancel => "Cancels the earlier message(s) identified in <references>",
            MsgType::Ack => {
                "Acknowledges receipt and acceptance of the message(s) identified in <references>"
            }
            MsgType::Error => {
                "Indicates rejection of the message(s) identified in <references>; \
                 explanation should appear in <note>"
            }
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MsgType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squish(s).as_str() {
            "Alert" => Ok(MsgType::Alert),
            "Update" => Ok(MsgType::Update),
            "Cancel" => Ok(MsgType::Cancel),
            "Ack" => Ok(MsgType::Ack),
            "Error" => Ok(MsgType::Error),
            other => Err(EnumParseError::new("msgType", other)),
        }
    }
}

/// Intended distribution of the alert message (`<scope>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Public,
    Restricted,
    Private,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Public, Scope::Restricted, Scope::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Public => "Public",
            Scope::Restricted => "Restricted",
            Scope::Private => "Private",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scope::Public => "For general dissemination to unrestricted audience",
            Scope::Restricted => {
                "For dissemination only to users with a known operational \
                 requirement (see <restriction>)"
            }
            Scope::Private => "For dissemination only to specified addresses (see <addresses>)",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squish(s).as_str() {
            "Public" => Ok(Scope::Public),
            "Restricted" => Ok(Scope::Restricted),
            "Private" => Ok(Scope::Private),
            other => Err(EnumParseError::new("scope", other)),
        }
    }
}

/// Category of the subject event (`<category>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Geo,
    Met,
    Safety,
    Security,
    Rescue,
    Fire,
    Health,
    Env,
    Transport,
    Infra,
    Cbrne,
    Other,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Geo,
        Category::Met,
        Category::Safety,
        Category::Security,
        Category::Rescue,
        Category::Fire,
        Category::Health,
        Category::Env,
        Category::Transport,
        Category::Infra,
        Category::Cbrne,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Geo => "Geo",
            Category::Met => "Met",
            Category::Safety => "Safety",
            Category::Security => "Security",
            Category::Rescue => "Rescue",
            Category::Fire => "Fire",
            Category::Health => "Health",
            Category::Env => "Env",
            Category::Transport => "Transport",
            Category::Infra => "Infra",
            Category::Cbrne => "Cbrne",
            Category::Other => "Other",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Geo => "Geophysical (inc. landslide)",
            Category::Met => "Meteorological (inc. flood)",
            Category::Safety => "General emergency and public safety",
            Category::Security => {
                "Law enforcement, military, homeland and local/private security"
            }
            Category::Rescue => "Rescue and recovery",
            Category::Fire => "Fire suppression and rescue",
            Category::Health => "Medical and public health",
            Category::Env => "Pollution and other environmental",
            Category::Transport => "Public and private transportation",
            Category::Infra => "Utility, telecommunication, other non-transport infrastructure",
            Category::Cbrne => {
                "Chemical, Biological, Radiological, Nuclear or High-Yield \
                 Explosive threat or attack"
            }
            Category::Other => "Other events",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squish(s).as_str() {
            "Geo" => Ok(Category::Geo),
            "Met" => Ok(Category::Met),
            "Safety" => Ok(Category::Safety),
            "Security" => Ok(Category::Security),
            "Rescue" => Ok(Category::Rescue),
            "Fire" => Ok(Category::Fire),
            "Health" => Ok(Category::Health),
            "Env" => Ok(Category::Env),
            "Transport" => Ok(Category::Transport),
            "Infra" => Ok(Category::Infra),
            // IPAWS feeds emit the all-caps spelling.
            "Cbrne" | "CBRNE" => Ok(Category::Cbrne),
            "Other" => Ok(Category::Other),
            other => Err(EnumParseError::new("category", other)),
        }
    }
}

/// Recommended action for the appropriate audience (`<responseType>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Response {
    Shelter,
    Evacuate,
    Prepare,
    Execute,
    Avoid,
    Monitor,
    Assess,
    AllClear,
    None,
}

impl Response {
    pub const ALL: [Response; 9] = [
        Response::Shelter,
        Response::Evacuate,
        Response::Prepare,
        Response::Execute,
        Response::Avoid,
        Response::Monitor,
        Response::Assess,
        Response::AllClear,
        Response::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Response::Shelter => "Shelter",
            Response::Evacuate => "Evacuate",
            Response::Prepare => "Prepare",
            Response::Execute => "Execute",
            Response::Avoid => "Avoid",
            Response::Monitor => "Monitor",
            Response::Assess => "Assess",
            Response::AllClear => "All Clear",
            Response::None => "None",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Response::Shelter => "Take shelter in place or per <instruction>",
            Response::Evacuate => "Relocate as instructed in the <instruction>",
            Response::Prepare => "Make preparations per the <instruction>",
            Response::Execute => "Execute a pre-planned activity identified in <instruction>",
            Response::Avoid => "Avoid the subject event as per the <instruction>",
            Response::Monitor => "Attend to information sources as described in <instruction>",
            Response::Assess => "Evaluate the information in this message",
            Response::AllClear => {
                "The subject event no longer poses a threat or concern and any \
                 follow on action is described in <instruction>"
            }
            Response::None => "No action recommended",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Response {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squish(s).as_str() {
            "Shelter" => Ok(Response::Shelter),
            "Evacuate" => Ok(Response::Evacuate),
            "Prepare" => Ok(Response::Prepare),
            "Execute" => Ok(Response::Execute),
            "Avoid" => Ok(Response::Avoid),
            "Monitor" => Ok(Response::Monitor),
            "Assess" => Ok(Response::Assess),
            // CAP 1.2 writes the code without the space; older feeds include it.
            "All Clear" | "AllClear" => Ok(Response::AllClear),
            "None" => Ok(Response::None),
            other => Err(EnumParseError::new("responseType", other)),
        }
    }
}

/// Time available to prepare for the subject event (`<urgency>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Urgency {
    Immediate,
    Expected,
    Future,
    Past,
    #[default]
    Unknown,
}

impl Urgency {
    pub const ALL: [Urgency; 5] = [
        Urgency::Immediate,
        Urgency::Expected,
        Urgency::Future,
        Urgency::Past,
        Urgency::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Immediate => "Immediate",
            Urgency::Expected => "Expected",
            Urgency::Future => "Future",
            Urgency::Past => "Past",
            Urgency::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Urgency::Immediate => "Responsive action should be taken immediately",
            Urgency::Expected => "Responsive action should be taken soon (within next hour)",
            Urgency::Future => "Responsive action should be taken in the near future",
            Urgency::Past => "Responsive action is no longer required",
            Urgency::Unknown => "Urgency not known",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squish(s).as_str() {
            "Immediate" => Ok(Urgency::Immediate),
            "Expected" => Ok(Urgency::Expected),
            "Future" => Ok(Urgency::Future),
            "Past" => Ok(Urgency::Past),
            "Unknown" => Ok(Urgency::Unknown),
            other => Err(EnumParseError::new("urgency", other)),
        }
    }
}

/// Intensity of impact of the subject event (`<severity>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Severity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    #[default]
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Extreme,
        Severity::Severe,
        Severity::Moderate,
        Severity::Minor,
        Severity::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Extreme => "Extreme",
            Severity::Severe => "Severe",
            Severity::Moderate => "Moderate",
            Severity::Minor => "Minor",
            Severity::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Severity::Extreme => "Extraordinary threat to life or property",
            Severity::Severe => "Significant threat to life or property",
            Severity::Moderate => "Possible threat to life or property",
            Severity::Minor => "Minimal to no known threat to life or property",
            Severity::Unknown => "Severity unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squish(s).as_str() {
            "Extreme" => Ok(Severity::Extreme),
            "Severe" => Ok(Severity::Severe),
            "Moderate" => Ok(Severity::Moderate),
            "Minor" => Ok(Severity::Minor),
            "Unknown" => Ok(Severity::Unknown),
            other => Err(EnumParseError::new("severity", other)),
        }
    }
}

/// Confidence in the observation or prediction (`<certainty>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Certainty {
    Observed,
    Likely,
    Possible,
    Unlikely,
    #[default]
    Unknown,
}

impl Certainty {
    pub const ALL: [Certainty; 5] = [
        Certainty::Observed,
        Certainty::Likely,
        Certainty::Possible,
        Certainty::Unlikely,
        Certainty::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Certainty::Observed => "Observed",
            Certainty::Likely => "Likely",
            Certainty::Possible => "Possible",
            Certainty::Unlikely => "Unlikely",
            Certainty::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Certainty::Observed => "Determined to have occurred or to be ongoing",
            Certainty::Likely => "Likely (p > ~50%)",
            Certainty::Possible => "Possible but not likely (p <= ~50%)",
            Certainty::Unlikely => "Not expected to occur (p ~ 0)",
            Certainty::Unknown => "Certainty unknown",
        }
    }
}

impl fmt::Display for Certainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Certainty {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squish(s).as_str() {
            "Observed" => Ok(Certainty::Observed),
            "Likely" => Ok(Certainty::Likely),
            "Possible" => Ok(Certainty::Possible),
            "Unlikely" => Ok(Certainty::Unlikely),
            "Unknown" => Ok(Certainty::Unknown),
            other => Err(EnumParseError::new("certainty", other)),
        }
    }
}
