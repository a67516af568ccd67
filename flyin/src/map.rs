//! Parser for the textual description of a drone map.
//!
//! A map is a sequence of `key: value` lines. Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! nb_drones: 2
//! start_hub: start 0 0 [color=green max_drones=2]
//! hub: roof 1 0 [zone=restricted]
//! end_hub: goal 2 0
//! connection: start-roof [max_link_capacity=2]
//! connection: roof-goal
//! ```

use derive_more::Display;
use itertools::Itertools;
use std::collections::HashMap;
use std::str::FromStr;
use tenet::Capacity;
use thiserror::Error;

/// Kind of area a hub is located in.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Zone {
    #[display("normal")]
    Normal,
    /// Cannot be traversed.
    #[display("blocked")]
    Blocked,
    /// Entering the hub takes two turns.
    #[display("restricted")]
    Restricted,
    /// Takes a single turn but should be preferred over normal hubs.
    #[display("priority")]
    Priority,
    #[display("start_hub")]
    Start,
    #[display("end_hub")]
    End,
}

impl FromStr for Zone {
    type Err = LineError;

    /// Parses the zones that can be given explicitly in the metadata of a hub.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Zone::Normal),
            "blocked" => Ok(Zone::Blocked),
            "restricted" => Ok(Zone::Restricted),
            "priority" => Ok(Zone::Priority),
            _ => Err(LineError::InvalidZone(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hub {
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub zone: Zone,
    /// Display color, kept as given.
    pub color: Option<String>,
    /// Maximum number of drones in the hub at any time.
    pub max_drones: Capacity,
}

impl Hub {
    pub fn new(name: impl Into<String>, x: i64, y: i64) -> Self {
        Hub {
            name: name.into(),
            x,
            y,
            zone: Zone::Normal,
            color: None,
            max_drones: 1,
        }
    }

    pub fn with_zone(self, zone: Zone) -> Self {
        Hub { zone, ..self }
    }
}

/// Bidirectional link between two hubs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub first: String,
    pub second: String,
    /// Maximum number of drones moving along the link at the same time.
    pub max_link_capacity: Capacity,
}

impl Connection {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Connection {
            first: first.into(),
            second: second.into(),
            max_link_capacity: 1,
        }
    }

    pub fn with_capacity(self, max_link_capacity: Capacity) -> Self {
        Connection {
            max_link_capacity,
            ..self
        }
    }
}

/// A parsed map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    pub nb_drones: u32,
    /// All hubs in declaration order, including the start and end hubs.
    pub hubs: Vec<Hub>,
    pub connections: Vec<Connection>,
    /// Index of the start hub in `hubs`.
    pub start: usize,
    /// Index of the end hub in `hubs`.
    pub end: usize,
}

impl Map {
    pub fn parse(input: &str) -> Result<Map, MapError> {
        let mut builder = MapBuilder::default();
        for (i, line) in input.lines().enumerate() {
            builder
                .line(i + 1, line)
                .map_err(|kind| MapError::Line { line: i + 1, kind })?;
        }
        builder.finish()
    }

    /// `None` only for a map built by hand with `start` out of range.
    pub fn start_hub(&self) -> Option<&Hub> {
        self.hubs.get(self.start)
    }

    pub fn end_hub(&self) -> Option<&Hub> {
        self.hubs.get(self.end)
    }

    pub fn hub(&self, name: &str) -> Option<&Hub> {
        self.hubs.iter().find(|h| h.name == name)
    }
}

impl FromStr for Map {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Map::parse(s)
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Key {
    #[display("nb_drones")]
    NbDrones,
    #[display("start_hub")]
    StartHub,
    #[display("end_hub")]
    EndHub,
    #[display("hub")]
    Hub,
    #[display("connection")]
    Connection,
}

impl Key {
    fn unique(self) -> bool {
        matches!(self, Key::NbDrones | Key::StartHub | Key::EndHub)
    }
}

impl FromStr for Key {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nb_drones" => Ok(Key::NbDrones),
            "start_hub" => Ok(Key::StartHub),
            "end_hub" => Ok(Key::EndHub),
            "hub" => Ok(Key::Hub),
            "connection" => Ok(Key::Connection),
            _ => Err(LineError::UnknownKey(s.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    #[display("zone")]
    Zone,
    #[display("color")]
    Color,
    #[display("max_drones")]
    MaxDrones,
    #[display("max_link_capacity")]
    MaxLinkCapacity,
}

impl FromStr for MetadataKey {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zone" => Ok(MetadataKey::Zone),
            "color" => Ok(MetadataKey::Color),
            "max_drones" => Ok(MetadataKey::MaxDrones),
            "max_link_capacity" => Ok(MetadataKey::MaxLinkCapacity),
            _ => Err(LineError::UnknownMetadata(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("line {line}: {kind}")]
    Line { line: usize, kind: LineError },
    #[error("missing required key(s): {}", .0.iter().join(", "))]
    MissingKeys(Vec<Key>),
}

/// Problem found on a single line of a map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("expected `<key>: <value>`")]
    MissingColon,
    #[error("unknown key `{0}` (expected nb_drones, start_hub, end_hub, hub or connection)")]
    UnknownKey(String),
    #[error("`{0}` may only be given once")]
    DuplicateKey(Key),
    #[error("`{0}` is not a valid integer")]
    InvalidInteger(String),
    #[error("the number of drones must be at least 1")]
    NoDrones,
    #[error("expected `<name> <x> <y> [metadata]`")]
    HubUsage,
    #[error("expected `<hub>-<hub> [metadata]`")]
    ConnectionUsage,
    #[error("hub names must not be empty")]
    EmptyName,
    #[error("hub name `{0}` must not contain dashes")]
    DashInName(String),
    #[error("hub `{0}` cannot be connected to itself")]
    SelfConnection(String),
    #[error("metadata must be enclosed in []")]
    UnbracketedMetadata,
    #[error("empty metadata")]
    EmptyMetadata,
    #[error("metadata item `{0}` is not in key=value format")]
    MalformedMetadata(String),
    #[error("unsupported metadata key `{0}`")]
    UnknownMetadata(String),
    #[error("metadata `{key}` is not allowed for a {target}")]
    MetadataNotAllowed { key: MetadataKey, target: &'static str },
    #[error("duplicate metadata key `{0}`")]
    DuplicateMetadata(MetadataKey),
    #[error("invalid zone type `{0}`")]
    InvalidZone(String),
    #[error("metadata `{key}` must be a positive integer, got `{value}`")]
    NotPositive { key: MetadataKey, value: String },
    #[error("the zone of the {0} cannot be set")]
    EndpointZone(Key),
    #[error("duplicate hub name `{0}`")]
    DuplicateHub(String),
    #[error("unknown hub `{0}`")]
    UnknownHub(String),
}

#[derive(Default)]
struct MapBuilder {
    nb_drones: Option<u32>,
    start: Option<usize>,
    end: Option<usize>,
    hubs: Vec<Hub>,
    names: HashMap<String, usize>,
    /// Connections with the line they were declared on. They may refer to hubs declared later.
    connections: Vec<(usize, Connection)>,
    seen: Vec<Key>,
}

impl MapBuilder {
    fn line(&mut self, line_number: usize, line: &str) -> Result<(), LineError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        let (key, value) = line.split_once(':').ok_or(LineError::MissingColon)?;
        let key: Key = key.trim().parse()?;
        if key.unique() {
            if self.seen.contains(&key) {
                return Err(LineError::DuplicateKey(key));
            }
            self.seen.push(key);
        }
        match key {
            Key::NbDrones => self.nb_drones = Some(parse_nb_drones(value)?),
            Key::StartHub => self.start = Some(self.add_hub(parse_hub(value, Some(Key::StartHub))?)?),
            Key::EndHub => self.end = Some(self.add_hub(parse_hub(value, Some(Key::EndHub))?)?),
            Key::Hub => {
                self.add_hub(parse_hub(value, None)?)?;
            }
            Key::Connection => self.connections.push((line_number, parse_connection(value)?)),
        }
        Ok(())
    }

    fn add_hub(&mut self, hub: Hub) -> Result<usize, LineError> {
        if self.names.contains_key(&hub.name) {
            return Err(LineError::DuplicateHub(hub.name));
        }
        let index = self.hubs.len();
        self.names.insert(hub.name.clone(), index);
        self.hubs.push(hub);
        Ok(index)
    }

    fn finish(self) -> Result<Map, MapError> {
        let (Some(nb_drones), Some(start), Some(end)) = (self.nb_drones, self.start, self.end) else {
            let missing = [
                (Key::NbDrones, self.nb_drones.is_none()),
                (Key::StartHub, self.start.is_none()),
                (Key::EndHub, self.end.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, missing)| missing.then_some(key))
            .collect();
            return Err(MapError::MissingKeys(missing));
        };
        for (line, connection) in &self.connections {
            for name in [&connection.first, &connection.second] {
                if !self.names.contains_key(name) {
                    return Err(MapError::Line {
                        line: *line,
                        kind: LineError::UnknownHub(name.clone()),
                    });
                }
            }
        }
        Ok(Map {
            nb_drones,
            hubs: self.hubs,
            connections: self.connections.into_iter().map(|(_, c)| c).collect(),
            start,
            end,
        })
    }
}

/// Splits off the first whitespace-separated token of `s`.
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    s.split_once(char::is_whitespace).unwrap_or((s, ""))
}

fn parse_int<T: FromStr>(s: &str) -> Result<T, LineError> {
    s.parse().map_err(|_| LineError::InvalidInteger(s.to_string()))
}

fn parse_nb_drones(value: &str) -> Result<u32, LineError> {
    let value = value.trim();
    let n: i64 = parse_int(value)?;
    if n < 1 {
        return Err(LineError::NoDrones);
    }
    u32::try_from(n).map_err(|_| LineError::InvalidInteger(value.to_string()))
}

fn parse_name(name: &str) -> Result<String, LineError> {
    if name.contains('-') {
        return Err(LineError::DashInName(name.to_string()));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(LineError::EmptyName);
    }
    Ok(name.to_string())
}

/// Metadata block of a hub or connection, e.g. `[zone=priority color=green max_drones=3]`.
#[derive(Default, Debug, PartialEq, Eq)]
struct Metadata {
    zone: Option<Zone>,
    color: Option<String>,
    max_drones: Option<Capacity>,
    max_link_capacity: Option<Capacity>,
}

impl Metadata {
    fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }
}

fn positive(key: MetadataKey, value: &str) -> Result<Capacity, LineError> {
    let n: i64 = parse_int(value)?;
    if n < 1 {
        return Err(LineError::NotPositive {
            key,
            value: value.to_string(),
        });
    }
    Capacity::try_from(n).map_err(|_| LineError::InvalidInteger(value.to_string()))
}

fn parse_metadata(token: &str, target: &'static str, allowed: &[MetadataKey]) -> Result<Metadata, LineError> {
    let token = token.trim();
    let mut metadata = Metadata::default();
    if token.is_empty() {
        return Ok(metadata);
    }
    let items = token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or(LineError::UnbracketedMetadata)?;
    let mut seen = Vec::with_capacity(allowed.len());
    for item in items.split_whitespace() {
        let (key, value) = item
            .split_once('=')
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| LineError::MalformedMetadata(item.to_string()))?;
        let key: MetadataKey = key.parse()?;
        if !allowed.contains(&key) {
            return Err(LineError::MetadataNotAllowed { key, target });
        }
        if seen.contains(&key) {
            return Err(LineError::DuplicateMetadata(key));
        }
        seen.push(key);
        match key {
            MetadataKey::Zone => metadata.zone = Some(value.parse()?),
            MetadataKey::Color => metadata.color = Some(value.to_string()),
            MetadataKey::MaxDrones => metadata.max_drones = Some(positive(key, value)?),
            MetadataKey::MaxLinkCapacity => metadata.max_link_capacity = Some(positive(key, value)?),
        }
    }
    Ok(metadata)
}

/// Parses `<name> <x> <y> [metadata]`. `endpoint` is set for the start and end hubs, whose zone is implied.
fn parse_hub(value: &str, endpoint: Option<Key>) -> Result<Hub, LineError> {
    let (name, rest) = next_token(value);
    let (x, rest) = next_token(rest);
    let (y, rest) = next_token(rest);
    if y.is_empty() {
        return Err(LineError::HubUsage);
    }
    let metadata = parse_metadata(
        rest,
        "hub",
        &[MetadataKey::Zone, MetadataKey::Color, MetadataKey::MaxDrones],
    )?;
    let zone = match (endpoint, metadata.zone) {
        (Some(key), Some(_)) => return Err(LineError::EndpointZone(key)),
        (Some(Key::StartHub), None) => Zone::Start,
        (Some(_), None) => Zone::End,
        (None, zone) => zone.unwrap_or(Zone::Normal),
    };
    Ok(Hub {
        name: parse_name(name)?,
        x: parse_int(x)?,
        y: parse_int(y)?,
        zone,
        color: metadata.color,
        max_drones: metadata.max_drones.unwrap_or(1),
    })
}

/// Parses `<first>-<second> [metadata]`.
fn parse_connection(value: &str) -> Result<Connection, LineError> {
    let (endpoints, rest) = next_token(value);
    let (first, second) = endpoints.split_once('-').ok_or(LineError::ConnectionUsage)?;
    let mut connection = Connection::new(parse_name(first)?, parse_name(second)?);
    if connection.first == connection.second {
        return Err(LineError::SelfConnection(connection.first));
    }
    if !rest.trim().is_empty() {
        let metadata = parse_metadata(rest, "connection", &[MetadataKey::MaxLinkCapacity])?;
        if metadata.is_empty() {
            return Err(LineError::EmptyMetadata);
        }
        connection.max_link_capacity = metadata.max_link_capacity.unwrap_or(1);
    }
    Ok(connection)
}
