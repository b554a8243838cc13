use std::fmt;
use std::path::Path;
use std::str::FromStr;

use foundation::math::{GeoPoint, UtmZone, projected_to_geographic};
use network::{NetworkGraph, NetworkGraphBuilder, NodeKind, PowerLine, PowerNode};
use tracing::{debug, info};

use crate::document::{DocumentError, EntityRecord, Fields, NetworkDocument};

/// Survey coordinates in the shipped documents are UTM zone 34N.
pub const DEFAULT_UTM_ZONE: u8 = 34;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    Substations,
    Junctions,
    Switches,
    Lines,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Substations => "substations",
            Section::Junctions => "junctions",
            Section::Switches => "switches",
            Section::Lines => "lines",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum NetworkLoadError {
    Document(DocumentError),
    MalformedDocument {
        section: Section,
        /// Position of the entity within its section.
        index: usize,
        field: String,
        reason: String,
    },
}

impl fmt::Display for NetworkLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkLoadError::Document(e) => write!(f, "document error: {e}"),
            NetworkLoadError::MalformedDocument {
                section,
                index,
                field,
                reason,
            } => write!(f, "malformed {section} entity #{index}: field {field}: {reason}"),
        }
    }
}

impl std::error::Error for NetworkLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkLoadError::Document(e) => Some(e),
            NetworkLoadError::MalformedDocument { .. } => None,
        }
    }
}

/// Loader settings shared by every entity of a document.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoadOptions {
    pub zone: UtmZone,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            zone: UtmZone::north(DEFAULT_UTM_ZONE),
        }
    }
}

/// Counters reported alongside a loaded graph.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub nodes_filtered: usize,
    pub lines_dropped: usize,
}

pub fn load_network_from_path<F>(
    path: impl AsRef<Path>,
    options: LoadOptions,
    filter: F,
) -> Result<(NetworkGraph, LoadReport), NetworkLoadError>
where
    F: FnMut(&PowerNode) -> bool,
{
    let document = NetworkDocument::load(path).map_err(NetworkLoadError::Document)?;
    load_network_with_report(&document, options, filter)
}

/// Builds a graph from `document`, keeping only nodes accepted by `filter`.
///
/// Lines whose endpoints did not survive the filter are dropped silently.
pub fn load_network<F>(
    document: &NetworkDocument,
    options: LoadOptions,
    filter: F,
) -> Result<NetworkGraph, NetworkLoadError>
where
    F: FnMut(&PowerNode) -> bool,
{
    load_network_with_report(document, options, filter).map(|(graph, _)| graph)
}

pub fn load_network_with_report<F>(
    document: &NetworkDocument,
    options: LoadOptions,
    mut filter: F,
) -> Result<(NetworkGraph, LoadReport), NetworkLoadError>
where
    F: FnMut(&PowerNode) -> bool,
{
    let mut builder = NetworkGraphBuilder::new();
    let mut report = LoadReport::default();

    let node_sections = [
        (Section::Substations, &document.substations),
        (Section::Junctions, &document.junctions),
        (Section::Switches, &document.switches),
    ];
    for (section, records) in node_sections {
        for (index, record) in records.iter().enumerate() {
            let reader = RecordReader::new(section, index, &record.fields);
            match read_node(&reader, options.zone, &mut filter)? {
                Some(node) => {
                    builder.push_node(node);
                }
                None => report.nodes_filtered += 1,
            }
        }
    }

    for (index, record) in document.lines.iter().enumerate() {
        let reader = RecordReader::new(Section::Lines, index, &record.fields);
        let id: i64 = reader.parse("Id")?;
        let first_end: i64 = reader.parse("FirstEnd")?;
        let second_end: i64 = reader.parse("SecondEnd")?;
        if !builder.contains_node(first_end) || !builder.contains_node(second_end) {
            debug!(line_id = id, first_end, second_end, "dropping line with unresolved endpoint");
            report.lines_dropped += 1;
            continue;
        }

        let line = read_line(&reader, record, id, first_end, second_end, options.zone)?;
        if let Err(dangling) = builder.push_line(line) {
            debug!(?dangling, "dropping line with unresolved endpoint");
            report.lines_dropped += 1;
        }
    }

    let graph = builder.finish();
    info!(
        nodes = graph.nodes().len(),
        lines = graph.lines().len(),
        nodes_filtered = report.nodes_filtered,
        lines_dropped = report.lines_dropped,
        "network loaded"
    );
    Ok((graph, report))
}

fn read_node<F>(
    reader: &RecordReader<'_>,
    zone: UtmZone,
    filter: &mut F,
) -> Result<Option<PowerNode>, NetworkLoadError>
where
    F: FnMut(&PowerNode) -> bool,
{
    // Identity and position decide whether the node is kept at all.
    let id: i64 = reader.parse("Id")?;
    let position = reader.position(zone)?;

    let kind = match reader.section {
        Section::Substations => NodeKind::Substation,
        Section::Junctions => NodeKind::Junction,
        _ => NodeKind::Switch {
            is_open: reader
                .optional("Status")
                .is_some_and(|s| is_open_status(s).unwrap_or(false)),
        },
    };
    let name = reader.optional("Name").unwrap_or_default();
    let candidate = PowerNode::new(id, name, position, kind);
    if !filter(&candidate) {
        return Ok(None);
    }

    // Retained: every remaining field is mandatory.
    let name = reader.text("Name")?;
    let kind = match kind {
        NodeKind::Switch { .. } => {
            let status = reader.text("Status")?;
            let is_open =
                is_open_status(status).map_err(|reason| reader.malformed("Status", reason))?;
            NodeKind::Switch { is_open }
        }
        other => other,
    };
    Ok(Some(PowerNode::new(id, name, position, kind)))
}

fn read_line(
    reader: &RecordReader<'_>,
    record: &EntityRecord,
    id: i64,
    first_end: i64,
    second_end: i64,
    zone: UtmZone,
) -> Result<PowerLine, NetworkLoadError> {
    let vertices = record
        .vertices
        .iter()
        .enumerate()
        .map(|(i, fields)| {
            RecordReader::new(Section::Lines, reader.index, fields)
                .position(zone)
                .map_err(|e| match e {
                    NetworkLoadError::MalformedDocument {
                        section,
                        index,
                        field,
                        reason,
                    } => NetworkLoadError::MalformedDocument {
                        section,
                        index,
                        field: format!("Vertices[{i}].{field}"),
                        reason,
                    },
                    other => other,
                })
        })
        .collect::<Result<Vec<GeoPoint>, _>>()?;
    if vertices.len() < 2 {
        return Err(reader.malformed(
            "Vertices",
            format!("a line needs at least 2 points, found {}", vertices.len()),
        ));
    }

    Ok(PowerLine {
        id,
        name: reader.text("Name")?.to_string(),
        first_end,
        second_end,
        vertices,
        is_underground: reader.bool("IsUnderground")?,
        resistance: reader.parse("R")?,
        conductor_material: reader.text("ConductorMaterial")?.to_string(),
        line_type: reader.text("LineType")?.to_string(),
        thermal_constant_heat: reader.parse("ThermalConstantHeat")?,
    })
}

fn is_open_status(status: &str) -> Result<bool, String> {
    if status.eq_ignore_ascii_case("open") {
        Ok(true)
    } else if status.eq_ignore_ascii_case("closed") {
        Ok(false)
    } else {
        Err(format!("expected Open or Closed, found {status:?}"))
    }
}

/// Typed access to one entity's fields, producing located errors.
struct RecordReader<'a> {
    section: Section,
    index: usize,
    fields: &'a Fields,
}

impl<'a> RecordReader<'a> {
    fn new(section: Section, index: usize, fields: &'a Fields) -> Self {
        Self {
            section,
            index,
            fields,
        }
    }

    fn malformed(&self, field: &str, reason: impl Into<String>) -> NetworkLoadError {
        NetworkLoadError::MalformedDocument {
            section: self.section,
            index: self.index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    fn optional(&self, field: &str) -> Option<&'a str> {
        self.fields.get(field).map(|v| v.trim())
    }

    fn text(&self, field: &str) -> Result<&'a str, NetworkLoadError> {
        self.optional(field)
            .ok_or_else(|| self.malformed(field, "missing"))
    }

    fn parse<T>(&self, field: &str) -> Result<T, NetworkLoadError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.text(field)?;
        raw.parse::<T>()
            .map_err(|e| self.malformed(field, format!("cannot parse {raw:?}: {e}")))
    }

    fn bool(&self, field: &str) -> Result<bool, NetworkLoadError> {
        let raw = self.text(field)?;
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.malformed(field, format!("expected true or false, found {raw:?}")))
        }
    }

    fn position(&self, zone: UtmZone) -> Result<GeoPoint, NetworkLoadError> {
        let x: f64 = self.parse("X")?;
        let y: f64 = self.parse("Y")?;
        Ok(projected_to_geographic(x, y, zone))
    }
}
