//! Markup front-end: `<NetworkModel>` documents into [`NetworkDocument`].
//!
//! Layout:
//! ```text
//! NetworkModel
//!   Substations/SubstationEntity*
//!   Nodes/NodeEntity*
//!   Switches/SwitchEntity*
//!   Lines/LineEntity*  (with Vertices/Point*)
//! ```
//! Each entity's child elements become fields keyed by tag name. Unknown
//! sections are ignored; a missing section reads as empty.

use roxmltree as xml;

use crate::document::{DocumentError, EntityRecord, Fields, NetworkDocument};

const ROOT: &str = "NetworkModel";

impl NetworkDocument {
    pub fn from_xml_str(payload: &str) -> Result<Self, DocumentError> {
        let doc = xml::Document::parse(payload).map_err(DocumentError::Xml)?;
        let root = doc.root_element();
        if !root.has_tag_name(ROOT) {
            return Err(DocumentError::UnexpectedRoot {
                found: root.tag_name().name().to_string(),
            });
        }

        Ok(NetworkDocument {
            substations: read_section(&root, "Substations", "SubstationEntity"),
            junctions: read_section(&root, "Nodes", "NodeEntity"),
            switches: read_section(&root, "Switches", "SwitchEntity"),
            lines: read_section(&root, "Lines", "LineEntity"),
        })
    }
}

fn read_section(root: &xml::Node, section: &str, entity: &str) -> Vec<EntityRecord> {
    root.children()
        .filter(|c| c.has_tag_name(section))
        .flat_map(|s| s.children().filter(move |c| c.has_tag_name(entity)))
        .map(|e| read_entity(&e))
        .collect()
}

fn read_entity(entity: &xml::Node) -> EntityRecord {
    let mut record = EntityRecord::new();
    for child in entity.children().filter(|c| c.is_element()) {
        if child.has_tag_name("Vertices") {
            record.vertices = child
                .children()
                .filter(|c| c.has_tag_name("Point"))
                .map(|p| read_fields(&p))
                .collect();
            continue;
        }
        record.fields.insert(
            child.tag_name().name().to_string(),
            child.text().unwrap_or_default().trim().to_string(),
        );
    }
    record
}

fn read_fields(node: &xml::Node) -> Fields {
    node.children()
        .filter(|c| c.is_element())
        .map(|c| {
            (
                c.tag_name().name().to_string(),
                c.text().unwrap_or_default().trim().to_string(),
            )
        })
        .collect()
}
