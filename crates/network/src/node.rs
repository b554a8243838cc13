use foundation::math::GeoPoint;

/// Stable identifier carried over from the source document.
pub type NetworkId = i64;

/// The closed set of node variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Substation,
    Junction,
    Switch { is_open: bool },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Substation => "Substation",
            NodeKind::Junction => "Junction",
            NodeKind::Switch { .. } => "Switch",
        }
    }
}

/// Visual class of a node derived from how many lines terminate at it.
///
/// Boundaries are inclusive: up to 3 is `Low`, 4..=5 is `Medium`, 6+ is `High`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnectionTier {
    Low,
    Medium,
    High,
}

impl ConnectionTier {
    pub fn classify(connection_count: u32) -> Self {
        match connection_count {
            0..=3 => ConnectionTier::Low,
            4..=5 => ConnectionTier::Medium,
            _ => ConnectionTier::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerNode {
    pub id: NetworkId,
    pub name: String,
    pub position: GeoPoint,
    pub kind: NodeKind,
    /// Number of retained lines with this node as an endpoint. Derived on load.
    pub(crate) connection_count: u32,
}

impl PowerNode {
    pub fn new(id: NetworkId, name: impl Into<String>, position: GeoPoint, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            kind,
            connection_count: 0,
        }
    }

    pub fn substation(id: NetworkId, name: impl Into<String>, position: GeoPoint) -> Self {
        Self::new(id, name, position, NodeKind::Substation)
    }

    pub fn junction(id: NetworkId, name: impl Into<String>, position: GeoPoint) -> Self {
        Self::new(id, name, position, NodeKind::Junction)
    }

    pub fn switch(id: NetworkId, name: impl Into<String>, position: GeoPoint, is_open: bool) -> Self {
        Self::new(id, name, position, NodeKind::Switch { is_open })
    }

    pub fn connection_count(&self) -> u32 {
        self.connection_count
    }

    pub fn connection_tier(&self) -> ConnectionTier {
        ConnectionTier::classify(self.connection_count)
    }

    pub fn tooltip(&self) -> String {
        let mut text = format!(
            "{}\n{} {}\nConnections: {}",
            self.kind.name(),
            self.id,
            self.name,
            self.connection_count
        );
        if let NodeKind::Switch { is_open } = self.kind {
            text.push_str(if is_open {
                "\nStatus: OPEN"
            } else {
                "\nStatus: CLOSED"
            });
        }
        text
    }
}
