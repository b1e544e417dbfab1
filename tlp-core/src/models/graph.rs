use super::{Allocations, Commodity, Process, ProcessCenter, ProcessConnector};

/// The immutable description of one period's network, supplied by the caller.
///
/// Centers reference their process by name. The graph itself is read-only to
/// the engine; the one permitted mutation, recording realized production, is
/// performed by the caller via [`DomainGraph::record_production`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainGraph {
    /// Every commodity known to the period (informational; commodities referenced
    /// by processes need not be listed here)
    #[cfg_attr(feature = "serde", serde(default))]
    pub commodities: Vec<Commodity>,
    /// The technologies
    pub processes: Vec<Process>,
    /// The nodes of the network
    pub centers: Vec<ProcessCenter>,
    /// The legal technology-to-technology edges
    pub connectors: Vec<ProcessConnector>,
}

impl DomainGraph {
    /// Find a process by name
    pub fn process(&self, name: &str) -> Option<&Process> {
        self.processes.iter().find(|process| process.name == name)
    }

    /// Find a center by name
    pub fn center(&self, name: &str) -> Option<&ProcessCenter> {
        self.centers.iter().find(|center| center.name == name)
    }

    /// Write each center's realized outflow into `optimal_production`.
    ///
    /// Centers that shipped nothing are recorded with zero production.
    pub fn record_production(&mut self, allocations: &Allocations) {
        for center in self.centers.iter_mut() {
            center.optimal_production =
                Some(allocations.production.get(&center.name).copied().unwrap_or(0.0));
        }
    }
}
