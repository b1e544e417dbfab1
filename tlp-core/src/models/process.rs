use super::{Commodity, Map};

/// The closed set of roles a process (and therefore a process center) can play
/// in the network. Every constraint family matches on this exhaustively, so
/// adding a role forces each of them to be revisited.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum ProcessType {
    /// Transforms inputs into outputs according to its bill of materials
    Production,
    /// Originates commodities (mines, scrap collection, imports)
    Supply,
    /// Consumes a commodity to satisfy demand
    Demand,
}

/// The individual ratios a bill-of-materials entry may declare
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ParameterKind {
    /// Units of input consumed per unit of output
    InputRatio,
    /// Minimum share of this input among inputs producing the same outputs
    MinimumRatio,
    /// Maximum share of this input among inputs producing the same outputs
    MaximumRatio,
}

/// The (optional) ratios of a bill-of-materials entry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BomParameters {
    /// Units of input consumed per unit of output
    #[cfg_attr(feature = "serde", serde(default))]
    pub input_ratio: Option<f64>,
    /// Lower bound on this input's share of the inflow producing the same outputs
    #[cfg_attr(feature = "serde", serde(default))]
    pub minimum_ratio: Option<f64>,
    /// Upper bound on this input's share of the inflow producing the same outputs
    #[cfg_attr(feature = "serde", serde(default))]
    pub maximum_ratio: Option<f64>,
}

impl BomParameters {
    /// Look up a parameter by kind
    pub fn get(&self, kind: ParameterKind) -> Option<f64> {
        match kind {
            ParameterKind::InputRatio => self.input_ratio,
            ParameterKind::MinimumRatio => self.minimum_ratio,
            ParameterKind::MaximumRatio => self.maximum_ratio,
        }
    }

    /// Iterate over the declared parameters
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKind, f64)> + '_ {
        [
            ParameterKind::InputRatio,
            ParameterKind::MinimumRatio,
            ParameterKind::MaximumRatio,
        ]
        .into_iter()
        .filter_map(|kind| self.get(kind).map(|value| (kind, value)))
    }
}

/// One line of a recipe: a single input commodity, the outputs it can yield,
/// and the ratios governing its use.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BomElement {
    /// A descriptive name for the entry
    pub name: String,
    /// The commodity consumed
    pub input: Commodity,
    /// The commodities this input can be turned into
    #[cfg_attr(feature = "serde", serde(default))]
    pub outputs: Vec<Commodity>,
    /// Ratios (all optional)
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: BomParameters,
    /// Additional commodities required per unit of input (e.g. flux per unit of ore)
    #[cfg_attr(feature = "serde", serde(default))]
    pub dependent_commodities: Map<Commodity, f64>,
    /// The energy cost incurred per unit of input consumed
    #[cfg_attr(feature = "serde", serde(default))]
    pub energy_cost: f64,
}

/// A technology: its role in the network and its bill of materials.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Process {
    /// The unique process name, referenced by centers and connectors
    pub name: String,
    /// The role of the process
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ProcessType,
    /// The recipe, in declaration order
    #[cfg_attr(feature = "serde", serde(default))]
    pub bill_of_materials: Vec<BomElement>,
}

impl Process {
    /// The unique union of every BOM element's outputs, in first-seen order
    pub fn products(&self) -> Vec<Commodity> {
        let mut products = Vec::new();
        for output in self.bill_of_materials.iter().flat_map(|bom| bom.outputs.iter()) {
            if !products.contains(output) {
                products.push(output.clone());
            }
        }
        products
    }

    /// The unique primary inputs, in first-seen order
    pub fn inputs(&self) -> Vec<Commodity> {
        let mut inputs: Vec<Commodity> = Vec::new();
        for bom in self.bill_of_materials.iter() {
            if !inputs.contains(&bom.input) {
                inputs.push(bom.input.clone());
            }
        }
        inputs
    }

    /// The unique dependent commodities required by any BOM element, in first-seen order
    pub fn dependent_inputs(&self) -> Vec<Commodity> {
        let mut dependents: Vec<Commodity> = Vec::new();
        for dependent in self
            .bill_of_materials
            .iter()
            .flat_map(|bom| bom.dependent_commodities.keys())
        {
            if !dependents.contains(dependent) {
                dependents.push(dependent.clone());
            }
        }
        dependents
    }

    /// Is `commodity` consumed by this process, either as a primary input or as a dependent requirement?
    pub fn consumes(&self, commodity: &Commodity) -> bool {
        self.bill_of_materials.iter().any(|bom| {
            &bom.input == commodity || bom.dependent_commodities.contains_key(commodity)
        })
    }
}
