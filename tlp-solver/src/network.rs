use crate::error::ConfigurationError;
use crate::index::{CenterId, CommodityId, RegionId, indices};
use crate::{Map, Set};
use tlp_core::models::{
    BomParameters, Commodity, DomainGraph, Process, ProcessCenter, ProcessType,
};
use tracing::{Level, event};

/// The outputs a primary input can be turned into, sorted and deduplicated so
/// that inputs yielding the same outputs compare equal.
pub type OutputSet = Vec<CommodityId>;

/// A primary input of a recipe. BOM elements sharing an input are merged: their
/// outputs are united and the first declared value of every parameter wins.
#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub outputs: OutputSet,
    pub parameters: BomParameters,
    pub energy_cost: f64,
    pub dependents: Map<CommodityId, f64>,
}

/// A process's bill of materials, resolved to interned commodities.
#[derive(Debug, Clone, Default)]
pub struct Recipe {
    pub products: Vec<CommodityId>,
    pub inputs: Map<CommodityId, RecipeInput>,
    pub dependents: Vec<CommodityId>,
}

impl Recipe {
    /// Is `commodity` a primary input?
    pub fn consumes(&self, commodity: CommodityId) -> bool {
        self.inputs.contains_key(&commodity)
    }

    /// Is `commodity` required as a dependent of some primary input?
    pub fn requires(&self, commodity: CommodityId) -> bool {
        self.dependents.contains(&commodity)
    }

    /// The primary inputs yielding exactly the same outputs as `input` (including itself)
    pub fn substitutes(&self, input: CommodityId) -> Vec<CommodityId> {
        let Some(outputs) = self.inputs.get(&input).map(|x| &x.outputs) else {
            return Vec::new();
        };
        self.inputs
            .iter()
            .filter(|(_, other)| &other.outputs == outputs)
            .map(|(&id, _)| id)
            .collect()
    }

    /// The primary inputs grouped by the output set they yield, in first-seen order
    pub fn groups(&self) -> Map<&OutputSet, Vec<CommodityId>> {
        let mut groups = Map::<&OutputSet, Vec<CommodityId>>::default();
        for (&id, input) in self.inputs.iter() {
            groups.entry(&input.outputs).or_default().push(id);
        }
        groups
    }
}

/// A process center together with everything resolved about it.
#[derive(Debug)]
pub struct Node<'g> {
    pub center: &'g ProcessCenter,
    pub process: &'g Process,
    pub kind: ProcessType,
    pub region: RegionId,
    recipe: usize,
}

/// The domain graph resolved into an arena: centers, commodities and countries
/// are interned once, and every later table is keyed by typed indices.
#[derive(Debug)]
pub struct Network<'g> {
    commodities: Set<Commodity>,
    regions: Set<String>,
    recipes: Vec<Recipe>,
    nodes: Vec<Node<'g>>,
    // process-by-process connector matrix
    permitted: Vec<Vec<bool>>,
}

impl<'g> Network<'g> {
    /// Resolve and validate the graph. Fails fast on contradictory data.
    pub fn resolve(graph: &'g DomainGraph) -> Result<Self, ConfigurationError> {
        let mut commodities = Set::<Commodity>::default();
        for commodity in graph.commodities.iter() {
            commodities.insert(commodity.clone());
        }

        // Index the processes by name
        let mut process_index = Map::<&str, usize>::default();
        for (idx, process) in graph.processes.iter().enumerate() {
            if process_index.insert(process.name.as_str(), idx).is_some() {
                return Err(ConfigurationError::DuplicateProcess(process.name.clone()));
            }
        }

        let recipes = graph
            .processes
            .iter()
            .map(|process| resolve_recipe(process, &mut commodities))
            .collect::<Result<Vec<_>, _>>()?;

        let mut regions = Set::<String>::default();
        let mut names = Set::<&str>::default();
        let mut nodes = Vec::with_capacity(graph.centers.len());
        for center in graph.centers.iter() {
            if !names.insert(center.name.as_str()) {
                return Err(ConfigurationError::DuplicateCenter(center.name.clone()));
            }
            let Some(&recipe) = process_index.get(center.process.as_str()) else {
                return Err(ConfigurationError::UnknownProcess {
                    center: center.name.clone(),
                    process: center.process.clone(),
                });
            };
            validate_center(center)?;

            let (region, _) = regions.insert_full(center.location.iso3.clone());
            let process = &graph.processes[recipe];
            nodes.push(Node {
                center,
                process,
                kind: process.kind,
                region: region.into(),
                recipe,
            });
        }

        let permitted = graph
            .processes
            .iter()
            .map(|from| {
                graph
                    .processes
                    .iter()
                    .map(|to| {
                        graph
                            .connectors
                            .iter()
                            .any(|connector| connector.permits(&from.name, &to.name))
                    })
                    .collect()
            })
            .collect();

        event!(
            Level::DEBUG,
            centers = nodes.len(),
            processes = recipes.len(),
            commodities = commodities.len(),
            regions = regions.len(),
            "resolved domain graph"
        );

        Ok(Self {
            commodities,
            regions,
            recipes,
            nodes,
            permitted,
        })
    }

    /// The number of centers
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over the centers with their indices
    pub fn centers(&self) -> impl Iterator<Item = (CenterId, &Node<'g>)> {
        indices(self.nodes.len()).zip(self.nodes.iter())
    }

    /// The resolved center
    pub fn node(&self, id: CenterId) -> &Node<'g> {
        &self.nodes[id.index()]
    }

    /// The recipe of a center's process
    pub fn recipe(&self, id: CenterId) -> &Recipe {
        &self.recipes[self.nodes[id.index()].recipe]
    }

    /// Does some connector permit flow from one center's process to another's?
    pub fn permits(&self, from: CenterId, to: CenterId) -> bool {
        self.permitted[self.nodes[from.index()].recipe][self.nodes[to.index()].recipe]
    }

    /// The interned id of a commodity, if any process or listing mentions it
    pub fn commodity_id(&self, commodity: &Commodity) -> Option<CommodityId> {
        self.commodities.get_index_of(commodity).map(CommodityId::from)
    }

    /// The commodity behind an id
    pub fn commodity(&self, id: CommodityId) -> &Commodity {
        &self.commodities[id.index()]
    }

    /// The interned id of a country, if any center is located there
    pub fn region_id(&self, iso3: &str) -> Option<RegionId> {
        self.regions.get_index_of(iso3).map(RegionId::from)
    }
}

fn resolve_recipe(
    process: &Process,
    commodities: &mut Set<Commodity>,
) -> Result<Recipe, ConfigurationError> {
    let mut intern = |commodity: &Commodity| -> CommodityId {
        commodities.insert_full(commodity.clone()).0.into()
    };

    let mut recipe = Recipe::default();
    for bom in process.bill_of_materials.iter() {
        validate_bom(process, bom)?;

        let input = intern(&bom.input);
        let mut outputs = bom.outputs.iter().map(&mut intern).collect::<Vec<_>>();
        for &output in outputs.iter() {
            if !recipe.products.contains(&output) {
                recipe.products.push(output);
            }
        }
        outputs.sort_unstable();
        outputs.dedup();

        let dependents = bom
            .dependent_commodities
            .iter()
            .map(|(commodity, &ratio)| (intern(commodity), ratio))
            .collect::<Map<_, _>>();
        for &dependent in dependents.keys() {
            if !recipe.dependents.contains(&dependent) {
                recipe.dependents.push(dependent);
            }
        }

        if let Some(existing) = recipe.inputs.get_mut(&input) {
            event!(
                Level::DEBUG,
                process = %process.name,
                input = %bom.input,
                "merging repeated BOM input"
            );
            existing.outputs.extend(outputs);
            existing.outputs.sort_unstable();
            existing.outputs.dedup();
            let parameters = &mut existing.parameters;
            parameters.input_ratio = parameters.input_ratio.or(bom.parameters.input_ratio);
            parameters.minimum_ratio = parameters.minimum_ratio.or(bom.parameters.minimum_ratio);
            parameters.maximum_ratio = parameters.maximum_ratio.or(bom.parameters.maximum_ratio);
            for (dependent, ratio) in dependents {
                existing.dependents.entry(dependent).or_insert(ratio);
            }
        } else {
            recipe.inputs.insert(
                input,
                RecipeInput {
                    outputs,
                    parameters: bom.parameters.clone(),
                    energy_cost: bom.energy_cost,
                    dependents,
                },
            );
        }
    }

    Ok(recipe)
}

fn validate_bom(
    process: &Process,
    bom: &tlp_core::models::BomElement,
) -> Result<(), ConfigurationError> {
    let entity = || format!("BOM element `{}` of process `{}`", bom.name, process.name);

    for (kind, value) in bom.parameters.iter() {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                entity: entity(),
                field: match kind {
                    tlp_core::models::ParameterKind::InputRatio => "input_ratio",
                    tlp_core::models::ParameterKind::MinimumRatio => "minimum_ratio",
                    tlp_core::models::ParameterKind::MaximumRatio => "maximum_ratio",
                },
                value,
            });
        }
    }
    if !bom.energy_cost.is_finite() {
        return Err(ConfigurationError::InvalidValue {
            entity: entity(),
            field: "energy_cost",
            value: bom.energy_cost,
        });
    }
    for &ratio in bom.dependent_commodities.values() {
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                entity: entity(),
                field: "dependent_commodities",
                value: ratio,
            });
        }
    }

    // Not enforced: an inverted range simply makes the ratio constraints unsatisfiable
    // unless the input carries no flow.
    if let (Some(min), Some(max)) = (bom.parameters.minimum_ratio, bom.parameters.maximum_ratio) {
        if max < min {
            event!(
                Level::WARN,
                process = %process.name,
                bom = %bom.name,
                min,
                max,
                "maximum_ratio is below minimum_ratio"
            );
        }
    }

    Ok(())
}

fn validate_center(center: &ProcessCenter) -> Result<(), ConfigurationError> {
    let invalid = |field, value| ConfigurationError::InvalidValue {
        entity: format!("process center `{}`", center.name),
        field,
        value,
    };

    if !center.capacity.is_finite() || center.capacity < 0.0 {
        return Err(invalid("capacity", center.capacity));
    }
    if !center.production_cost.is_finite() || center.production_cost < 0.0 {
        return Err(invalid("production_cost", center.production_cost));
    }
    if let Some(fraction) = center.soft_minimum_capacity {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(invalid("soft_minimum_capacity", fraction));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlp_core::models::{BomElement, Location, ProcessConnector};

    fn bom(input: &str, outputs: &[&str], ratio: Option<f64>) -> BomElement {
        BomElement {
            name: input.to_owned(),
            input: input.into(),
            outputs: outputs.iter().map(|&x| x.into()).collect(),
            parameters: BomParameters {
                input_ratio: ratio,
                ..Default::default()
            },
            dependent_commodities: Default::default(),
            energy_cost: 0.0,
        }
    }

    fn graph() -> DomainGraph {
        DomainGraph {
            commodities: vec![],
            processes: vec![
                Process {
                    name: "mine".to_owned(),
                    kind: ProcessType::Supply,
                    bill_of_materials: vec![bom("ore", &["ore"], None)],
                },
                Process {
                    name: "furnace".to_owned(),
                    kind: ProcessType::Production,
                    bill_of_materials: vec![
                        bom("ore", &["iron"], Some(1.5)),
                        bom("pellets", &["iron"], Some(1.2)),
                        bom("scrap", &["iron", "slag"], Some(1.1)),
                    ],
                },
            ],
            centers: vec![
                ProcessCenter::new("m1", "mine", 10.0, Location::iso3("AUS")),
                ProcessCenter::new("f1", "furnace", 10.0, Location::iso3("DEU")),
            ],
            connectors: vec![ProcessConnector::new("mine", "furnace")],
        }
    }

    #[test]
    fn test_groups_by_output_set() {
        let graph = graph();
        let network = Network::resolve(&graph).unwrap();
        let recipe = network.recipe(CenterId::from(1));
        let groups = recipe.groups();
        assert_eq!(groups.len(), 2);

        let ore = network.commodity_id(&"ore".into()).unwrap();
        let pellets = network.commodity_id(&"pellets".into()).unwrap();
        assert_eq!(recipe.substitutes(ore), vec![ore, pellets]);
    }

    #[test]
    fn test_connector_matrix() {
        let graph = graph();
        let network = Network::resolve(&graph).unwrap();
        assert!(network.permits(CenterId::from(0), CenterId::from(1)));
        assert!(!network.permits(CenterId::from(1), CenterId::from(0)));
    }

    #[test]
    fn test_unknown_process_fails_fast() {
        let mut graph = graph();
        graph.centers[0].process = "quarry".to_owned();
        assert_eq!(
            Network::resolve(&graph).unwrap_err(),
            ConfigurationError::UnknownProcess {
                center: "m1".to_owned(),
                process: "quarry".to_owned()
            }
        );
    }

    #[test]
    fn test_invalid_capacity_fails_fast() {
        let mut graph = graph();
        graph.centers[1].capacity = f64::NAN;
        assert!(matches!(
            Network::resolve(&graph),
            Err(ConfigurationError::InvalidValue {
                field: "capacity",
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_center_fails_fast() {
        let mut graph = graph();
        graph.centers[1].name = "m1".to_owned();
        assert_eq!(
            Network::resolve(&graph).unwrap_err(),
            ConfigurationError::DuplicateCenter("m1".to_owned())
        );
    }
}
