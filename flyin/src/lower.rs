//! Lowering of a map into the parameters of a time-expanded network.
//!
//! Each hub becomes a hub of the network, with its `max_drones` as occupancy bound. The start and end
//! hubs can hold the whole fleet. Drones may wait anywhere. Each connection yields one move in each
//! direction: a move into a restricted hub takes two turns and is encoded as a restricted route, any other
//! move takes a single turn.

use crate::base::{BaseGraph, BaseGraphError};
use crate::map::{Hub, Zone};
use pathfinding::directed::dijkstra::dijkstra;
use tenet::{Capacities, HubId, Network, Parameters, Res, Route, Step, build_network};

/// Number of turns needed to enter `hub`.
pub fn entry_turns(hub: &Hub) -> u32 {
    match hub.zone {
        Zone::Restricted => 2,
        _ => 1,
    }
}

/// Minimum number of turns for a single drone to fly from the start hub to the end hub, with the hubs it
/// goes through.
pub fn fastest_path(graph: &BaseGraph) -> Option<(Vec<HubId>, u32)> {
    dijkstra(
        &graph.start(),
        move |&h| graph.edges(h).iter().map(move |e| (e.to, entry_turns(graph.hub(e.to)))),
        |&h| h == graph.end(),
    )
}

/// A network ready to be built from a map, along with the information needed to interpret it.
#[derive(Clone, Debug)]
pub struct Instance {
    pub graph: BaseGraph,
    pub parameters: Parameters,
    /// Minimum number of turns for a single drone to reach the end hub.
    pub min_turns: u32,
    /// Hubs that should be preferred when several paths are equivalent.
    pub priority_hubs: Vec<HubId>,
}

impl Instance {
    /// Lowers `graph`, with a horizon leaving enough time for every drone to reach the end hub one turn
    /// after the other along the fastest path.
    pub fn new(graph: BaseGraph) -> Result<Self, BaseGraphError> {
        let _span = tracing::span!(tracing::Level::DEBUG, "LOWER").entered();
        let unreachable = || BaseGraphError::Unreachable {
            start: graph.hub(graph.start()).name.clone(),
            end: graph.hub(graph.end()).name.clone(),
        };
        let (_, min_turns) = fastest_path(&graph).ok_or_else(unreachable)?;
        let nb_drones = graph.nb_drones();
        let horizon = min_turns.saturating_add(nb_drones.saturating_sub(1));

        let mut parameters = Parameters::new(graph.num_hubs(), horizon).with_capacities(Capacities {
            hub: 1,
            wait: nb_drones,
            transit: nb_drones,
            direct: 1,
        });
        let mut priority_hubs = Vec::new();
        for (id, hub) in graph.hubs() {
            let capacity = if id == graph.start() || id == graph.end() {
                hub.max_drones.max(nb_drones)
            } else {
                hub.max_drones
            };
            if capacity != parameters.capacities.hub {
                parameters = parameters.with_hub_capacity(id, capacity);
            }
            parameters = parameters.with_waitable(id);
            if hub.zone == Zone::Priority {
                priority_hubs.push(id);
            }
        }
        for link in graph.links() {
            for (from, to) in [(link.first, link.second), (link.second, link.first)] {
                let route = Route::new(from, to).with_capacity(link.capacity);
                parameters = match graph.hub(to).zone {
                    Zone::Restricted => parameters.with_restricted_route(route),
                    _ => parameters.with_route(route),
                };
            }
        }
        tracing::debug!(
            min_turns,
            horizon,
            restricted = parameters.num_restricted_routes(),
            direct = parameters.routes.len(),
        );
        Ok(Instance {
            graph,
            parameters,
            min_turns,
            priority_hubs,
        })
    }

    pub fn with_horizon(mut self, horizon: Step) -> Self {
        self.parameters.horizon = horizon;
        self
    }

    pub fn horizon(&self) -> Step {
        self.parameters.horizon
    }

    pub fn build(&self) -> Res<Network> {
        build_network(&self.parameters)
    }

    pub fn hub_name(&self, hub: HubId) -> &str {
        &self.graph.hub(hub).name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;

    const MAP: &str = "\
nb_drones: 3
start_hub: start 0 0
hub: fast 1 0 [zone=priority max_drones=2]
hub: slow 1 1 [zone=restricted]
hub: wall 2 2 [zone=blocked]
end_hub: goal 2 0
connection: start-fast
connection: start-slow [max_link_capacity=2]
connection: fast-goal
connection: slow-goal
connection: slow-wall
";

    fn instance(text: &str) -> Instance {
        let map = Map::parse(text).unwrap();
        Instance::new(BaseGraph::new(&map).unwrap()).unwrap()
    }

    fn hub(i: u32) -> HubId {
        HubId::from(i)
    }

    #[test]
    fn parameters() {
        let instance = instance(MAP);
        let p = &instance.parameters;
        assert_eq!(p.num_hubs, 4);
        assert_eq!(instance.min_turns, 2);
        assert_eq!(p.horizon, 4);
        assert_eq!(
            p.capacities,
            Capacities {
                hub: 1,
                wait: 3,
                transit: 3,
                direct: 1
            }
        );
        assert_eq!(p.hub_capacity(hub(0)), 3);
        assert_eq!(p.hub_capacity(hub(1)), 2);
        assert_eq!(p.hub_capacity(hub(2)), 1);
        assert_eq!(p.hub_capacity(hub(3)), 3);
        assert_eq!(p.waitable_hubs.len(), 4);
        assert_eq!(
            p.restricted_routes,
            vec![
                Route::new(0u32, 2u32).with_capacity(2),
                Route::new(3u32, 2u32).with_capacity(1)
            ]
        );
        assert_eq!(
            p.routes,
            vec![
                Route::new(0u32, 1u32).with_capacity(1),
                Route::new(1u32, 0u32).with_capacity(1),
                Route::new(2u32, 0u32).with_capacity(2),
                Route::new(1u32, 3u32).with_capacity(1),
                Route::new(3u32, 1u32).with_capacity(1),
                Route::new(2u32, 3u32).with_capacity(1),
            ]
        );
        assert_eq!(instance.priority_hubs, vec![hub(1)]);
        assert_eq!(instance.hub_name(hub(2)), "slow");
    }

    #[test]
    fn restricted_hubs_are_slower() {
        let only_slow = "\
nb_drones: 1
start_hub: start 0 0
hub: slow 1 1 [zone=restricted]
end_hub: goal 2 0
connection: start-slow
connection: slow-goal
";
        let instance = instance(only_slow);
        assert_eq!(instance.min_turns, 3);
        assert_eq!(instance.horizon(), 3);
        let (path, turns) = fastest_path(&instance.graph).unwrap();
        assert_eq!(path, vec![hub(0), hub(1), hub(2)]);
        assert_eq!(turns, 3);
    }

    #[test]
    fn horizon_override() {
        let instance = instance(MAP).with_horizon(1);
        assert_eq!(instance.horizon(), 1);
        let network = instance.build().unwrap();
        assert_eq!(network.edge_counts().transit, 0);
        assert_eq!(network.total_nodes(), 2 * 4 * 2 + 2 * 2);
    }

    #[test]
    fn built_network() {
        let network = instance(MAP).build().unwrap();
        let counts = network.edge_counts();
        // 5 steps, 4 hubs, 2 restricted routes entered at steps 0..=2 and 6 direct routes
        assert_eq!(counts.split, 20);
        assert_eq!(counts.wait, 16);
        assert_eq!(counts.transit, 12);
        assert_eq!(counts.direct, 24);
    }
}
