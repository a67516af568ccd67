use crate::map::{Hub, Map, Zone};
use std::collections::HashMap;
use tenet::{Capacity, HubId, IdVec};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BaseGraphError {
    #[error("the {0} hub `{1}` is in a blocked zone")]
    BlockedEndpoint(&'static str, String),
    #[error("the {kind} hub is hub {index} but the map only has {num_hubs} hubs")]
    MissingEndpoint {
        kind: &'static str,
        index: usize,
        num_hubs: usize,
    },
    #[error("connection references unknown hub `{0}`")]
    UnknownHub(String),
    #[error("no path from `{start}` to `{end}`")]
    Unreachable { start: String, end: String },
}

/// Link from one hub to a neighbour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BaseEdge {
    pub to: HubId,
    pub capacity: Capacity,
}

/// An undirected link between two hubs that survived pruning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub first: HubId,
    pub second: HubId,
    pub capacity: Capacity,
}

/// The traversable part of a map: blocked hubs and their connections are removed and the remaining hubs are
/// numbered contiguously in declaration order.
#[derive(Clone, Debug)]
pub struct BaseGraph {
    nb_drones: u32,
    hubs: IdVec<HubId, Hub>,
    links: Vec<Link>,
    adjacency: IdVec<HubId, Vec<BaseEdge>>,
    start: HubId,
    end: HubId,
}

impl BaseGraph {
    /// Prunes the blocked hubs of `map` and checks that its end hub can be reached from its start hub.
    pub fn new(map: &Map) -> Result<Self, BaseGraphError> {
        let mut hubs: IdVec<HubId, Hub> = IdVec::default();
        let mut ids = HashMap::new();
        for hub in map.hubs.iter().filter(|h| h.zone != Zone::Blocked) {
            ids.insert(hub.name.as_str(), hubs.push(hub.clone()));
        }
        let endpoint = |kind: &'static str, index: usize| {
            let hub = map.hubs.get(index).ok_or(BaseGraphError::MissingEndpoint {
                kind,
                index,
                num_hubs: map.hubs.len(),
            })?;
            ids.get(hub.name.as_str())
                .copied()
                .ok_or_else(|| BaseGraphError::BlockedEndpoint(kind, hub.name.clone()))
        };
        let start = endpoint("start", map.start)?;
        let end = endpoint("end", map.end)?;

        let mut links = Vec::with_capacity(map.connections.len());
        for c in &map.connections {
            let lookup = |name: &str| {
                if ids.contains_key(name) {
                    Ok(ids.get(name).copied())
                } else if map.hub(name).is_some() {
                    // the hub exists but is blocked
                    Ok(None)
                } else {
                    Err(BaseGraphError::UnknownHub(name.to_string()))
                }
            };
            if let (Some(first), Some(second)) = (lookup(c.first.as_str())?, lookup(c.second.as_str())?) {
                links.push(Link {
                    first,
                    second,
                    capacity: c.max_link_capacity,
                });
            }
        }

        let mut adjacency = IdVec::with_values(hubs.len(), Vec::new());
        for l in &links {
            adjacency[l.first].push(BaseEdge {
                to: l.second,
                capacity: l.capacity,
            });
            adjacency[l.second].push(BaseEdge {
                to: l.first,
                capacity: l.capacity,
            });
        }
        tracing::debug!(
            hubs = hubs.len(),
            pruned = map.hubs.len() - hubs.len(),
            links = links.len(),
            "base graph"
        );

        let graph = BaseGraph {
            nb_drones: map.nb_drones,
            hubs,
            links,
            adjacency,
            start,
            end,
        };
        if graph.path().is_none() {
            return Err(BaseGraphError::Unreachable {
                start: graph.hub(start).name.clone(),
                end: graph.hub(end).name.clone(),
            });
        }
        Ok(graph)
    }

    pub fn nb_drones(&self) -> u32 {
        self.nb_drones
    }

    pub fn num_hubs(&self) -> usize {
        self.hubs.len()
    }

    pub fn hub(&self, id: HubId) -> &Hub {
        &self.hubs[id]
    }

    pub fn hubs(&self) -> impl Iterator<Item = (HubId, &Hub)> {
        self.hubs.entries()
    }

    pub fn id(&self, name: &str) -> Option<HubId> {
        self.hubs().find(|(_, h)| h.name == name).map(|(id, _)| id)
    }

    pub fn start(&self) -> HubId {
        self.start
    }

    pub fn end(&self) -> HubId {
        self.end
    }

    /// Surviving connections in declaration order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Neighbours of `hub`, one entry per connection.
    pub fn edges(&self, hub: HubId) -> &[BaseEdge] {
        &self.adjacency[hub]
    }

    /// A path with the fewest hops from the start hub to the end hub.
    pub fn path(&self) -> Option<Vec<HubId>> {
        pathfinding::directed::bfs::bfs(
            &self.start,
            move |&h| self.adjacency[h].iter().map(|e| e.to),
            |&h| h == self.end,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Connection;

    fn map(hubs: Vec<Hub>, connections: Vec<Connection>) -> Map {
        let end = hubs.len() - 1;
        Map {
            nb_drones: 1,
            hubs,
            connections,
            start: 0,
            end,
        }
    }

    fn names(graph: &BaseGraph, path: &[HubId]) -> Vec<String> {
        path.iter().map(|&h| graph.hub(h).name.clone()).collect()
    }

    #[test]
    fn blocked_hubs_are_pruned() {
        let m = map(
            vec![
                Hub::new("start", 0, 0).with_zone(Zone::Start),
                Hub::new("wall", 1, 0).with_zone(Zone::Blocked),
                Hub::new("mid", 1, 1),
                Hub::new("goal", 2, 0).with_zone(Zone::End),
            ],
            vec![
                Connection::new("start", "wall"),
                Connection::new("wall", "goal"),
                Connection::new("start", "mid").with_capacity(3),
                Connection::new("mid", "goal"),
            ],
        );
        let graph = BaseGraph::new(&m).unwrap();
        assert_eq!(graph.num_hubs(), 3);
        assert_eq!(graph.hubs().map(|(_, h)| h.name.as_str()).collect::<Vec<_>>(), ["start", "mid", "goal"]);
        assert_eq!(graph.id("mid"), Some(HubId::from(1u32)));
        assert_eq!(graph.id("wall"), None);
        assert_eq!(graph.start(), HubId::from(0u32));
        assert_eq!(graph.end(), HubId::from(2u32));
        assert_eq!(graph.links().len(), 2);
        assert_eq!(
            graph.edges(HubId::from(0u32)),
            [BaseEdge {
                to: HubId::from(1u32),
                capacity: 3
            }]
        );
        assert_eq!(graph.edges(HubId::from(1u32)).len(), 2);
        let path = graph.path().unwrap();
        assert_eq!(names(&graph, &path), ["start", "mid", "goal"]);
    }

    #[test]
    fn unreachable_end() {
        let m = map(
            vec![
                Hub::new("start", 0, 0).with_zone(Zone::Start),
                Hub::new("wall", 1, 0).with_zone(Zone::Blocked),
                Hub::new("island", 5, 5),
                Hub::new("goal", 2, 0).with_zone(Zone::End),
            ],
            vec![Connection::new("start", "wall"), Connection::new("wall", "goal")],
        );
        assert_eq!(
            BaseGraph::new(&m).unwrap_err(),
            BaseGraphError::Unreachable {
                start: "start".to_string(),
                end: "goal".to_string()
            }
        );
    }

    #[test]
    fn start_hub_is_end_hub() {
        let mut m = map(vec![Hub::new("only", 0, 0)], vec![]);
        m.end = 0;
        let graph = BaseGraph::new(&m).unwrap();
        assert_eq!(graph.path(), Some(vec![HubId::from(0u32)]));
    }

    #[test]
    fn invalid_endpoints() {
        let m = map(
            vec![Hub::new("start", 0, 0).with_zone(Zone::Blocked), Hub::new("goal", 1, 0)],
            vec![Connection::new("start", "goal")],
        );
        assert_eq!(
            BaseGraph::new(&m).unwrap_err(),
            BaseGraphError::BlockedEndpoint("start", "start".to_string())
        );

        let m = map(
            vec![Hub::new("start", 0, 0), Hub::new("goal", 1, 0)],
            vec![Connection::new("start", "nowhere")],
        );
        assert_eq!(BaseGraph::new(&m).unwrap_err(), BaseGraphError::UnknownHub("nowhere".to_string()));
    }

    #[test]
    fn endpoints_out_of_range() {
        let mut m = map(vec![Hub::new("start", 0, 0), Hub::new("goal", 1, 0)], vec![]);
        m.end = 2;
        assert_eq!(
            BaseGraph::new(&m).unwrap_err(),
            BaseGraphError::MissingEndpoint {
                kind: "end",
                index: 2,
                num_hubs: 2
            }
        );
        assert_eq!(m.end_hub(), None);

        m.start = 5;
        assert!(matches!(
            BaseGraph::new(&m),
            Err(BaseGraphError::MissingEndpoint { kind: "start", .. })
        ));
    }
}
