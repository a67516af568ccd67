use flyin::map::Zone;
use flyin::{BaseGraph, BaseGraphError, Instance, Map, MapError};
use tenet::{HubId, Node};
use test_each_file::test_each_file;

test_each_file! { for ["map", "dump"] in "./flyin/tests/maps" => golden }

/// Builds the network of the map and compares its dump with the expected one.
fn golden([map, expected]: [&str; 2]) {
    assert_eq!(dump(map), expected);
}

fn instance(text: &str) -> Instance {
    let map = Map::parse(text).unwrap();
    Instance::new(BaseGraph::new(&map).unwrap()).unwrap()
}

fn dump(text: &str) -> String {
    instance(text).build().unwrap().dump().to_string()
}

#[test]
fn linear_path_horizon() {
    let instance = instance(include_str!("maps/linear_path.map"));
    assert_eq!(instance.min_turns, 3);
    assert_eq!(instance.horizon(), 4);
}

#[test]
fn restricted_fork_parameters() {
    let instance = instance(include_str!("maps/restricted_fork.map"));
    assert_eq!(instance.parameters.num_restricted_routes(), 2);
    assert_eq!(instance.priority_hubs, vec![HubId::from(4u32)]);
    assert_eq!(instance.hub_name(HubId::from(1u32)), "goal");
    let network = instance.build().unwrap();
    assert_eq!(network.total_nodes(), 60);
    assert_eq!(network.num_edges(), 89);
}

#[test]
fn blocked_detour_pruning() {
    let map = Map::parse(include_str!("maps/blocked_detour.map")).unwrap();
    assert_eq!(map.hub("wall").map(|h| h.zone), Some(Zone::Blocked));
    let graph = BaseGraph::new(&map).unwrap();
    assert_eq!(graph.num_hubs(), 3);
}

#[test]
fn transit_slots_lead_into_restricted_hubs() {
    let instance = instance(include_str!("maps/restricted_fork.map"));
    let network = instance.build().unwrap();
    for (from, edge) in network.edges() {
        if let Ok(Node::Transit { route, .. }) = network.locate(from) {
            let destination = instance.parameters.restricted_routes[usize::from(route)].destination;
            match network.locate(edge.to).unwrap() {
                Node::Arrival { hub, .. } => {
                    assert_eq!(hub, destination);
                    assert_eq!(instance.graph.hub(hub).zone, Zone::Restricted);
                }
                other => panic!("transit slot {from} leads to {other}"),
            }
        }
    }
}

#[test]
fn unreachable_goal() {
    let text = "\
nb_drones: 1
start_hub: start 0 0
hub: wall 1 0 [zone=blocked]
end_hub: goal 2 0
connection: start-wall
connection: wall-goal
";
    let map = Map::parse(text).unwrap();
    assert!(matches!(BaseGraph::new(&map), Err(BaseGraphError::Unreachable { .. })));
}

#[test]
fn invalid_map_reports_line() {
    let text = "nb_drones: 1\nstart_hub: start 0 0\nend_hub: goal 1 0\nconnection: start-goal []\n";
    let err = Map::parse(text).unwrap_err();
    assert!(matches!(err, MapError::Line { line: 4, .. }));
    assert_eq!(err.to_string(), "line 4: empty metadata");
}
