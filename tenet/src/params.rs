use crate::errors::{ConfigError, HubRef, RouteEnd};
use crate::ids::{HubId, Step};
use crate::store::Capacity;
use env_param::EnvParam;
use std::collections::{BTreeMap, BTreeSet};

/// Maximum number of outgoing edges of a single node, unless set explicitly in the [`Parameters`].
pub static MAX_OUT_DEGREE: EnvParam<usize> = EnvParam::new("TENET_MAX_OUT_DEGREE", "128");

/// Capacities of the different kinds of edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capacities {
    /// Arrival -> departure edge of a hub, i.e. the number of movements a hub can host in a single step.
    pub hub: Capacity,
    /// Departure(t) -> arrival(t+1) edge of a hub where waiting is allowed.
    pub wait: Capacity,
    /// Transit slot -> arrival edge of a restricted route.
    pub transit: Capacity,
    /// Departure -> next node edge of any route.
    pub direct: Capacity,
}

impl Default for Capacities {
    fn default() -> Self {
        Capacities {
            hub: 1,
            wait: 100,
            transit: 100,
            direct: 1,
        }
    }
}

/// A directed move from one hub to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Route {
    pub origin: HubId,
    pub destination: HubId,
    /// Capacity of the first edge of the route. If unset, [`Capacities::direct`] is used.
    pub capacity: Option<Capacity>,
}

impl Route {
    pub fn new(origin: impl Into<HubId>, destination: impl Into<HubId>) -> Self {
        Route {
            origin: origin.into(),
            destination: destination.into(),
            capacity: None,
        }
    }

    pub fn with_capacity(self, capacity: Capacity) -> Self {
        Route {
            capacity: Some(capacity),
            ..self
        }
    }
}

/// Everything needed to build a time-expanded network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameters {
    /// Number of hubs `H`.
    pub num_hubs: usize,
    /// Last time step `T`: valid steps are `0..=T`.
    pub horizon: Step,
    pub capacities: Capacities,
    /// Hubs whose capacity differs from [`Capacities::hub`].
    pub hub_capacities: BTreeMap<HubId, Capacity>,
    /// Hubs at which a movement may stay from one step to the next.
    pub waitable_hubs: BTreeSet<HubId>,
    /// Routes whose traversal takes exactly two steps, through a transit slot.
    pub restricted_routes: Vec<Route>,
    /// Routes traversed in a single step.
    pub routes: Vec<Route>,
    pub max_out_degree: usize,
}

impl Parameters {
    /// Parameters of a network with no route, no waiting and default capacities.
    pub fn new(num_hubs: usize, horizon: Step) -> Self {
        Parameters {
            num_hubs,
            horizon,
            capacities: Capacities::default(),
            hub_capacities: BTreeMap::new(),
            waitable_hubs: BTreeSet::new(),
            restricted_routes: Vec::new(),
            routes: Vec::new(),
            max_out_degree: MAX_OUT_DEGREE.get(),
        }
    }

    /// Three hubs over steps `0..=3`: waiting is allowed at hubs 0 and 2, going from 0 to 1 takes two steps
    /// and going from 1 to 2 takes one.
    pub fn demo() -> Self {
        Parameters::new(3, 3)
            .with_waitable(0u32)
            .with_waitable(2u32)
            .with_restricted_route(Route::new(0u32, 1u32))
            .with_route(Route::new(1u32, 2u32))
    }

    pub fn with_horizon(mut self, horizon: Step) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_capacities(mut self, capacities: Capacities) -> Self {
        self.capacities = capacities;
        self
    }

    pub fn with_hub_capacity(mut self, hub: impl Into<HubId>, capacity: Capacity) -> Self {
        self.hub_capacities.insert(hub.into(), capacity);
        self
    }

    pub fn with_waitable(mut self, hub: impl Into<HubId>) -> Self {
        self.waitable_hubs.insert(hub.into());
        self
    }

    pub fn with_restricted_route(mut self, route: Route) -> Self {
        self.restricted_routes.push(route);
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn with_max_out_degree(mut self, max_out_degree: usize) -> Self {
        self.max_out_degree = max_out_degree;
        self
    }

    /// Number of restricted routes `R`.
    pub fn num_restricted_routes(&self) -> usize {
        self.restricted_routes.len()
    }

    /// Capacity of the arrival -> departure edge of `hub`.
    pub fn hub_capacity(&self, hub: HubId) -> Capacity {
        self.hub_capacities.get(&hub).copied().unwrap_or(self.capacities.hub)
    }

    /// Capacity of the first edge of `route`.
    pub fn route_capacity(&self, route: &Route) -> Capacity {
        route.capacity.unwrap_or(self.capacities.direct)
    }

    /// All places where a hub is referenced.
    fn hub_references(&self) -> impl Iterator<Item = (HubRef, HubId)> + '_ {
        fn ends<'a>(
            routes: &'a [Route],
            place: impl Fn(usize, RouteEnd) -> HubRef + 'a,
        ) -> impl Iterator<Item = (HubRef, HubId)> + 'a {
            routes.iter().enumerate().flat_map(move |(i, r)| {
                [
                    (place(i, RouteEnd::Origin), r.origin),
                    (place(i, RouteEnd::Destination), r.destination),
                ]
            })
        }
        ends(&self.restricted_routes, HubRef::RestrictedRoute)
            .chain(ends(&self.routes, HubRef::Route))
            .chain(self.waitable_hubs.iter().map(|&h| (HubRef::Waitable, h)))
            .chain(self.hub_capacities.keys().map(|&h| (HubRef::CapacityOverride, h)))
    }

    /// Checks that every hub reference is in `0..num_hubs`.
    ///
    /// The size of the network is checked when creating its [`NodeIndexer`](crate::NodeIndexer).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (place, hub) in self.hub_references() {
            if usize::from(hub) >= self.num_hubs {
                return Err(ConfigError::UnknownHub {
                    place,
                    hub,
                    num_hubs: self.num_hubs,
                });
            }
        }
        Ok(())
    }
}
