//! Fluent builder for constructing a [`Sim`].

use ep_core::{GeoPoint, RandomSource, ServerId, SimConfig, SimRng, SimTime};
use ep_mobility::{DistanceFn, PathTrack, ServerSite};
use ep_resource::Resource;
use ep_schedule::EventQueue;
use tracing::info;

use crate::{Sim, SimError, SimResult, TaskGenerator, Wake};

/// One edge server to create.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerSpec {
    pub name:     String,
    pub location: GeoPoint,
    pub capacity: u32,
}

impl ServerSpec {
    pub fn new(name: impl Into<String>, location: GeoPoint, capacity: u32) -> Self {
        Self { name: name.into(), location, capacity }
    }
}

/// Fluent builder for [`Sim<D, R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: horizon, seed, intervals, generator distributions
/// - `D: DistanceFn`: e.g. [`ep_mobility::Haversine`]
/// - at least one server, via [`server`](Self::server) or
///   [`servers`](Self::servers)
/// - a [`PathTrack`], via [`path`](Self::path)
///
/// # Optional inputs
///
/// | Method               | Default                       |
/// |----------------------|-------------------------------|
/// | `.random_source(r)`  | `SimRng::new(config.seed)`    |
///
/// Server ids are assigned in insertion order, starting at 0.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, Haversine)
///     .server(ServerSpec::new("server1", GeoPoint::new(6.516, 3.394), 1500))
///     .path(path)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<D: DistanceFn, R: RandomSource = SimRng> {
    config:   SimConfig,
    distance: D,
    rng:      R,
    servers:  Vec<ServerSpec>,
    path:     Option<PathTrack>,
}

impl<D: DistanceFn> SimBuilder<D, SimRng> {
    /// Create a builder seeded from `config.seed`.
    pub fn new(config: SimConfig, distance: D) -> Self {
        let rng = SimRng::new(config.seed);
        Self { config, distance, rng, servers: Vec::new(), path: None }
    }
}

impl<D: DistanceFn, R: RandomSource> SimBuilder<D, R> {
    /// Append one server.
    pub fn server(mut self, spec: ServerSpec) -> Self {
        self.servers.push(spec);
        self
    }

    /// Append several servers, in order.
    pub fn servers(mut self, specs: impl IntoIterator<Item = ServerSpec>) -> Self {
        self.servers.extend(specs);
        self
    }

    /// The path every user walks.
    pub fn path(mut self, path: PathTrack) -> Self {
        self.path = Some(path);
        self
    }

    /// Replace the seeded RNG, e.g. with a scripted source in tests.
    pub fn random_source<R2: RandomSource>(self, rng: R2) -> SimBuilder<D, R2> {
        SimBuilder {
            config:   self.config,
            distance: self.distance,
            rng,
            servers:  self.servers,
            path:     self.path,
        }
    }

    /// Validate inputs, create the servers, schedule the generator and
    /// snapshot processes, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<D, R>> {
        self.config.validate()?;

        // ── Validate inputs ───────────────────────────────────────────────
        if self.servers.is_empty() {
            return Err(SimError::Config("at least one server is required".into()));
        }
        if self.servers.len() > usize::from(u16::MAX) {
            return Err(SimError::Config(format!("too many servers: {}", self.servers.len())));
        }
        let generator = &self.config.generator;
        if generator.enabled && generator.server_weights.len() != self.servers.len() {
            return Err(SimError::Config(format!(
                "{} server weights for {} servers",
                generator.server_weights.len(),
                self.servers.len()
            )));
        }
        let path = self
            .path
            .ok_or_else(|| SimError::Config("a path is required".into()))?;

        // ── Servers ───────────────────────────────────────────────────────
        let mut servers = Vec::with_capacity(self.servers.len());
        let mut sites = Vec::with_capacity(self.servers.len());
        for (i, spec) in self.servers.into_iter().enumerate() {
            let id = ServerId::try_from(i)
                .map_err(|_| SimError::Config(format!("server index {i} out of range")))?;
            sites.push(ServerSite { id, location: spec.location });
            servers.push(Resource::new(id, spec.name, spec.capacity, SimTime::ZERO)?);
        }

        // ── Initial wake-ups ──────────────────────────────────────────────
        let mut queue = EventQueue::new();
        let generator = if self.config.generator.enabled {
            queue.schedule_at(SimTime::ZERO, Wake::Generate)?;
            Some(TaskGenerator::new(self.config.generator.clone()))
        } else {
            None
        };
        if self.config.snapshot_interval.is_some() {
            queue.schedule_at(SimTime::ZERO, Wake::Snapshot)?;
        }

        info!(
            servers = servers.len(),
            waypoints = path.len(),
            seed = self.config.seed,
            generator = generator.is_some(),
            "simulation built"
        );

        Ok(Sim {
            config: self.config,
            queue,
            servers,
            sites,
            path,
            distance: self.distance,
            rng: self.rng,
            tasks: Vec::new(),
            monitors: Vec::new(),
            generator,
            events_processed: 0,
        })
    }
}
