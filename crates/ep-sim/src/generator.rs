//! The task arrival process.

use ep_core::{GeneratorConfig, RandomSource, ServerId};

use crate::{SimError, SimResult, TaskSpec};

/// Samples new tasks and the gap until the next one.
///
/// Draw order per task is fixed (path index, server, process time, CPU
/// demand, then the gap) so a seeded run is reproducible.
#[derive(Clone, Debug)]
pub struct TaskGenerator {
    config:        GeneratorConfig,
    /// Tasks produced so far.
    pub generated: u64,
}

impl TaskGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config, generated: 0 }
    }

    /// Draw the attributes of the next task.
    ///
    /// `servers[i]` is the placement chosen when weight `i` is drawn.
    pub fn sample<R: RandomSource>(
        &mut self,
        rng:     &mut R,
        servers: &[ServerId],
    ) -> SimResult<TaskSpec> {
        let c = &self.config;

        let path_index = rng.uniform_int(c.path_index.lo, c.path_index.hi);
        let server = rng
            .weighted_choice(servers, &c.server_weights)
            .copied()
            .ok_or_else(|| SimError::Config(format!(
                "server weights {:?} cannot select among {} servers",
                c.server_weights,
                servers.len()
            )))?;
        let process_time = rng.uniform_int(c.process_time.lo, c.process_time.hi);
        let cpu_demand = rng.uniform_int(c.cpu_demand.lo, c.cpu_demand.hi);

        let spec = TaskSpec {
            server,
            path_index: usize::try_from(path_index)
                .map_err(|_| SimError::Config(format!("negative path index {path_index}")))?,
            process_time: i32::try_from(process_time)
                .map(f64::from)
                .map_err(|_| SimError::Config(format!("process time {process_time} out of range")))?,
            cpu_demand: u32::try_from(cpu_demand)
                .map_err(|_| SimError::Config(format!("cpu demand {cpu_demand} out of range")))?,
        };
        self.generated += 1;
        Ok(spec)
    }

    /// Time until the next arrival.
    pub fn next_gap<R: RandomSource>(&self, rng: &mut R) -> f64 {
        rng.uniform_real(self.config.interarrival.lo, self.config.interarrival.hi)
    }
}
