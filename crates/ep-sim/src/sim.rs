//! The `Sim` struct and its event loop.

use ep_core::{RandomSource, ServerId, SimConfig, SimTime, TaskId};
use ep_mobility::{DistanceFn, MobilityError, MobilityMonitor, PathTrack, ServerSite};
use ep_resource::{Grant, RequestOutcome, Resource, ResourceError, ResourceSnapshot};
use ep_schedule::{Event, EventKey, EventQueue};
use tracing::{debug, info, warn};

use crate::{
    SimError, SimObserver, SimResult, Task, TaskGenerator, TaskSpec, TaskState, TraceEvent,
};

// ── Wake-ups ──────────────────────────────────────────────────────────────────

/// Payload of every scheduled event: which process to resume.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Wake {
    /// The task generator's inter-arrival hold is over.
    Generate,
    /// A task's processing hold ran to the end.
    HoldDone(TaskId),
    /// A task's mobility monitor is due.
    MonitorTick(TaskId),
    /// Periodic occupancy snapshot for observers.
    Snapshot,
}

/// A task's mobility monitor plus its pending wake-up.
#[derive(Clone, Debug)]
pub struct MonitorSlot {
    pub monitor:     MobilityMonitor,
    pub(crate) wake: Option<EventKey>,
}

/// Counts returned by [`Sim::run`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub final_time:       SimTime,
    pub events_processed: u64,
    pub tasks_created:    usize,
    pub completed:        usize,
    pub failed:           usize,
    pub in_flight:        usize,
    pub reassignments:    u64,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<D, R>` holds all simulation state and dispatches one [`Wake`] at a
/// time, in `(time, insertion)` order:
///
/// 1. **Generate**: sample a task, spawn it (monitor first, then the
///    capacity request), schedule the next arrival.
/// 2. **HoldDone**: the task finished its work; release its claim, resume
///    any waiters that now fit, cancel its monitor.
/// 3. **MonitorTick**: advance the user, recompute the nearest server,
///    reassign on change, schedule the next tick.
/// 4. **Snapshot**: report per-server occupancy.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<D: DistanceFn, R: RandomSource> {
    /// Run configuration (horizon, intervals, generator distributions, …).
    pub config: SimConfig,

    /// Clock and pending wake-ups.
    pub queue: EventQueue<Wake>,

    /// Edge servers, indexed by `ServerId`.
    pub servers: Vec<Resource>,

    /// Server locations, same order as `servers`.
    pub sites: Vec<ServerSite>,

    /// The path every user walks.
    pub path: PathTrack,

    pub distance: D,

    pub rng: R,

    /// Every task ever created, indexed by `TaskId`.
    pub tasks: Vec<Task>,

    /// Mobility monitors, indexed by owning `TaskId`.
    pub monitors: Vec<MonitorSlot>,

    /// `None` when tasks are only spawned explicitly.
    pub generator: Option<TaskGenerator>,

    pub(crate) events_processed: u64,
}

impl<D: DistanceFn, R: RandomSource> Sim<D, R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the queue drains or the next event lies beyond
    /// `config.horizon`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let horizon = SimTime::try_new(self.config.horizon)?;
        self.run_until(horizon, observer)
    }

    /// Run until the queue drains or the next event lies beyond `horizon`.
    ///
    /// Events at exactly `horizon` are dispatched.  If events remain, the
    /// clock is left at `horizon`.
    pub fn run_until<O: SimObserver>(
        &mut self,
        horizon:  SimTime,
        observer: &mut O,
    ) -> SimResult<RunSummary> {
        info!(
            %horizon,
            servers = self.servers.len(),
            pending = self.queue.len(),
            "simulation start"
        );

        while let Some(next) = self.queue.peek_time() {
            if next > horizon {
                break;
            }
            self.step(observer)?;
        }
        if !self.queue.is_empty() && self.now() < horizon {
            self.queue.advance_to(horizon)?;
        }

        let snapshots = self.snapshots();
        observer.on_sim_end(self.now(), &snapshots);

        let summary = self.summary();
        info!(
            final_time = %summary.final_time,
            events = summary.events_processed,
            created = summary.tasks_created,
            completed = summary.completed,
            failed = summary.failed,
            in_flight = summary.in_flight,
            "simulation end"
        );
        Ok(summary)
    }

    /// Pop and dispatch the earliest event.  Returns its time, or `None` if
    /// nothing was pending.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Option<SimTime>> {
        let Some(Event { key, payload }) = self.queue.pop_next() else {
            return Ok(None);
        };
        self.events_processed += 1;
        debug!(now = %key.time, seq = key.seq, wake = ?payload, "dispatch");
        observer.on_wake(key.time, &payload);

        match payload {
            Wake::Generate        => self.on_generate(observer)?,
            Wake::HoldDone(id)    => self.on_hold_done(id, observer)?,
            Wake::MonitorTick(id) => self.on_monitor_tick(id, observer)?,
            Wake::Snapshot        => self.on_snapshot(observer)?,
        }

        self.check_capacity()?;
        Ok(Some(key.time))
    }

    /// Create a task at the current time: spawn its monitor, then request
    /// capacity on `spec.server`.
    ///
    /// A request that exceeds the server's total capacity does not fail the
    /// call; the task ends up `Failed` instead.
    pub fn spawn_task<O: SimObserver>(
        &mut self,
        spec:     TaskSpec,
        observer: &mut O,
    ) -> SimResult<TaskId> {
        if spec.server.index() >= self.servers.len() {
            return Err(SimError::UnknownServer(spec.server));
        }
        let now = self.now();
        let id = TaskId::try_from(self.tasks.len())
            .map_err(|_| SimError::Invariant("task id space exhausted".into()))?;

        self.tasks.push(Task::new(id, spec, now));
        observer.on_trace(now, &TraceEvent::Created {
            task:         id,
            server:       spec.server,
            process_time: spec.process_time,
            cpu_demand:   spec.cpu_demand,
            path_index:   spec.path_index,
        });

        let wake = self.queue.schedule_in(self.config.monitor_interval, Wake::MonitorTick(id))?;
        self.monitors.push(MonitorSlot {
            monitor: MobilityMonitor::new(id, spec.path_index),
            wake:    Some(wake),
        });

        self.enter_queue(id, spec.server, observer)?;
        Ok(id)
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.index())
    }

    pub fn server(&self, id: ServerId) -> Option<&Resource> {
        self.servers.get(id.index())
    }

    /// Per-server observability view, in server order.
    pub fn snapshots(&self) -> Vec<ResourceSnapshot> {
        let now = self.now();
        self.servers.iter().map(|s| s.snapshot(now)).collect()
    }

    pub fn summary(&self) -> RunSummary {
        let count = |state: TaskState| self.tasks.iter().filter(|t| t.state == state).count();
        let completed = count(TaskState::Completed);
        let failed = count(TaskState::Failed);
        RunSummary {
            final_time:       self.now(),
            events_processed: self.events_processed,
            tasks_created:    self.tasks.len(),
            completed,
            failed,
            in_flight:        self.tasks.len() - completed - failed,
            reassignments:    self.tasks.iter().map(|t| t.reassignments as u64).sum(),
        }
    }

    // ── Process handlers ──────────────────────────────────────────────────

    fn on_generate<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let server_ids: Vec<ServerId> = self.servers.iter().map(Resource::id).collect();
        let Some(generator) = self.generator.as_mut() else {
            return Ok(());
        };
        let spec = generator.sample(&mut self.rng, &server_ids)?;
        let gap = generator.next_gap(&mut self.rng);

        self.spawn_task(spec, observer)?;
        self.queue.schedule_in(gap, Wake::Generate)?;
        Ok(())
    }

    fn on_hold_done<O: SimObserver>(&mut self, id: TaskId, observer: &mut O) -> SimResult<()> {
        let now = self.now();
        let task = self.task_mut(id)?;
        task.hold = None;
        if task.state != TaskState::Claiming {
            // Holds are cancelled on every transition out of `Claiming`.
            return Err(SimError::Invariant(format!(
                "{id} woke from hold while {}", task.state
            )));
        }
        task.settle_progress(now);
        task.remaining = 0.0;
        let server = task.server;

        let granted = self.release_claim(id, server, observer)?;
        self.mark_finished(id, TaskState::Completed, observer);
        self.resume_granted(server, granted, observer)
    }

    fn on_monitor_tick<O: SimObserver>(&mut self, id: TaskId, observer: &mut O) -> SimResult<()> {
        let slot = self
            .monitors
            .get_mut(id.index())
            .ok_or(SimError::UnknownTask(id))?;
        slot.wake = None;

        let observation = match slot.monitor.step(
            self.config.monitor_step,
            &mut self.rng,
            &self.path,
            &self.sites,
            &self.distance,
        ) {
            Ok(o) => o,
            Err(MobilityError::Cancelled(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let now = self.now();
        observer.on_trace(now, &TraceEvent::Moved {
            task:       id,
            path_index: observation.path_index,
            nearest:    observation.nearest,
        });

        let current = self.task_mut(id)?.server;
        if observation.nearest != current {
            self.reassign(id, observation.nearest, observer)?;
        }

        let live = self.task_mut(id)?.is_live();
        let slot = &mut self.monitors[id.index()];
        if live && !slot.monitor.is_cancelled() {
            slot.wake = Some(
                self.queue
                    .schedule_in(self.config.monitor_interval, Wake::MonitorTick(id))?,
            );
        }
        Ok(())
    }

    fn on_snapshot<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let snapshots = self.snapshots();
        observer.on_snapshot(self.now(), &snapshots);

        // Snapshots alone never keep the run alive.
        if let Some(every) = self.config.snapshot_interval {
            if !self.queue.is_empty() {
                self.queue.schedule_in(every, Wake::Snapshot)?;
            }
        }
        Ok(())
    }

    // ── Task transitions ──────────────────────────────────────────────────

    /// Move the live task `id` from its current server to `to`.
    fn reassign<O: SimObserver>(
        &mut self,
        id:       TaskId,
        to:       ServerId,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = self.now();
        let task = self.task_mut(id)?;
        let from = task.server;

        let granted = match task.state {
            TaskState::Claiming => {
                if let Some(hold) = task.hold.take() {
                    self.queue.cancel(hold);
                }
                let task = self.task_mut(id)?;
                let elapsed = task.settle_progress(now);
                task.state = TaskState::Queued;
                let done = task.remaining <= 0.0;
                debug!(task = %id, %from, %to, elapsed, remaining = task.remaining, "interrupt claim");

                let granted = self.release_claim(id, from, observer)?;
                if done {
                    // The move landed on the instant the work finished.
                    self.mark_finished(id, TaskState::Completed, observer);
                    return self.resume_granted(from, granted, observer);
                }
                granted
            }
            TaskState::Queued => {
                match self.servers[from.index()].cancel_request(id, now) {
                    Ok(cancelled) => cancelled.granted,
                    Err(ResourceError::UnknownRequester { .. }) => {
                        debug!(task = %id, %from, "no pending request to cancel");
                        Vec::new()
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            TaskState::Completed | TaskState::Failed => return Ok(()),
        };

        let task = self.task_mut(id)?;
        task.server = to;
        task.reassignments += 1;
        let remaining = task.remaining;
        debug!(task = %id, %from, %to, remaining, "reassign");
        observer.on_trace(now, &TraceEvent::Reassigned { task: id, from, to, remaining });

        self.resume_granted(from, granted, observer)?;
        self.enter_queue(id, to, observer)
    }

    /// Request the task's CPU demand on `server`; start processing if granted.
    fn enter_queue<O: SimObserver>(
        &mut self,
        id:       TaskId,
        server:   ServerId,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = self.now();
        let amount = self.task_mut(id)?.cpu_demand;
        let resource = self
            .servers
            .get_mut(server.index())
            .ok_or(SimError::UnknownServer(server))?;

        match resource.request(id, amount, now) {
            Ok(RequestOutcome::Granted) => self.start_hold(id, server, 0.0, observer),
            Ok(RequestOutcome::Queued { position }) => {
                self.task_mut(id)?.state = TaskState::Queued;
                observer.on_trace(now, &TraceEvent::Queued { task: id, server, position });
                Ok(())
            }
            Err(e @ ResourceError::CapacityExceeded { .. }) => {
                warn!(task = %id, %server, error = %e, "task can never be placed");
                observer.on_trace(now, &TraceEvent::Failed {
                    task:   id,
                    server,
                    reason: e.to_string(),
                });
                self.mark_finished(id, TaskState::Failed, observer);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The task now holds capacity on `server`: hold for its remaining work.
    fn start_hold<O: SimObserver>(
        &mut self,
        id:       TaskId,
        server:   ServerId,
        waited:   f64,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = self.now();
        let task = self.task_mut(id)?;
        task.begin_claim(now);
        let remaining = task.remaining;

        let hold = self.queue.schedule_in(remaining, Wake::HoldDone(id))?;
        self.task_mut(id)?.hold = Some(hold);
        observer.on_trace(now, &TraceEvent::Claimed { task: id, server, remaining, waited });
        Ok(())
    }

    /// Give back `id`'s claim on `server`.  Returns the waiters it unblocked,
    /// which the caller must resume.
    fn release_claim<O: SimObserver>(
        &mut self,
        id:       TaskId,
        server:   ServerId,
        observer: &mut O,
    ) -> SimResult<Vec<Grant>> {
        let now = self.now();
        let release = self.servers[server.index()].release(id, now)?;
        observer.on_trace(now, &TraceEvent::Released {
            task:   id,
            server,
            amount: release.amount,
            held:   release.held,
        });
        Ok(release.granted)
    }

    /// Resume every task whose queued request on `server` was just granted.
    fn resume_granted<O: SimObserver>(
        &mut self,
        server:   ServerId,
        granted:  Vec<Grant>,
        observer: &mut O,
    ) -> SimResult<()> {
        for grant in granted {
            self.start_hold(grant.requester, server, grant.waited, observer)?;
        }
        Ok(())
    }

    /// Enter a terminal state and stop the task's monitor.
    fn mark_finished<O: SimObserver>(&mut self, id: TaskId, state: TaskState, observer: &mut O) {
        let now = self.now();
        let Some(task) = self.tasks.get_mut(id.index()) else {
            return;
        };
        task.finish(state, now);
        let server = task.server;
        let turnaround = task.turnaround().unwrap_or(0.0);

        if let Some(slot) = self.monitors.get_mut(id.index()) {
            slot.monitor.cancel();
            if let Some(wake) = slot.wake.take() {
                self.queue.cancel(wake);
            }
        }

        if state == TaskState::Completed {
            debug!(task = %id, %server, turnaround, "completed");
            observer.on_trace(now, &TraceEvent::Completed { task: id, server, turnaround });
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn task_mut(&mut self, id: TaskId) -> SimResult<&mut Task> {
        self.tasks.get_mut(id.index()).ok_or(SimError::UnknownTask(id))
    }

    fn check_capacity(&self) -> SimResult<()> {
        for server in &self.servers {
            if server.claimed() > server.capacity() {
                return Err(SimError::Invariant(format!(
                    "{} claims {} of {}",
                    server.name(),
                    server.claimed(),
                    server.capacity()
                )));
            }
        }
        Ok(())
    }
}
