//! Unit tests for ep-sim.

use ep_core::{GeneratorConfig, GeoPoint, IntRange, RandomSource, ServerId, SimConfig, SimTime, TaskId};
use ep_mobility::PathTrack;

use crate::{
    NoopObserver, ServerSpec, Sim, SimBuilder, SimError, TaskSpec, TaskState, TraceEvent,
    TraceRecorder,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Planar = fn(GeoPoint, GeoPoint) -> f64;

fn planar(a: GeoPoint, b: GeoPoint) -> f64 {
    ((a.lat - b.lat).powi(2) + (a.lon - b.lon).powi(2)).sqrt()
}

/// Always returns the low end of every range and the first weight.
struct LowRandom;

impl RandomSource for LowRandom {
    fn uniform_int(&mut self, lo: i64, _hi: i64) -> i64 {
        lo
    }
    fn uniform_real(&mut self, lo: f64, _hi: f64) -> f64 {
        lo
    }
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.is_empty() { None } else { Some(0) }
    }
}

const NEAR_S0: GeoPoint = GeoPoint::new(0.0, 0.0);
const NEAR_S1: GeoPoint = GeoPoint::new(0.0, 100.0);

/// One-waypoint steps, no generator, no snapshots.
fn manual_config() -> SimConfig {
    SimConfig {
        monitor_step:      IntRange::new(1, 1),
        snapshot_interval: None,
        generator:         GeneratorConfig { enabled: false, ..GeneratorConfig::default() },
        ..SimConfig::default()
    }
}

fn two_servers() -> Vec<ServerSpec> {
    vec![
        ServerSpec::new("server0", NEAR_S0, 1500),
        ServerSpec::new("server1", NEAR_S1, 1500),
    ]
}

/// `len` waypoints; those before `split` sit on server 0, the rest on
/// server 1.
fn split_path(len: usize, split: usize) -> PathTrack {
    let pts = (0..len).map(|i| if i < split { NEAR_S0 } else { NEAR_S1 }).collect();
    PathTrack::new(pts).unwrap()
}

fn manual_sim(path: PathTrack) -> Sim<Planar, LowRandom> {
    SimBuilder::new(manual_config(), planar as Planar)
        .servers(two_servers())
        .path(path)
        .random_source(LowRandom)
        .build()
        .unwrap()
}

fn spec(server: u16, path_index: usize, process_time: f64, cpu_demand: u32) -> TaskSpec {
    TaskSpec { server: ServerId(server), path_index, process_time, cpu_demand }
}

/// Trace with the monitor chatter filtered out.
fn lifecycle(rec: &TraceRecorder) -> Vec<(f64, TraceEvent)> {
    rec.events
        .iter()
        .filter(|(_, e)| !matches!(e, TraceEvent::Moved { .. }))
        .map(|(t, e)| (t.as_f64(), e.clone()))
        .collect()
}

// ── Single server ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod single_server {
    use super::*;

    #[test]
    fn lone_task_claims_and_completes() {
        let mut sim = manual_sim(split_path(10, 10));
        let mut rec = TraceRecorder::new();
        let id = sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();
        let summary = sim.run(&mut rec).unwrap();

        assert_eq!(lifecycle(&rec), vec![
            (0.0, TraceEvent::Created {
                task: id, server: ServerId(0), process_time: 50.0, cpu_demand: 900, path_index: 0,
            }),
            (0.0, TraceEvent::Claimed { task: id, server: ServerId(0), remaining: 50.0, waited: 0.0 }),
            (50.0, TraceEvent::Released { task: id, server: ServerId(0), amount: 900, held: 50.0 }),
            (50.0, TraceEvent::Completed { task: id, server: ServerId(0), turnaround: 50.0 }),
        ]);

        let task = sim.task(id).unwrap();
        assert_eq!(task.state, TaskState::Completed);
        assert_eq!(task.remaining, 0.0);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.final_time, SimTime(50.0));
        assert!(sim.queue.is_empty(), "monitor must stop with its task");
        assert_eq!(sim.server(ServerId(0)).unwrap().claimed(), 0);
    }

    #[test]
    fn second_task_waits_for_the_first() {
        let mut sim = manual_sim(split_path(10, 10));
        let mut rec = TraceRecorder::new();
        let a = sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();
        let b = sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();

        assert_eq!(sim.task(b).unwrap().state, TaskState::Queued);
        assert_eq!(sim.server(ServerId(0)).unwrap().requesters().collect::<Vec<_>>(), vec![b]);

        sim.run(&mut NoopObserver).unwrap();
        let (ta, tb) = (sim.task(a).unwrap(), sim.task(b).unwrap());
        assert_eq!(ta.finished_at, Some(SimTime(50.0)));
        assert_eq!(tb.finished_at, Some(SimTime(100.0)));
        assert_eq!(tb.turnaround(), Some(100.0));
    }

    #[test]
    fn grant_reports_waiting_time() {
        let mut sim = manual_sim(split_path(10, 10));
        let mut rec = TraceRecorder::new();
        sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();
        let b = sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();
        sim.run(&mut rec).unwrap();

        let claimed: Vec<_> = rec
            .for_task(b)
            .into_iter()
            .filter_map(|(t, e)| match e {
                TraceEvent::Claimed { waited, .. } => Some((t.as_f64(), *waited)),
                _ => None,
            })
            .collect();
        assert_eq!(claimed, vec![(50.0, 50.0)]);
    }

    #[test]
    fn oversized_task_fails_and_run_continues() {
        let mut sim = manual_sim(split_path(10, 10));
        let mut rec = TraceRecorder::new();
        let big = sim.spawn_task(spec(0, 0, 50.0, 2000), &mut rec).unwrap();
        let ok = sim.spawn_task(spec(0, 0, 10.0, 500), &mut rec).unwrap();
        let summary = sim.run(&mut rec).unwrap();

        assert_eq!(sim.task(big).unwrap().state, TaskState::Failed);
        assert_eq!(sim.task(ok).unwrap().state, TaskState::Completed);
        assert!(sim.monitors[big.index()].monitor.is_cancelled());
        assert!(rec.for_task(big).iter().any(|(_, e)| matches!(e, TraceEvent::Failed { .. })));
        assert!(!rec.for_task(big).iter().any(|(_, e)| matches!(e, TraceEvent::Moved { .. })));
        assert_eq!((summary.completed, summary.failed, summary.in_flight), (1, 1, 0));
    }

    #[test]
    fn events_at_the_horizon_still_run() {
        let mut sim = manual_sim(split_path(10, 10));
        sim.config.horizon = 50.0;
        let id = sim.spawn_task(spec(0, 0, 50.0, 900), &mut NoopObserver).unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.task(id).unwrap().state, TaskState::Completed);
    }

    #[test]
    fn horizon_cuts_long_tasks_short() {
        let mut sim = manual_sim(split_path(10, 10));
        sim.config.horizon = 30.0;
        let id = sim.spawn_task(spec(0, 0, 50.0, 900), &mut NoopObserver).unwrap();
        let summary = sim.run(&mut NoopObserver).unwrap();

        assert_eq!(sim.task(id).unwrap().state, TaskState::Claiming);
        assert_eq!(summary.in_flight, 1);
        assert_eq!(summary.final_time, SimTime(30.0));
    }

    #[test]
    fn unknown_server_rejected() {
        let mut sim = manual_sim(split_path(10, 10));
        let err = sim.spawn_task(spec(7, 0, 10.0, 100), &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::UnknownServer(ServerId(7))));
        assert!(sim.tasks.is_empty());
    }
}

// ── Reassignment ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod reassignment {
    use super::*;

    #[test]
    fn claiming_task_moves_with_remaining_work() {
        // Index reaches 20 at t=20 and the user is then closest to server 1.
        let mut sim = manual_sim(split_path(100, 20));
        let mut rec = TraceRecorder::new();
        let id = sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();
        sim.run(&mut rec).unwrap();

        assert_eq!(lifecycle(&rec)[2..], [
            (20.0, TraceEvent::Released { task: id, server: ServerId(0), amount: 900, held: 20.0 }),
            (20.0, TraceEvent::Reassigned {
                task: id, from: ServerId(0), to: ServerId(1), remaining: 30.0,
            }),
            (20.0, TraceEvent::Claimed { task: id, server: ServerId(1), remaining: 30.0, waited: 0.0 }),
            (50.0, TraceEvent::Released { task: id, server: ServerId(1), amount: 900, held: 30.0 }),
            (50.0, TraceEvent::Completed { task: id, server: ServerId(1), turnaround: 50.0 }),
        ]);

        let task = sim.task(id).unwrap();
        assert_eq!(task.server, ServerId(1));
        assert_eq!(task.reassignments, 1);
        assert_eq!(sim.server(ServerId(0)).unwrap().claimed(), 0);
        assert_eq!(sim.server(ServerId(1)).unwrap().claimed(), 0);
    }

    #[test]
    fn queued_task_leaves_the_old_queue() {
        // A holds server 0.  B waits behind it, walks into server 1's area at
        // t=5 and starts there straight away.
        let mut sim = manual_sim(split_path(200, 60));
        let mut rec = TraceRecorder::new();
        let a = sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();
        let b = sim.spawn_task(spec(0, 55, 50.0, 900), &mut rec).unwrap();
        sim.run(&mut rec).unwrap();

        let reassigned: Vec<_> = rec
            .for_task(b)
            .into_iter()
            .filter(|(_, e)| matches!(e, TraceEvent::Reassigned { .. }))
            .map(|(t, _)| t.as_f64())
            .collect();
        assert_eq!(reassigned, vec![5.0]);

        let (ta, tb) = (sim.task(a).unwrap(), sim.task(b).unwrap());
        assert_eq!(ta.finished_at, Some(SimTime(50.0)));
        assert_eq!(tb.server, ServerId(1));
        assert_eq!(tb.finished_at, Some(SimTime(55.0)));
        assert_eq!(sim.server(ServerId(0)).unwrap().queue_len(), 0);
    }

    #[test]
    fn leaving_a_queue_unblocks_followers() {
        // Server 0 capacity 1500: A holds 900, B (900) blocks C (500).
        // When B walks away, C fits and is granted at once.
        let mut sim = manual_sim(split_path(200, 60));
        let mut rec = TraceRecorder::new();
        sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();
        let b = sim.spawn_task(spec(0, 55, 50.0, 900), &mut rec).unwrap();
        let c = sim.spawn_task(spec(0, 0, 10.0, 500), &mut rec).unwrap();
        assert_eq!(sim.task(c).unwrap().state, TaskState::Queued);

        sim.run(&mut rec).unwrap();
        assert_eq!(sim.task(b).unwrap().server, ServerId(1));
        let c_claimed = rec
            .for_task(c)
            .into_iter()
            .find_map(|(t, e)| matches!(e, TraceEvent::Claimed { .. }).then_some(t.as_f64()));
        assert_eq!(c_claimed, Some(5.0));
        assert_eq!(sim.task(c).unwrap().finished_at, Some(SimTime(15.0)));
    }

    #[test]
    fn move_on_the_last_instant_completes_in_place() {
        // The monitor tick at t=1 was scheduled before the hold, so it runs
        // first and finds the work already done.
        let mut sim = manual_sim(split_path(10, 1));
        let mut rec = TraceRecorder::new();
        let id = sim.spawn_task(spec(0, 0, 1.0, 900), &mut rec).unwrap();
        sim.run(&mut rec).unwrap();

        assert_eq!(lifecycle(&rec)[2..], [
            (1.0, TraceEvent::Released { task: id, server: ServerId(0), amount: 900, held: 1.0 }),
            (1.0, TraceEvent::Completed { task: id, server: ServerId(0), turnaround: 1.0 }),
        ]);
        let task = sim.task(id).unwrap();
        assert_eq!(task.state, TaskState::Completed);
        assert_eq!(task.server, ServerId(0));
        assert_eq!(task.reassignments, 0);
        assert_eq!(sim.server(ServerId(1)).unwrap().claimed(), 0);
        assert_eq!(sim.server(ServerId(1)).unwrap().queue_len(), 0);
        assert!(sim.queue.is_empty());
    }

    #[test]
    fn move_to_a_too_small_server_fails_the_task() {
        let mut sim = SimBuilder::new(manual_config(), planar as Planar)
            .server(ServerSpec::new("big", NEAR_S0, 1500))
            .server(ServerSpec::new("small", NEAR_S1, 500))
            .path(split_path(100, 20))
            .random_source(LowRandom)
            .build()
            .unwrap();
        let mut rec = TraceRecorder::new();
        let a = sim.spawn_task(spec(0, 0, 50.0, 900), &mut rec).unwrap();
        let b = sim.spawn_task(spec(0, 0, 10.0, 400), &mut rec).unwrap();
        let summary = sim.run(&mut rec).unwrap();

        let task = sim.task(a).unwrap();
        assert_eq!(task.state, TaskState::Failed);
        assert_eq!(task.reassignments, 1);
        assert_eq!(task.finished_at, Some(SimTime(20.0)));
        assert!(sim.monitors[a.index()].monitor.is_cancelled());
        assert!(rec.for_task(a).iter().any(|(_, e)| matches!(
            e,
            TraceEvent::Released { server: ServerId(0), .. }
        )));
        assert!(matches!(
            rec.for_task(a).last(),
            Some((_, TraceEvent::Failed { server: ServerId(1), .. }))
        ));

        for id in [0, 1] {
            let server = sim.server(ServerId(id)).unwrap();
            assert_eq!((server.claimed(), server.queue_len()), (0, 0));
        }
        assert_eq!(sim.task(b).unwrap().state, TaskState::Completed);
        assert_eq!((summary.completed, summary.failed, summary.in_flight), (1, 1, 0));
        assert!(sim.queue.is_empty());
    }

    #[test]
    fn same_nearest_server_is_not_a_move() {
        let mut sim = manual_sim(split_path(100, 100));
        let mut rec = TraceRecorder::new();
        let id = sim.spawn_task(spec(0, 0, 30.0, 900), &mut rec).unwrap();
        sim.run(&mut rec).unwrap();
        assert_eq!(sim.task(id).unwrap().reassignments, 0);
        // Ticks at t=1..=29; the one at t=30 is cancelled by completion.
        let moves = rec.for_task(id).iter().filter(|(_, e)| e.kind() == "moved").count();
        assert_eq!(moves, 29);
    }
}

// ── Whole runs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use super::*;
    use ep_core::SimRng;

    fn generated_run(seed: u64) -> (Sim<Planar, SimRng>, TraceRecorder) {
        let config = SimConfig {
            seed,
            generator: GeneratorConfig {
                server_weights: vec![40.0, 30.0],
                ..GeneratorConfig::default()
            },
            ..SimConfig::default()
        };
        let mut sim = SimBuilder::new(config, planar as Planar)
            .servers(two_servers())
            .path(split_path(120, 60))
            .build()
            .unwrap();
        let mut rec = TraceRecorder::new();
        sim.run(&mut rec).unwrap();
        (sim, rec)
    }

    #[test]
    fn same_seed_same_trace() {
        let (_, first) = generated_run(7);
        let (_, second) = generated_run(7);
        assert!(!first.events.is_empty());
        assert_eq!(first.events, second.events);
    }

    #[test]
    fn generator_runs_to_horizon() {
        let (sim, rec) = generated_run(3);
        let summary = sim.summary();
        assert_eq!(summary.final_time, SimTime(200.0));
        // Arrivals every 20–30 units starting at 0: between 7 and 11 tasks.
        assert!((7..=11).contains(&summary.tasks_created), "{summary:?}");
        assert_eq!(
            summary.completed + summary.failed + summary.in_flight,
            summary.tasks_created
        );
        assert!(!rec.snapshots.is_empty());
    }

    #[test]
    fn capacity_holds_in_every_snapshot() {
        let (sim, rec) = generated_run(11);
        for (_, servers) in &rec.snapshots {
            for s in servers {
                assert!(s.claimed <= s.capacity);
                let held: u32 = s
                    .claimers
                    .iter()
                    .map(|id| sim.task(*id).unwrap().cpu_demand)
                    .sum();
                assert_eq!(held, s.claimed);
            }
        }
    }

    #[test]
    fn completed_work_equals_process_time() {
        let (sim, rec) = generated_run(5);
        for task in sim.tasks.iter().filter(|t| t.state == TaskState::Completed) {
            let held: f64 = rec
                .for_task(task.id)
                .iter()
                .filter_map(|(_, e)| match e {
                    TraceEvent::Released { held, .. } => Some(*held),
                    _ => None,
                })
                .sum();
            assert!((held - task.process_time).abs() < 1e-6, "{} held {held}", task.id);
        }
    }

    #[test]
    fn live_tasks_hold_exactly_one_place() {
        let (sim, _) = generated_run(9);
        for task in sim.tasks.iter().filter(|t| t.is_live()) {
            let places: usize = sim
                .servers
                .iter()
                .map(|s| s.is_claiming(task.id) as usize + s.is_waiting(task.id) as usize)
                .sum();
            assert_eq!(places, 1, "{}", task.id);
            let home = sim.server(task.server).unwrap();
            match task.state {
                TaskState::Claiming => assert!(home.is_claiming(task.id)),
                TaskState::Queued => assert!(home.is_waiting(task.id)),
                _ => unreachable!(),
            }
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn requires_servers_and_path() {
        let err = SimBuilder::new(manual_config(), planar as Planar)
            .path(split_path(10, 10))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Config(_)));

        let err = SimBuilder::new(manual_config(), planar as Planar)
            .servers(two_servers())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn weights_must_match_servers() {
        // Default weights have three entries.
        let config = SimConfig::default();
        let err = SimBuilder::new(config, planar as Planar)
            .servers(two_servers())
            .path(split_path(10, 10))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn zero_weights_rejected_before_running() {
        let config = SimConfig {
            generator: GeneratorConfig { server_weights: vec![0.0, 0.0], ..GeneratorConfig::default() },
            ..SimConfig::default()
        };
        let err = SimBuilder::new(config, planar as Planar)
            .servers(two_servers())
            .path(split_path(10, 10))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SimConfig { horizon: -1.0, ..manual_config() };
        let err = SimBuilder::new(config, planar as Planar)
            .servers(two_servers())
            .path(split_path(10, 10))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn zero_capacity_server_rejected() {
        let err = SimBuilder::new(manual_config(), planar as Planar)
            .server(ServerSpec::new("dead", NEAR_S0, 0))
            .path(split_path(10, 10))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Resource(_)));
    }

    #[test]
    fn generator_and_snapshot_start_at_zero() {
        let config = SimConfig {
            generator: GeneratorConfig { server_weights: vec![1.0, 1.0], ..GeneratorConfig::default() },
            ..SimConfig::default()
        };
        let sim = SimBuilder::new(config, planar as Planar)
            .servers(two_servers())
            .path(split_path(10, 10))
            .build()
            .unwrap();
        let wakes: Vec<_> = sim.queue.iter().map(|(k, w)| (k.time, *w)).collect();
        assert_eq!(wakes, vec![
            (SimTime::ZERO, crate::Wake::Generate),
            (SimTime::ZERO, crate::Wake::Snapshot),
        ]);
        assert_eq!(sim.sites[1].id, ServerId(1));
        assert_eq!(sim.task(TaskId(0)), None);
    }
}
