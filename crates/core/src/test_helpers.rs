//! In-memory [`WorkerPool`] for supervisor tests.
//!
//! Workers never run anything: each spawned frame is held as "alive" until
//! `reap_any` picks it in the configured completion order and reports the
//! outcome scripted for that frame (exit 0 unless overridden).

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use crate::outcome::Outcome;
use crate::pool::{LaunchError, ReapError, Reaped, WorkerHandle, WorkerPool};
use crate::render::FrameParams;

/// Which alive worker `reap_any` reports next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Oldest launch finishes first.
    Fifo,
    /// Newest launch finishes first.
    Lifo,
}

/// Observable pool activity, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolEvent {
    Launch(u32),
    Reap(u32),
}

#[derive(Debug)]
pub struct ScriptedPool {
    completion: Completion,
    outcomes: HashMap<u32, Outcome>,
    failing_attempts: HashSet<usize>,
    spurious_reaps: HashSet<usize>,
    spawn_attempts: usize,
    reap_calls: usize,
    alive: VecDeque<WorkerHandle>,
    peak_alive: usize,
    events: Vec<PoolEvent>,
    params: Vec<FrameParams>,
}

impl Default for ScriptedPool {
    fn default() -> Self {
        Self {
            completion: Completion::Fifo,
            outcomes: HashMap::new(),
            failing_attempts: HashSet::new(),
            spurious_reaps: HashSet::new(),
            spawn_attempts: 0,
            reap_calls: 0,
            alive: VecDeque::new(),
            peak_alive: 0,
            events: Vec::new(),
            params: Vec::new(),
        }
    }
}

impl ScriptedPool {
    pub fn completion(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }

    /// Refuse the spawn attempts with these zero-based attempt numbers.
    pub fn fail_spawn_attempts(mut self, attempts: impl IntoIterator<Item = usize>) -> Self {
        self.failing_attempts.extend(attempts);
        self
    }

    pub fn exit_code(mut self, frame: u32, code: i32) -> Self {
        self.outcomes.insert(frame, Outcome::Exited { code });
        self
    }

    pub fn signal(mut self, frame: u32, signal: i32) -> Self {
        self.outcomes.insert(frame, Outcome::Signaled { signal });
        self
    }

    pub fn indeterminate(mut self, frame: u32) -> Self {
        self.outcomes.insert(frame, Outcome::Indeterminate);
        self
    }

    /// Report `NoChildren` on the given zero-based `reap_any` call even if
    /// workers are alive.
    pub fn spurious_no_children_on_reap(mut self, call: usize) -> Self {
        self.spurious_reaps.insert(call);
        self
    }

    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    pub fn launched_frames(&self) -> Vec<u32> {
        self.params.iter().map(|p| p.frame).collect()
    }

    pub fn reaped_frames(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PoolEvent::Reap(frame) => Some(*frame),
                PoolEvent::Launch(_) => None,
            })
            .collect()
    }

    pub fn requested_outputs(&self) -> Vec<String> {
        self.params.iter().map(|p| p.output.clone()).collect()
    }

    pub fn requested_params(&self) -> &[FrameParams] {
        &self.params
    }

    pub fn alive(&self) -> usize {
        self.alive.len()
    }

    pub fn peak_alive(&self) -> usize {
        self.peak_alive
    }
}

impl WorkerPool for ScriptedPool {
    fn spawn(&mut self, params: &FrameParams) -> Result<WorkerHandle, LaunchError> {
        let attempt = self.spawn_attempts;
        self.spawn_attempts += 1;

        if self.failing_attempts.contains(&attempt) {
            return Err(LaunchError::Spawn {
                frame: params.frame,
                source: std::io::Error::from(std::io::ErrorKind::WouldBlock),
            });
        }

        let handle = WorkerHandle {
            pid: 1000 + params.frame,
            frame: params.frame,
        };
        self.alive.push_back(handle);
        self.peak_alive = self.peak_alive.max(self.alive.len());
        self.events.push(PoolEvent::Launch(params.frame));
        self.params.push(params.clone());
        Ok(handle)
    }

    async fn reap_any(&mut self) -> Result<Reaped, ReapError> {
        let call = self.reap_calls;
        self.reap_calls += 1;

        if self.spurious_reaps.contains(&call) {
            return Err(ReapError::NoChildren);
        }

        let next = match self.completion {
            Completion::Fifo => self.alive.pop_front(),
            Completion::Lifo => self.alive.pop_back(),
        };
        let handle = next.ok_or(ReapError::NoChildren)?;

        self.events.push(PoolEvent::Reap(handle.frame));
        let outcome = self
            .outcomes
            .get(&handle.frame)
            .copied()
            .unwrap_or(Outcome::Exited { code: 0 });

        Ok(Reaped {
            handle,
            outcome,
            elapsed: Duration::ZERO,
        })
    }
}
