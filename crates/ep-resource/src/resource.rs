//! The `Resource` type — one edge server's CPU capacity.

use std::collections::VecDeque;

use ep_core::{ServerId, SimTime, TaskId};

use crate::{LevelMonitor, ResourceError, ResourceResult};

// ── Records ───────────────────────────────────────────────────────────────────

/// A request waiting in the FIFO queue.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingRequest {
    pub requester:   TaskId,
    pub amount:      u32,
    pub enqueued_at: SimTime,
}

/// Capacity currently held by a task.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Claim {
    pub holder: TaskId,
    pub amount: u32,
    pub since:  SimTime,
}

/// A queued request that was granted as a side effect of a release or a
/// cancellation.  The caller must resume `requester`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grant {
    pub requester: TaskId,
    pub amount:    u32,
    /// How long the request sat in the queue.
    pub waited:    f64,
}

/// Result of [`Resource::request`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Capacity was claimed immediately.
    Granted,
    /// The request was appended to the queue; `position` is its 0-based
    /// place in line.
    Queued { position: usize },
}

/// Result of [`Resource::release`].
#[derive(Clone, Debug, PartialEq)]
pub struct Release {
    pub amount:  u32,
    /// How long the released claim was held.
    pub held:    f64,
    pub granted: Vec<Grant>,
}

/// Result of [`Resource::cancel_request`].
#[derive(Clone, Debug, PartialEq)]
pub struct Cancelled {
    pub request: PendingRequest,
    pub granted: Vec<Grant>,
}

/// Read-only view of a resource for observers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSnapshot {
    pub server:         ServerId,
    pub name:           String,
    pub capacity:       u32,
    pub claimed:        u32,
    pub occupancy:      f64,
    pub mean_occupancy: f64,
    pub max_occupancy:  f64,
    /// Holders in grant order.
    pub claimers:       Vec<TaskId>,
    /// Waiters in queue order.
    pub requesters:     Vec<TaskId>,
}

// ── Resource ──────────────────────────────────────────────────────────────────

/// A named server with bounded capacity.
///
/// `claimed <= capacity` holds after every public method returns.  All
/// mutations complete within a single call, so the single-threaded
/// dispatcher never observes a half-updated resource.
#[derive(Clone, Debug)]
pub struct Resource {
    id:        ServerId,
    name:      String,
    capacity:  u32,
    claimed:   u32,
    claimers:  Vec<Claim>,
    queue:     VecDeque<PendingRequest>,
    occupancy: LevelMonitor,
}

impl Resource {
    /// Create an idle resource.  Occupancy statistics start at `start`.
    pub fn new(
        id:       ServerId,
        name:     impl Into<String>,
        capacity: u32,
        start:    SimTime,
    ) -> ResourceResult<Self> {
        let name = name.into();
        if capacity == 0 {
            return Err(ResourceError::ZeroCapacity { name });
        }
        Ok(Self {
            id,
            name,
            capacity,
            claimed:   0,
            claimers:  Vec::new(),
            queue:     VecDeque::new(),
            occupancy: LevelMonitor::new(start),
        })
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Ask for `amount` units on behalf of `requester`.
    ///
    /// Granted immediately only if nobody is waiting and the amount fits;
    /// otherwise queued behind every earlier request.
    ///
    /// # Errors
    ///
    /// [`ResourceError::CapacityExceeded`] if `amount` can never fit, and
    /// [`ResourceError::DuplicateRequester`] if `requester` already holds or
    /// awaits capacity here.
    pub fn request(
        &mut self,
        requester: TaskId,
        amount:    u32,
        now:       SimTime,
    ) -> ResourceResult<RequestOutcome> {
        if amount == 0 {
            return Err(ResourceError::ZeroAmount { requester });
        }
        if amount > self.capacity {
            return Err(ResourceError::CapacityExceeded {
                name:      self.name.clone(),
                requester,
                requested: amount,
                capacity:  self.capacity,
            });
        }
        if self.is_claiming(requester) || self.is_waiting(requester) {
            return Err(ResourceError::DuplicateRequester {
                name: self.name.clone(),
                requester,
            });
        }

        if self.queue.is_empty() && self.fits(amount) {
            self.claim(requester, amount, now);
            return Ok(RequestOutcome::Granted);
        }

        self.queue.push_back(PendingRequest { requester, amount, enqueued_at: now });
        Ok(RequestOutcome::Queued { position: self.queue.len() - 1 })
    }

    /// Give back everything `holder` claimed and grant waiting requests that
    /// now fit, head first.
    pub fn release(&mut self, holder: TaskId, now: SimTime) -> ResourceResult<Release> {
        let pos = self
            .claimers
            .iter()
            .position(|c| c.holder == holder)
            .ok_or_else(|| ResourceError::NotClaiming { name: self.name.clone(), holder })?;

        let claim = self.claimers.remove(pos);
        self.claimed -= claim.amount;
        self.occupancy.record(now, self.occupancy());

        let granted = self.grant_waiting(now);
        Ok(Release { amount: claim.amount, held: now.since(claim.since), granted })
    }

    /// Withdraw `requester`'s pending request.
    ///
    /// Removing a request can unblock the ones behind it, so the grant loop
    /// runs again afterwards.
    ///
    /// # Errors
    ///
    /// [`ResourceError::UnknownRequester`] if there is no such request,
    /// e.g. because it was granted in the meantime.  Callers normally treat
    /// this as a no-op.
    pub fn cancel_request(&mut self, requester: TaskId, now: SimTime) -> ResourceResult<Cancelled> {
        let pos = self.queue.iter().position(|r| r.requester == requester);
        let Some(request) = pos.and_then(|pos| self.queue.remove(pos)) else {
            return Err(ResourceError::UnknownRequester {
                name: self.name.clone(),
                requester,
            });
        };

        let granted = self.grant_waiting(now);
        Ok(Cancelled { request, granted })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> ServerId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn claimed(&self) -> u32 {
        self.claimed
    }

    #[inline]
    pub fn available(&self) -> u32 {
        self.capacity - self.claimed
    }

    /// `claimed / capacity`.  Observability only.
    #[inline]
    pub fn occupancy(&self) -> f64 {
        self.claimed as f64 / self.capacity as f64
    }

    /// Current holders in grant order.
    pub fn claimers(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.claimers.iter().map(|c| c.holder)
    }

    /// Current waiters in queue order.
    pub fn requesters(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.queue.iter().map(|r| r.requester)
    }

    pub fn claim_of(&self, holder: TaskId) -> Option<&Claim> {
        self.claimers.iter().find(|c| c.holder == holder)
    }

    pub fn is_claiming(&self, task: TaskId) -> bool {
        self.claimers.iter().any(|c| c.holder == task)
    }

    pub fn is_waiting(&self, task: TaskId) -> bool {
        self.queue.iter().any(|r| r.requester == task)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn snapshot(&self, now: SimTime) -> ResourceSnapshot {
        ResourceSnapshot {
            server:         self.id,
            name:           self.name.clone(),
            capacity:       self.capacity,
            claimed:        self.claimed,
            occupancy:      self.occupancy(),
            mean_occupancy: self.occupancy.mean(now),
            max_occupancy:  self.occupancy.max(),
            claimers:       self.claimers().collect(),
            requesters:     self.requesters().collect(),
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    #[inline]
    fn fits(&self, amount: u32) -> bool {
        amount <= self.capacity - self.claimed
    }

    fn claim(&mut self, holder: TaskId, amount: u32, now: SimTime) {
        debug_assert!(self.fits(amount));
        self.claimed += amount;
        self.claimers.push(Claim { holder, amount, since: now });
        self.occupancy.record(now, self.occupancy());
    }

    /// Grant from the head of the queue until the head no longer fits.
    fn grant_waiting(&mut self, now: SimTime) -> Vec<Grant> {
        let mut granted = Vec::new();
        while let Some(head) = self.queue.front().copied() {
            if !self.fits(head.amount) {
                break;
            }
            self.queue.pop_front();
            self.claim(head.requester, head.amount, now);
            granted.push(Grant {
                requester: head.requester,
                amount:    head.amount,
                waited:    now.since(head.enqueued_at),
            });
        }
        granted
    }
}
