//! `Channel` and `Endpoint` — an in-process stand-in for a broadcast channel.
//!
//! The hub behind a `Channel` is shared by every attached endpoint through an
//! `Arc<Mutex<…>>`.  Nothing else is shared between participants: the only
//! thing that crosses the hub is encoded JSON frames.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ra_core::{EndpointId, Role, SimRng};

use crate::{Envelope, FaultPolicy, Message, MessageHandler, SyncResult};

/// Running counters over the channel's lifetime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub published:  u64,
    /// Frames queued on receivers, duplicates included.
    pub delivered:  u64,
    pub dropped:    u64,
    pub duplicated: u64,
}

struct Inbox {
    role:   Role,
    frames: VecDeque<String>,
}

struct Hub {
    next_id: EndpointId,
    inboxes: BTreeMap<EndpointId, Inbox>,
    faults:  FaultPolicy,
    rng:     SimRng,
    stats:   ChannelStats,
}

/// A named broadcast channel.  Cloning yields another handle to the same hub.
#[derive(Clone)]
pub struct Channel {
    name: Arc<str>,
    hub:  Arc<Mutex<Hub>>,
}

impl Channel {
    pub fn new(name: &str, faults: FaultPolicy) -> Self {
        let hub = Hub {
            next_id: EndpointId(0),
            inboxes: BTreeMap::new(),
            rng:     SimRng::new(faults.seed),
            faults,
            stats:   ChannelStats::default(),
        };
        Self { name: Arc::from(name), hub: Arc::new(Mutex::new(hub)) }
    }

    /// A channel with no loss or duplication.
    pub fn reliable(name: &str) -> Self {
        Self::new(name, FaultPolicy::reliable())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Join the channel as `role`.  Only frames published from now on reach
    /// the new endpoint.
    pub fn attach(&self, role: Role) -> Endpoint {
        let mut hub = self.lock();
        let id = hub.next_id;
        hub.next_id = id.next();
        hub.inboxes.insert(id, Inbox { role, frames: VecDeque::new() });
        tracing::debug!(channel = %self.name, %id, %role, "endpoint attached");
        Endpoint { id, role, channel: self.clone() }
    }

    /// Number of currently attached endpoints.
    pub fn subscriber_count(&self) -> usize {
        self.lock().inboxes.len()
    }

    pub fn stats(&self) -> ChannelStats {
        self.lock().stats
    }

    /// Lock the hub, recovering the guard from a poisoned mutex.
    fn lock(&self) -> MutexGuard<'_, Hub> {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One participant's attachment to a [`Channel`].  Dropping it detaches.
pub struct Endpoint {
    id:      EndpointId,
    role:    Role,
    channel: Channel,
}

impl Endpoint {
    pub fn id(&self) -> EndpointId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Publish `message` stamped with `timestamp` (unix ms).
    ///
    /// Never blocks on receivers.  Returns the number of frames queued on
    /// other endpoints, which is zero when nobody else is attached.
    pub fn publish(&self, message: Message, timestamp: i64) -> SyncResult<usize> {
        let envelope = Envelope::new(self.role, timestamp, message);
        let frame = envelope.to_json()?;

        let mut hub = self.channel.lock();
        let hub = &mut *hub;
        hub.stats.published += 1;

        let mut queued = 0;
        for (id, inbox) in hub.inboxes.iter_mut() {
            if *id == self.id {
                continue;
            }
            let copies = hub.faults.copies(&mut hub.rng);
            match copies {
                0 => hub.stats.dropped += 1,
                2 => hub.stats.duplicated += 1,
                _ => {}
            }
            for _ in 0..copies {
                inbox.frames.push_back(frame.clone());
            }
            queued += copies;
        }
        hub.stats.delivered += queued as u64;

        tracing::trace!(
            channel = %self.channel.name,
            sender = %self.role,
            kind = %envelope.kind(),
            queued,
            "published"
        );
        Ok(queued)
    }

    /// Frames waiting for this endpoint.
    pub fn pending(&self) -> usize {
        self.channel
            .lock()
            .inboxes
            .get(&self.id)
            .map_or(0, |inbox| inbox.frames.len())
    }

    /// Take every delivered envelope, in delivery order.
    ///
    /// A frame that fails to decode is logged and treated as lost.
    pub fn drain(&self) -> Vec<Envelope> {
        let frames: Vec<String> = {
            let mut hub = self.channel.lock();
            match hub.inboxes.get_mut(&self.id) {
                Some(inbox) => inbox.frames.drain(..).collect(),
                None => Vec::new(),
            }
        };
        frames
            .iter()
            .filter_map(|frame| match Envelope::from_json(frame) {
                Ok(env) => Some(env),
                Err(err) => {
                    tracing::warn!(channel = %self.channel.name, error = %err, "undecodable frame dropped");
                    None
                }
            })
            .collect()
    }

    /// Hand every delivered envelope to `handler`.  Returns how many were
    /// handled.
    pub fn dispatch<H: MessageHandler + ?Sized>(&self, handler: &mut H) -> usize {
        let envelopes = self.drain();
        for env in &envelopes {
            handler.on_message(env);
        }
        envelopes.len()
    }

    /// Roles of the other endpoints currently attached.
    pub fn peers(&self) -> Vec<Role> {
        self.channel
            .lock()
            .inboxes
            .iter()
            .filter(|(id, _)| **id != self.id)
            .map(|(_, inbox)| inbox.role)
            .collect()
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        let mut hub = self.channel.lock();
        hub.inboxes.remove(&self.id);
        tracing::debug!(channel = %self.channel.name, id = %self.id, "endpoint detached");
    }
}
