use std::mem;

use log::{debug, warn};

use strand_shared::{
    Actor, ActorDelta, ActorId, Effect, InputFrame, Rect, SceneDelta, Timestamp, Vec2,
};

use super::{ClientKey, LiaisonState, OccupantStatus, TickRecord, TickRecordList};
use crate::{registry::ActorSnapshots, Scene};

/// Streams one client the changes within its area of interest, relative to
/// the last tick it acknowledged.
pub struct ClientLiaison {
    key: ClientKey,
    state: LiaisonState,
    pawn: Option<ActorId>,
    target: Option<ActorId>,
    local_interest: Rect,
    world_interest: Rect,
    records: TickRecordList,
    ping: Timestamp,
    last_input: Timestamp,
    // scratch buffers reused between deltas
    added: Vec<Actor>,
    updated: Vec<ActorDelta>,
    removed: Vec<ActorId>,
    effects: Vec<Effect>,
}

impl ClientLiaison {
    pub fn new(key: ClientKey, local_interest: Rect) -> Self {
        Self {
            key,
            state: LiaisonState::Active,
            pawn: None,
            target: None,
            local_interest,
            world_interest: local_interest,
            records: TickRecordList::with_baseline(0),
            ping: 0,
            last_input: 0,
            added: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn key(&self) -> ClientKey {
        self.key
    }

    pub fn state(&self) -> LiaisonState {
        self.state
    }

    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// The actor the client controls, if any
    pub fn pawn(&self) -> Option<ActorId> {
        self.pawn
    }

    /// Whether the client's input frames drive its target
    pub fn controls_target(&self) -> bool {
        self.target.is_some() && self.target == self.pawn
    }

    pub fn local_interest(&self) -> &Rect {
        &self.local_interest
    }

    /// The area of interest used for the most recent delta
    pub fn world_interest(&self) -> &Rect {
        &self.world_interest
    }

    pub fn ping(&self) -> Timestamp {
        self.ping
    }

    /// Timestamp of the newest input frame admitted
    pub fn last_input(&self) -> Timestamp {
        self.last_input
    }

    pub fn records(&self) -> &TickRecordList {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Timestamp of the record deltas are computed against
    pub fn reference_timestamp(&self) -> Option<Timestamp> {
        self.records.front().map(TickRecord::timestamp)
    }

    /// Gives the client a pawn to control and follow
    pub(crate) fn set_pawn(&mut self, pawn: Option<ActorId>) {
        self.pawn = pawn;
        self.target = pawn;
    }

    /// Changes the actor the client's interest follows
    pub(crate) fn set_target(&mut self, target: Option<ActorId>) {
        self.target = target;
    }

    pub(crate) fn set_local_interest(&mut self, interest: Rect) {
        self.local_interest = interest;
    }

    /// Disconnecting drops every record; reconnecting starts over from an
    /// empty baseline at `timestamp`.
    pub fn client_updated(&mut self, status: OccupantStatus, timestamp: Timestamp) {
        match (status, self.state) {
            (OccupantStatus::Disconnected, LiaisonState::Active) => {
                self.records.clear();
                self.state = LiaisonState::Disconnected;
            }
            (OccupantStatus::Active | OccupantStatus::Idle, LiaisonState::Disconnected) => {
                self.records = TickRecordList::with_baseline(timestamp);
                self.state = LiaisonState::Active;
            }
            _ => {}
        }
    }

    /// Handles a client's input submission: prunes acknowledged records,
    /// records the ping and returns the frames the target should apply.
    pub fn enqueue_input(
        &mut self,
        acknowledge: Timestamp,
        ping: Timestamp,
        frames: Vec<InputFrame>,
        timestamp: Timestamp,
    ) -> Vec<InputFrame> {
        let Some(reference) = self.records.front() else {
            debug!("Client {:?} sent input while disconnected", self.key);
            return Vec::new();
        };
        if acknowledge < reference.timestamp() {
            debug!(
                "Client {:?} acknowledged {} behind reference {}",
                self.key,
                acknowledge,
                reference.timestamp()
            );
            return Vec::new();
        }
        self.records.pop_acknowledged(acknowledge);
        self.ping = ping;

        if !self.controls_target() {
            if !frames.is_empty() {
                warn!("Client {:?} sent input without controlling a target", self.key);
            }
            return Vec::new();
        }

        let mut admitted = Vec::with_capacity(frames.len());
        for frame in frames {
            let input = frame.timestamp();
            if input <= self.last_input || input > timestamp {
                debug!(
                    "Client {:?} frame {} outside ({}, {}]",
                    self.key, input, self.last_input, timestamp
                );
                continue;
            }
            self.last_input = input;
            admitted.push(frame);
        }
        admitted
    }

    /// Records what the client can see this tick and builds its delta.
    /// Returns `None` while disconnected.
    pub fn post_delta(&mut self, scene: &mut Scene) -> Option<SceneDelta> {
        if self.state == LiaisonState::Disconnected {
            return None;
        }
        let timestamp = scene.timestamp();

        let target = self.target.and_then(|id| scene.actor(id)).cloned();
        let origin = target.as_ref().map_or(Vec2::ZERO, Actor::translation);
        self.world_interest = self.local_interest.translated(origin);

        let actors = scene.actor_snapshots(&self.world_interest, target.as_ref());
        let effects = scene.effects_fired_in(&self.world_interest);
        if self.records.is_empty() {
            self.records.push_back(TickRecord::empty(timestamp));
        }
        self.records.push_back(TickRecord::new(timestamp, actors, effects));

        let (Some(reference), Some(current)) = (self.records.front(), self.records.back()) else {
            return None;
        };
        diff_snapshots(
            reference.actors(),
            current.actors(),
            &mut self.added,
            &mut self.updated,
            &mut self.removed,
        );
        for record in self.records.unacknowledged() {
            for effect in record.effects() {
                if effect.expiry() > timestamp {
                    self.effects.push(effect.as_ref().clone());
                }
            }
        }

        let delta = SceneDelta {
            ack_through_input: self.last_input,
            ping: self.ping,
            reference_timestamp: reference.timestamp(),
            timestamp,
            added: take_non_empty(&mut self.added),
            updated: take_non_empty(&mut self.updated),
            removed: take_non_empty(&mut self.removed),
            effects: take_non_empty(&mut self.effects),
        };

        Some(delta)
    }
}

/// Moves the buffer's items out, leaving an empty buffer of the same capacity
fn take_non_empty<T>(items: &mut Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        return None;
    }
    let capacity = items.capacity();
    Some(mem::replace(items, Vec::with_capacity(capacity)))
}

/// Compares two snapshot maps, appending actors only in `current` to
/// `added`, actors whose state changed to `updated` and actors only in
/// `reference` to `removed`. Output is in id order.
pub fn diff_snapshots(
    reference: &ActorSnapshots,
    current: &ActorSnapshots,
    added: &mut Vec<Actor>,
    updated: &mut Vec<ActorDelta>,
    removed: &mut Vec<ActorId>,
) {
    for (id, snapshot) in current {
        match reference.get(id) {
            None => added.push(snapshot.as_ref().clone()),
            Some(previous) => {
                if previous != snapshot {
                    updated.push(ActorDelta::new(previous, snapshot));
                }
            }
        }
    }
    for id in reference.keys() {
        if !current.contains_key(id) {
            removed.push(*id);
        }
    }
}
