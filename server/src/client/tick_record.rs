use std::{collections::VecDeque, sync::Arc};

use log::debug;

use strand_shared::{Effect, Timestamp};

use crate::registry::ActorSnapshots;

/// What a client could see on one tick
pub struct TickRecord {
    timestamp: Timestamp,
    actors: ActorSnapshots,
    effects: Vec<Arc<Effect>>,
}

impl TickRecord {
    pub fn new(timestamp: Timestamp, actors: ActorSnapshots, effects: Vec<Arc<Effect>>) -> Self {
        Self {
            timestamp,
            actors,
            effects,
        }
    }

    /// A record of nothing, the state a client is assumed to start from
    pub fn empty(timestamp: Timestamp) -> Self {
        Self::new(timestamp, ActorSnapshots::new(), Vec::new())
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn actors(&self) -> &ActorSnapshots {
        &self.actors
    }

    pub fn effects(&self) -> &[Arc<Effect>] {
        &self.effects
    }
}

/// The records a client has not yet acknowledged, oldest first. The front
/// record is the reference every delta is computed against.
pub struct TickRecordList {
    list: VecDeque<TickRecord>,
}

impl TickRecordList {
    pub fn new() -> Self {
        Self {
            list: VecDeque::new(),
        }
    }

    /// A list holding only an empty baseline at `timestamp`
    pub fn with_baseline(timestamp: Timestamp) -> Self {
        let mut list = Self::new();
        list.push_back(TickRecord::empty(timestamp));
        list
    }

    pub fn front(&self) -> Option<&TickRecord> {
        self.list.front()
    }

    pub fn back(&self) -> Option<&TickRecord> {
        self.list.back()
    }

    pub fn push_back(&mut self, record: TickRecord) {
        self.list.push_back(record);
    }

    /// Drops records older than `acknowledge`, always keeping at least one
    pub fn pop_acknowledged(&mut self, acknowledge: Timestamp) {
        while self.list.len() > 1 {
            match self.list.front() {
                Some(record) if record.timestamp() < acknowledge => {
                    self.list.pop_front();
                }
                _ => return,
            }
        }
        if let Some(record) = self.list.front() {
            if record.timestamp() < acknowledge {
                debug!(
                    "Acknowledged {} is past the newest record {}",
                    acknowledge,
                    record.timestamp()
                );
            }
        }
    }

    /// Iterates every record after the reference
    pub fn unacknowledged(&self) -> impl Iterator<Item = &TickRecord> {
        self.list.iter().skip(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickRecord> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}

impl Default for TickRecordList {
    fn default() -> Self {
        Self::new()
    }
}
