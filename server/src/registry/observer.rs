use super::ActorLogic;

// ObserverKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct ObserverKey(u64);

impl ObserverKey {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// Notified whenever an actor enters or leaves the registry
pub trait ActorObserver {
    fn actor_added(&mut self, _logic: &ActorLogic) {}
    fn actor_removed(&mut self, _logic: &ActorLogic) {}
}
