// ClientKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct ClientKey(u64);

impl ClientKey {
    pub(crate) fn new(value: u64) -> Self {
        ClientKey(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// Connection status reported for a client's occupant
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum OccupantStatus {
    Active,
    Idle,
    Disconnected,
}

/// Whether a liaison is streaming deltas
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum LiaisonState {
    Active,
    Disconnected,
}
