use strand_shared::Timestamp;

use super::Scene;

/// Anything that wants to run once per tick.
///
/// Closures taking `(&mut Scene, Timestamp)` are participants too.
pub trait TickParticipant {
    /// Runs the participant for the tick at `timestamp`. Returning false
    /// removes it from the tick list.
    fn tick(&mut self, scene: &mut Scene, timestamp: Timestamp) -> bool;
}

impl<F> TickParticipant for F
where
    F: FnMut(&mut Scene, Timestamp) -> bool,
{
    fn tick(&mut self, scene: &mut Scene, timestamp: Timestamp) -> bool {
        self(scene, timestamp)
    }
}
