mod participant;
mod scene;

pub use participant::TickParticipant;
pub use scene::Scene;
