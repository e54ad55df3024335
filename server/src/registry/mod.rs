mod actor_logic;
mod actor_registry;
mod multi_index;
mod observer;

pub use actor_logic::ActorLogic;
pub use actor_registry::{ActorRegistry, ActorSnapshots};
pub use multi_index::MultiIndex;
pub use observer::{ActorObserver, ObserverKey};
