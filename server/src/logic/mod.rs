mod builtin;
mod factory;
mod logic;

pub use builtin::{BasicLogic, PawnLogic, StaticLogic};
pub use factory::{LogicConstructor, LogicFactory};
pub use logic::Logic;
