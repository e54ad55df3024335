use std::{cell::RefCell, rc::Rc};

use strand_server::{
    shared::{Actor, ActorId, Timestamp},
    ActorLogic, ActorObserver, Sensor, SensorKind,
};

pub type SensorLog = Rc<RefCell<Vec<(Timestamp, ActorId)>>>;

/// A sensor that remembers every trigger
pub struct RecordingSensor {
    kind: SensorKind,
    mask: u32,
    log: SensorLog,
}

impl RecordingSensor {
    pub fn new(kind: SensorKind, mask: u32) -> (Self, SensorLog) {
        let log = SensorLog::default();
        let sensor = Self {
            kind,
            mask,
            log: log.clone(),
        };
        (sensor, log)
    }
}

impl Sensor for RecordingSensor {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn mask(&self) -> u32 {
        self.mask
    }

    fn trigger(&mut self, timestamp: Timestamp, actor: &Actor) {
        self.log.borrow_mut().push((timestamp, actor.id()));
    }
}

#[derive(Default)]
pub struct ObserverLog {
    pub added: Vec<ActorId>,
    pub removed: Vec<ActorId>,
}

/// An actor observer that remembers additions & removals
pub struct RecordingObserver {
    log: Rc<RefCell<ObserverLog>>,
}

impl RecordingObserver {
    pub fn new() -> (Self, Rc<RefCell<ObserverLog>>) {
        let log = Rc::new(RefCell::new(ObserverLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl ActorObserver for RecordingObserver {
    fn actor_added(&mut self, logic: &ActorLogic) {
        self.log.borrow_mut().added.push(logic.id());
    }

    fn actor_removed(&mut self, logic: &ActorLogic) {
        self.log.borrow_mut().removed.push(logic.id());
    }
}
