//! The tick loop: participant scheduling, the deferred-action queue, failure
//! isolation and idle suspension.
use std::{
    cell::RefCell,
    rc::Rc,
    sync::{Arc, Mutex},
    thread,
};

use strand_server::{
    shared::{ActorId, ConfigRef, Shape, Timestamp, Vec2},
    ActorConfig, Logic, Scene, SceneConfig, SceneServer, TickOutcome,
};
use strand_test::{config_library, RecordingObserver, TestScene, BOX, WALL};

#[test]
fn timestamp_advances_by_elapsed_wall_clock() {
    let mut test = TestScene::new();
    test.add_observer_client();

    assert_eq!(test.tick_by(40), TickOutcome::Ticked { timestamp: 40 });
    assert_eq!(test.tick_by(55), TickOutcome::Ticked { timestamp: 95 });
    assert_eq!(test.server.previous_timestamp(), 40);
}

#[test]
fn participants_run_in_order_until_they_decline() {
    let mut test = TestScene::new();
    let log: Rc<RefCell<Vec<(&'static str, Timestamp)>>> = Rc::default();

    let first = log.clone();
    test.server
        .add_tick_participant(move |_: &mut Scene, timestamp: Timestamp| {
            first.borrow_mut().push(("once", timestamp));
            false
        });
    let second = log.clone();
    test.server
        .add_tick_participant(move |_: &mut Scene, timestamp: Timestamp| {
            second.borrow_mut().push(("always", timestamp));
            true
        });

    test.tick_to(10);
    test.tick_to(20);

    assert_eq!(
        *log.borrow(),
        vec![("once", 10), ("always", 10), ("always", 20)]
    );
    assert_eq!(test.server.participant_count(), 1);
}

#[test]
fn participant_added_during_tick_runs_next_tick() {
    let mut test = TestScene::new();
    let log: Rc<RefCell<Vec<Timestamp>>> = Rc::default();

    let inner = log.clone();
    test.server
        .add_tick_participant(move |scene: &mut Scene, _: Timestamp| {
            let inner = inner.clone();
            scene.add_tick_participant(move |_: &mut Scene, timestamp: Timestamp| {
                inner.borrow_mut().push(timestamp);
                false
            });
            false
        });

    test.tick_to(10);
    assert!(log.borrow().is_empty());
    test.tick_to(20);
    assert_eq!(*log.borrow(), vec![20]);
}

#[test]
fn deferred_actions_run_before_participants() {
    let mut test = TestScene::new();
    let log: Arc<Mutex<Vec<&'static str>>> = Arc::default();

    let participant_log = log.clone();
    test.server
        .add_tick_participant(move |_: &mut Scene, _: Timestamp| {
            participant_log.lock().unwrap().push("participant");
            false
        });

    let queue = test.server.run_queue();
    let action_log = log.clone();
    thread::spawn(move || {
        queue
            .post(move |_: &mut SceneServer| action_log.lock().unwrap().push("action"))
            .expect("server is alive");
    })
    .join()
    .unwrap();
    assert_eq!(test.server.queued_actions(), 1);

    test.tick_to(10);
    assert_eq!(*log.lock().unwrap(), vec!["action", "participant"]);
}

#[test]
fn actions_posted_while_draining_wait_a_tick() {
    let mut test = TestScene::new();
    let log: Arc<Mutex<Vec<Timestamp>>> = Arc::default();

    let outer = log.clone();
    test.server
        .run_queue()
        .post(move |server: &mut SceneServer| {
            outer.lock().unwrap().push(server.timestamp());
            let inner = outer.clone();
            server
                .run_queue()
                .post(move |server: &mut SceneServer| {
                    inner.lock().unwrap().push(server.timestamp());
                })
                .expect("server is alive");
        })
        .expect("server is alive");

    test.tick_to(10);
    assert_eq!(*log.lock().unwrap(), vec![10]);
    test.tick_to(20);
    assert_eq!(*log.lock().unwrap(), vec![10, 20]);
}

#[test]
fn panicking_participant_is_dropped_without_stopping_the_tick() {
    let mut test = TestScene::new();
    let log: Rc<RefCell<Vec<Timestamp>>> = Rc::default();

    test.server.add_tick_participant(|_: &mut Scene, _: Timestamp| -> bool {
        panic!("participant failure")
    });
    let survivor = log.clone();
    test.server
        .add_tick_participant(move |_: &mut Scene, timestamp: Timestamp| {
            survivor.borrow_mut().push(timestamp);
            true
        });

    assert_eq!(test.tick_to(10), TickOutcome::Ticked { timestamp: 10 });
    test.tick_to(20);

    assert_eq!(*log.borrow(), vec![10, 20]);
    assert_eq!(test.server.participant_count(), 1);
}

#[test]
fn panicking_action_does_not_stop_the_tick() {
    let mut test = TestScene::new();
    let client = test.add_observer_client();
    test.server
        .run_queue()
        .post(|_: &mut SceneServer| panic!("action failure"))
        .expect("server is alive");

    let delta = test.tick_and_delta(&client, 10);
    assert_eq!(delta.timestamp, 10);
}

const FAULTY: &str = "faulty";

#[derive(Default)]
struct FaultLog {
    ticks: Vec<Timestamp>,
    requests: Vec<String>,
    removed: Vec<ActorId>,
}

/// Panics on every tick but otherwise behaves
struct FaultyLogic {
    log: Rc<RefCell<FaultLog>>,
}

impl Logic for FaultyLogic {
    fn type_names(&self) -> &'static [&'static str] {
        &["faulty", "actor"]
    }

    fn ticks(&self) -> bool {
        true
    }

    fn tick(&mut self, _scene: &mut Scene, _id: ActorId, timestamp: Timestamp) {
        self.log.borrow_mut().ticks.push(timestamp);
        panic!("logic failure")
    }

    fn request(
        &mut self,
        _scene: &mut Scene,
        _id: ActorId,
        _timestamp: Timestamp,
        _source: ActorId,
        name: &str,
    ) {
        self.log.borrow_mut().requests.push(name.to_string());
    }

    fn was_removed(&mut self, _scene: &mut Scene, id: ActorId) {
        self.log.borrow_mut().removed.push(id);
    }
}

#[test]
fn panicking_logic_stays_attached_to_its_actor() {
    let library = config_library().with_actor(
        FAULTY,
        ActorConfig::new(FAULTY, Shape::centered_rectangle(1.0, 1.0)),
    );
    let mut test = TestScene::with_library(SceneConfig::default(), library);
    let log: Rc<RefCell<FaultLog>> = Rc::default();
    let faulty_log = log.clone();
    test.scene_mut().logic_factory_mut().register(FAULTY, move |_| {
        Box::new(FaultyLogic {
            log: faulty_log.clone(),
        })
    });
    let participants = test.server.participant_count();
    let faulty = test.spawn(FAULTY, 0.0, 0.0);

    assert_eq!(test.tick_to(10), TickOutcome::Ticked { timestamp: 10 });
    test.tick_to(20);

    // the actor's tick participant is dropped, the actor and its logic are not
    assert_eq!(log.borrow().ticks, vec![10]);
    assert_eq!(test.server.participant_count(), participants);
    assert!(test.scene().registry().contains(faulty));

    assert!(test.scene_mut().request(faulty, faulty, "ping"));
    assert_eq!(log.borrow().requests, vec!["ping".to_string()]);

    assert!(test.scene_mut().remove_actor(faulty));
    assert_eq!(log.borrow().removed, vec![faulty]);
}

#[test]
fn empty_scene_suspends_after_idle_period() {
    let mut test = TestScene::new();
    assert_eq!(test.tick_by(50), TickOutcome::Ticked { timestamp: 50 });

    test.wait(5_000);
    assert_eq!(test.server.tick(test.now()), TickOutcome::Suspended);
    assert!(test.server.is_suspended());
    test.wait(60_000);
    assert_eq!(test.server.tick(test.now()), TickOutcome::Suspended);

    test.add_observer_client();
    assert_eq!(test.tick_by(20), TickOutcome::Ticked { timestamp: 70 });
    assert!(test.server.is_running());
}

#[test]
fn occupied_scene_never_suspends() {
    let mut test = TestScene::new();
    test.add_observer_client();

    test.wait(10_000);
    assert_eq!(test.server.tick(test.now()), TickOutcome::Ticked { timestamp: 10_000 });
}

#[test]
fn stop_removes_every_actor_and_refuses_spawns() {
    let mut test = TestScene::new();
    let (observer, log) = RecordingObserver::new();
    test.scene_mut().add_actor_observer(Box::new(observer));
    let crate_id = test.spawn(BOX, 0.0, 0.0);
    let wall = test.spawn(WALL, 5.0, 0.0);
    test.add_observer_client();
    test.tick_to(10);

    let now = test.now();
    test.server.stop(now);

    assert_eq!(log.borrow().removed, vec![crate_id, wall]);
    assert_eq!(test.scene().actor_count(), 0);
    assert_eq!(test.server.client_count(), 0);
    assert!(test
        .scene_mut()
        .spawn_actor(&ConfigRef::from(BOX), Vec2::ZERO, 0.0)
        .is_none());
    assert_eq!(test.tick_by(10), TickOutcome::Stopped);
}

#[test]
fn timing_metrics_follow_the_tick_interval() {
    let mut test = TestScene::new();
    test.add_observer_client();
    test.tick_by(50);

    assert_eq!(test.server.actual_interval(), 50);
    assert_eq!(test.server.ticks_per_second(), 20);
    assert_eq!(test.server.buffer_delay(), 100);
    assert_eq!(test.server.next_timestamp(), 100);
}
