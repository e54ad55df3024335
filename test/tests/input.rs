//! Client input: frame admission, ping measurement and pawn control.
use strand_server::{
    shared::{Actor, InputFrame, InputSubmission},
    SceneServerError,
};
use strand_test::{TestScene, BOX, PAWN};

fn moving_east(timestamp: i64) -> InputFrame {
    InputFrame::new(timestamp, 0.0, 0.0, InputFrame::MOVE)
}

#[test]
fn stale_and_future_frames_never_reach_the_pawn() {
    let mut test = TestScene::new();
    let client = test.add_player_client(PAWN);
    let pawn = test.liaison(&client).pawn().expect("pawn spawned");
    test.tick_to(100);

    let now = test.now();
    test.server.enqueue_input(
        &client,
        InputSubmission::new(0, 100, vec![moving_east(90), moving_east(100)]),
        now,
    );
    assert_eq!(test.liaison(&client).last_input(), 100);
    assert_eq!(test.scene().actor_logic(pawn).map(|logic| logic.queued_input()), Some(2));

    test.server.enqueue_input(
        &client,
        InputSubmission::new(0, 100, vec![moving_east(100), moving_east(95), moving_east(150)]),
        now,
    );
    assert_eq!(test.liaison(&client).last_input(), 100);
    assert_eq!(test.scene().actor_logic(pawn).map(|logic| logic.queued_input()), Some(2));
}

#[test]
fn ping_measures_scene_clock_at_receipt() {
    let mut test = TestScene::new();
    let client = test.add_observer_client();
    test.tick_to(100);
    test.wait(20);

    let now = test.now();
    test.server
        .enqueue_input(&client, InputSubmission::new(100, 90, Vec::new()), now);

    assert_eq!(test.liaison(&client).ping(), 30);
    let delta = test.tick_and_delta(&client, 30);
    assert_eq!(delta.ping, 30);
}

#[test]
fn acknowledged_input_is_echoed_in_deltas() {
    let mut test = TestScene::new();
    let client = test.add_player_client(PAWN);
    test.tick_to(50);

    let now = test.now();
    test.server
        .enqueue_input(&client, InputSubmission::new(0, 50, vec![moving_east(50)]), now);
    let delta = test.tick_and_delta(&client, 50);

    assert_eq!(delta.ack_through_input, 50);
}

#[test]
fn pawn_moves_along_its_input() {
    let mut test = TestScene::new();
    let client = test.add_player_client(PAWN);
    let pawn = test.liaison(&client).pawn().expect("pawn spawned");
    test.tick_to(100);

    let now = test.now();
    test.server
        .enqueue_input(&client, InputSubmission::new(0, 100, vec![moving_east(100)]), now);
    test.tick_to(200);

    let actor = test.scene().actor(pawn).expect("pawn alive");
    assert!((actor.translation().x - 1.0).abs() < 1e-4);
    assert!(actor.translation().y.abs() < 1e-4);
    assert!(actor.is_set(Actor::MOVING));

    let now = test.now();
    test.server.enqueue_input(
        &client,
        InputSubmission::new(0, 200, vec![InputFrame::new(200, 0.0, 0.0, 0)]),
        now,
    );
    test.tick_to(300);
    let actor = test.scene().actor(pawn).expect("pawn alive");
    assert!((actor.translation().x - 1.0).abs() < 1e-4);
    assert!(!actor.is_set(Actor::MOVING));
}

#[test]
fn observer_input_is_dropped() {
    let mut test = TestScene::new();
    let client = test.add_observer_client();
    test.tick_to(100);

    let now = test.now();
    test.server
        .enqueue_input(&client, InputSubmission::new(0, 100, vec![moving_east(100)]), now);

    assert_eq!(test.liaison(&client).last_input(), 0);
}

#[test]
fn following_another_pawn_stops_input() {
    let mut test = TestScene::new();
    let first = test.add_player_client(PAWN);
    let second = test.add_player_client(PAWN);
    let other = test.liaison(&second).pawn().expect("pawn spawned");
    test.tick_to(100);

    test.server.set_target(&first, other).expect("pawns are targetable");
    assert!(!test.liaison(&first).controls_target());

    let now = test.now();
    test.server
        .enqueue_input(&first, InputSubmission::new(0, 100, vec![moving_east(100)]), now);
    assert_eq!(test.liaison(&first).last_input(), 0);
}

#[test]
fn only_pawns_can_be_targeted() {
    let mut test = TestScene::new();
    let client = test.add_observer_client();
    let crate_id = test.spawn(BOX, 0.0, 0.0);

    assert_eq!(
        test.server.set_target(&client, crate_id),
        Err(SceneServerError::NotAPawn { id: crate_id })
    );
    assert_eq!(
        test.server.set_target(&client, 999),
        Err(SceneServerError::UnknownActor { id: 999 })
    );
}

#[test]
fn leaving_destroys_the_pawn() {
    let mut test = TestScene::new();
    let client = test.add_player_client(PAWN);
    let pawn = test.liaison(&client).pawn().expect("pawn spawned");
    test.tick_to(50);

    let now = test.now();
    assert!(test.server.remove_client(&client, now).is_some());
    assert!(test.scene().actor(pawn).map(Actor::is_destroyed).unwrap_or(false));

    test.tick_to(100);
    assert!(test.scene().actor(pawn).is_none());
}

#[test]
fn input_from_unknown_client_is_ignored() {
    let mut test = TestScene::new();
    let client = test.add_observer_client();
    let now = test.now();
    test.server.remove_client(&client, now);

    test.server
        .enqueue_input(&client, InputSubmission::new(0, 0, vec![moving_east(0)]), now);
    assert!(test.server.client(&client).is_none());
}
