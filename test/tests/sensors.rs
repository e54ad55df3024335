//! Sensor triggering through the scene.
use strand_server::{
    shared::{Rect, Shape, Vec2},
    SensorKind,
};
use strand_test::{RecordingSensor, TestScene, BOX, PLAYER, SOLID};

fn square(x: f32, y: f32, size: f32) -> Shape {
    Shape::Rectangle(Rect::from_center(Vec2::new(x, y), size * 0.5, size * 0.5))
}

#[test]
fn sensor_overlapping_two_shapes_triggers_once() {
    let mut test = TestScene::new();
    let actor = test.spawn(BOX, 0.0, 0.0);
    let (sensor, log) = RecordingSensor::new(SensorKind::Intersection, SOLID);
    test.scene_mut().add_sensor(square(0.0, 0.0, 4.0), Box::new(sensor));

    let timestamp = test.timestamp();
    let triggered = test.scene_mut().trigger_sensors(
        SensorKind::Intersection,
        timestamp,
        &[square(-1.0, 0.0, 1.0), square(1.0, 0.0, 1.0)],
        SOLID,
        actor,
    );

    assert_eq!(triggered, 1);
    assert_eq!(*log.borrow(), vec![(timestamp, actor)]);
}

#[test]
fn sensor_mask_must_match_flags() {
    let mut test = TestScene::new();
    let actor = test.spawn(BOX, 0.0, 0.0);
    let (sensor, log) = RecordingSensor::new(SensorKind::Intersection, PLAYER);
    test.scene_mut().add_sensor(square(0.0, 0.0, 4.0), Box::new(sensor));

    let timestamp = test.timestamp();
    let triggered = test.scene_mut().trigger_sensors(
        SensorKind::Intersection,
        timestamp,
        &[square(0.0, 0.0, 1.0)],
        SOLID,
        actor,
    );

    assert_eq!(triggered, 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn sensor_kind_must_match() {
    let mut test = TestScene::new();
    let actor = test.spawn(BOX, 0.0, 0.0);
    let (sensor, log) = RecordingSensor::new(SensorKind::Custom("pressure"), SOLID);
    test.scene_mut().add_sensor(square(0.0, 0.0, 4.0), Box::new(sensor));

    let timestamp = test.timestamp();
    let shapes = [square(0.0, 0.0, 1.0)];
    assert_eq!(
        test.scene_mut()
            .trigger_sensors(SensorKind::Intersection, timestamp, &shapes, SOLID, actor),
        0
    );
    assert_eq!(
        test.scene_mut()
            .trigger_sensors(SensorKind::Custom("pressure"), timestamp, &shapes, SOLID, actor),
        1
    );
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn moving_into_a_sensor_triggers_it() {
    let mut test = TestScene::new();
    let actor = test.spawn(BOX, -10.0, 0.0);
    let (sensor, log) = RecordingSensor::new(SensorKind::Intersection, SOLID);
    test.scene_mut().add_sensor(square(0.0, 0.0, 2.0), Box::new(sensor));
    test.tick_to(10);

    test.scene_mut().move_actor(actor, Vec2::new(-5.0, 0.0), 0.0);
    assert!(log.borrow().is_empty());

    test.scene_mut().move_actor(actor, Vec2::new(0.5, 0.0), 0.0);
    assert_eq!(*log.borrow(), vec![(10, actor)]);
}

#[test]
fn moved_and_removed_sensors_follow_their_shapes() {
    let mut test = TestScene::new();
    let actor = test.spawn(BOX, 0.0, 0.0);
    let (sensor, log) = RecordingSensor::new(SensorKind::Intersection, SOLID);
    let key = test
        .scene_mut()
        .add_sensor(square(20.0, 0.0, 2.0), Box::new(sensor));

    assert_eq!(test.scene_mut().trigger_intersection_sensors(actor), 0);
    assert!(test.scene_mut().move_sensor(&key, square(0.0, 0.0, 2.0)));
    assert_eq!(test.scene_mut().trigger_intersection_sensors(actor), 1);

    assert!(test.scene_mut().remove_sensor(&key).is_some());
    assert_eq!(test.scene_mut().trigger_intersection_sensors(actor), 0);
    assert_eq!(log.borrow().len(), 1);
    assert!(test.scene().sensors().is_empty());
}
