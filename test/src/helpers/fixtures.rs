use strand_server::{
    shared::{Shape, Vec2},
    ActorConfig, BasicLogic, ConfigLibrary, EffectConfig, PawnLogic, StaticLogic,
};

/// A movable crate, tagged "crate"
pub const BOX: &str = "box";
/// A static 2x2 obstacle
pub const WALL: &str = "wall";
/// A client-controlled pawn moving 10 units per second
pub const PAWN: &str = "pawn";
/// A default entrance, also tagged "north"
pub const ENTRANCE: &str = "entrance";
/// An actor that moves aside when spawned inside something it collides with
pub const NUDGED: &str = "nudged";
/// An effect with a 500ms lifespan
pub const SPARK: &str = "spark";

pub const SOLID: u32 = 1 << 0;
pub const PLAYER: u32 = 1 << 1;

pub fn config_library() -> ConfigLibrary {
    ConfigLibrary::new()
        .with_actor(
            BOX,
            ActorConfig::new(BasicLogic::CLASS, Shape::centered_rectangle(1.0, 1.0))
                .with_tag("crate")
                .with_collision(SOLID, SOLID),
        )
        .with_actor(
            WALL,
            ActorConfig::new(StaticLogic::CLASS, Shape::centered_rectangle(2.0, 2.0))
                .with_collision(SOLID, 0),
        )
        .with_actor(
            PAWN,
            ActorConfig::new(PawnLogic::CLASS, Shape::centered_rectangle(1.0, 1.0))
                .with_collision(PLAYER, SOLID)
                .with_speed(10.0),
        )
        .with_actor(
            ENTRANCE,
            ActorConfig::new(StaticLogic::CLASS, Shape::Point(Vec2::ZERO))
                .with_tag("north")
                .with_default_entrance(),
        )
        .with_actor(
            NUDGED,
            ActorConfig::new(BasicLogic::CLASS, Shape::centered_rectangle(1.0, 1.0))
                .with_collision(SOLID, SOLID)
                .with_spawn_adjustment(),
        )
        .with_effect(
            SPARK,
            EffectConfig::new(
                Shape::Circle {
                    center: Vec2::ZERO,
                    radius: 1.0,
                },
                500,
            ),
        )
}
