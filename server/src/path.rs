use strand_shared::Vec2;

/// A route-finding service over the scene, implemented outside the server.
pub trait PathQuery {
    /// Finds a path between two points no longer than `max_length`, optionally
    /// ignoring actors as obstacles. `None` when no such path exists.
    fn find_path(
        &self,
        from: Vec2,
        to: Vec2,
        max_length: f32,
        ignore_actors: bool,
    ) -> Option<Vec<Vec2>>;
}
