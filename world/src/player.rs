//! Player disc state owned by the authoritative world.

use grid_pursuit_core::{Health, WorldPos, WorldVec};
use grid_pursuit_system_pathfinding::ObstacleGrid;

/// Radius of the player's body disc in world units.
pub(crate) const PLAYER_RADIUS: f32 = 25.0;

/// Distance the player covers per axis and tick at full input.
pub(crate) const PLAYER_SPEED: f32 = 4.0;

/// Health points the player spawns and resets with.
pub(crate) const PLAYER_MAX_HEALTH: u32 = 100;

/// Mutable player state tracked between commands.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    /// Position the player currently occupies.
    pub(crate) position: WorldPos,
    /// Spawn position restored by scenario resets.
    pub(crate) spawn: WorldPos,
    /// Remaining health points.
    pub(crate) health: Health,
}

impl Player {
    /// Creates a freshly placed player remembering its spawn.
    pub(crate) fn place(position: WorldPos) -> Self {
        Self {
            position,
            spawn: position,
            health: Health::new(PLAYER_MAX_HEALTH),
        }
    }

    /// Whether the player still has health points left.
    pub(crate) fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Attempts the per-axis move described by the direction.
    ///
    /// Each direction component scales by [`PLAYER_SPEED`] independently, so
    /// diagonal input covers more ground than cardinal input. A single
    /// walkability check vetoes the combined destination; afterwards each
    /// axis commits only while it keeps the body disc inside the arena, so
    /// input pressed into a wall still slides along it. Returns the movement
    /// only when the position actually changed.
    pub(crate) fn attempt_move(
        &mut self,
        direction: WorldVec,
        grid: &ObstacleGrid,
    ) -> Option<(WorldPos, WorldPos)> {
        let offset = WorldVec::new(
            direction.dx() * PLAYER_SPEED,
            direction.dy() * PLAYER_SPEED,
        );
        let candidate = self.position.translated(offset);

        if !grid.is_walkable_at(candidate) {
            return None;
        }

        let mut x = self.position.x();
        let mut y = self.position.y();

        if candidate.x() >= PLAYER_RADIUS && candidate.x() <= grid.arena_width() - PLAYER_RADIUS {
            x = candidate.x();
        }

        if candidate.y() >= PLAYER_RADIUS && candidate.y() <= grid.arena_height() - PLAYER_RADIUS {
            y = candidate.y();
        }

        let from = self.position;
        let to = WorldPos::new(x, y);
        if to == from {
            return None;
        }

        self.position = to;
        Some((from, to))
    }

    /// Subtracts health points, saturating at zero, and reports the result.
    pub(crate) fn absorb_damage(&mut self, amount: u32) -> Health {
        self.health = self.health.damaged(amount);
        self.health
    }

    /// Restores the player to its spawn at full health.
    pub(crate) fn reset(&mut self) {
        self.position = self.spawn;
        self.health = Health::new(PLAYER_MAX_HEALTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid() -> ObstacleGrid {
        ObstacleGrid::new(30, 20, 40.0)
    }

    #[test]
    fn diagonal_input_moves_both_axes_at_full_speed() {
        let grid = open_grid();
        let mut player = Player::place(WorldPos::new(600.0, 400.0));

        let (from, to) = player
            .attempt_move(WorldVec::new(1.0, 1.0), &grid)
            .expect("open arena move");

        assert_eq!(from, WorldPos::new(600.0, 400.0));
        assert_eq!(to, WorldPos::new(604.0, 404.0));
    }

    #[test]
    fn blocked_destination_rejects_the_whole_move() {
        let mut grid = open_grid();
        let _ = grid.add_obstacle(WorldPos::new(620.0, 400.0));
        let mut player = Player::place(WorldPos::new(598.0, 400.0));

        assert!(player.attempt_move(WorldVec::new(1.0, 0.0), &grid).is_none());
        assert_eq!(player.position, WorldPos::new(598.0, 400.0));
    }

    #[test]
    fn bounds_clamp_lets_the_player_slide_along_the_edge() {
        let grid = open_grid();
        let mut player = Player::place(WorldPos::new(26.0, 400.0));

        let (_, to) = player
            .attempt_move(WorldVec::new(-1.0, 1.0), &grid)
            .expect("vertical component survives");

        assert_eq!(to, WorldPos::new(26.0, 404.0));
    }

    #[test]
    fn fully_clamped_move_reports_nothing() {
        let grid = open_grid();
        let mut player = Player::place(WorldPos::new(26.0, 400.0));

        assert!(player
            .attempt_move(WorldVec::new(-1.0, 0.0), &grid)
            .is_none());
    }

    #[test]
    fn reset_restores_spawn_and_health() {
        let grid = open_grid();
        let mut player = Player::place(WorldPos::new(600.0, 400.0));
        let _ = player.attempt_move(WorldVec::new(1.0, 0.0), &grid);
        let _ = player.absorb_damage(40);

        player.reset();

        assert_eq!(player.position, WorldPos::new(600.0, 400.0));
        assert_eq!(player.health.get(), PLAYER_MAX_HEALTH);
    }
}
