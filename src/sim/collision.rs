//! Axis-aligned collision tests
//!
//! The player is a square hitbox; each pipe is two rectangles, one hanging
//! from the ceiling and one standing on the ground strip. Rotation is ignored.

use glam::Vec2;

use super::state::Pipe;
use crate::consts::*;

/// Axis-aligned rectangle (origin at top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Square of side `side` centered on `center`
    pub fn centered(center: Vec2, side: f32) -> Self {
        Self {
            min: center - Vec2::splat(side / 2.0),
            size: Vec2::splat(side),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test (touching edges do not collide)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Which surface the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Pipe { id: u32 },
    Ground,
}

impl Hit {
    /// Ground hits put the player back at the spawn point; pipe hits leave it in place
    pub fn resets_position(&self) -> bool {
        matches!(self, Hit::Ground)
    }
}

/// Player hitbox at vertical position `y`
pub fn player_rect(y: f32, hitbox: f32) -> Rect {
    Rect::centered(Vec2::new(PLAYER_X, y), hitbox)
}

/// Top segment (from the ceiling) of a pipe
pub fn pipe_top_rect(pipe: &Pipe) -> Rect {
    Rect::new(pipe.x, 0.0, PIPE_WIDTH, pipe.top_height)
}

/// Bottom segment (standing on the ground strip) of a pipe
pub fn pipe_bottom_rect(pipe: &Pipe) -> Rect {
    Rect::new(
        pipe.x,
        VIEWPORT_HEIGHT - pipe.bottom_height - GROUND_HEIGHT,
        PIPE_WIDTH,
        pipe.bottom_height,
    )
}

/// Check the player hitbox against both segments of a pipe
pub fn player_pipe_collision(player: &Rect, pipe: &Pipe) -> bool {
    player.overlaps(&pipe_top_rect(pipe)) || player.overlaps(&pipe_bottom_rect(pipe))
}

/// Whether a pipe is close enough to the player to be worth testing
#[inline]
pub fn in_collision_band(pipe_x: f32) -> bool {
    (pipe_x - PLAYER_X).abs() < COLLISION_BAND
}

/// Whether the player has breached the ceiling or the ground
#[inline]
pub fn ground_collision(y: f32) -> bool {
    y <= 0.0 || y >= GROUND_LIMIT
}

/// Whether a pickup at `pos` is within `radius` of the player center
#[inline]
pub fn within_pickup_radius(player_y: f32, pos: Vec2, radius: f32) -> bool {
    Vec2::new(PLAYER_X, player_y).distance(pos) < radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe_at(x: f32, gap_center_y: f32) -> Pipe {
        Pipe::new(1, x, gap_center_y, 3.0)
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges only
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_player_in_gap_misses() {
        let pipe = pipe_at(PLAYER_X - 20.0, 250.0);
        let player = player_rect(250.0, DEFAULT_HITBOX);
        assert!(!player_pipe_collision(&player, &pipe));
    }

    #[test]
    fn test_player_hits_top_and_bottom_segments() {
        let pipe = pipe_at(PLAYER_X - 20.0, 250.0);
        // Gap spans 175..325
        assert!(player_pipe_collision(&player_rect(170.0, DEFAULT_HITBOX), &pipe));
        assert!(player_pipe_collision(&player_rect(330.0, DEFAULT_HITBOX), &pipe));
    }

    #[test]
    fn test_smaller_hitbox_fits_tighter() {
        let pipe = pipe_at(PLAYER_X - 20.0, 250.0);
        // 12 units below the top edge: a 30 box clips it, a 20 box does not
        assert!(player_pipe_collision(&player_rect(187.0, 30.0), &pipe));
        assert!(!player_pipe_collision(&player_rect(187.0, 20.0), &pipe));
    }

    #[test]
    fn test_pipe_segments_layout() {
        let pipe = pipe_at(400.0, 250.0);
        let top = pipe_top_rect(&pipe);
        let bottom = pipe_bottom_rect(&pipe);
        assert_eq!(top.size.y, 175.0);
        assert_eq!(bottom.max().y, VIEWPORT_HEIGHT - GROUND_HEIGHT);
        assert_eq!(bottom.min.y, 325.0);
    }

    #[test]
    fn test_collision_band() {
        assert!(in_collision_band(PLAYER_X + 149.0));
        assert!(!in_collision_band(PLAYER_X + 150.0));
        assert!(in_collision_band(PLAYER_X - 100.0));
    }

    #[test]
    fn test_ground_bounds() {
        assert!(ground_collision(0.0));
        assert!(ground_collision(GROUND_LIMIT));
        assert!(!ground_collision(300.0));
    }

    #[test]
    fn test_pickup_radius() {
        assert!(within_pickup_radius(300.0, Vec2::new(PLAYER_X + 29.0, 300.0), 30.0));
        assert!(!within_pickup_radius(300.0, Vec2::new(PLAYER_X + 30.0, 300.0), 30.0));
        assert!(within_pickup_radius(300.0, Vec2::new(PLAYER_X + 30.0, 300.0), 50.0));
    }
}
