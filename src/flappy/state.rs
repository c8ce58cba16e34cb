//! Flap-and-avoid state types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::collision::{Bounded, Rect};
use crate::sim::state::CollectibleKind;
use crate::tuning::FlappyTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlappyPhase {
    /// Bird hovers until the first flap
    #[default]
    NotStarted,
    Running,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: f32,
}

impl Bird {
    pub fn new(tuning: &FlappyTuning) -> Self {
        Self {
            pos: Vec2::new(tuning.bird_x, tuning.field_height / 2.0),
            size: Vec2::splat(tuning.bird_size),
            velocity: 0.0,
        }
    }
}

impl Bounded for Bird {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// A pipe pair with a gap between the top and bottom segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    pub x: f32,
    pub width: f32,
    pub top_height: f32,
    pub bottom_height: f32,
    /// Set once the bird has cleared this pipe
    pub passed: bool,
}

impl Pipe {
    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.top_height)
    }

    pub fn bottom_rect(&self, field_height: f32) -> Rect {
        Rect::new(
            self.x,
            field_height - self.bottom_height,
            self.width,
            self.bottom_height,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl Bounded for Pickup {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Complete flap-game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlappyState {
    pub tuning: FlappyTuning,
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub pickups: Vec<Pickup>,
    pub score: u32,
    pub frame_count: u64,
    pub phase: FlappyPhase,
    next_id: u32,
}

impl FlappyState {
    pub fn new(tuning: FlappyTuning) -> Self {
        Self {
            bird: Bird::new(&tuning),
            pipes: Vec::new(),
            pickups: Vec::new(),
            score: 0,
            frame_count: 0,
            phase: FlappyPhase::NotStarted,
            next_id: 1,
            tuning,
        }
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }
}

impl Default for FlappyState {
    fn default() -> Self {
        Self::new(FlappyTuning::default())
    }
}
