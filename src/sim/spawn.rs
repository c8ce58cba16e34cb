//! Entity factories
//!
//! The tick never calls an ambient random function. It asks an `EntitySource`
//! for new entities; production uses a seeded PCG stream, tests plug in their own.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::state::{Collectible, CollectibleKind, Obstacle, ObstacleKind};
use crate::tuning::RunnerTuning;

/// Produces new world entities for the runner tick
pub trait EntitySource {
    /// A new obstacle, scaled by the current score
    fn obstacle(&mut self, score: u32, tuning: &RunnerTuning) -> Obstacle;
    /// A new collectible
    fn collectible(&mut self, tuning: &RunnerTuning) -> Collectible;
}

/// Build a random obstacle at the spawn line.
///
/// The returned entity carries id 0; the tick assigns the real id.
pub fn generate_obstacle<R: Rng + ?Sized>(rng: &mut R, score: u32, tuning: &RunnerTuning) -> Obstacle {
    let kind = if rng.random_bool(0.5) {
        ObstacleKind::Flying
    } else {
        ObstacleKind::Ground
    };

    match kind {
        ObstacleKind::Flying => {
            let scale = tuning.flying_scale(score);
            let y = tuning
                .flight_altitudes
                .choose(rng)
                .copied()
                .unwrap_or(tuning.ground_y);
            Obstacle {
                id: 0,
                kind,
                pos: Vec2::new(tuning.spawn_x, y),
                size: Vec2::new(
                    tuning.obstacle_width * scale,
                    tuning.flying_hazard_height * scale,
                ),
            }
        }
        ObstacleKind::Ground => Obstacle {
            id: 0,
            kind,
            pos: Vec2::new(tuning.spawn_x, tuning.ground_y),
            size: Vec2::new(tuning.obstacle_width, tuning.ground_hazard_height),
        },
    }
}

/// Build a random collectible at the spawn line
pub fn generate_collectible<R: Rng + ?Sized>(rng: &mut R, tuning: &RunnerTuning) -> Collectible {
    let kind = if rng.random_bool(tuning.beneficial_chance.clamp(0.0, 1.0)) {
        CollectibleKind::Beneficial
    } else {
        CollectibleKind::Penalizing
    };
    let y = tuning
        .collectible_altitudes
        .choose(rng)
        .copied()
        .unwrap_or(tuning.ground_y);

    Collectible {
        id: 0,
        kind,
        pos: Vec2::new(tuning.spawn_x, y),
        size: Vec2::splat(tuning.collectible_size),
        collected: false,
    }
}

/// Default entity source: a seeded PCG stream, reproducible per run seed
#[derive(Debug, Clone)]
pub struct SeededSpawner {
    seed: u64,
    rng: Pcg32,
}

impl SeededSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream for a new run
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }
}

impl EntitySource for SeededSpawner {
    fn obstacle(&mut self, score: u32, tuning: &RunnerTuning) -> Obstacle {
        generate_obstacle(&mut self.rng, score, tuning)
    }

    fn collectible(&mut self, tuning: &RunnerTuning) -> Collectible {
        generate_collectible(&mut self.rng, tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacles_spawn_offscreen_with_valid_shape() {
        let tuning = RunnerTuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let obstacle = generate_obstacle(&mut rng, 0, &tuning);
            assert_eq!(obstacle.pos.x, tuning.spawn_x);
            match obstacle.kind {
                ObstacleKind::Ground => {
                    assert_eq!(obstacle.pos.y, tuning.ground_y);
                    assert_eq!(obstacle.size, Vec2::new(20.0, 40.0));
                }
                ObstacleKind::Flying => {
                    assert!(tuning.flight_altitudes.contains(&obstacle.pos.y));
                    assert_eq!(obstacle.size, Vec2::new(20.0, 20.0));
                }
            }
        }
    }

    #[test]
    fn test_both_obstacle_kinds_appear() {
        let tuning = RunnerTuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let kinds: Vec<_> = (0..100)
            .map(|_| generate_obstacle(&mut rng, 0, &tuning).kind)
            .collect();
        assert!(kinds.contains(&ObstacleKind::Ground));
        assert!(kinds.contains(&ObstacleKind::Flying));
    }

    #[test]
    fn test_flying_hazards_scale_with_score() {
        let tuning = RunnerTuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let flying = (0..100)
            .map(|_| generate_obstacle(&mut rng, 6, &tuning))
            .find(|o| o.kind == ObstacleKind::Flying)
            .expect("no flying hazard in 100 draws");
        // 1 + floor(6 / 3) * 0.5 = 2.0
        assert_eq!(flying.size, Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_collectible_mix_favors_beneficial() {
        let tuning = RunnerTuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let beneficial = (0..2000)
            .map(|_| generate_collectible(&mut rng, &tuning))
            .inspect(|c| {
                assert!(tuning.collectible_altitudes.contains(&c.pos.y));
                assert!(!c.collected);
            })
            .filter(|c| c.kind == CollectibleKind::Beneficial)
            .count();
        // 70% expected; generous band keeps the test seed-agnostic
        assert!((1200..1600).contains(&beneficial), "beneficial = {}", beneficial);
    }

    #[test]
    fn test_seeded_spawner_is_reproducible() {
        let tuning = RunnerTuning::default();
        let mut a = SeededSpawner::new(99);
        let mut b = SeededSpawner::new(99);
        for score in 0..20 {
            assert_eq!(a.obstacle(score, &tuning), b.obstacle(score, &tuning));
            assert_eq!(a.collectible(&tuning), b.collectible(&tuning));
        }
    }
}
