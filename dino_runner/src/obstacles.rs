//! Obstacle spawning, scrolling and eviction.
//!
//! Spawns are paced by distance travelled, not time: every tick adds the
//! current speed to a counter and an obstacle appears once the counter
//! reaches a randomised gap.  Obstacles spawn at the right edge and scroll
//! left at the shared speed, so the deque is always ordered left-to-right
//! and expired obstacles leave from the front.

use std::collections::VecDeque;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LayoutConfig;
use crate::rect::Rect;

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

const SMALL_CACTUS_SIZE:  (f32, f32) = (17.0, 35.0);
const SMALL_CACTUS_VARIANTS: usize = 6;
/// Two narrow variants and one wide cluster.
const LARGE_CACTUS_SIZES: [(f32, f32); 3] = [(25.0, 50.0), (25.0, 50.0), (49.0, 50.0)];
const BIRD_SIZE:          (f32, f32) = (46.0, 40.0);

/// Bird top edges; the first is low enough that it has to be jumped.
const BIRD_HEIGHTS: [f32; 3] = [270.0, 220.0, 160.0];
/// Below this score the lowest bird height is replaced by the next one up.
const LOW_BIRD_MIN_SCORE: u32 = 700;
const BIRD_CHANCE: f64 = 0.25;

const FIRST_SPAWN: (u32, u32) = (800, 1200);
const GAP_PER_SPEED: f32 = 75.0;

const ANIM_STEP: u32 = 5;
const HITBOX_SHRINK: f32 = 15.0;

// ════════════════════════════════════════════════════════════════════════════
// Difficulty
// ════════════════════════════════════════════════════════════════════════════

/// Score bands that widen the obstacle pool and tighten the gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    /// Small cacti only.
    Easy,
    /// Small and large cacti.
    Medium,
    /// Cacti plus the occasional bird.
    Hard,
}

impl Difficulty {
    pub fn for_score(score: u32) -> Self {
        match score {
            0..=149   => Difficulty::Easy,
            150..=449 => Difficulty::Medium,
            _         => Difficulty::Hard,
        }
    }

    /// Random extra gap added on top of the speed-proportional base.
    fn gap_variance(self) -> (u32, u32) {
        match self {
            Difficulty::Easy   => (400, 900),
            Difficulty::Medium => (250, 600),
            Difficulty::Hard   => (150, 400),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Obstacle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    SmallCactus,
    LargeCactus,
    Bird,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub kind:    ObstacleKind,
    /// Which sprite of the kind; selects the drawn shape.
    pub variant: usize,
    pub rect:    Rect,
    step:        u32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, variant: usize, x: f32, y: f32) -> Self {
        let (w, h) = match kind {
            ObstacleKind::SmallCactus => SMALL_CACTUS_SIZE,
            ObstacleKind::LargeCactus => LARGE_CACTUS_SIZES[variant % LARGE_CACTUS_SIZES.len()],
            ObstacleKind::Bird        => BIRD_SIZE,
        };
        Obstacle { kind, variant, rect: Rect::new(x, y, w, h), step: 0 }
    }

    fn advance(&mut self, speed: f32) {
        self.rect.x -= speed;
        if self.kind == ObstacleKind::Bird {
            self.step = (self.step + 1) % (2 * ANIM_STEP);
        }
    }

    /// Wing position for birds (0 or 1); cacti are always 0.
    pub fn anim_frame(&self) -> usize { (self.step / ANIM_STEP) as usize }

    pub fn hitbox(&self) -> Rect { self.rect.inflate(-HITBOX_SHRINK, -HITBOX_SHRINK) }
}

// ════════════════════════════════════════════════════════════════════════════
// ObstacleField
// ════════════════════════════════════════════════════════════════════════════

pub struct ObstacleField {
    active:     VecDeque<Obstacle>,
    travelled:  f32,
    next_spawn: f32,
    spawned:    u64,
    rng:        StdRng,
    layout:     LayoutConfig,
}

impl ObstacleField {
    pub fn new(layout: LayoutConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let next_spawn = rng.gen_range(FIRST_SPAWN.0..=FIRST_SPAWN.1) as f32;
        ObstacleField {
            active: VecDeque::new(),
            travelled: 0.0,
            next_spawn,
            spawned: 0,
            rng,
            layout,
        }
    }

    /// Empty the field and start counting towards a fresh first spawn.
    pub fn reset(&mut self) {
        self.active.clear();
        self.travelled = 0.0;
        self.next_spawn = self.rng.gen_range(FIRST_SPAWN.0..=FIRST_SPAWN.1) as f32;
    }

    /// One tick: evict, scroll, then maybe spawn.  Returns whether an
    /// obstacle was spawned.
    pub fn update(&mut self, speed: f32, score: u32) -> bool {
        while self.active.front().is_some_and(|o| o.rect.right() < self.layout.despawn_right) {
            self.active.pop_front();
        }
        for o in self.active.iter_mut() {
            o.advance(speed);
        }

        self.travelled += speed;
        if self.travelled < self.next_spawn {
            return false;
        }
        self.spawn(score);
        self.travelled = 0.0;
        self.next_spawn = self.next_gap(speed, score);
        true
    }

    fn next_gap(&mut self, speed: f32, score: u32) -> f32 {
        let (lo, hi) = Difficulty::for_score(score).gap_variance();
        speed * GAP_PER_SPEED + self.rng.gen_range(lo..=hi) as f32
    }

    fn spawn(&mut self, score: u32) {
        let obstacle = match Difficulty::for_score(score) {
            Difficulty::Easy => self.small_cactus(),
            Difficulty::Medium => self.cactus(),
            Difficulty::Hard if self.rng.gen_bool(BIRD_CHANCE) => self.bird(score),
            Difficulty::Hard => self.cactus(),
        };
        debug!("[obstacles] spawned {:?} at score {}", obstacle.kind, score);
        self.spawned += 1;
        self.active.push_back(obstacle);
    }

    fn cactus(&mut self) -> Obstacle {
        if self.rng.gen_bool(0.5) { self.small_cactus() } else { self.large_cactus() }
    }

    fn small_cactus(&mut self) -> Obstacle {
        let variant = self.rng.gen_range(0..SMALL_CACTUS_VARIANTS);
        let y = self.layout.ground_y - SMALL_CACTUS_SIZE.1 + self.layout.sprite_offset;
        Obstacle::new(ObstacleKind::SmallCactus, variant, self.layout.spawn_x, y)
    }

    fn large_cactus(&mut self) -> Obstacle {
        let variant = self.rng.gen_range(0..LARGE_CACTUS_SIZES.len());
        let (_, h) = LARGE_CACTUS_SIZES[variant];
        let y = self.layout.ground_y - h + self.layout.sprite_offset + self.layout.tall_obstacle_offset;
        Obstacle::new(ObstacleKind::LargeCactus, variant, self.layout.spawn_x, y)
    }

    fn bird(&mut self, score: u32) -> Obstacle {
        let mut y = BIRD_HEIGHTS[self.rng.gen_range(0..BIRD_HEIGHTS.len())];
        if score < LOW_BIRD_MIN_SCORE && y == BIRD_HEIGHTS[0] {
            y = BIRD_HEIGHTS[1];
        }
        Obstacle::new(ObstacleKind::Bird, 0, self.layout.spawn_x, y)
    }

    /// Add an obstacle at the back of the queue.
    pub fn push(&mut self, obstacle: Obstacle) {
        self.active.push_back(obstacle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> { self.active.iter() }

    pub fn len(&self) -> usize { self.active.len() }

    pub fn is_empty(&self) -> bool { self.active.is_empty() }

    /// Distance covered since the last spawn.
    pub fn travelled(&self) -> f32 { self.travelled }

    /// Distance at which the next obstacle will spawn.
    pub fn next_spawn(&self) -> f32 { self.next_spawn }

    /// Total spawns since construction.
    pub fn spawned(&self) -> u64 { self.spawned }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
