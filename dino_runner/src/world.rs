//! The game world: avatar, obstacles and run state, advanced one fixed tick
//! at a time against any [`GestureInput`].

use log::info;
use pose_gesture::GestureInput;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::avatar::Avatar;
use crate::config::{DayNightConfig, GameConfig, ScoreConfig, SpeedConfig};
use crate::obstacles::ObstacleField;

/// Width of one ground tile; the ground scroll wraps at this.
pub const GROUND_TILE_W: f32 = 2400.0;

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Day,
    Night,
}

impl Palette {
    pub fn background(self) -> u32 {
        match self {
            Palette::Day   => 0xFFFFFFFF,
            Palette::Night => 0xFF202020,
        }
    }

    pub fn foreground(self) -> u32 {
        match self {
            Palette::Day   => 0xFF202020,
            Palette::Night => 0xFFFFFFFF,
        }
    }

    fn toggled(self) -> Self {
        match self {
            Palette::Day   => Palette::Night,
            Palette::Night => Palette::Day,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RunState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunState {
    pub score:               f32,
    pub speed:               f32,
    pub palette:             Palette,
    pub game_over:           bool,
    /// Score at which the palette flips next.
    pub next_palette_switch: f32,
}

/// What happened during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Collided this tick; the run is over.
    Crashed,
    /// A hand raise started a new run.
    Restarted,
    /// Game over, waiting for a restart.
    Idle,
}

// ════════════════════════════════════════════════════════════════════════════
// World
// ════════════════════════════════════════════════════════════════════════════

pub struct World {
    avatar:        Avatar,
    obstacles:     ObstacleField,
    run:           RunState,
    ground_offset: f32,
    runs:          u32,
    rng:           StdRng,
    config:        GameConfig,
}

impl World {
    /// A fresh run.  Without `config.seed` the RNG is seeded from entropy.
    pub fn new(config: &GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let obstacles = ObstacleField::new(config.layout, rng.gen());
        let run = fresh_run(&config.speed, &config.day_night, &mut rng);
        World {
            avatar: Avatar::new(config.physics, config.layout),
            obstacles,
            run,
            ground_offset: 0.0,
            runs: 1,
            rng,
            config: config.clone(),
        }
    }

    /// Advance one fixed tick.
    pub fn tick(&mut self, input: &impl GestureInput) -> TickOutcome {
        input.set_awaiting_reset(self.run.game_over);

        if self.run.game_over {
            if input.poll_hand_raise_just_detected() {
                info!("[world] hand raised, restarting");
                self.reset(input);
                return TickOutcome::Restarted;
            }
            return TickOutcome::Idle;
        }

        let SpeedConfig { start, max, acceleration } = self.config.speed;
        if self.run.speed < max {
            self.run.speed = (self.run.speed + acceleration).min(max);
        }

        self.avatar.update(input);
        self.obstacles.update(self.run.speed, self.run.score as u32);

        let ScoreConfig { per_tick } = self.config.score;
        self.run.score += per_tick * self.run.speed / start;

        self.ground_offset -= self.run.speed;
        if self.ground_offset <= -GROUND_TILE_W {
            self.ground_offset += GROUND_TILE_W;
        }

        if self.run.score >= self.run.next_palette_switch {
            self.run.palette = self.run.palette.toggled();
            self.run.next_palette_switch = self.run.score + palette_distance(&self.config.day_night, &mut self.rng);
        }

        let hitbox = self.avatar.hitbox();
        if self.obstacles.iter().any(|o| hitbox.intersects(&o.hitbox())) {
            self.run.game_over = true;
            info!(
                "[world] run {} over: {} points at speed {:.2}",
                self.runs, self.run.score as u32, self.run.speed
            );
            return TickOutcome::Crashed;
        }
        TickOutcome::Running
    }

    /// Start a new run and clear the input's gesture state.
    pub fn reset(&mut self, input: &impl GestureInput) {
        self.avatar = Avatar::new(self.config.physics, self.config.layout);
        self.obstacles.reset();
        self.run = fresh_run(&self.config.speed, &self.config.day_night, &mut self.rng);
        self.ground_offset = 0.0;
        self.runs += 1;
        input.reset();
        info!("[world] run {} started", self.runs);
    }

    pub fn avatar(&self)        -> &Avatar        { &self.avatar }
    pub fn obstacles(&self)     -> &ObstacleField { &self.obstacles }
    pub fn run(&self)           -> &RunState      { &self.run }
    pub fn is_game_over(&self)  -> bool           { self.run.game_over }
    pub fn ground_offset(&self) -> f32            { self.ground_offset }
    pub fn config(&self)        -> &GameConfig    { &self.config }

    #[cfg(test)]
    pub(crate) fn obstacles_mut(&mut self) -> &mut ObstacleField { &mut self.obstacles }
}

fn fresh_run(speed: &SpeedConfig, day_night: &DayNightConfig, rng: &mut StdRng) -> RunState {
    RunState {
        score:               0.0,
        speed:               speed.start,
        palette:             Palette::Day,
        game_over:           false,
        next_palette_switch: palette_distance(day_night, rng),
    }
}

fn palette_distance(day_night: &DayNightConfig, rng: &mut StdRng) -> f32 {
    rng.gen_range(day_night.min_distance..=day_night.max_distance) as f32
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::AvatarMode;
    use crate::obstacles::{Obstacle, ObstacleKind};
    use crate::testing::FakeInput;

    fn world() -> World {
        World::new(&GameConfig { seed: Some(11), ..GameConfig::default() })
    }

    /// Drop a small cactus right on top of the avatar.
    fn block_avatar(w: &mut World) {
        let r = w.avatar().rect();
        w.obstacles_mut().push(Obstacle::new(ObstacleKind::SmallCactus, 0, r.x + 20.0, r.y + 10.0));
    }

    #[test]
    fn starts_at_zero_and_start_speed() {
        let w = world();
        assert_eq!(w.run().score, 0.0);
        assert_eq!(w.run().speed, 6.0);
        assert_eq!(w.run().palette, Palette::Day);
        assert!(!w.is_game_over());
        assert!((400.0..=600.0).contains(&w.run().next_palette_switch));
    }

    #[test]
    fn idle_player_runs_and_scores_every_tick() {
        let mut w = world();
        let input = FakeInput::default();
        for n in 1..=200 {
            let before = w.run().score;
            assert_eq!(w.tick(&input), TickOutcome::Running);
            let run = w.run();
            assert!(run.score > before);
            let expected = 0.15 * run.speed / 6.0;
            assert!((run.score - before - expected).abs() < 1e-4);
            assert!((run.speed - (6.0 + 0.001 * n as f32)).abs() < 1e-3);
            assert!(w.avatar().is_grounded());
            assert_eq!(w.avatar().mode(), AvatarMode::Running);
        }
        assert!(!input.awaiting.get());
        assert_eq!(input.jump_polls.get(), 200);
    }

    #[test]
    fn speed_is_capped() {
        let mut w = World::new(&GameConfig {
            seed: Some(1),
            speed: SpeedConfig { start: 6.0, max: 6.05, acceleration: 0.01 },
            ..GameConfig::default()
        });
        let input = FakeInput::default();
        for _ in 0..20 {
            w.tick(&input);
        }
        assert_eq!(w.run().speed, 6.05);
    }

    #[test]
    fn collision_ends_the_run() {
        let mut w = world();
        let input = FakeInput::default();
        block_avatar(&mut w);
        assert_eq!(w.tick(&input), TickOutcome::Crashed);
        assert!(w.is_game_over());

        let score = w.run().score;
        assert_eq!(w.tick(&input), TickOutcome::Idle);
        assert!(input.awaiting.get());
        assert_eq!(w.run().score, score);
    }

    #[test]
    fn jump_edge_is_ignored_after_game_over() {
        let mut w = world();
        let input = FakeInput::default();
        block_avatar(&mut w);
        w.tick(&input);
        let polls = input.jump_polls.get();
        input.press_jump();
        w.tick(&input);
        assert_eq!(input.jump_polls.get(), polls);
        assert!(w.is_game_over());
    }

    #[test]
    fn hand_raise_restarts_only_when_game_over() {
        let mut w = world();
        let input = FakeInput::default();

        input.raise_hand();
        assert_eq!(w.tick(&input), TickOutcome::Running);
        assert!(input.hand_edge.get(), "not consumed while running");
        input.hand_edge.set(false);

        block_avatar(&mut w);
        w.tick(&input);
        input.raise_hand();
        assert_eq!(w.tick(&input), TickOutcome::Restarted);
        assert!(!w.is_game_over());
        assert_eq!(w.run().score, 0.0);
        assert_eq!(w.run().speed, 6.0);
        assert!(w.obstacles().is_empty());
        assert_eq!(input.resets.get(), 1);

        assert_eq!(w.tick(&input), TickOutcome::Running);
        assert!(!input.awaiting.get());
    }

    #[test]
    fn keyboard_reset_restores_a_fresh_run() {
        let mut w = world();
        let input = FakeInput::default();
        for _ in 0..50 { w.tick(&input); }
        w.reset(&input);
        assert_eq!(w.run().score, 0.0);
        assert_eq!(w.ground_offset(), 0.0);
        assert_eq!(input.resets.get(), 1);
    }

    #[test]
    fn jumping_clears_a_cactus() {
        let mut w = world();
        let input = FakeInput::default();
        let r = w.avatar().rect();
        // reaches the avatar after ~20 ticks, mid-jump
        w.obstacles_mut().push(Obstacle::new(ObstacleKind::SmallCactus, 0, r.right() + 120.0, 360.0));
        input.press_jump();
        for _ in 0..60 {
            assert_ne!(w.tick(&input), TickOutcome::Crashed);
        }
    }

    #[test]
    fn standing_still_hits_a_cactus() {
        let mut w = world();
        let input = FakeInput::default();
        let r = w.avatar().rect();
        w.obstacles_mut().push(Obstacle::new(ObstacleKind::SmallCactus, 0, r.right() + 120.0, 360.0));
        let crashed = (0..60).any(|_| w.tick(&input) == TickOutcome::Crashed);
        assert!(crashed);
    }

    #[test]
    fn palette_flips_at_the_switch_score() {
        let mut w = World::new(&GameConfig {
            seed: Some(3),
            day_night: DayNightConfig { min_distance: 1, max_distance: 1 },
            ..GameConfig::default()
        });
        let input = FakeInput::default();
        // 0.15 points per tick at start speed
        let mut flips = 0;
        let mut last = w.run().palette;
        for _ in 0..30 {
            w.tick(&input);
            if w.run().palette != last {
                flips += 1;
                last = w.run().palette;
            }
        }
        assert_eq!(flips, 4);
    }

    #[test]
    fn ground_scroll_wraps() {
        let mut w = world();
        let input = FakeInput::default();
        for _ in 0..500 {
            w.tick(&input);
            assert!(w.ground_offset() > -GROUND_TILE_W && w.ground_offset() <= 0.0);
        }
    }

    #[test]
    fn same_seed_same_run() {
        let play = || {
            let mut w = world();
            let input = FakeInput::default();
            let mut spawns = Vec::new();
            for _ in 0..3000 {
                w.tick(&input);
                spawns.push(w.obstacles().spawned());
            }
            (spawns, w.run().palette)
        };
        assert_eq!(play(), play());
    }
}
