//! Software-rendered game window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ ┌────────────┐                                    PTS 00042  │
//! │ │  camera    │                                               │
//! │ │  preview   │                                               │
//! │ └────────────┘                                               │
//! │                                                              │
//! │   ▟█▙                         ▌                 ▚▞           │
//! │ ──────────────────────────────────────────────────────────── │
//! │  · .   ·      .   ·  .          ·     .                      │
//! │ key legend                                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is painted into a [`Frame`] first; the window only presents
//! it, so [`paint`] can be tested without a display.

use std::sync::mpsc::Sender;
use std::time::Duration;

use log::warn;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use pose_gesture::font::text_width;
use pose_gesture::frame::blend;
use pose_gesture::sim::{SimInput, SimKey};
use pose_gesture::{DisplayFrame, Frame};

use crate::avatar::{Avatar, AvatarMode};
use crate::config::{RunnerError, WindowConfig};
use crate::obstacles::{Obstacle, ObstacleKind};
use crate::world::{World, GROUND_TILE_W};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const PREVIEW_X:      isize = 10;
const PREVIEW_Y:      isize = 10;
const PREVIEW_W:      usize = 320;
const PREVIEW_H:      usize = 240;
const PREVIEW_BORDER: usize = 3;
const RESET_BORDER:   u32   = 0xFFFF00FF;  // magenta, matches the reset line
const PEBBLES:        usize = 60;

const SIM_KEYS: [(Key, SimKey); 5] = [
    (Key::Up,    SimKey::LeanUp),
    (Key::Space, SimKey::LeanUp),
    (Key::Down,  SimKey::Crouch),
    (Key::H,     SimKey::RaiseHand),
    (Key::P,     SimKey::StepAway),
];

const SIM_LEGEND: &str = "UP/SPACE=LEAN UP  DOWN=CROUCH  H=RAISE HAND  P=STEP AWAY  R=RESTART  Q=QUIT";
const CAM_LEGEND: &str = "LEAN UP=JUMP  CROUCH=DUCK  RAISE A HAND=RESTART  R=RESTART  Q=QUIT";

/// What the player asked for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Continue,
    Reset,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Frame,
    /// Present only in simulation mode.
    sim_tx: Option<Sender<SimInput>>,
}

impl Visualizer {
    pub fn new(cfg: &WindowConfig, sim_tx: Option<Sender<SimInput>>) -> Result<Self, RunnerError> {
        let mut window = Window::new(
            &cfg.title,
            cfg.width, cfg.height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| RunnerError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_secs(1) / cfg.fps.max(1)));

        Ok(Visualizer {
            window,
            canvas: Frame::new(cfg.width, cfg.height, 0xFFFFFFFF),
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Read the keyboard.  In simulation mode body keys are forwarded to
    /// the simulated estimator as press/release events.
    pub fn poll_input(&mut self) -> Command {
        if !self.window.is_open()
            || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            return Command::Quit;
        }

        if let Some(tx) = &self.sim_tx {
            for (key, sim) in SIM_KEYS {
                if self.window.is_key_pressed(key, KeyRepeat::No) {
                    let _ = tx.send(SimInput::KeyDown(sim));
                }
                if self.window.is_key_released(key) {
                    let _ = tx.send(SimInput::KeyUp(sim));
                }
            }
        }

        if self.window.is_key_pressed(Key::R, KeyRepeat::No) {
            Command::Reset
        } else {
            Command::Continue
        }
    }

    /// Render one frame.
    pub fn render(&mut self, world: &World, preview: Option<&DisplayFrame>) {
        let legend = if self.sim_tx.is_some() { SIM_LEGEND } else { CAM_LEGEND };
        paint(&mut self.canvas, world, preview, legend);

        let (w, h) = (self.canvas.width(), self.canvas.height());
        if let Err(e) = self.window.update_with_buffer(self.canvas.pixels(), w, h) {
            warn!("[window] {}", e);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// paint — the whole scene into a frame
// ════════════════════════════════════════════════════════════════════════════

pub fn paint(canvas: &mut Frame, world: &World, preview: Option<&DisplayFrame>, legend: &str) {
    let run = world.run();
    let bg = run.palette.background();
    let fg = run.palette.foreground();
    let width = canvas.width() as isize;
    let height = canvas.height() as isize;

    canvas.fill(bg);

    // ── Ground ────────────────────────────────────────────────────────────
    let layout = world.config().layout;
    let ground = (layout.ground_y + layout.sprite_offset) as isize;
    canvas.draw_hline(ground - 2, 2, fg);
    draw_pebbles(canvas, world.ground_offset(), ground, fg);

    // ── Actors ────────────────────────────────────────────────────────────
    for o in world.obstacles().iter() {
        draw_obstacle(canvas, o, fg);
    }
    draw_avatar(canvas, world.avatar(), fg, bg);

    // ── Camera preview ────────────────────────────────────────────────────
    let border = if run.game_over { RESET_BORDER } else { fg };
    let b = PREVIEW_BORDER as isize;
    canvas.draw_border(
        PREVIEW_X - b, PREVIEW_Y - b,
        PREVIEW_W + 2 * PREVIEW_BORDER, PREVIEW_H + 2 * PREVIEW_BORDER,
        PREVIEW_BORDER, border,
    );
    match preview {
        Some(f) => canvas.blit_scaled(&f.image, PREVIEW_X, PREVIEW_Y, PREVIEW_W, PREVIEW_H, false),
        None => {
            canvas.fill_rect(PREVIEW_X, PREVIEW_Y, PREVIEW_W, PREVIEW_H, 0xFF000000);
            canvas.draw_text("WAITING FOR CAMERA", PREVIEW_X + 20, PREVIEW_Y + 110, 2, 0xFFAAAAAA);
        }
    }

    // ── Score ─────────────────────────────────────────────────────────────
    let score = format!("PTS {:05}", run.score as u32);
    canvas.draw_text(&score, width - text_width(&score, 3) as isize - 30, 20, 3, fg);

    // ── Game over ─────────────────────────────────────────────────────────
    if run.game_over {
        let title = "GAME OVER";
        let prompt = "RAISE A HAND OR PRESS R TO RESTART";
        canvas.draw_text(title, (width - text_width(title, 6) as isize) / 2, height / 2 - 40, 6, fg);
        canvas.draw_text(prompt, (width - text_width(prompt, 3) as isize) / 2, height / 2 + 10, 3, fg);
    }

    // ── Key legend ────────────────────────────────────────────────────────
    canvas.draw_text(legend, 10, height - 20, 2, blend(bg, fg, 0.55));
}

// ── Ground ────────────────────────────────────────────────────────────────

fn draw_pebbles(canvas: &mut Frame, offset: f32, ground: isize, color: u32) {
    let tile = GROUND_TILE_W as isize;
    let offset = offset as isize;
    for i in 0..PEBBLES {
        let base = (i * 397 % tile as usize) as isize;
        let dy = 6 + (i * 7 % 14) as isize;
        let w = 2 + i % 3;
        for x in [base + offset, base + offset + tile] {
            if x + (w as isize) >= 0 && x < canvas.width() as isize {
                canvas.fill_rect(x, ground + dy, w, 2, color);
            }
        }
    }
}

// ── Avatar ────────────────────────────────────────────────────────────────

fn draw_avatar(canvas: &mut Frame, avatar: &Avatar, fg: u32, bg: u32) {
    let r = avatar.rect();
    let (x, y) = (r.x as isize, r.y as isize);
    let frame = avatar.anim_frame();

    match avatar.mode() {
        AvatarMode::Ducking => {
            canvas.fill_rect(x,      y + 8, 40, 14, fg);  // body
            canvas.fill_rect(x + 34, y,     23, 14, fg);  // head
            canvas.fill_rect(x + 40, y + 3, 3,  3,  bg);  // eye
            let (a, b) = if frame == 0 { (10, 6) } else { (6, 10) };
            canvas.fill_rect(x + 10, y + 22, 5, a, fg);
            canvas.fill_rect(x + 24, y + 22, 5, b, fg);
        }
        mode => {
            canvas.fill_rect(x + 24, y,      24, 16, fg);  // head
            canvas.fill_rect(x + 30, y + 3,  3,  3,  bg);  // eye
            canvas.fill_rect(x + 36, y + 12, 12, 2,  bg);  // mouth
            canvas.fill_rect(x + 8,  y + 16, 28, 20, fg);  // body
            canvas.fill_rect(x,      y + 14, 8,  10, fg);  // tail
            canvas.fill_rect(x + 36, y + 22, 6,  3,  fg);  // arm
            let (a, b) = match (mode, frame) {
                (AvatarMode::Jumping, _) => (14, 14),
                (_, 0)                   => (14, 8),
                _                        => (8, 14),
            };
            canvas.fill_rect(x + 12, y + 36, 6, a, fg);
            canvas.fill_rect(x + 26, y + 36, 6, b, fg);
        }
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────

fn draw_obstacle(canvas: &mut Frame, o: &Obstacle, fg: u32) {
    let r = o.rect;
    let (x, y, w, h) = (r.x as isize, r.y as isize, r.w as usize, r.h as usize);
    match o.kind {
        ObstacleKind::Bird => {
            canvas.fill_rect(x,      y + 14, 12, 6, fg);  // head + beak
            canvas.fill_rect(x + 10, y + 16, 30, 8, fg);  // body
            canvas.fill_rect(x + 38, y + 14, 8,  4, fg);  // tail
            if o.anim_frame() == 0 {
                canvas.fill_rect(x + 16, y, 10, 16, fg);
            } else {
                canvas.fill_rect(x + 16, y + 24, 10, 16, fg);
            }
        }
        ObstacleKind::SmallCactus | ObstacleKind::LargeCactus if w > 30 => {
            // wide cluster: two cacti side by side
            let half = w / 2;
            draw_cactus(canvas, x, y, half, h, o.variant, fg);
            draw_cactus(canvas, x + half as isize, y + (h / 5) as isize, w - half, h - h / 5, o.variant + 1, fg);
        }
        ObstacleKind::SmallCactus | ObstacleKind::LargeCactus => {
            draw_cactus(canvas, x, y, w, h, o.variant, fg);
        }
    }
}

fn draw_cactus(canvas: &mut Frame, x: isize, y: isize, w: usize, h: usize, variant: usize, fg: u32) {
    let trunk = (w / 3).max(3);
    let tx = x + ((w - trunk) / 2) as isize;
    canvas.fill_rect(tx, y, trunk, h, fg);

    let arm = (w - trunk) / 2;
    let left_y = y + (h / 4 + variant % 3 * 2) as isize;
    let right_y = y + (h / 3 + variant % 2 * 3) as isize;
    // arm stubs plus their upturned tips
    canvas.fill_rect(x, left_y + 6, arm, 3, fg);
    canvas.fill_rect(x, left_y, 3.min(arm), 9, fg);
    canvas.fill_rect(tx + trunk as isize, right_y + 6, arm, 3, fg);
    canvas.fill_rect(x + w as isize - 3, right_y, 3.min(arm), 9, fg);
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
