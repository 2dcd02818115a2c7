//! The player's runner: a three-state machine on top of Euler physics.
//!
//! ```text
//!            jump edge (grounded)                 lands
//!  Running ─────────────────────────► Jumping ──────────► Running
//!     ▲ │                                │
//!     │ │ duck held                      │ duck held (double gravity)
//!     │ ▼                                ▼
//!  Ducking ◄──────────────────────────────
//! ```

use pose_gesture::GestureInput;

use crate::config::{LayoutConfig, PhysicsConfig};
use crate::rect::Rect;

pub const RUN_SIZE:  (f32, f32) = (48.0, 50.0);
pub const DUCK_SIZE: (f32, f32) = (57.0, 32.0);

/// Ticks per animation frame for the two-frame run/duck cycles.
const ANIM_STEP: u32 = 5;
/// Hitbox shrink, total over both sides.
const HITBOX_SHRINK: (f32, f32) = (20.0, 15.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarMode {
    Running,
    Jumping,
    Ducking,
}

#[derive(Clone, Debug)]
pub struct Avatar {
    x:        f32,
    /// Top edge of the sprite.
    y:        f32,
    vy:       f32,
    mode:     AvatarMode,
    grounded: bool,
    step:     u32,
    physics:  PhysicsConfig,
    layout:   LayoutConfig,
}

impl Avatar {
    pub fn new(physics: PhysicsConfig, layout: LayoutConfig) -> Self {
        let mut a = Avatar {
            x:        layout.avatar_x,
            y:        0.0,
            vy:       0.0,
            mode:     AvatarMode::Running,
            grounded: true,
            step:     0,
            physics,
            layout,
        };
        a.y = a.ground_contact();
        a
    }

    /// One simulation tick.  Polls the jump trigger exactly once.
    pub fn update(&mut self, input: &impl GestureInput) {
        if input.poll_jump_just_pressed() && self.grounded {
            // Leaving a duck: stand up first so the jump starts from run height.
            self.mode = AvatarMode::Jumping;
            self.y = self.ground_contact();
            self.grounded = false;
            self.vy = self.physics.jump_velocity;
        }

        // Variable jump height: letting go cuts the ascent.
        if self.mode == AvatarMode::Jumping
            && !input.is_jump_held()
            && self.vy < self.physics.min_jump_velocity
        {
            self.vy = self.physics.min_jump_velocity;
        }

        if input.is_duck_held() {
            if self.mode != AvatarMode::Ducking {
                self.mode = AvatarMode::Ducking;
                if self.grounded {
                    self.y = self.ground_contact();
                }
            }
            if !self.grounded {
                self.vy += self.physics.gravity;
            }
        } else if self.mode == AvatarMode::Ducking {
            if self.grounded {
                self.mode = AvatarMode::Running;
                self.y = self.ground_contact();
            } else {
                self.mode = AvatarMode::Jumping;
            }
        }

        self.integrate();
        self.animate();
    }

    fn integrate(&mut self) {
        self.vy += self.physics.gravity;
        self.y += self.vy;

        let ground = self.ground_contact();
        if self.y >= ground {
            self.y = ground;
            self.vy = 0.0;
            self.grounded = true;
            if self.mode == AvatarMode::Jumping {
                self.mode = AvatarMode::Running;
            }
        } else {
            self.grounded = false;
        }
    }

    fn animate(&mut self) {
        self.step = if self.mode == AvatarMode::Jumping {
            0
        } else {
            (self.step + 1) % (2 * ANIM_STEP)
        };
    }

    /// Top-edge y at which the current sprite stands on the ground.
    pub fn ground_contact(&self) -> f32 {
        let (_, h) = self.size();
        let mut y = self.layout.ground_y - h + self.layout.sprite_offset;
        if self.mode == AvatarMode::Ducking {
            y += self.layout.duck_ground_offset;
        }
        y
    }

    pub fn size(&self) -> (f32, f32) {
        match self.mode {
            AvatarMode::Ducking => DUCK_SIZE,
            _                   => RUN_SIZE,
        }
    }

    pub fn rect(&self) -> Rect {
        let (w, h) = self.size();
        Rect::new(self.x, self.y, w, h)
    }

    pub fn hitbox(&self) -> Rect {
        self.rect().inflate(-HITBOX_SHRINK.0, -HITBOX_SHRINK.1)
    }

    /// 0 or 1; always 0 mid-jump.
    pub fn anim_frame(&self) -> usize { (self.step / ANIM_STEP) as usize }

    pub fn mode(&self)        -> AvatarMode { self.mode }
    pub fn is_grounded(&self) -> bool       { self.grounded }
    pub fn velocity(&self)    -> f32        { self.vy }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
