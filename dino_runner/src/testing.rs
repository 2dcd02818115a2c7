//! Hand-driven [`GestureInput`] for game-logic tests.

use std::cell::Cell;

use pose_gesture::GestureInput;

#[derive(Default)]
pub struct FakeInput {
    pub jump_edge:  Cell<bool>,
    pub jump_held:  Cell<bool>,
    pub duck_held:  Cell<bool>,
    pub hand_edge:  Cell<bool>,
    pub awaiting:   Cell<bool>,
    pub resets:     Cell<u32>,
    pub jump_polls: Cell<u32>,
}

impl FakeInput {
    pub fn press_jump(&self) {
        self.jump_edge.set(true);
        self.jump_held.set(true);
    }

    pub fn release_jump(&self) { self.jump_held.set(false); }

    pub fn raise_hand(&self) { self.hand_edge.set(true); }
}

impl GestureInput for FakeInput {
    fn poll_jump_just_pressed(&self) -> bool {
        self.jump_polls.set(self.jump_polls.get() + 1);
        self.jump_edge.replace(false)
    }

    fn is_jump_held(&self) -> bool { self.jump_held.get() }

    fn is_duck_held(&self) -> bool { self.duck_held.get() }

    fn poll_hand_raise_just_detected(&self) -> bool { self.hand_edge.replace(false) }

    fn set_awaiting_reset(&self, awaiting: bool) { self.awaiting.set(awaiting) }

    fn reset(&self) {
        self.resets.set(self.resets.get() + 1);
        self.jump_edge.set(false);
        self.jump_held.set(false);
        self.duck_held.set(false);
        self.hand_edge.set(false);
        self.awaiting.set(false);
    }
}
