//! One-shot rising-edge latch.

/// Turns a level signal into a "just started" pulse that can be read once.
///
/// The producer calls [`update`](Self::update) once per classified frame;
/// the consumer calls [`consume`](Self::consume) once per tick.  Several
/// edges between two consumer polls coalesce into one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTrigger {
    previous: bool,
    fired:    bool,
}

impl EdgeTrigger {
    pub fn new() -> Self { Self::default() }

    /// Record the current level.  The latch is set only on a false → true
    /// transition and is cleared by any other update.
    pub fn update(&mut self, level: bool) {
        self.fired = level && !self.previous;
        self.previous = level;
    }

    /// Read and clear.
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.fired)
    }

    pub fn peek(&self) -> bool { self.fired }

    /// Level seen by the last update.
    pub fn level(&self) -> bool { self.previous }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `levels`, consuming after every update; return what was read.
    fn drive(levels: &[bool]) -> Vec<bool> {
        let mut t = EdgeTrigger::new();
        levels
            .iter()
            .map(|&l| {
                t.update(l);
                t.consume()
            })
            .collect()
    }

    #[test]
    fn fires_on_first_true() {
        assert_eq!(drive(&[true]), [true]);
    }

    #[test]
    fn fires_once_per_run_of_trues() {
        let got = drive(&[false, true, true, true, false, true, true, false]);
        assert_eq!(got, [false, true, false, false, false, true, false, false]);
    }

    #[test]
    fn consume_clears() {
        let mut t = EdgeTrigger::new();
        t.update(false);
        t.update(true);
        assert!(t.consume());
        assert!(!t.consume());
    }

    #[test]
    fn consume_without_edge_is_false_twice() {
        let mut t = EdgeTrigger::new();
        t.update(true);
        t.update(true);
        assert_eq!((t.consume(), t.consume()), (false, false));
    }

    #[test]
    fn unconsumed_edge_is_dropped_by_next_update() {
        let mut t = EdgeTrigger::new();
        t.update(true);
        assert!(t.peek());
        t.update(true);
        assert!(!t.consume());
    }

    #[test]
    fn peek_does_not_clear() {
        let mut t = EdgeTrigger::new();
        t.update(true);
        assert!(t.peek());
        assert!(t.peek());
        assert!(t.consume());
    }

    #[test]
    fn at_most_one_fire_per_run_for_random_walks() {
        // Deterministic LCG so the sequence is reproducible.
        let mut state = 0x2545_F491u32;
        let levels: Vec<bool> = (0..500)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) & 1 == 1
            })
            .collect();

        let mut t = EdgeTrigger::new();
        let mut prev = false;
        let mut fired_in_run = false;
        for &l in &levels {
            t.update(l);
            let fired = t.consume();
            if !l { fired_in_run = false; }
            if fired {
                assert!(l && !prev, "fired without a rising edge");
                assert!(!fired_in_run, "fired twice in one run");
                fired_in_run = true;
            }
            prev = l;
        }
    }

    #[test]
    fn reset_forgets_history() {
        let mut t = EdgeTrigger::new();
        t.update(true);
        t.reset();
        assert!(!t.peek());
        assert!(!t.level());
        t.update(true);
        assert!(t.consume());
    }
}
