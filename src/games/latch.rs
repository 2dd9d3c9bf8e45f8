/// Level-triggered input flags for the racer and bike games.
///
/// Terminals only deliver key *presses* (auto-repeated while held), never
/// releases, so a held key is modeled as a hold counter: each press tops
/// the counter up and every simulation tick drains it by one. The flag
/// reads as held while the counter is positive. The window is sized to
/// outlast the gap between auto-repeat events at typical key-repeat rates.
#[derive(Clone, Copy, Default)]
pub struct HeldKey {
    ticks_left: u8,
}

/// Ticks a press keeps its flag held without a repeat event.
const HOLD_WINDOW: u8 = 10;

impl HeldKey {
    pub fn press(&mut self) {
        self.ticks_left = HOLD_WINDOW;
    }

    /// Drain one tick from the hold window. Call once per simulation step.
    pub fn decay(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
    }

    pub fn is_held(&self) -> bool {
        self.ticks_left > 0
    }

    pub fn release(&mut self) {
        self.ticks_left = 0;
    }
}

/// The full latch consumed by a driving-game step: throttle, brake, and
/// steering, each an independently held flag.
#[derive(Clone, Copy, Default)]
pub struct DriveLatch {
    pub throttle: HeldKey,
    pub brake: HeldKey,
    pub left: HeldKey,
    pub right: HeldKey,
}

impl DriveLatch {
    pub fn decay(&mut self) {
        self.throttle.decay();
        self.brake.decay();
        self.left.decay();
        self.right.decay();
    }

    pub fn clear(&mut self) {
        *self = DriveLatch::default();
    }

    /// -1 steering left, +1 steering right, 0 neutral (or both held).
    pub fn steer(&self) -> i32 {
        match (self.left.is_held(), self.right.is_held()) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}
