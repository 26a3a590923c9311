//! Process-wide ownership of the eye displays
//!
//! Only one controller may drive the panels. Building a new one releases
//! whatever an earlier controller claimed by bumping a generation counter;
//! a [`DisplayClaim`] taken before the bump is no longer current.

use core::cell::Cell;

static GENERATION: critical_section::Mutex<Cell<u32>> =
    critical_section::Mutex::new(Cell::new(0));

/// Release every display claim handed out so far. Idempotent from the
/// hardware's point of view; safe to call when nothing was claimed.
pub fn release_all() -> u32 {
    critical_section::with(|cs| {
        let generation = GENERATION.borrow(cs);
        let next = generation.get().wrapping_add(1);
        generation.set(next);
        next
    })
}

pub fn current_generation() -> u32 {
    critical_section::with(|cs| GENERATION.borrow(cs).get())
}

/// Claim the displays for the current generation.
pub fn claim() -> DisplayClaim {
    DisplayClaim {
        generation: current_generation(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayClaim {
    generation: u32,
}

impl DisplayClaim {
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// False once a later `release_all` ran.
    pub fn is_current(&self) -> bool {
        self.generation == current_generation()
    }
}
