/// Spawn-position generator.
///
/// Fills one "row" of the spawn region at a time: each call moves forward
/// along the main axis by at least `main_gap` (with a random extra offset).
/// When the main axis runs out, it wraps back to `min_main` and the cross axis
/// steps by `cross_gap` to open the next row.
///
/// Falling objects use x as the main axis and step the cross axis upward
/// (negative gap); crossing objects use y as the main axis and step the cross
/// axis to the right.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisPosition {
    pub main_axis: f32,
    pub cross_axis: f32,
}

#[derive(Clone, Debug)]
pub struct PositionIterator {
    min_main: f32,
    max_main: f32,
    start_cross: f32,
    main_gap: f32,
    cross_gap: f32,
    prev_main: Option<f32>,
    cross: f32,
}

impl PositionIterator {
    pub fn new(min_main: f32, max_main: f32, start_cross: f32, main_gap: f32, cross_gap: f32) -> Self {
        PositionIterator {
            min_main,
            max_main,
            start_cross,
            main_gap,
            cross_gap,
            prev_main: None,
            cross: start_cross,
        }
    }

    /// Back to the first row, as if freshly constructed.
    pub fn reset(&mut self) {
        self.prev_main = None;
        self.cross = self.start_cross;
    }

    pub fn next_position(&mut self, rng: &mut impl Rng) -> AxisPosition {
        let main_axis = match self.prev_main {
            // First call opens the first row without stepping the cross axis.
            None => uniform(rng, self.min_main, self.max_main),
            Some(prev) => {
                let candidate = prev + self.main_gap;
                if candidate < self.max_main {
                    uniform(rng, candidate, self.max_main)
                } else {
                    self.cross += self.cross_gap;
                    uniform(rng, self.min_main, self.max_main)
                }
            }
        };

        self.prev_main = Some(main_axis);
        AxisPosition {
            main_axis,
            cross_axis: self.cross,
        }
    }
}

/// Uniform draw from `[lo, hi)`; an empty range collapses to `lo`.
fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
