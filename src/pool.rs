/// Entity pools: one fixed-size batch of same-kind objects per kind.
///
/// A pool is never left empty across frames: `compute::tick_pool` calls
/// [`EntityPool::regenerate`] in the same step that removes the last entity.

use rand::Rng;
use tracing::debug;

use crate::entities::{Entity, EntityKind, Position, Size, Travel, Viewport};
use crate::spawn::PositionIterator;

// ── Per-kind tables ──────────────────────────────────────────────────────────

pub fn batch_size(kind: EntityKind) -> usize {
    match kind {
        EntityKind::Star => 5,
        EntityKind::Parachute => 2,
        EntityKind::Bird => 3,
        EntityKind::Cloud => 3,
    }
}

pub fn size_for(kind: EntityKind) -> Size {
    match kind {
        EntityKind::Star => Size { width: 1.0, height: 1.0 },
        EntityKind::Parachute => Size { width: 3.0, height: 2.0 },
        EntityKind::Bird => Size { width: 3.0, height: 1.0 },
        EntityKind::Cloud => Size { width: 7.0, height: 2.0 },
    }
}

/// Speed range in cells per frame, drawn once per spawned entity.
fn speed_range(kind: EntityKind) -> (f32, f32) {
    match kind {
        EntityKind::Star => (0.15, 0.35),
        EntityKind::Parachute => (0.10, 0.20),
        EntityKind::Bird => (0.30, 0.60),
        EntityKind::Cloud => (0.05, 0.15),
    }
}

/// (main-axis gap, cross-axis gap) for the spawner.  Falling kinds stack
/// their rows upward, so their cross gap is negative.
fn spawn_gaps(kind: EntityKind) -> (f32, f32) {
    match kind {
        EntityKind::Star => (6.0, -4.0),
        EntityKind::Parachute => (15.0, -8.0),
        EntityKind::Bird => (4.0, 12.0),
        EntityKind::Cloud => (3.0, 15.0),
    }
}

/// Spawner covering the region just outside the viewport that `kind`
/// enters from: above the top edge for falling kinds, past the right edge
/// for crossing kinds.
pub fn spawner_for(kind: EntityKind, viewport: &Viewport) -> PositionIterator {
    let size = size_for(kind);
    let (main_gap, cross_gap) = spawn_gaps(kind);
    match kind.travel() {
        Travel::Falling => PositionIterator::new(
            0.0,
            viewport.width - size.width,
            -(size.height + 1.0),
            main_gap,
            cross_gap,
        ),
        Travel::Crossing => PositionIterator::new(
            0.0,
            viewport.height - size.height,
            viewport.width + 1.0,
            main_gap,
            cross_gap,
        ),
    }
}

// ── Pool ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct EntityPool {
    pub kind: EntityKind,
    pub entities: Vec<Entity>,
    spawner: PositionIterator,
}

impl EntityPool {
    /// Build a pool for `kind` and spawn its first batch.
    pub fn for_kind(kind: EntityKind, viewport: &Viewport, rng: &mut impl Rng) -> Self {
        let mut pool = EntityPool {
            kind,
            entities: Vec::new(),
            spawner: spawner_for(kind, viewport),
        };
        pool.regenerate(rng);
        pool
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Replace the contents with a fresh full batch, starting again from the
    /// spawner's first row.
    pub fn regenerate(&mut self, rng: &mut impl Rng) {
        self.spawner.reset();
        let travel = self.kind.travel();
        let size = size_for(self.kind);
        let (min_speed, max_speed) = speed_range(self.kind);

        self.entities = (0..batch_size(self.kind))
            .map(|_| {
                let at = self.spawner.next_position(rng);
                let position = match travel {
                    Travel::Falling => Position { x: at.main_axis, y: at.cross_axis },
                    Travel::Crossing => Position { x: at.cross_axis, y: at.main_axis },
                };
                Entity {
                    position,
                    speed: rng.gen_range(min_speed..max_speed),
                    size,
                    kind: self.kind,
                }
            })
            .collect();

        debug!(kind = ?self.kind, count = self.entities.len(), "pool regenerated");
    }

    /// Point the spawner at a new viewport (terminal resize).  Entities
    /// already in flight keep going.
    pub fn retarget(&mut self, viewport: &Viewport) {
        self.spawner = spawner_for(self.kind, viewport);
    }

    /// Teardown: drop every entity without regenerating.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
