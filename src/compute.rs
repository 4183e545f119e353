/// Pure per-frame game rules.
///
/// Every public function takes an immutable reference to the current state
/// (and, where needed, an RNG handle) and returns a brand-new value.  Side
/// effects are limited to the injected RNG; scoring, fuel and sounds are the
/// session's business and are reported back as [`Pickup`]s.

use rand::Rng;
use tracing::trace;

use crate::collision::intersects;
use crate::entities::{Entity, EntityKind, Plane, Position, Travel, Viewport};
use crate::pool::EntityPool;

/// The plane touched a collectible or a hazard this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pickup {
    pub kind: EntityKind,
}

/// Everything that moves: the plane plus one pool per entity kind.
#[derive(Clone, Debug)]
pub struct Playfield {
    pub viewport: Viewport,
    pub plane: Plane,
    /// One pool per kind, in `EntityKind::ALL` order.
    pub pools: Vec<EntityPool>,
}

impl Playfield {
    pub fn pool(&self, kind: EntityKind) -> Option<&EntityPool> {
        self.pools.iter().find(|p| p.kind == kind)
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Plane parked at the left edge, vertically centred.
pub fn init_plane(viewport: &Viewport, speed: f32) -> Plane {
    let size = crate::entities::Size { width: 5.0, height: 2.0 };
    let plane = Plane {
        position: Position {
            x: 2.0,
            y: (viewport.height - size.height) / 2.0,
        },
        size,
        speed,
        directions: Default::default(),
    };
    clamp_plane(&plane, viewport)
}

pub fn init_playfield(viewport: Viewport, plane_speed: f32, rng: &mut impl Rng) -> Playfield {
    Playfield {
        viewport,
        plane: init_plane(&viewport, plane_speed),
        pools: EntityKind::ALL
            .iter()
            .map(|&kind| EntityPool::for_kind(kind, &viewport, rng))
            .collect(),
    }
}

// ── Plane movement ───────────────────────────────────────────────────────────

/// Keep the plane's whole box inside the viewport.
pub fn clamp_plane(plane: &Plane, viewport: &Viewport) -> Plane {
    let max_x = (viewport.width - plane.size.width).max(0.0);
    let max_y = (viewport.height - plane.size.height).max(0.0);
    Plane {
        position: Position {
            x: plane.position.x.clamp(0.0, max_x),
            y: plane.position.y.clamp(0.0, max_y),
        },
        ..plane.clone()
    }
}

/// Apply one frame of held-direction movement, then clamp.
pub fn move_plane(plane: &Plane, viewport: &Viewport) -> Plane {
    let step = |held: bool| if held { plane.speed } else { 0.0 };
    let d = &plane.directions;
    let dx = step(d.right) - step(d.left);
    let dy = step(d.down) - step(d.up);

    let moved = Plane {
        position: Position {
            x: plane.position.x + dx,
            y: plane.position.y + dy,
        },
        ..plane.clone()
    };
    clamp_plane(&moved, viewport)
}

// ── Entities ─────────────────────────────────────────────────────────────────

/// Fallen below the playground, or fully past its left edge.
pub fn left_viewport(entity: &Entity, viewport: &Viewport) -> bool {
    match entity.kind.travel() {
        Travel::Falling => entity.position.y >= viewport.height,
        Travel::Crossing => entity.position.x + entity.size.width <= 0.0,
    }
}

/// Whether touching the plane does anything.  Clouds are scenery.
pub fn collides(kind: EntityKind) -> bool {
    !matches!(kind, EntityKind::Cloud)
}

pub fn advance(entity: &Entity) -> Entity {
    let mut position = entity.position;
    match entity.kind.travel() {
        Travel::Falling => position.y += entity.speed,
        Travel::Crossing => position.x -= entity.speed,
    }
    Entity {
        position,
        ..entity.clone()
    }
}

/// One pass over a pool.  Per entity, in priority order: drop it if it left
/// the viewport, else drop it and report a pickup if it touches the plane,
/// else move it.  An emptied pool is refilled before returning.
pub fn tick_pool(
    pool: &EntityPool,
    plane: &Plane,
    viewport: &Viewport,
    rng: &mut impl Rng,
) -> (EntityPool, Vec<Pickup>) {
    let plane_rect = plane.rect();
    let mut pickups = Vec::new();

    let entities: Vec<Entity> = pool
        .entities
        .iter()
        .filter_map(|e| {
            if left_viewport(e, viewport) {
                None
            } else if collides(e.kind) && intersects(&e.rect(), &plane_rect) {
                pickups.push(Pickup { kind: e.kind });
                None
            } else {
                Some(advance(e))
            }
        })
        .collect();

    let mut next = pool.clone();
    next.entities = entities;
    if next.is_empty() {
        next.regenerate(rng);
    }
    (next, pickups)
}

/// Advance the whole playfield by one frame: the plane first, then every
/// pool in `EntityKind::ALL` order.
pub fn tick(field: &Playfield, rng: &mut impl Rng) -> (Playfield, Vec<Pickup>) {
    let plane = move_plane(&field.plane, &field.viewport);
    let mut pickups = Vec::new();

    let pools = field
        .pools
        .iter()
        .map(|pool| {
            let (next, mut hits) = tick_pool(pool, &plane, &field.viewport, rng);
            pickups.append(&mut hits);
            next
        })
        .collect();

    trace!(x = plane.position.x, y = plane.position.y, pickups = pickups.len(), "frame");

    (
        Playfield {
            plane,
            pools,
            ..field.clone()
        },
        pickups,
    )
}
