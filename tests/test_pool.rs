use plane_dodge::entities::*;
use plane_dodge::pool::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn viewport(width: f32, height: f32) -> Viewport {
    Viewport { width, height }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn fresh_pool_holds_a_full_batch() {
    let mut rng = seeded_rng();
    for kind in EntityKind::ALL {
        let pool = EntityPool::for_kind(kind, &viewport(78.0, 20.0), &mut rng);
        assert_eq!(pool.len(), batch_size(kind), "{:?}", kind);
        assert!(pool.entities.iter().all(|e| e.kind == kind && e.size == size_for(kind)));
    }
}

#[test]
fn falling_kinds_spawn_above_the_top_edge() {
    let mut rng = seeded_rng();
    let vp = viewport(60.0, 20.0);
    let pool = EntityPool::for_kind(EntityKind::Star, &vp, &mut rng);
    for e in &pool.entities {
        assert!(e.rect().bottom() <= 0.0, "{:?}", e);
        assert!(e.position.x >= 0.0 && e.rect().right() <= vp.width, "{:?}", e);
    }
}

// ── Retarget ──────────────────────────────────────────────────────────────────

#[test]
fn retarget_moves_the_next_batch_into_the_new_region() {
    let mut rng = seeded_rng();
    let mut pool = EntityPool::for_kind(EntityKind::Bird, &viewport(40.0, 20.0), &mut rng);
    assert!(pool.entities.iter().all(|e| e.position.x >= 41.0));

    let wide = viewport(80.0, 10.0);
    pool.retarget(&wide);
    pool.regenerate(&mut rng);

    assert_eq!(pool.len(), batch_size(EntityKind::Bird));
    // First row sits just past the new right edge; later rows only further out.
    assert_eq!(pool.entities[0].position.x, 81.0);
    for e in &pool.entities {
        assert!(e.position.x >= 81.0, "{:?}", e);
        assert!(e.position.y >= 0.0 && e.position.y < 9.0, "{:?}", e);
    }
}

#[test]
fn retarget_leaves_entities_in_flight() {
    let mut rng = seeded_rng();
    let mut pool = EntityPool::for_kind(EntityKind::Cloud, &viewport(40.0, 20.0), &mut rng);
    let before = pool.entities.clone();
    pool.retarget(&viewport(100.0, 30.0));
    assert_eq!(pool.entities, before);
}

#[test]
fn clear_empties_without_regenerating() {
    let mut rng = seeded_rng();
    let mut pool = EntityPool::for_kind(EntityKind::Parachute, &viewport(40.0, 20.0), &mut rng);
    pool.clear();
    assert!(pool.is_empty());
}
