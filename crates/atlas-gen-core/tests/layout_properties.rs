use atlas_gen_core::prelude::*;
use rand::{Rng, SeedableRng};

fn random_items(seed: u64, count: usize) -> Vec<(String, u32, u32)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(4..=40);
            let h = rng.gen_range(4..=40);
            (format!("img_{}", i), w, h)
        })
        .collect()
}

fn disjoint(placements: &[Placement]) -> bool {
    for i in 0..placements.len() {
        for j in (i + 1)..placements.len() {
            if placements[i].slot.intersects(&placements[j].slot) {
                return false;
            }
        }
    }
    true
}

fn check_layout(atlas: &Atlas, items: &[(String, u32, u32)]) {
    assert_eq!(atlas.placements.len(), items.len());
    assert!(disjoint(&atlas.placements), "padded slots overlap");
    let canvas = Rect::new(0, 0, atlas.width, atlas.height);
    for (p, (key, w, h)) in atlas.placements.iter().zip(items) {
        assert_eq!(&p.key, key, "placements keep input order");
        assert_eq!((p.w, p.h), (*w, *h));
        assert!(p.slot.x + p.slot.w <= atlas.width);
        assert!(p.slot.y + p.slot.h <= atlas.height);
        assert!(canvas.contains(&p.slot));
        assert!(p.slot.contains(&p.content()));
        assert_eq!(p.x, p.slot.x + p.margin.x);
        assert_eq!(p.y, p.slot.y + p.margin.y);
    }
}

#[test]
fn random_sets_pack_without_overlap_and_in_bounds() {
    for (seed, margin) in [(1u64, 0u32), (2, 1), (3, 4)] {
        let items = random_items(seed, 60);
        let cfg = AtlasConfig::builder().margin(margin).build();
        let atlas = pack_layout(items.clone(), cfg).expect("pack");
        check_layout(&atlas, &items);
        assert_eq!(atlas.attempts.last().map(|a| a.unplaced), Some(0));
    }
}

#[test]
fn normalized_sets_get_equal_cells() {
    let items = random_items(11, 30);
    let cfg = AtlasConfig::builder().normalize(true).margin(1).build();
    let atlas = pack_layout(items.clone(), cfg).expect("pack");
    check_layout(&atlas, &items);
    let first = atlas.placements[0].slot;
    for p in &atlas.placements {
        // odd differences truncate, so a cell may be one pixel short
        assert!(first.w.abs_diff(p.slot.w) <= 1);
        assert!(first.h.abs_diff(p.slot.h) <= 1);
    }
}

#[test]
fn identical_input_gives_identical_layout() {
    let items = random_items(42, 80);
    let cfg = AtlasConfig::builder().margin(2).build();
    let a = pack_layout(items.clone(), cfg.clone()).expect("pack");
    let b = pack_layout(items, cfg).expect("pack");
    assert_eq!((a.width, a.height), (b.width, b.height));
    assert_eq!(a.placements, b.placements);
    assert_eq!(a.attempts, b.attempts);
}

#[test]
fn growth_only_doubles_the_scheduled_axis() {
    let items = random_items(5, 120);
    let atlas = pack_layout(items, AtlasConfig::default()).expect("pack");
    for pair in atlas.attempts.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if prev.index % 2 == 0 {
            assert_eq!(next.width, prev.width * 2);
            assert_eq!(next.height, prev.height);
        } else {
            assert_eq!(next.width, prev.width);
            assert_eq!(next.height, prev.height * 2);
        }
    }
}

#[test]
fn atlas_lookup_and_stats() {
    let items = vec![("a", 10, 10), ("b", 10, 10)];
    let atlas = pack_layout(items, AtlasConfig::default()).expect("pack");
    assert_eq!((atlas.width, atlas.height), (20, 20));
    assert_eq!(atlas.get(&"b").map(|p| (p.x, p.y)), Some((10, 0)));
    assert!(atlas.get(&"c").is_none());

    let by_key = atlas.by_key();
    assert_eq!(by_key.len(), 2);
    assert_eq!(by_key[&"a"].slot, Rect::new(0, 0, 10, 10));
    assert_eq!(by_key.get(&"b").map(|p| p.x), Some(10));
    assert!(!by_key.contains_key(&"c"));

    let stats = atlas.stats();
    assert_eq!(stats.num_placements, 2);
    assert_eq!(stats.canvas_area, 400);
    assert_eq!(stats.used_area, 200);
    assert_eq!(stats.wasted_area(), 200);
    assert!((stats.occupancy - 0.5).abs() < 1e-9);
    assert_eq!(stats.attempts, 1);
    assert!(stats.summary().contains("Occupancy: 50.00%"));
}
