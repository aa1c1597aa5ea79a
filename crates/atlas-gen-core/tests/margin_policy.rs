use atlas_gen_core::prelude::*;
use atlas_gen_core::{compute_margins, padded_size};

#[test]
fn normalize_centers_smaller_images_in_equal_cells() {
    let margins = compute_margins(
        &[(10, 10), (20, 20)],
        MarginPolicy::Normalized(Margin::default()),
    );
    assert_eq!(margins, vec![Margin::new(5, 5), Margin::new(0, 0)]);
    assert_eq!(padded_size(10, 10, margins[0]), (20, 20));
    assert_eq!(padded_size(20, 20, margins[1]), (20, 20));
}

#[test]
fn normalize_uses_largest_dimension_on_both_axes_plus_global_margin() {
    let sizes = [(10, 4), (6, 8)];
    let margins = compute_margins(&sizes, MarginPolicy::Normalized(Margin::new(1, 2)));
    assert_eq!(margins, vec![Margin::new(1, 5), Margin::new(3, 3)]);
    for (&(w, h), &m) in sizes.iter().zip(&margins) {
        assert_eq!(padded_size(w, h, m), (12, 14));
    }
}

#[test]
fn normalize_truncates_odd_differences() {
    let margins =
        compute_margins(&[(7, 7), (10, 10)], MarginPolicy::Normalized(Margin::default()));
    assert_eq!(margins[0], Margin::new(1, 1));
    assert_eq!(padded_size(7, 7, margins[0]), (9, 9));
}

#[test]
fn uniform_gives_everyone_the_global_margin() {
    let margins = compute_margins(
        &[(3, 9), (40, 2), (1, 1)],
        MarginPolicy::Uniform(Margin::new(2, 3)),
    );
    assert!(margins.iter().all(|m| *m == Margin::new(2, 3)));
    assert_eq!(padded_size(3, 9, margins[0]), (7, 15));
}

#[test]
fn empty_input_yields_no_margins() {
    assert!(compute_margins(&[], MarginPolicy::Normalized(Margin::uniform(4))).is_empty());
}

#[test]
fn policy_follows_config() {
    let cfg = AtlasConfig::builder().margin_x(3).margin_y(1).build();
    assert_eq!(
        MarginPolicy::from_config(&cfg).unwrap(),
        MarginPolicy::Uniform(Margin::new(3, 1))
    );

    let cfg = AtlasConfig::builder().margin(2).normalize(true).build();
    let policy = MarginPolicy::from_config(&cfg).unwrap();
    assert_eq!(policy, MarginPolicy::Normalized(Margin::uniform(2)));
    assert_eq!(policy.global(), Margin::uniform(2));
}

#[test]
fn normalize_with_resize_is_a_conflict() {
    let cfg = AtlasConfig::builder()
        .normalize(true)
        .resize(Some(64))
        .build();
    assert!(matches!(
        MarginPolicy::from_config(&cfg),
        Err(AtlasGenError::ConfigurationConflict(_))
    ));
    assert!(matches!(
        cfg.validate(),
        Err(AtlasGenError::ConfigurationConflict(_))
    ));
    // rejected before any layout work
    assert!(matches!(
        atlas_gen_core::pack_layout(vec![("a", 10, 10)], cfg),
        Err(AtlasGenError::ConfigurationConflict(_))
    ));
}
