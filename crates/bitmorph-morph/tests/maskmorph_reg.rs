//! Mask morphology regression test
//!
//! Run decomposition against the rectangle decompositions for solid
//! elements, and against the one-blit-per-hit reference for random
//! elements with random centers.
//!
//! Run with:
//! ```
//! cargo test -p bitmorph-morph --test maskmorph_reg
//! ```

use bitmorph_core::{BitImage, Decomposition, LineBlitKind};
use bitmorph_morph::{
    MorphError, Morphology, Sel, close_mask, dilate_mask, dilate_mask_brute, dilate_rect,
    erode_mask, erode_mask_brute, erode_rect, open_mask,
};
use bitmorph_test::{RegParams, TestRng, random_bits};
use proptest::prelude::*;

#[test]
fn maskmorph_reg() {
    let mut rp = RegParams::new("maskmorph");
    let mut rng = TestRng::new(42);

    // Solid elements agree with the rectangle path
    for n in 0..50 {
        let w = 1 + rng.below(20);
        let h = 1 + rng.below(40);
        let pix = random_bits(40 + rng.below(30), 40 + rng.below(60), 0.5, n);
        let sel = Sel::rect(w, h);
        rp.compare_bits(&erode_rect(&pix, w, h), &erode_mask(&pix, &sel));
        rp.compare_bits(&dilate_rect(&pix, w, h), &dilate_mask(&pix, &sel));
    }

    // Random elements with random centers agree with the reference
    for n in 0..30 {
        let w = 1 + rng.below(9);
        let h = 1 + rng.below(45);
        let hit = random_bits(w, h, 0.4, 1000 + n);
        let sel = Sel::from_hits(hit).with_center(rng.below(w), rng.below(h));
        let pix = random_bits(37, 70, 0.3, 2000 + n);
        for kind in LineBlitKind::ALL {
            let mut m = Morphology::new(kind, Decomposition::Telescope);
            let mut out = pix.clone();
            m.erode_mask(&mut out, &sel);
            rp.compare_bits(&erode_mask_brute(&pix, &sel), &out);
            let mut out = pix.clone();
            m.dilate_mask(&mut out, &sel);
            rp.compare_bits(&dilate_mask_brute(&pix, &sel), &out);
        }
    }

    // A single pixel dilated by a 3x3 square becomes that square
    let mut dot = BitImage::with_size(8, 8);
    dot.set(3, 3, true).expect("set dot");
    let grown = dilate_mask(&dot, &Sel::rect(3, 3));
    rp.compare_values(9.0, grown.count() as f64, 0.0);
    rp.compare_values(9.0, grown.count_rect(2, 2, 3, 3) as f64, 0.0);

    // The same next to the corner is clipped
    let mut corner = BitImage::with_size(8, 8);
    corner.set(0, 0, true).expect("set corner");
    rp.compare_values(4.0, dilate_mask(&corner, &Sel::rect(3, 3)).count() as f64, 0.0);

    // Overlapping hit and miss masks are rejected
    let mut hit = BitImage::with_size(3, 3);
    hit.set(0, 2, true).expect("set hit");
    let result = Sel::from_masks(hit.clone(), hit);
    rp.compare_values(
        1.0,
        matches!(result, Err(MorphError::OverlappingHitMiss { i: 0, j: 2 })) as u8 as f64,
        0.0,
    );

    assert!(rp.cleanup(), "maskmorph regression test failed");
}

fn arb_sel() -> impl Strategy<Value = Sel> {
    (1usize..8, 1usize..8, any::<u64>())
        .prop_map(|(w, h, seed)| Sel::from_hits(random_bits(w, h, 0.5, seed)))
}

fn arb_image() -> impl Strategy<Value = BitImage> {
    (1usize..40, 1usize..40, any::<u64>()).prop_map(|(w, h, seed)| random_bits(w, h, 0.5, seed))
}

proptest! {
    #[test]
    fn mask_matches_brute(img in arb_image(), sel in arb_sel()) {
        prop_assert_eq!(erode_mask(&img, &sel), erode_mask_brute(&img, &sel));
        prop_assert_eq!(dilate_mask(&img, &sel), dilate_mask_brute(&img, &sel));
    }

    #[test]
    fn mask_open_close_are_idempotent(img in arb_image(), sel in arb_sel()) {
        let opened = open_mask(&img, &sel);
        prop_assert_eq!(open_mask(&opened, &sel), opened);
        let closed = close_mask(&img, &sel);
        prop_assert_eq!(close_mask(&closed, &sel), closed);
    }
}
