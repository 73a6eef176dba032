//! Strategy configuration regression test
//!
//! The process-wide defaults are shared by every test in a binary, so the
//! switches are exercised from a single test that restores them.
//!
//! Run with:
//! ```
//! cargo test -p bitmorph-core --test config_reg
//! ```

use bitmorph_core::config::{
    default_decomposition, default_line_blit, set_default_decomposition, set_default_line_blit,
};
use bitmorph_core::{Blitter, Decomposition, Error, LineBlitKind};
use bitmorph_test::RegParams;

#[test]
fn config_reg() {
    let mut rp = RegParams::new("config");

    rp.compare_values(0.0, default_line_blit().index() as f64, 0.0);
    rp.compare_values(0.0, default_decomposition().index() as f64, 0.0);

    for kind in LineBlitKind::ALL {
        set_default_line_blit(kind);
        rp.compare_values(kind.index() as f64, default_line_blit().index() as f64, 0.0);
        rp.compare_values(
            kind.index() as f64,
            Blitter::default().kind().index() as f64,
            0.0,
        );
    }
    for d in Decomposition::ALL {
        set_default_decomposition(d);
        rp.compare_values(d.index() as f64, default_decomposition().index() as f64, 0.0);
    }
    set_default_line_blit(LineBlitKind::Wordwise);
    set_default_decomposition(Decomposition::Telescope);

    // Numeric selectors round-trip and reject anything else
    for index in 0u32..3 {
        let d = Decomposition::try_from(index).expect("known decomposition");
        rp.compare_values(index as f64, d.index() as f64, 0.0);
    }
    let bad = LineBlitKind::from_index(2);
    rp.compare_values(
        1.0,
        matches!(bad, Err(Error::UnknownStrategy { index: 2, .. })) as u8 as f64,
        0.0,
    );
    rp.compare_values(1.0, Decomposition::from_index(3).is_err() as u8 as f64, 0.0);

    eprintln!(
        "defaults restored: {} rows, {} decomposition",
        default_line_blit(),
        default_decomposition()
    );
    assert!(rp.cleanup(), "config regression test failed");
}
