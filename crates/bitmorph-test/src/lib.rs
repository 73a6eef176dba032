//! bitmorph-test - regression test harness
//!
//! Supports three modes, chosen with the `REGTEST_MODE` environment
//! variable:
//!
//! - **Generate**: write golden files
//! - **Compare**: compare results with golden files (default)
//! - **Display**: run without comparing
//!
//! # Usage
//!
//! ```ignore
//! use bitmorph_test::{RegParams, random_bits};
//!
//! let mut rp = RegParams::new("rectmorph");
//! let img = random_bits(64, 64, 0.3, 1);
//! rp.compare_values(img.count() as f64, img.count() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;
mod rng;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
pub use rng::{TestRng, random_bits};

use bitmorph_core::BitImage;

/// Install `env_logger` once for the whole test binary.
///
/// Honors `RUST_LOG`; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Load a test image from the test data directory.
pub fn load_test_image(name: &str) -> TestResult<BitImage> {
    let path = test_data_path(name);
    bitmorph_io::read_bits(&path).map_err(|e| TestError::ImageLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // bitmorph-test is at crates/bitmorph-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a test data file
pub fn test_data_path(name: &str) -> String {
    format!("{}/tests/data/{}", workspace_root(), name)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
