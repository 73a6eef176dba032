//! Regression test parameters and checks

use crate::error::{TestError, TestResult};
use crate::{golden_dir, init_logging, regout_dir};
use bitmorph_core::BitImage;
use bitmorph_io::ImageFormat;
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// State of one regression test: its name, the running check index, the
/// mode, and every failure seen so far.
pub struct RegParams {
    /// Name of the test (e.g., "rectmorph")
    pub test_name: String,
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Start a regression test.
    ///
    /// Installs the test logger, creates the output directories and picks
    /// the mode from `REGTEST_MODE`.
    pub fn new(test_name: &str) -> Self {
        init_logging();
        let mode = RegTestMode::from_env();

        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Compare two images for exact equality
    ///
    /// On failure the message reports the size mismatch or the number of
    /// differing pixels.
    pub fn compare_bits(&mut self, expected: &BitImage, actual: &BitImage) -> bool {
        self.index += 1;

        match expected.difference(actual) {
            Ok(0) => true,
            Ok(ndiff) => {
                let msg = format!(
                    "Failure in {}_reg: image comparison for index {} - {} pixels differ",
                    self.test_name, self.index, ndiff
                );
                self.fail(msg);
                false
            }
            Err(e) => {
                let msg = format!(
                    "Failure in {}_reg: image comparison for index {} - {}",
                    self.test_name, self.index, e
                );
                self.fail(msg);
                false
            }
        }
    }

    /// Write an image to the regout directory and check it against its
    /// golden counterpart
    pub fn write_bits_and_check(&mut self, image: &BitImage, format: ImageFormat) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            format.extension()
        );

        bitmorph_io::write_bits(image, &local_path, format).map_err(|e| {
            TestError::ImageWrite {
                path: local_path.clone(),
                message: e.to_string(),
            }
        })?;

        self.check_file(&local_path)
    }

    /// Write raw data and check it against its golden counterpart
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        );

        fs::write(&local_path, data)?;
        self.check_file(&local_path)
    }

    /// Check a file against its golden counterpart
    ///
    /// In generate mode, copies the file to golden.
    /// In compare mode, compares with golden file; a missing golden file is
    /// a failure.
    /// In display mode, does nothing.
    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let ext = Path::new(local_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    let msg = format!(
                        "Failure in {}_reg: golden file not found: {} \
                         (run with REGTEST_MODE=generate to create it)",
                        self.test_name, golden_path
                    );
                    self.fail(msg);
                    return Ok(());
                }

                let local_data = fs::read(local_path)?;
                let golden_data = fs::read(&golden_path)?;

                if local_data != golden_data && !self.same_pixels(local_path, &golden_path) {
                    let msg = format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    );
                    self.fail(msg);
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Compare two image files pixel by pixel
    fn same_pixels(&self, path1: &str, path2: &str) -> bool {
        match (bitmorph_io::read_bits(path1), bitmorph_io::read_bits(path2)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Report results; `true` if every check passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("params");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert_eq!(rp.index(), 1);
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("params");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_bits_reports_difference() {
        let mut rp = RegParams::new("params");
        let a = BitImage::with_size(4, 4);
        let mut b = a.clone();
        assert!(rp.compare_bits(&a, &b));
        b.set(1, 2, true).unwrap();
        assert!(!rp.compare_bits(&a, &b));
        assert!(rp.failures()[0].contains("1 pixels differ"));
        assert!(!rp.compare_bits(&a, &BitImage::with_size(4, 5)));
    }

    #[test]
    fn test_missing_golden_is_a_failure() {
        let mut rp = RegParams::new("params_no_golden");
        rp.mode = RegTestMode::Compare;
        rp.write_data_and_check(b"no golden for this", "txt").unwrap();
        assert!(!rp.is_success());
        assert!(rp.failures()[0].contains("golden file not found"));
    }

    #[test]
    fn test_display_mode_skips_golden() {
        let mut rp = RegParams::new("params_display");
        rp.mode = RegTestMode::Display;
        rp.write_data_and_check(b"display only", "txt").unwrap();
        assert!(rp.is_success());
    }
}
