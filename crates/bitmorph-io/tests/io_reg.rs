//! File I/O regression test
//!
//! Writes random bit images in every enabled format, reads them back and
//! checks the pixels survive. Also checks that format detection agrees with
//! the writer for each file.
//!
//! Run with:
//! ```
//! cargo test -p bitmorph-io --test io_reg
//! ```

use bitmorph_io::{ImageFormat, detect_format, read_bits, write_bits};
use bitmorph_test::{RegParams, random_bits, regout_dir};
use std::fs;

#[test]
fn io_reg() {
    let mut rp = RegParams::new("io");

    let outdir = regout_dir();
    fs::create_dir_all(&outdir).expect("Failed to create output directory");

    // Odd sizes exercise row padding in both the image and the file
    let sizes = [(1, 1), (7, 33), (64, 32), (45, 70)];
    for (n, &(w, h)) in sizes.iter().enumerate() {
        let pix1 = random_bits(w, h, 0.4, 11 + n as u64);
        for format in [ImageFormat::Pbm, ImageFormat::Png] {
            eprintln!("=== {}x{} as {:?} ===", w, h, format);
            let path = format!("{}/io_{}.{}", outdir, n, format.extension());
            write_bits(&pix1, &path, format).expect("write image");

            let detected = detect_format(&path).expect("detect format");
            rp.compare_values(1.0, if detected == format { 1.0 } else { 0.0 }, 0.0);

            let pix2 = read_bits(&path).expect("read image");
            rp.compare_bits(&pix1, &pix2);
        }
    }

    // An empty image still round-trips through PBM
    let empty = random_bits(0, 0, 0.5, 1);
    let path = format!("{}/io_empty.pbm", outdir);
    write_bits(&empty, &path, ImageFormat::Pbm).expect("write empty PBM");
    let back = read_bits(&path).expect("read empty PBM");
    rp.compare_values(0.0, (back.width() + back.height()) as f64, 0.0);

    // Golden checks for a fixed pattern
    let pattern = random_bits(40, 24, 0.5, 2024);
    rp.write_bits_and_check(&pattern, ImageFormat::Pbm)
        .expect("write pattern");

    assert!(rp.cleanup(), "io regression test failed");
}

#[test]
fn io_oversized_pbm_header_is_an_error() {
    let dir = regout_dir();
    fs::create_dir_all(&dir).expect("create output directory");
    let headers: [&[u8]; 3] = [
        b"P4\n18446744073709551615 3\n\x00",
        b"P4\n100000 100000\n\x00\x00\x00",
        b"P1\n9999999999 9999999999\n1 0 1\n",
    ];
    for (n, data) in headers.iter().enumerate() {
        let path = format!("{}/io_bad_header_{}.pbm", dir, n);
        fs::write(&path, data).expect("write bad header");
        assert!(read_bits(&path).is_err(), "header {n} was accepted");
    }
}

#[test]
fn io_missing_file_is_an_error() {
    let path = format!("{}/io_does_not_exist.pbm", regout_dir());
    assert!(read_bits(&path).is_err());
}
