use std::fs;

use chrono::NaiveDate;
use sheetkit_core::config::Config;
use sheetkit_core::{write_countdown, write_hour_grid};
use tempfile::tempdir;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn assert_pdf(bytes: &[u8]) {
    assert!(bytes.starts_with(b"%PDF"), "missing PDF header");
    assert!(bytes.len() > 500, "suspiciously small PDF");
}

#[test]
fn countdown_calendar_is_written_under_sanitized_name() {
    let temp = tempdir().expect("tempdir");
    let cfg = Config {
        output_dir: temp.path().to_path_buf(),
        ..Config::default()
    };

    let path = write_countdown(
        &cfg,
        "AAAI 2026",
        ymd(2025, 8, 1),
        Some(ymd(2025, 7, 25)),
        ymd(2025, 7, 1),
    )
    .expect("write countdown");

    assert_eq!(path, temp.path().join("AAAI_2026_countdown.pdf"));
    assert_pdf(&fs::read(&path).expect("read pdf"));
}

#[test]
fn countdown_with_past_deadline_still_produces_a_page() {
    let temp = tempdir().expect("tempdir");
    let cfg = Config {
        output_dir: temp.path().join("out"),
        ..Config::default()
    };

    let path = write_countdown(&cfg, "Old", ymd(2024, 1, 1), None, ymd(2025, 1, 1))
        .expect("write countdown");

    assert!(path.starts_with(temp.path().join("out")));
    assert_pdf(&fs::read(&path).expect("read pdf"));
}

#[test]
fn hour_grid_is_written_and_summarized() {
    let temp = tempdir().expect("tempdir");
    let cfg = Config {
        output_dir: temp.path().to_path_buf(),
        ..Config::default()
    };

    let summary = write_hour_grid(&cfg, "My_Heading.pdf", "My Heading!", 10, 0.5)
        .expect("write hour grid");

    let path = temp.path().join("My_Heading.pdf");
    assert_pdf(&fs::read(&path).expect("read pdf"));
    assert_eq!(summary.cells, 100);
    assert_eq!(summary.n, 10);
    assert!((summary.total() - 50.0).abs() < 1e-9);

    let report = summary.to_string();
    assert!(report.contains("Header Text: 'My Heading!'"));
    assert!(report.contains("Cells numbered: 100 (representing 50.0hrs at 0.5hr/cell)."));
}

#[test]
fn hour_grid_rejects_empty_grid() {
    let temp = tempdir().expect("tempdir");
    let cfg = Config {
        output_dir: temp.path().to_path_buf(),
        ..Config::default()
    };

    assert!(write_hour_grid(&cfg, "x.pdf", "x", 0, 0.5).is_err());
    assert!(!temp.path().join("x.pdf").exists());
}

#[test]
fn countdown_refuses_zone_that_skips_a_day() {
    let temp = tempdir().expect("tempdir");
    let cfg = Config {
        output_dir: temp.path().to_path_buf(),
        timezone: chrono_tz::Pacific::Kiritimati,
        ..Config::default()
    };

    let err = write_countdown(&cfg, "Far East", ymd(2025, 8, 1), None, ymd(2025, 7, 1))
        .expect_err("two-day shift");
    assert!(format!("{err:#}").contains("Pacific/Kiritimati"));
    assert!(!temp.path().join("Far_East_countdown.pdf").exists());
}
