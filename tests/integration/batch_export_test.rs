// Batch export integration tests
// Drive whole batches through Exporter and the CLI binary against a scratch directory

use super::test_harness::{exporter, run_cli, PhotoWorkspace};
use photomark::error::ErrorKind;
use photomark::export::{ExportError, ExportSpec, NamingMode, OutputFormat, ScaleMode};
use photomark::sources::collect_sources;
use photomark::watermark::{WatermarkMode, WatermarkSpec};
use std::path::PathBuf;

fn export_spec(ws: &PhotoWorkspace) -> ExportSpec {
    ExportSpec {
        output_dir: Some(ws.output_dir()),
        naming_mode: NamingMode::Suffix,
        suffix: "_wm".into(),
        ..ExportSpec::default()
    }
}

#[test]
fn test_bad_image_does_not_stop_the_batch() {
    let ws = PhotoWorkspace::new();
    let sources = vec![
        ws.add_photo("a.png", 120, 80),
        ws.add_corrupt_photo("b.jpg"),
        ws.add_photo("c.png", 120, 80),
    ];

    let report = exporter()
        .export_all(&sources, &WatermarkSpec::default(), &export_spec(&ws))
        .unwrap();

    assert_eq!(
        report.exported,
        vec![ws.output_dir().join("a_wm.png"), ws.output_dir().join("c_wm.png")]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file_name, "b.jpg");
    assert!(!report.is_success());
    assert!(!ws.output_dir().join("b_wm.jpg").exists());
}

#[test]
fn test_vanished_source_is_reported_not_found() {
    let ws = PhotoWorkspace::new();
    let sources = vec![
        ws.add_photo("a.png", 50, 50),
        ws.photos_dir().join("gone.png"),
    ];

    let report = exporter()
        .export_all(&sources, &WatermarkSpec::default(), &export_spec(&ws))
        .unwrap();

    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.failures[0].file_name, "gone.png");
    assert_eq!(report.failures[0].kind, ErrorKind::ResourceNotFound);
}

#[test]
fn test_missing_overlay_fails_each_image_without_aborting() {
    let ws = PhotoWorkspace::new();
    let sources = vec![
        ws.add_photo("a.png", 60, 40),
        ws.add_photo("b.png", 60, 40),
        ws.add_photo("c.png", 60, 40),
    ];
    let watermark = WatermarkSpec {
        mode: WatermarkMode::Image,
        image_path: Some(ws.root().join("no-logo.png")),
        ..WatermarkSpec::default()
    };

    let report = exporter()
        .export_all(&sources, &watermark, &export_spec(&ws))
        .unwrap();

    assert!(report.exported.is_empty());
    assert_eq!(report.failures.len(), 3);
    assert!(report
        .failures
        .iter()
        .all(|f| f.kind == ErrorKind::ResourceNotFound));
}

#[test]
fn test_output_dir_equal_to_source_dir_is_rejected_up_front() {
    let ws = PhotoWorkspace::new();
    let sources = vec![ws.add_photo("a.png", 20, 20)];
    let export = ExportSpec {
        output_dir: Some(ws.photos_dir()),
        ..ExportSpec::default()
    };

    let err = exporter()
        .export_all(&sources, &WatermarkSpec::default(), &export)
        .unwrap_err();
    assert!(matches!(err, ExportError::InvalidConfiguration(_)));

    let names: Vec<_> = std::fs::read_dir(ws.photos_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn test_missing_output_dir_is_rejected() {
    let ws = PhotoWorkspace::new();
    let sources = vec![ws.add_photo("a.png", 20, 20)];
    let err = exporter()
        .export_all(&sources, &WatermarkSpec::default(), &ExportSpec::default())
        .unwrap_err();
    assert!(matches!(err, ExportError::InvalidConfiguration(_)));
}

#[test]
fn test_percent_scaling_halves_dimensions() {
    let ws = PhotoWorkspace::new();
    let sources = vec![ws.add_photo("wide.png", 200, 100)];
    let export = ExportSpec {
        scale_mode: ScaleMode::Percent,
        scale_value: 50,
        ..export_spec(&ws)
    };

    let report = exporter()
        .export_all(&sources, &WatermarkSpec::default(), &export)
        .unwrap();

    let written = image::open(&report.exported[0]).unwrap();
    assert_eq!((written.width(), written.height()), (100, 50));
}

#[test]
fn test_width_scaling_keeps_aspect_ratio() {
    let ws = PhotoWorkspace::new();
    let sources = vec![ws.add_photo("wide.png", 400, 200)];
    let export = ExportSpec {
        scale_mode: ScaleMode::Width,
        scale_value: 100,
        ..export_spec(&ws)
    };

    let report = exporter()
        .export_all(&sources, &WatermarkSpec::default(), &export)
        .unwrap();

    let written = image::open(&report.exported[0]).unwrap();
    assert_eq!((written.width(), written.height()), (100, 50));
}

#[test]
fn test_jpeg_target_is_written_without_alpha() {
    let ws = PhotoWorkspace::new();
    let sources = vec![ws.add_photo("photo.png", 64, 48)];
    let export = ExportSpec {
        output_format: OutputFormat::Jpeg,
        jpeg_quality: 90,
        ..export_spec(&ws)
    };

    let report = exporter()
        .export_all(&sources, &WatermarkSpec::default(), &export)
        .unwrap();

    assert_eq!(report.exported, vec![ws.output_dir().join("photo_wm.jpg")]);
    let written = image::open(&report.exported[0]).unwrap();
    assert_eq!(written.color(), image::ColorType::Rgb8);
    assert_eq!((written.width(), written.height()), (64, 48));
}

#[test]
fn test_prefix_naming_and_auto_format() {
    let ws = PhotoWorkspace::new();
    let sources = vec![ws.add_photo("shot.jpg", 32, 32), ws.add_photo("scan.bmp", 32, 32)];
    let export = ExportSpec {
        naming_mode: NamingMode::Prefix,
        prefix: "wm_".into(),
        ..export_spec(&ws)
    };

    let report = exporter()
        .export_all(&sources, &WatermarkSpec::default(), &export)
        .unwrap();

    assert_eq!(
        report.exported,
        vec![
            ws.output_dir().join("wm_shot.jpg"),
            ws.output_dir().join("wm_scan.png"),
        ]
    );
}

#[test]
fn test_directory_sources_are_collected_in_name_order() {
    let ws = PhotoWorkspace::new();
    ws.add_photo("b.png", 8, 8);
    ws.add_photo("a.jpg", 8, 8);
    std::fs::write(ws.photos_dir().join("notes.txt"), "skip me").unwrap();

    let sources = collect_sources(&[ws.photos_dir()]);
    let names: Vec<PathBuf> = sources
        .iter()
        .map(|p| PathBuf::from(p.file_name().unwrap()))
        .collect();
    assert_eq!(names, vec![PathBuf::from("a.jpg"), PathBuf::from("b.png")]);
}

#[test]
fn test_cli_export_reports_partial_failure() {
    let ws = PhotoWorkspace::new();
    ws.add_photo("a.png", 40, 30);
    ws.add_corrupt_photo("b.jpg");
    let config = ws.write_config("watermark:\n  text: CLI\nexport:\n  naming_mode: original\n");
    let out_dir = ws.output_dir();

    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "export",
        "--output-dir",
        out_dir.to_str().unwrap(),
        ws.photos_dir().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("b.jpg"), "stderr: {}", stderr);
    assert!(out_dir.join("a.png").exists());
}

#[test]
fn test_cli_rejects_invalid_job_file() {
    let ws = PhotoWorkspace::new();
    ws.add_photo("a.png", 10, 10);
    let config = ws.write_config("watermark:\n  color: \"#xyz\"\n");

    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "export",
        "--output-dir",
        ws.output_dir().to_str().unwrap(),
        ws.photos_dir().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(!ws.output_dir().exists());
}
