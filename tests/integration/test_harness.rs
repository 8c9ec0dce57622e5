// Test harness for integration tests
// Provides a scratch workspace with generated photos and a way to run the CLI binary

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use photomark::export::Exporter;
use photomark::watermark::{FontBook, WatermarkRenderer};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;
use tempfile::TempDir;

/// Scratch directory holding a `photos/` input folder and an `out/` target.
/// Everything is removed when the workspace is dropped.
pub struct PhotoWorkspace {
    dir: TempDir,
}

impl PhotoWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("photos")).expect("Failed to create photos dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.root().join("photos")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("out")
    }

    /// Write an opaque gradient photo; the format follows the extension.
    pub fn add_photo(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.photos_dir().join(name);
        gradient_photo(width, height)
            .save(&path)
            .expect("Failed to write photo");
        path
    }

    /// Write a file with an image extension that does not decode.
    pub fn add_corrupt_photo(&self, name: &str) -> PathBuf {
        let path = self.photos_dir().join(name);
        std::fs::write(&path, b"definitely not a jpeg").expect("Failed to write corrupt photo");
        path
    }

    /// Write a solid RGBA overlay next to the photos directory.
    pub fn add_overlay(&self, name: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
        let path = self.root().join(name);
        RgbaImage::from_pixel(width, height, Rgba(color))
            .save(&path)
            .expect("Failed to write overlay");
        path
    }

    /// Write a job file and return its path.
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        let path = self.root().join("job.yaml");
        std::fs::write(&path, yaml).expect("Failed to write job file");
        path
    }
}

pub fn gradient_photo(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Exporter backed by the embedded font only, so results do not depend on
/// the fonts installed on the machine.
pub fn exporter() -> Exporter {
    Exporter::new(renderer())
}

pub fn renderer() -> WatermarkRenderer {
    WatermarkRenderer::new(Arc::new(
        FontBook::embedded_only().expect("Embedded font must load"),
    ))
}

/// Run the photomark binary with the given arguments.
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_photomark"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run photomark binary")
}
