//! End-to-end tests for `slice` runs driven through the CLI handlers.
//!
//! Each test writes a small PNG into a temp dir, slices it with a missing config
//! file (so built-in defaults apply), and inspects the document on disk.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use mural_slicer::cli::{run_slice, Mode, SliceArgs};
use mural_slicer::preview::parse_document;
use mural_slicer::slicing::SlicingMode;
use mural_slicer::Error;

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn save(&self, name: &str, image: &RgbaImage) -> PathBuf {
        let path = self.path(name);
        image.save(&path).unwrap();
        path
    }

    fn config(&self) -> PathBuf {
        self.path("absent-config.toml")
    }

    fn slice(&self, args: SliceArgs) -> Result<String, Error> {
        let output = args.output.clone().unwrap();
        run_slice(&args, Some(&self.config()))?;
        Ok(std::fs::read_to_string(output).unwrap())
    }
}

fn args(image: &Path, output: &Path) -> SliceArgs {
    SliceArgs {
        image: image.to_path_buf(),
        output: Some(output.to_path_buf()),
        ..Default::default()
    }
}

/// 8x2, transparent except an opaque red pixel at (0, 0).
fn red_corner_image() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(8, 2, CLEAR);
    img.put_pixel(0, 0, RED);
    img
}

#[test]
fn test_multi_velocity_document() {
    let ws = Workspace::new();
    let image = ws.save("mural.png", &red_corner_image());
    let output = ws.path("gcode.txt");

    let text = ws
        .slice(SliceArgs {
            palette: Some(vec!["#ff0000".to_string(), "#00ff00".to_string()]),
            ..args(&image, &output)
        })
        .unwrap();

    assert!(text.starts_with("//this is the start of the gcode\n\n\n"));
    assert!(text.contains(
        "\n-- MULTI-COLOR INDEX MAPPING --\nIndex 1 => #ff0000\nIndex 2 => #00ff00\n-- END OF COLOR MAPPING --\n\n"
    ));
    assert_eq!(text.matches("-- MULTI-COLOR INDEX MAPPING --").count(), 1);

    assert!(text.contains(
        "number of drawn columns = 2\npulley spacing = 1.265\nBEGIN MULTI-COLOR VELOCITY SLICING\n"
    ));
    assert!(text.contains(
        "STRIPE - column #0\nstarting/ending position pixel values:  (-2,2),(-2,0)\npattern: [\"1xxx\", \"xxxx\"]\ndrop: 0.004\n"
    ));
    assert!(text.contains(
        "STRIPE - column #1\nstarting/ending position pixel values:  (2,2),(2,0)\npattern: [\"xxxx\", \"xxxx\"]\ndrop: 0.004\n"
    ));
    assert!(text.ends_with("END MULTI-COLOR VELOCITY SLICING\n"));

    let mapping_at = text.find("-- MULTI-COLOR INDEX MAPPING --").unwrap();
    let begin_at = text.find("BEGIN MULTI-COLOR VELOCITY SLICING").unwrap();
    assert!(mapping_at < begin_at);
}

#[test]
fn test_multi_velocity_round_trips_through_preview_parser() {
    let ws = Workspace::new();
    let image = ws.save("mural.png", &red_corner_image());
    let output = ws.path("gcode.txt");

    let text = ws
        .slice(SliceArgs {
            palette: Some(vec!["#FF0000".to_string(), "#00ff00".to_string()]),
            ..args(&image, &output)
        })
        .unwrap();

    let doc = parse_document(&text).unwrap();
    assert_eq!(doc.mapping.get(&'1').map(String::as_str), Some("#ff0000"));
    assert_eq!(doc.mapping.get(&'2').map(String::as_str), Some("#00ff00"));
    assert_eq!(doc.column_count, Some(2));
    assert_eq!(doc.stripe_count(), 2);
    assert_eq!(doc.sweeps[0].stripes[0].rows, vec!["1xxx", "xxxx"]);
}

#[test]
fn test_slice_with_preview_hook_writes_png() {
    let ws = Workspace::new();
    let image = ws.save("mural.png", &red_corner_image());
    let output = ws.path("gcode.txt");
    let preview = ws.path("preview.png");

    ws.slice(SliceArgs {
        preview: Some(preview.clone()),
        ..args(&image, &output)
    })
    .unwrap();

    let rendered = image::open(&preview).unwrap().into_rgb8();
    assert_eq!(rendered.dimensions(), (8, 2));
    assert_eq!(rendered.get_pixel(0, 0), &image::Rgb([255, 0, 0]));
    assert_eq!(rendered.get_pixel(1, 0), &image::Rgb([255, 255, 255]));
}

#[test]
fn test_mono_velocity_sweeps_once_per_color() {
    let ws = Workspace::new();
    let mut img = RgbaImage::from_pixel(8, 1, CLEAR);
    img.put_pixel(0, 0, RED);
    img.put_pixel(5, 0, BLUE);
    let image = ws.save("mural.png", &img);
    let output = ws.path("gcode.txt");

    let text = ws
        .slice(SliceArgs {
            mode: Some(Mode::MonoVelocity),
            ..args(&image, &output)
        })
        .unwrap();

    assert!(!text.contains("INDEX MAPPING"));
    assert!(text.contains("BEGIN MONO-COLOR VELOCITY SLICING"));
    assert_eq!(text.matches("change color to:").count(), 2);
    assert_eq!(text.matches("STRIPE - column #0").count(), 2);

    let doc = parse_document(&text).unwrap();
    assert_eq!(doc.sweeps.len(), 2);
    assert_eq!(doc.sweeps[0].color.as_deref(), Some("#ff0000"));
    assert_eq!(doc.sweeps[0].stripes[0].rows, vec!["1xxx"]);
    assert_eq!(doc.sweeps[0].stripes[1].rows, vec!["xxxx"]);
    assert_eq!(doc.sweeps[1].color.as_deref(), Some("#0000ff"));
    assert_eq!(doc.sweeps[1].stripes[1].rows, vec!["x1xx"]);
}

#[test]
fn test_position_mode_flips_rows() {
    let ws = Workspace::new();
    let mut img = RgbaImage::from_pixel(2, 2, CLEAR);
    img.put_pixel(0, 0, RED);
    img.put_pixel(1, 1, RED);
    img.put_pixel(1, 0, BLUE);
    let image = ws.save("mural.png", &img);
    let output = ws.path("gcode.txt");

    let text = ws
        .slice(SliceArgs {
            mode: Some(Mode::Position),
            ..args(&image, &output)
        })
        .unwrap();

    assert!(text.contains("number of drawn columns = 2\n"));
    assert!(text.contains("BEGIN POSITION SLICING\nchange color to:#ff0000\n"));
    assert!(text.ends_with("END POSITION SLICING\n"));

    let doc = parse_document(&text).unwrap();
    let coords: Vec<(u32, u32, &str)> = doc
        .positions
        .iter()
        .map(|p| (p.x, p.y, p.color.as_str()))
        .collect();
    assert_eq!(
        coords,
        vec![(0, 1, "#ff0000"), (1, 0, "#ff0000"), (1, 1, "#0000ff")]
    );
}

#[test]
fn test_too_many_colors_fails_before_writing() {
    let ws = Workspace::new();
    let mut img = RgbaImage::new(10, 1);
    for x in 0..10 {
        img.put_pixel(x, 0, Rgba([x as u8 * 20 + 1, 10, 10, 255]));
    }
    let image = ws.save("mural.png", &img);
    let output = ws.path("gcode.txt");

    let err = ws.slice(args(&image, &output)).unwrap_err();
    assert!(matches!(err, Error::Slice(_)));
    assert!(!output.exists());
}

#[test]
fn test_infeasible_geometry_fails_before_writing() {
    let ws = Workspace::new();
    let image = ws.save("mural.png", &red_corner_image());
    let output = ws.path("gcode.txt");

    let err = ws
        .slice(SliceArgs {
            nozzles: Some(0),
            ..args(&image, &output)
        })
        .unwrap_err();
    assert!(matches!(err, Error::Slice(_)));
    assert!(!output.exists());

    let err = ws
        .slice(SliceArgs {
            pixel_size: Some(1.0),
            ..args(&image, &output)
        })
        .unwrap_err();
    assert!(err.to_string().contains("geometry"));
    assert!(!output.exists());
}

#[test]
fn test_missing_image_names_the_path() {
    let ws = Workspace::new();
    let output = ws.path("gcode.txt");
    let err = ws
        .slice(args(&ws.path("nowhere.png"), &output))
        .unwrap_err();
    assert!(matches!(err, Error::Source(_)));
    assert!(err.to_string().contains("nowhere.png"));
}

#[test]
fn test_resize_before_slicing() {
    let ws = Workspace::new();
    let image = ws.save("mural.png", &RgbaImage::from_pixel(16, 4, RED));
    let output = ws.path("gcode.txt");

    let summary = run_slice(
        &SliceArgs {
            resize: Some(8),
            ..args(&image, &output)
        },
        Some(&ws.config()),
    )
    .unwrap();

    assert_eq!(summary.mode, SlicingMode::MultiVelocity);
    assert_eq!(summary.columns, 2);
    assert_eq!(summary.stripes, 2);
    assert_eq!(summary.output.as_deref(), Some(output.as_path()));

    let doc = parse_document(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc.sweeps[0].stripes[0].rows, vec!["1111", "1111"]);
}

#[test]
fn test_config_file_values_apply() {
    let ws = Workspace::new();
    let image = ws.save("mural.png", &red_corner_image());
    let output = ws.path("from-config.txt");
    let config = ws.path("config.toml");
    std::fs::write(
        &config,
        format!(
            "[geometry]\nnozzles = 2\n\n[slicing]\nmode = \"mono-velocity\"\n\n[output]\npath = {:?}\n",
            output.display().to_string()
        ),
    )
    .unwrap();

    let summary = run_slice(
        &SliceArgs {
            image: image.clone(),
            ..Default::default()
        },
        Some(&config),
    )
    .unwrap();

    assert_eq!(summary.mode, SlicingMode::MonoVelocity);
    assert_eq!(summary.columns, 4);
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("pattern: [\"1x\", \"xx\"]"));
}
