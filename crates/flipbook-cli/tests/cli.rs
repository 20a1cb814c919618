use image::{ColorType, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const YELLOW: [u8; 4] = [255, 255, 0, 255];

fn flipbook(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flipbook"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run flipbook")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn write_solid(path: &Path, w: u32, h: u32, c: [u8; 4]) {
    RgbaImage::from_pixel(w, h, Rgba(c))
        .save(path)
        .expect("write frame");
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn pack_then_unpack_round_trip() {
    let work = tempdir().expect("tempdir");
    let frames = work.path().join("frames");
    std::fs::create_dir(&frames).expect("mkdir");
    // written out of order on purpose; numeric order decides placement
    write_solid(&frames.join("f_3.png"), 10, 10, YELLOW);
    write_solid(&frames.join("f_1.png"), 10, 10, GREEN);
    write_solid(&frames.join("f_0.png"), 10, 10, RED);
    write_solid(&frames.join("f_2.png"), 10, 10, BLUE);
    std::fs::write(frames.join("notes.txt"), "not an image").expect("write");
    std::fs::create_dir(frames.join("nested.png")).expect("mkdir");

    let out = flipbook(work.path(), &["frames"]);
    assert!(out.status.success(), "pack failed: {:?}", out);
    let sheet = frames.join("flipbook_2x2.tga");
    assert!(sheet.is_file());
    assert!(stdout(&out).starts_with("Spritesheet created at: "));
    assert!(stdout(&out).contains("flipbook_2x2.tga"));

    let out = flipbook(work.path(), &["frames/flipbook_2x2.tga", "2:2"]);
    assert!(out.status.success(), "unpack failed: {:?}", out);
    assert_eq!(
        stdout(&out).trim_end(),
        "Unpacked 4 frames into folder: flipbook_2x2"
    );
    let unpacked = work.path().join("flipbook_2x2");
    assert_eq!(
        entries(&unpacked),
        vec![
            "frame_0000.png",
            "frame_0001.png",
            "frame_0002.png",
            "frame_0003.png"
        ]
    );
    for (i, color) in [RED, GREEN, BLUE, YELLOW].iter().enumerate() {
        let img = image::open(unpacked.join(format!("frame_{:04}.png", i)))
            .expect("open frame")
            .to_rgba8();
        assert_eq!(img.dimensions(), (10, 10));
        assert!(
            img.pixels().all(|p| p.0 == *color),
            "frame {} has wrong pixels",
            i
        );
    }
}

#[test]
fn pack_empty_folder_writes_nothing() {
    let work = tempdir().expect("tempdir");
    std::fs::write(work.path().join("readme.md"), "# frames").expect("write");
    let out = flipbook(work.path(), &["."]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        stdout(&out).trim_end(),
        "No images found in the specified folder."
    );
    assert_eq!(entries(work.path()), vec!["readme.md"]);
}

#[test]
fn unpack_three_by_two() {
    let work = tempdir().expect("tempdir");
    write_solid(&work.path().join("sheet.png"), 200, 300, BLUE);
    let out = flipbook(work.path(), &["sheet.png", "3:2"]);
    assert!(out.status.success(), "unpack failed: {:?}", out);
    let folder = work.path().join("sheet");
    let names = entries(&folder);
    assert_eq!(names.len(), 6);
    assert_eq!(names.first().map(String::as_str), Some("frame_0000.png"));
    assert_eq!(names.last().map(String::as_str), Some("frame_0005.png"));
    for n in &names {
        let img = image::open(folder.join(n)).expect("open frame");
        assert_eq!((img.width(), img.height()), (100, 100));
    }
}

#[test]
fn unpack_reuses_existing_folder() {
    let work = tempdir().expect("tempdir");
    write_solid(&work.path().join("walk.png"), 4, 2, RED);
    std::fs::create_dir(work.path().join("walk")).expect("mkdir");
    std::fs::write(work.path().join("walk").join("frame_0000.png"), "stale").expect("write");
    let out = flipbook(work.path(), &["walk.png", "1:2"]);
    assert!(out.status.success(), "unpack failed: {:?}", out);
    let img = image::open(work.path().join("walk").join("frame_0000.png")).expect("open");
    assert_eq!((img.width(), img.height()), (2, 2));
}

#[test]
fn unpack_into_out_dir() {
    let work = tempdir().expect("tempdir");
    write_solid(&work.path().join("run.png"), 8, 8, GREEN);
    let out = flipbook(work.path(), &["run.png", "2:2", "--out-dir", "exported"]);
    assert!(out.status.success(), "unpack failed: {:?}", out);
    assert_eq!(entries(&work.path().join("exported").join("run")).len(), 4);
}

#[test]
fn no_arguments_prints_usage() {
    let work = tempdir().expect("tempdir");
    let out = flipbook(work.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Usage:"));
    assert!(entries(work.path()).is_empty());
}

#[test]
fn nonexistent_path_prints_usage() {
    let work = tempdir().expect("tempdir");
    let out = flipbook(work.path(), &["missing.png", "2:2"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Invalid arguments."));
    assert!(stdout(&out).contains("Usage:"));
    assert!(entries(work.path()).is_empty());
}

#[test]
fn file_without_dimensions_prints_usage() {
    let work = tempdir().expect("tempdir");
    write_solid(&work.path().join("sheet.png"), 4, 4, RED);
    let out = flipbook(work.path(), &["sheet.png"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Usage:"));
    assert_eq!(entries(work.path()), vec!["sheet.png"]);
}

#[test]
fn malformed_dimensions_print_usage() {
    let work = tempdir().expect("tempdir");
    write_solid(&work.path().join("sheet.png"), 4, 4, RED);
    for dims in ["2x2", "a:b", "0:2"] {
        let out = flipbook(work.path(), &["sheet.png", dims]);
        assert_eq!(out.status.code(), Some(1), "dims {}", dims);
        assert!(stdout(&out).contains("Invalid dimensions"));
        assert!(stdout(&out).contains("Usage:"));
    }
    assert_eq!(entries(work.path()), vec!["sheet.png"]);
}

#[test]
fn print_layout_emits_json() {
    let work = tempdir().expect("tempdir");
    for i in 0..3 {
        write_solid(&work.path().join(format!("{}.png", i)), 5, 5, RED);
    }
    let out = flipbook(work.path(), &[".", "--print-layout"]);
    assert!(out.status.success(), "pack failed: {:?}", out);
    let text = stdout(&out);
    let json_start = text.find('{').expect("json");
    let v: serde_json::Value = serde_json::from_str(&text[json_start..]).expect("parse");
    assert_eq!(v["grid"]["rows"], 1);
    assert_eq!(v["grid"]["cols"], 3);
    assert!(work.path().join("flipbook_1x3.tga").is_file());
}

#[test]
fn pack_ignores_arguments_after_folder() {
    let work = tempdir().expect("tempdir");
    let frames = work.path().join("frames");
    std::fs::create_dir(&frames).expect("mkdir");
    write_solid(&frames.join("f_0.png"), 3, 3, RED);
    let out = flipbook(work.path(), &["frames", "2:2", "extra"]);
    assert_eq!(out.status.code(), Some(0), "pack failed: {:?}", out);
    assert!(stdout(&out).starts_with("Spritesheet created at: "));
    assert!(frames.join("flipbook_1x1.tga").is_file());
}

#[test]
fn unpack_with_extra_argument_prints_usage() {
    let work = tempdir().expect("tempdir");
    write_solid(&work.path().join("sheet.png"), 4, 4, RED);
    let out = flipbook(work.path(), &["sheet.png", "2:2", "extra"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Invalid arguments."));
    assert_eq!(entries(work.path()), vec!["sheet.png"]);
}

#[test]
fn bare_extension_file_name_is_a_frame() {
    let work = tempdir().expect("tempdir");
    write_solid(&work.path().join("f_0.png"), 2, 2, RED);
    // no extension as far as `Path` is concerned, so the format is explicit
    RgbaImage::from_pixel(2, 2, Rgba(GREEN))
        .save_with_format(work.path().join(".png"), image::ImageFormat::Png)
        .expect("write frame");
    let out = flipbook(work.path(), &["."]);
    assert!(out.status.success(), "pack failed: {:?}", out);
    assert!(work.path().join("flipbook_1x2.tga").is_file());
}

#[test]
fn unpack_keeps_rgb_frames_rgb() {
    let work = tempdir().expect("tempdir");
    RgbImage::from_pixel(4, 2, Rgb([10, 20, 30]))
        .save(work.path().join("rgb.png"))
        .expect("write sheet");
    let out = flipbook(work.path(), &["rgb.png", "1:2"]);
    assert!(out.status.success(), "unpack failed: {:?}", out);
    let frame = image::open(work.path().join("rgb").join("frame_0001.png")).expect("open");
    assert_eq!(frame.color(), ColorType::Rgb8);
    assert_eq!(frame.to_rgb8().get_pixel(1, 1).0, [10, 20, 30]);
}

#[test]
fn config_file_renames_outputs() {
    let work = tempdir().expect("tempdir");
    let frames = work.path().join("frames");
    std::fs::create_dir(&frames).expect("mkdir");
    write_solid(&frames.join("a1.png"), 2, 2, RED);
    write_solid(&frames.join("a2.png"), 2, 2, BLUE);
    std::fs::write(
        work.path().join("flipbook.json"),
        r#"{"sheet_prefix": "walk", "frame_prefix": "pose", "frame_digits": 2}"#,
    )
    .expect("write config");

    let out = flipbook(work.path(), &["frames", "--config", "flipbook.json"]);
    assert!(out.status.success(), "pack failed: {:?}", out);
    assert!(frames.join("walk_1x2.tga").is_file());

    let out = flipbook(
        work.path(),
        &["frames/walk_1x2.tga", "1:2", "--config", "flipbook.json", "--frame-format", "bmp"],
    );
    assert!(out.status.success(), "unpack failed: {:?}", out);
    assert_eq!(
        entries(&work.path().join("walk_1x2")),
        vec!["pose_00.bmp", "pose_01.bmp"]
    );
}

#[test]
fn invalid_config_fails_without_output() {
    let work = tempdir().expect("tempdir");
    write_solid(&work.path().join("f1.png"), 2, 2, RED);
    std::fs::write(work.path().join("bad.json"), r#"{"frame_digits": 0}"#).expect("write");
    let out = flipbook(work.path(), &[".", "--config", "bad.json"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("frame_digits"));
    assert_eq!(entries(work.path()), vec!["bad.json", "f1.png"]);
}

#[test]
fn print_config_shows_merged_settings() {
    let work = tempdir().expect("tempdir");
    std::fs::write(work.path().join("cfg.json"), r#"{"sheet_prefix": "run"}"#).expect("write");
    let out = flipbook(
        work.path(),
        &["--config", "cfg.json", "--sheet-format", "png", "--print-config"],
    );
    assert!(out.status.success(), "print-config failed: {:?}", out);
    let v: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("parse");
    assert_eq!(v["sheet_prefix"], "run");
    assert_eq!(v["sheet_format"], "png");
    assert_eq!(v["frame_digits"], 4);
}
