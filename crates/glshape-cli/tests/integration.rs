//! Integration tests for glshape CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SCENE: &str = r#"
width: 200
height: 200
shapes:
  - name: alpha
    type: solid_rectangle
    position: [10, 10]
    size: [40, 40]
    color: {r: 1, g: 0, b: 0}
  - name: beta
    type: solid_rectangle
    position: [30, 30]
    size: [40, 40]
  - name: far
    type: triangle
    points: [[150, 10], [190, 10], [170, 40]]
  - name: onsprite
    type: solid_rectangle
    position: [105, 105]
    size: [20, 20]
    line_width: 0
  - name: clearspot
    type: solid_rectangle
    position: [113, 113]
    size: [4, 4]
    line_width: 0
sprites:
  - name: badge
    path: badge.svg
    position: [100, 100]
"#;

/// 20x20 sprite, only the top-left 10x10 is painted.
const BADGE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
  <rect x="0" y="0" width="10" height="10" fill="blue"/>
</svg>"#;

/// Get the path to the glshape binary built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_glshape"))
}

/// A fresh directory holding the test scene and its sprite.
fn scene_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glshape-{}-{}", test, std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    fs::write(dir.join("scene.yaml"), SCENE).expect("Failed to write scene");
    fs::write(dir.join("badge.svg"), BADGE).expect("Failed to write sprite");
    dir
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

#[test]
fn kinds_command_lists_all_kinds() {
    let output = run(&["kinds"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let kinds = [
        "point",
        "point_set",
        "line_strip",
        "line_loop",
        "polygon",
        "quadrilateral",
        "triangle_fan",
    ];
    for kind in kinds {
        assert!(stdout.contains(kind), "Should list '{}' kind", kind);
    }
    assert!(stdout.contains("Solid"), "Should show the collision tier");
}

#[test]
fn help_command_shows_usage() {
    let output = run(&["help"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stderr.contains("render"), "Should mention render command");
    assert!(stderr.contains("collide"), "Should mention collide command");
    assert!(stderr.contains("probe"), "Should mention probe command");
}

#[test]
fn unknown_command_fails() {
    let output = run(&["frobnicate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command"));
}

#[test]
fn collide_reports_pairs() {
    let dir = scene_dir("collide");
    let output = run(&["collide", path_str(&dir.join("scene.yaml"))]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("alpha (solid_rectangle) <-> beta (solid_rectangle)"));
    assert!(stdout.contains("onsprite (solid_rectangle) <-> badge (sprite)"));
    assert!(stdout.contains("onsprite (solid_rectangle) <-> clearspot (solid_rectangle)"));
    assert!(!stdout.contains("far"), "Distant triangle should not collide");
    assert!(
        !stdout.contains("clearspot (solid_rectangle) <-> badge"),
        "Transparent pixels should not collide"
    );
    assert_eq!(stdout.lines().count(), 3);
}

#[test]
fn collide_json_with_strict_bounds() {
    let dir = scene_dir("collide-json");
    let scene = dir.join("scene.yaml");

    let output = run(&["collide", path_str(&scene), "--json", "--strict-bounds"]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");

    assert_eq!(json["entities"], 6);
    assert_eq!(json["pairs"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["pairs"][0]["a"], "alpha");
    assert_eq!(json["pairs"][0]["b"], "beta");
    assert!(json["culled"].as_u64().unwrap_or(0) > 0, "Strict bounds should cull distant pairs");

    let plain = run(&["collide", path_str(&scene), "--json"]);
    let plain: serde_json::Value =
        serde_json::from_slice(&plain.stdout).expect("Output should be JSON");
    assert_eq!(plain["culled"], 0);
    assert_eq!(plain["checked"], 15);
    assert_eq!(plain["pairs"], json["pairs"]);
}

#[test]
fn probe_lists_containing_entities() {
    let dir = scene_dir("probe");
    let scene = dir.join("scene.yaml");

    let output = run(&["probe", path_str(&scene), "40", "40"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("alpha"));
    assert!(stdout.contains("beta"));
    assert!(!stdout.contains("far"));

    let output = run(&["probe", path_str(&scene), "107", "107", "--json"]);
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    let names: Vec<&str> = json["hits"]
        .as_array()
        .expect("hits should be an array")
        .iter()
        .filter_map(|h| h["name"].as_str())
        .collect();
    assert_eq!(names, vec!["onsprite", "badge"]);
}

#[test]
fn probe_accepts_negative_coordinates() {
    let dir = scene_dir("probe-negative");
    let output = run(&["probe", path_str(&dir.join("scene.yaml")), "-5", "-5"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).trim().is_empty());
}

#[test]
fn render_writes_png() {
    let dir = scene_dir("render");
    let png = dir.join("out.png");
    let output = run(&["render", path_str(&dir.join("scene.yaml")), "-o", path_str(&png)]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let img = image::open(&png).expect("Should write a readable PNG").to_rgba8();
    assert_eq!(img.dimensions(), (200, 200));
    assert_eq!(img.get_pixel(20, 20).0, [255, 0, 0, 255], "alpha is red");
    assert_eq!(img.get_pixel(102, 102).0, [0, 0, 255, 255], "sprite drawn on top");
    assert_eq!(img.get_pixel(190, 190).0, [255, 255, 255, 255], "background is white");
}

#[test]
fn render_without_focus_draws_nothing() {
    let dir = scene_dir("render-nofocus");
    let png = dir.join("blank.png");
    let scene = dir.join("scene.yaml");
    let output = run(&["render", path_str(&scene), "-o", path_str(&png), "--no-focus"]);
    assert!(output.status.success());

    let img = image::open(&png).expect("Should write a readable PNG").to_rgba8();
    assert_eq!(img.get_pixel(20, 20).0, [255, 255, 255, 255]);
    assert_eq!(img.get_pixel(102, 102).0, [255, 255, 255, 255]);
}

#[test]
fn import_converts_svg_to_scene() {
    let dir = scene_dir("import");
    let svg = dir.join("input.svg");
    fs::write(
        &svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
            <rect x="10" y="10" width="30" height="30" fill="red"/>
            <polyline points="50,50 60,70 80,50" fill="none" stroke="black" stroke-width="2"/>
        </svg>"#,
    )
    .expect("Failed to write SVG");
    let out = dir.join("imported.yaml");

    let output = run(&["import", path_str(&svg), "-o", path_str(&out)]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let yaml = fs::read_to_string(&out).expect("Should write scene file");
    assert!(yaml.contains("type: polygon"));
    assert!(yaml.contains("type: line_strip"));

    // The imported scene is itself a valid scene
    let output = run(&["collide", path_str(&out)]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn bench_command_runs() {
    let output = run(&["bench", "-n", "30", "--seed", "7"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BENCHMARK"), "Should show benchmark header");
    assert!(stdout.contains("Pairs: 435"), "30 shapes make 435 pairs");
    assert!(stdout.contains("Time"), "Should show timing info");
}

#[test]
fn missing_scene_reports_error() {
    let output = run(&["collide", "/nonexistent/scene.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read scene file"));
}
