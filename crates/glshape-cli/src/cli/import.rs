//! Import command implementation: SVG paths to a scene file.

use std::fs;

use anyhow::{anyhow, Context, Result};

use glshape::{extract_shapes_from_svg, Bounded, Color};

use super::scene::{Scene, ShapeEntry, ShapeSpec};

/// Execute the import command.
pub fn cmd_import(args: &[String]) -> Result<()> {
    let mut svg_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(&args[i]);
                }
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            path if !path.starts_with('-') => {
                if svg_path.is_none() {
                    svg_path = Some(path);
                }
            }
            other => eprintln!("Warning: ignoring unknown option '{}'", other),
        }
        i += 1;
    }

    let Some(svg_path) = svg_path else {
        print_usage();
        return Err(anyhow!("SVG file required"));
    };

    let svg_content =
        fs::read_to_string(svg_path).with_context(|| format!("Failed to read {}", svg_path))?;
    let shapes = extract_shapes_from_svg(&svg_content)
        .with_context(|| format!("Failed to import {}", svg_path))?;

    // Canvas just large enough for every shape
    let (width, height) = shapes
        .iter()
        .map(|s| s.bounds().extent)
        .fold((1.0f64, 1.0f64), |(w, h), e| (w.max(e.x), h.max(e.y)));

    let scene = Scene {
        width: width.ceil() as u32,
        height: height.ceil() as u32,
        background: Color::WHITE,
        shapes: shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| ShapeEntry {
                name: Some(format!("path{}", i)),
                spec: ShapeSpec::from_primitive(shape),
                color: shape.color(),
                line_width: shape.line_width(),
            })
            .collect(),
        sprites: Vec::new(),
    };

    let yaml = serde_yaml::to_string(&scene).context("Failed to serialize scene")?;
    match output_path {
        Some(path) => {
            fs::write(path, yaml).with_context(|| format!("Failed to write {}", path))?;
            eprintln!("Wrote: {} ({} shapes)", path, scene.shapes.len());
        }
        None => print!("{}", yaml),
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: glshape import <input.svg> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>    Output scene file (default: stdout)");
    eprintln!();
    eprintln!("Converts every SVG subpath into a scene shape.");
}
