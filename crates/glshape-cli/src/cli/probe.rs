//! Probe command implementation.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use glshape::{Point, DEFAULT_ALPHA_THRESHOLD};

use super::scene::{scene_dir, Scene};

/// JSON output of the probe command.
#[derive(Debug, Serialize)]
struct JsonProbe {
    point: Point,
    hits: Vec<JsonHit>,
}

#[derive(Debug, Serialize)]
struct JsonHit {
    name: String,
    kind: String,
}

/// Execute the probe command.
pub fn cmd_probe(args: &[String]) -> Result<()> {
    let mut positional: Vec<&str> = Vec::new();
    let mut json = false;
    let mut threshold = DEFAULT_ALPHA_THRESHOLD;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => json = true,
            "-t" | "--threshold" => {
                i += 1;
                if i < args.len() {
                    threshold = args[i]
                        .parse()
                        .with_context(|| format!("Invalid alpha threshold '{}'", args[i]))?;
                }
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            // Negative coordinates are positional too
            arg if !arg.starts_with('-') || arg.parse::<f64>().is_ok() => positional.push(arg),
            other => eprintln!("Warning: ignoring unknown option '{}'", other),
        }
        i += 1;
    }

    let &[scene_path, x, y] = positional.as_slice() else {
        print_usage();
        return Err(anyhow!("expected <scene> <x> <y>"));
    };
    let point = Point::new(
        x.parse().with_context(|| format!("Invalid x coordinate '{}'", x))?,
        y.parse().with_context(|| format!("Invalid y coordinate '{}'", y))?,
    );

    let scene = Scene::load(scene_path)?;
    let entities = scene.build(&scene_dir(Path::new(scene_path)))?;

    let hits: Vec<_> = entities
        .iter()
        .filter(|entity| entity.contains(point, threshold))
        .collect();

    if json {
        let output = JsonProbe {
            point,
            hits: hits
                .iter()
                .map(|e| JsonHit { name: e.name.clone(), kind: e.kind_label() })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for entity in &hits {
        println!("{} ({})", entity.name, entity.kind_label());
    }
    eprintln!("{} of {} entities contain ({}, {})", hits.len(), entities.len(), point.x, point.y);
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: glshape probe <scene.yaml> <x> <y> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json                 Output JSON instead of text");
    eprintln!("  -t, --threshold <n>    Alpha threshold for sprites, 0-255 (default: 0)");
    eprintln!();
    eprintln!("Lists the shapes and sprites whose content contains the point.");
}
