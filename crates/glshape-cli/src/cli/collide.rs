//! Collide command implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::debug;

use glshape::DEFAULT_ALPHA_THRESHOLD;

use super::scene::{scene_dir, Entity, Scene};

/// A colliding pair in JSON output format.
#[derive(Debug, Serialize)]
pub struct JsonPair {
    pub a: String,
    pub b: String,
}

/// JSON output of the collide command.
#[derive(Debug, Serialize)]
struct JsonCollisions {
    entities: usize,
    checked: usize,
    culled: usize,
    pairs: Vec<JsonPair>,
}

/// Result of testing every pair of entities once.
pub struct PairReport {
    pub pairs: Vec<(usize, usize)>,
    pub checked: usize,
    pub culled: usize,
}

/// Test every unordered pair.
///
/// With `strict_bounds`, pairs whose boxes do not strictly overlap are
/// skipped before the collision query runs.
pub fn colliding_pairs(
    entities: &[Entity],
    alpha_threshold: u8,
    strict_bounds: bool,
) -> PairReport {
    let mut report = PairReport { pairs: Vec::new(), checked: 0, culled: 0 };
    let bounds: Vec<_> = entities.iter().map(Entity::bounds).collect();

    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            if strict_bounds && !bounds[i].overlaps(&bounds[j]) {
                report.culled += 1;
                continue;
            }
            report.checked += 1;
            if entities[i].collides(&entities[j], alpha_threshold) {
                debug!(a = %entities[i].name, b = %entities[j].name, "collision");
                report.pairs.push((i, j));
            }
        }
    }
    report
}

/// Execute the collide command.
pub fn cmd_collide(args: &[String]) -> Result<()> {
    let mut scene_path: Option<&str> = None;
    let mut json = false;
    let mut threshold = DEFAULT_ALPHA_THRESHOLD;
    let mut strict_bounds = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => json = true,
            "--strict-bounds" => strict_bounds = true,
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
            path if !path.starts_with('-') => {
                if scene_path.is_none() {
                    scene_path = Some(path);
                }
            }
            other => eprintln!("Warning: ignoring unknown option '{}'", other),
        }
        i += 1;
    }

    let Some(scene_path) = scene_path else {
        print_usage();
        return Err(anyhow!("scene file required"));
    };

    let scene = Scene::load(scene_path)?;
    let entities = scene.build(&scene_dir(Path::new(scene_path)))?;

    let start = Instant::now();
    let report = colliding_pairs(&entities, threshold, strict_bounds);
    let elapsed = start.elapsed();

    if json {
        let output = JsonCollisions {
            entities: entities.len(),
            checked: report.checked,
            culled: report.culled,
            pairs: report
                .pairs
                .iter()
                .map(|&(a, b)| JsonPair {
                    a: entities[a].name.clone(),
                    b: entities[b].name.clone(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for &(a, b) in &report.pairs {
        println!(
            "{} ({}) <-> {} ({})",
            entities[a].name,
            entities[a].kind_label(),
            entities[b].name,
            entities[b].kind_label()
        );
    }
    eprintln!(
        "{} collisions among {} entities ({} pairs checked, {} culled) in {:.3}ms",
        report.pairs.len(),
        entities.len(),
        report.checked,
        report.culled,
        elapsed.as_secs_f64() * 1000.0
    );
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: glshape collide <scene.yaml> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --json                 Output JSON instead of text");
    eprintln!("  -t, --threshold <n>    Alpha threshold for sprites, 0-255 (default: 0)");
    eprintln!("  --strict-bounds        Skip pairs whose boxes do not strictly overlap");
    eprintln!();
    eprintln!("Reports every pair of shapes and sprites whose content collides.");
}
