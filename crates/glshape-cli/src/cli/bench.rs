//! Bench command implementation.
//!
//! Builds a random scene and times the all-pairs collision queries.

use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use glshape::{Bounded, Point, PrimitiveShape, Shape, SolidCircle, SolidRectangle};

use super::scene::{Body, BuiltShape, Entity};

const DEFAULT_COUNT: usize = 200;
const DEFAULT_SEED: u64 = 42;
const FIELD_SIZE: f64 = 1000.0;

fn random_point(rng: &mut StdRng) -> Point {
    Point::new(rng.random_range(0.0..FIELD_SIZE), rng.random_range(0.0..FIELD_SIZE))
}

fn near(rng: &mut StdRng, origin: Point, spread: f64) -> Point {
    origin + Point::new(rng.random_range(-spread..spread), rng.random_range(-spread..spread))
}

/// One random shape: rectangles, circles, triangles, polygons, lines or points.
pub fn random_shape(rng: &mut StdRng) -> BuiltShape {
    let origin = random_point(rng);
    match rng.random_range(0..6) {
        0 => {
            let size = Point::new(rng.random_range(5.0..80.0), rng.random_range(5.0..80.0));
            BuiltShape::SolidRectangle(SolidRectangle::new(origin, size))
        }
        1 => BuiltShape::SolidCircle(SolidCircle::new(origin, rng.random_range(3.0..40.0))),
        2 => BuiltShape::Primitive(PrimitiveShape::triangle(
            origin,
            near(rng, origin, 50.0),
            near(rng, origin, 50.0),
        )),
        3 => {
            let count = rng.random_range(3..9);
            let points: Vec<Point> = (0..count).map(|_| near(rng, origin, 60.0)).collect();
            // count >= 3, never empty
            match PrimitiveShape::polygon(points) {
                Ok(polygon) => BuiltShape::Primitive(polygon),
                Err(_) => BuiltShape::Primitive(PrimitiveShape::point(origin)),
            }
        }
        4 => BuiltShape::Primitive(PrimitiveShape::line(origin, near(rng, origin, 100.0))),
        _ => BuiltShape::Primitive(PrimitiveShape::point(origin)),
    }
}

/// Execute the bench command.
pub fn cmd_bench(args: &[String]) -> Result<()> {
    let mut count = DEFAULT_COUNT;
    let mut seed = DEFAULT_SEED;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--count" => {
                i += 1;
                if i < args.len() {
                    count = args[i]
                        .parse()
                        .with_context(|| format!("Invalid count '{}'", args[i]))?;
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().with_context(|| format!("Invalid seed '{}'", args[i]))?;
                }
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => eprintln!("Warning: ignoring unknown option '{}'", other),
        }
        i += 1;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let start_build = Instant::now();
    let entities: Vec<Entity> = (0..count)
        .map(|i| Entity {
            name: format!("shape{}", i),
            body: Body::Shape(random_shape(&mut rng)),
        })
        .collect();
    let build_time = start_build.elapsed();

    let shapes: Vec<&dyn Shape> = entities
        .iter()
        .filter_map(|e| match &e.body {
            Body::Shape(shape) => Some(shape.as_shape()),
            Body::Sprite(_) => None,
        })
        .collect();

    let mut pairs = 0usize;
    let mut broad_passes = 0usize;
    let mut strict_passes = 0usize;
    let mut collisions = 0usize;

    let start = Instant::now();
    for a in 0..shapes.len() {
        for b in (a + 1)..shapes.len() {
            pairs += 1;
            let (ba, bb) = (shapes[a].bounds(), shapes[b].bounds());
            if ba.bounds_collide(&bb) {
                broad_passes += 1;
            }
            if ba.overlaps(&bb) {
                strict_passes += 1;
            }
            if shapes[a].content_collides(shapes[b]) {
                collisions += 1;
            }
        }
    }
    let elapsed = start.elapsed();

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  GLSHAPE BENCHMARK: ALL-PAIRS COLLISION");
    println!("═══════════════════════════════════════════════");
    println!("  Shapes: {} (seed {})", shapes.len(), seed);
    println!("  Build time: {:?}", build_time);
    println!("  Pairs: {}", pairs);
    println!("  Broad phase passes: {}", broad_passes);
    println!("  Strict overlap passes: {}", strict_passes);
    println!("  Collisions: {}", collisions);
    println!("  Time: {:?}", elapsed);
    println!("  Time (ms): {:.2}", elapsed.as_secs_f64() * 1000.0);
    if pairs > 0 {
        println!("  Avg per pair: {:.3}µs", elapsed.as_secs_f64() * 1e6 / pairs as f64);
    }
    println!("═══════════════════════════════════════════════");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: glshape bench [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --count <n>    Number of random shapes (default: {})", DEFAULT_COUNT);
    eprintln!("  --seed <n>         Random seed (default: {})", DEFAULT_SEED);
    eprintln!();
    eprintln!("Times content collision over every pair of random shapes.");
}

// ============================================================================
// TESTS
// ============================================================================
