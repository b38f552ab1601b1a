//! glshape - inspect, render and collide 2D shape scenes
//!
//! Usage:
//!   glshape kinds                        List shape kinds
//!   glshape render <scene> [-o out.png]  Draw a scene to PNG
//!   glshape collide <scene> [--json]     Report colliding pairs
//!   glshape probe <scene> <x> <y>        Which entities contain a point
//!   glshape bench [-n count]             Time all-pairs collision
//!   glshape import <svg> [-o scene.yaml] Convert SVG paths to a scene

mod cli;

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use tracing::Level;

use glshape::ShapeKind;

use cli::{cmd_bench, cmd_collide, cmd_import, cmd_probe, cmd_render};

fn main() -> ExitCode {
    let mut args: Vec<String> = env::args().collect();

    // -v / --verbose may appear anywhere
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    args.retain(|a| a != "-v" && a != "--verbose");

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let prog = args.first().map(String::as_str).unwrap_or("glshape");
    let Some(command) = args.get(1) else {
        print_usage(prog);
        return Ok(());
    };

    let rest = &args[2..];
    match command.as_str() {
        "kinds" => {
            cmd_kinds();
            Ok(())
        }
        "render" => cmd_render(rest),
        "collide" => cmd_collide(rest),
        "probe" => cmd_probe(rest),
        "bench" => cmd_bench(rest),
        "import" => cmd_import(rest),
        "help" | "--help" | "-h" => {
            print_usage(prog);
            Ok(())
        }
        other => {
            print_usage(prog);
            Err(anyhow::anyhow!("unknown command '{}'", other))
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("glshape - 2D shape collision and rendering");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} kinds", prog);
    eprintln!("  {} render <scene> [-o out.png] [--no-focus]", prog);
    eprintln!("  {} collide <scene> [--json] [-t threshold] [--strict-bounds]", prog);
    eprintln!("  {} probe <scene> <x> <y> [--json] [-t threshold]", prog);
    eprintln!("  {} bench [-n count] [--seed s]", prog);
    eprintln!("  {} import <svg> [-o scene.yaml]", prog);
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  -v, --verbose          Debug logging on stderr");
    eprintln!();
    eprintln!("Scenes are YAML files (JSON if the name ends in .json) listing");
    eprintln!("shapes and image sprites. See `{} import` for a starting point.", prog);
}

fn cmd_kinds() {
    println!("Available shape kinds:");
    for kind in ShapeKind::all() {
        println!(
            "  {:<14} {:<9} {:?}",
            kind.name(),
            format!("{:?}", kind.shape_type()),
            kind.topology()
        );
    }
}
