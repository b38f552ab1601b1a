//! Render command implementation.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use glshape::{Drawable, PixmapContext, RenderContext};

use super::scene::{scene_dir, Body, Scene};

/// Execute the render command.
pub fn cmd_render(args: &[String]) -> Result<()> {
    let mut scene_path: Option<&str> = None;
    let mut output_path = "scene.png";
    let mut focus = true;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = &args[i];
                }
            }
            "--no-focus" => focus = false,
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
    let mut entities = scene.build(&scene_dir(Path::new(scene_path)))?;

    let mut context = PixmapContext::new(scene.width, scene.height).ok_or_else(|| {
        anyhow!("canvas must be at least 1x1, got {}x{}", scene.width, scene.height)
    })?;
    context.clear(scene.background);
    context.set_focus(focus);

    for entity in &mut entities {
        if let Body::Sprite(image) = &mut entity.body {
            image.attach(&context);
        }
    }

    let mut drawn = 0;
    for entity in &entities {
        let drawable: &dyn Drawable = match &entity.body {
            Body::Shape(shape) => shape.as_drawable(),
            Body::Sprite(image) => image,
        };
        drawable.draw(&mut context);
        drawn += 1;
    }
    info!(entities = drawn, focused = context.focus(), "scene drawn");

    if !focus {
        eprintln!("Context not focused: drawing was skipped");
    }

    context
        .save_png(output_path)
        .with_context(|| format!("Failed to write {}", output_path))?;
    eprintln!("Wrote: {} ({}x{})", output_path, scene.width, scene.height);
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: glshape render <scene.yaml> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>    Output PNG (default: scene.png)");
    eprintln!("  --no-focus             Render with an unfocused context (draws nothing)");
    eprintln!();
    eprintln!("Draws every shape, then every sprite, onto the scene canvas.");
}
