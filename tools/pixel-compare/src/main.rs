// Pixel comparison CLI for edgefill demos.
//
// Usage:
//   pixel-compare render <demo> <width> <height> [params...] -o <output.bmp>
//   pixel-compare compare <file_a> <file_b> [-t <tolerance>] [-d <diff.bmp>] [-s <sidebyside.bmp>]
//   pixel-compare verify <demo> <width> <height> --expected <reference> [-t <tolerance>] [params...]
//   pixel-compare list
//
// Set RUST_LOG=debug for I/O tracing.

use anyhow::{anyhow, bail, Context, Result};
use pixel_compare::{
    compare_buffers, generate_diff_image, generate_sidebyside, load_image, save_image, PixelBuffer,
};
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "render" => cmd_render(&args[2..]),
        "compare" => cmd_compare(&args[2..]),
        "verify" => cmd_verify(&args[2..]),
        "list" => {
            cmd_list();
            Ok(true)
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
            process::exit(1);
        }
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!("pixel-compare - pixel comparison tool for edgefill demos");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  render <demo> <width> <height> [params...] -o <output.bmp>");
    eprintln!("      Render a demo to an image file.");
    eprintln!();
    eprintln!("  compare <file_a> <file_b> [-t <tolerance>] [-d <diff.bmp>] [-s <sidebyside.bmp>]");
    eprintln!("      Compare two image files pixel-by-pixel.");
    eprintln!();
    eprintln!("  verify <demo> <width> <height> --expected <reference> [-t <tolerance>] [params...]");
    eprintln!("      Render a demo and compare it with a reference image.");
    eprintln!();
    eprintln!("  list");
    eprintln!("      List available demo names.");
}

fn cmd_list() {
    println!("Available demos:");
    for name in pixel_compare::available_demos() {
        println!("  {}", name);
    }
}

/// Parse `<demo> <width> <height>` from the front of `args`.
fn parse_target(args: &[String], usage: &str) -> Result<(String, u32, u32)> {
    if args.len() < 3 {
        bail!("usage: {}", usage);
    }
    let width: u32 = args[1].parse().with_context(|| format!("invalid width '{}'", args[1]))?;
    let height: u32 = args[2].parse().with_context(|| format!("invalid height '{}'", args[2]))?;
    Ok((args[0].clone(), width, height))
}

fn parse_param(s: &str) -> Result<f64> {
    s.parse::<f64>().with_context(|| format!("invalid param '{}' (must be a number)", s))
}

fn parse_tolerance(s: &str) -> Result<u8> {
    s.parse::<u8>().with_context(|| format!("invalid tolerance '{}' (0-255)", s))
}

fn render(demo: &str, width: u32, height: u32, params: &[f64]) -> Result<PixelBuffer> {
    log::info!("rendering '{}' at {}x{} with params {:?}", demo, width, height, params);
    pixel_compare::render_demo(demo, width, height, params)
        .ok_or_else(|| anyhow!("unknown demo '{}', use 'list' to see available demos", demo))
}

fn cmd_render(args: &[String]) -> Result<bool> {
    let (demo, width, height) =
        parse_target(args, "pixel-compare render <demo> <width> <height> [params...] -o <output>")?;

    let mut params = Vec::new();
    let mut output_path: Option<String> = None;
    let mut i = 3;
    while i < args.len() {
        if args[i] == "-o" && i + 1 < args.len() {
            output_path = Some(args[i + 1].clone());
            i += 2;
        } else {
            params.push(parse_param(&args[i])?);
            i += 1;
        }
    }

    let output = output_path.unwrap_or_else(|| format!("{}_{}x{}.bmp", demo, width, height));
    let buf = render(&demo, width, height, &params)?;
    save_image(Path::new(&output), &buf).with_context(|| format!("saving {}", output))?;
    println!("Saved: {}", output);
    Ok(true)
}

fn cmd_compare(args: &[String]) -> Result<bool> {
    if args.len() < 2 {
        bail!("usage: pixel-compare compare <file_a> <file_b> [-t <tolerance>] [-d <diff>] [-s <sidebyside>]");
    }

    let path_a = &args[0];
    let path_b = &args[1];
    let mut diff_path: Option<String> = None;
    let mut sbs_path: Option<String> = None;
    let mut tolerance = 0u8;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-d" if i + 1 < args.len() => {
                diff_path = Some(args[i + 1].clone());
                i += 2;
            }
            "-s" if i + 1 < args.len() => {
                sbs_path = Some(args[i + 1].clone());
                i += 2;
            }
            "-t" if i + 1 < args.len() => {
                tolerance = parse_tolerance(&args[i + 1])?;
                i += 2;
            }
            other => {
                log::warn!("ignoring unknown option: {}", other);
                i += 1;
            }
        }
    }

    let a = load_image(Path::new(path_a)).with_context(|| format!("loading {}", path_a))?;
    let b = load_image(Path::new(path_b)).with_context(|| format!("loading {}", path_b))?;

    let result = compare_buffers(&a, &b)?;
    println!("{}", result);

    if let Some(dp) = diff_path {
        save_image(Path::new(&dp), &generate_diff_image(&a, &b)?)?;
        println!("Diff saved: {}", dp);
    }

    if let Some(sp) = sbs_path {
        save_image(Path::new(&sp), &generate_sidebyside(&a, &b)?)?;
        println!("Side-by-side saved: {}", sp);
    }

    Ok(result.within(tolerance))
}

fn cmd_verify(args: &[String]) -> Result<bool> {
    let (demo, width, height) = parse_target(
        args,
        "pixel-compare verify <demo> <width> <height> --expected <reference> [params...]",
    )?;

    let mut expected: Option<String> = None;
    let mut params = Vec::new();
    let mut diff_path: Option<String> = None;
    let mut tolerance = 0u8;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--expected" if i + 1 < args.len() => {
                expected = Some(args[i + 1].clone());
                i += 2;
            }
            "-d" if i + 1 < args.len() => {
                diff_path = Some(args[i + 1].clone());
                i += 2;
            }
            "-t" if i + 1 < args.len() => {
                tolerance = parse_tolerance(&args[i + 1])?;
                i += 2;
            }
            _ => {
                params.push(parse_param(&args[i])?);
                i += 1;
            }
        }
    }

    let expected = expected.ok_or_else(|| anyhow!("--expected <reference image> is required"))?;
    let reference = load_image(Path::new(&expected)).with_context(|| format!("loading {}", expected))?;
    let actual = render(&demo, width, height, &params)?;

    let actual_path = format!("{}_actual_{}x{}.bmp", demo, width, height);
    save_image(Path::new(&actual_path), &actual)?;
    println!("  Saved render: {}", actual_path);

    let result = compare_buffers(&actual, &reference)?;
    println!("\n{}", result);

    if let Some(dp) = diff_path {
        save_image(Path::new(&dp), &generate_diff_image(&actual, &reference)?)?;
        println!("Diff saved: {}", dp);
    }

    if !result.within(tolerance) {
        let sbs_path = format!("{}_sidebyside_{}x{}.bmp", demo, width, height);
        save_image(Path::new(&sbs_path), &generate_sidebyside(&actual, &reference)?)?;
        println!("Side-by-side saved: {}", sbs_path);

        println!("\nDifference histogram:");
        for (diff_val, count) in result.nonzero_buckets() {
            println!("  diff={}: {} channels", diff_val, count);
        }
        return Ok(false);
    }

    println!("\nMATCH (tolerance {})", tolerance);
    Ok(true)
}
