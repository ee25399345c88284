use anyhow::{Context, Result, bail};
use clap::Parser;
use colpick::{DEFAULT_K, DEFAULT_MAX_ITERATIONS, ExtractOptions, extract_colors_bytes};
use std::fs;
use std::path::PathBuf;

/// Print the dominant colors of images, found by k-means over their pixels.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors to extract
    #[arg(short = 'k', long = "colors", default_value_t = DEFAULT_K)]
    k: usize,

    /// Upper bound on k-means iterations
    #[arg(short = 'i', long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Side of the square the image is resampled to before clustering
    #[arg(short, long, default_value_t = 200)]
    size: u32,

    /// Cluster every pixel at full resolution
    #[arg(long, conflicts_with = "size")]
    no_resize: bool,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Emit one JSON array per input instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.size == 0 && !args.no_resize {
        bail!("--size must be at least 1");
    }

    let options = ExtractOptions {
        k: args.k,
        max_iterations: args.max_iterations,
        resize: (!args.no_resize).then_some((args.size, args.size)),
        seed: args.seed,
    };

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let colors = extract_colors_bytes(&bytes, &options)
            .with_context(|| format!("extracting colors from {}", input.display()))?;

        if args.json {
            println!("{}", serde_json::to_string(&colors)?);
            continue;
        }

        println!("{}", input.display());
        for c in &colors {
            println!(
                "  {}  ({:>3}, {:>3}, {:>3})  {:>5.1}%",
                c.hex,
                c.rgb.red,
                c.rgb.green,
                c.rgb.blue,
                c.share * 100.0
            );
        }
    }

    Ok(())
}
