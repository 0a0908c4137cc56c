use anyhow::{Context, Result, bail};
use boarding_pass_scanner::tools::{decode_images, read_i420_file, write_nv21_file};
use boarding_pass_scanner::utils::yuv::yuv420_to_nv21;
use boarding_pass_scanner::{Pdf417Decoder, ScannedPass, logger};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

const NOT_FOUND_MESSAGE: &str = "No boarding pass could be found";

#[derive(Parser)]
#[command(name = "passtool", version, about = "Boarding pass scanner tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode boarding passes from still images
    Decode {
        #[arg(long, required = true, num_args = 1..)]
        image: Vec<PathBuf>,
    },
    /// Convert a raw I420 frame to NV21
    Convert {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        width: usize,
        #[arg(long)]
        height: usize,
        #[arg(long)]
        output: PathBuf,
    },
    /// Reformat a raw I420 frame and decode it
    ScanYuv {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        width: usize,
        #[arg(long)]
        height: usize,
    },
}

fn main() -> Result<()> {
    logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Decode { image } => decode_cmd(&image),
        Command::Convert {
            input,
            width,
            height,
            output,
        } => convert_cmd(input, width, height, output),
        Command::ScanYuv {
            input,
            width,
            height,
        } => scan_yuv_cmd(input, width, height),
    }
}

fn print_pass(text: Option<String>) {
    match text {
        Some(text) => println!("{}", ScannedPass::new(text).display_text()),
        None => println!("{NOT_FOUND_MESSAGE}"),
    }
}

fn decode_cmd(images: &[PathBuf]) -> Result<()> {
    let start = Instant::now();
    let mut failures = 0usize;

    for (path, result) in decode_images(images) {
        println!("== {}", path.display());
        match result {
            Ok(text) => print_pass(text),
            Err(err) => {
                failures += 1;
                error!(path = %path.display(), "failed to decode image: {}", err);
            }
        }
    }

    info!(
        images = images.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "decode finished"
    );
    if failures == images.len() {
        bail!("no image could be read");
    }
    Ok(())
}

fn convert_cmd(input: PathBuf, width: usize, height: usize, output: PathBuf) -> Result<()> {
    let frame = read_i420_file(&input, width, height)
        .with_context(|| format!("reading {}", input.display()))?;
    let nv21 = yuv420_to_nv21(&frame).into_result()?;
    frame.release();

    write_nv21_file(&output, &nv21).with_context(|| format!("writing {}", output.display()))?;
    info!(bytes = nv21.data().len(), output = %output.display(), "NV21 written");
    Ok(())
}

fn scan_yuv_cmd(input: PathBuf, width: usize, height: usize) -> Result<()> {
    let frame = read_i420_file(&input, width, height)
        .with_context(|| format!("reading {}", input.display()))?;
    let start = Instant::now();
    let nv21 = yuv420_to_nv21(&frame).into_result()?;
    frame.release();
    let reformat_us = start.elapsed().as_micros() as u64;

    info!(reformat_us, bytes = nv21.data().len(), "frame reformatted");

    let text = Pdf417Decoder::new().decode_nv21(&nv21)?;
    print_pass(text);
    Ok(())
}
