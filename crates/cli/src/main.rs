use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use audio_canon_core::decoding::domain::excerpt::ExcerptRequest;
use audio_canon_core::decoding::infrastructure::decoder_registry::{
    default_registry, DecoderRegistry,
};
use audio_canon_core::pipeline::canonical_decode_use_case::CanonicalDecodeUseCase;
use audio_canon_core::shared::constants::TARGET_SAMPLE_RATE;
use audio_canon_core::shared::debug_level::level_filter_for_debug_level;

/// Decode audio files into mono 22050 Hz float PCM for similarity analysis.
#[derive(Parser)]
#[command(name = "audio-canon", version)]
struct Cli {
    /// Debug level: 0 quiet, 1 error, 2 warning, 3 info, 4 debug, 5 trace.
    /// Higher values also mean trace. Overrides RUST_LOG when given.
    #[arg(long, global = true)]
    debug: Option<u8>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a file and report (or write) the canonical PCM.
    Decode(DecodeArgs),
    /// List the available audio decoders; the default is listed first.
    ListDecoders,
}

#[derive(clap::Args)]
struct DecodeArgs {
    /// Input audio file.
    input: PathBuf,

    /// Excerpt length in seconds (0 = whole file).
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    length: f32,

    /// Excerpt start in seconds; negative centers the excerpt, at most
    /// this many seconds from the start.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    start: f32,

    /// Decoder backend (see list-decoders). Defaults to the preferred one.
    #[arg(long)]
    decoder: Option<String>,

    /// Write the canonical PCM as a 32-bit float WAV file.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(debug: Option<u8>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = debug {
        builder.filter_level(level_filter_for_debug_level(level));
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let registry = default_registry();

    match cli.command {
        Command::ListDecoders => {
            for name in ordered_decoder_names(&registry) {
                println!("{name}");
            }
            Ok(())
        }
        Command::Decode(args) => {
            validate(&args, &registry)?;
            run_decode(&args, &registry)
        }
    }
}

fn run_decode(
    args: &DecodeArgs,
    registry: &DecoderRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let use_case = CanonicalDecodeUseCase::from_registry(registry, args.decoder.as_deref())?;
    log::info!(
        "Decoding {} with '{}'",
        args.input.display(),
        use_case.decoder_name()
    );

    let request = ExcerptRequest::new(args.length, args.start);
    let pcm = use_case.decode_excerpt(&args.input, &request)?;

    let seconds = pcm.len() as f64 / TARGET_SAMPLE_RATE;
    let peak = pcm.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    println!(
        "{}: {} samples ({seconds:.3}s at {TARGET_SAMPLE_RATE} Hz), peak {peak:.4}",
        args.input.display(),
        pcm.len()
    );

    if let Some(output) = &args.output {
        write_wav(output, &pcm)?;
        log::info!("Output written to {}", output.display());
    }

    Ok(())
}

fn validate(
    args: &DecodeArgs,
    registry: &DecoderRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.exists() {
        return Err(format!("Input file not found: {}", args.input.display()).into());
    }
    if !args.length.is_finite() {
        return Err(format!("Length must be a finite number, got {}", args.length).into());
    }
    if !args.start.is_finite() {
        return Err(format!("Start must be a finite number, got {}", args.start).into());
    }
    if let Some(name) = &args.decoder {
        if registry.create(name).is_none() {
            return Err(format!(
                "Decoder must be one of: {}, got '{name}'",
                registry.list_names().join(", ")
            )
            .into());
        }
    }
    Ok(())
}

/// Registered decoder names with the default first.
fn ordered_decoder_names(registry: &DecoderRegistry) -> Vec<&str> {
    let default = registry.default_name();
    let mut names: Vec<&str> = default.into_iter().collect();
    names.extend(
        registry
            .list_names()
            .into_iter()
            .filter(|name| Some(*name) != default),
    );
    names
}

fn write_wav(path: &Path, pcm: &[f32]) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TARGET_SAMPLE_RATE as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in pcm {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}
