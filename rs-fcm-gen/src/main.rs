use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_fcm_core::error::FcmError;
use rs_fcm_core::model::codec;
use rs_fcm_core::model::context_model::ContextModel;
use rs_fcm_core::model::generator;

/// Generate a byte sequence from an order-k finite-context model,
/// either trained fresh from a text or loaded from a model file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Model order (context length in bytes)
	#[arg(short = 'k', long = "order")]
	order: usize,

	/// Additive smoothing parameter (>= 0)
	#[arg(short = 'a', long = "alpha", value_parser = parse_alpha)]
	alpha: f64,

	/// Prior seed string; must be at least k symbols long
	#[arg(short = 'p', long = "prior")]
	prior: String,

	/// Number of symbols to generate
	#[arg(short = 's', long = "size")]
	size: usize,

	/// Train from this text instead of loading a model file
	#[arg(short = 'i', long = "input", conflicts_with = "model")]
	input: Option<PathBuf>,

	/// Model file to load when no training text is given
	#[arg(short = 'm', long = "model", default_value = "model.fcm")]
	model: PathBuf,

	/// Fixed RNG seed for reproducible output
	#[arg(long)]
	seed: Option<u64>,
}

fn parse_alpha(raw: &str) -> Result<f64, String> {
	let alpha: f64 = raw.parse().map_err(|_| format!("not a number: {raw}"))?;
	if !alpha.is_finite() || alpha < 0.0 {
		return Err(format!("alpha must be finite and >= 0, got {alpha}"));
	}
	Ok(alpha)
}

fn load_or_train(args: &Args) -> Result<ContextModel, FcmError> {
	match &args.input {
		Some(input) => {
			let text = fs::read(input)?;
			info!("training from {} ({} bytes)", input.display(), text.len());
			ContextModel::train(&text, args.order)
		}
		None => {
			let model = codec::load_model(&args.model)?;
			model.ensure_order(args.order)?;
			Ok(model)
		}
	}
}

fn run(args: &Args) -> Result<(), FcmError> {
	let model = load_or_train(args)?;

	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	let output = generator::generate(&model, args.alpha, args.prior.as_bytes(), args.size, &mut rng)?;

	let mut stdout = std::io::stdout().lock();
	stdout.write_all(&output)?;
	stdout.write_all(b"\n")?;

	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	let args = Args::parse();

	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			eprintln!("error: {error}");
			ExitCode::FAILURE
		}
	}
}
