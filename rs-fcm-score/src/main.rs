use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use rs_fcm_core::error::FcmError;
use rs_fcm_core::model::codec;
use rs_fcm_core::model::scorer;

/// Train an order-k finite-context model over a text and report its
/// average information content in bits per symbol.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Training text file
	input: PathBuf,

	/// Model order (context length in bytes)
	#[arg(short = 'k', long = "order")]
	order: usize,

	/// Additive smoothing parameter (>= 0)
	#[arg(short = 'a', long = "alpha", value_parser = parse_alpha)]
	alpha: f64,

	/// Where to write the portable model file
	#[arg(short = 'm', long = "model", default_value = "model.fcm")]
	model_out: PathBuf,
}

fn parse_alpha(raw: &str) -> Result<f64, String> {
	let alpha: f64 = raw.parse().map_err(|_| format!("not a number: {raw}"))?;
	if !alpha.is_finite() || alpha < 0.0 {
		return Err(format!("alpha must be finite and >= 0, got {alpha}"));
	}
	Ok(alpha)
}

fn run(args: &Args) -> Result<(), FcmError> {
	let text = fs::read(&args.input)?;
	let model = codec::train_with_snapshot(&args.input, args.order)?;

	codec::save_model(&args.model_out, &model)?;

	let average = scorer::average_information(&model, &text, args.alpha)?;
	info!("scored {} bytes with k = {}, alpha = {}", text.len(), args.order, args.alpha);
	println!("{average}");

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
