//! dino_runner — interactive entry point.
//!
//! ```text
//! dino_runner [--config <path>] [--seed <n>]
//! ```

use dino_runner::app::run;
use dino_runner::{GameConfig, RunnerError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Dino Runner — jump, duck and restart by pose        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "camera")]
    println!("  Mode: webcam + MoveNet pose model");
    #[cfg(not(feature = "camera"))]
    println!("  Mode: Keyboard simulation  (use --features camera for a webcam)");
    println!();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<GameConfig, RunnerError> {
    let mut cfg = GameConfig::default();
    let mut seed = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next()
                    .ok_or_else(|| RunnerError::Invalid("--config needs a path".to_string()))?;
                cfg = GameConfig::load(&path)?;
                println!("  Config: {}", path);
            }
            "--seed" => {
                let n = args.next()
                    .and_then(|s| s.parse::<u64>().ok())
                    .ok_or_else(|| RunnerError::Invalid("--seed needs an unsigned integer".to_string()))?;
                seed = Some(n);
            }
            other => return Err(RunnerError::Invalid(format!("unknown argument `{}`", other))),
        }
    }
    if seed.is_some() {
        cfg.seed = seed;
    }
    Ok(cfg)
}
