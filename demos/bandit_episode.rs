//! Drives the planner against the `bandit` toy `Model` for a handful of
//! real steps and prints the resulting action/observation/reward history —
//! a full episode/agent driver belongs to the application, not the
//! library, so this is a demonstration, not a shipped API.

use clap::Parser;
use pomcp::bandit::BanditModel;
use pomcp::{Config, Planner};

#[derive(Parser)]
#[command(author, version, about = "Run a POMCP episode against a toy bandit", long_about = None)]
struct Args {
    /// Number of real steps to take before stopping.
    #[arg(long, default_value_t = 20)]
    steps: usize,

    /// RNG seed for both the planner and the bandit's reward draws.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Optional JSON config file; falls back to `Config::default()` for
    /// any key it omits.
    #[arg(long)]
    config: Option<String>,
}

fn main() {
    pomcp::logging::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_file(path).expect("read config file"),
        None => Config::default(),
    };

    let model = BanditModel::two_arm(args.seed);
    let mut planner = Planner::new(model, config, args.seed);

    for step in 0..args.steps {
        let action = planner.select_action();
        let (result, is_legal) = planner.step_model(action);
        assert!(is_legal, "planner selected an illegal action");
        log::info!(
            "step {step}: a={:?} o={} r={:.1} terminal={}",
            result.action,
            result.observation,
            result.reward,
            result.is_terminal
        );
        let depleted = planner.update(result);
        if depleted {
            log::warn!("belief depleted at step {step}, resetting");
            planner.reset();
        }
    }

    for entry in planner.history().entries() {
        println!("{entry}");
    }
}
