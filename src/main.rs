//! Rust Points Engine CLI
//!
//! Applies point commands from a CSV file and prints the final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --strategy sync commands.csv > balances.csv
//! cargo run -- --strategy threaded --max-concurrent 8 commands.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > balances.csv
//! RUST_LOG=debug cargo run -- commands.csv
//! ```
//!
//! Input columns are `type,user,amount` where `type` is `enroll`, `charge` or
//! `use`. Output columns are `user,point,history`, one row per enrolled user.
//!
//! # Exit Codes
//!
//! - 0: Success, including files with rejected commands
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rust_points_engine::{cli, logging, strategy};
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init_logging(&args.log_level) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let config = match args.strategy {
        cli::StrategyType::Sync => None,
        cli::StrategyType::Threaded | cli::StrategyType::Async => Some(args.to_batch_config()),
    };
    let strategy = strategy::create_strategy(args.strategy, config);

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, "processing failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
