// src/main.rs

use apptest::types::RunResult;
use apptest::{cli, logging, run};

#[tokio::main]
async fn main() {
    let result = match run_main().await {
        Ok(result) => result,
        Err(err) => {
            eprintln!("apptest error: {err:?}");
            RunResult::ExecutionError
        }
    };
    std::process::exit(result.exit_code());
}

async fn run_main() -> anyhow::Result<RunResult> {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        println!("Error: {err}");
        return Ok(err.run_result());
    }

    match run(args).await {
        Ok(result) => Ok(result),
        Err(err) => {
            println!("Error: {err}");
            Ok(err.run_result())
        }
    }
}
