// src/main.rs

use cmdeck::{cli, logging, run};

fn main() {
    // Resolve the local UTC offset while the process is still single-threaded.
    cmdeck::log::entry::init_local_offset();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("cmdeck error: failed to start async runtime: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(run_main()) {
        eprintln!("cmdeck error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
