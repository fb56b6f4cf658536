// src/main.rs

use pkglaunch::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("pkglaunch error: {err:?}");
    }
    let code = run(args).await;
    std::process::exit(code);
}
