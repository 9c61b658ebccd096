use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = forwardmark::cli::Cli::parse();
    if let Err(e) = forwardmark::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
