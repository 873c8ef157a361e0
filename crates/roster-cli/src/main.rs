use colored::Colorize;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = roster_cli::run(std::env::args().collect()).await {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
