// serial-tail - Serial console log tailer
use clap::Parser;
use serial_tail::cli::{execute_command, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = execute_command(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
