use promcheck::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = cli::run_cli().await;
    std::process::exit(code);
}
