use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    pharma_deploy::start(std::env::args()).await
}
