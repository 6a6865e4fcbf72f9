pub mod arguments;
pub mod deployer;

use {
    arguments::Arguments,
    clap::Parser,
    deployer::{ContractDeployer, Deploying},
    std::{io::Write, process::ExitCode},
};

/// How a deployment run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

pub async fn start(args: impl IntoIterator<Item = String>) -> ExitCode {
    let args = match Arguments::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => {
            // `--help` and `--version` also end up here and go to stdout.
            let _ = err.print();
            return if err.use_stderr() {
                Outcome::Failure
            } else {
                Outcome::Success
            }
            .into();
        }
    };
    observe::tracing::initialize(&observe::Config::new(&args.log_filter, args.log_json));
    tracing::info!("running deploy with validated arguments:\n{}", args);

    let deployer = ContractDeployer::from_arguments(&args);
    run(&deployer, &mut std::io::stdout(), &mut std::io::stderr())
        .await
        .into()
}

/// Deploys the contract exactly once and reports the result: the address on
/// `stdout` if it succeeded, the error with all its causes on `stderr`
/// otherwise. Nothing is written before the deployment resolved.
pub async fn run(
    deployer: &dyn Deploying,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Outcome {
    match deployer.deploy().await {
        Ok(deployment) => {
            tracing::debug!(?deployment, "deployment succeeded");
            match writeln!(
                stdout,
                "{} address: {}",
                deployment.contract, deployment.address
            ) {
                Ok(()) => Outcome::Success,
                Err(err) => {
                    tracing::error!(?err, address = %deployment.address, "failed to print address");
                    Outcome::Failure
                }
            }
        }
        Err(err) => {
            tracing::debug!(?err, "deployment failed");
            if let Err(err) = writeln!(stderr, "{err:?}") {
                tracing::error!(?err, "failed to print deployment error");
            }
            Outcome::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{Address, B256, address},
        anyhow::{Context, anyhow},
        contracts::Deployment,
        deployer::MockDeploying,
        std::io,
    };

    const ADDRESS: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

    fn deployed() -> Deployment {
        Deployment {
            contract: "Pharma".to_string(),
            address: ADDRESS,
            transaction_hash: B256::repeat_byte(0xab),
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn prints_address_on_success() {
        let mut deployer = MockDeploying::new();
        deployer.expect_deploy().times(1).returning(|| Ok(deployed()));

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let outcome = run(&deployer, &mut stdout, &mut stderr).await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(outcome.code(), 0);
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "Pharma address: 0x5FbDB2315678afecb367f032d93F642f64180aa3\n"
        );
        assert!(stderr.is_empty());
    }

    #[tokio::test]
    async fn prints_error_on_failure() {
        let mut deployer = MockDeploying::new();
        deployer
            .expect_deploy()
            .times(1)
            .returning(|| Err(anyhow!("insufficient funds")));

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let outcome = run(&deployer, &mut stdout, &mut stderr).await;

        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(outcome.code(), 1);
        assert!(stdout.is_empty());
        assert!(String::from_utf8(stderr).unwrap().contains("insufficient funds"));
    }

    #[tokio::test]
    async fn error_report_contains_causes() {
        let mut deployer = MockDeploying::new();
        deployer.expect_deploy().times(1).returning(|| {
            Err(anyhow!("insufficient funds for gas * price + value"))
                .context("failed to deploy `Pharma`")
        });

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        run(&deployer, &mut stdout, &mut stderr).await;

        let stderr = String::from_utf8(stderr).unwrap();
        assert!(stderr.starts_with("failed to deploy `Pharma`"));
        assert!(stderr.contains("Caused by:"));
        assert!(stderr.contains("insufficient funds for gas * price + value"));
    }

    #[tokio::test]
    async fn failing_to_print_the_address_is_a_failure() {
        let mut deployer = MockDeploying::new();
        deployer.expect_deploy().times(1).returning(|| Ok(deployed()));

        let mut stderr = Vec::new();
        let outcome = run(&deployer, &mut BrokenPipe, &mut stderr).await;
        assert_eq!(outcome, Outcome::Failure);
    }
}
