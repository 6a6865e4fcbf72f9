use {
    alloy::signers::local::PrivateKeySigner,
    clap::Parser,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    url::Url,
};

#[derive(Parser)]
#[clap(
    name = "deploy",
    version,
    about = "Deploys one instance of a compiled contract and prints its address"
)]
pub struct Arguments {
    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Hex encoded private key of the deploying account. Without a key the
    /// transaction is sent from the first account managed by the node.
    #[clap(long, env, hide_env_values = true)]
    pub private_key: Option<PrivateKeySigner>,

    /// Directory containing the compiled contract artifacts.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Name of the contract to deploy, either bare (`Pharma`) or fully
    /// qualified (`contracts/Pharma.sol:Pharma`).
    #[clap(long, env, default_value = "Pharma")]
    pub contract: String,

    /// Constructor arguments in the order the constructor declares them.
    #[clap(long, num_args = 1.., allow_hyphen_values = true)]
    pub constructor_args: Vec<String>,

    #[clap(long, env, default_value = "warn")]
    pub log_filter: String,

    /// Output log events as JSON.
    #[clap(long, env)]
    pub log_json: bool,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            node_url,
            private_key,
            artifacts_dir,
            contract,
            constructor_args,
            log_filter,
            log_json,
        } = self;

        writeln!(f, "node_url: {node_url}")?;
        match private_key {
            Some(signer) => writeln!(f, "private_key: SECRET ({})", signer.address())?,
            None => writeln!(f, "private_key: None")?,
        }
        writeln!(f, "artifacts_dir: {}", artifacts_dir.display())?;
        writeln!(f, "contract: {contract}")?;
        writeln!(f, "constructor_args: {constructor_args:?}")?;
        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_json: {log_json}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address};

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn defaults_reproduce_plain_deployment() {
        let args = Arguments::parse_from(["deploy"]);
        assert_eq!(args.node_url.as_str(), "http://localhost:8545/");
        assert!(args.private_key.is_none());
        assert_eq!(args.artifacts_dir, PathBuf::from("artifacts"));
        assert_eq!(args.contract, "Pharma");
        assert!(args.constructor_args.is_empty());
        assert_eq!(args.log_filter, "warn");
        assert!(!args.log_json);
    }

    #[test]
    fn parses_private_key_and_constructor_args() {
        let args = Arguments::parse_from([
            "deploy",
            "--private-key",
            KEY,
            "--contract",
            "contracts/Pharma.sol:Pharma",
            "--constructor-args",
            "42",
            "-1",
        ]);
        assert_eq!(
            args.private_key.unwrap().address(),
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        assert_eq!(args.contract, "contracts/Pharma.sol:Pharma");
        assert_eq!(args.constructor_args, ["42", "-1"]);
    }

    #[test]
    fn rejects_invalid_private_key() {
        let result = Arguments::try_parse_from(["deploy", "--private-key", "0x1234"]);
        assert!(result.is_err());
    }

    #[test]
    fn display_redacts_private_key() {
        let args = Arguments::parse_from(["deploy", "--private-key", KEY]);
        let displayed = args.to_string();
        assert!(displayed.contains("private_key: SECRET"));
        assert!(!displayed.contains(&KEY[2..]));
        assert!(displayed.contains("contract: Pharma"));
    }
}
