//! The deployment step behind a trait so reporting can be tested without a
//! node.

use {
    crate::arguments::Arguments,
    alloy::{primitives::Address, providers::Provider},
    anyhow::{Context, Result},
    contracts::{Artifacts, Deployment},
    ethrpc::AlloyProvider,
};

/// Obtains a contract factory and deploys one instance with it.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deploying: Send + Sync {
    /// Looks up the contract factory, sends the creation transaction and
    /// waits for it to be included.
    async fn deploy(&self) -> Result<Deployment>;
}

/// Account the creation transaction is sent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// Transactions are signed locally by the provider's wallet.
    Signer(Address),
    /// Transactions are signed by the node with the first account it manages.
    Node,
}

pub struct ContractDeployer {
    provider: AlloyProvider,
    sender: Sender,
    artifacts: Artifacts,
    contract: String,
    constructor_args: Vec<String>,
}

impl ContractDeployer {
    pub fn new(
        provider: AlloyProvider,
        sender: Sender,
        artifacts: Artifacts,
        contract: String,
        constructor_args: Vec<String>,
    ) -> Self {
        Self {
            provider,
            sender,
            artifacts,
            contract,
            constructor_args,
        }
    }

    pub fn from_arguments(args: &Arguments) -> Self {
        let (provider, sender) = match &args.private_key {
            Some(signer) => (
                ethrpc::provider_with_signer(args.node_url.clone(), signer.clone()),
                Sender::Signer(signer.address()),
            ),
            None => (ethrpc::provider(args.node_url.clone()), Sender::Node),
        };
        Self::new(
            provider,
            sender,
            Artifacts::new(&args.artifacts_dir),
            args.contract.clone(),
            args.constructor_args.clone(),
        )
    }

    async fn sender_address(&self) -> Result<Address> {
        match self.sender {
            Sender::Signer(address) => Ok(address),
            Sender::Node => self
                .provider
                .get_accounts()
                .await
                .context("failed to fetch accounts managed by the node")?
                .first()
                .copied()
                .context("the node manages no accounts, provide a private key to deploy from"),
        }
    }
}

#[async_trait::async_trait]
impl Deploying for ContractDeployer {
    async fn deploy(&self) -> Result<Deployment> {
        let factory = self
            .artifacts
            .contract_factory(&self.contract)
            .with_context(|| format!("failed to get contract factory for `{}`", self.contract))?;
        let from = self.sender_address().await?;
        tracing::debug!(contract = %factory.contract_name(), %from, "deploying contract");

        factory
            .deploy(&self.provider, from, &self.constructor_args)
            .await
            .with_context(|| format!("failed to deploy `{}`", factory.contract_name()))
    }
}
