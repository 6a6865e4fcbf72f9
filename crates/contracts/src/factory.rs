use {
    crate::Artifact,
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
        network::{ReceiptResponse, TransactionBuilder},
        primitives::{Address, B256, Bytes, hex},
        providers::{DynProvider, PendingTransactionError, Provider},
        rpc::types::{TransactionReceipt, TransactionRequest},
        transports::TransportError,
    },
};

/// Errors raised while building or sending a contract deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("contract `{0}` is abstract and can't be deployed")]
    Abstract(String),
    #[error(
        "contract `{contract}` is missing links for the following libraries: {}",
        .libraries.join(", ")
    )]
    MissingLibraries {
        contract: String,
        libraries: Vec<String>,
    },
    #[error("contract `{contract}` has invalid bytecode")]
    InvalidBytecode {
        contract: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error("contract `{contract}` has no constructor but {given} arguments were provided")]
    NoConstructor { contract: String, given: usize },
    #[error("constructor of `{contract}` expects {expected} arguments but {given} were provided")]
    ArgumentCount {
        contract: String,
        expected: usize,
        given: usize,
    },
    #[error("invalid value `{value}` for constructor argument `{name}`")]
    InvalidArgument {
        name: String,
        value: String,
        #[source]
        source: alloy::dyn_abi::Error,
    },
    #[error("failed to encode constructor arguments")]
    Encoding(#[source] alloy::dyn_abi::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),
    #[error("deployment transaction {0} reverted")]
    Reverted(B256),
    #[error("receipt of deployment transaction {0} has no contract address")]
    NotDeployed(B256),
}

/// A contract instance created by a deployment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub contract: String,
    pub address: Address,
    pub transaction_hash: B256,
}

/// Knows how to build and submit the creation transaction of one compiled
/// contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
    artifact: Artifact,
    creation_code: Bytes,
}

impl ContractFactory {
    /// Validates the artifact's creation code. Contracts without creation
    /// code (interfaces and abstract contracts) and contracts that still
    /// need library addresses linked into their bytecode are rejected.
    pub fn new(artifact: Artifact) -> Result<Self, DeploymentError> {
        let libraries = artifact
            .link_references
            .iter()
            .flat_map(|(source, libraries)| {
                libraries
                    .keys()
                    .map(move |library| format!("{source}:{library}"))
            })
            .collect::<Vec<_>>();
        if !libraries.is_empty() {
            return Err(DeploymentError::MissingLibraries {
                contract: artifact.contract_name,
                libraries,
            });
        }

        let creation_code = hex::decode(&artifact.bytecode).map_err(|source| {
            DeploymentError::InvalidBytecode {
                contract: artifact.contract_name.clone(),
                source,
            }
        })?;
        if creation_code.is_empty() {
            return Err(DeploymentError::Abstract(artifact.contract_name));
        }

        Ok(Self {
            artifact,
            creation_code: creation_code.into(),
        })
    }

    pub fn contract_name(&self) -> &str {
        &self.artifact.contract_name
    }

    /// Returns the creation code followed by the ABI encoded constructor
    /// arguments. Arguments are given in their human readable form and
    /// coerced into the constructor's parameter types.
    pub fn deploy_code(&self, args: &[String]) -> Result<Bytes, DeploymentError> {
        let Some(constructor) = self.artifact.abi.constructor() else {
            if !args.is_empty() {
                return Err(DeploymentError::NoConstructor {
                    contract: self.artifact.contract_name.clone(),
                    given: args.len(),
                });
            }
            return Ok(self.creation_code.clone());
        };

        if constructor.inputs.len() != args.len() {
            return Err(DeploymentError::ArgumentCount {
                contract: self.artifact.contract_name.clone(),
                expected: constructor.inputs.len(),
                given: args.len(),
            });
        }

        let values = constructor
            .inputs
            .iter()
            .zip(args)
            .map(|(param, value)| {
                param
                    .resolve()
                    .and_then(|ty| ty.coerce_str(value))
                    .map_err(|source| DeploymentError::InvalidArgument {
                        name: param.name.clone(),
                        value: value.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<DynSolValue>, _>>()?;
        let encoded = constructor
            .abi_encode_input(&values)
            .map_err(DeploymentError::Encoding)?;

        Ok(self
            .creation_code
            .iter()
            .copied()
            .chain(encoded)
            .collect())
    }

    /// Builds the contract creation transaction. Nonce, gas and fees are
    /// left to the provider.
    pub fn deployment_transaction(
        &self,
        from: Address,
        args: &[String],
    ) -> Result<TransactionRequest, DeploymentError> {
        Ok(TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(self.deploy_code(args)?))
    }

    /// Sends the creation transaction and waits for its receipt.
    pub async fn deploy(
        &self,
        provider: &DynProvider,
        from: Address,
        args: &[String],
    ) -> Result<Deployment, DeploymentError> {
        let tx = self.deployment_transaction(from, args)?;
        let pending = provider.send_transaction(tx).await?;
        let transaction_hash = *pending.tx_hash();
        tracing::debug!(
            contract = %self.contract_name(),
            %from,
            ?transaction_hash,
            "sent deployment transaction"
        );

        let receipt = pending.get_receipt().await?;
        self.deployment(transaction_hash, &receipt)
    }

    /// Reads the created contract from the receipt of its creation
    /// transaction.
    fn deployment(
        &self,
        transaction_hash: B256,
        receipt: &TransactionReceipt,
    ) -> Result<Deployment, DeploymentError> {
        if !ReceiptResponse::status(receipt) {
            return Err(DeploymentError::Reverted(transaction_hash));
        }
        let address = receipt
            .contract_address
            .ok_or(DeploymentError::NotDeployed(transaction_hash))?;
        tracing::info!(
            contract = %self.contract_name(),
            %address,
            ?transaction_hash,
            block = ?receipt.block_number,
            "contract deployed"
        );

        Ok(Deployment {
            contract: self.contract_name().to_owned(),
            address,
            transaction_hash,
        })
    }
}
