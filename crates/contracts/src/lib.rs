pub mod artifact;
pub mod factory;

pub use {
    artifact::{Artifact, Artifacts},
    factory::{ContractFactory, Deployment, DeploymentError},
};

impl Artifacts {
    /// Returns the deployment factory of a compiled contract, looked up by
    /// bare or fully qualified name.
    pub fn contract_factory(&self, name: &str) -> anyhow::Result<ContractFactory> {
        let artifact = self.find(name)?;
        tracing::debug!(contract = %artifact.fully_qualified_name(), "loaded artifact");
        Ok(ContractFactory::new(artifact)?)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::artifact::tests::{artifact_json, write_artifact},
        serde_json::json,
        tempfile::TempDir,
    };

    #[test]
    fn contract_factory_for_deployable_contract() {
        let dir = TempDir::new().unwrap();
        write_artifact(dir.path(), &artifact_json("contracts/Pharma.sol", "Pharma"));

        let factory = Artifacts::new(dir.path()).contract_factory("Pharma").unwrap();
        assert_eq!(factory.contract_name(), "Pharma");
    }

    #[test]
    fn contract_factory_rejects_interfaces() {
        let dir = TempDir::new().unwrap();
        let mut artifact = artifact_json("contracts/IPharma.sol", "IPharma");
        artifact["bytecode"] = json!("0x");
        write_artifact(dir.path(), &artifact);

        let err = Artifacts::new(dir.path())
            .contract_factory("IPharma")
            .unwrap_err();
        assert!(err.to_string().contains("abstract"));
    }
}
