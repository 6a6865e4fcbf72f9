//! Lookup of compiled contract artifacts.
//!
//! The build tool writes one JSON file per contract to
//! `<artifacts>/<source name>/<contract name>.json`, next to a
//! `<contract name>.dbg.json` debug file and a `build-info/` directory
//! holding the raw compiler input and output.

use {
    alloy::json_abi::JsonAbi,
    anyhow::{Context, Result, bail},
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        fs,
        path::{Path, PathBuf},
    },
};

const BUILD_INFO_DIR: &str = "build-info";
const DEBUG_SUFFIX: &str = ".dbg.json";

/// A compiled contract as described by the build tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    /// Hex encoded creation code. Kept as a string because unlinked
    /// bytecode contains library placeholders that are not valid hex.
    pub bytecode: String,
    /// Library references per source file, keyed by library name.
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl Artifact {
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("failed to parse artifact {}", path.display()))
    }

    /// Name in the form `<source name>:<contract name>`, which is unique
    /// within one artifacts directory.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }
}

/// The directory the build tool writes its artifacts to.
#[derive(Debug, Clone)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Finds the artifact of a contract given either its bare name
    /// (`Pharma`) or its fully qualified name (`contracts/Pharma.sol:Pharma`).
    pub fn find(&self, name: &str) -> Result<Artifact> {
        if let Some((source, contract)) = name.rsplit_once(':') {
            let path = self.root.join(source).join(format!("{contract}.json"));
            if !path.is_file() {
                bail!(
                    "artifact for contract `{name}` not found in {}",
                    self.root.display()
                );
            }
            let artifact = Artifact::from_file(&path)?;
            if artifact.fully_qualified_name() != name {
                bail!(
                    "artifact {} describes contract `{}` instead of `{name}`",
                    path.display(),
                    artifact.fully_qualified_name()
                );
            }
            return Ok(artifact);
        }

        let mut candidates = Vec::new();
        self.search(&self.root, &format!("{name}.json"), &mut candidates)
            .with_context(|| format!("failed to search artifacts in {}", self.root.display()))?;

        match candidates.as_slice() {
            [] => bail!(
                "artifact for contract `{name}` not found in {}",
                self.root.display()
            ),
            [path] => {
                tracing::debug!(path = %path.display(), "found artifact");
                Artifact::from_file(path)
            }
            paths => {
                let names = paths
                    .iter()
                    .map(|path| self.fully_qualified_name(path))
                    .collect::<Vec<_>>();
                bail!(
                    "there are multiple artifacts for contract `{name}`, use one of the following \
                     fully qualified names instead: {}",
                    names.join(", ")
                )
            }
        }
    }

    fn search(&self, dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
        let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                if dir == self.root && entry.file_name() == BUILD_INFO_DIR {
                    continue;
                }
                self.search(&path, file_name, found)?;
            } else {
                let entry_name = entry.file_name();
                let entry_name = entry_name.to_string_lossy();
                if entry_name == file_name && !entry_name.ends_with(DEBUG_SUFFIX) {
                    found.push(path);
                }
            }
        }
        Ok(())
    }

    /// Derives `<source name>:<contract name>` from an artifact path.
    fn fully_qualified_name(&self, path: &Path) -> String {
        let source = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(|source| source.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        let contract = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{source}:{contract}")
    }
}
