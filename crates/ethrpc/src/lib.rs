//! Construction of the JSON-RPC providers used to talk to the node.

mod instrumentation;

use {
    alloy::{
        network::{EthereumWallet, TxSigner},
        primitives::Signature,
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

pub type AlloyProvider = DynProvider;

/// Label attached to every request logged by the transport.
const LABEL: &str = "deploy";

/// Creates a provider that sends transactions through the node, which
/// therefore has to manage the sending account itself.
pub fn provider(url: Url) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer {
            label: LABEL.into(),
        })
        .http(url);
    ProviderBuilder::new().connect_client(rpc).erased()
}

/// Creates a provider that signs transactions locally with `signer` before
/// handing them to the node.
pub fn provider_with_signer<S>(url: Url, signer: S) -> AlloyProvider
where
    S: TxSigner<Signature> + Send + Sync + 'static,
{
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer {
            label: LABEL.into(),
        })
        .http(url);
    let wallet = EthereumWallet::new(signer);

    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased()
}

/// Creates a provider whose responses are scripted through `asserter`.
#[cfg(any(test, feature = "test-util"))]
pub fn mocked_provider(asserter: alloy::providers::mock::Asserter) -> AlloyProvider {
    ProviderBuilder::new()
        .connect_mocked_client(asserter)
        .erased()
}

/// Like [`mocked_provider`] but signs transactions locally with `signer`.
#[cfg(any(test, feature = "test-util"))]
pub fn mocked_provider_with_signer<S>(
    asserter: alloy::providers::mock::Asserter,
    signer: S,
) -> AlloyProvider
where
    S: TxSigner<Signature> + Send + Sync + 'static,
{
    ProviderBuilder::new()
        .wallet(EthereumWallet::new(signer))
        .connect_mocked_client(asserter)
        .erased()
}
