//! Transport layer that logs every JSON-RPC request going to the node
//! together with how long the node took to answer it.
use {
    alloy::{
        rpc::json_rpc::{RequestPacket, ResponsePacket},
        transports::TransportError,
    },
    std::{
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
        time::Instant,
    },
    tower::{Layer, Service},
};

/// Layer that logs each request passing through the transport.
#[derive(Debug, Clone, Default)]
pub(crate) struct InstrumentationLayer {
    pub label: String,
}

impl<S> Layer<S> for InstrumentationLayer {
    type Service = InstrumentedTransport<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedTransport {
            inner,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InstrumentedTransport<S> {
    inner: S,
    label: String,
}

impl<S> Service<RequestPacket> for InstrumentedTransport<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
    S::Error: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        let methods: Vec<String> = req
            .requests_mut()
            .iter_mut()
            .map(|r| {
                tracing::trace!(component = %self.label, ?r, "executing request");
                r.method().to_owned()
            })
            .collect();

        let label = self.label.clone();
        let start = Instant::now();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await;
            match &res {
                Ok(_) => tracing::debug!(
                    component = %label,
                    ?methods,
                    elapsed = ?start.elapsed(),
                    "rpc request completed"
                ),
                Err(err) => tracing::debug!(
                    component = %label,
                    ?methods,
                    ?err,
                    "rpc request failed"
                ),
            }
            res
        })
    }
}
