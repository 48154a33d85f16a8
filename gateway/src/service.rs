use crate::errors::{GatewayError, HandlerBody};
use crate::handler::SubscriptionHandler;
use hyper::body::Incoming;
use hyper::service::Service;
use hyper::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub struct GatewayService {
    handler: Arc<SubscriptionHandler>,
}

impl GatewayService {
    pub fn new(handler: Arc<SubscriptionHandler>) -> Self {
        Self { handler }
    }
}

impl Service<Request<Incoming>> for GatewayService {
    type Response = Response<HandlerBody>;
    type Error = GatewayError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let handler = self.handler.clone();
        Box::pin(async move { Ok(handler.handle(req).await) })
    }
}
