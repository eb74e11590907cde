//! Request identification middleware
//!
//! Every request carries an identifier in its extensions and echoes it back
//! in the `X-Request-ID` response header. A usable identifier supplied by the
//! caller is kept; otherwise one is generated as `<host>/<nonce>-<sequence>`,
//! where the nonce is fixed for the lifetime of the process.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use once_cell::sync::Lazy;
use std::fmt;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Header read from the request and set on the response
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller supplied identifier that is reused as is
const MAX_REQUEST_ID_LEN: usize = 128;

static PREFIX: Lazy<String> = Lazy::new(|| {
    let host = std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    let nonce = Uuid::new_v4().simple().to_string();
    format!("{}/{}", host, &nonce[..10])
});

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier of the request being served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Next identifier of this process
    pub fn generate() -> Self {
        let n = SEQUENCE.fetch_add(1, Ordering::Relaxed) + 1;
        Self(format!("{}-{:06}", *PREFIX, n))
    }

    /// Reuses a caller supplied value when it is short visible ASCII
    fn from_header(value: &HeaderValue) -> Option<Self> {
        let value = value.to_str().ok()?.trim();
        let usable = !value.is_empty()
            && value.len() <= MAX_REQUEST_ID_LEN
            && value.bytes().all(|b| b.is_ascii_graphic());
        usable.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read access to the identifier assigned by [`RequestIdMiddleware`]
pub trait RequestIdExt {
    /// The assigned identifier, or `-` outside the middleware
    fn request_id(&self) -> String;
}

impl RequestIdExt for ServiceRequest {
    fn request_id(&self) -> String {
        self.request().request_id()
    }
}

impl RequestIdExt for HttpRequest {
    fn request_id(&self) -> String {
        self.extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Extractor for handlers that log or return the identifier
impl FromRequest for RequestId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate);
        ready(Ok(id))
    }
}

/// Middleware assigning a [`RequestId`] to every request
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future =
        std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(RequestId::from_header)
            .unwrap_or_else(RequestId::generate);
        req.extensions_mut().insert(request_id.clone());

        Box::pin(async move {
            let mut res = service.call(req).await?;
            if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(res)
        })
    }
}
