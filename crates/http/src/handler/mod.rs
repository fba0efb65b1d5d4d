//! The application callback.
//!
//! A [`Handler`] receives each successfully parsed and normalized request
//! together with the request body [`Stream`], and returns a [`ResponseSpec`].
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use http::StatusCode;
//! use http_body_util::Full;
//! use httpd_core::handler::Handler;
//! use httpd_core::protocol::{NormalizedRequest, ResponseSpec, TransportError};
//! use httpd_core::stream::Stream;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Handler for Echo {
//!     type RespBody = Full<Bytes>;
//!     type Error = TransportError;
//!
//!     async fn call(&self, _request: NormalizedRequest, body: &mut Stream<'_>) -> Result<ResponseSpec, TransportError> {
//!         let body = body.body().await?;
//!         Ok(ResponseSpec::full(StatusCode::OK, body.clone()).header("Content-Length", body.len()))
//!     }
//! }
//! ```

use std::error::Error;

use async_trait::async_trait;
use bytes::Bytes;
use http_body::Body;

use crate::protocol::{NormalizedRequest, ResponseSpec};
use crate::stream::Stream;

#[async_trait]
pub trait Handler: Send + Sync {
    type RespBody: Body<Data = Bytes> + Send + Unpin;
    type Error: Into<Box<dyn Error + Send + Sync>> + Send;

    /// Handles one request.
    ///
    /// `body` is positioned at the first byte after the request head, and is
    /// chunked-decoding when the request said `Transfer-Encoding: chunked`.
    /// An `Err` is logged and answered with a 500 response.
    async fn call(
        &self,
        request: NormalizedRequest,
        body: &mut Stream<'_>,
    ) -> Result<ResponseSpec<Self::RespBody>, Self::Error>;
}
