pub mod wsd;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{Level, event};
use url::Url;

use crate::devcaps::{ColorModes, DevcapsError, DeviceCapabilities, Formats, SourceKind};
use crate::proto::wsd::WsdHandler;
use crate::transport::{Transport, TransportError};
use crate::xml::XmlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// An outbound request, ready to be handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpQuery {
    pub method: HttpMethod,
    pub uri: Url,
    pub body: Option<Box<[u8]>>,
    pub content_type: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<Box<str>>,
    pub body: Box<[u8]>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Everything a handler operation gets to see. Owned by the caller, borrowed for one call.
#[derive(Debug, Clone, Copy)]
pub struct ProtoContext<'c> {
    /// Scanner service endpoint
    pub base_uri: &'c Url,
    /// The response that came back, for decode operations
    pub response: Option<&'c HttpResponse>,
}

impl<'c> ProtoContext<'c> {
    pub fn new(base_uri: &'c Url) -> Self {
        Self {
            base_uri,
            response: None,
        }
    }

    #[must_use]
    pub fn with_response(self, response: &'c HttpResponse) -> Self {
        Self {
            response: Some(response),
            ..self
        }
    }

    /// The response of a completed exchange, as long as the device reported success.
    pub fn response(&self) -> Result<&'c HttpResponse, ProtoError> {
        let Some(response) = self.response else {
            return Err(ProtoError::MissingResponse);
        };

        if !response.is_success() {
            return Err(ProtoError::HttpStatus(response.status));
        }

        Ok(response)
    }
}

/// Parameters of a scan request, sizes in the device's units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParams {
    pub source: SourceKind,
    pub color_mode: ColorModes,
    pub format: Formats,
    pub x_resolution: u32,
    pub y_resolution: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    pub width: u32,
    pub height: u32,
}

/// A scan job the device accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanJob {
    pub location: Url,
}

/// One page of image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePage {
    pub content_type: Option<Box<str>>,
    pub data: Box<[u8]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Idle,
    Processing,
    Busy,
    AdfEmpty,
    AdfJammed,
    Unavailable,
}

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("Error handling XML: {0}")]
    Xml(#[from] XmlError),
    #[error(transparent)]
    Devcaps(#[from] DevcapsError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("No response to decode")]
    MissingResponse,
    #[error("HTTP status {0}")]
    HttpStatus(u16),
}

/// Operations every wire protocol implements.
///
/// `*_query` operations build the request to send, `*_decode` operations interpret the
/// response found in the context. An operation that makes no sense for a protocol returns
/// `Ok(None)`: no request needs to be sent, or there is nothing to report.
pub trait ProtoHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn devcaps_query(&self, ctx: &ProtoContext<'_>) -> Result<HttpQuery, ProtoError>;

    fn devcaps_decode(&self, ctx: &ProtoContext<'_>) -> Result<DeviceCapabilities, ProtoError>;

    fn scan_query(
        &self,
        ctx: &ProtoContext<'_>,
        params: &ScanParams,
    ) -> Result<Option<HttpQuery>, ProtoError>;

    fn scan_decode(&self, ctx: &ProtoContext<'_>) -> Result<Option<ScanJob>, ProtoError>;

    fn load_query(&self, ctx: &ProtoContext<'_>) -> Result<Option<HttpQuery>, ProtoError>;

    fn load_decode(&self, ctx: &ProtoContext<'_>) -> Result<Option<ImagePage>, ProtoError>;

    fn status_query(&self, ctx: &ProtoContext<'_>) -> Result<Option<HttpQuery>, ProtoError>;

    fn status_decode(&self, ctx: &ProtoContext<'_>) -> Result<Option<DeviceStatus>, ProtoError>;

    fn cancel_query(&self, ctx: &ProtoContext<'_>) -> Result<Option<HttpQuery>, ProtoError>;
}

static WSD_HANDLER: WsdHandler = WsdHandler;

/// Wire protocols we speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Wsd,
}

impl Protocol {
    pub const ALL: [Protocol; 1] = [Protocol::Wsd];

    pub fn name(self) -> &'static str {
        self.handler().name()
    }

    pub fn handler(self) -> &'static dyn ProtoHandler {
        match self {
            Protocol::Wsd => &WSD_HANDLER,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Protocol::ALL
            .into_iter()
            .find(|protocol| protocol.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown protocol `{}`", s))
    }
}

/// Runs one capability request against the device at `base_uri` and decodes the answer.
pub async fn negotiate_capabilities<T>(
    transport: &T,
    protocol: Protocol,
    base_uri: &Url,
) -> Result<DeviceCapabilities, ProtoError>
where
    T: Transport,
{
    let handler = protocol.handler();

    let query = handler.devcaps_query(&ProtoContext::new(base_uri))?;

    let response = transport.execute(&query).await?;

    event!(
        Level::DEBUG,
        %protocol,
        %base_uri,
        status = response.status,
        length = response.body.len(),
        "capabilities response received"
    );

    handler.devcaps_decode(&ProtoContext::new(base_uri).with_response(&response))
}
