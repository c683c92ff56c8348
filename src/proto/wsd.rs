mod builder;
mod devcaps;

use tracing::{Level, event};

use crate::constants::MIME_TYPE_SOAP_XML;
use crate::devcaps::DeviceCapabilities;
use crate::proto::wsd::builder::Builder;
use crate::proto::{
    DeviceStatus, HttpMethod, HttpQuery, ImagePage, ProtoContext, ProtoError, ProtoHandler,
    ScanJob, ScanParams,
};

/// Elements requested from the device when negotiating capabilities
pub const REQUESTED_ELEMENTS: &[&str] = &["scan:ScannerDescription", "scan:ScannerConfiguration"];

/// WS-Scan over SOAP
#[derive(Debug, Clone, Copy, Default)]
pub struct WsdHandler;

fn soap_post(ctx: &ProtoContext<'_>, body: Box<[u8]>) -> HttpQuery {
    HttpQuery {
        method: HttpMethod::Post,
        uri: ctx.base_uri.clone(),
        body: Some(body),
        content_type: Some(MIME_TYPE_SOAP_XML),
    }
}

impl ProtoHandler for WsdHandler {
    fn name(&self) -> &'static str {
        "WSD"
    }

    fn devcaps_query(&self, ctx: &ProtoContext<'_>) -> Result<HttpQuery, ProtoError> {
        let (message, message_id) = Builder::build_get_scanner_elements(REQUESTED_ELEMENTS)?;

        event!(
            Level::DEBUG,
            base_uri = %ctx.base_uri,
            %message_id,
            "requesting scanner elements"
        );

        Ok(soap_post(ctx, message))
    }

    fn devcaps_decode(&self, ctx: &ProtoContext<'_>) -> Result<DeviceCapabilities, ProtoError> {
        let response = ctx.response()?;

        let caps = devcaps::parse(self.name(), &response.body).inspect_err(|error| {
            event!(Level::WARN, base_uri = %ctx.base_uri, %error, "failed to decode scanner elements");
        })?;

        Ok(caps)
    }

    fn scan_query(
        &self,
        _ctx: &ProtoContext<'_>,
        _params: &ScanParams,
    ) -> Result<Option<HttpQuery>, ProtoError> {
        Ok(None)
    }

    fn scan_decode(&self, _ctx: &ProtoContext<'_>) -> Result<Option<ScanJob>, ProtoError> {
        Ok(None)
    }

    fn load_query(&self, _ctx: &ProtoContext<'_>) -> Result<Option<HttpQuery>, ProtoError> {
        Ok(None)
    }

    fn load_decode(&self, _ctx: &ProtoContext<'_>) -> Result<Option<ImagePage>, ProtoError> {
        Ok(None)
    }

    fn status_query(&self, _ctx: &ProtoContext<'_>) -> Result<Option<HttpQuery>, ProtoError> {
        Ok(None)
    }

    fn status_decode(&self, _ctx: &ProtoContext<'_>) -> Result<Option<DeviceStatus>, ProtoError> {
        Ok(None)
    }

    fn cancel_query(&self, _ctx: &ProtoContext<'_>) -> Result<Option<HttpQuery>, ProtoError> {
        Ok(None)
    }
}
