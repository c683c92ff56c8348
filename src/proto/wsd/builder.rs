use tracing::{Level, event};
use uuid::Uuid;
use uuid::fmt::Urn;

use crate::constants::{WSA_ANON, WSCN_GET_SCANNER_ELEMENTS, WSD_NAMESPACES_WRITE};
use crate::xml::{XmlError, XmlWriter};

/// Writes the contents of `s:Body`.
pub trait WriteBody {
    fn write_body(self, writer: &mut XmlWriter) -> Result<(), XmlError>;
}

/// WS-Scan, GetScannerElementsRequest
pub struct GetScannerElements<'e> {
    elements: &'e [&'e str],
}

impl<'e> GetScannerElements<'e> {
    pub fn new(elements: &'e [&'e str]) -> Self {
        Self { elements }
    }
}

impl WriteBody for GetScannerElements<'_> {
    fn write_body(self, writer: &mut XmlWriter) -> Result<(), XmlError> {
        writer.enter("scan:GetScannerElementsRequest")?;
        writer.enter("scan:RequestedElements")?;

        for element in self.elements {
            writer.add_text("scan:Name", element)?;
        }

        writer.leave()?;
        writer.leave()?;

        Ok(())
    }
}

pub struct Builder;

fn generate_message_id() -> Urn {
    Uuid::new_v4().urn()
}

impl Builder {
    /// Build a SOAP message with the given action, addressed to and replying to the
    /// anonymous endpoint.
    fn build_message<B>(action: &str, body: B) -> Result<(Box<[u8]>, Urn), XmlError>
    where
        B: WriteBody,
    {
        let message_id = generate_message_id();

        let mut writer = XmlWriter::begin("s:Envelope", WSD_NAMESPACES_WRITE)?;

        writer.enter("s:Header")?;
        writer.add_text("a:MessageID", &message_id.to_string())?;
        writer.add_text("a:To", WSA_ANON)?;
        writer.add_text("a:ReplyTo", WSA_ANON)?;
        writer.add_text("a:Action", action)?;
        writer.leave()?;

        writer.enter("s:Body")?;

        body.write_body(&mut writer)?;

        let message = writer.finish()?;

        event!(
            Level::DEBUG,
            %action,
            %message_id,
            xml = %String::from_utf8_lossy(&message).as_ref(),
            "constructed xml for WSD message",
        );

        Ok((message, message_id))
    }

    pub fn build_get_scanner_elements(elements: &[&str]) -> Result<(Box<[u8]>, Urn), XmlError> {
        Builder::build_message(WSCN_GET_SCANNER_ELEMENTS, GetScannerElements::new(elements))
    }
}
