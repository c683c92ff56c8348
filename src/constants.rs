use const_format::concatcp;

use crate::xml::Namespace;

pub const STRING_DEFAULT_CAPACITY: usize = 64;

// # WS-Addressing
pub const WSA_URI: &str = "http://schemas.xmlsoap.org/ws/2004/08/addressing";
pub const WSA_ANON: &str = concatcp!(WSA_URI, "/role/anonymous");

// # WS-Discovery
pub const WSD_URI: &str = "http://schemas.xmlsoap.org/ws/2005/04/discovery";

// # SOAP envelopes, devices answer in either version
pub const XML_SOAP11_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const XML_SOAP12_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";

// # WS-Scan
pub const WSCN_URI: &str = "http://schemas.microsoft.com/windows/2006/08/wdp/scan";
pub const WSCN_GET_SCANNER_ELEMENTS: &str = concatcp!(WSCN_URI, "/GetScannerElements");

pub const MIME_TYPE_SOAP_XML: &str = "application/soap+xml; charset=utf-8";

pub const USER_AGENT: &str = concatcp!("scan-proto-rs/", env!("CARGO_PKG_VERSION"));

/// Namespace patterns used while reading WSD documents
pub const WSD_NAMESPACES_READ: &[Namespace] = &[
    Namespace::new("s", "http*://schemas.xmlsoap.org/soap/envelope"),
    Namespace::new("s", "http*://www.w3.org/2003/05/soap-envelope"),
    Namespace::new("d", "http*://schemas.xmlsoap.org/ws/2005/04/discovery"),
    Namespace::new("a", "http*://schemas.xmlsoap.org/ws/2004/08/addressing"),
    Namespace::new("scan", "http*://schemas.microsoft.com/windows/2006/08/wdp/scan"),
];

/// Namespaces declared on the root of outgoing WSD documents
pub const WSD_NAMESPACES_WRITE: &[Namespace] = &[
    Namespace::new("s", XML_SOAP12_NAMESPACE),
    Namespace::new("d", WSD_URI),
    Namespace::new("a", WSA_URI),
    Namespace::new("scan", WSCN_URI),
];

/// WSD reports sizes in thousandths of an inch
pub const WSD_UNITS: u32 = 1000;

pub const DEFAULT_VENDOR: &str = "AirScan";
pub const DEFAULT_MODEL: &str = "Unknown";

pub const MM_PER_INCH: f64 = 25.4;
