use tracing::{Level, event};

use crate::constants::{DEFAULT_MODEL, DEFAULT_VENDOR, WSD_NAMESPACES_READ, WSD_UNITS};
use crate::devcaps::{
    Bound, ColorModes, DevcapsError, DeviceCapabilities, Formats, MmRange, SourceCapability,
    SourceKind, Sources,
};
use crate::sorted_set::SortedSet;
use crate::xml::XmlReader;

const DESCRIPTION_PATH: &str = "s:Envelope/s:Body/scan:GetScannerElementsResponse/scan:ScannerElements/scan:ElementData/scan:ScannerDescription";
const CONFIGURATION_PATH: &str = "s:Envelope/s:Body/scan:GetScannerElementsResponse/scan:ScannerElements/scan:ElementData/scan:ScannerConfiguration";

/// Top level sections of a GetScannerElementsResponse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Description,
    Configuration,
}

impl Section {
    fn classify(path: &str) -> Option<Section> {
        match path {
            DESCRIPTION_PATH => Some(Section::Description),
            CONFIGURATION_PATH => Some(Section::Configuration),
            _ => None,
        }
    }
}

/// Children of `scan:ScannerConfiguration`, relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigurationNode {
    Formats,
    Platen,
    AdfFront,
    AdfBack,
    AdfSupportsDuplex,
}

impl ConfigurationNode {
    fn classify(path: &str) -> Option<ConfigurationNode> {
        match path {
            "/scan:DeviceSettings/scan:FormatsSupported" => Some(ConfigurationNode::Formats),
            "/scan:Platen" => Some(ConfigurationNode::Platen),
            "/scan:ADF/scan:ADFFront" => Some(ConfigurationNode::AdfFront),
            "/scan:ADF/scan:ADFBack" => Some(ConfigurationNode::AdfBack),
            "/scan:ADF/scan:ADFSupportsDuplex" => Some(ConfigurationNode::AdfSupportsDuplex),
            _ => None,
        }
    }
}

/// Children of a platen, ADF front or ADF back element, relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceNode {
    XResolution,
    YResolution,
    Bound(Bound),
    ColorEntry,
}

impl SourceNode {
    fn classify(path: &str) -> Option<SourceNode> {
        match path {
            "/scan:PlatenResolutions/scan:Widths/scan:Width"
            | "/scan:ADFResolutions/scan:Widths/scan:Width" => Some(SourceNode::XResolution),
            "/scan:PlatenResolutions/scan:Heights/scan:Height"
            | "/scan:ADFResolutions/scan:Heights/scan:Height" => Some(SourceNode::YResolution),
            "/scan:PlatenMinimumSize/scan:Width" | "/scan:ADFMinimumSize/scan:Width" => {
                Some(SourceNode::Bound(Bound::MinWidth))
            },
            "/scan:PlatenMinimumSize/scan:Height" | "/scan:ADFMinimumSize/scan:Height" => {
                Some(SourceNode::Bound(Bound::MinHeight))
            },
            "/scan:PlatenMaximumSize/scan:Width" | "/scan:ADFMaximumSize/scan:Width" => {
                Some(SourceNode::Bound(Bound::MaxWidth))
            },
            "/scan:PlatenMaximumSize/scan:Height" | "/scan:ADFMaximumSize/scan:Height" => {
                Some(SourceNode::Bound(Bound::MaxHeight))
            },
            "/scan:PlatenColor/scan:ColorEntry" | "/scan:ADFColor/scan:ColorEntry" => {
                Some(SourceNode::ColorEntry)
            },
            _ => None,
        }
    }
}

fn color_mode(value: &str) -> ColorModes {
    match value {
        "BlackAndWhite1" => ColorModes::BW1,
        "Grayscale8" => ColorModes::GRAYSCALE,
        "RGB24" => ColorModes::COLOR,
        _ => ColorModes::empty(),
    }
}

fn image_format(value: &str) -> Formats {
    match value {
        "jfif" => Formats::JPEG,
        "pdf-a" => Formats::PDF,
        "png" => Formats::PNG,
        _ => Formats::empty(),
    }
}

/// What a single source element declared, before validation.
#[derive(Debug, Default)]
struct SourceDeclaration {
    x_resolutions: SortedSet,
    y_resolutions: SortedSet,
    color_modes: ColorModes,
    min_width: Option<u32>,
    min_height: Option<u32>,
    max_width: Option<u32>,
    max_height: Option<u32>,
}

impl SourceDeclaration {
    fn bound_mut(&mut self, bound: Bound) -> &mut Option<u32> {
        match bound {
            Bound::MinWidth => &mut self.min_width,
            Bound::MinHeight => &mut self.min_height,
            Bound::MaxWidth => &mut self.max_width,
            Bound::MaxHeight => &mut self.max_height,
        }
    }

    fn validate(mut self) -> Result<SourceCapability, DevcapsError> {
        self.x_resolutions.sort();
        self.y_resolutions.sort();

        let resolutions = self.x_resolutions.intersect_sorted(&self.y_resolutions);

        if resolutions.is_empty() {
            return Err(DevcapsError::NoResolutions);
        }

        let color_modes = self.color_modes & ColorModes::SUPPORTED;

        if color_modes.is_empty() {
            return Err(DevcapsError::NoColorModes);
        }

        let min_width_px = self
            .min_width
            .ok_or(DevcapsError::MissingBound(Bound::MinWidth))?;
        let min_height_px = self
            .min_height
            .ok_or(DevcapsError::MissingBound(Bound::MinHeight))?;
        let max_width_px = self
            .max_width
            .ok_or(DevcapsError::MissingBound(Bound::MaxWidth))?;
        let max_height_px = self
            .max_height
            .ok_or(DevcapsError::MissingBound(Bound::MaxHeight))?;

        if min_width_px > max_width_px {
            return Err(DevcapsError::InvalidWidthRange);
        }

        if min_height_px > max_height_px {
            return Err(DevcapsError::InvalidHeightRange);
        }

        Ok(SourceCapability {
            formats: Formats::empty(),
            color_modes,
            resolutions,
            min_width_px,
            max_width_px,
            min_height_px,
            max_height_px,
            window_x_mm: MmRange::default(),
            window_y_mm: MmRange::default(),
        })
    }
}

/// Decodes a GetScannerElementsResponse into device capabilities.
///
/// Nothing is returned unless the whole document decodes.
pub fn parse(protocol: &'static str, xml_text: &[u8]) -> Result<DeviceCapabilities, DevcapsError> {
    let mut xml = XmlReader::begin(xml_text, WSD_NAMESPACES_READ)?;

    let mut model = None;
    let mut sources = Sources::default();

    while !xml.end() {
        event!(Level::TRACE, path = xml.node_path(), "visiting");

        match Section::classify(xml.node_path()) {
            Some(Section::Description) => parse_description(&mut xml, &mut model),
            Some(Section::Configuration) => {
                parse_configuration(&mut xml, &mut sources, WSD_UNITS)?;
            },
            None => {},
        }

        xml.deep_next(0);
    }

    if sources.is_empty() {
        return Err(DevcapsError::NoSources);
    }

    Ok(DeviceCapabilities {
        protocol,
        units: WSD_UNITS,
        vendor: Box::from(DEFAULT_VENDOR),
        model: model.unwrap_or_else(|| Box::from(DEFAULT_MODEL)),
        sources,
    })
}

fn parse_description(xml: &mut XmlReader, model: &mut Option<Box<str>>) {
    let scope = xml.scope();

    while !xml.end() {
        if scope.relative_path(xml) == "/scan:ScannerName" && model.is_none() {
            let name = xml.node_value();

            event!(Level::TRACE, model = name, "scanner name");

            *model = Some(Box::from(name));
        }

        scope.advance(xml);
    }
}

fn parse_configuration(
    xml: &mut XmlReader,
    sources: &mut Sources,
    units: u32,
) -> Result<(), DevcapsError> {
    let scope = xml.scope();

    let mut formats = Formats::empty();
    let mut adf = false;
    let mut duplex = false;

    while !xml.end() {
        match ConfigurationNode::classify(scope.relative_path(xml)) {
            Some(ConfigurationNode::Formats) => parse_formats(xml, &mut formats),
            Some(ConfigurationNode::Platen) => parse_source(xml, sources, SourceKind::Platen)?,
            Some(ConfigurationNode::AdfFront) => {
                adf = true;
                parse_source(xml, sources, SourceKind::AdfSimplex)?;
            },
            Some(ConfigurationNode::AdfBack) => {
                parse_source(xml, sources, SourceKind::AdfDuplex)?;
            },
            Some(ConfigurationNode::AdfSupportsDuplex) => {
                duplex = matches!(xml.node_value(), "1" | "true");
            },
            None => {},
        }

        scope.advance(xml);
    }

    for (_, source) in sources.iter_mut() {
        source.formats |= formats;
        source.update_window(units);
    }

    // the duplex slot holds the back side while parsing, from here on it describes
    // what a double sided scan accepts
    if adf && duplex {
        let back = sources.remove(SourceKind::AdfDuplex);

        if let Some(front) = sources.get(SourceKind::AdfSimplex) {
            let combined = match back {
                Some(back) => front.merge(&back),
                None => front.clone(),
            };

            sources.replace(SourceKind::AdfDuplex, combined);
        }
    } else {
        sources.remove(SourceKind::AdfDuplex);
    }

    event!(
        Level::DEBUG,
        adf,
        duplex,
        formats = ?formats,
        "scanner configuration decoded"
    );

    if sources.is_empty() {
        return Err(DevcapsError::NoSources);
    }

    Ok(())
}

fn parse_formats(xml: &mut XmlReader, formats: &mut Formats) {
    let scope = xml.scope();

    while !xml.end() {
        if scope.relative_path(xml) == "/scan:FormatValue" {
            *formats |= image_format(xml.node_value());
        }

        scope.advance(xml);
    }
}

fn parse_source(
    xml: &mut XmlReader,
    sources: &mut Sources,
    kind: SourceKind,
) -> Result<(), DevcapsError> {
    let scope = xml.scope();

    let mut declaration = SourceDeclaration::default();

    while !xml.end() {
        match SourceNode::classify(scope.relative_path(xml)) {
            Some(SourceNode::XResolution) => {
                declaration.x_resolutions.push(xml.node_value_uint()?);
            },
            Some(SourceNode::YResolution) => {
                declaration.y_resolutions.push(xml.node_value_uint()?);
            },
            Some(SourceNode::Bound(bound)) => {
                let value = xml.node_value_uint()?;

                declaration.bound_mut(bound).get_or_insert(value);
            },
            Some(SourceNode::ColorEntry) => {
                declaration.color_modes |= color_mode(xml.node_value());
            },
            None => {},
        }

        scope.advance(xml);
    }

    let source = declaration
        .validate()
        .inspect_err(|error| event!(Level::DEBUG, source = ?kind, %error, "invalid source"))?;

    event!(
        Level::DEBUG,
        source = ?kind,
        resolutions = %source.resolutions,
        min_width_px = source.min_width_px,
        max_width_px = source.max_width_px,
        min_height_px = source.min_height_px,
        max_height_px = source.max_height_px,
        "source decoded"
    );

    if !sources.insert_if_vacant(kind, source) {
        event!(Level::DEBUG, source = ?kind, "source declared twice, keeping the first");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::constants::{XML_SOAP11_NAMESPACE, XML_SOAP12_NAMESPACE};
    use crate::devcaps::{Bound, ColorModes, DevcapsError, Formats, SourceKind};
    use crate::proto::wsd::devcaps::parse;
    use crate::xml::XmlError;

    /// A platen with the given resolutions, colors and sizes
    fn platen(widths: &[u32], heights: &[u32], colors: &[&str], sizes: &str) -> String {
        let widths = widths
            .iter()
            .map(|width| format!("<wscn:Width>{}</wscn:Width>", width))
            .collect::<String>();
        let heights = heights
            .iter()
            .map(|height| format!("<wscn:Height>{}</wscn:Height>", height))
            .collect::<String>();
        let colors = colors
            .iter()
            .map(|color| format!("<wscn:ColorEntry>{}</wscn:ColorEntry>", color))
            .collect::<String>();

        format!(
            "<wscn:Platen>\
                <wscn:PlatenResolutions>\
                    <wscn:Widths>{}</wscn:Widths>\
                    <wscn:Heights>{}</wscn:Heights>\
                </wscn:PlatenResolutions>\
                <wscn:PlatenColor>{}</wscn:PlatenColor>\
                {}\
            </wscn:Platen>",
            widths, heights, colors, sizes
        )
    }

    const LETTER: &str = "<wscn:PlatenMinimumSize><wscn:Width>1</wscn:Width><wscn:Height>1</wscn:Height></wscn:PlatenMinimumSize>\
        <wscn:PlatenMaximumSize><wscn:Width>8500</wscn:Width><wscn:Height>11000</wscn:Height></wscn:PlatenMaximumSize>";

    fn configuration(contents: &str) -> String {
        format!(
            include_str!("../../test/wsd/configuration-template.xml"),
            contents
        )
    }

    fn adf(supports_duplex: &str, back: &str) -> String {
        format!(
            include_str!("../../test/wsd/adf-template.xml"),
            supports_duplex, back
        )
    }

    fn soap(namespace: &str) -> String {
        format!(include_str!("../../test/wsd/soap-template.xml"), namespace)
    }

    #[test]
    fn full_scanner_elements() {
        let caps = parse(
            "WSD",
            include_str!("../../test/wsd/scanner-elements.xml").as_bytes(),
        )
        .unwrap();

        assert_eq!(caps.protocol, "WSD");
        assert_eq!(caps.units, 1000);
        assert_eq!(&*caps.vendor, "AirScan");
        assert_eq!(&*caps.model, "Example MFP 4100");
        assert_eq!(
            caps.available_sources(),
            [
                SourceKind::Platen,
                SourceKind::AdfSimplex,
                SourceKind::AdfDuplex
            ]
        );

        let platen = caps.sources.get(SourceKind::Platen).unwrap();

        assert_eq!(platen.formats, Formats::JPEG | Formats::PDF);
        assert_eq!(platen.color_modes, ColorModes::GRAYSCALE | ColorModes::COLOR);
        assert_eq!(platen.resolutions.as_slice(), &[100, 200, 300, 600]);
        assert_eq!(
            (platen.min_width_px, platen.max_width_px),
            (1, 8500)
        );
        assert_eq!(
            (platen.min_height_px, platen.max_height_px),
            (1, 11690)
        );
        assert!(platen.window_x_mm.min.abs() < f64::EPSILON);
        assert!((platen.window_x_mm.max - 215.9).abs() < 1e-9);
        assert!((platen.window_y_mm.max - 296.926).abs() < 1e-9);

        let front = caps.sources.get(SourceKind::AdfSimplex).unwrap();

        assert_eq!(front.resolutions.as_slice(), &[200, 300, 600]);
        assert_eq!((front.min_width_px, front.max_width_px), (2000, 8500));
        assert_eq!((front.min_height_px, front.max_height_px), (2000, 14000));

        let duplex = caps.sources.get(SourceKind::AdfDuplex).unwrap();

        assert_eq!(duplex.formats, Formats::JPEG | Formats::PDF);
        assert_eq!(duplex.color_modes, ColorModes::GRAYSCALE | ColorModes::COLOR);
        assert_eq!(duplex.resolutions.as_slice(), &[150, 200, 300, 600]);
        assert_eq!((duplex.min_width_px, duplex.max_width_px), (1500, 8500));
        assert_eq!((duplex.min_height_px, duplex.max_height_px), (1500, 14000));
    }

    #[test]
    fn platen_only_device() {
        let caps = parse("WSD", soap(XML_SOAP12_NAMESPACE).as_bytes()).unwrap();

        assert_eq!(caps.available_sources(), [SourceKind::Platen]);

        let platen = caps.sources.get(SourceKind::Platen).unwrap();

        assert_eq!(platen.resolutions.as_slice(), &[300, 600]);
        assert_eq!(platen.color_modes, ColorModes::GRAYSCALE | ColorModes::COLOR);
        assert_eq!(platen.formats, Formats::JPEG | Formats::PNG);
        assert_eq!((platen.min_width_px, platen.max_width_px), (0, 2550));
        assert_eq!((platen.min_height_px, platen.max_height_px), (0, 3507));
        assert!((platen.window_x_mm.max - 64.77).abs() < 1e-9);
        assert!((platen.window_y_mm.max - 89.0778).abs() < 1e-9);
    }

    #[test]
    fn soap_versions_decode_identically() {
        let soap11 = parse("WSD", soap(XML_SOAP11_NAMESPACE).as_bytes()).unwrap();
        let soap12 = parse("WSD", soap(XML_SOAP12_NAMESPACE).as_bytes()).unwrap();

        assert_eq!(soap11, soap12);
    }

    #[test]
    fn decoding_is_idempotent() {
        let document = include_str!("../../test/wsd/scanner-elements.xml");

        let first = parse("WSD", document.as_bytes()).unwrap();
        let second = parse("WSD", document.as_bytes()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn resolutions_are_intersected() {
        let document = configuration(&platen(
            &[1200, 300, 600],
            &[600, 1200],
            &["RGB24"],
            LETTER,
        ));

        let caps = parse("WSD", document.as_bytes()).unwrap();

        assert_eq!(
            caps.sources
                .get(SourceKind::Platen)
                .map(|source| source.resolutions.as_slice()),
            Some(&[600, 1200][..])
        );
    }

    #[test]
    #[traced_test]
    fn disjoint_resolutions() {
        let document = configuration(&platen(&[300], &[600], &["RGB24"], LETTER));

        let result = parse("WSD", document.as_bytes());

        assert!(matches!(result, Err(DevcapsError::NoResolutions)));
        assert!(logs_contain("no resolutions defined"));
    }

    #[test]
    fn only_unsupported_color_modes() {
        let document = configuration(&platen(&[300], &[300], &["BlackAndWhite1"], LETTER));

        let result = parse("WSD", document.as_bytes());

        assert!(matches!(result, Err(DevcapsError::NoColorModes)));
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let document = configuration(&platen(
            &[300],
            &[300],
            &["RGB48", "Grayscale8", "Grayscale16"],
            LETTER,
        ));

        let caps = parse("WSD", document.as_bytes()).unwrap();

        assert_eq!(
            caps.sources
                .get(SourceKind::Platen)
                .map(|source| source.color_modes),
            Some(ColorModes::GRAYSCALE)
        );
    }

    #[test]
    fn missing_bound() {
        let sizes = "<wscn:PlatenMinimumSize><wscn:Width>1</wscn:Width><wscn:Height>1</wscn:Height></wscn:PlatenMinimumSize>\
            <wscn:PlatenMaximumSize><wscn:Width>8500</wscn:Width></wscn:PlatenMaximumSize>";

        let document = configuration(&platen(&[300], &[300], &["RGB24"], sizes));

        let error = parse("WSD", document.as_bytes()).unwrap_err();

        assert!(matches!(
            error,
            DevcapsError::MissingBound(Bound::MaxHeight)
        ));
        assert_eq!(error.to_string(), "maximum height not defined");
    }

    #[test]
    fn minimum_exceeds_maximum() {
        let sizes = "<wscn:PlatenMinimumSize><wscn:Width>9000</wscn:Width><wscn:Height>1</wscn:Height></wscn:PlatenMinimumSize>\
            <wscn:PlatenMaximumSize><wscn:Width>8500</wscn:Width><wscn:Height>11000</wscn:Height></wscn:PlatenMaximumSize>";

        let document = configuration(&platen(&[300], &[300], &["RGB24"], sizes));

        let result = parse("WSD", document.as_bytes());

        assert!(matches!(result, Err(DevcapsError::InvalidWidthRange)));
    }

    #[test]
    fn first_bound_wins() {
        let sizes = "<wscn:PlatenMinimumSize><wscn:Width>10</wscn:Width><wscn:Height>1</wscn:Height></wscn:PlatenMinimumSize>\
            <wscn:PlatenMinimumSize><wscn:Width>20</wscn:Width></wscn:PlatenMinimumSize>\
            <wscn:PlatenMaximumSize><wscn:Width>8500</wscn:Width><wscn:Height>11000</wscn:Height></wscn:PlatenMaximumSize>";

        let document = configuration(&platen(&[300], &[300], &["RGB24"], sizes));

        let caps = parse("WSD", document.as_bytes()).unwrap();

        assert_eq!(
            caps.sources
                .get(SourceKind::Platen)
                .map(|source| source.min_width_px),
            Some(10)
        );
    }

    #[test]
    fn first_platen_wins() {
        let document = configuration(&format!(
            "{}{}",
            platen(&[300], &[300], &["RGB24"], LETTER),
            platen(&[600], &[600], &["RGB24"], LETTER)
        ));

        let caps = parse("WSD", document.as_bytes()).unwrap();

        assert_eq!(
            caps.sources
                .get(SourceKind::Platen)
                .map(|source| source.resolutions.as_slice()),
            Some(&[300][..])
        );
    }

    #[test]
    fn invalid_number() {
        let document = configuration(&platen(&[300], &[300], &["RGB24"], LETTER))
            .replace("<wscn:Width>300</wscn:Width>", "<wscn:Width>300dpi</wscn:Width>");

        let result = parse("WSD", document.as_bytes());

        assert!(matches!(
            result,
            Err(DevcapsError::Xml(XmlError::InvalidNumber { .. }))
        ));
    }

    #[test]
    fn duplex_without_back_copies_front() {
        let caps = parse("WSD", adf("true", "").as_bytes()).unwrap();

        assert_eq!(
            caps.available_sources(),
            [SourceKind::AdfSimplex, SourceKind::AdfDuplex]
        );
        assert_eq!(
            caps.sources.get(SourceKind::AdfDuplex),
            caps.sources.get(SourceKind::AdfSimplex)
        );
    }

    #[test]
    fn duplex_with_back_is_merged() {
        let back = "<wscn:ADFBack>\
                <wscn:ADFResolutions>\
                    <wscn:Widths><wscn:Width>150</wscn:Width><wscn:Width>300</wscn:Width></wscn:Widths>\
                    <wscn:Heights><wscn:Height>150</wscn:Height><wscn:Height>300</wscn:Height></wscn:Heights>\
                </wscn:ADFResolutions>\
                <wscn:ADFColor><wscn:ColorEntry>Grayscale8</wscn:ColorEntry></wscn:ADFColor>\
                <wscn:ADFMinimumSize><wscn:Width>100</wscn:Width><wscn:Height>100</wscn:Height></wscn:ADFMinimumSize>\
                <wscn:ADFMaximumSize><wscn:Width>8500</wscn:Width><wscn:Height>16000</wscn:Height></wscn:ADFMaximumSize>\
            </wscn:ADFBack>";

        let caps = parse("WSD", adf("1", back).as_bytes()).unwrap();

        let front = caps.sources.get(SourceKind::AdfSimplex).unwrap();
        let duplex = caps.sources.get(SourceKind::AdfDuplex).unwrap();

        assert_eq!(front.resolutions.as_slice(), &[300, 600]);
        assert_eq!(duplex.resolutions.as_slice(), &[150, 300, 600]);
        assert_eq!(duplex.color_modes, front.color_modes);
        assert_eq!(duplex.min_width_px, 100);
        assert_eq!(duplex.max_height_px, 16000);
        assert!(duplex.window_y_mm.max > front.window_y_mm.max);
    }

    #[test]
    fn duplex_not_supported_drops_back() {
        let back = "<wscn:ADFBack>\
                <wscn:ADFResolutions>\
                    <wscn:Widths><wscn:Width>300</wscn:Width></wscn:Widths>\
                    <wscn:Heights><wscn:Height>300</wscn:Height></wscn:Heights>\
                </wscn:ADFResolutions>\
                <wscn:ADFColor><wscn:ColorEntry>RGB24</wscn:ColorEntry></wscn:ADFColor>\
                <wscn:ADFMinimumSize><wscn:Width>100</wscn:Width><wscn:Height>100</wscn:Height></wscn:ADFMinimumSize>\
                <wscn:ADFMaximumSize><wscn:Width>8500</wscn:Width><wscn:Height>14000</wscn:Height></wscn:ADFMaximumSize>\
            </wscn:ADFBack>";

        for supports_duplex in ["false", "0", "yes"] {
            let caps = parse("WSD", adf(supports_duplex, back).as_bytes()).unwrap();

            assert_eq!(caps.available_sources(), [SourceKind::AdfSimplex]);
        }
    }

    #[test]
    fn configuration_without_sources() {
        let result = parse("WSD", configuration("").as_bytes());

        assert!(matches!(result, Err(DevcapsError::NoSources)));
    }

    #[test]
    fn response_without_configuration() {
        let document = include_str!("../../test/wsd/scanner-elements.xml").replace(
            "wscn:ScannerConfiguration>",
            "wscn:VendorConfiguration>",
        );

        let result = parse("WSD", document.as_bytes());

        assert!(matches!(result, Err(DevcapsError::NoSources)));
    }

    #[test]
    fn model_defaults_when_unnamed() {
        let caps = parse(
            "WSD",
            configuration(&platen(&[300], &[300], &["RGB24"], LETTER)).as_bytes(),
        )
        .unwrap();

        assert_eq!(&*caps.vendor, "AirScan");
        assert_eq!(&*caps.model, "Unknown");
    }

    #[test]
    fn first_scanner_name_wins_even_when_empty() {
        let document = include_str!("../../test/wsd/scanner-elements.xml").replacen(
            "<wscn:ScannerName",
            "<wscn:ScannerName></wscn:ScannerName><wscn:ScannerName",
            1,
        );

        let caps = parse("WSD", document.as_bytes()).unwrap();

        assert_eq!(&*caps.model, "");
    }

    #[test]
    fn malformed_document() {
        let result = parse("WSD", b"<soap:Envelope><soap:Body></soap:Envelope>");

        assert!(matches!(result, Err(DevcapsError::Xml(_))));
    }
}
