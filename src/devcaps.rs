use std::fmt;

use bitflags::bitflags;
use thiserror::Error;
use tracing::{Level, event};

use crate::constants::MM_PER_INCH;
use crate::sorted_set::SortedSet;
use crate::xml::XmlError;

bitflags! {
    /// Color modes a source can scan in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColorModes: u8 {
        /// 1 bit black and white
        const BW1 = 1 << 0;
        /// 8 bit grayscale
        const GRAYSCALE = 1 << 1;
        /// 24 bit RGB
        const COLOR = 1 << 2;
    }
}

impl ColorModes {
    /// Modes the rest of the driver is able to deliver; anything else a device reports is dropped.
    pub const SUPPORTED: ColorModes = ColorModes::GRAYSCALE.union(ColorModes::COLOR);
}

bitflags! {
    /// Image formats a source can deliver.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Formats: u8 {
        const JPEG = 1 << 0;
        const PDF = 1 << 1;
        const PNG = 1 << 2;
    }
}

/// Logical scan origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Platen,
    AdfSimplex,
    AdfDuplex,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Platen,
        SourceKind::AdfSimplex,
        SourceKind::AdfDuplex,
    ];

    const fn index(self) -> usize {
        match self {
            SourceKind::Platen => 0,
            SourceKind::AdfSimplex => 1,
            SourceKind::AdfDuplex => 2,
        }
    }

    /// Name exposed to frontends.
    pub const fn sane_name(self) -> &'static str {
        match self {
            SourceKind::Platen => "Flatbed",
            SourceKind::AdfSimplex => "ADF",
            SourceKind::AdfDuplex => "ADF Duplex",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sane_name())
    }
}

/// Converts a length in pixels at `resolution` pixels per inch to millimetres.
pub fn px_to_mm(px: u32, resolution: u32) -> f64 {
    if resolution == 0 {
        return 0.0;
    }

    f64::from(px) * MM_PER_INCH / f64::from(resolution)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MmRange {
    pub min: f64,
    pub max: f64,
}

/// Capabilities of a single source. Sizes in pixels are expressed in the device's units,
/// see [`DeviceCapabilities::units`].
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCapability {
    pub formats: Formats,
    pub color_modes: ColorModes,
    /// Discrete resolutions, valid for both axes
    pub resolutions: SortedSet,
    pub min_width_px: u32,
    pub max_width_px: u32,
    pub min_height_px: u32,
    pub max_height_px: u32,
    pub window_x_mm: MmRange,
    pub window_y_mm: MmRange,
}

impl SourceCapability {
    /// Derives the scan window ranges from the pixel bounds.
    pub fn update_window(&mut self, units: u32) {
        self.window_x_mm = MmRange {
            min: 0.0,
            max: px_to_mm(self.max_width_px, units),
        };

        self.window_y_mm = MmRange {
            min: 0.0,
            max: px_to_mm(self.max_height_px, units),
        };
    }

    /// Combines two sources into one that accepts every setting either of them accepts.
    ///
    /// Resolutions, color modes and formats are united, minimum sizes take the smaller
    /// value and maximum sizes (and with them the window ranges) the larger one.
    pub fn merge(&self, other: &SourceCapability) -> SourceCapability {
        SourceCapability {
            formats: self.formats | other.formats,
            color_modes: self.color_modes | other.color_modes,
            resolutions: self.resolutions.union_sorted(&other.resolutions),
            min_width_px: self.min_width_px.min(other.min_width_px),
            max_width_px: self.max_width_px.max(other.max_width_px),
            min_height_px: self.min_height_px.min(other.min_height_px),
            max_height_px: self.max_height_px.max(other.max_height_px),
            window_x_mm: MmRange {
                min: self.window_x_mm.min.min(other.window_x_mm.min),
                max: self.window_x_mm.max.max(other.window_x_mm.max),
            },
            window_y_mm: MmRange {
                min: self.window_y_mm.min.min(other.window_y_mm.min),
                max: self.window_y_mm.max.max(other.window_y_mm.max),
            },
        }
    }
}

/// One optional [`SourceCapability`] per [`SourceKind`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sources([Option<SourceCapability>; 3]);

impl Sources {
    pub fn get(&self, kind: SourceKind) -> Option<&SourceCapability> {
        self.0[kind.index()].as_ref()
    }

    /// Stores `source` unless the slot is taken already. Returns whether it was stored.
    pub fn insert_if_vacant(&mut self, kind: SourceKind, source: SourceCapability) -> bool {
        let slot = &mut self.0[kind.index()];

        if slot.is_some() {
            return false;
        }

        *slot = Some(source);

        true
    }

    /// Stores `source`, returning what was there before.
    pub fn replace(
        &mut self,
        kind: SourceKind,
        source: SourceCapability,
    ) -> Option<SourceCapability> {
        self.0[kind.index()].replace(source)
    }

    pub fn remove(&mut self, kind: SourceKind) -> Option<SourceCapability> {
        self.0[kind.index()].take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Populated slots, in [`SourceKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (SourceKind, &SourceCapability)> {
        SourceKind::ALL
            .into_iter()
            .zip(self.0.iter())
            .filter_map(|(kind, source)| source.as_ref().map(|source| (kind, source)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SourceKind, &mut SourceCapability)> {
        SourceKind::ALL
            .into_iter()
            .zip(self.0.iter_mut())
            .filter_map(|(kind, source)| source.as_mut().map(|source| (kind, source)))
    }
}

/// Negotiated scan capabilities of one device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCapabilities {
    /// Name of the protocol that produced these capabilities
    pub protocol: &'static str,
    /// Pixel sizes are expressed in 1/`units` of an inch
    pub units: u32,
    pub vendor: Box<str>,
    pub model: Box<str>,
    pub sources: Sources,
}

impl DeviceCapabilities {
    /// Source kinds present on the device, in the order frontends list them.
    pub fn available_sources(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|(kind, _)| kind).collect()
    }

    pub fn log(&self) {
        event!(
            Level::DEBUG,
            protocol = self.protocol,
            vendor = &*self.vendor,
            model = &*self.model,
            units = self.units,
            "device capabilities"
        );

        for (kind, source) in self.sources.iter() {
            event!(
                Level::DEBUG,
                source = %kind,
                resolutions = %source.resolutions,
                color_modes = %FlagsDisplay(&source.color_modes),
                formats = %FlagsDisplay(&source.formats),
                min_width_px = source.min_width_px,
                max_width_px = source.max_width_px,
                min_height_px = source.min_height_px,
                max_height_px = source.max_height_px,
                "source capabilities"
            );
        }
    }
}

impl fmt::Display for DeviceCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== device capabilities =====")?;
        writeln!(f, "  protocol:    {}", self.protocol)?;
        writeln!(f, "  vendor:      {}", self.vendor)?;
        writeln!(f, "  model:       {}", self.model)?;
        writeln!(f, "  units:       1/{} inch", self.units)?;

        let sources = self
            .available_sources()
            .iter()
            .map(|kind| kind.sane_name())
            .collect::<Vec<_>>();

        writeln!(f, "  sources:     {}", sources.join(", "))?;

        for (kind, source) in self.sources.iter() {
            writeln!(f, "  {}:", kind)?;
            writeln!(f, "    formats:     {}", FlagsDisplay(&source.formats))?;
            writeln!(f, "    color modes: {}", FlagsDisplay(&source.color_modes))?;
            writeln!(f, "    resolutions: {}", source.resolutions)?;
            writeln!(
                f,
                "    width:       {}-{} px ({:.2}-{:.2} mm window)",
                source.min_width_px,
                source.max_width_px,
                source.window_x_mm.min,
                source.window_x_mm.max
            )?;
            writeln!(
                f,
                "    height:      {}-{} px ({:.2}-{:.2} mm window)",
                source.min_height_px,
                source.max_height_px,
                source.window_y_mm.min,
                source.window_y_mm.max
            )?;
        }

        Ok(())
    }
}

/// Formats set flags as a comma separated list of their names.
struct FlagsDisplay<'f, F>(&'f F);

impl<F> fmt::Display for FlagsDisplay<'_, F>
where
    F: bitflags::Flags,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.0.iter_names().map(|(name, _)| name);

        let Some(first) = names.next() else {
            return f.write_str("none");
        };

        f.write_str(first)?;

        for name in names {
            write!(f, ", {}", name)?;
        }

        Ok(())
    }
}

/// Size bounds every source must define.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Bound::MinWidth => "minimum width",
            Bound::MinHeight => "minimum height",
            Bound::MaxWidth => "maximum width",
            Bound::MaxHeight => "maximum height",
        })
    }
}

#[derive(Debug, Error)]
pub enum DevcapsError {
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("no resolutions defined")]
    NoResolutions,
    #[error("no color modes defined")]
    NoColorModes,
    #[error("{0} not defined")]
    MissingBound(Bound),
    #[error("minimum width > maximum width")]
    InvalidWidthRange,
    #[error("minimum height > maximum height")]
    InvalidHeightRange,
    #[error("neither platen nor ADF sources detected")]
    NoSources,
}
