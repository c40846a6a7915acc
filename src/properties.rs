//! Device property identifiers and raw values.
//!
//! Every property the wrapper tracks falls into one of three classes:
//! immutable (read once at construction), read-only (refreshed by device
//! events), and settable (also refreshed by successful command dispatch).

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    ProductName,
    SerialNumber,
    FirmwareVersion,
    StorageType,
    AeMode,
    AfMode,
    ImageQuality,
    LensName,
    WhiteBalance,
    ColorTemperature,
    ColorSpace,
    DriveMode,
    MeteringMode,
    Iso,
    Aperture,
    ShutterSpeed,
    ExposureCompensation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyClass {
    Immutable,
    ReadOnly,
    Settable,
}

impl PropertyId {
    pub fn class(self) -> PropertyClass {
        match self {
            PropertyId::ProductName | PropertyId::SerialNumber | PropertyId::FirmwareVersion => {
                PropertyClass::Immutable
            }
            PropertyId::StorageType
            | PropertyId::AeMode
            | PropertyId::AfMode
            | PropertyId::ImageQuality
            | PropertyId::LensName => PropertyClass::ReadOnly,
            PropertyId::WhiteBalance
            | PropertyId::ColorTemperature
            | PropertyId::ColorSpace
            | PropertyId::DriveMode
            | PropertyId::MeteringMode
            | PropertyId::Iso
            | PropertyId::Aperture
            | PropertyId::ShutterSpeed
            | PropertyId::ExposureCompensation => PropertyClass::Settable,
        }
    }

    pub fn is_settable(self) -> bool {
        self.class() == PropertyClass::Settable
    }

    /// Properties whose raw value is free text rather than a coded number.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            PropertyId::ProductName
                | PropertyId::SerialNumber
                | PropertyId::FirmwareVersion
                | PropertyId::LensName
        )
    }

    pub fn all() -> [PropertyId; 17] {
        [
            PropertyId::ProductName,
            PropertyId::SerialNumber,
            PropertyId::FirmwareVersion,
            PropertyId::StorageType,
            PropertyId::AeMode,
            PropertyId::AfMode,
            PropertyId::ImageQuality,
            PropertyId::LensName,
            PropertyId::WhiteBalance,
            PropertyId::ColorTemperature,
            PropertyId::ColorSpace,
            PropertyId::DriveMode,
            PropertyId::MeteringMode,
            PropertyId::Iso,
            PropertyId::Aperture,
            PropertyId::ShutterSpeed,
            PropertyId::ExposureCompensation,
        ]
    }

    pub fn settable() -> [PropertyId; 9] {
        [
            PropertyId::WhiteBalance,
            PropertyId::ColorTemperature,
            PropertyId::ColorSpace,
            PropertyId::DriveMode,
            PropertyId::MeteringMode,
            PropertyId::Iso,
            PropertyId::Aperture,
            PropertyId::ShutterSpeed,
            PropertyId::ExposureCompensation,
        ]
    }

    /// Short keyword used by the interactive CLI.
    pub fn keyword(self) -> &'static str {
        match self {
            PropertyId::ProductName => "camera",
            PropertyId::SerialNumber => "serial",
            PropertyId::FirmwareVersion => "firmware",
            PropertyId::StorageType => "storage",
            PropertyId::AeMode => "ae",
            PropertyId::AfMode => "af_mode",
            PropertyId::ImageQuality => "quality",
            PropertyId::LensName => "lens",
            PropertyId::WhiteBalance => "wb",
            PropertyId::ColorTemperature => "temperature",
            PropertyId::ColorSpace => "color_space",
            PropertyId::DriveMode => "drive_mode",
            PropertyId::MeteringMode => "metering_mode",
            PropertyId::Iso => "iso",
            PropertyId::Aperture => "av",
            PropertyId::ShutterSpeed => "tv",
            PropertyId::ExposureCompensation => "exp_compensation",
        }
    }
}

impl FromStr for PropertyId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyId::all()
            .into_iter()
            .find(|p| p.keyword() == s)
            .ok_or(())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Last-known raw value of a property as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    U32(u32),
    Text(String),
}
