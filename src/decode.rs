//! Raw-code decoding tables.
//!
//! Translates the vendor's numeric property codes into display strings.
//! Pure lookups with a fixed table per property; anything unmapped comes
//! back as `"unknown"`.

use crate::properties::PropertyId;

pub const UNKNOWN: &str = "unknown";

/// Decode a raw property code into its display string.
pub fn decode(prop: PropertyId, value: u32) -> String {
    match prop {
        // Color temperature is a plain Kelvin number, not a coded table.
        PropertyId::ColorTemperature => format!("{}K", value),
        PropertyId::StorageType => storage_type(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::AeMode => ae_mode(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::AfMode => af_mode(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::ImageQuality => image_quality(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::WhiteBalance => white_balance(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::ColorSpace => color_space(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::DriveMode => drive_mode(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::MeteringMode => metering_mode(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::Iso => iso(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::Aperture => aperture(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::ShutterSpeed => shutter_speed(value).unwrap_or(UNKNOWN).to_string(),
        PropertyId::ExposureCompensation => {
            exposure_compensation(value).unwrap_or(UNKNOWN).to_string()
        }
        // Text-valued properties never go through the code tables.
        PropertyId::ProductName
        | PropertyId::SerialNumber
        | PropertyId::FirmwareVersion
        | PropertyId::LensName => UNKNOWN.to_string(),
    }
}

fn storage_type(value: u32) -> Option<&'static str> {
    match value {
        0 => Some("none"),
        1 => Some("CF"),
        2 => Some("SD"),
        _ => None,
    }
}

fn ae_mode(value: u32) -> Option<&'static str> {
    match value {
        0 => Some("Program AE"),
        1 => Some("Shutter-Speed Priority AE"),
        2 => Some("Aperture Priority AE"),
        3 => Some("Manual Exposure"),
        4 => Some("Bulb"),
        5 => Some("Auto Depth-of-Field AE"),
        8 => Some("Lock"),
        9 => Some("Auto"),
        10 => Some("Night Portrait"),
        11 => Some("Sports"),
        12 => Some("Portrait"),
        13 => Some("Landscape"),
        14 => Some("Close-Up"),
        15 => Some("Flash Off"),
        19 => Some("Creative Auto"),
        21 => Some("Movie"),
        22 => Some("Scene Intelligent Auto"),
        _ => None,
    }
}

fn af_mode(value: u32) -> Option<&'static str> {
    match value {
        0 => Some("One-Shot AF"),
        1 => Some("AI Servo AF"),
        2 => Some("AI Focus AF"),
        3 => Some("Manual Focus"),
        _ => None,
    }
}

fn image_quality(value: u32) -> Option<&'static str> {
    match value {
        0x0010_ff0f => Some("Large Fine JPEG"),
        0x0011_ff0f => Some("Large Normal JPEG"),
        0x0110_ff0f => Some("Medium Fine JPEG"),
        0x0111_ff0f => Some("Medium Normal JPEG"),
        0x0210_ff0f => Some("Small Fine JPEG"),
        0x0211_ff0f => Some("Small Normal JPEG"),
        0x0063_ff0f => Some("RAW"),
        0x0064_0010 => Some("RAW + Large Fine JPEG"),
        _ => None,
    }
}

fn white_balance(value: u32) -> Option<&'static str> {
    match value {
        0 => Some("Auto"),
        1 => Some("Daylight"),
        2 => Some("Cloudy"),
        3 => Some("Tungsten"),
        4 => Some("Fluorescent"),
        5 => Some("Flash"),
        6 => Some("Manual"),
        8 => Some("Shade"),
        9 => Some("Color Temperature"),
        10 => Some("Custom PC-1"),
        11 => Some("Custom PC-2"),
        12 => Some("Custom PC-3"),
        _ => None,
    }
}

fn color_space(value: u32) -> Option<&'static str> {
    match value {
        1 => Some("sRGB"),
        2 => Some("Adobe RGB"),
        _ => None,
    }
}

fn drive_mode(value: u32) -> Option<&'static str> {
    match value {
        0x00 => Some("Single Shooting"),
        0x01 => Some("Continuous Shooting"),
        0x02 => Some("Video"),
        0x04 => Some("High-Speed Continuous"),
        0x05 => Some("Low-Speed Continuous"),
        0x06 => Some("Silent Single Shooting"),
        0x10 => Some("10s Self-Timer + Continuous"),
        0x11 => Some("10s Self-Timer"),
        0x12 => Some("2s Self-Timer"),
        _ => None,
    }
}

fn metering_mode(value: u32) -> Option<&'static str> {
    match value {
        1 => Some("Spot"),
        3 => Some("Evaluative"),
        4 => Some("Partial"),
        5 => Some("Center-Weighted Average"),
        _ => None,
    }
}

fn iso(value: u32) -> Option<&'static str> {
    match value {
        0x00 => Some("Auto"),
        0x40 => Some("50"),
        0x48 => Some("100"),
        0x4b => Some("125"),
        0x4d => Some("160"),
        0x50 => Some("200"),
        0x53 => Some("250"),
        0x55 => Some("320"),
        0x58 => Some("400"),
        0x5b => Some("500"),
        0x5d => Some("640"),
        0x60 => Some("800"),
        0x63 => Some("1000"),
        0x65 => Some("1250"),
        0x68 => Some("1600"),
        0x70 => Some("3200"),
        0x78 => Some("6400"),
        0x80 => Some("12800"),
        0x88 => Some("25600"),
        _ => None,
    }
}

fn aperture(value: u32) -> Option<&'static str> {
    match value {
        0x08 => Some("f/1.0"),
        0x10 => Some("f/1.4"),
        0x14 => Some("f/1.8"),
        0x18 => Some("f/2.0"),
        0x1d => Some("f/2.5"),
        0x20 => Some("f/2.8"),
        0x25 => Some("f/3.5"),
        0x28 => Some("f/4.0"),
        0x2b => Some("f/4.5"),
        0x2d => Some("f/5.0"),
        0x30 => Some("f/5.6"),
        0x33 => Some("f/6.3"),
        0x35 => Some("f/7.1"),
        0x38 => Some("f/8.0"),
        0x3b => Some("f/9.0"),
        0x3d => Some("f/10"),
        0x40 => Some("f/11"),
        0x43 => Some("f/13"),
        0x45 => Some("f/14"),
        0x48 => Some("f/16"),
        0x50 => Some("f/22"),
        0x58 => Some("f/32"),
        _ => None,
    }
}

fn shutter_speed(value: u32) -> Option<&'static str> {
    match value {
        0x0c => Some("Bulb"),
        0x10 => Some("30\""),
        0x13 => Some("25\""),
        0x14 => Some("20\""),
        0x18 => Some("15\""),
        0x1c => Some("10\""),
        0x20 => Some("8\""),
        0x24 => Some("6\""),
        0x28 => Some("4\""),
        0x2c => Some("3\""),
        0x30 => Some("2\""),
        0x34 => Some("1\"5"),
        0x38 => Some("1\""),
        0x3c => Some("0\"7"),
        0x40 => Some("0\"5"),
        0x44 => Some("0\"3"),
        0x48 => Some("1/4"),
        0x4c => Some("1/6"),
        0x50 => Some("1/8"),
        0x54 => Some("1/10"),
        0x58 => Some("1/15"),
        0x5c => Some("1/20"),
        0x60 => Some("1/30"),
        0x64 => Some("1/45"),
        0x68 => Some("1/60"),
        0x6c => Some("1/90"),
        0x70 => Some("1/125"),
        0x73 => Some("1/160"),
        0x75 => Some("1/200"),
        0x78 => Some("1/250"),
        0x7c => Some("1/350"),
        0x80 => Some("1/500"),
        0x84 => Some("1/750"),
        0x88 => Some("1/1000"),
        0x8c => Some("1/1500"),
        0x90 => Some("1/2000"),
        0x94 => Some("1/3000"),
        0x98 => Some("1/4000"),
        0x9c => Some("1/6000"),
        0xa0 => Some("1/8000"),
        _ => None,
    }
}

fn exposure_compensation(value: u32) -> Option<&'static str> {
    match value {
        0x18 => Some("+3"),
        0x15 => Some("+2 2/3"),
        0x14 => Some("+2 1/2"),
        0x13 => Some("+2 1/3"),
        0x10 => Some("+2"),
        0x0d => Some("+1 2/3"),
        0x0c => Some("+1 1/2"),
        0x0b => Some("+1 1/3"),
        0x08 => Some("+1"),
        0x05 => Some("+2/3"),
        0x04 => Some("+1/2"),
        0x03 => Some("+1/3"),
        0x00 => Some("0"),
        0xfd => Some("-1/3"),
        0xfc => Some("-1/2"),
        0xfb => Some("-2/3"),
        0xf8 => Some("-1"),
        0xf5 => Some("-1 1/3"),
        0xf4 => Some("-1 1/2"),
        0xf3 => Some("-1 2/3"),
        0xf0 => Some("-2"),
        0xed => Some("-2 1/3"),
        0xec => Some("-2 1/2"),
        0xeb => Some("-2 2/3"),
        0xe8 => Some("-3"),
        _ => None,
    }
}
