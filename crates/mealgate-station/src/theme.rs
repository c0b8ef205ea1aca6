//! Station color palette.
//!
//! Mirrors the web client's signal colors: event green for approvals and
//! the armed scan box, red for denials, slate for idle chrome.

use ratatui::style::Color;

pub const GREEN: Color = Color::Rgb(0x2e, 0x8b, 0x57);
pub const GREEN_LIGHT: Color = Color::Rgb(0x3c, 0xb3, 0x71);
pub const RED: Color = Color::Rgb(0xdc, 0x4a, 0x4a);
pub const SLATE: Color = Color::Rgb(0x64, 0x74, 0x8b);
pub const DIM: Color = Color::DarkGray;
pub const TEXT: Color = Color::White;
