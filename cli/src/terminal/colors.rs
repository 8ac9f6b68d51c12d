use colored::Color;

pub const PRIMARY: Color = Color::BrightWhite;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const IPV4_ADDR: Color = Color::TrueColor { r: 90, g: 200, b: 250 };
pub const IPV4_PREFIX: Color = Color::TrueColor { r: 60, g: 140, b: 180 };
pub const MAC_ADDR: Color = Color::TrueColor { r: 255, g: 190, b: 80 };
pub const VENDOR: Color = Color::TrueColor { r: 200, g: 160, b: 255 };

pub const SUCCESS: Color = Color::Green;
pub const FAILURE: Color = Color::Red;
