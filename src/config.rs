use clap::Parser;

mod defaults {
    /// Used when no length is given. This is a number of seconds,
    /// unlike the argument, which counts minutes.
    pub const SECONDS: u64 = 3600;
    pub const COLOR: &'static str = "red";
    pub const FONT: &'static str = "IBM 3270:size=24:style=Bold";
}

pub const COLOR_LIMIT: usize = 19;
pub const FONT_LIMIT: usize = 255;

/// A countdown overlay that sits above everything else. Arguments are
/// purely positional; there are no flags.
#[derive(Parser, Debug, Default)]
#[command(name = "hourglass")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Length of the countdown in minutes
    #[arg(value_name = "MINUTES", allow_hyphen_values = true)]
    pub minutes: Option<String>,

    /// Color of the text, as an X11 color name or #rrggbb
    #[arg(value_name = "COLOR", allow_hyphen_values = true)]
    pub color: Option<String>,

    /// Font to draw with, e.g. "IBM 3270:size=24:style=Bold"
    #[arg(value_name = "FONT", allow_hyphen_values = true)]
    pub font: Option<String>,

    /// anything past the font is ignored
    #[arg(hide = true, allow_hyphen_values = true, num_args = 0..)]
    pub rest: Vec<String>,
}

/// Read a number of minutes the lenient way: leading blanks, an optional
/// sign, then as many digits as there are. Anything unreadable is zero,
/// and so is anything negative, since a countdown can't start below it.
pub fn parse_minutes(s: &str) -> u64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let minutes = digits
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as u64));
    if negative {
        0
    } else {
        minutes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub color: String,
    pub font: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub initial_seconds: u64,
    pub appearance: Appearance,
}

/// Keep at most `limit` characters of `s`
pub fn truncate(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

impl Config {
    pub fn from_args(args: &Args) -> Config {
        let initial_seconds = match &args.minutes {
            Some(m) => parse_minutes(m).saturating_mul(60),
            None => defaults::SECONDS,
        };
        let color = args.color.as_ref().map(String::as_str).unwrap_or(defaults::COLOR);
        let font = args.font.as_ref().map(String::as_str).unwrap_or(defaults::FONT);
        Config {
            initial_seconds,
            appearance: Appearance {
                color: truncate(color, COLOR_LIMIT),
                font: truncate(font, FONT_LIMIT),
            },
        }
    }
}
