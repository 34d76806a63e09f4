//! Page geometry, text measurement and the vertical cursor.
//!
//! Coordinates are millimetres from the bottom-left corner of an A4 page,
//! matching the PDF coordinate system.

use super::RenderError;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN_X: f32 = 20.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
pub const TOP_MARGIN: f32 = 272.0;
pub const BOTTOM_MARGIN: f32 = 25.0;
pub const FOOTER_Y: f32 = 12.0;

const PT_TO_MM: f32 = 0.3528;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const TEXT: Color = Color { r: 31, g: 41, b: 55 };
    pub const MUTED: Color = Color { r: 107, g: 114, b: 128 };
    pub const RULE: Color = Color { r: 209, g: 213, b: 219 };

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, RenderError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RenderError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| RenderError::InvalidColor(hex.to_string()))
        };
        Ok(Color { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }

    /// Blend toward white; `amount` is clamped to 0..=1.
    pub fn lighten(self, amount: f32) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * t).round() as u8;
        Color { r: mix(self.r), g: mix(self.g), b: mix(self.b) }
    }

    pub fn to_unit(self) -> (f32, f32, f32) {
        (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
    Italic,
}

/// Approximate advance width of `text` in millimetres for the built-in
/// Helvetica faces.
pub fn text_width(text: &str, size: f32, weight: FontWeight) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.24,
            ' ' | 'f' | 't' | 'r' | '(' | ')' | '-' | '/' => 0.32,
            'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.86,
            '0'..='9' => 0.56,
            c if c.is_ascii_uppercase() => 0.68,
            _ => 0.54,
        })
        .sum();
    let factor = if weight == FontWeight::Bold { 1.07 } else { 1.0 };
    em * size * PT_TO_MM * factor
}

/// Greedy word wrap to `max_width` mm. Words wider than a line are split.
pub fn wrap(text: &str, max_width: f32, size: f32, weight: FontWeight) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() { word.to_string() } else { format!("{} {}", current, word) };
        if text_width(&candidate, size, weight) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, size, weight) <= max_width {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                current.push(ch);
                if text_width(&current, size, weight) > max_width && current.chars().count() > 1 {
                    let last = current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.extend(last);
                }
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletMarker {
    Dot,
    Dash,
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Header(&'a str),
    Bullet(BulletMarker, &'a str),
    Paragraph(&'a str),
}

pub fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if let Some(inner) = line.strip_prefix("**").and_then(|l| l.strip_suffix("**")) {
        if !inner.trim().is_empty() && !inner.contains("**") {
            return LineKind::Header(inner.trim());
        }
    }
    if line.starts_with('#') {
        let inner = line.trim_start_matches('#').trim();
        if !inner.is_empty() {
            return LineKind::Header(inner);
        }
    }
    let markers = [('•', BulletMarker::Dot), ('-', BulletMarker::Dash), ('□', BulletMarker::Checkbox)];
    for (prefix, marker) in markers {
        if let Some(rest) = line.strip_prefix(prefix) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return LineKind::Bullet(marker, rest);
            }
        }
    }
    LineKind::Paragraph(line)
}

/// Reduce text to what the built-in fonts can draw: typographic
/// punctuation becomes ASCII, inline bold markers are dropped, accented
/// Latin letters lose their accents and anything else unprintable goes.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.replace("**", "").chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' | '\t' => out.push(' '),
            '\u{00D7}' => out.push('x'),
            '\u{2192}' => out.push_str("->"),
            '\n' => out.push('\n'),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c => {
                if let Some(folded) = fold_latin(c) {
                    out.push(folded);
                }
            }
        }
    }
    out
}

fn fold_latin(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(folded)
}

/// Where the next line goes after advancing the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub baseline: f32,
    pub new_page: bool,
}

/// Vertical write position on the current page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    y: f32,
    top: f32,
    bottom: f32,
}

impl Cursor {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { y: top, top, bottom }
    }

    pub fn starting_at(y: f32, top: f32, bottom: f32) -> Self {
        Self { y, top, bottom }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn at_top(&self) -> bool {
        (self.y - self.top).abs() < f32::EPSILON
    }

    /// Move down by `height`. If that would cross the bottom margin, the
    /// cursor first resets to the top margin and reports a new page. A line
    /// taller than the page is placed anyway rather than breaking forever.
    pub fn advance(&mut self, height: f32) -> Advance {
        let mut new_page = false;
        if self.y - height < self.bottom && !self.at_top() {
            self.y = self.top;
            new_page = true;
        }
        self.y -= height;
        Advance { baseline: self.y, new_page }
    }

    /// Vertical space that never forces a break on its own.
    pub fn skip(&mut self, gap: f32) {
        self.y = (self.y - gap).max(self.bottom);
    }
}
