use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Paragraph alignment.
pub enum Alignment {
    /// Flush left.
    #[default]
    Left,
    /// Flush right.
    Right,
    /// Centred.
    Center,
    /// Justified.
    Justify,
}

impl Alignment {
    /// Lower-case name used in markup tags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Justify => "justify",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A run of text sharing one style.
pub struct Span {
    /// Run text; carriage returns are normalised on render.
    pub text: String,
    /// Font family, when known.
    pub font: Option<String>,
    /// Point size, when known.
    pub size: Option<u16>,
    /// Foreground colour, when known.
    pub color: Option<[u8; 3]>,
    /// Paragraph alignment, when known.
    pub align: Option<Alignment>,
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Underlined.
    pub underline: bool,
    /// Struck through.
    pub strike: bool,
}

/// Render spans as lightweight markup.
///
/// Font, size, colour and alignment tags are emitted only where they change from the
/// previous span; emphasis wraps each span's text.
pub fn render(spans: &[Span]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Span> = None;
    for span in spans {
        if span.text.is_empty() {
            continue;
        }
        if let Some(font) = &span.font
            && prev.is_none_or(|p| p.font.as_ref() != Some(font))
        {
            let _ = write!(out, "{{{{FONT-FAMILY:{font}}}}}");
        }
        if let Some(size) = span.size
            && prev.is_none_or(|p| p.size != Some(size))
        {
            let _ = write!(out, "{{{{FONT-SIZE:{size}}}}}");
        }
        if let Some([r, g, b]) = span.color
            && prev.is_none_or(|p| p.color != span.color)
        {
            let _ = write!(out, "{{{{COLOR:#{r:02x}{g:02x}{b:02x}}}}}");
        }
        if let Some(align) = span.align
            && prev.is_none_or(|p| p.align != Some(align))
        {
            let _ = write!(out, "{{{{ALIGN:{}}}}}", align.as_str());
        }
        out.push_str(&emphasize(span));
        prev = Some(span);
    }
    out
}

fn emphasize(span: &Span) -> String {
    let mut text = normalize_newlines(&span.text);
    for (on, mark) in [
        (span.bold, "**"),
        (span.italic, "*"),
        (span.underline, "__"),
        (span.strike, "~~"),
    ] {
        if on {
            text = format!("{mark}{text}{mark}");
        }
    }
    text
}

/// Convert carriage-return line endings to newlines.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Concatenated span text without markup.
pub fn plain_text(spans: &[Span]) -> String {
    normalize_newlines(&spans.iter().map(|s| s.text.as_str()).collect::<String>())
}

#[cfg(test)]
#[path = "../../tests/unit/decode/markup.rs"]
mod tests;
