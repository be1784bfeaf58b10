//! Styled Advanced SubStation Alpha rendering of a subtitle track.

use super::pod::{Preset, SubtitleFont};
use super::subtitles::SubtitleTrack;

/// Lines with more words than this are broken in two.
pub const DEFAULT_SPLIT_THRESHOLD: usize = 4;

const LINE_BREAK: &str = "\\N";
const WHITE: &str = "&HFFFFFF";

/// Visual parameters of the single `Default` style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssStyle {
    pub font: SubtitleFont,
    pub size: u32,
    pub primary_colour: String,
    pub outline_colour: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub outline: u32,
    pub shadow: u32,
    pub split_threshold: usize,
}

impl Default for AssStyle {
    fn default() -> Self {
        AssStyle {
            font: SubtitleFont::default(),
            size: 16,
            primary_colour: "#FFFFFF".to_string(),
            outline_colour: "#000000".to_string(),
            bold: false,
            italic: false,
            underline: false,
            outline: 1,
            shadow: 0,
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
        }
    }
}

impl AssStyle {
    pub fn from_preset(preset: &Preset, split_threshold: usize) -> Self {
        AssStyle {
            font: preset.subtitle_font,
            size: preset.subtitle_size,
            primary_colour: preset.subtitle_color.clone(),
            outline_colour: preset.subtitle_outline_color.clone(),
            bold: preset.subtitle_bold,
            italic: preset.subtitle_italic,
            underline: preset.subtitle_underline,
            outline: preset.subtitle_outline_thickness,
            shadow: preset.subtitle_shadow,
            split_threshold,
        }
    }

    fn header(&self) -> String {
        format!(
            "[Script Info]\n\
             ScriptType: v4.00+\n\
             PlayResX: 384\n\
             PlayResY: 288\n\
             WrapStyle: 0\n\
             ScaledBorderAndShadow: yes\n\
             \n\
             [V4+ Styles]\n\
             Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, \
             Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, \
             Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n\
             Style: Default,{font},{size},{primary},{primary},{outline_colour},&H000000,\
             {bold},{italic},{underline},0,100,100,0,0,1,{outline},{shadow},2,10,10,10,1\n\
             \n\
             [Events]\n\
             Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
            font = self.font.family(),
            size = self.size,
            primary = ass_colour(&self.primary_colour),
            outline_colour = ass_colour(&self.outline_colour),
            bold = ass_flag(self.bold),
            italic = ass_flag(self.italic),
            underline = ass_flag(self.underline),
            outline = self.outline,
            shadow = self.shadow,
        )
    }
}

impl SubtitleTrack {
    /// Render the styled presentation: header, then one `Dialogue` per cue.
    pub fn to_ass(&self, style: &AssStyle) -> String {
        let mut out = style.header();
        for cue in &self.cues {
            let text = cue
                .lines
                .iter()
                .flat_map(|line| split_long_line(line, style.split_threshold))
                .collect::<Vec<_>>()
                .join(LINE_BREAK);
            out.push_str(&format!(
                "Dialogue: 0,{},{},Default,,0,0,0,,{}\n",
                cue.start.to_ass(),
                cue.end.to_ass(),
                text
            ));
        }
        out
    }
}

/// `#RRGGBB` to `&HBBGGRR`. Anything else falls back to white.
pub fn ass_colour(hex: &str) -> String {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return WHITE.to_string();
    }
    let (rr, rest) = digits.split_at(2);
    let (gg, bb) = rest.split_at(2);
    format!("&H{}{}{}", bb, gg, rr).to_uppercase()
}

/// Break a line at its middle word when it has more than `threshold` words.
pub fn split_long_line(line: &str, threshold: usize) -> Vec<String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() <= threshold {
        return vec![line.trim().to_string()];
    }
    let (head, tail) = words.split_at(words.len() / 2);
    vec![head.join(" "), tail.join(" ")]
}

fn ass_flag(on: bool) -> i8 {
    if on {
        -1
    } else {
        0
    }
}
