//! Text layout and rasterization.
//! Uses fontdue for TrueType faces, with a built-in 5x7 bitmap face so text
//! always renders even on a machine with no fonts installed.
//!
//! All measurement is pure: given a face, a size and a string, the result is
//! deterministic. Overlays are full-frame transparent RGBA buffers meant to be
//! composited over the background.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use threadreel_core::frame::FrameBuffer;
use threadreel_core::{Color, ReelError, ReelResult, Segment, TextConfig};

/// Font size decrement used when shrinking text to fit.
pub const FONT_SIZE_STEP: f32 = 2.0;

/// Well-known font locations probed when no font is configured.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A typeface that text can be measured and drawn with.
#[derive(Clone)]
pub enum FontFace {
    TrueType { name: String, font: Arc<Font> },
    /// Fixed 5x7 pixel face scaled to the requested size.
    Builtin,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FontFace({})", self.name())
    }
}

impl FontFace {
    /// Load a TrueType/OpenType face from disk.
    pub fn from_file(path: &Path) -> ReelResult<Self> {
        let data = std::fs::read(path).map_err(|e| {
            ReelError::asset(
                format!("failed to read font file {}: {}", path.display(), e),
                path,
            )
        })?;
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|e| {
            ReelError::asset(format!("failed to parse font {}: {}", path.display(), e), path)
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string());
        Ok(FontFace::TrueType {
            name,
            font: Arc::new(font),
        })
    }

    pub fn builtin() -> Self {
        FontFace::Builtin
    }

    pub fn name(&self) -> &str {
        match self {
            FontFace::TrueType { name, .. } => name,
            FontFace::Builtin => "builtin-5x7",
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin)
    }

    /// Height of one line of text at `size`.
    pub fn line_height(&self, size: f32) -> u32 {
        match self {
            FontFace::TrueType { font, .. } => match font.horizontal_line_metrics(size) {
                Some(m) => (m.ascent - m.descent).ceil().max(1.0) as u32,
                None => (size * 1.2).ceil().max(1.0) as u32,
            },
            FontFace::Builtin => 8 * builtin_scale(size),
        }
    }

    /// Distance from the top of a line to its baseline.
    fn ascent(&self, size: f32) -> i32 {
        match self {
            FontFace::TrueType { font, .. } => match font.horizontal_line_metrics(size) {
                Some(m) => m.ascent.ceil() as i32,
                None => size.ceil() as i32,
            },
            FontFace::Builtin => 7 * builtin_scale(size) as i32,
        }
    }

    /// Measure a single line: `(width, height)` in pixels.
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        let width = match self {
            FontFace::TrueType { font, .. } => text
                .chars()
                .map(|ch| font.metrics(ch, size).advance_width)
                .sum::<f32>()
                .ceil()
                .max(0.0) as u32,
            FontFace::Builtin => text.chars().count() as u32 * 6 * builtin_scale(size),
        };
        (width, self.line_height(size))
    }

    /// Draw one line with its top-left corner at (x, y).
    fn draw_line(&self, fb: &mut FrameBuffer, text: &str, size: f32, x: i32, y: i32, rgba: [u8; 4]) {
        match self {
            FontFace::TrueType { font, .. } => {
                let baseline = y + self.ascent(size);
                let mut cursor_x = x as f32;
                for ch in text.chars() {
                    let (metrics, bitmap) = font.rasterize(ch, size);
                    let glyph_x = cursor_x.round() as i32 + metrics.xmin;
                    let glyph_y = baseline - (metrics.height as i32 + metrics.ymin);

                    for gy in 0..metrics.height {
                        for gx in 0..metrics.width {
                            let coverage = bitmap[gy * metrics.width + gx];
                            if coverage == 0 {
                                continue;
                            }
                            let px = glyph_x + gx as i32;
                            let py = glyph_y + gy as i32;
                            if px < 0 || py < 0 {
                                continue;
                            }
                            let alpha = (coverage as u32 * rgba[3] as u32 / 255) as u8;
                            fb.blend_pixel(px as u32, py as u32, [rgba[0], rgba[1], rgba[2], alpha]);
                        }
                    }

                    cursor_x += metrics.advance_width;
                }
            }
            FontFace::Builtin => {
                let scale = builtin_scale(size) as i32;
                let mut cursor_x = x;
                for ch in text.chars() {
                    let columns = builtin_glyph(ch);
                    for (col, bits) in columns.iter().enumerate() {
                        for row in 0..7 {
                            if bits & (1 << row) == 0 {
                                continue;
                            }
                            let bx = cursor_x + col as i32 * scale;
                            let by = y + row * scale;
                            for dy in 0..scale {
                                for dx in 0..scale {
                                    let (px, py) = (bx + dx, by + dy);
                                    if px >= 0 && py >= 0 {
                                        fb.blend_pixel(px as u32, py as u32, rgba);
                                    }
                                }
                            }
                        }
                    }
                    cursor_x += 6 * scale;
                }
            }
        }
    }
}

/// Resolves the face used for all overlays.
pub struct FontLibrary;

impl FontLibrary {
    /// Configured font, then known system fonts, then the built-in face.
    ///
    /// With `allow_builtin = false` and no loadable font file, text is
    /// unrenderable and this fails.
    pub fn resolve(configured: Option<&Path>, allow_builtin: bool) -> ReelResult<FontFace> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = configured {
            candidates.push(path.to_path_buf());
        }
        candidates.extend(SYSTEM_FONT_PATHS.iter().map(PathBuf::from));
        Self::resolve_from(&candidates, allow_builtin)
    }

    /// Try `candidates` in order.
    pub fn resolve_from(candidates: &[PathBuf], allow_builtin: bool) -> ReelResult<FontFace> {
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            match FontFace::from_file(path) {
                Ok(face) => {
                    tracing::debug!("Using font {}", path.display());
                    return Ok(face);
                }
                Err(e) => tracing::warn!("Skipping font {}: {}", path.display(), e),
            }
        }

        if allow_builtin {
            tracing::warn!("No font file could be loaded; using the built-in bitmap face");
            Ok(FontFace::Builtin)
        } else {
            Err(ReelError::render(
                0,
                "no usable font found and the built-in face is disabled",
            ))
        }
    }
}

/// Greedy word wrap. Explicit newlines force a break; a word wider than
/// `max_width` gets a line of its own.
pub fn wrap(face: &FontFace, text: &str, size: f32, max_width: u32) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let paragraphs: Vec<&str> = text.lines().collect();
    let first = paragraphs.iter().position(|p| !p.trim().is_empty()).unwrap_or(0);
    let last = paragraphs
        .iter()
        .rposition(|p| !p.trim().is_empty())
        .unwrap_or(0);

    let mut lines = Vec::new();
    for paragraph in &paragraphs[first..=last] {
        let mut words = paragraph.split_whitespace();
        let Some(first_word) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first_word.to_string();
        for word in words {
            let candidate = format!("{} {}", current, word);
            if face.measure(&candidate, size).0 <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// Total height of `line_count` stacked lines.
pub fn block_height(face: &FontFace, line_count: usize, size: f32, line_spacing: u32) -> u32 {
    if line_count == 0 {
        return 0;
    }
    let n = line_count as u32;
    n * face.line_height(size) + (n - 1) * line_spacing
}

/// Largest size from `start` downward (in [`FONT_SIZE_STEP`] steps) whose
/// wrapped block fits `max_height`; `min` if none does.
pub fn choose_font_size(
    face: &FontFace,
    text: &str,
    max_width: u32,
    max_height: u32,
    start: f32,
    min: f32,
    line_spacing: u32,
) -> f32 {
    let mut size = start;
    while size >= min {
        let lines = wrap(face, text, size, max_width);
        if block_height(face, lines.len(), size, line_spacing) <= max_height {
            return size;
        }
        size -= FONT_SIZE_STEP;
    }
    min
}

/// Draw `lines` centred horizontally on `center_x`, starting at `top`.
fn draw_lines(
    fb: &mut FrameBuffer,
    face: &FontFace,
    lines: &[String],
    size: f32,
    line_spacing: u32,
    center_x: i32,
    top: i32,
    color: &Color,
) -> i32 {
    let rgba = color.to_rgba8();
    let line_height = face.line_height(size) as i32;
    let mut y = top;
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            y += line_spacing as i32;
        }
        let (w, _) = face.measure(line, size);
        face.draw_line(fb, line, size, center_x - w as i32 / 2, y, rgba);
        y += line_height;
    }
    y
}

/// Transparent canvas with `lines` centred horizontally and vertically.
pub fn render_overlay(
    face: &FontFace,
    lines: &[String],
    size: f32,
    line_spacing: u32,
    canvas_width: u32,
    canvas_height: u32,
    color: &Color,
) -> FrameBuffer {
    let mut fb = FrameBuffer::new(canvas_width, canvas_height);
    let height = block_height(face, lines.len(), size, line_spacing) as i32;
    let top = (canvas_height as i32 - height) / 2;
    draw_lines(
        &mut fb,
        face,
        lines,
        size,
        line_spacing,
        canvas_width as i32 / 2,
        top,
        color,
    );
    fb
}

/// A laid-out run of text: wrapped lines at a chosen size.
struct TextBlock {
    lines: Vec<String>,
    size: f32,
}

impl TextBlock {
    fn height(&self, face: &FontFace, spacing: u32) -> u32 {
        block_height(face, self.lines.len(), self.size, spacing)
    }
}

const TITLE_START_SIZE: f32 = 84.0;
const TITLE_MIN_SIZE: f32 = 40.0;
const CARD_TEXT_START_SIZE: f32 = 56.0;
const CARD_TEXT_MIN_SIZE: f32 = 28.0;
const META_SIZE: f32 = 34.0;
const CARD_INSET: u32 = 40;
const CARD_RADIUS: u32 = 32;

fn card_color() -> Color {
    Color::rgba(0.0, 0.0, 0.0, 0.6)
}

fn meta_color(text: &Color) -> Color {
    text.with_alpha(text.a * 0.75)
}

/// Renders the role card for each kind of segment.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    face: FontFace,
    width: u32,
    height: u32,
    color: Color,
    padding: u32,
    line_spacing: u32,
}

impl CardRenderer {
    pub fn new(face: FontFace, width: u32, height: u32, text: &TextConfig) -> Self {
        Self {
            face,
            width,
            height,
            color: text.color,
            padding: text.padding,
            line_spacing: text.line_spacing,
        }
    }

    pub fn face(&self) -> &FontFace {
        &self.face
    }

    /// Overlay for any segment.
    pub fn render_segment(&self, segment: &Segment) -> FrameBuffer {
        match segment {
            Segment::Title {
                text,
                author,
                subreddit,
            } => self.render_title_card(text, author.as_deref(), subreddit.as_deref()),
            Segment::Body {
                text,
                part,
                total_parts,
            } => self.render_body_card(text, *part, *total_parts),
            Segment::Comment {
                text,
                author,
                score,
                rank,
            } => self.render_comment_card(text, author.as_deref(), *score, *rank),
            Segment::Generic { text } => self.render_generic_card(text),
        }
    }

    fn text_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.padding).max(1)
    }

    fn fit(&self, text: &str, max_width: u32, max_height: u32, start: f32, min: f32) -> TextBlock {
        let size = choose_font_size(
            &self.face,
            text,
            max_width,
            max_height,
            start,
            min,
            self.line_spacing,
        );
        TextBlock {
            lines: wrap(&self.face, text, size, max_width),
            size,
        }
    }

    fn meta(&self, text: &str, max_width: u32) -> TextBlock {
        TextBlock {
            lines: wrap(&self.face, text, META_SIZE, max_width),
            size: META_SIZE,
        }
    }

    /// Title centred on the upper third of the frame, with the subreddit
    /// above it and the poster below.
    pub fn render_title_card(
        &self,
        text: &str,
        author: Option<&str>,
        subreddit: Option<&str>,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(self.width, self.height);
        let max_width = self.text_width().saturating_sub(2 * CARD_INSET).max(1);
        let gap = self.line_spacing * 2;

        let header = subreddit
            .filter(|s| !s.trim().is_empty())
            .map(|s| self.meta(&format!("r/{}", s.trim_start_matches("r/")), max_width));
        let footer = author
            .filter(|a| !a.trim().is_empty())
            .map(|a| self.meta(&format!("Posted by u/{}", a.trim_start_matches("u/")), max_width));

        let meta_height: u32 = header
            .iter()
            .chain(footer.iter())
            .map(|b| b.height(&self.face, self.line_spacing) + gap)
            .sum();
        let band = (self.height / 3).saturating_sub(meta_height).max(1);
        let title = self.fit(text, max_width, band, TITLE_START_SIZE, TITLE_MIN_SIZE);

        let blocks: Vec<(&TextBlock, Color)> = header
            .iter()
            .map(|b| (b, meta_color(&self.color)))
            .chain(std::iter::once((&title, self.color)))
            .chain(footer.iter().map(|b| (b, meta_color(&self.color))))
            .filter(|(b, _)| !b.lines.is_empty())
            .collect();

        let total = stacked_height(&self.face, &blocks, self.line_spacing, gap);
        if total == 0 {
            return fb;
        }
        let top = self.height as i32 / 3 - total as i32 / 2;

        fb.fill_rounded_rect(
            self.padding as i32,
            top - CARD_INSET as i32,
            self.text_width(),
            total + 2 * CARD_INSET,
            CARD_RADIUS,
            &card_color(),
        );
        self.draw_stack(&mut fb, &blocks, top, gap);
        fb
    }

    /// Comment on a rounded card filling the middle half of the frame.
    pub fn render_comment_card(
        &self,
        text: &str,
        author: Option<&str>,
        score: i64,
        rank: u32,
    ) -> FrameBuffer {
        let author = author
            .filter(|a| !a.trim().is_empty())
            .map(|a| a.trim_start_matches("u/"))
            .unwrap_or("[deleted]");
        let points = if score == 1 { "point" } else { "points" };
        let header = format!("u/{} \u{b7} {} {}", author, score, points);
        self.render_card(Some(&header), text, Some(&format!("#{}", rank)))
    }

    /// Body part on the card, with a "Part i/N" indicator.
    pub fn render_body_card(&self, text: &str, part: u32, total_parts: u32) -> FrameBuffer {
        self.render_card(Some(&format!("Part {}/{}", part, total_parts)), text, None)
    }

    pub fn render_generic_card(&self, text: &str) -> FrameBuffer {
        self.render_card(None, text, None)
    }

    fn render_card(&self, header: Option<&str>, text: &str, footer: Option<&str>) -> FrameBuffer {
        let mut fb = FrameBuffer::new(self.width, self.height);

        let card_top = self.height / 4;
        let card_height = (self.height / 2).max(1);
        fb.fill_rounded_rect(
            self.padding as i32,
            card_top as i32,
            self.text_width(),
            card_height,
            CARD_RADIUS,
            &card_color(),
        );

        let max_width = self.text_width().saturating_sub(2 * CARD_INSET).max(1);
        let gap = self.line_spacing * 2;
        let header = header.map(|h| self.meta(h, max_width));
        let footer = footer.map(|f| self.meta(f, max_width));

        let meta_height: u32 = header
            .iter()
            .chain(footer.iter())
            .map(|b| b.height(&self.face, self.line_spacing) + gap)
            .sum();
        let available = card_height
            .saturating_sub(2 * CARD_INSET)
            .saturating_sub(meta_height)
            .max(1);
        let body = self.fit(text, max_width, available, CARD_TEXT_START_SIZE, CARD_TEXT_MIN_SIZE);

        let blocks: Vec<(&TextBlock, Color)> = header
            .iter()
            .map(|b| (b, meta_color(&self.color)))
            .chain(std::iter::once((&body, self.color)))
            .chain(footer.iter().map(|b| (b, meta_color(&self.color))))
            .filter(|(b, _)| !b.lines.is_empty())
            .collect();

        let total = stacked_height(&self.face, &blocks, self.line_spacing, gap);
        let top = card_top as i32 + (card_height as i32 - total as i32) / 2;
        self.draw_stack(&mut fb, &blocks, top, gap);
        fb
    }

    fn draw_stack(&self, fb: &mut FrameBuffer, blocks: &[(&TextBlock, Color)], top: i32, gap: u32) {
        let center_x = self.width as i32 / 2;
        let mut y = top;
        for (i, (block, color)) in blocks.iter().enumerate() {
            if i > 0 {
                y += gap as i32;
            }
            y = draw_lines(
                fb,
                &self.face,
                &block.lines,
                block.size,
                self.line_spacing,
                center_x,
                y,
                color,
            );
        }
    }
}

fn stacked_height(face: &FontFace, blocks: &[(&TextBlock, Color)], spacing: u32, gap: u32) -> u32 {
    let content: u32 = blocks.iter().map(|(b, _)| b.height(face, spacing)).sum();
    content + gap * blocks.len().saturating_sub(1) as u32
}

fn builtin_scale(size: f32) -> u32 {
    ((size / 8.0).round() as u32).max(1)
}

/// Column bitmaps for the built-in face, bit 0 at the top.
fn builtin_glyph(ch: char) -> [u8; 5] {
    let ch = match ch {
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201c}' | '\u{201d}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        '\u{b7}' | '\u{2022}' => return [0x00, 0x00, 0x08, 0x00, 0x00],
        '\u{2026}' => return [0x40, 0x00, 0x40, 0x00, 0x40],
        other => other,
    };
    let code = ch as u32;
    if (0x20..=0x7e).contains(&code) {
        BUILTIN_GLYPHS[(code - 0x20) as usize]
    } else {
        BUILTIN_GLYPHS[('?' as u32 - 0x20) as usize]
    }
}

const BUILTIN_GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5f, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7f, 0x14, 0x7f, 0x14], // #
    [0x24, 0x2a, 0x7f, 0x2a, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1c, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1c, 0x00], // )
    [0x08, 0x2a, 0x1c, 0x2a, 0x08], // *
    [0x08, 0x08, 0x3e, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3e, 0x51, 0x49, 0x45, 0x3e], // 0
    [0x00, 0x42, 0x7f, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4b, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7f, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3c, 0x4a, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1e], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3e], // @
    [0x7e, 0x11, 0x11, 0x11, 0x7e], // A
    [0x7f, 0x49, 0x49, 0x49, 0x36], // B
    [0x3e, 0x41, 0x41, 0x41, 0x22], // C
    [0x7f, 0x41, 0x41, 0x22, 0x1c], // D
    [0x7f, 0x49, 0x49, 0x49, 0x41], // E
    [0x7f, 0x09, 0x09, 0x01, 0x01], // F
    [0x3e, 0x41, 0x41, 0x51, 0x32], // G
    [0x7f, 0x08, 0x08, 0x08, 0x7f], // H
    [0x00, 0x41, 0x7f, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3f, 0x01], // J
    [0x7f, 0x08, 0x14, 0x22, 0x41], // K
    [0x7f, 0x40, 0x40, 0x40, 0x40], // L
    [0x7f, 0x02, 0x04, 0x02, 0x7f], // M
    [0x7f, 0x04, 0x08, 0x10, 0x7f], // N
    [0x3e, 0x41, 0x41, 0x41, 0x3e], // O
    [0x7f, 0x09, 0x09, 0x09, 0x06], // P
    [0x3e, 0x41, 0x51, 0x21, 0x5e], // Q
    [0x7f, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7f, 0x01, 0x01], // T
    [0x3f, 0x40, 0x40, 0x40, 0x3f], // U
    [0x1f, 0x20, 0x40, 0x20, 0x1f], // V
    [0x7f, 0x20, 0x18, 0x20, 0x7f], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7f, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x41, 0x41, 0x7f, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7f, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7f], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7e, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3c], // g
    [0x7f, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7d, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3d, 0x00], // j
    [0x00, 0x7f, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7f, 0x40, 0x00], // l
    [0x7c, 0x04, 0x18, 0x04, 0x78], // m
    [0x7c, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7c, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7c], // q
    [0x7c, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3f, 0x44, 0x40, 0x20], // t
    [0x3c, 0x40, 0x40, 0x20, 0x7c], // u
    [0x1c, 0x20, 0x40, 0x20, 0x1c], // v
    [0x3c, 0x40, 0x30, 0x40, 0x3c], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0c, 0x50, 0x50, 0x50, 0x3c], // y
    [0x44, 0x64, 0x54, 0x4c, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7f, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];
