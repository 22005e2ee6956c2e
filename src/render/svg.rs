//! SVG word cloud renderer.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

use super::{ColorMap, Mask, RenderError, RenderOptions, Renderer, Rgb};

/// English function words dropped before counting.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "could", "couldn't", "did", "didn't", "do",
    "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few", "for",
    "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't", "having", "he",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "isn't", "it", "it's", "its", "itself", "just", "like", "may", "me", "more",
    "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only",
    "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own", "same",
    "shall", "she", "should", "shouldn't", "since", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "therefore", "these", "they",
    "this", "those", "through", "thus", "to", "too", "under", "until", "up", "upon", "very", "was",
    "wasn't", "we", "were", "weren't", "what", "when", "where", "whether", "which", "while", "who",
    "whom", "why", "will", "with", "within", "without", "won't", "would", "wouldn't", "you",
    "your", "yours", "yourself", "yourselves",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w[\w']+").expect("token pattern is valid"));

/// Advance width of one column as a fraction of the font size.
const GLYPH_ASPECT: f64 = 0.6;
/// Distance from the top of a word's box to its baseline, in font sizes.
const BASELINE: f64 = 0.8;
/// Relative weight of frequency versus rank when sizing words.
const RELATIVE_SCALING: f64 = 0.5;
/// Font shrink factor after a failed placement.
const SHRINK: f64 = 0.9;
const SPIRAL_STEP: f64 = 0.05;
const SPIRAL_GROWTH: f64 = 0.8;

/// Count words in `text`, most frequent first.
///
/// Tokens are runs of word characters (apostrophes allowed inside), lowercased,
/// with a trailing `'s` removed. Stop words and purely numeric tokens are
/// dropped. Ties are ordered alphabetically.
pub fn word_frequencies(text: &str) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for token in TOKEN_RE.find_iter(text) {
        let word = token.as_str().to_lowercase();
        let word = word.strip_suffix("'s").unwrap_or(&word).trim_end_matches('\'');

        if word.chars().count() < 2
            || word.chars().all(|c| c.is_numeric())
            || STOPWORD_SET.contains(word)
        {
            continue;
        }
        *counts.entry(word.to_string()).or_default() += 1;
    }

    let mut frequencies: Vec<(String, usize)> = counts.into_iter().collect();
    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequencies
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Rect {
    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// A word positioned on the canvas.
#[derive(Debug, Clone, PartialEq)]
struct PlacedWord {
    word: String,
    font_size: f64,
    bounds: Rect,
    color: Rgb,
}

/// Renders an SVG word cloud.
///
/// Words are sized by frequency, placed along an Archimedean spiral from the
/// canvas center, and skipped where they would overlap an earlier word or a
/// blocked mask pixel. Layout is deterministic for a given input.
#[derive(Debug, Clone)]
pub struct WordCloudRenderer {
    /// Maximum number of distinct words drawn
    pub max_words: usize,
    /// Placement stops once the font would shrink below this size
    pub min_font_size: f64,
    pub font_family: String,
}

impl Default for WordCloudRenderer {
    fn default() -> Self {
        Self {
            max_words: 200,
            min_font_size: 4.0,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl WordCloudRenderer {
    pub fn new(max_words: usize, min_font_size: f64) -> Self {
        Self {
            max_words,
            min_font_size,
            ..Default::default()
        }
    }

    fn text_box(word: &str, font_size: f64) -> (f64, f64) {
        (
            word.width() as f64 * font_size * GLYPH_ASPECT,
            font_size,
        )
    }

    fn layout(
        &self,
        frequencies: &[(String, usize)],
        width: u32,
        height: u32,
        mask: Option<&Mask>,
        color_map: ColorMap,
    ) -> Vec<PlacedWord> {
        let words = &frequencies[..frequencies.len().min(self.max_words)];
        let Some((first, _)) = words.first() else {
            return Vec::new();
        };

        let (w, h) = (width as f64, height as f64);
        let first_width = first.width().max(1) as f64 * GLYPH_ASPECT;
        let mut font_size = (h * 0.5).min(w / first_width);
        let mut last_count = words[0].1 as f64;
        let mut placed: Vec<PlacedWord> = Vec::new();
        let rank_span = words.len().saturating_sub(1).max(1) as f64;

        for (rank, (word, count)) in words.iter().enumerate() {
            let count = *count as f64;
            if rank > 0 {
                font_size *= RELATIVE_SCALING * (count / last_count) + (1.0 - RELATIVE_SCALING);
            }
            last_count = count;

            let bounds = loop {
                if font_size < self.min_font_size {
                    break None;
                }
                let (bw, bh) = Self::text_box(word, font_size);
                if let Some(rect) = self.find_position(bw, bh, w, h, mask, &placed) {
                    break Some(rect);
                }
                font_size *= SHRINK;
            };

            let Some(bounds) = bounds else {
                tracing::debug!(placed = placed.len(), "Canvas full, stopping layout");
                break;
            };

            placed.push(PlacedWord {
                word: word.clone(),
                font_size,
                bounds,
                color: color_map.sample(1.0 - rank as f64 / rank_span),
            });
        }

        placed
    }

    fn find_position(
        &self,
        bw: f64,
        bh: f64,
        w: f64,
        h: f64,
        mask: Option<&Mask>,
        placed: &[PlacedWord],
    ) -> Option<Rect> {
        if bw > w || bh > h {
            return None;
        }

        let (cx, cy) = (w / 2.0, h / 2.0);
        let aspect = h / w;
        let max_radius = w.hypot(h) / 2.0;
        let mut theta: f64 = 0.0;

        loop {
            let radius = SPIRAL_GROWTH * theta;
            if radius > max_radius {
                return None;
            }

            let rect = Rect {
                x: (cx + radius * theta.cos() - bw / 2.0).floor(),
                y: (cy + radius * aspect * theta.sin() - bh / 2.0).floor(),
                w: bw.ceil(),
                h: bh.ceil(),
            };

            let inside = rect.x >= 0.0
                && rect.y >= 0.0
                && rect.x + rect.w <= w
                && rect.y + rect.h <= h;
            let unmasked = || {
                mask.map_or(true, |m| {
                    m.is_free(rect.x as u32, rect.y as u32, rect.w as u32, rect.h as u32)
                })
            };

            if inside && !placed.iter().any(|p| p.bounds.overlaps(&rect)) && unmasked() {
                return Some(rect);
            }

            theta += SPIRAL_STEP;
        }
    }

    fn to_svg(&self, placed: &[PlacedWord], width: u32, height: u32, background: Option<&str>) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
        );

        if let Some(color) = background {
            svg.push_str(&format!(
                "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
                escape_xml(color)
            ));
        }

        for word in placed {
            svg.push_str(&format!(
                "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{:.1}\" textLength=\"{:.1}\" lengthAdjust=\"spacingAndGlyphs\" font-family=\"{}\" fill=\"{}\">{}</text>\n",
                word.bounds.x,
                word.bounds.y + word.font_size * BASELINE,
                word.font_size,
                // Drawn text is stretched or squeezed to the box used for collisions
                word.bounds.w,
                escape_xml(&self.font_family),
                word.color.to_hex(),
                escape_xml(&word.word)
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl Renderer for WordCloudRenderer {
    fn extension(&self) -> &str {
        "svg"
    }

    fn render(&self, corpus: &str, options: &RenderOptions) -> Result<Vec<u8>, RenderError> {
        let (width, height) = options.canvas_size();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }

        let frequencies = word_frequencies(corpus);
        if frequencies.is_empty() {
            tracing::warn!("No words to render, the word cloud will be empty");
        }

        let placed = self.layout(
            &frequencies,
            width,
            height,
            options.mask.as_ref(),
            options.color_map,
        );
        tracing::info!(
            distinct_words = frequencies.len(),
            placed = placed.len(),
            "Rendered word cloud"
        );

        Ok(self
            .to_svg(&placed, width, height, options.background_color.as_deref())
            .into_bytes())
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
