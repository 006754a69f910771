use crate::host::Measurer;
use crate::model::{Element, Node, Section};

/// Deterministic height heuristic for hosts without a rendering surface
/// (the CLI, batch runs, tests). Estimates wrapped line counts from
/// character counts at a fixed average glyph advance; headings get a scaled
/// line height. A real host should measure with the same layout rules as
/// its rendering surface instead.
#[derive(Clone, Debug)]
pub struct TextMeasurer {
    pub line_height: f32,
    pub char_width: f32,
    pub heading_scale: f32,
    /// Vertical gap charged after every top-level block.
    pub block_spacing: f32,
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self {
            line_height: 19.0,
            char_width: 8.0,
            heading_scale: 1.6,
            block_spacing: 8.0,
        }
    }
}

impl TextMeasurer {
    fn is_heading(tag: &str) -> bool {
        let mut chars = tag.chars();
        if chars.next() != Some('h') {
            return false;
        }
        let rest = chars.as_str();
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
    }

    fn block_height(&self, el: &Element, available_width: f32) -> f32 {
        let (line_height, char_width) = if Self::is_heading(&el.tag) {
            (
                self.line_height * self.heading_scale,
                self.char_width * self.heading_scale,
            )
        } else {
            (self.line_height, self.char_width)
        };
        let chars = el.children.iter().map(Node::text_len).sum::<usize>();
        let per_line = (available_width / char_width).floor().max(1.0) as usize;
        let lines = chars.div_ceil(per_line).max(1);
        lines as f32 * line_height + self.block_spacing
    }

    fn text_height(&self, text_chars: usize, available_width: f32) -> f32 {
        let per_line = (available_width / self.char_width).floor().max(1.0) as usize;
        let lines = text_chars.div_ceil(per_line).max(1);
        lines as f32 * self.line_height + self.block_spacing
    }
}

impl Measurer for TextMeasurer {
    fn measure(&mut self, section: &Section, available_width: f32) -> f32 {
        section
            .nodes
            .iter()
            .map(|node| match node {
                Node::Text(text) => self.text_height(text.chars().count(), available_width),
                Node::Element(el) => self.block_height(el, available_width),
            })
            .sum()
    }
}
