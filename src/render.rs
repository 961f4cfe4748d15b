use crate::config::LayoutConfig;
use crate::ir::TreeNode;
use crate::theme::Theme;
use anyhow::Result;
use pulldown_cmark::{Options, Parser, html};
use std::path::Path;

// Average glyph width relative to the font size, for wrapping only.
const CHAR_WIDTH_RATIO: f64 = 0.6;
const LINE_HEIGHT: f64 = 1.2;
const TEXT_INSET: f64 = 10.0;

/// Draws an already laid-out tree: one rounded box per node, filled by depth,
/// with the node name wrapped inside. Parents carry their title at the top,
/// leaves have it centred.
pub fn render_svg(root: &TreeNode, theme: &Theme, config: &LayoutConfig) -> String {
    let margin = config.padding.max(0.0);
    let width = (root.width + 2.0 * margin).ceil();
    let height = (root.height + 2.0 * margin).ceil();

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&format!("<g transform=\"translate({margin},{margin})\">"));
    root.walk(&mut |node, level| push_node(&mut svg, node, level, theme));
    svg.push_str("</g></svg>");
    svg
}

fn push_node(svg: &mut String, node: &TreeNode, level: usize, theme: &Theme) {
    let is_leaf = node.is_leaf();
    svg.push_str("<g>");
    let tooltip = node
        .description
        .as_deref()
        .map(|text| format!(" data-tippy-content=\"{}\"", escape_xml(&description_html(text))))
        .unwrap_or_default();
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"{tooltip}/>",
        node.x,
        node.y,
        node.width,
        node.height,
        theme.fill_for(level, is_leaf),
        theme.stroke_color,
        r = theme.corner_radius,
    ));

    let font_size = theme.font_size_for(level, is_leaf);
    let lines = wrap_text(&node.name, node.width - TEXT_INSET, font_size);
    let line_height = font_size * LINE_HEIGHT;
    let start_y = if is_leaf {
        let block = line_height * lines.len() as f64;
        node.y + (node.height - block) / 2.0 + font_size * 0.8
    } else {
        node.y + font_size - 4.0
    };
    let center_x = node.x + node.width / 2.0;
    for (idx, line) in lines.iter().enumerate() {
        svg.push_str(&format!(
            "<text x=\"{center_x}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{font_size}\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"{}\">{}</text>",
            start_y + idx as f64 * line_height,
            escape_xml(&theme.font_family),
            theme.text_color,
            escape_xml(line)
        ));
    }
    svg.push_str("</g>");
}

/// Markdown description to the HTML fragment shown in the tooltip.
fn description_html(markdown: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() + 16);
    html::push_html(&mut out, parser);
    out.trim_end().to_string()
}

/// Greedy word wrap on an estimated character budget. Words longer than a
/// line are kept whole.
fn wrap_text(text: &str, width: f64, font_size: f64) -> Vec<String> {
    let budget = ((width / (font_size * CHAR_WIDTH_RATIO)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= budget {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
