/// Line wrapping and canvas sizing

use crate::{Canvas, RenderConfig, TextMeasurer};

/// Greedy word wrap.
///
/// - Paragraphs (separated by `\n`) wrap independently; an empty paragraph
///   becomes an empty line
/// - Tokens are whitespace-delimited and joined with a single space
/// - A line fits when its measured width is `<= max_width`
/// - A token wider than `max_width` on its own stays whole on its own line
///
/// Text without any paragraph yields a single empty line, so there is always
/// something to draw.
pub fn wrap_text<M: TextMeasurer + ?Sized>(text: &str, max_width: u32, measurer: &M) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        wrap_paragraph(paragraph, max_width, measurer, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    log::debug!("wrapped {} chars into {} lines at {}px", text.len(), lines.len(), max_width);
    lines
}

fn wrap_paragraph<M: TextMeasurer + ?Sized>(
    paragraph: &str,
    max_width: u32,
    measurer: &M,
    lines: &mut Vec<String>,
) {
    let mut cur = String::new();
    for word in paragraph.split_whitespace() {
        if cur.is_empty() {
            cur.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", cur, word);
        if measurer.measure(&candidate).width > max_width {
            lines.push(std::mem::replace(&mut cur, word.to_string()));
        } else {
            cur = candidate;
        }
    }
    // whitespace-only paragraphs still take up a line
    lines.push(cur);
}

/// Height needed for `line_count` lines plus vertical margins.
pub fn compute_height(line_count: usize, line_height: u32, top_margin: u32, bottom_margin: u32) -> u32 {
    let count = u32::try_from(line_count).unwrap_or(u32::MAX);
    count
        .saturating_mul(line_height)
        .saturating_add(top_margin)
        .saturating_add(bottom_margin)
}

/// Canvas for `line_count` lines: configured width, height grown to fit but
/// never below `min_height`.
pub fn canvas_for(line_count: usize, config: &RenderConfig) -> Canvas {
    let needed = compute_height(
        line_count,
        config.line_height(),
        config.margins.top,
        config.margins.bottom,
    );
    Canvas {
        width: config.canvas_width,
        height: needed.max(config.min_height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedAdvance;

    const M: FixedAdvance = FixedAdvance::new(10, 20);

    #[test]
    fn wraps_three_words_per_line() {
        // "quick brown fox" is 15 chars, 150px
        let lines = wrap_text("The quick brown fox jumps over the lazy dog", 150, &M);
        assert_eq!(lines, vec!["The quick brown", "fox jumps over", "the lazy dog"]);
    }

    #[test]
    fn boundary_width_is_inclusive() {
        // "aaaa bbbb" is exactly 90px
        assert_eq!(wrap_text("aaaa bbbb", 90, &M), vec!["aaaa bbbb"]);
        assert_eq!(wrap_text("aaaa bbbb", 89, &M), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn long_token_is_not_split() {
        let token = "x".repeat(60);
        let text = format!("short {} tail", token);
        let lines = wrap_text(&text, 100, &M);
        assert_eq!(lines, vec!["short".to_string(), token, "tail".to_string()]);
    }

    #[test]
    fn empty_text_is_one_blank_line() {
        assert_eq!(wrap_text("", 100, &M), vec![String::new()]);
        assert_eq!(wrap_text("   ", 100, &M), vec![String::new()]);
    }

    #[test]
    fn paragraphs_wrap_separately() {
        let lines = wrap_text("one two\n\nthree", 1000, &M);
        assert_eq!(lines, vec!["one two", "", "three"]);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(wrap_text("  a \t b   c ", 1000, &M), vec!["a b c"]);
    }

    #[test]
    fn height_formula() {
        assert_eq!(compute_height(0, 25, 10, 10), 20);
        assert_eq!(compute_height(3, 25, 10, 5), 90);
        assert_eq!(compute_height(usize::MAX, 25, 10, 10), u32::MAX);
    }

    #[test]
    fn canvas_grows_past_min_height() {
        let config = RenderConfig::default();
        assert_eq!(canvas_for(1, &config).height, 600);
        // 30 lines * 25px + 20px margins
        let tall = canvas_for(30, &config);
        assert_eq!(tall.width, 800);
        assert_eq!(tall.height, 770);
    }
}
