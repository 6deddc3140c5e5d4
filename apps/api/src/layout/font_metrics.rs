//! Static font-metric tables for the standard Helvetica faces.
//!
//! Character widths are in em units (AFM widths / 1000). The PDF renderer sets text
//! in the non-embedded base-14 Helvetica fonts, so these tables are exact for every
//! WinAnsi character in the ASCII range. Anything else falls back to an average width.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use crate::layout::block::Emphasis;

/// Millimetres per PostScript point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Static character-width table for one Helvetica face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    /// PDF base font name.
    pub base_font: &'static str,
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub bullet_width: f32,
}

impl FontMetricTable {
    /// Width of a single character in em units.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == '•' {
            self.bullet_width
        } else {
            self.average_char_width
        }
    }

    /// Rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Rendered width of a string in millimetres at `font_size` points.
    pub fn width_mm(&self, s: &str, font_size: f32) -> f32 {
        self.measure_str(s) * font_size * PT_TO_MM
    }

    /// Greedy word wrap to `max_width_mm` at `font_size` points.
    ///
    /// Whitespace runs collapse to a single space. Explicit newlines start a new line;
    /// blank lines between text survive as empty strings. A word wider than the line is
    /// broken between characters. Empty or whitespace-only text yields no lines.
    pub fn wrap(&self, text: &str, font_size: f32, max_width_mm: f32) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        // Work in em so the per-character sums stay independent of the font size.
        let max_width = max_width_mm / (font_size * PT_TO_MM);
        let space_w = self.char_width(' ');
        let mut lines = Vec::new();

        for raw_line in text.trim().lines() {
            let words: Vec<&str> = raw_line.split_whitespace().collect();
            if words.is_empty() {
                lines.push(String::new());
                continue;
            }

            let mut current = String::new();
            let mut current_width = 0.0_f32;

            for word in words {
                let word_w = self.measure_str(word);
                let space = if current.is_empty() { 0.0 } else { space_w };

                if current_width + space + word_w <= max_width {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                    current_width += space + word_w;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }

                if word_w <= max_width {
                    current.push_str(word);
                    current_width = word_w;
                } else {
                    // Hard-break an over-long word; the tail stays open for the next word.
                    for c in word.chars() {
                        let cw = self.char_width(c);
                        if current_width + cw > max_width && !current.is_empty() {
                            lines.push(std::mem::take(&mut current));
                            current_width = 0.0;
                        }
                        current.push(c);
                        current_width += cw;
                    }
                }
            }
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica (regular). Helvetica-Oblique shares these widths.
static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    base_font: "Helvetica",
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    bullet_width: 0.350,
};

/// Helvetica-Bold.
static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    base_font: "Helvetica-Bold",
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.611,
    bullet_width: 0.350,
};

/// Returns the metric table for the face used to render `emphasis`.
pub fn get_metrics(emphasis: Emphasis) -> &'static FontMetricTable {
    match emphasis {
        Emphasis::Normal | Emphasis::Italic => &HELVETICA_TABLE,
        Emphasis::Bold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(Emphasis::Normal).measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(Emphasis::Normal);
        // H(0.722) + i(0.222)
        assert!((metrics.measure_str("Hi") - 0.944).abs() < 1e-4);
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = get_metrics(Emphasis::Normal);
        assert!((metrics.char_width('é') - metrics.average_char_width).abs() < 1e-6);
        assert!((metrics.char_width('•') - 0.350).abs() < 1e-6);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Architected distributed caching layer";
        assert!(
            get_metrics(Emphasis::Bold).measure_str(text)
                > get_metrics(Emphasis::Normal).measure_str(text)
        );
    }

    #[test]
    fn test_width_mm_scales_with_font_size() {
        let metrics = get_metrics(Emphasis::Normal);
        let at_10 = metrics.width_mm("Rust", 10.0);
        let at_20 = metrics.width_mm("Rust", 20.0);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_empty_yields_no_lines() {
        let metrics = get_metrics(Emphasis::Normal);
        assert!(metrics.wrap("", 10.0, 100.0).is_empty());
        assert!(metrics.wrap("   \n  ", 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let metrics = get_metrics(Emphasis::Normal);
        assert_eq!(metrics.wrap("Senior  Rust   Engineer", 10.0, 170.0), vec!["Senior Rust Engineer"]);
    }

    #[test]
    fn test_wrap_lines_fit_max_width() {
        let metrics = get_metrics(Emphasis::Normal);
        let text = "Architected a distributed caching layer using Redis and consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load across three regions";
        let lines = metrics.wrap(text, 10.0, 60.0);
        assert!(lines.len() > 1, "expected wrapping, got {lines:?}");
        for line in &lines {
            assert!(
                metrics.width_mm(line, 10.0) <= 60.0 + 1e-3,
                "line too wide: {line}"
            );
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_breaks_overlong_word() {
        let metrics = get_metrics(Emphasis::Normal);
        let word = "x".repeat(200);
        let lines = metrics.wrap(&word, 10.0, 30.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_keeps_explicit_newlines() {
        let metrics = get_metrics(Emphasis::Normal);
        let lines = metrics.wrap("first\n\nsecond", 10.0, 100.0);
        assert_eq!(lines, vec!["first", "", "second"]);
    }
}
