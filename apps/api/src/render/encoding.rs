//! WinAnsi (CP1252) encoding for text shown with the base-14 Type 1 fonts.

/// Encodes `text` as WinAnsi bytes. Characters outside the code page become `?`,
/// tabs become spaces, other control characters are dropped.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| {
            let code = c as u32;
            match code {
                0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
                0x09 => Some(b' '),
                0x00..=0x1F | 0x7F => None,
                _ => Some(win_ansi_extra(c).unwrap_or(b'?')),
            }
        })
        .collect()
}

/// The 0x80–0x9F range, where CP1252 departs from Latin-1.
fn win_ansi_extra(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(to_win_ansi("CV 2024"), b"CV 2024".to_vec());
    }

    #[test]
    fn test_latin1_and_typographic_characters() {
        assert_eq!(to_win_ansi("é"), vec![0xE9]);
        assert_eq!(to_win_ansi("• – ’"), vec![0x95, b' ', 0x96, b' ', 0x92]);
    }

    #[test]
    fn test_unsupported_characters_become_question_marks() {
        assert_eq!(to_win_ansi("✓ ok"), b"? ok".to_vec());
        assert_eq!(to_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(to_win_ansi("a\tb\u{7}c"), b"a bc".to_vec());
    }
}
