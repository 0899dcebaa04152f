/// One classified, non-blank line of workout text. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WodLine {
    BlockHeader { line: usize, name: String },
    Exercise { line: usize, name: String, scheme: String },
    FreeText { line: usize, text: String },
}

pub fn tokenize(text: &str) -> Vec<WodLine> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| classify(idx + 1, raw))
        .collect()
}

fn classify(line: usize, raw: &str) -> Option<WodLine> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix('#') {
        let name = rest.trim_start_matches('#').trim();
        if !name.is_empty() {
            return Some(WodLine::BlockHeader {
                line,
                name: name.to_string(),
            });
        }
    }

    if let Some((name, scheme)) = split_exercise(trimmed) {
        return Some(WodLine::Exercise {
            line,
            name: name.to_string(),
            scheme: scheme.to_string(),
        });
    }

    Some(WodLine::FreeText {
        line,
        text: trimmed.to_string(),
    })
}

/// `[Name]: token` or a bare `[Name]`. Anything after the bracket other than
/// a colon makes the line free text.
fn split_exercise(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let close = rest.find(']')?;
    let name = rest[..close].trim();
    if name.is_empty() {
        return None;
    }

    let after = rest[close + 1..].trim_start();
    if after.is_empty() {
        return Some((name, ""));
    }

    let scheme = after.strip_prefix(':')?;
    Some((name, scheme.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_each_kind() {
        let lines = tokenize("# Strength\n[Back Squat]: 5x5\nRest 2 min between sets\n");
        assert_eq!(
            lines,
            vec![
                WodLine::BlockHeader {
                    line: 1,
                    name: "Strength".to_string()
                },
                WodLine::Exercise {
                    line: 2,
                    name: "Back Squat".to_string(),
                    scheme: "5x5".to_string()
                },
                WodLine::FreeText {
                    line: 3,
                    text: "Rest 2 min between sets".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_blank_lines_skipped_but_numbering_kept() {
        let lines = tokenize("\n\n   \n[Deadlift]: 1x5");
        assert_eq!(
            lines,
            vec![WodLine::Exercise {
                line: 4,
                name: "Deadlift".to_string(),
                scheme: "1x5".to_string()
            }]
        );
    }

    #[test]
    fn test_exercise_without_scheme_keeps_empty_token() {
        assert_eq!(
            tokenize("[Plank]"),
            vec![WodLine::Exercise {
                line: 1,
                name: "Plank".to_string(),
                scheme: String::new()
            }]
        );
    }

    #[test]
    fn test_near_misses_are_free_text() {
        for text in ["#", "[] : 5x5", "[Squat] heavy", "Squat: 5x5"] {
            assert!(
                matches!(tokenize(text).as_slice(), [WodLine::FreeText { .. }]),
                "{text} should be free text"
            );
        }
    }

    #[test]
    fn test_double_hash_header() {
        assert_eq!(
            tokenize("## Finisher"),
            vec![WodLine::BlockHeader {
                line: 1,
                name: "Finisher".to_string()
            }]
        );
    }
}
