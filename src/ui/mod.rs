pub mod charts;
pub mod panels;

/// Greedy word wrap to `width` columns. Words longer than a line are split.
pub fn wrap_label(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let used = current.chars().count();
            let sep = usize::from(used > 0);
            if used + sep + word.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                break;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            // Word alone is too long for a line.
            let rest = word.split_off(width);
            lines.push(word.iter().collect());
            word = rest;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::wrap_label;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(wrap_label("Gintama", 15), "Gintama");
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_label("Fullmetal Alchemist: Brotherhood", 15),
            "Fullmetal\nAlchemist:\nBrotherhood"
        );
        assert_eq!(wrap_label("Slice of Life", 10), "Slice of\nLife");
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(wrap_label("Kaguya-samaWaKokurasetai", 10), "Kaguya-sam\naWaKokuras\netai");
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(wrap_label("   ", 10), "");
    }
}
