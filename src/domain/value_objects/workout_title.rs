/// Canonicalization of free-text workout names ("Treino A - Peito") into a
/// letter-prefixed display form and an accent/case-insensitive dedup key.

fn normalize_spaces(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_dashes(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            other => other,
        })
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn is_separator(c: char) -> bool {
    c == '-' || c == ':'
}

/// Matches the three leading-letter designator shapes:
/// `treino (a) - rest`, `(a) - rest` and `(a) rest`.
fn extract_leading_letter(raw: &str) -> Option<(char, String)> {
    let normalized = normalize_spaces(&normalize_dashes(raw));
    if normalized.is_empty() {
        return None;
    }

    let chars: Vec<char> = normalized.chars().collect();
    let mut i = 0;

    let starts_with_treino = chars.len() >= 6
        && "treino"
            .chars()
            .enumerate()
            .all(|(k, c)| chars[k].to_ascii_lowercase() == c);
    if starts_with_treino {
        i = 6;
    }

    let skip_spaces = |chars: &[char], mut idx: usize| {
        while idx < chars.len() && chars[idx] == ' ' {
            idx += 1;
        }
        idx
    };

    i = skip_spaces(&chars, i);
    let had_paren = i < chars.len() && chars[i] == '(';
    if had_paren {
        i = skip_spaces(&chars, i + 1);
    }

    let letter = match chars.get(i) {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
        _ => return None,
    };
    i += 1;

    // A letter followed by more word characters is a plain word, not a designator.
    if let Some(next) = chars.get(i) {
        if next.is_alphanumeric() {
            return None;
        }
    }

    let before_gap = i;
    i = skip_spaces(&chars, i);
    if i < chars.len() && chars[i] == ')' {
        i = skip_spaces(&chars, i + 1);
    }

    let mut had_separator = false;
    if i < chars.len() && is_separator(chars[i]) {
        had_separator = true;
        i = skip_spaces(&chars, i + 1);
    }

    let rest: String = chars[i..].iter().collect();
    let rest = normalize_spaces(&rest);

    if starts_with_treino || had_separator {
        return Some((letter, rest));
    }

    // Space-delimited form needs a gap and a non-empty remainder.
    let had_gap = had_paren || i > before_gap;
    if had_gap && !rest.is_empty() {
        return Some((letter, rest));
    }

    None
}

pub fn normalize_workout_title(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    match extract_leading_letter(raw) {
        Some((letter, rest)) if rest.is_empty() => letter.to_string(),
        Some((letter, rest)) => format!("{} - {}", letter, capitalize_first(&rest)),
        None => normalize_spaces(&normalize_dashes(raw)),
    }
}

/// Dedup key over the post-designator remainder: dash-normalized,
/// lower-cased and diacritics-stripped.
pub fn workout_title_key(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let rest = match extract_leading_letter(raw) {
        Some((_, rest)) => rest,
        None => normalize_spaces(&normalize_dashes(raw)),
    };

    normalize_spaces(&normalize_dashes(&rest))
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .collect()
}
