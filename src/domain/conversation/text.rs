//! Text normalization shared by the extractor and the intent classifier.

/// Lowercases and strips diacritics, one output char per input char.
///
/// The 1:1 mapping lets callers find a phrase in the folded text and cut
/// the same char range out of the original message.
pub fn fold(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
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

/// Alphanumeric tokens of already-folded text.
pub fn tokens(folded: &str) -> Vec<&str> {
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// True when `phrase` (space separated) appears as consecutive tokens.
pub fn contains_phrase(tokens: &[&str], phrase: &str) -> bool {
    let wanted: Vec<&str> = phrase.split_whitespace().collect();
    if wanted.is_empty() || wanted.len() > tokens.len() {
        return false;
    }
    tokens.windows(wanted.len()).any(|window| window == wanted.as_slice())
}

/// Converts a byte offset in `s` into a char offset.
pub fn char_offset(s: &str, byte_offset: usize) -> usize {
    s[..byte_offset].chars().count()
}
