// Quote-aware splitting of text blocks into word tokens

use hashbrown::HashSet;

/// Split `text` on whitespace, keeping double-quoted spans together.
///
/// The quote characters themselves are dropped and empty tokens are
/// skipped, so `He said "hello world" now` yields `He`, `said`,
/// `hello world`, `now`. An unterminated quote runs to the end of the text.
pub fn split_block(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in text.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// [`split_block`], keeping only the first occurrence of each token.
pub fn unique_tokens(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    split_block(text)
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
