/// Minimum number of single-character insertions, deletions, and
/// substitutions required to transform `a` into `b`.
///
/// Sequences are compared codepoint by codepoint, case-sensitively and
/// without normalization, so `"A"` to `"a"` is one substitution.
/// Working storage is two rolling rows sized by the shorter input
/// rather than the full distance matrix.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let mut short: Vec<char> = a.chars().collect();
    let mut long: Vec<char> = b.chars().collect();
    if short.len() > long.len() {
        std::mem::swap(&mut short, &mut long);
    }
    if short.is_empty() {
        return long.len();
    }

    // previous[col] is the distance between the prefix of the longer
    // sequence consumed so far and the first `col` codepoints of the
    // shorter one.
    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current = vec![0usize; short.len() + 1];
    for (row, long_ch) in long.iter().enumerate() {
        current[0] = row + 1;
        for (col, short_ch) in short.iter().enumerate() {
            let substitution = previous[col] + usize::from(long_ch != short_ch);
            let deletion = previous[col + 1] + 1;
            let insertion = current[col] + 1;
            current[col + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[short.len()]
}
