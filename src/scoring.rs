/// Characters per "word" in typing-test terms.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Words per minute from correctly typed characters.
///
/// Zero elapsed time scores 0 rather than dividing by zero.
pub fn compute_wpm(correct_chars: usize, elapsed_secs: f64) -> u32 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    let words = correct_chars as f64 / CHARS_PER_WORD;
    let minutes = elapsed_secs / 60.0;
    (words / minutes).round() as u32
}

/// Percentage of correct characters, 100 when nothing was typed yet.
pub fn compute_accuracy(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Positions where `input` matches `target`, compared character by character
/// over the shorter of the two.
pub fn count_correct(input: &str, target: &str) -> usize {
    input
        .chars()
        .zip(target.chars())
        .filter(|(typed, expected)| typed == expected)
        .count()
}
