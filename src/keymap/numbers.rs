//! English cardinal-number spelling.
//!
//! Table-driven conversion of integers into words ("21" -> "twenty-one"),
//! used by the identifier normalizer to expand digit runs in key names.
//! Scale groups are joined with spaces only, never commas, so the result
//! always normalizes into a valid identifier fragment.

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Scale names for successive groups of three digits.
const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Spells a number below one hundred.
fn below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        return ONES[n as usize].to_string();
    }

    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        units => format!("{tens}-{}", ONES[units as usize]),
    }
}

/// Spells a number below one thousand ("one hundred and five").
fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    let hundreds = n / 100;
    let rest = n % 100;

    match (hundreds, rest) {
        (0, _) => below_hundred(rest),
        (h, 0) => format!("{} hundred", ONES[h as usize]),
        (h, r) => format!("{} hundred and {}", ONES[h as usize], below_hundred(r)),
    }
}

/// Converts an integer into its English cardinal spelling.
///
/// # Examples
///
/// ```
/// use keymapgen::keymap::numbers::number_to_words;
///
/// assert_eq!(number_to_words(1), "one");
/// assert_eq!(number_to_words(21), "twenty-one");
/// assert_eq!(number_to_words(1005), "one thousand and five");
/// ```
#[must_use]
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    // Split into groups of three digits, least significant first
    let mut groups = Vec::new();
    let mut remaining = n;
    while remaining > 0 {
        groups.push(remaining % 1000);
        remaining /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }

        let mut words = below_thousand(group);
        if scale == 0 && group < 100 && groups.len() > 1 {
            words = format!("and {words}");
        }
        if !SCALES[scale].is_empty() {
            words.push(' ');
            words.push_str(SCALES[scale]);
        }
        parts.push(words);
    }

    parts.join(" ")
}

/// Spells a run of ASCII digits.
///
/// Leading zeros are ignored. A run too long to fit a `u64` is spelled
/// one digit at a time.
#[must_use]
pub fn digits_to_words(digits: &str) -> String {
    match digits.parse::<u64>() {
        Ok(n) => number_to_words(n),
        Err(_) => digits
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| ONES[d as usize])
            .collect::<Vec<_>>()
            .join(" "),
    }
}
