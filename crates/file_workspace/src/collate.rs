//! Locale-aware file-name ordering.
//!
//! Names compare in three passes, mirroring how collators rank differences:
//! base letters with digit runs read as numbers, then accents, then case (lowercase first).
//! Only names that are byte-identical compare equal, which leaves ties to the stable sort.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Unit {
    Number(String),
    Symbol(char),
    Letter(char),
}

impl Unit {
    fn rank(&self) -> u8 {
        match self {
            Self::Symbol(_) => 0,
            Self::Number(_) => 1,
            Self::Letter(_) => 2,
        }
    }
}

fn compare_units(a: &Unit, b: &Unit) -> Ordering {
    match (a, b) {
        (Unit::Number(x), Unit::Number(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Unit::Symbol(x), Unit::Symbol(y)) | (Unit::Letter(x), Unit::Letter(y)) => x.cmp(y),
        _ => a.rank().cmp(&b.rank()),
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

fn primary_units(name: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut digits = String::new();
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if !digits.is_empty() {
            units.push(number_unit(&digits));
            digits.clear();
        }
        if c.is_alphabetic() {
            units.push(Unit::Letter(fold_accent(c)));
        } else {
            units.push(Unit::Symbol(c));
        }
    }
    if !digits.is_empty() {
        units.push(number_unit(&digits));
    }
    units
}

fn number_unit(digits: &str) -> Unit {
    let trimmed = digits.trim_start_matches('0');
    Unit::Number(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
}

fn compare_primary(a: &str, b: &str) -> Ordering {
    let left = primary_units(a);
    let right = primary_units(b);
    for (x, y) in left.iter().zip(&right) {
        let ord = compare_units(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

fn compare_case(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        let ord = x.is_uppercase().cmp(&y.is_uppercase());
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Compares two file names for display ordering.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    compare_primary(a, b)
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| compare_case(a, b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        names.sort_by(|a, b| compare_names(a, b));
        names
    }

    #[test]
    fn case_does_not_dominate_ordering() {
        assert_eq!(
            sorted(&["beta.txt", "Alpha.txt", "alpha.md", "Gamma.txt"]),
            vec!["alpha.md", "Alpha.txt", "beta.txt", "Gamma.txt"]
        );
    }

    #[test]
    fn digit_runs_compare_numerically() {
        assert_eq!(
            sorted(&["file10.png", "file2.png", "file1.png", "file02.png"]),
            vec!["file1.png", "file02.png", "file2.png", "file10.png"]
        );
    }

    #[test]
    fn accents_sort_next_to_their_base_letter() {
        assert_eq!(
            sorted(&["zeta.md", "évaluation.pdf", "etude.pdf"]),
            vec!["etude.pdf", "évaluation.pdf", "zeta.md"]
        );
    }

    #[test]
    fn lowercase_sorts_before_uppercase_and_only_identical_names_tie() {
        assert_eq!(compare_names("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_names("Apple", "apple"), Ordering::Greater);
        assert_eq!(compare_names("same.txt", "same.txt"), Ordering::Equal);
    }
}
