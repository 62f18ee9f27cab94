//! Generation of valid Norwegian test D-numbers (personnummer with day+40 in
//! the first two digits), for exercising user endpoints against test
//! environments without touching real identities.

// Weight vectors for the MOD11 control digit calculation.
const VEKT1: [u32; 11] = [3, 7, 6, 1, 8, 9, 4, 5, 2, 1, 0];
const VEKT2: [u32; 11] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2, 1];

fn multiply_reduce(digits: &[u32], weights: &[u32]) -> u32 {
    digits.iter().zip(weights).map(|(d, w)| d * w).sum()
}

fn digits_of(s: &str) -> Vec<u32> {
    s.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Appends the two control digits to a 9-digit base, or `None` when either
/// MOD11 step yields the unusable remainder 10.
fn calc_parity(base: &str) -> Option<String> {
    let digits = digits_of(base);
    let val1 = 11 - multiply_reduce(&digits[..9], &VEKT1[..9]) % 11;
    if val1 >= 10 {
        return None;
    }
    let with_first = format!("{base}{val1}");

    let digits = digits_of(&with_first);
    let val2 = 11 - multiply_reduce(&digits[..10], &VEKT2[..10]) % 11;
    if val2 >= 10 {
        return None;
    }
    Some(format!("{with_first}{val2}"))
}

/// Verifies both control digits of an 11-digit personnummer.
pub fn is_valid(pnr: &str) -> bool {
    let digits = digits_of(pnr);
    if digits.len() != 11 || pnr.len() != 11 {
        return false;
    }
    multiply_reduce(&digits, &VEKT1) % 11 == 0 && multiply_reduce(&digits, &VEKT2) % 11 == 0
}

/// Generates 40 valid 11-digit D-numbers dated 25 years ago, using even
/// individ numbers only.
pub fn generate_test_persnrs() -> Vec<String> {
    let day = chrono::Utc::now().date_naive() - chrono::Duration::days(25 * 365);
    generate_for_date(day)
}

fn generate_for_date(day: chrono::NaiveDate) -> Vec<String> {
    use chrono::Datelike;

    let datepart = format!(
        "{:02}{:02}{:02}",
        day.day() + 40,
        day.month(),
        day.year() % 100
    );

    let mut result: Vec<String> = (0..1000)
        .step_by(2)
        .filter_map(|inr| calc_parity(&format!("{datepart}{inr:03}")))
        .filter(|pnr| is_valid(pnr))
        .collect();

    let skip = result.len().saturating_sub(40);
    result.split_off(skip)
}
