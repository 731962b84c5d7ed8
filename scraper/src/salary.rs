//! Pay range extraction from free-text salary snippets.

use regex::Regex;

/// Pay range read from a salary snippet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compensation {
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
}

/// Extracts a min/max pay range from a raw salary string using regex.
///
/// Amounts either carry a currency symbol or are at least 1000, so stray
/// small numbers ("2 openings") are ignored. A single amount becomes both
/// the minimum and the maximum.
pub fn parse_salary(salary_raw: &str) -> Option<Compensation> {
    // Match numbers that may have commas (e.g., "50,000" or "50000"), decimals and a "k" suffix
    let re = Regex::new(r"([$€£])?\s?(\d{1,3}(?:,\d{3})+|\d+)(\.\d+)?\s?([kK])?\b").ok()?;

    let mut amounts = Vec::new();
    for cap in re.captures_iter(salary_raw) {
        let has_symbol = cap.get(1).is_some();
        let Some(whole) = cap.get(2) else { continue };
        let clean_number: String = whole
            .as_str()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let fraction = cap.get(3).map(|m| m.as_str()).unwrap_or("");
        let Ok(mut num) = format!("{clean_number}{fraction}").parse::<f64>() else {
            continue;
        };
        if cap.get(4).is_some() {
            num *= 1000.0;
        }
        if has_symbol || num >= 1000.0 {
            amounts.push(num);
        }
        if amounts.len() == 2 {
            break;
        }
    }

    let min_amount = amounts.first().copied()?;
    let max_amount = amounts.get(1).copied().unwrap_or(min_amount);

    Some(Compensation {
        min_amount: Some(min_amount.min(max_amount)),
        max_amount: Some(min_amount.max(max_amount)),
        currency: currency(salary_raw),
        interval: interval(salary_raw),
    })
}

fn currency(salary_raw: &str) -> Option<String> {
    let upper = salary_raw.to_uppercase();
    let code = if salary_raw.contains('$') || upper.contains("USD") {
        "USD"
    } else if salary_raw.contains('€') || upper.contains("EUR") {
        "EUR"
    } else if salary_raw.contains('£') || upper.contains("GBP") {
        "GBP"
    } else {
        return None;
    };
    Some(code.to_string())
}

/// Pay period named in the text, using the export's interval names.
///
/// Period words must stand alone ("Monday" is not a day) and the first one
/// in the text wins.
pub fn interval(salary_raw: &str) -> Option<String> {
    let re = Regex::new(
        r"(?i)\b(hourly|hours?|hr|daily|days?|weekly|weeks?|monthly|months?|yearly|years?|yr|annually|annual|annum)\b",
    )
    .ok()?;
    let word = re.captures(salary_raw)?.get(1)?.as_str().to_lowercase();

    let name = match word.as_str() {
        "hourly" | "hour" | "hours" | "hr" => "hourly",
        "daily" | "day" | "days" => "daily",
        "weekly" | "week" | "weeks" => "weekly",
        "monthly" | "month" | "months" => "monthly",
        _ => "yearly",
    };
    Some(name.to_string())
}
