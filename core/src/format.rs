//! Display helpers for prices.

/// Price after a percentage discount.
pub fn discounted_price(price: f64, discount_percentage: f64) -> f64 {
    price - price * discount_percentage / 100.0
}

/// `en-US` style currency string, e.g. `$1,234.50` or `-€3.00`. Currencies
/// without a known symbol are prefixed with their code: `IDR 15,000.00`.
pub fn format_price(price: f64, currency: &str) -> String {
    let (prefix, decimals) = match currency.to_ascii_uppercase().as_str() {
        "USD" => ("$".to_string(), 2),
        "EUR" => ("€".to_string(), 2),
        "GBP" => ("£".to_string(), 2),
        "JPY" => ("¥".to_string(), 0),
        other => (format!("{other} "), 2),
    };
    let sign = if price < 0.0 { "-" } else { "" };
    format!("{sign}{prefix}{}", group_thousands(price.abs(), decimals))
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    }
}
