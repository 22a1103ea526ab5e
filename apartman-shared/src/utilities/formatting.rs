pub const MONTH_NAMES_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

/// Turkish month name for a 1-based month number.
pub fn month_name_tr(month: u32) -> &'static str {
    MONTH_NAMES_TR[(month as usize - 1).min(11)]
}

/// tr-TR currency rendering: `₺1.250,50`. Grouping with dots, comma decimal
/// separator, always two decimals.
pub fn format_try(amount: f64) -> String {
    let negative = amount < 0.0;
    let total_kurus = (amount.abs() * 100.0).round() as u64;
    let lira = total_kurus / 100;
    let kurus = total_kurus % 100;

    let digits = lira.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}₺{},{:02}", sign, grouped, kurus)
}
