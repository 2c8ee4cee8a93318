/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::util::date::Date;
use chrono::NaiveTime;

pub const MONTHS: [&str; 12] = [
	"January",
	"February",
	"March",
	"April",
	"May",
	"June",
	"July",
	"August",
	"September",
	"October",
	"November",
	"December",
];

/// Whole rupees with Indian digit grouping, e.g. `₹1,23,456`.
pub fn format_rupee(amount: i64) -> String {
	let digits = amount.unsigned_abs().to_string();
	let sign = if amount < 0 { "-" } else { "" };

	if digits.len() <= 3 {
		return format!("{}₹{}", sign, digits);
	}

	// last three digits form one group, everything before is paired
	let (head, tail) = digits.split_at(digits.len() - 3);
	let mut groups: Vec<&str> = Vec::new();
	let mut end = head.len();
	while end > 0 {
		let start = end.saturating_sub(2);
		groups.push(&head[start..end]);
		end = start;
	}
	groups.reverse();

	format!("{}₹{},{}", sign, groups.join(","), tail)
}

pub fn format_iso_date(date: &Date) -> String {
	date.to_string()
}

/// e.g. `Sun, 05 January, 2025`
pub fn format_long_date(date: &Date) -> String {
	format!(
		"{}, {:02} {}, {}",
		date.weekday_name(),
		date.day(),
		MONTHS[date.month() as usize - 1],
		date.year()
	)
}

/// e.g. `05 Jan 2025`
pub fn format_short_date(date: &Date) -> String {
	format!(
		"{:02} {} {}",
		date.day(),
		&MONTHS[date.month() as usize - 1][..3],
		date.year()
	)
}

/// Maps a month label such as `"03"` to `March`. Labels outside 1..=12 are
/// echoed back unchanged.
pub fn format_long_month(month: &str) -> String {
	match month.trim().parse::<usize>() {
		Ok(m) if (1..=12).contains(&m) => MONTHS[m - 1].to_string(),
		_ => month.to_string(),
	}
}

pub fn format_short_month(month: &str) -> String {
	format_long_month(month).chars().take(3).collect()
}

/// Twelve-hour clock, e.g. `09:05 PM`
pub fn format_time(time: &NaiveTime) -> String {
	time.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_rupee_grouping() {
		assert_eq!(format_rupee(0), "₹0");
		assert_eq!(format_rupee(999), "₹999");
		assert_eq!(format_rupee(1000), "₹1,000");
		assert_eq!(format_rupee(12345), "₹12,345");
		assert_eq!(format_rupee(123456), "₹1,23,456");
		assert_eq!(format_rupee(12345678), "₹1,23,45,678");
	}

	#[test]
	fn test_format_rupee_negative() {
		assert_eq!(format_rupee(-500), "-₹500");
		assert_eq!(format_rupee(-150000), "-₹1,50,000");
	}

	#[test]
	fn test_dates() {
		let date = Date::from_str("2025-01-05").unwrap();
		assert_eq!(format_iso_date(&date), "2025-01-05");
		assert_eq!(format_long_date(&date), "Sun, 05 January, 2025");
		assert_eq!(format_short_date(&date), "05 Jan 2025");
	}

	#[test]
	fn test_months() {
		assert_eq!(format_long_month("03"), "March");
		assert_eq!(format_long_month("12"), "December");
		assert_eq!(format_short_month("09"), "Sep");
		assert_eq!(format_long_month("13"), "13");
	}

	#[test]
	fn test_time() {
		let t = NaiveTime::from_hms_opt(21, 5, 0).unwrap();
		assert_eq!(format_time(&t), "09:05 PM");
		let t = NaiveTime::from_hms_opt(0, 30, 0).unwrap();
		assert_eq!(format_time(&t), "12:30 AM");
	}
}
