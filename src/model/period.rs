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
use crate::model::deserialize_whole_number;
use crate::util::date::Date;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Anything keyed by a zero-padded numeric period label that backfill can
/// pad with zero-total placeholders.
pub trait Bucket {
	fn label(&self) -> &str;
	fn total(&self) -> i64;
	fn placeholder(label: String) -> Self;

	fn number(&self) -> u32 {
		self.label().trim().parse().unwrap_or(0)
	}
}

/// One Year, Month or Day bucket as the server aggregates it. The server
/// names the label field after the granularity (`year`, `month`, `day`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeriodNode {
	#[serde(alias = "year", alias = "month", alias = "day")]
	pub label: String,
	#[serde(deserialize_with = "deserialize_whole_number")]
	pub total: i64,
}

impl PeriodNode {
	pub fn new(label: &str, total: i64) -> Self {
		Self {
			label: label.to_string(),
			total,
		}
	}
}

impl Bucket for PeriodNode {
	fn label(&self) -> &str {
		&self.label
	}

	fn total(&self) -> i64 {
		self.total
	}

	fn placeholder(label: String) -> Self {
		Self::new(&label, 0)
	}
}

/// A row of a month (per day) or year (per month) report. `purpose` is the
/// server's comma-joined list of that period's expense purposes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportRow {
	#[serde(alias = "month", alias = "day")]
	pub label: String,
	#[serde(default)]
	pub purpose: String,
	#[serde(deserialize_with = "deserialize_whole_number")]
	pub total: i64,
}

impl ReportRow {
	pub fn purposes(&self) -> Vec<&str> {
		self.purpose
			.split(", ")
			.map(str::trim)
			.filter(|p| !p.is_empty())
			.collect()
	}
}

impl Bucket for ReportRow {
	fn label(&self) -> &str {
		&self.label
	}

	fn total(&self) -> i64 {
		self.total
	}

	fn placeholder(label: String) -> Self {
		Self {
			label,
			purpose: String::new(),
			total: 0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
	pub category: String,
	#[serde(deserialize_with = "deserialize_whole_number")]
	pub total: i64,
}

pub fn sum_totals<B: Bucket>(buckets: &[B]) -> i64 {
	buckets.iter().map(Bucket::total).sum()
}

/// Pads year buckets from the earliest reported year through the reference
/// year. An empty list stays empty: there is no earliest year to start from.
pub fn add_missing_years<B: Bucket>(buckets: &mut Vec<B>, today: &Date) {
	let Some(first) = buckets.iter().map(Bucket::number).min() else {
		return;
	};

	fill(buckets, first..=today.year(), |y| format!("{:04}", y));
}

/// Pads month buckets of `year` from January through either the reference
/// month (current year) or December.
pub fn add_missing_months<B: Bucket>(
	buckets: &mut Vec<B>,
	today: &Date,
	year: u32,
) {
	let last = if year == today.year() {
		today.month()
	} else {
		12
	};

	fill(buckets, 1..=last as u32, |m| format!("{:02}", m));
}

/// Pads day buckets of `year`/`month` from the 1st through either the
/// reference day (current month) or the last day of that month.
pub fn add_missing_days<B: Bucket>(
	buckets: &mut Vec<B>,
	today: &Date,
	year: u32,
	month: u8,
) {
	let last = if year == today.year() && month == today.month() {
		today.day()
	} else {
		Date::days_in_month(year, month)
	};

	fill(buckets, 1..=last as u32, |d| format!("{:02}", d));
}

fn fill<B, F>(
	buckets: &mut Vec<B>,
	range: std::ops::RangeInclusive<u32>,
	to_label: F,
) where
	B: Bucket,
	F: Fn(u32) -> String,
{
	let present: BTreeSet<u32> = buckets.iter().map(Bucket::number).collect();

	for n in range {
		if !present.contains(&n) {
			buckets.push(B::placeholder(to_label(n)));
		}
	}

	buckets.sort_by_key(Bucket::number);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn date(s: &str) -> Date {
		Date::from_str(s).unwrap()
	}

	fn labels(buckets: &[PeriodNode]) -> Vec<&str> {
		buckets.iter().map(|b| b.label.as_str()).collect()
	}

	#[test]
	fn test_years_fill_to_reference_year() {
		let mut years = vec![PeriodNode::new("2023", 100)];
		add_missing_years(&mut years, &date("2025-06-01"));
		assert_eq!(
			years,
			vec![
				PeriodNode::new("2023", 100),
				PeriodNode::new("2024", 0),
				PeriodNode::new("2025", 0),
			]
		);
	}

	#[test]
	fn test_years_gap_in_middle() {
		let mut years =
			vec![PeriodNode::new("2025", 7), PeriodNode::new("2021", 3)];
		add_missing_years(&mut years, &date("2025-01-01"));
		assert_eq!(
			labels(&years),
			vec!["2021", "2022", "2023", "2024", "2025"]
		);
		assert_eq!(years[0].total, 3);
		assert_eq!(years[4].total, 7);
		assert_eq!(sum_totals(&years), 10);
	}

	#[test]
	fn test_years_empty_is_noop() {
		let mut years: Vec<PeriodNode> = vec![];
		add_missing_years(&mut years, &date("2025-06-01"));
		assert!(years.is_empty());
	}

	#[test]
	fn test_years_after_reference_are_kept() {
		let mut years = vec![PeriodNode::new("2027", 5)];
		add_missing_years(&mut years, &date("2025-06-01"));
		assert_eq!(years, vec![PeriodNode::new("2027", 5)]);
	}

	#[test]
	fn test_months_current_year_stop_at_reference_month() {
		let mut months = vec![PeriodNode::new("02", 50)];
		add_missing_months(&mut months, &date("2025-04-20"), 2025);
		assert_eq!(labels(&months), vec!["01", "02", "03", "04"]);
		assert_eq!(months[1].total, 50);
	}

	#[test]
	fn test_months_past_year_cover_twelve() {
		let mut months = vec![PeriodNode::new("11", 1)];
		add_missing_months(&mut months, &date("2025-04-20"), 2024);
		assert_eq!(months.len(), 12);
		assert_eq!(months[0].label, "01");
		assert_eq!(months[11].label, "12");
		assert_eq!(months[10].total, 1);
	}

	#[test]
	fn test_days_leap_february() {
		let mut days = vec![];
		add_missing_days::<PeriodNode>(&mut days, &date("2025-06-01"), 2024, 2);
		assert_eq!(days.len(), 29);
		let mut days = vec![];
		add_missing_days::<PeriodNode>(&mut days, &date("2025-06-01"), 2025, 2);
		assert_eq!(days.len(), 28);
	}

	#[test]
	fn test_days_current_month_stop_at_today() {
		let mut days = vec![PeriodNode::new("03", 40), PeriodNode::new("01", 5)];
		add_missing_days(&mut days, &date("2025-03-14"), 2025, 3);
		assert_eq!(days.len(), 14);
		assert_eq!(days[0], PeriodNode::new("01", 5));
		assert_eq!(days[1], PeriodNode::new("02", 0));
		assert_eq!(days[2], PeriodNode::new("03", 40));
		assert_eq!(days[13].label, "14");
	}

	#[test]
	fn test_same_month_other_year_is_full() {
		let mut days: Vec<PeriodNode> = vec![];
		add_missing_days(&mut days, &date("2025-03-14"), 2024, 3);
		assert_eq!(days.len(), 31);
	}

	#[test]
	fn test_report_rows_get_empty_purpose() {
		let mut rows = vec![ReportRow {
			label: "02".to_string(),
			purpose: "bus, tea".to_string(),
			total: 60,
		}];
		add_missing_days(&mut rows, &date("2025-03-03"), 2025, 3);
		assert_eq!(rows.len(), 3);
		assert_eq!(rows[0].purpose, "");
		assert_eq!(rows[1].purposes(), vec!["bus", "tea"]);
		assert!(rows[2].purposes().is_empty());
	}

	#[test]
	fn test_deserialize_server_shapes() {
		let years: Vec<PeriodNode> =
			serde_json::from_str(r#"[{"year":"2024","total":1200}]"#).unwrap();
		assert_eq!(years, vec![PeriodNode::new("2024", 1200)]);

		let days: Vec<PeriodNode> =
			serde_json::from_str(r#"[{"day":"07","total":99.6}]"#).unwrap();
		assert_eq!(days, vec![PeriodNode::new("07", 100)]);

		let rows: Vec<ReportRow> =
			serde_json::from_str(r#"[{"month":"01","total":5}]"#).unwrap();
		assert_eq!(rows[0].purpose, "");
	}

	mod properties {
		use super::*;
		use rand::Rng;

		#[test]
		fn test_backfill_is_complete_and_idempotent() {
			let mut rng = rand::thread_rng();

			for _ in 0..200 {
				let today = date("2025-06-15");
				let year = rng.gen_range(2020..=2025u32);
				let month = rng.gen_range(1..=12u8);

				let last = if year == 2025 && month == 6 {
					15
				} else {
					Date::days_in_month(year, month) as u32
				};

				let mut days: Vec<PeriodNode> = (1..=last)
					.filter(|_| rng.gen_bool(0.3))
					.map(|d| PeriodNode::new(&format!("{:02}", d), d as i64))
					.collect();
				let reported = sum_totals(&days);

				add_missing_days(&mut days, &today, year, month);

				let expected_len = last as usize;
				assert_eq!(days.len(), expected_len);
				assert_eq!(sum_totals(&days), reported);
				for (i, d) in days.iter().enumerate() {
					assert_eq!(d.number() as usize, i + 1);
				}

				let once = days.clone();
				add_missing_days(&mut days, &today, year, month);
				assert_eq!(days, once);
			}
		}
	}
}
