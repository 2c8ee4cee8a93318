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

/// A single ledger line of one day. The timestamp (milliseconds since the
/// epoch at creation) is the server's primary key for the entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Expense {
	pub timestamp: i64,
	pub purpose: String,
	#[serde(deserialize_with = "deserialize_whole_number")]
	pub amount: i64,
}

impl Expense {
	pub fn new(timestamp: i64, purpose: &str, amount: i64) -> Self {
		Self {
			timestamp,
			purpose: purpose.to_string(),
			amount,
		}
	}
}

pub fn total_of(expenses: &[Expense]) -> i64 {
	expenses.iter().map(|e| e.amount).sum()
}

/// An expense flattened together with its day, as returned by the export
/// and search endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DailyExpense {
	pub date: String,
	pub purpose: String,
	#[serde(deserialize_with = "deserialize_whole_number")]
	pub amount: i64,
}

pub type SearchedExpense = DailyExpense;

impl DailyExpense {
	/// The leading ISO-8601 date, if the server sent one.
	pub fn day(&self) -> Option<Date> {
		self.date.get(..10).and_then(|d| Date::from_str(d).ok())
	}
}

/// Outcome of replacing a day's batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostResult {
	#[serde(default)]
	pub inserted: u32,
	#[serde(default)]
	pub updated: u32,
	#[serde(default)]
	pub deleted: u32,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_expense_wire_format() {
		let expenses: Vec<Expense> = serde_json::from_str(
			r#"[{"timestamp":1722417000000,"purpose":"kirana","amount":390}]"#,
		)
		.unwrap();
		assert_eq!(expenses, vec![Expense::new(1722417000000, "kirana", 390)]);
		assert_eq!(total_of(&expenses), 390);

		let body = serde_json::to_string(&expenses).unwrap();
		assert!(body.contains(r#""purpose":"kirana""#));
	}

	#[test]
	fn test_daily_expense_day() {
		let found: Vec<SearchedExpense> = serde_json::from_str(
			r#"[{"date":"2025-07-05T00:00:00","purpose":"kirana","amount":390},
			    {"date":"soon","purpose":"tea","amount":10}]"#,
		)
		.unwrap();
		assert_eq!(found[0].day(), Some(Date::from_str("2025-07-05").unwrap()));
		assert_eq!(found[1].day(), None);
	}

	#[test]
	fn test_post_result_without_deleted() {
		let result: PostResult =
			serde_json::from_str(r#"{"inserted":2,"updated":1}"#).unwrap();
		assert_eq!(
			result,
			PostResult {
				inserted: 2,
				updated: 1,
				deleted: 0
			}
		);
	}
}
