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
use crate::model::expense::SearchedExpense;
use crate::reports::table::Table;
use crate::util::format::{format_rupee, format_short_date};

pub struct SearchReporter {
	found: Vec<SearchedExpense>,
}

impl SearchReporter {
	pub fn new(found: Vec<SearchedExpense>) -> Self {
		Self { found }
	}

	pub fn render(&self) -> String {
		if self.found.is_empty() {
			return "No Results Found\n".to_string();
		}

		let total: i64 = self.found.iter().map(|e| e.amount).sum();

		let mut table = Table::new(3);
		table.right_align(vec![2]);
		table.add_header(vec!["Date", "Expenses", "Amount"]);
		table.add_separator();

		for e in &self.found {
			let date = match e.day() {
				Some(d) => format_short_date(&d),
				None => e.date.clone(),
			};
			table.add_row(vec![&date, &e.purpose, &format_rupee(e.amount)]);
		}

		table.add_partial_separator(vec![2]);
		table.add_row(vec!["", "", &format_rupee(total)]);

		format!(
			"Found {} Expenses, Total Amount {}\n\n{}",
			self.found.len(),
			format_rupee(total),
			table.render()
		)
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty() {
		assert_eq!(SearchReporter::new(vec![]).render(), "No Results Found\n");
	}

	#[test]
	fn test_summary_and_rows() {
		let found: Vec<SearchedExpense> = serde_json::from_str(
			r#"[{"date":"2025-07-04","purpose":"jio recharge","amount":420},
			    {"date":"2025-07-19","purpose":"jio recharge","amount":190}]"#,
		)
		.unwrap();
		let out = SearchReporter::new(found).render();
		assert!(out.starts_with("Found 2 Expenses, Total Amount ₹610\n"));
		assert!(out.contains("04 Jul 2025   jio recharge     ₹420"));
	}
}
