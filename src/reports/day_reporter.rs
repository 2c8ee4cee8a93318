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
use crate::model::expense::{total_of, Expense, PostResult};
use crate::model::path_key::PathKey;
use crate::nav::breadcrumb::{breadcrumbs, render};
use crate::reports::table::Table;
use crate::util::format::format_rupee;

/// Lists one day's entries.
pub struct DayReporter<'a> {
	key: &'a PathKey,
	expenses: &'a [Expense],
}

impl<'a> DayReporter<'a> {
	pub fn new(key: &'a PathKey, expenses: &'a [Expense]) -> Self {
		Self { key, expenses }
	}

	pub fn render(&self) -> String {
		let mut out = render(&breadcrumbs(self.key));
		out.push_str("\n\n");

		if self.expenses.is_empty() {
			out.push_str("No Expenses\n");
			return out;
		}

		let mut table = Table::new(2);
		table.right_align(vec![1]);
		for e in self.expenses {
			table.add_row(vec![&e.purpose, &format_rupee(e.amount)]);
		}
		table.add_partial_separator(vec![1]);
		table.add_row(vec!["", &format_rupee(total_of(self.expenses))]);

		out.push_str(&table.render());
		out
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}
}

pub fn saved_summary(result: &PostResult) -> String {
	format!(
		"Expenses Saved! Added: {} Updated: {} Deleted: {}",
		result.inserted, result.updated, result.deleted
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_day_listing() {
		let key = PathKey::parse("/2025/07/05").unwrap();
		let expenses = vec![
			Expense::new(1, "kirana", 390),
			Expense::new(2, "miscellaneous", 1390),
		];
		let expected = [
			"Year 2025 > July > Day 5",
			"",
			"kirana            ₹390",
			"miscellaneous   ₹1,390",
			"                ------",
			"                ₹1,780",
		];
		assert_eq!(
			DayReporter::new(&key, &expenses).render(),
			format!("{}\n", expected.join("\n"))
		);
	}

	#[test]
	fn test_empty_day() {
		let key = PathKey::parse("/2025/07/06").unwrap();
		assert_eq!(
			DayReporter::new(&key, &[]).render(),
			"Year 2025 > July > Day 6\n\nNo Expenses\n"
		);
	}

	#[test]
	fn test_saved_summary() {
		let result = PostResult {
			inserted: 1,
			updated: 2,
			deleted: 0,
		};
		assert_eq!(
			saved_summary(&result),
			"Expenses Saved! Added: 1 Updated: 2 Deleted: 0"
		);
	}
}
