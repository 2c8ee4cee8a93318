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
use crate::model::period::Category;
use crate::reports::table::Table;
use crate::util::format::format_rupee;

pub struct CategoryReporter {
	categories: Vec<Category>,
	/// Amount the shares are measured against
	period_total: i64,
}

impl CategoryReporter {
	pub fn new(categories: Vec<Category>, period_total: i64) -> Self {
		Self {
			categories,
			period_total,
		}
	}

	/// Measures shares against the categories' own sum.
	pub fn from_categories(categories: Vec<Category>) -> Self {
		let total = categories.iter().map(|c| c.total).sum();
		Self::new(categories, total)
	}

	pub fn share(&self, category: &Category) -> i64 {
		if self.period_total == 0 {
			return 0;
		}
		(100.0 * category.total as f64 / self.period_total as f64).round() as i64
	}

	pub fn render(&self) -> String {
		if self.categories.is_empty() {
			return "No Categories\n".to_string();
		}

		let mut table = Table::new(3);
		table.right_align(vec![1, 2]);
		table.add_header(vec!["Category", "Share", "Total"]);
		table.add_separator();

		for category in &self.categories {
			table.add_row(vec![
				&category.category,
				&format!("{}%", self.share(category)),
				&format_rupee(category.total),
			]);
		}

		table.render()
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn category(name: &str, total: i64) -> Category {
		Category {
			category: name.to_string(),
			total,
		}
	}

	#[test]
	fn test_shares() {
		let reporter = CategoryReporter::from_categories(vec![
			category("groceries", 600),
			category("travel", 300),
			category("bills", 100),
		]);
		assert_eq!(reporter.share(&category("groceries", 600)), 60);
		assert_eq!(reporter.share(&category("x", 1)), 0);

		let out = reporter.render();
		assert!(out.contains("groceries     60%    ₹600"));
	}

	#[test]
	fn test_zero_total() {
		let reporter = CategoryReporter::new(vec![category("a", 0)], 0);
		assert_eq!(reporter.share(&category("a", 0)), 0);
		assert_eq!(
			CategoryReporter::new(vec![], 0).render(),
			"No Categories\n"
		);
	}
}
