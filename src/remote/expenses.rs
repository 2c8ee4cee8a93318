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
use crate::model::expense::{DailyExpense, Expense, PostResult, SearchedExpense};
use crate::model::path_key::PathKey;
use crate::model::period::{Category, PeriodNode, ReportRow};
use crate::remote::http::{Client, Transport};

/// Typed view of the expense server's routes. All reads degrade to empty
/// lists; see `Client`.
pub struct ExpenseApi<T: Transport> {
	client: Client<T>,
}

impl<T: Transport> ExpenseApi<T> {
	pub fn new(client: Client<T>) -> Self {
		Self { client }
	}

	#[cfg(test)]
	pub fn transport(&self) -> &T {
		self.client.transport()
	}

	pub fn years(&self) -> Vec<PeriodNode> {
		self.client.fetch("")
	}

	pub fn months_of_year(&self, year_key: &PathKey) -> Vec<PeriodNode> {
		self.client.fetch(&year_key.to_string())
	}

	pub fn days_of_month(&self, month_key: &PathKey) -> Vec<PeriodNode> {
		self.client.fetch(&month_key.to_string())
	}

	pub fn expenses_of_day(&self, day_key: &PathKey) -> Vec<Expense> {
		self.client.fetch(&day_key.to_string())
	}

	pub fn all_for_export(&self) -> Vec<DailyExpense> {
		self.client.fetch_with("", &[("export", "true")])
	}

	/// Per-day rows for a month key, per-month rows for a year key.
	pub fn report(&self, key: &PathKey) -> Vec<ReportRow> {
		self.client.fetch_with(&key.to_string(), &[("report", "true")])
	}

	pub fn categories(&self, key: &PathKey) -> Vec<Category> {
		self.client
			.fetch_with(&key.to_string(), &[("categories", "true")])
	}

	pub fn search(&self, text: &str) -> Vec<SearchedExpense> {
		self.client.fetch_with("", &[("search", text.trim())])
	}

	/// Replaces the day's entries with `expenses`.
	pub fn save_day(
		&self,
		day_key: &PathKey,
		expenses: &[Expense],
	) -> Option<PostResult> {
		self.client.post(&day_key.to_string(), &expenses)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::remote::http::fake::{endpoints, FakeTransport};

	fn api(transport: FakeTransport) -> ExpenseApi<FakeTransport> {
		ExpenseApi::new(Client::new(transport, endpoints(None)))
	}

	fn key(s: &str) -> PathKey {
		PathKey::parse(s).unwrap()
	}

	#[test]
	fn test_routes() {
		let api = api(FakeTransport::new()
			.reply(200, "[]")
			.reply(200, "[]")
			.reply(200, "[]")
			.reply(200, "[]")
			.reply(200, "[]")
			.reply(200, "[]")
			.reply(200, "[]")
			.reply(200, "[]"));

		api.years();
		api.months_of_year(&key("/2025"));
		api.days_of_month(&key("/2025/03"));
		api.expenses_of_day(&key("/2025/03/14"));
		api.all_for_export();
		api.report(&key("/2025/03"));
		api.categories(&key("/2025"));
		api.search(" jio recharge ");

		assert_eq!(
			api.client.transport().urls(),
			vec![
				"http://primary/expenses",
				"http://primary/expenses/2025",
				"http://primary/expenses/2025/03",
				"http://primary/expenses/2025/03/14",
				"http://primary/expenses?export=true",
				"http://primary/expenses/2025/03?report=true",
				"http://primary/expenses/2025?categories=true",
				"http://primary/expenses?search=jio+recharge",
			]
		);
	}

	#[test]
	fn test_save_day_posts_batch() {
		let api = api(
			FakeTransport::new().reply(200, r#"{"inserted":1,"updated":1}"#),
		);
		let result = api.save_day(
			&key("/2025/03/14"),
			&[Expense::new(1, "tea", 10), Expense::new(2, "bus", 40)],
		);
		assert_eq!(result.map(|r| (r.inserted, r.updated)), Some((1, 1)));

		let seen = api.client.transport().seen.borrow();
		assert_eq!(seen[0].url, "http://primary/expenses/2025/03/14");
		let body: Vec<Expense> =
			serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
		assert_eq!(body.len(), 2);
	}

	#[test]
	fn test_search_text_is_a_query_parameter() {
		let api = api(FakeTransport::new().reply(200, "[]"));
		api.search("a&b=c");

		let seen = api.client.transport().seen.borrow();
		assert_eq!(seen[0].url, "http://primary/expenses");
		assert_eq!(
			seen[0].query,
			vec![("search".to_string(), "a&b=c".to_string())]
		);
		assert_eq!(
			api.client.transport().urls(),
			vec!["http://primary/expenses?search=a%26b%3Dc"]
		);
	}
}
