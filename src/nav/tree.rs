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
use crate::model::expense::{total_of, Expense};
use crate::model::path_key::{Level, PathKey};
use crate::model::period::{
	add_missing_days, add_missing_months, add_missing_years, PeriodNode,
};
use crate::remote::expenses::ExpenseApi;
use crate::remote::http::Transport;
use crate::util::date::Date;
use tracing::debug;

/// Which branch to open when the tree is first shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
	/// The last year, its last month and that month's last day
	Latest,
	Path(PathKey),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
	pub key: PathKey,
	pub label: String,
	pub total: i64,
	/// Child buckets; `None` until the node is expanded. Day nodes never
	/// have any.
	pub children: Option<Vec<TreeNode>>,
	/// Entries of a day node; `None` until the day is expanded.
	pub expenses: Option<Vec<Expense>>,
}

impl TreeNode {
	fn from_period(parent: &PathKey, period: PeriodNode) -> Self {
		Self {
			key: parent.child(&period.label),
			label: period.label,
			total: period.total,
			children: None,
			expenses: None,
		}
	}

	pub fn is_expanded(&self) -> bool {
		self.children.is_some() || self.expenses.is_some()
	}

	fn collapse(&mut self) {
		self.children = None;
		self.expenses = None;
	}
}

/// The Year → Month → Day → Expense drill-down. Only one branch is open at
/// a time; opening a node collapses its siblings. Children are fetched when
/// a node opens and are dropped when it closes.
pub struct ExpenseTree {
	today: Date,
	years: Vec<TreeNode>,
	open: PathKey,
}

impl ExpenseTree {
	/// Fetches and backfills the year list.
	pub fn load<T: Transport>(api: &ExpenseApi<T>, today: Date) -> Self {
		let mut years = api.years();
		add_missing_years(&mut years, &today);

		let root = PathKey::root();
		Self {
			today,
			years: years
				.into_iter()
				.map(|y| TreeNode::from_period(&root, y))
				.collect(),
			open: root,
		}
	}

	pub fn years(&self) -> &[TreeNode] {
		&self.years
	}

	/// Key of the deepest open node; the root key when nothing is open.
	pub fn open_key(&self) -> &PathKey {
		&self.open
	}

	/// Opens the tree top-down along `target`, one level at a time, fetching
	/// each level once its parent is in place. Expansion stops at the first
	/// segment with no matching bucket.
	pub fn expand<T: Transport>(&mut self, api: &ExpenseApi<T>, target: &Target) {
		self.collapse_all();

		let (wanted, latest) = match target {
			Target::Latest => (vec![], true),
			Target::Path(key) => (key.segments().to_vec(), false),
		};

		let today = self.today;
		let mut open = PathKey::root();
		expand_level(&mut self.years, &wanted, latest, api, &today, &mut open);
		self.open = open;
	}

	pub fn collapse_all(&mut self) {
		for year in &mut self.years {
			year.collapse();
		}
		self.open = PathKey::root();
	}

	pub fn node(&self, key: &PathKey) -> Option<&TreeNode> {
		let mut level: &[TreeNode] = &self.years;
		let mut found = None;
		for segment in key.segments() {
			let node = &level[position_of(level, segment)?];
			found = Some(node);
			level = node.children.as_deref().unwrap_or_default();
		}
		found
	}

	/// Records a saved batch for an open day and propagates the new day total
	/// upward.
	pub fn replace_day_expenses(
		&mut self,
		day_key: &PathKey,
		expenses: Vec<Expense>,
	) {
		let total = total_of(&expenses);
		let day = self.node_mut(day_key);
		day.expenses = Some(expenses);
		self.apply_day_total(day_key, total);
	}

	/// Sets the total of a displayed day and recomputes its month and year as
	/// the sum of their children.
	///
	/// Panics if the key does not point at a displayed day: the caller's key
	/// and the displayed tree have diverged.
	pub fn apply_day_total(&mut self, day_key: &PathKey, total: i64) {
		if day_key.level() != Level::Day {
			panic!("no matching node found for update key {}", day_key);
		}

		self.node_mut(day_key).total = total;

		for ancestor in day_key.prefixes().into_iter().rev().skip(1) {
			let node = self.node_mut(&ancestor);
			if let Some(children) = &node.children {
				node.total = children.iter().map(|c| c.total).sum();
			}
		}
	}

	fn node_mut(&mut self, key: &PathKey) -> &mut TreeNode {
		find_mut(&mut self.years, key.segments()).unwrap_or_else(|| {
			panic!("no matching node found for update key {}", key)
		})
	}
}

/// Sibling lookup by numeric label so that `3` and `03` agree.
fn position_of(level: &[TreeNode], segment: &str) -> Option<usize> {
	let wanted = segment.parse::<u32>().ok()?;
	level
		.iter()
		.position(|n| n.label.parse::<u32>().ok() == Some(wanted))
}

fn find_mut<'a>(
	level: &'a mut [TreeNode],
	segments: &[String],
) -> Option<&'a mut TreeNode> {
	let (first, rest) = segments.split_first()?;
	let index = position_of(level, first)?;
	let node = &mut level[index];

	if rest.is_empty() {
		Some(node)
	} else {
		find_mut(node.children.as_mut()?, rest)
	}
}

fn expand_level<T: Transport>(
	level: &mut [TreeNode],
	wanted: &[String],
	latest: bool,
	api: &ExpenseApi<T>,
	today: &Date,
	open: &mut PathKey,
) {
	let index = match wanted.first() {
		Some(segment) => position_of(level, segment),
		None if latest => level.len().checked_sub(1),
		None => None,
	};

	let Some(index) = index else {
		return;
	};

	let node = &mut level[index];
	debug!("expanding {}", node.key);
	*open = node.key.clone();
	load_children(node, api, today);

	if let Some(children) = node.children.as_mut() {
		let rest = wanted.get(1..).unwrap_or_default();
		expand_level(children, rest, latest, api, today, open);
	}
}

fn load_children<T: Transport>(
	node: &mut TreeNode,
	api: &ExpenseApi<T>,
	today: &Date,
) {
	let key = node.key.clone();
	match key.level() {
		Level::Year => {
			let mut months = api.months_of_year(&key);
			if let Some(year) = key.year_num() {
				add_missing_months(&mut months, today, year);
			}
			node.children = Some(
				months
					.into_iter()
					.map(|m| TreeNode::from_period(&key, m))
					.collect(),
			);
		},
		Level::Month => {
			let mut days = api.days_of_month(&key);
			if let (Some(year), Some(month)) = (key.year_num(), key.month_num()) {
				add_missing_days(&mut days, today, year, month);
			}
			node.children = Some(
				days.into_iter()
					.map(|d| TreeNode::from_period(&key, d))
					.collect(),
			);
		},
		Level::Day => {
			node.expenses = Some(api.expenses_of_day(&key));
		},
		Level::Root => {},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::remote::http::fake::{endpoints, FakeTransport};
	use crate::remote::http::Client;

	fn api(transport: FakeTransport) -> ExpenseApi<FakeTransport> {
		ExpenseApi::new(Client::new(transport, endpoints(None)))
	}

	fn key(s: &str) -> PathKey {
		PathKey::parse(s).unwrap()
	}

	fn today() -> Date {
		Date::from_str("2025-03-03").unwrap()
	}

	fn scripted() -> FakeTransport {
		FakeTransport::new()
			.reply(200, r#"[{"year":"2024","total":300}]"#)
			.reply(200, r#"[{"month":"02","total":120},{"month":"03","total":30}]"#)
			.reply(200, r#"[{"day":"01","total":10},{"day":"03","total":20}]"#)
			.reply(
				200,
				r#"[{"timestamp":1,"purpose":"tea","amount":15},
				    {"timestamp":2,"purpose":"bus","amount":5}]"#,
			)
	}

	#[test]
	fn test_load_backfills_years() {
		let api = api(scripted());
		let tree = ExpenseTree::load(&api, today());
		let labels: Vec<&str> =
			tree.years().iter().map(|y| y.label.as_str()).collect();
		assert_eq!(labels, vec!["2024", "2025"]);
		assert_eq!(tree.years()[1].total, 0);
		assert_eq!(tree.open_key(), &PathKey::root());
	}

	#[test]
	fn test_expand_latest() {
		let api = api(FakeTransport::new()
			.reply(200, r#"[{"year":"2025","total":30}]"#)
			.reply(200, r#"[{"month":"03","total":30}]"#)
			.reply(200, r#"[{"day":"01","total":30}]"#)
			.reply(200, "[]"));
		let mut tree = ExpenseTree::load(&api, today());
		tree.expand(&api, &Target::Latest);

		// latest day is today, even without activity
		assert_eq!(tree.open_key().to_string(), "/2025/03/03");
		let march = tree.node(&key("/2025/03")).unwrap();
		assert_eq!(march.children.as_ref().unwrap().len(), 3);
		let day = tree.node(&key("/2025/03/03")).unwrap();
		assert_eq!(day.expenses, Some(vec![]));
	}

	#[test]
	fn test_expand_path_and_propagate() {
		let api = api(FakeTransport::new()
			.reply(200, r#"[{"year":"2025","total":150}]"#)
			.reply(200, r#"[{"month":"02","total":120},{"month":"03","total":30}]"#)
			.reply(200, r#"[{"day":"01","total":10},{"day":"03","total":20}]"#)
			.reply(
				200,
				r#"[{"timestamp":1,"purpose":"tea","amount":15},
				    {"timestamp":2,"purpose":"bus","amount":5}]"#,
			));
		let mut tree = ExpenseTree::load(&api, today());
		tree.expand(&api, &Target::Path(key("/2025/03/03")));

		assert_eq!(tree.open_key().to_string(), "/2025/03/03");
		let day = tree.node(&key("/2025/03/03")).unwrap();
		assert_eq!(day.expenses.as_ref().unwrap().len(), 2);

		tree.replace_day_expenses(
			&key("/2025/03/03"),
			vec![Expense::new(1, "tea", 50)],
		);

		assert_eq!(tree.node(&key("/2025/03/03")).unwrap().total, 50);
		assert_eq!(tree.node(&key("/2025/03")).unwrap().total, 60);
		assert_eq!(tree.node(&key("/2025")).unwrap().total, 180);
	}

	#[test]
	fn test_expand_stops_at_unknown_segment() {
		let api = api(scripted());
		let mut tree = ExpenseTree::load(&api, today());
		tree.expand(&api, &Target::Path(key("/2024/07")));
		// 2024 is a past year, so July exists after backfill
		assert_eq!(tree.open_key().to_string(), "/2024/07");

		let api2 = api_with_years();
		let mut tree = ExpenseTree::load(&api2, today());
		tree.expand(&api2, &Target::Path(key("/2019/01")));
		assert_eq!(tree.open_key(), &PathKey::root());
	}

	fn api_with_years() -> ExpenseApi<FakeTransport> {
		api(FakeTransport::new().reply(200, r#"[{"year":"2024","total":1}]"#))
	}

	#[test]
	fn test_expanding_collapses_previous_branch() {
		let api = api(FakeTransport::new()
			.reply(200, r#"[{"year":"2024","total":1}]"#)
			.reply(200, "[]")
			.reply(200, "[]"));
		let mut tree = ExpenseTree::load(&api, today());
		tree.expand(&api, &Target::Path(key("/2024")));
		assert!(tree.node(&key("/2024")).unwrap().is_expanded());

		tree.expand(&api, &Target::Path(key("/2025")));
		assert!(!tree.node(&key("/2024")).unwrap().is_expanded());
		assert_eq!(tree.open_key().to_string(), "/2025");
	}

	#[test]
	#[should_panic(expected = "no matching node found for update key")]
	fn test_update_of_hidden_day_panics() {
		let api = api(scripted());
		let mut tree = ExpenseTree::load(&api, today());
		tree.apply_day_total(&key("/2024/02/10"), 5);
	}

	#[test]
	fn test_offline_tree_is_empty() {
		let api = api(FakeTransport::new());
		let mut tree = ExpenseTree::load(&api, today());
		tree.expand(&api, &Target::Latest);
		assert!(tree.years().is_empty());
		assert_eq!(tree.open_key(), &PathKey::root());
	}
}
