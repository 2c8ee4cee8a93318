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
use crate::model::path_key::Level;
use crate::nav::breadcrumb::{breadcrumbs, render};
use crate::nav::tree::{ExpenseTree, TreeNode};
use crate::reports::table::Table;
use crate::util::format::{format_long_month, format_rupee, format_short_month};

/// Prints the drill-down tree with the open branch unfolded.
pub struct TreeReporter<'a> {
	tree: &'a ExpenseTree,
}

impl<'a> TreeReporter<'a> {
	pub fn new(tree: &'a ExpenseTree) -> Self {
		Self { tree }
	}

	pub fn render(&self) -> String {
		if self.tree.years().is_empty() {
			return "No data\n".to_string();
		}

		let mut table = Table::new(2);
		table.right_align(vec![1]);

		for year in self.tree.years() {
			self.add_node(&mut table, year, 0);
		}

		let trail = render(&breadcrumbs(self.tree.open_key()));
		if trail.is_empty() {
			table.render()
		} else {
			format!("{}\n\n{}", trail, table.render())
		}
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}

	fn add_node(&self, table: &mut Table, node: &TreeNode, depth: usize) {
		let marker = if node.is_expanded() { "-" } else { "+" };
		let label = format!(
			"{}{} {}",
			"  ".repeat(depth),
			marker,
			node_label(node)
		);
		table.add_row(vec![&label, &format_rupee(node.total)]);

		if let Some(children) = &node.children {
			for child in children {
				self.add_node(table, child, depth + 1);
			}
		}

		if let Some(expenses) = &node.expenses {
			let indent = "  ".repeat(depth + 1);
			if expenses.is_empty() {
				table.add_row(vec![&format!("{}No Expenses", indent), ""]);
			}
			for e in expenses {
				table.add_row(vec![
					&format!("{}{}", indent, e.purpose),
					&format_rupee(e.amount),
				]);
			}
		}
	}
}

fn node_label(node: &TreeNode) -> String {
	match node.key.level() {
		Level::Month => format_long_month(&node.label),
		Level::Day => match node.key.date() {
			Some(date) => format!(
				"{} {}, {}",
				node.label,
				format_short_month(node.key.month().unwrap_or_default()),
				date.weekday_name()
			),
			None => node.label.clone(),
		},
		_ => node.label.clone(),
	}
}
