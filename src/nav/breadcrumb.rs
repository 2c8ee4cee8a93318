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
use crate::model::path_key::PathKey;
use crate::util::format::format_long_month;

/// One breadcrumb entry. `key` is where selecting the entry navigates to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crumb {
	pub label: String,
	pub key: PathKey,
}

/// Maps the open key to its trail: `Year 2025`, then the month name, then
/// `Day 14`. The root key has no trail.
pub fn breadcrumbs(open: &PathKey) -> Vec<Crumb> {
	open.prefixes()
		.into_iter()
		.zip(open.segments())
		.enumerate()
		.map(|(depth, (key, segment))| {
			let label = match depth {
				0 => format!("Year {}", segment),
				1 => format_long_month(segment),
				_ => format!("Day {}", segment.parse::<u32>().unwrap_or(0)),
			};
			Crumb { label, key }
		})
		.collect()
}

pub fn render(crumbs: &[Crumb]) -> String {
	crumbs
		.iter()
		.map(|c| c.label.as_str())
		.collect::<Vec<_>>()
		.join(" > ")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn labels(key: &str) -> Vec<String> {
		breadcrumbs(&PathKey::parse(key).unwrap())
			.into_iter()
			.map(|c| c.label)
			.collect()
	}

	#[test]
	fn test_root_has_no_trail() {
		assert!(labels("").is_empty());
	}

	#[test]
	fn test_trail_per_depth() {
		assert_eq!(labels("/2025"), vec!["Year 2025"]);
		assert_eq!(labels("/2025/03"), vec!["Year 2025", "March"]);
		assert_eq!(labels("/2025/03/14"), vec!["Year 2025", "March", "Day 14"]);
		assert_eq!(labels("/2025/03/04"), vec!["Year 2025", "March", "Day 4"]);
	}

	#[test]
	fn test_navigation_targets() {
		let crumbs = breadcrumbs(&PathKey::parse("/2025/03/14").unwrap());
		let keys: Vec<String> =
			crumbs.iter().map(|c| c.key.to_string()).collect();
		assert_eq!(keys, vec!["/2025", "/2025/03", "/2025/03/14"]);
		assert_eq!(render(&crumbs), "Year 2025 > March > Day 14");
	}
}
