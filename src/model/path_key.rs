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
use anyhow::{bail, Error};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Depth of a node in the Year → Month → Day hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
	Root,
	Year,
	Month,
	Day,
}

/// Slash-delimited location of a bucket, e.g. `/2025/03/14`. The root is
/// the empty key. A key is an ancestor of another when it is a prefix of it
/// segment-wise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey {
	segments: Vec<String>,
}

fn key_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| {
		Regex::new(r"^(?:/(\d{4})(?:/(\d{2})(?:/(\d{2}))?)?)?$").unwrap()
	})
}

impl PathKey {
	pub fn root() -> Self {
		Self::default()
	}

	/// Parses `""`, `/YYYY`, `/YYYY/MM` or `/YYYY/MM/DD`. A trailing slash
	/// is tolerated. Months and days are checked against the calendar.
	pub fn parse(key: &str) -> Result<Self, Error> {
		let trimmed = key.trim().trim_end_matches('/');
		let Some(caps) = key_regex().captures(trimmed) else {
			bail!("invalid key {:?}; expected /YYYY[/MM[/DD]]", key);
		};

		let segments: Vec<String> = caps
			.iter()
			.skip(1)
			.flatten()
			.map(|m| m.as_str().to_string())
			.collect();

		let path = Self { segments };
		path.validate()?;
		Ok(path)
	}

	fn validate(&self) -> Result<(), Error> {
		if let Some(month) = self.month_num() {
			if !(1..=12).contains(&month) {
				bail!("invalid month in key {}", self);
			}
		}

		if let (Some(year), Some(month), Some(day)) =
			(self.year_num(), self.month_num(), self.day_num())
		{
			if day < 1 || day > Date::days_in_month(year, month) {
				bail!("invalid day in key {}", self);
			}
		}

		Ok(())
	}

	pub fn for_date(date: &Date) -> Self {
		Self {
			segments: vec![
				format!("{:04}", date.year()),
				format!("{:02}", date.month()),
				format!("{:02}", date.day()),
			],
		}
	}

	pub fn level(&self) -> Level {
		match self.segments.len() {
			0 => Level::Root,
			1 => Level::Year,
			2 => Level::Month,
			_ => Level::Day,
		}
	}

	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	pub fn year(&self) -> Option<&str> {
		self.segments.first().map(String::as_str)
	}

	pub fn month(&self) -> Option<&str> {
		self.segments.get(1).map(String::as_str)
	}

	pub fn day(&self) -> Option<&str> {
		self.segments.get(2).map(String::as_str)
	}

	pub fn year_num(&self) -> Option<u32> {
		self.year().and_then(|s| s.parse().ok())
	}

	pub fn month_num(&self) -> Option<u8> {
		self.month().and_then(|s| s.parse().ok())
	}

	pub fn day_num(&self) -> Option<u8> {
		self.day().and_then(|s| s.parse().ok())
	}

	/// The calendar date a day key points at.
	pub fn date(&self) -> Option<Date> {
		Date::new(self.year_num()?, self.month_num()?, self.day_num()?).ok()
	}

	/// Key of a child bucket. Labels are taken as given; they are expected
	/// to be the zero-padded labels the server hands out.
	pub fn child(&self, label: &str) -> Self {
		let mut segments = self.segments.clone();
		segments.push(label.to_string());
		Self { segments }
	}

	/// Every non-root prefix of this key, shallowest first.
	pub fn prefixes(&self) -> Vec<Self> {
		(1..=self.segments.len())
			.map(|n| Self {
				segments: self.segments[..n].to_vec(),
			})
			.collect()
	}
}

impl fmt::Display for PathKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for segment in &self.segments {
			write!(f, "/{}", segment)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_levels() {
		assert_eq!(PathKey::parse("").unwrap().level(), Level::Root);
		assert_eq!(PathKey::parse("/2025").unwrap().level(), Level::Year);
		assert_eq!(PathKey::parse("/2025/03").unwrap().level(), Level::Month);
		assert_eq!(PathKey::parse("/2025/03/14").unwrap().level(), Level::Day);
		assert_eq!(PathKey::parse("/2025/03/").unwrap().level(), Level::Month);
	}

	#[test]
	fn test_parse_rejects_malformed() {
		assert!(PathKey::parse("2025").is_err());
		assert!(PathKey::parse("/25").is_err());
		assert!(PathKey::parse("/2025/3").is_err());
		assert!(PathKey::parse("/2025/13").is_err());
		assert!(PathKey::parse("/2025/02/29").is_err());
		assert!(PathKey::parse("/2024/02/29").is_ok());
		assert!(PathKey::parse("/2025/03/14/01").is_err());
		assert!(PathKey::parse("/2025?report=true").is_err());
	}

	#[test]
	fn test_round_trip_display() {
		for key in ["", "/2025", "/2025/03", "/2025/03/14"] {
			assert_eq!(PathKey::parse(key).unwrap().to_string(), key);
		}
	}

	#[test]
	fn test_prefixes() {
		let day = PathKey::parse("/2025/03/14").unwrap();
		assert!(PathKey::root().prefixes().is_empty());
		assert_eq!(
			day.prefixes()
				.iter()
				.map(|k| k.to_string())
				.collect::<Vec<_>>(),
			vec!["/2025", "/2025/03", "/2025/03/14"]
		);
	}

	#[test]
	fn test_for_date_and_child() {
		let date = Date::from_str("2025-03-04").unwrap();
		let key = PathKey::for_date(&date);
		assert_eq!(key.to_string(), "/2025/03/04");
		assert_eq!(key.date(), Some(date));
		assert_eq!(
			PathKey::parse("/2025").unwrap().child("07").to_string(),
			"/2025/07"
		);
	}
}
