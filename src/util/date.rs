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
use anyhow::{bail, Error};
use chrono::{Datelike, Local, NaiveDate};
use std::cmp::Ordering;
use std::fmt;

pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A plain calendar date. Serves as the reference "today" that period
/// backfill and report estimates are measured against.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Date {
	year: u32,
	month: u8,
	day: u8,
}

impl Date {
	/// Constructor to parse a string in the "YYYY-mm-dd" format
	pub fn from_str(date_str: &str) -> Result<Date, Error> {
		let parts: Vec<&str> = date_str.split('-').collect();
		if parts.len() != 3 {
			bail!("Date format must be YYYY-MM-DD");
		}

		let year = parts[0].parse::<u32>()?;
		let month = parts[1].parse::<u8>()?;
		let day = parts[2].parse::<u8>()?;

		Date::new(year, month, day)
	}

	pub fn new(year: u32, month: u8, day: u8) -> Result<Date, Error> {
		if !Date::is_valid_date(year, month, day) {
			bail!("Invalid date: {:04}-{:02}-{:02}", year, month, day);
		}

		Ok(Date { year, month, day })
	}

	/// The current local date.
	pub fn today() -> Date {
		Date::from(Local::now().date_naive())
	}

	pub fn year(&self) -> u32 {
		self.year
	}

	pub fn month(&self) -> u8 {
		self.month
	}

	pub fn day(&self) -> u8 {
		self.day
	}

	/// Index into `WEEKDAYS`, Sunday being zero.
	pub fn weekday(&self) -> usize {
		match NaiveDate::from_ymd_opt(
			self.year as i32,
			self.month as u32,
			self.day as u32,
		) {
			Some(d) => d.weekday().num_days_from_sunday() as usize,
			// unreachable for a validated Date
			None => 0,
		}
	}

	pub fn weekday_name(&self) -> &'static str {
		WEEKDAYS[self.weekday()]
	}

	pub fn is_leap_year(year: u32) -> bool {
		(year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
	}

	pub fn days_in_month(year: u32, month: u8) -> u8 {
		match month {
			1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
			4 | 6 | 9 | 11 => 30,
			2 => {
				if Date::is_leap_year(year) {
					29
				} else {
					28
				}
			},
			_ => 0, // Invalid month
		}
	}

	fn is_valid_date(year: u32, month: u8, day: u8) -> bool {
		if !(1..=12).contains(&month) {
			return false;
		}
		if day < 1 || day > Date::days_in_month(year, month) {
			return false;
		}
		true
	}
}

impl From<NaiveDate> for Date {
	fn from(d: NaiveDate) -> Self {
		Date {
			year: d.year().max(0) as u32,
			month: d.month() as u8,
			day: d.day() as u8,
		}
	}
}

impl PartialOrd for Date {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Date {
	fn cmp(&self, other: &Self) -> Ordering {
		(self.year, self.month, self.day).cmp(&(
			other.year,
			other.month,
			other.day,
		))
	}
}

impl fmt::Display for Date {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
	}
}
