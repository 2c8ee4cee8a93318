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
use crate::model::path_key::{Level, PathKey};
use crate::model::period::{
	add_missing_days, add_missing_months, sum_totals, ReportRow,
};
use crate::nav::breadcrumb::{breadcrumbs, render};
use crate::reports::table::Table;
use crate::util::date::Date;
use crate::util::format::{format_rupee, format_short_month};
use anyhow::{bail, Error};

const BAR_WIDTH: usize = 30;

/// Spending of one month (per day) or one year (per month), with a linear
/// projection of the total for the whole period.
#[derive(Debug)]
pub struct PeriodReport {
	key: PathKey,
	rows: Vec<ReportRow>,
	actual: i64,
	estimated: i64,
	/// Days in the month, or months in the year
	period_count: u32,
	/// Rounded percentage of the period already elapsed
	accuracy: i64,
}

impl PeriodReport {
	/// Backfills `rows` up to `today` and projects the total. The projection
	/// averages over the elapsed periods, gaps included.
	pub fn build(
		key: &PathKey,
		mut rows: Vec<ReportRow>,
		today: &Date,
	) -> Result<Self, Error> {
		let actual = sum_totals(&rows);

		let period_count = match (key.level(), key.year_num(), key.month_num()) {
			(Level::Year, Some(year), _) => {
				add_missing_months(&mut rows, today, year);
				12
			},
			(Level::Month, Some(year), Some(month)) => {
				add_missing_days(&mut rows, today, year, month);
				Date::days_in_month(year, month) as u32
			},
			_ => bail!("reports cover a year or a month, not {:?}", key.to_string()),
		};

		let estimated = if rows.is_empty() {
			actual
		} else {
			(actual as f64 / rows.len() as f64 * period_count as f64).round()
				as i64
		};

		let elapsed = match key.level() {
			// the current month counts as partly elapsed, in 31sts
			Level::Year if key.year_num() == Some(today.year()) => {
				rows.len().saturating_sub(1) as f64 + today.day() as f64 / 31.0
			},
			Level::Year => period_count as f64,
			_ => rows.len() as f64,
		};
		let accuracy = (elapsed / period_count as f64 * 100.0).round() as i64;

		Ok(Self {
			key: key.clone(),
			rows,
			actual,
			estimated,
			period_count,
			accuracy,
		})
	}

	pub fn actual(&self) -> i64 {
		self.actual
	}

	/// Share of the period already elapsed, as a rounded percentage.
	pub fn accuracy(&self) -> i64 {
		self.accuracy
	}

	pub fn has_estimate(&self) -> bool {
		self.estimated != self.actual
	}

	fn is_yearly(&self) -> bool {
		self.key.level() == Level::Year
	}

	fn unit(&self) -> &'static str {
		if self.is_yearly() {
			"Months"
		} else {
			"Days"
		}
	}

	fn row_label(&self, row: &ReportRow) -> String {
		if self.is_yearly() {
			format_short_month(&row.label)
		} else {
			row.label.clone()
		}
	}

	pub fn render(&self) -> String {
		let mut out = render(&breadcrumbs(&self.key));
		out.push_str("\n\n");

		if self.actual == 0 {
			out.push_str("No Expense\n");
			return out;
		}

		out.push_str(&format!(
			"{}Total of {} {}: {}\n",
			if self.has_estimate() { "Actual " } else { "" },
			self.rows.len(),
			self.unit(),
			format_rupee(self.actual)
		));

		if self.has_estimate() {
			out.push_str(&format!(
				"Estimated Total of {} {}: {} ({}% accurate)\n",
				self.period_count,
				self.unit(),
				format_rupee(self.estimated),
				self.accuracy()
			));
		}

		out.push('\n');
		out.push_str(&self.render_table());
		out.push('\n');
		out.push_str(if self.is_yearly() {
			"Monthly Expenditure\n"
		} else {
			"Daily Expenditure\n"
		});
		out.push_str(&self.render_chart());
		out
	}

	pub fn print(&self) {
		print!("{}", self.render());
	}

	fn render_table(&self) -> String {
		let mut table = Table::new(3);
		table.right_align(vec![2]);
		table.add_header(vec![
			if self.is_yearly() { "Month" } else { "Day" },
			"Expenses",
			"Total",
		]);
		table.add_separator();

		for row in &self.rows {
			table.add_row(vec![
				&self.row_label(row),
				&row.purposes().join(", "),
				&format_rupee(row.total),
			]);
		}

		table.add_partial_separator(vec![2]);
		table.add_row(vec!["", "", &format_rupee(self.actual)]);
		table.render()
	}

	fn render_chart(&self) -> String {
		let max = self.rows.iter().map(|r| r.total).max().unwrap_or(0);
		let mut table = Table::new(3);
		table.right_align(vec![2]);

		for row in &self.rows {
			let len = if max > 0 {
				(row.total.max(0) as f64 / max as f64 * BAR_WIDTH as f64)
					.round() as usize
			} else {
				0
			};
			table.add_row(vec![
				&self.row_label(row),
				&"█".repeat(len),
				&format_rupee(row.total),
			]);
		}

		table.render()
	}
}
