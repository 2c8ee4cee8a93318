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
use crate::model::expense::DailyExpense;
use crate::util::format::format_iso_date;
use anyhow::Error;
use std::io::Write;

/// Writes the flattened expense list as CSV, one expense per line, ready to
/// open in a spreadsheet. Returns the number of expenses written.
pub fn write_csv<W: Write>(
	out: W,
	expenses: &[DailyExpense],
) -> Result<usize, Error> {
	let mut writer = csv::Writer::from_writer(out);
	writer.write_record(["Date", "Purpose", "Amount"])?;

	for e in expenses {
		let date = match e.day() {
			Some(d) => format_iso_date(&d),
			None => e.date.clone(),
		};
		writer.write_record([date, e.purpose.clone(), e.amount.to_string()])?;
	}

	writer.flush()?;
	Ok(expenses.len())
}
