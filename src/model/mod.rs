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
pub mod editor;
pub mod expense;
pub mod path_key;
pub mod period;

use serde::Deserialize;

/// The server sums integer amounts, but some of its aggregations come back
/// as floats. Both are accepted and rounded to whole rupees.
pub(crate) fn deserialize_whole_number<'de, D>(
	deserializer: D,
) -> Result<i64, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	match value {
		serde_json::Value::Number(num) => {
			if let Some(i) = num.as_i64() {
				Ok(i)
			} else if let Some(f) = num.as_f64() {
				Ok(f.round() as i64)
			} else {
				Err(serde::de::Error::custom("number out of range"))
			}
		},
		serde_json::Value::Null => Ok(0),
		_ => Err(serde::de::Error::custom("expected a number")),
	}
}
