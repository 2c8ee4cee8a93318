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
use crate::model::expense::Expense;
use anyhow::{anyhow, bail, Error};
use std::collections::HashSet;

/// An expense while it is being edited. The amount stays as typed so that
/// sums like `120+30` can be entered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftExpense {
	pub timestamp: i64,
	pub purpose: String,
	pub amount: String,
}

impl DraftExpense {
	fn from_expense(e: &Expense) -> Self {
		Self {
			timestamp: e.timestamp,
			purpose: e.purpose.clone(),
			amount: e.amount.to_string(),
		}
	}

	/// Checks a single draft. Uniqueness is a property of the whole batch and
	/// is checked in `BatchEditor::finish`.
	pub fn validate(&self) -> Result<(), Error> {
		if self.timestamp == 0 {
			bail!("expense {:?} has no timestamp", self.purpose);
		}
		if self.purpose.trim().is_empty() {
			bail!("expense purpose must not be empty");
		}
		if self.purpose.contains(',') {
			bail!("expense purpose {:?} must not contain ','", self.purpose);
		}
		parse_amount(&self.amount).map_err(|e| {
			anyhow!("expense {:?}: {}", self.purpose.trim(), e)
		})?;
		Ok(())
	}
}

/// Evaluates an amount typed as one or more positive whole numbers joined by
/// `+`.
pub fn parse_amount(expr: &str) -> Result<i64, Error> {
	let mut total: i64 = 0;
	for term in expr.split('+').map(str::trim) {
		if term.is_empty() {
			bail!("amount {:?} has an empty term", expr);
		}
		let value = term
			.parse::<i64>()
			.map_err(|_| anyhow!("amount {:?} is not a number", expr))?;
		if value <= 0 {
			bail!("amount {:?} must be positive", expr);
		}
		total = total
			.checked_add(value)
			.ok_or_else(|| anyhow!("amount {:?} is too large", expr))?;
	}
	Ok(total)
}

/// Splits a `purpose=amount` command-line item at its last `=`.
pub fn parse_item(item: &str) -> Result<(String, String), Error> {
	match item.rsplit_once('=') {
		Some((purpose, amount)) => {
			Ok((purpose.to_string(), amount.to_string()))
		},
		None => bail!("expected purpose=amount, got {:?}", item),
	}
}

/// Holds the draft of a whole day's batch. The day is always saved as one
/// replacement, so the editor produces the complete new list rather than a
/// diff.
pub struct BatchEditor {
	drafts: Vec<DraftExpense>,
	next_timestamp: i64,
}

impl BatchEditor {
	/// Starts from the day's current entries. `now_millis` seeds timestamps
	/// of entries added during the edit.
	pub fn new(existing: &[Expense], now_millis: i64) -> Self {
		let newest = existing.iter().map(|e| e.timestamp).max().unwrap_or(0);
		Self {
			drafts: existing.iter().map(DraftExpense::from_expense).collect(),
			next_timestamp: now_millis.max(newest + 1),
		}
	}

	/// Timestamp of the draft with this purpose, compared without case or
	/// surrounding space.
	pub fn timestamp_of(&self, purpose: &str) -> Option<i64> {
		let key = purpose.trim().to_lowercase();
		self.drafts
			.iter()
			.find(|d| d.purpose.trim().to_lowercase() == key)
			.map(|d| d.timestamp)
	}

	/// Appends a new draft and returns its timestamp.
	pub fn add(&mut self, purpose: &str, amount: &str) -> i64 {
		let timestamp = self.next_timestamp;
		self.next_timestamp += 1;
		self.drafts.push(DraftExpense {
			timestamp,
			purpose: purpose.to_string(),
			amount: amount.to_string(),
		});
		timestamp
	}

	pub fn edit_purpose(
		&mut self,
		timestamp: i64,
		purpose: &str,
	) -> Result<(), Error> {
		self.find(timestamp)?.purpose = purpose.to_string();
		Ok(())
	}

	pub fn edit_amount(
		&mut self,
		timestamp: i64,
		amount: &str,
	) -> Result<(), Error> {
		self.find(timestamp)?.amount = amount.to_string();
		Ok(())
	}

	pub fn remove(&mut self, timestamp: i64) {
		self.drafts.retain(|d| d.timestamp != timestamp);
	}

	/// Replaces the drafts with `items`. Items whose purpose matches an
	/// existing draft (case-insensitively) keep that draft's timestamp so the
	/// server records an update instead of a delete and insert.
	pub fn replace_all(&mut self, items: &[(String, String)]) {
		let previous = std::mem::take(&mut self.drafts);

		for (purpose, amount) in items {
			let key = purpose.trim().to_lowercase();
			let reused = previous.iter().find(|d| {
				d.purpose.trim().to_lowercase() == key
					&& !self.drafts.iter().any(|x| x.timestamp == d.timestamp)
			});

			match reused {
				Some(d) => self.drafts.push(DraftExpense {
					timestamp: d.timestamp,
					purpose: purpose.clone(),
					amount: amount.clone(),
				}),
				None => {
					self.add(purpose, amount);
				},
			}
		}
	}

	/// Applies `items` on top of the current drafts: a known purpose gets the
	/// new amount, anything else is added.
	pub fn merge(&mut self, items: &[(String, String)]) -> Result<(), Error> {
		for (purpose, amount) in items {
			match self.timestamp_of(purpose) {
				Some(timestamp) => self.edit_amount(timestamp, amount)?,
				None => {
					self.add(purpose, amount);
				},
			}
		}
		Ok(())
	}

	/// Validates the batch and converts it into the list to post, with
	/// purposes trimmed and amounts summed.
	pub fn finish(&self) -> Result<Vec<Expense>, Error> {
		for draft in &self.drafts {
			draft.validate()?;
		}

		if let Some(purpose) = self.duplicate_purpose() {
			bail!("duplicate purpose {:?}; purposes must be unique", purpose);
		}

		self.drafts
			.iter()
			.map(|d| {
				let amount = parse_amount(&d.amount)?;
				Ok(Expense::new(d.timestamp, d.purpose.trim(), amount))
			})
			.collect()
	}

	fn duplicate_purpose(&self) -> Option<String> {
		let mut seen = HashSet::new();
		self.drafts
			.iter()
			.map(|d| d.purpose.trim().to_lowercase())
			.find(|p| !seen.insert(p.clone()))
	}

	fn find(&mut self, timestamp: i64) -> Result<&mut DraftExpense, Error> {
		self.drafts
			.iter_mut()
			.find(|d| d.timestamp == timestamp)
			.ok_or_else(|| anyhow!("no draft expense with timestamp {}", timestamp))
	}
}
