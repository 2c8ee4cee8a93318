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
use crate::model::editor::BatchEditor;
use crate::model::expense::{total_of, PostResult};
use crate::model::path_key::PathKey;
use crate::nav::tree::{ExpenseTree, Target};
use crate::remote::expenses::ExpenseApi;
use crate::remote::http::Transport;
use crate::util::date::Date;
use anyhow::{bail, Error};
use tracing::info;

/// Changes requested for one day. Without `keep` the `items` become the
/// day's whole list; with it the day's entries stay and are edited.
#[derive(Clone, Debug, Default)]
pub struct DayEdit {
	/// `(purpose, amount)` pairs, amounts as typed
	pub items: Vec<(String, String)>,
	pub keep: bool,
	/// Purposes to drop, `keep` only
	pub remove: Vec<String>,
	/// `old=new` purpose renames, `keep` only
	pub rename: Vec<String>,
}

/// What became of the posted batch. The tree is returned either way, with
/// the new totals when saved and as loaded when not.
pub enum Saved {
	Yes(PostResult),
	No,
}

/// Opens the tree at `key`, applies `edit` to the day's entries and posts
/// the resulting batch. Nothing is posted when the day cannot be opened, its
/// entries do not add up to its total (a failed load) or the batch is
/// invalid.
pub fn save_day_edit<T: Transport>(
	api: &ExpenseApi<T>,
	today: Date,
	key: &PathKey,
	edit: &DayEdit,
	now_millis: i64,
) -> Result<(ExpenseTree, Saved), Error> {
	let mut tree = ExpenseTree::load(api, today);
	tree.expand(api, &Target::Path(key.clone()));
	if tree.open_key() != key {
		bail!("{} is not a day on record up to {}", key, today);
	}

	let (total, existing) = match tree.node(key) {
		Some(day) => (day.total, day.expenses.clone().unwrap_or_default()),
		None => bail!("{} is not a day on record up to {}", key, today),
	};
	if total != total_of(&existing) {
		bail!("Expenses of {} could not be loaded; nothing was saved", key);
	}

	let mut editor = BatchEditor::new(&existing, now_millis);
	if edit.keep {
		for purpose in &edit.remove {
			match editor.timestamp_of(purpose) {
				Some(timestamp) => editor.remove(timestamp),
				None => bail!("No expense {:?} on {}", purpose, key),
			}
		}
		for rename in &edit.rename {
			let Some((old, new)) = rename.split_once('=') else {
				bail!("expected old=new, got {:?}", rename);
			};
			match editor.timestamp_of(old) {
				Some(timestamp) => editor.edit_purpose(timestamp, new)?,
				None => bail!("No expense {:?} on {}", old, key),
			}
		}
		editor.merge(&edit.items)?;
	} else {
		editor.replace_all(&edit.items);
	}
	let batch = editor.finish()?;

	info!("saving {} expenses for {}", batch.len(), key);
	match api.save_day(key, &batch) {
		Some(result) => {
			tree.replace_day_expenses(key, batch);
			Ok((tree, Saved::Yes(result)))
		},
		None => Ok((tree, Saved::No)),
	}
}
