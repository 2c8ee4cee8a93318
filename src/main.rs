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
use crate::config::filesystem::Filesystem;
use crate::model::editor::parse_item;
use crate::model::path_key::{Level, PathKey};
use crate::nav::day_edit::{save_day_edit, DayEdit, Saved};
use crate::nav::tree::{ExpenseTree, Target};
use crate::remote::expenses::ExpenseApi;
use crate::remote::http::{Client, HttpTransport, Transport};
use crate::reports::category_reporter::CategoryReporter;
use crate::reports::day_reporter::{saved_summary, DayReporter};
use crate::reports::export::write_csv;
use crate::reports::period_reporter::PeriodReport;
use crate::reports::search_reporter::SearchReporter;
use crate::reports::tree_reporter::TreeReporter;
use crate::util::date::Date;
use crate::util::format::{format_long_date, format_time};
use anyhow::{bail, Error};
use chrono::{Local, Utc};
use clap::{ArgAction, Parser, ValueEnum};
use std::cmp::PartialEq;
use tracing_subscriber::EnvFilter;

mod config;
mod model;
mod nav;
mod remote;
mod reports;
mod util;

#[derive(Parser)]
#[command(
	name = "spendr",
	version = "1.0",
	about = "Browse, edit and report on your daily expenses"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// Period key (/YYYY[/MM[/DD]]), or the text for the Search command.
	/// The Day command defaults to today.
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Custom config file location (default: ~/.config/spendr/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Treat this date as today (YYYY-MM-DD)
	#[arg(short, long)]
	today: Option<String>,

	/// An expense for the Set command, as purpose=amount; amounts may be
	/// sums like 120+30. Repeat for each expense of the day.
	#[arg(short = 'x', long = "expense")]
	expenses: Vec<String>,

	/// With the Set command, keep the day's other expenses and only change
	/// or add the ones given with --expense
	#[arg(short, long)]
	keep: bool,

	/// With the Set command, drop the expense with this purpose
	#[arg(short, long)]
	remove: Vec<String>,

	/// With the Set command, rename an expense, as old=new
	#[arg(long)]
	rename: Vec<String>,

	/// Write the Export command's CSV here instead of stdout
	#[arg(short, long)]
	output: Option<String>,

	/// More log output on stderr; repeat for more
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(today) = &self.today {
			Date::from_str(today)?;
		}

		let edits = !self.expenses.is_empty()
			|| self.keep
			|| !self.remove.is_empty()
			|| !self.rename.is_empty();
		if edits && self.command != Directive::Set {
			bail!("Editing flags are only used by the set command");
		}

		if (!self.remove.is_empty() || !self.rename.is_empty()) && !self.keep {
			bail!("--remove and --rename edit the kept expenses; add --keep");
		}

		if self.output.is_some() && self.command != Directive::Export {
			bail!("--output is only used by the export command");
		}

		match self.command {
			Directive::Day if self.term.is_none() => {},
			Directive::Day | Directive::Set => {
				if self.key()?.level() != Level::Day {
					bail!("A day key (/YYYY/MM/DD) is required");
				}
			},
			Directive::Report => {
				let level = self.key()?.level();
				if level != Level::Year && level != Level::Month {
					bail!("A year (/YYYY) or month (/YYYY/MM) key is required");
				}
			},
			Directive::Show | Directive::Categories => {
				self.key()?;
			},
			Directive::Search => {
				if self.term.as_deref().unwrap_or_default().trim().is_empty() {
					bail!("No search term specified");
				}
			},
			Directive::Today | Directive::Export => {
				if self.term.is_some() {
					bail!("This command takes no key");
				}
			},
		}

		Ok(())
	}

	/// The term as a period key; the root key when absent.
	fn key(&self) -> Result<PathKey, Error> {
		match &self.term {
			Some(term) => PathKey::parse(term),
			None => Ok(PathKey::root()),
		}
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Today, // date and time header

	Show, // drill-down tree
	Day,  // one day's expenses
	Set,  // replace one day's expenses

	Report,     // month or year report with estimate
	Categories, // category totals
	Search,     // find expenses by purpose
	Export,     // all expenses as CSV
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;
	init_logging(args.verbose);

	let today = match &args.today {
		Some(d) => Date::from_str(d)?,
		None => Date::today(),
	};

	if args.command == Directive::Today {
		print_header(&today);
		return Ok(());
	}

	let fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref(), true)?;
	let endpoints = config.endpoints()?;
	let api = ExpenseApi::new(Client::new(
		HttpTransport::new(config.browser_id()),
		endpoints,
	));

	match args.command {
		Directive::Today => {},
		Directive::Show => {
			let key = args.key()?;
			let target = if key.level() == Level::Root {
				Target::Latest
			} else {
				Target::Path(key)
			};
			let mut tree = ExpenseTree::load(&api, today);
			tree.expand(&api, &target);
			TreeReporter::new(&tree).print();
		},
		Directive::Day => {
			let key = match &args.term {
				Some(_) => args.key()?,
				None => PathKey::for_date(&today),
			};
			let expenses = api.expenses_of_day(&key);
			DayReporter::new(&key, &expenses).print();
		},
		Directive::Set => set_day(&api, &args, today)?,
		Directive::Report => {
			let key = args.key()?;
			let report = PeriodReport::build(&key, api.report(&key), &today)?;
			report.print();
			if report.actual() != 0 {
				println!("\nCategorized");
				CategoryReporter::new(api.categories(&key), report.actual())
					.print();
			}
		},
		Directive::Categories => {
			let key = args.key()?;
			CategoryReporter::from_categories(api.categories(&key)).print();
		},
		Directive::Search => {
			let text = args.term.clone().unwrap_or_default();
			SearchReporter::new(api.search(&text)).print();
		},
		Directive::Export => {
			let expenses = api.all_for_export();
			let out = fs.output(args.output.as_ref())?;
			let count = write_csv(out, &expenses)?;
			if let Some(path) = &args.output {
				println!("Exported {} expenses to {}", count, path);
			}
		},
	}

	Ok(())
}

/// Edits a day's expenses from the command line, then shows the tree with
/// the new totals. When the save fails the tree is shown as it was before.
fn set_day<T: Transport>(
	api: &ExpenseApi<T>,
	args: &Cli,
	today: Date,
) -> Result<(), Error> {
	let key = args.key()?;

	let edit = DayEdit {
		items: args
			.expenses
			.iter()
			.map(|item| parse_item(item))
			.collect::<Result<Vec<_>, _>>()?,
		keep: args.keep,
		remove: args.remove.clone(),
		rename: args.rename.clone(),
	};

	let now = Utc::now().timestamp_millis();
	let (tree, saved) = save_day_edit(api, today, &key, &edit, now)?;
	match saved {
		Saved::Yes(result) => {
			println!("{}\n", saved_summary(&result));
			TreeReporter::new(&tree).print();
			Ok(())
		},
		Saved::No => {
			TreeReporter::new(&tree).print();
			bail!("Expenses for {} were not saved", key)
		},
	}
}

fn print_header(today: &Date) {
	println!(
		"{:<20}{:>10}",
		today.weekday_name(),
		format_time(&Local::now().time())
	);
	println!("{}", format_long_date(today));
}

fn init_logging(verbosity: u8) {
	let default_level = match verbosity {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}
