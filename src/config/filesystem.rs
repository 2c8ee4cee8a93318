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
use crate::config::config_file::Config;
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use std::fs;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Command;

pub struct Filesystem {
	default_config: Option<PathBuf>,
}

impl Filesystem {
	pub fn new() -> Self {
		Self {
			default_config: home_dir()
				.map(|home| home.join(".config/spendr/config.toml")),
		}
	}

	/// Destination for exports: the given file, created or truncated, or
	/// stdout when none is given.
	pub fn output(&self, path: Option<&String>) -> Result<Box<dyn Write>, Error> {
		match path {
			Some(p) => {
				let file = File::create(p)
					.map_err(|e| anyhow!("cannot write {}: {}", p, e))?;
				Ok(Box::new(file))
			},
			None => Ok(Box::new(io::stdout())),
		}
	}

	/// Fetches the config from the given path, or default path if none.
	/// The boolean argument indicates whether the browser id command, if
	/// any, should be run to fill in the browser id.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
		expand_auth: bool,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => match &self.default_config {
				Some(p) => p.clone(),
				None => bail!("Unable to determine home directory"),
			},
			Some(p) => PathBuf::from(p),
		};

		// create empty config file if it doesn't exist
		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
		}

		let content = fs::read_to_string(&config_path).map_err(|e| {
			anyhow!("failed to read config {}: {}", config_path.display(), e)
		})?;
		let mut config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		if !expand_auth {
			return Ok(config);
		}

		// Execute browser_id_cmd if applicable, and put result in browser_id
		if let Some(server) = &mut config.server {
			if server.browser_id_cmd.is_some() && server.browser_id.is_some() {
				bail!("Only one of server.browser_id and server.browser_id_cmd may be specified")
			}

			if let Some(cmd) = &server.browser_id_cmd {
				server.browser_id = Some(run_secret_cmd(cmd)?);
			}
		}

		Ok(config)
	}
}

fn run_secret_cmd(cmd: &str) -> Result<String, Error> {
	let output = Command::new("sh")
		.arg("-c")
		.arg(cmd)
		.output()
		.map_err(|e| anyhow!("failed to execute browser_id_cmd: {}", e))?;

	if !output.status.success() {
		bail!(
			"browser_id_cmd failed with status {}: {}",
			output.status,
			String::from_utf8_lossy(&output.stderr)
		);
	}

	Ok(String::from_utf8(output.stdout)
		.map_err(|e| anyhow!("failed to parse command output: {}", e))?
		.trim()
		.to_string())
}
