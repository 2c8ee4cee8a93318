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
use crate::remote::http::{Endpoints, DEFAULT_RETRIES};
use anyhow::{bail, Error};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub server: Option<Server>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Server {
	/// Where the expense routes live, without the trailing `/expenses`
	pub base_url: Option<String>,
	/// Alternate host tried when the base URL cannot be reached, e.g. the
	/// server's address on the home network.
	pub fallback_url: Option<String>,
	pub retries: Option<u32>,

	pub browser_id: Option<String>,
	pub browser_id_cmd: Option<String>,

	/// Page that registers this browser id with the server
	pub auth_url: Option<String>,
}

impl Config {
	/// Resolves the server section into request endpoints. Fails when no
	/// base URL is configured, since nothing can be fetched without one.
	pub fn endpoints(&self) -> Result<Endpoints, Error> {
		let Some(server) = &self.server else {
			bail!("no [server] section in config");
		};

		let Some(base_url) = &server.base_url else {
			bail!("no server.base_url in config");
		};

		Ok(Endpoints {
			base_url: base_url.trim_end_matches('/').to_string(),
			fallback_url: server
				.fallback_url
				.as_ref()
				.map(|u| u.trim_end_matches('/').to_string()),
			retries: server.retries.unwrap_or(DEFAULT_RETRIES),
			identified: server.browser_id.is_some(),
			auth_url: server.auth_url.clone(),
		})
	}

	pub fn browser_id(&self) -> Option<String> {
		self.server.as_ref().and_then(|s| s.browser_id.clone())
	}
}
