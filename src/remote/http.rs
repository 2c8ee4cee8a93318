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
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use tracing::{debug, error, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Method::Get => write!(f, "GET"),
			Method::Post => write!(f, "POST"),
		}
	}
}

#[derive(Clone, Debug)]
pub struct Request {
	pub method: Method,
	pub url: String,
	/// Query parameters, encoded by the transport
	pub query: Vec<(String, String)>,
	/// JSON body, POST only
	pub body: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Reply {
	pub status: u16,
	pub body: String,
}

/// Moves one request over the wire. Errors are for transport failures only;
/// HTTP error statuses come back as a `Reply`.
pub trait Transport {
	fn send(&self, request: &Request) -> Result<Reply, Error>;
}

/// The real transport: a blocking reqwest client that stamps every request
/// with the browser identity, if one is configured.
pub struct HttpTransport {
	client: reqwest::blocking::Client,
	browser_id: Option<String>,
}

impl HttpTransport {
	pub fn new(browser_id: Option<String>) -> Self {
		HttpTransport {
			client: reqwest::blocking::Client::new(),
			browser_id,
		}
	}
}

impl Transport for HttpTransport {
	fn send(&self, request: &Request) -> Result<Reply, Error> {
		let method = match request.method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
		};

		let mut builder = self.client.request(method, &request.url);

		if !request.query.is_empty() {
			builder = builder.query(&request.query);
		}

		if let Some(id) = &self.browser_id {
			builder = builder.header("X-Browser-ID", id);
		}

		if let Some(body) = &request.body {
			builder = builder
				.header("Content-Type", "application/json")
				.body(body.clone());
		}

		let response = builder.send()?;
		let status = response.status().as_u16();
		let body = response.text()?;

		Ok(Reply { status, body })
	}
}

/// Where the expense server lives and how hard to try reaching it.
#[derive(Clone, Debug)]
pub struct Endpoints {
	pub base_url: String,
	pub fallback_url: Option<String>,
	/// How many times, over the whole session, a failed read may be retried
	/// against the fallback host.
	pub retries: u32,
	/// Whether requests carry a browser identity
	pub identified: bool,
	/// Page that registers a browser identity with the server
	pub auth_url: Option<String>,
}

pub const DEFAULT_RETRIES: u32 = 2;

enum Failure {
	/// Server or client says the browser identity is missing or rejected
	Unauthorized(String),
	Other(Error),
}

/// Expense server client. Reads never fail from the caller's point of view:
/// a read that cannot be completed yields the empty value of its type.
///
/// After a failed read the client switches to the fallback host, if any, and
/// stays there. Every switch spends one unit of the retry budget.
pub struct Client<T: Transport> {
	transport: T,
	endpoints: Endpoints,
	on_fallback: Cell<bool>,
	retries_left: Cell<u32>,
}

impl<T: Transport> Client<T> {
	pub fn new(transport: T, endpoints: Endpoints) -> Self {
		let retries = endpoints.retries;
		Client {
			transport,
			endpoints,
			on_fallback: Cell::new(false),
			retries_left: Cell::new(retries),
		}
	}

	#[cfg(test)]
	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Base URL requests currently go to.
	pub fn active_base(&self) -> &str {
		match (&self.endpoints.fallback_url, self.on_fallback.get()) {
			(Some(fallback), true) => fallback,
			_ => &self.endpoints.base_url,
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}/expenses{}", self.active_base().trim_end_matches('/'), path)
	}

	/// GETs `{base}/expenses{path}` and decodes the JSON reply.
	pub fn fetch<R>(&self, path: &str) -> R
	where
		R: DeserializeOwned + Default,
	{
		self.fetch_with(path, &[])
	}

	/// Like `fetch`, with query parameters appended to the URL.
	pub fn fetch_with<R>(&self, path: &str, query: &[(&str, &str)]) -> R
	where
		R: DeserializeOwned + Default,
	{
		let query: Vec<(String, String)> = query
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();

		loop {
			let request = Request {
				method: Method::Get,
				url: self.url(path),
				query: query.clone(),
				body: None,
			};

			match self.exchange(&request) {
				Ok(data) => return data,
				Err(Failure::Unauthorized(reason)) => {
					self.report_unauthorized(&request, &reason);
					return R::default();
				},
				Err(Failure::Other(e)) => {
					warn!("GET {} failed: {:#}", request.url, e);
					if !self.switch_to_fallback() {
						return R::default();
					}
				},
			}
		}
	}

	/// POSTs `body` as JSON to `{base}/expenses{path}`. Never retried; `None`
	/// means the outcome is unknown and callers should assume nothing
	/// changed.
	pub fn post<B, R>(&self, path: &str, body: &B) -> Option<R>
	where
		B: Serialize,
		R: DeserializeOwned,
	{
		let body = match serde_json::to_string(body) {
			Ok(b) => b,
			Err(e) => {
				error!("failed to encode request body: {}", e);
				return None;
			},
		};

		let request = Request {
			method: Method::Post,
			url: self.url(path),
			query: vec![],
			body: Some(body),
		};

		match self.exchange(&request) {
			Ok(data) => Some(data),
			Err(Failure::Unauthorized(reason)) => {
				self.report_unauthorized(&request, &reason);
				None
			},
			Err(Failure::Other(e)) => {
				warn!("POST {} failed: {:#}", request.url, e);
				None
			},
		}
	}

	fn exchange<R: DeserializeOwned>(
		&self,
		request: &Request,
	) -> Result<R, Failure> {
		if request.url.starts_with("https") && !self.endpoints.identified {
			return Err(Failure::Unauthorized(
				"no browser id configured".to_string(),
			));
		}

		debug!("Sending {} to {}", request.method, request.url);
		let reply = self.transport.send(request).map_err(Failure::Other)?;

		if reply.status == 400 || reply.status == 401 {
			return Err(Failure::Unauthorized(format!(
				"server answered {}",
				reply.status
			)));
		}

		decode(&reply).map_err(Failure::Other)
	}

	/// Moves to the fallback host if one exists and budget remains.
	fn switch_to_fallback(&self) -> bool {
		if self.endpoints.fallback_url.is_none() {
			return false;
		}

		let left = self.retries_left.get();
		if left == 0 {
			return false;
		}
		self.retries_left.set(left - 1);

		if !self.on_fallback.get() {
			warn!(
				"switching to fallback host {}",
				self.endpoints.fallback_url.as_deref().unwrap_or_default()
			);
			self.on_fallback.set(true);
		}
		true
	}

	fn report_unauthorized(&self, request: &Request, reason: &str) {
		match &self.endpoints.auth_url {
			Some(url) => error!(
				"{} {} needs a registered browser id ({}); register at {}",
				request.method, request.url, reason, url
			),
			None => error!(
				"{} {} needs a registered browser id ({})",
				request.method, request.url, reason
			),
		}
	}
}

fn decode<R: DeserializeOwned>(reply: &Reply) -> Result<R, Error> {
	if !(200..300).contains(&reply.status) {
		bail!("Request failed with status: {}", reply.status);
	}

	Ok(serde_json::from_str(&reply.body)?)
}

#[cfg(test)]
pub mod fake {
	use super::*;
	use std::cell::RefCell;
	use std::collections::VecDeque;

	/// Scripted transport: answers requests from a queue and remembers what
	/// it was asked. An exhausted queue behaves like an unreachable host.
	#[derive(Default)]
	pub struct FakeTransport {
		replies: RefCell<VecDeque<Result<Reply, String>>>,
		pub seen: RefCell<Vec<Request>>,
	}

	impl FakeTransport {
		pub fn new() -> Self {
			Self::default()
		}

		pub fn reply(self, status: u16, body: &str) -> Self {
			self.replies.borrow_mut().push_back(Ok(Reply {
				status,
				body: body.to_string(),
			}));
			self
		}

		pub fn refuse(self) -> Self {
			self.replies
				.borrow_mut()
				.push_back(Err("connection refused".to_string()));
			self
		}

		/// Requested URLs with their query strings as they go on the wire.
		pub fn urls(&self) -> Vec<String> {
			self.seen
				.borrow()
				.iter()
				.map(|r| {
					if r.query.is_empty() {
						return r.url.clone();
					}
					reqwest::Url::parse_with_params(&r.url, &r.query)
						.map(|u| u.to_string())
						.unwrap_or_else(|e| format!("{} ({})", r.url, e))
				})
				.collect()
		}
	}

	impl Transport for FakeTransport {
		fn send(&self, request: &Request) -> Result<Reply, Error> {
			self.seen.borrow_mut().push(request.clone());
			match self.replies.borrow_mut().pop_front() {
				Some(Ok(reply)) => Ok(reply),
				Some(Err(e)) => bail!(e),
				None => bail!("connection refused"),
			}
		}
	}

	pub fn endpoints(fallback: Option<&str>) -> Endpoints {
		Endpoints {
			base_url: "http://primary".to_string(),
			fallback_url: fallback.map(str::to_string),
			retries: DEFAULT_RETRIES,
			identified: false,
			auth_url: None,
		}
	}
}
