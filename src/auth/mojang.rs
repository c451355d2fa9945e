use crate::auth::status::{self, ServiceStatus};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

const AUTH_BASE_URL: &str = "https://authserver.mojang.com";
const STATUS_URL: &str = "https://status.mojang.com/check";

const AGENT_NAME: &str = "Minecraft";
const AGENT_VERSION: u32 = 1;

pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("Rejected with status {status}: {}", .body.as_ref().map(|b| b.error.as_str()).unwrap_or("ENOTFOUND"))]
	Rejected {
		status: StatusCode,
		body: Option<ApiError>,
	},
}

/// Error payload the auth server attaches to non-success statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
	pub error: String,
	#[serde(default)]
	pub error_message: Option<String>,
	#[serde(default)]
	pub cause: Option<String>,
}

#[derive(Debug, Serialize)]
struct Agent {
	name: &'static str,
	version: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticatePayload<'a> {
	agent: Agent,
	username: &'a str,
	password: &'a str,
	client_token: &'a str,
	request_user: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload<'a> {
	access_token: &'a str,
	client_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshPayload<'a> {
	access_token: &'a str,
	client_token: &'a str,
	request_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
	pub id: String,
	pub name: String,
}

/// Successful authenticate/refresh response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
	pub access_token: String,
	pub client_token: String,
	#[serde(default)]
	pub selected_profile: Option<Profile>,
	#[serde(default)]
	pub available_profiles: Option<Vec<Profile>>,
	/// Present when the call asked for it; shape tracks the remote service.
	#[serde(default)]
	pub user: Option<serde_json::Value>,
}

/// Minimal wrapper over the Mojang REST API. Every call is a single
/// one-shot request with no retry; the only state is the last known
/// service-status table.
pub struct MojangClient {
	http: Client,
	auth_base: String,
	status_url: String,
	statuses: Mutex<Vec<ServiceStatus>>,
}

impl MojangClient {
	pub fn new() -> AuthResult<Self> {
		Self::with_endpoints(AUTH_BASE_URL, STATUS_URL)
	}

	/// Endpoints are injectable so tests can stand in a local server.
	pub fn with_endpoints(
		auth_base: impl Into<String>,
		status_url: impl Into<String>,
	) -> AuthResult<Self> {
		Ok(Self {
			http: Client::builder().build()?,
			auth_base: auth_base.into(),
			status_url: status_url.into(),
			statuses: Mutex::new(status::initial_statuses()),
		})
	}

	/// Log a user in with their username (usually an email) and password.
	/// The client token must be the launcher's stable token so the issued
	/// access token can later be validated and refreshed against it.
	pub async fn authenticate(
		&self,
		username: &str,
		password: &str,
		client_token: &str,
		request_user: bool,
	) -> AuthResult<AuthSession> {
		let payload = AuthenticatePayload {
			agent: Agent {
				name: AGENT_NAME,
				version: AGENT_VERSION,
			},
			username,
			password,
			client_token,
			request_user,
		};
		let response = self
			.http
			.post(format!("{}/authenticate", self.auth_base))
			.json(&payload)
			.send()
			.await?;
		match response.status() {
			StatusCode::OK => Ok(response.json().await?),
			_ => Err(Self::rejected(response).await),
		}
	}

	/// Check whether an access token is still usable. 403 means stale;
	/// any other response counts as valid (the server answers 204 on
	/// success).
	pub async fn validate(&self, access_token: &str, client_token: &str) -> AuthResult<bool> {
		let payload = TokenPayload {
			access_token,
			client_token,
		};
		let response = self
			.http
			.post(format!("{}/validate", self.auth_base))
			.json(&payload)
			.send()
			.await?;
		Ok(response.status() != StatusCode::FORBIDDEN)
	}

	pub async fn invalidate(&self, access_token: &str, client_token: &str) -> AuthResult<()> {
		let payload = TokenPayload {
			access_token,
			client_token,
		};
		let response = self
			.http
			.post(format!("{}/invalidate", self.auth_base))
			.json(&payload)
			.send()
			.await?;
		match response.status() {
			StatusCode::NO_CONTENT => Ok(()),
			_ => Err(Self::rejected(response).await),
		}
	}

	/// Trade a possibly stale access token for a fresh one without
	/// prompting for credentials again.
	pub async fn refresh(
		&self,
		access_token: &str,
		client_token: &str,
		request_user: bool,
	) -> AuthResult<AuthSession> {
		let payload = RefreshPayload {
			access_token,
			client_token,
			request_user,
		};
		let response = self
			.http
			.post(format!("{}/refresh", self.auth_base))
			.json(&payload)
			.send()
			.await?;
		match response.status() {
			StatusCode::OK => Ok(response.json().await?),
			_ => Err(Self::rejected(response).await),
		}
	}

	/// Poll the status endpoint and fold the answer into the last known
	/// service table. Services the remote does not mention keep their
	/// previous status; services we do not track are ignored.
	pub async fn status(&self) -> AuthResult<Vec<ServiceStatus>> {
		let response = self.http.get(&self.status_url).send().await?;
		let http_status = response.status();
		if http_status != StatusCode::OK {
			warn!("Unable to retrieve service status: {http_status}");
			return Err(AuthError::Rejected {
				status: http_status,
				body: None,
			});
		}
		let entries: Vec<HashMap<String, String>> = response.json().await?;

		let mut statuses = self.statuses.lock().unwrap();
		for entry in &entries {
			for (service, value) in entry {
				if let Some(known) = statuses.iter_mut().find(|s| s.service == *service) {
					known.status = value.clone();
				}
			}
		}
		Ok(statuses.clone())
	}

	async fn rejected(response: Response) -> AuthError {
		let status = response.status();
		let body = response.json::<ApiError>().await.ok();
		AuthError::Rejected { status, body }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};
	use tokio::net::TcpListener;

	struct Route {
		path: &'static str,
		status: u16,
		body: &'static str,
	}

	fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
		haystack.windows(needle.len()).position(|w| w == needle)
	}

	async fn start_test_server(routes: Vec<Route>) -> (String, tokio::task::JoinHandle<()>) {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let url = format!("http://{}", addr);

		let handle = tokio::spawn(async move {
			loop {
				let (mut socket, _) = listener.accept().await.unwrap();

				// Read the full request (headers + declared body) before
				// answering, otherwise the client may see a reset.
				let mut buf = Vec::new();
				let mut chunk = [0u8; 1024];
				loop {
					let n = socket.read(&mut chunk).await.unwrap();
					if n == 0 {
						break;
					}
					buf.extend_from_slice(&chunk[..n]);
					if let Some(header_end) = find_subslice(&buf, b"\r\n\r\n") {
						let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
						let content_length = headers
							.lines()
							.find_map(|l| l.strip_prefix("content-length:"))
							.and_then(|v| v.trim().parse::<usize>().ok())
							.unwrap_or(0);
						if buf.len() >= header_end + 4 + content_length {
							break;
						}
					}
				}

				let request_line = String::from_utf8_lossy(&buf);
				let path = request_line
					.split_whitespace()
					.nth(1)
					.unwrap_or("/")
					.to_string();

				let (status, body) = routes
					.iter()
					.find(|r| r.path == path)
					.map(|r| (r.status, r.body))
					.unwrap_or((404, "{}"));
				let reason = match status {
					200 => "OK",
					204 => "No Content",
					403 => "Forbidden",
					_ => "Error",
				};
				let response = if status == 204 {
					format!("HTTP/1.1 204 {}\r\nContent-Length: 0\r\n\r\n", reason)
				} else {
					format!(
						"HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
						status,
						reason,
						body.len(),
						body
					)
				};
				socket.write_all(response.as_bytes()).await.unwrap();
			}
		});

		(url, handle)
	}

	fn client_for(url: &str) -> MojangClient {
		MojangClient::with_endpoints(url.to_string(), format!("{}/check", url)).unwrap()
	}

	#[tokio::test]
	async fn authenticate_parses_the_session() {
		let (url, server) = start_test_server(vec![Route {
			path: "/authenticate",
			status: 200,
			body: r#"{
				"accessToken": "abc",
				"clientToken": "ct",
				"selectedProfile": { "id": "u1", "name": "Player" },
				"availableProfiles": [{ "id": "u1", "name": "Player" }]
			}"#,
		}])
		.await;

		let client = client_for(&url);
		let session = client.authenticate("a@b.c", "hunter2", "ct", true).await.unwrap();
		assert_eq!(session.access_token, "abc");
		assert_eq!(session.client_token, "ct");
		assert_eq!(session.selected_profile.unwrap().name, "Player");
		assert!(session.user.is_none());

		server.abort();
	}

	#[tokio::test]
	async fn authenticate_rejection_carries_the_body() {
		let (url, server) = start_test_server(vec![Route {
			path: "/authenticate",
			status: 403,
			body: r#"{ "error": "ForbiddenOperationException", "errorMessage": "Invalid credentials." }"#,
		}])
		.await;

		let client = client_for(&url);
		let err = client
			.authenticate("a@b.c", "wrong", "ct", true)
			.await
			.unwrap_err();
		match err {
			AuthError::Rejected { status, body } => {
				assert_eq!(status, StatusCode::FORBIDDEN);
				let body = body.unwrap();
				assert_eq!(body.error, "ForbiddenOperationException");
				assert_eq!(body.error_message.as_deref(), Some("Invalid credentials."));
			}
			other => panic!("expected rejection, got {:?}", other),
		}

		server.abort();
	}

	#[tokio::test]
	async fn validate_maps_status_codes_to_booleans() {
		let (url, server) = start_test_server(vec![Route {
			path: "/validate",
			status: 204,
			body: "",
		}])
		.await;
		let client = client_for(&url);
		assert!(client.validate("tok", "ct").await.unwrap());
		server.abort();

		let (url, server) = start_test_server(vec![Route {
			path: "/validate",
			status: 403,
			body: r#"{ "error": "ForbiddenOperationException" }"#,
		}])
		.await;
		let client = client_for(&url);
		assert!(!client.validate("stale", "ct").await.unwrap());
		server.abort();
	}

	#[tokio::test]
	async fn invalidate_accepts_only_no_content() {
		let (url, server) = start_test_server(vec![Route {
			path: "/invalidate",
			status: 204,
			body: "",
		}])
		.await;
		let client = client_for(&url);
		client.invalidate("tok", "ct").await.unwrap();
		server.abort();

		let (url, server) = start_test_server(vec![Route {
			path: "/invalidate",
			status: 403,
			body: r#"{ "error": "ForbiddenOperationException" }"#,
		}])
		.await;
		let client = client_for(&url);
		assert!(matches!(
			client.invalidate("tok", "ct").await,
			Err(AuthError::Rejected { .. })
		));
		server.abort();
	}

	#[tokio::test]
	async fn refresh_parses_the_new_session() {
		let (url, server) = start_test_server(vec![Route {
			path: "/refresh",
			status: 200,
			body: r#"{
				"accessToken": "fresh",
				"clientToken": "ct",
				"selectedProfile": { "id": "u1", "name": "Player" }
			}"#,
		}])
		.await;

		let client = client_for(&url);
		let session = client.refresh("old", "ct", false).await.unwrap();
		assert_eq!(session.access_token, "fresh");

		server.abort();
	}

	#[tokio::test]
	async fn status_merges_into_the_known_table() {
		let (url, server) = start_test_server(vec![Route {
			path: "/check",
			status: 200,
			body: r#"[{ "minecraft.net": "green" }, { "unknown.example": "red" }]"#,
		}])
		.await;

		let client = client_for(&url);
		let statuses = client.status().await.unwrap();

		assert_eq!(statuses.len(), 6);
		for entry in &statuses {
			if entry.service == "minecraft.net" {
				assert_eq!(entry.status, "green");
			} else {
				assert_eq!(entry.status, "grey");
			}
		}

		server.abort();
	}

	#[tokio::test]
	async fn status_rejects_on_http_failure() {
		let (url, server) = start_test_server(vec![Route {
			path: "/check",
			status: 500,
			body: "{}",
		}])
		.await;

		let client = client_for(&url);
		assert!(matches!(
			client.status().await,
			Err(AuthError::Rejected { body: None, .. })
		));

		server.abort();
	}
}
