//! OAuth 2.0 grants for an installed application.
//!
//! The consent flow opens a loopback listener on an ephemeral port, asks
//! the user to visit the consent URL, waits for the redirect carrying the
//! authorization code and exchanges it at the token endpoint.

use crate::auth::credentials::{ClientSecret, Credentials, TokenResponse};
use chrono::Utc;
use driverag_core::{AppError, AppResult};
use reqwest::Url;
use std::process::{Command, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// How long the listener waits for the browser redirect.
const CONSENT_TIMEOUT: Duration = Duration::from_secs(300);

const SUCCESS_PAGE: &str = "<html><body><h3>Authorization complete.</h3>\
<p>You can close this window and return to the terminal.</p></body></html>";

const FAILURE_PAGE: &str = "<html><body><h3>Authorization failed.</h3>\
<p>Check the terminal for details.</p></body></html>";

/// Build the consent URL the user must open.
pub fn authorization_url(
    secret: &ClientSecret,
    scopes: &[&str],
    redirect_uri: &str,
    state: &str,
) -> AppResult<Url> {
    let scope = scopes.join(" ");
    Url::parse_with_params(
        &secret.auth_uri,
        &[
            ("response_type", "code"),
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("state", state),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| AppError::Auth(format!("Invalid auth_uri '{}': {}", secret.auth_uri, e)))
}

/// Extract the authorization code from the redirect request line.
///
/// `request_line` is the first line of the HTTP request, e.g.
/// `GET /?state=...&code=... HTTP/1.1`.
pub fn parse_callback(request_line: &str, expected_state: &str) -> AppResult<String> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| AppError::Auth(format!("Malformed redirect request: {}", request_line)))?;

    let url = Url::parse("http://localhost")
        .and_then(|base| base.join(target))
        .map_err(|e| AppError::Auth(format!("Malformed redirect target '{}': {}", target, e)))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AppError::Auth(format!("Authorization denied: {}", error)));
    }

    if state.as_deref() != Some(expected_state) {
        return Err(AppError::Auth(
            "Authorization response state mismatch".to_string(),
        ));
    }

    code.ok_or_else(|| AppError::Auth("Authorization response carried no code".to_string()))
}

/// Exchange an authorization code for tokens.
pub async fn exchange_code(
    http: &reqwest::Client,
    secret: &ClientSecret,
    code: &str,
    redirect_uri: &str,
) -> AppResult<TokenResponse> {
    tracing::debug!("Exchanging authorization code at {}", secret.token_uri);

    post_token_form(
        http,
        &secret.token_uri,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
        ],
    )
    .await
}

/// Refresh an access token in place.
pub async fn refresh(http: &reqwest::Client, credentials: &mut Credentials) -> AppResult<()> {
    let refresh_token = credentials
        .refresh_token
        .clone()
        .ok_or_else(|| AppError::Auth("No refresh token available".to_string()))?;

    tracing::info!("Refreshing expired access token");

    let response = post_token_form(
        http,
        &credentials.token_uri,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ],
    )
    .await?;

    credentials.apply_token_response(response, Utc::now());
    Ok(())
}

async fn post_token_form(
    http: &reqwest::Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> AppResult<TokenResponse> {
    let response = http
        .post(token_uri)
        .form(form)
        .send()
        .await
        .map_err(|e| AppError::Auth(format!("Token request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Auth(format!(
            "Token endpoint returned {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))
}

/// Run the interactive consent flow and return fresh credentials.
pub async fn run_consent_flow(
    http: &reqwest::Client,
    secret: &ClientSecret,
    scopes: &[&str],
) -> AppResult<Credentials> {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .map_err(|e| AppError::Auth(format!("Failed to open loopback listener: {}", e)))?;
    let port = listener.local_addr()?.port();
    let redirect_uri = format!("http://localhost:{}/", port);
    let state = uuid::Uuid::new_v4().simple().to_string();

    let url = authorization_url(secret, scopes, &redirect_uri, &state)?;

    tracing::info!("Starting interactive authorization on port {}", port);
    println!("Please visit this URL to authorize access to your files:\n\n{}\n", url);
    open_browser(url.as_str());

    complete_consent(http, secret, scopes, &listener, &redirect_uri, &state).await
}

/// Wait for the redirect on `listener` and exchange its code.
async fn complete_consent(
    http: &reqwest::Client,
    secret: &ClientSecret,
    scopes: &[&str],
    listener: &TcpListener,
    redirect_uri: &str,
    state: &str,
) -> AppResult<Credentials> {
    let code = tokio::time::timeout(CONSENT_TIMEOUT, receive_code(listener, state))
        .await
        .map_err(|_| {
            AppError::Auth(format!(
                "No authorization received within {} seconds",
                CONSENT_TIMEOUT.as_secs()
            ))
        })??;

    let response = exchange_code(http, secret, &code, redirect_uri).await?;
    Ok(Credentials::from_token_response(
        secret,
        scopes,
        response,
        Utc::now(),
    ))
}

/// Try to show the consent page in the desktop browser.
///
/// Headless hosts have no opener; the printed URL still works there.
fn open_browser(url: &str) {
    let (program, args) = browser_command(url);
    match Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => tracing::debug!("Launched {} for the consent page", program),
        Err(e) => tracing::debug!("Could not launch a browser with {}: {}", program, e),
    }
}

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> (&'static str, Vec<String>) {
    ("open", vec![url.to_string()])
}

#[cfg(target_os = "windows")]
fn browser_command(url: &str) -> (&'static str, Vec<String>) {
    // The empty argument is the window title `start` expects first.
    (
        "cmd",
        vec!["/C".to_string(), "start".to_string(), String::new(), url.to_string()],
    )
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn browser_command(url: &str) -> (&'static str, Vec<String>) {
    ("xdg-open", vec![url.to_string()])
}

/// Accept redirects until one carries a usable answer.
async fn receive_code(listener: &TcpListener, state: &str) -> AppResult<String> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let (read_half, mut write_half) = stream.into_split();

        let mut reader = BufReader::new(read_half);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).await?;

        // Consume the headers so closing the socket does not reset it.
        let mut header = String::new();
        while reader.read_line(&mut header).await? > 0 && !header.trim().is_empty() {
            header.clear();
        }

        // Browsers also ask for /favicon.ico; those carry no query.
        if !request_line.contains('?') {
            tracing::debug!("Ignoring redirect-less request from {}: {}", peer, request_line.trim());
            write_half
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .ok();
            continue;
        }

        let result = parse_callback(&request_line, state);
        let page = if result.is_ok() { SUCCESS_PAGE } else { FAILURE_PAGE };
        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            page.len(),
            page
        );
        write_half.write_all(reply.as_bytes()).await.ok();
        write_half.shutdown().await.ok();

        return result;
    }
}
