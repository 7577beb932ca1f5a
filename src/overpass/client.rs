use tracing::{debug, info, warn};

use super::OverpassClient;
use crate::error::{QueryError, Result};

// ureq caps bodies at 10 MiB unless told otherwise.
const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

impl OverpassClient {
    /// Posts `query` to the interpreter and returns the response body.
    ///
    /// A 429 is retried after `retry_delay` until `max_attempts` is used up.
    /// Any other non-200 status, or an HTML error page served with 200,
    /// comes back as [`QueryError::Api`].
    pub fn send_overpass_query_string(&self, query: &str) -> Result<String> {
        if query.trim().is_empty() {
            return Err(QueryError::Config("empty query".into()));
        }

        let mut attempts = 0;
        loop {
            attempts += 1;
            debug!("POST {} (attempt {})", self.url, attempts);
            let mut response = self
                .agent
                .post(&self.url)
                .header("User-Agent", &self.user_agent)
                .header("Content-Type", "text/plain; charset=utf-8")
                .send(query)?;

            let status = response.status().as_u16();
            match status {
                200 => {
                    let body = response
                        .body_mut()
                        .with_config()
                        .limit(MAX_BODY_BYTES)
                        .read_to_string()?;
                    if body.trim_start().starts_with('<') {
                        return Err(QueryError::Api {
                            status,
                            message: error_message(&body),
                        });
                    }
                    info!("Got {} bytes from {}", body.len(), self.url);
                    return Ok(body);
                }
                429 if attempts < self.max_attempts => {
                    warn!(
                        "Rate limited, waiting {} seconds",
                        self.retry_delay.as_secs()
                    );
                    std::thread::sleep(self.retry_delay);
                }
                429 => return Err(QueryError::RateLimited(attempts)),
                _ => {
                    let message = match response.body_mut().read_to_string() {
                        Ok(body) => error_message(&body),
                        Err(e) => format!("could not read error body: {e}"),
                    };
                    return Err(QueryError::Api { status, message });
                }
            }
        }
    }
}

/// Pulls a readable message out of an Overpass error page.
///
/// The interpreter reports problems as HTML with lines such as
/// `<p><strong style="color:#FF0000">Error</strong>: line 3: parse error: ...</p>`.
pub fn error_message(body: &str) -> String {
    let text = strip_tags(body);
    let errors: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("Error") || line.contains("runtime error"))
        .collect();

    if !errors.is_empty() {
        return errors.join("; ");
    }

    let fallback: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if fallback.is_empty() {
        "empty response".to_string()
    } else {
        fallback.chars().take(200).collect()
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
