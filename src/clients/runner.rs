use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the code execution runner service.
///
/// Client-supplied code is never evaluated in this process; it is shipped to
/// the runner over HTTP with a hard request timeout, and the captured output
/// is capped before it goes any further.
#[derive(Debug, Clone)]
pub struct RunnerClient {
    client: Client,
    base_url: String,
    max_output: usize,
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    code: &'a str,
}

/// Outcome reported by the runner service.
#[derive(Debug, Deserialize)]
pub struct RunOutcome {
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl RunnerClient {
    pub fn new(base_url: String, timeout: Duration, max_output: usize) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            max_output,
        }
    }

    /// Execute a snippet on the runner service.
    pub async fn execute(&self, code: &str) -> Result<RunOutcome, reqwest::Error> {
        let url = format!("{}/execute", self.base_url);
        let mut outcome: RunOutcome = self
            .client
            .post(&url)
            .json(&RunRequest { code })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        truncate_output(&mut outcome.output, self.max_output);
        Ok(outcome)
    }
}

/// Cap `output` at `max` bytes without splitting a UTF-8 sequence.
fn truncate_output(output: &mut String, max: usize) {
    if output.len() <= max {
        return;
    }
    let mut end = max;
    while !output.is_char_boundary(end) {
        end -= 1;
    }
    output.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::truncate_output;

    #[test]
    fn short_output_is_untouched() {
        let mut s = "hello".to_string();
        truncate_output(&mut s, 10);
        assert_eq!(s, "hello");
    }

    #[test]
    fn long_output_is_capped() {
        let mut s = "x".repeat(32);
        truncate_output(&mut s, 8);
        assert_eq!(s.len(), 8);
    }

    #[test]
    fn truncation_respects_utf8_boundaries() {
        // Each 'é' is two bytes; a cap of 3 falls inside the second one.
        let mut s = "éé".to_string();
        truncate_output(&mut s, 3);
        assert_eq!(s, "é");
    }
}
