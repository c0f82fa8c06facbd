//! External generator command
//!
//! The configured program receives one JSON object on stdin and writes the
//! motivational text to stdout. A non-zero exit status is a failure. The child
//! is killed if the request is dropped, which is what happens on timeout.

use std::process::Stdio;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{
    system_prompt, user_prompt, BoxFuture, GenerationError, IntensityBand, MotivationRequest,
    MotivationSource, UrgeContext,
};
use crate::i18n::Language;

/// JSON written to the generator's stdin
#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    language: Language,
    system: String,
    prompt: &'static str,
    goal: &'a str,
    elapsed: &'a str,
    intensity: u8,
    band: IntensityBand,
    context: UrgeContext,
}

impl<'a> From<&'a MotivationRequest> for WireRequest<'a> {
    fn from(request: &'a MotivationRequest) -> Self {
        Self {
            language: request.language,
            system: system_prompt(request),
            prompt: user_prompt(request.language),
            goal: &request.goal_label,
            elapsed: &request.elapsed_text,
            intensity: request.urge_intensity,
            band: request.band,
            context: request.context,
        }
    }
}

/// Generator backed by a local command
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    /// Build from `[program, args...]`. Returns None for an empty command.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    async fn run(&self, request: &MotivationRequest) -> Result<String, GenerationError> {
        let payload = serde_json::to_vec(&WireRequest::from(request))
            .map_err(|e| GenerationError::Protocol(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GenerationError::Spawn(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload).await {
                Ok(()) => {}
                // The generator may answer without reading the request
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!(program = %self.program, "Generator closed stdin early");
                }
                Err(e) => {
                    return Err(GenerationError::Protocol(format!("writing request: {}", e)))
                }
            }
            // Closing stdin signals the end of the request
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| GenerationError::Failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenerationError::Failed(format!(
                "{} ({})",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| GenerationError::Protocol(format!("stdout is not UTF-8: {}", e)))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        debug!(program = %self.program, len = text.len(), "Generator answered");
        Ok(text.to_string())
    }
}

impl MotivationSource for CommandSource {
    fn generate<'a>(
        &'a self,
        request: &'a MotivationRequest,
    ) -> BoxFuture<'a, Result<String, GenerationError>> {
        Box::pin(self.run(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motivation::test_support::sample_request;
    use crate::motivation::{Motivation, MotivationRequester};
    use std::sync::Arc;
    use std::time::Duration;

    fn sh(script: &str) -> CommandSource {
        CommandSource::from_command(&["sh".to_string(), "-c".to_string(), script.to_string()])
            .unwrap()
    }

    #[test]
    fn test_from_command() {
        assert!(CommandSource::from_command(&[]).is_none());
        assert!(CommandSource::from_command(&[" ".to_string()]).is_none());

        let source =
            CommandSource::from_command(&["motivate".to_string(), "--short".to_string()]).unwrap();
        assert_eq!(source.program, "motivate");
        assert_eq!(source.args, vec!["--short".to_string()]);
    }

    #[test]
    fn test_wire_request_shape() {
        let request = sample_request(9);
        let json = serde_json::to_value(WireRequest::from(&request)).unwrap();

        assert_eq!(json["language"], "en");
        assert_eq!(json["goal"], "Vespa");
        assert_eq!(json["intensity"], 9);
        assert_eq!(json["band"], "high");
        assert_eq!(json["context"], "neutral");
        assert!(json["system"].as_str().unwrap().contains("Vespa"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_the_text() {
        let source = sh("cat > /dev/null; echo 'Ten minutes is nothing.'");
        let text = source.generate(&sample_request(4)).await.unwrap();
        assert_eq!(text, "Ten minutes is nothing.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_generator_ignoring_stdin_still_answers() {
        let request = MotivationRequest {
            goal_label: "x".repeat(256 * 1024),
            ..sample_request(4)
        };
        let source = sh("echo 'Breathe out slowly.'");
        let text = source.generate(&request).await.unwrap();
        assert_eq!(text, "Breathe out slowly.");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_request_reaches_stdin() {
        let source = sh("grep -o '\"goal\":\"Vespa\"'");
        let text = source.generate(&sample_request(4)).await.unwrap();
        assert_eq!(text, "\"goal\":\"Vespa\"");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let source = sh("cat > /dev/null; echo quota >&2; exit 3");
        let err = source.generate(&sample_request(4)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Failed(msg) if msg.contains("quota")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_is_empty_response() {
        let source = sh("cat > /dev/null");
        let err = source.generate(&sample_request(4)).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let source =
            CommandSource::from_command(&["respira-no-such-generator".to_string()]).unwrap();
        let err = source.generate(&sample_request(4)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Spawn(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_command_times_out_to_fallback() {
        let requester = MotivationRequester::new(
            Some(Arc::new(sh("sleep 5; echo late"))),
            Duration::from_millis(100),
        );
        let motivation = requester.request(&sample_request(8)).await;
        assert!(matches!(motivation, Motivation::Fallback(_)));
    }
}
