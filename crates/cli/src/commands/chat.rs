//! Chat command handler.
//!
//! The interactive question loop: pick a search mode, ask, read the answer.

use clap::Args;
use driverag_core::{config::AppConfig, AppError, AppResult};
use driverag_knowledge::{Answerer, CredentialStore, RagPipeline, SearchMode};
use std::io::{BufRead, Write};
use std::sync::Arc;

const EXIT_COMMAND: &str = "exit";

/// Chat with your documents (default command)
#[derive(Args, Debug, Default)]
pub struct ChatCommand {}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let store = CredentialStore::new(&config.drive, super::http_client(config)?);

        // Nothing works without storage access, so authorize up front.
        store.get_valid_credentials().await?;

        let pipeline = RagPipeline::from_config(config, Arc::new(store))?;

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        run_chat(Arc::new(pipeline), stdin.lock(), stdout.lock()).await
    }
}

/// Run the loop until `exit` or end of input.
///
/// Each answer runs in its own task, so a panic inside one turn is
/// reported and the loop carries on.
pub async fn run_chat<R: BufRead, W: Write>(
    answerer: Arc<dyn Answerer>,
    mut input: R,
    mut output: W,
) -> AppResult<()> {
    writeln!(output, "RAG chat - flexible search")?;
    writeln!(output, "Search types: drive, web, all")?;
    writeln!(output, "Type '{}' to quit", EXIT_COMMAND)?;

    loop {
        write!(output, "\nSearch type (drive/web/all): ")?;
        output.flush()?;

        let Some(token) = read_line(&mut input)? else {
            break;
        };
        if is_exit(&token) {
            break;
        }
        let Some(mode) = SearchMode::parse(&token) else {
            writeln!(output, "Invalid search type. Use 'drive', 'web' or 'all'")?;
            continue;
        };

        let Some(question) = read_question(&mut input, &mut output)? else {
            break;
        };
        if is_exit(&question) {
            break;
        }

        writeln!(output, "\nSearching...")?;
        output.flush()?;

        let turn = Arc::clone(&answerer);
        match tokio::spawn(async move { turn.answer(&question, mode).await }).await {
            Ok(response) => writeln!(output, "\nRAG answer: {}", response)?,
            Err(e) => {
                let err = AppError::Other(format!("answer task failed: {}", e));
                tracing::error!("{}", err);
                writeln!(output, "\nAn error occurred: {}", err)?;
            }
        }
    }

    tracing::info!("Chat ended");
    Ok(())
}

/// Prompt until a non-blank question arrives. `None` at end of input.
fn read_question<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> AppResult<Option<String>> {
    loop {
        write!(output, "Your question: ")?;
        output.flush()?;

        match read_line(input)? {
            None => return Ok(None),
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => return Ok(Some(line.trim().to_string())),
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> AppResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_COMMAND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Mutex;

    const BANNER: &str =
        "RAG chat - flexible search\nSearch types: drive, web, all\nType 'exit' to quit\n";
    const MODE_PROMPT: &str = "\nSearch type (drive/web/all): ";

    #[derive(Default)]
    struct RecordingAnswerer {
        calls: Mutex<Vec<(String, SearchMode)>>,
    }

    impl RecordingAnswerer {
        fn calls(&self) -> Vec<(String, SearchMode)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Answerer for RecordingAnswerer {
        async fn answer(&self, question: &str, mode: SearchMode) -> String {
            self.calls.lock().unwrap().push((question.to_string(), mode));
            format!("answer to {}", question)
        }
    }

    async fn chat(script: &str) -> (String, Vec<(String, SearchMode)>) {
        let answerer = Arc::new(RecordingAnswerer::default());
        let mut output = Vec::new();
        run_chat(answerer.clone(), Cursor::new(script.as_bytes()), &mut output)
            .await
            .unwrap();
        (String::from_utf8(output).unwrap(), answerer.calls())
    }

    #[tokio::test]
    async fn test_exit_as_mode_stops_immediately() {
        let (output, calls) = chat("exit\ndrive\nnever asked\n").await;
        assert_eq!(output, format!("{}{}", BANNER, MODE_PROMPT));
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn test_one_question_round_trip() {
        let (output, calls) = chat("Drive\nbudget report\nexit\n").await;

        assert_eq!(calls, vec![("budget report".to_string(), SearchMode::Drive)]);
        assert!(output.contains("Your question: \nSearching...\n\nRAG answer: answer to budget report\n"));
        assert!(output.ends_with(MODE_PROMPT));
    }

    #[tokio::test]
    async fn test_invalid_mode_reprompts() {
        let (output, calls) = chat("google\n  WEB \nrust\nexit\n").await;

        assert!(output.contains("Invalid search type. Use 'drive', 'web' or 'all'\n"));
        assert_eq!(output.matches(MODE_PROMPT).count(), 3);
        assert_eq!(calls, vec![("rust".to_string(), SearchMode::Web)]);
    }

    #[tokio::test]
    async fn test_exit_as_question_stops() {
        let (output, calls) = chat("all\nEXIT\ndrive\nx\n").await;
        assert!(calls.is_empty());
        assert!(output.ends_with("Your question: "));
    }

    #[tokio::test]
    async fn test_blank_question_is_asked_again() {
        let (output, calls) = chat("drive\n\n   \nnotes\n").await;
        assert_eq!(output.matches("Your question: ").count(), 3);
        assert_eq!(calls, vec![("notes".to_string(), SearchMode::Drive)]);
    }

    #[tokio::test]
    async fn test_end_of_input_ends_loop() {
        let (_, calls) = chat("web\n").await;
        assert!(calls.is_empty());

        let (output, _) = chat("").await;
        assert_eq!(output, format!("{}{}", BANNER, MODE_PROMPT));
    }

    #[test]
    fn test_is_exit() {
        assert!(is_exit("exit\n"));
        assert!(is_exit("  Exit "));
        assert!(!is_exit("exits"));
    }

    struct PanickyAnswerer;

    #[async_trait::async_trait]
    impl Answerer for PanickyAnswerer {
        async fn answer(&self, question: &str, _mode: SearchMode) -> String {
            if question == "boom" {
                panic!("extractor blew up");
            }
            format!("fine: {}", question)
        }
    }

    #[tokio::test]
    async fn test_panicking_turn_is_reported_and_loop_continues() {
        let mut output = Vec::new();
        run_chat(
            Arc::new(PanickyAnswerer),
            Cursor::new("drive\nboom\nweb\nstill here\nexit\n".as_bytes()),
            &mut output,
        )
        .await
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("\nAn error occurred: answer task failed: "));
        assert!(output.contains("\nRAG answer: fine: still here\n"));
        assert!(output.ends_with(MODE_PROMPT));
    }
}
