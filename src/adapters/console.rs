use crate::domain::ports::Operator;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Prompts on stdout and reads the answer from stdin.
#[derive(Debug, Default)]
pub struct ConsoleOperator;

impl ConsoleOperator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Operator for ConsoleOperator {
    async fn ask(&mut self, preview: &str, question: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(preview.as_bytes()).await?;
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        // EOF leaves the line empty, which declines
        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        Ok(line)
    }
}
