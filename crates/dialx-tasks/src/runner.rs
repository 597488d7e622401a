//! Sequential test runner with optional pauses for screenshot capture

use anyhow::Result;
use std::fmt;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::TaskConfig;
use crate::scenarios::{bucket_image, inline_image, text_to_image};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Waits for ENTER before starting and after every test
    Interactive,
    /// Runs straight through and reports a summary
    Automatic,
}

type Input = Box<dyn AsyncBufRead + Unpin + Send>;

pub struct Runner {
    mode: Mode,
    results: Vec<(String, bool)>,
    /// One reader for the whole run so lines typed ahead are not lost
    input: Input,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("mode", &self.mode)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

impl Runner {
    pub fn interactive() -> Self {
        Self::with_input(Mode::Interactive, BufReader::new(tokio::io::stdin()))
    }

    pub fn automatic() -> Self {
        Self::with_input(Mode::Automatic, tokio::io::empty())
    }

    /// Runner reading its ENTER confirmations from `input`
    pub fn with_input(mode: Mode, input: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        Self {
            mode,
            results: Vec::new(),
            input: Box::new(input),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn results(&self) -> &[(String, bool)] {
        &self.results
    }

    pub async fn start(&mut self) {
        println!("\n{}", "=".repeat(70));
        match self.mode {
            Mode::Interactive => {
                println!("DIAL API IMAGE GENERATION AND ANALYSIS - COMPREHENSIVE TESTS");
                println!("{}", "=".repeat(70));
                println!("This script will run all three tasks and pause for screenshots.");
                println!("Press ENTER after taking each screenshot to continue.");
                self.wait_for_enter("\nPress ENTER to start...").await;
            }
            Mode::Automatic => {
                println!("DIAL API IMAGE GENERATION AND ANALYSIS - AUTOMATED TESTS");
                println!("{}\n", "=".repeat(70));
            }
        }
    }

    /// Run one test, report its outcome and record it
    ///
    /// Failures are printed with their full context chain so the failing
    /// stage is visible; they never abort the run.
    pub async fn run<F, Fut>(&mut self, name: &str, test: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        println!("\n{}", "=".repeat(70));
        println!("🚀 Starting: {name}");
        println!("{}\n", "=".repeat(70));

        let passed = match test().await {
            Ok(()) => {
                println!("\n✅ {name} completed successfully!");
                true
            }
            Err(e) => {
                tracing::error!(test = name, error = %format!("{e:#}"), "Test failed");
                println!("\n❌ {name} failed with error:");
                println!("   {e:#}");
                false
            }
        };
        self.results.push((name.to_string(), passed));

        if self.mode == Mode::Interactive {
            println!("\n{}", "=".repeat(70));
            self.wait_for_enter(&format!(
                "📸 Test '{name}' completed. Take screenshot, then press ENTER to continue..."
            ))
            .await;
            println!("{}\n", "=".repeat(70));
        }

        passed
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, passed)| *passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|(_, passed)| *passed)
    }

    /// Print the summary and return whether every test passed
    pub fn finish(&self) -> bool {
        println!("\n{}", "=".repeat(70));
        println!("TEST SUMMARY");
        println!("{}", "=".repeat(70));
        for (name, passed) in &self.results {
            let status = if *passed { "✅ PASSED" } else { "❌ FAILED" };
            println!("   {status}: {name}");
        }

        println!("\n{}", "=".repeat(70));
        println!(
            "Results: {}/{} tests passed",
            self.passed_count(),
            self.results.len()
        );
        println!("{}\n", "=".repeat(70));

        self.all_passed()
    }

    async fn wait_for_enter(&mut self, prompt: &str) {
        println!("{prompt}");
        if let Err(e) = self.read_line().await {
            tracing::warn!("Failed to read from stdin: {}", e);
        }
    }

    async fn read_line(&mut self) -> std::io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line).await?;
        Ok(line)
    }
}

/// Run the three scenarios in order
pub async fn run_all(runner: &mut Runner, config: &TaskConfig) -> bool {
    runner.start().await;

    runner
        .run("Test 1: OpenAI-Style Image Analysis (Base64)", || async {
            inline_image::run(config).await.map(|_| ())
        })
        .await;

    runner
        .run("Test 2: DIAL-Style Image Analysis (Bucket Storage)", || async {
            bucket_image::run(config).await.map(|_| ())
        })
        .await;

    runner
        .run("Test 3: Text-to-Image Generation", || async {
            text_to_image::run(config).await.map(|_| ())
        })
        .await;

    runner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[tokio::test]
    async fn test_automatic_runner_records_results() {
        let mut runner = Runner::automatic();

        assert!(runner.run("ok", || async { Ok(()) }).await);
        assert!(
            !runner
                .run("broken", || async {
                    Err(anyhow!("connection refused")).context("Failed to open bucket session")
                })
                .await
        );

        assert_eq!(runner.passed_count(), 1);
        assert_eq!(runner.results().len(), 2);
        assert!(!runner.finish());
    }

    #[tokio::test]
    async fn test_interactive_runner_consumes_one_line_per_pause() {
        let mut runner = Runner::with_input(Mode::Interactive, &b"\n\n\nleft over\n"[..]);

        runner.start().await;
        assert!(runner.run("first", || async { Ok(()) }).await);
        assert!(runner.run("second", || async { Ok(()) }).await);

        assert_eq!(runner.read_line().await.unwrap(), "left over\n");
        assert_eq!(runner.passed_count(), 2);
    }

    #[tokio::test]
    async fn test_automatic_runner_never_reads_input() {
        let mut runner = Runner::with_input(Mode::Automatic, &b"untouched\n"[..]);

        runner.start().await;
        runner.run("only", || async { Ok(()) }).await;

        assert_eq!(runner.read_line().await.unwrap(), "untouched\n");
    }

    #[tokio::test]
    async fn test_all_passed_when_empty() {
        let runner = Runner::automatic();
        assert!(runner.finish());
        assert_eq!(runner.mode(), Mode::Automatic);
    }
}
