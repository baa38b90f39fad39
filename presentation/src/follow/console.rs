//! Console follower
//!
//! Polls the conversation feed on a fixed interval and writes every new
//! message through an [`OutputFormatter`]. When the follower fell behind
//! eviction it prints a gap notice before the first retained message.

use crate::output::formatter::OutputFormatter;
use colloquy_application::{FeedFollower, FeedPage};
use indicatif::ProgressBar;
use std::io::{self, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Counters kept while following
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowStats {
    pub polls: u64,
    pub messages_printed: u64,
    pub messages_missed: u64,
}

/// Prints new conversation messages until cancelled
pub struct ConsoleFollower<W> {
    follower: FeedFollower,
    formatter: Box<dyn OutputFormatter>,
    out: W,
    poll_interval: Duration,
    spinner: Option<ProgressBar>,
    stats: FollowStats,
}

impl<W: Write> ConsoleFollower<W> {
    pub fn new(
        follower: FeedFollower,
        formatter: Box<dyn OutputFormatter>,
        out: W,
        poll_interval: Duration,
    ) -> Self {
        Self {
            follower,
            formatter,
            out,
            poll_interval,
            spinner: None,
            stats: FollowStats::default(),
        }
    }

    /// Print around this spinner instead of over it
    pub fn with_spinner(mut self, spinner: ProgressBar) -> Self {
        self.spinner = Some(spinner);
        self
    }

    pub fn stats(&self) -> FollowStats {
        self.stats
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Poll until `cancellation` fires, then drain whatever is left.
    pub async fn run(&mut self, cancellation: CancellationToken) -> io::Result<FollowStats> {
        loop {
            self.poll_once()?;
            tokio::select! {
                _ = cancellation.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        self.poll_once()?;
        debug!(stats = ?self.stats, "Follower stopped");
        Ok(self.stats)
    }

    /// Poll once and print the page; returns the number of messages printed
    pub fn poll_once(&mut self) -> io::Result<usize> {
        let page = self.follower.next_page();
        self.stats.polls += 1;
        self.stats.messages_missed += page.missed;

        if page.is_empty() && page.missed == 0 {
            return Ok(0);
        }

        let text = self.render(&page);
        match self.spinner.clone() {
            Some(spinner) => spinner.suspend(|| self.emit(&text))?,
            None => self.emit(&text)?,
        }

        self.stats.messages_printed += page.messages.len() as u64;
        Ok(page.messages.len())
    }

    /// Write a single line outside the polling loop
    pub fn print_line(&mut self, line: &str) -> io::Result<()> {
        let text = format!("{}\n", line);
        match self.spinner.clone() {
            Some(spinner) => spinner.suspend(|| self.emit(&text)),
            None => self.emit(&text),
        }
    }

    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }

    fn render(&self, page: &FeedPage) -> String {
        let mut text = String::new();
        if page.missed > 0 {
            text.push_str(&self.formatter.format_gap(page.missed));
            text.push('\n');
        }
        for message in &page.messages {
            text.push_str(&self.formatter.format_message(message));
            text.push('\n');
        }
        text
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}
