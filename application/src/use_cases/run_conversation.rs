//! Run Conversation use case
//!
//! Drives the endless two-agent exchange and feeds the bounded log.
//!
//! Each tick produces four entries:
//!
//! 1. A asks B a question
//! 2. B answers it
//! 3. B asks A a follow-up
//! 4. A answers the follow-up
//!
//! The driver is the only writer of the log. A failed text-generation call
//! abandons the rest of the tick; the loop carries on after the normal
//! pause.

use crate::config::{DriverConfig, TickCommit};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, ENTRY_APPENDED, NoConversationLogger, TICK_FAILED,
};
use crate::ports::progress::{NoTickProgress, TickProgressNotifier};
use crate::ports::text_generator::{GenerationError, SubtopicExtractor, TextGenerator};
use colloquy_domain::util::collapse_whitespace;
use colloquy_domain::{
    Agent, AgentMemory, BoundedLog, DomainError, PromptTemplate, Sequence, TopicSeeds,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while driving the conversation
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Agents must have distinct names (both are {0:?})")]
    DuplicateAgents(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Outcome of one successful tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// 1-based tick number
    pub tick: u64,
    /// Sequences appended during the tick, in order
    pub sequences: Vec<Sequence>,
}

/// Counters accumulated over the driver's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriverSummary {
    pub ticks_completed: u64,
    pub ticks_failed: u64,
    pub entries_appended: u64,
}

impl DriverSummary {
    pub fn ticks_attempted(&self) -> u64 {
        self.ticks_completed + self.ticks_failed
    }
}

/// Which of the two agents is acting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seat {
    First,
    Second,
}

impl Seat {
    fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

/// Entries produced during one tick, committed per [`TickCommit`].
struct TickSink {
    tick: u64,
    commit: TickCommit,
    staged: Vec<(String, String)>,
    appended: Vec<(Sequence, String, String)>,
}

impl TickSink {
    fn new(tick: u64, commit: TickCommit) -> Self {
        Self {
            tick,
            commit,
            staged: Vec::new(),
            appended: Vec::new(),
        }
    }

    fn push(&mut self, log: &BoundedLog, speaker: &str, text: &str) {
        match self.commit {
            TickCommit::Immediate => {
                let sequence = log.append(speaker, text);
                debug!(tick = self.tick, sequence, speaker, "Appended entry");
                self.appended
                    .push((sequence, speaker.to_string(), text.to_string()));
            }
            TickCommit::Atomic => {
                self.staged.push((speaker.to_string(), text.to_string()));
            }
        }
    }

    /// Commit staged entries (atomic mode only) and return everything
    /// that reached the log.
    fn finish(mut self, log: &BoundedLog, success: bool) -> Vec<(Sequence, String, String)> {
        if self.commit == TickCommit::Atomic && success {
            let staged = std::mem::take(&mut self.staged);
            let range = log.append_batch(staged.iter().map(|(s, t)| (s.as_str(), t.as_str())));
            debug!(tick = self.tick, ?range, "Committed tick batch");
            self.appended = range
                .zip(staged)
                .map(|(sequence, (speaker, text))| (sequence, speaker, text))
                .collect();
        }
        self.appended
    }
}

/// Await `fut`, failing with [`GenerationError::Timeout`] past `limit`.
async fn within<F, T>(limit: Option<Duration>, fut: F) -> Result<T, GenerationError>
where
    F: Future<Output = Result<T, GenerationError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| GenerationError::Timeout(limit))?,
        None => fut.await,
    }
}

/// Use case driving the two-agent conversation
pub struct ConversationDriver {
    log: Arc<BoundedLog>,
    generator: Arc<dyn TextGenerator>,
    extractor: Arc<dyn SubtopicExtractor>,
    topics: TopicSeeds,
    config: DriverConfig,
    first: Agent,
    second: Agent,
    rng: StdRng,
    logger: Arc<dyn ConversationLogger>,
    progress: Arc<dyn TickProgressNotifier>,
    summary: DriverSummary,
}

impl ConversationDriver {
    /// Create a driver for two distinctly named agents.
    pub fn new(
        log: Arc<BoundedLog>,
        generator: Arc<dyn TextGenerator>,
        extractor: Arc<dyn SubtopicExtractor>,
        topics: TopicSeeds,
        agent_names: (impl Into<String>, impl Into<String>),
        config: DriverConfig,
    ) -> Result<Self, DriverError> {
        let first = Agent::with_memory(agent_names.0, AgentMemory::from_limit(config.memory_limit))?;
        let second =
            Agent::with_memory(agent_names.1, AgentMemory::from_limit(config.memory_limit))?;
        if first.name() == second.name() {
            return Err(DriverError::DuplicateAgents(first.name().to_string()));
        }

        Ok(Self {
            log,
            generator,
            extractor,
            topics,
            config,
            first,
            second,
            rng: StdRng::from_entropy(),
            logger: Arc::new(NoConversationLogger),
            progress: Arc::new(NoTickProgress),
            summary: DriverSummary::default(),
        })
    }

    /// Use a fixed RNG seed for topic selection
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn TickProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn agents(&self) -> (&Agent, &Agent) {
        (&self.first, &self.second)
    }

    pub fn summary(&self) -> DriverSummary {
        self.summary
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run ticks until cancelled or until `max_ticks` is reached.
    ///
    /// Cancellation interrupts the pause between ticks, never a tick in
    /// progress.
    pub async fn run(&mut self, cancellation: CancellationToken) -> DriverSummary {
        info!(
            first = self.first.name(),
            second = self.second.name(),
            interval = ?self.config.tick_interval,
            commit = ?self.config.tick_commit,
            "Conversation driver started"
        );

        loop {
            if cancellation.is_cancelled() || self.reached_max_ticks() {
                break;
            }

            match self.tick().await {
                Ok(report) => {
                    info!(
                        tick = report.tick,
                        entries = report.sequences.len(),
                        "Tick complete"
                    );
                }
                Err(e) => {
                    warn!("Tick {} abandoned: {}", self.summary.ticks_attempted(), e);
                }
            }

            if self.reached_max_ticks() {
                break;
            }

            tokio::select! {
                _ = cancellation.cancelled() => break,
                _ = tokio::time::sleep(self.config.tick_interval) => {}
            }
        }

        info!(
            completed = self.summary.ticks_completed,
            failed = self.summary.ticks_failed,
            entries = self.summary.entries_appended,
            "Conversation driver stopped"
        );
        self.summary
    }

    /// Move the driver onto its own task.
    pub fn spawn(mut self, cancellation: CancellationToken) -> JoinHandle<DriverSummary> {
        tokio::spawn(async move { self.run(cancellation).await })
    }

    /// Produce one round of four entries.
    pub async fn tick(&mut self) -> Result<TickReport, DriverError> {
        let tick = self.summary.ticks_attempted() + 1;
        self.progress.on_tick_start(tick);

        // Atomic ticks roll agent memory back with the discarded batch
        let saved_agents = (self.config.tick_commit == TickCommit::Atomic)
            .then(|| (self.first.clone(), self.second.clone()));

        let mut sink = TickSink::new(tick, self.config.tick_commit);
        let outcome = self.exchange(&mut sink).await;
        let appended = sink.finish(&self.log, outcome.is_ok());

        if outcome.is_err()
            && let Some((first, second)) = saved_agents
        {
            self.first = first;
            self.second = second;
        }

        self.summary.entries_appended += appended.len() as u64;
        for (sequence, speaker, text) in &appended {
            self.logger.log(ConversationEvent::new(
                ENTRY_APPENDED,
                serde_json::json!({
                    "tick": tick,
                    "sequence": sequence,
                    "speaker": speaker,
                    "text": text,
                }),
            ));
        }

        match outcome {
            Ok(()) => {
                self.summary.ticks_completed += 1;
                let report = TickReport {
                    tick,
                    sequences: appended.into_iter().map(|(sequence, _, _)| sequence).collect(),
                };
                self.progress.on_tick_complete(&report);
                Ok(report)
            }
            Err(e) => {
                self.summary.ticks_failed += 1;
                self.logger.log(ConversationEvent::new(
                    TICK_FAILED,
                    serde_json::json!({
                        "tick": tick,
                        "error": e.to_string(),
                        "partial_entries": appended.len(),
                    }),
                ));
                self.progress.on_tick_failed(tick, &e);
                Err(e)
            }
        }
    }

    fn reached_max_ticks(&self) -> bool {
        self.config
            .max_ticks
            .is_some_and(|max| self.summary.ticks_attempted() >= max)
    }

    async fn exchange(&mut self, sink: &mut TickSink) -> Result<(), DriverError> {
        let first = self.first.name().to_string();
        let second = self.second.name().to_string();

        let question = self.ask_question(Seat::First).await;
        sink.push(&self.log, &first, &question);

        let answer = self.generate_response(Seat::Second, &question).await?;
        sink.push(&self.log, &second, &answer);

        let follow_up = self.ask_question(Seat::Second).await;
        sink.push(&self.log, &second, &follow_up);

        let final_answer = self.generate_response(Seat::First, &follow_up).await?;
        sink.push(&self.log, &first, &final_answer);

        Ok(())
    }

    fn agent(&self, seat: Seat) -> &Agent {
        match seat {
            Seat::First => &self.first,
            Seat::Second => &self.second,
        }
    }

    fn agent_mut(&mut self, seat: Seat) -> &mut Agent {
        match seat {
            Seat::First => &mut self.first,
            Seat::Second => &mut self.second,
        }
    }

    /// Opening question on a fresh topic, or a follow-up on the subtopic of
    /// what this agent said last. Never fails: extraction problems fall back
    /// to a seed topic.
    async fn ask_question(&mut self, seat: Seat) -> String {
        let partner = self.agent(seat.other()).name().to_string();
        let last_said = self.agent(seat).last_said().map(str::to_string);

        let question = match last_said {
            None => self.opening_question(),
            Some(seed) => match self.extract_subtopic(&seed).await {
                Some(subtopic) => PromptTemplate::follow_up_question(&subtopic, &partner),
                None => self.opening_question(),
            },
        };

        self.agent_mut(seat).remember(question.clone());
        question
    }

    fn opening_question(&mut self) -> String {
        let topic = self.topics.pick(&mut self.rng);
        PromptTemplate::opening_question(topic)
    }

    async fn extract_subtopic(&self, seed: &str) -> Option<String> {
        let limit = self.config.generation_timeout;
        match within(limit, self.extractor.generate_subtopic(seed)).await {
            Ok(subtopic) => {
                let subtopic = collapse_whitespace(&subtopic);
                if subtopic.is_empty() {
                    warn!("Subtopic extractor returned nothing; falling back to a seed topic");
                    None
                } else {
                    debug!(%subtopic, "Extracted subtopic");
                    Some(subtopic)
                }
            }
            Err(e) => {
                warn!("Subtopic extraction failed ({}); falling back to a seed topic", e);
                None
            }
        }
    }

    async fn generate_response(&mut self, seat: Seat, prompt: &str) -> Result<String, DriverError> {
        let speaker = self.agent(seat).name().to_string();
        let asker = self.agent(seat.other()).name().to_string();

        let prompt = PromptTemplate::response_prompt(prompt);
        debug!(%speaker, prompt_len = prompt.len(), "Requesting response");
        let raw = within(
            self.config.generation_timeout,
            self.generator.generate_text(&prompt),
        )
        .await?;

        let text = collapse_whitespace(&raw);
        if text.is_empty() {
            return Err(GenerationError::EmptyOutput.into());
        }

        let reply = PromptTemplate::attributed_response(&speaker, &asker, &text);
        self.agent_mut(seat).remember(reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use colloquy_domain::{Cursor, Entry};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Scripted {
        Text(String),
        Error(GenerationError),
        Hang,
        Delayed(Duration, String),
    }

    /// Generator that replays a script, then echoes a default reply
    struct ScriptedGenerator {
        script: Mutex<VecDeque<Scripted>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn always_ok() -> Self {
            Self::new(Vec::new())
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Scripted::Text(t)) => Ok(t),
                Some(Scripted::Error(e)) => Err(e),
                Some(Scripted::Delayed(delay, t)) => {
                    tokio::time::sleep(delay).await;
                    Ok(t)
                }
                Some(Scripted::Hang) => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                None => Ok("interesting point about distant galaxies".to_string()),
            }
        }
    }

    struct FixedExtractor(Result<String, GenerationError>);

    #[async_trait]
    impl SubtopicExtractor for FixedExtractor {
        async fn generate_subtopic(&self, _seed_text: &str) -> Result<String, GenerationError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<ConversationEvent>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn driver_with(
        log: Arc<BoundedLog>,
        generator: ScriptedGenerator,
        extractor: FixedExtractor,
        config: DriverConfig,
    ) -> ConversationDriver {
        ConversationDriver::new(
            log,
            Arc::new(generator),
            Arc::new(extractor),
            TopicSeeds::new(["tidal power"]).unwrap(),
            ("Bot 1", "Bot 2"),
            config,
        )
        .unwrap()
        .with_rng_seed(42)
    }

    fn fast_config() -> DriverConfig {
        DriverConfig::default()
            .with_tick_interval(Duration::ZERO)
            .with_generation_timeout(None)
    }

    fn all_entries(log: &BoundedLog) -> Vec<Entry> {
        log.read_since(Cursor::START).entries
    }

    #[tokio::test]
    async fn test_tick_appends_four_entries_in_round_robin_order() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config(),
        );

        let report = driver.tick().await.unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(report.sequences, vec![0, 1, 2, 3]);

        let entries = all_entries(&log);
        let speakers: Vec<&str> = entries.iter().map(Entry::speaker).collect();
        assert_eq!(speakers, vec!["Bot 1", "Bot 2", "Bot 2", "Bot 1"]);
        assert_eq!(entries[0].text(), "let us talk about tidal power?");
        assert!(entries[1].text().starts_with("Bot 2 replying to Bot 1:"));
        assert!(entries[3].text().starts_with("Bot 1 replying to Bot 2:"));
    }

    #[tokio::test]
    async fn test_second_agent_follows_up_on_its_own_answer() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config(),
        );

        driver.tick().await.unwrap();
        let entries = all_entries(&log);
        assert!(entries[2].text().contains("galaxies"));
        assert!(entries[2].text().starts_with("Bot 1,"));
    }

    #[tokio::test]
    async fn test_agents_remember_what_they_said() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config(),
        );

        driver.tick().await.unwrap();
        let (first, second) = driver.agents();
        assert_eq!(first.memory().len(), 2);
        assert_eq!(second.memory().len(), 2);
        assert_eq!(first.last_said(), Some(all_entries(&log)[3].text()));
    }

    #[tokio::test]
    async fn test_memory_limit_applies_to_agents() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config().with_memory_limit(1),
        );

        driver.tick().await.unwrap();
        driver.tick().await.unwrap();
        let (first, second) = driver.agents();
        assert_eq!(first.memory().len(), 1);
        assert_eq!(second.memory().len(), 1);
    }

    #[tokio::test]
    async fn test_second_tick_first_question_is_a_follow_up() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Ok("oceans".to_string())),
            fast_config(),
        );

        driver.tick().await.unwrap();
        driver.tick().await.unwrap();
        let entries = all_entries(&log);
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[4].speaker(), "Bot 1");
        assert!(entries[4].text().contains("oceans"));
    }

    #[tokio::test]
    async fn test_extractor_failure_falls_back_to_seed_topic() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Err(GenerationError::Connection("down".to_string()))),
            fast_config(),
        );

        driver.tick().await.unwrap();
        let entries = all_entries(&log);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2].text(), "let us talk about tidal power?");
    }

    #[tokio::test]
    async fn test_blank_subtopic_falls_back_to_seed_topic() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Ok("  \n ".to_string())),
            fast_config(),
        );

        driver.tick().await.unwrap();
        assert_eq!(all_entries(&log)[2].text(), "let us talk about tidal power?");
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_partial_entries_in_immediate_mode() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let logger = Arc::new(RecordingLogger::default());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![Scripted::Error(GenerationError::RequestFailed(
                "500".to_string(),
            ))]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config(),
        )
        .with_logger(logger.clone());

        let err = driver.tick().await.unwrap_err();
        assert!(matches!(err, DriverError::Generation(GenerationError::RequestFailed(_))));

        let entries = all_entries(&log);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].speaker(), "Bot 1");

        let summary = driver.summary();
        assert_eq!(summary.ticks_failed, 1);
        assert_eq!(summary.entries_appended, 1);

        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, ENTRY_APPENDED);
        assert_eq!(events[1].event_type, TICK_FAILED);
        assert_eq!(events[1].payload["partial_entries"], 1);
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_nothing_in_atomic_mode() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![
                Scripted::Text("fine".to_string()),
                Scripted::Error(GenerationError::EmptyOutput),
            ]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config().with_tick_commit(TickCommit::Atomic),
        );

        assert!(driver.tick().await.is_err());
        assert!(log.is_empty());
        assert_eq!(log.next_sequence(), 0);

        let report = driver.tick().await.unwrap();
        assert_eq!(report.tick, 2);
        assert_eq!(report.sequences, vec![0, 1, 2, 3]);
        assert_eq!(log.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_atomic_tick_rolls_back_agent_memory() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![
                Scripted::Text("fine".to_string()),
                Scripted::Error(GenerationError::EmptyOutput),
            ]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config().with_tick_commit(TickCommit::Atomic),
        );

        assert!(driver.tick().await.is_err());
        let (first, second) = driver.agents();
        assert!(first.memory().is_empty());
        assert!(second.memory().is_empty());

        // Next tick starts fresh instead of following up on unseen text
        driver.tick().await.unwrap();
        assert_eq!(all_entries(&log)[0].text(), "let us talk about tidal power?");
    }

    #[tokio::test]
    async fn test_failed_immediate_tick_keeps_agent_memory() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![Scripted::Error(GenerationError::EmptyOutput)]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config(),
        );

        assert!(driver.tick().await.is_err());
        assert_eq!(driver.agents().0.last_said(), Some(all_entries(&log)[0].text()));
    }

    #[tokio::test]
    async fn test_blank_generation_is_a_failure() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![Scripted::Text(" \n\t".to_string())]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config(),
        );

        let err = driver.tick().await.unwrap_err();
        assert!(matches!(err, DriverError::Generation(GenerationError::EmptyOutput)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_generation_times_out() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![Scripted::Hang]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config().with_generation_timeout(Some(Duration::from_secs(5))),
        );

        let err = driver.tick().await.unwrap_err();
        assert!(matches!(
            err,
            DriverError::Generation(GenerationError::Timeout(d)) if d == Duration::from_secs(5)
        ));
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_after_max_ticks_and_survives_failures() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![Scripted::Error(GenerationError::Other(
                "boom".to_string(),
            ))]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config().with_max_ticks(Some(3)),
        );

        let summary = driver.run(CancellationToken::new()).await;
        assert_eq!(summary.ticks_failed, 1);
        assert_eq!(summary.ticks_completed, 2);
        assert_eq!(summary.entries_appended, 9);
        assert_eq!(log.next_sequence(), 9);
    }

    #[tokio::test]
    async fn test_cancelled_driver_starts_no_tick() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config(),
        );

        let token = CancellationToken::new();
        token.cancel();
        let summary = driver.run(token).await;
        assert_eq!(summary.ticks_attempted(), 0);
        assert!(log.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_the_pause() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::always_ok(),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config().with_tick_interval(Duration::from_secs(3600)),
        );

        let token = CancellationToken::new();
        let handle = driver.spawn(token.clone());
        tokio::time::sleep(Duration::from_secs(1)).await;
        token.cancel();

        let summary = handle.await.unwrap();
        assert_eq!(summary.ticks_completed, 1);
        assert_eq!(log.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_mid_tick_finishes_the_tick() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![Scripted::Delayed(
                Duration::from_secs(5),
                "slow thoughts on tides".to_string(),
            )]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config().with_tick_interval(Duration::from_secs(3600)),
        );

        let token = CancellationToken::new();
        let handle = driver.spawn(token.clone());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(log.len(), 1);
        token.cancel();

        let summary = handle.await.unwrap();
        assert_eq!(summary.ticks_attempted(), 1);
        assert_eq!(summary.ticks_completed, 1);
        assert_eq!(log.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_is_followed_by_the_normal_pause() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let mut driver = driver_with(
            Arc::clone(&log),
            ScriptedGenerator::new(vec![Scripted::Error(GenerationError::Other(
                "boom".to_string(),
            ))]),
            FixedExtractor(Ok("galaxies".to_string())),
            fast_config()
                .with_tick_interval(Duration::from_secs(30))
                .with_max_ticks(Some(2)),
        );

        let started = tokio::time::Instant::now();
        let summary = driver.run(CancellationToken::new()).await;

        assert_eq!(summary.ticks_failed, 1);
        assert_eq!(summary.ticks_completed, 1);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(30));
        assert!(elapsed < Duration::from_secs(31));
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn test_duplicate_agent_names_rejected() {
        let result = ConversationDriver::new(
            Arc::new(BoundedLog::default()),
            Arc::new(ScriptedGenerator::always_ok()),
            Arc::new(FixedExtractor(Ok("x".to_string()))),
            TopicSeeds::default(),
            ("Bot", " Bot "),
            DriverConfig::default(),
        );
        assert!(matches!(result, Err(DriverError::DuplicateAgents(name)) if name == "Bot"));
    }

    #[test]
    fn test_blank_agent_name_rejected() {
        let result = ConversationDriver::new(
            Arc::new(BoundedLog::default()),
            Arc::new(ScriptedGenerator::always_ok()),
            Arc::new(FixedExtractor(Ok("x".to_string()))),
            TopicSeeds::default(),
            ("", "Bot"),
            DriverConfig::default(),
        );
        assert!(matches!(result, Err(DriverError::Domain(_))));
    }
}
