//! Crawler coordinator - the frontier control loop
//!
//! This module contains the loop that owns the crawl's shared state:
//! - The seen-set, so every URL is printed and fetched at most once
//! - The robots.txt exclusion set, read-only once the crawl starts
//! - The results channel every fetch task posts its links to
//! - The deadline that ends the crawl
//!
//! Fetch tasks never touch the seen-set; they only post batches. Because the
//! loop is the sole mutator, no locking is needed.

use crate::config::Config;
use crate::crawler::extractor::LinkExtractor;
use crate::crawler::fetcher::fetch_url;
use crate::crawler::gate::ConcurrencyGate;
use crate::output::{emit_url, CrawlStats};
use crate::robots::DisallowSet;
use crate::state::CrawlPhase;
use crate::url::normalize_origin;
use crate::{ConfigError, SweepError};
use reqwest::Client;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Links produced by one completed fetch task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBatch {
    /// The URL whose body produced these links; `None` for the seed batch
    pub source: Option<String>,

    /// Same-origin links in order of appearance, duplicates included
    pub urls: Vec<String>,

    /// True if the fetch failed and the batch is empty for that reason
    pub failed: bool,
}

impl ResultBatch {
    /// The initial batch holding only the origin
    pub fn seed(origin: &str) -> Self {
        Self {
            source: None,
            urls: vec![origin.to_string()],
            failed: false,
        }
    }

    /// Links found on `source`
    pub fn found(source: String, urls: Vec<String>) -> Self {
        Self {
            source: Some(source),
            urls,
            failed: false,
        }
    }

    /// The empty batch posted when fetching `source` failed
    pub fn failed(source: String) -> Self {
        Self {
            source: Some(source),
            urls: Vec::new(),
            failed: true,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    origin: String,
    client: Client,
    gate: ConcurrencyGate,
    extractor: Arc<LinkExtractor>,
    disallowed: DisallowSet,
    seen: HashSet<String>,
    results_tx: UnboundedSender<ResultBatch>,
    results_rx: UnboundedReceiver<ResultBatch>,
    tasks: JoinSet<()>,
    fetch_delay: Duration,
    started: Instant,
    deadline: Instant,
    phase: CrawlPhase,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a new coordinator and arms its deadline
    ///
    /// The deadline is measured from this call, so construct the coordinator
    /// only once robots.txt has been handled.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `client` - The HTTP client shared by every fetch task
    /// * `disallowed` - The fully derived robots.txt exclusion set
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SweepError)` - No target configured or a link pattern failed to compile
    pub fn new(config: &Config, client: Client, disallowed: DisallowSet) -> Result<Self, SweepError> {
        let target = config
            .crawl
            .target
            .as_deref()
            .ok_or(ConfigError::MissingTarget)?;
        let origin = normalize_origin(target);
        let extractor = LinkExtractor::new(origin.clone())?;
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        let started = Instant::now();
        let deadline = started.checked_add(config.crawl.duration()).ok_or_else(|| {
            ConfigError::Validation(format!(
                "duration of {}s is out of range",
                config.crawl.duration
            ))
        })?;

        Ok(Self {
            origin,
            client,
            gate: ConcurrencyGate::new(config.crawl.concurrency),
            extractor: Arc::new(extractor),
            disallowed,
            seen: HashSet::new(),
            results_tx,
            results_rx,
            tasks: JoinSet::new(),
            fetch_delay: config.crawl.fetch_delay(),
            started,
            deadline,
            phase: CrawlPhase::Seeding,
            stats: CrawlStats::new(),
        })
    }

    /// Runs the control loop until the deadline elapses
    ///
    /// Every newly seen URL is written to `out` as its own line the moment it
    /// is seen. When the deadline fires, fetch tasks still in flight are
    /// aborted rather than awaited.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlStats)` - The crawl ran to its deadline
    /// * `Err(SweepError)` - Writing to `out` failed
    pub async fn run<W: Write>(mut self, out: &mut W) -> Result<CrawlStats, SweepError> {
        tracing::info!(
            "Crawling {} for {:?} with {} concurrent fetches",
            self.origin,
            self.deadline - self.started,
            self.gate.capacity()
        );

        // The receiver lives in `self`, so this send cannot fail
        let _ = self.results_tx.send(ResultBatch::seed(&self.origin));

        let deadline = tokio::time::sleep_until(self.deadline);
        tokio::pin!(deadline);

        let result = loop {
            tokio::select! {
                biased;

                _ = &mut deadline => break Ok(()),

                Some(batch) = self.results_rx.recv() => {
                    // The timer can lag the deadline by up to a millisecond
                    if Instant::now() >= self.deadline {
                        break Ok(());
                    }
                    if self.phase == CrawlPhase::Seeding {
                        if let Err(e) = self.transition(CrawlPhase::Running) {
                            break Err(e);
                        }
                    }
                    if let Err(e) = self.handle_batch(batch, out) {
                        break Err(e);
                    }
                }

                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            tracing::error!("Fetch task panicked: {}", e);
                        }
                    }
                }
            }
        };

        self.terminate()?;
        result?;

        self.stats.log_summary();
        Ok(self.stats)
    }

    /// Stops the crawl: closes the gate and abandons in-flight fetches
    fn terminate(&mut self) -> Result<(), SweepError> {
        if self.phase.is_terminal() {
            return Ok(());
        }
        self.transition(CrawlPhase::Terminated)?;
        self.stats.elapsed = self.started.elapsed();

        let abandoned = self.tasks.len();
        self.gate.close();
        self.tasks.abort_all();

        tracing::debug!(
            "Deadline reached with {} fetch tasks outstanding ({} holding tokens)",
            abandoned,
            self.gate.in_flight()
        );
        Ok(())
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), SweepError> {
        if !self.phase.can_transition_to(next) {
            return Err(SweepError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Control loop {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Processes one batch: print and dispatch every URL not seen or disallowed
    fn handle_batch<W: Write>(&mut self, batch: ResultBatch, out: &mut W) -> Result<(), SweepError> {
        self.stats.batches_received += 1;
        self.stats.observe_in_flight(self.gate.in_flight());
        if batch.failed {
            self.stats.fetch_failures += 1;
        }

        for url in batch.urls {
            if self.seen.contains(&url) {
                self.stats.duplicates_skipped += 1;
                continue;
            }
            if self.disallowed.is_disallowed(&url) {
                tracing::debug!("Skipping {}: disallowed by robots.txt", url);
                self.stats.disallowed_skipped += 1;
                continue;
            }

            self.seen.insert(url.clone());
            self.stats.urls_seen += 1;
            emit_url(out, &url)?;
            self.dispatch(url);
        }

        Ok(())
    }

    /// Spawns a fetch task for `url` that posts its batch back to the loop
    fn dispatch(&mut self, url: String) {
        let client = self.client.clone();
        let gate = self.gate.clone();
        let extractor = Arc::clone(&self.extractor);
        let results_tx = self.results_tx.clone();
        let fetch_delay = self.fetch_delay;

        self.stats.fetches_spawned += 1;
        self.tasks.spawn(async move {
            let batch = fetch_links(&client, &gate, &extractor, url, fetch_delay).await;
            // The loop may already have terminated; the batch is then dropped
            let _ = results_tx.send(batch);
        });
    }
}

/// Fetches one URL under a gate token and extracts its same-origin links
///
/// The token is held for the GET, the optional post-fetch delay and the
/// extraction, and is released before the batch is returned. Any fetch
/// failure yields an empty, failed batch.
pub async fn fetch_links(
    client: &Client,
    gate: &ConcurrencyGate,
    extractor: &LinkExtractor,
    url: String,
    fetch_delay: Duration,
) -> ResultBatch {
    let Some(_token) = gate.acquire().await else {
        return ResultBatch::failed(url);
    };

    let body = match fetch_url(client, &url).await.into_body() {
        Ok(body) => body,
        Err(reason) => {
            let error = SweepError::Fetch {
                url: url.clone(),
                reason,
            };
            tracing::warn!("fetch: {}", error);
            return ResultBatch::failed(url);
        }
    };

    if !fetch_delay.is_zero() {
        tokio::time::sleep(fetch_delay).await;
    }

    let links = extractor.extract(&body);
    tracing::debug!("Found {} links on {}", links.len(), url);
    ResultBatch::found(url, links)
}
