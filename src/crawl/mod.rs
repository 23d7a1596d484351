pub mod country;
pub mod fetch;
pub mod list;
pub mod person;
pub mod registry;

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{CrawlError, FetchError, HandlerError};
use crate::graph::{Predicate, TripleStore};
use crate::page::Page;
use fetch::Fetcher;
use registry::CountryRegistry;

#[derive(Debug, Clone, PartialEq)]
pub struct CountryMeta {
    pub name: String,
    /// Link the country was discovered through, if any.
    pub source_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    President,
    PrimeMinister,
}

impl Role {
    /// Relation a holder of this role has to their country.
    pub fn relation(self) -> Predicate {
        match self {
            Role::President => Predicate::PresidentOf,
            Role::PrimeMinister => Predicate::PrimeMinisterOf,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonMeta {
    pub role: Role,
    pub name: String,
    pub country: String,
}

/// Which handler a fetched page goes to, with what it was enqueued with.
#[derive(Debug, Clone, PartialEq)]
pub enum PageKind {
    Country(CountryMeta),
    Person(PersonMeta),
}

#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub url: String,
    pub kind: PageKind,
}

/// Visited set plus pending work. A URL counts as visited once queued.
///
/// Country and person pages wait in separate queues: a person's birth place
/// only resolves against countries that are already registered.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    countries: VecDeque<CrawlTask>,
    people: VecDeque<CrawlTask>,
}

impl Frontier {
    /// Queue `url` unless it was seen before (raw string comparison).
    pub fn enqueue(&mut self, url: String, kind: PageKind) -> bool {
        if !self.visited.insert(url.clone()) {
            debug!("Already visited {}", url);
            return false;
        }
        let queue = match kind {
            PageKind::Country(_) => &mut self.countries,
            PageKind::Person(_) => &mut self.people,
        };
        queue.push_back(CrawlTask { url, kind });
        true
    }

    /// Mark without queueing (the seed page).
    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    /// Everything that can run together: all queued countries if there are
    /// any, otherwise all queued people.
    pub fn take_stage(&mut self) -> Vec<CrawlTask> {
        if self.countries.is_empty() {
            self.people.drain(..).collect()
        } else {
            self.countries.drain(..).collect()
        }
    }

    pub fn pending(&self) -> usize {
        self.countries.len() + self.people.len()
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }
}

/// Everything a page handler may read or extend.
pub struct CrawlState {
    pub frontier: Frontier,
    pub store: TripleStore,
    pub countries: CountryRegistry,
    pub wiki_base: String,
}

impl CrawlState {
    pub fn new(wiki_base: &str) -> Self {
        CrawlState {
            frontier: Frontier::default(),
            store: TripleStore::new(),
            countries: CountryRegistry::default(),
            wiki_base: wiki_base.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeded,
    Running,
    Done,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlReport {
    pub visited: usize,
    pub handled: usize,
    pub fetch_failures: usize,
    pub handler_failures: usize,
    pub countries: usize,
    pub triples: usize,
}

type Fetches = JoinSet<(CrawlTask, Result<String, FetchError>)>;

pub struct CrawlOutput {
    pub store: TripleStore,
    pub report: CrawlReport,
}

/// Drives the crawl: fetches run on a bounded pool of tokio tasks, while
/// parsing, handler dispatch and every write to the frontier or store happen
/// on the single loop in [`Scheduler::run`]. Country pages are all handled
/// before any person page.
pub struct Scheduler<F> {
    fetcher: Arc<F>,
    concurrency: usize,
    state: CrawlState,
    phase: Phase,
    progress: ProgressBar,
}

impl<F: Fetcher> Scheduler<F> {
    /// Fetch and read the seed list page. Failing here is fatal.
    pub async fn seed(fetcher: F, settings: &Settings) -> Result<Self, CrawlError> {
        let seed_url = settings.seed_url();
        info!("Fetching seed page: {}", seed_url);
        let body = fetcher.fetch(&seed_url).await.map_err(CrawlError::Seed)?;

        let mut state = CrawlState::new(&settings.wiki_base);
        state.frontier.mark_visited(&seed_url);
        let queued = {
            let page = Page::parse(&body);
            list::handle(&page, &seed_url, &mut state).map_err(CrawlError::SeedPage)?
        };
        info!("Seeded {} country pages", queued);

        Ok(Scheduler {
            fetcher: Arc::new(fetcher),
            concurrency: settings.concurrency.max(1),
            state,
            phase: Phase::Seeded,
            progress: progress_bar(settings.progress),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Work until the queue is exhausted, one stage at a time. Each stage
    /// fetches in parallel and is fully handled before the next one starts.
    pub async fn run(mut self) -> CrawlOutput {
        self.phase = Phase::Running;
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut report = CrawlReport::default();

        loop {
            let stage = self.state.frontier.take_stage();
            if stage.is_empty() {
                break;
            }
            debug!("Starting stage of {} pages", stage.len());

            let mut fetches = JoinSet::new();
            for task in stage {
                self.spawn_fetch(&mut fetches, task, &semaphore);
            }

            while let Some(joined) = fetches.join_next().await {
                let (task, fetched) = match joined {
                    Ok(done) => done,
                    Err(e) => {
                        warn!("Fetch task died: {}", e);
                        report.fetch_failures += 1;
                        self.progress.inc(1);
                        continue;
                    }
                };
                match fetched {
                    Ok(body) => match self.dispatch(&task, &body) {
                        Ok(()) => report.handled += 1,
                        Err(e) => {
                            warn!("Handler failed for {}: {}", task.url, e);
                            report.handler_failures += 1;
                        }
                    },
                    Err(e) => {
                        warn!("Fetch failed for {}: {}", task.url, e);
                        report.fetch_failures += 1;
                    }
                }
                self.progress.inc(1);
                self.progress.set_message(task.url);
            }
        }

        self.progress.finish_and_clear();
        self.phase = Phase::Done;

        report.visited = self.state.frontier.visited();
        report.countries = self.state.countries.len();
        report.triples = self.state.store.len();
        info!(
            "Crawl done: {} pages visited ({} handled, {} fetch errors, {} handler errors), {} triples",
            report.visited,
            report.handled,
            report.fetch_failures,
            report.handler_failures,
            report.triples
        );

        CrawlOutput {
            store: self.state.store,
            report,
        }
    }

    fn spawn_fetch(&self, fetches: &mut Fetches, task: CrawlTask, semaphore: &Arc<Semaphore>) {
        let fetcher = Arc::clone(&self.fetcher);
        let sem = Arc::clone(semaphore);
        fetches.spawn(async move {
            let _permit = sem.acquire_owned().await;
            let fetched = fetcher.fetch(&task.url).await;
            (task, fetched)
        });
    }

    fn dispatch(&mut self, task: &CrawlTask, body: &str) -> Result<(), HandlerError> {
        let page = Page::parse(body);
        debug!("Handling {}", task.url);
        match &task.kind {
            PageKind::Country(meta) => country::handle(&page, &task.url, meta, &mut self.state),
            PageKind::Person(meta) => person::handle(&page, &task.url, meta, &mut self.state),
        }
    }
}

fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} pages {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}
