//! Reactive filter controller.
//!
//! The controller is the single owner of the mutable [`FilterCriteria`]. Every
//! setter marks the state dirty and restarts a debounce timer; when the timer
//! fires the pipeline runs over a snapshot of the criteria and the result is
//! published to subscribers. A setter call while a timer is pending aborts
//! that timer, so a burst of changes produces a single run with the last
//! values.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::catalog::{Catalog, Coordinates, Locale};
use crate::config::Config;
use crate::engine::{SearchEngine, SearchResults};
use crate::error::{GuiaError, Result};
use crate::filter::{CategoryFilter, Feature, FilterCriteria, PriceRange, RatingRange, SortMode};

/// Source of the local wall-clock time used by the open-now facet.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub struct ControllerOptions {
    pub debounce: Duration,
    pub initial: FilterCriteria,
    pub clock: Arc<dyn Clock>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            initial: FilterCriteria::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl ControllerOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.controller.debounce_ms),
            initial: FilterCriteria::with_locale(config.search.default_locale),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

struct State {
    criteria: FilterCriteria,
    dirty: bool,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

struct Inner {
    catalog: Catalog,
    engine: SearchEngine,
    clock: Arc<dyn Clock>,
    debounce: Duration,
    runtime: Handle,
    state: Mutex<State>,
    // Serializes pipeline runs so publishes never interleave.
    compute: Mutex<()>,
    results: watch::Sender<Arc<SearchResults>>,
    loading: watch::Sender<bool>,
    runs: AtomicU64,
}

/// Owns filter criteria and publishes recomputed results.
///
/// Must be created inside a tokio runtime; the debounce timers run on it.
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct FilterController {
    inner: Arc<Inner>,
}

impl FilterController {
    /// Create a controller and publish the initial result synchronously.
    pub fn new(catalog: Catalog, engine: SearchEngine, options: ControllerOptions) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|err| GuiaError::Runtime(format!("controller needs a tokio runtime: {err}")))?;

        let (results, _) = watch::channel(Arc::new(SearchResults::default()));
        let (loading, _) = watch::channel(false);

        let controller = Self {
            inner: Arc::new(Inner {
                catalog,
                engine,
                clock: options.clock,
                debounce: options.debounce,
                runtime,
                state: Mutex::new(State {
                    criteria: options.initial,
                    dirty: true,
                    generation: 0,
                    pending: None,
                }),
                compute: Mutex::new(()),
                results,
                loading,
                runs: AtomicU64::new(0),
            }),
        };
        controller.recompute_now();
        Ok(controller)
    }

    pub fn from_config(catalog: Catalog, config: &Config) -> Result<Self> {
        Self::new(
            catalog,
            SearchEngine::from_config(&config.search),
            ControllerOptions::from_config(config),
        )
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|criteria| criteria.search_query = query);
    }

    pub fn set_locale(&self, locale: Locale) {
        self.update(|criteria| criteria.locale = locale);
    }

    pub fn set_category(&self, category: CategoryFilter) {
        self.update(|criteria| criteria.category = category);
    }

    pub fn set_subcategory(&self, subcategory: Option<String>) {
        self.update(|criteria| criteria.subcategory = subcategory);
    }

    pub fn set_price_range(&self, lo: u8, hi: u8) {
        self.update(|criteria| criteria.price_range = PriceRange::new(lo, hi));
    }

    pub fn set_rating_range(&self, lo: f64, hi: f64) {
        self.update(|criteria| criteria.rating_range = RatingRange::new(lo, hi));
    }

    pub fn set_features(&self, features: impl IntoIterator<Item = Feature>) {
        let features = features.into_iter().collect();
        self.update(|criteria| criteria.features = features);
    }

    pub fn set_sort_mode(&self, mode: SortMode) {
        self.update(|criteria| criteria.sort_mode = mode);
    }

    pub fn set_distance_sort_enabled(&self, enabled: bool) {
        self.update(|criteria| criteria.distance_sort_enabled = enabled);
    }

    pub fn set_user_location(&self, location: Option<Coordinates>) {
        self.update(|criteria| criteria.user_location = location);
    }

    pub fn set_open_now(&self, open_now: bool) {
        self.update(|criteria| criteria.open_now = open_now);
    }

    /// Restore default facets, keeping locale and user location.
    pub fn reset(&self) {
        self.update(FilterCriteria::reset);
    }

    /// Mark the state dirty and (re)start the debounce timer.
    pub fn schedule_recompute(&self) {
        let mut state = self.inner.state.lock();
        Inner::schedule(&self.inner, &mut state);
    }

    /// Cancel any pending timer and run the pipeline immediately.
    pub fn recompute_now(&self) -> Arc<SearchResults> {
        let generation = {
            let mut state = self.inner.state.lock();
            if let Some(pending) = state.pending.take() {
                pending.abort();
            }
            state.generation += 1;
            state.generation
        };
        self.inner.run(generation);
        self.results()
    }

    /// Last published result.
    #[must_use]
    pub fn results(&self) -> Arc<SearchResults> {
        Arc::clone(&*self.inner.results.borrow())
    }

    /// Receiver notified on every publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<SearchResults>> {
        self.inner.results.subscribe()
    }

    /// True only while the pipeline is running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    #[must_use]
    pub fn loading_updates(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    /// True from a criteria change until the run that covers it publishes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.state.lock().dirty
    }

    /// Snapshot of the current criteria.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        self.inner.state.lock().criteria.clone()
    }

    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.inner.state.lock().criteria.active_filter_count()
    }

    /// Number of completed pipeline runs, including the initial one.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.inner.runs.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Wait until every pending change has been published.
    pub async fn settled(&self) -> Arc<SearchResults> {
        let mut updates = self.subscribe();
        loop {
            if !self.is_dirty() {
                return self.results();
            }
            if updates.changed().await.is_err() {
                return self.results();
            }
        }
    }

    fn update(&self, apply: impl FnOnce(&mut FilterCriteria)) {
        let mut state = self.inner.state.lock();
        apply(&mut state.criteria);
        Inner::schedule(&self.inner, &mut state);
    }
}

impl Inner {
    fn schedule(inner: &Arc<Self>, state: &mut State) {
        if let Some(pending) = state.pending.take() {
            trace!("superseding pending recompute");
            pending.abort();
        }
        state.generation += 1;
        state.dirty = true;

        let generation = state.generation;
        let delay = inner.debounce;
        let weak = Arc::downgrade(inner);
        state.pending = Some(inner.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.run(generation);
            }
        }));
        debug!(generation, delay_ms = delay.as_millis(), "recompute scheduled");
    }

    fn run(&self, generation: u64) {
        let _serial = self.compute.lock();

        let criteria = {
            let mut state = self.state.lock();
            if state.generation != generation {
                trace!(generation, current = state.generation, "skipping stale recompute");
                return;
            }
            state.pending = None;
            state.criteria.clone()
        };

        self.loading.send_replace(true);
        let started = Instant::now();
        let results = self.engine.run(&self.catalog, &criteria, self.clock.now());
        let count = results.len();

        {
            let mut state = self.state.lock();
            if state.generation == generation {
                state.dirty = false;
            }
        }
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.results.send_replace(Arc::new(results));
        self.loading.send_replace(false);

        debug!(
            generation,
            results = count,
            elapsed_us = started.elapsed().as_micros(),
            "results published"
        );
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(pending) = self.state.get_mut().pending.take() {
            pending.abort();
        }
    }
}
