//! Live route/ETA estimation for one active delivery
//!
//! Maintains the latest route snapshot for a delivery, refreshing it on a
//! fixed cadence (traffic changes) and immediately when the driver moves or
//! an endpoint changes. The origin is re-selected on every refresh: the
//! driver's live location when present, otherwise the shop's fixed
//! coordinate, so the estimate transitions smoothly from "awaiting pickup"
//! to "in transit".
//!
//! A routing failure never clears the display: the last good snapshot stays
//! published with a stale flag until the next successful refresh. Each
//! refresh cycle carries a generation number; a response is applied only if
//! its generation is still current, so a late response for a superseded or
//! torn-down delivery is discarded without locking around the request.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use domain::entities::{OriginKind, RouteSnapshot};
use domain::value_objects::{BoundingBox, GeoPoint, haversine_km};
use parking_lot::{Mutex, RwLock};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::ports::RoutingPort;

/// Lifecycle of a tracked delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// No shop/customer coordinates yet; no network activity
    Idle,
    /// Endpoints known, no successful route yet; retried every tick
    Resolving,
    /// Holding a route snapshot, refreshed periodically
    Active,
    /// Torn down; timer cancelled, no further requests
    Stopped,
}

/// Configuration for the route estimator
#[derive(Debug, Clone, Copy)]
pub struct TrackingConfig {
    /// Seconds between periodic refreshes
    pub refresh_interval_secs: u64,
    /// Minimum driver displacement (km) from the last used origin that
    /// counts as a meaningful move and triggers an immediate refresh
    pub min_driver_move_km: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            min_driver_move_km: 0.01,
        }
    }
}

#[derive(Debug)]
struct EstimatorState {
    tracking: TrackingState,
    shop: Option<GeoPoint>,
    customer: Option<GeoPoint>,
    driver: Option<GeoPoint>,
    /// Origin used by the last applied refresh
    last_origin: Option<GeoPoint>,
    stale: bool,
}

struct Inner {
    routing: Arc<dyn RoutingPort>,
    config: TrackingConfig,
    state: RwLock<EstimatorState>,
    snapshot: ArcSwapOption<RouteSnapshot>,
    generation: AtomicU64,
    refresh_notify: Notify,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Route/ETA estimator for one active delivery
pub struct RouteEstimator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for RouteEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEstimator")
            .field("state", &self.state())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl RouteEstimator {
    /// Create an estimator in `Idle`; call [`Self::start`] to begin the
    /// periodic refresh loop
    #[must_use]
    pub fn new(routing: Arc<dyn RoutingPort>, config: TrackingConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                routing,
                config,
                state: RwLock::new(EstimatorState {
                    tracking: TrackingState::Idle,
                    shop: None,
                    customer: None,
                    driver: None,
                    last_origin: None,
                    stale: false,
                }),
                snapshot: ArcSwapOption::const_empty(),
                generation: AtomicU64::new(0),
                refresh_notify: Notify::new(),
                task: Mutex::new(None),
            }),
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> TrackingState {
        self.inner.state.read().tracking
    }

    /// The latest published snapshot, if any
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<RouteSnapshot>> {
        self.inner.snapshot.load_full()
    }

    /// Whether the published snapshot is stale (last refresh failed)
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.inner.state.read().stale
    }

    /// Set (or change) the shop and customer coordinates
    ///
    /// Moves `Idle` to `Resolving` and triggers an immediate refresh,
    /// superseding any request already in flight. Ignored after
    /// [`Self::stop`].
    pub fn set_endpoints(&self, shop: GeoPoint, customer: GeoPoint) {
        {
            let mut state = self.inner.state.write();
            if state.tracking == TrackingState::Stopped {
                return;
            }
            state.shop = Some(shop);
            state.customer = Some(customer);
            if state.tracking == TrackingState::Idle {
                state.tracking = TrackingState::Resolving;
            }
        }
        self.trigger_refresh();
    }

    /// Feed a driver location update from the tracking feed
    ///
    /// Triggers an immediate refresh when the driver has moved meaningfully
    /// from the origin used by the last refresh (or when no refresh has
    /// used a driver origin yet).
    pub fn update_driver_location(&self, driver: GeoPoint) {
        let moved = {
            let mut state = self.inner.state.write();
            if state.tracking == TrackingState::Stopped {
                return;
            }
            state.driver = Some(driver);
            state.last_origin.is_none_or(|origin| {
                haversine_km(&driver, &origin) >= self.inner.config.min_driver_move_km
            })
        };
        if moved {
            self.trigger_refresh();
        }
    }

    /// Drop the driver location; the next refresh falls back to the shop
    /// origin
    pub fn clear_driver_location(&self) {
        let had_driver = {
            let mut state = self.inner.state.write();
            if state.tracking == TrackingState::Stopped {
                return;
            }
            state.driver.take().is_some()
        };
        if had_driver {
            self.trigger_refresh();
        }
    }

    /// Spawn the periodic refresh loop (no-op if already running)
    pub fn start(&self) {
        let mut task = self.inner.task.lock();
        if task.is_some() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        *task = Some(tokio::spawn(async move {
            let interval = Duration::from_secs(inner.config.refresh_interval_secs);
            loop {
                tokio::select! {
                    () = tokio::time::sleep(interval) => {},
                    () = inner.refresh_notify.notified() => {},
                }
                if inner.state.read().tracking == TrackingState::Stopped {
                    break;
                }
                inner.refresh().await;
            }
        }));
    }

    /// Run one refresh cycle right now, superseding any in-flight request
    pub async fn refresh_now(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.refresh().await;
    }

    /// Tear the estimator down deterministically
    ///
    /// Cancels the timer task, bumps the generation so any response still in
    /// flight is discarded, and enters `Stopped`. Terminal.
    pub fn stop(&self) {
        self.inner.state.write().tracking = TrackingState::Stopped;
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(handle) = self.inner.task.lock().take() {
            handle.abort();
        }
    }

    fn trigger_refresh(&self) {
        // Supersede whatever is in flight, then wake the loop
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.refresh_notify.notify_one();
    }
}

impl Inner {
    #[instrument(skip(self))]
    async fn refresh(&self) {
        let generation = self.generation.load(Ordering::Acquire);

        let (origin, origin_kind, shop, customer, driver) = {
            let state = self.state.read();
            if matches!(
                state.tracking,
                TrackingState::Idle | TrackingState::Stopped
            ) {
                return;
            }
            let (Some(shop), Some(customer)) = (state.shop, state.customer) else {
                return;
            };
            // Origin selection is re-evaluated on every refresh
            let (origin, kind) = state
                .driver
                .map_or((shop, OriginKind::Shop), |d| (d, OriginKind::Driver));
            (origin, kind, shop, customer, state.driver)
        };

        let result = self.routing.route(&origin, &customer).await;

        if self.generation.load(Ordering::Acquire) != generation {
            debug!("Discarding superseded route response");
            return;
        }

        let mut state = self.state.write();
        if state.tracking == TrackingState::Stopped {
            return;
        }

        match result {
            Ok(leg) => {
                // Shop and customer make the point set non-empty even when
                // the provider returns no geometry
                let points = leg
                    .geometry
                    .iter()
                    .copied()
                    .chain([shop, customer])
                    .chain(driver);
                let Some(bounding_box) = BoundingBox::from_points(points) else {
                    return;
                };

                let now = Utc::now();
                // chrono rejects offsets beyond i64::MAX milliseconds; an
                // absurd provider duration collapses to a zero offset
                // instead of panicking the refresh loop
                let eta_offset = i64::try_from(leg.duration_secs)
                    .ok()
                    .and_then(chrono::Duration::try_seconds)
                    .unwrap_or_else(chrono::Duration::zero);
                let snapshot = RouteSnapshot {
                    origin_kind,
                    distance_text: leg.distance_text,
                    duration_text: leg.duration_text,
                    duration_secs: leg.duration_secs,
                    eta: now + eta_offset,
                    bounding_box,
                    generated_at: now,
                };

                state.last_origin = Some(origin);
                state.stale = false;
                state.tracking = TrackingState::Active;
                drop(state);

                debug!(?origin_kind, "Published route snapshot");
                self.snapshot.store(Some(Arc::new(snapshot)));
            },
            Err(e) => {
                // Keep the last good snapshot for display continuity; the
                // next tick retries at the normal cadence
                warn!(error = %e, "Route refresh failed");
                if state.tracking == TrackingState::Active {
                    state.stale = true;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::{MockRoutingPort, RouteLeg};

    fn shop() -> GeoPoint {
        GeoPoint::new_unchecked(52.52, 13.405)
    }

    fn customer() -> GeoPoint {
        GeoPoint::new_unchecked(52.50, 13.35)
    }

    fn leg() -> RouteLeg {
        RouteLeg {
            distance_text: "4.2km".to_string(),
            duration_text: "18min".to_string(),
            duration_secs: 1080,
            geometry: vec![shop(), customer()],
        }
    }

    fn estimator_with(mock: MockRoutingPort) -> RouteEstimator {
        RouteEstimator::new(Arc::new(mock), TrackingConfig::default())
    }

    #[tokio::test]
    async fn idle_without_endpoints() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().times(0);
        let estimator = estimator_with(mock);

        assert_eq!(estimator.state(), TrackingState::Idle);
        estimator.refresh_now().await;
        assert!(estimator.snapshot().is_none());
        assert_eq!(estimator.state(), TrackingState::Idle);
    }

    #[tokio::test]
    async fn resolving_becomes_active_on_success() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _| Ok(leg()));
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        assert_eq!(estimator.state(), TrackingState::Resolving);

        estimator.refresh_now().await;
        assert_eq!(estimator.state(), TrackingState::Active);

        let snapshot = estimator.snapshot().expect("snapshot published");
        assert_eq!(snapshot.origin_kind, OriginKind::Shop);
        assert_eq!(snapshot.duration_secs, 1080);
        assert!(!estimator.is_stale());
    }

    #[tokio::test]
    async fn resolving_stays_resolving_on_failure() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route()
            .returning(|_, _| Err(ApplicationError::ProviderUnavailable("down".to_string())));
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.refresh_now().await;

        assert_eq!(estimator.state(), TrackingState::Resolving);
        assert!(estimator.snapshot().is_none());
    }

    #[tokio::test]
    async fn eta_derived_from_duration() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _| Ok(leg()));
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.refresh_now().await;

        let snapshot = estimator.snapshot().expect("snapshot");
        let offset = (snapshot.eta - snapshot.generated_at).num_seconds();
        assert_eq!(offset, 1080);
    }

    #[tokio::test]
    async fn origin_switches_to_driver_on_next_refresh() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _| Ok(leg()));
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.refresh_now().await;
        assert_eq!(
            estimator.snapshot().expect("snapshot").origin_kind,
            OriginKind::Shop
        );

        let driver = GeoPoint::new_unchecked(52.51, 13.38);
        estimator.update_driver_location(driver);
        estimator.refresh_now().await;

        let snapshot = estimator.snapshot().expect("snapshot");
        assert_eq!(snapshot.origin_kind, OriginKind::Driver);
        assert!(snapshot.bounding_box.contains(&driver));
    }

    #[tokio::test]
    async fn origin_falls_back_to_shop_when_driver_cleared() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _| Ok(leg()));
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.update_driver_location(GeoPoint::new_unchecked(52.51, 13.38));
        estimator.refresh_now().await;
        assert_eq!(
            estimator.snapshot().expect("snapshot").origin_kind,
            OriginKind::Driver
        );

        estimator.clear_driver_location();
        estimator.refresh_now().await;
        assert_eq!(
            estimator.snapshot().expect("snapshot").origin_kind,
            OriginKind::Shop
        );
    }

    #[tokio::test]
    async fn failure_during_active_keeps_snapshot_and_marks_stale() {
        let mut mock = MockRoutingPort::new();
        let mut fail = false;
        mock.expect_route().returning(move |_, _| {
            if fail {
                Err(ApplicationError::ProviderUnavailable("down".to_string()))
            } else {
                fail = true;
                Ok(leg())
            }
        });
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.refresh_now().await;
        let first = estimator.snapshot().expect("snapshot");
        assert!(!estimator.is_stale());

        estimator.refresh_now().await;
        let second = estimator.snapshot().expect("snapshot survives failure");
        assert_eq!(first.generated_at, second.generated_at);
        assert!(estimator.is_stale());
        assert_eq!(estimator.state(), TrackingState::Active);
    }

    #[tokio::test]
    async fn success_clears_stale_flag() {
        let mut mock = MockRoutingPort::new();
        let mut calls = 0_u32;
        mock.expect_route().returning(move |_, _| {
            calls += 1;
            if calls == 2 {
                Err(ApplicationError::ProviderUnavailable("blip".to_string()))
            } else {
                Ok(leg())
            }
        });
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.refresh_now().await;
        estimator.refresh_now().await;
        assert!(estimator.is_stale());

        estimator.refresh_now().await;
        assert!(!estimator.is_stale());
    }

    #[tokio::test]
    async fn stop_is_terminal() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _| Ok(leg()));
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.refresh_now().await;
        estimator.stop();
        assert_eq!(estimator.state(), TrackingState::Stopped);

        // Updates after teardown are ignored
        estimator.set_endpoints(shop(), customer());
        estimator.update_driver_location(GeoPoint::new_unchecked(52.51, 13.38));
        assert_eq!(estimator.state(), TrackingState::Stopped);

        let before = estimator.snapshot();
        estimator.refresh_now().await;
        let after = estimator.snapshot();
        assert_eq!(
            before.map(|s| s.generated_at),
            after.map(|s| s.generated_at)
        );
    }

    #[tokio::test]
    async fn small_driver_move_does_not_supersede() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _| Ok(leg()));
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.update_driver_location(GeoPoint::new_unchecked(52.51, 13.38));
        estimator.refresh_now().await;

        let generation_before = estimator.inner.generation.load(Ordering::Acquire);
        // ~1 m displacement, below the 10 m default threshold
        estimator.update_driver_location(GeoPoint::new_unchecked(52.510_01, 13.38));
        let generation_after = estimator.inner.generation.load(Ordering::Acquire);
        assert_eq!(generation_before, generation_after);
    }

    #[tokio::test]
    async fn absurd_duration_does_not_kill_refresh() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _| {
            Ok(RouteLeg {
                duration_secs: u64::MAX,
                ..leg()
            })
        });
        let estimator = estimator_with(mock);

        estimator.set_endpoints(shop(), customer());
        estimator.refresh_now().await;

        // The snapshot is still published; the unusable offset degrades the
        // ETA instead of panicking the loop
        let snapshot = estimator.snapshot().expect("snapshot published");
        assert!(snapshot.eta >= snapshot.generated_at);
        assert_eq!(estimator.state(), TrackingState::Active);
    }

    /// Routing port that parks every request until released, so a test can
    /// supersede a request while it is in flight
    struct GatedRouting {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl RoutingPort for GatedRouting {
        async fn route(
            &self,
            _origin: &GeoPoint,
            _destination: &GeoPoint,
        ) -> Result<RouteLeg, ApplicationError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(leg())
        }
    }

    #[tokio::test]
    async fn superseded_in_flight_response_is_discarded() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let estimator = Arc::new(RouteEstimator::new(
            Arc::new(GatedRouting {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
            }),
            TrackingConfig::default(),
        ));
        estimator.set_endpoints(shop(), customer());

        let refresh = tokio::spawn({
            let estimator = Arc::clone(&estimator);
            async move { estimator.refresh_now().await }
        });
        entered.notified().await;

        // Bump the generation while the request is parked
        estimator.update_driver_location(GeoPoint::new_unchecked(52.51, 13.38));
        release.notify_one();
        refresh.await.expect("refresh task");

        assert!(estimator.snapshot().is_none());
        assert_eq!(estimator.state(), TrackingState::Resolving);
    }

    #[tokio::test]
    async fn stop_discards_in_flight_response() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let estimator = Arc::new(RouteEstimator::new(
            Arc::new(GatedRouting {
                entered: Arc::clone(&entered),
                release: Arc::clone(&release),
            }),
            TrackingConfig::default(),
        ));
        estimator.set_endpoints(shop(), customer());

        let refresh = tokio::spawn({
            let estimator = Arc::clone(&estimator);
            async move { estimator.refresh_now().await }
        });
        entered.notified().await;

        estimator.stop();
        release.notify_one();
        refresh.await.expect("refresh task");

        assert!(estimator.snapshot().is_none());
        assert_eq!(estimator.state(), TrackingState::Stopped);
    }

    #[tokio::test]
    async fn start_runs_initial_refresh_via_notify() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _| Ok(leg()));
        let estimator = estimator_with(mock);

        estimator.start();
        estimator.set_endpoints(shop(), customer());

        // The notified loop performs the first refresh in the background
        for _ in 0..50 {
            if estimator.snapshot().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(estimator.snapshot().is_some());
        assert_eq!(estimator.state(), TrackingState::Active);
        estimator.stop();
    }
}
