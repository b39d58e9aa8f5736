//! Live data fetch: two concurrent HTTP requests joined into one snapshot.
//!
//! Both requests are issued before either is awaited. If either half fails
//! (network error, non-2xx status, non-JSON body, missing field) the whole
//! fetch fails; there is no partial result and no retry.
//!
//! Every fetch carries a [`FetchTag`]. Selecting another region or closing
//! the panel does not cancel an in-flight fetch; instead, a completion whose
//! tag no longer matches the current selection is discarded, so out-of-order
//! completions can never overwrite a newer region's panel.
//!
//! Native builds run blocking `reqwest` calls inside `IoTaskPool` tasks;
//! wasm builds go through the browser `fetch()` bridged with
//! `wasm_bindgen_futures`. The blocking client holds its pool thread for
//! the duration of the request, so on a minimal `IoTaskPool` the two
//! requests can end up serialized. That only costs latency; both are
//! still issued before either result is consumed.
//!
//! Both transports enforce the same request deadline: `reqwest`'s builder
//! timeout on native, a raced timer future on wasm.

use bevy::prelude::*;

use crate::baseline::RegionBaselines;
use crate::config::{AIR_QUALITY_API, WEATHER_API};
use crate::readings::{parse_air, parse_weather, ClimateSnapshot};
use crate::report::{build_report, FetchNotice, RegionReport};
use crate::selection::SelectedRegion;

/// Message shown to the user whenever live data could not be retrieved.
/// Deliberately a single message: which half failed is an operator detail.
pub const FETCH_FAILURE_NOTICE: &str = "Could not retrieve live weather data.";

/// Why a fetch failed. Collapsed to one user-visible notification; the
/// distinction only reaches the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure: connection, timeout, or non-2xx status.
    Network(String),
    /// The server answered but the body did not match the expected shape.
    MalformedPayload(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "network error: {e}"),
            FetchError::MalformedPayload(e) => write!(f, "malformed payload: {e}"),
        }
    }
}

/// Identity of an in-flight fetch: the region it was issued for and the
/// selection generation at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTag {
    pub region: String,
    pub generation: u64,
}

/// Monotonic counter bumped on every selection transition (click or close).
#[derive(Resource, Default)]
pub struct FetchGeneration(pub u64);

/// Weather request URL for a coordinate pair.
pub fn weather_url(lat: f64, lon: f64) -> String {
    format!(
        "{WEATHER_API}?latitude={lat}&longitude={lon}&current=temperature_2m,precipitation&timezone=auto"
    )
}

/// Air quality request URL for a coordinate pair.
pub fn air_quality_url(lat: f64, lon: f64) -> String {
    format!(
        "{AIR_QUALITY_API}?latitude={lat}&longitude={lon}&current=pm10,pm2_5,nitrogen_dioxide,ozone&timezone=auto"
    )
}

/// Join the two response bodies into a snapshot, failing as a unit.
fn join_bodies(
    weather: Result<String, String>,
    air: Result<String, String>,
) -> Result<ClimateSnapshot, FetchError> {
    let weather_body = weather.map_err(FetchError::Network)?;
    let air_body = air.map_err(FetchError::Network)?;
    let weather = parse_weather(&weather_body).map_err(FetchError::MalformedPayload)?;
    let air = parse_air(&air_body).map_err(FetchError::MalformedPayload)?;
    Ok(ClimateSnapshot { weather, air })
}

/// One outstanding fetch. Dropping it would cancel the underlying task, so
/// pending fetches are kept in [`InFlightFetches`] until they settle.
pub struct PendingFetch {
    pub tag: FetchTag,
    #[cfg(not(target_arch = "wasm32"))]
    task: bevy::tasks::Task<Result<ClimateSnapshot, FetchError>>,
    #[cfg(target_arch = "wasm32")]
    slot: std::sync::Arc<std::sync::Mutex<Option<Result<ClimateSnapshot, FetchError>>>>,
}

impl PendingFetch {
    /// Non-blocking check for completion.
    fn try_take(&mut self) -> Option<Result<ClimateSnapshot, FetchError>> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            bevy::tasks::block_on(futures_lite::future::poll_once(&mut self.task))
        }
        #[cfg(target_arch = "wasm32")]
        {
            self.slot.lock().ok()?.take()
        }
    }
}

/// All fetches that have been issued and not yet settled.
#[derive(Resource, Default)]
pub struct InFlightFetches(pub Vec<PendingFetch>);

#[cfg(not(target_arch = "wasm32"))]
async fn http_get(url: String) -> Result<String, String> {
    use crate::config::FETCH_TIMEOUT_SECS;

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| e.to_string())?;
    let response = client.get(&url).send().map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {status} from {url}"));
    }
    response.text().map_err(|e| e.to_string())
}

/// Issue both requests for the click coordinate and register the pending
/// fetch. Earlier fetches stay in flight; their results are discarded by tag.
#[cfg(not(target_arch = "wasm32"))]
pub fn begin_fetch(fetches: &mut InFlightFetches, tag: FetchTag, lat: f64, lon: f64) {
    let pool = bevy::tasks::IoTaskPool::get();
    // Spawned before the join task awaits either, so the two requests
    // run concurrently.
    let weather = pool.spawn(http_get(weather_url(lat, lon)));
    let air = pool.spawn(http_get(air_quality_url(lat, lon)));
    let task = pool.spawn(async move { join_bodies(weather.await, air.await) });
    fetches.0.push(PendingFetch { tag, task });
}

#[cfg(target_arch = "wasm32")]
pub mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    /// Fetch a URL as text via the browser `fetch()` API.
    pub async fn fetch_text(url: &str) -> Result<String, String> {
        let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;
        let response_value = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| format!("fetch failed: {e:?}"))?;

        let response: web_sys::Response = response_value
            .dyn_into()
            .map_err(|_| "failed to cast fetch response".to_string())?;

        if !response.ok() {
            return Err(format!("HTTP {} while fetching {}", response.status(), url));
        }

        let text_promise = response
            .text()
            .map_err(|e| format!("response.text() failed: {e:?}"))?;
        let text_value = JsFuture::from(text_promise)
            .await
            .map_err(|e| format!("await response text failed: {e:?}"))?;
        text_value
            .as_string()
            .ok_or_else(|| "response text was not a string".to_string())
    }

    /// Resolve after `ms` milliseconds via `setTimeout`. Resolves
    /// immediately when no window is available rather than hanging.
    async fn sleep_ms(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().and_then(|window| {
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .ok()
            });
            if scheduled.is_none() {
                let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }

    /// [`fetch_text`] raced against a timer. The browser `fetch()` has no
    /// built-in deadline, so a dead network would otherwise leave the
    /// request pending forever.
    pub async fn fetch_text_with_deadline(url: &str, timeout_secs: u64) -> Result<String, String> {
        let fetch = fetch_text(url);
        let deadline = async {
            sleep_ms((timeout_secs * 1000) as i32).await;
            Err(format!("timed out after {timeout_secs}s fetching {url}"))
        };
        futures_lite::future::or(fetch, deadline).await
    }
}

#[cfg(target_arch = "wasm32")]
pub fn begin_fetch(fetches: &mut InFlightFetches, tag: FetchTag, lat: f64, lon: f64) {
    use std::sync::{Arc, Mutex};

    use crate::config::FETCH_TIMEOUT_SECS;

    let slot = Arc::new(Mutex::new(None));
    let out = slot.clone();
    let w_url = weather_url(lat, lon);
    let a_url = air_quality_url(lat, lon);
    wasm_bindgen_futures::spawn_local(async move {
        // `zip` drives both futures together; neither waits for the other.
        let (weather, air) = futures_lite::future::zip(
            web::fetch_text_with_deadline(&w_url, FETCH_TIMEOUT_SECS),
            web::fetch_text_with_deadline(&a_url, FETCH_TIMEOUT_SECS),
        )
        .await;
        let result = join_bodies(weather, air);
        if let Ok(mut guard) = out.lock() {
            *guard = Some(result);
        }
    });
    fetches.0.push(PendingFetch { tag, slot });
}

/// A settled fetch is applied only while its tag matches the live selection.
fn tag_is_current(tag: &FetchTag, selected: &SelectedRegion, generation: &FetchGeneration) -> bool {
    generation.0 == tag.generation && selected.0.as_deref() == Some(tag.region.as_str())
}

/// Poll outstanding fetches each frame; apply current completions to the
/// report, surface failures as a notice, and silently drop stale results.
pub fn poll_in_flight_fetches(
    mut fetches: ResMut<InFlightFetches>,
    selected: Res<SelectedRegion>,
    generation: Res<FetchGeneration>,
    baselines: Res<RegionBaselines>,
    mut report: ResMut<RegionReport>,
    mut notice: ResMut<FetchNotice>,
) {
    let mut settled = Vec::new();
    let pending: Vec<PendingFetch> = fetches
        .0
        .drain(..)
        .filter_map(|mut fetch| match fetch.try_take() {
            Some(result) => {
                settled.push((fetch.tag, result));
                None
            }
            None => Some(fetch),
        })
        .collect();
    fetches.0 = pending;

    for (tag, result) in settled {
        if !tag_is_current(&tag, &selected, &generation) {
            info!(
                "discarding stale fetch for '{}' (generation {})",
                tag.region, tag.generation
            );
            continue;
        }
        match result {
            Ok(snapshot) => {
                let baseline = baselines.get(&tag.region);
                report.0 = Some(build_report(&tag.region, &snapshot, baseline));
                notice.0 = None;
            }
            Err(e) => {
                error!("live data fetch failed for '{}': {e}", tag.region);
                // The previous report, if any, stays on screen.
                notice.0 = Some(FETCH_FAILURE_NOTICE.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER_BODY: &str =
        r#"{ "current": { "temperature_2m": 20.0, "precipitation": 0.0 } }"#;
    const AIR_BODY: &str =
        r#"{ "current": { "pm10": 10.0, "pm2_5": 5.0, "nitrogen_dioxide": 10.0, "ozone": 40.0 } }"#;

    #[test]
    fn test_urls_carry_coordinates_and_fields() {
        let w = weather_url(46.6, 1.88);
        assert!(w.starts_with(WEATHER_API));
        assert!(w.contains("latitude=46.6"));
        assert!(w.contains("longitude=1.88"));
        assert!(w.contains("current=temperature_2m,precipitation"));

        let a = air_quality_url(46.6, 1.88);
        assert!(a.starts_with(AIR_QUALITY_API));
        assert!(a.contains("current=pm10,pm2_5,nitrogen_dioxide,ozone"));
    }

    #[test]
    fn test_join_succeeds_on_two_good_bodies() {
        let snapshot = join_bodies(Ok(WEATHER_BODY.to_string()), Ok(AIR_BODY.to_string())).unwrap();
        assert_eq!(snapshot.weather.temperature_c, 20.0);
        assert_eq!(snapshot.air.pm2_5, 5.0);
    }

    #[test]
    fn test_join_fails_as_a_unit_when_air_fails() {
        // Weather succeeded; the overall fetch must still fail.
        let result = join_bodies(
            Ok(WEATHER_BODY.to_string()),
            Err("connection refused".to_string()),
        );
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[test]
    fn test_join_fails_on_malformed_weather() {
        let result = join_bodies(Ok("{}".to_string()), Ok(AIR_BODY.to_string()));
        assert!(matches!(result, Err(FetchError::MalformedPayload(_))));
    }

    #[test]
    fn test_deadline_wins_over_stalled_request() {
        // A request that never completes must resolve through the deadline
        // arm, and the timeout message must fail the join as a network error.
        let stalled = futures_lite::future::pending::<Result<String, String>>();
        let deadline = async { Err("timed out after 10s".to_string()) };
        let body = bevy::tasks::block_on(futures_lite::future::or(stalled, deadline));
        let result = join_bodies(body, Ok(AIR_BODY.to_string()));
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[test]
    fn test_tag_current_requires_generation_and_region() {
        let selected = SelectedRegion(Some("Bretagne".to_string()));
        let generation = FetchGeneration(3);
        let current = FetchTag {
            region: "Bretagne".to_string(),
            generation: 3,
        };
        let stale_generation = FetchTag {
            region: "Bretagne".to_string(),
            generation: 2,
        };
        let other_region = FetchTag {
            region: "Corse".to_string(),
            generation: 3,
        };
        assert!(tag_is_current(&current, &selected, &generation));
        assert!(!tag_is_current(&stale_generation, &selected, &generation));
        assert!(!tag_is_current(&other_region, &selected, &generation));
        assert!(!tag_is_current(
            &current,
            &SelectedRegion(None),
            &generation
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod poll {
        use super::*;
        use bevy::ecs::system::RunSystemOnce;
        use bevy::tasks::{IoTaskPool, TaskPool};

        fn pending(region: &str, generation: u64, result: Result<String, String>) -> PendingFetch {
            let pool = IoTaskPool::get_or_init(TaskPool::new);
            let air = AIR_BODY.to_string();
            PendingFetch {
                tag: FetchTag {
                    region: region.to_string(),
                    generation,
                },
                task: pool.spawn(async move { join_bodies(result, Ok(air)) }),
            }
        }

        fn world_with(selected: Option<&str>, generation: u64, fetch: PendingFetch) -> World {
            let mut world = World::new();
            world.insert_resource(SelectedRegion(selected.map(str::to_string)));
            world.insert_resource(FetchGeneration(generation));
            world.insert_resource(RegionBaselines::default());
            world.insert_resource(RegionReport::default());
            world.insert_resource(FetchNotice::default());
            world.insert_resource(InFlightFetches(vec![fetch]));
            world
        }

        fn settle(world: &mut World) {
            // The join task has no real I/O, so it settles after a few polls.
            for _ in 0..100 {
                world
                    .run_system_once(poll_in_flight_fetches)
                    .expect("poll system runs");
                if world.resource::<InFlightFetches>().0.is_empty() {
                    return;
                }
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            panic!("fetch task never settled");
        }

        #[test]
        fn test_current_completion_updates_report() {
            let fetch = pending("Bretagne", 1, Ok(WEATHER_BODY.to_string()));
            let mut world = world_with(Some("Bretagne"), 1, fetch);
            settle(&mut world);

            let report = world.resource::<RegionReport>();
            let data = report.0.as_ref().expect("report populated");
            assert_eq!(data.region, "Bretagne");
            assert_eq!(data.score, 100);
            assert!(world.resource::<FetchNotice>().0.is_none());
        }

        #[test]
        fn test_stale_completion_is_discarded() {
            // Fetch issued at generation 1, selection has since moved on.
            let fetch = pending("Bretagne", 1, Ok(WEATHER_BODY.to_string()));
            let mut world = world_with(Some("Corse"), 2, fetch);
            settle(&mut world);

            assert!(world.resource::<RegionReport>().0.is_none());
            assert!(world.resource::<FetchNotice>().0.is_none());
        }

        #[test]
        fn test_failure_sets_notice_and_keeps_report() {
            let fetch = pending("Bretagne", 1, Err("timeout".to_string()));
            let mut world = world_with(Some("Bretagne"), 1, fetch);
            settle(&mut world);

            assert!(world.resource::<RegionReport>().0.is_none());
            assert_eq!(
                world.resource::<FetchNotice>().0.as_deref(),
                Some(FETCH_FAILURE_NOTICE)
            );
        }
    }
}
