use actix_web::{web, HttpResponse};
use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::cache::ScheduleCache;
use crate::config::Config;
use crate::domain::solve::solve_schedule;
use crate::domain::solver_factory::create_solver;
use crate::error::ScheduleError;
use crate::models::{Schedule, ScheduleRequest, ScheduleResponse};

/// Shared, read-only service state. Holds no solver: one is created per request.
pub struct AppState {
    pub config: Config,
    pub cache: ScheduleCache,
    /// One permit per solve allowed to run on the blocking pool at a time.
    pub solve_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let cache = ScheduleCache::new(config.cache_size);
        let solve_slots = Arc::new(Semaphore::new(config.max_concurrent_solves.max(1)));
        AppState {
            config,
            cache,
            solve_slots,
        }
    }
}

/// POST /schedule
pub async fn schedule(
    state: web::Data<AppState>,
    req: web::Json<ScheduleRequest>,
) -> Result<HttpResponse, ScheduleError> {
    let req = req.into_inner();
    let key = ScheduleCache::key(&req);

    if let Some(schedule) = key.as_deref().and_then(|k| state.cache.get(k)) {
        debug!("Serving schedule from cache");
        return Ok(HttpResponse::Ok().json(ScheduleResponse { schedule }));
    }

    let solver_type = state.config.solver;
    let options = state.config.solver_options();

    let job = move || {
        let solver = create_solver(solver_type, options);
        solve_schedule(&req, solver.as_ref())
    };
    let schedule = run_solve(state.solve_slots.clone(), state.config.solve_timeout(), job)
        .await
        .inspect_err(|e| warn!("Schedule request failed: {}", e))?;

    if let Some(key) = key {
        state.cache.put(key, schedule.clone());
    }

    Ok(HttpResponse::Ok().json(ScheduleResponse { schedule }))
}

/// Runs `job` on the blocking pool once a slot is free, giving up after `timeout`.
///
/// The timeout covers the wait for a slot as well as the solve. A solve that
/// times out keeps running to completion on its thread and holds its slot
/// until then, so at most `slots` solves ever occupy the pool.
pub async fn run_solve<F>(
    slots: Arc<Semaphore>,
    timeout: Duration,
    job: F,
) -> Result<Schedule, ScheduleError>
where
    F: FnOnce() -> Result<Schedule, ScheduleError> + Send + 'static,
{
    let guarded = async move {
        let permit = slots
            .acquire_owned()
            .await
            .map_err(|e| ScheduleError::Solver(format!("solver slots closed: {}", e)))?;

        web::block(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| {
            error!("Solver thread failed: {}", e);
            ScheduleError::Solver(format!("solver thread failed: {}", e))
        })?
    };

    match tokio::time::timeout(timeout, guarded).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Solve exceeded {:?}, giving up", timeout);
            Err(ScheduleError::Timeout(timeout.as_secs()))
        }
    }
}
