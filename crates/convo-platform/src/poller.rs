//! Periodic backend availability probe.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use log::{debug, info};
use wasm_bindgen_futures::spawn_local;

use convo_core::dispatcher::ChatService;
use convo_core::probe::HealthProbe;
use convo_core::session::SessionController;
use convo_types::config::ClientConfig;

use crate::timer::{poll_interval_millis, MAX_TIMER_MS};

/// Handle to a running poll loop. The loop stops at its next tick once
/// [`stop`](Self::stop) is called or the handle is dropped.
pub struct HealthPoller {
    stopped: Rc<Cell<bool>>,
}

impl HealthPoller {
    /// Probe every `interval_ms` and record the result into `session`.
    ///
    /// A send in flight holds the session borrowed; a tick that finds it
    /// borrowed skips recording and the next tick catches up.
    pub fn spawn(
        session: Rc<RefCell<SessionController>>,
        service: Rc<ChatService>,
        interval_ms: u32,
    ) -> Self {
        let interval_ms = interval_ms.clamp(1, MAX_TIMER_MS);
        let stopped = Rc::new(Cell::new(false));
        let flag = stopped.clone();
        let probe = HealthProbe;

        spawn_local(async move {
            info!("Health poller started ({}ms)", interval_ms);
            loop {
                TimeoutFuture::new(interval_ms).await;
                if flag.get() {
                    break;
                }

                let available = probe.check(&service).await;
                if flag.get() {
                    break;
                }

                match session.try_borrow_mut() {
                    Ok(mut session) => {
                        session.record_availability(available, service.backend().base_url());
                    }
                    Err(_) => debug!("Session busy, skipping availability update"),
                }
            }
            debug!("Health poller stopped");
        });

        Self { stopped }
    }

    pub fn from_config(
        session: Rc<RefCell<SessionController>>,
        service: Rc<ChatService>,
        config: &ClientConfig,
    ) -> Self {
        Self::spawn(session, service, poll_interval_millis(config.health_interval_ms))
    }

    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
