//! Message rendering and delivery, inline or on a worker pool.
//!
//! [`Delivery`] performs the whole flatten, build and send sequence for one
//! record. In synchronous mode the handler calls it directly; otherwise
//! [`Dispatcher`] queues a [`Job`] onto a channel drained by a fixed set of
//! detached worker threads, which caps concurrent webhook requests. The
//! channel is unbounded unless a capacity is configured, in which case a
//! full queue drops the job with a warning. Workers exit once every handler
//! sharing the dispatcher is dropped and the queue is empty; nothing joins
//! them, so jobs still queued when the process exits are lost.

use std::{
    io,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};
use log::warn;
use parking_lot::{Condvar, Mutex};

use crate::{
    attr::Attr,
    color::ColorMap,
    embed::{EmbedBuilder, SharedMessageBuilder, WebhookMessage},
    flatten::flatten_record_attrs,
    log_record::FemtoLogRecord,
    rate_limited_warner::RateLimitedWarner,
    webhook::SharedClient,
};

/// One queued delivery: the record plus the handler context it was logged
/// through.
pub(crate) struct Job {
    pub(crate) record: FemtoLogRecord,
    pub(crate) groups: Arc<[String]>,
    pub(crate) attrs: Arc<[Attr]>,
}

/// Renders records into webhook messages and sends them.
pub(crate) struct Delivery {
    client: SharedClient,
    color_map: ColorMap,
    builder: SharedMessageBuilder,
    warner: RateLimitedWarner,
}

impl Delivery {
    pub(crate) fn new(
        client: SharedClient,
        color_map: ColorMap,
        builder: SharedMessageBuilder,
        warner: RateLimitedWarner,
    ) -> Self {
        Self {
            client,
            color_map,
            builder,
            warner,
        }
    }

    /// Flatten the context and record attributes, then build the message.
    pub(crate) fn render(
        &self,
        record: &FemtoLogRecord,
        groups: &[String],
        attrs: &[Attr],
    ) -> WebhookMessage {
        let flat = flatten_record_attrs(groups, attrs, &record.attrs);
        let mut draft = EmbedBuilder::new();
        draft.set_color(self.color_map.color_for(record.level));
        let embed = self.builder.build(record, &flat, &mut draft);
        WebhookMessage::from_embed(embed)
    }

    /// Render and send. Failures are counted and warned about, never
    /// returned.
    pub(crate) fn deliver(&self, record: &FemtoLogRecord, groups: &[String], attrs: &[Attr]) -> bool {
        let message = self.render(record, groups, attrs);
        match self.client.create_message(&message) {
            Ok(_) => true,
            Err(err) => {
                self.warner.record_drop();
                self.warner.warn_if_due(|count| {
                    warn!("FemtoDiscordHandler failed to deliver {count} messages; last error: {err}");
                });
                false
            }
        }
    }

    /// Count a message lost for `reason` and warn if the interval allows.
    fn warn_lost(&self, reason: &str) {
        self.warner.record_drop();
        self.warner.warn_if_due(|count| {
            warn!("FemtoDiscordHandler {reason}; dropped {count} messages");
        });
    }

    /// Warn now about failures and drops not yet reported.
    pub(crate) fn report_pending(&self) {
        self.warner.flush(|count| {
            warn!("FemtoDiscordHandler lost {count} messages since the last warning");
        });
    }
}

/// Count of submitted jobs not yet finished.
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn add(&self) {
        *self.count.lock() += 1;
    }

    fn done(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.count.lock();
        while *count > 0 {
            if self.idle.wait_until(&mut count, deadline).timed_out() {
                return *count == 0;
            }
        }
        true
    }
}

/// Fixed-size worker pool for asynchronous delivery.
pub(crate) struct Dispatcher {
    tx: Sender<Job>,
    pending: Arc<Pending>,
    delivery: Arc<Delivery>,
}

impl Dispatcher {
    /// Spawn `workers` detached threads draining the queue. With
    /// `capacity` set, at most that many jobs wait in the queue.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub(crate) fn spawn(
        delivery: Arc<Delivery>,
        workers: usize,
        capacity: Option<usize>,
    ) -> io::Result<Self> {
        let (tx, rx) = match capacity {
            Some(capacity) => bounded::<Job>(capacity),
            None => unbounded::<Job>(),
        };
        let pending = Arc::new(Pending::default());
        for idx in 0..workers {
            let rx = rx.clone();
            let delivery = Arc::clone(&delivery);
            let pending = Arc::clone(&pending);
            thread::Builder::new()
                .name(format!("femtologging-discord-{idx}"))
                .spawn(move || worker_loop(&rx, &delivery, &pending))?;
        }
        Ok(Self {
            tx,
            pending,
            delivery,
        })
    }

    /// Queue `job` without blocking. Returns `false` if it was dropped,
    /// which only happens with a bounded queue or after the workers died.
    pub(crate) fn submit(&self, job: Job) -> bool {
        self.pending.add();
        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.pending.done();
                self.delivery.warn_lost("queue full");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                self.pending.done();
                self.delivery.warn_lost("workers gone");
                false
            }
        }
    }

    /// Wait until every submitted job has finished or `timeout` elapses.
    pub(crate) fn flush(&self, timeout: Duration) -> bool {
        self.pending.wait_idle(timeout)
    }
}

fn worker_loop(rx: &Receiver<Job>, delivery: &Delivery, pending: &Pending) {
    for job in rx.iter() {
        // A panicking message builder or client must not take the worker
        // down with it.
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            delivery.deliver(&job.record, &job.groups, &job.attrs)
        }));
        if outcome.is_err() {
            delivery.warn_lost("delivery panicked");
        }
        pending.done();
    }
}
