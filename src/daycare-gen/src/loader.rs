use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use rand::Rng;
use tracing::debug;
use tracing::info;

use crate::batch::batch_count;
use crate::batch::batches;
use crate::batch::DEFAULT_BATCH_SIZE;
use crate::builder::event_windows;
use crate::builder::ChildProvider;
use crate::builder::EventProvider;
use crate::builder::StaffProvider;
use crate::error::Error;
use crate::error::Result;
use crate::store::insert_records;
use crate::store::Store;
use crate::COLLECTION_CHILDREN;
use crate::COLLECTION_EVENTS;
use crate::COLLECTION_STAFF;

pub const DEFAULT_NUM_CHILDREN: usize = 10_000;
pub const DEFAULT_NUM_STAFF: usize = 100;
pub const DEFAULT_EVENTS_PER_CHILD: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub num_children: usize,
    pub num_staff: usize,
    pub events_per_child: usize,
    pub batch_size: usize,
    pub generate_old_events: bool,
    /// Reference instant every generated date is relative to.
    pub now: DateTime<Utc>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_children: DEFAULT_NUM_CHILDREN,
            num_staff: DEFAULT_NUM_STAFF,
            events_per_child: DEFAULT_EVENTS_PER_CHILD,
            batch_size: DEFAULT_BATCH_SIZE,
            generate_old_events: false,
            now: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub children: usize,
    pub staff: usize,
    pub events: usize,
    pub batches: usize,
}

pub struct Loader<R> {
    cfg: Config,
    store: Arc<dyn Store>,
    rng: R,
}

impl<R: Rng> Loader<R> {
    pub fn new(cfg: Config, store: Arc<dyn Store>, rng: R) -> Self {
        Self { cfg, store, rng }
    }

    /// Inserts children, then staff, then their events in batches. The first
    /// failed insert stops the run; batches already written stay written.
    pub async fn run(&mut self) -> Result<Summary> {
        if self.cfg.batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        let mut summary = Summary::default();

        info!("inserting children data");
        let children = ChildProvider::try_new(self.cfg.now)?
            .generate(&mut self.rng, self.cfg.num_children);
        let child_ids =
            insert_records(self.store.as_ref(), COLLECTION_CHILDREN, &children).await?;
        summary.children = child_ids.len();
        debug!("inserted {} children", summary.children);

        info!("inserting staff data");
        let staff =
            StaffProvider::try_new(self.cfg.now)?.generate(&mut self.rng, self.cfg.num_staff);
        let staff_ids = insert_records(self.store.as_ref(), COLLECTION_STAFF, &staff).await?;
        summary.staff = staff_ids.len();
        debug!("inserted {} staff", summary.staff);

        info!("generating events data");
        let windows = event_windows(self.cfg.now, self.cfg.generate_old_events)?;
        let events = EventProvider::new(self.cfg.events_per_child).generate(
            &mut self.rng,
            &windows,
            &child_ids,
            &staff_ids,
        )?;

        info!("inserting events data in batches");
        let total = batch_count(events.len(), self.cfg.batch_size)?;
        for (idx, batch) in batches(&events, self.cfg.batch_size)?.enumerate() {
            info!("inserting batch {}/{}", idx + 1, total);
            let ids = insert_records(self.store.as_ref(), COLLECTION_EVENTS, batch).await?;
            summary.events += ids.len();
            summary.batches += 1;
        }

        info!("data insertion complete");

        Ok(summary)
    }
}
