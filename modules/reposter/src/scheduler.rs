use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{debug, info};

use crate::harvester::Harvester;
use crate::publisher::Publisher;
use crate::store::StoreError;

/// How often the loop wakes up to look for due tasks.
pub const DEFAULT_TICK: StdDuration = StdDuration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Daily, at a fixed time of day.
    Harvest,
    /// Every publish interval.
    Publish,
}

/// Next-due state for the two periodic tasks. Pure: every method takes `now`.
#[derive(Debug, Clone)]
pub struct Schedule {
    harvest_at: NaiveTime,
    publish_every: Duration,
    next_harvest: DateTime<Utc>,
    next_publish: DateTime<Utc>,
}

impl Schedule {
    pub fn new(harvest_at: NaiveTime, publish_every: Duration, now: DateTime<Utc>) -> Self {
        Self {
            harvest_at,
            publish_every,
            next_harvest: next_daily(harvest_at, now),
            next_publish: now + publish_every,
        }
    }

    pub fn next_run(&self, task: Task) -> DateTime<Utc> {
        match task {
            Task::Harvest => self.next_harvest,
            Task::Publish => self.next_publish,
        }
    }

    /// Tasks whose due time has passed, earliest first. Harvest wins a tie.
    pub fn due(&self, now: DateTime<Utc>) -> Vec<Task> {
        let mut due: Vec<Task> = [Task::Harvest, Task::Publish]
            .into_iter()
            .filter(|task| self.next_run(*task) <= now)
            .collect();
        due.sort_by_key(|task| self.next_run(*task));
        due
    }

    /// Reschedule `task` after it ran at `now`.
    pub fn mark_done(&mut self, task: Task, now: DateTime<Utc>) {
        match task {
            Task::Harvest => self.next_harvest = next_daily(self.harvest_at, now),
            Task::Publish => self.next_publish = now + self.publish_every,
        }
    }
}

/// The first instant strictly after `after` whose time of day is `at`.
fn next_daily(at: NaiveTime, after: DateTime<Utc>) -> DateTime<Utc> {
    let today = after.date_naive().and_time(at).and_utc();
    if today > after {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Single control loop driving harvest and publish, one task at a time.
pub struct Scheduler {
    harvester: Harvester,
    publisher: Publisher,
    sources: Vec<String>,
    per_source_limit: u32,
    schedule: Schedule,
    tick: StdDuration,
}

impl Scheduler {
    pub fn new(
        harvester: Harvester,
        publisher: Publisher,
        sources: Vec<String>,
        per_source_limit: u32,
        schedule: Schedule,
    ) -> Self {
        Self {
            harvester,
            publisher,
            sources,
            per_source_limit,
            schedule,
            tick: DEFAULT_TICK,
        }
    }

    pub fn with_tick(mut self, tick: StdDuration) -> Self {
        self.tick = tick;
        self
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Harvest once, then poll forever. Returns only if the store becomes unusable.
    pub async fn run(mut self) -> Result<(), StoreError> {
        info!(
            next_harvest = %self.schedule.next_run(Task::Harvest),
            next_publish = %self.schedule.next_run(Task::Publish),
            "Scheduler starting, priming harvest"
        );
        self.run_task(Task::Harvest).await?;

        loop {
            self.run_pending(Utc::now()).await?;
            tokio::time::sleep(self.tick).await;
        }
    }

    /// Run every task due at `now`, sequentially, and reschedule each from `now`.
    pub async fn run_pending(&mut self, now: DateTime<Utc>) -> Result<Vec<Task>, StoreError> {
        let due = self.schedule.due(now);
        for task in &due {
            self.run_task(*task).await?;
            self.schedule.mark_done(*task, now);
            debug!(?task, next = %self.schedule.next_run(*task), "Task rescheduled");
        }
        Ok(due)
    }

    async fn run_task(&self, task: Task) -> Result<(), StoreError> {
        match task {
            Task::Harvest => {
                self.harvester
                    .harvest(&self.sources, self.per_source_limit)
                    .await?;
            }
            Task::Publish => {
                let outcome = self.publisher.publish_one().await?;
                debug!(?outcome, "Publish task finished");
            }
        }
        Ok(())
    }
}
