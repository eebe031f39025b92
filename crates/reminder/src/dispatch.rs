//! The reminder run: fetch, classify, compose, send, wait.
//!
//! One run processes every enabled list in registry order and every task
//! in source order. A failing list or a failed delivery is logged and
//! counted; only a broken registry stops the run.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Weekday};
use notify::Sink;
use pm::{ListDiscovery, ListRegistry, TaskSource};
use tracing::{error, info, warn};

use crate::classify::{classify_list, SkipReason};
use crate::compose::Composer;
use crate::config::Schedule;
use crate::error::RunError;
use crate::models::ClassifiedTask;
use crate::pacing::{Pacer, TokioPacer};

/// Counters for one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lists added to the registry by discovery.
    pub lists_discovered: usize,
    pub sources_total: usize,
    pub sources_failed: usize,
    pub tasks_classified: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl RunSummary {
    #[must_use]
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    fn log(&self) {
        let skipped: Vec<String> = self
            .skipped
            .iter()
            .map(|(reason, count)| format!("{reason}={count}"))
            .collect();
        info!(
            lists_discovered = self.lists_discovered,
            sources = self.sources_total,
            sources_failed = self.sources_failed,
            tasks = self.tasks_classified,
            sent = self.sent,
            failed = self.failed,
            skipped = %skipped.join(","),
            "Run complete"
        );
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The reference time fell on a configured non-working day.
    SkippedNonWorkingDay(Weekday),
    Completed(RunSummary),
}

/// Drives one reminder run.
pub struct Dispatcher {
    registry: Arc<dyn ListRegistry>,
    source: Arc<dyn TaskSource>,
    composer: Composer,
    sink: Arc<dyn Sink>,
    discovery: Option<Arc<dyn ListDiscovery>>,
    pacer: Arc<dyn Pacer>,
    schedule: Schedule,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<dyn ListRegistry>,
        source: Arc<dyn TaskSource>,
        composer: Composer,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            registry,
            source,
            composer,
            sink,
            discovery: None,
            pacer: Arc::new(TokioPacer::default()),
            schedule: Schedule::default(),
        }
    }

    /// Look for new sprint lists before each run.
    #[must_use]
    pub fn with_discovery(mut self, discovery: Arc<dyn ListDiscovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Run once against the reference time `now`.
    pub async fn run<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<RunOutcome, RunError> {
        let weekday = now.weekday();
        if self.schedule.is_non_working(weekday) {
            info!(%weekday, "Non-working day, no reminders sent");
            return Ok(RunOutcome::SkippedNonWorkingDay(weekday));
        }

        let mut summary = RunSummary {
            lists_discovered: self.discover().await,
            ..RunSummary::default()
        };

        let lists = self.registry.enabled_lists().await?;
        summary.sources_total = lists.len();
        info!(lists = lists.len(), "Fetching tasks");

        let mut tasks: Vec<ClassifiedTask> = Vec::new();
        for list in &lists {
            match self.source.fetch(list).await {
                Ok(raw) => {
                    let classified = classify_list(&raw, list, now);
                    for (reason, count) in classified.skipped {
                        *summary.skipped.entry(reason).or_default() += count;
                    }
                    tasks.extend(classified.tasks);
                }
                Err(e) => {
                    warn!(list = %list.display_name(), list_id = %list.id, error = %e, "Failed to fetch list, skipping");
                    summary.sources_failed += 1;
                }
            }
        }

        summary.tasks_classified = tasks.len();
        if tasks.is_empty() {
            info!("No tasks need a reminder");
        }

        let total = tasks.len();
        for (index, task) in tasks.iter().enumerate() {
            info!(
                task_id = %task.id,
                task = %task.name,
                category = %task.category,
                list = %task.list_name,
                progress = %format!("{}/{total}", index + 1),
                "Sending reminder"
            );

            let message = self.composer.compose(task).await;
            match self.sink.post(&message).await {
                Ok(ack) => {
                    summary.sent += 1;
                    info!(task_id = %task.id, sink = self.sink.name(), ts = %ack.ts, "Reminder delivered");
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(task_id = %task.id, sink = self.sink.name(), error = %e, "Failed to deliver reminder");
                }
            }

            if index + 1 < total {
                self.pacer.wait(self.schedule.pacing).await;
            }
        }

        summary.log();
        Ok(RunOutcome::Completed(summary))
    }

    /// Append newly discovered lists to the registry. Failures only log.
    async fn discover(&self) -> usize {
        let Some(discovery) = &self.discovery else {
            return 0;
        };

        let settings = match self.registry.discovery_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Could not read discovery settings, skipping discovery");
                return 0;
            }
        };

        let found = match discovery.discover(&settings).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "List discovery failed");
                return 0;
            }
        };

        match self.registry.append_new(found).await {
            Ok(added) => {
                for list in &added {
                    info!(list = %list.display_name(), list_id = %list.id, "Discovered new list");
                }
                added.len()
            }
            Err(e) => {
                warn!(error = %e, "Failed to save discovered lists");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::eq;
    use notify::{Ack, DeliveryError, SlackApiError};
    use pm::{DiscoverySettings, ListDescriptor, ListKind, RawTask, RegistryError, SourceError};

    use crate::ai::{GenerationRequest, TextGenerator};
    use crate::error::GenerationError;
    use crate::mention::MentionMapper;

    mock! {
        Registry {}

        #[async_trait]
        impl ListRegistry for Registry {
            async fn enabled_lists(&self) -> Result<Vec<ListDescriptor>, RegistryError>;
            async fn discovery_settings(&self) -> Result<DiscoverySettings, RegistryError>;
            async fn append_new(&self, lists: Vec<ListDescriptor>) -> Result<Vec<ListDescriptor>, RegistryError>;
        }
    }

    mock! {
        Source {}

        #[async_trait]
        impl TaskSource for Source {
            async fn fetch(&self, list: &ListDescriptor) -> Result<Vec<RawTask>, SourceError>;
        }
    }

    mock! {
        Discovery {}

        #[async_trait]
        impl ListDiscovery for Discovery {
            async fn discover(&self, settings: &DiscoverySettings) -> Result<Vec<ListDescriptor>, SourceError>;
        }
    }

    mock! {
        Out {}

        #[async_trait]
        impl Sink for Out {
            fn name(&self) -> &'static str;
            async fn post(&self, text: &str) -> Result<Ack, DeliveryError>;
        }
    }

    mock! {
        Wait {}

        #[async_trait]
        impl Pacer for Wait {
            async fn wait(&self, delay: Duration);
        }
    }

    /// Generation is always down, so messages are the deterministic fallbacks.
    struct Offline;

    #[async_trait]
    impl TextGenerator for Offline {
        fn name(&self) -> &'static str {
            "offline"
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
            Err(GenerationError::Timeout)
        }
    }

    fn composer() -> Composer {
        Composer::new(Arc::new(MentionMapper::default()), Arc::new(Offline))
    }

    // Wednesday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
    }

    fn list(id: &str) -> ListDescriptor {
        ListDescriptor::new(id, format!("Sprint {id}"), ListKind::Sprint)
    }

    fn open_task(id: &str, name: &str) -> RawTask {
        RawTask {
            id: id.to_string(),
            name: name.to_string(),
            status: "to do".to_string(),
            assignees: vec!["alice".to_string()],
            ..RawTask::default()
        }
    }

    fn registry_with(lists: Vec<ListDescriptor>) -> MockRegistry {
        let mut registry = MockRegistry::new();
        registry
            .expect_enabled_lists()
            .returning(move || Ok(lists.clone()));
        registry
    }

    fn ok_sink(expected_posts: usize) -> MockOut {
        let mut sink = MockOut::new();
        sink.expect_name().return_const("mock");
        sink.expect_post().times(expected_posts).returning(|_| {
            Ok(Ack {
                channel: "C1".to_string(),
                ts: "1.0".to_string(),
            })
        });
        sink
    }

    fn schedule() -> Schedule {
        Schedule {
            pacing: Duration::from_secs(180),
            ..Schedule::default()
        }
    }

    #[tokio::test]
    async fn test_three_tasks_wait_exactly_twice() {
        let mut source = MockSource::new();
        source.expect_fetch().times(1).returning(|_| {
            Ok(vec![
                open_task("1", "Plan lunch"),
                open_task("2", "Update README"),
                open_task("3", "Weekly sync meeting"),
            ])
        });

        let mut pacer = MockWait::new();
        pacer
            .expect_wait()
            .with(eq(Duration::from_secs(180)))
            .times(2)
            .return_const(());

        let dispatcher = Dispatcher::new(
            Arc::new(registry_with(vec![list("a")])),
            Arc::new(source),
            composer(),
            Arc::new(ok_sink(3)),
        )
        .with_pacer(Arc::new(pacer))
        .with_schedule(schedule());

        let outcome = dispatcher.run(&now()).await.unwrap();
        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.tasks_classified, 3);
        assert_eq!(summary.sent, 3);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_failing_source_does_not_stop_others() {
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .withf(|l| l.id == "bad")
            .returning(|_| Err(SourceError::Timeout));
        source
            .expect_fetch()
            .withf(|l| l.id == "good")
            .returning(|_| Ok(vec![open_task("7", "Plan lunch")]));

        let mut pacer = MockWait::new();
        pacer.expect_wait().times(0);

        let dispatcher = Dispatcher::new(
            Arc::new(registry_with(vec![list("bad"), list("good")])),
            Arc::new(source),
            composer(),
            Arc::new(ok_sink(1)),
        )
        .with_pacer(Arc::new(pacer));

        let RunOutcome::Completed(summary) = dispatcher.run(&now()).await.unwrap() else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.sources_total, 2);
        assert_eq!(summary.sources_failed, 1);
        assert_eq!(summary.sent, 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_continues_and_still_paces() {
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .returning(|_| Ok(vec![open_task("1", "One"), open_task("2", "Two")]));

        let mut sink = MockOut::new();
        sink.expect_name().return_const("mock");
        sink.expect_post()
            .withf(|text| text.ends_with("1: One"))
            .times(1)
            .returning(|_| Err(DeliveryError::Api(SlackApiError::NotInChannel)));
        sink.expect_post()
            .withf(|text| text.ends_with("2: Two"))
            .times(1)
            .returning(|_| {
                Ok(Ack {
                    channel: "C1".to_string(),
                    ts: "2.0".to_string(),
                })
            });

        let mut pacer = MockWait::new();
        pacer.expect_wait().times(1).return_const(());

        let dispatcher = Dispatcher::new(
            Arc::new(registry_with(vec![list("a")])),
            Arc::new(source),
            composer(),
            Arc::new(sink),
        )
        .with_pacer(Arc::new(pacer));

        let RunOutcome::Completed(summary) = dispatcher.run(&now()).await.unwrap() else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_messages_follow_source_then_task_order() {
        let mut source = MockSource::new();
        source
            .expect_fetch()
            .withf(|l| l.id == "first")
            .returning(|_| Ok(vec![open_task("a1", "A1"), open_task("a2", "A2")]));
        source
            .expect_fetch()
            .withf(|l| l.id == "second")
            .returning(|_| Ok(vec![open_task("b1", "B1")]));

        let posted = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = Arc::clone(&posted);
        let mut sink = MockOut::new();
        sink.expect_name().return_const("mock");
        sink.expect_post().returning(move |text| {
            log.lock().unwrap().push(text.lines().last().unwrap_or_default().to_string());
            Ok(Ack {
                channel: "C1".to_string(),
                ts: "1.0".to_string(),
            })
        });

        let mut pacer = MockWait::new();
        pacer.expect_wait().return_const(());

        let dispatcher = Dispatcher::new(
            Arc::new(registry_with(vec![list("first"), list("second")])),
            Arc::new(source),
            composer(),
            Arc::new(sink),
        )
        .with_pacer(Arc::new(pacer));

        dispatcher.run(&now()).await.unwrap();
        assert_eq!(*posted.lock().unwrap(), vec!["a1: A1", "a2: A2", "b1: B1"]);
    }

    #[tokio::test]
    async fn test_skips_are_counted_by_reason() {
        let mut source = MockSource::new();
        source.expect_fetch().returning(|_| {
            let mut future = open_task("f", "Later");
            future.due_at = Some(
                Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0)
                    .unwrap()
                    .timestamp_millis()
                    .to_string(),
            );
            let mut stale = open_task("s", "Old");
            stale.status = "complete".to_string();
            stale.completed_at = Some("1000".to_string());
            Ok(vec![future, stale])
        });

        let dispatcher = Dispatcher::new(
            Arc::new(registry_with(vec![list("a")])),
            Arc::new(source),
            composer(),
            Arc::new(ok_sink(0)),
        );

        let RunOutcome::Completed(summary) = dispatcher.run(&now()).await.unwrap() else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.tasks_classified, 0);
        assert_eq!(summary.skipped_total(), 2);
        assert_eq!(summary.skipped.get(&SkipReason::FutureDue), Some(&1));
        assert_eq!(summary.skipped.get(&SkipReason::StaleCompletion), Some(&1));
    }

    #[tokio::test]
    async fn test_non_working_day_touches_nothing() {
        let mut registry = MockRegistry::new();
        registry.expect_enabled_lists().times(0);
        let mut source = MockSource::new();
        source.expect_fetch().times(0);
        let mut sink = MockOut::new();
        sink.expect_post().times(0);
        let mut pacer = MockWait::new();
        pacer.expect_wait().times(0);

        let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(source), composer(), Arc::new(sink))
            .with_pacer(Arc::new(pacer));

        let saturday = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        let outcome = dispatcher.run(&saturday).await.unwrap();
        assert_eq!(outcome, RunOutcome::SkippedNonWorkingDay(Weekday::Sat));
    }

    #[tokio::test]
    async fn test_registry_failure_is_fatal() {
        let mut registry = MockRegistry::new();
        registry.expect_enabled_lists().returning(|| {
            Err(RegistryError::NoListsConfigured {
                path: "clickup_config.json".into(),
            })
        });
        let mut source = MockSource::new();
        source.expect_fetch().times(0);

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            Arc::new(source),
            composer(),
            Arc::new(ok_sink(0)),
        );

        let err = dispatcher.run(&now()).await.unwrap_err();
        assert!(matches!(err, RunError::Registry(RegistryError::NoListsConfigured { .. })));
    }

    #[tokio::test]
    async fn test_discovered_lists_are_appended_before_fetching() {
        let mut registry = MockRegistry::new();
        registry
            .expect_discovery_settings()
            .returning(|| Ok(DiscoverySettings::default()));
        registry
            .expect_append_new()
            .withf(|lists| lists.len() == 1 && lists[0].id == "new")
            .returning(Ok);
        registry
            .expect_enabled_lists()
            .returning(|| Ok(vec![list("new")]));

        let mut discovery = MockDiscovery::new();
        discovery
            .expect_discover()
            .times(1)
            .returning(|_| Ok(vec![list("new")]));

        let mut source = MockSource::new();
        source.expect_fetch().returning(|_| Ok(Vec::new()));

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            Arc::new(source),
            composer(),
            Arc::new(ok_sink(0)),
        )
        .with_discovery(Arc::new(discovery));

        let RunOutcome::Completed(summary) = dispatcher.run(&now()).await.unwrap() else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.lists_discovered, 1);
        assert_eq!(summary.sources_total, 1);
    }

    #[tokio::test]
    async fn test_discovery_failure_is_not_fatal() {
        let mut registry = registry_with(vec![list("a")]);
        registry
            .expect_discovery_settings()
            .returning(|| Ok(DiscoverySettings::default()));
        registry.expect_append_new().times(0);

        let mut discovery = MockDiscovery::new();
        discovery
            .expect_discover()
            .returning(|_| Err(SourceError::Timeout));

        let mut source = MockSource::new();
        source.expect_fetch().times(1).returning(|_| Ok(Vec::new()));

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            Arc::new(source),
            composer(),
            Arc::new(ok_sink(0)),
        )
        .with_discovery(Arc::new(discovery));

        let RunOutcome::Completed(summary) = dispatcher.run(&now()).await.unwrap() else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.lists_discovered, 0);
        assert_eq!(summary.sources_failed, 0);
    }
}
