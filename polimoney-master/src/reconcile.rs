//! District reconciliation driver
//!
//! One run rebuilds the `districts` table from scratch:
//!
//! `wipe -> HR -> HC -> PG -> PA -> GM (batched) -> CM (batched) -> freshness -> count`
//!
//! The run is best-effort and non-atomic. Every step records its outcome in
//! a [`ReconcileReport`] instead of aborting; the final count compared with
//! the expected total is the signal that a run was complete. Re-running
//! heals a partial table since each run wipes first.
//!
//! Only one run may target a database at a time. Concurrent runs interleave
//! wipes and inserts and leave an inconsistent table; nothing here prevents it.

use crate::db::MasterStore;
use crate::districts::{generate, District, DistrictType};
use crate::fetcher::{fetch_municipalities, MunicipalityFetch};
use crate::pagination::batches;
use chrono::{DateTime, SecondsFormat, Utc};
use polimoney_common::config::MasterSettings;
use polimoney_common::db::DISTRICTS_TABLE;
use serde::Serialize;
use tracing::{error, info, warn};

/// Outcome of one non-batched driver step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    Done(T),
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Done(v) => Some(v),
            Outcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl<T> From<polimoney_common::Result<T>> for Outcome<T> {
    fn from(result: polimoney_common::Result<T>) -> Self {
        match result {
            Ok(v) => Outcome::Done(v),
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

/// One insert call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// 1-based batch number
    pub index: usize,
    /// Rows submitted in this batch
    pub rows: usize,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Generation and insertion result for one district type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub district_type: DistrictType,
    /// Districts produced by the generator
    pub generated: usize,
    pub batches: Vec<BatchOutcome>,
}

impl StepReport {
    /// Rows in batches that were written successfully
    pub fn inserted(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| b.succeeded())
            .map(|b| b.rows)
            .sum()
    }

    pub fn failed_batches(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.batches.iter().filter(|b| !b.succeeded())
    }

    pub fn is_complete(&self) -> bool {
        self.inserted() == self.generated
    }
}

/// Aggregated result of one reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Rows removed by the wipe
    pub wipe: Outcome<u64>,
    /// Present once a municipal step has run
    pub municipality_fetch: Option<FetchSummary>,
    pub steps: Vec<StepReport>,
    /// Timestamp written to the freshness marker
    pub freshness: Outcome<String>,
    /// Rows in the districts table after the run
    pub final_count: Outcome<i64>,
}

/// Municipality read summary kept in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    pub rows: usize,
    pub pages_read: usize,
    pub error: Option<String>,
}

impl From<&MunicipalityFetch> for FetchSummary {
    fn from(fetch: &MunicipalityFetch) -> Self {
        Self {
            rows: fetch.rows.len(),
            pages_read: fetch.pages_read,
            error: fetch.error.clone(),
        }
    }
}

impl ReconcileReport {
    /// Sum of every generator's output
    pub fn expected_total(&self) -> usize {
        self.steps.iter().map(|s| s.generated).sum()
    }

    /// Rows written by successful insert calls
    pub fn inserted_total(&self) -> usize {
        self.steps.iter().map(StepReport::inserted).sum()
    }

    /// `(type, batch index)` for every failed insert call
    pub fn failed_batches(&self) -> Vec<(DistrictType, usize)> {
        self.steps
            .iter()
            .flat_map(|s| s.failed_batches().map(move |b| (s.district_type, b.index)))
            .collect()
    }

    pub fn step(&self, district_type: DistrictType) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.district_type == district_type)
    }

    /// Whether the table holds exactly the rows this run generated
    pub fn is_consistent(&self) -> bool {
        self.final_count.value().copied() == Some(self.expected_total() as i64)
    }

    fn log_summary(&self) {
        info!("=== District reconciliation finished ===");
        match &self.final_count {
            Outcome::Done(count) => info!("Total districts: {}", count),
            Outcome::Failed(e) => error!("Total districts: unknown (count failed: {})", e),
        }
        for step in &self.steps {
            info!("  - {}: {}", step.district_type, step.generated);
        }

        if self.is_consistent() {
            info!("Final count matches generated total ({})", self.expected_total());
            return;
        }

        let failed = self.failed_batches();
        warn!(
            "Final count does not match generated total {} (inserted {}, {} failed batches, wipe {}); re-run to rebuild",
            self.expected_total(),
            self.inserted_total(),
            failed.len(),
            if self.wipe.is_failed() { "failed" } else { "ok" }
        );
        for (district_type, index) in failed {
            warn!("  failed: {} batch {}", district_type, index);
        }
    }
}

/// Rebuilds the districts table through a [`MasterStore`]
pub struct Reconciler<'a, S: MasterStore + ?Sized> {
    store: &'a S,
    settings: MasterSettings,
}

impl<'a, S: MasterStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S, settings: MasterSettings) -> Self {
        Self { store, settings }
    }

    /// Run one full reconciliation
    ///
    /// Never fails: every error is logged and recorded in the report.
    pub async fn run(&self) -> ReconcileReport {
        let started_at = Utc::now();
        info!("=== District reconciliation started ===");

        let wipe = self.wipe().await;

        let mut fetch: Option<MunicipalityFetch> = None;
        let mut steps = Vec::with_capacity(DistrictType::ALL.len());

        for district_type in DistrictType::ALL {
            if district_type.is_municipal() && fetch.is_none() {
                fetch = Some(fetch_municipalities(self.store, self.settings.page_size).await);
            }
            let municipalities = fetch.as_ref().map(|f| f.rows.as_slice()).unwrap_or(&[]);

            let districts = generate(district_type, municipalities);
            steps.push(self.insert_step(district_type, &districts).await);
        }

        let freshness = self.update_freshness().await;
        let final_count = self.final_count().await;

        let report = ReconcileReport {
            started_at,
            finished_at: Utc::now(),
            wipe,
            municipality_fetch: fetch.as_ref().map(FetchSummary::from),
            steps,
            freshness,
            final_count,
        };
        report.log_summary();
        report
    }

    async fn wipe(&self) -> Outcome<u64> {
        info!("Deleting existing districts...");
        let outcome = Outcome::from(self.store.delete_all_districts().await);
        match &outcome {
            Outcome::Done(removed) => info!("Deleted {} existing districts", removed),
            Outcome::Failed(e) => {
                error!("District wipe failed, old rows may remain: {}", e)
            }
        }
        outcome
    }

    async fn insert_step(&self, district_type: DistrictType, districts: &[District]) -> StepReport {
        info!("{}: {} districts generated", district_type, districts.len());

        if districts.is_empty() {
            warn!(
                "{}: nothing to insert (zero districts generated{})",
                district_type,
                if district_type.is_municipal() {
                    "; is the municipality registry populated?"
                } else {
                    ""
                }
            );
            return StepReport {
                district_type,
                generated: 0,
                batches: Vec::new(),
            };
        }

        // Prefecture-level types go in one call; municipal types are chunked
        let chunk_size = if district_type.is_municipal() {
            self.settings.batch_size
        } else {
            districts.len()
        };

        let mut outcomes = Vec::new();
        for batch in batches(districts.len(), chunk_size) {
            let result = self
                .store
                .insert_districts(&districts[batch.start..batch.end])
                .await;
            let error = match result {
                Ok(_) => None,
                Err(e) => {
                    error!(
                        "{}: insert failed (batch {}, {} rows): {}",
                        district_type,
                        batch.index,
                        batch.len(),
                        e
                    );
                    Some(e.to_string())
                }
            };
            outcomes.push(BatchOutcome {
                index: batch.index,
                rows: batch.len(),
                error,
            });
        }

        let step = StepReport {
            district_type,
            generated: districts.len(),
            batches: outcomes,
        };
        if step.is_complete() {
            info!("✓ {}: {} districts registered", district_type, step.inserted());
        } else {
            warn!(
                "{}: {} of {} districts registered",
                district_type,
                step.inserted(),
                step.generated
            );
        }
        step
    }

    async fn update_freshness(&self) -> Outcome<String> {
        let now = Utc::now();
        match self.store.upsert_freshness(DISTRICTS_TABLE, now).await {
            Ok(()) => Outcome::Done(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Err(e) => {
                error!("Freshness marker update failed: {}", e);
                Outcome::Failed(e.to_string())
            }
        }
    }

    async fn final_count(&self) -> Outcome<i64> {
        let outcome = Outcome::from(self.store.count_districts().await);
        if let Outcome::Failed(e) = &outcome {
            error!("Final district count failed: {}", e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(
        district_type: DistrictType,
        generated: usize,
        batches: Vec<BatchOutcome>,
    ) -> StepReport {
        StepReport {
            district_type,
            generated,
            batches,
        }
    }

    fn batch(index: usize, rows: usize, error: Option<&str>) -> BatchOutcome {
        BatchOutcome {
            index,
            rows,
            error: error.map(str::to_string),
        }
    }

    fn report(steps: Vec<StepReport>, final_count: Outcome<i64>) -> ReconcileReport {
        ReconcileReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            wipe: Outcome::Done(0),
            municipality_fetch: None,
            steps,
            freshness: Outcome::Done("2025-01-01T00:00:00.000Z".to_string()),
            final_count,
        }
    }

    #[test]
    fn test_step_counts_only_successful_batches() {
        let s = step(
            DistrictType::MunicipalHead,
            1200,
            vec![batch(1, 500, None), batch(2, 500, Some("too large")), batch(3, 200, None)],
        );
        assert_eq!(s.inserted(), 700);
        assert!(!s.is_complete());
        assert_eq!(s.failed_batches().map(|b| b.index).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_empty_step_is_complete() {
        let s = step(DistrictType::MunicipalAssembly, 0, Vec::new());
        assert!(s.is_complete());
        assert_eq!(s.inserted(), 0);
    }

    #[test]
    fn test_report_consistency() {
        let r = report(
            vec![
                step(DistrictType::Governor, 47, vec![batch(1, 47, None)]),
                step(DistrictType::PrefecturalAssembly, 47, vec![batch(1, 47, None)]),
            ],
            Outcome::Done(94),
        );
        assert_eq!(r.expected_total(), 94);
        assert!(r.is_consistent());
        assert!(r.failed_batches().is_empty());
    }

    #[test]
    fn test_report_detects_mismatch_and_failed_count() {
        let steps = vec![
            step(DistrictType::LowerHouse, 289, vec![batch(1, 289, Some("boom"))]),
            step(DistrictType::Governor, 47, vec![batch(1, 47, None)]),
        ];
        let r = report(steps.clone(), Outcome::Done(47));
        assert!(!r.is_consistent());
        assert_eq!(r.inserted_total(), 47);
        assert_eq!(r.failed_batches(), vec![(DistrictType::LowerHouse, 1)]);

        let r = report(steps, Outcome::Failed("count failed".to_string()));
        assert!(!r.is_consistent());
    }

    #[test]
    fn test_report_serializes_outcomes() {
        let r = report(
            vec![step(DistrictType::Governor, 47, vec![batch(1, 47, None)])],
            Outcome::Failed("gone".to_string()),
        );
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["wipe"]["status"], "done");
        assert_eq!(json["final_count"]["status"], "failed");
        assert_eq!(json["final_count"]["value"], "gone");
        assert_eq!(json["steps"][0]["district_type"], "PG");
    }
}
