//! Result aggregation.
//!
//! One scope-parameterized computation shared by the REST read endpoints and
//! the broadcast dispatcher, so the two paths can never diverge in computed
//! values. Reads only; never mutates the store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use collate_common::AppResult;
use collate_db::{
    entities::{candidate, constituency, constituency::Region, party},
    repositories::{
        CandidateRepository, ConstituencyRepository, PartyRepository, PollingStationRepository,
        VoteRecordRepository,
    },
};
use serde::Serialize;

/// The dimension over which votes are aggregated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationScope {
    /// All presidential candidates, nationally.
    Presidential,
    /// Parliamentary candidates of one constituency.
    Constituency(String),
    /// Combined rollup for one region.
    Region(Region),
}

/// A full aggregation snapshot for one scope.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AggregationSnapshot {
    Presidential(PresidentialResults),
    Constituency(Box<ConstituencyResults>),
    Region(RegionResults),
}

/// One candidate's ranked standing within a scope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStanding {
    pub candidate_id: String,
    pub candidate_name: String,
    /// Party details for display; colors pass through untouched.
    pub party: Option<party::Model>,
    pub votes: i64,
    pub percentage: f64,
}

/// National roll-up stats attached to the presidential snapshot.
///
/// `rejected_votes`, `registered_voters` and `turnout` are placeholders
/// supplied by an external collaborator; this system never computes them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalStats {
    pub total_votes: i64,
    pub valid_votes: i64,
    pub rejected_votes: i64,
    pub registered_voters: i64,
    pub turnout: f64,
    pub reporting_stations: u64,
    pub total_stations: u64,
}

/// Presidential aggregation snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresidentialResults {
    pub candidates: Vec<CandidateStanding>,
    pub total_votes: i64,
    pub leading_candidate: Option<CandidateStanding>,
    pub national_stats: NationalStats,
    pub last_updated: DateTime<Utc>,
}

/// Parliamentary aggregation snapshot for one constituency.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituencyResults {
    pub constituency: constituency::Model,
    pub candidates: Vec<CandidateStanding>,
    pub total_votes: i64,
    pub winner: Option<CandidateStanding>,
    pub reporting_stations: u64,
    pub total_stations: u64,
    pub reporting_percentage: f64,
    pub last_updated: DateTime<Utc>,
}

/// Per-constituency parliamentary breakdown inside a region rollup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituencyBreakdown {
    pub constituency_id: String,
    pub constituency_name: String,
    pub candidates: Vec<CandidateStanding>,
    pub total_votes: i64,
    pub leading_candidate: Option<CandidateStanding>,
}

/// Combined presidential + parliamentary rollup for one region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionResults {
    pub region: Region,
    pub candidates: Vec<CandidateStanding>,
    pub total_votes: i64,
    pub leading_candidate: Option<CandidateStanding>,
    pub constituencies: Vec<ConstituencyBreakdown>,
    pub reporting_stations: u64,
    pub total_stations: u64,
    pub last_updated: DateTime<Utc>,
}

/// Aggregation service.
#[derive(Clone)]
pub struct AggregationService {
    candidate_repo: CandidateRepository,
    party_repo: PartyRepository,
    constituency_repo: ConstituencyRepository,
    station_repo: PollingStationRepository,
    vote_record_repo: VoteRecordRepository,
}

impl AggregationService {
    /// Create a new aggregation service.
    #[must_use]
    pub const fn new(
        candidate_repo: CandidateRepository,
        party_repo: PartyRepository,
        constituency_repo: ConstituencyRepository,
        station_repo: PollingStationRepository,
        vote_record_repo: VoteRecordRepository,
    ) -> Self {
        Self {
            candidate_repo,
            party_repo,
            constituency_repo,
            station_repo,
            vote_record_repo,
        }
    }

    /// Aggregate one scope into a full snapshot.
    pub async fn aggregate(&self, scope: &AggregationScope) -> AppResult<AggregationSnapshot> {
        match scope {
            AggregationScope::Presidential => {
                Ok(AggregationSnapshot::Presidential(self.presidential().await?))
            }
            AggregationScope::Constituency(id) => Ok(AggregationSnapshot::Constituency(Box::new(
                self.constituency(id).await?,
            ))),
            AggregationScope::Region(region) => {
                Ok(AggregationSnapshot::Region(self.region(*region).await?))
            }
        }
    }

    /// National presidential standings.
    pub async fn presidential(&self) -> AppResult<PresidentialResults> {
        let candidates = self.candidate_repo.list_presidential().await?;
        let standings = self.standings_for(&candidates, None).await?;

        let total_stations = self.station_repo.count_all().await?;
        let reporting_stations = self.vote_record_repo.reporting_station_count(None).await?;

        let total_votes = standings.total_votes;
        Ok(PresidentialResults {
            candidates: standings.entries,
            total_votes,
            leading_candidate: standings.leader,
            national_stats: NationalStats {
                total_votes,
                valid_votes: total_votes,
                rejected_votes: 0,
                registered_voters: 0,
                turnout: 0.0,
                reporting_stations,
                total_stations,
            },
            last_updated: Utc::now(),
        })
    }

    /// Parliamentary standings for one constituency.
    pub async fn constituency(&self, constituency_id: &str) -> AppResult<ConstituencyResults> {
        let constituency = self.constituency_repo.get_by_id(constituency_id).await?;

        let candidates = self.candidate_repo.list_parliamentary(constituency_id).await?;
        let station_ids = self
            .station_repo
            .ids_by_constituencies(std::slice::from_ref(&constituency.id))
            .await?;
        let standings = self.standings_for(&candidates, Some(&station_ids)).await?;

        let total_stations = station_ids.len() as u64;
        let reporting_stations = self
            .vote_record_repo
            .reporting_station_count(Some(&station_ids))
            .await?;

        Ok(ConstituencyResults {
            constituency,
            total_votes: standings.total_votes,
            winner: standings.leader.clone(),
            candidates: standings.entries,
            reporting_stations,
            total_stations,
            reporting_percentage: percentage(reporting_stations as i64, total_stations as i64),
            last_updated: Utc::now(),
        })
    }

    /// Combined presidential + parliamentary rollup for one region.
    pub async fn region(&self, region: Region) -> AppResult<RegionResults> {
        let constituencies = self.constituency_repo.list_by_region(region).await?;
        let constituency_ids: Vec<String> =
            constituencies.iter().map(|c| c.id.clone()).collect();
        let station_ids = self
            .station_repo
            .ids_by_constituencies(&constituency_ids)
            .await?;

        // Presidential standings restricted to the region's stations.
        let presidential_candidates = self.candidate_repo.list_presidential().await?;
        let presidential = self
            .standings_for(&presidential_candidates, Some(&station_ids))
            .await?;

        // Parliamentary breakdown, one entry per constituency.
        let mut breakdowns = Vec::with_capacity(constituencies.len());
        let mut parliamentary_votes = 0i64;
        for constituency in &constituencies {
            let candidates = self
                .candidate_repo
                .list_parliamentary(&constituency.id)
                .await?;
            let constituency_stations = self
                .station_repo
                .ids_by_constituencies(std::slice::from_ref(&constituency.id))
                .await?;
            let standings = self
                .standings_for(&candidates, Some(&constituency_stations))
                .await?;

            parliamentary_votes += standings.total_votes;
            breakdowns.push(ConstituencyBreakdown {
                constituency_id: constituency.id.clone(),
                constituency_name: constituency.name.clone(),
                total_votes: standings.total_votes,
                leading_candidate: standings.leader,
                candidates: standings.entries,
            });
        }

        let reporting_stations = self
            .vote_record_repo
            .reporting_station_count(Some(&station_ids))
            .await?;

        Ok(RegionResults {
            region,
            total_votes: presidential.total_votes + parliamentary_votes,
            leading_candidate: presidential.leader.clone(),
            candidates: presidential.entries,
            constituencies: breakdowns,
            reporting_stations,
            total_stations: station_ids.len() as u64,
            last_updated: Utc::now(),
        })
    }

    /// Build ranked standings for a candidate set, optionally restricted to
    /// a set of stations. One grouped sum query, one party lookup.
    async fn standings_for(
        &self,
        candidates: &[candidate::Model],
        station_ids: Option<&[String]>,
    ) -> AppResult<RankedStandings> {
        if candidates.is_empty() {
            return Ok(RankedStandings::default());
        }

        let candidate_ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
        let totals = self
            .vote_record_repo
            .sum_votes_by_candidate(&candidate_ids, station_ids)
            .await?;
        let totals: HashMap<String, i64> = totals
            .into_iter()
            .map(|t| (t.candidate_id, t.total.unwrap_or(0)))
            .collect();

        let party_ids: Vec<String> = candidates.iter().map(|c| c.party_id.clone()).collect();
        let parties: HashMap<String, party::Model> = self
            .party_repo
            .find_by_ids(&party_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let tallies = candidates
            .iter()
            .map(|c| {
                let votes = totals.get(&c.id).copied().unwrap_or(0);
                (c.clone(), parties.get(&c.party_id).cloned(), votes)
            })
            .collect();

        Ok(rank(tallies))
    }
}

/// Ranked standings with totals and the leading entry.
#[derive(Debug, Default)]
struct RankedStandings {
    entries: Vec<CandidateStanding>,
    total_votes: i64,
    leader: Option<CandidateStanding>,
}

/// Rank candidate tallies: descending by votes, ties keeping input order,
/// percentages guarded against a zero total.
fn rank(tallies: Vec<(candidate::Model, Option<party::Model>, i64)>) -> RankedStandings {
    let total_votes: i64 = tallies.iter().map(|(_, _, votes)| votes).sum();

    let mut entries: Vec<CandidateStanding> = tallies
        .into_iter()
        .map(|(candidate, party, votes)| CandidateStanding {
            candidate_id: candidate.id,
            candidate_name: candidate.name,
            party,
            votes,
            percentage: percentage(votes, total_votes),
        })
        .collect();

    // Stable sort: equal vote counts keep candidate-id order.
    entries.sort_by(|a, b| b.votes.cmp(&a.votes));

    let leader = entries.first().cloned();
    RankedStandings {
        entries,
        total_votes,
        leader,
    }
}

/// `part / whole * 100`, zero when the denominator is zero.
fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use collate_db::entities::candidate::CandidateType;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::sync::Arc;

    fn test_candidate(id: &str, name: &str) -> candidate::Model {
        candidate::Model {
            id: id.to_string(),
            name: name.to_string(),
            candidate_type: CandidateType::Presidential,
            party_id: format!("party-{id}"),
            constituency_id: None,
            created_at: Utc::now().into(),
        }
    }

    fn tally(
        id: &str,
        name: &str,
        votes: i64,
    ) -> (candidate::Model, Option<party::Model>, i64) {
        (test_candidate(id, name), None, votes)
    }

    #[test]
    fn test_rank_sorts_descending_and_picks_leader() {
        let ranked = rank(vec![
            tally("a", "Alice", 120),
            tally("b", "Bob", 150),
            tally("c", "Carol", 30),
        ]);

        let ids: Vec<&str> = ranked.entries.iter().map(|e| e.candidate_id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(ranked.total_votes, 300);
        assert_eq!(ranked.leader.as_ref().unwrap().candidate_id, "b");
    }

    #[test]
    fn test_rank_percentages_sum_to_100() {
        let ranked = rank(vec![
            tally("a", "Alice", 120),
            tally("b", "Bob", 150),
        ]);

        assert_eq!(ranked.total_votes, 270);
        let sum: f64 = ranked.entries.iter().map(|e| e.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        // The 120/150 scenario: B ≈ 55.56, A ≈ 44.44.
        assert!((ranked.entries[0].percentage - 55.555_555_555_555_55).abs() < 1e-6);
        assert!((ranked.entries[1].percentage - 44.444_444_444_444_44).abs() < 1e-6);
    }

    #[test]
    fn test_rank_zero_total_gives_zero_percentages() {
        let ranked = rank(vec![tally("a", "Alice", 0), tally("b", "Bob", 0)]);

        assert_eq!(ranked.total_votes, 0);
        assert!(ranked.entries.iter().all(|e| e.percentage == 0.0));
        // A leader is still designated deterministically.
        assert_eq!(ranked.leader.as_ref().unwrap().candidate_id, "a");
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let ranked = rank(vec![
            tally("a", "Alice", 50),
            tally("b", "Bob", 80),
            tally("c", "Carol", 50),
        ]);

        let ids: Vec<&str> = ranked.entries.iter().map(|e| e.candidate_id.as_str()).collect();
        // a and c are tied; a entered first and stays first.
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_rank_empty_set() {
        let ranked = rank(Vec::new());
        assert!(ranked.entries.is_empty());
        assert_eq!(ranked.total_votes, 0);
        assert!(ranked.leader.is_none());
    }

    #[test]
    fn test_percentage_guard() {
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
        assert!(percentage(1, 3).is_finite());
    }

    fn mock_service(db: sea_orm::DatabaseConnection) -> AggregationService {
        let db = Arc::new(db);
        AggregationService::new(
            CandidateRepository::new(Arc::clone(&db)),
            PartyRepository::new(Arc::clone(&db)),
            ConstituencyRepository::new(Arc::clone(&db)),
            PollingStationRepository::new(Arc::clone(&db)),
            VoteRecordRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_presidential_empty_candidate_set_never_throws() {
        // Queries, in order: candidates, station count, reporting stations.
        // The sum and party queries are skipped entirely for an empty set.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<candidate::Model>::new()])
            .append_query_results([vec![btreemap! { "num_items" => Value::from(0i64) }]])
            .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
            .into_connection();

        let service = mock_service(db);
        let results = service.presidential().await.unwrap();

        assert_eq!(results.total_votes, 0);
        assert!(results.candidates.is_empty());
        assert!(results.leading_candidate.is_none());
        assert_eq!(results.national_stats.reporting_stations, 0);
    }

    #[tokio::test]
    async fn test_aggregate_dispatches_presidential_scope() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<candidate::Model>::new()])
            .append_query_results([vec![btreemap! { "num_items" => Value::from(0i64) }]])
            .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
            .into_connection();

        let service = mock_service(db);
        let snapshot = service
            .aggregate(&AggregationScope::Presidential)
            .await
            .unwrap();

        assert!(matches!(snapshot, AggregationSnapshot::Presidential(_)));
    }

    #[tokio::test]
    async fn test_constituency_unknown_id_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<constituency::Model>::new()])
            .into_connection();

        let service = mock_service(db);
        let result = service.constituency("missing").await;

        assert!(matches!(
            result,
            Err(collate_common::AppError::NotFound(_))
        ));
    }
}
