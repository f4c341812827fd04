use anyhow::Result;
use async_trait::async_trait;
use shared::{InjuryReport, InjuryReportDetails};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::traits::InjuryReportStorage;

/// Report columns plus the display name of every referenced child and user
const DETAILS_SELECT: &str = r#"
    SELECT
        r.id, r.child_id, r.submitting_user_id, r.injury_timestamp, r.location,
        r.incident_description, r.injury_description, r.action_taken,
        r.is_bite, r.biter_child_id, r.is_peer_aggression, r.aggressor_child_id,
        r.is_reviewed, r.reviewed_by_user_id, r.reviewed_timestamp,
        r.is_delivered_to_parent, r.delivered_by_user_id, r.delivered_timestamp,
        r.parent_narrative, r.memo_content,
        r.ai_validated, r.ai_suggestions_count, r.ai_suggestions_accepted,
        r.created_at, r.updated_at,
        child.name AS child_name,
        submitter.name AS submitter_name,
        reviewer.name AS reviewer_name,
        deliverer.name AS deliverer_name,
        biter.name AS biter_name,
        aggressor.name AS aggressor_name
    FROM injury_reports r
    LEFT JOIN children child ON child.id = r.child_id
    LEFT JOIN users submitter ON submitter.id = r.submitting_user_id
    LEFT JOIN users reviewer ON reviewer.id = r.reviewed_by_user_id
    LEFT JOIN users deliverer ON deliverer.id = r.delivered_by_user_id
    LEFT JOIN children biter ON biter.id = r.biter_child_id
    LEFT JOIN children aggressor ON aggressor.id = r.aggressor_child_id
"#;

/// Repository for injury reports
#[derive(Clone)]
pub struct InjuryReportRepository {
    db: DbConnection,
}

impl InjuryReportRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn count(row: &SqliteRow, column: &str) -> u32 {
        u32::try_from(row.get::<i64, _>(column)).unwrap_or_default()
    }

    fn details_from_row(row: &SqliteRow) -> InjuryReportDetails {
        InjuryReportDetails {
            report: InjuryReport {
                id: row.get("id"),
                child_id: row.get("child_id"),
                submitting_user_id: row.get("submitting_user_id"),
                injury_timestamp: row.get("injury_timestamp"),
                location: row.get("location"),
                incident_description: row.get("incident_description"),
                injury_description: row.get("injury_description"),
                action_taken: row.get("action_taken"),
                is_bite: row.get("is_bite"),
                biter_child_id: row.get("biter_child_id"),
                is_peer_aggression: row.get("is_peer_aggression"),
                aggressor_child_id: row.get("aggressor_child_id"),
                is_reviewed: row.get("is_reviewed"),
                reviewed_by_user_id: row.get("reviewed_by_user_id"),
                reviewed_timestamp: row.get("reviewed_timestamp"),
                is_delivered_to_parent: row.get("is_delivered_to_parent"),
                delivered_by_user_id: row.get("delivered_by_user_id"),
                delivered_timestamp: row.get("delivered_timestamp"),
                parent_narrative: row.get("parent_narrative"),
                memo_content: row.get("memo_content"),
                ai_validated: row.get("ai_validated"),
                ai_suggestions_count: Self::count(row, "ai_suggestions_count"),
                ai_suggestions_accepted: Self::count(row, "ai_suggestions_accepted"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            },
            child_name: row.get("child_name"),
            submitter_name: row.get("submitter_name"),
            reviewer_name: row.get("reviewer_name"),
            deliverer_name: row.get("deliverer_name"),
            biter_name: row.get("biter_name"),
            aggressor_name: row.get("aggressor_name"),
        }
    }
}

#[async_trait]
impl InjuryReportStorage for InjuryReportRepository {
    async fn store_report(&self, report: &InjuryReport) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO injury_reports (
                id, child_id, submitting_user_id, injury_timestamp, location,
                incident_description, injury_description, action_taken,
                is_bite, biter_child_id, is_peer_aggression, aggressor_child_id,
                is_reviewed, reviewed_by_user_id, reviewed_timestamp,
                is_delivered_to_parent, delivered_by_user_id, delivered_timestamp,
                parent_narrative, memo_content,
                ai_validated, ai_suggestions_count, ai_suggestions_accepted,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&report.id)
        .bind(&report.child_id)
        .bind(&report.submitting_user_id)
        .bind(&report.injury_timestamp)
        .bind(&report.location)
        .bind(&report.incident_description)
        .bind(&report.injury_description)
        .bind(&report.action_taken)
        .bind(report.is_bite)
        .bind(&report.biter_child_id)
        .bind(report.is_peer_aggression)
        .bind(&report.aggressor_child_id)
        .bind(report.is_reviewed)
        .bind(&report.reviewed_by_user_id)
        .bind(&report.reviewed_timestamp)
        .bind(report.is_delivered_to_parent)
        .bind(&report.delivered_by_user_id)
        .bind(&report.delivered_timestamp)
        .bind(&report.parent_narrative)
        .bind(&report.memo_content)
        .bind(report.ai_validated)
        .bind(i64::from(report.ai_suggestions_count))
        .bind(i64::from(report.ai_suggestions_accepted))
        .bind(&report.created_at)
        .bind(&report.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_report(&self, report_id: &str) -> Result<Option<InjuryReportDetails>> {
        let sql = format!("{} WHERE r.id = ?", DETAILS_SELECT);
        let row = sqlx::query(&sql)
            .bind(report_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(Self::details_from_row))
    }

    async fn list_reports(&self, only_unreviewed: bool) -> Result<Vec<InjuryReportDetails>> {
        // datetime() normalizes the stored offsets to UTC before comparing
        let sql = format!(
            "{} WHERE (? = 0 OR r.is_reviewed = 0) \
             ORDER BY datetime(r.injury_timestamp) DESC, r.created_at DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(only_unreviewed)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(Self::details_from_row).collect())
    }

    async fn mark_reviewed(&self, report_id: &str, reviewer_id: &str, timestamp: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE injury_reports
            SET is_reviewed = TRUE, reviewed_by_user_id = ?, reviewed_timestamp = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(reviewer_id)
        .bind(timestamp)
        .bind(timestamp)
        .bind(report_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_delivered(&self, report_id: &str, deliverer_id: &str, timestamp: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE injury_reports
            SET is_delivered_to_parent = TRUE, delivered_by_user_id = ?, delivered_timestamp = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(deliverer_id)
        .bind(timestamp)
        .bind(timestamp)
        .bind(report_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn store_memo(&self, report_id: &str, memo_content: &str, timestamp: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE injury_reports
            SET memo_content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(memo_content)
        .bind(timestamp)
        .bind(report_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    async fn setup() -> InjuryReportRepository {
        let db = DbConnection::init_test().await.unwrap();
        seed(&db).await;
        InjuryReportRepository::new(db)
    }

    #[tokio::test]
    async fn test_get_report_joins_names() {
        let repo = setup().await;
        let mut stored = report("report::1", "2025-04-17T11:30:00-04:00");
        stored.is_bite = true;
        stored.biter_child_id = Some(BEN_ID.to_string());
        repo.store_report(&stored).await.unwrap();

        let details = repo.get_report("report::1").await.unwrap().unwrap();
        assert_eq!(details.report, stored);
        assert_eq!(details.child_name.as_deref(), Some("Ava Jones"));
        assert_eq!(details.submitter_name.as_deref(), Some("Morgan Lee"));
        assert_eq!(details.biter_name.as_deref(), Some("Ben Smith"));
        assert_eq!(details.reviewer_name, None);
        assert_eq!(details.aggressor_name, None);
    }

    #[tokio::test]
    async fn test_list_orders_by_injury_time_across_offsets() {
        let repo = setup().await;
        // 15:30Z, 16:00Z, 14:00Z
        repo.store_report(&report("report::a", "2025-04-17T11:30:00-04:00")).await.unwrap();
        repo.store_report(&report("report::b", "2025-04-17T16:00:00+00:00")).await.unwrap();
        repo.store_report(&report("report::c", "2025-04-17T10:00:00-04:00")).await.unwrap();

        let ids: Vec<String> = repo
            .list_reports(false)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.report.id)
            .collect();
        assert_eq!(ids, vec!["report::b", "report::a", "report::c"]);
    }

    #[tokio::test]
    async fn test_mark_reviewed_and_filter_unreviewed() {
        let repo = setup().await;
        repo.store_report(&report("report::a", "2025-04-17T11:30:00-04:00")).await.unwrap();
        repo.store_report(&report("report::b", "2025-04-16T11:30:00-04:00")).await.unwrap();

        assert!(repo.mark_reviewed("report::a", DESK_ID, "2025-04-17T16:00:00Z").await.unwrap());
        assert!(!repo.mark_reviewed("report::missing", DESK_ID, "2025-04-17T16:00:00Z").await.unwrap());

        let pending = repo.list_reports(true).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].report.id, "report::b");

        let reviewed = repo.get_report("report::a").await.unwrap().unwrap();
        assert!(reviewed.report.is_reviewed);
        assert_eq!(reviewed.report.reviewed_by_user_id.as_deref(), Some(DESK_ID));
        assert_eq!(reviewed.report.reviewed_timestamp.as_deref(), Some("2025-04-17T16:00:00Z"));
        assert_eq!(reviewed.reviewer_name.as_deref(), Some("Dana Cruz"));
    }

    #[tokio::test]
    async fn test_mark_delivered_and_store_memo() {
        let repo = setup().await;
        repo.store_report(&report("report::a", "2025-04-17T11:30:00-04:00")).await.unwrap();

        assert!(repo.mark_delivered("report::a", DESK_ID, "2025-04-17T17:00:00Z").await.unwrap());
        assert!(repo.store_memo("report::a", "Dear Parent/Guardian", "2025-04-17T17:05:00Z").await.unwrap());

        let details = repo.get_report("report::a").await.unwrap().unwrap();
        assert!(details.report.is_delivered_to_parent);
        assert_eq!(details.deliverer_name.as_deref(), Some("Dana Cruz"));
        assert_eq!(details.report.memo_content.as_deref(), Some("Dear Parent/Guardian"));
        assert_eq!(details.report.updated_at, "2025-04-17T17:05:00Z");
    }

    #[tokio::test]
    async fn test_unknown_child_is_rejected() {
        let repo = setup().await;
        let mut orphan = report("report::a", "2025-04-17T11:30:00-04:00");
        orphan.child_id = "child::ghost".to_string();
        assert!(repo.store_report(&orphan).await.is_err());
    }
}
