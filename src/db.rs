use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{MetricsSnapshot, StudentRecord};
use crate::source::MetricsSource;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

async fn upsert_student(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    cohort: &str,
    grade_level: &str,
) -> anyhow::Result<Uuid> {
    let id = sqlx::query(
        r#"
        INSERT INTO risk_engine.students (id, full_name, email, cohort, grade_level)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE
        SET full_name = EXCLUDED.full_name,
            cohort = EXCLUDED.cohort,
            grade_level = EXCLUDED.grade_level
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(full_name)
    .bind(email)
    .bind(cohort)
    .bind(grade_level)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to upsert student {email}"))?
    .get("id");
    Ok(id)
}

/// Returns true when a new snapshot row was written.
async fn insert_snapshot(
    pool: &PgPool,
    student_id: Uuid,
    captured_on: NaiveDate,
    snapshot: &MetricsSnapshot,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO risk_engine.metric_snapshots
        (id, student_id, captured_on, time_window_days, metrics, source_key)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(student_id)
    .bind(captured_on)
    .bind(snapshot.time_window_days as i32)
    .bind(Json(snapshot))
    .bind(source_key)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let students = vec![
        (
            "seed-avery",
            "Avery Lee",
            "avery.lee@example.edu",
            "2026",
            "grade-8",
            MetricsSnapshot {
                time_window_days: 30,
                current_streak: 0,
                longest_streak: 6,
                total_sessions: 5,
                completion_rate: 0.3,
                days_since_last_activity: Some(18),
                average_accuracy: 42.0,
                recent_accuracy_trend: -14.0,
                total_attempts: 60,
                correct_attempts: 25,
                difficulty_delta: -0.5,
                topics_started: 6,
                topics_completed: 1,
                topic_completion_rate: 0.15,
                review_completion_rate: 0.2,
                reviews_due: 17,
                help_requests: 22,
                avg_seconds_per_question: 95.0,
                expected_seconds_per_question: 45.0,
                interruptions: 4,
                habit_completion_rate: 0.1,
                focus_score: 30.0,
                frustration_events: 3,
                peer_interaction_index: 0.05,
                collaboration_score: 15.0,
                help_given_rate: 0.0,
                ..MetricsSnapshot::default()
            },
        ),
        (
            "seed-jules",
            "Jules Moreno",
            "jules.moreno@example.edu",
            "2026",
            "grade-8",
            MetricsSnapshot {
                time_window_days: 30,
                current_streak: 2,
                longest_streak: 9,
                total_sessions: 11,
                completion_rate: 0.45,
                days_since_last_activity: Some(2),
                average_accuracy: 58.0,
                recent_accuracy_trend: -4.0,
                total_attempts: 140,
                correct_attempts: 80,
                topics_started: 8,
                topics_completed: 3,
                topic_completion_rate: 0.38,
                review_completion_rate: 0.45,
                reviews_due: 9,
                help_requests: 30,
                avg_seconds_per_question: 70.0,
                expected_seconds_per_question: 45.0,
                interruptions: 5,
                habit_completion_rate: 0.4,
                focus_score: 45.0,
                frustration_events: 3,
                peer_interaction_index: 0.2,
                collaboration_score: 35.0,
                help_given_rate: 0.05,
                ..MetricsSnapshot::default()
            },
        ),
        (
            "seed-kiara",
            "Kiara Patel",
            "kiara.patel@example.edu",
            "2025",
            "grade-9",
            MetricsSnapshot {
                time_window_days: 30,
                current_streak: 24,
                longest_streak: 40,
                total_sessions: 52,
                completion_rate: 0.92,
                days_since_last_activity: Some(0),
                average_accuracy: 91.0,
                recent_accuracy_trend: 2.5,
                total_attempts: 420,
                correct_attempts: 390,
                difficulty_delta: 0.6,
                topics_started: 14,
                topics_completed: 12,
                topic_completion_rate: 0.86,
                review_completion_rate: 0.94,
                reviews_due: 3,
                help_requests: 6,
                avg_seconds_per_question: 38.0,
                expected_seconds_per_question: 45.0,
                interruptions: 3,
                habit_completion_rate: 0.88,
                focus_score: 86.0,
                frustration_events: 1,
                peer_interaction_index: 0.7,
                collaboration_score: 80.0,
                help_given_rate: 0.3,
                ..MetricsSnapshot::default()
            },
        ),
    ];

    for (source_key, name, email, cohort, grade_level, snapshot) in students {
        let student_id = upsert_student(pool, name, email, cohort, grade_level).await?;
        insert_snapshot(pool, student_id, today, &snapshot, source_key).await?;
    }

    Ok(())
}

pub async fn list_student_ids(pool: &PgPool, cohort: Option<&str>) -> anyhow::Result<Vec<Uuid>> {
    let rows = match cohort {
        Some(value) => {
            sqlx::query("SELECT id FROM risk_engine.students WHERE cohort = $1 ORDER BY email")
                .bind(value)
                .fetch_all(pool)
                .await?
        }
        None => {
            sqlx::query("SELECT id FROM risk_engine.students ORDER BY email")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows.iter().map(|row| row.get("id")).collect())
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct CsvStudent {
    pub full_name: String,
    pub email: String,
    pub cohort: String,
    pub grade_level: String,
    pub captured_on: NaiveDate,
    pub source_key: Option<String>,
}

/// Parse snapshot rows. Student columns are required; metric columns are
/// matched by name and default to zero when absent.
pub fn read_snapshot_csv(
    csv_path: &std::path::Path,
) -> anyhow::Result<Vec<(CsvStudent, MetricsSnapshot)>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let student: CsvStudent = record
            .deserialize(Some(&headers))
            .with_context(|| format!("row {}: bad student columns", line + 1))?;
        let snapshot: MetricsSnapshot = record
            .deserialize(Some(&headers))
            .with_context(|| format!("row {}: bad metric columns", line + 1))?;
        rows.push((student, snapshot));
    }

    Ok(rows)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let mut inserted = 0usize;

    for (student, snapshot) in read_snapshot_csv(csv_path)? {
        let student_id = upsert_student(
            pool,
            &student.full_name,
            &student.email,
            &student.cohort,
            &student.grade_level,
        )
        .await?;

        let source_key = student
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        if insert_snapshot(pool, student_id, student.captured_on, &snapshot, &source_key).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

/// Reads the newest snapshot captured inside the requested window.
pub struct PgMetricsSource {
    pool: PgPool,
}

impl PgMetricsSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricsSource for PgMetricsSource {
    async fn fetch_student_metrics(
        &self,
        student_id: Uuid,
        grade_level: &str,
        time_window_days: u32,
    ) -> anyhow::Result<MetricsSnapshot> {
        let since = Utc::now().date_naive() - Duration::days(i64::from(time_window_days.max(1)));
        let row = sqlx::query(
            r#"
            SELECT m.metrics
            FROM risk_engine.metric_snapshots m
            JOIN risk_engine.students s ON s.id = m.student_id
            WHERE m.student_id = $1
              AND m.captured_on >= $2
              AND ($3 = 'all' OR s.grade_level = $3)
            ORDER BY m.captured_on DESC
            LIMIT 1
            "#,
        )
        .bind(student_id)
        .bind(since)
        .bind(grade_level)
        .fetch_optional(&self.pool)
        .await?
        .with_context(|| format!("no metrics for student {student_id} since {since}"))?;

        let Json(mut snapshot): Json<MetricsSnapshot> = row.try_get("metrics")?;
        if snapshot.time_window_days == 0 {
            snapshot.time_window_days = time_window_days;
        }
        Ok(snapshot)
    }
}

pub async fn fetch_roster(
    pool: &PgPool,
    student_ids: &[Uuid],
) -> anyhow::Result<Vec<StudentRecord>> {
    let rows = sqlx::query(
        "SELECT id, full_name, email, cohort FROM risk_engine.students WHERE id = ANY($1)",
    )
    .bind(student_ids)
    .fetch_all(pool)
    .await?;

    let mut students = Vec::new();
    for row in rows {
        students.push(StudentRecord {
            student_id: row.get("id"),
            full_name: row.get("full_name"),
            email: row.get("email"),
            cohort: row.get("cohort"),
        });
    }
    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_split_into_student_and_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.csv");
        let header = "full_name,email,cohort,grade_level,captured_on,source_key,\
                      time_window_days,current_streak,average_accuracy,days_since_last_activity";
        let rows = "Avery Lee,avery@example.edu,2026,grade-8,2026-10-01,row-1,30,0,42.5,\n\
                    Kiara Patel,kiara@example.edu,2025,grade-9,2026-10-02,,14,12,91,1\n";
        std::fs::write(&path, format!("{header}\n{rows}")).unwrap();

        let rows = read_snapshot_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);

        let (avery, avery_metrics) = &rows[0];
        assert_eq!(avery.email, "avery@example.edu");
        assert_eq!(avery.source_key.as_deref(), Some("row-1"));
        assert_eq!(avery_metrics.time_window_days, 30);
        assert_eq!(avery_metrics.average_accuracy, 42.5);
        assert_eq!(avery_metrics.total_sessions, 0);
        assert_eq!(avery_metrics.days_since_last_activity, None);
        assert_eq!(avery_metrics.idle_days(), 30);

        let (kiara, kiara_metrics) = &rows[1];
        assert_eq!(kiara.source_key, None);
        assert_eq!(kiara.captured_on, NaiveDate::from_ymd_opt(2026, 10, 2).unwrap());
        assert_eq!(kiara_metrics.current_streak, 12);
        assert_eq!(kiara_metrics.days_since_last_activity, Some(1));
    }

    #[test]
    fn bad_metric_value_reports_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshots.csv");
        std::fs::write(
            &path,
            "full_name,email,cohort,grade_level,captured_on,current_streak\n\
             Avery Lee,avery@example.edu,2026,grade-8,2026-10-01,lots\n",
        )
        .unwrap();

        let err = read_snapshot_csv(&path).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }
}
