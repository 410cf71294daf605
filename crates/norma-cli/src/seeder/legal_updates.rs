//! Fake legal updates spread over the supported jurisdictions.

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::chrono::en::DateTimeBetween;
use fake::faker::company::en::CatchPhrase;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use norma_compliance::supported_jurisdictions;

use super::models::{LegalUpdateSeed, SEED_CATEGORIES, SEED_SOURCE};
use crate::CliResult;

const BATCH_SIZE: usize = 500;
const COLUMNS_PER_ROW: usize = 8;

/// Generates `count` updates in parallel. Jurisdictions are assigned round
/// robin so every supported code gets a share.
pub fn generate_legal_updates(count: usize) -> Vec<LegalUpdateSeed> {
    let jurisdictions: Vec<String> = supported_jurisdictions()
        .into_iter()
        .map(|j| j.code)
        .collect();
    let now = Utc::now();
    let oldest = now - Duration::days(180);

    (0..count)
        .into_par_iter()
        .map(|i| {
            let jurisdiction = jurisdictions[i % jurisdictions.len()].clone();
            let category = SEED_CATEGORIES[i % SEED_CATEGORIES.len()].to_string();
            let headline: String = CatchPhrase().fake();

            LegalUpdateSeed {
                title: format!("{} ({})", headline, jurisdiction.to_uppercase()),
                summary: Sentence(8..16).fake(),
                content: Paragraph(3..6).fake(),
                url: format!("https://updates.norma.ai/{}/{}", jurisdiction, i + 1),
                publication_date: DateTimeBetween(oldest, now).fake(),
                jurisdiction,
                category,
            }
        })
        .collect()
}

pub async fn seed_legal_updates(db: &PgPool, count: usize) -> CliResult<u64> {
    let start_time = Instant::now();
    println!("📰 Seeding {} legal updates...", count);

    let updates = generate_legal_updates(count);
    let inserted = insert_legal_updates_batch(db, &updates).await?;

    println!(
        "   ✓ Inserted {} legal updates in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

pub async fn insert_legal_updates_batch(db: &PgPool, updates: &[LegalUpdateSeed]) -> CliResult<u64> {
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in updates.chunks(BATCH_SIZE) {
        inserted += insert_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_chunk(
    tx: &mut Transaction<'_, Postgres>,
    updates: &[LegalUpdateSeed],
) -> CliResult<u64> {
    if updates.is_empty() {
        return Ok(0);
    }

    let mut query = String::from(
        "INSERT INTO legal_updates \
         (title, summary, content, jurisdiction, publication_date, category, source, url) VALUES ",
    );
    for i in 0..updates.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let base = i * COLUMNS_PER_ROW;
        let placeholders: Vec<String> = (1..=COLUMNS_PER_ROW)
            .map(|n| format!("${}", base + n))
            .collect();
        query.push_str(&format!("({})", placeholders.join(", ")));
    }

    let mut q = sqlx::query(&query);
    for update in updates {
        q = q
            .bind(&update.title)
            .bind(&update.summary)
            .bind(&update.content)
            .bind(&update.jurisdiction)
            .bind(update.publication_date)
            .bind(&update.category)
            .bind(SEED_SOURCE)
            .bind(&update.url);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

/// Deletes every update whose source is the seeder.
pub async fn clear_legal_updates(db: &PgPool) -> CliResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded legal updates...");

    let deleted = sqlx::query("DELETE FROM legal_updates WHERE source = $1")
        .bind(SEED_SOURCE)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} legal updates in {:?}",
        deleted,
        start_time.elapsed()
    );
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_requested_count_across_jurisdictions() {
        let updates = generate_legal_updates(40);
        assert_eq!(updates.len(), 40);

        let codes: HashSet<_> = updates.iter().map(|u| u.jurisdiction.as_str()).collect();
        assert_eq!(codes.len(), supported_jurisdictions().len());

        let now = Utc::now();
        for update in &updates {
            assert!(!update.title.is_empty());
            assert!(update.publication_date <= now);
            assert!(update.url.starts_with("https://updates.norma.ai/"));
        }
    }

    #[test]
    fn zero_count_generates_nothing() {
        assert!(generate_legal_updates(0).is_empty());
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "requires PostgreSQL"]
    async fn seed_then_clear(pool: PgPool) {
        assert_eq!(seed_legal_updates(&pool, 12).await.unwrap(), 12);
        sqlx::query(
            "INSERT INTO legal_updates (title, jurisdiction, publication_date, source) \
             VALUES ('Curated', 'us', NOW(), 'Federal Register')",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert_eq!(clear_legal_updates(&pool).await.unwrap(), 12);
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM legal_updates")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }
}
