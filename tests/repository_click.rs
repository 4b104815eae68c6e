//! PostgreSQL click repository tests. Need `DATABASE_URL`; run with `--ignored`.

use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use snaplink::domain::click_event::ClickEvent;
use snaplink::domain::click_queue::click_queue;
use snaplink::domain::click_worker::ClickWorkerPool;
use snaplink::domain::entities::{NewClick, NewLink};
use snaplink::domain::repositories::{ClickRepository, LinkRepository};
use snaplink::error::AppError;
use snaplink::infrastructure::persistence::{PgClickRepository, PgLinkRepository};

async fn seed_link(pool: &Arc<PgPool>, code: &str) -> i64 {
    PgLinkRepository::new(pool.clone())
        .create(NewLink {
            code: code.to_string(),
            long_url: "https://example.com".to_string(),
        })
        .await
        .unwrap()
        .id
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_and_count_clicks(pool: PgPool) {
    let pool = Arc::new(pool);
    let link_id = seed_link(&pool, "counted").await;
    let repo = PgClickRepository::new(pool);

    for _ in 0..3 {
        let click = repo
            .create_click(NewClick {
                link_id,
                clicked_at: Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(click.link_id, link_id);
    }

    assert_eq!(repo.count_by_link_id(link_id).await.unwrap(), 3);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_click_for_missing_link_rejected(pool: PgPool) {
    let repo = PgClickRepository::new(Arc::new(pool));

    let result = repo
        .create_click(NewClick {
            link_id: 424_242,
            clicked_at: Utc::now(),
        })
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_worker_pool_round_trip(pool: PgPool) {
    let pool = Arc::new(pool);
    let link_id = seed_link(&pool, "roundtrip").await;
    let repo = Arc::new(PgClickRepository::new(pool));

    let (sender, receiver) = click_queue(16).unwrap();
    let workers = ClickWorkerPool::spawn(3, receiver, repo.clone());

    for _ in 0..10 {
        sender
            .enqueue(ClickEvent::new(link_id, Utc::now(), Some("test"), None))
            .unwrap();
    }

    workers.shutdown(Duration::from_secs(10)).await;

    assert_eq!(repo.count_by_link_id(link_id).await.unwrap(), 10);
}
