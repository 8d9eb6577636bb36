//! Trending behavior against a real (mocked) likes service.
//!
//! The trending strip must always render: any provider failure degrades to
//! zero like counts instead of an error.

use std::time::Duration;

use chrono::NaiveDate;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use replay::catalog::{Catalog, Location, Recording};
use replay::likes::{HttpLikeProvider, LikeCounts};
use replay::ranking::trending_recordings;

fn recording(id: &str, date: NaiveDate, location: Location) -> Recording {
    Recording {
        id: id.to_string(),
        short_id: format!("s-{id}"),
        slug: format!("slug-{id}"),
        title: format!("Talk {id}"),
        description: None,
        speakers: vec![],
        date,
        tags: vec![],
        location,
        episode: None,
        episode_number: None,
        feature_hero_thumbnail: false,
    }
}

fn fixture_catalog() -> Catalog {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
    Catalog::from_records(vec![
        recording("a", d(2024, 12, 20), Location::Amsterdam),
        recording("b", d(2024, 12, 10), Location::Utrecht),
        recording("c", d(2024, 11, 1), Location::Amsterdam),
        recording("d", d(2024, 6, 1), Location::Utrecht),
    ])
}

#[tokio::test]
async fn healthy_provider_counts_flow_into_ranking() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/counts"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "d": 20, "b": 1 })),
        )
        .mount(&server)
        .await;

    let provider =
        HttpLikeProvider::new(format!("{}/counts", server.uri()), Duration::from_secs(2)).unwrap();
    let counts = provider.fetch_like_counts().await.unwrap();
    assert_eq!(counts.get("d"), Some(&20));

    let now = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let result = trending_recordings(&fixture_catalog(), &counts, now, 4);

    // d: 20*3 + 2 = 62 beats everything despite its age.
    assert_eq!(result[0].recording.id, "d");
    assert_eq!(result[0].like_count, 20);
    assert_eq!(result[0].trending_score, 62);
}

#[tokio::test]
async fn failing_provider_degrades_to_zero_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/counts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider =
        HttpLikeProvider::new(format!("{}/counts", server.uri()), Duration::from_secs(2)).unwrap();
    let counts = provider.fetch_like_counts_or_empty().await;
    assert!(counts.is_empty());

    let now = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let result = trending_recordings(&fixture_catalog(), &counts, now, 3);

    // Still exactly `limit` entries, every count zero, ranked by recency.
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|e| e.like_count == 0));
    assert_eq!(result[0].recording.id, "a");
}

#[tokio::test]
async fn slow_provider_times_out_and_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/counts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "a": 9 }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let provider =
        HttpLikeProvider::new(format!("{}/counts", server.uri()), Duration::from_millis(200))
            .unwrap();
    let counts = provider.fetch_like_counts_or_empty().await;
    assert!(counts.is_empty());
}

#[tokio::test]
async fn malformed_payload_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/counts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider =
        HttpLikeProvider::new(format!("{}/counts", server.uri()), Duration::from_secs(2)).unwrap();
    assert!(provider.fetch_like_counts().await.is_err());
    assert!(provider.fetch_like_counts_or_empty().await.is_empty());
}

#[test]
fn no_provider_at_all_is_equivalent_to_empty_counts() {
    let now = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let catalog = fixture_catalog();
    let from_empty = trending_recordings(&catalog, &LikeCounts::new(), now, 4);
    assert_eq!(from_empty.len(), 4);
    assert!(from_empty.iter().all(|e| e.like_count == 0));
}
