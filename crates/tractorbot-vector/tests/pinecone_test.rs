use mockito::Matcher;
use serde_json::json;
use tractorbot_vector::{PineconeClient, PineconeConfig, VectorRecord, VectorStore};

fn client_for(server: &mockito::Server) -> PineconeClient {
    PineconeClient::new(PineconeConfig::new("test-key", "tractors").with_host(server.url()))
        .unwrap()
}

#[tokio::test]
async fn test_query_keeps_only_matches_with_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/query")
        .match_header("Api-Key", "test-key")
        .match_body(Matcher::PartialJson(json!({"topK": 3, "includeMetadata": true})))
        .with_status(200)
        .with_body(
            json!({
                "matches": [
                    {"id": "a", "score": 0.92, "metadata": {"text": "DI 1000 is 25 HP"}},
                    {"id": "b", "score": 0.81, "metadata": {"source": "brochure"}},
                    {"id": "c", "score": 0.75}
                ],
                "namespace": ""
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let items = client.query(&[0.1, 0.2, 0.3], 3).await.unwrap();

    mock.assert_async().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "a");
    assert_eq!(items[0].text, "DI 1000 is 25 HP");
}

#[tokio::test]
async fn test_host_resolved_from_control_plane_once() {
    let mut server = mockito::Server::new_async().await;
    let url = server.url();
    let describe = server
        .mock("GET", "/indexes/tractors")
        .with_status(200)
        .with_body(json!({"name": "tractors", "host": url}).to_string())
        .expect(1)
        .create_async()
        .await;
    let stats = server
        .mock("POST", "/describe_index_stats")
        .with_status(200)
        .with_body(json!({"dimension": 384, "totalVectorCount": 7, "indexFullness": 0.0}).to_string())
        .expect(2)
        .create_async()
        .await;

    let client = PineconeClient::new(
        PineconeConfig::new("test-key", "tractors").with_control_plane(url),
    )
    .unwrap();

    let first = client.stats().await.unwrap();
    let second = client.stats().await.unwrap();

    describe.assert_async().await;
    stats.assert_async().await;
    assert_eq!(first.total_vector_count, 7);
    assert_eq!(second.dimension, Some(384));
}

#[tokio::test]
async fn test_upsert_returns_count() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/vectors/upsert")
        .match_body(Matcher::PartialJson(json!({"vectors": [{"id": "v1"}]})))
        .with_status(200)
        .with_body(json!({"upsertedCount": 1}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let mut metadata = serde_json::Map::new();
    metadata.insert("text".to_string(), json!("Captain E-Trac"));
    let written = client
        .upsert(vec![VectorRecord { id: "v1".to_string(), values: vec![0.5; 3], metadata }])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(written, 1);
}

#[tokio::test]
async fn test_empty_batches_skip_network() {
    let server = mockito::Server::new_async().await;
    let client = client_for(&server);
    assert_eq!(client.upsert(Vec::new()).await.unwrap(), 0);
    client.delete(&[]).await.unwrap();
}

#[tokio::test]
async fn test_api_error_surfaces_status_and_health_fails() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/describe_index_stats")
        .with_status(401)
        .with_body("invalid api key")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.stats().await.unwrap_err();
    assert!(err.to_string().contains("401"));
    assert!(!client.health_check().await);
}

#[tokio::test]
async fn test_delete_sends_ids() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/vectors/delete")
        .match_body(Matcher::PartialJson(json!({"ids": ["x", "y"]})))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = client_for(&server);
    client.delete(&["x".to_string(), "y".to_string()]).await.unwrap();
    mock.assert_async().await;
}
