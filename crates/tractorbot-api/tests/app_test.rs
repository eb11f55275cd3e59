use std::io::Write;

use tractorbot_api::{
    app::{build_state, build_vector_db},
    config::Config,
};

fn seeded_config(seed: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.vector.memory_fallback = true;
    config.vector.dimension = 32;
    config.context.seed_file = Some(seed.display().to_string());
    config
}

fn seed_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Captain Tractors\n1. DI 1000 is 25 HP\n2. DI 650 is 20 HP\n").unwrap();
    file
}

#[tokio::test]
async fn test_server_seeds_memory_store_once() {
    let file = seed_file();
    let state = build_state(seeded_config(file.path())).await.unwrap();

    let db = state.chat.vector_db().expect("memory store configured");
    assert_eq!(db.stats().await.unwrap().total_vector_count, 3);

    let items = db.query_context("DI 1000 is 25 HP", 3).await.unwrap();
    let hits = items.iter().filter(|i| i.text == "DI 1000 is 25 HP").count();
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn test_building_vector_db_does_not_ingest() {
    let file = seed_file();
    let db = build_vector_db(&seeded_config(file.path()))
        .await
        .unwrap()
        .expect("memory store configured");
    assert_eq!(db.stats().await.unwrap().total_vector_count, 0);
}

#[tokio::test]
async fn test_no_vector_db_without_pinecone_or_fallback() {
    let config = Config::default();
    assert!(build_vector_db(&config).await.unwrap().is_none());
}
