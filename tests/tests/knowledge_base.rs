use tests::{BagOfWordsEmbedder, Fixture, RACI_FRAMEWORK};

#[tokio::test]
async fn unchanged_documents_are_not_embedded_twice() {
    let fixture = Fixture::new();
    let embedder = BagOfWordsEmbedder::new("bow-v1");
    let service = fixture.knowledge_service(embedder.clone());

    let first = service.build_knowledge_base().await.unwrap();
    assert_eq!(first.files_scanned, 3);
    assert_eq!(first.files_changed, 3);
    assert!(first.chunks_embedded >= 3);
    assert_eq!(first.total_chunks, first.chunks_embedded);
    let calls_after_first = embedder.calls();

    let second = service.build_knowledge_base().await.unwrap();
    assert!(second.is_up_to_date());
    assert_eq!(second.chunks_embedded, 0);
    assert_eq!(second.total_chunks, first.total_chunks);
    assert_eq!(embedder.calls(), calls_after_first);
}

#[tokio::test]
async fn edited_document_is_reembedded_alone() {
    let fixture = Fixture::new();
    let service = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v1"));
    service.build_knowledge_base().await.unwrap();

    fixture.write(
        "raci_matrix.txt",
        &format!("{RACI_FRAMEWORK}\n\nReview the matrix at every phase gate."),
    );
    let report = service.build_knowledge_base().await.unwrap();
    assert_eq!(report.files_changed, 1);
    assert_eq!(report.files_removed, 0);

    let hits = service
        .get_relevant_frameworks("phase gate matrix review", 1)
        .await
        .unwrap();
    assert!(hits[0].text.contains("phase gate"));
}

#[tokio::test]
async fn deleted_document_is_purged_from_the_store() {
    let fixture = Fixture::new();
    let service = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v1"));
    service.build_knowledge_base().await.unwrap();

    fixture.remove("process_improvement.md");
    let report = service.build_knowledge_base().await.unwrap();
    assert_eq!(report.files_removed, 1);

    let hits = service
        .get_relevant_frameworks("waste bottlenecks cycle time", 10)
        .await
        .unwrap();
    assert!(hits
        .iter()
        .all(|hit| !hit.source.ends_with("process_improvement.md")));
}

#[tokio::test]
async fn document_that_becomes_unindexable_is_purged() {
    let fixture = Fixture::new();
    let service = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v1"));
    service.build_knowledge_base().await.unwrap();

    let oversized = format!("{RACI_FRAMEWORK}\n\n{}", "padding ".repeat(300_000));
    fixture.write("raci_matrix.txt", &oversized);
    let report = service.build_knowledge_base().await.unwrap();
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.files_removed, 1);

    let hits = service
        .get_relevant_frameworks("Responsible Accountable Consulted Informed", 10)
        .await
        .unwrap();
    assert!(hits.iter().all(|hit| !hit.source.ends_with("raci_matrix.txt")));

    let again = service.build_knowledge_base().await.unwrap();
    assert!(again.is_up_to_date());
    assert_eq!(again.files_skipped, 1);
}

#[tokio::test]
async fn post_merger_query_retrieves_the_mna_framework_first() {
    let fixture = Fixture::new();
    let service = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v1"));
    service.build_knowledge_base().await.unwrap();

    let hits = service
        .get_relevant_frameworks("How do I handle a post-merger integration?", 2)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].source.ends_with("mna_integration.txt"));
    assert!(hits[0].score > hits[1].score);
}

#[tokio::test]
async fn changing_the_embedding_model_forces_a_reset() {
    let fixture = Fixture::new();
    fixture
        .knowledge_service(BagOfWordsEmbedder::new("bow-v1"))
        .build_knowledge_base()
        .await
        .unwrap();

    let service = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v2"));
    let err = service.load_existing().unwrap_err();
    assert!(err.to_string().contains("--rebuild"));

    let report = service.build_knowledge_base().await.unwrap();
    assert!(report.model_reset);
    assert_eq!(report.files_changed, 3);
    assert!(service.load_existing().is_ok());
}

#[tokio::test]
async fn querying_an_empty_store_is_an_error() {
    let fixture = Fixture::new();
    let service = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v1"));
    let err = service
        .get_relevant_frameworks("anything", 3)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not initialized"));
}

#[tokio::test]
async fn ensure_ready_builds_once_then_loads() {
    let fixture = Fixture::new();
    let embedder = BagOfWordsEmbedder::new("bow-v1");
    let service = fixture.knowledge_service(embedder.clone());

    service.ensure_ready().await.unwrap();
    let calls = embedder.calls();
    assert!(calls > 0);
    service.ensure_ready().await.unwrap();
    assert_eq!(embedder.calls(), calls);
}

#[tokio::test]
async fn ensure_ready_fails_without_documents() {
    let fixture = Fixture::empty();
    let service = fixture.knowledge_service(BagOfWordsEmbedder::new("bow-v1"));
    let err = service.ensure_ready().await.unwrap_err();
    assert!(err.to_string().contains("no framework documents"));
}

#[tokio::test]
async fn rebuild_embeds_everything_again() {
    let fixture = Fixture::new();
    let embedder = BagOfWordsEmbedder::new("bow-v1");
    let service = fixture.knowledge_service(embedder.clone());
    let first = service.build_knowledge_base().await.unwrap();

    let rebuilt = service.rebuild().await.unwrap();
    assert_eq!(rebuilt.files_changed, 3);
    assert_eq!(rebuilt.total_chunks, first.total_chunks);
    assert_eq!(embedder.calls(), first.chunks_embedded * 2);
}
