use factcheck::types::{FactCheckError, GamificationState, Result};
use factcheck::{ClaimService, ClaimStore, MockAnalyzer};
use tracing::info;

async fn seeded_service() -> Result<ClaimService> {
    let store = ClaimStore::in_memory().await?;
    store.seed_sample_data().await?;
    Ok(ClaimService::new(store, Box::new(MockAnalyzer::new("test"))))
}

#[tokio::test]
async fn blank_claims_are_rejected() -> Result<()> {
    let service = seeded_service().await?;
    let result = service.verify("   ", GamificationState::default()).await;
    assert!(matches!(result, Err(FactCheckError::InvalidClaim(_))));
    Ok(())
}

#[tokio::test]
async fn verification_surfaces_related_checks_and_learns() -> Result<()> {
    let _ = tracing_subscriber::fmt().try_init();

    let service = seeded_service().await?;
    let before = service.store().stats().await?.total;

    let report = service
        .verify("COVID-19 vaccines contain microchips", GamificationState::default())
        .await?;
    info!("Verdict report: {:?}", report.classification);

    assert_eq!(report.classification, "False");
    assert!(
        report.related_checks[0].contains("microchips"),
        "the seeded corpus entry should rank first, got {:?}",
        report.related_checks
    );

    // The fresh verdict is persisted so the corpus learns over time.
    let after = service.store().stats().await?;
    assert_eq!(after.total, before + 1);

    let newest = &service.store().recent(1).await?[0];
    assert_eq!(newest.source, "AI");
    assert_eq!(newest.verdict, "False");
    Ok(())
}

#[tokio::test]
async fn gamification_state_is_returned_updated_not_shared() -> Result<()> {
    let service = seeded_service().await?;

    let prior = GamificationState {
        points: 40,
        badges: vec!["Curious Mind".to_string()],
    };
    let report = service.verify("The earth is flat", prior.clone()).await?;

    assert_eq!(report.gamification.points, 50);
    assert!(report.gamification.badges.contains(&"Fact Finder".to_string()));

    // A separate caller with its own state is unaffected.
    let other = service
        .verify("Another unrelated claim", GamificationState::default())
        .await?;
    assert_eq!(other.gamification.points, 10);
    Ok(())
}
