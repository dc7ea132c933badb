use super::common::*;
use crate::workflows::equity::domain::{EstimateMode, InquiryId, LeaseInputError};
use crate::workflows::equity::repository::{InquiryRepository, RepositoryError};
use crate::workflows::equity::{EquityEstimator, InquiryServiceError, LeaseEquityService};
use std::sync::Arc;

#[tokio::test]
async fn submit_records_inquiry_and_notifies() {
    let (service, repository, notifier) = offline_service();

    let inquiry = service
        .submit(lease_input(), CURRENT_YEAR)
        .await
        .expect("submission succeeds");

    assert!(inquiry.id.0.starts_with("inq-"));
    assert_eq!(inquiry.assessment.mode, EstimateMode::Fallback);
    let stored = repository
        .fetch(&inquiry.id)
        .expect("fetch succeeds")
        .expect("inquiry stored");
    assert_eq!(stored, inquiry);

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].inquiry_id, inquiry.id);
    assert_eq!(events[0].vehicle, "2022 Honda Accord EX");
    assert_eq!(events[0].estimated_equity, -4_584);
}

#[tokio::test]
async fn submit_rejects_invalid_input_before_estimating() {
    let (estimator, source) = estimator_with(StaticSource::answering(consistent_report()));
    let repository = Arc::new(MemoryRepository::default());
    let service = LeaseEquityService::new(
        estimator,
        repository.clone(),
        Arc::new(MemoryNotifier::default()),
    );

    let mut input = lease_input();
    input.zip_code = Some("ABCDE".to_string());

    match service.submit(input, CURRENT_YEAR).await {
        Err(InquiryServiceError::Input(LeaseInputError::InvalidZipCode(zip))) => {
            assert_eq!(zip, "ABCDE");
        }
        other => panic!("expected zip validation error, got {other:?}"),
    }
    assert_eq!(source.calls(), 0);
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn notifier_failure_does_not_block_the_estimate() {
    let repository = Arc::new(MemoryRepository::default());
    let service = LeaseEquityService::new(
        EquityEstimator::offline(),
        repository.clone(),
        Arc::new(FailingNotifier),
    );

    let inquiry = service
        .submit(lease_input(), CURRENT_YEAR)
        .await
        .expect("notification failure is swallowed");

    assert_eq!(repository.len(), 1);
    assert_eq!(inquiry.assessment.estimate.estimated_equity, -4_584);
}

#[tokio::test]
async fn repository_failure_propagates() {
    let service = LeaseEquityService::new(
        EquityEstimator::offline(),
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
    );

    match service.submit(lease_input(), CURRENT_YEAR).await {
        Err(InquiryServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_returns_not_found_for_unknown_inquiry() {
    let (service, _, _) = offline_service();

    match service.get(&InquiryId("inq-999999".to_string())) {
        Err(InquiryServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn live_estimates_are_recorded_with_live_mode() {
    let (estimator, _) = estimator_with(StaticSource::answering(consistent_report()));
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = LeaseEquityService::new(estimator, repository.clone(), notifier.clone());

    let first = service
        .submit(lease_input(), CURRENT_YEAR)
        .await
        .expect("first submission");
    let second = service
        .submit(lease_input(), CURRENT_YEAR)
        .await
        .expect("second submission");

    assert_ne!(first.id, second.id);
    assert_eq!(repository.recent(10).expect("recent").len(), 2);
    assert!(notifier
        .events()
        .iter()
        .all(|event| event.mode == EstimateMode::Live));
}

#[tokio::test]
async fn recent_caps_the_requested_limit() {
    let (service, _, _) = offline_service();
    for _ in 0..3 {
        service
            .submit(lease_input(), CURRENT_YEAR)
            .await
            .expect("submission succeeds");
    }

    assert_eq!(service.recent(2).expect("recent").len(), 2);
    assert_eq!(service.recent(usize::MAX).expect("recent").len(), 3);
    assert!(service.recent(0).expect("recent").is_empty());
}
