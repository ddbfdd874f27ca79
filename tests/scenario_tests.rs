// Copyright (c) 2025 - Cowboy AI, Inc.
//! End-to-end scenarios through the service layer
//!
//! open → add 2 shoes @100 → add 1 t-shirt @5 → remove 1 shoe → confirm

mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use fixtures::*;
use futures::future::join_all;
use pretty_assertions::assert_eq;

use eventsourced_cart::aggregate::{ShoppingCartError, ShoppingCartStatus};
use eventsourced_cart::config::{connect_store, EventStoreConfig};
use eventsourced_cart::event_store::{EventStore, InMemoryEventStore};
use eventsourced_cart::service::{
    shopping_cart_stream_id, RetryPolicy, ServiceError, ShoppingCartService,
};

async fn run_scenario<S: EventStore>(service: &ShoppingCartService<S>) -> Result<()> {
    service.open(open_command()).await?;
    service.add_product_item(add_command(two_pairs_of_shoes())).await?;
    service.add_product_item(add_command(t_shirt())).await?;
    service.remove_product_item(remove_command(pair_of_shoes())).await?;
    service.confirm(confirm_command()).await?;
    Ok(())
}

#[tokio::test]
async fn test_shopping_cart_scenario() -> Result<()> {
    let service = ShoppingCartService::new(InMemoryEventStore::new());

    run_scenario(&service).await?;

    let events = service.events(cart_id()).await?;
    assert_eq!(events.len(), 5);
    assert_eq!(events, scenario_events());

    let cart = service.get_cart(cart_id()).await?;
    assert_eq!(cart.status, ShoppingCartStatus::Confirmed);
    assert_eq!(cart.product_items.as_slice(), &[pair_of_shoes(), t_shirt()]);
    assert_eq!(cart.product_items.total_amount(), 105.0);

    Ok(())
}

#[tokio::test]
async fn test_cancel_after_confirm_is_rejected() -> Result<()> {
    let service = ShoppingCartService::new(InMemoryEventStore::new());
    run_scenario(&service).await?;

    let err = service
        .cancel(cancel_command())
        .await
        .expect_err("confirmed cart must not be canceled");

    assert_eq!(
        err.business().map(ShoppingCartError::code),
        Some("CART_IS_ALREADY_CLOSED")
    );
    assert_eq!(service.events(cart_id()).await?.len(), 5);

    Ok(())
}

#[tokio::test]
async fn test_scenario_against_configured_store() -> Result<()> {
    let store = connect_store(&EventStoreConfig::default()).await?;
    let service = ShoppingCartService::new(store);

    run_scenario(&service).await?;

    let revision = service
        .store()
        .stream_revision(&shopping_cart_stream_id(cart_id()))
        .await?;
    assert_eq!(revision, 5);

    Ok(())
}

#[tokio::test]
async fn test_service_from_config_applies_retry_settings() -> Result<()> {
    let config = EventStoreConfig::from_lookup(|key| match key {
        "EVENT_STORE_BACKEND" => Some("memory".to_string()),
        "ES_RETRY_MAX_ATTEMPTS" => Some("1".to_string()),
        "ES_RETRY_BACKOFF_MS" => Some("0".to_string()),
        _ => None,
    })?;
    let service = Arc::new(ShoppingCartService::from_config(&config).await?);

    assert_eq!(
        *service.retry_policy(),
        RetryPolicy::new(1, Duration::ZERO)
    );

    service.open(open_command()).await?;

    let adds = (0..16).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.add_product_item(add_command(t_shirt())).await })
    });

    for joined in join_all(adds).await {
        match joined? {
            Ok(_) => {}
            Err(ServiceError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 1),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_concurrent_adds_converge_with_retry() -> Result<()> {
    let store = Arc::new(InMemoryEventStore::new());
    let service = Arc::new(
        ShoppingCartService::new(Arc::clone(&store))
            .with_retry_policy(RetryPolicy::new(20, Duration::from_millis(1))),
    );
    service.open(open_command()).await?;

    let adds = (0..5).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.add_product_item(add_command(t_shirt())).await })
    });

    for joined in join_all(adds).await {
        joined??;
    }

    let cart = service.get_cart(cart_id()).await?;
    assert_eq!(cart.product_items.total_quantity(), 5);
    assert_eq!(store.stream_revision(&shopping_cart_stream_id(cart_id())).await?, 6);

    Ok(())
}

#[tokio::test]
async fn test_without_retry_a_lost_race_surfaces_as_exhausted() -> Result<()> {
    let service = Arc::new(
        ShoppingCartService::new(InMemoryEventStore::new())
            .with_retry_policy(RetryPolicy::no_retry()),
    );
    service.open(open_command()).await?;

    let adds = (0..16).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.add_product_item(add_command(t_shirt())).await })
    });

    let mut accepted = 0u64;
    for joined in join_all(adds).await {
        match joined? {
            Ok(_) => accepted += 1,
            Err(ServiceError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 1),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let cart = service.get_cart(cart_id()).await?;
    assert_eq!(cart.product_items.total_quantity(), accepted);

    Ok(())
}
