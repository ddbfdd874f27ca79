// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shopping Cart Application Service
//!
//! Entry point for callers: each mutating method runs one command through
//! [`CommandHandler::handle_with_retry`] against the cart's stream
//! (`shopping_cart-<id>`).

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::aggregate::{
    AddProductItemToShoppingCart, CancelShoppingCart, ConfirmShoppingCart, OpenShoppingCart,
    RemoveProductItemFromShoppingCart, ShoppingCart, ShoppingCartCommand, ShoppingCartDecider,
    ShoppingCartError,
};
use crate::config::{connect_store, EventStoreConfig};
use crate::errors::{StoreError, StoreResult};
use crate::event_store::{EventStore, EventStoreExt};
use crate::events::ShoppingCartEvent;
use crate::service::command_handler::{CommandHandler, CommandResult};
use crate::service::retry::RetryPolicy;
use crate::service::ServiceError;

/// Result type for cart operations
pub type CartResult<T> = Result<T, ServiceError<ShoppingCartError>>;

/// Stream holding the events of one cart
pub fn shopping_cart_stream_id(shopping_cart_id: Uuid) -> String {
    format!("shopping_cart-{shopping_cart_id}")
}

/// Event-sourced shopping cart service
pub struct ShoppingCartService<S> {
    handler: CommandHandler<ShoppingCartDecider, S>,
}

impl ShoppingCartService<Arc<dyn EventStore>> {
    /// Connect the configured store and apply the configured retry policy
    pub async fn from_config(config: &EventStoreConfig) -> StoreResult<Self> {
        let store = connect_store(config).await?;
        Ok(Self::new(store).with_retry_policy(config.retry_policy()))
    }
}

impl<S: EventStore> ShoppingCartService<S> {
    /// Create a service over `store` with the default retry policy
    pub fn new(store: S) -> Self {
        Self {
            handler: CommandHandler::new(store),
        }
    }

    pub fn with_retry_policy(self, retry: RetryPolicy) -> Self {
        Self {
            handler: self.handler.with_retry_policy(retry),
        }
    }

    pub fn store(&self) -> &S {
        self.handler.store()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.handler.retry_policy()
    }

    #[instrument(skip(self, command), fields(command_type = command.command_type()))]
    async fn execute(
        &self,
        command: ShoppingCartCommand,
    ) -> CartResult<CommandResult<ShoppingCartEvent>> {
        let stream_id = shopping_cart_stream_id(command.shopping_cart_id());
        self.handler.handle_with_retry(&stream_id, &command).await
    }

    pub async fn open(
        &self,
        command: OpenShoppingCart,
    ) -> CartResult<CommandResult<ShoppingCartEvent>> {
        let cart_id = command.shopping_cart_id;
        let result = self
            .execute(ShoppingCartCommand::OpenShoppingCart(command))
            .await?;

        info!(%cart_id, "Shopping cart opened");
        Ok(result)
    }

    pub async fn add_product_item(
        &self,
        command: AddProductItemToShoppingCart,
    ) -> CartResult<CommandResult<ShoppingCartEvent>> {
        self.execute(ShoppingCartCommand::AddProductItemToShoppingCart(command))
            .await
    }

    pub async fn remove_product_item(
        &self,
        command: RemoveProductItemFromShoppingCart,
    ) -> CartResult<CommandResult<ShoppingCartEvent>> {
        self.execute(ShoppingCartCommand::RemoveProductItemFromShoppingCart(command))
            .await
    }

    pub async fn confirm(
        &self,
        command: ConfirmShoppingCart,
    ) -> CartResult<CommandResult<ShoppingCartEvent>> {
        self.execute(ShoppingCartCommand::ConfirmShoppingCart(command))
            .await
    }

    pub async fn cancel(
        &self,
        command: CancelShoppingCart,
    ) -> CartResult<CommandResult<ShoppingCartEvent>> {
        self.execute(ShoppingCartCommand::CancelShoppingCart(command))
            .await
    }

    /// Current cart state
    ///
    /// # Errors
    ///
    /// `ServiceError::Store(StoreError::NotFound)` if the cart was never opened.
    pub async fn get_cart(&self, shopping_cart_id: Uuid) -> CartResult<ShoppingCart> {
        let stream_id = shopping_cart_stream_id(shopping_cart_id);

        let (cart, _) = self.handler.load(&stream_id).await?;
        cart.ok_or_else(|| ServiceError::Store(StoreError::NotFound(stream_id)))
    }

    /// Every event recorded for a cart, oldest first
    pub async fn events(&self, shopping_cart_id: Uuid) -> CartResult<Vec<ShoppingCartEvent>> {
        let stream_id = shopping_cart_stream_id(shopping_cart_id);
        Ok(self.store().read_events::<ShoppingCartEvent>(&stream_id).await?)
    }
}
