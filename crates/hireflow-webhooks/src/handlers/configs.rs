//! CRUD and delivery handlers for webhook configurations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use hireflow_core::{TenantContext, WebhookEventType, WebhookId};
use validator::Validate;

use crate::error::{ApiResult, WebhookError};
use crate::models::{
    CreateWebhookRequest, EventTypeInfo, EventTypeListResponse, TestDeliveryResponse,
    UpdateWebhookRequest, WebhookConfigView, WebhookListResponse, WebhookWithSecret,
};
use crate::router::WebhooksState;

// ---------------------------------------------------------------------------
// Config CRUD handlers
// ---------------------------------------------------------------------------

/// Register a new webhook.
#[utoipa::path(
    post,
    path = "/webhooks",
    tag = "Webhooks",
    request_body = CreateWebhookRequest,
    responses(
        (status = 201, description = "Webhook created; the signing secret is only returned here", body = WebhookWithSecret),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Webhook limit exceeded"),
    )
)]
pub async fn create_webhook_handler(
    State(state): State<WebhooksState>,
    Extension(tenant): Extension<TenantContext>,
    Json(request): Json<CreateWebhookRequest>,
) -> ApiResult<(StatusCode, Json<WebhookWithSecret>)> {
    request
        .validate()
        .map_err(|e| WebhookError::Validation(e.to_string()))?;

    let response = state
        .registry
        .create_webhook(tenant.tenant_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List the tenant's webhooks.
#[utoipa::path(
    get,
    path = "/webhooks",
    tag = "Webhooks",
    responses(
        (status = 200, description = "All webhooks of the tenant, secrets redacted", body = WebhookListResponse),
    )
)]
pub async fn list_webhooks_handler(
    State(state): State<WebhooksState>,
    Extension(tenant): Extension<TenantContext>,
) -> ApiResult<Json<WebhookListResponse>> {
    let response = state.registry.list_webhooks(tenant.tenant_id).await?;
    Ok(Json(response))
}

/// Get a single webhook.
#[utoipa::path(
    get,
    path = "/webhooks/{id}",
    tag = "Webhooks",
    params(
        ("id" = String, Path, description = "Webhook ID")
    ),
    responses(
        (status = 200, description = "Webhook details, secret redacted", body = WebhookConfigView),
        (status = 404, description = "Webhook not found"),
    )
)]
pub async fn get_webhook_handler(
    State(state): State<WebhooksState>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<WebhookId>,
) -> ApiResult<Json<WebhookConfigView>> {
    let response = state.registry.get_webhook(tenant.tenant_id, &id).await?;
    Ok(Json(response))
}

/// Partially update a webhook.
#[utoipa::path(
    patch,
    path = "/webhooks/{id}",
    tag = "Webhooks",
    params(
        ("id" = String, Path, description = "Webhook ID")
    ),
    request_body = UpdateWebhookRequest,
    responses(
        (status = 200, description = "Updated webhook, secret redacted", body = WebhookConfigView),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Webhook not found"),
    )
)]
pub async fn update_webhook_handler(
    State(state): State<WebhooksState>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<WebhookId>,
    Json(request): Json<UpdateWebhookRequest>,
) -> ApiResult<Json<WebhookConfigView>> {
    request
        .validate()
        .map_err(|e| WebhookError::Validation(e.to_string()))?;

    let response = state
        .registry
        .update_webhook(tenant.tenant_id, &id, request)
        .await?;

    Ok(Json(response))
}

/// Delete a webhook.
#[utoipa::path(
    delete,
    path = "/webhooks/{id}",
    tag = "Webhooks",
    params(
        ("id" = String, Path, description = "Webhook ID")
    ),
    responses(
        (status = 204, description = "Webhook deleted"),
        (status = 404, description = "Webhook not found"),
    )
)]
pub async fn delete_webhook_handler(
    State(state): State<WebhooksState>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<WebhookId>,
) -> ApiResult<StatusCode> {
    state.registry.delete_webhook(tenant.tenant_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Secret rotation and test delivery
// ---------------------------------------------------------------------------

/// Rotate a webhook's signing secret.
#[utoipa::path(
    post,
    path = "/webhooks/{id}/regenerate-secret",
    tag = "Webhooks",
    params(
        ("id" = String, Path, description = "Webhook ID")
    ),
    responses(
        (status = 200, description = "Webhook with its new signing secret", body = WebhookWithSecret),
        (status = 404, description = "Webhook not found"),
    )
)]
pub async fn regenerate_secret_handler(
    State(state): State<WebhooksState>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<WebhookId>,
) -> ApiResult<Json<WebhookWithSecret>> {
    let response = state
        .registry
        .regenerate_secret(tenant.tenant_id, &id)
        .await?;
    Ok(Json(response))
}

/// Send a test ping to a webhook endpoint.
#[utoipa::path(
    post,
    path = "/webhooks/{id}/test",
    tag = "Webhooks",
    params(
        ("id" = String, Path, description = "Webhook ID")
    ),
    responses(
        (status = 200, description = "Outcome of the test delivery", body = TestDeliveryResponse),
        (status = 404, description = "Webhook not found"),
    )
)]
pub async fn send_test_handler(
    State(state): State<WebhooksState>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<WebhookId>,
) -> ApiResult<Json<TestDeliveryResponse>> {
    let response = state.dispatcher.send_test(tenant.tenant_id, &id).await?;
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Event type catalog
// ---------------------------------------------------------------------------

/// List all subscribable event types.
#[utoipa::path(
    get,
    path = "/webhooks/event-types",
    tag = "Webhooks",
    responses(
        (status = 200, description = "Event type catalog", body = EventTypeListResponse),
    )
)]
pub async fn list_event_types_handler() -> Json<EventTypeListResponse> {
    let event_types = WebhookEventType::all()
        .iter()
        .map(|et| EventTypeInfo {
            id: et.as_str().to_string(),
            name: et.name().to_string(),
            category: et.category().to_string(),
            description: et.description().to_string(),
        })
        .collect();

    Json(EventTypeListResponse { event_types })
}
