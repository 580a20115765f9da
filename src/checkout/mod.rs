//! Address submission and the optional order placed right after it.
//!
//! The workflow is a short pipeline of remote steps run strictly in order:
//! save the address, resolve its id, place a cash-on-delivery order. The
//! first failing step ends the run. Nothing is retried, and a saved address
//! is never rolled back when the order that follows it fails.

mod lines;

pub use lines::{ResolvedLines, resolve_lines};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    client::{ApiError, StoreApi},
    models::{Address, Cart, Catalog, OrderRequest, User},
};

pub const ADDRESS_SAVED: &str = "Address added successfully";
pub const ORDER_PLACED: &str = "Order placed successfully";
pub const ADDRESS_FAILED: &str = "Could not save address";
pub const ORDER_FAILED: &str = "Order failed";
pub const ADDRESS_UNRESOLVED: &str = "Saved address could not be found";

/// Where the client should go once a submission has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Navigation {
    Cart,
    OrderHistory,
    StayOnForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Terminal state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Address saved, no order requested.
    Done,
    /// Stopped before anything beyond (possibly) the address was persisted.
    Failed,
    OrderPlaced,
    /// Address saved but the backend refused the order.
    OrderFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CreateAddress,
    ResolveAddress,
    PlaceOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    pub outcome: Outcome,
    pub navigation: Navigation,
    pub notices: Vec<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<Step>,
    /// Cart entries left out of the order because the catalog does not know them.
    pub dropped: Vec<String>,
}

/// What the workflow may touch: identity and catalog read-only, the cart
/// mutably so a placed order can empty it.
#[derive(Debug)]
pub struct CheckoutContext<'a> {
    pub user: &'a User,
    pub catalog: &'a Catalog,
    pub cart: &'a mut Cart,
}

#[derive(Debug)]
enum FailureReason {
    Transport(ApiError),
    Rejected(Option<String>),
    NoSavedAddress,
}

#[derive(Debug)]
struct StepFailure {
    step: Step,
    reason: FailureReason,
}

impl StepFailure {
    fn new(step: Step, reason: FailureReason) -> Self {
        Self { step, reason }
    }

    fn message(&self) -> String {
        match &self.reason {
            FailureReason::Transport(err) => err.user_message(),
            FailureReason::Rejected(Some(message)) => message.clone(),
            FailureReason::Rejected(None) => match self.step {
                Step::PlaceOrder => ORDER_FAILED.to_string(),
                _ => ADDRESS_FAILED.to_string(),
            },
            FailureReason::NoSavedAddress => ADDRESS_UNRESOLVED.to_string(),
        }
    }

    /// Only a refused order sends the shopper back to the cart; everything
    /// else keeps the form open.
    fn terminal(&self) -> (Outcome, Navigation) {
        match (&self.reason, self.step) {
            (FailureReason::Rejected(_), Step::PlaceOrder) => {
                (Outcome::OrderFailed, Navigation::Cart)
            }
            _ => (Outcome::Failed, Navigation::StayOnForm),
        }
    }
}

/// Intermediate result of a successful run.
enum Completed {
    AddressOnly,
    OrderPlaced,
}

/// Submit `address`, and when `place_order_now` is set, order the current
/// cart to it.
///
/// Never returns an error: every terminal state, failures included, is
/// described by the returned report.
#[instrument(
    skip_all,
    fields(
        submission_id = %Uuid::new_v4(),
        user_id = %ctx.user.id,
        place_order_now = place_order_now
    )
)]
pub async fn submit_address<A>(
    api: &A,
    address: &Address,
    place_order_now: bool,
    ctx: CheckoutContext<'_>,
) -> SubmissionReport
where
    A: StoreApi + ?Sized,
{
    let mut notices = Vec::new();
    let mut dropped = Vec::new();

    let result = run(
        api,
        address,
        place_order_now,
        ctx,
        &mut notices,
        &mut dropped,
    )
    .await;

    match result {
        Ok(Completed::AddressOnly) => SubmissionReport {
            outcome: Outcome::Done,
            navigation: Navigation::Cart,
            notices,
            failed_step: None,
            dropped,
        },
        Ok(Completed::OrderPlaced) => SubmissionReport {
            outcome: Outcome::OrderPlaced,
            navigation: Navigation::OrderHistory,
            notices,
            failed_step: None,
            dropped,
        },
        Err(failure) => {
            warn!(step = ?failure.step, reason = ?failure.reason, "submission stopped");
            let (outcome, navigation) = failure.terminal();
            notices.push(Notice::error(failure.message()));
            SubmissionReport {
                outcome,
                navigation,
                notices,
                failed_step: Some(failure.step),
                dropped,
            }
        }
    }
}

async fn run<A>(
    api: &A,
    address: &Address,
    place_order_now: bool,
    ctx: CheckoutContext<'_>,
    notices: &mut Vec<Notice>,
    dropped: &mut Vec<String>,
) -> Result<Completed, StepFailure>
where
    A: StoreApi + ?Sized,
{
    save_address(api, ctx.user, address).await?;
    notices.push(Notice::success(ADDRESS_SAVED));

    if !place_order_now {
        debug!("address saved, no order requested");
        return Ok(Completed::AddressOnly);
    }

    let address_id = resolve_latest_address(api, ctx.user).await?;

    let resolved = resolve_lines(&*ctx.cart, ctx.catalog);
    if !resolved.dropped.is_empty() {
        warn!(
            dropped = ?resolved.dropped,
            "cart entries missing from catalog left out of order"
        );
    }
    dropped.extend(resolved.dropped);

    let order = OrderRequest {
        user_id: ctx.user.id.clone(),
        items: resolved.lines,
        address: address_id,
    };
    place_order(api, ctx.user, &order).await?;

    ctx.cart.clear();
    notices.push(Notice::success(ORDER_PLACED));
    info!(lines = order.items.len(), "order placed");
    Ok(Completed::OrderPlaced)
}

async fn save_address<A>(api: &A, user: &User, address: &Address) -> Result<(), StepFailure>
where
    A: StoreApi + ?Sized,
{
    debug!("creating address");
    let ack = api
        .create_address(user, address)
        .await
        .map_err(|e| StepFailure::new(Step::CreateAddress, FailureReason::Transport(e)))?;
    if !ack.success {
        return Err(StepFailure::new(
            Step::CreateAddress,
            FailureReason::Rejected(ack.message),
        ));
    }
    Ok(())
}

/// The backend lists the newest address first; nothing correlates the entry
/// with the address just created.
async fn resolve_latest_address<A>(api: &A, user: &User) -> Result<String, StepFailure>
where
    A: StoreApi + ?Sized,
{
    debug!("fetching saved addresses");
    let addresses = api
        .list_addresses(user)
        .await
        .map_err(|e| StepFailure::new(Step::ResolveAddress, FailureReason::Transport(e)))?;
    addresses
        .into_iter()
        .next()
        .map(|saved| saved.id)
        .ok_or_else(|| StepFailure::new(Step::ResolveAddress, FailureReason::NoSavedAddress))
}

async fn place_order<A>(api: &A, user: &User, order: &OrderRequest) -> Result<(), StepFailure>
where
    A: StoreApi + ?Sized,
{
    debug!(address_id = %order.address, lines = order.items.len(), "placing order");
    let ack = api
        .place_cod_order(user, order)
        .await
        .map_err(|e| StepFailure::new(Step::PlaceOrder, FailureReason::Transport(e)))?;
    if !ack.success {
        return Err(StepFailure::new(
            Step::PlaceOrder,
            FailureReason::Rejected(ack.message),
        ));
    }
    Ok(())
}
