use super::session::AccountSession;
use crate::context::Context;
use crate::error::WorkflowError;
use crate::runtime::BoxFuture;
use crate::store::StorageAddress;

/// Site-specific business logic driven by the orchestrator.
///
/// Implementations only describe one account's work; iteration, failure
/// isolation, persistence and the summary are handled by the caller.
pub trait SiteWorkflow: Send + Sync {
    fn name(&self) -> &str;

    /// Where the JSON account list for this site lives.
    fn accounts_address(&self) -> &StorageAddress;

    /// Validate or refresh the account's credential before any step runs.
    fn authenticate<'a>(
        &'a self,
        ctx: &'a Context,
        session: &'a mut AccountSession,
    ) -> BoxFuture<'a, Result<(), WorkflowError>>;

    /// Ordered step names.
    fn steps(&self) -> Vec<&str>;

    fn run_step<'a>(
        &'a self,
        ctx: &'a Context,
        step: &'a str,
        session: &'a mut AccountSession,
    ) -> BoxFuture<'a, Result<(), WorkflowError>>;
}
