use crate::{
    error::PortalError,
    shared::usecase::{execute, UseCase},
};
use portal_scheduler_domain::LogoutReason;
use portal_scheduler_infra::PortalContext;

fn handle_error(e: UseCaseErrors) -> PortalError {
    match e {}
}

/// The reason the previous session ended, if it was ended for the viewer.
/// Only the first call after the session ended gets it.
pub async fn take_logout_reason(
    ctx: &PortalContext,
) -> Result<Option<LogoutReason>, PortalError> {
    execute(TakeLogoutReasonUseCase, ctx)
        .await
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct TakeLogoutReasonUseCase;

#[derive(Debug)]
pub enum UseCaseErrors {}

#[async_trait::async_trait]
impl UseCase for TakeLogoutReasonUseCase {
    type Response = Option<LogoutReason>;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &PortalContext) -> Result<Self::Response, Self::Errors> {
        Ok(ctx.repos.session_flags.take_logout_reason().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_is_read_once() {
        let ctx = PortalContext::create_inmemory();
        assert_eq!(take_logout_reason(&ctx).await, Ok(None));

        let reason = LogoutReason::Inactivity { idle_minutes: 15 };
        ctx.repos
            .session_flags
            .set_logout_reason(reason)
            .await
            .unwrap();
        assert_eq!(take_logout_reason(&ctx).await, Ok(Some(reason)));
        assert_eq!(take_logout_reason(&ctx).await, Ok(None));
    }
}
