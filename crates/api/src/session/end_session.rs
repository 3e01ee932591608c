use super::lifecycle::{audit, Session};
use crate::{
    error::PortalError,
    shared::usecase::{execute, UseCase},
};
use portal_scheduler_domain::{AuditAction, AuditSeverity, LogoutReason};
use portal_scheduler_infra::PortalContext;

fn handle_error(e: UseCaseErrors) -> PortalError {
    match e {
        UseCaseErrors::AlreadyEnded => {
            PortalError::BadClientData("The session has already ended".into())
        }
    }
}

pub async fn end_session(
    session: Session,
    reason: LogoutReason,
    ctx: &PortalContext,
) -> Result<(), PortalError> {
    let usecase = EndSessionUseCase {
        session: Some(session),
        reason,
    };

    execute(usecase, ctx).await.map_err(handle_error)
}

#[derive(Debug)]
pub struct EndSessionUseCase {
    pub session: Option<Session>,
    pub reason: LogoutReason,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    AlreadyEnded,
}

#[async_trait::async_trait]
impl UseCase for EndSessionUseCase {
    type Response = ();

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &PortalContext) -> Result<Self::Response, Self::Errors> {
        let session = match self.session.take() {
            Some(session) if !session.is_ended() => session,
            _ => return Err(UseCaseErrors::AlreadyEnded),
        };

        let severity = match self.reason {
            LogoutReason::Inactivity { .. } => AuditSeverity::Warning,
            LogoutReason::UserRequested => AuditSeverity::Info,
        };
        // Sideeffect, failures are ignored
        audit(
            ctx,
            session.viewer(),
            AuditAction::Logout,
            &self.reason.message(),
            severity,
        )
        .await;

        session.end();
        Ok(())
    }
}
