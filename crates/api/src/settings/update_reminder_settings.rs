use crate::{
    error::PortalError,
    notifications::NotificationStore,
    shared::usecase::{execute, UseCase},
};
use portal_scheduler_domain::{NotificationKind, ReminderSettings};
use portal_scheduler_infra::PortalContext;

fn handle_error(e: UseCaseErrors) -> PortalError {
    match e {
        UseCaseErrors::InvalidSettings(msg) => PortalError::BadClientData(msg),
        UseCaseErrors::StorageError => PortalError::InternalError,
    }
}

/// Saves the reminder preferences of the viewer. A running scheduler
/// picks them up right away.
pub async fn update_reminder_settings(
    settings: ReminderSettings,
    notifications: Option<&NotificationStore>,
    ctx: &PortalContext,
) -> Result<ReminderSettings, PortalError> {
    let usecase = UpdateReminderSettingsUseCase {
        settings,
        notifications: notifications.cloned(),
    };

    execute(usecase, ctx).await.map_err(handle_error)
}

pub struct UpdateReminderSettingsUseCase {
    pub settings: ReminderSettings,
    /// Confirms the update to the viewer when given
    pub notifications: Option<NotificationStore>,
}

impl std::fmt::Debug for UpdateReminderSettingsUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateReminderSettingsUseCase")
            .field("settings", &self.settings)
            .finish()
    }
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidSettings(String),
    StorageError,
}

#[async_trait::async_trait]
impl UseCase for UpdateReminderSettingsUseCase {
    type Response = ReminderSettings;

    type Errors = UseCaseErrors;

    async fn execute(&mut self, ctx: &PortalContext) -> Result<Self::Response, Self::Errors> {
        self.settings
            .validate()
            .map_err(|e| UseCaseErrors::InvalidSettings(e.to_string()))?;

        ctx.repos
            .reminder_settings
            .save(&self.settings)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        if let Some(notifications) = &self.notifications {
            notifications.emit(
                "Reminder preferences updated",
                NotificationKind::Success,
                None,
                None,
            );
        }

        Ok(self.settings.clone())
    }
}
