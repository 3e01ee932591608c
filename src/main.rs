mod telemetry;

use portal_scheduler_api::{end_session, take_logout_reason, Session};
use portal_scheduler_domain::{ActivitySignal, LogoutReason};
use portal_scheduler_infra::setup_context;
use std::sync::Arc;
use telemetry::{get_subscriber, init_subscriber};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("portal_scheduler".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber)?;

    let context = setup_context().await?;

    let (terminate_tx, mut terminate_rx) = mpsc::unbounded_channel();
    let terminator = move |reason: LogoutReason| {
        let _ = terminate_tx.send(reason);
    };
    let viewer = context.config.viewer.clone();
    let session = Session::start(&context, viewer, Arc::new(terminator)).await;

    // Toasts are shown on stdout
    let mut toasts = session.notifications().subscribe();
    tokio::spawn(async move {
        loop {
            match toasts.recv().await {
                Ok(notification) => {
                    println!("[{:?}] {}", notification.kind, notification.message)
                }
                Err(RecvError::Lagged(skipped)) => warn!("{} toasts were not shown", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Every line typed counts as activity
    let activity = context.activity.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            activity.publish(ActivitySignal::KeyPress);
        }
    });

    let reason = tokio::select! {
        _ = tokio::signal::ctrl_c() => LogoutReason::UserRequested,
        reason = terminate_rx.recv() => reason.unwrap_or(LogoutReason::UserRequested),
    };
    info!("Signing out: {}", reason);
    end_session(session, reason, &context).await?;

    if let Some(reason) = take_logout_reason(&context).await? {
        println!("{}", reason);
    }
    Ok(())
}
