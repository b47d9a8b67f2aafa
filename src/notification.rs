//! Desktop notifications through the freedesktop `org.freedesktop.Notifications` service.

use std::collections::HashMap;

use thiserror::Error;
use zbus::{Connection, proxy, zvariant::Value};

/// Application name shown by the notification daemon.
pub const APP_NAME: &str = "Numeroscribe";

#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to connect to session bus: {0}")]
    Connect(#[source] zbus::Error),

    #[error("Failed to send notification: {0}")]
    Send(#[source] zbus::Error),
}

/// Urgency hint understood by notification daemons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    /// Critical notifications stay until dismissed on most daemons
    Critical,
}

impl Urgency {
    fn level(self) -> u8 {
        match self {
            Urgency::Low => 0,
            Urgency::Normal => 1,
            Urgency::Critical => 2,
        }
    }
}

/// A single notification bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub summary: String,
    pub body: String,
    /// Icon theme name
    pub icon: String,
    pub urgency: Urgency,
    /// Milliseconds before the bubble expires; -1 leaves it to the daemon
    pub expire_timeout_ms: i32,
}

impl Notification {
    pub fn new(summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            body: body.into(),
            icon: "x-office-document".to_string(),
            urgency: Urgency::Normal,
            expire_timeout_ms: 5000,
        }
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    fn hints(&self) -> HashMap<&'static str, Value<'static>> {
        HashMap::from([("urgency", Value::U8(self.urgency.level()))])
    }

    /// Delivers the notification and returns the id assigned by the daemon.
    pub async fn send(&self) -> Result<u32, NotifyError> {
        let connection = Connection::session().await.map_err(NotifyError::Connect)?;
        let proxy = NotificationsProxy::new(&connection)
            .await
            .map_err(NotifyError::Connect)?;

        proxy
            .notify(
                APP_NAME,
                0,
                &self.icon,
                &self.summary,
                &self.body,
                Vec::new(),
                self.hints(),
                self.expire_timeout_ms,
            )
            .await
            .map_err(NotifyError::Send)
    }
}
