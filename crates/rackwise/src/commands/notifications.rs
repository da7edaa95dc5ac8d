//! Notification feed handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;

use rackwise_core::{EntityId, InventoryStore, Notification, NotificationKind};

use crate::cli::{NotificationsArgs, NotificationsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Read")]
    read: String,
}

fn row(n: &Notification, color: bool) -> NotificationRow {
    let kind = n.kind.to_string();
    let kind = match n.kind {
        _ if !color => kind,
        NotificationKind::Success => kind.green().to_string(),
        NotificationKind::Warning => kind.yellow().to_string(),
        NotificationKind::Error => kind.red().to_string(),
        NotificationKind::Info => kind.blue().to_string(),
    };
    NotificationRow {
        id: n.id.to_string(),
        when: n.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        kind,
        title: n.title.clone(),
        message: n.message.clone(),
        read: if n.read { "yes" } else { "no" }.into(),
    }
}

pub fn handle(
    store: &InventoryStore,
    args: NotificationsArgs,
    ctx: &Context,
) -> Result<(), CliError> {
    match args.command {
        NotificationsCommand::List { unread } => {
            let notifications: Vec<Notification> = store
                .notifications()
                .into_iter()
                .filter(|n| !unread || !n.read)
                .collect();
            let color = ctx.color;
            let out = output::render_list(
                ctx.output,
                &notifications,
                |n| row(n, color),
                |n| n.id.to_string(),
            )?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        NotificationsCommand::Read { id } => {
            store.mark_notification_read(&EntityId::from(id))?;
            output::print_status("Notification marked read", ctx.quiet);
            Ok(())
        }

        NotificationsCommand::ReadAll => {
            let count = store.mark_all_notifications_read()?;
            output::print_status(&format!("{count} notification(s) marked read"), ctx.quiet);
            Ok(())
        }

        NotificationsCommand::Remove { id } => {
            let removed = store.remove_notification(&EntityId::from(id))?;
            output::print_status(&format!("Removed '{}'", removed.title), ctx.quiet);
            Ok(())
        }

        NotificationsCommand::Clear => {
            let prompt = format!("Remove all {} notification(s)?", store.notifications().len());
            if !util::confirm("notifications clear", &prompt, ctx.yes)? {
                return Ok(());
            }
            let count = store.clear_notifications()?;
            output::print_status(&format!("{count} notification(s) removed"), ctx.quiet);
            Ok(())
        }
    }
}
