//! services/console/src/console/shell.rs
//!
//! The command loop: reads one JSON command per line, dispatches it against the
//! console context and writes one JSON reply per line.

use recordkeep_core::domain::EntityKind;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::protocol::{Command, Reply};
use super::state::ConsoleContext;
use crate::error::ConsoleResult;

/// Runs `command` and builds the reply for it.
pub async fn dispatch(ctx: &mut ConsoleContext, command: Command) -> ConsoleResult<Reply> {
    let reply = match command {
        Command::Login { username, password } => {
            let user = ctx.login(&username, &password).await?;
            Reply::Session { user: Some(user) }
        }
        Command::Logout => {
            ctx.logout().await?;
            Reply::notice("Logged out")
        }
        Command::Whoami => Reply::Session {
            user: ctx.current_user().cloned(),
        },
        Command::Dashboard => Reply::Dashboard(ctx.dashboard()?),

        Command::List { entity } => Reply::Listing {
            entity,
            items: match entity {
                EntityKind::User => serde_json::to_value(ctx.list_users()?)?,
                EntityKind::Person => serde_json::to_value(ctx.list_persons()?)?,
                EntityKind::Company => serde_json::to_value(ctx.list_companies()?)?,
                EntityKind::Category => serde_json::to_value(ctx.list_categories()?)?,
                EntityKind::Record => serde_json::to_value(ctx.list_records()?)?,
            },
        },
        Command::Get { entity, id } => Reply::Entity {
            entity,
            item: match entity {
                EntityKind::User => serde_json::to_value(ctx.get_user(id)?)?,
                EntityKind::Person => serde_json::to_value(ctx.get_person(id)?)?,
                EntityKind::Company => serde_json::to_value(ctx.get_company(id)?)?,
                EntityKind::Category => serde_json::to_value(ctx.get_category(id)?)?,
                EntityKind::Record => serde_json::to_value(ctx.get_record(id)?)?,
            },
        },
        Command::Delete { entity, id } => match entity {
            EntityKind::User => saved(entity, "deleted", &ctx.delete_user(id)?)?,
            EntityKind::Person => saved(entity, "deleted", &ctx.delete_person(id)?)?,
            EntityKind::Company => saved(entity, "deleted", &ctx.delete_company(id)?)?,
            EntityKind::Category => saved(entity, "deleted", &ctx.delete_category(id)?)?,
            EntityKind::Record => saved(entity, "deleted", &ctx.delete_record(id)?)?,
        },

        Command::AddUser(draft) => saved(EntityKind::User, "added", &ctx.add_user(draft)?)?,
        Command::UpdateUser { id, patch } => {
            saved(EntityKind::User, "updated", &ctx.update_user(id, patch)?)?
        }
        Command::AddPerson(draft) => {
            saved(EntityKind::Person, "added", &ctx.add_person(draft)?)?
        }
        Command::UpdatePerson { id, patch } => {
            saved(EntityKind::Person, "updated", &ctx.update_person(id, patch)?)?
        }
        Command::AddCompany(draft) => {
            saved(EntityKind::Company, "added", &ctx.add_company(draft)?)?
        }
        Command::UpdateCompany { id, patch } => {
            saved(EntityKind::Company, "updated", &ctx.update_company(id, patch)?)?
        }
        Command::AddCategory(draft) => {
            saved(EntityKind::Category, "added", &ctx.add_category(draft)?)?
        }
        Command::UpdateCategory { id, patch } => {
            saved(EntityKind::Category, "updated", &ctx.update_category(id, patch)?)?
        }
        Command::AddRecord(draft) => {
            saved(EntityKind::Record, "added", &ctx.add_record(draft)?)?
        }
        Command::UpdateRecord { id, patch } => {
            saved(EntityKind::Record, "updated", &ctx.update_record(id, patch)?)?
        }
    };
    Ok(reply)
}

/// e.g. "Person added successfully", carrying the item.
fn saved<T: Serialize>(entity: EntityKind, verb: &str, item: &T) -> ConsoleResult<Reply> {
    Ok(Reply::Notice {
        message: format!("{} {} successfully", entity.label(), verb),
        item: Some(serde_json::to_value(item)?),
    })
}

/// Parses and dispatches a single input line. Blank lines produce no reply.
pub async fn handle_line(ctx: &mut ConsoleContext, line: &str) -> Option<Reply> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = match serde_json::from_str::<Command>(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("Malformed command: {}", e);
            return Some(Reply::malformed(e.to_string()));
        }
    };
    debug!(command = command.name(), "Dispatching command");

    Some(match dispatch(ctx, command).await {
        Ok(reply) => reply,
        Err(e) => Reply::from(&e),
    })
}

/// Reads commands from `reader` until EOF, writing each reply to `writer`.
/// A line that is not valid UTF-8 is answered as malformed and skipped.
pub async fn run<R, W>(ctx: &mut ConsoleContext, mut reader: R, mut writer: W) -> ConsoleResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) => handle_line(ctx, line).await,
            Err(e) => {
                warn!("Undecodable input line: {}", e);
                Some(Reply::malformed(format!("input is not valid UTF-8: {}", e)))
            }
        };
        let Some(reply) = reply else {
            continue;
        };

        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }
    info!("Input closed, shutting down console");
    Ok(())
}
