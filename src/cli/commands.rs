use serde_json::{json, Value};

use crate::db::account_repo;
use crate::error::PrmResult;
use crate::model::{Account, ContactShort};
use crate::ops::contact_ops::{self, BirthdayInput};
use crate::ops::{event_ops, family_ops};
use crate::queries::{contact_queries, family_queries};
use super::{CliContext, Command};

/// Executes one command and returns what should be printed.
pub fn execute(ctx: &mut CliContext, command: Command) -> PrmResult<Value> {
    match command {
        Command::Init { name, email } => {
            if let Some(existing) = &ctx.account {
                return Ok(json!({ "account": existing, "created": false }));
            }
            let account = Account::create(crate::validation::non_blank(&name, "name")?, email);
            account_repo::insert(&ctx.conn, &account)?;
            tracing::info!(account = %account.id, "account created");
            let value = json!({ "account": account, "created": true });
            ctx.account = Some(account);
            Ok(value)
        }
        Command::Add {
            first_name,
            last_name,
            partial,
        } => {
            let account_id = ctx.account()?.id;
            let contact = contact_ops::add_contact(
                &ctx.conn,
                account_id,
                &first_name,
                last_name.as_deref(),
                partial,
                &mut rand::thread_rng(),
            )?;
            Ok(json!(ContactShort::from_contact(&contact, &ctx.settings)))
        }
        Command::List => {
            let contacts = contact_queries::contacts_for_account(&ctx.conn, ctx.account()?.id)?;
            let shorts: Vec<ContactShort> = contacts
                .iter()
                .map(|c| ContactShort::from_contact(c, &ctx.settings))
                .collect();
            Ok(json!(shorts))
        }
        Command::Partner {
            contact,
            partner,
            one_way,
        } => {
            let edges = family_ops::set_relationship_with(
                &ctx.conn,
                ctx.contact_id(&contact)?,
                ctx.contact_id(&partner)?,
                !one_way,
            )?;
            Ok(json!({ "created": edges.len() }))
        }
        Command::Unpartner {
            contact,
            partner,
            one_way,
        } => {
            family_ops::unset_relationship_with(
                &ctx.conn,
                ctx.contact_id(&contact)?,
                ctx.contact_id(&partner)?,
                !one_way,
            )?;
            Ok(json!({ "removed": true }))
        }
        Command::Child {
            child,
            parent,
            one_way,
        } => {
            let (_, progenitor) = family_ops::is_the_offspring_of(
                &ctx.conn,
                ctx.contact_id(&child)?,
                ctx.contact_id(&parent)?,
                !one_way,
            )?;
            Ok(json!({ "created": 1 + usize::from(progenitor.is_some()) }))
        }
        Command::Unchild {
            parent,
            child,
            one_way,
        } => {
            family_ops::unset_offspring(
                &ctx.conn,
                ctx.contact_id(&parent)?,
                ctx.contact_id(&child)?,
                !one_way,
            )?;
            Ok(json!({ "removed": true }))
        }
        Command::Family { contact } => {
            let view =
                family_queries::family_view(&ctx.conn, ctx.contact_id(&contact)?, &ctx.settings)?;
            Ok(json!(view))
        }
        Command::Potential { contact } => {
            let shorts = family_queries::potential_contacts_short(
                &ctx.conn,
                ctx.contact_id(&contact)?,
                &ctx.settings,
            )?;
            Ok(json!(shorts))
        }
        Command::Birthday { contact, date } => {
            let today = chrono::Local::now().date_naive();
            let updated = contact_ops::set_birthday(
                &ctx.conn,
                ctx.contact_id(&contact)?,
                BirthdayInput::Exact(date),
                today,
            )?;
            Ok(json!({ "birthdate": updated.birthdate, "age": updated.age(today) }))
        }
        Command::Events { limit } => {
            let events = event_ops::events_for(&ctx.conn, ctx.account()?.id, limit)?;
            Ok(json!(events))
        }
    }
}
