use anyhow::Context as _;
use home_dashboard::api::{Chore, ChoreFilter, ChorePatch, Client, NewChore, Query};

use crate::cli::ChoresCommand;

pub fn run(client: &Client, command: ChoresCommand) -> anyhow::Result<()> {
    let chores = client.chores();

    match command {
        ChoresCommand::List { completed, assignee } => {
            let filter = ChoreFilter { completed, assignee };
            let list = chores.list(&Query::from(&filter)).context("Could not list chores")?;

            if list.is_empty() {
                println!("No chores");
            }

            for chore in &list {
                println!("{}", line(chore));
            }
        }
        ChoresCommand::Add {
            title,
            description,
            assignee,
            due,
            category,
        } => {
            let new = NewChore {
                title,
                description,
                assignee,
                due_date: due,
                category_id: category,
            };
            let chore = chores.create(&new).context("Could not add the chore")?;

            saved(chore.as_ref());
        }
        ChoresCommand::Done { id, undo } => {
            let chore = chores
                .update(id, &ChorePatch::completed(!undo))
                .with_context(|| format!("Could not update chore {id}"))?;

            saved(chore.as_ref());
        }
        ChoresCommand::Delete { id } => {
            chores.delete(id).with_context(|| format!("Could not delete chore {id}"))?;
            log::info!(id = id; "Chore deleted");
        }
    }

    Ok(())
}

fn saved(chore: Option<&Chore>) {
    match chore {
        Some(chore) => println!("{}", line(chore)),
        None => println!("Chore saved"),
    }
}

fn line(chore: &Chore) -> String {
    let mut line = format!("#{} [{}] {}", chore.id, if chore.completed { 'x' } else { ' ' }, chore.title);

    if let Some(assignee) = &chore.assignee {
        line.push_str(&format!(" @{assignee}"));
    }

    if let Some(due) = chore.due_date {
        line.push_str(&format!(" due {due}"));
    }

    line
}
