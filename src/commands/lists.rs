use anyhow::Context as _;
use home_dashboard::api::{Client, NewTodoItem, NewTodoList, Query, TodoItemPatch};

use crate::cli::ListsCommand;

pub fn run(client: &Client, command: ListsCommand) -> anyhow::Result<()> {
    match command {
        ListsCommand::List => {
            let lists = client.lists().list(&Query::new()).context("Could not load lists")?;

            for list in lists {
                println!("#{} {}", list.id, list.title);
            }
        }
        ListsCommand::Add { title, color, category } => {
            let new = NewTodoList {
                title,
                color,
                category_id: category,
            };
            match client.lists().create(&new).context("Could not add the list")? {
                Some(list) => println!("#{} {}", list.id, list.title),
                None => println!("List saved"),
            }
        }
        ListsCommand::Delete { id } => {
            client
                .lists()
                .delete(id)
                .with_context(|| format!("Could not delete list {id}"))?;
            log::info!(id = id; "List deleted");
        }
        ListsCommand::Items { list } => {
            let mut items = client
                .items(list)
                .list(&Query::new())
                .with_context(|| format!("Could not load the items of list {list}"))?;
            items.sort_by_key(|item| item.sort_order);

            for item in items {
                println!("#{} [{}] {}", item.id, if item.completed { 'x' } else { ' ' }, item.title);
            }
        }
        ListsCommand::AddItem { list, title, sort_order } => {
            let item = client
                .items(list)
                .create(&NewTodoItem { title, sort_order })
                .with_context(|| format!("Could not add an item to list {list}"))?;

            match item {
                Some(item) => println!("#{} {}", item.id, item.title),
                None => println!("Item saved"),
            }
        }
        ListsCommand::Check { list, item, undo } => {
            let patch = TodoItemPatch {
                completed: Some(!undo),
                ..TodoItemPatch::default()
            };
            client
                .items(list)
                .update(item, &patch)
                .with_context(|| format!("Could not update item {item}"))?;
        }
        ListsCommand::RemoveItem { list, item } => {
            client
                .items(list)
                .delete(item)
                .with_context(|| format!("Could not remove item {item}"))?;
            log::info!(list = list, item = item; "Item removed");
        }
    }

    Ok(())
}
