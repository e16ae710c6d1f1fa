use anyhow::Context as _;
use home_dashboard::api::{Client, NewCategory, Query};

use crate::cli::CategoriesCommand;

pub fn run(client: &Client, command: CategoriesCommand) -> anyhow::Result<()> {
    let categories = client.categories();

    match command {
        CategoriesCommand::List => {
            for category in categories.list(&Query::new()).context("Could not load categories")? {
                println!("#{} {} {}", category.id, category.color, category.name);
            }
        }
        CategoriesCommand::Add { name, color } => {
            let category = categories
                .create(&NewCategory::new(name, color))
                .context("Could not add the category")?;

            match category {
                Some(category) => println!("#{} {} {}", category.id, category.color, category.name),
                None => println!("Category saved"),
            }
        }
        CategoriesCommand::Delete { id } => {
            categories
                .delete(id)
                .with_context(|| format!("Could not delete category {id}"))?;
            log::info!(id = id; "Category deleted");
        }
    }

    Ok(())
}
