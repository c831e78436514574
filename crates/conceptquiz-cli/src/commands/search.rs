//! The `conceptquiz search` command.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use conceptquiz_client::config::load_config_from;
use conceptquiz_core::pagination::{search_params, PaginatedQuery};
use conceptquiz_core::traits::RelationStore;
use conceptquiz_core::Relation;

pub struct SearchArgs {
    pub term: String,
    pub rel: Option<String>,
    pub pages: usize,
    pub per_page: Option<i64>,
    pub interactive: bool,
    pub save: bool,
}

pub async fn execute(args: SearchArgs, config_path: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(!args.term.trim().is_empty(), "search term must not be empty");
    anyhow::ensure!(args.pages >= 1, "pages must be at least 1");

    let config = load_config_from(config_path.as_deref())?;
    let client = Arc::new(config.client()?);
    let mut store = if args.save {
        Some(config.store()?)
    } else {
        None
    };

    let params = search_params(&args.term, args.rel.as_deref(), &config.languages);
    let per_page = args.per_page.unwrap_or(config.results_per_page);
    let mut query = PaginatedQuery::new(client, params, per_page);
    tracing::info!(
        term = %args.term,
        languages = ?config.languages,
        per_page = query.results_per_page(),
        "searching"
    );

    let mut page = query
        .get_current_page()
        .await
        .context("failed to fetch search results")?;
    show_page(&query, &page);
    save(&mut store, &page)?;

    if args.interactive {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            page = match line.trim() {
                "n" | "next" => query.go_to_next_page().await?,
                "p" | "prev" | "previous" => query.go_to_previous_page().await?,
                "q" | "quit" => break,
                other => {
                    eprintln!("Unknown command '{other}' (n = next, p = previous, q = quit)");
                    continue;
                }
            };
            show_page(&query, &page);
            save(&mut store, &page)?;
        }
    } else {
        for _ in 1..args.pages {
            if !query.has_next_page() {
                break;
            }
            page = query.go_to_next_page().await?;
            show_page(&query, &page);
            save(&mut store, &page)?;
        }
    }

    if let Some(store) = &store {
        println!("{} relation(s) saved in total.", store.len());
    }

    Ok(())
}

fn save(store: &mut Option<impl RelationStore>, page: &[Relation]) -> Result<()> {
    if let Some(store) = store {
        store.save(page).context("failed to save relations")?;
    }
    Ok(())
}

fn show_page(query: &PaginatedQuery, page: &[Relation]) {
    println!("Page {}", query.current_page() + 1);

    if page.is_empty() {
        println!("No relations found.");
    } else {
        println!("{}", relations_table(page));
    }

    let mut nav = Vec::new();
    if query.has_previous_page() {
        nav.push("previous");
    }
    if query.has_next_page() {
        nav.push("next");
    }
    if !nav.is_empty() {
        println!("More pages available: {}", nav.join(", "));
    }
}

pub fn relations_table(relations: &[Relation]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Start", "Relation", "End", "Languages"]);

    for relation in relations {
        table.add_row(vec![
            Cell::new(&relation.start.name),
            Cell::new(&relation.name),
            Cell::new(&relation.end.name),
            Cell::new(format!("{} → {}", relation.start.lang, relation.end.lang)),
        ]);
    }

    table
}
