//! Interactive search loop.
//!
//! A `dialoguer` prompt cycle: enter a query, browse the ranking window,
//! select a row to open its info display. Selecting a partial record
//! prints the placeholder payload, fetches the full view, and reprints:
//! the same two-phase flow the session exposes to any front end. Fetch
//! failures keep the placeholder on screen.

use console::style;
use dialoguer::{Input, Select};
use safebite_catalog::RestaurantCatalog;
use safebite_session::{DisplayPayload, RankRow, SearchUpdate, SessionState};

/// Runs the interactive prompt loop until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails or a search query errors out.
pub async fn run(catalog: &dyn RestaurantCatalog) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = SessionState::new();

    loop {
        println!();
        let query: String = Input::new()
            .with_prompt("Search restaurants (blank shows the full catalog, 'quit' exits)")
            .allow_empty(true)
            .interact_text()?;

        if query.trim() == "quit" {
            return Ok(());
        }

        match session.on_search_submit(&query, catalog).await {
            Ok(SearchUpdate::FullCatalog) => {
                println!("No filter: the map layer renders the whole catalog.");
            }
            Ok(SearchUpdate::Matches { rankings, .. }) => {
                if rankings.is_empty() {
                    println!("No restaurants matched {query:?}.");
                    continue;
                }
                browse(&mut session, catalog, rankings).await?;
            }
            Err(err) => {
                log::error!("Search failed: {err}");
                println!("Search failed: {err}");
            }
        }
    }
}

/// Runs one non-interactive search and prints the ranking window.
///
/// # Errors
///
/// Returns an error if the search fails.
pub async fn run_once(
    catalog: &dyn RestaurantCatalog,
    query: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = SessionState::new();
    match session.on_search_submit(query, catalog).await? {
        SearchUpdate::FullCatalog => {
            println!("Empty query: nothing to rank.");
        }
        SearchUpdate::Matches { rankings, .. } => {
            print_rankings(&rankings, true, session.match_count());
        }
    }
    Ok(())
}

/// Ranking browser for one match set.
async fn browse(
    session: &mut SessionState,
    catalog: &dyn RestaurantCatalog,
    mut rankings: Vec<RankRow>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ascending = true;

    loop {
        print_rankings(&rankings, ascending, session.match_count());

        let mut items: Vec<String> = rankings
            .iter()
            .map(|row| format!("{} - {}", row.name, row.address))
            .collect();
        if session.sort_toggle_visible() {
            items.push(if ascending {
                "Sort: most dangerous first".to_string()
            } else {
                "Sort: safest first".to_string()
            });
        }
        items.push("New search".to_string());

        let choice = Select::new()
            .with_prompt("Open a restaurant")
            .items(&items)
            .default(0)
            .interact()?;

        if choice < rankings.len() {
            let index = rankings[choice].index;
            show_restaurant(session, catalog, index).await;
        } else if session.sort_toggle_visible() && choice == rankings.len() {
            ascending = !ascending;
            rankings = session.on_direction_toggle(ascending);
        } else {
            return Ok(());
        }
    }
}

/// Opens one restaurant's info display, fetching the full view when the
/// session asks for it.
async fn show_restaurant(
    session: &mut SessionState,
    catalog: &dyn RestaurantCatalog,
    index: usize,
) {
    let Some(selection) = session.on_entity_select(index) else {
        return;
    };
    print_payload(&selection.payload);

    let Some(request) = selection.fetch else {
        return;
    };

    println!("{}", style("Loading incident history...").dim());
    match catalog.query_full(&request.identity).await {
        Ok(full) => {
            if let Some(payload) = session.resolve_full_view(&request.identity, full) {
                print_payload(&payload);
            }
        }
        Err(err) => {
            // Keep the placeholder display; no retry.
            log::warn!("Full-view fetch failed: {err}");
            session.fetch_failed(&request.identity);
        }
    }
}

fn print_rankings(rankings: &[RankRow], ascending: bool, total: usize) {
    println!();
    if ascending {
        println!("Top {} safest of {total} matches:", rankings.len());
    } else {
        println!("Top {} most dangerous of {total} matches:", rankings.len());
    }
    for (position, row) in rankings.iter().enumerate() {
        println!(
            "{:>2}. {} {} - {}",
            position + 1,
            swatch_for(&row.color),
            row.name,
            row.address
        );
    }
}

fn print_payload(payload: &DisplayPayload) {
    println!();
    println!("{}", style(&payload.title).bold());
    if let Some(subtitle) = &payload.subtitle {
        println!("{}", style(subtitle).italic());
    }
    println!("{}", payload.address);
    println!(
        "{} Danger Rating: {} ({})",
        swatch_for(&payload.color),
        payload.danger_score,
        payload.color
    );
    match &payload.narrative {
        Some(narrative) => println!("{narrative}"),
        None => println!("{}", style("(incident history not loaded)").dim()),
    }
}

/// Terminal approximation of the gradient swatch. The sweep only ever
/// produces colors on the green-to-red edge, so bucketing the two live
/// channels is enough for a 16-color terminal.
fn swatch_for(color: &safebite_score::Rgb) -> console::StyledObject<&'static str> {
    if color.g == 255 && color.r < 128 {
        style("\u{25cf}").green()
    } else if color.r == 255 && color.g < 128 {
        style("\u{25cf}").red()
    } else {
        style("\u{25cf}").yellow()
    }
}
