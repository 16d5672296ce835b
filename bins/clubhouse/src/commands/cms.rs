//! CMS commands: news, events and team rosters

use crate::context::Context;
use anyhow::Result;
use clubhouse_api_client::endpoints::cms::types::{CalendarEvent, Identifier, NewsEntry, Player};
use clubhouse_api_client::prelude::*;
use clubhouse_cli::output::{format_count, or_dash, print_json};
use clubhouse_cli::Status;
use clubhouse_core::date::format_date;
use owo_colors::OwoColorize;

fn title(ctx: &Context, what: &str) -> String {
    format!(
        "{} {what} ({})",
        ctx.config.schema.general.site_name,
        ctx.client.locales().current_locale()
    )
}

/// List published news
pub async fn news(ctx: &Context, limit: u32, page: u32, category_id: Option<i64>, with_image_only: bool) -> Result<()> {
    let query = NewsQuery {
        limit,
        page,
        category_id,
        with_image_only,
    };

    let news = {
        let _spinner = ctx.spinner("Fetching news...");
        ctx.client.cms().get_news(&query).await?
    };

    if ctx.format.is_json() {
        return print_json(&news);
    }

    let heading = match &news.meta.filtered_category_name {
        Some(category) => format!("{} · {category}", title(ctx, "news")),
        None => title(ctx, "news"),
    };
    Status::header(&heading);

    for entry in &news.data {
        print_news_line(entry);
    }

    println!();
    Status::info(&format!(
        "Page {page}: {} of {}",
        format_count(news.data.len(), "entry", "entries"),
        news.meta.total
    ));
    Ok(())
}

fn print_news_line(entry: &NewsEntry) {
    let categories: Vec<&str> = entry.categories.iter().filter_map(|c| c.name.as_deref()).collect();
    let id = entry.id.as_ref().map(ToString::to_string).unwrap_or_default();

    println!(
        "  {:>6}  {}  {}",
        id.dimmed(),
        or_dash(entry.title.as_deref()),
        categories.join(", ").cyan()
    );
}

/// Show a single news entry
pub async fn news_one(ctx: &Context, id: &str) -> Result<()> {
    let id = id.parse::<i64>().map_or_else(|_| Identifier::from(id), Identifier::from);

    let entry = {
        let _spinner = ctx.spinner("Fetching news entry...");
        ctx.client.cms().get_one_news(id).await?
    };

    if ctx.format.is_json() {
        return print_json(&entry);
    }

    Status::header(entry.title.as_deref().unwrap_or("Untitled"));
    Status::field("Locale", &entry.languages_code);
    Status::field("Slug", or_dash(entry.slug.as_deref()));
    Status::field("Created", or_dash(entry.date_created.as_deref()));
    Status::field("Updated", or_dash(entry.date_updated.as_deref()));
    let categories: Vec<&str> = entry.categories.iter().filter_map(|c| c.name.as_deref()).collect();
    Status::field("Categories", or_dash(Some(categories.join(", ").as_str())));

    if let Some(body) = &entry.body {
        println!();
        println!("{body}");
    }
    Ok(())
}

/// List calendar events
pub async fn events(
    ctx: &Context,
    limit: u32,
    page: u32,
    category_id: Option<i64>,
    month: Option<String>,
    upcoming: bool,
) -> Result<()> {
    let query = EventsQuery {
        limit,
        page,
        category_id,
        month,
        upcoming,
    };

    let events = {
        let _spinner = ctx.spinner("Fetching events...");
        ctx.client.cms().get_events(&query).await?
    };

    if ctx.format.is_json() {
        return print_json(&events);
    }

    Status::header(&title(ctx, "events"));
    for event in &events.data {
        println!("  {}  {}  {}", when(event).yellow(), or_dash(event.name.as_deref()), venue_name(event).dimmed());
    }

    println!();
    Status::info(&format!(
        "Page {page}: {} of {}",
        format_count(events.data.len(), "event", "events"),
        events.meta.total
    ));
    Ok(())
}

fn when(event: &CalendarEvent) -> String {
    let start = if event.is_full_day {
        format_date(&event.date_start, "yyyy-MM-dd")
    } else {
        format_date(&event.date_start, "yyyy-MM-dd HH:mm")
    };

    match event.date_end {
        Some(end) if event.show_end_time => format!("{start}–{}", format_date(&end, "HH:mm")),
        Some(end) if end.date() != event.date_start.date() => {
            format!("{start} → {}", format_date(&end, "yyyy-MM-dd"))
        }
        _ => start,
    }
}

fn venue_name(event: &CalendarEvent) -> String {
    event.venue.as_ref().map(|v| v.name.clone()).unwrap_or_default()
}

/// Show a team and its active roster
pub async fn team(ctx: &Context, slug: &str) -> Result<()> {
    let team = {
        let _spinner = ctx.spinner("Fetching team...");
        ctx.client.cms().get_team(slug).await?
    };

    if ctx.format.is_json() {
        return print_json(&team);
    }

    Status::header(&team.name);
    Status::field("Slug", &team.slug);
    Status::field("Gender", &team.gender);
    Status::field("Players", team.players.len());
    println!();

    for player in &team.players {
        print_player_line(player);
    }
    Ok(())
}

fn print_player_line(player: &Player) {
    let number = player.number.map(|n| format!("#{n}")).unwrap_or_default();
    let name = format!(
        "{}, {}",
        player.last_name.as_deref().unwrap_or_default(),
        player.first_name.as_deref().unwrap_or_default()
    );
    let captain = if player.is_captain { "C".bold().to_string() } else { String::new() };
    let club = player.club.as_ref().and_then(|c| c.name.as_deref()).unwrap_or_default();

    println!("  {:>4}  {:<28} {:<2} {}", number.dimmed(), name, captain, club.dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(start: (u32, u32), end: Option<(u32, u32, u32)>, full_day: bool, show_end: bool) -> CalendarEvent {
        let date_start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(start.0, start.1, 0).unwrap();
        let date_end = end.map(|(d, h, m)| NaiveDate::from_ymd_opt(2024, 5, d).unwrap().and_hms_opt(h, m, 0).unwrap());
        CalendarEvent {
            id: None,
            name: Some("Camp".to_string()),
            date_start,
            date_end,
            is_full_day: full_day,
            show_end_time: show_end,
            status: None,
            description: None,
            venue: None,
            image: None,
            url: None,
            category: None,
        }
    }

    #[test]
    fn test_when_full_day() {
        assert_eq!(when(&event((0, 0), Some((1, 0, 0)), true, false)), "2024-05-01");
        assert_eq!(when(&event((0, 0), Some((3, 0, 0)), true, false)), "2024-05-01 → 2024-05-03");
    }

    #[test]
    fn test_when_with_end_time() {
        assert_eq!(when(&event((14, 0), Some((1, 16, 0)), false, true)), "2024-05-01 14:00–16:00");
    }
}
