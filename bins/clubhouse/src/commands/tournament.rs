//! Tournament commands

use crate::context::Context;
use anyhow::{bail, Result};
use clubhouse_api_client::endpoints::tournament::{Document, Included, Match};
use clubhouse_cli::output::{format_count, or_dash, print_json};
use clubhouse_cli::Status;
use owo_colors::OwoColorize;

fn team_name<T>(doc: &Document<T>, id: Option<&str>) -> String {
    id.and_then(|id| match doc.find_included("team", id) {
        Some(Included::Team(team)) => team.attributes.name.clone(),
        _ => None,
    })
    .unwrap_or_else(|| "TBD".to_string())
}

fn facility_name<T>(doc: &Document<T>, game: &Match) -> Option<String> {
    let facility = game.relationship("facility")?.identifiers().into_iter().next()?;
    match doc.find_included("facility", &facility.id)? {
        Included::Facility(facility) => facility.attributes.name.clone(),
        _ => None,
    }
}

fn print_match_line<T>(doc: &Document<T>, game: &Match) {
    let home = team_name(doc, game.meta.home_team.as_deref());
    let away = team_name(doc, game.meta.away_team.as_deref());
    let state = if game.attributes.canceled == Some(true) {
        "canceled".red().to_string()
    } else if game.attributes.finished == Some(true) {
        "final".green().to_string()
    } else {
        String::new()
    };

    println!(
        "  {:<19}  {home} vs {away}  {}  {state}",
        or_dash(game.attributes.datetime.as_deref()).yellow(),
        facility_name(doc, game).unwrap_or_default().dimmed()
    );
}

/// Show a tournament with its bracket
pub async fn show(ctx: &Context, id: &str) -> Result<()> {
    let tournament = {
        let _spinner = ctx.spinner("Fetching tournament...");
        ctx.client.tournament().get_full_tournament(id).await?
    };

    if ctx.format.is_json() {
        return print_json(&tournament);
    }

    Status::header(tournament.data.attributes.name.as_deref().unwrap_or("Tournament"));
    Status::field("Id", &tournament.data.id);
    Status::field("Gender", or_dash(tournament.data.attributes.gender.as_deref()));

    let count = |kind: &str| tournament.included.iter().filter(|i| i.kind() == kind).count();
    Status::field("Groups", count("group"));
    Status::field("Rounds", count("round"));
    Status::field("Matches", count("match"));
    Status::field("Teams", count("team"));

    for included in &tournament.included {
        if let Included::Group(group) = included {
            Status::item(&or_dash(group.attributes.name.as_deref()));
        }
    }
    Ok(())
}

/// Show the standings of a group
pub async fn standings(ctx: &Context, group_id: &str) -> Result<()> {
    let standings = {
        let _spinner = ctx.spinner("Fetching standings...");
        ctx.client.tournament().get_standings(group_id).await?
    };

    if !ctx.format.is_json() {
        Status::header(&format!("Standings of group {group_id}"));
    }
    print_json(&standings)
}

/// List upcoming matches of a season
pub async fn upcoming(ctx: &Context, season_id: Option<&str>) -> Result<()> {
    let Some(season_id) = season_id.or(ctx.config.schema.tournament.season_id.as_deref()) else {
        bail!("No season given and tournament.season_id is not configured");
    };

    let matches = {
        let _spinner = ctx.spinner("Fetching upcoming matches...");
        ctx.client.tournament().get_upcoming_matches(season_id).await?
    };

    if ctx.format.is_json() {
        return print_json(&matches);
    }

    Status::header(&format!("Upcoming matches, season {season_id}"));
    for game in &matches.data {
        print_match_line(&matches, game);
    }

    println!();
    Status::info(&format_count(matches.data.len(), "match", "matches"));
    Ok(())
}

/// Show a single match
pub async fn show_match(ctx: &Context, id: &str) -> Result<()> {
    let game = {
        let _spinner = ctx.spinner("Fetching match...");
        ctx.client.tournament().get_match(id).await?
    };

    if ctx.format.is_json() {
        return print_json(&game);
    }

    let home = team_name(&game, game.data.meta.home_team.as_deref());
    let away = team_name(&game, game.data.meta.away_team.as_deref());
    Status::header(&format!("{home} vs {away}"));
    Status::field("Id", &game.data.id);
    Status::field("Kick-off", or_dash(game.data.attributes.datetime.as_deref()));
    Status::field("Venue", or_dash(facility_name(&game, &game.data).as_deref()));

    let scores: Vec<String> = game
        .included
        .iter()
        .filter_map(|included| match included {
            Included::MatchResult(result) => result.attributes.value.map(|v| v.to_string()),
            _ => None,
        })
        .collect();
    if !scores.is_empty() {
        Status::field("Result", scores.join(" : "));
    }
    Ok(())
}

/// List the teams of a tournament
pub async fn teams(ctx: &Context, tournament_id: &str) -> Result<()> {
    let teams = {
        let _spinner = ctx.spinner("Fetching teams...");
        ctx.client.tournament().get_teams(tournament_id).await?
    };

    if ctx.format.is_json() {
        return print_json(&teams);
    }

    Status::header(&format!("Teams of tournament {tournament_id}"));
    for team in &teams.data {
        println!(
            "  {:>8}  {}",
            team.id.dimmed(),
            or_dash(team.attributes.name.as_deref())
        );
    }
    Ok(())
}
