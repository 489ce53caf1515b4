use colored::{ColoredString, Colorize};
use dexle_game::{
    Attribute, AttributeFeedback, AttributeReport, DailyStats, Direction, FreePlayStats,
    MatchStatus, Session, SessionStatus,
};
use std::fmt::Write as _;

const BAR_WIDTH: u32 = 24;

fn paint(text: &str, status: MatchStatus) -> ColoredString {
    match status {
        MatchStatus::Exact => text.black().on_green(),
        MatchStatus::Partial => text.black().on_yellow(),
        MatchStatus::Miss => text.white().on_red(),
    }
}

fn cell(feedback: &AttributeFeedback) -> String {
    let arrow = match feedback.direction {
        Some(Direction::Higher) => " ↑",
        Some(Direction::Lower) => " ↓",
        None => "",
    };
    format!("{}{arrow}", feedback.value)
}

/// Column headings matching `report_line`.
#[must_use]
pub fn header_line() -> String {
    Attribute::ALL
        .iter()
        .map(|attr| format!("{:<16}", attr.label()))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .bold()
        .to_string()
}

/// One colored row per guess.
#[must_use]
pub fn report_line(report: &AttributeReport) -> String {
    report
        .iter()
        .map(|(_, feedback)| paint(&format!("{:<16}", cell(feedback)), feedback.status).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn board(session: &Session) -> String {
    let mut out = header_line();
    out.push('\n');
    for (_, report) in session.reports() {
        out.push_str(&report_line(&report));
        out.push('\n');
    }
    out
}

#[must_use]
pub fn status_line(session: &Session) -> String {
    let target = &session.target().name;
    match (session.status(), session.remaining_attempts()) {
        (SessionStatus::Won, _) => format!(
            "🎉 Caught {} in {} {}!",
            target.bright_green().bold(),
            session.attempt_count(),
            attempts_word(session.attempt_count())
        ),
        (SessionStatus::Lost, _) => format!("💀 Out of tries. It was {}.", target.bright_red().bold()),
        (SessionStatus::Active, Some(left)) => format!("{left} {} left", attempts_word(left)),
        (SessionStatus::Active, None) => format!("Guess #{}", session.attempt_count() + 1),
    }
}

const fn attempts_word(n: u32) -> &'static str {
    if n == 1 { "try" } else { "tries" }
}

#[must_use]
pub fn daily_stats(stats: &DailyStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "📅 Daily".bright_cyan().bold());
    let _ = writeln!(out, "Played:         {}", stats.games_played);
    let _ = writeln!(out, "Win %:          {}", stats.win_percentage());
    let _ = writeln!(out, "Current streak: {}", stats.current_streak);
    let _ = writeln!(out, "Max streak:     {}", stats.max_streak);
    let peak = stats.guess_distribution.peak().max(1);
    for (bucket, count) in stats.guess_distribution.buckets() {
        let width = (count * BAR_WIDTH).div_ceil(peak).max(u32::from(count > 0));
        let bar = "█".repeat(usize::try_from(width).unwrap_or_default());
        let _ = writeln!(out, "  {bucket} {} {count}", bar.green());
    }
    out
}

#[must_use]
pub fn free_play_stats(stats: &FreePlayStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "🎲 Free Play".bright_cyan().bold());
    let _ = writeln!(out, "Played:         {}", stats.games_played);
    let _ = writeln!(out, "Win %:          {}", stats.win_percentage());
    let best = stats
        .best_score
        .map_or_else(|| "-".to_string(), |best| best.to_string());
    let _ = writeln!(out, "Best:           {best}");
    let average = stats
        .average_winning_attempts()
        .map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}"));
    let _ = writeln!(out, "Average tries:  {average}");
    out
}
