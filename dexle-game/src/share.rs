//! Spoiler-free share text built from a session's reports.
use crate::compare::{AttributeReport, Direction, MatchStatus};
use crate::constants::{
    GLYPH_EXACT, GLYPH_HIGHER, GLYPH_LOWER, GLYPH_NONE, GLYPH_PARTIAL, SHARE_TITLE,
};
use crate::session::{GameMode, Session, SessionStatus};

#[must_use]
pub const fn status_glyph(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Exact => GLYPH_EXACT,
        MatchStatus::Partial => GLYPH_PARTIAL,
        MatchStatus::Miss => GLYPH_NONE,
    }
}

#[must_use]
pub const fn direction_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Higher => GLYPH_HIGHER,
        Direction::Lower => GLYPH_LOWER,
    }
}

/// One glyph row: status per attribute, direction after ordinal attributes.
#[must_use]
pub fn report_row(report: &AttributeReport) -> String {
    let mut row = String::new();
    for (_, feedback) in report.iter() {
        row.push_str(status_glyph(feedback.status));
        if let Some(direction) = feedback.direction {
            row.push_str(direction_glyph(direction));
        }
    }
    row
}

fn headline(session: &Session, date_label: &str) -> String {
    match session.mode() {
        GameMode::Daily => format!("{SHARE_TITLE} {date_label}"),
        GameMode::FreePlay => format!("{SHARE_TITLE} Free Play"),
    }
}

fn outcome_line(session: &Session) -> String {
    let attempts = session.attempt_count();
    let limit = session.attempt_limit().bound();
    match (session.status(), limit) {
        (SessionStatus::Won, Some(limit)) => format!("Caught in {attempts}/{limit} tries!"),
        (SessionStatus::Won, None) => format!("Caught in {attempts} tries!"),
        (SessionStatus::Lost, _) => format!("Failed to catch {}!", session.target().name),
        (SessionStatus::Active, Some(limit)) => format!("In progress ({attempts}/{limit})"),
        (SessionStatus::Active, None) => format!("In progress ({attempts})"),
    }
}

/// Full share text for `session`. `date_label` is only used for daily games.
#[must_use]
pub fn share_text(session: &Session, date_label: &str) -> String {
    let mut text = format!("{}\n{}\n\n", headline(session, date_label), outcome_line(session));
    for (index, (_, report)) in session.reports().iter().enumerate() {
        text.push_str(&format!("{} ({})\n", report_row(report), index + 1));
    }
    text
}
