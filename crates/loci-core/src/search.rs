use chrono::{DateTime, Duration, Utc};

use crate::note::Note;

/// Awarded once per query term found in the lowercased title.
pub const TITLE_TERM_WEIGHT: i64 = 10;
/// Awarded once per query term found in the stripped, lowercased content.
pub const CONTENT_TERM_WEIGHT: i64 = 5;
/// Awarded once per query term found in any lowercased tag.
pub const TAG_TERM_WEIGHT: i64 = 3;
/// Awarded once per query term found in the lowercased workspace.
pub const WORKSPACE_TERM_WEIGHT: i64 = 2;
/// Awarded once per query term found in the lowercased status name.
pub const STATUS_TERM_WEIGHT: i64 = 1;
/// Awarded when the full query appears contiguously in the title.
pub const TITLE_PHRASE_BONUS: i64 = 20;
/// Awarded when the full query appears contiguously in the stripped content.
pub const CONTENT_PHRASE_BONUS: i64 = 15;
/// Awarded when the note was updated within the last week.
pub const WEEK_RECENCY_BONUS: i64 = 5;
/// Awarded on top of the week bonus when updated within the last day.
pub const DAY_RECENCY_BONUS: i64 = 10;

/// A matched note paired with its relevance score. Recomputed on every query,
/// never persisted.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub note: Note,
    pub score: i64,
}

/// Rank `notes` against a free-text `query`, scored as of now.
pub fn search_notes(notes: &[Note], query: &str) -> Vec<SearchResult> {
    search_notes_at(notes, query, Utc::now())
}

/// Rank `notes` against `query` with an explicit evaluation instant for the
/// recency bonuses.
///
/// A whitespace-only query returns no results rather than listing everything.
/// Matching is case-insensitive substring containment per whitespace-split
/// term; a note is included only when at least one term or full-phrase match
/// occurred, so the recency bonus alone can never surface a note. The sort is
/// stable: equal scores keep the input collection's order.
pub fn search_notes_at(notes: &[Note], query: &str, now: DateTime<Utc>) -> Vec<SearchResult> {
    let phrase = query.trim().to_lowercase();
    if phrase.is_empty() {
        return Vec::new();
    }
    let terms: Vec<&str> = phrase.split_whitespace().collect();

    let mut results: Vec<SearchResult> = Vec::new();
    for note in notes {
        let title = note.title.to_lowercase();
        let content = strip_html(&note.content).to_lowercase();
        let tags: Vec<String> = note.tags.iter().map(|tag| tag.to_lowercase()).collect();
        let workspace = note.workspace.to_lowercase();
        let status = note.status.as_str();

        let mut score = 0_i64;
        let mut matched = false;

        for term in &terms {
            if title.contains(term) {
                score += TITLE_TERM_WEIGHT;
                matched = true;
            }
            if content.contains(term) {
                score += CONTENT_TERM_WEIGHT;
                matched = true;
            }
            if tags.iter().any(|tag| tag.contains(term)) {
                score += TAG_TERM_WEIGHT;
                matched = true;
            }
            if workspace.contains(term) {
                score += WORKSPACE_TERM_WEIGHT;
                matched = true;
            }
            if status.contains(term) {
                score += STATUS_TERM_WEIGHT;
                matched = true;
            }
        }

        if title.contains(&phrase) {
            score += TITLE_PHRASE_BONUS;
            matched = true;
        }
        if content.contains(&phrase) {
            score += CONTENT_PHRASE_BONUS;
            matched = true;
        }

        if !matched {
            continue;
        }

        let age = now.signed_duration_since(note.updated_at);
        if age <= Duration::days(7) {
            score += WEEK_RECENCY_BONUS;
        }
        if age <= Duration::days(1) {
            score += DAY_RECENCY_BONUS;
        }

        results.push(SearchResult {
            note: note.clone(),
            score,
        });
    }

    // sort_by is stable, so ties keep collection order.
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// Reduce an HTML fragment to plain text for scoring: decode the handful of
/// entities the editor emits, then drop everything between `<` and `>`.
pub fn strip_html(fragment: &str) -> String {
    let decoded = fragment
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");

    let mut output = String::with_capacity(decoded.len());
    let mut inside_tag = false;
    for ch in decoded.chars() {
        match ch {
            '<' => inside_tag = true,
            '>' => inside_tag = false,
            _ if !inside_tag => output.push(ch),
            _ => {}
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::note::NoteStatus;

    fn note_at(title: &str, content: &str, updated_days_ago: i64) -> Note {
        let mut note = Note::new(title, content);
        note.updated_at = Utc::now() - Duration::days(updated_days_ago);
        note
    }

    #[test]
    fn empty_and_whitespace_queries_return_nothing() {
        let notes = vec![note_at("Trip Plan", "pack light", 0)];
        assert!(search_notes(&notes, "").is_empty());
        assert!(search_notes(&notes, "   ").is_empty());
    }

    #[test]
    fn title_match_outranks_content_match() {
        let by_title = note_at("quarterly report", "", 30);
        let by_content = note_at("misc", "the quarterly report draft", 30);
        let results = search_notes(&[by_content.clone(), by_title.clone()], "quarterly report");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].note.id, by_title.id);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn extra_matching_term_only_raises_the_score() {
        let note = {
            let mut note = note_at("alpha notes", "beta review gamma", 30);
            note.tags = vec!["gamma".to_owned()];
            note
        };
        let narrow = search_notes(&[note.clone()], "alpha beta");
        let wide = search_notes(&[note], "alpha beta gamma");
        assert_eq!(narrow.len(), 1);
        assert_eq!(wide.len(), 1);
        assert!(wide[0].score > narrow[0].score);
    }

    #[test]
    fn recent_note_scores_above_identical_stale_note() {
        let recent = {
            let mut note = note_at("standup notes", "blockers", 0);
            note.updated_at = Utc::now() - Duration::hours(1);
            note
        };
        let stale = note_at("standup notes", "blockers", 30);
        let results = search_notes(&[stale.clone(), recent.clone()], "standup");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].note.id, recent.id);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn html_is_stripped_before_content_matching() {
        let note = note_at("misc", "<p>Hello <strong>world</strong></p>", 30);
        let results = search_notes(&[note], "hello world");
        assert_eq!(results.len(), 1);
        // One content term hit per term plus the full-phrase content bonus.
        assert_eq!(results[0].score, 2 * CONTENT_TERM_WEIGHT + CONTENT_PHRASE_BONUS);
    }

    #[test]
    fn entities_decode_to_literal_characters() {
        assert_eq!(strip_html("a&nbsp;b &amp; c"), "a b & c");
        assert_eq!(strip_html("&lt;kbd&gt;"), "");
        assert_eq!(strip_html("say &quot;hi&quot;"), "say \"hi\"");
    }

    #[test]
    fn fresh_title_hit_scores_like_the_product_rule_says() {
        let mut note = Note::in_workspace("Trip Plan", "", "Personal");
        note.status = NoteStatus::Idea;
        let results = search_notes_at(&[note], "trip", Utc::now());
        assert_eq!(results.len(), 1);
        // 10 title term + 20 title phrase + 5 week + 10 day recency.
        assert_eq!(
            results[0].score,
            TITLE_TERM_WEIGHT + TITLE_PHRASE_BONUS + WEEK_RECENCY_BONUS + DAY_RECENCY_BONUS
        );
    }

    #[test]
    fn recency_alone_does_not_surface_a_note() {
        let fresh_but_unrelated = Note::new("groceries", "milk eggs");
        assert!(search_notes(&[fresh_but_unrelated], "quarterly").is_empty());
    }

    #[test]
    fn missing_optional_fields_contribute_nothing() {
        let mut note = note_at("", "", 30);
        note.tags.clear();
        note.workspace.clear();
        assert!(search_notes(&[note], "anything").is_empty());
    }

    #[test]
    fn ties_preserve_collection_order() {
        let first = note_at("alpha one", "", 30);
        let second = note_at("alpha two", "", 30);
        let results = search_notes(&[first.clone(), second.clone()], "alpha");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].note.id, first.id);
        assert_eq!(results[1].note.id, second.id);
    }

    #[test]
    fn status_and_workspace_fields_are_searchable() {
        let mut note = Note::in_workspace("untitled", "", "Personal Errands");
        note.status = NoteStatus::Research;
        let by_workspace = search_notes(&[note.clone()], "errands");
        assert_eq!(by_workspace.len(), 1);
        let by_status = search_notes(&[note], "research");
        assert_eq!(by_status.len(), 1);
    }
}
