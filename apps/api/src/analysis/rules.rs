//! The fixed ATS rule set.
//!
//! Every rule is a pure function of the lower-cased resume text and its word count.
//! `RULES` fixes the evaluation order, which is also the order recommendations
//! are reported in.

/// Points awarded by a single rule plus the recommendation it emits, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub points: f64,
    pub recommendation: Option<String>,
}

impl RuleOutcome {
    fn silent(points: f64) -> Self {
        Self {
            points,
            recommendation: None,
        }
    }

    fn advise(points: f64, recommendation: impl Into<String>) -> Self {
        Self {
            points,
            recommendation: Some(recommendation.into()),
        }
    }
}

pub type Rule = fn(&str, usize) -> RuleOutcome;

pub const RULES: &[Rule] = &[section_headers, length, action_verbs, keyword_coverage];

/// Each group needs at least one of its alternatives present.
const SECTION_GROUPS: &[&[&str]] = &[
    &["experience", "work history"],
    &["education", "academic"],
    &["skills", "core competencies"],
];

const MIN_WORDS: usize = 300;
const MAX_WORDS: usize = 800;

pub const ACTION_VERBS: &[&str] = &[
    "achieved",
    "led",
    "managed",
    "developed",
    "implemented",
    "improved",
    "reduced",
    "created",
    "quantified",
];

const STRONG_VERB_COUNT: usize = 10;
const WEAK_VERB_COUNT: usize = 5;

pub const SAMPLE_KEYWORDS: &[&str] = &[
    "javascript",
    "python",
    "sql",
    "agile",
    "data analysis",
    "internship",
    "leadership",
];

const KEYWORD_MAX_POINTS: f64 = 30.0;

/// Number of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Section headers (max 30). All three groups present earns full credit.
pub fn section_headers(text: &str, _word_count: usize) -> RuleOutcome {
    let all_present = SECTION_GROUPS
        .iter()
        .all(|group| group.iter().any(|header| text.contains(header)));

    if all_present {
        RuleOutcome::silent(30.0)
    } else {
        RuleOutcome::advise(
            10.0,
            "🚨 Critical: Ensure all major sections (Experience, Education, Skills) are clearly titled.",
        )
    }
}

/// Length (max 20). 300–800 words inclusive is the target band.
pub fn length(_text: &str, word_count: usize) -> RuleOutcome {
    if word_count < MIN_WORDS {
        RuleOutcome::advise(
            5.0,
            format!("🔴 Too Short: Word count is low ({word_count}). Elaborate on your experience."),
        )
    } else if word_count > MAX_WORDS {
        RuleOutcome::advise(
            10.0,
            format!(
                "🟡 Too Long: Word count is high ({word_count}). Keep professional resumes concise (max 2 pages)."
            ),
        )
    } else {
        RuleOutcome::silent(20.0)
    }
}

/// Non-overlapping substring occurrences summed over `ACTION_VERBS`.
pub fn count_action_verbs(text: &str) -> usize {
    ACTION_VERBS
        .iter()
        .map(|verb| text.matches(verb).count())
        .sum()
}

/// Action verbs (max 20). The 5..10 band earns nothing and says nothing.
pub fn action_verbs(text: &str, _word_count: usize) -> RuleOutcome {
    let verb_count = count_action_verbs(text);

    if verb_count >= STRONG_VERB_COUNT {
        RuleOutcome::advise(
            20.0,
            "🟢 Strong: Good use of action verbs. Quantify your impact whenever possible!",
        )
    } else if verb_count < WEAK_VERB_COUNT {
        RuleOutcome::advise(
            5.0,
            format!(
                "🟠 Weak: Use more strong action verbs at the start of your bullet points. Found only {verb_count}."
            ),
        )
    } else {
        RuleOutcome::silent(0.0)
    }
}

pub fn found_keywords(text: &str) -> Vec<&'static str> {
    SAMPLE_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| text.contains(kw))
        .collect()
}

/// Keyword coverage (max 30), proportional to the share of sample keywords found.
/// Always reports the tally.
pub fn keyword_coverage(text: &str, _word_count: usize) -> RuleOutcome {
    let found = found_keywords(text).len();
    let total = SAMPLE_KEYWORDS.len();
    let points = if total == 0 {
        0.0
    } else {
        found as f64 * (KEYWORD_MAX_POINTS / total as f64)
    };

    RuleOutcome::advise(
        points,
        format!("🔑 Keywords: Found {found} out of {total} sample critical skills."),
    )
}
