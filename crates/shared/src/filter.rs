use crate::models::CandidateTerm;
use crate::scorer::HIGH_BUILDABILITY;

// Brand names dominate trending lists but carry no buildable problem.
const BRAND_TERMS: &[&str] = &[
    "claude",
    "chatgpt",
    "gemini",
    "openai",
    "copilot",
    "midjourney",
    "perplexity",
    "grok",
    "notion",
    "figma",
    "github",
    "slack",
    "zapier",
    "xbox",
    "playstation",
    "nintendo",
    "steam",
    "cash app",
    "venmo",
    "paypal",
    "robinhood",
    "coinbase",
    "pennymac",
    "johnson and johnson",
    "tesla",
    "apple",
    "amazon",
    "google",
    "microsoft",
    "meta",
    "netflix",
];

// Terms too broad or unrelated to have a buildable problem behind them.
// Matched against the whole term, not by containment.
const GENERIC_TERMS: &[&str] = &[
    "artificial intelligence",
    "machine learning",
    "ai",
    "technology",
    "health tips",
    "fitness tips",
    "health",
    "fitness",
    "wellness",
    "productivity",
    "how to be productive",
    "personal finance",
    "make money online",
    "work from home",
    "5g",
    "internet",
    "beer",
    "holi",
    "oil prices today",
    "gasbuddy",
];

// News, events and people: trending but not buildable.
const NEWS_MARKERS: &[&str] = &[
    "shooting",
    "killed",
    "died",
    "death",
    "arrested",
    "trial",
    "crash",
    "fire",
    "earthquake",
    "hurricane",
    "flood",
    "tornado",
    "election",
    "vote",
    "president",
    "congress",
    "senate",
    "war",
    "attack",
    "bomb",
    "explosion",
    "hostage",
    "university",
    "college",
    "school",
];

// Sports queries carry huge volume and zero build signal.
const SPORTS_MARKERS: &[&str] = &[
    "vs",
    "score",
    "game",
    "match",
    "nfl",
    "nba",
    "nhl",
    "mlb",
    "fifa",
    "ufc",
    "boxing",
    "playoff",
    "championship",
    "tournament",
    "league",
    "roster",
    "draft",
    "trade",
    "coach",
];

const ENTERTAINMENT_MARKERS: &[&str] = &[
    "movie",
    "show",
    "episode",
    "trailer",
    "season",
    "premiere",
    "concert",
    "album",
    "song",
    "actress",
    "actor",
];

/// Noise-rejection rule set. All matching is lowercase; the marker lists
/// match by containment, `generic_terms` against the whole term.
#[derive(Debug, Clone)]
pub struct FilterRules {
    pub brand_terms: Vec<String>,
    pub generic_terms: Vec<String>,
    pub news_markers: Vec<String>,
    pub sports_markers: Vec<String>,
    pub entertainment_markers: Vec<String>,
    /// Words that rescue a two-word term from the person-name heuristic.
    pub signal_words: Vec<String>,
    /// Terms longer than this are headlines, not search keywords.
    pub max_term_len: usize,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            brand_terms: to_owned(BRAND_TERMS),
            generic_terms: to_owned(GENERIC_TERMS),
            news_markers: to_owned(NEWS_MARKERS),
            sports_markers: to_owned(SPORTS_MARKERS),
            entertainment_markers: to_owned(ENTERTAINMENT_MARKERS),
            signal_words: to_owned(HIGH_BUILDABILITY),
            max_term_len: 60,
        }
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Stateless noise filter over candidate terms. Pure string inspection,
/// so the same input always survives or falls the same way.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    rules: FilterRules,
}

impl NoiseFilter {
    pub fn new(rules: FilterRules) -> Self {
        Self { rules }
    }

    /// Returns true when the term might represent a buildable opportunity
    /// worth scoring.
    pub fn keep(&self, term: &str) -> bool {
        let kw = term.to_lowercase();

        // Too long = headline, not a keyword
        if kw.chars().count() > self.rules.max_term_len {
            return false;
        }

        if contains_any(&kw, &self.rules.brand_terms)
            || contains_any(&kw, &self.rules.news_markers)
            || contains_any(&kw, &self.rules.sports_markers)
            || contains_any(&kw, &self.rules.entertainment_markers)
        {
            return false;
        }

        if self.rules.generic_terms.iter().any(|g| g == &kw) {
            return false;
        }

        // Two bare alphabetic words are nearly always a person in the news.
        // Tool-shaped queries are rarely just "firstname lastname", so a
        // buildability signal word lets the term through.
        let words: Vec<&str> = kw.split_whitespace().collect();
        if words.len() == 2 && words.iter().all(|w| w.chars().all(char::is_alphabetic)) {
            return contains_any(&kw, &self.rules.signal_words);
        }

        true
    }

    /// Drop noise candidates, preserving the order of the survivors.
    pub fn apply(&self, candidates: Vec<CandidateTerm>) -> Vec<CandidateTerm> {
        candidates.into_iter().filter(|c| self.keep(&c.term)).collect()
    }
}

fn contains_any(term: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| term.contains(m.as_str()))
}
