//! # Dashboard
//!
//! Mocked until real scoring lands. Scores are out of 100.
use serde::Serialize;

pub const PUFF_SCORE: u8 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreLabel {
    Excellent,
    Solid,
    #[serde(rename = "Needs Work")]
    NeedsWork,
}

impl ScoreLabel {
    pub fn for_score(score: u8) -> Self {
        match score {
            85.. => ScoreLabel::Excellent,
            70..=84 => ScoreLabel::Solid,
            _ => ScoreLabel::NeedsWork,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Solid => "Solid",
            ScoreLabel::NeedsWork => "Needs Work",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub reason: &'static str,
    pub improvement: &'static str,
}

pub const CATEGORIES: [Category; 5] = [
    Category { name: "Structure", score: 85 },
    Category { name: "Efficiency", score: 68 },
    Category { name: "Error Handling", score: 55 },
    Category { name: "Scalability", score: 78 },
    Category { name: "Readability", score: 74 },
];

pub const RECOMMENDATIONS: [Recommendation; 4] = [
    Recommendation {
        title: "Add Retry Logic to Data Sync",
        reason: "Implement exponential backoff for API calls to handle transient failures \
                 gracefully.",
        improvement: "+12 pts",
    },
    Recommendation {
        title: "Implement Rate Limiting",
        reason: "Add rate limiting to prevent email flooding and reduce costs.",
        improvement: "+8 pts",
    },
    Recommendation {
        title: "Extract Configuration",
        reason: "Move hardcoded values to environment variables or config files.",
        improvement: "+5 pts",
    },
    Recommendation {
        title: "Optimize Loop Structure",
        reason: "Replace nested loops with more efficient data structures.",
        improvement: "+3 pts",
    },
];

pub const QUOTES: [&str; 10] = [
    "Every great driver started with a learner's permit.",
    "I've seen fewer crashes in a demolition derby.",
    "At this rate, my insurance will never recover.",
    "You remind me of my worst student... and that's saying something.",
    "Deep breaths... this is why I have a stress ball.",
    "Some students take years to learn. You might take decades.",
    "I didn't think it was possible to fail this creatively.",
    "My other students at least hit the brakes occasionally.",
    "You drive like you're being chased by your own logic.",
    "I'm not mad, I'm just... profoundly disappointed.",
];

/// Seconds between quote changes.
pub const QUOTE_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user_name: String,
    pub score: u8,
    pub label: ScoreLabel,
    pub categories: &'static [Category],
    pub recommendations: &'static [Recommendation],
    /// Nothing to grade until the user uploads an automation.
    pub has_automations: bool,
    quote_index: usize,
}

impl Dashboard {
    pub fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_string(),
            score: PUFF_SCORE,
            label: ScoreLabel::for_score(PUFF_SCORE),
            categories: &CATEGORIES,
            recommendations: &RECOMMENDATIONS,
            has_automations: false,
            quote_index: 0,
        }
    }

    pub fn upload(&mut self, file_count: usize) {
        if file_count > 0 {
            self.has_automations = true;
        }
    }

    pub fn quote(&self) -> &'static str {
        QUOTES[self.quote_index]
    }

    pub fn next_quote(&mut self) -> &'static str {
        self.quote_index = (self.quote_index + 1) % QUOTES.len();
        self.quote()
    }
}
