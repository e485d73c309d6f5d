//! Analysis results and the presentation values derived from them.

use std::collections::HashSet;

use serde::Serialize;

/// Insights shown in the analysis panel; the rest are dropped from display
pub const MAX_DISPLAYED_INSIGHTS: usize = 6;

/// Placeholder for any value that needs an analysis to exist
pub const NO_VALUE: &str = "—";

pub const NO_STRENGTHS: &str = "No obvious strengths extracted.";
pub const NO_GAPS: &str = "No gaps detected.";

/// Match analysis returned by the backend for one resume/JD pair.
///
/// Immutable once built. Strengths and gaps are deduplicated keeping the
/// first occurrence, so display order follows the backend's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    match_score: i64,
    strengths: Vec<String>,
    gaps: Vec<String>,
    insights: Vec<String>,
}

impl AnalysisResult {
    pub fn new(
        match_score: i64,
        strengths: Vec<String>,
        gaps: Vec<String>,
        insights: Vec<String>,
    ) -> Self {
        Self {
            match_score,
            strengths: dedup_in_order(strengths),
            gaps: dedup_in_order(gaps),
            insights,
        }
    }

    pub fn match_score(&self) -> i64 {
        self.match_score
    }

    pub fn strengths(&self) -> &[String] {
        &self.strengths
    }

    pub fn gaps(&self) -> &[String] {
        &self.gaps
    }

    pub fn insights(&self) -> &[String] {
        &self.insights
    }
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Label for a match score, evaluated top-down
pub fn score_label(result: Option<&AnalysisResult>) -> &'static str {
    let Some(result) = result else {
        return NO_VALUE;
    };

    match result.match_score {
        s if s >= 80 => "Excellent match",
        s if s >= 60 => "Good match",
        s if s >= 40 => "Partial match",
        _ => "Low match",
    }
}

/// Everything the render layer needs from the current analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisView {
    pub is_empty: bool,
    pub score_label: &'static str,
    pub score_text: String,
    /// Width of the match bar, clamped to 0..=100
    pub bar_percent: u16,
    pub strengths_count: String,
    pub gaps_count: String,
    pub insights: Vec<String>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
}

impl AnalysisView {
    pub fn derive(result: Option<&AnalysisResult>) -> Self {
        let score_label = score_label(result);

        match result {
            None => Self {
                is_empty: true,
                score_label,
                score_text: NO_VALUE.to_string(),
                bar_percent: 0,
                strengths_count: NO_VALUE.to_string(),
                gaps_count: NO_VALUE.to_string(),
                insights: Vec::new(),
                strengths: Vec::new(),
                gaps: Vec::new(),
            },
            Some(r) => Self {
                is_empty: false,
                score_label,
                score_text: format!("{}%", r.match_score),
                bar_percent: r.match_score.clamp(0, 100) as u16,
                strengths_count: r.strengths.len().to_string(),
                gaps_count: r.gaps.len().to_string(),
                insights: r
                    .insights
                    .iter()
                    .take(MAX_DISPLAYED_INSIGHTS)
                    .cloned()
                    .collect(),
                strengths: r.strengths.clone(),
                gaps: r.gaps.clone(),
            },
        }
    }

    /// Text to show instead of strength pills, if there are none
    pub fn strengths_placeholder(&self) -> Option<&'static str> {
        (!self.is_empty && self.strengths.is_empty()).then_some(NO_STRENGTHS)
    }

    /// Text to show instead of gap pills, if there are none
    pub fn gaps_placeholder(&self) -> Option<&'static str> {
        (!self.is_empty && self.gaps.is_empty()).then_some(NO_GAPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: i64) -> AnalysisResult {
        AnalysisResult::new(score, Vec::new(), Vec::new(), Vec::new())
    }

    #[test]
    fn test_score_label_ladder() {
        assert_eq!(score_label(Some(&result(100))), "Excellent match");
        assert_eq!(score_label(Some(&result(80))), "Excellent match");
        assert_eq!(score_label(Some(&result(79))), "Good match");
        assert_eq!(score_label(Some(&result(60))), "Good match");
        assert_eq!(score_label(Some(&result(40))), "Partial match");
        assert_eq!(score_label(Some(&result(39))), "Low match");
        assert_eq!(score_label(Some(&result(0))), "Low match");
        assert_eq!(score_label(None), NO_VALUE);
    }

    #[test]
    fn test_score_label_is_stable() {
        let r = result(72);
        assert_eq!(score_label(Some(&r)), score_label(Some(&r)));
        assert_eq!(AnalysisView::derive(Some(&r)), AnalysisView::derive(Some(&r)));
    }

    #[test]
    fn test_good_match_with_no_gaps() {
        let r = AnalysisResult::new(
            72,
            vec!["Python".to_string(), "SQL".to_string()],
            Vec::new(),
            Vec::new(),
        );
        let view = AnalysisView::derive(Some(&r));

        assert_eq!(view.score_label, "Good match");
        assert_eq!(view.score_text, "72%");
        assert_eq!(view.strengths, vec!["Python", "SQL"]);
        assert_eq!(view.strengths_placeholder(), None);
        assert_eq!(view.gaps_placeholder(), Some(NO_GAPS));
        assert_eq!(view.strengths_count, "2");
        assert_eq!(view.gaps_count, "0");
    }

    #[test]
    fn test_empty_view_uses_placeholders() {
        let view = AnalysisView::derive(None);
        assert!(view.is_empty);
        assert_eq!(view.score_text, NO_VALUE);
        assert_eq!(view.strengths_count, NO_VALUE);
        // The whole panel is replaced, so no per-list placeholder
        assert_eq!(view.gaps_placeholder(), None);
    }

    #[test]
    fn test_insights_truncated_and_bar_clamped() {
        let insights: Vec<String> = (0..9).map(|i| format!("insight {i}")).collect();
        let r = AnalysisResult::new(140, Vec::new(), Vec::new(), insights);
        let view = AnalysisView::derive(Some(&r));

        assert_eq!(view.insights.len(), MAX_DISPLAYED_INSIGHTS);
        assert_eq!(view.insights[0], "insight 0");
        assert_eq!(view.bar_percent, 100);
        assert_eq!(AnalysisView::derive(Some(&result(-5))).bar_percent, 0);
    }

    #[test]
    fn test_strengths_and_gaps_deduplicated() {
        let r = AnalysisResult::new(
            50,
            vec!["sql".into(), "python".into(), "sql".into()],
            vec!["react".into(), "react".into()],
            Vec::new(),
        );
        assert_eq!(r.strengths(), ["sql", "python"]);
        assert_eq!(r.gaps(), ["react"]);
    }
}
