//! Console output formatter for ranking results

use colored::Colorize;
use std::time::Duration;

use triage_domain::util::ellipsize;
use triage_domain::{CandidateSet, RankingReport, ScoreHistogram, ScoreStatus};

/// Longest title fragment shown in tables, in bytes
const TITLE_WIDTH: usize = 60;

/// Widest histogram bar, in characters
const BAR_WIDTH: usize = 30;

/// Globally disable colored output (config `output.color = false`)
pub fn disable_colors() {
    colored::control::set_override(false);
}

/// Formats ranking reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &RankingReport, pool: &CandidateSet) -> String {
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("Paper Triage Results"));
        output.push('\n');

        output.push_str(&Self::ranking_table(report, pool));

        // Stage 2: deep dives (if any)
        if !report.stage2.is_empty() {
            output.push_str(&Self::section_header("Stage 2: Deep Dives"));
            for analysis in &report.stage2 {
                let title = Self::title_of(pool, &analysis.candidate_id);
                output.push_str(&format!(
                    "\n{}\n",
                    format!("── {} ──", title).yellow().bold()
                ));
                if !analysis.tags.is_empty() {
                    output.push_str(&format!(
                        "{} {}\n",
                        "Tags:".cyan().bold(),
                        analysis.tags.join(", ")
                    ));
                }
                output.push_str(&format!("{}\n\n{}\n", analysis.summary, analysis.evaluation));
            }
        }

        output.push_str(&Self::statistics_block(report));
        output.push_str(&Self::timings_block(report));
        output.push_str(&Self::footer());

        output
    }

    /// Format the ranked table plus a one-line summary
    pub fn format_ranking(report: &RankingReport, pool: &CandidateSet) -> String {
        let mut output = Self::ranking_table(report, pool);
        let stats = &report.statistics;
        output.push_str(&format!(
            "\n{} ranked, {} failed, {} conflicts\n",
            stats.ranked, stats.failed, stats.conflicts
        ));
        output
    }

    /// Format as JSON
    pub fn format_json(report: &RankingReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn ranking_table(report: &RankingReport, pool: &CandidateSet) -> String {
        let mut output = Self::section_header("Ranking");

        for (rank, score) in report.ranked().enumerate() {
            let title = Self::title_of(pool, &score.candidate_id);
            let final_score = score.ranked_score().unwrap_or(0.0);
            let mut line = format!(
                "{:>4}. {:>5.1}  {}  {}",
                rank + 1,
                final_score,
                score.candidate_id,
                ellipsize(&title, TITLE_WIDTH)
            );
            if score.status == ScoreStatus::ThirdRound {
                line.push_str(&format!(" {}", "(third round)".yellow()));
            }
            if score.is_single_score() {
                line.push_str(&format!(" {}", "(single judgment)".yellow()));
            }
            output.push_str(&line);
            output.push('\n');
        }

        let failed: Vec<_> = report.failed().collect();
        if !failed.is_empty() {
            output.push_str(&format!("\n{}\n", "Not ranked:".red().bold()));
            for score in failed {
                let title = Self::title_of(pool, &score.candidate_id);
                output.push_str(&format!(
                    "  {} {}  {}\n",
                    "x".red(),
                    score.candidate_id,
                    ellipsize(&title, TITLE_WIDTH)
                ));
            }
        }

        output
    }

    fn statistics_block(report: &RankingReport) -> String {
        let stats = &report.statistics;
        let mut output = Self::section_header("Statistics");

        output.push_str(&format!(
            "Papers: {}  Ranked: {}  Failed: {}\n",
            stats.total_candidates, stats.ranked, stats.failed
        ));
        output.push_str(&format!(
            "Agreed: {}  Arbitrated: {}  Single-judgment: {}  Conflicts: {}\n",
            stats.completed, stats.arbitrated, stats.single_score, stats.conflicts
        ));
        if !stats.failed_batches.is_empty() {
            let ids: Vec<String> = stats
                .failed_batches
                .iter()
                .map(|b| b.to_string())
                .collect();
            output.push_str(&format!(
                "{} {}\n",
                "Failed batches:".red().bold(),
                ids.join(", ")
            ));
        }
        if let (Some(min), Some(max), Some(mean)) =
            (stats.min_score, stats.max_score, stats.mean_score)
        {
            output.push_str(&format!(
                "Scores: min {:.1}  mean {:.1}  max {:.1}\n",
                min, mean, max
            ));
        }

        let bars = Self::histogram(&stats.histogram);
        if !bars.is_empty() {
            output.push('\n');
            output.push_str(&bars);
        }

        output
    }

    /// Render the score distribution as ASCII bars
    fn histogram(histogram: &ScoreHistogram) -> String {
        let peak = histogram.buckets().iter().copied().max().unwrap_or(0);
        if peak == 0 {
            return String::new();
        }

        let mut output = String::new();
        for (index, &count) in histogram.buckets().iter().enumerate() {
            let width = count * BAR_WIDTH / peak;
            output.push_str(&format!(
                "{:>7} | {} {}\n",
                ScoreHistogram::bucket_label(index),
                "#".repeat(width),
                count
            ));
        }
        output
    }

    fn timings_block(report: &RankingReport) -> String {
        let timings = &report.timings;
        let mut output = Self::section_header("Timings");
        output.push_str(&format!(
            "Allocation: {}  Scoring: {}  Arbitration: {}  Analysis: {}\n",
            Self::format_duration(timings.allocation),
            Self::format_duration(timings.scoring),
            Self::format_duration(timings.arbitration),
            Self::format_duration(timings.analysis),
        ));
        output.push_str(&format!(
            "Total: {}\n",
            Self::format_duration(timings.total)
        ));
        output
    }

    fn format_duration(duration: Duration) -> String {
        if duration.as_secs_f64() >= 1.0 {
            format!("{:.1}s", duration.as_secs_f64())
        } else {
            format!("{}ms", duration.as_millis())
        }
    }

    fn title_of(pool: &CandidateSet, candidate_id: &str) -> String {
        pool.iter()
            .find(|c| c.id == candidate_id)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| candidate_id.to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_domain::{
        AnalysisStatistics, Candidate, DetailedAnalysis, DetailedScore, PaperScore, StageTimings,
    };

    fn sample() -> (RankingReport, CandidateSet) {
        disable_colors();
        let pool = CandidateSet::new(vec![
            Candidate::new("a", "First Paper", "x"),
            Candidate::new("b", "Second Paper", "y"),
        ])
        .unwrap();

        let s1 = DetailedScore::new(32, 24, 24);
        let scores = vec![
            PaperScore::completed("a", Some(s1), Some(s1), 80.0, vec![]),
            PaperScore::failed("b", None, None, vec![]),
        ];
        let statistics = AnalysisStatistics::collect(2, &scores, 0, &[]);
        let report = RankingReport::new(
            scores,
            vec![DetailedAnalysis::new(
                "a",
                vec!["nlp".to_string()],
                "Solid evaluation section.",
                "A compact summary.",
            )],
            statistics,
            StageTimings::default(),
        );
        (report, pool)
    }

    #[test]
    fn test_format_shows_ranked_and_failed() {
        let (report, pool) = sample();
        let text = ConsoleFormatter::format(&report, &pool);
        assert!(text.contains("1.  80.0  a  First Paper"));
        assert!(text.contains("Not ranked:"));
        assert!(text.contains("Second Paper"));
        assert!(text.contains("A compact summary."));
    }

    #[test]
    fn test_format_ranking_is_compact() {
        let (report, pool) = sample();
        let text = ConsoleFormatter::format_ranking(&report, &pool);
        assert!(text.contains("1 ranked, 1 failed, 0 conflicts"));
        assert!(!text.contains("Timings"));
    }

    #[test]
    fn test_format_json_round_trips() {
        let (report, _pool) = sample();
        let json = ConsoleFormatter::format_json(&report);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stage1"][0]["candidate_id"], "a");
        assert_eq!(value["statistics"]["ranked"], 1);
    }
}
