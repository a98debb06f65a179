//! Aggregate statistics over graded submissions.
//!
//! Per-question, per-topic, and per-user rollups back the progress and
//! leaderboard views.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::ConfidenceTier;
use crate::results::GradedSubmission;

/// How many of the most-missed keywords to keep per question.
const MOST_MISSED_LIMIT: usize = 5;

/// Aggregate statistics across all graded submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub graded: usize,
    pub failed: usize,
    pub mean_score: f64,
    pub median_score: f64,
    pub tiers: TierCounts,
    pub per_question: BTreeMap<String, QuestionStats>,
    pub per_topic: BTreeMap<String, TopicStats>,
    pub per_user: BTreeMap<String, UserStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Statistics for one question across all of its submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub question_id: String,
    pub attempts: usize,
    pub mean_score: f64,
    pub best_score: u8,
    /// Keywords most often missing, with how many answers missed them.
    pub most_missed: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStats {
    pub topic: String,
    pub attempts: usize,
    pub mean_score: f64,
}

/// Progress of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub user: String,
    pub attempts: usize,
    pub questions_attempted: usize,
    pub mean_score: f64,
    pub best_score: u8,
}

/// Compute aggregate statistics from graded submissions.
pub fn compute_aggregate_stats(results: &[GradedSubmission], failed: usize) -> AggregateStats {
    let scores: Vec<u8> = results.iter().map(|r| r.result.final_score).collect();

    let mut tiers = TierCounts::default();
    for r in results {
        match r.result.confidence {
            ConfidenceTier::Low => tiers.low += 1,
            ConfidenceTier::Medium => tiers.medium += 1,
            ConfidenceTier::High => tiers.high += 1,
        }
    }

    // Per-question stats
    let mut by_question: BTreeMap<&str, Vec<&GradedSubmission>> = BTreeMap::new();
    for r in results {
        by_question.entry(r.question_id.as_str()).or_default().push(r);
    }
    let per_question = by_question
        .into_iter()
        .map(|(question_id, group)| {
            let mut missed: HashMap<&str, usize> = HashMap::new();
            for r in &group {
                for keyword in &r.result.missing_keywords {
                    *missed.entry(keyword.as_str()).or_default() += 1;
                }
            }
            let mut most_missed: Vec<(String, usize)> = missed
                .into_iter()
                .map(|(k, n)| (k.to_string(), n))
                .collect();
            most_missed.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            most_missed.truncate(MOST_MISSED_LIMIT);

            let group_scores: Vec<u8> = group.iter().map(|r| r.result.final_score).collect();
            (
                question_id.to_string(),
                QuestionStats {
                    question_id: question_id.to_string(),
                    attempts: group.len(),
                    mean_score: mean(&group_scores),
                    best_score: group_scores.iter().copied().max().unwrap_or(0),
                    most_missed,
                },
            )
        })
        .collect();

    // Per-topic stats
    let mut by_topic: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
    for r in results.iter().filter(|r| !r.topic.is_empty()) {
        by_topic
            .entry(r.topic.as_str())
            .or_default()
            .push(r.result.final_score);
    }
    let per_topic = by_topic
        .into_iter()
        .map(|(topic, topic_scores)| {
            (
                topic.to_string(),
                TopicStats {
                    topic: topic.to_string(),
                    attempts: topic_scores.len(),
                    mean_score: mean(&topic_scores),
                },
            )
        })
        .collect();

    // Per-user stats
    let mut by_user: BTreeMap<&str, Vec<&GradedSubmission>> = BTreeMap::new();
    for r in results {
        if let Some(user) = r.user.as_deref() {
            by_user.entry(user).or_default().push(r);
        }
    }
    let per_user = by_user
        .into_iter()
        .map(|(user, group)| {
            let user_scores: Vec<u8> = group.iter().map(|r| r.result.final_score).collect();
            let distinct: BTreeSet<&str> = group.iter().map(|r| r.question_id.as_str()).collect();
            (
                user.to_string(),
                UserStats {
                    user: user.to_string(),
                    attempts: group.len(),
                    questions_attempted: distinct.len(),
                    mean_score: mean(&user_scores),
                    best_score: user_scores.iter().copied().max().unwrap_or(0),
                },
            )
        })
        .collect();

    AggregateStats {
        graded: results.len(),
        failed,
        mean_score: mean(&scores),
        median_score: median(&scores),
        tiers,
        per_question,
        per_topic,
        per_user,
    }
}

/// Users ordered by mean score, then attempts, then name.
pub fn leaderboard(stats: &AggregateStats) -> Vec<&UserStats> {
    let mut users: Vec<&UserStats> = stats.per_user.values().collect();
    users.sort_by(|a, b| {
        b.mean_score
            .total_cmp(&a.mean_score)
            .then_with(|| b.attempts.cmp(&a.attempts))
            .then_with(|| a.user.cmp(&b.user))
    });
    users
}

fn mean(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64
}

fn median(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EvaluationResult, ScoreBreakdown};

    fn graded(id: &str, question: &str, user: Option<&str>, score: u8, missing: &[&str]) -> GradedSubmission {
        GradedSubmission {
            submission_id: id.into(),
            question_id: question.into(),
            user: user.map(str::to_string),
            role: "Frontend Developer".into(),
            topic: "React Core".into(),
            result: EvaluationResult {
                final_score: score,
                confidence: ConfidenceTier::from_score(score),
                matched_keywords: vec![],
                missing_keywords: missing.iter().map(|s| s.to_string()).collect(),
                summary_feedback: String::new(),
                detailed_feedback: vec![],
                breakdown: ScoreBreakdown::default(),
                covered_sentences: 0,
                total_sentences: 0,
                word_count: 0,
            },
        }
    }

    #[test]
    fn empty_results() {
        let stats = compute_aggregate_stats(&[], 2);
        assert_eq!(stats.graded, 0);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.mean_score, 0.0);
        assert_eq!(stats.median_score, 0.0);
        assert!(leaderboard(&stats).is_empty());
    }

    #[test]
    fn overall_and_tiers() {
        let results = vec![
            graded("s1", "q1", Some("ada"), 90, &[]),
            graded("s2", "q1", Some("bob"), 50, &["useEffect"]),
            graded("s3", "q2", Some("ada"), 20, &["useEffect", "redux"]),
            graded("s4", "q2", None, 40, &["redux"]),
        ];
        let stats = compute_aggregate_stats(&results, 0);
        assert_eq!(stats.graded, 4);
        assert!((stats.mean_score - 50.0).abs() < 1e-9);
        assert!((stats.median_score - 45.0).abs() < 1e-9);
        assert_eq!(
            stats.tiers,
            TierCounts {
                low: 1,
                medium: 2,
                high: 1
            }
        );
        assert_eq!(stats.per_topic["React Core"].attempts, 4);
    }

    #[test]
    fn per_question_most_missed() {
        let results = vec![
            graded("s1", "q1", None, 30, &["redux", "jsx"]),
            graded("s2", "q1", None, 60, &["redux"]),
            graded("s3", "q1", None, 80, &[]),
        ];
        let stats = compute_aggregate_stats(&results, 0);
        let q1 = &stats.per_question["q1"];
        assert_eq!(q1.attempts, 3);
        assert_eq!(q1.best_score, 80);
        assert_eq!(
            q1.most_missed,
            vec![("redux".to_string(), 2), ("jsx".to_string(), 1)]
        );
    }

    #[test]
    fn per_user_progress_and_leaderboard() {
        let results = vec![
            graded("s1", "q1", Some("ada"), 90, &[]),
            graded("s2", "q2", Some("ada"), 70, &[]),
            graded("s3", "q1", Some("bob"), 80, &[]),
            graded("s4", "q1", Some("cy"), 80, &[]),
            graded("s5", "q1", Some("cy"), 80, &[]),
        ];
        let stats = compute_aggregate_stats(&results, 0);
        let ada = &stats.per_user["ada"];
        assert_eq!(ada.attempts, 2);
        assert_eq!(ada.questions_attempted, 2);
        assert_eq!(ada.best_score, 90);

        let board: Vec<&str> = leaderboard(&stats).iter().map(|u| u.user.as_str()).collect();
        // Ties on mean break on attempts, then name.
        assert_eq!(board, vec!["ada", "cy", "bob"]);
    }

    #[test]
    fn median_odd_count() {
        assert_eq!(median(&[10, 90, 30]), 30.0);
    }
}
