use chrono::{DateTime, Duration, Utc};

use crate::models::{Category, FactorSeverity, InterventionStrategy, Priority, RiskFactor};

struct StrategyTemplate {
    priority: Priority,
    title: &'static str,
    actions: &'static [&'static str],
}

/// Strategy for a weak category at a given severity, if one is defined.
fn strategy_for(category: Category, severity: FactorSeverity) -> Option<StrategyTemplate> {
    let template = match (category, severity) {
        (Category::Engagement, FactorSeverity::Critical) => StrategyTemplate {
            priority: Priority::Urgent,
            title: "Re-engagement outreach",
            actions: &[
                "Contact the student and parent within 24 hours",
                "Schedule a short check-in session",
                "Set a two-day streak goal with a small reward",
            ],
        },
        (Category::Engagement, FactorSeverity::Warning) => StrategyTemplate {
            priority: Priority::High,
            title: "Rebuild a study routine",
            actions: &[
                "Agree on fixed daily study slots",
                "Enable streak reminders",
            ],
        },
        (Category::Performance, FactorSeverity::Critical) => StrategyTemplate {
            priority: Priority::Urgent,
            title: "Academic recovery plan",
            actions: &[
                "Assign a tutor for the weakest topics",
                "Drop practice difficulty one level until accuracy recovers",
                "Review recent mistakes together",
            ],
        },
        (Category::Performance, FactorSeverity::Warning) => StrategyTemplate {
            priority: Priority::High,
            title: "Targeted practice",
            actions: &[
                "Generate a practice set from recently missed questions",
                "Revisit worked examples before new material",
            ],
        },
        (Category::Learning, FactorSeverity::Critical) => StrategyTemplate {
            priority: Priority::High,
            title: "Restructure the learning path",
            actions: &[
                "Split remaining topics into smaller milestones",
                "Clear the review backlog before starting new topics",
            ],
        },
        (Category::Learning, FactorSeverity::Warning) => StrategyTemplate {
            priority: Priority::Medium,
            title: "Pace adjustment",
            actions: &[
                "Rebalance the weekly topic load",
                "Encourage attempting questions before asking for help",
            ],
        },
        (Category::Behavioral, FactorSeverity::Critical) => StrategyTemplate {
            priority: Priority::High,
            title: "Focus and wellbeing support",
            actions: &[
                "Shorten sessions and add breaks",
                "Talk with the student about sources of frustration",
                "Suggest a distraction-free study environment",
            ],
        },
        (Category::Behavioral, FactorSeverity::Warning) => StrategyTemplate {
            priority: Priority::Low,
            title: "Habit coaching",
            actions: &["Share habit-tracking tips", "Celebrate completed habits weekly"],
        },
        (Category::Social, FactorSeverity::Critical) => StrategyTemplate {
            priority: Priority::Low,
            title: "Peer connection",
            actions: &[
                "Pair the student with a study buddy",
                "Invite the student to a group activity",
            ],
        },
        (Category::Social, FactorSeverity::Warning) => return None,
    };
    Some(template)
}

/// One strategy per matched risk factor, most urgent first.
///
/// Factors without a strategy are skipped; equal priorities keep input order.
pub fn generate_interventions(
    factors: &[RiskFactor],
    now: DateTime<Utc>,
) -> Vec<InterventionStrategy> {
    let mut strategies: Vec<InterventionStrategy> = factors
        .iter()
        .filter_map(|factor| {
            let template = strategy_for(factor.category, factor.severity)?;
            Some(InterventionStrategy {
                priority: template.priority,
                title: template.title.to_string(),
                actions: template.actions.iter().map(|a| a.to_string()).collect(),
                triggered_by_category: factor.category,
                trigger_score: factor.score,
                implement_by: now + Duration::days(template.priority.offset_days()),
            })
        })
        .collect();
    strategies.sort_by_key(|s| s.priority.rank());
    strategies
}
