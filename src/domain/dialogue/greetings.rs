//! Greeting and suggestion texts rendered from a profile snapshot.
//!
//! All functions here are pure: same snapshot and context, same text.

use crate::domain::profile::{DailyContext, Goal, UserProfileSnapshot};

const WELCOME_NAME_FALLBACK: &str = "друг";
const GREETING_NAME_FALLBACK: &str = "there";

/// Russian welcome shown when a chat opens.
pub fn welcome_message(snapshot: &UserProfileSnapshot, daily: Option<&DailyContext>) -> String {
    let name = snapshot.identity.display_name_or(WELCOME_NAME_FALLBACK);

    if daily.is_some_and(|d| d.is_first_visit_today) {
        return format!("С возвращением, {}! Готов помочь тебе сегодня.", name);
    }

    let open_titles: Vec<String> = snapshot
        .open_goals()
        .map(|goal| format!("\"{}\"", welcome_goal_title(goal)))
        .collect();
    if !open_titles.is_empty() {
        return format!(
            "Привет, {}! Ты работаешь над целями: {}. Чем могу помочь продвинуться сегодня?",
            name,
            open_titles.join(", ")
        );
    }

    let pending = snapshot.pending_task_count();
    if pending > 0 {
        return format!(
            "Привет, {}! У тебя {} незавершённых задач. С чего начнём?",
            name, pending
        );
    }

    format!(
        "Привет, {}! Я твой ИИ-ассистент. Давай поставим для тебя значимые цели. Чего хочешь достичь?",
        name
    )
}

fn welcome_goal_title(goal: &Goal) -> String {
    goal.resolved_title()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Цель {}", goal.id))
}

/// English greeting that accounts for visit recency.
pub fn daily_greeting(snapshot: &UserProfileSnapshot, daily: &DailyContext) -> String {
    let name = snapshot.identity.display_name_or(GREETING_NAME_FALLBACK);

    if daily.is_first_visit_today {
        return match daily.last_visit {
            Some(_) => format!(
                "Welcome back, {}! Since your last visit, you've completed {} tasks. You have {} tasks that need attention.",
                name, daily.completed_today_tasks, daily.pending_high_priority_tasks
            ),
            None => format!(
                "Good to see you, {}! You have {} tasks waiting for you today.",
                name, daily.pending_high_priority_tasks
            ),
        };
    }

    if snapshot.is_blank() {
        return format!("Hi {}! Let's get started with your journey.", name);
    }

    let open_goals = snapshot.open_goal_count();
    if open_goals > 0 {
        return format!(
            "Hi {}! Let's continue working on your goals. You have {} active goals and {} pending tasks.",
            name,
            open_goals,
            snapshot.pending_task_count()
        );
    }

    format!("Hi {}! How can I help you today?", name)
}

/// A nudge towards the next useful thing to do.
pub fn interesting_suggestion(snapshot: &UserProfileSnapshot) -> &'static str {
    if snapshot.is_blank() {
        "Let's start by setting some goals for you. What would you like to achieve?"
    } else if snapshot.open_goal_count() == 0 {
        "Would you like to set some goals? I can help you create a plan to achieve them."
    } else if snapshot.pending_task_count() == 0 {
        "Great job on keeping up with your tasks! Would you like to take on new challenges?"
    } else {
        "I'm here to help you make progress on your goals. What would you like to focus on today?"
    }
}
