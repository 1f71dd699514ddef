use rand::seq::IndexedRandom;

/// A notification template. Placeholders look like `{count}` and are filled
/// by literal find-and-replace of the first occurrence per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub title: &'static str,
    pub body: &'static str,
}

pub const TASK_MORNING: [Template; 3] = [
    Template {
        title: "☀️ Good Morning!",
        body: "You have {count} tasks lined up today. Let's make it count! 💪",
    },
    Template {
        title: "🌅 Rise & Shine!",
        body: "Ready to crush {count} tasks today? I believe in you! ✨",
    },
    Template {
        title: "☕ Morning Check-in",
        body: "{count} tasks await you. Start strong, finish stronger! 🚀",
    },
];

pub const TASK_AFTERNOON: [Template; 3] = [
    Template {
        title: "🌤️ Afternoon Nudge",
        body: "Hey! {remaining} tasks still on your list. Keep going! 💪",
    },
    Template {
        title: "⏰ Quick Reminder",
        body: "Don't forget about your remaining {remaining} tasks! 🎯",
    },
    Template {
        title: "🔔 Midday Check",
        body: "{remaining} tasks left. You're doing awesome! Keep it up! ⭐",
    },
];

pub const TASK_EVENING: [Template; 3] = [
    Template {
        title: "🌆 Evening Heads Up",
        body: "{remaining} tasks for today. Still time to finish strong! 💫",
    },
    Template {
        title: "🌙 Final Push!",
        body: "Only {remaining} tasks left. You've got this! 🙌",
    },
    Template {
        title: "✨ Almost There!",
        body: "Just {remaining} more tasks. End the day on a high note! 🎉",
    },
];

pub const TASK_COMPLETION: [Template; 3] = [
    Template {
        title: "🎉 AMAZING!",
        body: "All tasks completed! You're a productivity rockstar! 🌟",
    },
    Template {
        title: "🏆 Champion!",
        body: "Every task done! Treat yourself, you earned it! 🍰",
    },
    Template {
        title: "🥳 Woohoo!",
        body: "Zero tasks remaining! Now that's what I call crushing it! 💪",
    },
];

pub const GOAL_CHECK_IN: [Template; 3] = [
    Template {
        title: "🔥 Streak Alert!",
        body: "Time to check in for '{title}'! Day {day} of {total} 💪",
    },
    Template {
        title: "🎯 Daily Check-in",
        body: "Keep your '{title}' streak alive! You're on Day {day}! 🏃",
    },
    Template {
        title: "💪 Don't Break It!",
        body: "'{title}' check-in time! {streak}% consistency so far! ⭐",
    },
];

pub const ROUTINE_MORNING: [Template; 3] = [
    Template {
        title: "☀️ Good Morning!",
        body: "Your {count} routines are ready! Start your day right! 🌅",
    },
    Template {
        title: "🌞 Rise & Routine!",
        body: "Time to kick off {count} daily habits! Let's go! 💪",
    },
    Template {
        title: "☕ Morning Ritual",
        body: "{count} routines await! Build the day you deserve! ✨",
    },
];

pub const ROUTINE_EVENING: [Template; 3] = [
    Template {
        title: "🌙 Evening Summary",
        body: "You completed {completed}/{total} routines today! {emoji}",
    },
    Template {
        title: "📊 Daily Wrap-up",
        body: "{completed}/{total} routines done. {message} 💫",
    },
    Template {
        title: "🌆 End of Day",
        body: "Routine check: {completed}/{total}. {message} ✨",
    },
];

pub const ROUTINE_COMPLETION: [Template; 3] = [
    Template {
        title: "🎉 Perfect Day!",
        body: "All routines completed! You're building an amazing lifestyle! 🏆",
    },
    Template {
        title: "🥳 Routine Master!",
        body: "Every single routine done! Consistency is your superpower! 💪",
    },
    Template {
        title: "🌟 Flawless!",
        body: "100% routine completion! Keep being awesome! ⭐",
    },
];

pub const MOTIVATIONAL: [Template; 12] = [
    Template {
        title: "💫 Daily Inspiration",
        body: "Every expert was once a beginner. Keep going! 🚀",
    },
    Template {
        title: "🌟 You've Got This!",
        body: "Small progress is still progress. Be proud of yourself! 💪",
    },
    Template {
        title: "✨ Believe",
        body: "You're capable of amazing things. Trust the process! 🌈",
    },
    Template {
        title: "🔥 Fire Within",
        body: "Your dedication is inspiring! Keep that fire burning! 🔥",
    },
    Template {
        title: "🌱 Growth Mindset",
        body: "Challenges help you grow. Embrace them! 💚",
    },
    Template {
        title: "💪 Strength",
        body: "You're stronger than you think. Keep pushing! 🏋️",
    },
    Template {
        title: "🎯 Focus",
        body: "Stay focused on your goals. You're doing incredible! ⭐",
    },
    Template {
        title: "🌻 Positivity",
        body: "Choose to see the good. Your mindset shapes your day! ☀️",
    },
    Template {
        title: "🚀 Momentum",
        body: "Keep the momentum going! Every step matters! 🌟",
    },
    Template {
        title: "💖 Self-Care",
        body: "Remember to be kind to yourself today. You deserve it! 🌸",
    },
    Template {
        title: "🎨 Creativity",
        body: "You bring something unique to the world. Never forget that! ✨",
    },
    Template {
        title: "🏆 Champion",
        body: "You're writing your own success story. Make it legendary! 📖",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 17 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }
}

pub fn task_pool(time_of_day: TimeOfDay) -> &'static [Template] {
    match time_of_day {
        TimeOfDay::Morning => &TASK_MORNING,
        TimeOfDay::Afternoon => &TASK_AFTERNOON,
        TimeOfDay::Evening => &TASK_EVENING,
    }
}

pub fn pick(pool: &[Template]) -> Template {
    *pool
        .choose(&mut rand::rng())
        .expect("message pools are never empty")
}

/// Fills `{key}` placeholders in title and body. Only the first occurrence of
/// each key is replaced; templates never repeat a placeholder.
pub fn render(template: Template, values: &[(&str, String)]) -> (String, String) {
    let mut title = template.title.to_string();
    let mut body = template.body.to_string();
    for (key, value) in values {
        let needle = format!("{{{key}}}");
        title = title.replacen(&needle, value, 1);
        body = body.replacen(&needle, value, 1);
    }
    (title, body)
}

pub fn completion_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

pub fn completion_emoji(completed: usize, total: usize) -> &'static str {
    let percent = completion_percent(completed, total);
    if percent == 100.0 {
        "🎉"
    } else if percent >= 80.0 {
        "🌟"
    } else if percent >= 50.0 {
        "👍"
    } else if percent >= 25.0 {
        "💪"
    } else {
        "🤗"
    }
}

pub fn completion_message(completed: usize, total: usize) -> &'static str {
    let percent = completion_percent(completed, total);
    if percent == 100.0 {
        "Perfect score! Amazing!"
    } else if percent >= 80.0 {
        "Great job today!"
    } else if percent >= 50.0 {
        "Solid effort! Keep it up!"
    } else if percent >= 25.0 {
        "Every bit counts!"
    } else {
        "Tomorrow's a new day!"
    }
}
