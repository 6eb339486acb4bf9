//! Workout plan document, the static warm-up/cool-down tables, and the chat
//! rendering of a finished plan.

use super::{Difficulty, MuscleGroup};
use serde::{Deserialize, Deserializer, Serialize};

/// Grouping used to pick warm-up and cool-down routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuscleClass {
    Legs,
    Upper,
    General,
}

const LEGS_WARMUP: [&str; 5] = [
    "5 minutes of light cardio (jogging in place or cycling)",
    "Leg swings, 10 per leg",
    "Bodyweight squats, 2 x 10",
    "Walking lunges, 10 per leg",
    "Hip circles, 10 each direction",
];
const LEGS_COOLDOWN: [&str; 5] = [
    "Standing quad stretch, 30 seconds per leg",
    "Hamstring stretch, 30 seconds per leg",
    "Calf stretch against a wall, 30 seconds per leg",
    "Pigeon pose, 30 seconds per side",
    "Foam roll quads and calves",
];
const UPPER_WARMUP: [&str; 5] = [
    "5 minutes of light cardio (jumping jacks or rowing)",
    "Arm circles, 10 forward and 10 backward",
    "Shoulder rolls, 10 each direction",
    "Band pull-aparts, 2 x 15",
    "Knee push-ups, 1 x 10",
];
const UPPER_COOLDOWN: [&str; 5] = [
    "Cross-body shoulder stretch, 30 seconds per arm",
    "Overhead triceps stretch, 30 seconds per arm",
    "Doorway chest stretch, 30 seconds",
    "Child's pose, 45 seconds",
    "Neck rolls, 5 each direction",
];
const GENERAL_WARMUP: [&str; 5] = [
    "5 minutes of brisk walking or light jogging",
    "Jumping jacks, 30 seconds",
    "Torso twists, 10 each side",
    "Inchworms, 5 reps",
    "High knees, 30 seconds",
];
const GENERAL_COOLDOWN: [&str; 5] = [
    "2-3 minutes of slow walking",
    "Cat-cow stretch, 30 seconds",
    "Cobra stretch, 30 seconds",
    "Seated forward fold, 30 seconds",
    "Deep breathing, 1 minute",
];

impl MuscleClass {
    pub fn of(group: MuscleGroup) -> Self {
        match group {
            MuscleGroup::Legs => MuscleClass::Legs,
            MuscleGroup::Arms | MuscleGroup::Chest | MuscleGroup::Back | MuscleGroup::Shoulders => {
                MuscleClass::Upper
            }
            MuscleGroup::Core | MuscleGroup::Cardio | MuscleGroup::FullBody => MuscleClass::General,
        }
    }

    pub fn warmup(&self) -> Vec<String> {
        let list: &[&str] = match self {
            MuscleClass::Legs => &LEGS_WARMUP,
            MuscleClass::Upper => &UPPER_WARMUP,
            MuscleClass::General => &GENERAL_WARMUP,
        };
        list.iter().map(|s| s.to_string()).collect()
    }

    pub fn cooldown(&self) -> Vec<String> {
        let list: &[&str] = match self {
            MuscleClass::Legs => &LEGS_COOLDOWN,
            MuscleClass::Upper => &UPPER_COOLDOWN,
            MuscleClass::General => &GENERAL_COOLDOWN,
        };
        list.iter().map(|s| s.to_string()).collect()
    }
}

/// One exercise as returned by the model. Sets and reps arrive as either
/// numbers or strings ("8-12"), so both are kept as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub sets: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub reps: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub rest: Option<String>,
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Structured plan from the JSON-mode model call. `warmup` and `cooldown` are
/// always replaced from the static tables after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub warmup: Vec<String>,
    #[serde(default)]
    pub cooldown: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Any other fields the model volunteered.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkoutPlan {
    /// Overwrites the warm-up and cool-down with the routines for `group`.
    pub fn apply_static_routines(&mut self, group: MuscleGroup) {
        let class = MuscleClass::of(group);
        self.warmup = class.warmup();
        self.cooldown = class.cooldown();
    }
}

/// What the user asked for, echoed in the rendered plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub muscle_group: MuscleGroup,
    pub difficulty: Difficulty,
    pub duration: String,
    pub equipment: String,
}

/// Renders a finished plan as the assistant's chat reply.
pub fn format_plan_message(plan: &WorkoutPlan, request: &PlanRequest) -> String {
    let kind = if plan.kind.trim().is_empty() {
        request.muscle_group.label().to_string()
    } else {
        plan.kind.trim().to_string()
    };

    let mut out = format!(
        "🏋️ YOUR {} WORKOUT\n\n📊 Level: {}\n⏱️ Duration: {}\n🛠️ Equipment: {}\n",
        kind.to_uppercase(),
        request.difficulty.label(),
        request.duration,
        request.equipment,
    );

    out.push_str("\n🔥 Warm-up:\n");
    for step in &plan.warmup {
        out.push_str(&format!("• {}\n", step));
    }

    out.push_str("\n💪 Exercises:\n");
    for (i, exercise) in plan.exercises.iter().enumerate() {
        out.push_str(&format!("{}. {}", i + 1, exercise.name));
        match (&exercise.sets, &exercise.reps) {
            (Some(sets), Some(reps)) => out.push_str(&format!(": {} sets x {} reps", sets, reps)),
            (Some(sets), None) => out.push_str(&format!(": {} sets", sets)),
            (None, Some(reps)) => out.push_str(&format!(": {} reps", reps)),
            (None, None) => {}
        }
        if let Some(rest) = &exercise.rest {
            out.push_str(&format!(" (rest {})", rest));
        }
        out.push('\n');
    }

    out.push_str("\n🧘 Cool-down:\n");
    for step in &plan.cooldown {
        out.push_str(&format!("• {}\n", step));
    }

    if let Some(notes) = plan.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        out.push_str(&format!("\n📝 Notes: {}\n", notes.trim()));
    }

    out.push_str("\nReady to crush it? Let me know how it goes! 💪");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> WorkoutPlan {
        serde_json::from_value(serde_json::json!({
            "type": "Lower body strength",
            "exercises": [
                { "name": "Goblet Squat", "sets": 3, "reps": "10-12", "rest": "60s" },
                { "name": "Romanian Deadlift", "sets": "3", "reps": 10 },
                { "name": "Plank" }
            ],
            "warmup": ["model warmup"],
            "cooldown": ["model cooldown"],
            "notes": "Keep your core tight.",
            "estimated_calories": 250
        }))
        .unwrap()
    }

    #[test]
    fn classes_cover_every_group() {
        assert_eq!(MuscleClass::of(MuscleGroup::Legs), MuscleClass::Legs);
        assert_eq!(MuscleClass::of(MuscleGroup::Chest), MuscleClass::Upper);
        assert_eq!(MuscleClass::of(MuscleGroup::Shoulders), MuscleClass::Upper);
        assert_eq!(MuscleClass::of(MuscleGroup::Cardio), MuscleClass::General);
        assert_eq!(MuscleClass::of(MuscleGroup::FullBody), MuscleClass::General);
    }

    #[test]
    fn parses_mixed_number_and_text_fields() {
        let plan = sample_plan();
        assert_eq!(plan.exercises[0].sets.as_deref(), Some("3"));
        assert_eq!(plan.exercises[1].reps.as_deref(), Some("10"));
        assert_eq!(plan.exercises[2].sets, None);
        assert_eq!(plan.extra["estimated_calories"], 250);
    }

    #[test]
    fn static_routines_replace_model_output() {
        let mut plan = sample_plan();
        plan.apply_static_routines(MuscleGroup::Legs);
        assert_eq!(plan.warmup, MuscleClass::Legs.warmup());
        assert_eq!(plan.cooldown, MuscleClass::Legs.cooldown());
    }

    #[test]
    fn rendered_plan_lists_everything() {
        let mut plan = sample_plan();
        plan.apply_static_routines(MuscleGroup::Legs);
        let request = PlanRequest {
            muscle_group: MuscleGroup::Legs,
            difficulty: Difficulty::Beginner,
            duration: "30 minutes".to_string(),
            equipment: "dumbbells only".to_string(),
        };
        let text = format_plan_message(&plan, &request);
        assert!(text.starts_with("🏋️ YOUR LOWER BODY STRENGTH WORKOUT"));
        assert!(text.contains("📊 Level: Beginner"));
        assert!(text.contains("⏱️ Duration: 30 minutes"));
        assert!(text.contains("1. Goblet Squat: 3 sets x 10-12 reps (rest 60s)"));
        assert!(text.contains("3. Plank\n"));
        assert!(text.contains(LEGS_WARMUP[0]));
        assert!(!text.contains("model warmup"));
        assert!(text.contains("📝 Notes: Keep your core tight."));
    }
}
