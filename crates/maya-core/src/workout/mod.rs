//! Workout-planning dialogue.
//!
//! There is no stored flow object. Each turn the state is replayed from the
//! conversation history by matching assistant turns against the four
//! canonical questions, so the corrective and recovery messages below must
//! never equal one of those questions.

mod plan;

pub use plan::{format_plan_message, Exercise, MuscleClass, PlanRequest, WorkoutPlan};

use crate::completion::{CompletionRequest, CompletionSource};
use crate::error::{ChatError, ChatResult};
use crate::shared::{Role, Turn};

pub const MUSCLE_GROUP_PROMPT: &str = "Let's build your perfect workout! 💪 Which muscle group do you want to focus on? (legs, arms, chest, back, shoulders, core, cardio, or full-body)";
pub const DIFFICULTY_PROMPT: &str =
    "Great choice! What's your fitness level? (beginner, intermediate, or advanced)";
pub const DURATION_PROMPT: &str =
    "How long do you want your workout to be? (for example: 20 minutes, 45 minutes, 1 hour)";
pub const EQUIPMENT_PROMPT: &str = "Last question! What equipment do you have available? (for example: none, dumbbells, resistance bands, full gym)";

pub const INVALID_MUSCLE_GROUP: &str = "Hmm, I didn't catch that muscle group. 🤔 Please pick one of: legs, arms, chest, back, shoulders, core, cardio, full-body.";
pub const INVALID_DIFFICULTY: &str =
    "Hmm, I didn't catch your level. 🤔 Please pick one of: beginner, intermediate, advanced.";
pub const RECOVERY_MESSAGE: &str = "Sorry, I lost track of where we were with your workout plan. 😅 Want to start over? Just ask me to create a workout!";

const PLAN_SYSTEM_PROMPT: &str = "You are a certified personal trainer. Reply with a single JSON object of the form {\"type\": string, \"exercises\": [{\"name\": string, \"sets\": number, \"reps\": string, \"rest\": string}], \"notes\": string}. Fit the plan to the requested level, duration and equipment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuscleGroup {
    Legs,
    Arms,
    Chest,
    Back,
    Shoulders,
    Core,
    Cardio,
    FullBody,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 8] = [
        MuscleGroup::Legs,
        MuscleGroup::Arms,
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Core,
        MuscleGroup::Cardio,
        MuscleGroup::FullBody,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Legs => "legs",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Core => "core",
            MuscleGroup::Cardio => "cardio",
            MuscleGroup::FullBody => "full-body",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Core => "Core",
            MuscleGroup::Cardio => "Cardio",
            MuscleGroup::FullBody => "Full Body",
        }
    }

    /// Case-insensitive containment match; "full body" counts as full-body.
    pub fn parse_answer(answer: &str) -> Option<Self> {
        let answer = answer.to_lowercase().replace("full body", "full-body");
        Self::ALL
            .into_iter()
            .find(|group| answer.contains(group.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub fn parse_answer(answer: &str) -> Option<Self> {
        let answer = answer.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| answer.contains(level.as_str()))
    }
}

/// One question of the flow, in the order asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    MuscleGroup,
    Difficulty,
    Duration,
    Equipment,
}

impl Slot {
    pub fn prompt(&self) -> &'static str {
        match self {
            Slot::MuscleGroup => MUSCLE_GROUP_PROMPT,
            Slot::Difficulty => DIFFICULTY_PROMPT,
            Slot::Duration => DURATION_PROMPT,
            Slot::Equipment => EQUIPMENT_PROMPT,
        }
    }

    pub fn next(&self) -> Option<Slot> {
        match self {
            Slot::MuscleGroup => Some(Slot::Difficulty),
            Slot::Difficulty => Some(Slot::Duration),
            Slot::Duration => Some(Slot::Equipment),
            Slot::Equipment => None,
        }
    }

    /// The slot whose canonical question is exactly `text` (after trimming).
    fn from_prompt(text: &str) -> Option<Slot> {
        let text = text.trim();
        [Slot::MuscleGroup, Slot::Difficulty, Slot::Duration, Slot::Equipment]
            .into_iter()
            .find(|slot| slot.prompt() == text)
    }

    fn corrective(&self) -> &'static str {
        match self {
            Slot::MuscleGroup => INVALID_MUSCLE_GROUP,
            Slot::Difficulty => INVALID_DIFFICULTY,
            // Free-text slots accept any answer.
            Slot::Duration | Slot::Equipment => self.prompt(),
        }
    }
}

fn is_corrective(text: &str) -> bool {
    let text = text.trim();
    text == INVALID_MUSCLE_GROUP || text == INVALID_DIFFICULTY
}

/// Answers collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutSlots {
    pub muscle_group: Option<MuscleGroup>,
    pub difficulty: Option<Difficulty>,
    pub duration: Option<String>,
    pub equipment: Option<String>,
}

impl WorkoutSlots {
    /// Stores `answer` for `slot`; false (and nothing stored) when invalid.
    pub fn record(&mut self, slot: Slot, answer: &str) -> bool {
        match slot {
            Slot::MuscleGroup => match MuscleGroup::parse_answer(answer) {
                Some(group) => self.muscle_group = Some(group),
                None => return false,
            },
            Slot::Difficulty => match Difficulty::parse_answer(answer) {
                Some(level) => self.difficulty = Some(level),
                None => return false,
            },
            Slot::Duration | Slot::Equipment => {
                let answer = answer.trim();
                if answer.is_empty() {
                    return false;
                }
                if slot == Slot::Duration {
                    self.duration = Some(answer.to_string());
                } else {
                    self.equipment = Some(answer.to_string());
                }
            }
        }
        true
    }

    /// All four answers, if present.
    pub fn to_request(&self) -> Option<PlanRequest> {
        Some(PlanRequest {
            muscle_group: self.muscle_group?,
            difficulty: self.difficulty?,
            duration: self.duration.clone()?,
            equipment: self.equipment.clone()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No flow in progress.
    Idle,
    /// The last canonical question asked for this slot.
    Awaiting(Slot),
    /// A corrective message with no question before it.
    Orphaned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    pub stage: Stage,
    pub slots: WorkoutSlots,
}

/// Replays `history` from the start to find where the flow stands.
pub fn derive_state(history: &[Turn]) -> FlowState {
    let mut stage = Stage::Idle;
    let mut slots = WorkoutSlots::default();

    for turn in history {
        match turn.role {
            Role::Assistant => {
                if let Some(slot) = Slot::from_prompt(&turn.content) {
                    if slot == Slot::MuscleGroup {
                        slots = WorkoutSlots::default();
                    }
                    stage = Stage::Awaiting(slot);
                } else if is_corrective(&turn.content) {
                    if stage == Stage::Idle {
                        stage = Stage::Orphaned;
                        slots = WorkoutSlots::default();
                    }
                } else {
                    // Answers never outlive the flow they were given in.
                    stage = Stage::Idle;
                    slots = WorkoutSlots::default();
                }
            }
            Role::User => {
                if let Stage::Awaiting(slot) = stage {
                    slots.record(slot, &turn.content);
                }
            }
            Role::System => {}
        }
    }

    FlowState { stage, slots }
}

/// What the controller does with the current message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkoutTurn {
    /// Not part of a workout flow; let the caller handle it.
    NotInFlow,
    /// Send the canonical question for this slot.
    Ask(Slot),
    /// The answer was invalid; send this corrective message.
    Reprompt(&'static str),
    /// Send the recovery apology.
    Recover,
    /// Every slot is filled; build the plan.
    Finalize(PlanRequest),
}

impl WorkoutTurn {
    /// The fixed reply for every outcome except `NotInFlow` and `Finalize`.
    pub fn reply_text(&self) -> Option<&'static str> {
        match self {
            WorkoutTurn::Ask(slot) => Some(slot.prompt()),
            WorkoutTurn::Reprompt(text) => Some(text),
            WorkoutTurn::Recover => Some(RECOVERY_MESSAGE),
            WorkoutTurn::NotInFlow | WorkoutTurn::Finalize(_) => None,
        }
    }
}

/// Decides the next step from the history and the incoming message.
///
/// `starts_flow` says whether `message` is a workout request; it only matters
/// when no flow is in progress.
pub fn plan_turn(history: &[Turn], message: &str, starts_flow: bool) -> WorkoutTurn {
    let FlowState { stage, mut slots } = derive_state(history);

    match stage {
        Stage::Idle if starts_flow => WorkoutTurn::Ask(Slot::MuscleGroup),
        Stage::Idle => WorkoutTurn::NotInFlow,
        Stage::Orphaned => WorkoutTurn::Recover,
        Stage::Awaiting(slot) => {
            if !slots.record(slot, message) {
                return WorkoutTurn::Reprompt(slot.corrective());
            }
            match slot.next() {
                Some(next) => WorkoutTurn::Ask(next),
                None => match slots.to_request() {
                    Some(request) => WorkoutTurn::Finalize(request),
                    None => WorkoutTurn::Recover,
                },
            }
        }
    }
}

/// Issues the single structured-output call and renders the finished plan.
pub async fn build_plan(
    request: &PlanRequest,
    source: &dyn CompletionSource,
) -> ChatResult<(WorkoutPlan, String)> {
    let user_message = format!(
        "Create a {} {} workout that takes {} using {}.",
        request.difficulty.as_str(),
        request.muscle_group.as_str(),
        request.duration,
        request.equipment,
    );
    let raw = source
        .complete_json(CompletionRequest::json(PLAN_SYSTEM_PROMPT, &user_message))
        .await?;
    if raw.trim().is_empty() {
        return Err(ChatError::UpstreamModelFailure(
            "structured output was empty".to_string(),
        ));
    }

    let mut plan: WorkoutPlan = serde_json::from_str(&raw)?;
    plan.apply_static_routines(request.muscle_group);
    tracing::info!(
        target: "maya::workout",
        muscle_group = request.muscle_group.as_str(),
        difficulty = request.difficulty.as_str(),
        exercises = plan.exercises.len(),
        "workout plan built"
    );

    let text = format_plan_message(&plan, request);
    Ok((plan, text))
}
