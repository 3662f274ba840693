// src/taxonomy.rs
//! The fixed mapping from muscle-group name to its recognized exercises.
//! Order matters: the first group is the default for new sections, and the
//! first exercise of a group is the default for new rows.

pub const MUSCLE_GROUPS: &[(&str, &[&str])] = &[
    (
        "Chest",
        &[
            "Bench Press",
            "Incline Bench Press",
            "Bench Dumbbell Flye",
            "Push-up",
            "Dumbbell Press",
            "Cable Crossover",
            "Dips",
            "Machine Chest Press",
            "Decline Bench Press",
            "Wide Grip Push-up",
        ],
    ),
    (
        "Triceps",
        &[
            "Triceps Pushdown",
            "Skullcrusher",
            "Dumbbell Skullcrusher",
            "Dips",
            "Close Grip Push-up",
            "Standing Rope Pushdown",
            "Triceps Kickback",
            "Bench Dip",
            "Machine Tricep Extension",
            "Overhead Standing Dumbbell Extension",
        ],
    ),
    (
        "Biceps",
        &[
            "Seated Bicep Curl",
            "Spider Dumbbell Hammer Curl",
            "Preacher Curl",
            "Concentration Curl",
            "Cable Curl",
            "Chin-up",
            "Barbell Curl",
            "Incline Dumbbell Curl",
            "EZ Bar Curl",
            "Zottman Curl",
        ],
    ),
    (
        "Shoulders",
        &[
            "Shoulder Press",
            "Single Arm Dumbbell Raise",
            "Lateral Raise",
            "Front Raise",
            "Reverse Fly",
            "Upright Row",
            "Dumbbell 6 Ways",
            "Dumbbell Shoulder Press",
            "Seated Barbell Press",
            "Push Press",
        ],
    ),
    (
        "Abs",
        &[
            "Crunch",
            "Plank",
            "Hanging Leg Raise",
            "Bicycle Crunch",
            "Russian Twist",
            "Cable Wood Chops",
            "Knee Tucks on Bench",
            "Ab Wheel Rollout",
            "Flutter Kicks",
            "Side Plank",
        ],
    ),
    (
        "Back",
        &[
            "Pull-up",
            "Lat Pulldown",
            "Barbell Row",
            "Deadlift",
            "T-Bar Row",
            "Seated Cable Row",
            "Bench Dumbbell Row",
            "Inverted Row",
            "Straight Arm Pulldown",
            "Chin-up",
        ],
    ),
    (
        "Legs Anterior",
        &[
            "Squat",
            "Leg Press",
            "Rear Foot Elevated Split Squat",
            "Leg Extension",
            "Front Squat",
            "Sissy Squat",
            "Bulgarian Split Squat",
            "Step-up",
            "Smith Machine Squat",
        ],
    ),
    (
        "Legs Posterior",
        &[
            "Hip Thrust",
            "Glute Bridge",
            "Barbell Hip Extension",
            "Hyper Extension",
            "Seated Calf Raise",
            "Standing Calf Raise",
            "Hip Adductor/Abductor",
            "Lying Leg Side Raises",
            "Leg Curl",
            "Walking Lunges",
            "Seated Leg Curl",
            "Lying Leg Curl",
        ],
    ),
];

/// The default group for a new section.
#[must_use]
pub fn default_group() -> &'static str {
    MUSCLE_GROUPS[0].0
}

/// Resolves a group name (case-insensitive) to its canonical spelling.
#[must_use]
pub fn canonical_group(name: &str) -> Option<&'static str> {
    let trimmed = name.trim();
    MUSCLE_GROUPS
        .iter()
        .find(|(group, _)| group.eq_ignore_ascii_case(trimmed))
        .map(|(group, _)| *group)
}

/// The exercises recognized under a group, if the group is known.
#[must_use]
pub fn exercises_for(group: &str) -> Option<&'static [&'static str]> {
    let trimmed = group.trim();
    MUSCLE_GROUPS
        .iter()
        .find(|(g, _)| g.eq_ignore_ascii_case(trimmed))
        .map(|(_, exercises)| *exercises)
}

/// The default exercise for rows added under a group.
#[must_use]
pub fn first_exercise(group: &str) -> Option<&'static str> {
    exercises_for(group).and_then(|exercises| exercises.first().copied())
}

/// Whether a group lists the given exercise (case-insensitive).
#[must_use]
pub fn group_lists(group: &str, exercise: &str) -> bool {
    exercises_for(group).is_some_and(|exercises| {
        exercises
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(exercise.trim()))
    })
}

/// All known group names, in presentation order.
#[must_use]
pub fn group_names() -> Vec<&'static str> {
    MUSCLE_GROUPS.iter().map(|(group, _)| *group).collect()
}
