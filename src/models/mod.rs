pub mod exercise;
pub mod loaders;
pub mod registry;
pub mod worksheet;

pub use exercise::{
    ChronologicalContent, ClozeTestContent, ExerciseContent, ExerciseTypeId,
    JumbledSentenceContent, WordFamilyContent,
};
pub use loaders::{load_worksheet_request, parse_worksheet_request, WorksheetRequest};
pub use registry::{list_exercise_types, ExerciseSchema, ExerciseTypeInfo, FieldKind};
pub use worksheet::{
    GeneratedExercise, GenerationOutcome, SelectionState, WorksheetResult, WORKSHEET_TITLE,
};
