// Architecture classification: weighted evidence scoring for frameworks,
// databases and ORMs, plus the priority cascade over structural predicates.

pub mod architecture;
pub mod database;
pub mod evidence;
pub mod framework;

pub use architecture::{ARCHITECTURE_RULES, ArchitectureRule, DetectionContext, classify, detect_architecture};
pub use database::{detect_database, detect_orm};
pub use evidence::{CandidatePatterns, CandidateScore, EvidenceIndex, EvidenceWeights, score_candidate};
pub use framework::detect_frameworks;
