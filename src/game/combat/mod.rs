// Combat system
//
// - `attack`: charged melee attack state machine
// - `feedback`: hit pause and camera shake
// - `knockback`: how struck things get pushed around

pub mod attack;
pub mod feedback;
pub mod knockback;

pub use attack::{
    AttackButton, AttackConfig, AttackKind, AttackPhase, AttackPosture, AttackSignal,
    ChargedAttack,
};
pub use feedback::{Feedback, FeedbackConfig};
pub use knockback::{Knockback, KnockbackModel};
